//! Local polynomial interpolation in one dimension.
//!
//! A short stencil of reference points around the bracket of a query is
//! fitted exactly by a polynomial, which is evaluated with Neville's
//! algorithm. This is smoother than linear interpolation for slowly varying
//! profiles sampled on coarse grids.
//!
//! ```rust
//! use gridpos::{gridpos_one, polynomial::interp_poly};
//!
//! let x = [0.0_f64, 1.0, 2.0, 3.0];
//! let y: Vec<f64> = x.iter().map(|x| x * x).collect();
//!
//! let gp = gridpos_one(&x, 1.5).unwrap();
//! let v = interp_poly(&x, &y, 1.5, &gp).unwrap();
//! assert!((v - 2.25).abs() < 1e-12);
//! ```
//!
//! References
//! * Press et al., Numerical Recipes, section 3.1
use num_traits::Float;

use crate::error::{as_f64, Error, GridDefect, Result};
use crate::position::GridPos;

/// Stencil size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PolyOrder {
    /// Three points, second degree
    #[default]
    Quadratic,
    /// Four points, third degree
    Cubic,
}

impl PolyOrder {
    /// Number of stencil points.
    pub const fn points(self) -> usize {
        match self {
            PolyOrder::Quadratic => 3,
            PolyOrder::Cubic => 4,
        }
    }
}

/// Interpolated value with the magnitude of the last Neville correction,
/// which serves as an error estimate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolyEstimate<T> {
    pub value: T,
    pub error: T,
}

/// Evaluate the polynomial through `(xa[i], ya[i])` at `x` with Neville's
/// algorithm.
///
/// The tableau starts from the stencil point nearest `x`, and each column
/// adds the correction that keeps the path through the tableau closest to
/// the centre. The last correction is returned as the error estimate.
///
/// # Errors
/// * If two abscissas coincide
pub fn polint<T: Float, const M: usize>(xa: &[T; M], ya: &[T; M], x: T) -> Result<PolyEstimate<T>> {
    if M == 0 {
        return Err(Error::malformed(GridDefect::TooFewPoints { len: 0, required: 1 }));
    }

    let mut c = *ya;
    let mut d = *ya;

    let mut ns = 0;
    let mut dif = (x - xa[0]).abs();
    for i in 1..M {
        let dift = (x - xa[i]).abs();
        if dift < dif {
            ns = i;
            dif = dift;
        }
    }

    let mut value = ya[ns];
    let mut error = T::zero();
    // Row of the tableau the path currently sits just above, one below `ns`
    let mut ns = ns as isize - 1;

    for m in 1..M {
        for i in 0..M - m {
            let ho = xa[i] - x;
            let hp = xa[i + m] - x;
            let den = ho - hp;
            if den == T::zero() {
                return Err(Error::SingularStencil { x: as_f64(xa[i]) });
            }
            let w = (c[i + 1] - d[i]) / den;
            d[i] = hp * w;
            c[i] = ho * w;
        }

        error = if 2 * (ns + 1) < (M - m) as isize {
            c[(ns + 1) as usize]
        } else {
            let e = d[ns as usize];
            ns -= 1;
            e
        };
        value = value + error;
    }

    Ok(PolyEstimate {
        value,
        error: error.abs(),
    })
}

/// First index of the stencil used for a query located at `gp` on a grid of
/// `n` points.
///
/// Quadratic stencils take the bracket plus the neighbour on the side the
/// query leans toward. Cubic stencils take one point below the bracket and
/// one above. Either is shifted inward where it would run off the grid.
///
/// # Errors
/// * If the grid is too short for the stencil
/// * If `gp` has no bracket on a grid of `n` points
pub fn stencil_start<T: Float>(n: usize, gp: &GridPos<T>, order: PolyOrder) -> Result<usize> {
    let required = order.points();
    if n < required {
        return Err(Error::malformed(GridDefect::TooFewPoints { len: n, required }));
    }
    if gp.idx + 1 >= n {
        return Err(Error::IndexOutOfBounds {
            axis: 0,
            idx: gp.idx,
            extent: n,
        });
    }

    let half = T::one() / (T::one() + T::one());
    let start = match order {
        PolyOrder::Quadratic => {
            if (gp.fd[0] <= half && gp.idx > 0) || gp.idx == n - 2 {
                gp.idx - 1
            } else {
                gp.idx
            }
        }
        PolyOrder::Cubic => gp.idx.saturating_sub(1).min(n - 4),
    };
    Ok(start)
}

/// Quadratic interpolation of `y(x)` at `x_i`, located on `x` by `gp`.
///
/// `x` must be strictly monotonic, in either direction. It is not checked
/// here; coincident stencil points are still reported.
///
/// # Errors
/// * If `x` and `y` differ in length, or have fewer than 3 points
/// * If `gp` has no bracket on `x`
/// * If two stencil abscissas coincide
pub fn interp_poly<T: Float>(x: &[T], y: &[T], x_i: T, gp: &GridPos<T>) -> Result<T> {
    interp_poly_with(x, y, x_i, gp, PolyOrder::Quadratic).map(|e| e.value)
}

/// Polynomial interpolation with a choice of stencil, returning the error
/// estimate along with the value.
///
/// # Errors
/// * As for [`interp_poly`], with 4 points required for [`PolyOrder::Cubic`]
pub fn interp_poly_with<T: Float>(
    x: &[T],
    y: &[T],
    x_i: T,
    gp: &GridPos<T>,
    order: PolyOrder,
) -> Result<PolyEstimate<T>> {
    if x.len() != y.len() {
        return Err(Error::mismatch("polynomial values", x.len(), y.len()));
    }
    let s = stencil_start(x.len(), gp, order)?;
    match order {
        PolyOrder::Quadratic => polint::<T, 3>(&[x[s], x[s + 1], x[s + 2]], &[y[s], y[s + 1], y[s + 2]], x_i),
        PolyOrder::Cubic => polint::<T, 4>(
            &[x[s], x[s + 1], x[s + 2], x[s + 3]],
            &[y[s], y[s + 1], y[s + 2], y[s + 3]],
            x_i,
        ),
    }
}

/// Polynomial interpolation of a whole query sequence, with positions from
/// [`gridpos`](crate::gridpos()).
///
/// # Errors
/// * If `x_i`, `gp` and `out` differ in length
/// * As for [`interp_poly_with`] for any single query
pub fn interp_poly_seq<T: Float>(
    out: &mut [T],
    x: &[T],
    y: &[T],
    x_i: &[T],
    gp: &[GridPos<T>],
    order: PolyOrder,
) -> Result<()> {
    if gp.len() != x_i.len() {
        return Err(Error::mismatch("polynomial grid positions", x_i.len(), gp.len()));
    }
    if out.len() != x_i.len() {
        return Err(Error::mismatch("polynomial output", x_i.len(), out.len()));
    }
    for ((o, &xv), g) in out.iter_mut().zip(x_i.iter()).zip(gp.iter()) {
        *o = interp_poly_with(x, y, xv, g, order)?.value;
    }
    tracing::trace!(n = x.len(), npoints = out.len(), ?order, "polynomial interpolation");
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::locate::{gridpos_alloc, gridpos_one};
    use crate::utils::linspace;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_polint_exact_for_quadratic() {
        let xa = [0.5_f64, 1.0, 3.0];
        let f = |x: f64| 2.0 - x + 0.75 * x * x;
        let ya = xa.map(f);
        for x in [0.5, 0.6, 1.7, 2.99, 3.0, 4.0] {
            let e = polint(&xa, &ya, x).unwrap();
            assert_abs_diff_eq!(e.value, f(x), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_polint_exact_for_cubic() {
        let xa = [-1.0_f64, 0.0, 0.5, 2.0];
        let f = |x: f64| x * x * x - 2.0 * x + 1.0;
        let ya = xa.map(f);
        for x in [-0.9, 0.1, 0.25, 1.2, 1.99] {
            let e = polint(&xa, &ya, x).unwrap();
            assert_abs_diff_eq!(e.value, f(x), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_polint_at_nodes() {
        let xa = [1.0_f64, 2.0, 4.0];
        let ya = [3.0_f64, -1.0, 7.0];
        for i in 0..3 {
            let e = polint(&xa, &ya, xa[i]).unwrap();
            assert_abs_diff_eq!(e.value, ya[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_polint_error_estimate() {
        // A straight line needs no correction beyond linear
        let xa = [0.0_f64, 1.0, 2.0];
        let ya = [1.0_f64, 3.0, 5.0];
        let e = polint(&xa, &ya, 0.4).unwrap();
        assert_abs_diff_eq!(e.value, 1.8, epsilon = 1e-12);
        assert_abs_diff_eq!(e.error, 0.0, epsilon = 1e-12);

        // Curvature shows up in the last correction
        let ya = [0.0_f64, 1.0, 4.0];
        let e = polint(&xa, &ya, 0.5).unwrap();
        assert_abs_diff_eq!(e.value, 0.25, epsilon = 1e-12);
        assert!(e.error > 0.0);
    }

    #[test]
    fn test_polint_singular() {
        let xa = [0.0_f64, 1.0, 1.0];
        let ya = [0.0_f64, 1.0, 2.0];
        assert_eq!(polint(&xa, &ya, 0.5), Err(Error::SingularStencil { x: 1.0 }));
    }

    #[test]
    fn test_quadratic_stencil_choice() {
        let gp = |idx, fd0| GridPos::new(idx, fd0);
        let q = PolyOrder::Quadratic;
        // Leans down: bracket plus the point below
        assert_eq!(stencil_start(6, &gp(2, 0.3_f64), q).unwrap(), 1);
        assert_eq!(stencil_start(6, &gp(2, 0.5_f64), q).unwrap(), 1);
        // Leans up: bracket plus the point above
        assert_eq!(stencil_start(6, &gp(2, 0.7_f64), q).unwrap(), 2);
        // Nothing below the first cell
        assert_eq!(stencil_start(6, &gp(0, 0.2_f64), q).unwrap(), 0);
        // Nothing above the last cell
        assert_eq!(stencil_start(6, &gp(4, 0.9_f64), q).unwrap(), 3);
    }

    #[test]
    fn test_cubic_stencil_choice() {
        let c = PolyOrder::Cubic;
        assert_eq!(stencil_start(6, &GridPos::new(0, 0.5_f64), c).unwrap(), 0);
        assert_eq!(stencil_start(6, &GridPos::new(2, 0.5_f64), c).unwrap(), 1);
        assert_eq!(stencil_start(6, &GridPos::new(3, 0.5_f64), c).unwrap(), 2);
        assert_eq!(stencil_start(6, &GridPos::new(4, 0.5_f64), c).unwrap(), 2);
    }

    #[test]
    fn test_stencil_errors() {
        assert!(matches!(
            stencil_start(2, &GridPos::new(0, 0.5_f64), PolyOrder::Quadratic),
            Err(Error::MalformedGrid {
                defect: GridDefect::TooFewPoints { len: 2, required: 3 },
                ..
            })
        ));
        assert!(matches!(
            stencil_start(3, &GridPos::new(0, 0.5_f64), PolyOrder::Cubic),
            Err(Error::MalformedGrid { .. })
        ));
        assert!(matches!(
            stencil_start(4, &GridPos::new(3, 0.0_f64), PolyOrder::Quadratic),
            Err(Error::IndexOutOfBounds { idx: 3, extent: 4, .. })
        ));
        assert!(matches!(
            interp_poly(&[0.0_f64, 1.0, 2.0], &[0.0, 1.0], 0.5, &GridPos::new(0, 0.5)),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_reproduces_quadratic_on_descending_grid() {
        let x = linspace(10.0_f64, 1.0, 7);
        let f = |x: f64| 0.2 * x * x - 3.0 * x + 4.0;
        let y: Vec<f64> = x.iter().map(|&x| f(x)).collect();

        let q = linspace(9.7_f64, 1.2, 23);
        let gp = gridpos_alloc(&x, &q).unwrap();
        for order in [PolyOrder::Quadratic, PolyOrder::Cubic] {
            let mut out = vec![0.0; q.len()];
            interp_poly_seq(&mut out, &x, &y, &q, &gp, order).unwrap();
            for (v, &xq) in out.iter().zip(q.iter()) {
                assert_abs_diff_eq!(*v, f(xq), epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_more_accurate_than_linear() {
        let x = linspace(0.0_f64, 3.0, 7);
        let y: Vec<f64> = x.iter().map(|x| x.sin()).collect();
        let xq = 1.3;
        let gp = gridpos_one(&x, xq).unwrap();

        let quad = interp_poly(&x, &y, xq, &gp).unwrap();
        let lin = y[gp.idx] * gp.lower_weight() + y[gp.idx + 1] * gp.upper_weight();
        assert!((quad - xq.sin()).abs() < (lin - xq.sin()).abs());
    }
}
