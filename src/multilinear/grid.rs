//! Interpolation onto the outer product of per-axis positions.
use num_traits::Float;

use super::weights::advance;
use super::{check_weights, Corners, Field};
use crate::error::{Error, Result};
use crate::position::GridPos;

/// Interpolate `field` onto the output grid spanned by `gp`.
///
/// The output has shape `[gp[0].len(), ..., gp[N-1].len()]` and is stored
/// in C order, as are the weight rows from
/// [`interpweights_grid`](super::interpweights_grid).
///
/// # Errors
/// * If `out.len()` is not the product of the axis lengths
/// * If `itw.len()` is not `out.len()` times 2^N
/// * If the first row of weights does not sum to one
/// * If any position addresses a cell outside the field
///
/// ```rust
/// use gridpos::GridPos;
/// use gridpos::multilinear::{interp_grid, interpweights_grid_alloc, Field};
///
/// // z = x + 10 y on a 2x2 grid
/// let vals = [0.0_f64, 10.0, 1.0, 11.0];
/// let field = Field::matrix(2, 2, &vals).unwrap();
///
/// let gx = [GridPos::new(0, 0.5)];
/// let gy = [GridPos::new(0, 0.0), GridPos::new(0, 1.0)];
/// let gp = [&gx[..], &gy[..]];
/// let itw = interpweights_grid_alloc(&gp).unwrap();
///
/// let mut out = [0.0; 2];
/// interp_grid(&mut out, &itw, &field, &gp).unwrap();
/// assert_eq!(out, [0.5, 10.5]);
/// ```
pub fn interp_grid<T: Float, const N: usize>(
    out: &mut [T],
    itw: &[T],
    field: &Field<'_, T, N>,
    gp: &[&[GridPos<T>]; N],
) -> Result<()> {
    let nc = Corners::<N>::COUNT;
    let shape = check_grid_inputs(out, itw, field, gp)?;
    if out.is_empty() {
        return Ok(());
    }

    let mut loc = [0_usize; N];
    for (o, w) in out.iter_mut().zip(itw.chunks_exact(nc)) {
        *o = field.corner_sum(origin_at(field, gp, &loc), w);
        advance(&mut loc, &shape);
    }

    tracing::trace!(ndims = N, npoints = out.len(), "grid interpolation");
    Ok(())
}

/// [`interp_grid`] with the slowest output axis split across the rayon
/// thread pool.
///
/// Produces exactly the same values as the sequential version.
///
/// # Errors
/// * As for [`interp_grid`]
#[cfg(feature = "rayon")]
pub fn interp_grid_par<T, const N: usize>(
    out: &mut [T],
    itw: &[T],
    field: &Field<'_, T, N>,
    gp: &[&[GridPos<T>]; N],
) -> Result<()>
where
    T: Float + Send + Sync,
{
    use rayon::prelude::*;

    let nc = Corners::<N>::COUNT;
    let shape = check_grid_inputs(out, itw, field, gp)?;
    if out.is_empty() {
        return Ok(());
    }

    // Points sharing one index on the first axis
    let plane = out.len() / shape[0];
    let mut inner_shape = shape;
    inner_shape[0] = 1;

    out.par_chunks_mut(plane)
        .zip(itw.par_chunks(plane * nc))
        .enumerate()
        .for_each(|(i0, (o_plane, w_plane))| {
            let mut loc = [0_usize; N];
            loc[0] = i0;
            for (o, w) in o_plane.iter_mut().zip(w_plane.chunks_exact(nc)) {
                *o = field.corner_sum(origin_at(field, gp, &loc), w);
                advance(&mut loc, &inner_shape);
                loc[0] = i0;
            }
        });

    tracing::trace!(ndims = N, npoints = out.len(), "parallel grid interpolation");
    Ok(())
}

#[cfg(feature = "std")]
pub fn interp_grid_alloc<T: Float, const N: usize>(
    itw: &[T],
    field: &Field<'_, T, N>,
    gp: &[&[GridPos<T>]; N],
) -> Result<Vec<T>> {
    let npoints = gp.iter().map(|g| g.len()).product();
    let mut out = vec![T::zero(); npoints];
    interp_grid(&mut out, itw, field, gp)?;
    Ok(out)
}

/// Validate shapes and positions, returning the output shape.
fn check_grid_inputs<T: Float, const N: usize>(
    out: &[T],
    itw: &[T],
    field: &Field<'_, T, N>,
    gp: &[&[GridPos<T>]; N],
) -> Result<[usize; N]> {
    let nc = Corners::<N>::COUNT;
    let shape: [usize; N] = core::array::from_fn(|k| gp[k].len());
    let npoints: usize = shape.iter().product();
    if out.len() != npoints {
        return Err(Error::mismatch("grid output", npoints, out.len()));
    }
    if itw.len() != npoints * nc {
        return Err(Error::mismatch("grid weights", npoints * nc, itw.len()));
    }
    check_weights(itw, nc)?;
    for k in 0..N {
        field.check_axis(k, gp[k])?;
    }
    Ok(shape)
}

#[inline]
fn origin_at<T: Float, const N: usize>(
    field: &Field<'_, T, N>,
    gp: &[&[GridPos<T>]; N],
    loc: &[usize; N],
) -> usize {
    let strides = field.strides();
    let mut i = 0;
    for k in 0..N {
        i += gp[k][loc[k]].idx * strides[k];
    }
    i
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::locate::{gridpos_alloc, GridDirection};
    use crate::multilinear::{interp_seq_alloc, interpweights_grid_alloc, interpweights_seq_alloc};
    use crate::testing::*;
    use crate::utils::{linspace, meshgrid};

    #[test]
    fn test_grid_matches_sequence() {
        let mut rng = rng_fixed_seed();
        let x = linspace(0.0_f64, 4.0, 5);
        let y = noisy_grid(&mut rng, 6, -1.0, 1.0, 0.1, GridDirection::Descending);
        let z = randn::<f64>(&mut rng, 5 * 6);
        let field = Field::matrix(5, 6, &z).unwrap();

        let xq = linspace(0.2, 3.9, 7);
        let yq = linspace(0.85, -0.85, 4);
        let gx = gridpos_alloc(&x, &xq).unwrap();
        let gy = gridpos_alloc(&y, &yq).unwrap();

        let itw = interpweights_grid_alloc(&[&gx[..], &gy[..]]).unwrap();
        let on_grid = interp_grid_alloc(&itw, &field, &[&gx[..], &gy[..]]).unwrap();

        // Flatten the output grid into an explicit sequence of points
        let mesh = meshgrid(vec![&xq, &yq]);
        let mx: Vec<f64> = mesh.iter().map(|p| p[0]).collect();
        let my: Vec<f64> = mesh.iter().map(|p| p[1]).collect();
        let sx = gridpos_alloc(&x, &mx).unwrap();
        let sy = gridpos_alloc(&y, &my).unwrap();
        let sitw = interpweights_seq_alloc(&[&sx[..], &sy[..]]).unwrap();
        let on_seq = interp_seq_alloc(&sitw, &field, &[&sx[..], &sy[..]]).unwrap();

        assert_eq!(on_grid.len(), 7 * 4);
        for (a, b) in on_grid.iter().zip(on_seq.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_reference_points_reproduced() {
        let mut rng = rng_fixed_seed();
        let x = noisy_grid(&mut rng, 4, 0.0, 3.0, 0.2, GridDirection::Ascending);
        let y = noisy_grid(&mut rng, 3, 10.0, 30.0, 1.0, GridDirection::Descending);
        let w = linspace(-2.0_f64, 2.0, 5);
        let z = randn::<f64>(&mut rng, 4 * 3 * 5);
        let field = Field::tensor3(4, 3, 5, &z).unwrap();

        let gx = gridpos_alloc(&x, &x).unwrap();
        let gy = gridpos_alloc(&y, &y).unwrap();
        let gw = gridpos_alloc(&w, &w).unwrap();
        let gp = [&gx[..], &gy[..], &gw[..]];
        let itw = interpweights_grid_alloc(&gp).unwrap();
        let out = interp_grid_alloc(&itw, &field, &gp).unwrap();

        for (a, b) in out.iter().zip(z.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_mis_sized() {
        let z = [0.0_f64; 4];
        let field = Field::matrix(2, 2, &z).unwrap();
        let g = [GridPos::new(0, 0.5_f64); 3];
        let gp = [&g[..], &g[..2]];
        let itw = interpweights_grid_alloc(&gp).unwrap();

        let mut out = [0.0; 5];
        assert_eq!(
            interp_grid(&mut out, &itw, &field, &gp),
            Err(Error::DimensionMismatch {
                context: "grid output",
                expected: 6,
                actual: 5
            })
        );

        let mut out = [0.0; 6];
        assert!(matches!(
            interp_grid(&mut out, &itw[1..], &field, &gp),
            Err(Error::DimensionMismatch { context: "grid weights", .. })
        ));
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn test_parallel_matches_sequential() {
        let mut rng = rng_fixed_seed();
        let x = linspace(0.0_f64, 1.0, 6);
        let y = linspace(0.0_f64, 2.0, 5);
        let w = linspace(0.0_f64, 3.0, 4);
        let z = randn::<f64>(&mut rng, 6 * 5 * 4);
        let field = Field::tensor3(6, 5, 4, &z).unwrap();

        let gx = gridpos_alloc(&x, &linspace(0.05, 0.95, 9)).unwrap();
        let gy = gridpos_alloc(&y, &linspace(0.1, 1.9, 3)).unwrap();
        let gw = gridpos_alloc(&w, &linspace(2.9, 0.1, 7)).unwrap();
        let gp = [&gx[..], &gy[..], &gw[..]];
        let itw = interpweights_grid_alloc(&gp).unwrap();

        let seq = interp_grid_alloc(&itw, &field, &gp).unwrap();
        let mut par = vec![0.0; seq.len()];
        interp_grid_par(&mut par, &itw, &field, &gp).unwrap();
        assert_eq!(seq, par);
    }
}
