//! Interpolation of a single point.
use num_traits::Float;

use super::{check_weights, Corners, Field};
use crate::error::{Error, Result};
use crate::position::GridPos;

/// Interpolate `field` at one point using weights from
/// [`interpweights`](super::interpweights).
///
/// # Errors
/// * If `itw.len() != 2^N`
/// * If the weights do not sum to one
/// * If any position addresses a cell outside the field
///
/// ```rust
/// use gridpos::GridPos;
/// use gridpos::multilinear::{interp, interpweights, Field};
///
/// let vals = [1.0_f64, 2.0, 3.0, 4.0];
/// let field = Field::matrix(2, 2, &vals).unwrap();
/// let gp = [GridPos::new(0, 0.5), GridPos::new(0, 0.0)];
///
/// let mut itw = [0.0; 4];
/// interpweights(&mut itw, &gp).unwrap();
/// assert_eq!(interp(&itw, &field, &gp).unwrap(), 2.0);
/// ```
pub fn interp<T: Float, const N: usize>(
    itw: &[T],
    field: &Field<'_, T, N>,
    gp: &[GridPos<T>; N],
) -> Result<T> {
    let nc = Corners::<N>::COUNT;
    if itw.len() != nc {
        return Err(Error::mismatch("weights per point", nc, itw.len()));
    }
    check_weights(itw, nc)?;
    let origin = field.origin(gp)?;
    Ok(field.corner_sum(origin, itw))
}

/// Interpolate `field` at one point without a separate weight buffer.
///
/// Each corner weight is formed on the fly, so no storage proportional to
/// 2^N is needed.
///
/// # Errors
/// * If any position addresses a cell outside the field
pub fn interp_point<T: Float, const N: usize>(
    field: &Field<'_, T, N>,
    gp: &[GridPos<T>; N],
) -> Result<T> {
    let origin = field.origin(gp)?;
    let vals = field.vals();
    let strides = field.strides();

    let mut acc = T::zero();
    for c in Corners::<N>::new() {
        let mut i = origin;
        for k in 0..N {
            i += c.offsets[k] * strides[k];
        }
        acc = acc + Corners::<N>::weight(c.index, gp) * vals[i];
    }
    Ok(acc)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::multilinear::interpweights;
    use crate::testing::*;
    use rand::Rng;

    #[test]
    fn test_two_dim_example() {
        let vals = [1.0_f64, 2.0, 3.0, 4.0];
        let field = Field::matrix(2, 2, &vals).unwrap();
        let gp = [GridPos::new(0, 0.5), GridPos::new(0, 0.0)];
        let mut itw = [0.0; 4];
        interpweights(&mut itw, &gp).unwrap();
        assert_eq!(interp(&itw, &field, &gp).unwrap(), 2.0);
        assert_eq!(interp_point(&field, &gp).unwrap(), 2.0);
    }

    #[test]
    fn test_matches_weight_buffer() {
        let mut rng = rng_fixed_seed();
        let vals = randn::<f64>(&mut rng, 3 * 4 * 5);
        let field = Field::tensor3(3, 4, 5, &vals).unwrap();
        for _ in 0..50 {
            let gp = [
                GridPos::new(rng.random_range(0..2), rng.random()),
                GridPos::new(rng.random_range(0..3), rng.random()),
                GridPos::new(rng.random_range(0..4), rng.random()),
            ];
            let mut itw = [0.0; 8];
            interpweights(&mut itw, &gp).unwrap();
            let a = interp(&itw, &field, &gp).unwrap();
            let b = interp_point(&field, &gp).unwrap();
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rejects_bad_weights() {
        let vals = [1.0_f64, 2.0];
        let field = Field::vector(&vals);
        let gp = [GridPos::new(0, 0.5)];
        assert_eq!(
            interp(&[0.5, 0.25], &field, &gp),
            Err(Error::WeightSum { sum: 0.75 })
        );
        assert!(matches!(
            interp(&[0.5, 0.25, 0.25], &field, &gp),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_rejects_out_of_bounds() {
        let vals = [1.0_f64, 2.0];
        let field = Field::vector(&vals);
        let gp = [GridPos::new(1, 0.0)];
        assert_eq!(
            interp(&[1.0, 0.0], &field, &gp),
            Err(Error::IndexOutOfBounds {
                axis: 0,
                idx: 1,
                extent: 2
            })
        );
        assert!(interp_point(&field, &gp).is_err());
    }
}
