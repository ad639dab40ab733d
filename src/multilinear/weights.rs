//! Multilinear interpolation weights.
//!
//! Weights are stored as one row of 2^N entries per output point, in the
//! corner order of [`Corners`]. Rows follow the output points: for a
//! sequence, in sequence order, and for a grid, in C order over the output
//! axes with the last axis fastest.
//!
//! Computing weights once and reusing them for many fields with the same
//! shape is the intended pattern; [`interp_seq`](super::interp_seq) and
//! friends only read them.
use num_traits::Float;

use super::Corners;
use crate::config::sum_check_epsilon;
use crate::error::{as_f64, Error, Result};
use crate::position::GridPos;

/// Number of weights per output point for a rank-`ndims` field.
#[inline]
pub const fn n_weights(ndims: usize) -> usize {
    1 << ndims
}

/// Weights for a single point.
///
/// # Errors
/// * If `itw.len() != 2^N`
///
/// ```rust
/// use gridpos::GridPos;
/// use gridpos::multilinear::interpweights;
///
/// let gp = [GridPos::new(0, 0.5_f64), GridPos::new(0, 0.0)];
/// let mut itw = [0.0; 4];
/// interpweights(&mut itw, &gp).unwrap();
/// assert_eq!(itw, [0.5, 0.0, 0.5, 0.0]);
/// ```
pub fn interpweights<T: Float, const N: usize>(itw: &mut [T], gp: &[GridPos<T>; N]) -> Result<()> {
    let nc = Corners::<N>::COUNT;
    if itw.len() != nc {
        return Err(Error::mismatch("weights per point", nc, itw.len()));
    }
    Corners::<N>::fill_weights(gp, itw);
    Ok(())
}

/// Weights for a sequence of points, one position per axis for each point.
///
/// # Errors
/// * If the axes have different numbers of positions
/// * If `itw.len()` is not the number of points times 2^N
pub fn interpweights_seq<T: Float, const N: usize>(
    itw: &mut [T],
    gp: &[&[GridPos<T>]; N],
) -> Result<()> {
    let nc = Corners::<N>::COUNT;
    let m = sequence_len(gp)?;
    if itw.len() != m * nc {
        return Err(Error::mismatch("sequence weights", m * nc, itw.len()));
    }

    for (i, row) in itw.chunks_exact_mut(nc).enumerate() {
        let point: [GridPos<T>; N] = core::array::from_fn(|k| gp[k][i]);
        Corners::<N>::fill_weights(&point, row);
    }

    tracing::trace!(ndims = N, npoints = m, "sequence weights");
    Ok(())
}

/// Weights for every point of the output grid spanned by one set of
/// positions per axis.
///
/// # Errors
/// * If `itw.len()` is not the product of the axis lengths times 2^N
pub fn interpweights_grid<T: Float, const N: usize>(
    itw: &mut [T],
    gp: &[&[GridPos<T>]; N],
) -> Result<()> {
    let nc = Corners::<N>::COUNT;
    let shape: [usize; N] = core::array::from_fn(|k| gp[k].len());
    let npoints: usize = shape.iter().product();
    if itw.len() != npoints * nc {
        return Err(Error::mismatch("grid weights", npoints * nc, itw.len()));
    }
    if npoints == 0 {
        return Ok(());
    }

    let mut loc = [0_usize; N];
    for row in itw.chunks_exact_mut(nc) {
        let point: [GridPos<T>; N] = core::array::from_fn(|k| gp[k][loc[k]]);
        Corners::<N>::fill_weights(&point, row);
        advance(&mut loc, &shape);
    }

    tracing::trace!(ndims = N, npoints, "grid weights");
    Ok(())
}

/// Spot-check that the first row of weights sums to one.
///
/// Only the first row is examined; a consistent failure in how weights were
/// produced shows up there, and checking every row would cost as much as
/// the interpolation itself.
///
/// # Errors
/// * If the sum deviates from 1 by more than the weight-sum tolerance
pub fn check_weights<T: Float>(itw: &[T], nc: usize) -> Result<()> {
    let Some(row) = itw.get(..nc) else {
        return Ok(());
    };
    let sum = row.iter().fold(T::zero(), |acc, &w| acc + w);
    if (sum - T::one()).abs() > sum_check_epsilon::<T>() {
        tracing::debug!(sum = as_f64(sum), "interpolation weights do not sum to one");
        return Err(Error::WeightSum { sum: as_f64(sum) });
    }
    Ok(())
}

/// Shared length of per-axis position sequences.
pub(crate) fn sequence_len<T, const N: usize>(gp: &[&[GridPos<T>]; N]) -> Result<usize> {
    let m = gp.first().map_or(0, |g| g.len());
    match gp.iter().find(|g| g.len() != m) {
        Some(g) => Err(Error::mismatch("positions per axis", m, g.len())),
        None => Ok(m),
    }
}

/// Step a C-order multi-index through `shape`, last axis fastest.
/// Wraps to all zeros after the final index.
#[inline]
pub(crate) fn advance<const N: usize>(loc: &mut [usize; N], shape: &[usize; N]) {
    for k in (0..N).rev() {
        loc[k] += 1;
        if loc[k] < shape[k] {
            return;
        }
        loc[k] = 0;
    }
}

#[cfg(feature = "std")]
pub fn interpweights_seq_alloc<T: Float, const N: usize>(gp: &[&[GridPos<T>]; N]) -> Result<Vec<T>> {
    let m = sequence_len(gp)?;
    let mut itw = vec![T::zero(); m * Corners::<N>::COUNT];
    interpweights_seq(&mut itw, gp)?;
    Ok(itw)
}

#[cfg(feature = "std")]
pub fn interpweights_grid_alloc<T: Float, const N: usize>(gp: &[&[GridPos<T>]; N]) -> Result<Vec<T>> {
    let npoints: usize = gp.iter().map(|g| g.len()).product();
    let mut itw = vec![T::zero(); npoints * Corners::<N>::COUNT];
    interpweights_grid(&mut itw, gp)?;
    Ok(itw)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::*;
    use rand::Rng;

    fn random_positions(rng: &mut rand::rngs::StdRng, n: usize) -> Vec<GridPos<f64>> {
        (0..n)
            .map(|_| GridPos::new(rng.random_range(0..10), rng.random::<f64>()))
            .collect()
    }

    #[test]
    fn test_two_dim_example() {
        let gp = [GridPos::new(0, 0.5_f64), GridPos::new(0, 0.0)];
        let mut itw = [0.0; 4];
        interpweights(&mut itw, &gp).unwrap();
        // Corners (0,0), (0,1), (1,0), (1,1)
        assert_eq!(itw, [0.5, 0.0, 0.5, 0.0]);
    }

    fn check_unit_sum<const N: usize>() {
        let mut rng = rng_fixed_seed();
        let gps: Vec<Vec<GridPos<f64>>> = (0..N).map(|_| random_positions(&mut rng, 9)).collect();
        let refs: [&[GridPos<f64>]; N] = core::array::from_fn(|k| &gps[k][..]);

        let itw = interpweights_seq_alloc(&refs).unwrap();
        assert_eq!(itw.len(), 9 << N);
        for row in itw.chunks_exact(1 << N) {
            let sum: f64 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "{N} dims: sum {sum}");
            assert!(row.iter().all(|&w| w >= 0.0));
        }
    }

    #[test]
    fn test_weights_sum_to_one() {
        check_unit_sum::<1>();
        check_unit_sum::<2>();
        check_unit_sum::<3>();
        check_unit_sum::<4>();
        check_unit_sum::<5>();
        check_unit_sum::<6>();
        check_unit_sum::<7>();
    }

    #[test]
    fn test_single_point_matches_sequence() {
        let mut rng = rng_fixed_seed();
        let a = random_positions(&mut rng, 5);
        let b = random_positions(&mut rng, 5);
        let seq = interpweights_seq_alloc(&[&a[..], &b[..]]).unwrap();
        for i in 0..5 {
            let mut row = [0.0; 4];
            interpweights(&mut row, &[a[i], b[i]]).unwrap();
            assert_eq!(&seq[4 * i..4 * (i + 1)], &row[..]);
        }
    }

    #[test]
    fn test_grid_rows_follow_c_order() {
        let mut rng = rng_fixed_seed();
        let a = random_positions(&mut rng, 3);
        let b = random_positions(&mut rng, 4);
        let c = random_positions(&mut rng, 2);
        let itw = interpweights_grid_alloc(&[&a[..], &b[..], &c[..]]).unwrap();
        assert_eq!(itw.len(), 3 * 4 * 2 * 8);

        let mut o = 0;
        for i in 0..3 {
            for j in 0..4 {
                for k in 0..2 {
                    let mut row = [0.0; 8];
                    interpweights(&mut row, &[a[i], b[j], c[k]]).unwrap();
                    assert_eq!(&itw[8 * o..8 * (o + 1)], &row[..]);
                    o += 1;
                }
            }
        }
    }

    #[test]
    fn test_mis_sized_weights() {
        let gp = [GridPos::new(0, 0.5_f64); 3];
        let mut itw = [0.0; 4];
        assert!(matches!(
            interpweights(&mut itw, &gp),
            Err(Error::DimensionMismatch { expected: 8, actual: 4, .. })
        ));

        let a = [GridPos::new(0, 0.5_f64); 3];
        let b = [GridPos::new(0, 0.5_f64); 2];
        let mut itw = [0.0; 12];
        assert!(matches!(
            interpweights_seq(&mut itw, &[&a[..], &b[..]]),
            Err(Error::DimensionMismatch { expected: 3, actual: 2, .. })
        ));

        let mut itw = [0.0; 20];
        assert!(matches!(
            interpweights_grid(&mut itw, &[&a[..], &b[..]]),
            Err(Error::DimensionMismatch { expected: 24, actual: 20, .. })
        ));
    }

    #[test]
    fn test_empty_grid_axis() {
        let a = [GridPos::new(0, 0.5_f64); 3];
        let empty: [GridPos<f64>; 0] = [];
        let itw = interpweights_grid_alloc(&[&a[..], &empty[..]]).unwrap();
        assert!(itw.is_empty());
    }

    #[test]
    fn test_check_weights() {
        assert!(check_weights(&[0.25_f64, 0.75, 5.0, 5.0], 2).is_ok());
        assert_eq!(
            check_weights(&[0.25_f64, 0.5], 2),
            Err(Error::WeightSum { sum: 0.75 })
        );
        assert!(check_weights::<f64>(&[], 2).is_ok());
    }

    #[test]
    fn test_advance_wraps() {
        let shape = [2, 3];
        let mut loc = [0, 0];
        let mut seen = vec![];
        for _ in 0..6 {
            seen.push(loc);
            advance(&mut loc, &shape);
        }
        assert_eq!(seen, vec![[0, 0], [0, 1], [0, 2], [1, 0], [1, 1], [1, 2]]);
        assert_eq!(loc, [0, 0]);
    }
}
