//! Interpolation along a sequence of points, one output per point.
use num_traits::Float;

use super::weights::sequence_len;
use super::{check_weights, Corners, Field};
use crate::error::{Error, Result};
use crate::position::GridPos;

/// Interpolate `field` at each of a sequence of points.
///
/// Point `i` is located by `gp[k][i]` on each axis `k`, and its weights are
/// row `i` of `itw` as produced by
/// [`interpweights_seq`](super::interpweights_seq).
///
/// All positions are checked against the field before any output is
/// written.
///
/// # Errors
/// * If the axes have different numbers of positions, or that number is not `out.len()`
/// * If `itw.len()` is not `out.len()` times 2^N
/// * If the first row of weights does not sum to one
/// * If any position addresses a cell outside the field
pub fn interp_seq<T: Float, const N: usize>(
    out: &mut [T],
    itw: &[T],
    field: &Field<'_, T, N>,
    gp: &[&[GridPos<T>]; N],
) -> Result<()> {
    let nc = Corners::<N>::COUNT;
    let m = sequence_len(gp)?;
    if out.len() != m {
        return Err(Error::mismatch("sequence output", m, out.len()));
    }
    if itw.len() != m * nc {
        return Err(Error::mismatch("sequence weights", m * nc, itw.len()));
    }
    check_weights(itw, nc)?;
    for k in 0..N {
        field.check_axis(k, gp[k])?;
    }

    for (i, (o, w)) in out.iter_mut().zip(itw.chunks_exact(nc)).enumerate() {
        let point: [GridPos<T>; N] = core::array::from_fn(|k| gp[k][i]);
        *o = field.corner_sum(field.origin_unchecked(&point), w);
    }

    tracing::trace!(ndims = N, npoints = m, "sequence interpolation");
    Ok(())
}

#[cfg(feature = "std")]
pub fn interp_seq_alloc<T: Float, const N: usize>(
    itw: &[T],
    field: &Field<'_, T, N>,
    gp: &[&[GridPos<T>]; N],
) -> Result<Vec<T>> {
    let mut out = vec![T::zero(); sequence_len(gp)?];
    interp_seq(&mut out, itw, field, gp)?;
    Ok(out)
}
