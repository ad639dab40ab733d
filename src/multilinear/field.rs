//! Read-only view of an N-dimensional field in C-style storage order.
use num_traits::Float;

use super::Corners;
use crate::error::{Error, Result};
use crate::position::GridPos;

/// Borrowed N-dimensional array of values.
///
/// Values are stored in C order
/// (z(x0, y0), z(x0, y1), ..., z(x0, yn), z(x1, y0), ...), so the last axis
/// has unit stride.
#[derive(Clone, Copy, Debug)]
pub struct Field<'a, T, const N: usize> {
    dims: [usize; N],
    strides: [usize; N],
    vals: &'a [T],
}

impl<'a, T: Float, const N: usize> Field<'a, T, N> {
    /// # Errors
    /// * If `vals.len()` is not the product of `dims`
    pub fn new(dims: [usize; N], vals: &'a [T]) -> Result<Self> {
        let size: usize = dims.iter().product();
        if vals.len() != size {
            return Err(Error::mismatch("field values", size, vals.len()));
        }

        let mut strides = [1_usize; N];
        for i in (0..N.saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * dims[i + 1];
        }

        Ok(Self {
            dims,
            strides,
            vals,
        })
    }

    pub fn dims(&self) -> &[usize; N] {
        &self.dims
    }

    pub fn strides(&self) -> &[usize; N] {
        &self.strides
    }

    pub fn vals(&self) -> &'a [T] {
        self.vals
    }

    /// Value at a multi-index, or `None` past the extent of any axis.
    pub fn get(&self, loc: &[usize; N]) -> Option<T> {
        if loc.iter().zip(self.dims.iter()).any(|(i, n)| i >= n) {
            return None;
        }
        self.vals.get(self.flat_index(loc)).copied()
    }

    #[inline]
    fn flat_index(&self, loc: &[usize; N]) -> usize {
        let mut i = 0;
        for k in 0..N {
            i += loc[k] * self.strides[k];
        }
        i
    }

    /// Whether every grid position on `axis` leaves room for its upper point.
    ///
    /// # Errors
    /// * If any `idx + 1` is past the extent of the axis
    pub(crate) fn check_axis(&self, axis: usize, gp: &[GridPos<T>]) -> Result<()> {
        let extent = self.dims[axis];
        match gp.iter().find(|g| g.idx + 1 >= extent) {
            Some(g) => Err(Error::IndexOutOfBounds {
                axis,
                idx: g.idx,
                extent,
            }),
            None => Ok(()),
        }
    }

    /// Flat index of the lowest corner of the box around `gp`, after
    /// checking that the whole box lies inside the field.
    #[inline]
    pub(crate) fn origin(&self, gp: &[GridPos<T>; N]) -> Result<usize> {
        for k in 0..N {
            self.check_axis(k, core::slice::from_ref(&gp[k]))?;
        }
        Ok(self.origin_unchecked(gp))
    }

    #[inline]
    pub(crate) fn origin_unchecked(&self, gp: &[GridPos<T>; N]) -> usize {
        let mut i = 0;
        for k in 0..N {
            i += gp[k].idx * self.strides[k];
        }
        i
    }

    /// Weighted sum of the corners of the box whose lowest corner is at flat
    /// index `origin`, one weight per corner in the order of [`Corners`].
    ///
    /// Safe to index without further checks once `origin` has come from a
    /// position validated against this field.
    #[inline]
    pub(crate) fn corner_sum(&self, origin: usize, weights: &[T]) -> T {
        let mut acc = T::zero();
        for (c, &w) in weights.iter().enumerate() {
            let mut i = origin;
            for k in 0..N {
                if Corners::<N>::offset(c, k) == 1 {
                    i += self.strides[k];
                }
            }
            acc = acc + w * self.vals[i];
        }
        acc
    }
}

impl<'a, T: Float> Field<'a, T, 1> {
    /// Field along a single axis.
    pub fn vector(vals: &'a [T]) -> Self {
        Self {
            dims: [vals.len()],
            strides: [1],
            vals,
        }
    }
}

impl<'a, T: Float> Field<'a, T, 2> {
    /// Row-major matrix.
    pub fn matrix(nrows: usize, ncols: usize, vals: &'a [T]) -> Result<Self> {
        Self::new([nrows, ncols], vals)
    }
}

impl<'a, T: Float> Field<'a, T, 3> {
    pub fn tensor3(npages: usize, nrows: usize, ncols: usize, vals: &'a [T]) -> Result<Self> {
        Self::new([npages, nrows, ncols], vals)
    }
}
