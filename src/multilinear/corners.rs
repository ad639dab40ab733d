//! Enumeration order of hyper-box corners.
//!
//! Weight synthesis and field sampling must agree on which weight belongs to
//! which corner. Both go through [`Corners`], so the order is defined once.
use num_traits::Float;

use super::n_weights;
use crate::position::GridPos;

/// Corners of the 2^N hyper-box around an interpolation point, in weight
/// storage order.
///
/// Corner `c` is the N-bit number whose bit `N - 1 - k` is the offset along
/// axis `k`: 0 for the point at `idx`, 1 for the point at `idx + 1`.
/// Counting upward therefore varies the last axis fastest, and visits the
/// lower point of each axis before the upper one. This is the same order
/// as C-style storage of a 2x2x...x2 block.
///
/// ```rust
/// use gridpos::multilinear::Corners;
///
/// let offsets: Vec<[usize; 2]> = Corners::<2>::new().map(|c| c.offsets).collect();
/// assert_eq!(offsets, vec![[0, 0], [0, 1], [1, 0], [1, 1]]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Corners<const N: usize> {
    next: usize,
}

/// One corner of the hyper-box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Corner<const N: usize> {
    /// Position in weight storage
    pub index: usize,
    /// Offset from the bracket index along each axis, 0 or 1
    pub offsets: [usize; N],
}

impl<const N: usize> Corners<N> {
    /// Number of corners, 2^N.
    pub const COUNT: usize = {
        assert!(N > 0 && N < usize::BITS as usize, "rank must be at least 1");
        n_weights(N)
    };

    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Offset of `corner` along `axis`.
    #[inline]
    pub const fn offset(corner: usize, axis: usize) -> usize {
        (corner >> (N - 1 - axis)) & 1
    }

    #[inline]
    pub fn offsets(corner: usize) -> [usize; N] {
        core::array::from_fn(|axis| Self::offset(corner, axis))
    }

    /// Weight of one corner: the product over axes of the lower or upper
    /// weight selected by that corner's offsets.
    #[inline]
    pub fn weight<T: Float>(corner: usize, gp: &[GridPos<T>; N]) -> T {
        let mut w = T::one();
        for k in 0..N {
            w = w
                * match Self::offset(corner, k) {
                    0 => gp[k].lower_weight(),
                    _ => gp[k].upper_weight(),
                };
        }
        w
    }

    /// Write all 2^N corner weights into `out`.
    ///
    /// Builds the outer product one axis at a time, doubling the filled
    /// prefix of `out` on every axis. Filling from the back keeps each
    /// source entry intact until it has been consumed.
    ///
    /// `out` must hold exactly [`Corners::COUNT`] entries.
    #[inline]
    pub(crate) fn fill_weights<T: Float>(gp: &[GridPos<T>; N], out: &mut [T]) {
        debug_assert_eq!(out.len(), Self::COUNT);
        out[0] = T::one();
        let mut filled = 1;
        for g in gp.iter() {
            let (lo, hi) = (g.lower_weight(), g.upper_weight());
            for j in (0..filled).rev() {
                let w = out[j];
                out[2 * j] = w * lo;
                out[2 * j + 1] = w * hi;
            }
            filled *= 2;
        }
    }
}

impl<const N: usize> Default for Corners<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Iterator for Corners<N> {
    type Item = Corner<N>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= Self::COUNT {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(Corner {
            index,
            offsets: Self::offsets(index),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = Self::COUNT.saturating_sub(self.next);
        (rest, Some(rest))
    }
}

impl<const N: usize> ExactSizeIterator for Corners<N> {}
