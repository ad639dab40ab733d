//! Position of a value relative to a reference grid.
use core::fmt;

use num_traits::Float;

use crate::config::fd_tol;
use crate::error::{as_f64, Error, Result};

/// Bracket index and fractional distances locating one value on one axis.
///
/// `fd[0]` is the fractional distance from `idx` toward `idx + 1`, and so is
/// the interpolation weight of the point at `idx + 1`. `fd[1] = 1 - fd[0]` is
/// the weight of the point at `idx`. The same convention holds for ascending
/// and descending grids, since `idx` always counts in storage order.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPos<T> {
    pub idx: usize,
    pub fd: [T; 2],
}

impl<T: Float> GridPos<T> {
    /// A position in the cell starting at `idx`, a fraction `fd0` of the way
    /// toward `idx + 1`.
    #[inline]
    pub fn new(idx: usize, fd0: T) -> Self {
        Self {
            idx,
            fd: [fd0, T::one() - fd0],
        }
    }

    /// A position exactly on grid point `idx`, as the lower end of its cell.
    #[inline]
    pub fn at_index(idx: usize) -> Self {
        Self::new(idx, T::zero())
    }

    /// Weight of the point at `idx`.
    #[inline]
    pub fn lower_weight(&self) -> T {
        self.fd[1]
    }

    /// Weight of the point at `idx + 1`.
    #[inline]
    pub fn upper_weight(&self) -> T {
        self.fd[0]
    }

    /// Continuous grid coordinate, `idx + fd[0]`.
    #[inline]
    pub fn fractional(&self) -> T {
        T::from(self.idx).unwrap_or_else(T::nan) + self.fd[0]
    }

    /// Clamp fractional distances into [0, 1].
    ///
    /// For use when the fractions are known to be correct up to roundoff,
    /// which can leave them marginally outside the unit interval.
    ///
    /// # Errors
    /// * If either fraction lies more than `FD_TOL` outside [0, 1]
    pub fn clamp_fd(&mut self) -> Result<()> {
        let tol = fd_tol::<T>();
        let lo = -tol;
        let hi = T::one() + tol;
        let ok = self.fd.iter().all(|&f| f > lo && f < hi);
        if !ok {
            return Err(Error::FractionOutOfTolerance {
                fd0: as_f64(self.fd[0]),
                fd1: as_f64(self.fd[1]),
            });
        }
        self.fd
            .iter_mut()
            .for_each(|f| *f = f.max(T::zero()).min(T::one()));
        Ok(())
    }

    /// Snap the fractions to exactly (0, 1) or (1, 0), whichever is closer.
    ///
    /// For positions known to sit on a grid point, where roundoff would
    /// otherwise leave a tiny weight on the neighbouring point.
    pub fn force_end_fd(&mut self) {
        let half = T::one() / (T::one() + T::one());
        self.fd = if self.fd[0] < half {
            [T::zero(), T::one()]
        } else {
            [T::one(), T::zero()]
        };
    }

    /// Whether this position is exactly on grid index `i`.
    pub fn is_at_index(&self, i: usize) -> bool {
        if self.fd[0] == T::zero() {
            self.idx == i
        } else if self.fd[0] == T::one() {
            self.idx + 1 == i
        } else {
            false
        }
    }

    /// Index of the lower end of the grid range of interest.
    ///
    /// Inside a cell this is just `idx`. On a grid point the relevant range
    /// is ambiguous, and `upwards` selects the range above the point instead
    /// of the one below it.
    ///
    /// # Errors
    /// * If the fractions are outside [0, 1]
    /// * If the point is on grid index 0 and the range below is requested
    pub fn grid_range(&self, upwards: bool) -> Result<usize> {
        let fd0 = self.fd[0];
        if !(fd0 >= T::zero() && fd0 <= T::one()) {
            return Err(Error::FractionOutOfTolerance {
                fd0: as_f64(fd0),
                fd1: as_f64(self.fd[1]),
            });
        }

        if fd0 > T::zero() && fd0 < T::one() {
            Ok(self.idx)
        } else if fd0 == T::zero() {
            match upwards {
                true => Ok(self.idx),
                false => self.idx.checked_sub(1).ok_or(Error::NoGridRange {
                    idx: self.idx,
                    upwards,
                }),
            }
        } else {
            match upwards {
                true => Ok(self.idx + 1),
                false => Ok(self.idx),
            }
        }
    }
}

impl<T: fmt::Display> fmt::Display for GridPos<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.idx, self.fd[0], self.fd[1])
    }
}
