//! Grid positions of query values on a reference grid.
//!
//! ```rust
//! use gridpos::{gridpos, GridPos};
//!
//! // Descending pressure levels
//! let p = [100.0_f64, 10.0, 1.0];
//! let query = [5.5, 50.0];
//! let mut gp = [GridPos::at_index(0); 2];
//!
//! gridpos(&mut gp, &p, &query).unwrap();
//! assert_eq!(gp[0].idx, 1);
//! assert_eq!(gp[0].fd[0], 0.5);
//! assert_eq!(gp[1].idx, 0);
//! ```
//!
//! The search keeps a running bracket between consecutive queries and walks
//! it one cell at a time, so sorted or mostly sorted query sequences (points
//! along a propagation path, levels of a column) cost close to O(1) per
//! query. Arbitrary order is still correct, with O(n) worst case per query.
use num_traits::Float;

use crate::config::{GridScale, LocatorConfig, TieBreak};
use crate::error::{as_f64, Error, GridDefect, Result};
use crate::position::GridPos;

/// Sort order of a reference grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridDirection {
    Ascending,
    Descending,
}

impl GridDirection {
    /// Direction implied by the first two points. Equal points count as
    /// ascending, and are caught by the monotonicity check.
    ///
    /// # Errors
    /// * If the grid has fewer than 2 points
    pub fn of<T: Float>(grid: &[T]) -> Result<Self> {
        if grid.len() < 2 {
            return Err(Error::malformed(GridDefect::TooFewPoints {
                len: grid.len(),
                required: 2,
            }));
        }
        match grid[0] <= grid[1] {
            true => Ok(GridDirection::Ascending),
            false => Ok(GridDirection::Descending),
        }
    }

    /// Multiplier that maps the grid onto an ascending one.
    #[inline]
    fn sign<T: Float>(self) -> T {
        match self {
            GridDirection::Ascending => T::one(),
            GridDirection::Descending => -T::one(),
        }
    }
}

/// Check that a reference grid is usable: at least `required` points, all
/// finite, strictly monotonic in either direction, and strictly positive
/// when located on a logarithmic scale.
///
/// # Errors
/// * `MalformedGrid` describing the first defect found
pub fn check_grid<T: Float>(grid: &[T], required: usize, scale: GridScale) -> Result<GridDirection> {
    let required = required.max(2);
    if grid.len() < required {
        return Err(Error::malformed(GridDefect::TooFewPoints {
            len: grid.len(),
            required,
        }));
    }

    for (index, &x) in grid.iter().enumerate() {
        if !x.is_finite() {
            return Err(Error::malformed(GridDefect::NotFinite { index }));
        }
        if scale == GridScale::Log && x <= T::zero() {
            return Err(Error::malformed(GridDefect::NonPositive { index }));
        }
    }

    let direction = GridDirection::of(grid)?;
    let s = direction.sign::<T>();
    if let Some(i) = (1..grid.len()).find(|&i| s * grid[i] <= s * grid[i - 1]) {
        return Err(Error::malformed(GridDefect::NotMonotonic { index: i }));
    }

    Ok(direction)
}

/// Grid locator for one reference axis.
///
/// The reference grid is validated once on construction, after which any
/// number of query sequences can be located against it.
///
/// Internally every coordinate is mapped onto an ascending "key" axis:
/// the configured scale is applied and descending grids are negated.
/// Fractional distances are invariant under that negation, so one search
/// loop serves both directions.
#[derive(Clone, Copy, Debug)]
pub struct Locator<'a, T> {
    grid: &'a [T],
    config: LocatorConfig<T>,
    direction: GridDirection,
    /// Extrapolation limits on the key axis
    key_lo: T,
    key_hi: T,
}

impl<'a, T: Float> Locator<'a, T> {
    /// Validate the reference grid and precompute the extrapolation limits.
    ///
    /// # Errors
    /// * If the configuration is invalid
    /// * If the grid has fewer than 2 points, non-finite values, or is not
    ///   strictly monotonic
    /// * If the grid has non-positive values on a logarithmic scale
    pub fn new(grid: &'a [T], config: LocatorConfig<T>) -> Result<Self> {
        config.validate()?;
        let direction = check_grid(grid, 2, config.scale).map_err(|e| {
            tracing::debug!(error = %e, "reference grid rejected");
            e
        })?;

        let n = grid.len();
        let mut loc = Self {
            grid,
            config,
            direction,
            key_lo: T::zero(),
            key_hi: T::zero(),
        };
        let (k0, k1) = (loc.key(0), loc.key(1));
        let (km2, km1) = (loc.key(n - 2), loc.key(n - 1));
        loc.key_lo = k0 - config.extpolfac * (k1 - k0);
        loc.key_hi = km1 + config.extpolfac * (km1 - km2);

        let (min, max) = loc.limits();
        tracing::debug!(
            n,
            ?direction,
            scale = ?config.scale,
            min = as_f64(min),
            max = as_f64(max),
            "grid locator ready"
        );

        Ok(loc)
    }

    /// Locator with the conventional extrapolation factor of 0.5.
    ///
    /// # Errors
    /// * As for [`Locator::new`]
    pub fn with_default(grid: &'a [T]) -> Result<Self> {
        Self::new(grid, LocatorConfig::default())
    }

    /// Number of reference grid points.
    #[inline]
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    /// Always false; a locator holds at least two points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    #[inline]
    pub fn direction(&self) -> GridDirection {
        self.direction
    }

    #[inline]
    pub fn config(&self) -> &LocatorConfig<T> {
        &self.config
    }

    /// Smallest and largest accepted query value, in grid units.
    pub fn limits(&self) -> (T, T) {
        let s = self.direction.sign::<T>();
        let a = self.unkey(s * self.key_lo);
        let b = self.unkey(s * self.key_hi);
        (a.min(b), a.max(b))
    }

    /// Whether `v` lies inside the extrapolation envelope.
    #[inline]
    pub fn contains(&self, v: T) -> bool {
        let kv = self.key_of(v);
        kv >= self.key_lo && kv <= self.key_hi
    }

    /// Locate a single value.
    ///
    /// # Errors
    /// * If `v` is outside the extrapolation envelope
    pub fn locate_one(&self, v: T) -> Result<GridPos<T>> {
        let mut gp = [GridPos::at_index(0)];
        self.locate(&[v], &mut gp)?;
        Ok(gp[0])
    }

    /// Locate every value of `new_grid`, writing one position per value
    /// into `gp`.
    ///
    /// # Errors
    /// * If `gp` and `new_grid` differ in length
    /// * If any query value is outside the extrapolation envelope; `gp` is
    ///   left partially written in that case
    pub fn locate(&self, new_grid: &[T], gp: &mut [GridPos<T>]) -> Result<()> {
        if gp.len() != new_grid.len() {
            return Err(Error::mismatch("grid position output", new_grid.len(), gp.len()));
        }
        if new_grid.is_empty() {
            return Ok(());
        }

        let n = self.grid.len();
        let last = n - 2; // highest valid bracket index

        // Start from a linear estimate between the extrapolation limits
        let frac = (self.key_of(new_grid[0]) - self.key_lo) / (self.key_hi - self.key_lo);
        let start = (frac * T::from(last).unwrap_or_else(T::zero)).round();
        let mut pos = start.to_usize().unwrap_or(0).min(last);

        let mut lower = self.key(pos);
        let mut upper = self.key(pos + 1);

        for (i, (&v, out)) in new_grid.iter().zip(gp.iter_mut()).enumerate() {
            let kv = self.key_of(v);
            if !(kv >= self.key_lo && kv <= self.key_hi) {
                let (min, max) = self.limits();
                tracing::debug!(index = i, value = as_f64(v), "query outside extrapolation limits");
                return Err(Error::OutOfRange {
                    axis: 0,
                    index: i,
                    value: as_f64(v),
                    min: as_f64(min),
                    max: as_f64(max),
                });
            }

            // Walk the bracket down or up until it holds the value.
            // At the ends the bracket stays put, which is extrapolation.
            if kv < lower && pos > 0 {
                while kv < lower && pos > 0 {
                    pos -= 1;
                    lower = self.key(pos);
                }
                upper = self.key(pos + 1);
            } else if kv > upper && pos < last {
                while kv > upper && pos < last {
                    pos += 1;
                    upper = self.key(pos + 1);
                }
                lower = self.key(pos);
            }

            let mut fd0 = (kv - lower) / (upper - lower);

            match self.config.tie_break {
                TieBreak::KeepBracket => {}
                TieBreak::CellAbove if fd0 == T::one() && pos < last => {
                    pos += 1;
                    lower = upper;
                    upper = self.key(pos + 1);
                    fd0 = T::zero();
                }
                TieBreak::CellBelow if fd0 == T::zero() && pos > 0 => {
                    pos -= 1;
                    upper = lower;
                    lower = self.key(pos);
                    fd0 = T::one();
                }
                _ => {}
            }

            if fd0 < T::zero() || fd0 > T::one() {
                tracing::trace!(index = i, value = as_f64(v), "query in extrapolation margin");
            }

            *out = GridPos::new(pos, fd0);
        }

        Ok(())
    }

    /// Locate every value of `new_grid`, allocating the output.
    ///
    /// # Errors
    /// * As for [`Locator::locate`]
    #[cfg(feature = "std")]
    pub fn locate_alloc(&self, new_grid: &[T]) -> Result<Vec<GridPos<T>>> {
        let mut gp = vec![GridPos::at_index(0); new_grid.len()];
        self.locate(new_grid, &mut gp)?;
        Ok(gp)
    }

    /// Reference point `i` on the key axis
    #[inline]
    fn key(&self, i: usize) -> T {
        self.key_of(self.grid[i])
    }

    #[inline]
    fn key_of(&self, v: T) -> T {
        self.direction.sign::<T>() * self.config.scale.apply(v)
    }

    /// Inverse of the scale transform, for reporting limits
    #[inline]
    fn unkey(&self, x: T) -> T {
        match self.config.scale {
            GridScale::Linear => x,
            GridScale::Log => x.exp(),
        }
    }
}

/// Grid positions with an explicit extrapolation factor.
///
/// `old_grid` must be strictly monotonic with at least two points, in either
/// direction. `new_grid` may be in any order; sorted input is fastest.
/// Query values may lie outside the reference grid by at most `extpolfac`
/// times the spacing of the two outermost points at that end.
///
/// # Errors
/// * If `old_grid` is malformed
/// * If `gp` and `new_grid` differ in length
/// * If any query value is outside the allowed extrapolation
pub fn gridpos_extpol<T: Float>(
    gp: &mut [GridPos<T>],
    old_grid: &[T],
    new_grid: &[T],
    extpolfac: T,
) -> Result<()> {
    let config = LocatorConfig::default().with_extpolfac(extpolfac);
    Locator::new(old_grid, config)?.locate(new_grid, gp)
}

/// Grid positions with the conventional extrapolation factor of 0.5.
///
/// # Errors
/// * As for [`gridpos_extpol`]
pub fn gridpos<T: Float>(gp: &mut [GridPos<T>], old_grid: &[T], new_grid: &[T]) -> Result<()> {
    Locator::with_default(old_grid)?.locate(new_grid, gp)
}

/// Grid position of a single value, for pointwise interpolation.
///
/// # Errors
/// * As for [`gridpos_extpol`]
pub fn gridpos_one<T: Float>(old_grid: &[T], new_value: T) -> Result<GridPos<T>> {
    Locator::with_default(old_grid)?.locate_one(new_value)
}

/// Grid positions, allocating the output.
///
/// # Errors
/// * As for [`gridpos_extpol`]
#[cfg(feature = "std")]
pub fn gridpos_alloc<T: Float>(old_grid: &[T], new_grid: &[T]) -> Result<Vec<GridPos<T>>> {
    Locator::with_default(old_grid)?.locate_alloc(new_grid)
}

/// Check a pair of grids ahead of an interpolation of the given order.
///
/// Meant for validating user input before any grid positions are computed.
/// Values exactly on the extrapolation limit are accepted.
///
/// # Errors
/// * If `old_grid` has fewer than `order + 1` points or is malformed
/// * `OutOfRange` for the first value of `new_grid` outside the
///   extrapolation envelope, NaN included
pub fn check_interpolation_grids<T: Float>(
    old_grid: &[T],
    new_grid: &[T],
    order: usize,
    extpolfac: T,
) -> Result<()> {
    check_grid(old_grid, order + 1, GridScale::Linear)?;
    let config = LocatorConfig::default().with_extpolfac(extpolfac);
    let locator = Locator::new(old_grid, config)?;
    let (min, max) = locator.limits();

    // NaN fails both comparisons and is rejected here
    match new_grid.iter().position(|&v| !(v >= min && v <= max)) {
        Some(index) => Err(Error::OutOfRange {
            axis: 0,
            index,
            value: as_f64(new_grid[index]),
            min: as_f64(min),
            max: as_f64(max),
        }),
        None => Ok(()),
    }
}

/// Scalar variant of [`check_interpolation_grids`].
///
/// # Errors
/// * As for [`check_interpolation_grids`]
pub fn check_interpolation_grid_one<T: Float>(
    old_grid: &[T],
    new_value: T,
    order: usize,
    extpolfac: T,
) -> Result<()> {
    check_interpolation_grids(old_grid, &[new_value], order, extpolfac)
}
