//! Tolerances and locator configuration.
use num_traits::Float;

use crate::error::{as_f64, Error, Result};

/// Allowed deviation of fractional distances outside [0, 1] that is still
/// treated as numerical noise.
pub const FD_TOL: f64 = 1e-3;

/// Maximum deviation from 1 accepted when spot-checking interpolation weights.
pub const SUM_CHECK_EPSILON: f64 = 1e-6;

/// Conventional extrapolation factor: half of the outermost grid spacing.
pub const DEFAULT_EXTPOLFAC: f64 = 0.5;

/// Bracket choice for a query that coincides exactly with an interior
/// reference point.
///
/// For a point on grid index `k`, both `idx = k - 1` with `fd = (1, 0)` and
/// `idx = k` with `fd = (0, 1)` describe the same location. Multilinear
/// interpolation gives identical values either way; consumers that partition
/// the grid into cells may care.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TieBreak {
    /// Keep whichever bracket the scan is already in. Cheapest, but the
    /// result depends on the order of the queries.
    #[default]
    KeepBracket,
    /// Always use the cell whose lower end is the coincident point.
    CellAbove,
    /// Always use the cell whose upper end is the coincident point.
    CellBelow,
}

/// Coordinate in which grid positions are computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridScale {
    #[default]
    Linear,
    /// Natural logarithm of both grids, as used for pressure.
    /// All values must be strictly positive.
    Log,
}

impl GridScale {
    #[inline]
    pub(crate) fn apply<T: Float>(self, x: T) -> T {
        match self {
            GridScale::Linear => x,
            GridScale::Log => x.ln(),
        }
    }
}

/// Settings for the grid locator.
///
/// ```rust
/// use gridpos::{GridScale, LocatorConfig, TieBreak};
///
/// let config = LocatorConfig::<f64>::default()
///     .with_extpolfac(0.0)
///     .with_tie_break(TieBreak::CellAbove)
///     .with_scale(GridScale::Log);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocatorConfig<T> {
    /// Allowed extrapolation, in fractions of the outermost grid spacing.
    pub extpolfac: T,
    pub tie_break: TieBreak,
    pub scale: GridScale,
}

impl<T: Float> Default for LocatorConfig<T> {
    fn default() -> Self {
        Self {
            extpolfac: T::from(DEFAULT_EXTPOLFAC).unwrap_or_else(|| T::one() / (T::one() + T::one())),
            tie_break: TieBreak::default(),
            scale: GridScale::default(),
        }
    }
}

impl<T: Float> LocatorConfig<T> {
    pub fn with_extpolfac(mut self, extpolfac: T) -> Self {
        self.extpolfac = extpolfac;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_scale(mut self, scale: GridScale) -> Self {
        self.scale = scale;
        self
    }

    /// # Errors
    /// * If the extrapolation factor is negative or not finite
    pub fn validate(&self) -> Result<()> {
        if !(self.extpolfac.is_finite() && self.extpolfac >= T::zero()) {
            return Err(Error::InvalidParameter {
                name: "extpolfac",
                value: as_f64(self.extpolfac),
            });
        }
        Ok(())
    }
}

/// Tolerance constants converted to the working float type.
#[inline]
pub(crate) fn fd_tol<T: Float>() -> T {
    T::from(FD_TOL).unwrap_or_else(T::epsilon)
}

#[inline]
pub(crate) fn sum_check_epsilon<T: Float>() -> T {
    // f32 cannot resolve 1e-6 around 1 after a handful of products
    T::from(SUM_CHECK_EPSILON)
        .unwrap_or_else(T::epsilon)
        .max(T::epsilon() * T::from(16.0).unwrap_or_else(T::one))
}
