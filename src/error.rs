//! Errors raised at the boundary of the interpolation engine.
//!
//! Every variant is a local precondition violation. Nothing here is
//! transient, so callers either fix their input or abort the enclosing
//! computation.
use num_traits::Float;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// What is wrong with a reference grid.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridDefect {
    #[error("{len} points, at least {required} are required")]
    TooFewPoints { len: usize, required: usize },
    #[error("not strictly monotonic at index {index}")]
    NotMonotonic { index: usize },
    #[error("non-positive value at index {index} on a logarithmic grid")]
    NonPositive { index: usize },
    #[error("non-finite value at index {index}")]
    NotFinite { index: usize },
}

/// Interpolation engine error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Reference grid rejected before any search began.
    #[error("malformed reference grid on axis {axis}: {defect}")]
    MalformedGrid { axis: usize, defect: GridDefect },

    /// Query value outside the permitted extrapolation envelope.
    #[error(
        "query value {value} (element {index}, axis {axis}) is outside the allowed range [{min}, {max}]"
    )]
    OutOfRange {
        axis: usize,
        index: usize,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Container shapes inconsistent with the number of axes or query count.
    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A grid position addresses a cell beyond the field extent.
    #[error("grid position index {idx} on axis {axis} needs {} points, field has {extent}", .idx + 2)]
    IndexOutOfBounds {
        axis: usize,
        idx: usize,
        extent: usize,
    },

    /// Interpolation weights do not sum to one.
    #[error("interpolation weights sum to {sum}, expected 1")]
    WeightSum { sum: f64 },

    /// Fractional distances too far outside [0, 1] to be numerical noise.
    #[error("fractional distances ({fd0}, {fd1}) deviate from [0, 1] by more than the tolerance")]
    FractionOutOfTolerance { fd0: f64, fd1: f64 },

    /// No grid range in the requested direction.
    #[error("grid position {idx} has no grid range in the requested direction (upwards: {upwards})")]
    NoGridRange { idx: usize, upwards: bool },

    /// Two polynomial stencil abscissas coincide.
    #[error("coincident stencil abscissas at {x}")]
    SingularStencil { x: f64 },

    /// Configuration value rejected.
    #[error("invalid value {value} for parameter `{name}`")]
    InvalidParameter { name: &'static str, value: f64 },
}

impl Error {
    /// Attach the axis a single-axis operation was run for.
    pub fn on_axis(self, axis: usize) -> Self {
        match self {
            Self::MalformedGrid { defect, .. } => Self::MalformedGrid { axis, defect },
            Self::OutOfRange {
                index,
                value,
                min,
                max,
                ..
            } => Self::OutOfRange {
                axis,
                index,
                value,
                min,
                max,
            },
            Self::IndexOutOfBounds { idx, extent, .. } => {
                Self::IndexOutOfBounds { axis, idx, extent }
            }
            other => other,
        }
    }

    pub(crate) fn malformed(defect: GridDefect) -> Self {
        Self::MalformedGrid { axis: 0, defect }
    }

    pub(crate) fn mismatch(context: &'static str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            context,
            expected,
            actual,
        }
    }
}

/// Lossy conversion for error context; unrepresentable values report as NaN.
#[inline]
pub(crate) fn as_f64<T: Float>(x: T) -> f64 {
    x.to_f64().unwrap_or(f64::NAN)
}
