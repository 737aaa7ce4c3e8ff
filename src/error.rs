use thiserror::Error;

/// Errors returned by the clustering engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Input slice is empty.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Points in a dataset have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A coordinate is NaN or infinite.
    #[error("non-finite coordinate at point {point}, dimension {dim}")]
    NonFiniteCoordinate {
        /// Index of the offending point.
        point: usize,
        /// Dimension of the offending coordinate.
        dim: usize,
    },

    /// An allocation for an internal buffer could not be satisfied.
    #[error("allocation failed for {what} ({requested} elements)")]
    ResourceExhausted {
        /// Which buffer was being allocated.
        what: &'static str,
        /// Number of elements requested.
        requested: usize,
    },
}

impl Error {
    /// Whether this error is a precondition violation on the caller's input.
    ///
    /// These are detected before any parallel work starts; fixing the input is
    /// the only remedy.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::EmptyInput
                | Error::InvalidParameter { .. }
                | Error::DimensionMismatch { .. }
                | Error::NonFiniteCoordinate { .. }
        )
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
