use thiserror::Error;

// ---------------------------------------------------------------------------
// Curve errors
// ---------------------------------------------------------------------------

/// Result alias used throughout the curve model.
pub type CurveResult<T> = Result<T, CurveError>;

/// Failures raised while building or transforming a [`Curve`](crate::Curve).
///
/// Resolution misses (unknown mnemonic, empty test map) are never errors;
/// they surface as empty result maps instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("must provide a basis or a start position")]
    MissingStart,

    #[error("must provide a step or a stop position")]
    MissingStep,

    #[error("a curve needs at least one sample")]
    EmptySamples,

    #[error("{samples} samples but the basis has {basis} positions")]
    LengthMismatch { samples: usize, basis: usize },

    #[error("step must be finite and non-zero, got {0}")]
    InvalidStep(f64),

    #[error("slice stride must be at least 1")]
    InvalidStride,

    #[error("slice {start}..{end} is out of range for a curve of {len} samples")]
    SliceOutOfRange { start: usize, end: usize, len: usize },

    #[error("blocking needs {needed} zone values but {got} were given")]
    BlockValues { needed: usize, got: usize },

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}
