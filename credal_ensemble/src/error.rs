use credal_core::CredalError;
use thiserror::Error;

/// Errors raised while turning ensemble votes into fused decisions.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EnsembleError {
    /// Kernel error (shape, order, empty set, incompatibility, ...).
    #[error(transparent)]
    Core(#[from] CredalError),

    /// A class count is negative, NaN or infinite.
    #[error("invalid count {value} for class {class}")]
    InvalidCount { class: usize, value: f64 },

    /// The smoothing constant must be positive and finite.
    #[error("smoothing constant must be positive and finite, got {0}")]
    InvalidSmoothing(f64),

    /// Ground-truth class index outside the frame.
    #[error("ground truth class {truth} outside frame of {frame_size} outcomes")]
    TruthOutOfRange { truth: usize, frame_size: usize },
}

pub type EnsembleResult<T> = Result<T, EnsembleError>;
