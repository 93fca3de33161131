//! Error types for interval-probability operations.

use thiserror::Error;

/// Errors raised by the kernel. All are detected synchronously by the call
/// that raises them; nothing is retried internally.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CredalError {
    /// Vector or event length does not match the frame size.
    #[error("shape mismatch: expected {expected} outcomes, got {actual}")]
    Shape { expected: usize, actual: usize },

    /// Upper bound below lower bound at construction.
    #[error("upper bound {upper} below lower bound {lower} for outcome {index}")]
    Order { index: usize, upper: f64, lower: f64 },

    /// NaN or infinite bound at construction.
    #[error("non-finite bound for outcome {index}")]
    NonFinite { index: usize },

    /// Tightening attempted on bounds that admit no distribution.
    #[error("bounds induce an empty credal set (sum lower = {sum_lower}, sum upper = {sum_upper})")]
    EmptySet { sum_lower: f64, sum_upper: f64 },

    /// Conjunction attempted on an incompatible collection.
    #[error("interval probability set is incompatible")]
    IncompatibleSet,

    /// A collection needs at least one member.
    #[error("interval probability set has no members")]
    EmptyCollection,

    /// Member index past the end of a collection.
    #[error("member index {index} out of range for {members} members")]
    MemberIndex { index: usize, members: usize },

    /// Hurwicz optimism coefficient outside [0, 1].
    #[error("hurwicz alpha {0} outside [0, 1]")]
    InvalidAlpha(f64),
}

/// Result type for kernel operations.
pub type CredalResult<T> = Result<T, CredalError>;
