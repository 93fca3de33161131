//! credal_ensemble
//!
//! Outside-world facing layer for `credal_core`.
//!
//! Responsibilities:
//! - convert per-classifier class counts into interval assignments
//! - group votes by sample and fuse them with the configured strategy
//! - derive point and set-valued decisions, and keep accuracy tallies
//!
//! Non-goals:
//! - no IO
//! - no async
//! - no training or inference (the ensemble lives with the caller)

pub mod adapter;
pub mod error;
pub mod fuser;
pub mod score;

pub use adapter::{
    IntervalBuilder,
    SmoothedCountBuilder,
    VoteEvent,
    build_interval_batch,
    DEFAULT_SMOOTHING,
};

pub use error::{EnsembleError, EnsembleResult};

pub use fuser::{
    EnsembleFuser,
    FusedOutcome,
    SampleOutcome,
};

pub use score::Scoreboard;
