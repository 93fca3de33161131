//! credal_core
//!
//! Interval-valued probability assignments over a finite frame: validity
//! checks, tightening, natural-extension queries, decision rules, and
//! fusion of several assignments (one per classifier of an ensemble).
//!
//! Non-goals:
//! - no IO
//! - no async
//! - no concurrency

pub mod error;
pub mod interval;
pub mod mcs;
pub mod set;

pub mod cfg;
pub mod decide;

pub use error::{CredalError, CredalResult};
pub use interval::{IntervalProbability, TOLERANCE};
pub use mcs::{is_coherent, max_coherent_subsets, Interval};
pub use set::IntervalProbabilitySet;

pub use cfg::{CombinationMethod, FusionCfg, IncompatiblePolicy, UnknownMethod};
pub use decide::{Decision, DecisionRule};
