//! Boundary adapter: convert per-classifier class counts into `IntervalProbability`.
//!
//! Scope:
//! - No IO
//! - No training or inference; counts come from the caller's ensemble
//! - One fixed smoothing rule, provided by `SmoothedCountBuilder`
//!
//! Products with a different conversion implement `IntervalBuilder` themselves.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use credal_core::IntervalProbability;

use crate::error::{EnsembleError, EnsembleResult};

/// Smoothing constant used when none is configured.
pub const DEFAULT_SMOOTHING: f64 = 4.0;

/// Class counts reported by one classifier (tree, leaf, ...) for one sample.
#[derive(Clone, Debug)]
pub struct VoteEvent<'a> {
    /// The sample being classified.
    pub sample_id: Cow<'a, str>,
    /// Which ensemble member produced the counts.
    pub source_id: Cow<'a, str>,
    /// Non-negative (possibly weighted) frequency per class.
    pub counts: Vec<f64>,
}

impl<'a> VoteEvent<'a> {
    pub fn new(
        sample_id: impl Into<Cow<'a, str>>,
        source_id: impl Into<Cow<'a, str>>,
        counts: Vec<f64>,
    ) -> Self {
        Self {
            sample_id: sample_id.into(),
            source_id: source_id.into(),
            counts,
        }
    }
}

/// Trait: map the class counts of one classifier to interval bounds.
pub trait IntervalBuilder {
    fn build(&self, counts: &[f64]) -> EnsembleResult<IntervalProbability>;
}

/// `lower[i] = c[i] / (sum(c) + s)`, `upper[i] = (c[i] + s) / (sum(c) + s)`.
///
/// Always yields proper bounds: lower masses sum to at most one and upper
/// masses to at least one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SmoothedCountBuilder {
    pub smoothing: f64,
}

impl Default for SmoothedCountBuilder {
    fn default() -> Self {
        Self {
            smoothing: DEFAULT_SMOOTHING,
        }
    }
}

impl SmoothedCountBuilder {
    pub fn new(smoothing: f64) -> EnsembleResult<Self> {
        check_smoothing(smoothing)?;
        Ok(Self { smoothing })
    }
}

fn check_smoothing(s: f64) -> EnsembleResult<()> {
    if s.is_finite() && s > 0.0 {
        Ok(())
    } else {
        Err(EnsembleError::InvalidSmoothing(s))
    }
}

impl IntervalBuilder for SmoothedCountBuilder {
    fn build(&self, counts: &[f64]) -> EnsembleResult<IntervalProbability> {
        check_smoothing(self.smoothing)?;
        for (class, &value) in counts.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(EnsembleError::InvalidCount { class, value });
            }
        }

        let s = self.smoothing;
        let divide = counts.iter().sum::<f64>() + s;
        let lower = counts.iter().map(|c| c / divide).collect();
        let upper = counts.iter().map(|c| (c + s) / divide).collect();
        Ok(IntervalProbability::new(upper, lower)?)
    }
}

/// Helper: build one assignment per classifier, failing on the first bad one.
pub fn build_interval_batch<B: IntervalBuilder>(
    builder: &B,
    counts: &[Vec<f64>],
) -> EnsembleResult<Vec<IntervalProbability>> {
    counts.iter().map(|c| builder.build(c)).collect()
}
