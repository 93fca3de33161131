//! Per-sample ensemble fusion.
//!
//! This is the outside-world facing layer around `credal_core`:
//! - groups votes by `sample_id`
//! - converts class counts through an `IntervalBuilder`
//! - runs the configured combination and decision rules
//!
//! No IO. No async. A failing sample is reported and skipped, never retried.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use credal_core::{
    CredalError, Decision, FusionCfg, IntervalProbability, IntervalProbabilitySet,
};

use crate::adapter::{build_interval_batch, IntervalBuilder, VoteEvent};
use crate::error::EnsembleResult;

/// Fused assignment for one sample plus the decisions drawn from it.
#[derive(Clone, Debug, PartialEq)]
pub struct FusedOutcome {
    /// Combined bounds, already tightened.
    pub combined: IntervalProbability,
    /// Point decision under `FusionCfg::point_rule`.
    pub point: usize,
    /// Maximality decision set.
    pub maximal: Vec<bool>,
}

/// Output of `EnsembleFuser::ingest` for one sample.
#[derive(Clone, Debug)]
pub struct SampleOutcome {
    pub sample_id: String,
    /// `source_id` of every vote on the sample, in input order.
    pub sources: Vec<String>,
    pub result: EnsembleResult<FusedOutcome>,
}

#[derive(Clone, Debug)]
pub struct EnsembleFuser {
    cfg: FusionCfg,
    frame_size: usize,
}

impl EnsembleFuser {
    pub fn new(frame_size: usize, cfg: FusionCfg) -> Self {
        Self { cfg, frame_size }
    }

    pub fn cfg(&self) -> &FusionCfg {
        &self.cfg
    }

    pub fn set_cfg(&mut self, cfg: FusionCfg) {
        self.cfg = cfg;
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Combine one assignment per classifier and decide.
    pub fn fuse(&self, members: &[IntervalProbability]) -> EnsembleResult<FusedOutcome> {
        for member in members {
            if member.frame_size() != self.frame_size {
                return Err(CredalError::Shape {
                    expected: self.frame_size,
                    actual: member.frame_size(),
                }
                .into());
            }
        }

        let set = IntervalProbabilitySet::from_slice(members)?;
        let mut combined = set.run_combination(self.cfg.method, self.cfg.incompatible)?;

        let point = match combined.decide(self.cfg.point_rule)? {
            Decision::Single(i) => i,
            // A maximality rule as point rule picks the first retained outcome.
            Decision::Set(retained) => retained.iter().position(|&r| r).unwrap_or(0),
        };
        let maximal = combined.maximal_decision_set()?;

        debug!(
            sources = members.len(),
            method = %self.cfg.method,
            point,
            "sample fused"
        );
        Ok(FusedOutcome {
            combined,
            point,
            maximal,
        })
    }

    /// Convert raw class counts through `builder`, then `fuse`.
    pub fn fuse_counts<B: IntervalBuilder>(
        &self,
        builder: &B,
        counts: &[Vec<f64>],
    ) -> EnsembleResult<FusedOutcome> {
        let members = build_interval_batch(builder, counts)?;
        self.fuse(&members)
    }

    /// Fuse a batch of votes, one outcome per distinct `sample_id`.
    ///
    /// Deterministic: outcomes are sorted by `sample_id`, and votes keep
    /// their input order within a sample.
    pub fn ingest<B: IntervalBuilder>(
        &self,
        builder: &B,
        events: &[VoteEvent<'_>],
    ) -> Vec<SampleOutcome> {
        let mut by_sample: BTreeMap<&str, Vec<&VoteEvent<'_>>> = BTreeMap::new();
        for ev in events {
            by_sample.entry(ev.sample_id.as_ref()).or_default().push(ev);
        }

        by_sample
            .into_iter()
            .map(|(sample_id, votes)| {
                let counts: Vec<Vec<f64>> = votes.iter().map(|v| v.counts.clone()).collect();
                let sources: Vec<String> =
                    votes.iter().map(|v| v.source_id.to_string()).collect();

                let result = self.fuse_counts(builder, &counts);
                if let Err(err) = &result {
                    warn!(sample_id, ?sources, error = %err, "sample skipped");
                }
                SampleOutcome {
                    sample_id: sample_id.to_string(),
                    sources,
                    result,
                }
            })
            .collect()
    }
}
