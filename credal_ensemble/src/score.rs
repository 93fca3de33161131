use serde::{Deserialize, Serialize};

use crate::error::{EnsembleError, EnsembleResult};
use crate::fuser::FusedOutcome;

/// Running accuracy figures over fused samples.
///
/// Pure data; callers decide whether and where to keep it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    /// Samples compared against ground truth.
    pub scored: u64,
    /// Samples whose fusion failed.
    pub skipped: u64,
    /// Point decision equal to the truth.
    pub point_hits: u64,
    /// Truth inside the maximal decision set.
    pub set_hits: u64,
    /// Sum of `1 / |set|` over set hits.
    pub discounted_hits: f64,
}

impl Scoreboard {
    pub fn record(&mut self, outcome: &FusedOutcome, truth: usize) -> EnsembleResult<()> {
        if truth >= outcome.maximal.len() {
            return Err(EnsembleError::TruthOutOfRange {
                truth,
                frame_size: outcome.maximal.len(),
            });
        }

        self.scored += 1;
        if outcome.point == truth {
            self.point_hits += 1;
        }
        if outcome.maximal[truth] {
            let size = outcome.maximal.iter().filter(|&&m| m).count();
            self.set_hits += 1;
            self.discounted_hits += 1.0 / size as f64;
        }
        Ok(())
    }

    /// Record a fusion result; failures count as skipped.
    pub fn record_result(
        &mut self,
        result: &EnsembleResult<FusedOutcome>,
        truth: usize,
    ) -> EnsembleResult<()> {
        match result {
            Ok(outcome) => self.record(outcome, truth),
            Err(_) => {
                self.skipped += 1;
                Ok(())
            }
        }
    }

    fn ratio(&self, hits: f64) -> f64 {
        if self.scored == 0 {
            0.0
        } else {
            hits / self.scored as f64
        }
    }

    pub fn accuracy(&self) -> f64 {
        self.ratio(self.point_hits as f64)
    }

    pub fn set_accuracy(&self) -> f64 {
        self.ratio(self.set_hits as f64)
    }

    pub fn discounted_accuracy(&self) -> f64 {
        self.ratio(self.discounted_hits)
    }
}
