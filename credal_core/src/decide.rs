//credal_core/decide.rs

use serde::Deserialize;
use serde::Serialize;

use crate::error::{CredalError, CredalResult};
use crate::interval::IntervalProbability;

/// How a single assignment is reduced to a decision.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum DecisionRule {
    /// Largest lower bound (pessimistic).
    Maximin,
    /// Largest upper bound (optimistic).
    Maximax,
    /// Largest `alpha * upper + (1 - alpha) * lower`.
    Hurwicz { alpha: f64 },
    /// Every outcome not dominated under interval dominance.
    Maximality,
}

impl Default for DecisionRule {
    fn default() -> Self {
        DecisionRule::Hurwicz { alpha: 0.5 }
    }
}

/// Point or set-valued decision over the frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Single(usize),
    /// Membership vector over outcomes.
    Set(Vec<bool>),
}

impl Decision {
    pub fn contains(&self, outcome: usize) -> bool {
        match self {
            Decision::Single(i) => *i == outcome,
            Decision::Set(members) => members.get(outcome).copied().unwrap_or(false),
        }
    }

    /// Number of outcomes retained.
    pub fn cardinality(&self) -> usize {
        match self {
            Decision::Single(_) => 1,
            Decision::Set(members) => members.iter().filter(|&&m| m).count(),
        }
    }
}

/// Index of the largest value; the first one wins ties.
fn first_argmax(values: impl Iterator<Item = f64>) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (i, v) in values.enumerate() {
        if v > best_value {
            best = i;
            best_value = v;
        }
    }
    best
}

impl IntervalProbability {
    pub fn maximin_decision(&mut self) -> CredalResult<usize> {
        self.ensure_reachable()?;
        Ok(first_argmax(self.lower().iter().copied()))
    }

    pub fn maximax_decision(&mut self) -> CredalResult<usize> {
        self.ensure_reachable()?;
        Ok(first_argmax(self.upper().iter().copied()))
    }

    /// `alpha = 1` is maximax, `alpha = 0` is maximin.
    pub fn hurwicz_decision(&mut self, alpha: f64) -> CredalResult<usize> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(CredalError::InvalidAlpha(alpha));
        }
        self.ensure_reachable()?;
        let scores = self
            .upper()
            .iter()
            .zip(self.lower())
            .map(|(u, l)| alpha * u + (1.0 - alpha) * l);
        Ok(first_argmax(scores))
    }

    /// Outcomes left after removing every `j` for which some still-eligible
    /// `i` has `lower[i] > upper[j]`.
    ///
    /// Never empty: the outcome with the largest lower bound cannot be
    /// dominated.
    pub fn maximal_decision_set(&mut self) -> CredalResult<Vec<bool>> {
        self.ensure_reachable()?;
        let (upper, lower) = (self.upper(), self.lower());
        let n = self.frame_size();

        let mut eligible = vec![true; n];
        for j in 0..n {
            for i in 0..n {
                if i != j && eligible[i] && lower[i] > upper[j] {
                    eligible[j] = false;
                    break;
                }
            }
        }
        Ok(eligible)
    }

    pub fn decide(&mut self, rule: DecisionRule) -> CredalResult<Decision> {
        match rule {
            DecisionRule::Maximin => self.maximin_decision().map(Decision::Single),
            DecisionRule::Maximax => self.maximax_decision().map(Decision::Single),
            DecisionRule::Hurwicz { alpha } => self.hurwicz_decision(alpha).map(Decision::Single),
            DecisionRule::Maximality => self.maximal_decision_set().map(Decision::Set),
        }
    }
}
