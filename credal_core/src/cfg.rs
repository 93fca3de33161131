use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::decide::DecisionRule;

/// Fusion strategy applied to a collection of assignments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CombinationMethod {
    Conjunction,
    Disjunction,
    /// Conjunction inside each coherent group, disjunction across groups.
    #[default]
    #[serde(rename = "almost-mcs")]
    AlmostMaximalCoherent,
    /// Conjunction of the coherent group with the most sources.
    #[serde(rename = "most-mcs")]
    MostPopulatedCoherent,
}

impl CombinationMethod {
    pub fn name(&self) -> &'static str {
        match self {
            CombinationMethod::Conjunction => "conjunction",
            CombinationMethod::Disjunction => "disjunction",
            CombinationMethod::AlmostMaximalCoherent => "almost-mcs",
            CombinationMethod::MostPopulatedCoherent => "most-mcs",
        }
    }
}

impl fmt::Display for CombinationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown combination method name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown combination method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for CombinationMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conjunction" => Ok(CombinationMethod::Conjunction),
            "disjunction" => Ok(CombinationMethod::Disjunction),
            "almost-mcs" => Ok(CombinationMethod::AlmostMaximalCoherent),
            "most-mcs" => Ok(CombinationMethod::MostPopulatedCoherent),
            other => Err(UnknownMethod(other.to_string())),
        }
    }
}

/// What to do when a coherent group turns out incompatible at conjunction time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncompatiblePolicy {
    /// Discount the group's members by the smallest shared factor that
    /// restores compatibility, then conjunct.
    #[default]
    Discount,
    /// Return `CredalError::IncompatibleSet`.
    Fail,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionCfg {
    pub method: CombinationMethod,
    pub incompatible: IncompatiblePolicy,
    /// Rule used for the point decision on the fused assignment.
    pub point_rule: DecisionRule,
}

impl Default for FusionCfg {
    fn default() -> Self {
        Self {
            method: CombinationMethod::AlmostMaximalCoherent,
            incompatible: IncompatiblePolicy::Discount,
            point_rule: DecisionRule::Hurwicz { alpha: 0.5 },
        }
    }
}
