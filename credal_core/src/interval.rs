use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CredalError, CredalResult};

/// Absolute slack used by the reachability test.
///
/// Tightened bounds are reachable in exact arithmetic; this absorbs the
/// rounding left over by the running sums.
pub const TOLERANCE: f64 = 1e-9;

/// Lower/upper probability bounds over a frame of `n` outcomes.
///
/// Validated once at construction: equal non-zero lengths, finite values,
/// `upper[i] >= lower[i]`. The only in-place mutation is [`tighten`].
///
/// [`tighten`]: IntervalProbability::tighten
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds")]
pub struct IntervalProbability {
    upper: Vec<f64>,
    lower: Vec<f64>,
}

#[derive(Deserialize)]
struct RawBounds {
    upper: Vec<f64>,
    lower: Vec<f64>,
}

impl TryFrom<RawBounds> for IntervalProbability {
    type Error = CredalError;

    fn try_from(raw: RawBounds) -> CredalResult<Self> {
        Self::new(raw.upper, raw.lower)
    }
}

impl IntervalProbability {
    pub fn new(upper: Vec<f64>, lower: Vec<f64>) -> CredalResult<Self> {
        if upper.len() != lower.len() {
            return Err(CredalError::Shape {
                expected: upper.len(),
                actual: lower.len(),
            });
        }
        // A frame needs at least one outcome.
        if upper.is_empty() {
            return Err(CredalError::Shape { expected: 1, actual: 0 });
        }
        for (index, (&u, &l)) in upper.iter().zip(lower.iter()).enumerate() {
            if !u.is_finite() || !l.is_finite() {
                return Err(CredalError::NonFinite { index });
            }
            if u < l {
                return Err(CredalError::Order { index, upper: u, lower: l });
            }
        }
        Ok(Self { upper, lower })
    }

    /// Same as [`IntervalProbability::new`], also checking the declared frame size.
    pub fn with_frame(frame_size: usize, upper: Vec<f64>, lower: Vec<f64>) -> CredalResult<Self> {
        for len in [upper.len(), lower.len()] {
            if len != frame_size {
                return Err(CredalError::Shape { expected: frame_size, actual: len });
            }
        }
        Self::new(upper, lower)
    }

    /// Bounds built by arithmetic that already preserves `upper >= lower`.
    pub(crate) fn from_parts(upper: Vec<f64>, lower: Vec<f64>) -> Self {
        debug_assert_eq!(upper.len(), lower.len());
        debug_assert!(upper.iter().zip(&lower).all(|(u, l)| u >= l));
        Self { upper, lower }
    }

    #[inline]
    pub fn frame_size(&self) -> usize {
        self.upper.len()
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// `(lower, upper)` for one outcome.
    pub fn bounds(&self, outcome: usize) -> Option<(f64, f64)> {
        Some((*self.lower.get(outcome)?, *self.upper.get(outcome)?))
    }

    fn sum_lower(&self) -> f64 {
        self.lower.iter().sum()
    }

    fn sum_upper(&self) -> f64 {
        self.upper.iter().sum()
    }

    /// The credal set is non-empty: `sum(lower) <= 1 <= sum(upper)`.
    pub fn is_proper(&self) -> bool {
        self.sum_lower() <= 1.0 && self.sum_upper() >= 1.0
    }

    /// Every bound is attained by some distribution of the credal set.
    ///
    /// Exact comparison; bounds computed by `tighten` may miss it by a
    /// rounding error, see [`Self::is_reachable_within`].
    pub fn is_reachable(&self) -> bool {
        self.is_reachable_within(0.0)
    }

    /// `is_reachable` with an absolute slack on both reachability inequalities.
    pub fn is_reachable_within(&self, tolerance: f64) -> bool {
        let sum_l = self.sum_lower();
        let sum_u = self.sum_upper();
        self.upper.iter().zip(&self.lower).all(|(&u, &l)| {
            u + (sum_l - l) <= 1.0 + tolerance && l + (sum_u - u) >= 1.0 - tolerance
        })
    }

    /// Shrink the bounds to the tightest ones implied by the probability axioms.
    ///
    /// Every outcome is updated from the original bounds; the new vectors
    /// replace the old ones only once all of them are computed. No-op on
    /// bounds that are reachable within `TOLERANCE`, so a second call never
    /// moves them.
    pub fn tighten(&mut self) -> CredalResult<()> {
        let sum_l = self.sum_lower();
        let sum_u = self.sum_upper();
        if !(sum_l <= 1.0 && sum_u >= 1.0) {
            return Err(CredalError::EmptySet { sum_lower: sum_l, sum_upper: sum_u });
        }
        if self.is_reachable_within(TOLERANCE) {
            return Ok(());
        }

        let (upper, lower) = tightest_bounds(&self.upper, &self.lower);
        self.upper = upper;
        self.lower = lower;
        Ok(())
    }

    pub(crate) fn ensure_reachable(&mut self) -> CredalResult<()> {
        if self.is_reachable_within(TOLERANCE) {
            Ok(())
        } else {
            self.tighten()
        }
    }

    fn check_event(&self, event: &[bool]) -> CredalResult<()> {
        if event.len() != self.frame_size() {
            return Err(CredalError::Shape {
                expected: self.frame_size(),
                actual: event.len(),
            });
        }
        Ok(())
    }

    /// Natural-extension lower probability of `event`.
    ///
    /// Tightens the bounds in place first when they are not reachable.
    pub fn lower_probability(&mut self, event: &[bool]) -> CredalResult<f64> {
        self.check_event(event)?;
        self.ensure_reachable()?;

        let mut inside = 0.0;
        let mut outside = 0.0;
        for (i, &selected) in event.iter().enumerate() {
            if selected {
                inside += self.lower[i];
            } else {
                outside += self.upper[i];
            }
        }
        Ok(inside.max(1.0 - outside))
    }

    /// Natural-extension upper probability of `event`.
    ///
    /// Tightens the bounds in place first when they are not reachable.
    pub fn upper_probability(&mut self, event: &[bool]) -> CredalResult<f64> {
        self.check_event(event)?;
        self.ensure_reachable()?;

        let mut inside = 0.0;
        let mut outside = 0.0;
        for (i, &selected) in event.iter().enumerate() {
            if selected {
                inside += self.upper[i];
            } else {
                outside += self.lower[i];
            }
        }
        Ok(inside.min(1.0 - outside))
    }

    /// Move every bound toward the vacuous `[0, 1]` interval:
    /// `lower' = (1 - eps) * lower`, `upper' = (1 - eps) * upper + eps`.
    ///
    /// `epsilon` is clamped into `[0, 1]`.
    pub fn discounted(&self, epsilon: f64) -> IntervalProbability {
        let eps = if epsilon.is_nan() { 0.0 } else { epsilon.clamp(0.0, 1.0) };
        let keep = 1.0 - eps;
        let upper = self.upper.iter().map(|u| keep * u + eps).collect();
        let lower = self.lower.iter().map(|l| keep * l).collect();
        Self::from_parts(upper, lower)
    }

    /// Two-row text rendering of the bounds.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

/// Per-outcome tightening of `(upper, lower)`: for each `i`,
/// `lower[i] = max(lower[i], 1 - sum(upper[j != i]))` and
/// `upper[i] = min(upper[i], 1 - sum(lower[j != i]))`, all read from the
/// input slices.
pub(crate) fn tightest_bounds(upper: &[f64], lower: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let sum_l: f64 = lower.iter().sum();
    let sum_u: f64 = upper.iter().sum();
    upper
        .iter()
        .zip(lower)
        .map(|(&u, &l)| {
            let lo = l.max(1.0 - (sum_u - u)).min(u);
            // rounding may cross the two by an ulp
            let up = u.min(1.0 - (sum_l - l)).max(lo);
            (up, lo)
        })
        .unzip()
}

impl fmt::Display for IntervalProbability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:13}", "")?;
        for i in 0..self.frame_size() {
            write!(f, " {:>5}", format!("y{i}"))?;
        }
        writeln!(f)?;
        writeln!(f, "{:11} {}", "", "-".repeat(2 + 6 * self.frame_size()))?;
        write!(f, "upper bound |")?;
        for u in &self.upper {
            write!(f, " {u:.3}")?;
        }
        writeln!(f)?;
        write!(f, "lower bound |")?;
        for l in &self.lower {
            write!(f, " {l:.3}")?;
        }
        Ok(())
    }
}
