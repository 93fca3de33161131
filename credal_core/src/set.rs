//! Collections of interval assignments over one frame and their fusion.
//!
//! A set borrows its members; every fusion returns a freshly built
//! `IntervalProbability` and leaves the inputs untouched.

use tracing::{debug, warn};

use crate::cfg::{CombinationMethod, IncompatiblePolicy};
use crate::error::{CredalError, CredalResult};
use crate::interval::{tightest_bounds, IntervalProbability, TOLERANCE};
use crate::mcs::{max_coherent_subsets, Interval};

#[derive(Clone, Debug)]
pub struct IntervalProbabilitySet<'a> {
    members: Vec<&'a IntervalProbability>,
    frame_size: usize,
}

impl<'a> IntervalProbabilitySet<'a> {
    /// Fails on an empty collection or on members with different frame sizes.
    pub fn new(members: Vec<&'a IntervalProbability>) -> CredalResult<Self> {
        let frame_size = members
            .first()
            .ok_or(CredalError::EmptyCollection)?
            .frame_size();
        for member in &members {
            if member.frame_size() != frame_size {
                return Err(CredalError::Shape {
                    expected: frame_size,
                    actual: member.frame_size(),
                });
            }
        }
        Ok(Self { members, frame_size })
    }

    pub fn from_slice(members: &'a [IntervalProbability]) -> CredalResult<Self> {
        Self::new(members.iter().collect())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// False for every set built by `new`, `from_slice` or `subset`.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn members(&self) -> &[&'a IntervalProbability] {
        &self.members
    }

    /// Sub-collection over the given member indices, in the given order.
    pub fn subset(&self, indices: &[usize]) -> CredalResult<IntervalProbabilitySet<'a>> {
        if indices.is_empty() {
            return Err(CredalError::EmptyCollection);
        }
        let members = indices
            .iter()
            .map(|&index| {
                self.members.get(index).copied().ok_or(CredalError::MemberIndex {
                    index,
                    members: self.members.len(),
                })
            })
            .collect::<CredalResult<Vec<_>>>()?;
        Ok(IntervalProbabilitySet {
            members,
            frame_size: self.frame_size,
        })
    }

    /// Pointwise `(max over members of lower, min over members of upper)`.
    fn envelope(&self) -> (Vec<f64>, Vec<f64>) {
        let mut max_lower = vec![f64::NEG_INFINITY; self.frame_size];
        let mut min_upper = vec![f64::INFINITY; self.frame_size];
        for member in &self.members {
            for i in 0..self.frame_size {
                max_lower[i] = max_lower[i].max(member.lower()[i]);
                min_upper[i] = min_upper[i].min(member.upper()[i]);
            }
        }
        (max_lower, min_upper)
    }

    /// The intersection of all members' credal sets is non-empty.
    pub fn is_compatible(&self) -> bool {
        let (max_lower, min_upper) = self.envelope();
        let sum_l: f64 = max_lower.iter().sum();
        let sum_u: f64 = min_upper.iter().sum();
        sum_l <= 1.0
            && sum_u >= 1.0
            && max_lower.iter().zip(&min_upper).all(|(l, u)| l <= u)
    }

    /// Tightest bounds consistent with every member at once.
    ///
    /// The result is not guaranteed to be reachable.
    pub fn conjunction(&self) -> CredalResult<IntervalProbability> {
        if !self.is_compatible() {
            return Err(CredalError::IncompatibleSet);
        }
        let (max_lower, min_upper) = self.envelope();
        let (upper, lower) = tightest_bounds(&min_upper, &max_lower);
        Ok(IntervalProbability::from_parts(upper, lower))
    }

    /// Envelope of all members: pointwise min of lowers, max of uppers.
    pub fn disjunction(&self) -> IntervalProbability {
        let mut lower = vec![f64::INFINITY; self.frame_size];
        let mut upper = vec![f64::NEG_INFINITY; self.frame_size];
        for member in &self.members {
            for i in 0..self.frame_size {
                lower[i] = lower[i].min(member.lower()[i]);
                upper[i] = upper[i].max(member.upper()[i]);
            }
        }
        IntervalProbability::from_parts(upper, lower)
    }

    /// Members discounted by a shared `epsilon`, see [`IntervalProbability::discounted`].
    pub fn discounted(&self, epsilon: f64) -> Vec<IntervalProbability> {
        self.members.iter().map(|m| m.discounted(epsilon)).collect()
    }

    /// Smallest shared discount in `[0, 1]` after which the collection is
    /// compatible. Zero for a compatible collection.
    pub fn compatibility_discount(&self) -> f64 {
        let (max_lower, min_upper) = self.envelope();
        let sum_l: f64 = max_lower.iter().sum();
        let sum_u: f64 = min_upper.iter().sum();
        let n = self.frame_size as f64;

        let mut epsilon: f64 = 0.0;
        if sum_l > 1.0 {
            epsilon = epsilon.max(1.0 - 1.0 / sum_l);
        }
        if sum_u < 1.0 {
            // n - sum_u > 0 because sum_u < 1 <= n
            epsilon = epsilon.max((1.0 - sum_u) / (n - sum_u));
        }
        for (l, u) in max_lower.iter().zip(&min_upper) {
            let crossing = l - u;
            if crossing > 0.0 {
                epsilon = epsilon.max(crossing / (1.0 + crossing));
            }
        }
        epsilon.min(1.0)
    }

    fn conjunction_with(&self, policy: IncompatiblePolicy) -> CredalResult<IntervalProbability> {
        match (self.conjunction(), policy) {
            (Err(CredalError::IncompatibleSet), IncompatiblePolicy::Discount) => {
                let epsilon = (self.compatibility_discount() + TOLERANCE).min(1.0);
                warn!(
                    members = self.len(),
                    epsilon,
                    "incompatible group, discounting before conjunction"
                );
                let discounted = self.discounted(epsilon);
                let recovered = IntervalProbabilitySet::from_slice(&discounted)?.conjunction();
                match recovered {
                    // Fully discounted members are vacuous and always compatible.
                    Err(CredalError::IncompatibleSet) => {
                        IntervalProbabilitySet::from_slice(&self.discounted(1.0))?.conjunction()
                    }
                    other => other,
                }
            }
            (result, _) => result,
        }
    }

    /// Partition refinement of the member indices into groups that are
    /// coherent on every outcome.
    ///
    /// Starting from all members as one group, each outcome either keeps a
    /// group (its intervals pairwise overlap there) or splits it into that
    /// outcome's maximal coherent subsets. Identical groups are kept once.
    pub fn coherent_groups(&self) -> Vec<Vec<usize>> {
        let mut groups: Vec<Vec<usize>> = vec![(0..self.len()).collect()];

        for outcome in 0..self.frame_size {
            let mut refined: Vec<Vec<usize>> = Vec::with_capacity(groups.len());
            for group in groups {
                let intervals: Vec<Interval> = group
                    .iter()
                    .map(|&k| {
                        let m = self.members[k];
                        Interval::new(m.lower()[outcome], m.upper()[outcome])
                    })
                    .collect();

                let subsets = max_coherent_subsets(&intervals);
                if subsets.len() <= 1 {
                    push_unique(&mut refined, group);
                } else {
                    for subset in subsets {
                        // group is ascending, so the remapped subset stays ascending
                        push_unique(&mut refined, subset.iter().map(|&idx| group[idx]).collect());
                    }
                }
            }
            groups = refined;
        }

        debug!(sources = self.len(), groups = groups.len(), "coherent groups found");
        groups
    }

    /// Conjunction inside every coherent group, then disjunction of the results.
    pub fn almost_maximal_coherent_combination(
        &self,
        policy: IncompatiblePolicy,
    ) -> CredalResult<IntervalProbability> {
        let fused = self
            .coherent_groups()
            .iter()
            .map(|g| self.subset(g)?.conjunction_with(policy))
            .collect::<CredalResult<Vec<_>>>()?;
        Ok(IntervalProbabilitySet::from_slice(&fused)?.disjunction())
    }

    /// Conjunction of the coherent group with the most members; the first
    /// such group wins ties.
    pub fn most_populated_coherent_conjunction(
        &self,
        policy: IncompatiblePolicy,
    ) -> CredalResult<IntervalProbability> {
        let groups = self.coherent_groups();
        let mut best: Option<&Vec<usize>> = None;
        for group in &groups {
            if best.map_or(true, |b| group.len() > b.len()) {
                best = Some(group);
            }
        }
        let best = best.ok_or(CredalError::EmptyCollection)?;
        debug!(size = best.len(), "most populated coherent group");
        self.subset(best)?.conjunction_with(policy)
    }

    pub fn run_combination(
        &self,
        method: CombinationMethod,
        policy: IncompatiblePolicy,
    ) -> CredalResult<IntervalProbability> {
        match method {
            CombinationMethod::Conjunction => self.conjunction_with(policy),
            CombinationMethod::Disjunction => Ok(self.disjunction()),
            CombinationMethod::AlmostMaximalCoherent => {
                self.almost_maximal_coherent_combination(policy)
            }
            CombinationMethod::MostPopulatedCoherent => {
                self.most_populated_coherent_conjunction(policy)
            }
        }
    }
}

fn push_unique(groups: &mut Vec<Vec<usize>>, group: Vec<usize>) {
    if !groups.contains(&group) {
        groups.push(group);
    }
}
