use super::mean;
use super::median;
use std::collections::BTreeMap;

/// Why an incorrectly resolved toponym was incorrect.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Reason {
    NoCandidates,
    NoCorrectCandidates,
    MultipleCorrectCandidates,
    OneCorrectMissingLinkInfo,
    OneCorrectCandidate,
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCandidates => write!(f, "incorrect, with no candidates"),
            Self::NoCorrectCandidates => {
                write!(f, "incorrect, with candidates but no correct candidates")
            }
            Self::MultipleCorrectCandidates => {
                write!(f, "incorrect, with multiple correct candidates")
            }
            Self::OneCorrectMissingLinkInfo => {
                write!(f, "incorrect, with one correct candidate, but link info missing")
            }
            Self::OneCorrectCandidate => write!(f, "incorrect, with one correct candidate"),
        }
    }
}

fn fraction(label: &str, amount: usize, total: usize) {
    if amount > total {
        log::warn!("fractional quantity {} greater than total {}", amount, total);
    }
    match total {
        0 => log::info!("{} = {}/{} = indeterminate percent", label, amount, total),
        _ => log::info!(
            "{} = {}/{} = {:5.2}%",
            label,
            amount,
            total,
            100. * amount as f64 / total as f64
        ),
    }
}

/// Base result accumulator: instance totals, a table of incorrect
/// reasons, and free-form counters for anything else worth reporting.
#[derive(Debug, Default, Clone)]
pub struct Accum {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    reasons: BTreeMap<Reason, usize>,
    other: BTreeMap<String, usize>,
}

impl Accum {
    pub fn record(&mut self, correct: bool, reason: Option<Reason>) {
        self.total += 1;
        if correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
            if let Some(reason) = reason {
                *self.reasons.entry(reason).or_insert(0) += 1;
            }
        }
    }

    pub fn record_other(&mut self, label: &str) {
        *self.other.entry(label.to_owned()).or_insert(0) += 1;
    }

    pub fn output(&self) {
        if self.total == 0 {
            log::warn!("no instances found at all; is the eval format correct?");
            return;
        }
        log::info!("number of instances = {}", self.total);
        fraction("percent correct", self.correct, self.total);
        fraction("percent incorrect", self.incorrect, self.total);
        for (reason, count) in self.reasons.iter() {
            fraction(&format!("  {}", reason), *count, self.total);
        }
        for (label, count) in self.other.iter() {
            log::info!("{} = {}", label, count);
        }
    }
}

/// Rank-stratified accumulator: a result is correct when the true
/// answer ranks first, with partial credit down to a maximum rank, and
/// the distances from the predicted center kept for mean and median
/// reporting.
#[derive(Debug, Clone)]
pub struct RankAccum {
    pub accum: Accum,
    max_rank_for_credit: usize,
    incorrect_by_exact_rank: BTreeMap<usize, usize>,
    correct_by_up_to_rank: BTreeMap<usize, usize>,
    incorrect_past_max_rank: usize,
    credit: usize,
    true_dists: Vec<f64>,
    degree_dists: Vec<f64>,
}

impl Default for RankAccum {
    fn default() -> Self {
        Self {
            accum: Accum::default(),
            max_rank_for_credit: 10,
            incorrect_by_exact_rank: BTreeMap::default(),
            correct_by_up_to_rank: BTreeMap::default(),
            incorrect_past_max_rank: 0,
            credit: 0,
            true_dists: Vec::new(),
            degree_dists: Vec::new(),
        }
    }
}

impl RankAccum {
    pub fn record(&mut self, rank: usize, true_dist: f64, degree_dist: f64) {
        assert!(rank >= 1);
        self.accum.record(rank == 1, None);
        if rank <= self.max_rank_for_credit {
            self.credit += self.max_rank_for_credit + 1 - rank;
            *self.incorrect_by_exact_rank.entry(rank).or_insert(0) += 1;
            for upto in rank..=self.max_rank_for_credit {
                *self.correct_by_up_to_rank.entry(upto).or_insert(0) += 1;
            }
        } else {
            self.incorrect_past_max_rank += 1;
        }
        self.true_dists.push(true_dist);
        self.degree_dists.push(degree_dist);
    }

    pub fn output(&self) {
        self.accum.output();
        if self.accum.total == 0 {
            return;
        }
        fraction(
            "percent correct with partial credit",
            self.credit,
            self.max_rank_for_credit * self.accum.total,
        );
        for upto in 2..=self.max_rank_for_credit {
            fraction(
                &format!("  correct is at or above rank {}", upto),
                self.correct_by_up_to_rank.get(&upto).copied().unwrap_or(0),
                self.accum.total,
            );
        }
        for rank in 2..=self.max_rank_for_credit {
            fraction(
                &format!("  incorrect, with correct at rank {}", rank),
                self.incorrect_by_exact_rank.get(&rank).copied().unwrap_or(0),
                self.accum.total,
            );
        }
        fraction(
            &format!("  incorrect, with correct not in top {}", self.max_rank_for_credit),
            self.incorrect_past_max_rank,
            self.accum.total,
        );
        let mut true_dists = self.true_dists.clone();
        let mut degree_dists = self.degree_dists.clone();
        true_dists.sort_by(f64::total_cmp);
        degree_dists.sort_by(f64::total_cmp);
        log::info!("  mean true distance to center = {:.2}", mean(&true_dists));
        log::info!("  median true distance to center = {:.2}", median(&true_dists));
        log::info!("  mean degree distance to center = {:.2}", mean(&degree_dists));
        log::info!("  median degree distance to center = {:.2}", median(&degree_dists));
    }
}

/// Candidate-count-stratified accumulator for toponym results:
/// everything the base accumulator records, broken down by how many
/// candidate articles the toponym had.
#[derive(Debug, Clone)]
pub struct CandidateAccum {
    pub accum: Accum,
    max_individual: usize,
    total_by_count: BTreeMap<usize, usize>,
    correct_by_count: BTreeMap<usize, usize>,
    incorrect_by_count: BTreeMap<usize, usize>,
}

impl Default for CandidateAccum {
    fn default() -> Self {
        Self {
            accum: Accum::default(),
            max_individual: 5,
            total_by_count: BTreeMap::default(),
            correct_by_count: BTreeMap::default(),
            incorrect_by_count: BTreeMap::default(),
        }
    }
}

impl CandidateAccum {
    pub fn record(&mut self, correct: bool, reason: Option<Reason>, candidates: usize) {
        self.accum.record(correct, reason);
        *self.total_by_count.entry(candidates).or_insert(0) += 1;
        let table = if correct {
            &mut self.correct_by_count
        } else {
            &mut self.incorrect_by_count
        };
        *table.entry(candidates).or_insert(0) += 1;
    }

    fn output_by_count(&self, table: &BTreeMap<usize, usize>, total: usize) {
        for n in 0..=self.max_individual {
            fraction(
                &format!("  with {} candidates", n),
                table.get(&n).copied().unwrap_or(0),
                total,
            );
        }
        let above = table
            .iter()
            .filter(|(n, _)| **n > self.max_individual)
            .map(|(_, c)| c)
            .sum::<usize>();
        fraction(
            &format!("  with {}+ candidates", self.max_individual + 1),
            above,
            total,
        );
    }

    pub fn output(&self) {
        self.accum.output();
        if self.accum.total == 0 {
            return;
        }
        self.output_by_count(&self.correct_by_count, self.accum.correct);
        self.output_by_count(&self.incorrect_by_count, self.accum.incorrect);
    }
}

/// Accumulators bucketed by a numeric key: bounds b0 < b1 < ... < bn
/// give buckets (-inf, b0), [b0, b1), ..., [bn, inf).
#[derive(Debug, Clone)]
pub struct RangeTable<A> {
    bounds: Vec<f64>,
    collectors: Vec<A>,
}

impl<A: Default> RangeTable<A> {
    pub fn new(bounds: &[f64]) -> Self {
        let collectors = (0..=bounds.len()).map(|_| A::default()).collect();
        Self {
            bounds: bounds.to_vec(),
            collectors,
        }
    }

    pub fn collector_mut(&mut self, key: f64) -> &mut A {
        let at = self.bounds.iter().take_while(|b| key >= **b).count();
        &mut self.collectors[at]
    }

    /// Buckets with their (lower, upper) bounds; None marks an open
    /// end.
    pub fn ranges(&self) -> impl Iterator<Item = (Option<f64>, Option<f64>, &A)> {
        self.collectors.iter().enumerate().map(|(at, collector)| {
            let lower = at.checked_sub(1).map(|i| self.bounds[i]);
            let upper = self.bounds.get(at).copied();
            (lower, upper, collector)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_one_is_correct() {
        let mut accum = RankAccum::default();
        accum.record(1, 0.1, 0.1);
        accum.record(3, 2.0, 1.5);
        accum.record(40, 9.0, 7.5);
        assert_eq!(accum.accum.total, 3);
        assert_eq!(accum.accum.correct, 1);
        assert_eq!(accum.incorrect_past_max_rank, 1);
        // credit: 10 for rank 1, 8 for rank 3
        assert_eq!(accum.credit, 18);
    }

    #[test]
    fn reasons_are_tabulated() {
        let mut accum = Accum::default();
        accum.record(true, None);
        accum.record(false, Some(Reason::NoCandidates));
        accum.record(false, Some(Reason::NoCandidates));
        assert_eq!(accum.total, 3);
        assert_eq!(accum.reasons[&Reason::NoCandidates], 2);
    }

    #[test]
    fn range_table_buckets() {
        let mut table = RangeTable::<Accum>::new(&[2., 10., 25., 100.]);
        table.collector_mut(1.).record(true, None);
        table.collector_mut(2.).record(true, None);
        table.collector_mut(9.).record(true, None);
        table.collector_mut(150.).record(true, None);
        let totals = table
            .ranges()
            .map(|(_, _, a)| a.total)
            .collect::<Vec<_>>();
        assert_eq!(totals, vec![1, 2, 0, 0, 1]);
    }

    #[test]
    fn candidate_counts_stratify() {
        let mut accum = CandidateAccum::default();
        accum.record(true, None, 1);
        accum.record(false, Some(Reason::NoCorrectCandidates), 7);
        assert_eq!(accum.total_by_count[&1], 1);
        assert_eq!(accum.incorrect_by_count[&7], 1);
    }
}
