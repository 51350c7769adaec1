use super::lexicon::WordId;
use super::MIN_WORD_PROB;
use crate::Probability;
use crate::Tokens;
use std::collections::HashMap;

/// Word counts accumulated over every article distribution in the
/// corpus. Backs the estimate p_global(w) that smoothed distributions
/// fall back on for words they have never seen.
#[derive(Debug, Default)]
pub struct GlobalDist {
    counts: HashMap<WordId, u64>,
    total: u64,
    finished: bool,
}

impl GlobalDist {
    /// Fold one article's counts into the global totals.
    pub fn note(&mut self, dist: &WordDist) {
        assert!(!self.finished);
        for (word, count) in dist.counts.iter() {
            *self.counts.entry(*word).or_insert(0) += *count as u64;
        }
        self.total += dist.total_tokens as u64;
    }

    pub fn finish(&mut self) {
        assert!(!self.finished);
        self.finished = true;
        log::info!(
            "{:<32}{:<32}",
            "global distribution",
            format!("{} types / {} tokens", self.counts.len(), self.total)
        );
    }

    /// Global probability estimate for a word; zero for words never
    /// seen anywhere in the corpus.
    pub fn probability(&self, word: WordId) -> Probability {
        debug_assert!(self.finished);
        if self.total == 0 {
            return 0.;
        }
        self.counts.get(&word).copied().unwrap_or(0) as Probability / self.total as Probability
    }

    pub fn finished(&self) -> bool {
        self.finished
    }
}

/// A multinomial distribution over words with a discounted probability
/// mass reserved for unseen words.
///
/// While open, counts accumulate through `add_word` and
/// `add_word_distribution`. `finish` freezes the counts and computes
/// the reserved mass via a simple Good-Turing proxy: the fraction of
/// tokens belonging to words seen exactly once. Lookups after that
/// point never return zero, so callers may take logs freely.
#[derive(Debug, Clone)]
pub struct WordDist {
    counts: HashMap<WordId, Tokens>,
    total_tokens: Tokens,
    unseen_mass: Probability,
    overall_unseen_mass: Probability,
    finished: bool,
}

impl Default for WordDist {
    fn default() -> Self {
        Self {
            counts: HashMap::default(),
            total_tokens: 0,
            unseen_mass: 1.0,
            overall_unseen_mass: 1.0,
            finished: false,
        }
    }
}

impl WordDist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_word(&mut self, word: WordId, count: Tokens) {
        assert!(!self.finished);
        *self.counts.entry(word).or_insert(0) += count;
        self.total_tokens += count;
    }

    /// Merge another distribution's counts into this one. The other
    /// distribution may already be finished; this one must not be.
    pub fn add_word_distribution(&mut self, other: &Self) {
        assert!(!self.finished);
        for (word, count) in other.counts.iter() {
            *self.counts.entry(*word).or_insert(0) += *count;
        }
        self.total_tokens += other.total_tokens;
    }

    /// Freeze the counts and compute the discount masses.
    ///
    /// `unseen_mass` is the token fraction of words seen exactly once,
    /// capped so seen words keep nonzero mass even when every word was
    /// a singleton. `overall_unseen_mass` is the global probability
    /// mass of words this distribution has never seen, used to spread
    /// `unseen_mass` over unseen words in proportion to p_global.
    pub fn finish(&mut self, global: &GlobalDist) {
        assert!(!self.finished);
        let once = self.counts.values().filter(|c| **c == 1).count();
        self.unseen_mass = if self.total_tokens == 0 {
            1.0
        } else {
            (once as Probability / self.total_tokens as Probability).min(0.5)
        };
        let seen_globally = self
            .counts
            .keys()
            .map(|w| global.probability(*w))
            .sum::<Probability>();
        self.overall_unseen_mass = (1.0 - seen_globally).max(1e-10);
        self.finished = true;
    }

    /// Smoothed probability of a word. Seen words get their count
    /// fraction scaled by the retained mass; unseen words get a share
    /// of the reserved mass proportional to their global probability.
    /// Never returns zero.
    pub fn lookup_word(&self, word: WordId, global: &GlobalDist) -> Probability {
        debug_assert!(self.finished);
        match self.counts.get(&word) {
            Some(count) => {
                (*count as Probability / self.total_tokens as Probability)
                    * (1.0 - self.unseen_mass)
            }
            None => (self.unseen_mass * global.probability(word) / self.overall_unseen_mass)
                .max(MIN_WORD_PROB),
        }
    }

    pub fn contains(&self, word: WordId) -> bool {
        self.counts.contains_key(&word)
    }
    pub fn counts(&self) -> &HashMap<WordId, Tokens> {
        &self.counts
    }
    pub fn total_tokens(&self) -> Tokens {
        self.total_tokens
    }
    pub fn unseen_mass(&self) -> Probability {
        self.unseen_mass
    }
    pub fn overall_unseen_mass(&self) -> Probability {
        self.overall_unseen_mass
    }
    pub fn finished(&self) -> bool {
        self.finished
    }
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worddist::Lexicon;

    fn fixture() -> (Lexicon, GlobalDist, WordDist) {
        let mut lex = Lexicon::default();
        let mut dist = WordDist::new();
        dist.add_word(lex.intern("paris"), 10);
        dist.add_word(lex.intern("wine"), 5);
        dist.add_word(lex.intern("seine"), 1);
        let mut global = GlobalDist::default();
        global.note(&dist);
        let mut other = WordDist::new();
        other.add_word(lex.intern("tokyo"), 8);
        global.note(&other);
        global.finish();
        (lex, global, dist)
    }

    #[test]
    fn mass_is_conserved() {
        let (_, global, mut dist) = fixture();
        dist.finish(&global);
        let seen = dist
            .counts()
            .keys()
            .map(|w| dist.lookup_word(*w, &global))
            .sum::<f64>();
        assert!((seen + dist.unseen_mass() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn singleton_fraction_is_the_discount() {
        let (_, global, mut dist) = fixture();
        dist.finish(&global);
        assert!((dist.unseen_mass() - 1.0 / 16.0).abs() < 1e-12);
    }

    #[test]
    fn unseen_words_never_get_zero() {
        let (mut lex, global, mut dist) = fixture();
        dist.finish(&global);
        let tokyo = lex.intern("tokyo");
        let nowhere = lex.intern("nowhere");
        assert!(dist.lookup_word(tokyo, &global) > 0.);
        assert_eq!(dist.lookup_word(nowhere, &global), MIN_WORD_PROB);
    }

    #[test]
    fn empty_distribution_reserves_everything() {
        let (_, global, _) = fixture();
        let mut empty = WordDist::new();
        empty.finish(&global);
        assert_eq!(empty.unseen_mass(), 1.0);
        assert!(empty.is_empty());
    }

    #[test]
    fn merging_sums_counts() {
        let mut lex = Lexicon::default();
        let w = lex.intern("paris");
        let mut a = WordDist::new();
        let mut b = WordDist::new();
        a.add_word(w, 3);
        b.add_word(w, 4);
        b.add_word(lex.intern("wine"), 2);
        a.add_word_distribution(&b);
        assert_eq!(a.counts()[&w], 7);
        assert_eq!(a.total_tokens(), 9);
    }
}
