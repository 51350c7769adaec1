use super::dist::GlobalDist;
use super::dist::WordDist;
use crate::Probability;

/// KL-divergence between two finished word distributions.
///
/// The partial variant sums only over words seen in `p` and omits the
/// unseen-mass tail. That omission is identical across candidates only
/// up to the candidates' own unseen-vocabulary terms, so partial KL is
/// a ranking heuristic rather than an exact divergence; it is the
/// default because it skips the expensive sweep over the candidate's
/// vocabulary.
pub fn kl_divergence(p: &WordDist, q: &WordDist, global: &GlobalDist, partial: bool) -> Probability {
    assert!(p.finished() && q.finished());
    let mut kl = 0.;
    for word in p.counts().keys() {
        let pw = p.lookup_word(*word, global);
        let qw = q.lookup_word(*word, global);
        kl += pw * (pw / qw).ln();
    }
    if partial {
        return kl;
    }
    // words seen in q but not in p contribute through p's unseen mass
    let mut union_mass = 0.;
    for word in p.counts().keys() {
        union_mass += global.probability(*word);
    }
    for word in q.counts().keys() {
        if p.contains(*word) {
            continue;
        }
        union_mass += global.probability(*word);
        let pw = p.lookup_word(*word, global);
        let qw = q.lookup_word(*word, global);
        kl += pw * (pw / qw).ln();
    }
    // the remaining tail covers globally known words absent from both
    let rest = (1.0 - union_mass).max(0.);
    let p_rest = p.unseen_mass() * rest / p.overall_unseen_mass();
    let q_rest = q.unseen_mass() * rest / q.overall_unseen_mass();
    if p_rest > 0. && q_rest > 0. {
        kl += p_rest * (p_rest / q_rest).ln();
    }
    kl
}
