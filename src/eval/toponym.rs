use super::accum::Reason;
use super::geogword::GeogWord;
use super::results::ToponymResults;
use crate::context::Context;
use crate::corpus::ArticleId;
use crate::strategy::ToponymStrategy;
use std::collections::HashSet;

/// How many documents between intermediate result dumps.
const INTERMEDIATE_EVERY: usize = 100;

/// Mark stopwords and build the context window around each toponym:
/// up to `context_len` non-stopword words on either side, each tagged
/// with its signed word offset from the toponym. A toponym homonymous
/// with a stopword is still a toponym.
pub fn prepare_document(words: &mut [GeogWord], stopwords: &HashSet<String>, context_len: usize) {
    for word in words.iter_mut() {
        word.is_stop = word.coord.is_none() && stopwords.contains(&word.word);
    }
    let n = words.len();
    for at in 0..n {
        if words[at].coord.is_none() {
            continue;
        }
        let from = at.saturating_sub(context_len);
        let upto = (at + context_len + 1).min(n);
        let context = (from..upto)
            .filter(|j| !stopwords.contains(&words[*j].word))
            .map(|j| (j as i32 - at as i32, words[j].word.clone()))
            .collect::<Vec<_>>();
        words[at].context = Some(context);
    }
}

/// Evaluate toponym disambiguation over the given documents. Each
/// toponym with a ground-truth coordinate is disambiguated against
/// its candidate articles; the winner is checked against the true
/// coordinate and the result recorded with a reason when incorrect.
pub fn evaluate_toponyms(
    ctx: &mut Context,
    strategy: &ToponymStrategy,
    documents: Vec<Vec<GeogWord>>,
) -> ToponymResults {
    let mut results = ToponymResults::default();
    let mut processed = 0;
    for (at, mut document) in documents.into_iter().enumerate() {
        if at < ctx.opts.skip_initial {
            continue;
        }
        if ctx.opts.skip_n > 0 && (at - ctx.opts.skip_initial) % ctx.opts.skip_n != 0 {
            continue;
        }
        if let Some(name) = document.iter().find_map(|w| w.document.clone()) {
            log::info!("{:<32}{:<32}", "processing document", name);
        }
        if strategy.needs_context() {
            prepare_document(
                &mut document,
                &ctx.stopwords,
                ctx.opts.naive_bayes_context_len,
            );
        }
        for word in document.iter().filter(|w| w.coord.is_some()) {
            disambiguate_toponym(ctx, strategy, word, &mut results);
        }
        processed += 1;
        if processed % INTERMEDIATE_EVERY == 0 {
            log::info!("results after {} documents:", processed);
            results.output();
        }
    }
    log::info!("final results, {} documents processed:", processed);
    results.output();
    results
}

/// Candidate articles for a toponym: the article table's toponym
/// index, plus the matched articles of gazetteer localities and
/// divisions carrying the name.
fn candidates(ctx: &Context, toponym: &str) -> Vec<ArticleId> {
    let mut found = ctx.table.by_lower_toponym(toponym).to_vec();
    let matched_localities = ctx
        .gazetteer
        .localities_named(toponym)
        .iter()
        .filter_map(|id| ctx.gazetteer.locality(*id).matched);
    let matched_divisions = ctx
        .gazetteer
        .divisions_named(toponym)
        .iter()
        .filter_map(|id| ctx.gazetteer.division(*id).matched);
    for id in matched_localities.chain(matched_divisions) {
        if !found.contains(&id) {
            found.push(id);
        }
    }
    found
}

fn disambiguate_toponym(
    ctx: &mut Context,
    strategy: &ToponymStrategy,
    word: &GeogWord,
    results: &mut ToponymResults,
) {
    let coord = word.coord.expect("only coordinated toponyms are evaluated");
    let toponym = word.word.to_lowercase();
    let candidates = candidates(ctx, &toponym);
    let mut best: Option<(f64, ArticleId)> = None;
    for id in candidates.iter() {
        let score = {
            let Context {
                ref opts,
                ref lexicon,
                ref global,
                ref table,
                ref mut grid,
                ref mut gazetteer,
                ..
            } = *ctx;
            strategy.score(opts, word, *id, table, grid, gazetteer, global, lexicon)
        };
        if best.map(|(top, _)| score > top).unwrap_or(true) {
            best = Some((score, *id));
        }
    }
    let correct = best
        .map(|(_, id)| ctx.article_matches_coord(id, coord))
        .unwrap_or(false);
    let reason = if correct {
        None
    } else if candidates.is_empty() {
        Some(Reason::NoCandidates)
    } else {
        let good = candidates
            .iter()
            .filter(|id| ctx.article_matches_coord(**id, coord))
            .collect::<Vec<_>>();
        match good.len() {
            0 => Some(Reason::NoCorrectCandidates),
            1 => match ctx.table.article(*good[0]).incoming_links {
                None => Some(Reason::OneCorrectMissingLinkInfo),
                Some(_) => Some(Reason::OneCorrectCandidate),
            },
            _ => Some(Reason::MultipleCorrectCandidates),
        }
    };
    match reason {
        None => log::info!("{:<32}{:<32}", format!("toponym {}", word.word), "correct"),
        Some(reason) => log::info!(
            "{:<32}{:<32}",
            format!("toponym {}", word.word),
            format!("{}", reason)
        ),
    }
    results.record(
        correct,
        &word.word,
        word.location.as_deref(),
        reason,
        candidates.len(),
    );
}
