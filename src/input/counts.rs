use super::StageBudget;
use crate::context::Context;
use crate::worddist::WordDist;
use anyhow::Context as _;
use std::io::BufRead;
use std::path::Path;

/// Read the word-counts file: blocks opened by `Article title: <T>`
/// followed by `<word> = <count>` lines. Counts attach to the named
/// article's distribution and accumulate into the global distribution;
/// blocks for unknown titles are discarded with a warning. Afterwards
/// the global distribution and every article distribution are
/// finished.
pub fn read_word_counts(path: &Path, ctx: &mut Context) -> anyhow::Result<()> {
    log::info!("{:<32}{:<32}", "reading word counts", path.display().to_string());
    let file = std::fs::File::open(path)
        .with_context(|| format!("open word counts {}", path.display()))?;
    let budget = StageBudget::new(ctx.opts.max_time_per_stage);
    let mut block: Option<(String, WordDist)> = None;
    for line in std::io::BufReader::new(file).lines() {
        let line = line?;
        if let Some(title) = line.strip_prefix("Article title: ") {
            if let Some((title, dist)) = block.take() {
                attach(ctx, &title, dist);
            }
            if budget.exhausted() {
                log::warn!("word counts stage budget exhausted, stopping early");
                break;
            }
            block = Some((title.to_owned(), WordDist::new()));
        } else if line.starts_with("Article coordinates: ") || line.starts_with("Article ID: ") {
            continue;
        } else if let Some((_, dist)) = block.as_mut() {
            let Some(at) = line.rfind(" = ") else {
                log::warn!("strange count line, can't parse: {}", line);
                continue;
            };
            let Ok(count) = line[at + 3..].parse::<u32>() else {
                log::warn!("strange count line, can't parse: {}", line);
                continue;
            };
            let word = ctx.fold(&line[..at]);
            if ctx.opts.ignore_stopwords_in_article_dists && ctx.stopwords.contains(&word) {
                continue;
            }
            let word = ctx.lexicon.intern(&word);
            dist.add_word(word, count);
        }
    }
    if let Some((title, dist)) = block.take() {
        attach(ctx, &title, dist);
    }
    ctx.global.finish();
    ctx.table.finish_distributions(&ctx.global);
    Ok(())
}

fn attach(ctx: &mut Context, title: &str, dist: WordDist) {
    if dist.total_tokens() == 0 {
        return;
    }
    match ctx.table.lookup(title) {
        Some(id) => {
            ctx.global.note(&dist);
            ctx.table.article_mut(id).dist = Some(dist);
        }
        None => log::warn!("skipping counts for {}, not in table", title),
    }
}
