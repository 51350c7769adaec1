use super::results::DocumentResults;
use crate::context::Context;
use crate::strategy::DocumentStrategy;

/// How many documents between intermediate result dumps.
const INTERMEDIATE_EVERY: usize = 100;

/// Evaluate document geotagging over the configured split: rank every
/// nonempty region for each article's distribution, find the rank of
/// the article's true region, and accumulate rank- and
/// distance-stratified results. Articles without a finished
/// distribution are counted and skipped; `skip_initial` and `skip_n`
/// shard the split.
pub fn evaluate_documents(ctx: &mut Context, strategy: &DocumentStrategy) -> DocumentResults {
    if !ctx.grid.all_computed() {
        ctx.grid.generate_all(&ctx.table, &ctx.global);
    }
    let mut results =
        DocumentResults::new(ctx.opts.miles_per_region, ctx.opts.degrees_per_tile());
    let ids = ctx.table.by_split(ctx.opts.eval_split).to_vec();
    log::info!(
        "{:<32}{:<32}",
        "evaluating documents",
        format!("{} in {} split", ids.len(), ctx.opts.eval_split)
    );
    let mut processed = 0;
    for (at, id) in ids.iter().enumerate() {
        if at < ctx.opts.skip_initial {
            continue;
        }
        if ctx.opts.skip_n > 0 && (at - ctx.opts.skip_initial) % ctx.opts.skip_n != 0 {
            continue;
        }
        let Context {
            ref tiling,
            ref lexicon,
            ref global,
            ref table,
            ref grid,
            ref mut cache,
            ..
        } = *ctx;
        let article = table.article(*id);
        let (dist, coord) = match (article.dist.as_ref(), article.coord) {
            (Some(dist), Some(coord)) if dist.finished() => (dist, coord),
            _ => {
                results.record_other("skipped articles");
                continue;
            }
        };
        let true_region = grid.find(coord);
        let naitr = grid.region(true_region).worddist.num_arts;
        let ranked = strategy.rank_regions(dist, grid, global, lexicon, table, cache);
        let Some(first) = ranked.first().copied() else {
            log::warn!("no nonempty regions to rank for {}", article);
            continue;
        };
        let rank = ranked
            .iter()
            .position(|region| *region == true_region)
            .map(|at| at + 1)
            .unwrap_or(ranked.len() + 1);
        results.record(rank, coord, grid.region(first).tile, naitr, tiling);
        if naitr == 0 {
            results.record_other("documents with no training articles in region");
        }
        log::info!(
            "{:<32}{:<32}",
            format!("document {}", article),
            format!("true region at rank {}", rank)
        );
        processed += 1;
        if processed % INTERMEDIATE_EVERY == 0 {
            log::info!("results after {} documents:", processed);
            results.output(false);
        }
    }
    log::info!("final results, {} documents processed:", processed);
    results.output(true);
    results
}
