use super::toponym::adjusted_incoming_links;
use crate::config::BaselineStrategyKind;
use crate::config::DocumentStrategyKind;
use crate::config::Opts;
use crate::corpus::ArticleTable;
use crate::grid::Grid;
use crate::grid::RegionId;
use crate::regiondist::RegionDist;
use crate::regiondist::RegionDistCache;
use crate::worddist::kl_divergence;
use crate::worddist::GlobalDist;
use crate::worddist::Lexicon;
use crate::worddist::WordDist;
use crate::worddist::WordId;
use crate::Probability;
use rand::seq::SliceRandom;
use std::collections::HashMap;

/// A document-geotagging strategy: rank every nonempty region by how
/// probable an origin it is for the query distribution. Ties keep the
/// grid's stable enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStrategy {
    KlDivergence { partial: bool },
    PerWordRegionDistributions,
    Baseline(BaselineStrategyKind),
}

impl DocumentStrategy {
    pub fn from_opts(opts: &Opts) -> Self {
        match opts.document_strategy {
            DocumentStrategyKind::Baseline => Self::Baseline(opts.baseline_strategy),
            DocumentStrategyKind::KlDivergence => Self::KlDivergence { partial: false },
            DocumentStrategyKind::PartialKlDivergence => Self::KlDivergence { partial: true },
            DocumentStrategyKind::PerWordRegionDistributions => Self::PerWordRegionDistributions,
        }
    }

    pub fn rank_regions(
        &self,
        query: &WordDist,
        grid: &Grid,
        global: &GlobalDist,
        lexicon: &Lexicon,
        table: &ArticleTable,
        cache: &mut RegionDistCache,
    ) -> Vec<RegionId> {
        match self {
            Self::KlDivergence { partial } => {
                let mut scored = grid
                    .nonempty_regions()
                    .map(|id| {
                        let region = &grid.region(id).worddist.dist;
                        (kl_divergence(query, region, global, *partial), id)
                    })
                    .collect::<Vec<_>>();
                scored.sort_by(|(a, _), (b, _)| a.total_cmp(b));
                scored.into_iter().map(|(_, id)| id).collect()
            }
            Self::PerWordRegionDistributions => {
                RegionDist::for_word_dist(query, grid, global, cache).ranked()
            }
            Self::Baseline(kind) => {
                Self::baseline(*kind, query, grid, global, lexicon, table, cache)
            }
        }
    }

    fn baseline(
        kind: BaselineStrategyKind,
        query: &WordDist,
        grid: &Grid,
        global: &GlobalDist,
        lexicon: &Lexicon,
        table: &ArticleTable,
        cache: &mut RegionDistCache,
    ) -> Vec<RegionId> {
        let mut regions = grid.nonempty_regions().collect::<Vec<_>>();
        match kind {
            BaselineStrategyKind::InternalLink => {
                regions.sort_by_key(|id| std::cmp::Reverse(grid.region(*id).worddist.incoming_links));
                regions
            }
            BaselineStrategyKind::NumArticles => {
                regions.sort_by_key(|id| std::cmp::Reverse(grid.region(*id).worddist.num_arts));
                regions
            }
            BaselineStrategyKind::Random => {
                regions.shuffle(&mut rand::rng());
                regions
            }
            BaselineStrategyKind::LinkMostCommonToponym => {
                let Some(word) = Self::most_common_toponym(query, lexicon, table) else {
                    return regions;
                };
                // best candidate link count per region; regions without
                // a candidate fall back to their own link totals
                let mut best = HashMap::<RegionId, Probability>::default();
                for id in table.by_lower_toponym(lexicon.word(word)) {
                    let article = table.article(*id);
                    if let Some(coord) = article.coord {
                        let region = grid.find(coord);
                        let links = adjusted_incoming_links(article);
                        let slot = best.entry(region).or_insert(0.);
                        if links > *slot {
                            *slot = links;
                        }
                    }
                }
                regions.sort_by(|a, b| {
                    let ka = (
                        best.get(a).copied().unwrap_or(f64::NEG_INFINITY),
                        grid.region(*a).worddist.incoming_links,
                    );
                    let kb = (
                        best.get(b).copied().unwrap_or(f64::NEG_INFINITY),
                        grid.region(*b).worddist.incoming_links,
                    );
                    kb.0.total_cmp(&ka.0).then(kb.1.cmp(&ka.1))
                });
                regions
            }
            BaselineStrategyKind::RegdistMostCommonToponym => {
                let Some(word) = Self::most_common_toponym(query, lexicon, table) else {
                    return regions;
                };
                if !cache.contains(&word) {
                    cache.put(word, RegionDist::for_word(word, grid, global));
                }
                cache.get(&word).expect("just inserted").ranked()
            }
        }
    }

    /// The query's most frequent word that names a known toponym.
    /// Count ties resolve to the earliest-interned word so rankings
    /// stay deterministic.
    fn most_common_toponym(
        query: &WordDist,
        lexicon: &Lexicon,
        table: &ArticleTable,
    ) -> Option<WordId> {
        let mut words = query
            .counts()
            .iter()
            .map(|(w, c)| (*w, *c))
            .collect::<Vec<_>>();
        words.sort_by_key(|(w, c)| (std::cmp::Reverse(*c), *w));
        words
            .into_iter()
            .map(|(w, _)| w)
            .find(|w| !table.by_lower_toponym(lexicon.word(*w)).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Article;
    use crate::corpus::Split;
    use crate::geo::Coord;
    use crate::geo::Tiling;

    fn world() -> (ArticleTable, GlobalDist, Lexicon, Grid) {
        let mut lex = Lexicon::default();
        let mut table = ArticleTable::default();
        let mut global = GlobalDist::default();
        for (title, lat, long, links, words) in [
            ("Paris", 48.86, 2.35, 900, &[("paris", 10), ("wine", 5)][..]),
            ("Tokyo", 35.68, 139.69, 400, &[("tokyo", 10), ("sushi", 5)][..]),
        ] {
            let mut art = Article::new(0, title.to_owned());
            art.split = Split::Training;
            art.coord = Some(Coord::new(lat, long));
            art.incoming_links = Some(links);
            let mut dist = WordDist::new();
            for (w, c) in words {
                dist.add_word(lex.intern(w), *c);
            }
            global.note(&dist);
            art.dist = Some(dist);
            table.insert(art);
        }
        global.finish();
        table.finish_distributions(&global);
        let mut grid = Grid::new(Tiling::new(1.0, 1));
        for id in table.ids().collect::<Vec<_>>() {
            let coord = table.article(id).coord.unwrap();
            grid.add_training_article(id, coord);
        }
        grid.generate_all(&table, &global);
        (table, global, lex, grid)
    }

    fn query(lex: &Lexicon, global: &GlobalDist, words: &[(&str, u32)]) -> WordDist {
        let mut dist = WordDist::new();
        for (w, c) in words {
            dist.add_word(lex.get(w).unwrap(), *c);
        }
        dist.finish(global);
        dist
    }

    #[test]
    fn kl_ranks_the_related_region_first() {
        let (table, global, lex, grid) = world();
        let mut cache = RegionDistCache::new(16);
        let query = query(&lex, &global, &[("paris", 3), ("wine", 2)]);
        let strategy = DocumentStrategy::KlDivergence { partial: true };
        let ranked = strategy.rank_regions(&query, &grid, &global, &lex, &table, &mut cache);
        assert_eq!(ranked.len(), 2);
        assert_eq!(grid.region(ranked[0]).tile.lat, 48);
    }

    #[test]
    fn per_word_region_distributions_agree() {
        let (table, global, lex, grid) = world();
        let mut cache = RegionDistCache::new(16);
        let query = query(&lex, &global, &[("tokyo", 3), ("sushi", 2)]);
        let strategy = DocumentStrategy::PerWordRegionDistributions;
        let ranked = strategy.rank_regions(&query, &grid, &global, &lex, &table, &mut cache);
        assert_eq!(grid.region(ranked[0]).tile.lat, 35);
    }

    #[test]
    fn link_baseline_ignores_the_query() {
        let (table, global, lex, grid) = world();
        let mut cache = RegionDistCache::new(16);
        let query = query(&lex, &global, &[("tokyo", 3)]);
        let strategy = DocumentStrategy::Baseline(BaselineStrategyKind::InternalLink);
        let ranked = strategy.rank_regions(&query, &grid, &global, &lex, &table, &mut cache);
        // paris has more incoming links regardless of the query
        assert_eq!(grid.region(ranked[0]).tile.lat, 48);
    }

    #[test]
    fn most_common_toponym_baseline_follows_the_query() {
        let (table, global, lex, grid) = world();
        let mut cache = RegionDistCache::new(16);
        let query = query(&lex, &global, &[("tokyo", 5), ("wine", 1)]);
        let strategy = DocumentStrategy::Baseline(BaselineStrategyKind::LinkMostCommonToponym);
        let ranked = strategy.rank_regions(&query, &grid, &global, &lex, &table, &mut cache);
        assert_eq!(grid.region(ranked[0]).tile.lat, 35);
    }

    #[test]
    fn random_baseline_is_a_permutation() {
        let (table, global, lex, grid) = world();
        let mut cache = RegionDistCache::new(16);
        let query = query(&lex, &global, &[("wine", 1)]);
        let strategy = DocumentStrategy::Baseline(BaselineStrategyKind::Random);
        let mut ranked = strategy.rank_regions(&query, &grid, &global, &lex, &table, &mut cache);
        ranked.sort();
        let mut all = grid.nonempty_regions().collect::<Vec<_>>();
        all.sort();
        assert_eq!(ranked, all);
    }
}
