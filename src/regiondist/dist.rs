use super::RegionDistCache;
use crate::grid::Grid;
use crate::grid::RegionId;
use crate::worddist::GlobalDist;
use crate::worddist::WordDist;
use crate::worddist::WordId;
use crate::Probability;
use std::collections::HashMap;

/// A distribution over statistical regions, as attached to a word:
/// the region word distributions inverted. For a given word, its
/// probability in every nonempty region, normalized to sum to one.
/// Kept sparse and in region-creation order so downstream rankings
/// tie-break deterministically.
#[derive(Debug, Clone, Default)]
pub struct RegionDist(Vec<(RegionId, Probability)>);

impl RegionDist {
    /// The region distribution of a single word.
    pub fn for_word(word: WordId, grid: &Grid, global: &GlobalDist) -> Self {
        let mut probs = grid
            .nonempty_regions()
            .map(|id| (id, grid.region(id).worddist.dist.lookup_word(word, global)))
            .collect::<Vec<_>>();
        let total = probs.iter().map(|(_, p)| p).sum::<Probability>();
        if total > 0. {
            for (_, p) in probs.iter_mut() {
                *p /= total;
            }
        }
        Self(probs)
    }

    /// The region distribution of a whole word distribution: the
    /// per-word distributions summed with the query's counts as
    /// weights, renormalized. Per-word distributions are pulled
    /// through the cache.
    pub fn for_word_dist(
        dist: &WordDist,
        grid: &Grid,
        global: &GlobalDist,
        cache: &mut RegionDistCache,
    ) -> Self {
        let mut probs = HashMap::<RegionId, Probability>::default();
        for (word, count) in dist.counts().iter() {
            if !cache.contains(word) {
                cache.put(*word, Self::for_word(*word, grid, global));
            }
            let worddist = cache.get(word).expect("just inserted");
            for (region, prob) in worddist.0.iter() {
                *probs.entry(*region).or_insert(0.) += *count as Probability * prob;
            }
        }
        let total = probs.values().sum::<Probability>();
        let mut probs = probs.into_iter().collect::<Vec<_>>();
        probs.sort_by_key(|(region, _)| *region);
        if total > 0. {
            for (_, p) in probs.iter_mut() {
                *p /= total;
            }
        }
        Self(probs)
    }

    pub fn probabilities(&self) -> &[(RegionId, Probability)] {
        &self.0
    }

    /// Regions by descending probability; equal probabilities keep
    /// region-creation order.
    pub fn ranked(&self) -> Vec<RegionId> {
        let mut order = self.0.clone();
        order.sort_by(|(_, p), (_, q)| q.total_cmp(p));
        order.into_iter().map(|(region, _)| region).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Article;
    use crate::corpus::ArticleTable;
    use crate::corpus::Split;
    use crate::geo::Coord;
    use crate::geo::Tiling;
    use crate::worddist::Lexicon;

    fn world() -> (ArticleTable, GlobalDist, Lexicon, Grid) {
        let mut lex = Lexicon::default();
        let mut table = ArticleTable::default();
        let mut global = GlobalDist::default();
        for (title, lat, long, words) in [
            ("Paris", 48.86, 2.35, &["paris", "wine"][..]),
            ("Tokyo", 35.68, 139.69, &["tokyo", "sushi"][..]),
        ] {
            let mut art = Article::new(0, title.to_owned());
            art.split = Split::Training;
            art.coord = Some(Coord::new(lat, long));
            let mut dist = WordDist::new();
            for w in words {
                dist.add_word(lex.intern(w), 4);
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

    #[test]
    fn word_distribution_normalizes() {
        let (_, global, lex, grid) = world();
        let dist = RegionDist::for_word(lex.get("paris").unwrap(), &grid, &global);
        let total = dist.probabilities().iter().map(|(_, p)| p).sum::<f64>();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn word_favors_its_region() {
        let (_, global, lex, grid) = world();
        let dist = RegionDist::for_word(lex.get("paris").unwrap(), &grid, &global);
        let best = dist.ranked()[0];
        assert_eq!(grid.region(best).tile.lat, 48);
    }

    #[test]
    fn query_distribution_pulls_through_cache() {
        let (_, global, lex, grid) = world();
        let mut cache = RegionDistCache::new(10);
        let mut query = WordDist::new();
        query.add_word(lex.get("tokyo").unwrap(), 3);
        query.add_word(lex.get("sushi").unwrap(), 1);
        query.finish(&global);
        let dist = RegionDist::for_word_dist(&query, &grid, &global, &mut cache);
        assert_eq!(cache.len(), 2);
        let best = dist.ranked()[0];
        assert_eq!(grid.region(best).tile.lat, 35);
        let total = dist.probabilities().iter().map(|(_, p)| p).sum::<f64>();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
