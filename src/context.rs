use crate::config::Opts;
use crate::corpus::ArticleId;
use crate::corpus::ArticleTable;
use crate::gazetteer::Gazetteer;
use crate::gazetteer::Location;
use crate::geo::sphere_dist;
use crate::geo::Coord;
use crate::geo::Tiling;
use crate::grid::Grid;
use crate::regiondist::RegionDistCache;
use crate::worddist::GlobalDist;
use crate::worddist::Lexicon;
use std::collections::HashSet;

/// Everything a run knows: the options, the loaded corpus structures,
/// and the per-word cache. Components receive the pieces they need
/// from here instead of reaching for shared mutable state. The corpus
/// structures are mutated only while loading; during evaluation only
/// the cache, the grid's lazy regions, and the divisions' lazy word
/// distributions change.
pub struct Context {
    pub opts: Opts,
    pub tiling: Tiling,
    pub lexicon: Lexicon,
    pub global: GlobalDist,
    pub table: ArticleTable,
    pub grid: Grid,
    pub gazetteer: Gazetteer,
    pub cache: RegionDistCache,
    pub stopwords: HashSet<String>,
}

impl Context {
    pub fn new(opts: Opts) -> Self {
        let tiling = opts.tiling();
        let cache = RegionDistCache::new(opts.lru);
        Self {
            opts,
            tiling,
            lexicon: Lexicon::default(),
            global: GlobalDist::default(),
            table: ArticleTable::default(),
            grid: Grid::new(tiling),
            gazetteer: Gazetteer::default(),
            cache,
            stopwords: HashSet::default(),
        }
    }

    /// Fold a word's case the way the options ask for.
    pub fn fold(&self, word: &str) -> String {
        if self.opts.preserve_case_words {
            word.to_owned()
        } else {
            word.to_lowercase()
        }
    }

    /// Whether an article counts as a correct resolution of the given
    /// ground-truth coordinate: close enough on the sphere, or its
    /// resolved location is a division whose boundary contains the
    /// coordinate.
    pub fn article_matches_coord(&self, id: ArticleId, coord: Coord) -> bool {
        let article = self.table.article(id);
        if let Some(c) = article.coord {
            if sphere_dist(c, coord) <= self.opts.max_dist_for_close_match {
                return true;
            }
        }
        match article.location {
            Some(Location::Division(div)) => self.gazetteer.division(div).contains(coord),
            _ => false,
        }
    }
}
