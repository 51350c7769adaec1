use crate::corpus::ArticleId;
use crate::corpus::ArticleTable;
use crate::corpus::Split;
use crate::geo::Tile;
use crate::worddist::GlobalDist;
use crate::worddist::WordDist;

/// Arena index into the grid's region table.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct RegionId(pub u32);

/// Word distribution aggregated over the training articles of some
/// geographic extent, together with the article and link totals the
/// baselines rank by.
#[derive(Debug, Default)]
pub struct RegionWordDist {
    pub dist: WordDist,
    pub num_arts: usize,
    pub incoming_links: u64,
}

impl RegionWordDist {
    /// Fold the given articles into the distribution. Articles without
    /// a finished distribution or outside the training split are
    /// skipped.
    pub fn add_articles(&mut self, ids: &[ArticleId], table: &ArticleTable) {
        let mut skipped = 0;
        for id in ids {
            let article = table.article(*id);
            let Some(dist) = article.dist.as_ref() else {
                skipped += 1;
                continue;
            };
            assert!(dist.finished());
            if article.split != Split::Training {
                continue;
            }
            self.num_arts += 1;
            self.incoming_links += article.incoming_links.unwrap_or(0) as u64;
            self.dist.add_word_distribution(dist);
        }
        if skipped > 0 {
            log::debug!("skipped {} articles without distributions", skipped);
        }
    }

    pub fn finish(&mut self, global: &GlobalDist) {
        self.dist.finish(global);
    }

    pub fn is_empty(&self) -> bool {
        self.num_arts == 0
    }
}

/// One statistical region: a WxW block of tiles identified by its
/// southwest tile, with the aggregate distribution over the training
/// articles inside it. Never mutated once its distribution is
/// finished.
#[derive(Debug)]
pub struct StatRegion {
    pub tile: Tile,
    pub worddist: RegionWordDist,
}

impl StatRegion {
    /// Marker tile for the shared sentinel region handed out for
    /// lookups that miss after the grid is closed.
    pub const SENTINEL: Tile = Tile {
        lat: i32::MIN,
        long: i32::MIN,
    };

    pub fn sentinel(global: &GlobalDist) -> Self {
        let mut worddist = RegionWordDist::default();
        worddist.finish(global);
        Self {
            tile: Self::SENTINEL,
            worddist,
        }
    }
}

impl std::fmt::Display for StatRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "region {} ({} articles)", self.tile, self.worddist.num_arts)
    }
}
