use super::region::RegionId;
use super::region::RegionWordDist;
use super::region::StatRegion;
use crate::corpus::ArticleId;
use crate::corpus::ArticleTable;
use crate::geo::Coord;
use crate::geo::Tile;
use crate::geo::Tiling;
use crate::worddist::GlobalDist;
use std::collections::HashMap;

/// The regional grid: a map from tiles to the training articles that
/// landed in them, and the arena of statistical regions built from
/// those tiles.
///
/// Regions are constructed lazily on first lookup until
/// `generate_all` closes the grid; after that point misses return a
/// single shared sentinel empty region. Region ids are assigned in
/// creation order, which makes `nonempty_regions` enumeration stable
/// across calls.
#[derive(Debug)]
pub struct Grid {
    tiling: Tiling,
    tiles: HashMap<Tile, Vec<ArticleId>>,
    regions: Vec<StatRegion>,
    by_corner: HashMap<Tile, RegionId>,
    nonempty: Vec<RegionId>,
    sentinel: Option<RegionId>,
    all_computed: bool,
    n_empty: usize,
}

impl Grid {
    pub fn new(tiling: Tiling) -> Self {
        Self {
            tiling,
            tiles: HashMap::default(),
            regions: Vec::new(),
            by_corner: HashMap::default(),
            nonempty: Vec::new(),
            sentinel: None,
            all_computed: false,
            n_empty: 0,
        }
    }

    pub fn tiling(&self) -> &Tiling {
        &self.tiling
    }

    /// File a training article under the tile containing its
    /// coordinate.
    pub fn add_training_article(&mut self, id: ArticleId, coord: Coord) {
        assert!(!self.all_computed);
        self.tiles.entry(self.tiling.tile(coord)).or_default().push(id);
    }

    /// The region containing the coordinate, constructing it if the
    /// grid is still open.
    pub fn region_for_coord(
        &mut self,
        table: &ArticleTable,
        global: &GlobalDist,
        coord: Coord,
    ) -> RegionId {
        let corner = self.tiling.stat_region(coord);
        self.region_for_tile(table, global, corner)
    }

    /// The region whose southwest tile is the given one, constructing
    /// it if the grid is still open. After `generate_all` misses
    /// return the sentinel.
    pub fn region_for_tile(
        &mut self,
        table: &ArticleTable,
        global: &GlobalDist,
        corner: Tile,
    ) -> RegionId {
        if let Some(id) = self.by_corner.get(&corner) {
            return *id;
        }
        if self.all_computed {
            return self.sentinel.expect("sentinel exists once grid is closed");
        }
        let region = self.build(table, global, corner);
        self.register(corner, region)
    }

    /// Eagerly construct every nonempty region, then close the grid.
    pub fn generate_all(&mut self, table: &ArticleTable, global: &GlobalDist) {
        assert!(!self.all_computed);
        log::info!("{:<32}", "generating statistical regions");
        let progress = crate::progress(self.tiling.n_tiles(), "scanning tiles");
        let (min, max) = (self.tiling.min(), self.tiling.max());
        for i in min.lat..=max.lat {
            for j in min.long..=max.long {
                let corner = Tile::new(i, j);
                if !self.by_corner.contains_key(&corner) {
                    let region = self.build(table, global, corner);
                    if region.worddist.is_empty() {
                        self.n_empty += 1;
                    } else {
                        self.register(corner, region);
                    }
                }
                progress.inc(1);
            }
        }
        progress.finish_and_clear();
        let sentinel = RegionId(self.regions.len() as u32);
        self.regions.push(StatRegion::sentinel(global));
        self.sentinel = Some(sentinel);
        self.all_computed = true;
        log::info!(
            "{:<32}{:<32}",
            "statistical regions",
            format!("{} nonempty, {} empty", self.nonempty.len(), self.n_empty)
        );
    }

    /// Region lookup once the grid is closed; misses get the sentinel.
    pub fn find(&self, coord: Coord) -> RegionId {
        assert!(self.all_computed);
        let corner = self.tiling.stat_region(coord);
        match self.by_corner.get(&corner) {
            Some(id) => *id,
            None => self.sentinel.expect("sentinel exists once grid is closed"),
        }
    }

    pub fn region(&self, id: RegionId) -> &StatRegion {
        &self.regions[id.0 as usize]
    }

    /// Enumerate nonempty regions in creation order. The order is
    /// stable across calls within a run.
    pub fn nonempty_regions(&self) -> impl Iterator<Item = RegionId> + '_ {
        assert!(self.all_computed);
        self.nonempty.iter().copied()
    }

    pub fn n_nonempty(&self) -> usize {
        self.nonempty.len()
    }

    pub fn n_empty(&self) -> usize {
        self.n_empty
    }

    pub fn all_computed(&self) -> bool {
        self.all_computed
    }

    /// Accumulate the WxW block of tiles into a fresh region,
    /// wrapping longitude at the antimeridian. Latitudes past the
    /// poles have no tiles and contribute nothing.
    fn build(&self, table: &ArticleTable, global: &GlobalDist, corner: Tile) -> StatRegion {
        let mut worddist = RegionWordDist::default();
        for i in corner.lat..corner.lat + self.tiling.width() {
            if !self.tiling.contains_lat(i) {
                continue;
            }
            for j in corner.long..corner.long + self.tiling.width() {
                let tile = Tile::new(i, self.tiling.wrap_long(j));
                if let Some(articles) = self.tiles.get(&tile) {
                    worddist.add_articles(articles, table);
                }
            }
        }
        worddist.finish(global);
        StatRegion { tile: corner, worddist }
    }

    fn register(&mut self, corner: Tile, region: StatRegion) -> RegionId {
        let id = RegionId(self.regions.len() as u32);
        if region.worddist.is_empty() {
            self.n_empty += 1;
        } else {
            self.nonempty.push(id);
        }
        self.regions.push(region);
        self.by_corner.insert(corner, id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Article;
    use crate::corpus::Split;
    use crate::worddist::Lexicon;
    use crate::worddist::WordDist;

    fn corpus() -> (ArticleTable, GlobalDist, Lexicon) {
        let mut lex = Lexicon::default();
        let mut table = ArticleTable::default();
        let mut global = GlobalDist::default();
        for (title, lat, long, words) in [
            ("Paris", 48.86, 2.35, &["paris", "wine"][..]),
            ("Tokyo", 35.68, 139.69, &["tokyo", "sushi"][..]),
            ("Versailles", 48.80, 2.13, &["paris", "palace"][..]),
        ] {
            let mut art = Article::new(0, title.to_owned());
            art.split = Split::Training;
            art.coord = Some(Coord::new(lat, long));
            let mut dist = WordDist::new();
            for w in words {
                dist.add_word(lex.intern(w), 2);
            }
            global.note(&dist);
            art.dist = Some(dist);
            table.insert(art);
        }
        global.finish();
        (table, global, lex)
    }

    fn load(grid: &mut Grid, table: &ArticleTable) {
        for id in table.ids().collect::<Vec<_>>() {
            let coord = table.article(id).coord.unwrap();
            grid.add_training_article(id, coord);
        }
    }

    #[test]
    fn region_matches_stat_region_arithmetic() {
        let (mut table, global, _) = corpus();
        table.finish_distributions(&global);
        let tiling = Tiling::new(1.0, 1);
        let mut grid = Grid::new(tiling);
        load(&mut grid, &table);
        let coord = Coord::new(48.86, 2.35);
        let id = grid.region_for_coord(&table, &global, coord);
        assert_eq!(grid.region(id).tile, tiling.stat_region(coord));
    }

    #[test]
    fn neighbors_share_a_wide_region_distribution() {
        let (mut table, global, lex) = corpus();
        table.finish_distributions(&global);
        let mut grid = Grid::new(Tiling::new(1.0, 2));
        load(&mut grid, &table);
        let id = grid.region_for_coord(&table, &global, Coord::new(48.86, 2.35));
        let region = grid.region(id);
        assert_eq!(region.worddist.num_arts, 2);
        assert!(region.worddist.dist.contains(lex.get("palace").unwrap()));
    }

    #[test]
    fn enumeration_is_stable() {
        let (mut table, global, _) = corpus();
        table.finish_distributions(&global);
        let mut grid = Grid::new(Tiling::new(1.0, 1));
        load(&mut grid, &table);
        grid.generate_all(&table, &global);
        // paris and versailles share a tile; tokyo has its own
        assert_eq!(grid.n_nonempty(), 2);
        let first = grid.nonempty_regions().collect::<Vec<_>>();
        let second = grid.nonempty_regions().collect::<Vec<_>>();
        assert_eq!(first, second);
    }

    #[test]
    fn closed_grid_hands_out_the_sentinel() {
        let (mut table, global, _) = corpus();
        table.finish_distributions(&global);
        let mut grid = Grid::new(Tiling::new(1.0, 1));
        load(&mut grid, &table);
        grid.generate_all(&table, &global);
        let miss = grid.find(Coord::new(-60.0, -120.0));
        assert_eq!(grid.region(miss).tile, StatRegion::SENTINEL);
        assert!(grid.region(miss).worddist.is_empty());
        let hit = grid.find(Coord::new(48.86, 2.35));
        assert_ne!(grid.region(hit).tile, StatRegion::SENTINEL);
    }
}
