use super::location::Division;
use super::location::DivisionId;
use super::location::Locality;
use super::location::LocalityId;
use crate::corpus::ArticleId;
use crate::corpus::ArticleTable;
use crate::geo::BoundingBox;
use crate::grid::RegionWordDist;
use crate::worddist::GlobalDist;
use crate::Miles;
use std::collections::HashMap;

/// The gazetteer: arenas of localities and divisions plus the
/// lowercase toponym indices used for candidate generation during
/// disambiguation.
#[derive(Debug, Default)]
pub struct Gazetteer {
    localities: Vec<Locality>,
    divisions: Vec<Division>,
    by_path: HashMap<Vec<String>, DivisionId>,
    toponym_to_locality: HashMap<String, Vec<LocalityId>>,
    toponym_to_division: HashMap<String, Vec<DivisionId>>,
}

impl Gazetteer {
    /// Add a locality to the arena and index every one of its names.
    pub fn add_locality(&mut self, locality: Locality) -> LocalityId {
        let id = LocalityId(self.localities.len() as u32);
        for name in locality.names() {
            self.toponym_to_locality
                .entry(name.to_lowercase())
                .or_default()
                .push(id);
        }
        self.localities.push(locality);
        id
    }

    /// Note that a locality was seen with the given division path.
    /// Creates the division and every enclosing division on first
    /// sight, registering each level's name in the toponym index, and
    /// files the locality at every level. A trailing empty path
    /// element refers to the next-higher division.
    pub fn note_division(&mut self, locality: LocalityId, path: &[String]) -> Option<DivisionId> {
        let higher = match path.len() {
            0 | 1 => None,
            n => self.note_division(locality, &path[..n - 1]),
        };
        let name = match path.last() {
            Some(name) if !name.is_empty() => name.clone(),
            _ => return higher,
        };
        let id = match self.by_path.get(path) {
            Some(id) => *id,
            None => {
                let id = DivisionId(self.divisions.len() as u32);
                self.divisions.push(Division::new(path.to_vec(), higher));
                self.by_path.insert(path.to_vec(), id);
                self.toponym_to_division
                    .entry(name.to_lowercase())
                    .or_default()
                    .push(id);
                id
            }
        };
        self.divisions[id.0 as usize].locs.push(locality);
        Some(id)
    }

    /// Compute every division's bounding box as the hull of its
    /// retained locations.
    pub fn compute_boundaries(&mut self, max_dist_for_outliers: Miles) {
        for at in 0..self.divisions.len() {
            let good = self.non_outliers(&self.divisions[at].locs, max_dist_for_outliers);
            let good = if good.is_empty() {
                log::warn!("all points outliers in {}", self.divisions[at]);
                self.divisions[at].locs.clone()
            } else {
                good
            };
            let hull = BoundingBox::hull(good.iter().map(|id| self.locality(*id).coord));
            let division = &mut self.divisions[at];
            division.goodlocs = good;
            division.boundary = hull;
        }
    }

    /// Hook for rejecting locations too far from all others in their
    /// division. Disabled: every location is retained.
    fn non_outliers(&self, locs: &[LocalityId], _max_dist: Miles) -> Vec<LocalityId> {
        locs.to_vec()
    }

    /// The division's aggregate word distribution, over its own
    /// matched article and those of its retained locations. Built on
    /// first request.
    pub fn division_worddist(
        &mut self,
        id: DivisionId,
        table: &ArticleTable,
        global: &GlobalDist,
    ) -> &RegionWordDist {
        if self.divisions[id.0 as usize].worddist.is_none() {
            let division = &self.divisions[id.0 as usize];
            let articles = division
                .matched
                .into_iter()
                .chain(
                    division
                        .goodlocs
                        .iter()
                        .filter_map(|loc| self.locality(*loc).matched),
                )
                .collect::<Vec<ArticleId>>();
            let mut worddist = RegionWordDist::default();
            worddist.add_articles(&articles, table);
            worddist.finish(global);
            self.divisions[id.0 as usize].worddist = Some(worddist);
        }
        self.divisions[id.0 as usize]
            .worddist
            .as_ref()
            .expect("just built")
    }

    pub fn locality(&self, id: LocalityId) -> &Locality {
        &self.localities[id.0 as usize]
    }
    pub fn locality_mut(&mut self, id: LocalityId) -> &mut Locality {
        &mut self.localities[id.0 as usize]
    }
    pub fn division(&self, id: DivisionId) -> &Division {
        &self.divisions[id.0 as usize]
    }
    pub fn division_mut(&mut self, id: DivisionId) -> &mut Division {
        &mut self.divisions[id.0 as usize]
    }

    pub fn locality_ids(&self) -> impl Iterator<Item = LocalityId> {
        (0..self.localities.len()).map(|i| LocalityId(i as u32))
    }
    pub fn division_ids(&self) -> impl Iterator<Item = DivisionId> {
        (0..self.divisions.len()).map(|i| DivisionId(i as u32))
    }

    pub fn localities_named(&self, toponym: &str) -> &[LocalityId] {
        self.toponym_to_locality
            .get(toponym)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
    pub fn divisions_named(&self, toponym: &str) -> &[DivisionId] {
        self.toponym_to_division
            .get(toponym)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn n_localities(&self) -> usize {
        self.localities.len()
    }
    pub fn n_divisions(&self) -> usize {
        self.divisions.len()
    }
}
