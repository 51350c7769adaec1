use crate::corpus::ArticleId;
use crate::geo::BoundingBox;
use crate::geo::Coord;
use crate::grid::RegionWordDist;

/// Arena index into the gazetteer's locality table.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct LocalityId(pub u32);

/// Arena index into the gazetteer's division table.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct DivisionId(pub u32);

/// A resolved geographic location: either a point-valued gazetteer
/// entry or an areal division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Locality(LocalityId),
    Division(DivisionId),
}

/// A point-valued gazetteer entry.
#[derive(Debug)]
pub struct Locality {
    pub name: String,
    pub altnames: Vec<String>,
    pub kind: String,
    pub coord: Coord,
    pub div: Option<DivisionId>,
    pub matched: Option<ArticleId>,
}

impl Locality {
    pub fn new(name: String, coord: Coord) -> Self {
        Self {
            name,
            altnames: Vec::new(),
            kind: String::new(),
            coord,
            div: None,
            matched: None,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.altnames.iter().map(String::as_str))
    }
}

impl std::fmt::Display for Locality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "locality {} at {}", self.name, self.coord)
    }
}

/// An areal gazetteer entry: a country, state, or county-level
/// division. The path lists enclosing divisions from coarsest to
/// finest; the last element is the division's own name.
#[derive(Debug)]
pub struct Division {
    pub path: Vec<String>,
    pub div: Option<DivisionId>,
    pub locs: Vec<LocalityId>,
    pub goodlocs: Vec<LocalityId>,
    pub boundary: Option<BoundingBox>,
    pub matched: Option<ArticleId>,
    pub worddist: Option<RegionWordDist>,
}

impl Division {
    pub fn new(path: Vec<String>, div: Option<DivisionId>) -> Self {
        assert!(!path.is_empty());
        Self {
            path,
            div,
            locs: Vec::new(),
            goodlocs: Vec::new(),
            boundary: None,
            matched: None,
            worddist: None,
        }
    }

    pub fn name(&self) -> &str {
        self.path.last().expect("path is never empty")
    }

    pub fn level(&self) -> usize {
        self.path.len()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.boundary.map(|b| b.contains(coord)).unwrap_or(false)
    }
}

impl std::fmt::Display for Division {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "division {}", self.path.join("/"))
    }
}
