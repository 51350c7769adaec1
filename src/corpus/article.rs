use crate::gazetteer::Location;
use crate::geo::Coord;
use crate::grid::RegionId;
use crate::worddist::WordDist;
use std::cell::Cell;

/// Arena index into the article table. Every structure outside the
/// table refers to articles through these.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ArticleId(pub u32);

/// Which partition of the corpus an article belongs to.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Split {
    Training,
    Dev,
    Test,
    None,
}

impl TryFrom<&str> for Split {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "training" => Ok(Self::Training),
            "dev" => Ok(Self::Dev),
            "test" => Ok(Self::Test),
            "" | "none" => Ok(Self::None),
            other => Err(anyhow::anyhow!("unrecognized split {}", other)),
        }
    }
}

impl std::fmt::Display for Split {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Training => write!(f, "training"),
            Self::Dev => write!(f, "dev"),
            Self::Test => write!(f, "test"),
            Self::None => write!(f, "none"),
        }
    }
}

/// One encyclopedia article record.
///
/// `dist` is attached later by the word-counts loader; `location` is
/// attached later by the gazetteer matcher; `stat_region` memoizes the
/// article's statistical region the first time a scorer resolves it.
/// The memo sits in a `Cell` because scoring holds the article behind
/// a shared reference; the core is single-threaded. A record carrying
/// a redirect target never enters the table arena; its title becomes
/// an alias of the target instead.
#[derive(Debug)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub namespace: String,
    pub redirect: Option<String>,
    pub split: Split,
    pub coord: Option<Coord>,
    pub incoming_links: Option<u32>,
    pub dist: Option<WordDist>,
    pub location: Option<Location>,
    pub stat_region: Cell<Option<RegionId>>,
}

impl Article {
    pub fn new(id: i64, title: String) -> Self {
        Self {
            id,
            title,
            namespace: String::from("Main"),
            redirect: None,
            split: Split::None,
            coord: None,
            incoming_links: None,
            dist: None,
            location: None,
            stat_region: Cell::new(None),
        }
    }
}

impl std::fmt::Display for Article {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.coord {
            Some(coord) => write!(f, "{} at {}", self.title, coord),
            None => write!(f, "{}", self.title),
        }
    }
}
