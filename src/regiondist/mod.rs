pub mod cache;
pub mod dist;

pub use cache::LruCache;
pub use dist::RegionDist;

use crate::worddist::WordId;

/// Cache of per-word region distributions, keyed by word.
pub type RegionDistCache = LruCache<WordId, RegionDist>;
