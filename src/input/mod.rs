pub mod articles;
pub mod counts;
pub mod gazetteer;
pub mod geowords;
pub mod stopwords;

pub use articles::read_article_data;
pub use counts::read_word_counts;
pub use gazetteer::read_world_gazetteer;
pub use geowords::directory_files;
pub use geowords::read_documents;
pub use stopwords::read_stopwords;

use std::time::Duration;
use std::time::Instant;

/// Wall-clock budget for one loading stage. When the budget runs out
/// the loader stops where it is; whatever loaded so far stays
/// self-consistent.
pub struct StageBudget {
    deadline: Option<Instant>,
}

impl StageBudget {
    pub fn new(seconds: Option<u64>) -> Self {
        Self {
            deadline: seconds.map(|s| Instant::now() + Duration::from_secs(s)),
        }
    }

    pub fn exhausted(&self) -> bool {
        self.deadline.map(|d| Instant::now() >= d).unwrap_or(false)
    }
}
