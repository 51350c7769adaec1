use crate::geo::Coord;

/// One word of an evaluation document. Toponyms carry their
/// ground-truth coordinate and, once prepared, a context window of
/// nearby non-stopword words with their offsets from the toponym.
#[derive(Debug, Clone)]
pub struct GeogWord {
    pub word: String,
    pub is_stop: bool,
    pub is_toponym: bool,
    pub coord: Option<Coord>,
    pub location: Option<String>,
    pub context: Option<Vec<(i32, String)>>,
    pub document: Option<String>,
}

impl GeogWord {
    pub fn new(word: String) -> Self {
        Self {
            word,
            is_stop: false,
            is_toponym: false,
            coord: None,
            location: None,
            context: None,
            document: None,
        }
    }
}
