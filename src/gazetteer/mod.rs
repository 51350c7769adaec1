pub mod gazetteer;
pub mod location;
pub mod matcher;

pub use gazetteer::Gazetteer;
pub use location::Division;
pub use location::DivisionId;
pub use location::Locality;
pub use location::LocalityId;
pub use location::Location;
pub use matcher::find_match_for_division;
pub use matcher::find_match_for_locality;
pub use matcher::match_locality_by_ring;
