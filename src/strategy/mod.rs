pub mod document;
pub mod toponym;

pub use document::DocumentStrategy;
pub use toponym::adjusted_incoming_links;
pub use toponym::ToponymStrategy;
