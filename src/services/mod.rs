pub mod scholar_search;
pub mod selectors;
pub mod unresolved_writer;

pub use scholar_search::ScholarSearch;
pub use unresolved_writer::{Unresolved, UnresolvedReason, UnresolvedWriter};
