pub mod record;
pub mod title;

pub use record::{BibDatabase, BibRecord};
pub use title::{extract_title, normalize_title};
