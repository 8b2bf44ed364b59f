mod builtin;
pub mod synthetic;
mod types;

pub use builtin::Catalog;
pub use synthetic::{synthesize, tle_checksum};
pub use types::{CatalogEntry, ElementSet, Status};
