// src/services/mod.rs
pub mod catalog;
pub mod events;

pub use catalog::CatalogService;
pub use events::{CatalogEvent, CatalogEvents, ChangeKind};
