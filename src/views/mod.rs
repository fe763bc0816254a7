// src/views/mod.rs
pub mod resource;

pub use resource::{CatalogResource, ResourceView, ViewAction};

use crate::models::{Asset, Domain};

pub type DomainView = ResourceView<Domain>;
pub type AssetView = ResourceView<Asset>;
