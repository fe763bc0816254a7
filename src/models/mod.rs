// src/models/mod.rs
pub mod asset;
pub mod chat;
pub mod domain;

pub use asset::{validate_asset, Asset, AssetDraft, AssetInput, AssetWithDomain};
pub use chat::{ChatMessage, MessageRole};
pub use domain::{validate_domain, Domain, DomainDraft, DomainInput};
