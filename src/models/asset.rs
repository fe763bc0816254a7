// src/models/asset.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::ValidationErrors;
use crate::models::Domain;

/// A cataloged dataset. `domain_id` is a weak reference: the domain is
/// looked up on demand and may have been deleted out from under the asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Asset {
    pub id: i64,
    pub title: String,
    pub domain_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Form input for creating or updating an asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetInput {
    pub title: String,
    pub domain_id: Option<i64>,
}

impl AssetInput {
    pub fn new(title: impl Into<String>, domain_id: Option<i64>) -> Self {
        Self {
            title: title.into(),
            domain_id,
        }
    }
}

/// A validated change-set, ready for the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetDraft {
    pub title: String,
    pub domain_id: Option<i64>,
}

/// An asset joined with its domain; `None` when the asset is unassigned or
/// the referenced domain no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetWithDomain {
    pub asset: Asset,
    pub domain: Option<Domain>,
}

/// Pure validation mirroring [`crate::models::validate_domain`]: the title
/// must be non-blank, the domain reference passes through unchecked.
pub fn validate_asset(input: &AssetInput) -> Result<AssetDraft, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if input.title.trim().is_empty() {
        errors.add("title", "can't be blank");
    }
    if errors.is_empty() {
        Ok(AssetDraft {
            title: input.title.clone(),
            domain_id: input.domain_id,
        })
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_title_without_a_domain() {
        let draft = validate_asset(&AssetInput::new("Streamflow 2023", None)).unwrap();
        assert_eq!(draft.title, "Streamflow 2023");
        assert_eq!(draft.domain_id, None);
    }

    #[test]
    fn carries_the_domain_reference_through() {
        let draft = validate_asset(&AssetInput::new("Streamflow 2023", Some(7))).unwrap();
        assert_eq!(draft.domain_id, Some(7));
    }

    #[test]
    fn rejects_a_blank_title() {
        let errors = validate_asset(&AssetInput::new("  ", Some(1))).unwrap_err();
        assert_eq!(errors.on("title"), ["can't be blank"]);
        assert!(errors.on("domain_id").is_empty());
    }
}
