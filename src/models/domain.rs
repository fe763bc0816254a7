// src/models/domain.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::ValidationErrors;

/// A subject area that groups related assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Domain {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Form input for creating or updating a domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainInput {
    pub name: String,
}

impl DomainInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A validated change-set, ready for the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainDraft {
    pub name: String,
}

/// Pure validation: either the draft to commit or the field errors to
/// render. Blank means empty after trimming; the stored value keeps the
/// input as typed.
pub fn validate_domain(input: &DomainInput) -> Result<DomainDraft, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if input.name.trim().is_empty() {
        errors.add("name", "can't be blank");
    }
    if errors.is_empty() {
        Ok(DomainDraft {
            name: input.name.clone(),
        })
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_non_blank_name() {
        let draft = validate_domain(&DomainInput::new("Hydrology")).unwrap();
        assert_eq!(draft.name, "Hydrology");
    }

    #[test]
    fn keeps_surrounding_whitespace_when_otherwise_valid() {
        let draft = validate_domain(&DomainInput::new("  Hydrology ")).unwrap();
        assert_eq!(draft.name, "  Hydrology ");
    }

    #[test]
    fn rejects_an_empty_name() {
        let errors = validate_domain(&DomainInput::new("")).unwrap_err();
        assert_eq!(errors.on("name"), ["can't be blank"]);
    }

    #[test]
    fn rejects_a_whitespace_only_name() {
        let errors = validate_domain(&DomainInput::new("   \t")).unwrap_err();
        assert_eq!(errors.on("name"), ["can't be blank"]);
    }
}
