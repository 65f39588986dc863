use thiserror::Error;

use super::types::EntityKind;

/// Field-level validation failures raised before any store or cache access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("price is not digits")]
    InvalidPrice { raw: String },
    #[error("{entity} title must not be empty")]
    EmptyTitle { entity: EntityKind },
}

impl DomainError {
    pub fn invalid_price(raw: impl Into<String>) -> Self {
        Self::InvalidPrice { raw: raw.into() }
    }

    pub fn empty_title(entity: EntityKind) -> Self {
        Self::EmptyTitle { entity }
    }
}
