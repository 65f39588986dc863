use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::Response;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    application::repos::RepoError,
    domain::{error::DomainError, types::EntityKind},
    infra::error::InfraError,
};

/// Diagnostic chain attached to error responses for the logging middleware.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn from_message(
        source: &'static str,
        status: StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source,
            status,
            messages: vec![message.into()],
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

/// Failures surfaced by the menu, submenu and dish services.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{}", .0.not_found_message())]
    NotFound(EntityKind),
    #[error("{}", .0.conflict_message())]
    Conflict(EntityKind),
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("{message}")]
    MalformedId { message: String },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl CatalogError {
    pub fn malformed_id(raw: &str) -> Self {
        Self::MalformedId {
            message: format!("invalid input syntax for type uuid: \"{raw}\""),
        }
    }
}

/// Translate a store error raised by a create or update of `kind`.
pub(crate) fn write_error(kind: EntityKind, err: RepoError) -> CatalogError {
    match (kind, err) {
        (_, RepoError::Duplicate { .. }) => CatalogError::Conflict(kind),
        (EntityKind::Submenu, RepoError::ForeignKey { .. }) => {
            CatalogError::Conflict(EntityKind::Submenu)
        }
        (EntityKind::Dish, RepoError::ForeignKey { .. }) => {
            CatalogError::NotFound(EntityKind::Submenu)
        }
        (_, other) => CatalogError::Repo(other),
    }
}

/// Parse a path identifier, reporting the same message Postgres gives for bad uuid literals.
pub fn parse_id(raw: &str) -> Result<Uuid, CatalogError> {
    Uuid::parse_str(raw).map_err(|_| CatalogError::malformed_id(raw))
}

/// Process-level failures reported by the binary before exiting.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}
