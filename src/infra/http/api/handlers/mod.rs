//! API handlers organized by resource type.
//!
//! Path identifiers arrive as raw strings and are parsed here, so a malformed id
//! produces the same 404 body the store would report for it.

mod dishes;
mod menus;
mod submenus;
mod tree;

pub use dishes::*;
pub use menus::*;
pub use submenus::*;
pub use tree::*;

use axum::http::StatusCode;
use uuid::Uuid;

use crate::application::error::{CatalogError, parse_id};
use crate::application::repos::RepoError;

use super::error::ApiError;

pub(crate) fn path_id(raw: &str) -> Result<Uuid, ApiError> {
    parse_id(raw).map_err(catalog_to_api)
}

pub(crate) fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::Duplicate { constraint } => {
            ApiError::conflict("Duplicate record").with_diagnostic(constraint)
        }
        RepoError::ForeignKey { constraint } => {
            ApiError::not_found("referenced record not found").with_diagnostic(constraint)
        }
        RepoError::NotFound => ApiError::not_found("resource not found"),
        RepoError::InvalidInput { message } => ApiError::not_found(message),
        RepoError::Integrity { message } => {
            ApiError::conflict("Integrity constraint violated").with_diagnostic(message)
        }
        RepoError::Timeout => ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "Database timeout"),
        RepoError::Persistence(message) => {
            ApiError::internal("Persistence error").with_diagnostic(message)
        }
    }
}

pub(crate) fn catalog_to_api(err: CatalogError) -> ApiError {
    match err {
        CatalogError::NotFound(_) | CatalogError::MalformedId { .. } => {
            ApiError::not_found(err.to_string())
        }
        CatalogError::Conflict(_) => ApiError::conflict(err.to_string()),
        CatalogError::Validation(_) => ApiError::bad_request(err.to_string()),
        CatalogError::Repo(repo) => repo_to_api(repo),
    }
}
