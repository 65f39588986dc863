use super::error::DomainError;
use super::types::EntityKind;

/// Trim a title and reject it when nothing is left.
pub fn normalize_title(entity: EntityKind, raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::empty_title(entity));
    }
    Ok(trimmed.to_string())
}
