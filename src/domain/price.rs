//! Dish prices.
//!
//! Prices travel as strings on the wire and in storage. Any input that parses
//! as a finite decimal number is accepted and normalized to exactly two
//! fractional digits, so `"4"` becomes `"4.00"` and `"15.25621"` becomes `"15.26"`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(String);

impl Price {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let value: f64 = trimmed
            .parse()
            .map_err(|_| DomainError::invalid_price(raw))?;
        if !value.is_finite() {
            return Err(DomainError::invalid_price(raw));
        }
        Ok(Self(format!("{value:.2}")))
    }

    /// Wrap a value read back from storage, which is already normalized.
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
