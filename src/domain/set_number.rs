//! Type-safe catalog identifier.
//!
//! [`SetNumber`] is a newtype wrapper around the external set number
//! (e.g. `"10246-1"`) providing type safety so catalog codes cannot be
//! confused with other strings flowing through the pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Unique identifier for a catalog item.
///
/// Wraps the externally assigned set number. Assigned once at import time
/// and immutable thereafter. Used as the primary key in the `lego_sets`
/// table and as the seed of the marketplace search keyword.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetNumber(String);

impl SetNumber {
    /// Creates a `SetNumber` from a raw string, trimming surrounding
    /// whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidRequest`] when the trimmed value is
    /// empty.
    pub fn new(raw: &str) -> Result<Self, CatalogError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::InvalidRequest(
                "set number must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the set number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the number with any trailing `-1` variant marker removed.
    ///
    /// Marketplace keyword search chokes on the variant suffix, so
    /// `"10246-1"` searches as `"10246"`.
    #[must_use]
    pub fn search_base(&self) -> &str {
        self.0.strip_suffix("-1").unwrap_or(&self.0)
    }
}

impl fmt::Display for SetNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SetNumber> for String {
    fn from(number: SetNumber) -> Self {
        number.0
    }
}
