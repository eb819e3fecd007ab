//! Price-refresh DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Provenance, StoreListing};
use crate::service::refresh::RefreshOutcome;

/// Query parameters for endpoints guarded by the optional API key.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct KeyParams {
    /// API key; may also arrive as `Authorization: Bearer` or `x-api-key`.
    #[serde(default)]
    pub key: Option<String>,
}

/// Response body for `POST /sets/{set_number}/refresh`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RefreshResponse {
    /// Always `true` on a 200; failures use the structured error body.
    pub success: bool,
    /// Robust central price estimate written to the catalog.
    pub median_price: f64,
    /// Up to 15 listings, ascending by price.
    pub stores: Vec<StoreListing>,
    /// Whether the data came from the live marketplace or the synthetic
    /// fallback.
    pub source: Provenance,
    /// Why the fetch fell back to synthetic data, when it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Human-readable status line.
    pub message: String,
}

impl From<RefreshOutcome> for RefreshResponse {
    fn from(outcome: RefreshOutcome) -> Self {
        let message = match outcome.provenance {
            Provenance::Taobao => "price updated from marketplace".to_string(),
            Provenance::Mock => "price updated from synthetic data".to_string(),
        };
        Self {
            success: true,
            median_price: outcome.median_price,
            stores: outcome.listings,
            source: outcome.provenance,
            reason: outcome.fallback_reason,
            message,
        }
    }
}
