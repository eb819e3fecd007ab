//! Marketplace listing types and the fetch hand-off contract.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum stored length of a shop name, in characters.
pub const SHOP_NAME_MAX_CHARS: usize = 60;

/// A single marketplace offer for an item.
///
/// Listings are ephemeral: produced fresh by each fetch, returned on the
/// refresh response, and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoreListing {
    /// Shop display name, truncated to [`SHOP_NAME_MAX_CHARS`].
    pub shop_name: String,
    /// Offer price. Non-negative; `0.0` when the record carried no
    /// parseable price.
    pub price: f64,
    /// Clickable affiliate or search URL for the offer.
    pub affiliate_link: String,
}

impl StoreListing {
    /// Builds a listing, enforcing the shop-name length cap.
    #[must_use]
    pub fn new(shop_name: &str, price: f64, affiliate_link: String) -> Self {
        Self {
            shop_name: shop_name.chars().take(SHOP_NAME_MAX_CHARS).collect(),
            price: price.max(0.0),
            affiliate_link,
        }
    }
}

/// Where a [`FetchResult`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Live marketplace data.
    Taobao,
    /// Synthetic fallback data (marketplace unconfigured or unavailable).
    Mock,
}

/// Output contract of the marketplace fetch.
///
/// The fetch itself is infallible: every failure mode degrades to a
/// [`Provenance::Mock`] result carrying a human-readable reason, so
/// downstream consumers never special-case "no data".
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Raw observed prices feeding the estimator.
    pub prices: Vec<f64>,
    /// Listings for display, one per marketplace offer.
    pub listings: Vec<StoreListing>,
    /// Real vs synthetic data marker.
    pub provenance: Provenance,
    /// Present only when `provenance` is [`Provenance::Mock`]; explains
    /// why the live fetch was skipped or abandoned.
    pub fallback_reason: Option<String>,
}

impl FetchResult {
    /// Builds a result holding live marketplace data.
    #[must_use]
    pub fn live(prices: Vec<f64>, listings: Vec<StoreListing>) -> Self {
        Self {
            prices,
            listings,
            provenance: Provenance::Taobao,
            fallback_reason: None,
        }
    }
}
