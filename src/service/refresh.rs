//! The price-refresh pipeline.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::domain::estimator::trimmed_median;
use crate::domain::price_history::merge_price_point;
use crate::domain::{Provenance, SetNumber, StoreListing};
use crate::error::CatalogError;
use crate::marketplace::MarketplaceClient;
use crate::persistence::CatalogStore;

/// Maximum listings returned on a refresh response.
const TOP_LISTINGS: usize = 15;

/// Result of one refresh run, handed to the response layer.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    /// Robust central price estimate.
    pub median_price: f64,
    /// Up to [`TOP_LISTINGS`] listings, ascending by price.
    pub listings: Vec<StoreListing>,
    /// Real vs synthetic data marker.
    pub provenance: Provenance,
    /// Present when the marketplace fetch fell back to synthetic data.
    pub fallback_reason: Option<String>,
}

/// Orchestrates one refresh: load the item, fetch marketplace data,
/// estimate, merge the history, persist, and shape the listing set.
#[derive(Debug, Clone)]
pub struct RefreshService {
    store: Arc<CatalogStore>,
    marketplace: MarketplaceClient,
}

impl RefreshService {
    /// Creates a new `RefreshService`.
    #[must_use]
    pub fn new(store: Arc<CatalogStore>, marketplace: MarketplaceClient) -> Self {
        Self { store, marketplace }
    }

    /// Runs the refresh pipeline for one catalog item.
    ///
    /// Two concurrent refreshes of the same set race on the history
    /// read-modify-write; the later write wins and may drop the other's
    /// appended point. Accepted for now: refreshes are manual, and the
    /// chart only needs day granularity.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::SetNotFound`] for an unknown set number,
    /// [`CatalogError::NoPriceData`] when the fetch yields zero usable
    /// prices, or a [`CatalogError::PersistenceError`] on database
    /// failure after retry exhaustion.
    pub async fn refresh(&self, number: &SetNumber) -> Result<RefreshOutcome, CatalogError> {
        let row = self
            .store
            .find_by_number(number)
            .await?
            .ok_or_else(|| CatalogError::SetNotFound(number.to_string()))?;

        let fetch = self.marketplace.fetch(number, Some(row.name.as_str())).await;
        if fetch.prices.is_empty() {
            return Err(CatalogError::NoPriceData(number.to_string()));
        }

        let median_price = trimmed_median(&fetch.prices);
        let history = merge_price_point(row.price_history.as_ref(), median_price);
        self.store.update_price(number, median_price, &history).await?;

        let mut listings = fetch.listings;
        listings.sort_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal));
        listings.truncate(TOP_LISTINGS);

        tracing::info!(
            set_number = %number,
            median_price,
            source = ?fetch.provenance,
            history_len = history.len(),
            "price refresh completed"
        );

        Ok(RefreshOutcome {
            median_price,
            listings,
            provenance: fetch.provenance,
            fallback_reason: fetch.fallback_reason,
        })
    }
}
