//! Catalog reads and bulk import.

use std::sync::Arc;

use crate::domain::price_history::parse_price_history;
use crate::domain::{PricePoint, SetNumber};
use crate::error::CatalogError;
use crate::persistence::models::{NewSet, SetRow};
use crate::persistence::CatalogStore;

/// Page size for the empty-query landing list.
const RECENT_PAGE_SIZE: i64 = 24;
/// Result cap for keyword searches.
const SEARCH_RESULT_CAP: i64 = 50;

/// A catalog item with its history already validated and parsed.
#[derive(Debug, Clone)]
pub struct SetDetail {
    /// The stored row.
    pub row: SetRow,
    /// Clean price history (malformed stored elements dropped).
    pub history: Vec<PricePoint>,
}

/// Read and import operations over the catalog.
#[derive(Debug, Clone)]
pub struct CatalogService {
    store: Arc<CatalogStore>,
}

impl CatalogService {
    /// Creates a new `CatalogService`.
    #[must_use]
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self { store }
    }

    /// Searches the catalog.
    ///
    /// A blank query returns the most recently created items (landing
    /// page behavior); otherwise a case-insensitive substring match over
    /// set number, name, and theme, newest release year first.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError::PersistenceError`] on database failure.
    pub async fn search(&self, query: Option<&str>) -> Result<Vec<SetRow>, CatalogError> {
        let term = query.unwrap_or_default().trim();
        if term.is_empty() {
            self.store.recent(RECENT_PAGE_SIZE).await
        } else {
            self.store.search(term, SEARCH_RESULT_CAP).await
        }
    }

    /// Loads one catalog item with its parsed price history.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::SetNotFound`] for an unknown set number,
    /// or a [`CatalogError::PersistenceError`] on database failure.
    pub async fn get(&self, number: &SetNumber) -> Result<SetDetail, CatalogError> {
        let row = self
            .store
            .find_by_number(number)
            .await?
            .ok_or_else(|| CatalogError::SetNotFound(number.to_string()))?;
        let history = parse_price_history(row.price_history.as_ref());
        Ok(SetDetail { row, history })
    }

    /// Bulk-upserts catalog items keyed by set number.
    ///
    /// Rows with a blank set number are skipped and counted separately;
    /// a bad spreadsheet line must not abort the rest of the batch.
    /// Returns `(imported, skipped)`.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError::PersistenceError`] on database failure.
    pub async fn import(&self, items: Vec<NewSet>) -> Result<(usize, usize), CatalogError> {
        let mut imported = 0usize;
        let mut skipped = 0usize;
        for item in items {
            if item.set_number.trim().is_empty() {
                skipped += 1;
                continue;
            }
            self.store.upsert(&item).await?;
            imported += 1;
        }
        tracing::info!(imported, skipped, "bulk import finished");
        Ok((imported, skipped))
    }
}
