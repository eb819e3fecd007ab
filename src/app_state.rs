//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::{CatalogService, RefreshService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Catalog reads and bulk import.
    pub catalog_service: Arc<CatalogService>,
    /// Price-refresh pipeline.
    pub refresh_service: Arc<RefreshService>,
    /// Optional key guarding the refresh and import endpoints.
    pub api_secret_key: Option<String>,
}
