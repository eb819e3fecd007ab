//! Service layer: business logic orchestration.
//!
//! [`CatalogService`] handles catalog reads and bulk imports;
//! [`RefreshService`] runs the price-refresh pipeline (marketplace fetch,
//! estimation, history merge, persistence).

pub mod catalog;
pub mod refresh;

pub use catalog::CatalogService;
pub use refresh::RefreshService;
