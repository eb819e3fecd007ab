//! # brickdex
//!
//! REST API for a collectible brick-set catalog with marketplace price
//! aggregation.
//!
//! The service stores set metadata in PostgreSQL, fetches current
//! listings from the Taobao affiliate open-platform on demand, reduces
//! them to an outlier-trimmed median estimate, and appends the estimate
//! to a per-set price-history series used for charting. When the
//! marketplace is unconfigured or unavailable the fetch degrades to
//! synthetic data tagged with a provenance marker instead of failing.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── CatalogService / RefreshService (service/)
//!     │       │
//!     │       ├── MarketplaceClient (marketplace/)  ── Taobao gateway
//!     │       └── Domain logic (domain/)            ── estimator, history
//!     │
//!     └── CatalogStore (persistence/)               ── PostgreSQL + retry
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod marketplace;
pub mod persistence;
pub mod service;
