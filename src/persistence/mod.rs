//! Persistence layer: PostgreSQL catalog storage with transient-failure
//! retry.
//!
//! [`postgres::CatalogStore`] is the only way the service touches the
//! database; every call it makes is routed through [`retry::with_retry`]
//! so callers never see an idle-connection reap or a network blip that a
//! reconnect-and-retry would have absorbed.

pub mod models;
pub mod postgres;
pub mod retry;

pub use postgres::CatalogStore;
pub use retry::RetryPolicy;
