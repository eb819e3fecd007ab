//! Database row types for the catalog.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// A catalog row from the `lego_sets` table.
///
/// `price_history` is carried as raw JSON here; shape validation happens
/// in [`crate::domain::price_history`] on every read.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SetRow {
    /// External set number; immutable primary key.
    pub set_number: String,
    /// Display name.
    pub name: String,
    /// Top-level taxonomy label.
    pub theme: String,
    /// Optional second-level taxonomy label.
    pub sub_theme: Option<String>,
    /// Release year.
    pub year: i32,
    /// Minifigure count, when known.
    pub minifigs: Option<i32>,
    /// Image reference (CDN or object-storage URL).
    pub image_url: Option<String>,
    /// Most recent price estimate; kept consistent with the last history
    /// point by the refresh pipeline.
    pub last_price: Option<f64>,
    /// Raw stored price history (JSONB), validated on read.
    pub price_history: Option<Value>,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Descriptive fields for a bulk-import upsert.
///
/// Deliberately excludes `last_price` and `price_history`: imports may
/// overwrite every descriptive field but never touch pricing state.
#[derive(Debug, Clone)]
pub struct NewSet {
    /// External set number; the upsert key.
    pub set_number: String,
    /// Display name.
    pub name: String,
    /// Top-level taxonomy label.
    pub theme: String,
    /// Optional second-level taxonomy label.
    pub sub_theme: Option<String>,
    /// Release year.
    pub year: i32,
    /// Minifigure count, when known.
    pub minifigs: Option<i32>,
    /// Image reference, already uploaded/resolved by the import tooling.
    pub image_url: Option<String>,
}
