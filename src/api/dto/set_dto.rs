//! Catalog-related DTOs for search, detail, and bulk import.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::PricePoint;
use crate::persistence::models::{NewSet, SetRow};

/// Query parameters for `GET /sets`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Free-text query; blank or absent returns the most recently
    /// created items.
    #[serde(default)]
    pub q: Option<String>,
}

/// One catalog item in a search result list.
#[derive(Debug, Serialize, ToSchema)]
pub struct SetSummaryDto {
    /// External set number.
    pub set_number: String,
    /// Display name.
    pub name: String,
    /// Top-level taxonomy label.
    pub theme: String,
    /// Release year.
    pub year: i32,
    /// Image reference, when present.
    pub image_url: Option<String>,
    /// Most recent price estimate, when present.
    pub last_price: Option<f64>,
}

impl From<SetRow> for SetSummaryDto {
    fn from(row: SetRow) -> Self {
        Self {
            set_number: row.set_number,
            name: row.name,
            theme: row.theme,
            year: row.year,
            image_url: row.image_url,
            last_price: row.last_price,
        }
    }
}

/// Response body for `GET /sets`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    /// The query that produced these results, when one was given.
    pub query: Option<String>,
    /// Number of results returned.
    pub count: usize,
    /// Matching catalog items.
    pub results: Vec<SetSummaryDto>,
}

/// Full catalog item for `GET /sets/{set_number}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SetDetailResponse {
    /// External set number.
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
    /// Image reference, when present.
    pub image_url: Option<String>,
    /// Most recent price estimate, when present.
    pub last_price: Option<f64>,
    /// Validated price history, oldest entry first.
    pub price_history: Vec<PricePoint>,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl SetDetailResponse {
    /// Builds the response from a stored row and its parsed history.
    #[must_use]
    pub fn from_row(row: SetRow, history: Vec<PricePoint>) -> Self {
        Self {
            set_number: row.set_number,
            name: row.name,
            theme: row.theme,
            sub_theme: row.sub_theme,
            year: row.year,
            minifigs: row.minifigs,
            image_url: row.image_url,
            last_price: row.last_price,
            price_history: history,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// One item in a `POST /sets/import` request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ImportSetDto {
    /// External set number; the upsert key.
    pub set_number: String,
    /// Display name.
    pub name: String,
    /// Top-level taxonomy label.
    pub theme: String,
    /// Optional second-level taxonomy label.
    #[serde(default)]
    pub sub_theme: Option<String>,
    /// Release year.
    pub year: i32,
    /// Minifigure count, when known.
    #[serde(default)]
    pub minifigs: Option<i32>,
    /// Image reference, already resolved by the import tooling.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<ImportSetDto> for NewSet {
    fn from(dto: ImportSetDto) -> Self {
        Self {
            set_number: dto.set_number.trim().to_string(),
            name: dto.name,
            theme: dto.theme,
            sub_theme: dto.sub_theme,
            year: dto.year,
            minifigs: dto.minifigs,
            image_url: dto.image_url,
        }
    }
}

/// Response body for `POST /sets/import`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ImportResponse {
    /// Rows upserted.
    pub imported: usize,
    /// Rows skipped (blank set number).
    pub skipped: usize,
}
