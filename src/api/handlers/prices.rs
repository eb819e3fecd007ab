//! Price-refresh handler.

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{KeyParams, RefreshResponse};
use crate::app_state::AppState;
use crate::domain::SetNumber;
use crate::error::{CatalogError, ErrorResponse};

/// `POST /sets/{set_number}/refresh` — Refresh an item's market price.
///
/// Runs the full pipeline: marketplace fetch (or synthetic fallback),
/// trimmed-median estimate, history append, persistence. The response
/// carries the provenance tag so the UI can flag synthetic data.
///
/// # Errors
///
/// Returns [`CatalogError::Unauthorized`] on a bad API key,
/// [`CatalogError::SetNotFound`] for unknown sets, and
/// [`CatalogError::NoPriceData`] when no usable price was obtained.
#[utoipa::path(
    post,
    path = "/api/v1/sets/{set_number}/refresh",
    tag = "Prices",
    summary = "Refresh an item's market price",
    description = "Fetches current marketplace listings, computes the outlier-trimmed median, \
                   appends a price-history point dated today, and returns up to 15 listings \
                   sorted by price. Degrades to synthetic data instead of failing when the \
                   marketplace is unavailable.",
    params(
        ("set_number" = String, Path, description = "External set number"),
        KeyParams,
    ),
    responses(
        (status = 200, description = "Refresh outcome", body = RefreshResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
        (status = 404, description = "Set not found or no usable prices", body = ErrorResponse),
    )
)]
pub async fn refresh_price(
    State(state): State<AppState>,
    Path(set_number): Path<String>,
    Query(params): Query<KeyParams>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, CatalogError> {
    super::authorize(
        state.api_secret_key.as_deref(),
        &headers,
        params.key.as_deref(),
    )?;

    let number = SetNumber::new(&set_number)?;
    let outcome = state.refresh_service.refresh(&number).await?;
    Ok(Json(RefreshResponse::from(outcome)))
}

/// Price routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/sets/{set_number}/refresh", post(refresh_price))
}
