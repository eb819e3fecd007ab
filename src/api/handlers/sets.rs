//! Catalog handlers: search, detail, bulk import.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    ImportResponse, ImportSetDto, KeyParams, SearchParams, SearchResponse, SetDetailResponse,
    SetSummaryDto,
};
use crate::app_state::AppState;
use crate::domain::SetNumber;
use crate::error::{CatalogError, ErrorResponse};

/// `GET /sets` — Search the catalog.
///
/// # Errors
///
/// Returns [`CatalogError`] on persistence failures.
#[utoipa::path(
    get,
    path = "/api/v1/sets",
    tag = "Sets",
    summary = "Search catalog items",
    description = "Case-insensitive substring search over set number, name, and theme. \
                   A blank query returns the most recently created items.",
    params(SearchParams),
    responses(
        (status = 200, description = "Search results", body = SearchResponse),
    )
)]
pub async fn search_sets(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, CatalogError> {
    let rows = state.catalog_service.search(params.q.as_deref()).await?;
    let results: Vec<SetSummaryDto> = rows.into_iter().map(SetSummaryDto::from).collect();

    Ok(Json(SearchResponse {
        query: params.q.filter(|q| !q.trim().is_empty()),
        count: results.len(),
        results,
    }))
}

/// `GET /sets/{set_number}` — Catalog item detail with parsed history.
///
/// # Errors
///
/// Returns [`CatalogError::SetNotFound`] if the set does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/sets/{set_number}",
    tag = "Sets",
    summary = "Get catalog item detail",
    description = "Returns the full catalog item including its validated price history.",
    params(
        ("set_number" = String, Path, description = "External set number"),
    ),
    responses(
        (status = 200, description = "Catalog item", body = SetDetailResponse),
        (status = 404, description = "Set not found", body = ErrorResponse),
    )
)]
pub async fn get_set(
    State(state): State<AppState>,
    Path(set_number): Path<String>,
) -> Result<impl IntoResponse, CatalogError> {
    let number = SetNumber::new(&set_number)?;
    let detail = state.catalog_service.get(&number).await?;
    Ok(Json(SetDetailResponse::from_row(detail.row, detail.history)))
}

/// `POST /sets/import` — Bulk-upsert catalog items.
///
/// # Errors
///
/// Returns [`CatalogError::Unauthorized`] on a bad API key and
/// [`CatalogError`] on persistence failures.
#[utoipa::path(
    post,
    path = "/api/v1/sets/import",
    tag = "Sets",
    summary = "Bulk-import catalog items",
    description = "Upserts items keyed by set number. Descriptive fields are overwritten; \
                   pricing state is never touched. Guarded by the API key when one is configured.",
    params(KeyParams),
    request_body = Vec<ImportSetDto>,
    responses(
        (status = 200, description = "Import summary", body = ImportResponse),
        (status = 401, description = "Missing or invalid API key", body = ErrorResponse),
    )
)]
pub async fn import_sets(
    State(state): State<AppState>,
    Query(params): Query<KeyParams>,
    headers: HeaderMap,
    Json(items): Json<Vec<ImportSetDto>>,
) -> Result<impl IntoResponse, CatalogError> {
    super::authorize(
        state.api_secret_key.as_deref(),
        &headers,
        params.key.as_deref(),
    )?;

    if items.is_empty() {
        return Err(CatalogError::InvalidRequest(
            "import body must contain at least one item".to_string(),
        ));
    }

    let (imported, skipped) = state
        .catalog_service
        .import(items.into_iter().map(Into::into).collect())
        .await?;

    Ok((StatusCode::OK, Json(ImportResponse { imported, skipped })))
}

/// Catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sets", get(search_sets))
        .route("/sets/import", post(import_sets))
        .route("/sets/{set_number}", get(get_set))
}
