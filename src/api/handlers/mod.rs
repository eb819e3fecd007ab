//! REST endpoint handlers organized by resource.

pub mod prices;
pub mod sets;
pub mod system;

use axum::Router;
use axum::http::HeaderMap;

use crate::app_state::AppState;
use crate::error::CatalogError;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new().merge(sets::routes()).merge(prices::routes())
}

/// Enforces the optional API key on mutating endpoints.
///
/// The key may arrive as a `key` query parameter, an
/// `Authorization: Bearer` header, or an `x-api-key` header. When no key
/// is configured the endpoint is open.
pub(crate) fn authorize(
    configured: Option<&str>,
    headers: &HeaderMap,
    key_param: Option<&str>,
) -> Result<(), CatalogError> {
    let Some(expected) = configured else {
        return Ok(());
    };

    let provided = key_param
        .map(str::to_string)
        .or_else(|| {
            headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(str::to_string)
        })
        .or_else(|| {
            headers
                .get("x-api-key")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        });

    match provided {
        Some(key) if key == expected => Ok(()),
        _ => Err(CatalogError::Unauthorized),
    }
}
