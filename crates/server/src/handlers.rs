//! Route handlers: configuration files and health.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use flagpress_core::{Lookup, Registry};

use super::json_error;

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health(State(registry): State<Arc<Registry>>) -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "ok",
        "distributions": registry.len(),
    });
    (StatusCode::OK, Json(response))
}

/// /configuration-files/{key}/{document}
///
/// Routed for every method so that anything but GET gets a 405 with an
/// `Allow` header rather than the fallback 404.
pub(crate) async fn handle_configuration_file(
    State(registry): State<Arc<Registry>>,
    Path((key, document)): Path<(String, String)>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    if method != Method::GET {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, HeaderValue::from_static("GET"))],
        )
            .into_response();
    }

    let config = match registry.lookup(&key) {
        Lookup::Published(config) => config,
        Lookup::Missing => {
            return json_error(
                StatusCode::NOT_FOUND,
                &format!("distribution '{}' not found", key),
            )
            .into_response()
        }
        Lookup::Reserved => {
            tracing::error!(key = %key, "distribution requested before anything was published");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "distribution has no published configuration",
            )
            .into_response();
        }
    };

    let rendered = match config.document(&document) {
        Some(rendered) => rendered,
        None => {
            return json_error(
                StatusCode::NOT_FOUND,
                &format!("document '{}' not found for '{}'", document, key),
            )
            .into_response()
        }
    };

    let etag = match HeaderValue::from_str(&rendered.etag) {
        Ok(v) => v,
        Err(_) => {
            tracing::error!(key = %key, etag = %rendered.etag, "fingerprint is not a valid header value");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "invalid fingerprint")
                .into_response();
        }
    };

    // Exact comparison only: no weak validators, no lists.
    if headers.get(header::IF_NONE_MATCH) == Some(&etag) {
        tracing::debug!(key = %key, document = %document, "not modified");
        return (StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response();
    }

    (
        StatusCode::OK,
        [
            (header::ETAG, etag),
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            ),
        ],
        rendered.bytes.clone(),
    )
        .into_response()
}
