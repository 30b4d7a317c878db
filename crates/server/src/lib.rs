//! flagpress-server: HTTP distribution of published configuration documents.
//!
//! Endpoints:
//! - GET /configuration-files/{key}/config_v6.json - current document, ETag aware
//! - GET /configuration-files/{key}/config_v5.json - legacy document, ETag aware
//! - GET /health                                   - Server status
//!
//! Every other path answers a JSON 404. CORS preflights (OPTIONS with both
//! `Origin` and `Access-Control-Request-Method`) are answered by the CORS
//! layer; any other OPTIONS is a plain non-GET request.

mod handlers;
mod middleware;

use std::sync::Arc;

use axum::http::{header, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{any, get};
use axum::{middleware as axum_middleware, Json, Router};
use flagpress_core::{FlagSet, PublishError, Registry};
use flagpress_model::Preferences;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use self::handlers::{handle_configuration_file, handle_health, handle_not_found};
use self::middleware::route_plain_options;

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(serde_json::json!({"error": message})))
}

/// Serves the documents of one [`Registry`].
///
/// Each handler owns its registry; several handlers in one process do not
/// share state. Clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct DistributionHandler {
    registry: Arc<Registry>,
}

impl DistributionHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Compile `flags` and make them the document served under `key`.
    pub fn publish(&self, key: &str, flags: &FlagSet) -> Result<String, PublishError> {
        self.registry.publish(key, flags)
    }

    pub fn publish_with(
        &self,
        key: &str,
        flags: &FlagSet,
        preferences: Option<Preferences>,
    ) -> Result<String, PublishError> {
        self.registry.publish_with(key, flags, preferences)
    }

    /// Mark `key` as served before anything is published under it.
    pub fn reserve(&self, key: &str) -> Result<(), PublishError> {
        self.registry.reserve(key)
    }

    /// Build the axum router for this handler.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET])
            .allow_headers([header::IF_NONE_MATCH])
            .expose_headers([header::ETAG]);

        let routes = Router::new()
            .route("/health", get(handle_health))
            .route(
                "/configuration-files/{key}/{document}",
                any(handle_configuration_file),
            )
            .fallback(handle_not_found)
            .with_state(Arc::clone(&self.registry));

        routes
            .clone()
            .layer(cors)
            .layer(axum_middleware::from_fn_with_state(
                routes,
                route_plain_options,
            ))
            .layer(TraceLayer::new_for_http())
    }
}
