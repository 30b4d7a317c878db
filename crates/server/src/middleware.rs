//! Request routing ahead of the CORS layer.

use axum::extract::{Request, State};
use axum::http::{header, Method};
use axum::middleware::Next;
use axum::response::Response;
use axum::Router;
use tower::ServiceExt;

/// An OPTIONS request carrying both `Origin` and
/// `Access-Control-Request-Method`.
pub(crate) fn is_preflight(request: &Request) -> bool {
    request.method() == Method::OPTIONS
        && request.headers().contains_key(header::ORIGIN)
        && request
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD)
}

/// `CorsLayer` answers every OPTIONS request itself. Only real preflights
/// may reach it; any other OPTIONS goes straight to `routes`, where it is
/// treated like any other non-GET method.
pub(crate) async fn route_plain_options(
    State(routes): State<Router>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS && !is_preflight(&request) {
        return match routes.oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };
    }
    next.run(request).await
}
