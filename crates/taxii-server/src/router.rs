use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::handler;
use crate::media::require_taxii_accept;
use crate::state::AppState;

/// Build the axum router with every TAXII endpoint.
///
/// Authentication runs before Accept negotiation, so an unauthenticated
/// request is refused with 401 whatever it asks for. `body_limit` caps how
/// much of a request body is buffered; per-root limits are enforced by the
/// handler.
pub fn build_router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/taxii2/", get(handler::discovery))
        .route("/:api_root/", get(handler::api_root))
        .route("/:api_root/collections/", get(handler::collections))
        .route(
            "/:api_root/collections/:collection_id/",
            get(handler::collection),
        )
        .route(
            "/:api_root/collections/:collection_id/objects/",
            get(handler::objects).post(handler::add_objects),
        )
        .route(
            "/:api_root/collections/:collection_id/objects/:object_id/",
            get(handler::object).delete(handler::delete_object),
        )
        .route(
            "/:api_root/collections/:collection_id/objects/:object_id/versions/",
            get(handler::object_versions),
        )
        .route(
            "/:api_root/collections/:collection_id/manifest/",
            get(handler::manifest),
        )
        .route("/:api_root/status/:status_id/", get(handler::status))
        .layer(middleware::from_fn(require_taxii_accept))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
