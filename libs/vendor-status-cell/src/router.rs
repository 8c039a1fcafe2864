// =====================================================================================
// VENDOR STATUS CELL ROUTER
// =====================================================================================

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::handlers::{
    get_notification_config, get_single_vendor_status, get_vendor_status, list_slack_channels,
    update_notification_config, VendorStatusHandlers,
};
use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

pub fn create_vendor_status_router(config: Arc<AppConfig>) -> Router {
    let handlers = Arc::new(VendorStatusHandlers::new(&config));
    vendor_status_routes(config, handlers)
}

/// Admin routes over prebuilt handlers. Preflight requests are answered by
/// the CORS layer before authentication or any probe runs.
pub fn vendor_status_routes(config: Arc<AppConfig>, handlers: Arc<VendorStatusHandlers>) -> Router {
    Router::new()
        .route("/admin/status", get(get_vendor_status).post(get_vendor_status))
        .route("/admin/status/{vendor}", get(get_single_vendor_status))
        .route(
            "/admin/notifications/config",
            get(get_notification_config).patch(update_notification_config),
        )
        .route("/admin/notifications/slack/channels", get(list_slack_channels))
        .route_layer(middleware::from_fn_with_state(config, auth_middleware))
        .layer(cors_layer())
        .with_state(handlers)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("apikey"),
            HeaderName::from_static("x-client-info"),
        ])
}
