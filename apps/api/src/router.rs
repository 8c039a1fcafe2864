use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;
use vendor_status_cell::create_vendor_status_router;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Magpipe vendor status API is running!" }))
        .merge(create_vendor_status_router(state))
}
