// =====================================================================================
// VENDOR STATUS CELL HANDLERS
// =====================================================================================

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{json, Value};
use tracing::{error, info, instrument};

use shared_config::AppConfig;
use shared_database::{http_client, SupabaseClient};
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{
    NotificationConfigUpdate, NotificationConfigView, ServiceStatus, SlackChannel, StatusReport,
};
use crate::services::probes::SupabaseIntegrationDirectory;
use crate::services::{AdminAuthService, SlackWorkspaceService, StatusStore, VendorStatusMonitor};

pub struct VendorStatusHandlers {
    monitor: Arc<VendorStatusMonitor>,
    store: Arc<dyn StatusStore>,
    admin_auth: AdminAuthService,
    slack: SlackWorkspaceService,
}

impl VendorStatusHandlers {
    pub fn new(config: &AppConfig) -> Self {
        let supabase = Arc::new(SupabaseClient::new(config));
        let monitor = Arc::new(VendorStatusMonitor::from_config(config, supabase.clone()));
        let slack = SlackWorkspaceService::new(
            http_client(config.probe_timeout()),
            Arc::new(SupabaseIntegrationDirectory::new(supabase.clone())),
        );

        Self::from_parts(monitor, AdminAuthService::new(supabase), slack)
    }

    pub fn from_parts(
        monitor: Arc<VendorStatusMonitor>,
        admin_auth: AdminAuthService,
        slack: SlackWorkspaceService,
    ) -> Self {
        Self {
            store: monitor.store(),
            monitor,
            admin_auth,
            slack,
        }
    }
}

// =====================================================================================
// STATUS ENDPOINTS
// =====================================================================================

#[instrument(skip(handlers, user), fields(user_id = %user.id))]
pub async fn get_vendor_status(
    State(handlers): State<Arc<VendorStatusHandlers>>,
    Extension(user): Extension<User>,
) -> Result<Json<StatusReport>, AppError> {
    let admin = handlers.admin_auth.require_admin(&user).await?;

    let outcome = handlers.monitor.check_all().await;

    info!(
        admin_id = %admin.id,
        overall = %outcome.report.overall,
        transitions = outcome.transitions.len(),
        notified = outcome.notified,
        "Vendor status requested"
    );

    Ok(Json(outcome.report))
}

#[instrument(skip(handlers, user), fields(user_id = %user.id))]
pub async fn get_single_vendor_status(
    State(handlers): State<Arc<VendorStatusHandlers>>,
    Extension(user): Extension<User>,
    Path(vendor): Path<String>,
) -> Result<Json<ServiceStatus>, AppError> {
    handlers.admin_auth.require_admin(&user).await?;

    handlers
        .monitor
        .check_vendor(&vendor)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Unknown vendor: {}", vendor)))
}

// =====================================================================================
// NOTIFICATION SETTINGS ENDPOINTS
// =====================================================================================

#[instrument(skip(handlers, user), fields(user_id = %user.id))]
pub async fn get_notification_config(
    State(handlers): State<Arc<VendorStatusHandlers>>,
    Extension(user): Extension<User>,
) -> Result<Json<NotificationConfigView>, AppError> {
    handlers.admin_auth.require_admin(&user).await?;

    let config = match handlers.store.load().await {
        Ok(Some(config)) => config,
        Ok(None) => return Err(AppError::NotFound("Notification config not found".to_string())),
        Err(e) => {
            error!("Failed to load notification config: {}", e);
            return Err(AppError::Database(e.to_string()));
        }
    };

    let slack = handlers.slack.connection().await;

    Ok(Json(NotificationConfigView {
        config,
        slack_connected: slack.connected,
        slack_workspace: slack.workspace,
    }))
}

#[instrument(skip(handlers, user, update), fields(user_id = %user.id))]
pub async fn update_notification_config(
    State(handlers): State<Arc<VendorStatusHandlers>>,
    Extension(user): Extension<User>,
    Json(update): Json<NotificationConfigUpdate>,
) -> Result<Json<Value>, AppError> {
    let admin = handlers.admin_auth.require_admin(&user).await?;

    if update.is_empty() {
        return Err(AppError::BadRequest("No notification settings provided".to_string()));
    }

    handlers.store.update_channels(&update).await.map_err(|e| {
        error!("Failed to update notification config: {}", e);
        AppError::Database(e.to_string())
    })?;

    info!(admin_id = %admin.id, "Vendor status notification settings updated");
    Ok(Json(json!({ "success": true })))
}

#[instrument(skip(handlers, user), fields(user_id = %user.id))]
pub async fn list_slack_channels(
    State(handlers): State<Arc<VendorStatusHandlers>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    handlers.admin_auth.require_admin(&user).await?;

    let channels: Vec<SlackChannel> = handlers
        .slack
        .list_channels()
        .await
        .map_err(|e| {
            error!("Failed to list Slack channels: {}", e);
            AppError::ExternalService(e.to_string())
        })?
        .ok_or_else(|| AppError::BadRequest("No Slack integration connected".to_string()))?;

    Ok(Json(json!({ "channels": channels })))
}
