// =====================================================================================
// ADMIN NOTIFICATION DISPATCH
// =====================================================================================

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use shared_config::AppConfig;
use shared_database::http_client;

use crate::models::{
    AdminNotification, NotificationConfig, VendorStatusError, VENDOR_STATUS_CATEGORY,
    VENDOR_STATUS_TITLE,
};

/// Hands an alert to the multi-channel admin notification sender.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn dispatch(&self, notification: &AdminNotification) -> Result<(), VendorStatusError>;
}

/// Posts to the `admin-send-notification` function with the service-role key.
pub struct HttpNotifier {
    client: Client,
    url: String,
    service_key: String,
}

impl HttpNotifier {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: http_client(config.probe_timeout()),
            url: config.notification_url.clone(),
            service_key: config.supabase_service_role_key.clone(),
        }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    #[instrument(skip(self, notification), fields(category = %notification.category))]
    async fn dispatch(&self, notification: &AdminNotification) -> Result<(), VendorStatusError> {
        if self.url.is_empty() {
            return Err(VendorStatusError::Notification(
                "Notification URL is not configured".to_string(),
            ));
        }

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.service_key)
            .json(notification)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VendorStatusError::Notification(format!("HTTP {}: {}", status.as_u16(), body)));
        }

        debug!("Notification dispatched");
        Ok(())
    }
}

/// True when there is something to report and someone to report it to.
pub fn should_notify(transitions: &[String], config: Option<&NotificationConfig>) -> bool {
    !transitions.is_empty() && config.is_some_and(NotificationConfig::any_channel_enabled)
}

pub fn vendor_status_notification(transitions: &[String]) -> AdminNotification {
    AdminNotification {
        category: VENDOR_STATUS_CATEGORY.to_string(),
        title: VENDOR_STATUS_TITLE.to_string(),
        body: transitions.join("\n"),
    }
}
