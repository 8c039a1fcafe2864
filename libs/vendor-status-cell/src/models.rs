// =====================================================================================
// VENDOR STATUS CELL MODELS
// =====================================================================================

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed id of the singleton `admin_notification_config` row.
pub const NOTIFICATION_CONFIG_ID: &str = "00000000-0000-0000-0000-000000000100";

/// Category tag understood by the admin notification dispatcher.
pub const VENDOR_STATUS_CATEGORY: &str = "vendor_status";

pub const VENDOR_STATUS_TITLE: &str = "Vendor Status Change";

/// Normalized health of one vendor. Ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorStatus {
    Operational,
    Degraded,
    Down,
}

impl VendorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorStatus::Operational => "operational",
            VendorStatus::Degraded => "degraded",
            VendorStatus::Down => "down",
        }
    }

    /// Maps a statuspage.io `status.indicator` value.
    pub fn from_indicator(indicator: &str) -> Self {
        match indicator {
            "critical" | "major" => VendorStatus::Down,
            "minor" => VendorStatus::Degraded,
            _ => VendorStatus::Operational,
        }
    }
}

impl fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub name: String,
    pub status: VendorStatus,
    #[serde(rename = "latency", skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "statusUrl", skip_serializing_if = "Option::is_none")]
    pub status_page_url: Option<String>,
}

impl ServiceStatus {
    pub fn new(name: &str, status: VendorStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
            latency_ms: None,
            message: None,
            status_page_url: None,
        }
    }

    pub fn operational(name: &str) -> Self {
        Self::new(name, VendorStatus::Operational)
    }

    pub fn degraded(name: &str, message: impl Into<String>) -> Self {
        Self::new(name, VendorStatus::Degraded).with_message(message)
    }

    pub fn down(name: &str, message: impl Into<String>) -> Self {
        Self::new(name, VendorStatus::Down).with_message(message)
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = Some(latency_ms);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_status_url(mut self, url: Option<&str>) -> Self {
        self.status_page_url = url.map(str::to_string);
        self
    }
}

/// Outcome of one aggregator run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub overall: VendorStatus,
    pub services: Vec<ServiceStatus>,
    pub checked_at: DateTime<Utc>,
}

/// Vendor name to last observed status string.
pub type VendorStatusCache = HashMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionSet {
    /// `"<name>: <previous> -> <current>"`, in probe order.
    pub transitions: Vec<String>,
    pub snapshot: VendorStatusCache,
}

/// The singleton `admin_notification_config` row, vendor status columns only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub id: String,
    #[serde(default)]
    pub sms_phone: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub slack_channel: Option<String>,
    #[serde(default)]
    pub vendor_status_sms: Option<bool>,
    #[serde(default)]
    pub vendor_status_email: Option<bool>,
    #[serde(default)]
    pub vendor_status_slack: Option<bool>,
    #[serde(default)]
    pub vendor_status_cache: Option<VendorStatusCache>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl NotificationConfig {
    pub fn sms_enabled(&self) -> bool {
        self.vendor_status_sms.unwrap_or(false)
    }

    pub fn email_enabled(&self) -> bool {
        self.vendor_status_email.unwrap_or(false)
    }

    pub fn slack_enabled(&self) -> bool {
        self.vendor_status_slack.unwrap_or(false)
    }

    pub fn any_channel_enabled(&self) -> bool {
        self.sms_enabled() || self.email_enabled() || self.slack_enabled()
    }

    pub fn cache(&self) -> VendorStatusCache {
        self.vendor_status_cache.clone().unwrap_or_default()
    }
}

/// Partial update of the vendor status notification settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfigUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_status_sms: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_status_email: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_status_slack: Option<bool>,
}

impl NotificationConfigUpdate {
    pub fn is_empty(&self) -> bool {
        self.sms_phone.is_none()
            && self.email_address.is_none()
            && self.slack_channel.is_none()
            && self.vendor_status_sms.is_none()
            && self.vendor_status_email.is_none()
            && self.vendor_status_slack.is_none()
    }
}

/// Notification settings row plus the Slack connection shown next to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationConfigView {
    pub config: NotificationConfig,
    pub slack_connected: bool,
    pub slack_workspace: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlackConnection {
    pub connected: bool,
    pub workspace: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackChannel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_private: bool,
}

/// Body posted to the admin notification dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminNotification {
    pub category: String,
    pub title: String,
    pub body: String,
}

/// What a full status check produced, beyond the report itself.
#[derive(Debug, Clone)]
pub struct StatusCheckOutcome {
    pub report: StatusReport,
    pub transitions: Vec<String>,
    pub notified: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum VendorStatusError {
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Notification dispatch failed: {0}")]
    Notification(String),
    #[error("Timed out during {0}")]
    Timeout(String),
    #[error("Integration lookup failed: {0}")]
    Integration(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(VendorStatus::Degraded).unwrap(), json!("degraded"));
        assert_eq!(VendorStatus::Down.to_string(), "down");
    }

    #[test]
    fn indicator_mapping() {
        assert_eq!(VendorStatus::from_indicator("none"), VendorStatus::Operational);
        assert_eq!(VendorStatus::from_indicator("minor"), VendorStatus::Degraded);
        assert_eq!(VendorStatus::from_indicator("major"), VendorStatus::Down);
        assert_eq!(VendorStatus::from_indicator("critical"), VendorStatus::Down);
    }

    #[test]
    fn service_status_wire_format() {
        let status = ServiceStatus::down("Postmark", "HTTP 401")
            .with_latency(120)
            .with_status_url(Some("https://status.postmarkapp.com/"));

        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            json!({
                "name": "Postmark",
                "status": "down",
                "latency": 120,
                "message": "HTTP 401",
                "statusUrl": "https://status.postmarkapp.com/"
            })
        );

        let bare = serde_json::to_value(ServiceStatus::operational("Render")).unwrap();
        assert_eq!(bare, json!({ "name": "Render", "status": "operational" }));
    }

    #[test]
    fn notification_config_tolerates_nulls() {
        let config: NotificationConfig = serde_json::from_value(json!({
            "id": NOTIFICATION_CONFIG_ID,
            "vendor_status_sms": null,
            "vendor_status_email": true,
            "vendor_status_cache": null
        }))
        .unwrap();

        assert!(!config.sms_enabled());
        assert!(config.any_channel_enabled());
        assert!(config.cache().is_empty());
    }
}
