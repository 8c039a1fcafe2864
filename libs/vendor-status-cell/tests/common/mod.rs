#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use vendor_status_cell::models::{
    AdminNotification, NotificationConfig, NotificationConfigUpdate, ServiceStatus, VendorStatus,
    VendorStatusCache, VendorStatusError, NOTIFICATION_CONFIG_ID,
};
use vendor_status_cell::services::probes::IntegrationDirectory;
use vendor_status_cell::{Notifier, StatusStore, VendorProbe};

/// Probe whose status can be changed between runs.
pub struct StaticProbe {
    name: String,
    status: Mutex<VendorStatus>,
    delay: Duration,
    calls: AtomicUsize,
}

impl StaticProbe {
    pub fn new(name: &str, status: VendorStatus) -> Arc<Self> {
        Self::with_delay(name, status, Duration::ZERO)
    }

    pub fn with_delay(name: &str, status: VendorStatus, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            status: Mutex::new(status),
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn set(&self, status: VendorStatus) {
        *self.status.lock().unwrap() = status;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VendorProbe for StaticProbe {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self) -> ServiceStatus {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let status = *self.status.lock().unwrap();
        ServiceStatus::new(&self.name, status).with_latency(self.delay.as_millis() as u64)
    }
}

pub fn config_row(sms: bool, email: bool, slack: bool, cache: VendorStatusCache) -> NotificationConfig {
    NotificationConfig {
        id: NOTIFICATION_CONFIG_ID.to_string(),
        sms_phone: Some("+16045550100".to_string()),
        email_address: Some("alerts@magpipe.ai".to_string()),
        slack_channel: Some("#ops".to_string()),
        vendor_status_sms: Some(sms),
        vendor_status_email: Some(email),
        vendor_status_slack: Some(slack),
        vendor_status_cache: Some(cache),
        updated_at: None,
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    pub row: Mutex<Option<NotificationConfig>>,
    pub fail_load: bool,
    pub fail_save: bool,
    pub saves: AtomicUsize,
}

impl InMemoryStore {
    pub fn with_row(row: NotificationConfig) -> Arc<Self> {
        Arc::new(Self {
            row: Mutex::new(Some(row)),
            ..Self::default()
        })
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn cache(&self) -> VendorStatusCache {
        self.row
            .lock()
            .unwrap()
            .as_ref()
            .map(|r| r.cache())
            .unwrap_or_default()
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusStore for InMemoryStore {
    async fn load(&self) -> Result<Option<NotificationConfig>, VendorStatusError> {
        if self.fail_load {
            return Err(VendorStatusError::Persistence("connection reset".to_string()));
        }
        Ok(self.row.lock().unwrap().clone())
    }

    async fn save(&self, cache: &VendorStatusCache) -> Result<(), VendorStatusError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_save {
            return Err(VendorStatusError::Persistence("read-only transaction".to_string()));
        }
        if let Some(row) = self.row.lock().unwrap().as_mut() {
            row.vendor_status_cache = Some(cache.clone());
        }
        Ok(())
    }

    async fn update_channels(&self, update: &NotificationConfigUpdate) -> Result<(), VendorStatusError> {
        let mut guard = self.row.lock().unwrap();
        let row = guard
            .as_mut()
            .ok_or_else(|| VendorStatusError::Persistence("row missing".to_string()))?;
        if let Some(v) = update.vendor_status_sms {
            row.vendor_status_sms = Some(v);
        }
        if let Some(v) = update.vendor_status_email {
            row.vendor_status_email = Some(v);
        }
        if let Some(v) = update.vendor_status_slack {
            row.vendor_status_slack = Some(v);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<AdminNotification>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn dispatch(&self, notification: &AdminNotification) -> Result<(), VendorStatusError> {
        self.sent.lock().unwrap().push(notification.clone());
        if self.fail {
            return Err(VendorStatusError::Notification("HTTP 500: boom".to_string()));
        }
        Ok(())
    }
}

/// Integration directory with a fixed answer.
pub enum FakeDirectory {
    Connected(String),
    NotConnected,
    Broken,
}

#[async_trait]
impl IntegrationDirectory for FakeDirectory {
    async fn connected_token(&self, _provider_slug: &str) -> Result<Option<String>, VendorStatusError> {
        match self {
            FakeDirectory::Connected(token) => Ok(Some(token.clone())),
            FakeDirectory::NotConnected => Ok(None),
            FakeDirectory::Broken => Err(VendorStatusError::Integration("permission denied".to_string())),
        }
    }
}
