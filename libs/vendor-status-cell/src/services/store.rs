// =====================================================================================
// NOTIFICATION CONFIG PERSISTENCE
// =====================================================================================

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use shared_database::SupabaseClient;

use crate::models::{
    NotificationConfig, NotificationConfigUpdate, VendorStatusCache, VendorStatusError,
    NOTIFICATION_CONFIG_ID,
};

/// Access to the singleton notification config row.
///
/// Writes are unconditional: the last writer wins and nothing is merged.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// `None` when the row does not exist.
    async fn load(&self) -> Result<Option<NotificationConfig>, VendorStatusError>;

    /// Replaces the whole vendor status cache.
    async fn save(&self, cache: &VendorStatusCache) -> Result<(), VendorStatusError>;

    async fn update_channels(&self, update: &NotificationConfigUpdate) -> Result<(), VendorStatusError>;
}

pub struct SupabaseStatusStore {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseStatusStore {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    fn row_path() -> String {
        format!("/rest/v1/admin_notification_config?id=eq.{}", NOTIFICATION_CONFIG_ID)
    }
}

#[async_trait]
impl StatusStore for SupabaseStatusStore {
    #[instrument(skip(self))]
    async fn load(&self) -> Result<Option<NotificationConfig>, VendorStatusError> {
        let path = format!("{}&select=*", Self::row_path());

        self.supabase
            .select_one::<NotificationConfig>(&path)
            .await
            .map_err(|e| VendorStatusError::Persistence(e.to_string()))
    }

    #[instrument(skip(self, cache), fields(vendors = cache.len()))]
    async fn save(&self, cache: &VendorStatusCache) -> Result<(), VendorStatusError> {
        let body = json!({
            "vendor_status_cache": cache,
            "updated_at": chrono::Utc::now(),
        });

        self.supabase
            .update(&Self::row_path(), &body)
            .await
            .map_err(|e| VendorStatusError::Persistence(e.to_string()))?;

        debug!("Vendor status cache saved");
        Ok(())
    }

    #[instrument(skip(self, update))]
    async fn update_channels(&self, update: &NotificationConfigUpdate) -> Result<(), VendorStatusError> {
        let mut body = serde_json::to_value(update)?;
        if let Value::Object(fields) = &mut body {
            fields.insert("updated_at".to_string(), json!(chrono::Utc::now()));
        }

        self.supabase
            .update(&Self::row_path(), &body)
            .await
            .map_err(|e| VendorStatusError::Persistence(e.to_string()))
    }
}
