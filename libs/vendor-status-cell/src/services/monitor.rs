// =====================================================================================
// VENDOR STATUS MONITOR
// =====================================================================================
//
// Runs the aggregator, then persists the snapshot and dispatches alerts as a
// post-run step. Only the report matters to the caller: persistence and
// notification failures are logged and swallowed.
//
// Each post-run step is bounded by `io_timeout` so a hung database or
// dispatcher never withholds the report.
//
// The cache read-modify-write is not guarded; two overlapping runs can both
// notify the same transition and the later save wins.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, instrument, warn};

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{ServiceStatus, StatusCheckOutcome, VendorStatusError};
use crate::services::aggregator::StatusAggregator;
use crate::services::notifier::{should_notify, vendor_status_notification, HttpNotifier, Notifier};
use crate::services::probes::SupabaseIntegrationDirectory;
use crate::services::store::{StatusStore, SupabaseStatusStore};
use crate::services::transitions::detect_transitions;

pub struct VendorStatusMonitor {
    aggregator: StatusAggregator,
    store: Arc<dyn StatusStore>,
    notifier: Arc<dyn Notifier>,
    io_timeout: Duration,
}

/// Budget for each of load, save and dispatch unless configured otherwise.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(5);

async fn bounded<T>(
    limit: Duration,
    step: &str,
    future: impl Future<Output = Result<T, VendorStatusError>>,
) -> Result<T, VendorStatusError> {
    tokio::time::timeout(limit, future)
        .await
        .unwrap_or_else(|_| Err(VendorStatusError::Timeout(step.to_string())))
}

impl VendorStatusMonitor {
    pub fn new(
        aggregator: StatusAggregator,
        store: Arc<dyn StatusStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            aggregator,
            store,
            notifier,
            io_timeout: DEFAULT_IO_TIMEOUT,
        }
    }

    pub fn with_io_timeout(mut self, io_timeout: Duration) -> Self {
        self.io_timeout = io_timeout;
        self
    }

    /// Production wiring: every vendor probe, Supabase persistence, HTTP dispatch.
    pub fn from_config(config: &AppConfig, supabase: Arc<SupabaseClient>) -> Self {
        let directory = Arc::new(SupabaseIntegrationDirectory::new(supabase.clone()));

        Self::new(
            StatusAggregator::from_config(config, directory),
            Arc::new(SupabaseStatusStore::new(supabase)),
            Arc::new(HttpNotifier::new(config)),
        )
        .with_io_timeout(config.probe_timeout())
    }

    pub fn store(&self) -> Arc<dyn StatusStore> {
        self.store.clone()
    }

    #[instrument(skip(self))]
    pub async fn check_all(&self) -> StatusCheckOutcome {
        let report = self.aggregator.run().await;

        // A failed load leaves the stored snapshot untouched.
        let loaded = bounded(self.io_timeout, "load", self.store.load()).await;
        let (config, snapshot_writable) = match loaded {
            Ok(Some(config)) => (Some(config), true),
            Ok(None) => {
                warn!("Notification config row missing, treating as first run");
                (None, true)
            }
            Err(e) => {
                error!("Failed to load vendor status cache, keeping stored snapshot: {}", e);
                (None, false)
            }
        };

        let previous = config.as_ref().map(|c| c.cache()).unwrap_or_default();
        let changes = detect_transitions(&report.services, &previous);

        if snapshot_writable {
            let saved = bounded(self.io_timeout, "save", self.store.save(&changes.snapshot)).await;
            if let Err(e) = saved {
                error!("Failed to save vendor status cache: {}", e);
            }
        }

        let mut notified = false;
        if should_notify(&changes.transitions, config.as_ref()) {
            let notification = vendor_status_notification(&changes.transitions);
            let dispatched =
                bounded(self.io_timeout, "dispatch", self.notifier.dispatch(&notification)).await;
            match dispatched {
                Ok(()) => {
                    info!(transitions = changes.transitions.len(), "Vendor status alert sent");
                    notified = true;
                }
                Err(e) => error!("Failed to send vendor status alert: {}", e),
            }
        } else if !changes.transitions.is_empty() {
            info!(
                transitions = changes.transitions.len(),
                "Vendor status changed but no alert channel is enabled"
            );
        }

        StatusCheckOutcome {
            report,
            transitions: changes.transitions,
            notified,
        }
    }

    /// One vendor, no persistence and no alerts.
    pub async fn check_vendor(&self, name: &str) -> Option<ServiceStatus> {
        self.aggregator.probe_one(name).await
    }

    pub fn vendor_names(&self) -> Vec<&str> {
        self.aggregator.probe_names()
    }
}
