// =====================================================================================
// STATUS AGGREGATOR
// =====================================================================================

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tracing::{info, instrument};

use shared_config::AppConfig;

use crate::models::{ServiceStatus, StatusReport, VendorStatus};
use crate::services::probe::{run_probe, VendorProbe};
use crate::services::probes::{default_probes, IntegrationDirectory};

/// Runs every registered probe concurrently and reduces the results to one
/// verdict. Has no side effects beyond the probes' own requests.
pub struct StatusAggregator {
    probes: Vec<Arc<dyn VendorProbe>>,
    timeout: Duration,
}

impl StatusAggregator {
    pub fn new(probes: Vec<Arc<dyn VendorProbe>>, timeout: Duration) -> Self {
        Self { probes, timeout }
    }

    pub fn from_config(config: &AppConfig, directory: Arc<dyn IntegrationDirectory>) -> Self {
        Self::new(default_probes(config, directory), config.probe_timeout())
    }

    pub fn probe_names(&self) -> Vec<&str> {
        self.probes.iter().map(|p| p.name()).collect()
    }

    #[instrument(skip(self), fields(probes = self.probes.len()))]
    pub async fn run(&self) -> StatusReport {
        let start = Instant::now();

        // join_all keeps registration order regardless of completion order.
        let services: Vec<ServiceStatus> = join_all(
            self.probes
                .iter()
                .map(|probe| run_probe(probe.as_ref(), self.timeout)),
        )
        .await;

        let overall = overall_status(&services);

        info!(
            overall = %overall,
            elapsed_ms = start.elapsed().as_millis() as u64,
            down = services.iter().filter(|s| s.status == VendorStatus::Down).count(),
            degraded = services.iter().filter(|s| s.status == VendorStatus::Degraded).count(),
            "Vendor status check complete"
        );

        StatusReport {
            overall,
            services,
            checked_at: chrono::Utc::now(),
        }
    }

    /// Runs only the probe called `name` (case-insensitive).
    pub async fn probe_one(&self, name: &str) -> Option<ServiceStatus> {
        let probe = self
            .probes
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))?;

        Some(run_probe(probe.as_ref(), self.timeout).await)
    }
}

/// `Down` if any vendor is down, else `Degraded` if any is degraded, else
/// `Operational`.
pub fn overall_status(services: &[ServiceStatus]) -> VendorStatus {
    services
        .iter()
        .map(|s| s.status)
        .max()
        .unwrap_or(VendorStatus::Operational)
}
