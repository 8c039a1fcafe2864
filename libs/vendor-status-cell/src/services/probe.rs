// =====================================================================================
// VENDOR PROBE CONTRACT
// =====================================================================================

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::models::ServiceStatus;

/// A single bounded health check against one external vendor.
///
/// Implementations never fail: every configuration, transport or protocol
/// problem is reported as a [`ServiceStatus`]. The runner enforces the timeout.
#[async_trait]
pub trait VendorProbe: Send + Sync {
    fn name(&self) -> &str;

    fn status_url(&self) -> Option<&str> {
        None
    }

    async fn check(&self) -> ServiceStatus;
}

/// Runs `probe` under a hard timeout. A probe that does not finish in time is
/// reported `Down` with message `"Timeout"`.
pub async fn run_probe(probe: &dyn VendorProbe, timeout: Duration) -> ServiceStatus {
    let start = Instant::now();

    match tokio::time::timeout(timeout, probe.check()).await {
        Ok(status) => {
            debug!(
                vendor = %status.name,
                status = %status.status,
                latency_ms = ?status.latency_ms,
                "Probe finished"
            );
            status
        }
        Err(_) => {
            warn!(vendor = %probe.name(), timeout_ms = timeout.as_millis() as u64, "Probe timed out");
            ServiceStatus::down(probe.name(), "Timeout")
                .with_latency(elapsed_ms(start))
                .with_status_url(probe.status_url())
        }
    }
}

pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// `Degraded` with "High latency" above `threshold_ms`, `Operational` otherwise.
pub(crate) fn from_latency(
    name: &str,
    latency_ms: u64,
    threshold_ms: u64,
    status_url: Option<&str>,
) -> ServiceStatus {
    let status = if latency_ms > threshold_ms {
        ServiceStatus::degraded(name, "High latency")
    } else {
        ServiceStatus::operational(name)
    };

    status.with_latency(latency_ms).with_status_url(status_url)
}

pub(crate) fn transport_failure(
    name: &str,
    error: &reqwest::Error,
    latency_ms: u64,
    status_url: Option<&str>,
) -> ServiceStatus {
    let message = if error.is_timeout() {
        "Timeout".to_string()
    } else {
        error.to_string()
    };

    warn!(vendor = %name, error = %error, "Probe request failed");
    ServiceStatus::down(name, message)
        .with_latency(latency_ms)
        .with_status_url(status_url)
}

pub(crate) fn http_failure(
    name: &str,
    status: StatusCode,
    latency_ms: u64,
    status_url: Option<&str>,
) -> ServiceStatus {
    warn!(vendor = %name, http_status = status.as_u16(), "Probe got non-success response");
    ServiceStatus::down(name, format!("HTTP {}", status.as_u16()))
        .with_latency(latency_ms)
        .with_status_url(status_url)
}

/// Sends `request` and maps the outcome with the plain latency rule.
pub(crate) async fn check_endpoint(
    name: &str,
    status_url: Option<&str>,
    request: RequestBuilder,
    threshold_ms: u64,
) -> ServiceStatus {
    let start = Instant::now();

    match request.send().await {
        Ok(response) => {
            let latency = elapsed_ms(start);
            if response.status().is_success() {
                from_latency(name, latency, threshold_ms, status_url)
            } else {
                http_failure(name, response.status(), latency, status_url)
            }
        }
        Err(error) => transport_failure(name, &error, elapsed_ms(start), status_url),
    }
}

/// Sends `request` and decodes a 2xx JSON body. Any failure comes back as the
/// `Down` status to report.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    name: &str,
    status_url: Option<&str>,
    request: RequestBuilder,
) -> Result<(T, u64), ServiceStatus> {
    let start = Instant::now();

    let response = request
        .send()
        .await
        .map_err(|e| transport_failure(name, &e, elapsed_ms(start), status_url))?;

    let latency = elapsed_ms(start);
    if !response.status().is_success() {
        return Err(http_failure(name, response.status(), latency, status_url));
    }

    let body = response.json::<T>().await.map_err(|e| {
        warn!(vendor = %name, error = %e, "Probe response was not the expected JSON");
        ServiceStatus::down(name, format!("Invalid response: {}", e))
            .with_latency(latency)
            .with_status_url(status_url)
    })?;

    Ok((body, latency))
}
