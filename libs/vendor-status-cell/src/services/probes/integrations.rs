// Optional per-user integrations. These are only as healthy as the accounts
// users have connected, so with no connection at all the vendor is reported
// operational with a "Not connected" note.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use shared_database::SupabaseClient;

use crate::models::{ServiceStatus, VendorStatusError};
use crate::services::probe::{check_endpoint, fetch_json, from_latency, VendorProbe};

const HUBSPOT_LATENCY_MS: u64 = 3000;
const SLACK_LATENCY_MS: u64 = 3000;
const CALCOM_LATENCY_MS: u64 = 3000;

/// Cal.com is connected through its own OAuth flow, which keeps the token on
/// the `users` row instead of in `user_integrations`.
pub const CAL_COM_SLUG: &str = "cal_com";

/// Finds an access token of any user with the given integration connected.
#[async_trait]
pub trait IntegrationDirectory: Send + Sync {
    async fn connected_token(&self, provider_slug: &str) -> Result<Option<String>, VendorStatusError>;
}

#[derive(Debug, Deserialize)]
struct IntegrationRow {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CalComUserRow {
    cal_com_access_token: Option<String>,
}

pub struct SupabaseIntegrationDirectory {
    supabase: Arc<SupabaseClient>,
}

impl SupabaseIntegrationDirectory {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl IntegrationDirectory for SupabaseIntegrationDirectory {
    async fn connected_token(&self, provider_slug: &str) -> Result<Option<String>, VendorStatusError> {
        if provider_slug == CAL_COM_SLUG {
            let row: Option<CalComUserRow> = self
                .supabase
                .select_one("/rest/v1/users?select=cal_com_access_token&cal_com_access_token=not.is.null&limit=1")
                .await
                .map_err(|e| VendorStatusError::Integration(e.to_string()))?;

            return Ok(row.and_then(|r| r.cal_com_access_token).filter(|t| !t.is_empty()));
        }

        let path = format!(
            "/rest/v1/user_integrations?select=access_token,integration_providers!inner(slug)\
             &integration_providers.slug=eq.{}&status=eq.connected&access_token=not.is.null&limit=1",
            provider_slug
        );

        let row: Option<IntegrationRow> = self
            .supabase
            .select_one(&path)
            .await
            .map_err(|e| VendorStatusError::Integration(e.to_string()))?;

        Ok(row.and_then(|r| r.access_token).filter(|t| !t.is_empty()))
    }
}

/// Resolves the token to probe with, or the status to report when there is none.
async fn resolve_token(
    directory: &dyn IntegrationDirectory,
    slug: &str,
    name: &str,
    status_url: Option<&str>,
) -> Result<String, ServiceStatus> {
    match directory.connected_token(slug).await {
        Ok(Some(token)) => Ok(token),
        Ok(None) => {
            debug!(vendor = %name, "No user has this integration connected");
            Err(ServiceStatus::operational(name)
                .with_message("Not connected")
                .with_status_url(status_url))
        }
        Err(e) => {
            warn!(vendor = %name, error = %e, "Integration lookup failed");
            Err(ServiceStatus::down(name, e.to_string()).with_status_url(status_url))
        }
    }
}

pub struct HubSpotProbe {
    client: Client,
    directory: Arc<dyn IntegrationDirectory>,
    base_url: String,
}

impl HubSpotProbe {
    pub fn new(client: Client, directory: Arc<dyn IntegrationDirectory>) -> Self {
        Self {
            client,
            directory,
            base_url: "https://api.hubapi.com".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl VendorProbe for HubSpotProbe {
    fn name(&self) -> &str {
        "HubSpot"
    }

    fn status_url(&self) -> Option<&str> {
        Some("https://status.hubspot.com/")
    }

    async fn check(&self) -> ServiceStatus {
        let token = match resolve_token(self.directory.as_ref(), "hubspot", self.name(), self.status_url()).await {
            Ok(token) => token,
            Err(status) => return status,
        };

        let request = self
            .client
            .get(format!("{}/account-info/v3/details", self.base_url))
            .bearer_auth(token);

        check_endpoint(self.name(), self.status_url(), request, HUBSPOT_LATENCY_MS).await
    }
}

#[derive(Debug, Deserialize)]
struct SlackAuthTest {
    ok: bool,
    error: Option<String>,
}

/// Slack answers 200 even for revoked tokens; the `ok` flag carries the result.
pub struct SlackProbe {
    client: Client,
    directory: Arc<dyn IntegrationDirectory>,
    base_url: String,
}

impl SlackProbe {
    pub fn new(client: Client, directory: Arc<dyn IntegrationDirectory>) -> Self {
        Self {
            client,
            directory,
            base_url: "https://slack.com".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl VendorProbe for SlackProbe {
    fn name(&self) -> &str {
        "Slack"
    }

    fn status_url(&self) -> Option<&str> {
        Some("https://slack-status.com/")
    }

    async fn check(&self) -> ServiceStatus {
        let token = match resolve_token(self.directory.as_ref(), "slack", self.name(), self.status_url()).await {
            Ok(token) => token,
            Err(status) => return status,
        };

        let request = self
            .client
            .get(format!("{}/api/auth.test", self.base_url))
            .bearer_auth(token);

        let (result, latency) = match fetch_json::<SlackAuthTest>(self.name(), self.status_url(), request).await {
            Ok(fetched) => fetched,
            Err(status) => return status,
        };

        if !result.ok {
            let error = result.error.unwrap_or_else(|| "unknown_error".to_string());
            return ServiceStatus::down(self.name(), format!("Slack error: {}", error))
                .with_latency(latency)
                .with_status_url(self.status_url());
        }

        from_latency(self.name(), latency, SLACK_LATENCY_MS, self.status_url())
    }
}

pub struct CalComProbe {
    client: Client,
    directory: Arc<dyn IntegrationDirectory>,
    base_url: String,
}

impl CalComProbe {
    pub fn new(client: Client, directory: Arc<dyn IntegrationDirectory>) -> Self {
        Self {
            client,
            directory,
            base_url: "https://api.cal.com".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl VendorProbe for CalComProbe {
    fn name(&self) -> &str {
        "Cal.com"
    }

    fn status_url(&self) -> Option<&str> {
        Some("https://status.cal.com/")
    }

    async fn check(&self) -> ServiceStatus {
        let token = match resolve_token(self.directory.as_ref(), CAL_COM_SLUG, self.name(), self.status_url()).await {
            Ok(token) => token,
            Err(status) => return status,
        };

        let request = self
            .client
            .get(format!("{}/v2/me", self.base_url))
            .bearer_auth(token);

        check_endpoint(self.name(), self.status_url(), request, CALCOM_LATENCY_MS).await
    }
}
