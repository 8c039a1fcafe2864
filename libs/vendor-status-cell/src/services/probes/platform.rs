// Core platform vendors: database, telephony, realtime voice, email, billing.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;

use shared_config::AppConfig;

use crate::models::ServiceStatus;
use crate::services::probe::{
    check_endpoint, elapsed_ms, from_latency, is_blank, transport_failure, VendorProbe,
};

const SUPABASE_LATENCY_MS: u64 = 2000;
const SIGNALWIRE_LATENCY_MS: u64 = 3000;
const LIVEKIT_LATENCY_MS: u64 = 3000;
const POSTMARK_LATENCY_MS: u64 = 2000;
const STRIPE_LATENCY_MS: u64 = 2000;

pub struct SupabaseProbe {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseProbe {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            api_key: config.supabase_service_role_key.clone(),
        }
    }
}

#[async_trait]
impl VendorProbe for SupabaseProbe {
    fn name(&self) -> &str {
        "Supabase"
    }

    fn status_url(&self) -> Option<&str> {
        Some("https://status.supabase.com/")
    }

    async fn check(&self) -> ServiceStatus {
        if is_blank(&self.base_url) || is_blank(&self.api_key) {
            return ServiceStatus::down(self.name(), "Not configured").with_status_url(self.status_url());
        }

        let request = self
            .client
            .get(format!("{}/rest/v1/users?select=id&limit=1", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key);

        check_endpoint(self.name(), self.status_url(), request, SUPABASE_LATENCY_MS).await
    }
}

pub struct SignalWireProbe {
    client: Client,
    base_url: String,
    project_id: String,
    api_token: String,
}

impl SignalWireProbe {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        let space = config.vendors.signalwire_space_url.trim();
        let base_url = if space.is_empty() {
            String::new()
        } else if space.starts_with("http://") || space.starts_with("https://") {
            space.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", space.trim_end_matches('/'))
        };

        Self {
            client,
            base_url,
            project_id: config.vendors.signalwire_project_id.clone(),
            api_token: config.vendors.signalwire_api_token.clone(),
        }
    }
}

#[async_trait]
impl VendorProbe for SignalWireProbe {
    fn name(&self) -> &str {
        "SignalWire"
    }

    fn status_url(&self) -> Option<&str> {
        Some("https://status.signalwire.com/")
    }

    async fn check(&self) -> ServiceStatus {
        if is_blank(&self.project_id) || is_blank(&self.api_token) || is_blank(&self.base_url) {
            return ServiceStatus::down(self.name(), "Missing credentials")
                .with_status_url(self.status_url());
        }

        let request = self
            .client
            .get(format!("{}/api/relay/rest/phone_numbers?page_size=1", self.base_url))
            .basic_auth(&self.project_id, Some(&self.api_token));

        check_endpoint(self.name(), self.status_url(), request, SIGNALWIRE_LATENCY_MS).await
    }
}

/// LiveKit has no health endpoint; any HTTP answer from the server counts as
/// reachable, whatever its status code.
pub struct LiveKitProbe {
    client: Client,
    url: String,
}

impl LiveKitProbe {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            url: Self::http_url(&config.vendors.livekit_url),
        }
    }

    fn http_url(livekit_url: &str) -> String {
        let url = livekit_url.trim();
        if let Some(rest) = url.strip_prefix("wss://") {
            format!("https://{}", rest)
        } else if let Some(rest) = url.strip_prefix("ws://") {
            format!("http://{}", rest)
        } else {
            url.to_string()
        }
    }
}

#[async_trait]
impl VendorProbe for LiveKitProbe {
    fn name(&self) -> &str {
        "LiveKit"
    }

    fn status_url(&self) -> Option<&str> {
        Some("https://status.livekit.io/")
    }

    async fn check(&self) -> ServiceStatus {
        if is_blank(&self.url) {
            return ServiceStatus::down(self.name(), "Not configured").with_status_url(self.status_url());
        }

        let start = Instant::now();
        match self.client.head(&self.url).send().await {
            Ok(_) => from_latency(self.name(), elapsed_ms(start), LIVEKIT_LATENCY_MS, self.status_url()),
            Err(error) => transport_failure(self.name(), &error, elapsed_ms(start), self.status_url()),
        }
    }
}

pub struct PostmarkProbe {
    client: Client,
    base_url: String,
    server_token: String,
}

impl PostmarkProbe {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            base_url: "https://api.postmarkapp.com".to_string(),
            server_token: config.vendors.postmark_server_token.clone(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl VendorProbe for PostmarkProbe {
    fn name(&self) -> &str {
        "Postmark"
    }

    fn status_url(&self) -> Option<&str> {
        Some("https://status.postmarkapp.com/")
    }

    async fn check(&self) -> ServiceStatus {
        if is_blank(&self.server_token) {
            return ServiceStatus::down(self.name(), "Missing credentials")
                .with_status_url(self.status_url());
        }

        let request = self
            .client
            .get(format!("{}/server", self.base_url))
            .header("Accept", "application/json")
            .header("X-Postmark-Server-Token", &self.server_token);

        check_endpoint(self.name(), self.status_url(), request, POSTMARK_LATENCY_MS).await
    }
}

pub struct StripeProbe {
    client: Client,
    base_url: String,
    secret_key: String,
}

impl StripeProbe {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            base_url: "https://api.stripe.com".to_string(),
            secret_key: config.vendors.stripe_secret_key.clone(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl VendorProbe for StripeProbe {
    fn name(&self) -> &str {
        "Stripe"
    }

    fn status_url(&self) -> Option<&str> {
        Some("https://status.stripe.com/")
    }

    async fn check(&self) -> ServiceStatus {
        if is_blank(&self.secret_key) {
            return ServiceStatus::down(self.name(), "Missing credentials")
                .with_status_url(self.status_url());
        }

        let request = self
            .client
            .get(format!("{}/v1/balance", self.base_url))
            .bearer_auth(&self.secret_key);

        check_endpoint(self.name(), self.status_url(), request, STRIPE_LATENCY_MS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn livekit_websocket_urls_become_http() {
        assert_eq!(LiveKitProbe::http_url("wss://magpipe.livekit.cloud"), "https://magpipe.livekit.cloud");
        assert_eq!(LiveKitProbe::http_url("ws://localhost:7880"), "http://localhost:7880");
        assert_eq!(LiveKitProbe::http_url("https://lk.example.com"), "https://lk.example.com");
    }
}
