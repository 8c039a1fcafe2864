// AI vendors: language models, speech and web scraping.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use shared_config::AppConfig;

use crate::models::ServiceStatus;
use crate::services::probe::{check_endpoint, fetch_json, from_latency, is_blank, VendorProbe};

const OPENAI_LATENCY_MS: u64 = 3000;
const ELEVENLABS_LATENCY_MS: u64 = 3000;
const DEEPGRAM_LATENCY_MS: u64 = 3000;
const FIRECRAWL_LATENCY_MS: u64 = 3000;

/// Below this many remaining credits Firecrawl is reported `Degraded`.
pub const FIRECRAWL_LOW_CREDIT_THRESHOLD: i64 = 500;

pub struct OpenAiProbe {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiProbe {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            base_url: "https://api.openai.com".to_string(),
            api_key: config.vendors.openai_api_key.clone(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl VendorProbe for OpenAiProbe {
    fn name(&self) -> &str {
        "OpenAI"
    }

    fn status_url(&self) -> Option<&str> {
        Some("https://status.openai.com/")
    }

    async fn check(&self) -> ServiceStatus {
        if is_blank(&self.api_key) {
            return ServiceStatus::down(self.name(), "Missing credentials")
                .with_status_url(self.status_url());
        }

        let request = self
            .client
            .get(format!("{}/v1/models", self.base_url))
            .bearer_auth(&self.api_key);

        check_endpoint(self.name(), self.status_url(), request, OPENAI_LATENCY_MS).await
    }
}

#[derive(Debug, Deserialize)]
struct ElevenLabsSubscription {
    character_count: i64,
    character_limit: i64,
}

/// Reports the remaining character quota of the subscription.
pub struct ElevenLabsProbe {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ElevenLabsProbe {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            base_url: "https://api.elevenlabs.io".to_string(),
            api_key: config.vendors.elevenlabs_api_key.clone(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl VendorProbe for ElevenLabsProbe {
    fn name(&self) -> &str {
        "ElevenLabs"
    }

    fn status_url(&self) -> Option<&str> {
        Some("https://status.elevenlabs.io/")
    }

    async fn check(&self) -> ServiceStatus {
        if is_blank(&self.api_key) {
            return ServiceStatus::down(self.name(), "Missing credentials")
                .with_status_url(self.status_url());
        }

        let request = self
            .client
            .get(format!("{}/v1/user/subscription", self.base_url))
            .header("xi-api-key", &self.api_key);

        let (subscription, latency) =
            match fetch_json::<ElevenLabsSubscription>(self.name(), self.status_url(), request).await {
                Ok(fetched) => fetched,
                Err(status) => return status,
            };

        let remaining = subscription
            .character_limit
            .saturating_sub(subscription.character_count)
            .max(0);

        if remaining == 0 {
            ServiceStatus::down(self.name(), "0 characters remaining")
                .with_latency(latency)
                .with_status_url(self.status_url())
        } else if remaining.saturating_mul(10) < subscription.character_limit {
            ServiceStatus::degraded(self.name(), format!("Low characters: {} remaining", remaining))
                .with_latency(latency)
                .with_status_url(self.status_url())
        } else {
            from_latency(self.name(), latency, ELEVENLABS_LATENCY_MS, self.status_url())
        }
    }
}

pub struct DeepgramProbe {
    client: Client,
    base_url: String,
    api_key: String,
}

impl DeepgramProbe {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            base_url: "https://api.deepgram.com".to_string(),
            api_key: config.vendors.deepgram_api_key.clone(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl VendorProbe for DeepgramProbe {
    fn name(&self) -> &str {
        "Deepgram"
    }

    fn status_url(&self) -> Option<&str> {
        Some("https://status.deepgram.com/")
    }

    async fn check(&self) -> ServiceStatus {
        if is_blank(&self.api_key) {
            return ServiceStatus::down(self.name(), "Missing credentials")
                .with_status_url(self.status_url());
        }

        let request = self
            .client
            .get(format!("{}/v1/projects", self.base_url))
            .header("Authorization", format!("Token {}", self.api_key));

        check_endpoint(self.name(), self.status_url(), request, DEEPGRAM_LATENCY_MS).await
    }
}

#[derive(Debug, Deserialize)]
struct FirecrawlCreditUsage {
    data: FirecrawlCredits,
}

#[derive(Debug, Deserialize)]
struct FirecrawlCredits {
    #[serde(rename = "remainingCredits", alias = "remaining_credits")]
    remaining_credits: i64,
}

/// Knowledge-base scraping depends on Firecrawl credits, so the credit balance
/// decides the status. The admin banner parses these messages.
pub struct FirecrawlProbe {
    client: Client,
    base_url: String,
    api_key: String,
}

impl FirecrawlProbe {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        Self {
            client,
            base_url: "https://api.firecrawl.dev".to_string(),
            api_key: config.vendors.firecrawl_api_key.clone(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl VendorProbe for FirecrawlProbe {
    fn name(&self) -> &str {
        "Firecrawl"
    }

    fn status_url(&self) -> Option<&str> {
        Some("https://status.firecrawl.dev/")
    }

    async fn check(&self) -> ServiceStatus {
        if is_blank(&self.api_key) {
            return ServiceStatus::down(self.name(), "Missing credentials")
                .with_status_url(self.status_url());
        }

        let request = self
            .client
            .get(format!("{}/v2/team/credit-usage", self.base_url))
            .bearer_auth(&self.api_key);

        let (usage, latency) =
            match fetch_json::<FirecrawlCreditUsage>(self.name(), self.status_url(), request).await {
                Ok(fetched) => fetched,
                Err(status) => return status,
            };

        let remaining = usage.data.remaining_credits;

        if remaining <= 0 {
            ServiceStatus::down(self.name(), "0 credits - KB scraping disabled")
                .with_latency(latency)
                .with_status_url(self.status_url())
        } else if remaining < FIRECRAWL_LOW_CREDIT_THRESHOLD {
            ServiceStatus::degraded(self.name(), format!("Low credits: {} remaining", remaining))
                .with_latency(latency)
                .with_status_url(self.status_url())
        } else {
            from_latency(self.name(), latency, FIRECRAWL_LATENCY_MS, self.status_url())
        }
    }
}
