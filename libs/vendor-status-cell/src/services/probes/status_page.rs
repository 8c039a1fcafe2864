// Hosting vendors that publish a statuspage.io summary.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::models::{ServiceStatus, VendorStatus};
use crate::services::probe::{fetch_json, VendorProbe};

#[derive(Debug, Deserialize)]
struct StatusPageSummary {
    status: Option<StatusPageIndicator>,
}

#[derive(Debug, Deserialize)]
struct StatusPageIndicator {
    indicator: Option<String>,
    description: Option<String>,
}

/// Reads `/api/v2/status.json` and maps its indicator; latency plays no part.
pub struct StatusPageProbe {
    name: &'static str,
    client: Client,
    page_url: String,
}

impl StatusPageProbe {
    pub fn new(name: &'static str, client: Client, page_url: &str) -> Self {
        Self {
            name,
            client,
            page_url: page_url.to_string(),
        }
    }

    pub fn render(client: Client) -> Self {
        Self::new("Render", client, "https://status.render.com/")
    }

    pub fn vercel(client: Client) -> Self {
        Self::new("Vercel", client, "https://www.vercel-status.com/")
    }

    /// Points the probe at another status page host, keeping its name.
    pub fn with_page_url(mut self, page_url: &str) -> Self {
        self.page_url = page_url.to_string();
        self
    }

    fn summary_url(&self) -> String {
        format!("{}/api/v2/status.json", self.page_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl VendorProbe for StatusPageProbe {
    fn name(&self) -> &str {
        self.name
    }

    fn status_url(&self) -> Option<&str> {
        Some(&self.page_url)
    }

    async fn check(&self) -> ServiceStatus {
        let request = self.client.get(self.summary_url());

        let (summary, latency) = match fetch_json::<StatusPageSummary>(self.name, self.status_url(), request).await {
            Ok(fetched) => fetched,
            Err(status) => return status,
        };

        let (indicator, description) = match summary.status {
            Some(s) => (s.indicator.unwrap_or_else(|| "none".to_string()), s.description),
            None => ("none".to_string(), None),
        };

        let mut status = ServiceStatus::new(self.name, VendorStatus::from_indicator(&indicator))
            .with_latency(latency)
            .with_status_url(self.status_url());

        if indicator != "none" {
            if let Some(description) = description {
                status = status.with_message(description);
            }
        }

        status
    }
}
