// Slack workspace details for the notification settings page: whether an
// admin Slack integration exists, its team name, and the channels alerts can
// be routed to.

use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::models::{SlackChannel, SlackConnection, VendorStatusError};
use crate::services::probes::IntegrationDirectory;

const SLACK_SLUG: &str = "slack";

#[derive(Debug, Deserialize)]
struct AuthTest {
    ok: bool,
    #[serde(default)]
    team: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConversationsList {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    channels: Vec<SlackChannel>,
}

pub struct SlackWorkspaceService {
    client: Client,
    directory: Arc<dyn IntegrationDirectory>,
    base_url: String,
}

impl SlackWorkspaceService {
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

    /// Never fails: lookup problems read as "not connected", and an
    /// unreachable Slack leaves the workspace name empty.
    #[instrument(skip(self))]
    pub async fn connection(&self) -> SlackConnection {
        let token = match self.directory.connected_token(SLACK_SLUG).await {
            Ok(Some(token)) => token,
            Ok(None) => return SlackConnection::default(),
            Err(e) => {
                warn!("Slack integration lookup failed: {}", e);
                return SlackConnection::default();
            }
        };

        let workspace = match self.auth_test(&token).await {
            Ok(result) if result.ok => result.team.unwrap_or_default(),
            Ok(_) => String::new(),
            Err(e) => {
                warn!("Slack auth.test failed: {}", e);
                String::new()
            }
        };

        SlackConnection {
            connected: true,
            workspace,
        }
    }

    async fn auth_test(&self, token: &str) -> Result<AuthTest, VendorStatusError> {
        let result = self
            .client
            .get(format!("{}/api/auth.test", self.base_url))
            .bearer_auth(token)
            .send()
            .await?
            .json::<AuthTest>()
            .await?;

        Ok(result)
    }

    /// Public, unarchived channels sorted by name. `Ok(None)` when no Slack
    /// integration is connected.
    #[instrument(skip(self))]
    pub async fn list_channels(&self) -> Result<Option<Vec<SlackChannel>>, VendorStatusError> {
        let Some(token) = self.directory.connected_token(SLACK_SLUG).await? else {
            return Ok(None);
        };

        let result = self
            .client
            .get(format!(
                "{}/api/conversations.list?types=public_channel&limit=200&exclude_archived=true",
                self.base_url
            ))
            .bearer_auth(token)
            .send()
            .await?
            .json::<ConversationsList>()
            .await?;

        if !result.ok {
            let error = result.error.unwrap_or_else(|| "unknown_error".to_string());
            return Err(VendorStatusError::Integration(format!("Slack API error: {}", error)));
        }

        let mut channels = result.channels;
        channels.sort_by_key(|c| c.name.to_lowercase());

        debug!(count = channels.len(), "Listed Slack channels");
        Ok(Some(channels))
    }
}
