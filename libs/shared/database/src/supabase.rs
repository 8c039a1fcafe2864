use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use shared_config::AppConfig;

/// HTTP client whose every request gives up after `timeout`.
pub fn http_client(timeout: Duration) -> Client {
    Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        warn!("Failed to build HTTP client with timeout, using defaults: {}", e);
        Client::new()
    })
}

/// PostgREST client authenticated with the service-role key.
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        let api_key = if config.supabase_service_role_key.is_empty() {
            config.supabase_anon_key.clone()
        } else {
            config.supabase_service_role_key.clone()
        };

        Self {
            client: http_client(config.probe_timeout()),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.api_key.is_empty()
    }

    fn get_headers(&self, prefer: Option<&'static str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "apikey",
            HeaderValue::from_str(&self.api_key).context("Invalid Supabase API key")?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .context("Invalid Supabase API key")?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(prefer) = prefer {
            headers.insert("Prefer", HeaderValue::from_static(prefer));
        }

        Ok(headers)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        prefer: Option<&'static str>,
    ) -> Result<reqwest::Response> {
        if !self.is_configured() {
            return Err(anyhow!("Supabase is not configured"));
        }

        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut req = self
            .client
            .request(method, &url)
            .headers(self.get_headers(prefer)?);

        if let Some(body_data) = body {
            req = req.json(body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("API error ({}): {}", status, error_text),
            });
        }

        Ok(response)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(method, path, body.as_ref(), None).await?;
        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// `GET` a PostgREST query and decode the returned rows.
    pub async fn select<T>(&self, path: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        self.request(Method::GET, path, None).await
    }

    /// `GET` a query expected to match at most one row.
    pub async fn select_one<T>(&self, path: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let mut rows: Vec<T> = self.select(path).await?;
        if rows.len() > 1 {
            debug!("Expected at most one row from {}, got {}", path, rows.len());
        }
        Ok(if rows.is_empty() { None } else { Some(rows.swap_remove(0)) })
    }

    /// `PATCH` the rows matched by `path` without asking for them back.
    pub async fn update(&self, path: &str, body: &Value) -> Result<()> {
        self.send(Method::PATCH, path, Some(body), Some("return=minimal"))
            .await?;
        Ok(())
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str, service_key: &str) -> AppConfig {
        AppConfig {
            supabase_url: url.to_string(),
            supabase_anon_key: "anon".to_string(),
            supabase_service_role_key: service_key.to_string(),
            supabase_jwt_secret: "secret".to_string(),
            server_port: 3000,
            probe_timeout_secs: 5,
            notification_url: String::new(),
            vendors: Default::default(),
        }
    }

    #[test]
    fn prefers_the_service_role_key() {
        let client = SupabaseClient::new(&config("https://x.supabase.co/", "service"));
        assert_eq!(client.api_key, "service");
        assert_eq!(client.get_base_url(), "https://x.supabase.co");

        let client = SupabaseClient::new(&config("https://x.supabase.co", ""));
        assert_eq!(client.api_key, "anon");
    }

    #[tokio::test]
    async fn unconfigured_client_fails_without_network() {
        let client = SupabaseClient::new(&config("", ""));
        let result: Result<Vec<Value>> = client.select("/rest/v1/users").await;
        assert!(result.is_err());
    }
}
