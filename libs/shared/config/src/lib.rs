use std::env;
use tracing::warn;

/// Credentials for every vendor probed by the status service.
/// An empty string means the vendor is not configured.
#[derive(Debug, Clone, Default)]
pub struct VendorCredentials {
    pub signalwire_project_id: String,
    pub signalwire_api_token: String,
    pub signalwire_space_url: String,
    pub livekit_url: String,
    pub postmark_server_token: String,
    pub stripe_secret_key: String,
    pub openai_api_key: String,
    pub elevenlabs_api_key: String,
    pub deepgram_api_key: String,
    pub firecrawl_api_key: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_role_key: String,
    pub supabase_jwt_secret: String,
    pub server_port: u16,
    pub probe_timeout_secs: u64,
    pub notification_url: String,
    pub vendors: VendorCredentials,
}

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

fn required(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        warn!("{} not set, using empty value", key);
        String::new()
    })
}

fn optional(key: &str) -> String {
    env::var(key).unwrap_or_default()
}

impl AppConfig {
    pub fn from_env() -> Self {
        let supabase_url = required("SUPABASE_URL");

        let server_port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SERVER_PORT);

        let probe_timeout_secs = env::var("VENDOR_PROBE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|secs: &u64| *secs > 0)
            .unwrap_or_else(|| {
                warn!("VENDOR_PROBE_TIMEOUT_SECS not set or invalid, using default");
                DEFAULT_PROBE_TIMEOUT_SECS
            });

        let notification_url = env::var("ADMIN_NOTIFICATION_URL")
            .unwrap_or_else(|_| Self::default_notification_url(&supabase_url));

        let postmark_server_token = env::var("POSTMARK_API_KEY")
            .or_else(|_| env::var("POSTMARK_SERVER_TOKEN"))
            .unwrap_or_else(|_| {
                warn!("POSTMARK_API_KEY not set, using empty value");
                String::new()
            });

        let config = Self {
            supabase_anon_key: required("SUPABASE_ANON_PUBLIC_KEY"),
            supabase_service_role_key: required("SUPABASE_SERVICE_ROLE_KEY"),
            supabase_jwt_secret: required("SUPABASE_JWT_SECRET"),
            supabase_url,
            server_port,
            probe_timeout_secs,
            notification_url,
            vendors: VendorCredentials {
                signalwire_project_id: required("SIGNALWIRE_PROJECT_ID"),
                signalwire_api_token: required("SIGNALWIRE_API_TOKEN"),
                signalwire_space_url: required("SIGNALWIRE_SPACE_URL"),
                livekit_url: required("LIVEKIT_URL"),
                postmark_server_token,
                stripe_secret_key: optional("STRIPE_SECRET_KEY"),
                openai_api_key: optional("OPENAI_API_KEY"),
                elevenlabs_api_key: optional("ELEVENLABS_API_KEY"),
                deepgram_api_key: optional("DEEPGRAM_API_KEY"),
                firecrawl_api_key: optional("FIRECRAWL_API_KEY"),
            },
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn default_notification_url(supabase_url: &str) -> String {
        format!(
            "{}/functions/v1/admin-send-notification",
            supabase_url.trim_end_matches('/')
        )
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_service_role_key.is_empty()
            && !self.supabase_jwt_secret.is_empty()
    }

    pub fn probe_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.probe_timeout_secs)
    }
}
