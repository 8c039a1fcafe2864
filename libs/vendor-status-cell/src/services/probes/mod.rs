pub mod ai;
pub mod integrations;
pub mod platform;
pub mod status_page;

use std::sync::Arc;

use reqwest::Client;

use shared_config::AppConfig;

use crate::services::probe::VendorProbe;

pub use ai::{DeepgramProbe, ElevenLabsProbe, FirecrawlProbe, OpenAiProbe, FIRECRAWL_LOW_CREDIT_THRESHOLD};
pub use integrations::{
    CalComProbe, HubSpotProbe, IntegrationDirectory, SlackProbe, SupabaseIntegrationDirectory,
};
pub use platform::{LiveKitProbe, PostmarkProbe, SignalWireProbe, StripeProbe, SupabaseProbe};
pub use status_page::StatusPageProbe;

/// Every production probe, in report order.
pub fn default_probes(
    config: &AppConfig,
    directory: Arc<dyn IntegrationDirectory>,
) -> Vec<Arc<dyn VendorProbe>> {
    let client = Client::new();

    let probes: Vec<Arc<dyn VendorProbe>> = vec![
        Arc::new(SupabaseProbe::new(client.clone(), config)),
        Arc::new(SignalWireProbe::new(client.clone(), config)),
        Arc::new(LiveKitProbe::new(client.clone(), config)),
        Arc::new(PostmarkProbe::new(client.clone(), config)),
        Arc::new(StripeProbe::new(client.clone(), config)),
        Arc::new(OpenAiProbe::new(client.clone(), config)),
        Arc::new(ElevenLabsProbe::new(client.clone(), config)),
        Arc::new(DeepgramProbe::new(client.clone(), config)),
        Arc::new(HubSpotProbe::new(client.clone(), directory.clone())),
        Arc::new(SlackProbe::new(client.clone(), directory.clone())),
        Arc::new(CalComProbe::new(client.clone(), directory)),
        Arc::new(StatusPageProbe::render(client.clone())),
        Arc::new(StatusPageProbe::vercel(client.clone())),
        Arc::new(FirecrawlProbe::new(client, config)),
    ];

    probes
}
