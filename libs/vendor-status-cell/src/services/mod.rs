pub mod admin;
pub mod aggregator;
pub mod monitor;
pub mod notifier;
pub mod probe;
pub mod probes;
pub mod slack;
pub mod store;
pub mod transitions;

pub use admin::AdminAuthService;
pub use aggregator::{overall_status, StatusAggregator};
pub use monitor::VendorStatusMonitor;
pub use notifier::{HttpNotifier, Notifier};
pub use probe::{run_probe, VendorProbe};
pub use slack::SlackWorkspaceService;
pub use store::{StatusStore, SupabaseStatusStore};
pub use transitions::detect_transitions;
