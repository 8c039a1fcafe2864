// =====================================================================================
// VENDOR STATUS CELL - THIRD-PARTY SERVICE HEALTH FOR THE ADMIN CONSOLE
// =====================================================================================
//
// This cell provides:
// - One bounded probe per external vendor (telephony, voice, AI, email, hosting)
// - Concurrent aggregation into an overall verdict
// - Transition detection against the persisted vendor status cache
// - Admin alert dispatch when a vendor changes state
//
// =====================================================================================

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    NotificationConfig, ServiceStatus, StatusCheckOutcome, StatusReport, VendorStatus,
    VendorStatusCache, VendorStatusError,
};

pub use services::{
    AdminAuthService, Notifier, SlackWorkspaceService, StatusAggregator, StatusStore, VendorProbe,
    VendorStatusMonitor,
};

pub use handlers::VendorStatusHandlers;
pub use router::{create_vendor_status_router, vendor_status_routes};
