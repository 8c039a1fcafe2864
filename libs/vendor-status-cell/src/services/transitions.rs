use tracing::info;

use crate::models::{ServiceStatus, TransitionSet, VendorStatusCache};

/// Diffs this run against the persisted snapshot.
///
/// A vendor only produces a transition when it has a previous entry that
/// differs from its current status. New vendors are recorded silently.
pub fn detect_transitions(current: &[ServiceStatus], previous: &VendorStatusCache) -> TransitionSet {
    let mut transitions = Vec::new();
    let mut snapshot = VendorStatusCache::with_capacity(current.len());

    for service in current {
        let now = service.status.as_str();

        if let Some(before) = previous.get(&service.name) {
            if before != now {
                info!(vendor = %service.name, from = %before, to = %now, "Vendor status changed");
                transitions.push(format!("{}: {} -> {}", service.name, before, now));
            }
        }

        snapshot.insert(service.name.clone(), now.to_string());
    }

    TransitionSet { transitions, snapshot }
}
