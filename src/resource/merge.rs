//! Merge engine
//!
//! Reconciles a freshly built resource set with the previously persisted one.
//! This is the idempotence-critical path: building twice against an unchanged
//! system and merging must be a no-op.

use crate::resource::{ENSURE_INSTALLED, ResourceSet};

/// Merge a freshly built set into the existing persisted set
///
/// Keys unique to either side are preserved. For shared keys the existing
/// `ensure` wins unless the fresh one introduces a genuinely different
/// pending version; a resource already marked `installed` is never reverted
/// to a pending version (installed state is sticky). Wrapping follows the
/// existing set.
pub fn merge(existing: ResourceSet, fresh: ResourceSet) -> ResourceSet {
    let mut merged = existing;
    for (name, resource) in fresh.into_packages() {
        match merged.get_mut(&name) {
            Some(current) => {
                if current.ensure != resource.ensure && current.ensure != ENSURE_INSTALLED {
                    current.ensure = resource.ensure;
                }
            }
            None => merged.insert(name, resource),
        }
    }
    merged
}
