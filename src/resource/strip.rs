//! Baseline stripper
//!
//! When many hosts share a baseline resource document, only host-specific
//! deltas should be persisted per host. Stripping removes from the computed
//! set every entry that is structurally identical to the baseline entry.

use crate::resource::ResourceSet;

/// Remove computed entries that are identical to the baseline
///
/// Base and computed may differ in wrapping; comparison happens on the
/// unwrapped packages, and the computed set keeps its original wrapping.
/// Entries missing from the baseline are kept.
pub fn strip(base: &ResourceSet, computed: ResourceSet) -> ResourceSet {
    let mut stripped = computed;
    stripped.retain_packages(|name, resource| base.get(name) != Some(resource));
    stripped
}
