//! Update report
//!
//! Derives the package count and a reboot recommendation from a resource
//! set, and turns before/after counts into the commit message used when the
//! per-host branch is pushed.

use crate::policy::PackagePolicy;
use crate::resource::ResourceSet;

/// Summary of a persisted or freshly computed resource set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// Number of package resources in the set
    pub package_count: usize,
    /// Whether any pending update warrants a system restart
    pub reboot_recommended: bool,
}

/// Summarize a resource set against the reboot policy
pub fn report(set: &ResourceSet, policy: &PackagePolicy) -> UpdateReport {
    let reboot_recommended = set
        .packages()
        .any(|(name, _)| policy.requires_reboot(name));
    UpdateReport {
        package_count: set.package_count(),
        reboot_recommended,
    }
}

/// Compose the commit message from the counts before and after a run
pub fn commit_message(branch: &str, host: &str, before: usize, after: &UpdateReport) -> String {
    let mut message = if before == 0 && after.package_count > 0 {
        format!("Found {} packages to update on {host}", after.package_count)
    } else if before > 0 && after.package_count > before {
        format!(
            "Added {} packages to update on {host}",
            after.package_count - before
        )
    } else {
        format!("{branch} from {host}")
    };

    if after.reboot_recommended {
        message.push_str(", system restart recommended");
    }
    message
}
