//! Package handling policy
//!
//! Distribution-specific knowledge about packages that need special
//! treatment: the kernel family keeps multiple versions installed, a handful
//! of libraries ship multilib architecture variants, and some updates warrant
//! a reboot. Defaults match RHEL/CentOS conventions and every list can be
//! overridden from the configuration file.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Policy lists consulted by the resource builder, bundler, and reporter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackagePolicy {
    /// Packages where multiple versions coexist; resources for these are
    /// keyed `<name>-<version>` with `ensure` fixed to `installed`
    pub multi_version: BTreeSet<String>,

    /// Architecture variants per multilib package
    pub multilib: BTreeMap<String, Vec<String>>,

    /// Whether bundled installs expand multilib packages to one token per
    /// architecture variant
    pub install_multilib: bool,

    /// Packages whose update makes a system restart recommended,
    /// see <https://access.redhat.com/solutions/27943>
    pub reboot_required: BTreeSet<String>,
}

impl Default for PackagePolicy {
    fn default() -> Self {
        let multi_version = ["kernel", "kernel-core", "kernel-devel", "kernel-modules"]
            .into_iter()
            .map(String::from)
            .collect();

        let both = || vec!["i686".to_string(), "x86_64".to_string()];
        let mut multilib = BTreeMap::new();
        multilib.insert("glibc".to_string(), both());
        multilib.insert("glibc-devel".to_string(), both());
        multilib.insert("gnutls".to_string(), vec!["x86_64".to_string()]);
        multilib.insert("libgcc".to_string(), both());
        multilib.insert("libstdc++".to_string(), both());

        let reboot_required = [
            "glibc",
            "hal",
            "kernel",
            "kernel-firmware",
            "linux-firmware",
            "systemd",
            "udev",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        Self {
            multi_version,
            multilib,
            install_multilib: false,
            reboot_required,
        }
    }
}

impl PackagePolicy {
    /// Whether multiple versions of this package coexist on the system
    pub fn is_multi_version(&self, name: &str) -> bool {
        self.multi_version.contains(name)
    }

    /// Architecture variants to install for this package, when multilib
    /// expansion is enabled and the package has variants declared
    pub fn multilib_variants(&self, name: &str) -> Option<&[String]> {
        if !self.install_multilib {
            return None;
        }
        self.multilib.get(name).map(Vec::as_slice)
    }

    /// Whether updating the package behind this resource name warrants a
    /// restart
    ///
    /// Matches the name exactly, or a multi-version key derived from it
    /// (`kernel-4.18.0-1` matches `kernel` but `kernel-devel` does not).
    pub fn requires_reboot(&self, resource_name: &str) -> bool {
        if self.reboot_required.contains(resource_name) {
            return true;
        }
        self.reboot_required.iter().any(|name| {
            resource_name
                .strip_prefix(name.as_str())
                .and_then(|rest| rest.strip_prefix('-'))
                .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
        })
    }
}
