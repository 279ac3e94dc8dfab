//! Declarative package resource model
//!
//! This module contains the in-memory representation of the Hiera resource
//! document and the transformations applied to it:
//! - [`builder`]: raw update list -> resource set
//! - [`merge`]: reconcile a fresh set with a persisted one
//! - [`strip`]: remove entries identical to a group baseline
//! - [`bundle`]: group packages into composite install actions
//! - [`report`]: package counts and reboot recommendation
//! - [`store`]: persisted JSON document handling

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{HieraupError, Result};

pub mod builder;
pub mod bundle;
pub mod merge;
pub mod report;
pub mod store;
pub mod strip;

pub use builder::{BuildOptions, build};
pub use bundle::{BundleDefinitions, bundle, load_definitions};
pub use merge::merge;
pub use report::{UpdateReport, commit_message, report};
pub use strip::strip;

/// `ensure` value meaning "present, version pinned externally".
///
/// Used for multi-version packages (the kernel family) where several versions
/// coexist as distinct resources, and honored as sticky state by [`merge`].
pub const ENSURE_INSTALLED: &str = "installed";

/// Key under which composite install actions are emitted alongside packages
pub const EXECS_KEY: &str = "execs";

/// One updatable package as reported by the package-query provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageUpdate {
    /// Package name
    pub name: String,
    /// Source repository (channel) identifier
    pub repo: String,
    /// Pending version as `<version>-<release>`
    pub version: String,
}

/// A single install option attached to a package resource
///
/// Serializes either as a bare flag string (`"--cacheonly"`) or as a mapping
/// of flag to value (`{"--disablerepo": "*", "--enablerepo": "base"}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InstallOption {
    /// Bare flag passed to the package provider
    Flag(String),
    /// Flag-to-value pairs passed together
    Pairs(BTreeMap<String, String>),
}

/// Desired state of one package, keyed by resource name in a [`ResourceSet`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageResource {
    /// Target version, or the [`ENSURE_INSTALLED`] sentinel
    pub ensure: String,

    /// Reference to another resource this package depends on,
    /// e.g. `YumRepo[base]` or `Exec[update_webstack]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require: Option<String>,

    /// Ordered provider flags for the install
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_options: Option<Vec<InstallOption>>,
}

impl PackageResource {
    /// Create a resource pinned to a version (or the installed sentinel)
    pub fn new(ensure: impl Into<String>) -> Self {
        Self {
            ensure: ensure.into(),
            require: None,
            install_options: None,
        }
    }
}

/// Composite install action covering all packages of one bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallAction {
    /// Full provider invocation, e.g. `yum -y install pkg-1.0-1 other-2.0-1`
    pub command: String,
    /// Search path for the command
    pub path: String,
    /// Guard command; the action is skipped when it succeeds
    pub unless: String,
}

/// A mapping of resource names to package resources, optionally wrapped under
/// a root key, with a sibling map of composite install actions
///
/// Key ordering is alphabetical (`BTreeMap`) so that persisted documents are
/// stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceSet {
    root_key: Option<String>,
    packages: BTreeMap<String, PackageResource>,
    execs: BTreeMap<String, InstallAction>,
}

impl ResourceSet {
    /// Create an empty set, wrapped under `root_key` when given
    pub fn new(root_key: Option<String>) -> Self {
        Self {
            root_key,
            packages: BTreeMap::new(),
            execs: BTreeMap::new(),
        }
    }

    /// Root key this set is wrapped under, if any
    pub fn root_key(&self) -> Option<&str> {
        self.root_key.as_deref()
    }

    /// Wrap (or re-wrap) the set under a root key
    pub fn wrap(&mut self, root_key: impl Into<String>) {
        self.root_key = Some(root_key.into());
    }

    /// Number of package resources
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Whether the set contains no package resources
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Insert a package resource; an existing entry with the same name is
    /// overwritten (last write wins)
    pub fn insert(&mut self, name: impl Into<String>, resource: PackageResource) {
        self.packages.insert(name.into(), resource);
    }

    /// Look up a package resource by name
    pub fn get(&self, name: &str) -> Option<&PackageResource> {
        self.packages.get(name)
    }

    /// Look up a package resource by name (mutable)
    pub fn get_mut(&mut self, name: &str) -> Option<&mut PackageResource> {
        self.packages.get_mut(name)
    }

    /// Iterate package resources in name order
    pub fn packages(&self) -> impl Iterator<Item = (&String, &PackageResource)> {
        self.packages.iter()
    }

    /// Consume the set, yielding its packages in name order
    pub fn into_packages(self) -> BTreeMap<String, PackageResource> {
        self.packages
    }

    /// Keep only the packages for which `keep` returns true
    pub fn retain_packages(&mut self, mut keep: impl FnMut(&str, &PackageResource) -> bool) {
        self.packages.retain(|name, resource| keep(name, resource));
    }

    /// Install actions attached to this set
    pub fn execs(&self) -> &BTreeMap<String, InstallAction> {
        &self.execs
    }

    /// Replace the install actions of this set
    pub fn set_execs(&mut self, execs: BTreeMap<String, InstallAction>) {
        self.execs = execs;
    }

    /// Render the set as a JSON document
    ///
    /// Wrapped sets nest packages under the root key; `execs` is emitted as a
    /// sibling mapping only when at least one install action exists.
    pub fn to_value(&self) -> serde_json::Value {
        let packages: serde_json::Map<String, serde_json::Value> = self
            .packages
            .iter()
            .map(|(name, resource)| {
                (
                    name.clone(),
                    serde_json::to_value(resource).unwrap_or(serde_json::Value::Null),
                )
            })
            .collect();

        let mut doc = serde_json::Map::new();
        match &self.root_key {
            Some(key) => {
                doc.insert(key.clone(), serde_json::Value::Object(packages));
            }
            None => doc.extend(packages),
        }

        if !self.execs.is_empty() {
            let execs: serde_json::Map<String, serde_json::Value> = self
                .execs
                .iter()
                .map(|(name, action)| {
                    (
                        name.clone(),
                        serde_json::to_value(action).unwrap_or(serde_json::Value::Null),
                    )
                })
                .collect();
            doc.insert(EXECS_KEY.to_string(), serde_json::Value::Object(execs));
        }

        serde_json::Value::Object(doc)
    }

    /// Parse a JSON document into a resource set
    ///
    /// Wrapping is detected by presence of `root_key` in the document, so
    /// both wrapped and flat documents parse into the same model.
    pub fn from_value(value: &serde_json::Value, root_key: &str) -> Result<Self> {
        let doc = value
            .as_object()
            .ok_or_else(|| HieraupError::ResourceDocumentInvalid {
                reason: "document root is not a mapping".to_string(),
            })?;

        let mut set = ResourceSet::new(None);

        let package_entries: Vec<(&String, &serde_json::Value)> = match doc.get(root_key) {
            Some(wrapped) => {
                set.root_key = Some(root_key.to_string());
                let packages = wrapped.as_object().ok_or_else(|| {
                    HieraupError::ResourceDocumentInvalid {
                        reason: format!("'{root_key}' is not a mapping"),
                    }
                })?;
                packages.iter().collect()
            }
            None => doc.iter().filter(|(key, _)| *key != EXECS_KEY).collect(),
        };

        for (name, entry) in package_entries {
            let resource: PackageResource =
                serde_json::from_value(entry.clone()).map_err(|e| {
                    HieraupError::ResourceDocumentInvalid {
                        reason: format!("package '{name}': {e}"),
                    }
                })?;
            set.packages.insert(name.clone(), resource);
        }

        if let Some(execs) = doc.get(EXECS_KEY) {
            set.execs = serde_json::from_value(execs.clone()).map_err(|e| {
                HieraupError::ResourceDocumentInvalid {
                    reason: format!("'{EXECS_KEY}': {e}"),
                }
            })?;
        }

        Ok(set)
    }
}
