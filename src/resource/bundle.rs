//! Bundler
//!
//! Groups package resources sharing a named bundle into single composite
//! install actions, rewriting each bundled package's dependency link to point
//! at the bundle action instead of its repository.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::error::{HieraupError, Result};
use crate::policy::PackagePolicy;
use crate::resource::{InstallAction, ResourceSet};

/// Mapping of bundle name to the set of package names installed together
pub type BundleDefinitions = BTreeMap<String, BTreeSet<String>>;

/// Search path baked into every install action
const EXEC_PATH: &str = "/bin:/usr/bin/";

/// Load bundle definitions from a JSON file
pub fn load_definitions(path: &Path) -> Result<BundleDefinitions> {
    let content = fs::read_to_string(path).map_err(|e| HieraupError::BundleDefinitionsInvalid {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| HieraupError::BundleDefinitionsInvalid {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Group bundled packages into composite install actions
///
/// Deterministic: packages and bundles are both iterated in name order, so
/// the same inputs always produce identical commands. The result is wrapped
/// under `root_key`; the `execs` mapping is present only when at least one
/// bundle matched. A package claimed by more than one bundle is an error.
pub fn bundle(
    set: ResourceSet,
    root_key: &str,
    definitions: &BundleDefinitions,
    policy: &PackagePolicy,
    provider: &str,
) -> Result<ResourceSet> {
    let mut bundled = set;
    let mut actions: BTreeMap<String, InstallAction> = BTreeMap::new();

    let entries: Vec<(String, String)> = bundled
        .packages()
        .map(|(name, resource)| (name.clone(), resource.ensure.clone()))
        .collect();

    for (name, ensure) in entries {
        let mut claimed_by: Option<&str> = None;
        for (bundle_name, members) in definitions {
            if !members.contains(&name) {
                continue;
            }
            if let Some(previous) = claimed_by {
                return Err(HieraupError::DuplicateBundleMembership {
                    package: name,
                    bundles: format!("{previous}, {bundle_name}"),
                });
            }
            claimed_by = Some(bundle_name);

            let action_key = format!("update_{bundle_name}");
            let token = install_token(&name, &ensure, policy);
            match actions.get_mut(&action_key) {
                Some(action) => action.command.push_str(&token),
                None => {
                    actions.insert(
                        action_key.clone(),
                        InstallAction {
                            command: format!("{provider} -y install{token}"),
                            path: EXEC_PATH.to_string(),
                            // Guard is seeded from the first package only;
                            // later bundle members do not extend it.
                            unless: format!("rpm -q {name}-{ensure}"),
                        },
                    );
                }
            }

            if let Some(resource) = bundled.get_mut(&name) {
                resource.require = Some(format!("Exec[{action_key}]"));
            }
        }
    }

    bundled.wrap(root_key);
    bundled.set_execs(actions);
    Ok(bundled)
}

/// Fully-qualified install token(s) for one package, space-prefixed
///
/// Multilib packages expand to one token per declared architecture variant.
fn install_token(name: &str, ensure: &str, policy: &PackagePolicy) -> String {
    match policy.multilib_variants(name) {
        Some(variants) => variants
            .iter()
            .map(|arch| format!(" {name}-{ensure}.{arch}"))
            .collect(),
        None => format!(" {name}-{ensure}"),
    }
}
