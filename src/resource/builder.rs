//! Resource builder
//!
//! Converts the raw update list from the package-query provider into a
//! resource set, applying the configured policy flags: repo pinning,
//! cache-only installs, repo-dependency requirement, multi-version package
//! renaming, and root-key wrapping.

use std::collections::BTreeMap;

use crate::error::{HieraupError, Result};
use crate::policy::PackagePolicy;
use crate::resource::{
    ENSURE_INSTALLED, InstallOption, PackageResource, PackageUpdate, ResourceSet,
};

/// Flags controlling how package updates are rendered into resources
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Place all resources under the root key
    pub wrap: bool,
    /// Attach the origin repository as a required resource
    pub require_repo: bool,
    /// Pin the install to the package's source repository
    pub filter_repo: bool,
    /// Mark the resource as installable from cache only
    pub install_from_cache: bool,
    /// Namespace key used when wrapping
    pub root_key: String,
}

/// Build a resource set from the raw package update list
///
/// Duplicate package names overwrite earlier entries (last write wins); the
/// input is expected to be de-duplicated upstream. Input order is otherwise
/// irrelevant since the set is keyed by name.
pub fn build(
    updates: &[PackageUpdate],
    opts: &BuildOptions,
    policy: &PackagePolicy,
) -> Result<ResourceSet> {
    if opts.wrap && opts.root_key.is_empty() {
        return Err(HieraupError::ConfigInvalid {
            message: "wrapping resources requires a non-empty root_key".to_string(),
        });
    }

    let mut set = ResourceSet::new(opts.wrap.then(|| opts.root_key.clone()));
    for update in updates {
        let (name, resource) = package_resource(update, opts, policy);
        set.insert(name, resource);
    }
    Ok(set)
}

/// Render one package update into a named resource
fn package_resource(
    update: &PackageUpdate,
    opts: &BuildOptions,
    policy: &PackagePolicy,
) -> (String, PackageResource) {
    // Multi-version packages carry the version in the resource name so that
    // several installed versions coexist as distinct resources.
    let (name, ensure) = if policy.is_multi_version(&update.name) {
        (
            format!("{}-{}", update.name, update.version),
            ENSURE_INSTALLED.to_string(),
        )
    } else {
        (update.name.clone(), update.version.clone())
    };

    let mut resource = PackageResource::new(ensure);

    if opts.require_repo {
        resource.require = Some(format!("YumRepo[{}]", update.repo));
    }

    if opts.filter_repo || opts.install_from_cache {
        let mut options = Vec::new();
        if opts.filter_repo {
            let mut pairs = BTreeMap::new();
            pairs.insert("--disablerepo".to_string(), "*".to_string());
            pairs.insert("--enablerepo".to_string(), update.repo.clone());
            options.push(InstallOption::Pairs(pairs));
        }
        if opts.install_from_cache {
            options.push(InstallOption::Flag("--cacheonly".to_string()));
        }
        resource.install_options = Some(options);
    }

    (name, resource)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(name: &str, repo: &str, version: &str) -> PackageUpdate {
        PackageUpdate {
            name: name.to_string(),
            repo: repo.to_string(),
            version: version.to_string(),
        }
    }

    fn wrapped_opts() -> BuildOptions {
        BuildOptions {
            wrap: true,
            root_key: "packages".to_string(),
            ..BuildOptions::default()
        }
    }

    #[test]
    fn test_build_basic_resource() {
        let updates = vec![update("httpd", "base", "2.4.6-1")];
        let opts = BuildOptions {
            require_repo: true,
            ..wrapped_opts()
        };

        let set = build(&updates, &opts, &PackagePolicy::default()).unwrap();
        let value = set.to_value();
        assert_eq!(
            value,
            serde_json::json!({
                "packages": {
                    "httpd": {"ensure": "2.4.6-1", "require": "YumRepo[base]"}
                }
            })
        );
    }

    #[test]
    fn test_build_unwrapped() {
        let updates = vec![update("httpd", "base", "2.4.6-1")];
        let opts = BuildOptions::default();

        let set = build(&updates, &opts, &PackagePolicy::default()).unwrap();
        assert_eq!(set.root_key(), None);
        assert_eq!(set.get("httpd").unwrap().ensure, "2.4.6-1");
    }

    #[test]
    fn test_build_wrap_without_root_key_fails() {
        let opts = BuildOptions {
            wrap: true,
            root_key: String::new(),
            ..BuildOptions::default()
        };
        let result = build(&[], &opts, &PackagePolicy::default());
        assert!(matches!(result, Err(HieraupError::ConfigInvalid { .. })));
    }

    #[test]
    fn test_build_multi_version_package() {
        let updates = vec![update("kernel", "base", "4.18.0-1")];
        let set = build(&updates, &wrapped_opts(), &PackagePolicy::default()).unwrap();

        assert!(set.get("kernel").is_none());
        let kernel = set.get("kernel-4.18.0-1").unwrap();
        assert_eq!(kernel.ensure, ENSURE_INSTALLED);
    }

    #[test]
    fn test_build_filter_repo_options() {
        let updates = vec![update("httpd", "base", "2.4.6-1")];
        let opts = BuildOptions {
            filter_repo: true,
            ..wrapped_opts()
        };

        let set = build(&updates, &opts, &PackagePolicy::default()).unwrap();
        let value = set.to_value();
        assert_eq!(
            value["packages"]["httpd"]["install_options"],
            serde_json::json!([{"--disablerepo": "*", "--enablerepo": "base"}])
        );
    }

    #[test]
    fn test_build_install_from_cache_option() {
        let updates = vec![update("httpd", "base", "2.4.6-1")];
        let opts = BuildOptions {
            filter_repo: true,
            install_from_cache: true,
            ..wrapped_opts()
        };

        let set = build(&updates, &opts, &PackagePolicy::default()).unwrap();
        let options = set.get("httpd").unwrap().install_options.clone().unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(
            options[1],
            InstallOption::Flag("--cacheonly".to_string())
        );
    }

    #[test]
    fn test_build_cache_only_without_filter() {
        let updates = vec![update("httpd", "base", "2.4.6-1")];
        let opts = BuildOptions {
            install_from_cache: true,
            ..wrapped_opts()
        };

        let set = build(&updates, &opts, &PackagePolicy::default()).unwrap();
        let options = set.get("httpd").unwrap().install_options.clone().unwrap();
        assert_eq!(options, vec![InstallOption::Flag("--cacheonly".to_string())]);
    }

    #[test]
    fn test_build_duplicate_names_last_write_wins() {
        let updates = vec![
            update("httpd", "base", "2.4.6-1"),
            update("httpd", "updates", "2.4.6-2"),
        ];
        let set = build(&updates, &wrapped_opts(), &PackagePolicy::default()).unwrap();
        assert_eq!(set.package_count(), 1);
        assert_eq!(set.get("httpd").unwrap().ensure, "2.4.6-2");
    }

    #[test]
    fn test_build_no_options_when_flags_unset() {
        let updates = vec![update("httpd", "base", "2.4.6-1")];
        let set = build(&updates, &wrapped_opts(), &PackagePolicy::default()).unwrap();
        let httpd = set.get("httpd").unwrap();
        assert!(httpd.require.is_none());
        assert!(httpd.install_options.is_none());
    }
}
