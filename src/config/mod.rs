//! Configuration file handling for hieraup
//!
//! All settings live in one YAML file (`hieraup.yaml`) with sections for
//! general paths, the tracked git repository, package handling, and the pull
//! request API. The parsed [`Settings`] struct is passed explicitly into
//! every core function; nothing reads configuration ambiently.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HieraupError, Result};
use crate::policy::PackagePolicy;
use crate::resource::BuildOptions;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub git: GitSettings,
    pub package: PackageSettings,
    pub pr: PullRequestSettings,
}

/// Paths and environment shared by all commands
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory the tracked repository is cloned into; defaults to a
    /// `hieraup` folder under the user cache directory
    pub workdir: PathBuf,

    /// HTTP(S) proxy used for git and the PR API
    pub proxy: Option<String>,

    /// Folder inside the repository holding the Hiera documents
    pub hiera_folder: String,

    /// Per-host resource document file name
    pub file: String,

    /// Shared group baseline file name; when set and different from `file`,
    /// baseline stripping applies
    pub base_file: Option<String>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            workdir: dirs::cache_dir()
                .map(|dir| dir.join("hieraup"))
                .unwrap_or_else(std::env::temp_dir),
            proxy: None,
            hiera_folder: "hiera".to_string(),
            file: "updates.json".to_string(),
            base_file: None,
        }
    }
}

/// Tracked repository and its credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GitSettings {
    /// Clone URL of the shared repository
    pub url: String,

    /// Local directory name of the clone (under `general.workdir`)
    pub name: String,

    /// Account owning the repository (used in the PR source repository)
    pub account_name: String,

    /// Repository name as known to the PR API
    pub repo_name: String,

    /// HTTP user for clone/push and the PR API
    pub user: String,

    /// HTTP password or app token
    pub password: String,

    /// Committer name
    pub username: String,

    /// Committer email
    pub email: String,

    /// Branch the work branch is created from
    pub src_branch: String,

    /// Branch pull requests target
    pub dest_branch: String,

    /// Work branch prefix; when empty, a month-stamped name is generated
    pub work_branch: Option<String>,
}

/// Supported package-query providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Yum,
    Dnf,
}

impl Provider {
    /// Program name as invoked on the host
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Yum => "yum",
            Provider::Dnf => "dnf",
        }
    }
}

/// Resource building and persistence flags
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageSettings {
    /// Namespace key the resources are wrapped under
    pub root_key: String,

    /// Place all resources under `root_key`
    pub wrap: bool,

    /// Attach the origin repository as a required resource
    pub require: bool,

    /// Pin installs to the package's source repository
    pub repo_in_resource: bool,

    /// Mark resources as installable from cache only
    pub install_from_cache: bool,

    /// Merge the fresh set with the persisted document
    pub merge: bool,

    /// Group packages into composite install actions
    pub bundle: bool,

    /// Bundle definitions file (JSON)
    pub bundle_list: Option<PathBuf>,

    /// Persist the result instead of printing it
    pub save: bool,

    /// Restrict queries to these repositories
    pub repos: Vec<String>,

    /// Package-query provider
    pub provider: Provider,

    /// Package handling policy (multi-version, multilib, reboot lists)
    #[serde(flatten)]
    pub policy: PackagePolicy,
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            root_key: "packages".to_string(),
            wrap: true,
            require: false,
            repo_in_resource: false,
            install_from_cache: false,
            merge: true,
            bundle: true,
            bundle_list: None,
            save: false,
            repos: Vec::new(),
            provider: Provider::default(),
            policy: PackagePolicy::default(),
        }
    }
}

impl PackageSettings {
    /// Builder flags derived from this section
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            wrap: self.wrap,
            require_repo: self.require,
            filter_repo: self.repo_in_resource,
            install_from_cache: self.install_from_cache,
            root_key: self.root_key.clone(),
        }
    }
}

/// Pull request API settings (Bitbucket Cloud 2.0)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestSettings {
    /// Pull requests endpoint of the repository
    pub api_url: String,

    /// Title used both for creation and for the already-open check
    pub title: String,

    /// Pull request description
    pub description: String,

    /// Reviewer usernames
    pub reviewers: Vec<String>,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                HieraupError::ConfigNotFound {
                    path: path.display().to_string(),
                }
            } else {
                HieraupError::ConfigParseFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        serde_yaml::from_str(&content).map_err(|e| HieraupError::ConfigParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Root of the local clone of the tracked repository
    pub fn repository_path(&self) -> PathBuf {
        self.general.workdir.join(&self.git.name)
    }

    /// Per-host resource document inside the clone
    pub fn working_file(&self) -> PathBuf {
        self.repository_path()
            .join(&self.general.hiera_folder)
            .join(&self.general.file)
    }

    /// Group baseline document inside the clone, when configured and
    /// distinct from the per-host file
    pub fn base_file(&self) -> Option<PathBuf> {
        let base = self.general.base_file.as_ref()?;
        if base == &self.general.file {
            return None;
        }
        Some(
            self.repository_path()
                .join(&self.general.hiera_folder)
                .join(base),
        )
    }

    /// Work branch name: `<work_branch>_<src_branch>`, or a month-stamped
    /// `OS_Update_<Month>_<Year>_<src_branch>` when no prefix is configured
    pub fn branch_name(&self) -> String {
        match self
            .git
            .work_branch
            .as_deref()
            .filter(|prefix| !prefix.is_empty())
        {
            Some(prefix) => format!("{}_{}", prefix, self.git.src_branch),
            None => format!(
                "OS_Update_{}_{}",
                chrono::Local::now().format("%B_%Y"),
                self.git.src_branch
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings: Settings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings.package.root_key, "packages");
        assert!(settings.package.wrap);
        assert!(settings.package.merge);
        assert!(settings.package.bundle);
        assert!(!settings.package.save);
        assert_eq!(settings.package.provider, Provider::Yum);
        assert_eq!(settings.general.hiera_folder, "hiera");
    }

    #[test]
    fn test_settings_parse_sections() {
        let yaml = r#"
general:
  workdir: /tmp
  hiera_folder: hieradata
  file: CentOS_7.json
  base_file: base.json
git:
  url: https://bitbucket.org/acme/puppet.git
  name: puppet
  src_branch: master
  dest_branch: master
  work_branch: os_updates
package:
  root_key: yum_updates
  require: true
  provider: dnf
  install_multilib: true
pr:
  api_url: https://api.bitbucket.org/2.0/repositories/acme/puppet/pullrequests
  title: OS updates
  reviewers: [alice, bob]
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.package.root_key, "yum_updates");
        assert!(settings.package.require);
        assert_eq!(settings.package.provider, Provider::Dnf);
        assert!(settings.package.policy.install_multilib);
        assert_eq!(settings.pr.reviewers, vec!["alice", "bob"]);
        assert_eq!(
            settings.working_file(),
            PathBuf::from("/tmp/puppet/hieradata/CentOS_7.json")
        );
        assert_eq!(
            settings.base_file(),
            Some(PathBuf::from("/tmp/puppet/hieradata/base.json"))
        );
        assert_eq!(settings.branch_name(), "os_updates_master");
    }

    #[test]
    fn test_base_file_none_when_same_as_file() {
        let mut settings = Settings::default();
        settings.general.file = "updates.json".to_string();
        settings.general.base_file = Some("updates.json".to_string());
        assert!(settings.base_file().is_none());
    }

    #[test]
    fn test_branch_name_month_stamped_fallback() {
        let mut settings = Settings::default();
        settings.git.src_branch = "master".to_string();
        settings.git.work_branch = Some(String::new());

        let branch = settings.branch_name();
        assert!(branch.starts_with("OS_Update_"));
        assert!(branch.ends_with("_master"));
    }

    #[test]
    fn test_build_options_mapping() {
        let mut package = PackageSettings::default();
        package.require = true;
        package.repo_in_resource = true;

        let opts = package.build_options();
        assert!(opts.wrap);
        assert!(opts.require_repo);
        assert!(opts.filter_repo);
        assert!(!opts.install_from_cache);
        assert_eq!(opts.root_key, "packages");
    }

    #[test]
    fn test_load_missing_config() {
        let result = Settings::load(Path::new("/nonexistent/hieraup.yaml"));
        assert!(matches!(result, Err(HieraupError::ConfigNotFound { .. })));
    }
}
