//! Provider shelling out to `yum`/`dnf -q check-update`
//!
//! `check-update` exits 100 when updates are available, 0 when the system is
//! current, and anything else on failure. Each listing line is
//! `<name>.<arch>  <version>-<release>  <repo>`.

use std::process::Command;

use crate::config::Provider;
use crate::error::{HieraupError, Result};
use crate::provider::UpdateProvider;
use crate::resource::PackageUpdate;

const UPDATES_AVAILABLE: i32 = 100;

/// Queries the host package manager for pending updates
#[derive(Debug, Clone)]
pub struct CheckUpdateProvider {
    program: Provider,
    repos: Vec<String>,
}

impl CheckUpdateProvider {
    /// Create a provider for the given program, optionally restricted to a
    /// set of repositories
    pub fn new(program: Provider, repos: Vec<String>) -> Self {
        Self { program, repos }
    }
}

impl UpdateProvider for CheckUpdateProvider {
    fn query_updates(&self) -> Result<Vec<PackageUpdate>> {
        let output = Command::new(self.program.as_str())
            .args(["-q", "check-update"])
            .output()
            .map_err(|e| HieraupError::ProviderFailed {
                message: format!("failed to run {} check-update: {e}", self.program.as_str()),
            })?;

        match output.status.code() {
            Some(0) => Ok(Vec::new()),
            Some(UPDATES_AVAILABLE) => Ok(parse_check_update(
                &String::from_utf8_lossy(&output.stdout),
                &self.repos,
            )),
            code => Err(HieraupError::ProviderFailed {
                message: format!(
                    "{} check-update exited with {:?}: {}",
                    self.program.as_str(),
                    code,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            }),
        }
    }
}

/// Parse `check-update` listing output into update records
///
/// Lines that do not look like a package listing (blank lines, the
/// "Obsoleting Packages" trailer and everything after it) are skipped. When
/// `repos` is non-empty, updates from other repositories are dropped.
pub fn parse_check_update(output: &str, repos: &[String]) -> Vec<PackageUpdate> {
    let mut updates = Vec::new();

    for line in output.lines() {
        if line.trim().eq_ignore_ascii_case("Obsoleting Packages") {
            break;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 {
            continue;
        }

        // Drop the trailing ".<arch>" from the package column
        let name = match fields[0].rsplit_once('.') {
            Some((name, _arch)) => name,
            None => fields[0],
        };
        let repo = fields[2];

        if !repos.is_empty() && !repos.iter().any(|r| r == repo) {
            continue;
        }

        updates.push(PackageUpdate {
            name: name.to_string(),
            repo: repo.to_string(),
            version: fields[1].to_string(),
        });
    }

    updates
}
