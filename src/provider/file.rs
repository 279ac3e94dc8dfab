//! Provider reading updates from a JSON file
//!
//! The file holds an array of `{name, repo, version}` records, the same
//! shape the query providers emit. Used for offline runs and tests.

use std::fs;
use std::path::PathBuf;

use crate::error::{HieraupError, Result};
use crate::provider::UpdateProvider;
use crate::resource::PackageUpdate;

/// Reads the update list from a JSON file instead of querying the host
#[derive(Debug, Clone)]
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl UpdateProvider for FileProvider {
    fn query_updates(&self) -> Result<Vec<PackageUpdate>> {
        let content = fs::read_to_string(&self.path).map_err(|e| HieraupError::ProviderFailed {
            message: format!("failed to read {}: {e}", self.path.display()),
        })?;
        serde_json::from_str(&content).map_err(|e| HieraupError::ProviderFailed {
            message: format!("failed to parse {}: {e}", self.path.display()),
        })
    }
}
