//! Persisted resource document handling
//!
//! The resource set is persisted as pretty-printed JSON with alphabetically
//! sorted keys so that consecutive runs produce stable, reviewable diffs.
//! Read-then-write across merge/strip is not transactional; the design
//! assumes at most one run per host at a time.

use std::fs;
use std::path::Path;

use crate::error::{HieraupError, Result};
use crate::resource::ResourceSet;

/// Load a persisted resource document
///
/// A missing file and an unparseable file are both reported; callers decide
/// whether a missing document means "skip" (first run, missing baseline).
pub fn load(path: &Path, root_key: &str) -> Result<ResourceSet> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            HieraupError::ResourceFileNotFound {
                path: path.display().to_string(),
            }
        } else {
            HieraupError::ResourceParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    let value: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| HieraupError::ResourceParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    ResourceSet::from_value(&value, root_key)
}

/// Render a resource set as the persisted document text
pub fn render(set: &ResourceSet) -> Result<String> {
    let mut rendered = serde_json::to_string_pretty(&set.to_value())?;
    rendered.push('\n');
    Ok(rendered)
}

/// Persist a resource set, creating parent directories as needed
pub fn save(set: &ResourceSet, path: &Path) -> Result<()> {
    let rendered = render(set)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| HieraupError::FileWriteFailed {
            path: parent.display().to_string(),
            reason: e.to_string(),
        })?;
    }

    fs::write(path, rendered).map_err(|e| HieraupError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
