//! Common test utilities for hieraup integration tests

use std::path::PathBuf;
use tempfile::TempDir;

/// A test workspace for integration tests
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a configuration file pointing the work directory at this
    /// workspace and return its path
    pub fn write_config(&self, package_section: &str) -> PathBuf {
        let config = format!(
            r#"general:
  workdir: {workdir}
  hiera_folder: hiera
  file: updates.json
git:
  name: puppet
  src_branch: master
  dest_branch: master
package:
{package_section}
"#,
            workdir = self.path.display()
        );
        let config_path = self.path.join("hieraup.yaml");
        std::fs::write(&config_path, config).expect("Failed to write config");
        config_path
    }

    /// Write a recorded update list and return its path
    pub fn write_updates(&self, content: &str) -> PathBuf {
        let updates_path = self.path.join("recorded_updates.json");
        std::fs::write(&updates_path, content).expect("Failed to write updates");
        updates_path
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from workspace
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_creation() {
        let workspace = TestWorkspace::new();
        assert!(workspace.path.exists());
    }

    #[test]
    fn test_workspace_file_operations() {
        let workspace = TestWorkspace::new();
        workspace.write_file("test/file.txt", "hello");
        assert!(workspace.file_exists("test/file.txt"));
        assert_eq!(workspace.read_file("test/file.txt"), "hello");
    }

    #[test]
    fn test_workspace_write_config() {
        let workspace = TestWorkspace::new();
        let config_path = workspace.write_config("  require: true");
        assert!(config_path.exists());
        assert!(workspace.read_file("hieraup.yaml").contains("require: true"));
    }
}
