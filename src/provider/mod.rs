//! Package update providers
//!
//! The core consumes an already-normalized list of [`PackageUpdate`] records
//! through the [`UpdateProvider`] capability, regardless of which package
//! manager produced it:
//! - [`check_update`]: shells out to `yum`/`dnf -q check-update`
//! - [`file`]: reads a JSON array from a file (offline runs and tests)

pub mod check_update;
pub mod file;

pub use check_update::CheckUpdateProvider;
pub use file::FileProvider;

use crate::error::Result;
use crate::resource::PackageUpdate;

/// Source of the updatable-package list
pub trait UpdateProvider {
    /// Query the pending updates; an empty list is a valid result
    fn query_updates(&self) -> Result<Vec<PackageUpdate>>;
}
