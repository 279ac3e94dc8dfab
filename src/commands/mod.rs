//! Command implementations for the hieraup CLI

pub mod completions;
pub mod generate;
pub mod pr;
pub mod sync;
pub mod version;
