//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - generate: Generate command arguments
//! - sync: Sync command arguments
//! - pr: Pull request command arguments
//! - completions: Completions command arguments

use std::path::PathBuf;

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};

pub mod completions;
pub mod generate;
pub mod pr;
pub mod sync;

pub use completions::CompletionsArgs;
pub use generate::GenerateArgs;
pub use pr::PrArgs;
pub use sync::SyncArgs;

/// hieraup - package update tracker
///
/// Render pending OS package updates as Puppet Hiera resources and open
/// review pull requests.
#[derive(Parser, Debug)]
#[command(
    name = "hieraup",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Tracks pending OS package updates as Puppet Hiera resources",
    long_about = "hieraup queries the host package manager for pending updates, renders them \
                  into a declarative Hiera resource document, commits the document to a \
                  per-host branch in a shared repository, and opens a pull request for review.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  hieraup generate                      \x1b[90m# Print the resource document\x1b[0m\n   \
                  hieraup generate --save               \x1b[90m# Persist it into the local clone\x1b[0m\n   \
                  hieraup sync                          \x1b[90m# Generate, commit, push, open PR\x1b[0m\n   \
                  hieraup pr                            \x1b[90m# Open the pull request only\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Configuration file
    #[arg(
        long,
        short = 'c',
        global = true,
        env = "HIERAUP_CONFIG",
        default_value = "hieraup.yaml"
    )]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the resource document from pending updates
    Generate(GenerateArgs),

    /// Generate, commit to the work branch, push, and open a pull request
    Sync(SyncArgs),

    /// Open the pull request for the current work branch
    Pr(PrArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
