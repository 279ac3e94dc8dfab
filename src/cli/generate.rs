use std::path::PathBuf;

use clap::Parser;

/// Arguments for the generate command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Print the resource document:\n    hieraup generate\n\n\
                   Persist into the configured clone:\n    hieraup generate --save\n\n\
                   Build from a recorded update list:\n    hieraup generate --input updates.json")]
pub struct GenerateArgs {
    /// Read the update list from a JSON file instead of querying the
    /// package manager
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Persist the document even when the configuration says print-only
    #[arg(long)]
    pub save: bool,
}
