use std::path::PathBuf;

use clap::Parser;

/// Arguments for the sync command
#[derive(Parser, Debug)]
pub struct SyncArgs {
    /// Read the update list from a JSON file instead of querying the
    /// package manager
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Skip opening a pull request after pushing
    #[arg(long)]
    pub no_pr: bool,
}

#[cfg(test)]
mod tests {
    use super::super::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_cli_parsing_sync_no_pr() {
        let cli = Cli::try_parse_from(["hieraup", "sync", "--no-pr"]).unwrap();
        match cli.command {
            Commands::Sync(args) => assert!(args.no_pr),
            _ => panic!("Expected Sync command"),
        }
    }
}
