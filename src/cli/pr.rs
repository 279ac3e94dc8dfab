use clap::Parser;

/// Arguments for the pr command
#[derive(Parser, Debug)]
pub struct PrArgs {
    /// Create the pull request even when one with the same title is open
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::super::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_cli_parsing_pr_force() {
        let cli = Cli::try_parse_from(["hieraup", "pr", "--force"]).unwrap();
        match cli.command {
            Commands::Pr(args) => assert!(args.force),
            _ => panic!("Expected Pr command"),
        }
    }
}
