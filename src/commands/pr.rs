//! Pull request command implementation

use std::path::Path;

use console::Style;

use crate::cli::PrArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::pr::{PullRequestClient, PullRequestParams};

/// Run pr command
pub fn run(config_path: &Path, args: PrArgs) -> Result<()> {
    let settings = Settings::load(config_path)?;
    let client = PullRequestClient::from_settings(&settings);

    if !args.force && client.open_pull_request_exists(&settings.pr.title)? {
        println!("Pull request already open: {}", settings.pr.title);
        return Ok(());
    }

    let branch = settings.branch_name();
    let params = PullRequestParams::from_settings(&settings, &branch);
    client.create(&params)?;
    println!(
        "{} pull request: {} ({} -> {})",
        Style::new().green().apply_to("Opened"),
        settings.pr.title,
        branch,
        settings.git.dest_branch
    );

    Ok(())
}
