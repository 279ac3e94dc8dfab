//! Sync command implementation
//!
//! Full per-host round: prepare the work branch, regenerate the resource
//! document, commit and push it, then make sure a pull request is open.

use std::path::Path;

use console::Style;

use crate::cli::SyncArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::git::GitWorkspace;
use crate::pr::{PullRequestClient, PullRequestParams};
use crate::resource::{commit_message, report, store};

/// Run sync command
pub fn run(config_path: &Path, args: SyncArgs) -> Result<()> {
    let settings = Settings::load(config_path)?;
    let branch = settings.branch_name();

    let workspace = GitWorkspace::prepare(&settings, &branch)?;

    let working_file = settings.working_file();
    let before = if working_file.exists() {
        store::load(&working_file, &settings.package.root_key)?.package_count()
    } else {
        0
    };

    let updates = super::generate::query_updates(&settings, args.input.as_deref())?;
    if updates.is_empty() {
        println!("No package to update");
        return Ok(());
    }

    let resources = super::generate::generate_resources(&settings, &updates)?;
    store::save(&resources, &working_file)?;

    let after = report(&resources, &settings.package.policy);
    let host = gethostname::gethostname().to_string_lossy().into_owned();
    let message = commit_message(&branch, &host, before, &after);

    if workspace.commit_all(&message, &settings)? {
        workspace.push(&branch, &settings)?;
        println!(
            "{} {} to {}",
            Style::new().green().apply_to("Pushed"),
            branch,
            settings.git.url
        );
    } else {
        println!("Nothing to commit on {branch}");
    }

    if args.no_pr {
        return Ok(());
    }

    let client = PullRequestClient::from_settings(&settings);
    if client.open_pull_request_exists(&settings.pr.title)? {
        println!("Pull request already open: {}", settings.pr.title);
    } else {
        let params = PullRequestParams::from_settings(&settings, &branch);
        client.create(&params)?;
        println!(
            "{} pull request: {}",
            Style::new().green().apply_to("Opened"),
            settings.pr.title
        );
    }

    Ok(())
}
