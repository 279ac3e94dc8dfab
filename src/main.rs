//! hieraup - package update tracker
//!
//! Queries the host package manager for pending updates, renders them into a
//! Puppet Hiera resource document, commits the document to a per-host branch
//! in a shared repository, and opens a pull request for review.

use clap::Parser;

mod cli;
mod commands;
mod config;
mod error;
mod git;
mod policy;
mod pr;
mod provider;
mod resource;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        eprintln!("Using configuration file: {}", cli.config.display());
    }

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(&cli.config, args),
        Commands::Sync(args) => commands::sync::run(&cli.config, args),
        Commands::Pr(args) => commands::pr::run(&cli.config, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
