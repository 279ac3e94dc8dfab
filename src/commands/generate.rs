//! Generate command implementation
//!
//! Runs the core pipeline: query updates, build the resource set, merge it
//! with the persisted document, strip the group baseline, bundle, and
//! finally persist or print the result.

use std::path::Path;

use console::Style;

use crate::cli::GenerateArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::provider::{CheckUpdateProvider, FileProvider, UpdateProvider};
use crate::resource::{
    BundleDefinitions, PackageUpdate, ResourceSet, build, bundle, load_definitions, merge, store,
    strip,
};

/// Run generate command
pub fn run(config_path: &Path, args: GenerateArgs) -> Result<()> {
    let settings = Settings::load(config_path)?;
    let updates = query_updates(&settings, args.input.as_deref())?;

    if updates.is_empty() {
        println!("No package to update");
        return Ok(());
    }

    let resources = generate_resources(&settings, &updates)?;

    if settings.package.save || args.save {
        let working_file = settings.working_file();
        store::save(&resources, &working_file)?;
        println!(
            "{} {} package resources to {}",
            Style::new().green().apply_to("Saved"),
            resources.package_count(),
            working_file.display()
        );
    } else {
        print!("{}", store::render(&resources)?);
    }

    Ok(())
}

/// Query the update list from the configured provider or a recorded file
pub fn query_updates(
    settings: &Settings,
    input: Option<&Path>,
) -> Result<Vec<PackageUpdate>> {
    match input {
        Some(path) => FileProvider::new(path).query_updates(),
        None => CheckUpdateProvider::new(
            settings.package.provider,
            settings.package.repos.clone(),
        )
        .query_updates(),
    }
}

/// Core pipeline: build, merge against the persisted document, strip the
/// baseline, bundle
///
/// Pure over its inputs apart from reading the persisted/baseline/bundle
/// files named by the configuration. Persisting the result is the caller's
/// decision.
pub fn generate_resources(
    settings: &Settings,
    updates: &[PackageUpdate],
) -> Result<ResourceSet> {
    let opts = settings.package.build_options();
    let policy = &settings.package.policy;

    let mut resources = build(updates, &opts, policy)?;

    let working_file = settings.working_file();
    if settings.package.merge && working_file.exists() {
        let existing = store::load(&working_file, &settings.package.root_key)?;
        resources = merge(existing, resources);
    }

    // First host in a group may not have a baseline yet; skip stripping then
    if let Some(base_file) = settings.base_file() {
        if base_file.exists() {
            let base = store::load(&base_file, &settings.package.root_key)?;
            resources = strip(&base, resources);
        }
    }

    if settings.package.bundle {
        let definitions = match &settings.package.bundle_list {
            Some(path) => load_definitions(path)?,
            None => BundleDefinitions::new(),
        };
        resources = bundle(
            resources,
            &settings.package.root_key,
            &definitions,
            policy,
            settings.package.provider.as_str(),
        )?;
    }

    Ok(resources)
}
