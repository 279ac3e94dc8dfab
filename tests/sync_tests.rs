//! Integration tests for the sync round against a local bare remote

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
fn hieraup_cmd() -> Command {
    Command::cargo_bin("hieraup").unwrap()
}

/// Seed a working clone with one commit and a local bare origin it can push to
fn seed_repository(workspace: &common::TestWorkspace) -> String {
    let origin_path = workspace.path.join("origin.git");
    git2::Repository::init_bare(&origin_path).expect("Failed to init bare origin");

    let clone_path = workspace.path.join("puppet");
    let repo = git2::Repository::init(&clone_path).expect("Failed to init clone");

    workspace.write_file("puppet/README.md", "seed\n");
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = git2::Signature::now("tester", "tester@example.com").unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, "seed", &tree, &[])
        .unwrap();

    let src_branch = repo.head().unwrap().shorthand().unwrap().to_string();
    repo.remote("origin", origin_path.to_str().unwrap()).unwrap();
    let mut remote = repo.find_remote("origin").unwrap();
    remote
        .push(
            &[format!("refs/heads/{src_branch}:refs/heads/{src_branch}")],
            None,
        )
        .unwrap();

    src_branch
}

fn write_sync_config(workspace: &common::TestWorkspace, src_branch: &str) -> std::path::PathBuf {
    let config = format!(
        r#"general:
  workdir: {workdir}
  hiera_folder: hiera
  file: updates.json
git:
  name: puppet
  username: tester
  email: tester@example.com
  src_branch: {src_branch}
  dest_branch: {src_branch}
  work_branch: os_updates
package:
  merge: false
"#,
        workdir = workspace.path.display()
    );
    workspace.write_file("hieraup.yaml", &config);
    workspace.path.join("hieraup.yaml")
}

#[test]
fn test_sync_commits_and_pushes_work_branch() {
    let temp = common::TestWorkspace::new();
    let src_branch = seed_repository(&temp);
    let config = write_sync_config(&temp, &src_branch);
    let updates = temp
        .write_updates(r#"[{"name": "httpd", "repo": "base", "version": "2.4.6-99.el7"}]"#);

    hieraup_cmd()
        .args(["sync", "--no-pr", "--config"])
        .arg(&config)
        .arg("--input")
        .arg(&updates)
        .assert()
        .success()
        .stdout(predicate::str::contains("Pushed"));

    assert!(temp.file_exists("puppet/hiera/updates.json"));

    let work_branch = format!("os_updates_{src_branch}");
    let origin = git2::Repository::open_bare(temp.path.join("origin.git")).unwrap();
    let pushed = origin
        .find_branch(&work_branch, git2::BranchType::Local)
        .expect("Work branch missing on origin");
    let commit = pushed.get().peel_to_commit().unwrap();
    assert!(
        commit
            .message()
            .unwrap()
            .starts_with("Found 1 packages to update on")
    );
}

#[test]
fn test_sync_rerun_has_nothing_to_commit() {
    let temp = common::TestWorkspace::new();
    let src_branch = seed_repository(&temp);
    let config = write_sync_config(&temp, &src_branch);
    let updates = temp
        .write_updates(r#"[{"name": "httpd", "repo": "base", "version": "2.4.6-99.el7"}]"#);

    hieraup_cmd()
        .args(["sync", "--no-pr", "--config"])
        .arg(&config)
        .arg("--input")
        .arg(&updates)
        .assert()
        .success();

    hieraup_cmd()
        .args(["sync", "--no-pr", "--config"])
        .arg(&config)
        .arg("--input")
        .arg(&updates)
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to commit"));
}

#[test]
fn test_sync_reboot_suffix_in_commit_message() {
    let temp = common::TestWorkspace::new();
    let src_branch = seed_repository(&temp);
    let config = write_sync_config(&temp, &src_branch);
    let updates = temp
        .write_updates(r#"[{"name": "glibc", "repo": "base", "version": "2.17-326.el7"}]"#);

    hieraup_cmd()
        .args(["sync", "--no-pr", "--config"])
        .arg(&config)
        .arg("--input")
        .arg(&updates)
        .assert()
        .success();

    let work_branch = format!("os_updates_{src_branch}");
    let origin = git2::Repository::open_bare(temp.path.join("origin.git")).unwrap();
    let pushed = origin
        .find_branch(&work_branch, git2::BranchType::Local)
        .unwrap();
    let commit = pushed.get().peel_to_commit().unwrap();
    assert!(commit
        .message()
        .unwrap()
        .ends_with(", system restart recommended"));
}

#[test]
fn test_sync_empty_update_list() {
    let temp = common::TestWorkspace::new();
    let src_branch = seed_repository(&temp);
    let config = write_sync_config(&temp, &src_branch);
    let updates = temp.write_updates("[]");

    hieraup_cmd()
        .args(["sync", "--no-pr", "--config"])
        .arg(&config)
        .arg("--input")
        .arg(&updates)
        .assert()
        .success()
        .stdout(predicate::str::contains("No package to update"));

    assert!(!temp.file_exists("puppet/hiera/updates.json"));
}
