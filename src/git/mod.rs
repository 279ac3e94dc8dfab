//! Git workspace for the tracked repository
//!
//! Clones (or reuses) the shared repository under the configured work
//! directory, maintains the per-host work branch, and commits and pushes the
//! regenerated resource document. Authentication uses the configured HTTP
//! user/password, falling back to git's credential helpers.

use std::path::Path;

use git2::{
    Cred, CredentialType, FetchOptions, PushOptions, RemoteCallbacks, Repository,
    build::RepoBuilder,
};

use crate::config::Settings;
use crate::error::{HieraupError, Result};

/// Local clone of the shared repository with the work branch checked out
pub struct GitWorkspace {
    repo: Repository,
}

impl GitWorkspace {
    /// Open the configured clone, cloning it first when absent, and leave
    /// the work branch checked out (created from `src_branch` when new,
    /// fast-forwarded from the remote otherwise)
    pub fn prepare(settings: &Settings, branch: &str) -> Result<Self> {
        let root = settings.repository_path();

        let repo = if root.join(".git").exists() {
            Repository::open(&root)?
        } else {
            clone(&settings.git.url, &root, settings)?
        };

        if let Some(proxy) = &settings.general.proxy {
            let mut config = repo.config()?;
            config.set_str("http.proxy", proxy)?;
            config.set_str("https.proxy", proxy)?;
        }

        let workspace = Self { repo };
        workspace.checkout_work_branch(&settings.git.src_branch, branch, settings)?;
        Ok(workspace)
    }

    /// Check out the work branch, creating it from `src_branch` when it does
    /// not exist yet, and fast-forwarding it from the remote otherwise
    fn checkout_work_branch(&self, src_branch: &str, branch: &str, settings: &Settings) -> Result<()> {
        let is_new = self
            .repo
            .find_branch(branch, git2::BranchType::Local)
            .is_err();

        if is_new {
            let src = self
                .repo
                .find_branch(src_branch, git2::BranchType::Local)
                .or_else(|_| {
                    // Fresh clones only have the remote-tracking ref
                    let remote = self
                        .repo
                        .find_branch(&format!("origin/{src_branch}"), git2::BranchType::Remote)?;
                    let commit = remote.get().peel_to_commit()?;
                    self.repo.branch(src_branch, &commit, false)
                })?;
            let commit = src.get().peel_to_commit()?;
            self.repo.branch(branch, &commit, false)?;
        }

        self.repo.set_head(&format!("refs/heads/{branch}"))?;
        let mut checkout = git2::build::CheckoutBuilder::new();
        checkout.force();
        self.repo.checkout_head(Some(&mut checkout))?;

        if !is_new {
            self.fast_forward(branch, settings)?;
        }
        Ok(())
    }

    /// Fetch the branch and fast-forward the local ref when possible
    fn fast_forward(&self, branch: &str, settings: &Settings) -> Result<()> {
        let mut remote = match self.repo.find_remote("origin") {
            Ok(remote) => remote,
            Err(_) => return Ok(()),
        };

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(auth_callbacks(settings));
        if remote
            .fetch(&[branch], Some(&mut fetch_options), None)
            .is_err()
        {
            // The branch may not exist on the remote yet
            return Ok(());
        }

        let fetch_head = self.repo.find_reference("FETCH_HEAD")?;
        let fetched = self.repo.reference_to_annotated_commit(&fetch_head)?;
        let (analysis, _) = self.repo.merge_analysis(&[&fetched])?;

        if analysis.is_fast_forward() {
            let mut reference = self.repo.find_reference(&format!("refs/heads/{branch}"))?;
            reference.set_target(fetched.id(), "fast-forward")?;
            self.repo.set_head(&format!("refs/heads/{branch}"))?;
            let mut checkout = git2::build::CheckoutBuilder::new();
            checkout.force();
            self.repo.checkout_head(Some(&mut checkout))?;
        }
        Ok(())
    }

    /// Stage everything and commit; returns false when the tree is unchanged
    pub fn commit_all(&self, message: &str, settings: &Settings) -> Result<bool> {
        let mut index = self.repo.index()?;
        index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)?;
        index.write()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let head = self.repo.head()?.peel_to_commit()?;
        if head.tree_id() == tree_id {
            return Ok(false);
        }

        let signature = git2::Signature::now(&settings.git.username, &settings.git.email)?;
        self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&head],
        )?;
        Ok(true)
    }

    /// Push the work branch to origin, setting it up on first push
    pub fn push(&self, branch: &str, settings: &Settings) -> Result<()> {
        let mut remote = self.repo.find_remote("origin")?;
        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(auth_callbacks(settings));

        let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");
        remote
            .push(&[&refspec], Some(&mut push_options))
            .map_err(|e| HieraupError::GitPushFailed {
                branch: branch.to_string(),
                reason: e.message().to_string(),
            })
    }
}

/// Clone the shared repository into `target`
fn clone(url: &str, target: &Path, settings: &Settings) -> Result<Repository> {
    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(auth_callbacks(settings));

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options);
    builder.clone(url, target).map_err(|e| HieraupError::GitCloneFailed {
        url: url.to_string(),
        reason: e.message().to_string(),
    })
}

/// Credential callbacks: configured user/password first, then git's
/// credential helpers
fn auth_callbacks(settings: &Settings) -> RemoteCallbacks<'_> {
    let user = settings.git.user.clone();
    let password = settings.git.password.clone();

    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |url, username_from_url, allowed_types| {
        if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
            if !user.is_empty() {
                return Cred::userpass_plaintext(&user, &password);
            }
            if let Ok(config) = git2::Config::open_default() {
                if let Ok(cred) = Cred::credential_helper(&config, url, username_from_url) {
                    return Ok(cred);
                }
            }
        }
        if allowed_types.contains(CredentialType::DEFAULT) {
            return Cred::default();
        }
        Err(git2::Error::new(
            git2::ErrorCode::Auth,
            git2::ErrorClass::Http,
            "authentication failed",
        ))
    });
    callbacks
}
