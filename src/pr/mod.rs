//! Pull request client (Bitbucket Cloud 2.0)
//!
//! Checks whether a pull request with the configured title is already open
//! and creates one otherwise. Authentication is HTTP Basic with the
//! configured user and app password; two-factor accounts need an app token.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;

use crate::config::Settings;
use crate::error::{HieraupError, Result};

/// Pull request to open against the destination branch
#[derive(Debug, Clone)]
pub struct PullRequestParams {
    pub title: String,
    pub description: String,
    pub source_branch: String,
    pub destination_branch: String,
    pub reviewers: Vec<String>,
    /// `account/repository` as known to the API
    pub repository_full_name: String,
}

impl PullRequestParams {
    /// Assemble parameters from the configuration and the work branch
    pub fn from_settings(settings: &Settings, source_branch: &str) -> Self {
        Self {
            title: settings.pr.title.clone(),
            description: settings.pr.description.clone(),
            source_branch: source_branch.to_string(),
            destination_branch: settings.git.dest_branch.clone(),
            reviewers: settings.pr.reviewers.clone(),
            repository_full_name: format!(
                "{}/{}",
                settings.git.account_name, settings.git.repo_name
            ),
        }
    }

    /// Request body in the Bitbucket 2.0 pullrequests shape
    pub fn payload(&self) -> serde_json::Value {
        let reviewers: Vec<serde_json::Value> = self
            .reviewers
            .iter()
            .map(|username| json!({ "username": username }))
            .collect();

        json!({
            "title": self.title,
            "description": self.description,
            "source": {
                "branch": { "name": self.source_branch },
                "repository": { "full_name": self.repository_full_name },
            },
            "destination": { "branch": { "name": self.destination_branch } },
            "close_source_branch": true,
            "reviewers": reviewers,
        })
    }
}

/// Minimal client for the pull requests endpoint
pub struct PullRequestClient {
    api_url: String,
    user: String,
    password: String,
    proxy: Option<String>,
}

impl PullRequestClient {
    /// Build a client from the configuration
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            api_url: settings.pr.api_url.clone(),
            user: settings.git.user.clone(),
            password: settings.git.password.clone(),
            proxy: settings.general.proxy.clone(),
        }
    }

    fn http_client(&self) -> Result<reqwest::blocking::Client> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(proxy) = &self.proxy {
            let proxy =
                reqwest::Proxy::all(proxy).map_err(|e| HieraupError::PullRequestFailed {
                    message: format!("invalid proxy '{proxy}': {e}"),
                })?;
            builder = builder.proxy(proxy);
        }
        builder.build().map_err(HieraupError::from)
    }

    fn auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.user.trim(), self.password.trim());
        format!("Basic {}", BASE64.encode(credentials))
    }

    /// Whether an open pull request with this title already exists
    pub fn open_pull_request_exists(&self, title: &str) -> Result<bool> {
        let response = self
            .http_client()?
            .get(format!("{}?state=OPEN", self.api_url))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()?;

        let body = response.text()?;
        Ok(body.contains(title))
    }

    /// Create the pull request
    pub fn create(&self, params: &PullRequestParams) -> Result<()> {
        let response = self
            .http_client()?
            .post(&self.api_url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(&params.payload())
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(HieraupError::PullRequestRejected {
                status: status.to_string(),
                body,
            });
        }
        Ok(())
    }
}
