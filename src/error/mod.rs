//! Error types and handling for hieraup
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! The taxonomy follows the three failure families of the core: configuration
//! errors (missing or invalid flags/keys), not-found errors (referenced files
//! absent or unparseable), and policy violations (inconsistent bundle
//! definitions), plus the I/O collaborators around it (provider, git, PR API).

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for hieraup operations
#[derive(Error, Diagnostic, Debug)]
pub enum HieraupError {
    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(hieraup::config::not_found),
        help("Pass the configuration file with -c or set HIERAUP_CONFIG")
    )]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(hieraup::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(hieraup::config::invalid))]
    ConfigInvalid { message: String },

    // Resource document errors
    #[error("Resource file not found: {path}")]
    #[diagnostic(code(hieraup::resource::not_found))]
    ResourceFileNotFound { path: String },

    #[error("Failed to parse resource file: {path}")]
    #[diagnostic(
        code(hieraup::resource::parse_failed),
        help("The persisted document must be a JSON mapping of package resources")
    )]
    ResourceParseFailed { path: String, reason: String },

    #[error("Invalid resource document: {reason}")]
    #[diagnostic(code(hieraup::resource::invalid_document))]
    ResourceDocumentInvalid { reason: String },

    // Bundle definition errors
    #[error("Failed to load bundle definitions: {path}")]
    #[diagnostic(
        code(hieraup::bundle::definitions_invalid),
        help("Bundle definitions are a JSON mapping of bundle name to package names")
    )]
    BundleDefinitionsInvalid { path: String, reason: String },

    #[error("Package '{package}' belongs to more than one bundle: {bundles}")]
    #[diagnostic(
        code(hieraup::bundle::duplicate_membership),
        help("A package can only be installed by one composite action; remove it from all but one bundle")
    )]
    DuplicateBundleMembership { package: String, bundles: String },

    // Provider errors
    #[error("Package update query failed: {message}")]
    #[diagnostic(code(hieraup::provider::failed))]
    ProviderFailed { message: String },

    // Git errors
    #[error("Git operation failed: {message}")]
    #[diagnostic(code(hieraup::git::operation_failed))]
    GitOperationFailed { message: String },

    #[error("Failed to clone repository: {url}: {reason}")]
    #[diagnostic(
        code(hieraup::git::clone_failed),
        help("Check that the URL is correct and the configured credentials have access")
    )]
    GitCloneFailed { url: String, reason: String },

    #[error("Failed to push branch '{branch}': {reason}")]
    #[diagnostic(code(hieraup::git::push_failed))]
    GitPushFailed { branch: String, reason: String },

    // Pull request errors
    #[error("Pull request API request failed: {message}")]
    #[diagnostic(code(hieraup::pr::request_failed))]
    PullRequestFailed { message: String },

    #[error("Pull request rejected by API ({status}): {body}")]
    #[diagnostic(code(hieraup::pr::rejected))]
    PullRequestRejected { status: String, body: String },

    // File system errors
    #[error("Failed to write file: {path}")]
    #[diagnostic(code(hieraup::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(hieraup::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for HieraupError {
    fn from(err: std::io::Error) -> Self {
        HieraupError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for HieraupError {
    fn from(err: serde_yaml::Error) -> Self {
        HieraupError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for HieraupError {
    fn from(err: serde_json::Error) -> Self {
        HieraupError::ResourceDocumentInvalid {
            reason: err.to_string(),
        }
    }
}

impl From<git2::Error> for HieraupError {
    fn from(err: git2::Error) -> Self {
        HieraupError::GitOperationFailed {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for HieraupError {
    fn from(err: reqwest::Error) -> Self {
        HieraupError::PullRequestFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, HieraupError>;
