use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

/// A document that does not satisfy the Expense Record invariants
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("amount must be a non-negative number, got {0}")]
    InvalidAmount(Decimal),

    #[error("date is not ISO-8601 (YYYY-MM-DD): {0}")]
    InvalidDate(String),
}

/// Failures talking to the document store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store rejected the credentials (HTTP {0})")]
    Unauthorized(u16),

    #[error("store request failed: {0}")]
    Transport(String),

    #[error("store answered HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed store response: {0}")]
    Malformed(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a form submit did not produce a stored record
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("invalid expense: {0}")]
    Invalid(#[from] RecordError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Problems with the secrets file itself
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no secrets file found (looked in: {})", display_paths(.0))]
    NotFound(Vec<PathBuf>),

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid secrets file {path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fatal startup failure. Once produced, the session stays disabled.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid credential payload: {0}")]
    InvalidCredentials(String),

    #[error("invalid store endpoint {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("cannot connect to the expense store: {0}")]
    Unreachable(#[from] StoreError),
}
