use std::path::PathBuf;

use thiserror::Error;

/// Problems with the configuration file or the values in it. Always fatal,
/// and always raised before the first remote call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration file {path:?}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: dotenv::Error,
    },
    #[error("missing configuration key {0}")]
    MissingKey(&'static str),
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
    #[error("doctor locator id {value:?} is invalid: {reason}")]
    InvalidSelector { value: String, reason: String },
    #[error("message template is invalid: {0}")]
    Template(String),
}

/// Failures talking to the Medicover service.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request to {operation} failed")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{operation} returned HTTP {status}: {body}")]
    Fault {
        operation: &'static str,
        status: u16,
        body: String,
    },
    #[error("cannot decode {operation} response")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid service url")]
    Url(#[from] url::ParseError),
    #[error("login or password is incorrect")]
    LoginRejected,
}

/// A push notification that did not go out.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("notification rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger I/O on {path:?} failed")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("ledger {path:?} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

/// Everything that aborts an invocation.
#[derive(Debug, Error)]
pub enum MedisnipError {
    #[error("configuration error")]
    Config(#[from] ConfigError),
    #[error("authentication failed")]
    Auth(#[source] RemoteError),
    #[error("appointment query failed")]
    Query(#[source] RemoteError),
    #[error("notification ledger error")]
    Ledger(#[from] LedgerError),
}
