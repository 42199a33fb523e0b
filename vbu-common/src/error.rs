//! Common error types for VBU

use crate::document::Domain;
use thiserror::Error;

/// Common result type for VBU operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across VBU crates
#[derive(Error, Debug)]
pub enum Error {
    /// Stored document was written by a newer build
    #[error("{domain} document has format version {found}, newest supported is {latest}")]
    VersionTooNew { domain: Domain, found: u64, latest: u64 },

    /// Structured document without a version field
    #[error("{domain} document has no versionFormat field")]
    MissingVersion { domain: Domain },

    /// Version field present but not a non-negative integer
    #[error("{domain} document has invalid versionFormat: {value}")]
    InvalidVersion { domain: Domain, value: String },

    /// Legacy text that does not follow the domain's grammar
    #[error("Malformed legacy {domain} record at line {line} ({reason}): {record:?}")]
    MalformedLegacyRecord {
        domain: Domain,
        line: usize,
        record: String,
        reason: String,
    },

    /// Document content with the wrong shape or an invalid value
    #[error("Invalid {domain} document: {message}")]
    Format { domain: Domain, message: String },

    /// No upgrade step registered for an intermediate version
    #[error("No {domain} migration step registered for version {version}")]
    MissingMigrationStep { domain: Domain, version: u64 },

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Domain this error belongs to, if any
    pub fn domain(&self) -> Option<Domain> {
        match self {
            Error::VersionTooNew { domain, .. }
            | Error::MissingVersion { domain }
            | Error::InvalidVersion { domain, .. }
            | Error::MalformedLegacyRecord { domain, .. }
            | Error::Format { domain, .. }
            | Error::MissingMigrationStep { domain, .. } => Some(*domain),
            _ => None,
        }
    }

    pub(crate) fn malformed(
        domain: Domain,
        line: usize,
        record: &str,
        reason: impl Into<String>,
    ) -> Self {
        Error::MalformedLegacyRecord {
            domain,
            line,
            record: record.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn format(domain: Domain, message: impl Into<String>) -> Self {
        Error::Format {
            domain,
            message: message.into(),
        }
    }
}
