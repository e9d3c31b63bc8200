//! Error handling and custom error types
//!
//! Provides unified error handling across the gateway and the word store
//! using thiserror. Callers that only care about the broad failure class
//! can match on [`Error::kind`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream API error (status {status}): {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("Upstream request failed: {0}")]
    UpstreamTransport(#[from] reqwest::Error),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Broad failure classes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    InvalidInput,
    Upstream,
    MalformedResponse,
    Persistence,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::UpstreamStatus { .. } | Error::UpstreamTransport(_) => ErrorKind::Upstream,
            Error::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Error::Persistence(_) => ErrorKind::Persistence,
        }
    }

    /// HTTP status of a rejected upstream call, if the failure carried one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Error::UpstreamStatus { status, .. } => Some(*status),
            Error::UpstreamTransport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether re-invoking the same action could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Upstream
    }
}

pub type Result<T> = std::result::Result<T, Error>;
