use std::fmt;

use thiserror::Error;

/// Remote service a failed call was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Generator,
    Provisioning,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Generator => f.write_str("traffic generator"),
            Endpoint::Provisioning => f.write_str("provisioning API"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Invalid {endpoint} URL '{url}': {source}")]
    InvalidUrl {
        endpoint: Endpoint,
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} request to {url} failed: {source}")]
    RequestFailed {
        endpoint: Endpoint,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned status {status} for {url}: {message}")]
    UnexpectedStatus {
        endpoint: Endpoint,
        url: String,
        status: u16,
        message: String,
    },
    #[error("Failed to decode {endpoint} response from {url}: {source}")]
    DecodeFailed {
        endpoint: Endpoint,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Initial transmission could not be started: {source}")]
    InitialStartFailed {
        #[source]
        source: Box<RemoteError>,
    },
    #[cfg(test)]
    #[error("Injected failure: {message}")]
    Injected { message: String },
}

impl RemoteError {
    /// Whether retrying the same call later could succeed.
    ///
    /// Transport failures and 5xx replies are transient. Bad URLs, client
    /// construction failures and 4xx rejections are not.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            RemoteError::RequestFailed { .. } | RemoteError::DecodeFailed { .. } => true,
            RemoteError::UnexpectedStatus { status, .. } => *status >= 500,
            RemoteError::InvalidUrl { .. }
            | RemoteError::BuildClientFailed { .. }
            | RemoteError::InitialStartFailed { .. } => false,
            #[cfg(test)]
            RemoteError::Injected { .. } => true,
        }
    }
}
