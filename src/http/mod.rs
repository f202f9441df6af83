//! Shared HTTP client plumbing for the generator and provisioning endpoints.
use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Client, Response, Url};
use serde_json::Value;

use crate::error::{AppError, AppResult, Endpoint, RemoteError};

#[cfg(test)]
pub(crate) mod stub;

/// Builds a client with the given request timeout.
///
/// `insecure` accepts self-signed certificates, which lab traffic generators
/// ship with by default.
///
/// # Errors
///
/// Returns `BuildClientFailed` when the TLS backend cannot be initialised.
pub fn build_client(timeout: Duration, insecure: bool) -> AppResult<Client> {
    Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(insecure)
        .build()
        .map_err(|err| AppError::remote(RemoteError::BuildClientFailed { source: err }))
}

/// Parses a base URL and strips any trailing slash so paths can be appended.
///
/// # Errors
///
/// Returns `InvalidUrl` when `value` is not an absolute URL.
pub fn parse_base_url(endpoint: Endpoint, value: &str) -> AppResult<String> {
    Url::parse(value).map_err(|err| {
        AppError::remote(RemoteError::InvalidUrl {
            endpoint,
            url: value.to_owned(),
            source: err,
        })
    })?;
    Ok(value.trim_end_matches('/').to_owned())
}

/// Everything except RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encodes a single path segment, escaping every reserved character.
#[must_use]
pub fn encode_path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// Status code plus the best-effort human-readable message of a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub message: String,
}

impl Reply {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Reads a response into a [`Reply`], picking `message` on success and
/// `error` otherwise from a JSON body. Non-JSON bodies are used verbatim.
pub async fn read_reply(response: Response) -> Reply {
    let status = response.status().as_u16();
    let success = response.status().is_success();
    let body = response.text().await.unwrap_or_default();
    Reply {
        status,
        message: extract_message(&body, success),
    }
}

pub(crate) fn extract_message(body: &str, success: bool) -> String {
    let key = if success { "message" } else { "error" };
    match serde_json::from_str::<Value>(body) {
        Ok(value) => value
            .get(key)
            .and_then(Value::as_str)
            .map_or_else(|| "Unknown".to_owned(), ToOwned::to_owned),
        Err(_) if body.trim().is_empty() => "No response data".to_owned(),
        Err(_) => body.trim().to_owned(),
    }
}
