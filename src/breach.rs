//! K-anonymity breach lookup against a hash-range service.
//!
//! Only the first 5 hex characters of the password's SHA-1 digest ever
//! leave the process; the suffix comparison happens locally. There is no
//! fallback path that transmits the full hash.

use crate::analysis::BreachStatus;
use secrecy::{ExposeSecret, SecretString};
use sha1::{Digest, Sha1};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_RANGE_URL: &str = "https://api.pwnedpasswords.com/range";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const PREFIX_LEN: usize = 5;

#[derive(Error, Debug)]
pub enum BreachError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Client for the range-query endpoint.
///
/// Cheap to clone; batch callers share one client across lookups.
#[derive(Clone)]
pub struct BreachClient {
    client: reqwest::Client,
    base_url: String,
}

impl BreachClient {
    /// Builds a client against the public range endpoint with a 5 s
    /// request timeout and an identifying `User-Agent`.
    pub fn new() -> Result<Self, BreachError> {
        Self::with_base_url(DEFAULT_RANGE_URL)
    }

    /// Builds a client against a custom range endpoint, e.g. a mock
    /// server in tests or a mirrored service.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, BreachError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("securepass/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Checks the password against the breach database.
    ///
    /// Network failures, timeouts, non-2xx responses and malformed bodies
    /// all map to [`BreachStatus::CheckFailed`] — never to `Clean`, and
    /// never to an error that would abort the surrounding analysis.
    pub async fn check(&self, password: &SecretString) -> BreachStatus {
        let digest = sha1_hex_upper(password.expose_secret());
        let (prefix, suffix) = digest.split_at(PREFIX_LEN);
        let url = format!("{}/{}", self.base_url, prefix);

        let response = match self
            .client
            .get(&url)
            .header("Add-Padding", "true")
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                let reason = request_failure_reason(&err);
                #[cfg(feature = "tracing")]
                tracing::warn!("breach range request failed: {}", reason);
                return BreachStatus::CheckFailed { reason };
            }
        };

        if !response.status().is_success() {
            let reason = format!("range service returned HTTP {}", response.status());
            #[cfg(feature = "tracing")]
            tracing::warn!("breach range request failed: {}", reason);
            return BreachStatus::CheckFailed { reason };
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                return BreachStatus::CheckFailed {
                    reason: format!("failed to read response body: {err}"),
                };
            }
        };

        match scan_range_body(&body, suffix) {
            Ok(Some(occurrences)) => BreachStatus::Found { occurrences },
            Ok(None) => BreachStatus::Clean,
            Err(reason) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("breach range response malformed: {}", reason);
                BreachStatus::CheckFailed { reason }
            }
        }
    }
}

fn request_failure_reason(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        format!("network error: {err}")
    }
}

/// Uppercase 40-character SHA-1 hex digest.
pub(crate) fn sha1_hex_upper(input: &str) -> String {
    hex::encode_upper(Sha1::digest(input.as_bytes()))
}

/// Scans a `SUFFIX:COUNT` range body for the local hash suffix.
///
/// Lines are `\n` or `\r\n` separated; the hex compare is
/// case-insensitive. Padding entries with a zero count are treated as not
/// found. A line without a `SUFFIX:COUNT` shape makes the whole body
/// malformed.
fn scan_range_body(body: &str, suffix: &str) -> Result<Option<u64>, String> {
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((candidate, count)) = line.split_once(':') else {
            return Err("malformed range line, expected SUFFIX:COUNT".to_string());
        };
        if candidate.trim().eq_ignore_ascii_case(suffix) {
            let occurrences: u64 = count
                .trim()
                .parse()
                .map_err(|_| "malformed occurrence count".to_string())?;
            if occurrences == 0 {
                return Ok(None);
            }
            return Ok(Some(occurrences));
        }
    }
    Ok(None)
}
