//! The data-fetch seam consumed by the navigation engine.
//!
//! Providers return either a full country list or the outcome of a
//! field query. Failures never cross the engine boundary as panics or
//! uncaught errors — the engine converts them into error pages.

use std::fmt;

use serde_json::Value;

use crate::core::query::QueryField;

/// Errors a provider can hit while producing data.
/// Variants carry enough info to pick the right user-facing message.
#[derive(Debug)]
pub enum FetchError {
    /// Provider misconfigured (bad base URL, client build failure).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// API returned a non-success response.
    Api { status: u16, message: String },
    /// Failed to parse the response body.
    Parse(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Config(msg) => write!(f, "config error: {msg}"),
            FetchError::Network(msg) => write!(f, "network error: {msg}"),
            FetchError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            FetchError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Result classification for a field query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Ok,
    NotFound,
    ServerError,
}

impl FetchStatus {
    /// User-facing message carried onto the page that reports this status.
    pub fn message(self) -> &'static str {
        match self {
            FetchStatus::Ok => "OK",
            FetchStatus::NotFound => "Not Found",
            FetchStatus::ServerError => "Couldn't retrieve data!",
        }
    }
}

/// What a field query produced: a status plus the matching records, if any.
#[derive(Debug)]
pub struct FetchOutcome {
    pub status: FetchStatus,
    pub data: Option<Vec<Value>>,
}

impl FetchOutcome {
    pub fn ok(data: Vec<Value>) -> Self {
        FetchOutcome { status: FetchStatus::Ok, data: Some(data) }
    }

    pub fn not_found() -> Self {
        FetchOutcome { status: FetchStatus::NotFound, data: None }
    }

    pub fn server_error() -> Self {
        FetchOutcome { status: FetchStatus::ServerError, data: None }
    }
}

/// Capability the engine consumes: fetch everything, or fetch by field.
/// Country records are opaque JSON; the engine only relies on the common
/// name living at `name.common`.
pub trait DataProvider {
    /// The full country list, cache-first.
    fn fetch_all(&mut self) -> Result<Vec<Value>, FetchError>;

    /// Countries matching `value` on the given lookup dimension.
    fn fetch_by_field(&mut self, field: QueryField, value: &str) -> FetchOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_messages_match_the_wire_vocabulary() {
        assert_eq!(FetchStatus::Ok.message(), "OK");
        assert_eq!(FetchStatus::NotFound.message(), "Not Found");
        assert_eq!(FetchStatus::ServerError.message(), "Couldn't retrieve data!");
    }

    #[test]
    fn outcome_constructors_pair_status_and_data() {
        assert!(FetchOutcome::ok(vec![]).data.is_some());
        assert!(FetchOutcome::not_found().data.is_none());
        assert_eq!(FetchOutcome::server_error().status, FetchStatus::ServerError);
    }
}
