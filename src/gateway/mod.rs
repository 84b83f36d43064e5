//! # Backend Gateway
//!
//! Thin request/response layer over the R4R HTTP API. The core never talks
//! to the network directly: the TUI hands a `Backend` to spawned tasks and
//! feeds their results back as actions.

pub mod http;
pub mod types;

use std::fmt;

use async_trait::async_trait;

pub use http::HttpBackend;
pub use types::{History, Message, MessageMeta, ProjectSummary, Role, SaveOutcome, SendReply, WireMetrics};

/// Errors that can occur while talking to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// Transport-level failure (connection refused, DNS, timeout).
    Network(String),
    /// The backend answered with a non-success status.
    Api { status: u16, message: String },
    /// The response body was not the JSON we expected.
    Parse(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Network(msg) => write!(f, "network error: {msg}"),
            GatewayError::Api { status, message } => {
                write!(f, "backend error (HTTP {status}): {message}")
            }
            GatewayError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for GatewayError {}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// The calls the client makes against the backend.
///
/// Exactly one outstanding call per user action is expected; implementations
/// don't need to coordinate between calls.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Sends a prompt. `project = None` asks the backend to create a project.
    async fn send_message(
        &self,
        message: &str,
        project: Option<&str>,
        phase: Option<&str>,
    ) -> GatewayResult<SendReply>;

    /// Fetches the transcript of a phase. A non-success status degrades to an
    /// empty history; only transport failures are errors.
    async fn get_history(&self, project: &str, phase: &str) -> GatewayResult<History>;

    /// Persists the phase context on the backend.
    async fn save_context(&self, project: &str, phase: &str) -> GatewayResult<SaveOutcome>;

    async fn list_projects(&self) -> GatewayResult<Vec<ProjectSummary>>;

    async fn rename_project(&self, slug: &str, new_title: &str) -> GatewayResult<()>;

    async fn delete_project(&self, slug: &str) -> GatewayResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_status() {
        let err = GatewayError::Api {
            status: 502,
            message: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "backend error (HTTP 502): bad gateway");
    }

    #[test]
    fn network_error_display() {
        let err = GatewayError::Network("connection refused".into());
        assert_eq!(err.to_string(), "network error: connection refused");
    }
}
