//! Error types shared by chat platform clients.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenient result alias returning [`ChatError`] failures.
pub type ChatResult<T> = Result<T, ChatError>;

/// Failures that can occur while talking to the chat platform.
#[derive(Debug, Error)]
pub enum ChatError {
    /// No access token was configured, so the platform cannot be reached.
    #[error("chat platform is not configured")]
    NotConfigured,
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build chat platform client")]
    ClientBuilder {
        /// HTTP client error.
        #[source]
        source: reqwest::Error,
    },
    /// A request could not be sent.
    #[error("failed to send chat platform request to `{path}`")]
    RequestSend {
        /// Endpoint path.
        path: String,
        /// HTTP client error.
        #[source]
        source: reqwest::Error,
    },
    /// The platform answered with an unexpected status code.
    #[error("unexpected chat platform response status {status} for `{path}`")]
    RequestStatus {
        /// Endpoint path.
        path: String,
        /// Status returned.
        status: StatusCode,
    },
    /// The response body could not be read or decoded.
    #[error("failed to decode chat platform response for `{path}`")]
    DecodeResponse {
        /// Endpoint path.
        path: String,
        /// HTTP client error.
        #[source]
        source: reqwest::Error,
    },
}
