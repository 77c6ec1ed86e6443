/// Admin panel requests and responses.
pub mod admin;
/// Health check response.
pub mod health;
/// Dashboard responses and query parameters.
pub mod public;
/// Server-Sent Events payloads.
pub mod sse;
/// Custom validators.
pub mod validation;
/// Inbound chat webhook payloads.
pub mod webhook;
