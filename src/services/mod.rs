/// Admin login and score adjustments.
pub mod admin_service;
/// Background archival of uploaded photos.
pub mod archive_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Phase transitions of the quiz and photo voting.
pub mod game_state_service;
/// Health check service.
pub mod health_service;
/// Photo uploads and gallery listing.
pub mod photo_service;
/// Public service for read-only game information.
pub mod public_service;
/// Quiz answers.
pub mod quiz_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Guest registration.
pub mod user_service;
/// One-vote-per-guest photo voting.
pub mod voting_service;
/// Routing and handling of chat webhook events.
pub mod webhook_service;
