//! Library crate for wedding-game-back, exposing modules for binaries and integration tests.

/// Backups of uploaded photos.
pub mod archive;
/// Chat platform client and webhook signatures.
pub mod chat;
/// Runtime configuration.
pub mod config;
/// Persistence layer.
pub mod dao;
/// Request, response and event payloads.
pub mod dto;
/// Error types shared by services and handlers.
pub mod error;
/// HTTP routers.
pub mod routes;
/// Game operations.
pub mod services;
/// Shared application state.
pub mod state;
/// Small shared helpers.
pub mod util;
