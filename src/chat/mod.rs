//! Outbound capabilities of the chat platform the guests talk through.

mod error;
/// LINE Messaging API client.
pub mod line;
/// Webhook signature verification.
pub mod signature;

use futures::future::BoxFuture;
use serde::Deserialize;
use tracing::info;

pub use self::error::{ChatError, ChatResult};

/// Public profile of a guest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Name shown in the chat app.
    pub display_name: String,
    #[serde(default)]
    /// Avatar URL, when the guest has one.
    pub picture_url: Option<String>,
}

/// Operations the game needs from the chat platform.
pub trait ChatMessenger: Send + Sync {
    /// Answer the event identified by `reply_token` with a plain text message.
    fn reply_text(&self, reply_token: String, text: String) -> BoxFuture<'static, ChatResult<()>>;
    /// Download the binary content attached to an inbound media message.
    fn fetch_content(&self, message_id: String) -> BoxFuture<'static, ChatResult<Vec<u8>>>;
    /// Look up the public profile of a guest.
    fn get_profile(&self, user_id: String) -> BoxFuture<'static, ChatResult<Profile>>;
}

/// Messenger used when no platform credentials are configured: replies are logged, lookups fail.
#[derive(Debug, Clone, Default)]
pub struct LoggingMessenger;

impl ChatMessenger for LoggingMessenger {
    fn reply_text(&self, reply_token: String, text: String) -> BoxFuture<'static, ChatResult<()>> {
        Box::pin(async move {
            info!(%reply_token, %text, "chat platform not configured; reply dropped");
            Ok(())
        })
    }

    fn fetch_content(&self, _message_id: String) -> BoxFuture<'static, ChatResult<Vec<u8>>> {
        Box::pin(async { Err(ChatError::NotConfigured) })
    }

    fn get_profile(&self, _user_id: String) -> BoxFuture<'static, ChatResult<Profile>> {
        Box::pin(async { Err(ChatError::NotConfigured) })
    }
}
