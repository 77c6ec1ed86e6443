use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
/// Batch of events delivered by the chat platform.
pub struct WebhookRequest {
    /// Bot user id the batch was sent to.
    #[serde(default)]
    pub destination: Option<String>,
    /// Events in delivery order; may be empty.
    #[serde(default)]
    pub events: Vec<InboundEvent>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Single inbound chat event.
pub struct InboundEvent {
    /// Event type.
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Token for answering this event.
    #[serde(default)]
    pub reply_token: Option<String>,
    /// Who sent the event.
    #[serde(default)]
    pub source: Option<EventSource>,
    /// Message content for `message` events.
    #[serde(default)]
    pub message: Option<InboundMessage>,
    /// Platform timestamp in milliseconds.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl InboundEvent {
    /// Identifier of the guest who triggered the event, if the source carries one.
    pub fn user_id(&self) -> Option<&str> {
        self.source.as_ref()?.user_id.as_deref()
    }

    /// Body of a text message.
    pub fn text(&self) -> Option<&str> {
        match self.message.as_ref()? {
            InboundMessage {
                kind: MessageKind::Text,
                text: Some(text),
                ..
            } => Some(text.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Event types the router knows about; everything else maps to `Other`.
pub enum EventKind {
    /// The guest added the bot.
    Follow,
    /// The guest blocked the bot.
    Unfollow,
    /// The guest sent a message.
    Message,
    /// Anything else.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
/// Origin of an event.
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    /// `user`, `group` or `room`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Chat id of the sender.
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
/// Message attached to a `message` event.
pub struct InboundMessage {
    /// Message type.
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Platform message id, needed to download media content.
    pub id: String,
    /// Body of text messages.
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
/// Message types the router distinguishes.
#[serde(rename_all = "camelCase")]
pub enum MessageKind {
    /// Plain text.
    Text,
    /// Picture, downloaded as a photo entry.
    Image,
    /// Stickers, video, audio and the rest.
    #[serde(other)]
    Other,
}
