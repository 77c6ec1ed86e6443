use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::public::LeaderboardEntry;

#[derive(Clone, Debug, PartialEq)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    /// SSE event name.
    pub event: Option<String>,
    /// Serialized payload.
    pub data: String,
}

impl ServerEvent {
    /// Build an event whose data is sent verbatim.
    pub fn new<E>(event: E, data: String) -> Self
    where
        E: Into<Option<String>>,
    {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }

    /// Name of the event, empty for unnamed messages.
    pub fn name(&self) -> &str {
        self.event.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast whenever the number of registered guests changes.
pub struct ParticipantsUpdatedEvent {
    /// Registered guests.
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
/// Full leaderboard sent after a score adjustment.
pub struct LeaderboardUpdatedEvent(pub Vec<LeaderboardEntry>);

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Broadcast when the admin opens a new quiz question.
pub struct QuestionStartedEvent {
    /// Identifier answers are filed under.
    pub question_id: i64,
    /// Question text.
    pub question: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Broadcast when the quiz question is closed.
pub struct QuestionEndedEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Question that was closed.
    pub question_id: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Broadcast for every answer received while a question is open.
pub struct NewAnswerEvent {
    /// Chat id of the guest.
    pub user_id: String,
    /// Display name of the guest.
    pub user_name: String,
    /// Answer text as typed.
    pub answer: String,
    /// Question answered.
    pub question_id: i64,
    /// Submission timestamp.
    pub submitted_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Broadcast once an uploaded photo has been stored.
pub struct PhotoUploadedEvent {
    /// Identifier of the new photo.
    pub photo_id: i64,
    /// Chat id of the uploader.
    pub user_id: String,
    /// Display name of the uploader.
    pub user_name: String,
    /// Stored file name under `/uploads`.
    pub filename: String,
    /// Upload timestamp.
    pub uploaded_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Broadcast when photo voting opens.
pub struct VotingStartedEvent {
    /// When voting opened.
    pub start_time: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when photo voting closes.
pub struct VotingEndedEvent {}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Broadcast after an accepted vote with the photo's new tally.
pub struct VoteUpdatedEvent {
    /// Photo that received the vote.
    pub photo_id: i64,
    /// New tally.
    pub votes: i64,
}
