use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::dao::models::{
    GameMode, PhaseStatus, PhotoEntity, QaAnswerEntity, UserEntity,
};

/// Default number of entries returned by `/api/photos/top`.
pub const DEFAULT_TOP_PHOTOS: u32 = 5;
/// Upper bound accepted for the `limit` query parameter.
pub const MAX_TOP_PHOTOS: u32 = 50;

#[derive(Debug, Serialize, ToSchema)]
/// Number of guests who joined the game.
pub struct ParticipantsCountResponse {
    /// Registered guests.
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Guest row as displayed on the leaderboard.
pub struct LeaderboardEntry {
    /// Chat id of the guest.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Avatar URL, if any.
    pub avatar: Option<String>,
    /// Points awarded by the admin.
    pub score: i64,
    /// When the guest first showed up.
    pub joined_at: String,
}

impl From<UserEntity> for LeaderboardEntry {
    fn from(user: UserEntity) -> Self {
        Self {
            id: user.id,
            name: user.name,
            avatar: user.avatar,
            score: user.score,
            joined_at: user.joined_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Current phase of a game mode with its opaque payload.
pub struct GameStateResponse {
    /// Game mode this phase belongs to.
    pub mode: GameMode,
    /// Current phase.
    pub status: PhaseStatus,
    /// Question or start time recorded when the phase began; `null` when never started.
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
    /// Last transition, absent for a mode never started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Quiz answer listed for the dashboard.
pub struct AnswerResponse {
    /// Answer id.
    pub id: i64,
    /// Chat id of the guest.
    pub user_id: String,
    /// Display name of the guest.
    pub user_name: String,
    /// Question answered.
    pub question_id: i64,
    /// Answer text as typed.
    pub answer: String,
    /// Submission timestamp.
    pub submitted_at: String,
}

impl From<QaAnswerEntity> for AnswerResponse {
    fn from(answer: QaAnswerEntity) -> Self {
        Self {
            id: answer.id,
            user_id: answer.user_id,
            user_name: answer.user_name,
            question_id: answer.question_id,
            answer: answer.answer,
            submitted_at: answer.submitted_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Uploaded photo with its tally; `url` points at the static uploads route.
pub struct PhotoResponse {
    /// Photo id.
    pub id: i64,
    /// Chat id of the uploader.
    pub user_id: String,
    /// Display name of the uploader.
    pub user_name: String,
    /// Stored file name.
    pub filename: String,
    /// Label derived from the uploader name.
    pub original_name: Option<String>,
    /// Path serving the image.
    pub url: String,
    /// Current tally.
    pub votes: i64,
    /// Upload timestamp.
    pub uploaded_at: String,
}

impl From<PhotoEntity> for PhotoResponse {
    fn from(photo: PhotoEntity) -> Self {
        Self {
            url: format!("/uploads/{}", photo.filename),
            id: photo.id,
            user_id: photo.user_id,
            user_name: photo.user_name,
            filename: photo.filename,
            original_name: photo.original_name,
            votes: photo.votes,
            uploaded_at: photo.uploaded_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
/// Query string accepted by `/api/photos/top`.
pub struct TopPhotosQuery {
    /// Number of photos to return (1 to 50, default 5).
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<u32>,
}

impl TopPhotosQuery {
    /// Requested limit, or the default.
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_TOP_PHOTOS).min(MAX_TOP_PHOTOS)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Progress of one archive job.
pub struct ArchiveJobResponse {
    /// Photo file being archived.
    pub filename: String,
    /// Where the job stands.
    pub status: ArchiveJobStatus,
    /// Failure reason of a failed job.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Last status change.
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
/// Lifecycle of a queued archive job.
pub enum ArchiveJobStatus {
    /// Waiting for the worker.
    Queued,
    /// Copied to the backup destination.
    Archived,
    /// The destination already held this file.
    AlreadyPresent,
    /// The copy failed; the photo itself is kept.
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_photos_limit_defaults_to_five() {
        assert_eq!(TopPhotosQuery { limit: None }.limit(), 5);
        assert_eq!(TopPhotosQuery { limit: Some(3) }.limit(), 3);
        assert!(TopPhotosQuery { limit: Some(0) }.validate().is_err());
        assert!(TopPhotosQuery { limit: Some(51) }.validate().is_err());
    }

    #[test]
    fn photo_url_points_at_uploads() {
        let photo = PhotoResponse::from(PhotoEntity {
            id: 1,
            user_id: "u1".into(),
            user_name: "Alice".into(),
            filename: "abc.jpg".into(),
            original_name: Some("Alice_photo".into()),
            votes: 0,
            uploaded_at: "2024-01-01T00:00:00.000Z".into(),
        });
        assert_eq!(photo.url, "/uploads/abc.jpg");
    }
}
