use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Independently tracked game activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Quick-fire quiz where guests reply with free text.
    Qa,
    /// Guests vote for uploaded photos by their gallery number.
    PhotoVoting,
}

impl GameMode {
    /// Key under which the mode is persisted.
    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Qa => "qa",
            GameMode::PhotoVoting => "photo_voting",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "qa" => Ok(GameMode::Qa),
            "photo_voting" => Ok(GameMode::PhotoVoting),
            other => Err(format!("unknown game mode `{other}`")),
        }
    }
}

/// Phase of a single game mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    /// Never started or reset.
    Inactive,
    /// Accepting input from guests.
    Active,
    /// Closed; results are visible.
    Ended,
}

impl PhaseStatus {
    /// Value stored in the `status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            PhaseStatus::Inactive => "inactive",
            PhaseStatus::Active => "active",
            PhaseStatus::Ended => "ended",
        }
    }
}

impl FromStr for PhaseStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "inactive" => Ok(PhaseStatus::Inactive),
            "active" => Ok(PhaseStatus::Active),
            "ended" => Ok(PhaseStatus::Ended),
            other => Err(format!("unknown phase status `{other}`")),
        }
    }
}

/// Guest known from the chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntity {
    /// Opaque identifier issued by the chat platform.
    pub id: String,
    /// Display name fetched from the platform profile.
    pub name: String,
    /// Optional avatar URL.
    pub avatar: Option<String>,
    /// Score adjusted by the admin; may go negative.
    pub score: i64,
    /// RFC 3339 timestamp of the first contact.
    pub joined_at: String,
}

/// Profile data used to create or refresh a guest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Chat platform id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Avatar URL, if any.
    pub avatar: Option<String>,
}

/// Current record of one game mode.
#[derive(Debug, Clone, PartialEq)]
pub struct GameStateEntity {
    /// Mode the record belongs to.
    pub mode: GameMode,
    /// Current phase.
    pub status: PhaseStatus,
    /// Opaque payload (active question, start time...). `Null` when absent.
    pub payload: serde_json::Value,
    /// Timestamp of the last write.
    pub updated_at: String,
}

/// Answer submitted during the quiz, joined with the author's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaAnswerEntity {
    /// Row id, increasing with submission order.
    pub id: i64,
    /// Author.
    pub user_id: String,
    /// Author display name at read time.
    pub user_name: String,
    /// Question answered.
    pub question_id: i64,
    /// Answer text as typed.
    pub answer: String,
    /// Submission timestamp.
    pub submitted_at: String,
}

/// Answer about to be appended to the quiz log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnswer {
    /// Author.
    pub user_id: String,
    /// Question answered.
    pub question_id: i64,
    /// Answer text as typed.
    pub answer: String,
}

/// Uploaded photo joined with the uploader's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoEntity {
    /// Row id, increasing with upload order.
    pub id: i64,
    /// Uploader.
    pub user_id: String,
    /// Uploader display name at read time.
    pub user_name: String,
    /// File name inside the uploads directory.
    pub filename: String,
    /// Label derived from the uploader name.
    pub original_name: Option<String>,
    /// Number of distinct guests who voted for the photo.
    pub votes: i64,
    /// Upload timestamp.
    pub uploaded_at: String,
}

/// Photo metadata recorded once the binary has been saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhoto {
    /// Uploader.
    pub user_id: String,
    /// File name inside the uploads directory.
    pub filename: String,
    /// Label derived from the uploader name.
    pub original_name: Option<String>,
}

/// Result of the vote insert-and-increment unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteRecord {
    /// A new ledger row was written and the tally now equals `votes`.
    Inserted {
        /// Tally after the increment.
        votes: i64,
    },
    /// The (user, photo) pair already existed; nothing changed.
    Duplicate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_keys_round_trip_through_storage_names() {
        for mode in [GameMode::Qa, GameMode::PhotoVoting] {
            assert_eq!(mode.as_str().parse::<GameMode>(), Ok(mode));
        }
        assert!("quiz".parse::<GameMode>().is_err());
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_eq!("ended".parse::<PhaseStatus>(), Ok(PhaseStatus::Ended));
        assert!("paused".parse::<PhaseStatus>().is_err());
    }
}
