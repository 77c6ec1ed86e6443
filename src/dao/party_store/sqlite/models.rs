use sqlx::FromRow;

use super::error::SqliteDaoError;
use crate::dao::models::{GameStateEntity, PhotoEntity, QaAnswerEntity, UserEntity};

#[derive(Debug, FromRow)]
pub(super) struct UserRow {
    id: String,
    name: String,
    avatar: Option<String>,
    score: i64,
    joined_at: String,
}

impl From<UserRow> for UserEntity {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            avatar: row.avatar,
            score: row.score,
            joined_at: row.joined_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct GameStateRow {
    mode: String,
    status: String,
    payload: Option<String>,
    updated_at: String,
}

impl TryFrom<GameStateRow> for GameStateEntity {
    type Error = SqliteDaoError;

    fn try_from(row: GameStateRow) -> Result<Self, Self::Error> {
        let mode = row.mode.parse().map_err(|reason| SqliteDaoError::Decode {
            column: "game_states.mode",
            reason,
        })?;
        let status = row.status.parse().map_err(|reason| SqliteDaoError::Decode {
            column: "game_states.status",
            reason,
        })?;
        let payload = match row.payload.as_deref() {
            None | Some("") => serde_json::Value::Null,
            Some(raw) => serde_json::from_str(raw).map_err(|err| SqliteDaoError::Decode {
                column: "game_states.payload",
                reason: err.to_string(),
            })?,
        };

        Ok(Self {
            mode,
            status,
            payload,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(super) struct AnswerRow {
    id: i64,
    user_id: String,
    user_name: String,
    question_id: i64,
    answer: String,
    submitted_at: String,
}

impl From<AnswerRow> for QaAnswerEntity {
    fn from(row: AnswerRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            user_name: row.user_name,
            question_id: row.question_id,
            answer: row.answer,
            submitted_at: row.submitted_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(super) struct PhotoRow {
    id: i64,
    user_id: String,
    user_name: String,
    filename: String,
    original_name: Option<String>,
    votes: i64,
    uploaded_at: String,
}

impl From<PhotoRow> for PhotoEntity {
    fn from(row: PhotoRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            user_name: row.user_name,
            filename: row.filename,
            original_name: row.original_name,
            votes: row.votes,
            uploaded_at: row.uploaded_at,
        }
    }
}
