use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::{public::LeaderboardEntry, validation::validate_not_blank};

#[derive(Debug, Deserialize, ToSchema, Validate)]
/// Credentials submitted by the admin panel.
pub struct LoginRequest {
    /// Shared admin password.
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// Bearer token to send as `Authorization: Bearer <token>` on admin endpoints.
pub struct LoginResponse {
    /// Always `true` on a 200.
    pub success: bool,
    /// Bearer token for admin routes.
    pub token: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
/// Request to add (or subtract) points to a guest.
pub struct ScoreAdjustmentRequest {
    /// Chat id of the guest.
    #[validate(custom(function = "validate_not_blank"))]
    pub user_id: String,
    /// Points to add; negative to subtract.
    pub score_change: i64,
}

#[derive(Debug, Serialize, ToSchema)]
/// Updated leaderboard returned after a score adjustment.
pub struct ScoreUpdateResponse {
    /// Always `true` on a 200.
    pub success: bool,
    /// Leaderboard after the change.
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
/// Question opened for the quiz.
pub struct StartQuestionRequest {
    /// Question text.
    #[validate(custom(function = "validate_not_blank"))]
    pub question: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Identifier assigned to the freshly opened question.
pub struct StartQuestionResponse {
    /// Always `true` on a 200.
    pub success: bool,
    /// Identifier answers are filed under.
    pub question_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
/// Generic acknowledgement used by admin endpoints.
pub struct ActionResponse {
    /// Always `true` on a 200.
    pub success: bool,
}

impl ActionResponse {
    /// Successful acknowledgement.
    pub fn ok() -> Self {
        Self { success: true }
    }
}
