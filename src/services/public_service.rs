use crate::{
    dao::models::GameMode,
    dto::public::{
        AnswerResponse, ArchiveJobResponse, GameStateResponse, LeaderboardEntry,
        ParticipantsCountResponse, PhotoResponse,
    },
    error::ServiceError,
    services::{game_state_service, photo_service, quiz_service, user_service, voting_service},
    state::SharedState,
};

/// Number of registered guests.
pub async fn participants_count(
    state: &SharedState,
) -> Result<ParticipantsCountResponse, ServiceError> {
    let count = user_service::participant_count(state).await?;
    Ok(ParticipantsCountResponse { count })
}

/// Guests ordered by score descending, earliest joiners first on ties.
pub async fn leaderboard(state: &SharedState) -> Result<Vec<LeaderboardEntry>, ServiceError> {
    let users = state.store().list_users().await?;
    Ok(users.into_iter().map(Into::into).collect())
}

/// Current phase of `mode` as exposed to the dashboard.
pub async fn game_state(
    state: &SharedState,
    mode: GameMode,
) -> Result<GameStateResponse, ServiceError> {
    let current = game_state_service::get_state(state, mode).await?;
    Ok(GameStateResponse {
        mode: current.mode,
        status: current.status,
        payload: current.payload,
        updated_at: current.updated_at,
    })
}

/// Answers to `question_id` in submission order.
pub async fn answers(
    state: &SharedState,
    question_id: i64,
) -> Result<Vec<AnswerResponse>, ServiceError> {
    let answers = quiz_service::list_answers(state, question_id).await?;
    Ok(answers.into_iter().map(Into::into).collect())
}

/// Gallery in upload order.
pub async fn photos(state: &SharedState) -> Result<Vec<PhotoResponse>, ServiceError> {
    let photos = photo_service::list_photos(state).await?;
    Ok(photos.into_iter().map(Into::into).collect())
}

/// Best-voted photos, at most `limit`.
pub async fn top_photos(
    state: &SharedState,
    limit: u32,
) -> Result<Vec<PhotoResponse>, ServiceError> {
    let photos = voting_service::top_photos(state, limit).await?;
    Ok(photos.into_iter().map(Into::into).collect())
}

/// Progress of every archive job.
pub fn archive_status(state: &SharedState) -> Vec<ArchiveJobResponse> {
    state.archive().statuses()
}
