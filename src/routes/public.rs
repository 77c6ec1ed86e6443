use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use axum_valid::Valid;

use crate::{
    dao::models::GameMode,
    dto::public::{
        AnswerResponse, ArchiveJobResponse, GameStateResponse, LeaderboardEntry,
        ParticipantsCountResponse, PhotoResponse, TopPhotosQuery,
    },
    error::AppError,
    services::public_service,
    state::SharedState,
};

/// Public read-only endpoints used by the live dashboard.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/participants/count", get(participants_count))
        .route("/api/leaderboard", get(leaderboard))
        .route("/api/qa/status", get(quiz_status))
        .route("/api/qa/answers/{question_id}", get(quiz_answers))
        .route("/api/photos", get(photos))
        .route("/api/photos/top", get(top_photos))
        .route("/api/photos/voting/status", get(voting_status))
        .route("/api/archive/status", get(archive_status))
}

#[utoipa::path(
    get,
    path = "/api/participants/count",
    tag = "public",
    responses((status = 200, description = "Number of registered guests", body = ParticipantsCountResponse))
)]
/// Return the number of guests who joined.
pub async fn participants_count(
    State(state): State<SharedState>,
) -> Result<Json<ParticipantsCountResponse>, AppError> {
    Ok(Json(public_service::participants_count(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/leaderboard",
    tag = "public",
    responses((status = 200, description = "Guests by score", body = [LeaderboardEntry]))
)]
/// Return guests ordered by score, then by join time.
pub async fn leaderboard(
    State(state): State<SharedState>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    Ok(Json(public_service::leaderboard(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/qa/status",
    tag = "quiz",
    responses((status = 200, description = "Current quiz phase", body = GameStateResponse))
)]
/// Return the quiz phase and the open question, if any.
pub async fn quiz_status(
    State(state): State<SharedState>,
) -> Result<Json<GameStateResponse>, AppError> {
    Ok(Json(public_service::game_state(&state, GameMode::Qa).await?))
}

#[utoipa::path(
    get,
    path = "/api/qa/answers/{question_id}",
    tag = "quiz",
    params(("question_id" = i64, Path, description = "Identifier returned when the question was opened")),
    responses((status = 200, description = "Answers in submission order", body = [AnswerResponse]))
)]
/// Return every answer received for a question.
pub async fn quiz_answers(
    State(state): State<SharedState>,
    Path(question_id): Path<i64>,
) -> Result<Json<Vec<AnswerResponse>>, AppError> {
    Ok(Json(public_service::answers(&state, question_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/photos",
    tag = "photos",
    responses((status = 200, description = "Photos in upload order", body = [PhotoResponse]))
)]
/// Return the gallery; position `n` is the number guests vote with.
pub async fn photos(State(state): State<SharedState>) -> Result<Json<Vec<PhotoResponse>>, AppError> {
    Ok(Json(public_service::photos(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/photos/top",
    tag = "photos",
    params(TopPhotosQuery),
    responses(
        (status = 200, description = "Best-voted photos", body = [PhotoResponse]),
        (status = 400, description = "Limit outside 1..=50")
    )
)]
/// Return the best-voted photos.
pub async fn top_photos(
    State(state): State<SharedState>,
    Valid(Query(query)): Valid<Query<TopPhotosQuery>>,
) -> Result<Json<Vec<PhotoResponse>>, AppError> {
    Ok(Json(public_service::top_photos(&state, query.limit()).await?))
}

#[utoipa::path(
    get,
    path = "/api/photos/voting/status",
    tag = "photos",
    responses((status = 200, description = "Current voting phase", body = GameStateResponse))
)]
/// Return the photo voting phase.
pub async fn voting_status(
    State(state): State<SharedState>,
) -> Result<Json<GameStateResponse>, AppError> {
    Ok(Json(
        public_service::game_state(&state, GameMode::PhotoVoting).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/archive/status",
    tag = "photos",
    responses((status = 200, description = "Archive jobs", body = [ArchiveJobResponse]))
)]
/// Return the progress of photo archival jobs.
pub async fn archive_status(State(state): State<SharedState>) -> Json<Vec<ArchiveJobResponse>> {
    Json(public_service::archive_status(&state))
}
