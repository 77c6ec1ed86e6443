use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::{self, Next},
    response::Response,
    routing::post,
};
use axum_valid::Valid;

use crate::{
    dto::admin::{
        ActionResponse, LoginRequest, LoginResponse, ScoreAdjustmentRequest, ScoreUpdateResponse,
        StartQuestionRequest, StartQuestionResponse,
    },
    error::AppError,
    services::{admin_service, game_state_service},
    state::SharedState,
};

/// Admin login plus the bearer-protected endpoints driving the games.
pub fn router(state: SharedState) -> Router<SharedState> {
    let protected = Router::new()
        .route("/api/admin/score", post(adjust_score))
        .route("/api/qa/start", post(start_question))
        .route("/api/qa/end", post(end_question))
        .route("/api/photos/voting/start", post(start_voting))
        .route("/api/photos/voting/end", post(end_voting))
        .route_layer(middleware::from_fn_with_state(state, require_admin_token));

    Router::new()
        .route("/api/admin/login", post(login))
        .merge(protected)
}

#[utoipa::path(
    post,
    path = "/api/admin/login",
    tag = "admin",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Password accepted", body = LoginResponse),
        (status = 401, description = "Wrong password")
    )
)]
/// Exchange the admin password for a bearer token.
pub async fn login(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<LoginRequest>>,
) -> Result<Json<LoginResponse>, AppError> {
    Ok(Json(admin_service::login(&state, &payload.password)?))
}

#[utoipa::path(
    post,
    path = "/api/admin/score",
    tag = "admin",
    security(("bearer" = [])),
    request_body = ScoreAdjustmentRequest,
    responses(
        (status = 200, description = "Score updated", body = ScoreUpdateResponse),
        (status = 404, description = "Unknown guest")
    )
)]
/// Add or remove points for a guest.
pub async fn adjust_score(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<ScoreAdjustmentRequest>>,
) -> Result<Json<ScoreUpdateResponse>, AppError> {
    let leaderboard =
        admin_service::adjust_score(&state, &payload.user_id, payload.score_change).await?;
    Ok(Json(ScoreUpdateResponse {
        success: true,
        leaderboard,
    }))
}

#[utoipa::path(
    post,
    path = "/api/qa/start",
    tag = "admin",
    security(("bearer" = [])),
    request_body = StartQuestionRequest,
    responses(
        (status = 200, description = "Question opened", body = StartQuestionResponse),
        (status = 400, description = "Blank question")
    )
)]
/// Open a quiz question, replacing any question still open.
pub async fn start_question(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<StartQuestionRequest>>,
) -> Result<Json<StartQuestionResponse>, AppError> {
    let question_id = game_state_service::start_quiz(&state, &payload.question).await?;
    Ok(Json(StartQuestionResponse {
        success: true,
        question_id,
    }))
}

#[utoipa::path(
    post,
    path = "/api/qa/end",
    tag = "admin",
    security(("bearer" = [])),
    responses((status = 200, description = "Question closed (no-op when none was open)", body = ActionResponse))
)]
/// Close the open quiz question.
pub async fn end_question(State(state): State<SharedState>) -> Result<Json<ActionResponse>, AppError> {
    game_state_service::end_quiz(&state).await?;
    Ok(Json(ActionResponse::ok()))
}

#[utoipa::path(
    post,
    path = "/api/photos/voting/start",
    tag = "admin",
    security(("bearer" = [])),
    responses((status = 200, description = "Voting opened", body = ActionResponse))
)]
/// Open photo voting.
pub async fn start_voting(State(state): State<SharedState>) -> Result<Json<ActionResponse>, AppError> {
    game_state_service::start_voting(&state).await?;
    Ok(Json(ActionResponse::ok()))
}

#[utoipa::path(
    post,
    path = "/api/photos/voting/end",
    tag = "admin",
    security(("bearer" = [])),
    responses((status = 200, description = "Voting closed (no-op when not open)", body = ActionResponse))
)]
/// Close photo voting.
pub async fn end_voting(State(state): State<SharedState>) -> Result<Json<ActionResponse>, AppError> {
    game_state_service::end_voting(&state).await?;
    Ok(Json(ActionResponse::ok()))
}

async fn require_admin_token(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let provided = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".into()))?;

    if state.admin().check(provided) {
        Ok(next.run(req).await)
    } else {
        Err(AppError::Unauthorized("invalid admin token".into()))
    }
}
