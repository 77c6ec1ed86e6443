use tracing::{info, warn};

use crate::{
    dto::{admin::LoginResponse, public::LeaderboardEntry},
    error::ServiceError,
    services::{public_service, sse_events},
    state::SharedState,
};

/// Exchange the shared admin password for the bearer token.
pub fn login(state: &SharedState, password: &str) -> Result<LoginResponse, ServiceError> {
    match state.admin().login(password) {
        Some(token) => {
            info!("admin logged in");
            Ok(LoginResponse {
                success: true,
                token: token.to_string(),
            })
        }
        None => {
            warn!("admin login rejected");
            Err(ServiceError::Unauthorized("wrong password".into()))
        }
    }
}

/// Add `delta` points to a guest and broadcast the refreshed leaderboard.
pub async fn adjust_score(
    state: &SharedState,
    user_id: &str,
    delta: i64,
) -> Result<Vec<LeaderboardEntry>, ServiceError> {
    let Some(user) = state
        .store()
        .adjust_score(user_id.to_string(), delta)
        .await?
    else {
        return Err(ServiceError::NotFound(format!("user `{user_id}`")));
    };
    info!(user_id, delta, score = user.score, "score adjusted");

    let leaderboard = public_service::leaderboard(state).await?;
    sse_events::broadcast_leaderboard(state, leaderboard.clone());
    Ok(leaderboard)
}
