use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Ping the database and report the archive backlog.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let database_up = match state.store().health_check().await {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "storage health check failed");
            false
        }
    };

    HealthResponse::new(database_up, state.archive().pending())
}
