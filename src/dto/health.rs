use serde::Serialize;
use utoipa::ToSchema;

/// Liveness report returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// "ok" when the database answered, "degraded" otherwise.
    pub status: String,
    /// Photos waiting for the archive worker.
    pub pending_archives: usize,
}

impl HealthResponse {
    /// Report built from the database probe and the archive backlog.
    pub fn new(database_up: bool, pending_archives: usize) -> Self {
        let status = if database_up { "ok" } else { "degraded" };
        Self {
            status: status.to_string(),
            pending_archives,
        }
    }

    /// Whether the route should answer 200.
    pub fn is_healthy(&self) -> bool {
        self.status == "ok"
    }
}
