use axum::Router;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

/// Password-protected admin routes.
pub mod admin;
/// Liveness probe.
pub mod health;
/// Read-only dashboard routes.
pub mod public;
/// Live event stream.
pub mod sse;
/// Chat platform webhook.
pub mod webhook;

/// Compose all route trees, wiring in shared state, documentation and uploaded files.
pub fn router(state: SharedState) -> Router<()> {
    let uploads = ServeDir::new(state.media().root());

    let api_router = health::router()
        .merge(sse::router())
        .merge(webhook::router())
        .merge(public::router())
        .merge(admin::router(state.clone()));

    api_router
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .nest_service("/uploads", uploads)
        .with_state(state)
}
