use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use tracing::{debug, warn};

use crate::{
    chat::signature::SIGNATURE_HEADER,
    dto::webhook::WebhookRequest,
    error::AppError,
    services::webhook_service,
    state::SharedState,
};

/// Chat platform callback endpoint.
pub fn router() -> Router<SharedState> {
    Router::new().route("/webhook", post(receive_events))
}

#[utoipa::path(
    post,
    path = "/webhook",
    tag = "webhook",
    params(("X-Line-Signature" = Option<String>, Header, description = "Base64 HMAC-SHA256 of the body, required when a channel secret is configured")),
    request_body = WebhookRequest,
    responses(
        (status = 200, description = "Every event of the batch has been processed"),
        (status = 400, description = "Body is not a webhook payload"),
        (status = 401, description = "Missing or invalid signature")
    )
)]
/// Accept a batch of chat events and answer once all of them settled.
pub async fn receive_events(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    if let Some(verifier) = state.webhook_verifier() {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing webhook signature".into()))?;
        if !verifier.verify(&body, signature) {
            warn!("webhook signature mismatch");
            return Err(AppError::Unauthorized("invalid webhook signature".into()));
        }
    }

    let request: WebhookRequest = serde_json::from_slice(&body)
        .map_err(|err| AppError::BadRequest(format!("invalid webhook payload: {err}")))?;

    // Verification pings from the platform carry no events.
    if request.events.is_empty() {
        debug!(destination = ?request.destination, "empty webhook batch");
        return Ok(StatusCode::OK);
    }

    let summary = webhook_service::process_batch(&state, request.events).await;
    debug!(?summary, "webhook batch processed");
    Ok(StatusCode::OK)
}
