use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the wedding game backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::webhook::receive_events,
        crate::routes::public::participants_count,
        crate::routes::public::leaderboard,
        crate::routes::public::quiz_status,
        crate::routes::public::quiz_answers,
        crate::routes::public::photos,
        crate::routes::public::top_photos,
        crate::routes::public::voting_status,
        crate::routes::public::archive_status,
        crate::routes::admin::login,
        crate::routes::admin::adjust_score,
        crate::routes::admin::start_question,
        crate::routes::admin::end_question,
        crate::routes::admin::start_voting,
        crate::routes::admin::end_voting,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::webhook::WebhookRequest,
            crate::dto::public::GameStateResponse,
            crate::dto::public::ArchiveJobStatus,
            crate::dto::sse::ParticipantsUpdatedEvent,
            crate::dto::sse::QuestionStartedEvent,
            crate::dto::sse::QuestionEndedEvent,
            crate::dto::sse::NewAnswerEvent,
            crate::dto::sse::PhotoUploadedEvent,
            crate::dto::sse::VotingStartedEvent,
            crate::dto::sse::VoteUpdatedEvent,
            crate::dao::models::GameMode,
            crate::dao::models::PhaseStatus,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "webhook", description = "Chat platform callbacks"),
        (name = "public", description = "Dashboard data"),
        (name = "quiz", description = "Quiz questions and answers"),
        (name = "photos", description = "Photo gallery and voting"),
        (name = "admin", description = "Game control, requires the admin bearer token"),
    )
)]
/// OpenAPI document of the HTTP API.
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}
