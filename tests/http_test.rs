mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{ADMIN_PASSWORD, TestApp, test_app, test_app_with_secret};
use wedding_game_back::{
    chat::signature::{SIGNATURE_HEADER, WebhookVerifier},
    routes,
};

fn router(app: &TestApp) -> Router {
    routes::router(app.state.clone())
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = router(app).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

async fn admin_token(app: &TestApp) -> String {
    let (status, body) = send(
        app,
        post_json("/api/admin/login", json!({"password": ADMIN_PASSWORD}), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn healthcheck_reports_the_database() {
    let app = test_app().await;
    let (status, body) = send(&app, get("/healthcheck")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pendingArchives"], 0);
}

#[tokio::test]
async fn empty_webhook_batches_are_acknowledged() {
    let app = test_app().await;
    let (status, _) = send(
        &app,
        post_json("/webhook", json!({"destination": "bot", "events": []}), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.events.names().is_empty());
}

#[tokio::test]
async fn malformed_webhook_bodies_are_rejected() {
    let app = test_app().await;
    let request = Request::post("/webhook")
        .body(Body::from("not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn webhook_signatures_are_checked_when_a_secret_is_set() {
    let app = test_app_with_secret("channel-secret").await;
    let payload = json!({"events": []}).to_string();

    let unsigned = Request::post("/webhook")
        .body(Body::from(payload.clone()))
        .unwrap();
    assert_eq!(send(&app, unsigned).await.0, StatusCode::UNAUTHORIZED);

    let forged = Request::post("/webhook")
        .header(SIGNATURE_HEADER, "bm9wZQ==")
        .body(Body::from(payload.clone()))
        .unwrap();
    assert_eq!(send(&app, forged).await.0, StatusCode::UNAUTHORIZED);

    let signature = WebhookVerifier::new("channel-secret").sign(payload.as_bytes());
    let signed = Request::post("/webhook")
        .header(SIGNATURE_HEADER, signature)
        .body(Body::from(payload))
        .unwrap();
    assert_eq!(send(&app, signed).await.0, StatusCode::OK);
}

#[tokio::test]
async fn admin_endpoints_require_the_bearer_token() {
    let app = test_app().await;

    let (status, _) = send(&app, post_json("/api/qa/start", json!({"question": "Q?"}), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        post_json("/api/qa/start", json!({"question": "Q?"}), Some("guess")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        post_json("/api/admin/login", json!({"password": "wrong"}), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_can_run_a_quiz_round() {
    let app = test_app().await;
    let token = admin_token(&app).await;

    let (status, body) = send(
        &app,
        post_json("/api/qa/start", json!({"question": "First kiss?"}), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let question_id = body["questionId"].as_i64().unwrap();

    let (_, current) = send(&app, get("/api/qa/status")).await;
    assert_eq!(current["status"], "active");
    assert_eq!(current["payload"]["questionId"], question_id);

    let (status, _) = send(&app, post_json("/api/qa/end", json!({}), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, current) = send(&app, get("/api/qa/status")).await;
    assert_eq!(current["status"], "ended");

    let (status, answers) = send(&app, get(&format!("/api/qa/answers/{question_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(answers, json!([]));
}

#[tokio::test]
async fn blank_questions_are_a_bad_request() {
    let app = test_app().await;
    let token = admin_token(&app).await;

    let (status, _) = send(
        &app,
        post_json("/api/qa/start", json!({"question": "  "}), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn score_adjustments_for_unknown_guests_are_not_found() {
    let app = test_app().await;
    let token = admin_token(&app).await;

    let (status, _) = send(
        &app,
        post_json(
            "/api/admin/score",
            json!({"userId": "ghost", "scoreChange": 5}),
            Some(&token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn top_photos_limit_is_validated() {
    let app = test_app().await;

    let (status, body) = send(&app, get("/api/photos/top")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    for limit in ["0", "51"] {
        let (status, _) = send(&app, get(&format!("/api/photos/top?limit={limit}"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn participants_and_leaderboard_start_empty() {
    let app = test_app().await;

    let (status, body) = send(&app, get("/api/participants/count")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    let (_, body) = send(&app, get("/api/leaderboard")).await;
    assert_eq!(body, json!([]));
}
