use super::*;
use axum::{body, body::Body, http::Request, response::Response};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app() -> Router {
    build_router(Arc::new(AppState::default()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request");
    app.clone().oneshot(request).await.expect("response")
}

async fn json_body(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

async fn signup_manager(app: &Router) -> Value {
    let response = send(
        app,
        "POST",
        "/api/auth/signup",
        Some(json!({
            "username": "coach1",
            "email": "coach@club.io",
            "password": "x",
            "fullName": "Coach One",
            "role": "MANAGER"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    json_body(response).await
}

#[tokio::test]
async fn healthz_reports_ok() {
    let response = send(&test_app(), "GET", "/healthz", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(bytes.as_ref(), b"ok");
}

#[tokio::test]
async fn signup_then_login_returns_session() {
    let app = test_app();
    let created = signup_manager(&app).await;
    assert_eq!(created["role"], "MANAGER");
    assert_eq!(created["fullName"], "Coach One");

    let response = send(
        &app,
        "POST",
        "/api/auth/login",
        Some(json!({ "username": "coach1", "password": "x" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let session = json_body(response).await;
    assert_eq!(session["id"], created["id"]);
}

#[tokio::test]
async fn domain_errors_are_bad_request_with_error_body() {
    let app = test_app();
    signup_manager(&app).await;

    let response = send(
        &app,
        "POST",
        "/api/auth/login",
        Some(json!({ "username": "coach1", "password": "nope" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Invalid username or password" })
    );

    let response = send(&app, "GET", "/api/clubs/code/BOGUS0000", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "Club not found");
}

#[tokio::test]
async fn club_team_player_flow_over_http() {
    let app = test_app();
    let manager = signup_manager(&app).await;

    let response = send(
        &app,
        "POST",
        "/api/clubs",
        Some(json!({ "name": "Eagles", "ownerId": manager["id"] })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let club = json_body(response).await;
    assert_eq!(club["memberCount"], 1);
    let club_code = club["clubCode"].as_str().expect("club code").to_string();

    let response = send(&app, "GET", &format!("/api/clubs/code/{club_code}"), None).await;
    assert_eq!(json_body(response).await["id"], club["id"]);

    let response = send(
        &app,
        "POST",
        "/api/teams",
        Some(json!({
            "name": "U18s",
            "clubId": club["id"],
            "managerId": manager["id"]
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let team = json_body(response).await;
    assert_eq!(team["club"]["id"], club["id"]);

    let response = send(&app, "GET", &format!("/api/teams/club/{}", club["id"]), None).await;
    let teams = json_body(response).await;
    assert_eq!(teams.as_array().map(Vec::len), Some(1));
    assert!(teams[0].get("clubId").is_none());
    assert_eq!(teams[0]["playerCount"], 0);

    let response = send(
        &app,
        "POST",
        "/api/players",
        Some(json!({ "name": "Sam", "position": "Forward", "teamId": team["id"] })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", &format!("/api/players/team/{}", team["id"]), None).await;
    let players = json_body(response).await;
    assert_eq!(players[0]["name"], "Sam");
    assert_eq!(players[0]["goals"], 0);
    assert_eq!(players[0]["matchesPlayed"], 0);

    let response = send(&app, "GET", "/api/clubs", None).await;
    let clubs = json_body(response).await;
    assert_eq!(clubs[0]["teamCount"], 1);

    let team_code = team["teamCode"].as_str().expect("team code");
    let response = send(&app, "GET", &format!("/api/teams/code/{team_code}"), None).await;
    assert_eq!(json_body(response).await["name"], "U18s");
}
