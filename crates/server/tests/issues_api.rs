//! Integration tests for the issue submission endpoints
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`; GitHub
//! is replaced by a small axum app bound to a local port that records every
//! issue it receives.

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use server::error::ErrorResponse;
use server::{build_router, ServerConfig, ServerState};

#[derive(Debug, Clone)]
struct Received {
    path: String,
    auth: String,
    body: Value,
}

type Log = Arc<Mutex<Vec<Received>>>;

/// Fake GitHub API. Repositories named `refuse` answer 422.
async fn spawn_fake_github() -> (String, Log) {
    async fn create_issue(
        State(log): State<Log>,
        Path((owner, repo)): Path<(String, String)>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let mut log = log.lock().unwrap();
        log.push(Received {
            path: format!("repos/{owner}/{repo}/issues"),
            auth,
            body: body.clone(),
        });

        if repo == "refuse" {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"message": "Validation Failed"})),
            );
        }
        let number = log.len();
        (
            StatusCode::CREATED,
            Json(json!({
                "number": number,
                "title": body["title"],
                "html_url": format!("https://github.com/{owner}/{repo}/issues/{number}"),
            })),
        )
    }

    let log: Log = Arc::default();
    let app = Router::new()
        .route("/repos/{owner}/{repo}/issues", post(create_issue))
        .with_state(log.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), log)
}

fn test_config(api_url: &str) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.github.api_url = api_url.to_string();
    config.github.bot_token = Some("bot-token".to_string());
    config.repos.issues_repo_uri = "acme/web-bugs/issues".to_string();
    config.repos.private_repo_uri = "acme/web-bugs-private/issues".to_string();
    config
}

fn router_for(config: ServerConfig) -> Router {
    let state = Arc::new(ServerState::new(config).expect("Failed to create test state"));
    build_router(state)
}

fn form_request(uri: &str, body: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

const PROXY_FORM: &str = "submit_type=github-proxy-report&url=https%3A%2F%2Fshop.example.com%2Fcart\
&description=Checkout+button+hidden&problem_category=layout_bug&browser=Firefox+122.0";

const AUTH_FORM: &str = "submit_type=github-auth-report&url=https%3A%2F%2Fshop.example.com%2Fcart\
&description=Checkout+button+hidden&problem_category=layout_bug";

#[tokio::test]
async fn proxy_report_files_placeholder_and_private_copy() {
    let (api_url, log) = spawn_fake_github().await;
    let app = router_for(test_config(&api_url));

    let response = app
        .oneshot(form_request("/api/v1/issues/proxy", PROXY_FORM, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(
        body["html_url"],
        "https://github.com/acme/web-bugs/issues/1"
    );
    assert_eq!(body["title"], "Placeholder in-moderation title.");

    let received = log.lock().unwrap().clone();
    assert_eq!(received.len(), 2);

    assert_eq!(received[0].path, "repos/acme/web-bugs/issues");
    assert_eq!(received[0].auth, "token bot-token");
    assert_eq!(
        received[0].body,
        json!({
            "title": "Placeholder in-moderation title.",
            "body": "Placeholder in-moderation body.",
        })
    );

    assert_eq!(received[1].path, "repos/acme/web-bugs-private/issues");
    assert_eq!(received[1].auth, "token bot-token");
    assert_eq!(
        received[1].body["title"],
        "shop.example.com - Design is broken"
    );
    let private_body = received[1].body["body"].as_str().unwrap();
    assert!(private_body
        .contains("<!-- @public_url: https://github.com/acme/web-bugs/issues/1 -->"));
    assert!(private_body.contains("Checkout button hidden"));
    assert_eq!(received[1].body["labels"], json!(["browser-firefox"]));
}

#[tokio::test]
async fn proxy_endpoint_rejects_auth_submit_type() {
    let (api_url, log) = spawn_fake_github().await;
    let app = router_for(test_config(&api_url));

    let response = app
        .oneshot(form_request("/api/v1/issues/proxy", AUTH_FORM, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = serde_json::from_value(read_json(response).await).unwrap();
    assert_eq!(body.error.code, "BAD_REQUEST");
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn refused_placeholder_is_a_bad_request() {
    let (api_url, log) = spawn_fake_github().await;
    let mut config = test_config(&api_url);
    config.repos.issues_repo_uri = "acme/refuse/issues".to_string();
    let app = router_for(config);

    let response = app
        .oneshot(form_request("/api/v1/issues/proxy", PROXY_FORM, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let received = log.lock().unwrap().clone();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].path, "repos/acme/refuse/issues");
}

#[tokio::test]
async fn authenticated_report_requires_token() {
    let (api_url, log) = spawn_fake_github().await;
    let app = router_for(test_config(&api_url));

    let response = app
        .oneshot(form_request("/api/v1/issues", AUTH_FORM, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorResponse = serde_json::from_value(read_json(response).await).unwrap();
    assert_eq!(body.error.code, "AUTH_FAILED");
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn authenticated_report_is_filed_as_reporter() {
    let (api_url, log) = spawn_fake_github().await;
    let app = router_for(test_config(&api_url));

    let response = app
        .oneshot(form_request("/api/v1/issues", AUTH_FORM, Some("reporter-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(
        body,
        json!({
            "number": 1,
            "title": "shop.example.com - Design is broken",
            "html_url": "https://github.com/acme/web-bugs/issues/1",
        })
    );

    let received = log.lock().unwrap().clone();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].path, "repos/acme/web-bugs/issues");
    assert_eq!(received[0].auth, "token reporter-token");
    assert!(received[0].body["body"]
        .as_str()
        .unwrap()
        .contains("**Description**: Checkout button hidden"));
}

#[tokio::test]
async fn authenticated_endpoint_rejects_proxy_submit_type() {
    let (api_url, log) = spawn_fake_github().await;
    let app = router_for(test_config(&api_url));

    let response = app
        .oneshot(form_request("/api/v1/issues", PROXY_FORM, Some("reporter-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_required_field_is_rejected() {
    let (api_url, log) = spawn_fake_github().await;
    let app = router_for(test_config(&api_url));

    let response = app
        .oneshot(form_request(
            "/api/v1/issues/proxy",
            "submit_type=github-proxy-report&url=https%3A%2F%2Fexample.com",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = serde_json::from_value(read_json(response).await).unwrap();
    assert_eq!(body.error.code, "INVALID_FORM");
    assert!(body.error.message.contains("description"));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn repeated_submissions_create_separate_issues() {
    let (api_url, log) = spawn_fake_github().await;
    let app = router_for(test_config(&api_url));

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(form_request("/api/v1/issues/proxy", PROXY_FORM, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    assert_eq!(log.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn health_and_fallback_routes() {
    let (api_url, _log) = spawn_fake_github().await;
    let app = router_for(test_config(&api_url));

    let response = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["status"], "healthy");

    let response = app
        .clone()
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn readiness_degrades_without_bot_token() {
    let mut config = ServerConfig::default();
    config.github.bot_token = None;
    let app = router_for(config);

    let response = app
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(read_json(response).await["status"], "degraded");
}

#[tokio::test]
async fn request_id_is_echoed() {
    let (api_url, _log) = spawn_fake_github().await;
    let app = router_for(test_config(&api_url));

    let response = app
        .oneshot(
            Request::get("/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-42");
}
