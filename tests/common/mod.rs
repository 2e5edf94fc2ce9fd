#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query},
    http::{HeaderMap, Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing,
};
use quillgate::auth::{SessionCookie, SessionReader};
use quillgate::client::Navigator;
use quillgate::guard::GuardState;
use quillgate::jwt::{JwtConfig, SessionIdentity};
use quillgate::routes::RouteTable;
use quillgate::{ServerConfig, create_app, pages};
use serde_json::{Value, json};
use url::Url;

pub const TEST_SECRET: &[u8] = b"test-session-secret-with-32-bytes-or-more";
pub const SITE_URL: &str = "http://localhost:7291";
pub const GOOD_PASSWORD: &str = "correct-horse";
pub const BACKEND_ACCESS_TOKEN: &str = "backend-access-token";

/// Backend URL for tests that never reach the backend.
pub const UNREACHABLE_BACKEND: &str = "http://127.0.0.1:9";

pub fn test_config(api_server_url: &str) -> ServerConfig {
    ServerConfig {
        site_url: Url::parse(SITE_URL).expect("Invalid URL"),
        api_server_url: Url::parse(api_server_url).expect("Invalid URL"),
        session_secret: TEST_SECRET.to_vec(),
        cookie: SessionCookie::default(),
    }
}

pub fn test_app(api_server_url: &str) -> Router {
    create_app(&test_config(api_server_url)).expect("Failed to create app")
}

/// Page routes alone, without the edge guard layer in front.
pub fn pages_without_edge_guard() -> Router {
    pages::router(GuardState {
        sessions: SessionReader::new(
            Arc::new(JwtConfig::new(TEST_SECRET)),
            SessionCookie::default(),
        ),
        routes: Arc::new(RouteTable::default()),
    })
}

pub fn identity() -> SessionIdentity {
    SessionIdentity {
        user_id: "7".into(),
        email: "ada@example.com".into(),
        name: "Ada Lovelace".into(),
        image: None,
        access_token: Some(BACKEND_ACCESS_TOKEN.into()),
        refresh_token: Some("backend-refresh-token".into()),
    }
}

/// `Cookie` header value carrying a valid session.
pub fn session_cookie() -> String {
    let token = JwtConfig::new(TEST_SECRET)
        .issue_session(&identity())
        .expect("Failed to issue session")
        .token;
    format!("{}={}", SessionCookie::default().name(), token)
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Start an in-process fake of the blog backend on a random port.
pub async fn spawn_backend() -> Url {
    let api = Router::new()
        .route("/sign-in", routing::post(backend_sign_in))
        .route("/sign-up", routing::post(backend_sign_up))
        .route("/echo", routing::get(backend_echo).post(backend_echo))
        .route("/search", routing::get(backend_search))
        .route("/empty", routing::get(|| async { StatusCode::NO_CONTENT }))
        .route("/status/{code}", routing::get(backend_status));
    let app = Router::new().nest("/v1", api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Url::parse(&format!("http://{}/v1", addr)).unwrap()
}

async fn backend_sign_in(Json(body): Json<Value>) -> Response {
    if body["password"] != GOOD_PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Wrong email or password"})),
        )
            .into_response();
    }
    Json(json!({
        "data": {
            "user": {"id": 7, "email": body["email"], "fullName": "Ada Lovelace"},
            "accessToken": BACKEND_ACCESS_TOKEN,
            "refreshToken": "backend-refresh-token"
        }
    }))
    .into_response()
}

async fn backend_sign_up(Json(body): Json<Value>) -> Response {
    if body["email"] == "taken@example.com" {
        return (
            StatusCode::CONFLICT,
            Json(json!({"message": "Email already registered"})),
        )
            .into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({"data": {"email": body["email"], "fullName": body["fullName"]}})),
    )
        .into_response()
}

/// Reflects the request headers the client is responsible for.
async fn backend_echo(headers: HeaderMap) -> Json<Value> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };
    Json(json!({
        "authorization": header("authorization"),
        "timezone": header("timezone"),
        "contentType": header("content-type"),
    }))
}

async fn backend_search(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({ "query": query }))
}

async fn backend_status(Path(code): Path<u16>) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({"message": format!("status {}", code)}))).into_response()
}

/// Navigator that remembers what it was asked to do.
#[derive(Default)]
pub struct RecordingNavigator {
    pub sign_outs: Mutex<Vec<String>>,
    pub navigations: Mutex<Vec<String>>,
}

impl Navigator for RecordingNavigator {
    fn sign_out(&self, callback_url: &str) {
        self.sign_outs.lock().unwrap().push(callback_url.to_string());
    }

    fn navigate(&self, url: &str) {
        self.navigations.lock().unwrap().push(url.to_string());
    }
}
