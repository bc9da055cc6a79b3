//! End-to-end session and CSRF flows through a test router.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use auth::domain::{Credentials, Email, UserIdentity};
use auth::handlers::{AuthAppState, csrf_token, current_user, sign_in, sign_out, sign_up};
use auth::middleware::{SessionSubject, refresh_session, require_csrf_session, require_session};
use auth::{AuthConfig, AuthError, AuthResult, CredentialStore, SessionToken, TokenCodec};
use axum::extract::Path;
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::middleware::from_fn_with_state;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router, body::Body, body::to_bytes};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

#[derive(Default)]
struct MemoryStore {
    users: Mutex<HashMap<String, String>>,
    calls: AtomicUsize,
}

/// Folds case for lookups the way a real user table would, but hands the
/// submitted address back unchanged
impl CredentialStore for MemoryStore {
    async fn create_user(&self, credentials: &Credentials) -> AuthResult<UserIdentity> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = credentials.email.as_str().to_lowercase();
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&key) {
            return Err(AuthError::EmailTaken);
        }
        users.insert(key, credentials.password.clone());
        Ok(UserIdentity {
            id: Some(format!("user-{}", users.len())),
            email: credentials.email.clone(),
        })
    }

    async fn authenticate(&self, credentials: &Credentials) -> AuthResult<Email> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = credentials.email.as_str().to_lowercase();
        match self.users.lock().unwrap().get(&key) {
            Some(password) if *password == credentials.password => Ok(credentials.email.clone()),
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}

async fn create_todo(Extension(SessionSubject(owner)): Extension<SessionSubject>) -> impl IntoResponse {
    (StatusCode::CREATED, Json(json!({ "owner": owner })))
}

async fn count_todos(Extension(SessionSubject(owner)): Extension<SessionSubject>) -> impl IntoResponse {
    Json(json!({ "owner": owner, "count": 0 }))
}

async fn get_todo(
    Path(id): Path<String>,
    Extension(SessionSubject(owner)): Extension<SessionSubject>,
) -> impl IntoResponse {
    if id == "missing" {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({ "id": id, "owner": owner })).into_response()
}

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
    config: Arc<AuthConfig>,
}

impl TestApp {
    fn new() -> Self {
        let config = Arc::new(AuthConfig::with_random_secret());
        let store = Arc::new(MemoryStore::default());
        let state = AuthAppState::new(store.clone(), config.clone());

        let auth_routes = Router::new()
            .route("/api/csrftoken", get(csrf_token::<MemoryStore>))
            .route("/api/register", post(sign_up::<MemoryStore>))
            .route("/api/login", post(sign_in::<MemoryStore>))
            .route("/api/logout", post(sign_out::<MemoryStore>))
            .route("/api/user", get(current_user::<MemoryStore>))
            .with_state(state);

        let mutations = Router::new()
            .route("/api/todo", post(create_todo))
            .route_layer(from_fn_with_state(config.clone(), require_csrf_session));

        let reads = Router::new()
            .route("/api/todo/{id}", get(get_todo))
            .route_layer(from_fn_with_state(config.clone(), refresh_session));

        let polls = Router::new()
            .route("/api/todo-count", get(count_todos))
            .route_layer(from_fn_with_state(config.clone(), require_session));

        Self {
            router: auth_routes.merge(mutations).merge(reads).merge(polls),
            store,
            config,
        }
    }

    fn codec(&self) -> TokenCodec {
        TokenCodec::new(self.config.clone())
    }

    /// Session cookie as a browser would send it back
    fn cookie_for(&self, token: &SessionToken) -> String {
        format!("access_token=\"{}\"", token.cookie_value())
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, headers, json)
    }

    async fn csrf(&self) -> String {
        let (status, _, body) = self
            .send(
                Request::get("/api/csrftoken")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["csrf_token"].as_str().unwrap().to_string()
    }

    async fn register(&self, email: &str, password: &str) {
        let csrf = self.csrf().await;
        let (status, _, _) = self
            .send(json_post("/api/register", Some(&csrf), None, user_body(email, password)))
            .await;
        assert_eq!(status, StatusCode::OK);
    }
}

fn user_body(email: &str, password: &str) -> Value {
    json!({ "email": email, "password": password })
}

fn json_post(uri: &str, csrf: Option<&str>, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(csrf) = csrf {
        builder = builder.header("X-CSRF-Token", csrf);
    }
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

/// Token carried by the `Set-Cookie` header, if any
fn issued_token(headers: &HeaderMap) -> Option<String> {
    let set_cookie = headers.get(header::SET_COOKIE)?.to_str().ok()?;
    let value = set_cookie.split(';').next()?.strip_prefix("access_token=")?;
    let value = value.trim_matches('"');
    value.strip_prefix("Bearer ").map(str::to_string)
}

#[tokio::test]
async fn test_login_issues_bearer_cookie() {
    let app = TestApp::new();
    app.register("user@example.com", "secret").await;

    let csrf = app.csrf().await;
    let (status, headers, body) = app
        .send(json_post(
            "/api/login",
            Some(&csrf),
            None,
            user_body("user@example.com", "secret"),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully loggedIn");

    let set_cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.starts_with("access_token=\"Bearer "));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Secure"));
    assert!(set_cookie.contains("SameSite=None"));

    let token = issued_token(&headers).unwrap();
    assert_eq!(app.codec().decode(&token).unwrap(), "user@example.com");
}

#[tokio::test]
async fn test_login_subject_is_submitted_email() {
    let app = TestApp::new();
    app.register("alice@example.com", "secret").await;

    let csrf = app.csrf().await;
    let (status, headers, _) = app
        .send(json_post(
            "/api/login",
            Some(&csrf),
            None,
            user_body("Alice@Example.com", "secret"),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    let token = issued_token(&headers).unwrap();
    assert_eq!(app.codec().decode(&token).unwrap(), "Alice@Example.com");

    let cookie = format!("access_token=\"Bearer {token}\"");
    let (_, _, body) = app.send(get_with_cookie("/api/user", &cookie)).await;
    assert_eq!(body["email"], "Alice@Example.com");
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = TestApp::new();
    app.register("user@example.com", "secret").await;

    let csrf = app.csrf().await;
    let (status, headers, _) = app
        .send(json_post(
            "/api/login",
            Some(&csrf),
            None,
            user_body("user@example.com", "wrong"),
        ))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_read_endpoint_slides_session() {
    let app = TestApp::new();
    let t1 = app
        .codec()
        .encode_at("user@example.com", Utc::now() - Duration::seconds(60))
        .unwrap();

    let (status, headers, body) = app
        .send(get_with_cookie("/api/user", &app.cookie_for(&t1)))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "user@example.com");

    let t2 = issued_token(&headers).unwrap();
    let claims = app.codec().decode_claims(&t2).unwrap();
    assert_eq!(claims.subject, "user@example.com");
    assert!(claims.expires_at > t1.expires_at());
}

#[tokio::test]
async fn test_mutation_without_csrf_keeps_cookie() {
    let app = TestApp::new();
    let t1 = app.codec().encode("user@example.com").unwrap();

    let (status, headers, body) = app
        .send(json_post(
            "/api/todo",
            None,
            Some(&app.cookie_for(&t1)),
            json!({ "title": "t", "description": "d" }),
        ))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], 403);
    assert!(headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_mutation_with_forged_csrf() {
    let app = TestApp::new();
    let t1 = app.codec().encode("user@example.com").unwrap();

    let (status, headers, _) = app
        .send(json_post(
            "/api/todo",
            Some("forged.1700000000.c2lnbmF0dXJl"),
            Some(&app.cookie_for(&t1)),
            json!({}),
        ))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_mutation_with_csrf_refreshes_session() {
    let app = TestApp::new();
    let t1 = app
        .codec()
        .encode_at("user@example.com", Utc::now() - Duration::seconds(60))
        .unwrap();
    let csrf = app.csrf().await;

    let (status, headers, body) = app
        .send(json_post(
            "/api/todo",
            Some(&csrf),
            Some(&app.cookie_for(&t1)),
            json!({ "title": "t", "description": "d" }),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["owner"], "user@example.com");

    let t2 = issued_token(&headers).unwrap();
    assert!(app.codec().decode_claims(&t2).unwrap().expires_at > t1.expires_at());
}

#[tokio::test]
async fn test_expired_session_is_rejected() {
    let app = TestApp::new();
    let expired = app
        .codec()
        .encode_at("user@example.com", Utc::now() - Duration::minutes(10))
        .unwrap();
    let cookie = app.cookie_for(&expired);

    let (status, headers, body) = app.send(get_with_cookie("/api/user", &cookie)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Session token expired");
    assert!(headers.get(header::SET_COOKIE).is_none());

    let (status, _, _) = app.send(get_with_cookie("/api/todo/1", &cookie)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let csrf = app.csrf().await;
    let (status, _, _) = app
        .send(json_post("/api/todo", Some(&csrf), Some(&cookie), json!({})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_or_tampered_session() {
    let app = TestApp::new();

    let (status, _, _) = app
        .send(Request::get("/api/user").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = app.codec().encode("user@example.com").unwrap();
    let mut forged = token.value.clone();
    forged.pop();
    forged.push(if token.value.ends_with('A') { 'B' } else { 'A' });
    let (status, _, body) = app
        .send(get_with_cookie(
            "/api/user",
            &format!("access_token=\"Bearer {forged}\""),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Invalid session token");
}

#[tokio::test]
async fn test_failed_read_does_not_refresh() {
    let app = TestApp::new();
    let t1 = app.codec().encode("user@example.com").unwrap();

    let (status, headers, _) = app
        .send(get_with_cookie("/api/todo/missing", &app.cookie_for(&t1)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(headers.get(header::SET_COOKIE).is_none());

    let (status, headers, body) = app
        .send(get_with_cookie("/api/todo/7", &app.cookie_for(&t1)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["owner"], "user@example.com");
    assert!(issued_token(&headers).is_some());
}

#[tokio::test]
async fn test_verify_only_read_keeps_cookie() {
    let app = TestApp::new();
    let t1 = app
        .codec()
        .encode_at("user@example.com", Utc::now() - Duration::seconds(60))
        .unwrap();

    let (status, headers, body) = app
        .send(get_with_cookie("/api/todo-count", &app.cookie_for(&t1)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["owner"], "user@example.com");
    assert!(headers.get(header::SET_COOKIE).is_none());

    let expired = app
        .codec()
        .encode_at("user@example.com", Utc::now() - Duration::minutes(10))
        .unwrap();
    let (status, headers, body) = app
        .send(get_with_cookie("/api/todo-count", &app.cookie_for(&expired)))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Session token expired");
    assert!(headers.get(header::SET_COOKIE).is_none());

    let (status, _, _) = app
        .send(Request::get("/api/todo-count").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_and_register_require_csrf_before_store() {
    let app = TestApp::new();

    for uri in ["/api/register", "/api/login"] {
        let (status, _, body) = app
            .send(json_post(uri, None, None, user_body("user@example.com", "secret")))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(body["detail"], "CSRF token missing");
    }

    assert_eq!(app.store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_register_conflict_and_validation() {
    let app = TestApp::new();
    app.register("user@example.com", "secret").await;

    let csrf = app.csrf().await;
    let (status, _, _) = app
        .send(json_post(
            "/api/register",
            Some(&csrf),
            None,
            user_body("USER@example.com", "other"),
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, _) = app
        .send(json_post(
            "/api/register",
            Some(&csrf),
            None,
            user_body("not-an-email", "secret"),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_returns_user_info() {
    let app = TestApp::new();
    let csrf = app.csrf().await;

    let (status, headers, body) = app
        .send(json_post(
            "/api/register",
            Some(&csrf),
            None,
            user_body("new@example.com", "secret"),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": "user-1", "email": "new@example.com" }));
    assert!(headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = TestApp::new();
    let t1 = app.codec().encode("user@example.com").unwrap();

    let (status, _, _) = app
        .send(json_post("/api/logout", None, Some(&app.cookie_for(&t1)), json!({})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let csrf = app.csrf().await;
    let (status, headers, body) = app
        .send(json_post("/api/logout", Some(&csrf), Some(&app.cookie_for(&t1)), json!({})))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully LoggedOut");

    let set_cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.starts_with("access_token=;"));
    assert!(set_cookie.contains("Max-Age=0"));
    assert!(issued_token(&headers).is_none());
}

#[tokio::test]
async fn test_full_session_lifecycle() {
    let app = TestApp::new();
    app.register("flow@example.com", "pw").await;

    let csrf = app.csrf().await;
    let (_, headers, _) = app
        .send(json_post(
            "/api/login",
            Some(&csrf),
            None,
            user_body("flow@example.com", "pw"),
        ))
        .await;
    let cookie = format!("access_token=\"Bearer {}\"", issued_token(&headers).unwrap());

    let (status, headers, body) = app.send(get_with_cookie("/api/user", &cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "flow@example.com");
    let cookie = format!("access_token=\"Bearer {}\"", issued_token(&headers).unwrap());

    let (status, _, _) = app
        .send(json_post("/api/todo", Some(&csrf), Some(&cookie), json!({})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}
