use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{TimeDelta, Utc};
use clap::Parser;
use deadpool_sqlite::Pool;
use serde_json::{json, Value};
use server::{cli::Cli, db, routes, AppState};
use shared::model::User;
use tempfile::TempDir;
use tower::ServiceExt;

const FORM: &str = "application/x-www-form-urlencoded";

struct Response {
    status: StatusCode,
    location: Option<String>,
    body: String,
}

impl Response {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// One browser talking to a fresh server with its own database
struct TestClient {
    _dir: Arc<TempDir>,
    pool: Pool,
    router: Router,
    cookie: Option<String>,
}

impl TestClient {
    fn new() -> Self {
        shared::configure_tracing_once();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        let path = path.to_str().unwrap();

        db::run_migrations(path).unwrap();
        let pool = db::create_pool(path).unwrap();
        let args = Cli::parse_from(["server", "--sqlite-connection-string", path]);

        Self {
            _dir: Arc::new(dir),
            router: routes::router(AppState::new(pool.clone(), args)),
            pool,
            cookie: None,
        }
    }

    /// A second client sharing the same server but not the session
    fn other_browser(&self) -> TestClient {
        TestClient {
            _dir: self._dir.clone(),
            pool: self.pool.clone(),
            router: self.router.clone(),
            cookie: None,
        }
    }

    async fn send(&mut self, method: Method, uri: &str, form: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = match form {
            Some(form) => {
                builder = builder.header(header::CONTENT_TYPE, FORM);
                Body::from(form.to_string())
            },
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        // Keep the session cookie like a browser would
        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = match pair.split_once('=') {
                Some((_, "")) | None => None,
                Some(_) => Some(pair.to_string()),
            };
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|l| l.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        Response {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    async fn get(&mut self, uri: &str) -> Response {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&mut self, uri: &str, form: &str) -> Response {
        self.send(Method::POST, uri, Some(form)).await
    }

    async fn status(&mut self) -> Value {
        let response = self.get("/status").await;
        assert_eq!(response.status, StatusCode::OK);
        response.json()
    }

    /// Changes a user directly in the database, like an admin would
    async fn update_user(&self, username: &str, change: impl FnOnce(&mut User) + Send + 'static) {
        let username = username.to_string();
        self.pool
            .get()
            .await
            .unwrap()
            .interact(move |conn| {
                let mut user = User::fetch_by_username(conn, &username).unwrap().unwrap();
                change(&mut user);
                user.update(conn).unwrap();
            })
            .await
            .unwrap();
    }

    async fn signup(&mut self, username: &str, password: &str) -> Response {
        self.post(
            "/signup",
            &format!("username={username}&email={username}%40example.com&password={password}"),
        )
        .await
    }
}

#[tokio::test]
async fn test_ping() {
    let mut client = TestClient::new();

    let response = client.get("/api/ping").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), Value::Null);
}

#[tokio::test]
async fn test_index_page() {
    let mut client = TestClient::new();

    let response = client.get("/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(r#"<span id="remaining">50</span>"#));
    assert!(response.body.contains(r#"action="/log_pushups""#));
}

#[tokio::test]
async fn test_logging_pushups() {
    let mut client = TestClient::new();

    assert_eq!(
        client.status().await,
        json!({ "remaining": 50, "emergency": false, "time_left": 0 })
    );

    let response = client.post("/log_pushups", "amount=20").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "<p>Logged! <a href='/'>Back</a></p>");
    assert_eq!(client.status().await["remaining"], 30);

    // Bad input counts as zero
    for amount in ["amount=abc", "amount=", "amount=-5", ""] {
        let response = client.post("/log_pushups", amount).await;
        assert_eq!(response.status, StatusCode::OK);
    }
    assert_eq!(client.status().await["remaining"], 30);

    client.post("/log_pushups", "amount=35").await;
    assert_eq!(client.status().await["remaining"], 0);
}

#[tokio::test]
async fn test_emergency() {
    let mut client = TestClient::new();

    let response = client.send(Method::POST, "/start_emergency", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "<p>Emergency started! <a href='/'>Back</a></p>");

    let status = client.status().await;
    assert_eq!(status["emergency"], true);
    let time_left = status["time_left"].as_u64().unwrap();
    assert!((898..=900).contains(&time_left), "time_left = {time_left}");

    let response = client.post("/extend_emergency", "code=0000").await;
    assert_eq!(response.json(), json!({ "ok": false }));

    let response = client.post("/extend_emergency", "").await;
    assert_eq!(response.json(), json!({ "ok": false }));

    let response = client.post("/extend_emergency", "code=1234").await;
    assert_eq!(response.json(), json!({ "ok": true }));
    assert_eq!(client.status().await["emergency"], true);
}

#[tokio::test]
async fn test_signup_gives_separate_progress() {
    let mut anonymous = TestClient::new();
    let mut alice = anonymous.other_browser();

    anonymous.post("/log_pushups", "amount=5").await;

    let response = alice.signup("alice", "correct+horse").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/"));
    assert!(alice.cookie.is_some());

    assert_eq!(alice.status().await["remaining"], 50);
    alice.post("/log_pushups", "amount=10").await;
    alice.post("/log_pushups", "amount=7").await;
    assert_eq!(alice.status().await["remaining"], 33);
    assert_eq!(anonymous.status().await["remaining"], 45);

    let history = alice.get("/history").await.json();
    assert_eq!(history["total"], 17);
    assert_eq!(history["logs"][0]["count"], 7);
    assert_eq!(history["logs"][1]["count"], 10);

    assert!(alice.get("/").await.body.contains("Logged in as <strong>alice</strong>"));

    let response = alice.send(Method::POST, "/logout", None).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(alice.get("/history").await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(alice.status().await["remaining"], 45);
}

#[tokio::test]
async fn test_signup_errors() {
    let mut client = TestClient::new();
    assert_eq!(client.get("/signup").await.status, StatusCode::OK);

    let response = client.post("/signup", "username=al&email=nope&password=short").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.contains("Username needs to be at least 4 characters long"));

    client.signup("alice", "correct+horse").await;

    let mut other = client.other_browser();
    let response = other.signup("alice", "another+password").await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body, "Username is already registered");
    assert!(other.get("/history").await.status == StatusCode::UNAUTHORIZED);

    // The original password still works
    let response = other.post("/login", "username=alice&password=correct+horse").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_login() {
    let mut client = TestClient::new();
    client.signup("alice", "correct+horse").await;
    client.send(Method::POST, "/logout", None).await;

    assert_eq!(client.get("/login").await.status, StatusCode::OK);

    let wrong_password = client.post("/login", "username=alice&password=wrong+horse").await;
    let unknown_user = client.post("/login", "username=nobody&password=correct+horse").await;
    for response in [wrong_password, unknown_user] {
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body, "Invalid username or password");
    }
    assert_eq!(client.get("/history").await.status, StatusCode::UNAUTHORIZED);

    let response = client.post("/login", "username=Alice&password=correct+horse").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(client.get("/history").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_account() {
    let mut client = TestClient::new();
    client.signup("alice", "correct+horse").await;
    client.post("/log_pushups", "amount=10").await;

    let response = client.send(Method::POST, "/account/delete", None).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(client.get("/history").await.status, StatusCode::UNAUTHORIZED);

    let response = client.post("/login", "username=alice&password=correct+horse").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    // The username is free again and starts from scratch
    let response = client.signup("alice", "correct+horse").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(client.get("/history").await.json()["total"], 0);
    assert_eq!(client.status().await["remaining"], 50);
}

#[tokio::test]
async fn test_account_routes_need_login() {
    let mut client = TestClient::new();

    assert_eq!(client.get("/history").await.status, StatusCode::UNAUTHORIZED);
    let response = client.send(Method::POST, "/account/delete", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_posts_without_a_body() {
    let mut client = TestClient::new();
    client.post("/log_pushups", "amount=5").await;

    let response = client.send(Method::POST, "/log_pushups", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "<p>Logged! <a href='/'>Back</a></p>");
    assert_eq!(client.status().await["remaining"], 45);

    client.send(Method::POST, "/start_emergency", None).await;
    let response = client.send(Method::POST, "/extend_emergency", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({ "ok": false }));
}

#[tokio::test]
async fn test_login_refused_for_disabled_and_banned_accounts() {
    let mut client = TestClient::new();
    client.signup("alice", "correct+horse").await;
    client.send(Method::POST, "/logout", None).await;

    client.update_user("alice", |user| user.is_active = false).await;
    let response = client.post("/login", "username=alice&password=correct+horse").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body, "Account is disabled");
    assert_eq!(client.get("/history").await.status, StatusCode::UNAUTHORIZED);

    client
        .update_user("alice", |user| {
            user.is_active = true;
            user.banned_until = Some(Utc::now() + TimeDelta::days(1));
        })
        .await;
    let response = client.post("/login", "username=alice&password=correct+horse").await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(response.body.starts_with("Account is banned until "), "{}", response.body);
    assert_eq!(client.get("/history").await.status, StatusCode::UNAUTHORIZED);

    // An expired ban doesn't count
    client
        .update_user("alice", |user| {
            user.banned_until = Some(Utc::now() - TimeDelta::days(1));
        })
        .await;
    let response = client.post("/login", "username=alice&password=correct+horse").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(client.get("/history").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_session_of_deleted_user_is_logged_out() {
    let mut laptop = TestClient::new();
    let mut phone = laptop.other_browser();

    laptop.signup("alice", "correct+horse").await;
    let response = phone.post("/login", "username=alice&password=correct+horse").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    phone.post("/log_pushups", "amount=3").await;

    let response = laptop.send(Method::POST, "/account/delete", None).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    // The phone still has its cookie but now counts as anonymous
    assert!(phone.cookie.is_some());
    let response = phone.post("/log_pushups", "amount=5").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(phone.status().await["remaining"], 45);
    assert_eq!(phone.get("/history").await.status, StatusCode::UNAUTHORIZED);
    assert!(!phone.get("/").await.body.contains("Logged in as"));
}

#[tokio::test]
async fn test_session_ends_when_account_is_disabled() {
    let mut client = TestClient::new();
    client.signup("alice", "correct+horse").await;
    assert_eq!(client.get("/history").await.status, StatusCode::OK);

    client.update_user("alice", |user| user.is_active = false).await;
    assert_eq!(client.get("/history").await.status, StatusCode::UNAUTHORIZED);

    // Re-enabling doesn't bring back the flushed session
    client.update_user("alice", |user| user.is_active = true).await;
    assert_eq!(client.get("/history").await.status, StatusCode::UNAUTHORIZED);
}
