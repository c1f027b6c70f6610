//! Router tests over in-memory stores.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION, header::CONTENT_TYPE},
};
use chrono::{Duration, TimeZone, Utc};
use fxgate_api::{AppState, create_router};
use fxgate_core::auth::{MemoryCredentialStore, SessionAuthenticator};
use fxgate_core::currency::{ConversionEngine, MemorySnapshotStore, RateFetcher, RateMap};
use fxgate_shared::{FetchError, FetchedRates, JwtConfig, JwtService};
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Serves USD rates until told to fail.
#[derive(Default)]
struct SwitchFetcher {
    failing: AtomicBool,
}

#[async_trait]
impl RateFetcher for SwitchFetcher {
    fn name(&self) -> &str {
        "switch"
    }

    async fn fetch(&self, _base: &str) -> Result<FetchedRates, FetchError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(FetchError::Rejected("switch"));
        }
        Ok(FetchedRates {
            rates: RateMap::from([
                ("EUR".to_string(), dec!(0.90)),
                ("JPY".to_string(), dec!(150)),
                ("GBP".to_string(), dec!(0.79)),
            ]),
            as_of: Utc.with_ymd_and_hms(2026, 2, 3, 0, 0, 0).unwrap(),
        })
    }
}

struct TestApp {
    router: Router,
    fetcher: Arc<SwitchFetcher>,
}

impl TestApp {
    fn new() -> Self {
        let jwt = JwtService::new(JwtConfig {
            secret: "router-test-secret".to_string(),
            token_ttl: Duration::hours(24),
        });
        let auth = SessionAuthenticator::new(Arc::new(MemoryCredentialStore::new()), jwt);

        let fetcher = Arc::new(SwitchFetcher::default());
        let engine = ConversionEngine::new(fetcher.clone(), Arc::new(MemorySnapshotStore::new()));

        let state = AppState::new(Arc::new(auth), Arc::new(engine), "USD");
        Self {
            router: create_router(state),
            fetcher,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Registers and logs in, returning the access token.
    async fn login_as(&self, email: &str) -> String {
        let (status, _) = self
            .post(
                "/auth/register",
                None,
                json!({ "email": email, "password": "hunter22" }),
            )
            .await;
        assert!(status == StatusCode::CREATED || status == StatusCode::CONFLICT);
        self.login(email).await
    }

    async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .post(
                "/auth/login",
                None,
                json!({ "email": email, "password": "hunter22" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["access_token"].as_str().unwrap().to_string()
    }

    async fn refresh(&self, token: &str) {
        let (status, _) = self
            .post("/api/admin/refresh-rates", Some(token), json!({}))
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.get("/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_register_and_login() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/auth/register",
            None,
            json!({ "email": " Ann@Example.com", "password": "hunter22" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "ann@example.com");
    assert!(body["id"].is_string());
    assert!(body.get("password_hash").is_none());

    let (status, body) = app
        .post(
            "/auth/login",
            None,
            json!({ "email": "ann@example.com", "password": "hunter22" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert!(body["access_token"].is_string());
}

#[tokio::test]
async fn test_register_errors() {
    let app = TestApp::new();
    app.login_as("bo@example.com").await;

    let (status, body) = app
        .post(
            "/auth/register",
            None,
            json!({ "email": "BO@example.com", "password": "hunter22" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "email_taken");

    let (status, body) = app
        .post(
            "/auth/register",
            None,
            json!({ "email": "no-at-sign", "password": "hunter22" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_email_or_password");

    let (status, body) = app
        .post("/auth/register", None, json!({ "email": "x@y.z" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new();
    app.login_as("cy@example.com").await;

    let (status, body) = app
        .post(
            "/auth/login",
            None,
            json!({ "email": "cy@example.com", "password": "wrong-one" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");
}

#[tokio::test]
async fn test_protected_route_auth_failures() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/rates", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, body) = app.get("/api/rates", Some("not.a.jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_second_login_revokes_first_token() {
    let app = TestApp::new();
    let first = app.login_as("di@example.com").await;
    app.refresh(&first).await;

    let second = app.login("di@example.com").await;

    let (status, body) = app.get("/api/rates", Some(&first)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "session_revoked");

    let (status, _) = app.get("/api/rates", Some(&second)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let app = TestApp::new();
    let token = app.login_as("ed@example.com").await;

    let (status, body) = app.post("/auth/logout", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = app.post("/auth/logout", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "session_revoked");
}

#[tokio::test]
async fn test_rates_unavailable_then_served() {
    let app = TestApp::new();
    let token = app.login_as("fay@example.com").await;

    let (status, body) = app.get("/api/rates", Some(&token)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "rates_unavailable");

    app.refresh(&token).await;

    let (status, body) = app.get("/api/rates?base=usd", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["base"], "USD");
    assert_eq!(body["fetchedAt"], "2026-02-03T00:00:00Z");
    assert_eq!(body["rates"]["JPY"], "150");
    assert_eq!(body["rates"].as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn test_rates_symbols_filter() {
    let app = TestApp::new();
    let token = app.login_as("gus@example.com").await;
    app.refresh(&token).await;

    let (status, body) = app
        .get("/api/rates?symbols=eur,%20gbp,XXX", Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["rates"],
        json!({ "EUR": "0.90", "GBP": "0.79" })
    );
}

#[tokio::test]
async fn test_rates_invalid_base() {
    let app = TestApp::new();
    let token = app.login_as("hal@example.com").await;

    let (status, body) = app.get("/api/rates?base=DOLLARS", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_currency");
}

#[tokio::test]
async fn test_rates_malformed_query_is_json_error() {
    let app = TestApp::new();
    let token = app.login_as("hank@example.com").await;

    let (status, body) = app
        .get("/api/rates?symbols=EUR&symbols=JPY", Some(&token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_convert_triangulates() {
    let app = TestApp::new();
    let token = app.login_as("ida@example.com").await;
    app.refresh(&token).await;

    let (status, body) = app
        .post(
            "/api/convert",
            Some(&token),
            json!({ "amount": "100", "from": "eur", "to": "jpy", "base": "usd" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "amount": "100",
            "from": "EUR",
            "to": "JPY",
            "base": "USD",
            "converted": "16666.666667"
        })
    );

    let (_, body) = app
        .post(
            "/api/convert",
            Some(&token),
            json!({ "amount": "100", "from": "USD", "to": "EUR" }),
        )
        .await;
    assert_eq!(body["converted"], "90.000000");
}

#[tokio::test]
async fn test_convert_same_currency_without_rates() {
    let app = TestApp::new();
    let token = app.login_as("jo@example.com").await;

    let (status, body) = app
        .post(
            "/api/convert",
            Some(&token),
            json!({ "amount": "12.5", "from": "CHF", "to": "chf" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["converted"], "12.500000");
}

#[tokio::test]
async fn test_convert_errors() {
    let app = TestApp::new();
    let token = app.login_as("kim@example.com").await;

    let (status, body) = app
        .post(
            "/api/convert",
            Some(&token),
            json!({ "amount": "100", "from": "USD", "to": "EUR" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "rates_unavailable");

    app.refresh(&token).await;

    let cases = [
        (json!({ "amount": "ten", "from": "USD", "to": "EUR" }), "invalid_amount"),
        (json!({ "amount": "1", "from": "USD", "to": "EURO" }), "invalid_currency"),
        (json!({ "amount": "1", "from": "USD", "to": "CAD" }), "unknown_target_currency"),
        (json!({ "amount": "1", "from": "CAD", "to": "USD" }), "unknown_source_currency"),
        (json!({ "amount": "1", "from": "CAD", "to": "EUR" }), "unknown_currency"),
        (json!({ "amount": 1, "from": "USD", "to": "EUR" }), "bad_request"),
    ];
    for (request, code) in cases {
        let (status, body) = app.post("/api/convert", Some(&token), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{code}");
        assert_eq!(body["error"], code);
    }
}

#[tokio::test]
async fn test_refresh_failure_is_400() {
    let app = TestApp::new();
    let token = app.login_as("lu@example.com").await;
    app.fetcher.failing.store(true, Ordering::SeqCst);

    let (status, body) = app
        .post("/api/admin/refresh-rates", Some(&token), json!({ "base": "usd" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "upstream_failure");

    let (status, _) = app.get("/api/rates", Some(&token)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
