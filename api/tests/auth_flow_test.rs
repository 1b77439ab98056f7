//! End-to-end tests for the auth routes, middleware and gates, run against
//! the in-memory revocation store.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{test, web};

use sb_api::app::create_app;
use sb_api::directory::SeedUserDirectory;
use sb_api::routes::auth::AppState;
use sb_core::domain::entities::token::TokenClaims;
use sb_core::repositories::InMemoryRevocationStore;
use sb_core::services::jwt::{JwtService, JwtServiceConfig};
use sb_shared::config::CookieConfig;

const SECRET: &str = "integration-test-secret-0123456789-0123456789-0123456789-012345";

struct Harness {
    store: Arc<InMemoryRevocationStore>,
    jwt: Arc<JwtService<InMemoryRevocationStore>>,
    state: web::Data<AppState<InMemoryRevocationStore, SeedUserDirectory>>,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryRevocationStore::new());
    let jwt = Arc::new(JwtService::new(
        Arc::clone(&store),
        JwtServiceConfig {
            secret: SECRET.to_string(),
            access_ttl_secs: 900,
            refresh_ttl_secs: 604_800,
        },
    ));
    let directory = Arc::new(SeedUserDirectory::parse("user1@example.com:hunter2:1"));
    let state = web::Data::new(AppState::new(
        Arc::clone(&jwt),
        directory,
        CookieConfig {
            secure: false,
            ..CookieConfig::default()
        },
    ));
    Harness { store, jwt, state }
}

/// A normalized response that works for both the `Ok(ServiceResponse)` path
/// (handler-level errors, which actix turns into a response before the
/// service boundary) and the `Err(Error)` path (middleware-level denials,
/// which `actix_web::test::call_service` would otherwise panic on since it
/// doesn't run the HTTP dispatcher's error-to-response conversion).
struct TestResponse {
    status: StatusCode,
    cookies: Vec<(String, String)>,
    body: actix_web::web::Bytes,
}

impl TestResponse {
    fn status(&self) -> StatusCode {
        self.status
    }

    fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body is valid JSON")
    }

    fn cleared_cookie_names(&self) -> Vec<String> {
        self.cookies
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }
}

async fn call(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody + 'static>,
        Error = actix_web::Error,
    >,
    req: actix_http::Request,
) -> TestResponse {
    match app.call(req).await {
        Ok(resp) => {
            let status = resp.status();
            let cookies = resp
                .response()
                .cookies()
                .map(|c| (c.name().to_string(), c.value().to_string()))
                .collect();
            let body = actix_web::body::to_bytes(resp.into_body())
                .await
                .unwrap_or_default();
            TestResponse {
                status,
                cookies,
                body,
            }
        }
        Err(e) => {
            let resp = e.error_response();
            let status = resp.status();
            let body = actix_web::body::to_bytes(resp.into_body())
                .await
                .unwrap_or_default();
            TestResponse {
                status,
                cookies: Vec::new(),
                body,
            }
        }
    }
}

fn pair_cookies(resp: &TestResponse) -> (String, String) {
    let mut token = None;
    let mut refresh = None;
    for (name, value) in &resp.cookies {
        match name.as_str() {
            "token" => token = Some(value.clone()),
            "refreshToken" => refresh = Some(value.clone()),
            _ => {}
        }
    }
    (
        token.expect("token cookie missing"),
        refresh.expect("refreshToken cookie missing"),
    )
}

async fn login(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody + 'static>,
        Error = actix_web::Error,
    >,
) -> (String, String) {
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({
            "email": "user1@example.com",
            "password": "hunter2",
        }))
        .to_request();
    let resp = call(app, req).await;
    assert_eq!(resp.status(), 200, "login should succeed");
    pair_cookies(&resp)
}

#[actix_web::test]
async fn test_login_sets_cookie_pair_and_returns_claims() {
    let h = harness();
    let app = test::init_service(create_app(h.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({
            "email": "user1@example.com",
            "password": "hunter2",
        }))
        .to_request();
    let resp = call(&app, req).await;
    assert_eq!(resp.status(), 200);

    let (token, refresh) = pair_cookies(&resp);
    let access_claims = h.jwt.codec().verify(&token).unwrap();
    let refresh_claims = h.jwt.codec().verify(&refresh).unwrap();
    assert_eq!(access_claims.user_id, 1);
    assert_eq!(access_claims.gen, 0);
    assert_eq!(access_claims.fam, refresh_claims.fam);
}

#[actix_web::test]
async fn test_login_rejects_bad_credentials() {
    let h = harness();
    let app = test::init_service(create_app(h.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(serde_json::json!({
            "email": "user1@example.com",
            "password": "wrong",
        }))
        .to_request();
    let resp = call(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_protected_routes_require_a_cookie() {
    let h = harness();
    let app = test::init_service(create_app(h.state.clone())).await;

    for uri in ["/api/v1/auth/refresh", "/api/v1/auth/logout", "/api/v1/auth/logout-all"] {
        let req = test::TestRequest::post().uri(uri).to_request();
        let resp = call(&app, req).await;
        assert_eq!(resp.status(), 401, "{uri} should deny without a cookie");
    }
}

#[actix_web::test]
async fn test_garbage_cookie_is_denied() {
    let h = harness();
    let app = test::init_service(create_app(h.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .cookie(Cookie::new("refreshToken", "my.malicious.token"))
        .to_request();
    let resp = call(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_refresh_rotates_and_replay_cascades() {
    let h = harness();
    let app = test::init_service(create_app(h.state.clone())).await;

    let (_, original_refresh) = login(&app).await;

    // rotate: generation 0 -> 1
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .cookie(Cookie::new("refreshToken", original_refresh.clone()))
        .to_request();
    let resp = call(&app, req).await;
    assert_eq!(resp.status(), 200);
    let (rotated_token, rotated_refresh) = pair_cookies(&resp);

    let body: TokenClaims = serde_json::from_slice(&resp.body).unwrap();
    assert_eq!(body.gen, 1);

    // the rotated refresh cookie keeps the original absolute expiry
    let original_claims = h.jwt.codec().verify(&original_refresh).unwrap();
    let rotated_claims = h.jwt.codec().verify(&rotated_refresh).unwrap();
    assert_eq!(rotated_claims.exp, original_claims.exp);
    assert_eq!(rotated_claims.iat, original_claims.iat);

    // replaying the superseded refresh token is denied and burns the family
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .cookie(Cookie::new("refreshToken", original_refresh))
        .to_request();
    let resp = call(&app, req).await;
    assert_eq!(resp.status(), 401);

    // cascade: the legitimate generation-1 tokens are dead now too
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .cookie(Cookie::new("refreshToken", rotated_refresh))
        .to_request();
    assert_eq!(call(&app, req).await.status(), 401);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .cookie(Cookie::new("token", rotated_token))
        .to_request();
    assert_eq!(call(&app, req).await.status(), 401);
}

#[actix_web::test]
async fn test_logout_burns_family_and_clears_cookies() {
    let h = harness();
    let app = test::init_service(create_app(h.state.clone())).await;

    let (token, refresh) = login(&app).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .cookie(Cookie::new("token", token.clone()))
        .to_request();
    let resp = call(&app, req).await;
    assert_eq!(resp.status(), 200);

    // both cookie slots are cleared
    let cleared = resp.cleared_cookie_names();
    assert!(cleared.contains(&"token".to_string()));
    assert!(cleared.contains(&"refreshToken".to_string()));

    // the family is dead: neither half works anymore
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .cookie(Cookie::new("refreshToken", refresh))
        .to_request();
    assert_eq!(call(&app, req).await.status(), 401);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .cookie(Cookie::new("token", token))
        .to_request();
    assert_eq!(call(&app, req).await.status(), 401);
}

#[actix_web::test]
async fn test_logout_all_denies_earlier_tokens_with_distinct_message() {
    let h = harness();
    let app = test::init_service(create_app(h.state.clone())).await;

    let (token, _) = login(&app).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout-all")
        .cookie(Cookie::new("token", token))
        .to_request();
    assert_eq!(call(&app, req).await.status(), 200);

    // a token from before the epoch is denied with the distinct error code
    let mut backdated = TokenClaims::issue_now(1, "other-family", 0, 900);
    backdated.iat -= 60;
    let stale_token = h.jwt.codec().encode_claims(&backdated).unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .cookie(Cookie::new("token", stale_token))
        .to_request();
    let resp = call(&app, req).await;
    assert_eq!(resp.status(), 401);
    let body = resp.json();
    assert_eq!(body["error"], "logged_out_all_devices");

    // a pair issued after the epoch works again
    let (fresh_token, _) = login(&app).await;
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout-all")
        .cookie(Cookie::new("token", fresh_token))
        .to_request();
    assert_eq!(call(&app, req).await.status(), 200);
}

#[actix_web::test]
async fn test_store_outage_fails_closed_at_the_gate() {
    let h = harness();
    let app = test::init_service(create_app(h.state.clone())).await;

    let (token, _) = login(&app).await;

    h.store.set_failing(true);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout-all")
        .cookie(Cookie::new("token", token))
        .to_request();
    let resp = call(&app, req).await;
    assert_eq!(resp.status(), 401);
}
