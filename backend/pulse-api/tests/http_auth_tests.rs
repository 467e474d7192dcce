//! HTTP-level tests for the authentication boundary and request parsing.
//!
//! These run against an in-process actix app with a lazy (never-connected)
//! pool, exercising the paths that must be decided before any database
//! work happens: bearer-token validation and payload validation.

use actix_web::{http::StatusCode, test, web, App};
use pulse_api::config::{AppConfig, AuthConfig, Config, CorsConfig, DatabaseConfig, ReactionConfig};
use pulse_api::handlers;
use pulse_api::middleware::JwtAuth;
use pulse_api::security::jwt;
use pulse_api::services::ReactionLedger;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

const TEST_SECRET: &str = "integration-test-secret";

fn lazy_pool() -> PgPool {
    // Parses the URL but never opens a connection.
    PgPoolOptions::new()
        .connect_lazy("postgres://localhost:1/pulse_test")
        .expect("lazy pool should build without connecting")
}

fn test_config() -> Config {
    Config {
        app: AppConfig {
            env: "test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        cors: CorsConfig {
            allowed_origins: "*".to_string(),
        },
        database: DatabaseConfig {
            url: "postgres://localhost:1/pulse_test".to_string(),
            max_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: TEST_SECRET.to_string(),
            token_ttl_secs: 3600,
        },
        reactions: ReactionConfig {
            max_toggle_attempts: 3,
        },
    }
}

macro_rules! test_app {
    () => {{
        let pool = lazy_pool();
        let ledger = ReactionLedger::new(pool.clone(), 3);
        test::init_service(
            App::new()
                .app_data(web::Data::new(pool))
                .app_data(web::Data::new(ledger))
                .app_data(web::Data::new(test_config()))
                .route("/api/v1/auth/register", web::post().to(handlers::register))
                .route("/api/v1/auth/login", web::post().to(handlers::login))
                .service(
                    web::scope("/api/v1")
                        .wrap(JwtAuth::new(TEST_SECRET))
                        .service(
                            web::scope("/posts")
                                .service(
                                    web::resource("")
                                        .route(web::get().to(handlers::get_feed))
                                        .route(web::post().to(handlers::create_post)),
                                )
                                .route("/{post_id}/like", web::post().to(handlers::like_post))
                                .route(
                                    "/{post_id}/interaction",
                                    web::get().to(handlers::get_interaction),
                                ),
                        ),
                ),
        )
        .await
    }};
}

#[actix_web::test]
async fn missing_authorization_header_is_rejected() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/api/v1/posts").to_request();
    let err = test::try_call_service(&app, req)
        .await
        .expect_err("request without credentials should be rejected");

    assert_eq!(
        err.as_response_error().status_code(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn non_bearer_scheme_is_rejected() {
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/posts")
        .insert_header(("Authorization", "Token abcdef"))
        .to_request();
    let err = test::try_call_service(&app, req)
        .await
        .expect_err("non-bearer scheme should be rejected");

    assert_eq!(
        err.as_response_error().status_code(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn garbage_token_is_rejected() {
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/api/v1/posts")
        .insert_header(("Authorization", "Bearer not.a.token"))
        .to_request();
    let err = test::try_call_service(&app, req)
        .await
        .expect_err("malformed token should be rejected");

    assert_eq!(
        err.as_response_error().status_code(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn expired_token_is_rejected() {
    let app = test_app!();

    let token = jwt::issue_token(TEST_SECRET, -7200, Uuid::new_v4(), "user@example.com")
        .expect("should issue token");

    let req = test::TestRequest::get()
        .uri("/api/v1/posts")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let err = test::try_call_service(&app, req)
        .await
        .expect_err("expired token should be rejected");

    assert_eq!(
        err.as_response_error().status_code(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn token_signed_with_other_secret_is_rejected() {
    let app = test_app!();

    let token = jwt::issue_token("some-other-secret", 3600, Uuid::new_v4(), "user@example.com")
        .expect("should issue token");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/posts/{}/like", Uuid::new_v4()))
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let err = test::try_call_service(&app, req)
        .await
        .expect_err("token signed with another secret should be rejected");

    assert_eq!(
        err.as_response_error().status_code(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn malformed_post_id_is_a_client_error() {
    let app = test_app!();

    let token = jwt::issue_token(TEST_SECRET, 3600, Uuid::new_v4(), "user@example.com")
        .expect("should issue token");

    let req = test::TestRequest::get()
        .uri("/api/v1/posts/not-a-uuid/interaction")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_client_error());
}

#[actix_web::test]
async fn register_rejects_invalid_email_before_touching_storage() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(serde_json::json!({
            "name": "Ada",
            "email": "not-an-email",
            "password": "long enough password"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn register_rejects_short_password_before_touching_storage() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(serde_json::json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "short"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
