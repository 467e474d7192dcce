use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use db_pool::{create_pool, DbConfig};
use pulse_api::middleware::JwtAuth;
use pulse_api::services::ReactionLedger;
use pulse_api::{handlers, metrics, Config};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// pulse-api
///
/// The Pulse backend: registration/login, a post composer, a polled global
/// feed, and per-post like/dislike toggling. One HTTP service over one
/// PostgreSQL database.
///
/// # Routes
///
/// - `POST /api/v1/auth/register`, `POST /api/v1/auth/login`
/// - `GET  /api/v1/users/{user_id}` - public profile
/// - `GET/POST /api/v1/posts` - feed and composer (authenticated)
/// - `POST /api/v1/posts/{post_id}/like|dislike` - reaction toggles
/// - `GET  /api/v1/posts/{post_id}/interaction` - reaction status
/// - `GET  /api/v1/users/{user_id}/posts` - per-author listing
/// - `GET  /api/v1/health`, `GET /api/v1/health/live`, `GET /metrics`
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting pulse-api v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database connection pool. Config is the single source of
    // truth for the URL and pool ceiling; the remaining knobs keep their
    // db-pool defaults.
    let db_cfg = DbConfig {
        service_name: "pulse-api".to_string(),
        database_url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..DbConfig::default()
    };
    db_cfg.log_config();

    let db_pool = match create_pool(db_cfg).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    // Apply pending migrations
    if let Err(e) = sqlx::migrate!("./migrations").run(&db_pool).await {
        tracing::error!("Migration failed: {}", e);
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("Migration failed: {e}"),
        ));
    }
    tracing::info!("Database migrations applied");

    let ledger = ReactionLedger::new(db_pool.clone(), config.reactions.max_toggle_attempts);

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let pool_data = web::Data::new(db_pool);
    let ledger_data = web::Data::new(ledger);
    let config_data = web::Data::new(config.clone());

    HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(pool_data.clone())
            .app_data(ledger_data.clone())
            .app_data(config_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/metrics", web::get().to(metrics::serve_metrics))
            // Health check endpoints
            .route("/api/v1/health", web::get().to(handlers::health_summary))
            .route(
                "/api/v1/health/live",
                web::get().to(handlers::liveness_check),
            )
            // Public endpoints
            .route("/api/v1/auth/register", web::post().to(handlers::register))
            .route("/api/v1/auth/login", web::post().to(handlers::login))
            .route(
                "/api/v1/users/{user_id}",
                web::get().to(handlers::get_user),
            )
            // Authenticated endpoints
            .service(
                web::scope("/api/v1")
                    .wrap(JwtAuth::new(config.auth.jwt_secret.clone()))
                    .service(
                        web::scope("/posts")
                            .service(
                                web::resource("")
                                    .route(web::get().to(handlers::get_feed))
                                    .route(web::post().to(handlers::create_post)),
                            )
                            .route("/{post_id}/like", web::post().to(handlers::like_post))
                            .route("/{post_id}/dislike", web::post().to(handlers::dislike_post))
                            .route(
                                "/{post_id}/interaction",
                                web::get().to(handlers::get_interaction),
                            ),
                    )
                    .route(
                        "/users/{user_id}/posts",
                        web::get().to(handlers::get_user_posts),
                    ),
            )
    })
    .bind(&bind_address)?
    .workers(4)
    .run()
    .await
}
