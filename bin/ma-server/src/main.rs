//! Meetapp Server
//!
//! Serves the meetup and subscription REST APIs:
//! - Subscriptions: list, subscribe, unsubscribe
//! - Meetups: browse, create, update, cancel
//! - Organizing: the caller's own meetups
//! - Health and readiness probes, Swagger UI
//!
//! Configuration comes from `config.toml` (see `ma_config::ConfigLoader`)
//! with `MEETAPP_*` environment overrides.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MEETAPP_CONFIG` | - | Path to the TOML config file |
//! | `MEETAPP_HTTP_PORT` | `3333` | HTTP API port |
//! | `MEETAPP_DATABASE_URL` | `sqlite://data/meetapp.db?mode=rwc` | Platform database |
//! | `MEETAPP_QUEUE_URL` | `sqlite://data/queue.db?mode=rwc` | Notification queue database |
//! | `MEETAPP_JWT_SECRET` | - | HS256 secret shared with the auth service |
//! | `MEETAPP_DEV_MODE` | `false` | Seed development data, allow an empty secret |
//! | `LOG_FORMAT` | `text` | `json` for structured logs |
//! | `RUST_LOG` | `info` | Log level |

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa_swagger_ui::SwaggerUi;

use ma_config::{AppConfig, ConfigLoader};
use ma_platform::seed::DevDataSeeder;
use ma_platform::shared::middleware::{AppState, AuthLayer};
use ma_platform::{init_schema, Platform, QueueNotificationDispatcher, TokenService};
use ma_queue::sqlite::SqliteQueue;
use ma_queue::EmbeddedQueue;

const DEV_JWT_SECRET: &str = "meetapp-dev-secret";

#[derive(Clone)]
struct ProbeState {
    pool: SqlitePool,
    queue: Arc<SqliteQueue>,
}

#[tokio::main]
async fn main() -> Result<()> {
    ma_common::logging::init_logging("ma-server");

    let config = ConfigLoader::new().load()?;
    config.validate()?;
    info!(port = config.http.port, dev_mode = config.dev_mode, "Starting Meetapp Server");

    let pool = connect(&config.database.url, config.database.max_connections).await?;
    init_schema(&pool).await?;

    let queue_pool = if config.queue.url == config.database.url {
        pool.clone()
    } else {
        connect(&config.queue.url, 2).await?
    };
    let queue = Arc::new(SqliteQueue::new(queue_pool, config.queue.queue_name.clone()));
    queue.init_schema().await?;

    let dispatcher = Arc::new(QueueNotificationDispatcher::new(queue.clone()));
    let platform = Platform::sqlite(pool.clone(), dispatcher, config.files.base_url.clone());

    let token_service = Arc::new(TokenService::new(
        &jwt_secret(&config),
        config.auth.issuer.clone(),
        config.auth.audience.clone(),
    ));

    if config.dev_mode {
        DevDataSeeder::new(platform.users.clone(), platform.meetups.clone(), token_service.clone())
            .seed()
            .await?;
    }

    let (router, mut openapi) = platform.router().split_for_parts();

    openapi.info.title = "Meetapp API".to_string();
    openapi.info.version = env!("CARGO_PKG_VERSION").to_string();
    openapi.info.description = Some("Meetups, subscriptions and organizer tools".to_string());
    openapi
        .components
        .get_or_insert_with(Default::default)
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );

    let probes = Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .with_state(ProbeState { pool, queue: queue.clone() });

    let app = Router::new()
        .merge(router)
        .merge(SwaggerUi::new("/swagger-ui").url("/q/openapi", openapi))
        .layer(AuthLayer::new(AppState { token_service }))
        .merge(probes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.http.cors_origins));

    let addr = format!("{}:{}", config.http.host, config.http.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("API server listening on http://{}", addr);
    info!("Swagger UI at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    queue.stop();
    info!("Meetapp Server shutdown complete");
    Ok(())
}

async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool> {
    ensure_parent_dir(url)?;
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await?;
    Ok(pool)
}

/// SQLite creates the database file on demand but not its directory.
fn ensure_parent_dir(url: &str) -> Result<()> {
    let Some(path) = url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn jwt_secret(config: &AppConfig) -> String {
    if config.auth.jwt_secret.is_empty() {
        warn!("No JWT secret configured, using the development secret");
        DEV_JWT_SECRET.to_string()
    } else {
        config.auth.jwt_secret.clone()
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn ready_handler(State(state): State<ProbeState>) -> (StatusCode, Json<serde_json::Value>) {
    let database_ok = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();

    match state.queue.pending_count().await {
        Ok(pending) if database_ok => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "READY",
                "pendingNotifications": pending
            })),
        ),
        _ => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "NOT_READY" })),
        ),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received...");
}
