use axum::{Extension, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use datacat::config::AppConfig;
use datacat::repo::CatalogRepo;
use datacat::services::CatalogService;
use datacat::{db, handlers, middleware, AppState};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize production-grade logging
    init_logging().expect("Failed to initialize logging");

    let config = AppConfig::from_env();

    // Create the database connection pool; first run also creates the schema
    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool.");

    let catalog = Arc::new(CatalogService::new(CatalogRepo::new(db_pool.clone())));

    // Create the shared state
    let shared_state = Arc::new(AppState {
        db_pool,
        catalog,
        config: config.clone(),
    });

    // Build our application with all routes and shared state
    let app = Router::new()
        .merge(handlers::routes())
        .route("/api/status", axum::routing::get(api_status))
        .layer(axum::middleware::from_fn(
            middleware::logging::request_logging_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(Extension(shared_state));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap();
    tracing::info!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}

// Production-grade logging configuration
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    // Get log level from environment or default to INFO for production
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,datacat=trace,sqlx=info,reqwest=info,hyper=info,tower=info".to_string()
        } else {
            "info,datacat=info,sqlx=warn,reqwest=warn,hyper=warn,tower=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    // Configure structured logging for production
    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        // JSON logging for production (easier for log aggregation)
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .boxed()
    } else {
        // Human-readable logging for development
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    // Log startup information
    tracing::info!("🗂️ datacat starting up...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Build mode: {}",
        if cfg!(debug_assertions) {
            "development"
        } else {
            "production"
        }
    );
    tracing::info!("Log level: {}", log_level);

    // Log environment configuration
    let db_configured = std::env::var("DATABASE_URL").is_ok();
    let key_configured = std::env::var("DATACAT_API_KEY").is_ok();
    tracing::info!(
        "Configuration - Database: {}, API key: {}",
        if db_configured {
            "✅"
        } else {
            "❌ (default sqlite file)"
        },
        if key_configured {
            "✅"
        } else {
            "❌ (query endpoint open)"
        }
    );

    Ok(())
}

// API Status endpoint
async fn api_status(
    Extension(state): Extension<Arc<AppState>>,
) -> axum::response::Json<serde_json::Value> {
    use serde_json::json;

    let db_status = match sqlx::query("SELECT 1").fetch_one(&state.db_pool).await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };
    let query_auth = if state.config.api_key.is_empty() {
        "open"
    } else {
        "api_key"
    };

    axum::response::Json(json!({
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "database": db_status,
            "query_api": query_auth
        },
        "endpoints": {
            "status": "/api/status",
            "health": "/api/health",
            "query": "/api/query",
            "domains": "/api/domains",
            "assets": "/api/assets",
            "live": ["/ws/domains", "/ws/assets"]
        }
    }))
}
