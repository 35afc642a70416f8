//! Hospital Management Frontend
//!
//! Server-rendered admin UI for the hospital REST backend. Every page is
//! assembled per request from backend data, gated by the caller's role.

mod api;
mod config;
mod errors;
mod invoice;
mod models;
mod policy;
mod session;
mod shell;
mod ui;
mod views;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::ApiClient;
use config::Config;
use invoice::InvoiceFonts;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<ApiClient>,
    pub config: Arc<Config>,
    pub fonts: Arc<InvoiceFonts>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Hospital Management Frontend");
    tracing::info!("Backend API: {}", config.api_base);
    tracing::info!("Bind address: {}", config.bind_addr);

    if !config.secure_cookie {
        tracing::warn!("Session cookie is not marked Secure (HMS_SECURE_COOKIE)");
    }

    let fonts = InvoiceFonts::from_config(&config)?;
    if let Some(path) = &config.invoice_font {
        tracing::info!("Invoice font: {}", path.display());
    }

    let state = AppState {
        api: Arc::new(ApiClient::new(config.api_base.clone())),
        config: Arc::new(config.clone()),
        fonts: Arc::new(fonts),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route("/", get(shell::index))
        // Session
        .route("/login", post(views::auth::login))
        .route("/register", post(views::auth::register))
        .route("/logout", post(shell::logout))
        // Resources
        .route("/doctors", post(views::doctors::create))
        .route("/appointments", post(views::appointments::create))
        .route(
            "/appointments/{id}/status",
            post(views::appointments::update_status),
        )
        .route("/prescriptions", post(views::prescriptions::create))
        .route("/billing", post(views::billing::create))
        .route("/billing/{id}/invoice.pdf", get(views::billing::download));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(page_routes)
        .merge(health_routes)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

async fn not_found() -> errors::AppError {
    errors::AppError::NotFound("Page not found".to_string())
}
