use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use agendabot::config::AppConfig;
use agendabot::db;
use agendabot::handlers;
use agendabot::models::BotProfile;
use agendabot::services::messaging::gateway::WhatsAppGatewayProvider;
use agendabot::services::session::SessionStore;
use agendabot::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let profile = BotProfile::load(config.profile_path.as_deref())?;
    tracing::info!(
        business = %profile.business_name,
        slots = profile.catalog.len(),
        "profile loaded"
    );

    let conn = db::init_db(&config.database_url)?;

    let messaging = WhatsAppGatewayProvider::new(
        config.gateway_url.clone(),
        config.gateway_token.clone(),
    );

    let sessions = SessionStore::new(Duration::from_secs(config.session_ttl_minutes * 60));

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        profile,
        messaging: Box::new(messaging),
        sessions,
        dev_notifications: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/webhook/message", post(handlers::webhook::gateway_webhook))
        .route("/api/dev/message", post(handlers::dev::send_message))
        .route("/api/admin/bookings", get(handlers::admin::get_bookings))
        .route(
            "/api/admin/availability",
            get(handlers::admin::get_availability),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
