mod config;
mod domain;
mod middleware;
mod services;
mod state;
mod web;

use crate::config::AppConfig;
use crate::state::SharedState;
use axum::Router;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tower_http::{services::ServeDir, services::ServeFile, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
        e
    })?;

    let mailer = services::mailer::from_settings(config.mail.as_ref())?;
    if config.mail.is_none() {
        tracing::warn!("MAIL_RELAY_URL/MAIL_RELAY_TOKEN/MAIL_SENDER not set, email reminders disabled");
    }

    let bind_addr = config.bind_addr.clone();
    let static_dir = config.static_dir.clone();
    let shared: SharedState = Arc::new(state::AppState::new(config, mailer));

    let scheduler = JobScheduler::new().await?;

    // Session cleanup - drop expired contexts and idle throttle keys every hour
    let shared_for_cleanup = shared.clone();
    scheduler
        .add(Job::new_async("0 0 * * * *", move |_uuid, _l| {
            let state = shared_for_cleanup.clone();
            Box::pin(async move {
                let dropped = state.prune_expired().await;
                let active_keys = state.reminder_throttle.prune().await;
                if dropped > 0 {
                    tracing::info!("Cleaned up {} expired sessions", dropped);
                }
                tracing::debug!("{} sessions still throttled", active_keys);
            })
        })?)
        .await?;

    scheduler.start().await?;
    tracing::info!("Scheduler started: session cleanup hourly");

    let index = format!("{}/index.html", static_dir);
    let static_handler = ServeDir::new(&static_dir).not_found_service(ServeFile::new(index));

    let app = Router::new()
        .merge(web::routes(shared))
        .fallback_service(static_handler)
        .layer(TraceLayer::new_for_http());

    tracing::info!("Listening on {bind_addr}");
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
