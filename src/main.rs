// src/main.rs

// --- Module declarations ---
mod config;
mod db;
mod error;
mod models;
mod services;
mod state;
mod templates;
mod web;

// --- Imports ---
use crate::{config::AppConfig, state::AppState};
use axum::serve;
use std::env;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Logging (tracing) ---
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                env::var("RUST_LOG")
                    .unwrap_or_else(|_| "attendance_planner=debug,tower_http=info,sqlx=warn".into())
                    .into()
            }),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("🚀 Starting attendance planner...");

    let config = AppConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    // --- Database ---
    let db_pool = match db::create_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("❌ Could not initialise the database: {}", e);
            return Err(anyhow::anyhow!("Failed to connect/migrate DB: {}", e));
        }
    };
    if config.is_in_memory() {
        tracing::warn!("⚠️ Using an in-memory database: data is lost on shutdown.");
    }

    if config.seed_sample_data {
        db::seed_sample_data(&db_pool).await?;
    }

    // --- Application state ---
    let bind_addr = config.bind_addr;
    let app_state = AppState::new(db_pool.clone(), config);

    // --- Listener ---
    let listener = match TcpListener::bind(bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("❌ Failed to bind {}: {}", bind_addr, e);
            return Err(e.into());
        }
    };
    tracing::info!("📡 Listening on http://{}", bind_addr);

    // --- Router and middleware ---
    let app = web::routes::create_router(app_state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    // --- Serve until Ctrl-C / SIGTERM ---
    if let Err(e) = serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("❌ Fatal server error: {}", e);
        return Err(e.into());
    }

    tracing::info!("🛑 Server stopped, closing database pool...");
    db_pool.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received.");
}
