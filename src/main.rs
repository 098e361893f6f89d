mod commands;
mod config;
mod health;
mod poller;

use std::net::{Ipv4Addr, SocketAddr};

use anyhow::{Context, Result};
use teloxide::Bot;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,flipbot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Required configuration is checked before the health port is bound, so
    // a half-initialized process never looks alive to the platform probe.
    let config = Config::from_env().context("Failed to load configuration")?;

    info!("Configuration loaded");
    info!("  Poll timeout: {}s", config.poll_timeout_sec);
    info!("  Error backoff: {}s", config.poll_sleep_sec);
    info!("  Health port: {}", config.port);
    if let Some(chat_id) = config.log_chat_id {
        info!("  Startup notification chat: {}", chat_id);
    }

    let bot = Bot::new(&config.bot_token);

    // The single poller task for this process; see poller::run.
    tokio::spawn(poller::run(bot, config.clone()));

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind health server to {addr}"))?;

    info!("Health server listening on {}", addr);
    axum::serve(listener, health::router())
        .await
        .context("Health server error")?;

    Ok(())
}
