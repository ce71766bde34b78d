//! Roampedia · Country Trivia Backend
//!
//! - Axum HTTP + WebSocket API for the flag / capital / population quiz
//! - Reference countries fetched once at startup (REST Countries or a local snapshot)
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT               : u16 (default 3000)
//!   TRIVIA_CONFIG_PATH : path to TOML config (data source, feedback delay, high score file)
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

mod telemetry;
mod util;
mod error;
mod domain;
mod config;
mod countries;
mod pool;
mod sampler;
mod question;
mod session;
mod highscore;
mod state;
mod protocol;
mod logic;
mod routes;
#[cfg(test)]
mod seeds;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::load_config_from_env;
use crate::countries::load_reference_countries;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let config = load_config_from_env();

  // Fetch failures leave the list empty; games then report insufficient data.
  let countries = load_reference_countries(&config).await;

  let state = Arc::new(AppState::new(config, countries));
  let app = build_router(state);

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "roampedia_trivia", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "roampedia_trivia", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "roampedia_trivia", "Shutdown signal received");
}
