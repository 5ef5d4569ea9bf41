// ===============================
// src/main.rs
// ===============================
mod binance; // signing helpers (canonical query + HMAC)
mod client; // signed Spot REST client
mod config;
mod error;
mod planner; // one-shot seed order planner
mod types;

use tracing::{error, info};

use crate::client::SpotClient;
use crate::planner::SeedOutcome;

#[tokio::main]
async fn main() {
    // ---- Logging ----
    tracing_subscriber::fmt().with_env_filter("info").init();

    // ---- Load config ----
    let (client_cfg, seed_cfg) = config::load();
    info!(
        rest = %client_cfg.rest_url,
        symbol = %seed_cfg.symbol,
        seed_usd = seed_cfg.seed_usd,
        tick_size = seed_cfg.tick_size,
        step_size = seed_cfg.step_size,
        "startup config"
    );

    // ---- Client (credentials checked before any request) ----
    let client = match SpotClient::new(client_cfg) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "client construction failed");
            std::process::exit(2);
        }
    };

    // ---- One seeding run, result mapped to the exit code ----
    match planner::run(&client, &seed_cfg).await {
        Ok(SeedOutcome::Placed { label, price, quantity, order_id }) => {
            info!(%label, price, quantity, order_id, "seeding done");
        }
        Ok(SeedOutcome::KeptExisting { label }) => {
            info!(%label, "seeding done, prior order kept");
        }
        Err(e) => {
            error!(%e, "seeding failed");
            std::process::exit(1);
        }
    }
}
