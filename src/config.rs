// ===============================
// src/config.rs
// ===============================
use dotenvy::dotenv;
use std::env;

/// Credentials and HTTP settings for the signed client. Resolved once at
/// startup; nothing re-reads the environment during requests.
#[derive(Clone, Debug)]
pub struct ClientCfg {
    pub api_key: String,
    pub api_secret: String,
    pub rest_url: String,
    pub timeout_ms: u64,
    pub recv_window: u64,
}

/// Parameters for one seeding run.
#[derive(Clone, Debug)]
pub struct SeedCfg {
    pub symbol: String,
    /// Fixed notional per seed order, in quote currency.
    pub seed_usd: f64,
    pub tick_size: f64,
    pub step_size: f64,
    /// Ticks above the ask for the marketable limit price.
    pub tick_margin: f64,
    /// Age (ms) past which a prior seed order is stale and gets replaced.
    pub ttl_ms: i64,
    /// Pause after a cancel attempt before reading prices again.
    pub settle_ms: u64,
    /// Client-order label prefix; labels are prefix + epoch ms.
    pub label_prefix: String,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

pub fn load() -> (ClientCfg, SeedCfg) {
    let _ = dotenv();

    let client = ClientCfg {
        api_key: env::var("BINANCE_API_KEY").unwrap_or_default(),
        api_secret: env::var("BINANCE_API_SECRET").unwrap_or_default(),
        rest_url: env::var("BINANCE_REST_URL")
            .unwrap_or_else(|_| "https://api.binance.com".to_string()),
        timeout_ms: env_parse("HTTP_TIMEOUT_MS", 10_000),
        recv_window: env_parse("BINANCE_RECV_WINDOW", 5_000),
    };

    let seed = SeedCfg {
        symbol: env::var("SEED_SYMBOL")
            .unwrap_or_else(|_| "BTCUSDT".to_string())
            .to_ascii_uppercase(),
        seed_usd: env_parse("SEED_USD", 20.0),
        tick_size: env_parse("SEED_TICK_SIZE", 0.01),
        step_size: env_parse("SEED_STEP_SIZE", 0.0001),
        tick_margin: env_parse("SEED_TICK_MARGIN", 1.0),
        ttl_ms: env_parse("SEED_TTL_MS", 60_000),
        settle_ms: env_parse("SEED_SETTLE_MS", 500),
        label_prefix: env::var("SEED_PREFIX").unwrap_or_else(|_| "seed-".to_string()),
    };

    (client, seed)
}
