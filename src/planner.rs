// ===============================
// src/planner.rs
// ===============================
//
// One-shot seed order planner. Each run replaces any stale prior seed
// order, derives a marketable limit price one tick margin above the ask,
// floors the quantity to the lot step for a fixed notional, and submits a
// LIMIT IOC BUY tagged with a fresh client label. At-most-one attempt for
// every call: duplicate-fill safety comes from the label, not from locking.
//
use chrono::Utc;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};

use crate::binance::timestamp_ms;
use crate::client::SpotApi;
use crate::config::SeedCfg;
use crate::error::SpotError;
use crate::types::{OpenOrder, OrderIntent, OrderRef, OrderType, Side, Ticker24h, TimeInForce};

/// Accepted spellings for best bid/ask across venue endpoints, tried
/// strictly left to right.
const BID_ALIASES: [&str; 4] = ["bidPrice", "bid", "b", "bestBid"];
const ASK_ALIASES: [&str; 4] = ["askPrice", "ask", "a", "bestAsk"];

#[derive(Debug)]
pub enum SeedOutcome {
    Placed { label: String, price: f64, quantity: f64, order_id: i64 },
    /// A prior seed order younger than the TTL is still working; nothing
    /// needed placing.
    KeptExisting { label: String },
}

pub async fn run<C: SpotApi>(client: &C, cfg: &SeedCfg) -> Result<SeedOutcome, SpotError> {
    // 1) locate and replace any prior seed order
    let open = client.open_orders(Some(&cfg.symbol)).await?;
    if let Some(prior) = latest_seed_order(&open, &cfg.label_prefix) {
        let age_ms = Utc::now().timestamp_millis() - prior.time;
        if age_ms < cfg.ttl_ms {
            info!(label = %prior.client_order_id, age_ms, "prior seed order still fresh");
            return Ok(SeedOutcome::KeptExisting { label: prior.client_order_id.clone() });
        }
        // stale: cancel by label; failure is non-fatal, planning continues
        match client
            .cancel_order(&cfg.symbol, &OrderRef::ClientId(prior.client_order_id.clone()))
            .await
        {
            Ok(_) => info!(label = %prior.client_order_id, age_ms, "canceled stale seed order"),
            Err(e) => warn!(label = %prior.client_order_id, %e, "cancel failed, continuing"),
        }
        // let the cancellation settle before reading prices
        sleep(Duration::from_millis(cfg.settle_ms)).await;
    }

    // 2) best bid/ask; invalid prices are fatal before any mutating call
    let tick = client.ticker_24h(&cfg.symbol).await?;
    let bid = field_price(&tick, &BID_ALIASES);
    let ask = field_price(&tick, &ASK_ALIASES);
    let (price, quantity) = plan_seed(bid, ask, cfg)?;
    info!(symbol = %cfg.symbol, ?bid, ?ask, price, quantity, "seed plan");

    // 3) submit LIMIT IOC BUY under a fresh label
    let label = format!("{}{}", cfg.label_prefix, timestamp_ms());
    let intent = OrderIntent {
        symbol: cfg.symbol.clone(),
        side: Side::Buy,
        order_type: Some(OrderType::Limit),
        quantity: Some(quantity),
        quote_order_qty: None,
        price: Some(price),
        time_in_force: Some(TimeInForce::Ioc),
        new_client_order_id: Some(label.clone()),
    };
    let ack = client.place_order(&intent).await?;
    info!(
        order_id = ack.order_id,
        label = %label,
        status = ?ack.status,
        "seed order placed"
    );
    Ok(SeedOutcome::Placed { label, price, quantity, order_id: ack.order_id })
}

/// Most recent open order carrying the seed label prefix, if any.
fn latest_seed_order<'a>(orders: &'a [OpenOrder], prefix: &str) -> Option<&'a OpenOrder> {
    orders
        .iter()
        .filter(|o| o.client_order_id.starts_with(prefix))
        .max_by_key(|o| o.time)
}

/// Validate bid/ask and derive the limit price and lot-floored quantity.
/// Pure so the pricing rules are testable without any venue traffic.
fn plan_seed(bid: Option<f64>, ask: Option<f64>, cfg: &SeedCfg) -> Result<(f64, f64), SpotError> {
    let _bid = require_price(bid, "bid")?;
    let ask = require_price(ask, "ask")?;

    let price = round_to(ask + cfg.tick_margin * cfg.tick_size, cfg.tick_size);
    let mut quantity = floor_to(cfg.seed_usd / price, cfg.step_size);
    if quantity < cfg.step_size {
        quantity = cfg.step_size;
    }
    Ok((price, quantity))
}

fn require_price(value: Option<f64>, name: &str) -> Result<f64, SpotError> {
    value
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or_else(|| SpotError::MarketData(format!("{name} missing or not a positive number")))
}

/// First matching alias wins; both string-encoded and numeric values are
/// accepted. A present-but-unparseable value resolves to None and fails the
/// validity check rather than falling through to a later alias.
fn field_price(tick: &Ticker24h, aliases: &[&str]) -> Option<f64> {
    for key in aliases {
        match tick.fields.get(*key) {
            Some(serde_json::Value::String(s)) => return s.parse().ok(),
            Some(v) if v.is_number() => return v.as_f64(),
            _ => {}
        }
    }
    None
}

// ---- rounding ----

/// `round(v / step) * step`, truncated to the step's printed decimals.
pub fn round_to(value: f64, step: f64) -> f64 {
    truncate((value / step).round() * step, step_decimals(step))
}

/// Round-down variant used for quantities so the notional is never
/// exceeded. The quotient is snapped to the nearest integer when it sits
/// within float noise of one, so exact step multiples survive flooring.
pub fn floor_to(value: f64, step: f64) -> f64 {
    let q = value / step;
    let q = if (q - q.round()).abs() < 1e-9 { q.round() } else { q.floor() };
    truncate(q * step, step_decimals(step))
}

fn step_decimals(step: f64) -> u32 {
    let s = format!("{step}");
    s.split('.').nth(1).map_or(0, |frac| frac.len() as u32)
}

fn truncate(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).trunc() / scale
}
