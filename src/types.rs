// ===============================
// src/types.rs
// ===============================
//
// Order intents going out and typed venue payloads coming back. Response
// models are deliberately permissive: the venue's field set varies by
// endpoint and account type, so anything not guaranteed is Option/default.
//
#![allow(dead_code)] // venue payloads mapped in full; callers read what they need

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Market,
    Limit,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInForce {
    Gtc,
    Ioc,
    Fok,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Gtc => "GTC",
            TimeInForce::Ioc => "IOC",
            TimeInForce::Fok => "FOK",
        }
    }
}

/// What the caller wants executed. Absent optional fields are omitted from
/// the wire entirely, never sent as null or empty strings. Exactly one of
/// `quantity` / `quote_order_qty` should be set; `price` is required for
/// LIMIT orders.
#[derive(Debug, Clone)]
pub struct OrderIntent {
    pub symbol: String,
    pub side: Side,
    /// Defaults to MARKET at send time when unset.
    pub order_type: Option<OrderType>,
    pub quantity: Option<f64>,
    pub quote_order_qty: Option<f64>,
    pub price: Option<f64>,
    pub time_in_force: Option<TimeInForce>,
    pub new_client_order_id: Option<String>,
}

/// How to address an existing order: the venue-assigned id or the
/// client-assigned label. Exactly one, by construction. Ids are `i64` to
/// match the venue's order-id fields, so an ack can address a cancel.
#[derive(Debug, Clone)]
pub enum OrderRef {
    Id(i64),
    ClientId(String),
}

/// Time-range bounds for trade-history queries.
#[derive(Debug, Clone, Default)]
pub struct TradeQuery {
    pub limit: Option<u32>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

// ---- Venue response models ----

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub asset: String,
    pub free: String,
    pub locked: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    #[serde(default)]
    pub balances: Vec<Balance>,
    #[serde(default)]
    pub can_trade: Option<bool>,
    #[serde(default)]
    pub can_withdraw: Option<bool>,
    #[serde(default)]
    pub can_deposit: Option<bool>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub update_time: Option<i64>,
}

/// Acknowledgment for place/cancel. The venue decides which fields it
/// reports (MARKET acks lack a price, cancel acks lack transactTime).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    pub symbol: String,
    pub order_id: i64,
    #[serde(default)]
    pub client_order_id: Option<String>,
    #[serde(default)]
    pub orig_client_order_id: Option<String>,
    #[serde(default)]
    pub transact_time: Option<i64>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub orig_qty: Option<String>,
    #[serde(default)]
    pub executed_qty: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "type", default)]
    pub order_type: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOrder {
    pub symbol: String,
    pub order_id: i64,
    pub client_order_id: String,
    pub price: String,
    pub orig_qty: String,
    #[serde(default)]
    pub executed_qty: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "type", default)]
    pub order_type: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
    /// Placement time, epoch ms.
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub update_time: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    pub symbol: String,
    pub id: i64,
    pub order_id: i64,
    pub price: String,
    pub qty: String,
    #[serde(default)]
    pub quote_qty: Option<String>,
    #[serde(default)]
    pub commission: Option<String>,
    #[serde(default)]
    pub commission_asset: Option<String>,
    pub time: i64,
    pub is_buyer: bool,
    pub is_maker: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceTick {
    pub symbol: String,
    pub price: String,
}

/// 24h ticker statistics. Best bid/ask spelling is inconsistent across
/// venue endpoints, so those stay in `fields` and are extracted through the
/// priority-ordered alias lists in `planner`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24h {
    pub symbol: String,
    #[serde(default)]
    pub last_price: Option<String>,
    #[serde(default)]
    pub price_change_percent: Option<String>,
    #[serde(default)]
    pub high_price: Option<String>,
    #[serde(default)]
    pub low_price: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}
