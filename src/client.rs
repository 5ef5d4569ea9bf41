// ===============================
// src/client.rs
// ===============================
//
// Signed REST client for the Binance Spot API. Authenticated calls carry
// every parameter -- signature included -- in the URL query string; there is
// no request body even for POST/DELETE. Market-data calls are plain GETs.
//
#![allow(dead_code)] // full trading/account API surface; the seeder uses a subset

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::binance::{canonical_query, sign_query, timestamp_ms};
use crate::config::ClientCfg;
use crate::error::SpotError;
use crate::types::{
    AccountSnapshot, OrderAck, OrderIntent, OrderRef, OrderType, OpenOrder, PriceTick,
    Ticker24h, TradeQuery, TradeRecord,
};

/// Venue operations the seed planner drives. `SpotClient` is the live
/// implementation; planner tests substitute a scripted stand-in.
#[async_trait]
pub trait SpotApi {
    async fn open_orders(&self, symbol: Option<&str>) -> Result<Vec<OpenOrder>, SpotError>;
    async fn place_order(&self, intent: &OrderIntent) -> Result<OrderAck, SpotError>;
    async fn cancel_order(&self, symbol: &str, by: &OrderRef) -> Result<OrderAck, SpotError>;
    async fn ticker_24h(&self, symbol: &str) -> Result<Ticker24h, SpotError>;
}

pub struct SpotClient {
    http: reqwest::Client,
    cfg: ClientCfg,
}

impl SpotClient {
    /// Credentials are checked here: an empty key or secret is a fatal
    /// configuration error before any request is attempted.
    pub fn new(cfg: ClientCfg) -> Result<Self, SpotError> {
        if cfg.api_key.is_empty() || cfg.api_secret.is_empty() {
            return Err(SpotError::MissingCredentials);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()?;
        Ok(Self { http, cfg })
    }

    // ---- request plumbing ----

    async fn signed<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, Option<String>)],
    ) -> Result<T, SpotError> {
        let mut all = params.to_vec();
        // caller-supplied recvWindow wins over the configured default
        if !all.iter().any(|(k, _)| *k == "recvWindow") {
            all.push(("recvWindow", Some(self.cfg.recv_window.to_string())));
        }
        all.push(("timestamp", Some(timestamp_ms().to_string())));

        let query = canonical_query(&all);
        let signature = sign_query(&self.cfg.api_secret, &query);
        let url = format!("{}{}?{}&signature={}", self.cfg.rest_url, path, query, signature);

        debug!(%path, method = %method, "signed request");
        let resp = self
            .http
            .request(method, url)
            .header("X-MBX-APIKEY", &self.cfg.api_key)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn public<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, SpotError> {
        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let url = if query.is_empty() {
            format!("{}{}", self.cfg.rest_url, path)
        } else {
            format!("{}{}?{}", self.cfg.rest_url, path, query)
        };

        debug!(%path, "public request");
        let resp = self.http.get(url).send().await?;
        Self::decode(resp).await
    }

    /// Non-2xx responses become `Venue` errors carrying the body verbatim;
    /// nothing is remapped or suppressed locally.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, SpotError> {
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(SpotError::Venue { status: status.as_u16(), body });
        }
        Ok(serde_json::from_str(&body)?)
    }

    // ---- signed operations ----

    pub async fn account_info(&self) -> Result<AccountSnapshot, SpotError> {
        self.signed(Method::GET, "/api/v3/account", &[]).await
    }

    /// With `symbol` omitted the venue fans out to all instruments.
    pub async fn open_orders(&self, symbol: Option<&str>) -> Result<Vec<OpenOrder>, SpotError> {
        let params = [("symbol", symbol.map(str::to_string))];
        self.signed(Method::GET, "/api/v3/openOrders", &params).await
    }

    pub async fn place_order(&self, intent: &OrderIntent) -> Result<OrderAck, SpotError> {
        let params = order_params(intent);
        self.signed(Method::POST, "/api/v3/order", &params).await
    }

    pub async fn cancel_order(&self, symbol: &str, by: &OrderRef) -> Result<OrderAck, SpotError> {
        let params = cancel_params(symbol, by);
        self.signed(Method::DELETE, "/api/v3/order", &params).await
    }

    pub async fn my_trades(
        &self,
        symbol: &str,
        query: &TradeQuery,
    ) -> Result<Vec<TradeRecord>, SpotError> {
        let params = [
            ("symbol", Some(symbol.to_string())),
            ("limit", query.limit.map(|v| v.to_string())),
            ("startTime", query.start_time.map(|v| v.to_string())),
            ("endTime", query.end_time.map(|v| v.to_string())),
        ];
        self.signed(Method::GET, "/api/v3/myTrades", &params).await
    }

    // ---- public market data ----

    pub async fn price(&self, symbol: &str) -> Result<PriceTick, SpotError> {
        self.public("/api/v3/ticker/price", &[("symbol", symbol.to_string())])
            .await
    }

    pub async fn all_prices(&self) -> Result<Vec<PriceTick>, SpotError> {
        self.public("/api/v3/ticker/price", &[]).await
    }

    pub async fn ticker_24h(&self, symbol: &str) -> Result<Ticker24h, SpotError> {
        self.public("/api/v3/ticker/24hr", &[("symbol", symbol.to_string())])
            .await
    }
}

#[async_trait]
impl SpotApi for SpotClient {
    async fn open_orders(&self, symbol: Option<&str>) -> Result<Vec<OpenOrder>, SpotError> {
        SpotClient::open_orders(self, symbol).await
    }

    async fn place_order(&self, intent: &OrderIntent) -> Result<OrderAck, SpotError> {
        SpotClient::place_order(self, intent).await
    }

    async fn cancel_order(&self, symbol: &str, by: &OrderRef) -> Result<OrderAck, SpotError> {
        SpotClient::cancel_order(self, symbol, by).await
    }

    async fn ticker_24h(&self, symbol: &str) -> Result<Ticker24h, SpotError> {
        SpotClient::ticker_24h(self, symbol).await
    }
}

/// Exactly one identifying field reaches the wire: the venue-assigned id or
/// the client-assigned label.
fn cancel_params(symbol: &str, by: &OrderRef) -> [(&'static str, Option<String>); 3] {
    let (order_id, client_id) = match by {
        OrderRef::Id(id) => (Some(id.to_string()), None),
        OrderRef::ClientId(label) => (None, Some(label.clone())),
    };
    [
        ("symbol", Some(symbol.to_string())),
        ("orderId", order_id),
        ("origClientOrderId", client_id),
    ]
}

/// Wire parameters for an order intent. Only fields present on the intent
/// are forwarded; `type` falls back to MARKET.
fn order_params(intent: &OrderIntent) -> Vec<(&'static str, Option<String>)> {
    let order_type = intent.order_type.unwrap_or(OrderType::Market);
    vec![
        ("symbol", Some(intent.symbol.clone())),
        ("side", Some(intent.side.as_str().to_string())),
        ("type", Some(order_type.as_str().to_string())),
        ("quantity", intent.quantity.map(|q| q.to_string())),
        ("quoteOrderQty", intent.quote_order_qty.map(|q| q.to_string())),
        ("price", intent.price.map(|p| p.to_string())),
        ("timeInForce", intent.time_in_force.map(|t| t.as_str().to_string())),
        ("newClientOrderId", intent.new_client_order_id.clone()),
    ]
}
