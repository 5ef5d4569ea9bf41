// ===============================
// src/error.rs
// ===============================
use thiserror::Error;

/// Errors surfaced by the spot client and the seed planner.
///
/// Venue rejections carry the response body verbatim; nothing is retried or
/// remapped locally, so callers see exactly what the exchange said.
#[derive(Debug, Error)]
pub enum SpotError {
    #[error("missing API credentials: key and secret must be non-empty")]
    MissingCredentials,
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("venue rejected request (HTTP {status}): {body}")]
    Venue { status: u16, body: String },
    #[error("unexpected response body: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid market data: {0}")]
    MarketData(String),
}
