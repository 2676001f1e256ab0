use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

use greeninvesta_core::quote::{normalize_ticker, StockQuote};

use crate::error::{AppError, AppJson};
use crate::AppState;

pub const TICKER_REQUIRED: &str = "Ticker symbol required";

pub fn routes() -> Router<AppState> {
    Router::new().route("/stock-data", post(fetch_stock_data))
}

#[derive(Debug, Default, Deserialize)]
pub struct TickerRequest {
    #[serde(default)]
    pub ticker: Option<String>,
}

impl TickerRequest {
    pub fn require_ticker(&self) -> Result<String, AppError> {
        self.ticker
            .as_deref()
            .and_then(normalize_ticker)
            .ok_or_else(|| AppError::bad_request(TICKER_REQUIRED))
    }
}

async fn fetch_stock_data(
    State(state): State<AppState>,
    AppJson(req): AppJson<TickerRequest>,
) -> Result<Json<StockQuote>, AppError> {
    let ticker = req.require_ticker()?;
    let quote = state
        .quotes
        .fetch_quote(&ticker)
        .await
        .map_err(AppError::internal)?;

    tracing::info!(
        %ticker,
        provider = state.quotes.provider_name(),
        price = quote.current_price,
        "quote fetched"
    );
    Ok(Json(quote))
}
