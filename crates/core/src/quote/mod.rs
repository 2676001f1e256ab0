pub mod finnhub;

use serde::{Deserialize, Serialize};

/// Market snapshot returned by the quote proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    pub ticker: String,
    pub name: String,
    pub current_price: f64,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub week_52_high: Option<f64>,
    pub week_52_low: Option<f64>,
}

#[async_trait::async_trait]
pub trait QuoteProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_quote(&self, ticker: &str) -> anyhow::Result<StockQuote>;
}

/// Upper-cases and trims a user-typed ticker. Returns `None` for blank input.
pub fn normalize_ticker(raw: &str) -> Option<String> {
    let t = raw.trim().to_uppercase();
    (!t.is_empty()).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_ticker_trims_and_uppercases() {
        assert_eq!(normalize_ticker("  aapl "), Some("AAPL".to_string()));
        assert_eq!(normalize_ticker("   "), None);
        assert_eq!(normalize_ticker(""), None);
    }
}
