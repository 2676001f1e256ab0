use std::collections::BTreeSet;
use std::time::Duration;

use greeninvesta_core::quote::{normalize_ticker, QuoteProvider};
use greeninvesta_core::storage;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub processed: usize,
    pub stored: usize,
    pub failures: usize,
}

/// Normalizes CLI tickers, dropping blanks and duplicates while keeping first-seen order.
pub fn normalize_tickers(raw: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    raw.iter()
        .filter_map(|t| normalize_ticker(t))
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Fetches each ticker in turn and upserts it when `pool` is set. A failed
/// ticker is logged and skipped.
pub async fn refresh_quotes(
    provider: &dyn QuoteProvider,
    pool: Option<&sqlx::PgPool>,
    tickers: &[String],
    delay: Duration,
) -> RefreshSummary {
    let mut summary = RefreshSummary::default();
    let total = tickers.len();

    for (idx, ticker) in tickers.iter().enumerate() {
        if idx != 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        summary.processed += 1;

        let quote = match provider.fetch_quote(ticker).await {
            Ok(q) => q,
            Err(err) => {
                summary.failures += 1;
                tracing::warn!(%ticker, error = %err, "quote fetch failed; skipping");
                continue;
            }
        };

        if let Some(pool) = pool {
            match storage::companies::upsert_quote(pool, &quote).await {
                Ok(company) => {
                    summary.stored += 1;
                    tracing::debug!(%ticker, company_id = %company.id, price = quote.current_price, "quote stored");
                }
                Err(err) => {
                    summary.failures += 1;
                    sentry_anyhow::capture_anyhow(&err);
                    tracing::warn!(%ticker, error = %err, "quote upsert failed; skipping");
                }
            }
        } else {
            tracing::info!(%ticker, price = quote.current_price, dry_run = true, "quote fetched");
        }

        tracing::info!(
            processed = summary.processed,
            total,
            stored = summary.stored,
            failures = summary.failures,
            "quote refresh progress"
        );
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use greeninvesta_core::quote::StockQuote;

    struct FakeProvider;

    #[async_trait::async_trait]
    impl QuoteProvider for FakeProvider {
        fn provider_name(&self) -> &'static str {
            "fake"
        }

        async fn fetch_quote(&self, ticker: &str) -> anyhow::Result<StockQuote> {
            anyhow::ensure!(ticker != "FAIL", "upstream error for {ticker}");
            Ok(StockQuote {
                ticker: ticker.to_string(),
                name: ticker.to_string(),
                current_price: 10.0,
                market_cap: None,
                pe_ratio: None,
                dividend_yield: None,
                week_52_high: None,
                week_52_low: None,
            })
        }
    }

    #[test]
    fn normalize_tickers_dedups_in_order() {
        let raw = vec![
            " msft".to_string(),
            "AAPL".to_string(),
            "".to_string(),
            "aapl".to_string(),
        ];
        assert_eq!(normalize_tickers(&raw), vec!["MSFT", "AAPL"]);
    }

    #[tokio::test]
    async fn dry_run_counts_failures_and_continues() {
        let tickers = vec!["AAPL".to_string(), "FAIL".to_string(), "MSFT".to_string()];
        let summary = refresh_quotes(&FakeProvider, None, &tickers, Duration::ZERO).await;
        assert_eq!(
            summary,
            RefreshSummary {
                processed: 3,
                stored: 0,
                failures: 1,
            }
        );
    }
}
