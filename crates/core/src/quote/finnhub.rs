use crate::config::Settings;
use crate::quote::{QuoteProvider, StockQuote};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";
const DEFAULT_API_KEY: &str = "sandbox";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_RETRIES: u32 = 1;
const MAX_BACKOFF_SECS: u64 = 30;

/// Subset of `GET /quote`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FinnhubQuote {
    /// Current price.
    #[serde(default)]
    pub c: Option<f64>,
    /// Day high.
    #[serde(default)]
    pub h: Option<f64>,
    /// Day low.
    #[serde(default)]
    pub l: Option<f64>,
    /// Previous close.
    #[serde(default)]
    pub pc: Option<f64>,
}

/// Subset of `GET /stock/profile2`. Unknown symbols come back as `{}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinnhubProfile {
    #[serde(default)]
    pub name: Option<String>,
    /// In millions of the listing currency.
    #[serde(default)]
    pub market_capitalization: Option<f64>,
    #[serde(default)]
    pub finnhub_industry: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FinnhubClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    retries: u32,
}

impl FinnhubClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings
            .finnhub_api_key
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_KEY.to_string());
        let base_url = settings
            .finnhub_base_url
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("FINNHUB_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let retries = std::env::var("FINNHUB_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_RETRIES)
            .max(1);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build finnhub http client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
            retries,
        })
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries.max(1);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, ticker: &str) -> Result<T> {
        let res = self
            .http
            .get(self.url(path))
            .query(&[("symbol", ticker), ("token", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("finnhub request failed (path={path})"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read finnhub response")?;

        if !status.is_success() {
            anyhow::bail!("finnhub HTTP {status} (path={path}): {text}");
        }

        serde_json::from_str::<T>(&text)
            .with_context(|| format!("finnhub response is not valid JSON (path={path}): {text}"))
    }

    async fn fetch_once(&self, ticker: &str) -> Result<StockQuote> {
        let (quote, profile) = tokio::try_join!(
            self.get_json::<FinnhubQuote>("/quote", ticker),
            self.get_json::<FinnhubProfile>("/stock/profile2", ticker),
        )?;
        Ok(map_quote(ticker, &quote, &profile))
    }
}

#[async_trait::async_trait]
impl QuoteProvider for FinnhubClient {
    fn provider_name(&self) -> &'static str {
        "finnhub"
    }

    async fn fetch_quote(&self, ticker: &str) -> Result<StockQuote> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_once(ticker).await {
                Ok(quote) => return Ok(quote),
                Err(err) => {
                    if attempt >= self.retries {
                        return Err(err);
                    }
                    let backoff = retry_backoff(attempt);
                    tracing::warn!(%ticker, attempt, ?backoff, error = %err, "finnhub fetch failed; retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

/// Exponential delay after the given failed attempt (1-based), capped at 30s.
fn retry_backoff(attempt: u32) -> Duration {
    let exp = attempt.saturating_sub(1).min(16);
    Duration::from_secs((1u64 << exp).min(MAX_BACKOFF_SECS))
}

fn non_zero(v: Option<f64>) -> Option<f64> {
    v.filter(|x| *x != 0.0 && x.is_finite())
}

/// Maps the two Finnhub payloads onto a `StockQuote`. Zero is how Finnhub
/// reports "no data", so zeros become `None` except for the current price.
pub fn map_quote(ticker: &str, quote: &FinnhubQuote, profile: &FinnhubProfile) -> StockQuote {
    let current_price = non_zero(quote.c).unwrap_or(0.0);

    let name = profile
        .name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(ticker)
        .to_string();

    let market_cap = non_zero(profile.market_capitalization).map(|m| m * 1_000_000.0);

    // Ratio of current price to previous close.
    let pe_ratio = non_zero(quote.pc).map(|pc| current_price / pc);

    let dividend_yield = profile
        .finnhub_industry
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|_| 0.0);

    StockQuote {
        ticker: ticker.to_string(),
        name,
        current_price,
        market_cap,
        pe_ratio,
        dividend_yield,
        week_52_high: non_zero(quote.h),
        week_52_low: non_zero(quote.l),
    }
}
