use crate::domain::recommendation::CompanyProfile;
use crate::quote::StockQuote;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const COMPANY_COLUMNS: &str = "id, ticker, name, current_price, market_cap, pe_ratio, dividend_yield, \
     week_52_high, week_52_low, peg_ratio, free_cash_flow, financial_safety, revenue_growth, \
     eps_growth, debt_to_equity, profit_margin, roe, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub id: Uuid,
    pub ticker: String,
    pub name: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub week_52_high: Option<f64>,
    pub week_52_low: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub free_cash_flow: Option<f64>,
    pub financial_safety: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub eps_growth: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub profit_margin: Option<f64>,
    pub roe: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    pub fn to_profile(&self) -> CompanyProfile {
        CompanyProfile {
            current_price: self.current_price,
            financial_safety: self.financial_safety,
            free_cash_flow: self.free_cash_flow,
            peg_ratio: self.peg_ratio,
            revenue_growth: self.revenue_growth,
            eps_growth: self.eps_growth,
            roe: self.roe,
        }
    }
}

/// Inserts the company on first sight of the ticker, otherwise refreshes only
/// the quote columns. Fundamentals are left untouched.
pub async fn upsert_quote(pool: &sqlx::PgPool, quote: &StockQuote) -> anyhow::Result<Company> {
    let sql = format!(
        "INSERT INTO companies (id, ticker, name, current_price, market_cap, pe_ratio, dividend_yield, week_52_high, week_52_low) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (ticker) DO UPDATE \
           SET name = EXCLUDED.name, current_price = EXCLUDED.current_price, market_cap = EXCLUDED.market_cap, \
               pe_ratio = EXCLUDED.pe_ratio, dividend_yield = EXCLUDED.dividend_yield, \
               week_52_high = EXCLUDED.week_52_high, week_52_low = EXCLUDED.week_52_low, updated_at = now() \
         RETURNING {COMPANY_COLUMNS}"
    );

    let company = sqlx::query_as::<_, Company>(&sql)
        .persistent(false)
        .bind(Uuid::new_v4())
        .bind(quote.ticker.trim().to_uppercase())
        .bind(quote.name.trim())
        .bind(quote.current_price)
        .bind(quote.market_cap)
        .bind(quote.pe_ratio)
        .bind(quote.dividend_yield)
        .bind(quote.week_52_high)
        .bind(quote.week_52_low)
        .fetch_one(pool)
        .await
        .with_context(|| format!("upsert companies failed (ticker={})", quote.ticker))?;

    Ok(company)
}

pub async fn get_company(pool: &sqlx::PgPool, id: Uuid) -> anyhow::Result<Option<Company>> {
    let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1");
    let company = sqlx::query_as::<_, Company>(&sql)
        .persistent(false)
        .bind(id)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("select company failed (id={id})"))?;
    Ok(company)
}

/// Tickers ordered by staleness, oldest refresh first.
pub async fn tickers_for_refresh(
    pool: &sqlx::PgPool,
    limit: Option<i64>,
) -> anyhow::Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT ticker FROM companies \
         ORDER BY updated_at ASC, ticker ASC \
         LIMIT $1",
    )
    .persistent(false)
    .bind(limit)
    .fetch_all(pool)
    .await
    .context("select companies for refresh failed")?;

    Ok(rows.into_iter().map(|(t,)| t).collect())
}
