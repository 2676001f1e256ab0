use crate::domain::analysis::{AnalysisInput, AnalysisResult};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_RECENT_LIMIT: i64 = 5;
pub const MAX_RECENT_LIMIT: i64 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredAnalysis {
    pub id: Uuid,
    pub company_name: String,
    pub ticker_symbol: Option<String>,
    pub revenue_growth: f64,
    pub eps_growth: f64,
    pub peg_ratio: f64,
    pub analysis_score: i32,
    pub created_at: DateTime<Utc>,
}

pub async fn insert_analysis(
    pool: &sqlx::PgPool,
    input: &AnalysisInput,
    result: &AnalysisResult,
) -> anyhow::Result<StoredAnalysis> {
    let row = sqlx::query_as::<_, StoredAnalysis>(
        "INSERT INTO stock_analyses (id, company_name, ticker_symbol, revenue_growth, eps_growth, peg_ratio, analysis_score) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING id, company_name, ticker_symbol, revenue_growth, eps_growth, peg_ratio, analysis_score, created_at",
    )
    .persistent(false)
    .bind(Uuid::new_v4())
    .bind(&input.company_name)
    .bind(&input.ticker_symbol)
    .bind(input.revenue_growth)
    .bind(input.eps_growth)
    .bind(input.peg_ratio)
    .bind(result.analysis_score)
    .fetch_one(pool)
    .await
    .context("insert stock_analyses failed")?;

    Ok(row)
}

pub async fn recent_analyses(pool: &sqlx::PgPool, limit: i64) -> anyhow::Result<Vec<StoredAnalysis>> {
    let rows = sqlx::query_as::<_, StoredAnalysis>(
        "SELECT id, company_name, ticker_symbol, revenue_growth, eps_growth, peg_ratio, analysis_score, created_at \
         FROM stock_analyses \
         ORDER BY created_at DESC \
         LIMIT $1",
    )
    .persistent(false)
    .bind(limit)
    .fetch_all(pool)
    .await
    .context("select recent stock_analyses failed")?;

    Ok(rows)
}
