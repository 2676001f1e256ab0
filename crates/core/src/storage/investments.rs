use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_ACTIVITY_LIMIT: i64 = 10;
pub const MAX_ACTIVITY_LIMIT: i64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Investment {
    pub id: Uuid,
    pub company_id: Uuid,
    pub investor_name: String,
    pub shares_bought: i64,
    pub investment_date: NaiveDate,
    pub notes: Option<String>,
}

impl Investment {
    /// Value of the position at `current_price`.
    pub fn value_at(&self, current_price: f64) -> f64 {
        self.shares_bought as f64 * current_price
    }
}

pub async fn recent_for_company(
    pool: &sqlx::PgPool,
    company_id: Uuid,
    limit: i64,
) -> anyhow::Result<Vec<Investment>> {
    let rows = sqlx::query_as::<_, Investment>(
        "SELECT id, company_id, investor_name, shares_bought, investment_date, notes \
         FROM recent_investments \
         WHERE company_id = $1 \
         ORDER BY investment_date DESC \
         LIMIT $2",
    )
    .persistent(false)
    .bind(company_id)
    .bind(limit)
    .fetch_all(pool)
    .await
    .with_context(|| format!("select recent_investments failed (company_id={company_id})"))?;

    Ok(rows)
}
