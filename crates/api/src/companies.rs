use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use greeninvesta_core::domain::rating::ScoreBand;
use greeninvesta_core::storage::{
    self,
    companies::Company,
    investments::{self, Investment},
};

use crate::error::{AppError, AppJson};
use crate::quotes::TickerRequest;
use crate::recommendations::{build_view, RecommendationView, DEFAULT_BUDGET};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies/search", post(search_company))
        .route("/companies/:id", get(get_company))
        .route("/companies/:id/recommendation", get(get_recommendation))
        .route("/companies/:id/investments", get(get_investments))
}

#[derive(Debug, Serialize)]
pub struct CompanyView {
    #[serde(flatten)]
    pub company: Company,
    /// Safety score as displayed, defaulting to 50.
    pub financial_safety_display: f64,
    pub financial_safety_band: ScoreBand,
}

impl From<Company> for CompanyView {
    fn from(company: Company) -> Self {
        let safety = company.financial_safety.unwrap_or(50.0);
        Self {
            financial_safety_display: safety,
            financial_safety_band: ScoreBand::from_score(safety.floor() as i32),
            company,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InvestmentView {
    #[serde(flatten)]
    pub investment: Investment,
    pub position_value: f64,
}

pub fn investment_views(rows: Vec<Investment>, current_price: f64) -> Vec<InvestmentView> {
    rows.into_iter()
        .map(|investment| InvestmentView {
            position_value: investment.value_at(current_price),
            investment,
        })
        .collect()
}

fn parse_company_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::bad_request("invalid company id"))
}

async fn load_company(pool: &PgPool, id: Uuid) -> Result<Company, AppError> {
    storage::companies::get_company(pool, id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found("company not found"))
}

async fn search_company(
    State(state): State<AppState>,
    AppJson(req): AppJson<TickerRequest>,
) -> Result<Json<CompanyView>, AppError> {
    let ticker = req.require_ticker()?;
    let pool = state.pool()?;

    let quote = state
        .quotes
        .fetch_quote(&ticker)
        .await
        .map_err(AppError::internal)?;

    let company = storage::companies::upsert_quote(pool, &quote)
        .await
        .map_err(AppError::internal)?;

    tracing::info!(%ticker, company_id = %company.id, "company quote stored");
    Ok(Json(company.into()))
}

async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CompanyView>, AppError> {
    let id = parse_company_id(&id)?;
    let pool = state.pool()?;
    Ok(Json(load_company(pool, id).await?.into()))
}

#[derive(Debug, Deserialize)]
struct BudgetQuery {
    budget: Option<f64>,
}

async fn get_recommendation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<BudgetQuery>,
) -> Result<Json<RecommendationView>, AppError> {
    let id = parse_company_id(&id)?;
    let pool = state.pool()?;
    let company = load_company(pool, id).await?;

    let budget = query.budget.unwrap_or(DEFAULT_BUDGET);
    let view = build_view(&company.to_profile(), budget);

    tracing::debug!(
        company_id = %id,
        ticker = %company.ticker,
        confidence = view.confidence,
        shares = view.recommended_shares,
        "recommendation computed"
    );
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
struct ActivityQuery {
    limit: Option<i64>,
}

async fn get_investments(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<InvestmentView>>, AppError> {
    let id = parse_company_id(&id)?;
    let pool = state.pool()?;
    let company = load_company(pool, id).await?;

    let limit = storage::clamp_limit(
        query.limit,
        investments::DEFAULT_ACTIVITY_LIMIT,
        investments::MAX_ACTIVITY_LIMIT,
    );
    let rows = investments::recent_for_company(pool, id, limit)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(investment_views(
        rows,
        company.current_price.unwrap_or(0.0),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn rejects_malformed_company_id() {
        let err = parse_company_id("not-a-uuid").unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
        assert!(parse_company_id(&Uuid::new_v4().to_string()).is_ok());
    }

    #[test]
    fn investment_views_price_each_position() {
        let company_id = Uuid::new_v4();
        let rows = vec![
            Investment {
                id: Uuid::new_v4(),
                company_id,
                investor_name: "A".to_string(),
                shares_bought: 10,
                investment_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
                notes: Some("added".to_string()),
            },
            Investment {
                id: Uuid::new_v4(),
                company_id,
                investor_name: "B".to_string(),
                shares_bought: 3,
                investment_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
                notes: None,
            },
        ];
        let views = investment_views(rows, 20.0);
        assert_eq!(views[0].position_value, 200.0);
        assert_eq!(views[1].position_value, 60.0);
    }

    #[test]
    fn company_view_defaults_safety() {
        let now = Utc::now();
        let company = Company {
            id: Uuid::new_v4(),
            ticker: "X".to_string(),
            name: "X Corp".to_string(),
            current_price: Some(1.0),
            market_cap: None,
            pe_ratio: None,
            dividend_yield: None,
            week_52_high: None,
            week_52_low: None,
            peg_ratio: None,
            free_cash_flow: None,
            financial_safety: None,
            revenue_growth: None,
            eps_growth: None,
            debt_to_equity: None,
            profit_margin: None,
            roe: None,
            created_at: now,
            updated_at: now,
        };
        let view = CompanyView::from(company);
        assert_eq!(view.financial_safety_display, 50.0);
        assert_eq!(view.financial_safety_band, ScoreBand::Medium);
    }
}
