use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use greeninvesta_core::domain::rating::{ScoreBand, Verdict};
use greeninvesta_core::domain::recommendation::{
    budget_allocation, recommend, BudgetAllocation, CompanyProfile,
};

use crate::error::{AppError, AppJson};
use crate::AppState;

/// Budget used when the caller does not send one.
pub const DEFAULT_BUDGET: f64 = 10_000.0;

pub fn routes() -> Router<AppState> {
    Router::new().route("/recommendations", post(create_recommendation))
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationView {
    pub confidence: i32,
    pub recommended_shares: u64,
    pub reasoning: Vec<String>,
    pub reason: String,
    pub verdict: Verdict,
    pub verdict_label: &'static str,
    pub band: ScoreBand,
    pub budget: f64,
    pub price_per_share: f64,
    pub allocation: BudgetAllocation,
}

pub fn build_view(profile: &CompanyProfile, budget: f64) -> RecommendationView {
    let result = recommend(profile, budget);
    let price = profile.current_price.unwrap_or(0.0);
    let verdict = Verdict::from_confidence(result.confidence);

    RecommendationView {
        reason: result.display_reason(),
        verdict,
        verdict_label: verdict.label(),
        band: ScoreBand::from_score(result.confidence),
        budget,
        price_per_share: price,
        allocation: budget_allocation(result.recommended_shares, price, budget),
        confidence: result.confidence,
        recommended_shares: result.recommended_shares,
        reasoning: result.reasoning,
    }
}

#[derive(Debug, Deserialize)]
struct RecommendationRequest {
    #[serde(default)]
    profile: CompanyProfile,
    budget: Option<f64>,
}

async fn create_recommendation(
    AppJson(req): AppJson<RecommendationRequest>,
) -> Result<Json<RecommendationView>, AppError> {
    let budget = req.budget.unwrap_or(DEFAULT_BUDGET);
    let view = build_view(&req.profile, budget);
    tracing::debug!(confidence = view.confidence, shares = view.recommended_shares, "recommendation computed");
    Ok(Json(view))
}
