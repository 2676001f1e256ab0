use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use greeninvesta_core::domain::analysis::{AnalysisInput, RawAnalysisInput};
use greeninvesta_core::domain::metrics::InvalidMetricInput;
use greeninvesta_core::domain::rating::{AnalysisRating, MetricStatus, ScoreBand};
use greeninvesta_core::storage::{self, analyses::StoredAnalysis};

use crate::error::{AppError, AppJson};
use crate::AppState;

pub const COMPANY_NAME_REQUIRED: &str = "Company name is required";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analyses", post(create_analysis))
        .route("/analyses/recent", get(recent_analyses))
}

#[derive(Debug, Serialize)]
pub struct AnalysisView {
    #[serde(flatten)]
    pub analysis: StoredAnalysis,
    pub rating: AnalysisRating,
    pub rating_label: &'static str,
    pub rating_description: &'static str,
    pub band: ScoreBand,
    pub revenue_growth_status: MetricStatus,
    pub eps_growth_status: MetricStatus,
    pub peg_ratio_status: MetricStatus,
}

impl From<StoredAnalysis> for AnalysisView {
    fn from(analysis: StoredAnalysis) -> Self {
        let rating = AnalysisRating::from_score(analysis.analysis_score);
        Self {
            rating,
            rating_label: rating.label(),
            rating_description: rating.description(),
            band: ScoreBand::from_score(analysis.analysis_score),
            revenue_growth_status: MetricStatus::for_growth(analysis.revenue_growth),
            eps_growth_status: MetricStatus::for_growth(analysis.eps_growth),
            peg_ratio_status: MetricStatus::for_peg(analysis.peg_ratio),
            analysis,
        }
    }
}

/// Validates a submitted form. Runs before any scoring or persistence.
pub fn validate_submission(raw: RawAnalysisInput) -> Result<AnalysisInput, AppError> {
    raw.validate_and_into_input().map_err(|err| {
        if err.downcast_ref::<InvalidMetricInput>().is_some() {
            tracing::debug!(error = %err, "analysis rejected");
            AppError::bad_request(InvalidMetricInput::USER_MESSAGE)
        } else {
            AppError::bad_request(COMPANY_NAME_REQUIRED)
        }
    })
}

async fn create_analysis(
    State(state): State<AppState>,
    AppJson(raw): AppJson<RawAnalysisInput>,
) -> Result<Json<AnalysisView>, AppError> {
    let input = validate_submission(raw)?;
    let result = input.evaluate();

    let pool = state.pool()?;
    let stored = storage::analyses::insert_analysis(pool, &input, &result)
        .await
        .map_err(AppError::internal)?;

    tracing::info!(
        analysis_id = %stored.id,
        company = %stored.company_name,
        score = stored.analysis_score,
        "analysis stored"
    );

    Ok(Json(stored.into()))
}

#[derive(Debug, Deserialize)]
struct RecentQuery {
    limit: Option<i64>,
}

async fn recent_analyses(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<Vec<AnalysisView>>, AppError> {
    let pool = state.pool()?;
    let limit = storage::clamp_limit(
        query.limit,
        storage::analyses::DEFAULT_RECENT_LIMIT,
        storage::analyses::MAX_RECENT_LIMIT,
    );

    let rows = storage::analyses::recent_analyses(pool, limit)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(rows.into_iter().map(AnalysisView::from).collect()))
}
