use crate::domain::metrics::normalize_metrics;
use anyhow::ensure;
use serde::{Deserialize, Serialize};

const BASE_SCORE: i32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub company_name: String,
    pub ticker_symbol: Option<String>,
    pub revenue_growth: f64,
    pub eps_growth: f64,
    pub peg_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub analysis_score: i32,
}

impl AnalysisInput {
    pub fn evaluate(&self) -> AnalysisResult {
        AnalysisResult {
            analysis_score: score(self.revenue_growth, self.eps_growth, self.peg_ratio),
        }
    }
}

/// Fundamentals score in `0..=100` from base 50 plus one tier per metric.
pub fn score(revenue_growth: f64, eps_growth: f64, peg_ratio: f64) -> i32 {
    let sum = BASE_SCORE
        + growth_tier(revenue_growth)
        + growth_tier(eps_growth)
        + peg_tier(peg_ratio);
    sum.clamp(0, 100)
}

fn growth_tier(pct: f64) -> i32 {
    if pct > 20.0 {
        15
    } else if pct > 10.0 {
        10
    } else if pct > 0.0 {
        5
    } else {
        -5
    }
}

fn peg_tier(peg: f64) -> i32 {
    if peg < 1.0 {
        20
    } else if peg < 1.5 {
        10
    } else if peg < 2.0 {
        5
    } else {
        -10
    }
}

/// A metric as submitted by a form: either the raw text or an already-numeric JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawMetric {
    Number(f64),
    Text(String),
}

impl RawMetric {
    fn to_text(&self) -> String {
        match self {
            RawMetric::Number(n) => n.to_string(),
            RawMetric::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAnalysisInput {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub ticker_symbol: Option<String>,
    #[serde(default)]
    pub revenue_growth: Option<RawMetric>,
    #[serde(default)]
    pub eps_growth: Option<RawMetric>,
    #[serde(default)]
    pub peg_ratio: Option<RawMetric>,
}

impl RawAnalysisInput {
    /// Checks the company name and normalizes the metrics. A metric failure
    /// surfaces as an `InvalidMetricInput` inside the returned error.
    pub fn validate_and_into_input(self) -> anyhow::Result<AnalysisInput> {
        let company_name = self
            .company_name
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        ensure!(!company_name.is_empty(), "company_name must be non-empty");

        let ticker_symbol = self
            .ticker_symbol
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty());

        let text = |m: Option<RawMetric>| m.map(|m| m.to_text()).unwrap_or_default();
        let metrics = normalize_metrics(
            &text(self.revenue_growth),
            &text(self.eps_growth),
            &text(self.peg_ratio),
        )?;

        Ok(AnalysisInput {
            company_name,
            ticker_symbol,
            revenue_growth: metrics.revenue_growth,
            eps_growth: metrics.eps_growth,
            peg_ratio: metrics.peg_ratio,
        })
    }
}
