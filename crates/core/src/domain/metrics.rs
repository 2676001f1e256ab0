use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    RevenueGrowth,
    EpsGrowth,
    PegRatio,
}

impl MetricField {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricField::RevenueGrowth => "revenue_growth",
            MetricField::EpsGrowth => "eps_growth",
            MetricField::PegRatio => "peg_ratio",
        }
    }
}

/// Raised when a required metric does not parse to a finite number.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidMetricInput {
    pub field: MetricField,
    pub raw: String,
}

impl InvalidMetricInput {
    /// The single message shown to the user for any normalizer failure.
    pub const USER_MESSAGE: &'static str = "Please enter valid numbers for all metrics";
}

impl fmt::Display for InvalidMetricInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid metric input (field={}): {:?} is not a finite number",
            self.field.as_str(),
            self.raw
        )
    }
}

impl std::error::Error for InvalidMetricInput {}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMetrics {
    pub revenue_growth: f64,
    pub eps_growth: f64,
    pub peg_ratio: f64,
}

pub fn parse_metric(field: MetricField, raw: &str) -> Result<f64, InvalidMetricInput> {
    let invalid = || InvalidMetricInput {
        field,
        raw: raw.to_string(),
    };

    // `str::parse` accepts "inf" and "NaN"; both are rejected below.
    let value = raw.trim().parse::<f64>().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    Ok(value)
}

/// Parses the three analysis metrics, stopping at the first field that fails.
pub fn normalize_metrics(
    revenue_growth: &str,
    eps_growth: &str,
    peg_ratio: &str,
) -> Result<NormalizedMetrics, InvalidMetricInput> {
    Ok(NormalizedMetrics {
        revenue_growth: parse_metric(MetricField::RevenueGrowth, revenue_growth)?,
        eps_growth: parse_metric(MetricField::EpsGrowth, eps_growth)?,
        peg_ratio: parse_metric(MetricField::PegRatio, peg_ratio)?,
    })
}
