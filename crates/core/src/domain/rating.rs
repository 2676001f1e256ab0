//! Display labels derived from scores. Nothing here feeds back into scoring.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn from_score(score: i32) -> Self {
        if score >= 70 {
            ScoreBand::High
        } else if score >= 50 {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisRating {
    Strong,
    Moderate,
    Weak,
}

impl AnalysisRating {
    pub fn from_score(score: i32) -> Self {
        match ScoreBand::from_score(score) {
            ScoreBand::High => AnalysisRating::Strong,
            ScoreBand::Medium => AnalysisRating::Moderate,
            ScoreBand::Low => AnalysisRating::Weak,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisRating::Strong => "Strong Investment",
            AnalysisRating::Moderate => "Moderate Investment",
            AnalysisRating::Weak => "Weak Investment",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AnalysisRating::Strong => {
                "This stock shows strong fundamentals with good growth and valuation metrics. Consider it for your portfolio."
            }
            AnalysisRating::Moderate => {
                "This stock has decent metrics but shows some concerns. Do more research before investing."
            }
            AnalysisRating::Weak => {
                "This stock shows weak fundamentals. Be cautious and consider other opportunities."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl Verdict {
    pub fn from_confidence(confidence: i32) -> Self {
        match confidence {
            c if c >= 70 => Verdict::StrongBuy,
            c if c >= 60 => Verdict::Buy,
            c if c >= 50 => Verdict::Hold,
            c if c >= 40 => Verdict::Sell,
            _ => Verdict::StrongSell,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::StrongBuy => "Strong Buy",
            Verdict::Buy => "Buy",
            Verdict::Hold => "Hold",
            Verdict::Sell => "Sell",
            Verdict::StrongSell => "Strong Sell",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricStatus {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl MetricStatus {
    /// Status of a growth percentage (revenue or EPS).
    pub fn for_growth(pct: f64) -> Self {
        if pct > 20.0 {
            MetricStatus::Excellent
        } else if pct > 10.0 {
            MetricStatus::Good
        } else if pct > 0.0 {
            MetricStatus::Fair
        } else {
            MetricStatus::Poor
        }
    }

    pub fn for_peg(peg: f64) -> Self {
        if peg < 1.0 {
            MetricStatus::Excellent
        } else if peg < 1.5 {
            MetricStatus::Good
        } else if peg < 2.0 {
            MetricStatus::Fair
        } else {
            MetricStatus::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricStatus::Excellent => "Excellent",
            MetricStatus::Good => "Good",
            MetricStatus::Fair => "Fair",
            MetricStatus::Poor => "Poor",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_thresholds() {
        assert_eq!(ScoreBand::from_score(100), ScoreBand::High);
        assert_eq!(ScoreBand::from_score(70), ScoreBand::High);
        assert_eq!(ScoreBand::from_score(69), ScoreBand::Medium);
        assert_eq!(ScoreBand::from_score(50), ScoreBand::Medium);
        assert_eq!(ScoreBand::from_score(49), ScoreBand::Low);
    }

    #[test]
    fn analysis_rating_labels() {
        assert_eq!(AnalysisRating::from_score(75).label(), "Strong Investment");
        assert_eq!(AnalysisRating::from_score(55).label(), "Moderate Investment");
        assert_eq!(AnalysisRating::from_score(30).label(), "Weak Investment");
    }

    #[test]
    fn verdict_thresholds() {
        assert_eq!(Verdict::from_confidence(70), Verdict::StrongBuy);
        assert_eq!(Verdict::from_confidence(69), Verdict::Buy);
        assert_eq!(Verdict::from_confidence(60), Verdict::Buy);
        assert_eq!(Verdict::from_confidence(59), Verdict::Hold);
        assert_eq!(Verdict::from_confidence(50), Verdict::Hold);
        assert_eq!(Verdict::from_confidence(40), Verdict::Sell);
        assert_eq!(Verdict::from_confidence(39), Verdict::StrongSell);
        assert_eq!(Verdict::from_confidence(0).label(), "Strong Sell");
    }

    #[test]
    fn metric_status_matches_scoring_tiers() {
        assert_eq!(MetricStatus::for_growth(20.0), MetricStatus::Good);
        assert_eq!(MetricStatus::for_growth(20.5), MetricStatus::Excellent);
        assert_eq!(MetricStatus::for_growth(0.0), MetricStatus::Poor);
        assert_eq!(MetricStatus::for_peg(1.0), MetricStatus::Good);
        assert_eq!(MetricStatus::for_peg(1.99), MetricStatus::Fair);
        assert_eq!(MetricStatus::for_peg(2.0), MetricStatus::Poor);
    }
}
