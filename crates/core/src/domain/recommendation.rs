use serde::{Deserialize, Serialize};

const BASE_CONFIDENCE: i32 = 50;
const DEFAULT_FINANCIAL_SAFETY: f64 = 50.0;

pub const INVALID_DATA_REASON: &str = "Invalid data";
pub const REASON_SEPARATOR: &str = " • ";

/// Fundamentals the engine reads. Every field is optional; an absent field
/// disables its rule, except `financial_safety` which defaults to 50.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub financial_safety: Option<f64>,
    #[serde(default)]
    pub free_cash_flow: Option<f64>,
    #[serde(default)]
    pub peg_ratio: Option<f64>,
    #[serde(default)]
    pub revenue_growth: Option<f64>,
    #[serde(default)]
    pub eps_growth: Option<f64>,
    #[serde(default)]
    pub roe: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub confidence: i32,
    pub recommended_shares: u64,
    pub reasoning: Vec<String>,
}

impl RecommendationResult {
    fn invalid() -> Self {
        Self {
            confidence: 0,
            recommended_shares: 0,
            reasoning: vec![INVALID_DATA_REASON.to_string()],
        }
    }

    pub fn is_invalid(&self) -> bool {
        self.reasoning.len() == 1 && self.reasoning[0] == INVALID_DATA_REASON
    }

    /// Reasons joined for a single-line display.
    pub fn display_reason(&self) -> String {
        self.reasoning.join(REASON_SEPARATOR)
    }
}

#[derive(Debug)]
struct Tally {
    confidence: i32,
    reasoning: Vec<String>,
}

impl Tally {
    fn apply(&mut self, delta: i32, reason: &str) {
        self.confidence += delta;
        self.reasoning.push(reason.to_string());
    }
}

pub fn recommend(profile: &CompanyProfile, budget: f64) -> RecommendationResult {
    let price = match profile.current_price {
        Some(p) if p.is_finite() && p > 0.0 => p,
        _ => return RecommendationResult::invalid(),
    };
    if !budget.is_finite() || budget <= 0.0 {
        return RecommendationResult::invalid();
    }
    let Some(recommended_shares) = shares_for_budget(budget, price) else {
        return RecommendationResult::invalid();
    };

    let mut tally = Tally {
        confidence: BASE_CONFIDENCE,
        reasoning: Vec::with_capacity(6),
    };

    let safety = profile
        .financial_safety
        .unwrap_or(DEFAULT_FINANCIAL_SAFETY);
    if safety >= 70.0 {
        tally.apply(15, "Strong financial safety");
    } else if safety >= 50.0 {
        tally.apply(5, "Moderate financial safety");
    } else {
        tally.apply(-15, "Weak financial position");
    }

    if let Some(fcf) = profile.free_cash_flow {
        if fcf > 0.0 {
            tally.apply(15, "Positive free cash flow");
        } else if fcf < 0.0 {
            tally.apply(-15, "Negative free cash flow");
        }
    }

    if let Some(peg) = profile.peg_ratio.filter(|p| *p != 0.0) {
        if peg < 1.0 {
            tally.apply(10, "Undervalued (PEG < 1)");
        } else if peg > 2.0 {
            tally.apply(-10, "Potentially overvalued");
        }
    }

    if let Some(growth) = profile.revenue_growth {
        if growth > 15.0 {
            tally.apply(10, "Strong revenue growth");
        } else if growth < 0.0 {
            tally.apply(-10, "Declining revenue");
        }
    }

    // No penalty branch for shrinking earnings.
    if let Some(growth) = profile.eps_growth {
        if growth > 15.0 {
            tally.apply(10, "Strong earnings growth");
        }
    }

    if let Some(roe) = profile.roe {
        if roe > 15.0 {
            tally.apply(5, "High return on equity");
        }
    }

    RecommendationResult {
        confidence: tally.confidence.clamp(0, 100),
        recommended_shares,
        reasoning: tally.reasoning,
    }
}

/// Whole shares affordable with `budget` at `price`. Callers guarantee `price > 0`.
/// `None` when the count does not fit a `u64` (e.g. a subnormal price).
pub fn shares_for_budget(budget: f64, price: f64) -> Option<u64> {
    let shares = (budget / price).floor();
    (shares.is_finite() && shares < u64::MAX as f64).then_some(shares as u64)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetAllocation {
    pub total_investment: f64,
    pub budget_utilization_pct: f64,
}

pub fn budget_allocation(shares: u64, price: f64, budget: f64) -> BudgetAllocation {
    let total_investment = shares as f64 * price;
    let budget_utilization_pct = if budget > 0.0 {
        total_investment / budget * 100.0
    } else {
        0.0
    };
    BudgetAllocation {
        total_investment,
        budget_utilization_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strong_profile() -> CompanyProfile {
        CompanyProfile {
            current_price: Some(100.0),
            financial_safety: Some(80.0),
            free_cash_flow: Some(1000.0),
            peg_ratio: Some(0.8),
            revenue_growth: Some(20.0),
            eps_growth: Some(20.0),
            roe: Some(20.0),
        }
    }

    fn priced(price: f64) -> CompanyProfile {
        CompanyProfile {
            current_price: Some(price),
            ..Default::default()
        }
    }

    #[test]
    fn every_rule_fires_in_declaration_order() {
        let res = recommend(&strong_profile(), 10_000.0);
        assert_eq!(res.confidence, 100);
        assert_eq!(res.recommended_shares, 100);
        assert_eq!(
            res.reasoning,
            vec![
                "Strong financial safety",
                "Positive free cash flow",
                "Undervalued (PEG < 1)",
                "Strong revenue growth",
                "Strong earnings growth",
                "High return on equity",
            ]
        );
    }

    #[test]
    fn non_positive_budget_is_invalid() {
        for budget in [0.0, -100.0, f64::NAN] {
            let res = recommend(&strong_profile(), budget);
            assert_eq!(res.confidence, 0);
            assert_eq!(res.recommended_shares, 0);
            assert_eq!(res.reasoning, vec![INVALID_DATA_REASON]);
            assert!(res.is_invalid());
        }
    }

    #[test]
    fn missing_or_zero_price_is_invalid() {
        let mut profile = strong_profile();
        profile.current_price = None;
        assert!(recommend(&profile, 1000.0).is_invalid());

        profile.current_price = Some(0.0);
        assert!(recommend(&profile, 1000.0).is_invalid());

        profile.current_price = Some(-5.0);
        assert!(recommend(&profile, 1000.0).is_invalid());
    }

    #[test]
    fn empty_profile_defaults_safety_to_moderate() {
        let res = recommend(&priced(10.0), 1000.0);
        assert_eq!(res.confidence, 55);
        assert_eq!(res.reasoning, vec!["Moderate financial safety"]);
        assert_eq!(res.recommended_shares, 100);
    }

    #[test]
    fn financial_safety_ladder() {
        let check = |safety: f64, delta: i32, reason: &str| {
            let mut p = priced(1.0);
            p.financial_safety = Some(safety);
            let res = recommend(&p, 1.0);
            assert_eq!(res.confidence, 50 + delta, "safety={safety}");
            assert_eq!(res.reasoning, vec![reason]);
        };
        check(70.0, 15, "Strong financial safety");
        check(69.9, 5, "Moderate financial safety");
        check(50.0, 5, "Moderate financial safety");
        check(49.9, -15, "Weak financial position");
        check(0.0, -15, "Weak financial position");
    }

    #[test]
    fn zero_free_cash_flow_is_neutral() {
        let mut p = priced(1.0);
        p.free_cash_flow = Some(0.0);
        let res = recommend(&p, 1.0);
        assert_eq!(res.confidence, 55);
        assert_eq!(res.reasoning.len(), 1);
    }

    #[test]
    fn negative_free_cash_flow_penalizes() {
        let mut p = priced(1.0);
        p.free_cash_flow = Some(-1.0);
        let res = recommend(&p, 1.0);
        assert_eq!(res.confidence, 40);
        assert_eq!(res.reasoning[1], "Negative free cash flow");
    }

    #[test]
    fn peg_rule_skips_zero_and_middle_band() {
        for peg in [0.0, 1.0, 1.5, 2.0] {
            let mut p = priced(1.0);
            p.peg_ratio = Some(peg);
            assert_eq!(recommend(&p, 1.0).confidence, 55, "peg={peg}");
        }

        let mut p = priced(1.0);
        p.peg_ratio = Some(2.5);
        let res = recommend(&p, 1.0);
        assert_eq!(res.confidence, 45);
        assert_eq!(res.reasoning[1], "Potentially overvalued");
    }

    #[test]
    fn revenue_growth_has_penalty_branch() {
        let mut p = priced(1.0);
        p.revenue_growth = Some(-0.1);
        let res = recommend(&p, 1.0);
        assert_eq!(res.confidence, 45);
        assert_eq!(res.reasoning[1], "Declining revenue");

        p.revenue_growth = Some(15.0);
        assert_eq!(recommend(&p, 1.0).confidence, 55);
    }

    #[test]
    fn eps_growth_has_no_penalty_branch() {
        let mut p = priced(1.0);
        p.eps_growth = Some(-40.0);
        let res = recommend(&p, 1.0);
        assert_eq!(res.confidence, 55);
        assert_eq!(res.reasoning, vec!["Moderate financial safety"]);
    }

    #[test]
    fn roe_only_rewards_above_fifteen() {
        let mut p = priced(1.0);
        p.roe = Some(15.0);
        assert_eq!(recommend(&p, 1.0).confidence, 55);
        p.roe = Some(15.1);
        assert_eq!(recommend(&p, 1.0).confidence, 60);
    }

    #[test]
    fn confidence_clamps_at_zero() {
        let profile = CompanyProfile {
            current_price: Some(50.0),
            financial_safety: Some(10.0),
            free_cash_flow: Some(-5.0),
            peg_ratio: Some(3.0),
            revenue_growth: Some(-10.0),
            eps_growth: Some(-10.0),
            roe: Some(-10.0),
        };
        let res = recommend(&profile, 1000.0);
        // 50 - 15 - 15 - 10 - 10 = 0
        assert_eq!(res.confidence, 0);
        assert_eq!(res.reasoning.len(), 4);
        assert_eq!(res.recommended_shares, 20);
    }

    #[test]
    fn shares_round_down() {
        assert_eq!(shares_for_budget(10_000.0, 333.0), Some(30));
        assert_eq!(shares_for_budget(99.99, 100.0), Some(0));
        assert_eq!(recommend(&priced(333.0), 10_000.0).recommended_shares, 30);
    }

    #[test]
    fn unrepresentable_share_count_is_invalid() {
        assert_eq!(shares_for_budget(1e300, 1e-320), None);
        assert!(recommend(&priced(1e-320), 1e300).is_invalid());
        assert!(recommend(&priced(1e-300), f64::MAX).is_invalid());

        assert_eq!(shares_for_budget(1e18, 1.0), Some(1_000_000_000_000_000_000));
        assert_eq!(
            recommend(&priced(1.0), 1e18).recommended_shares,
            1_000_000_000_000_000_000
        );
    }

    #[test]
    fn display_reason_joins_in_order() {
        let res = recommend(&strong_profile(), 1000.0);
        assert!(res
            .display_reason()
            .starts_with("Strong financial safety • Positive free cash flow"));
    }

    #[test]
    fn allocation_reports_spend_and_share_of_budget() {
        let a = budget_allocation(30, 333.0, 10_000.0);
        assert!((a.total_investment - 9990.0).abs() < 1e-9);
        assert!((a.budget_utilization_pct - 99.9).abs() < 1e-9);

        assert_eq!(budget_allocation(0, 10.0, 0.0).budget_utilization_pct, 0.0);
    }

    #[test]
    fn recommend_is_repeatable() {
        let p = strong_profile();
        assert_eq!(recommend(&p, 1234.0), recommend(&p, 1234.0));
    }

    #[test]
    fn profile_deserializes_with_missing_fields() {
        let p: CompanyProfile =
            serde_json::from_value(serde_json::json!({"current_price": 12.5, "roe": null}))
                .unwrap();
        assert_eq!(p.current_price, Some(12.5));
        assert_eq!(p.roe, None);
        assert_eq!(p.financial_safety, None);
    }
}
