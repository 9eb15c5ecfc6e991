//! ROI estimator: incremental demand and gross margin from one rule.
//!
//! Steps (kept exactly as the merchandising heuristic defines them):
//! 1. `baseline = support / max(confidence, EPSILON)`
//! 2. `incremental = max(lift - 1, 0) * baseline`
//! 3. `realized = incremental * capture_rate / 100`
//! 4. `units = realized * traffic`
//! 5. `margin = units * margin_per_unit`
//!
//! NOTE: `support / confidence` is algebraically P(antecedent), not
//! P(consequent). It is the documented proxy for the baseline probability;
//! do not "correct" it here.
//!
//! NOTE: `confidence == 0` with `lift > 1` divides by `EPSILON` and yields a
//! very large (finite) estimate. Known precision hazard, not special-cased.

use crate::assumptions::RoiAssumptions;
use crate::errors::CoreError;
use crate::model::{RuleList, RuleMetrics, Summary};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Floor applied to confidence before dividing.
pub const EPSILON: f64 = 1e-9;

/// Estimator output. Both fields are ≥ 0 for valid inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RoiResult {
    pub incremental_units: f64,
    pub incremental_gross_margin: f64,
}

/// Step 1: baseline probability proxy.
#[inline]
pub fn baseline_prob_b(rule: &RuleMetrics) -> f64 {
    rule.support / rule.confidence.max(EPSILON)
}

/// Expected number of basket-equivalent events.
#[inline]
pub fn traffic(total_transactions: u64, avg_basket: f64) -> f64 {
    total_transactions as f64 * avg_basket
}

/// Pure estimate for one rule. `capture_rate` is a percentage (0..=100).
pub fn estimate(rule: &RuleMetrics, capture_rate: f64, margin_per_unit: f64, traffic: f64) -> RoiResult {
    let incremental_prob = (rule.lift - 1.0).max(0.0) * baseline_prob_b(rule);
    let realized_prob = incremental_prob * (capture_rate / 100.0);
    let incremental_units = realized_prob * traffic;
    RoiResult {
        incremental_units,
        incremental_gross_margin: incremental_units * margin_per_unit,
    }
}

/// Estimate for the top rule of `rules` (neutral sentinel when empty).
///
/// Fails only when the top rule carries no usable confidence.
pub fn estimate_top(
    rules: &RuleList,
    summary: &Summary,
    assumptions: &RoiAssumptions,
) -> Result<RoiResult, CoreError> {
    let metrics = rules.top().metrics()?;
    let t = traffic(summary.total_transactions, assumptions.avg_basket);
    Ok(estimate(&metrics, assumptions.capture_rate, assumptions.margin_per_unit, t))
}

/// Estimates for every integer capture rate 0..=100 (index = percent).
pub fn sweep(rule: &RuleMetrics, margin_per_unit: f64, traffic: f64) -> Vec<RoiResult> {
    (0..=100u32)
        .map(|pct| estimate(rule, f64::from(pct), margin_per_unit, traffic))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rule;

    const SCENARIO: RuleMetrics = RuleMetrics { support: 0.2, confidence: 0.4, lift: 1.5 };

    #[test]
    fn scenario_a_matches_hand_computation() {
        assert_eq!(baseline_prob_b(&SCENARIO), 0.5);
        let r = estimate(&SCENARIO, 50.0, 1.25, traffic(1000, 1.0));
        assert_eq!(r.incremental_units, 125.0);
        assert_eq!(r.incremental_gross_margin, 156.25);
    }

    #[test]
    fn scenario_b_zero_capture_gives_zero() {
        let r = estimate(&SCENARIO, 0.0, 1.25, 1000.0);
        assert_eq!(r, RoiResult { incremental_units: 0.0, incremental_gross_margin: 0.0 });
    }

    #[test]
    fn scenario_c_lift_below_one_gives_zero() {
        let rule = RuleMetrics { support: 0.1, confidence: 0.2, lift: 0.8 };
        for capture in [0.0, 25.0, 50.0, 100.0] {
            let r = estimate(&rule, capture, 1.25, 1000.0);
            assert_eq!(r.incremental_units, 0.0);
            assert_eq!(r.incremental_gross_margin, 0.0);
        }
    }

    #[test]
    fn neutral_rule_yields_zero_even_against_epsilon() {
        let r = estimate(&RuleMetrics::NEUTRAL, 100.0, 5.0, 1.0e6);
        assert_eq!(r.incremental_units, 0.0);
        assert_eq!(r.incremental_gross_margin, 0.0);
    }

    #[test]
    fn zero_confidence_with_lift_is_large_but_finite() {
        let rule = RuleMetrics { support: 0.1, confidence: 0.0, lift: 2.0 };
        let r = estimate(&rule, 100.0, 1.0, 1.0);
        assert!(r.incremental_units.is_finite());
        assert!((r.incremental_units - 0.1 / EPSILON).abs() < 1.0);
    }

    #[test]
    fn estimate_top_uses_traffic_from_summary_and_basket() {
        let rules = RuleList::from(vec![Rule {
            antecedent: vec!["Oil".into()],
            consequent: vec!["Bread".into()],
            support: 0.2,
            confidence: Some(0.4),
            lift: 1.5,
        }]);
        let summary = Summary { total_transactions: 500, ..Summary::default() };
        let a = RoiAssumptions { capture_rate: 50.0, avg_basket: 2.0, margin_per_unit: 1.25 };
        let r = estimate_top(&rules, &summary, &a).unwrap();
        assert_eq!(r.incremental_units, 125.0);
    }

    #[test]
    fn estimate_top_on_empty_list_is_zero() {
        let summary = Summary { total_transactions: 5000, ..Summary::default() };
        let r = estimate_top(&RuleList::default(), &summary, &RoiAssumptions::default()).unwrap();
        assert_eq!(r, RoiResult::default());
    }

    #[test]
    fn sweep_covers_every_percent() {
        let s = sweep(&SCENARIO, 1.25, 1000.0);
        assert_eq!(s.len(), 101);
        assert_eq!(s[0], RoiResult::default());
        assert_eq!(s[50].incremental_units, 125.0);
        assert_eq!(s[100].incremental_units, 250.0);
    }
}
