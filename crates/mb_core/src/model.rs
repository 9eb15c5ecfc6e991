//! KPI summary and association-rule records.
//!
//! Records are built once by the loader and then shared read-only. Rules
//! arrive sorted by descending lift from the offline pipeline; nothing here
//! re-sorts them.

use crate::errors::CoreError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Aggregate KPIs from `summary.json`. Rates are probabilities in [0,1].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Summary {
    pub total_transactions: u64,
    pub support_threshold: f64,
    pub confidence_threshold: f64,
    pub oil_rate: f64,
    pub milk_rate: f64,
    pub bread_rate: f64,
}

/// One association rule `antecedent → consequent`.
///
/// `confidence` is `None` when the source document did not carry a usable
/// number. Display treats that as 0; the estimator refuses it (see
/// [`Rule::metrics`]).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rule {
    pub antecedent: Vec<String>,
    pub consequent: Vec<String>,
    pub support: f64,
    pub confidence: Option<f64>,
    pub lift: f64,
}

/// Neutral sentinel used as the top rule of an empty list:
/// support 0, confidence 0, lift 1 (independence). Every estimate over it is 0.
pub static NEUTRAL_RULE: Rule = Rule {
    antecedent: Vec::new(),
    consequent: Vec::new(),
    support: 0.0,
    confidence: Some(0.0),
    lift: 1.0,
};

impl Rule {
    /// Confidence for display purposes (absent reads as 0).
    pub fn confidence_or_zero(&self) -> f64 {
        self.confidence.unwrap_or(0.0)
    }

    /// Numeric triple consumed by the estimator.
    pub fn metrics(&self) -> Result<RuleMetrics, CoreError> {
        let confidence = self.confidence.ok_or(CoreError::MissingField("confidence"))?;
        Ok(RuleMetrics { support: self.support, confidence, lift: self.lift })
    }
}

/// `{support, confidence, lift}` as the estimator sees a rule.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuleMetrics {
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
}

impl RuleMetrics {
    pub const NEUTRAL: RuleMetrics = RuleMetrics { support: 0.0, confidence: 0.0, lift: 1.0 };
}

/// Ordered rule list (may be empty).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RuleList(Vec<Rule>);

impl RuleList {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self(rules)
    }

    /// First rule, or [`NEUTRAL_RULE`] when the list is empty.
    pub fn top(&self) -> &Rule {
        self.0.first().unwrap_or(&NEUTRAL_RULE)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Rule> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Rule] {
        &self.0
    }
}

impl From<Vec<Rule>> for RuleList {
    fn from(rules: Vec<Rule>) -> Self {
        Self(rules)
    }
}

impl<'a> IntoIterator for &'a RuleList {
    type Item = &'a Rule;
    type IntoIter = core::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
