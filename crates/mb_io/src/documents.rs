//! JSON → typed records for `summary.json` and `rules.json`.
//!
//! Only the top-level shape is enforced (object / array of objects). Missing or
//! non-numeric fields read as 0 so the page still renders; `confidence` is the
//! exception and stays `None` so the estimator can refuse it.

use mb_core::model::{Rule, RuleList, Summary};
use serde_json::{Map, Value};

use crate::{malformed, LoadError};

type Object = Map<String, Value>;

/// Parse raw bytes as JSON. Invalid JSON is `Malformed`, not a fetch failure.
pub fn parse_value(bytes: &[u8], path: &str) -> Result<Value, LoadError> {
    serde_json::from_slice(bytes).map_err(|e| malformed(path, format!("invalid JSON: {e}")))
}

pub fn parse_summary(v: &Value, path: &str) -> Result<Summary, LoadError> {
    let obj = v
        .as_object()
        .ok_or_else(|| malformed(path, "expected a JSON object at the top level"))?;

    Ok(Summary {
        total_transactions: get_count(obj, "total_transactions"),
        support_threshold: get_f64(obj, "support_threshold"),
        confidence_threshold: get_f64(obj, "confidence_threshold"),
        oil_rate: get_f64(obj, "oil_rate"),
        milk_rate: get_f64(obj, "milk_rate"),
        bread_rate: get_f64(obj, "bread_rate"),
    })
}

pub fn parse_rules(v: &Value, path: &str) -> Result<RuleList, LoadError> {
    let arr = v
        .as_array()
        .ok_or_else(|| malformed(path, "expected a JSON array at the top level"))?;

    let mut rules = Vec::with_capacity(arr.len());
    for (i, item) in arr.iter().enumerate() {
        let obj = item
            .as_object()
            .ok_or_else(|| malformed(path, format!("rules[{i}] is not an object")))?;
        rules.push(Rule {
            antecedent: get_items(obj, "antecedent"),
            consequent: get_items(obj, "consequent"),
            support: get_f64(obj, "support"),
            confidence: obj.get("confidence").and_then(Value::as_f64),
            lift: get_f64(obj, "lift"),
        });
    }
    Ok(RuleList::from(rules))
}

fn get_f64(obj: &Object, key: &str) -> f64 {
    obj.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

/// Non-negative integer; a float count (e.g. `5000.0`) is truncated.
fn get_count(obj: &Object, key: &str) -> u64 {
    match obj.get(key) {
        Some(v) => v.as_u64().unwrap_or_else(|| {
            v.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
                .unwrap_or(0)
        }),
        None => 0,
    }
}

/// Item list; a bare string counts as a one-item list, non-strings are skipped.
fn get_items(obj: &Object, key: &str) -> Vec<String> {
    match obj.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}
