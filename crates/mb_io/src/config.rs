//! Report configuration file (JSON).
//!
//! Every field is optional; absent fields keep the built-in default. Unknown
//! fields are rejected so a typo does not silently fall back to a default.
//!
//! ```json
//! {
//!   "summary": "./summary.json",
//!   "rules": "https://example.org/out/rules.json",
//!   "assumptions": { "capture_rate": 40, "margin_per_unit": 2.0 },
//!   "currency_symbol": "€"
//! }
//! ```

use std::path::Path;

use mb_core::RoiAssumptions;
use serde::{Deserialize, Serialize};

use crate::LoadError;

pub const DEFAULT_SUMMARY: &str = "./summary.json";
pub const DEFAULT_RULES: &str = "./rules.json";
pub const DEFAULT_DOC: &str = "./data/external/optimization.md";
pub const DEFAULT_CTA: &str = "./model.html";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub summary: String,
    pub rules: String,
    pub doc: String,
    pub cta: Vec<String>,
    pub currency_symbol: String,
    pub assumptions: RoiAssumptions,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            summary: DEFAULT_SUMMARY.to_string(),
            rules: DEFAULT_RULES.to_string(),
            doc: DEFAULT_DOC.to_string(),
            cta: vec![DEFAULT_CTA.to_string()],
            currency_symbol: "$".to_string(),
            assumptions: RoiAssumptions::default(),
        }
    }
}

impl ReportConfig {
    pub fn from_json_str(s: &str) -> Result<Self, LoadError> {
        serde_json::from_str(s).map_err(|e| LoadError::Config(e.to_string()))
    }
}

/// Read and parse a config file. Domain checks happen after all layers merge.
pub fn load_config(path: &Path) -> Result<ReportConfig, LoadError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| LoadError::Config(format!("read {}: {e}", path.display())))?;
    ReportConfig::from_json_str(&text)
        .map_err(|e| LoadError::Config(format!("{}: {e}", path.display())))
}
