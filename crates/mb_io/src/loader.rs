//! Loader: read the two report artifacts (summary → KPIs, rules → table/ROI)
//! plus the optional explanatory markdown, and return typed documents with
//! their digests.
//!
//! The summary and rules loads are started together and never coupled: each
//! gets its own `Result`, so one failing cannot stop the other from rendering.

use log::{debug, warn};
use mb_core::model::{RuleList, Summary};

use crate::documents::{parse_rules, parse_summary, parse_value};
use crate::fetch::Fetcher;
use crate::hasher::sha256_hex;
use crate::source::Source;
use crate::{malformed, LoadError};

/// A parsed document together with where it came from and its raw-byte digest.
#[derive(Clone, Debug, PartialEq)]
pub struct Loaded<T> {
    pub value: T,
    pub source: String,
    pub sha256: String,
}

/// Outcome of the two independent dashboard loads.
#[derive(Debug)]
pub struct DashboardLoad {
    pub summary: Result<Loaded<Summary>, LoadError>,
    pub rules: Result<Loaded<RuleList>, LoadError>,
}

impl DashboardLoad {
    pub fn all_ok(&self) -> bool {
        self.summary.is_ok() && self.rules.is_ok()
    }
}

pub async fn load_summary(fetcher: &Fetcher, src: &Source) -> Result<Loaded<Summary>, LoadError> {
    let label = src.to_string();
    let bytes = fetcher.fetch_bytes(src).await?;
    let v = parse_value(&bytes, &label)?;
    let value = parse_summary(&v, &label)?;
    Ok(Loaded { value, source: label, sha256: sha256_hex(&bytes) })
}

pub async fn load_rules(fetcher: &Fetcher, src: &Source) -> Result<Loaded<RuleList>, LoadError> {
    let label = src.to_string();
    let bytes = fetcher.fetch_bytes(src).await?;
    let v = parse_value(&bytes, &label)?;
    let value = parse_rules(&v, &label)?;
    debug!("rules loaded: {} from {label}", value.len());
    Ok(Loaded { value, source: label, sha256: sha256_hex(&bytes) })
}

/// Read a UTF-8 text document (the explanatory markdown).
pub async fn load_text(fetcher: &Fetcher, src: &Source) -> Result<Loaded<String>, LoadError> {
    let label = src.to_string();
    let bytes = fetcher.fetch_bytes(src).await?;
    let sha256 = sha256_hex(&bytes);
    let value = String::from_utf8(bytes).map_err(|e| malformed(&label, format!("not UTF-8: {e}")))?;
    Ok(Loaded { value, source: label, sha256 })
}

/// Load summary and rules concurrently; failures are logged and returned per document.
pub async fn load_dashboard(fetcher: &Fetcher, summary: &Source, rules: &Source) -> DashboardLoad {
    let (summary, rules) = tokio::join!(load_summary(fetcher, summary), load_rules(fetcher, rules));

    if let Err(e) = &summary {
        warn!("summary unavailable: {e}");
    }
    if let Err(e) = &rules {
        warn!("rules unavailable: {e}");
    }
    DashboardLoad { summary, rules }
}
