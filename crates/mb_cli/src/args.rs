// crates/mb_cli/src/args.rs
//
// CLI surface and configuration layering.
//
// Precedence, lowest first: built-in defaults → --config JSON file →
// BASKET_REPORT_* environment variables → command-line flags. Clap folds the
// last two together (an env var fills a flag that was not given), so merging
// is a single pass of Args over the file config.
//
// Document locations may be local paths or http(s) URLs; --out and --config
// must be local.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, ValueEnum};
use mb_io::config::{load_config, ReportConfig};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RenderKind {
    Html,
    Json,
    Text,
}

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "basket-report",
    version,
    disable_help_subcommand = true,
    about = "Render the market-basket KPI/rule dashboard with a live ROI estimate"
)]
pub struct Args {
    /// KPI summary JSON (path or http(s) URL) [default: ./summary.json]
    #[arg(long, env = "BASKET_REPORT_SUMMARY")]
    pub summary: Option<String>,

    /// Ranked rules JSON (path or http(s) URL) [default: ./rules.json]
    #[arg(long, env = "BASKET_REPORT_RULES")]
    pub rules: Option<String>,

    /// Explanatory markdown document [default: ./data/external/optimization.md]
    #[arg(long, env = "BASKET_REPORT_DOC")]
    pub doc: Option<String>,

    /// Fetch the document now and render the panel expanded.
    #[arg(long)]
    pub open_doc: bool,

    /// CTA link target; repeat to probe alternatives (first one is linked) [default: ./model.html]
    #[arg(long = "cta", env = "BASKET_REPORT_CTA", value_delimiter = ',')]
    pub cta: Vec<String>,

    /// Capture rate in percent (0..=100).
    #[arg(long, env = "BASKET_REPORT_CAPTURE_RATE")]
    pub capture_rate: Option<f64>,

    /// Items per basket; scales transactions into traffic (> 0).
    #[arg(long, env = "BASKET_REPORT_AVG_BASKET")]
    pub avg_basket: Option<f64>,

    /// Gross margin per incremental unit (>= 0).
    #[arg(long, env = "BASKET_REPORT_MARGIN_PER_UNIT")]
    pub margin_per_unit: Option<f64>,

    /// Currency symbol for margin display.
    #[arg(long, env = "BASKET_REPORT_CURRENCY")]
    pub currency: Option<String>,

    /// JSON config file (see ReportConfig).
    #[arg(long, env = "BASKET_REPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output directory for report.html / report.json.
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Renderer(s) to emit; text goes to stdout [default: text]
    #[arg(long, value_enum)]
    pub render: Vec<RenderKind>,

    /// Suppress the stderr status line.
    #[arg(long)]
    pub quiet: bool,

    /// More log output (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Errors surfaced by argument validation and config merging.
#[derive(Debug)]
pub enum CliError {
    Empty(&'static str),
    NonLocalPath(String),
    Config(String),
    Domain(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            Empty(flag) => write!(f, "{flag} must not be empty"),
            NonLocalPath(p) => write!(f, "path must be local (no scheme): {p}"),
            Config(m) => write!(f, "{m}"),
            Domain(m) => write!(f, "invalid assumption: {m}"),
        }
    }
}
impl std::error::Error for CliError {}

pub fn parse_and_validate() -> Result<Args, CliError> {
    let mut args = Args::parse();
    validate(&mut args)?;
    Ok(args)
}

fn validate(args: &mut Args) -> Result<(), CliError> {
    ensure_local_path(&args.out)?;
    if let Some(c) = &args.config {
        ensure_local_path(c)?;
    }
    for (flag, v) in [
        ("--summary", &args.summary),
        ("--rules", &args.rules),
        ("--doc", &args.doc),
        ("--currency", &args.currency),
    ] {
        if v.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(CliError::Empty(flag));
        }
    }
    args.cta.retain(|s| !s.trim().is_empty());

    if args.render.is_empty() {
        args.render.push(RenderKind::Text);
    }
    let mut seen = Vec::with_capacity(args.render.len());
    args.render.retain(|k| {
        let fresh = !seen.contains(k);
        seen.push(*k);
        fresh
    });
    Ok(())
}

/// Reject anything that looks like a URL.
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        let lower = s.trim().to_ascii_lowercase();
        if lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

/// Defaults ← config file ← env/flags, then domain checks.
pub fn resolve_config(args: &Args) -> Result<ReportConfig, CliError> {
    let base = match &args.config {
        Some(path) => load_config(path).map_err(|e| CliError::Config(e.to_string()))?,
        None => ReportConfig::default(),
    };
    let merged = merge(base, args);
    merged
        .assumptions
        .validate_domains()
        .map_err(|e| CliError::Domain(e.to_string()))?;
    if merged.cta.is_empty() {
        return Err(CliError::Empty("cta"));
    }
    Ok(merged)
}

fn merge(mut cfg: ReportConfig, args: &Args) -> ReportConfig {
    if let Some(v) = &args.summary {
        cfg.summary = v.clone();
    }
    if let Some(v) = &args.rules {
        cfg.rules = v.clone();
    }
    if let Some(v) = &args.doc {
        cfg.doc = v.clone();
    }
    if !args.cta.is_empty() {
        cfg.cta = args.cta.clone();
    }
    if let Some(v) = &args.currency {
        cfg.currency_symbol = v.clone();
    }
    if let Some(v) = args.capture_rate {
        cfg.assumptions.capture_rate = v;
    }
    if let Some(v) = args.avg_basket {
        cfg.assumptions.avg_basket = v;
    }
    if let Some(v) = args.margin_per_unit {
        cfg.assumptions.margin_per_unit = v;
    }
    cfg
}
