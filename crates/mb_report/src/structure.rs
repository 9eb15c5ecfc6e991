//! crates/mb_report/src/structure.rs
//! Report view model: every value is display-ready text, so the HTML, JSON
//! and text renderers never format numbers themselves.
//!
//! Section order: KPIs → bars → rules → ROI → document → CTA → provenance.

use mb_core::format::{currency_0dp, fmt_int, fmt_rounded, pct, to_fixed};
use mb_core::model::{Rule, Summary};
use mb_core::roi::{estimate, sweep, traffic};
use mb_core::RoiAssumptions;
use serde::Serialize;

use crate::doc_panel::{DocPanel, DocState};
use crate::state::DashboardState;

pub const REPORT_TITLE: &str = "Shelf Placement Report";
pub const CTA_LABEL: &str = "Open model page";
pub const CTA_MISSING_HINT: &str = "Model page not generated yet.";
/// Digest prefix length shown in footers; the full digest stays in the model.
pub const DIGEST_DISPLAY_CHARS: usize = 12;

#[derive(Clone, Debug, Serialize)]
pub struct ReportModel {
    pub title: String,
    pub kpis: Section<KpiCard>,
    pub bars: Section<Bar>,
    pub rules: Section<RuleRow>,
    pub roi: RoiBlock,
    pub doc: DocView,
    pub cta: CtaBlock,
    pub provenance: Vec<Provenance>,
}

/// A list of display items, or the inline error that replaced them.
#[derive(Clone, Debug, Serialize)]
pub struct Section<T> {
    pub items: Vec<T>,
    pub error: Option<String>,
}

impl<T> Section<T> {
    fn ok(items: Vec<T>) -> Self {
        Self { items, error: None }
    }

    fn failed(error: Option<&str>) -> Self {
        Self { items: Vec::new(), error: error.map(str::to_string) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct KpiCard {
    pub label: &'static str,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Bar {
    pub label: &'static str,
    /// Fill height in percent, 0..=100.
    pub height_pct: u8,
    pub caption: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RuleRow {
    pub index: usize,
    pub antecedent: String,
    pub consequent: String,
    pub support: String,
    pub confidence: String,
    pub lift: String,
}

/// Live ROI line for the current capture rate.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RoiReadout {
    Ready {
        capture_rate: f64,
        lift: String,
        units: String,
        margin: String,
    },
    Unavailable {
        reason: String,
    },
}

impl RoiReadout {
    pub fn is_ready(&self) -> bool {
        matches!(self, RoiReadout::Ready { .. })
    }

    pub fn text(&self) -> String {
        match self {
            RoiReadout::Ready { capture_rate, lift, units, margin } => format!(
                "Top rule lift {lift}: +{units} units, +{margin} gross margin at {}% capture",
                to_fixed(*capture_rate, 0)
            ),
            RoiReadout::Unavailable { reason } => format!("ROI unavailable: {reason}"),
        }
    }
}

/// One precomputed slider position (index = capture rate percent).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SweepPoint {
    pub units: String,
    pub margin: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct RoiBlock {
    pub readout: RoiReadout,
    pub avg_basket: f64,
    pub margin_per_unit: f64,
    pub currency: String,
    /// Empty when the readout is unavailable.
    pub sweep: Vec<SweepPoint>,
}

#[derive(Clone, Debug, Serialize)]
pub struct DocView {
    pub source: String,
    pub button_label: &'static str,
    pub aria_pressed: bool,
    pub disabled: bool,
    #[serde(flatten)]
    pub state: DocState,
}

impl DocView {
    pub fn from_panel(panel: &DocPanel, source: &str) -> Self {
        Self {
            source: source.to_string(),
            button_label: panel.button_label(),
            aria_pressed: panel.aria_pressed(),
            disabled: panel.button_disabled(),
            state: panel.state().clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CtaBlock {
    pub label: &'static str,
    pub href: String,
    pub enabled: bool,
    pub hint: Option<&'static str>,
}

impl CtaBlock {
    pub fn new(href: &str, reachable: bool) -> Self {
        Self {
            label: CTA_LABEL,
            href: href.to_string(),
            enabled: reachable,
            hint: (!reachable).then_some(CTA_MISSING_HINT),
        }
    }
}

/// Which artifact bytes were rendered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Provenance {
    pub name: String,
    pub source: String,
    pub sha256: String,
}

// ---------------------------------------------------------------------------

pub fn kpi_cards(s: &Summary) -> Vec<KpiCard> {
    vec![
        KpiCard { label: "Transactions", value: fmt_int(s.total_transactions) },
        KpiCard { label: "Support ≥", value: pct(s.support_threshold, 1) },
        KpiCard { label: "Confidence ≥", value: pct(s.confidence_threshold, 1) },
        KpiCard { label: "Oil rate", value: pct(s.oil_rate, 1) },
        KpiCard { label: "Milk rate", value: pct(s.milk_rate, 1) },
        KpiCard { label: "Bread rate", value: pct(s.bread_rate, 1) },
    ]
}

pub fn bars(s: &Summary) -> Vec<Bar> {
    [("Oil", s.oil_rate), ("Milk", s.milk_rate), ("Bread", s.bread_rate)]
        .into_iter()
        .map(|(label, rate)| Bar { label, height_pct: bar_height(rate), caption: format!("{label} ({})", pct(rate, 1)) })
        .collect()
}

fn bar_height(rate: f64) -> u8 {
    if !rate.is_finite() {
        return 0;
    }
    (rate * 100.0).round().clamp(0.0, 100.0) as u8
}

pub fn rule_rows<'a>(rules: impl IntoIterator<Item = &'a Rule>) -> Vec<RuleRow> {
    rules
        .into_iter()
        .enumerate()
        .map(|(i, r)| RuleRow {
            index: i + 1,
            antecedent: r.antecedent.join(", "),
            consequent: r.consequent.join(", "),
            support: to_fixed(r.support, 3),
            confidence: to_fixed(r.confidence_or_zero(), 3),
            lift: to_fixed(r.lift, 3),
        })
        .collect()
}

/// ROI readout for the current state. Needs both documents and a top rule
/// that carries a confidence value.
pub fn roi_readout(state: &DashboardState, assumptions: &RoiAssumptions, currency: &str) -> RoiReadout {
    let (summary, rules) = match (&state.summary, &state.rules) {
        (Some(s), Some(r)) => (s, r),
        (_, None) => return unavailable(state.rules_error.as_deref().unwrap_or("rules not loaded.")),
        (None, _) => return unavailable(state.summary_error.as_deref().unwrap_or("summary not loaded.")),
    };
    let metrics = match rules.top().metrics() {
        Ok(m) => m,
        Err(e) => return unavailable(&format!("top rule is incomplete ({e}).")),
    };
    let t = traffic(summary.total_transactions, assumptions.avg_basket);
    let r = estimate(&metrics, assumptions.capture_rate, assumptions.margin_per_unit, t);
    RoiReadout::Ready {
        capture_rate: assumptions.capture_rate,
        lift: to_fixed(metrics.lift, 2),
        units: fmt_rounded(r.incremental_units),
        margin: currency_0dp(r.incremental_gross_margin, currency),
    }
}

fn unavailable(reason: &str) -> RoiReadout {
    RoiReadout::Unavailable { reason: reason.to_string() }
}

fn roi_sweep(state: &DashboardState, assumptions: &RoiAssumptions, currency: &str) -> Vec<SweepPoint> {
    let (Some(summary), Some(rules)) = (&state.summary, &state.rules) else {
        return Vec::new();
    };
    let Ok(metrics) = rules.top().metrics() else {
        return Vec::new();
    };
    let t = traffic(summary.total_transactions, assumptions.avg_basket);
    sweep(&metrics, assumptions.margin_per_unit, t)
        .into_iter()
        .map(|r| SweepPoint {
            units: fmt_rounded(r.incremental_units),
            margin: currency_0dp(r.incremental_gross_margin, currency),
        })
        .collect()
}

/// Map dashboard state into the view model. Never fails: each section
/// degrades on its own.
pub fn build_model(
    state: &DashboardState,
    assumptions: &RoiAssumptions,
    currency: &str,
    doc: DocView,
    cta: CtaBlock,
) -> ReportModel {
    let (kpis, bar_section) = match &state.summary {
        Some(s) => (Section::ok(kpi_cards(s)), Section::ok(bars(s))),
        None => (
            Section::failed(state.summary_error.as_deref()),
            Section::failed(state.summary_error.as_deref()),
        ),
    };
    let rules = match &state.rules {
        Some(list) => Section::ok(rule_rows(list)),
        None => Section::failed(state.rules_error.as_deref()),
    };

    ReportModel {
        title: REPORT_TITLE.to_string(),
        kpis,
        bars: bar_section,
        rules,
        roi: RoiBlock {
            readout: roi_readout(state, assumptions, currency),
            avg_basket: assumptions.avg_basket,
            margin_per_unit: assumptions.margin_per_unit,
            currency: currency.to_string(),
            sweep: roi_sweep(state, assumptions, currency),
        },
        doc,
        cta,
        provenance: state.provenance.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_heights_round_and_clamp() {
        assert_eq!(bar_height(0.43), 43);
        assert_eq!(bar_height(0.005), 1);
        assert_eq!(bar_height(1.7), 100);
        assert_eq!(bar_height(-0.2), 0);
        assert_eq!(bar_height(f64::NAN), 0);
    }

    #[test]
    fn cta_hint_only_when_unreachable() {
        assert_eq!(CtaBlock::new("./model.html", true).hint, None);
        let off = CtaBlock::new("./model.html", false);
        assert!(!off.enabled);
        assert_eq!(off.hint, Some(CTA_MISSING_HINT));
    }

    #[test]
    fn readout_text() {
        let r = RoiReadout::Ready {
            capture_rate: 50.0,
            lift: "1.50".into(),
            units: "125".into(),
            margin: "$156".into(),
        };
        assert_eq!(r.text(), "Top rule lift 1.50: +125 units, +$156 gross margin at 50% capture");
    }
}
