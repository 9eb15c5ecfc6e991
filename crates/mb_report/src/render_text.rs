//! Plain-text terminal readout.

use std::fmt::Write as _;

use mb_io::hasher::short_hex;

use crate::doc_panel::DocState;
use crate::structure::{ReportModel, Section, DIGEST_DISPLAY_CHARS};

const BAR_WIDTH: usize = 40;

pub fn render_text(m: &ReportModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", m.title);
    let _ = writeln!(out, "{}", "=".repeat(m.title.chars().count()));

    heading(&mut out, "Key figures");
    for c in &m.kpis.items {
        let _ = writeln!(out, "  {:<14} {}", c.label, c.value);
    }
    error_line(&mut out, &m.kpis);

    heading(&mut out, "Purchase rates");
    for b in &m.bars.items {
        let filled = usize::from(b.height_pct) * BAR_WIDTH / 100;
        let _ = writeln!(out, "  {:<6} {:<w$} {}", b.label, "#".repeat(filled), b.caption, w = BAR_WIDTH);
    }
    // KPIs and bars share the summary error; print it once.
    if m.kpis.error.is_none() {
        error_line(&mut out, &m.bars);
    }

    heading(&mut out, "Association rules");
    if !m.rules.items.is_empty() {
        let _ = writeln!(
            out,
            "  {:>3}  {:<24} {:<24} {:>8} {:>10} {:>7}",
            "#", "antecedent", "consequent", "support", "confidence", "lift"
        );
    }
    for r in &m.rules.items {
        let _ = writeln!(
            out,
            "  {:>3}  {:<24} {:<24} {:>8} {:>10} {:>7}",
            r.index, r.antecedent, r.consequent, r.support, r.confidence, r.lift
        );
    }
    if m.rules.items.is_empty() && m.rules.error.is_none() {
        let _ = writeln!(out, "  (no rules)");
    }
    error_line(&mut out, &m.rules);

    heading(&mut out, "ROI estimate");
    let _ = writeln!(out, "  {}", m.roi.readout.text());

    match &m.doc.state {
        DocState::Open { title, .. } => {
            heading(&mut out, "Document");
            let _ = writeln!(out, "  {}", title.as_deref().unwrap_or(&m.doc.source));
        }
        DocState::Error { message } => {
            heading(&mut out, "Document");
            let _ = writeln!(out, "  {message}");
        }
        DocState::Closed | DocState::Loading => {}
    }

    out.push('\n');
    match m.cta.hint {
        Some(hint) if !m.cta.enabled => {
            let _ = writeln!(out, "{}: {hint}", m.cta.label);
        }
        _ => {
            let _ = writeln!(out, "{}: {}", m.cta.label, m.cta.href);
        }
    }
    for p in &m.provenance {
        let _ = writeln!(out, "{} sha256:{} ({})", p.name, short_hex(&p.sha256, DIGEST_DISPLAY_CHARS), p.source);
    }
    out
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{title}");
}

fn error_line<T>(out: &mut String, s: &Section<T>) {
    if let Some(e) = &s.error {
        let _ = writeln!(out, "  ! {e}");
    }
}
