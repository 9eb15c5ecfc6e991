use assert_json_diff::assert_json_include;
use mb_core::model::{Rule, RuleList, Summary};
use mb_core::RoiAssumptions;
use mb_io::loader::{DashboardLoad, Loaded};
use mb_io::source::Source;
use mb_io::LoadError;
use mb_report::*;
use serde_json::json;

fn summary() -> Summary {
    Summary {
        total_transactions: 1000,
        support_threshold: 0.05,
        confidence_threshold: 0.3,
        oil_rate: 0.4,
        milk_rate: 0.5,
        bread_rate: 0.43,
    }
}

fn rules() -> RuleList {
    RuleList::new(vec![
        Rule {
            antecedent: vec!["Oil".into()],
            consequent: vec!["Bread".into()],
            support: 0.2,
            confidence: Some(0.4),
            lift: 1.5,
        },
        Rule {
            antecedent: vec!["Milk".into(), "Oil".into()],
            consequent: vec!["Bread".into()],
            support: 0.1234,
            confidence: Some(0.3),
            lift: 1.0625,
        },
        Rule {
            antecedent: vec!["Bread".into()],
            consequent: vec!["<Eggs>".into()],
            support: 0.05,
            confidence: None,
            lift: 0.8,
        },
    ])
}

fn loaded<T>(value: T, source: &str) -> Loaded<T> {
    Loaded { value, source: source.into(), sha256: "ab".repeat(32) }
}

fn dashboard(load: DashboardLoad) -> Dashboard {
    let state = DashboardState::from_load(load, &Source::parse("./summary.json"), &Source::parse("./rules.json"));
    Dashboard::new(state, RoiAssumptions::default(), "$", "./data/external/optimization.md")
}

fn fetch_failed(path: &str) -> LoadError {
    LoadError::Fetch { path: path.into(), cause: "No such file or directory".into() }
}

#[test]
fn full_report_model() {
    let d = dashboard(DashboardLoad {
        summary: Ok(loaded(summary(), "./summary.json")),
        rules: Ok(loaded(rules(), "./rules.json")),
    });
    let m = d.model(CtaBlock::new("./model.html", true));

    assert_eq!(m.rules.items.len(), 3);
    for row in &m.rules.items {
        for cell in [&row.support, &row.confidence, &row.lift] {
            let (_, frac) = cell.split_once('.').unwrap();
            assert_eq!(frac.len(), 3, "{cell}");
        }
    }
    assert_eq!(m.rules.items[1].antecedent, "Milk, Oil");
    assert_eq!(m.rules.items[1].support, "0.123");
    assert_eq!(m.rules.items[2].confidence, "0.000");
    assert_eq!(m.roi.sweep.len(), 101);
    assert_eq!(m.roi.sweep[50].units, "125");

    let v = render_json(&m).unwrap();
    assert_json_include!(
        actual: v,
        expected: json!({
            "title": "Shelf Placement Report",
            "kpis": {"items": [
                {"label": "Transactions", "value": "1,000"},
                {"label": "Support ≥", "value": "5.0%"},
                {"label": "Confidence ≥", "value": "30.0%"},
                {"label": "Oil rate", "value": "40.0%"},
                {"label": "Milk rate", "value": "50.0%"},
                {"label": "Bread rate", "value": "43.0%"}
            ], "error": null},
            "bars": {"items": [
                {"label": "Oil", "height_pct": 40, "caption": "Oil (40.0%)"},
                {"label": "Milk", "height_pct": 50, "caption": "Milk (50.0%)"},
                {"label": "Bread", "height_pct": 43, "caption": "Bread (43.0%)"}
            ]},
            "roi": {"readout": {"status": "ready", "lift": "1.50", "units": "125", "margin": "$156"}},
            "doc": {"state": "closed", "aria_pressed": false, "button_label": "Show doc"},
            "cta": {"enabled": true, "href": "./model.html", "hint": null}
        })
    );

    let keys: Vec<_> = v.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["title", "kpis", "bars", "rules", "roi", "doc", "cta", "provenance"]);
}

#[test]
fn rules_failure_keeps_kpis_and_bars() {
    let d = dashboard(DashboardLoad {
        summary: Ok(loaded(summary(), "./summary.json")),
        rules: Err(fetch_failed("./rules.json")),
    });
    let m = d.model(CtaBlock::new("./model.html", true));

    assert_eq!(m.kpis.items.len(), 6);
    assert_eq!(m.bars.items.len(), 3);
    assert!(m.kpis.error.is_none());
    assert!(m.rules.items.is_empty());
    assert_eq!(m.rules.error.as_deref(), Some("Load rules.json failed. Run shelf_op.py first."));
    assert!(!m.roi.readout.is_ready());
    assert!(m.roi.sweep.is_empty());

    let html = render_html(&m);
    assert!(html.contains("Load rules.json failed. Run shelf_op.py first."));
    assert!(html.contains("Oil (40.0%)"));
    assert!(!html.contains("Load summary.json failed"));
    assert_eq!(m.provenance.len(), 1);
}

#[test]
fn summary_failure_keeps_rule_table() {
    let d = dashboard(DashboardLoad {
        summary: Err(LoadError::Malformed { path: "./summary.json".into(), msg: "expected object".into() }),
        rules: Ok(loaded(rules(), "./rules.json")),
    });
    let m = d.model(CtaBlock::new("./model.html", true));
    assert!(m.kpis.items.is_empty());
    assert_eq!(m.kpis.error.as_deref(), Some("Load summary.json failed. Run shelf_op.py first."));
    assert_eq!(m.rules.items.len(), 3);
}

#[test]
fn both_failures_still_render_controls() {
    let mut d = dashboard(DashboardLoad {
        summary: Err(fetch_failed("./summary.json")),
        rules: Err(fetch_failed("./rules.json")),
    });
    assert!(d.state().loaded);
    // Still interactive: slider and toggle events are accepted.
    d.dispatch(UiEvent::CaptureRate(80.0));
    let cmds = d.dispatch(UiEvent::DocToggle(DocIntent::Open));
    assert_eq!(cmds, vec![Command::FetchDoc("./data/external/optimization.md".into())]);

    let m = d.model(CtaBlock::new("./model.html", false));
    let html = render_html(&m);
    assert!(html.contains("id=\"capture-rate\""));
    assert!(html.contains("class=\"doc-toggle\""));
    assert!(html.contains("aria-disabled=\"true\""));
    assert!(html.contains("Model page not generated yet."));
    assert!(!html.contains("href=\"./model.html\""));

    let text = render_text(&m);
    assert!(text.contains("Load summary.json failed"));
    assert!(text.contains("Load rules.json failed"));
}

#[test]
fn html_escapes_rule_items_and_embeds_sweep() {
    let d = dashboard(DashboardLoad {
        summary: Ok(loaded(summary(), "./summary.json")),
        rules: Ok(loaded(rules(), "./rules.json")),
    });
    let html = render_html(&d.model(CtaBlock::new("./model.html", true)));
    assert!(html.contains("&lt;Eggs&gt;"));
    assert!(!html.contains("<Eggs>"));
    assert!(html.contains("id=\"roi-sweep\""));
    assert!(html.contains("<a class=\"cta\" href=\"./model.html\">"));
    assert_eq!(html.matches("<tr><td>").count(), 3);
}

#[test]
fn opened_document_is_rendered_inline() {
    let mut d = dashboard(DashboardLoad {
        summary: Ok(loaded(summary(), "./summary.json")),
        rules: Ok(loaded(rules(), "./rules.json")),
    });
    d.dispatch(UiEvent::DocToggle(DocIntent::Open));
    d.dispatch(UiEvent::DocFetched(Ok("# Shelf plan\n\nPut <oil> next to bread.\n".into())));

    let m = d.model(CtaBlock::new("./model.html", true));
    let html = render_html(&m);
    assert!(html.contains("aria-pressed=\"true\""));
    assert!(html.contains(">Hide doc</button>"));
    assert!(html.contains("<div class=\"doc-meta\">Shelf plan</div>"));
    assert!(html.contains("Put &lt;oil&gt; next to bread."));

    let v = render_json(&m).unwrap();
    assert_json_include!(actual: v, expected: json!({"doc": {"state": "open", "title": "Shelf plan"}}));
    assert!(render_text(&m).contains("Shelf plan"));
}

#[test]
fn failed_document_shows_message() {
    let mut d = dashboard(DashboardLoad {
        summary: Ok(loaded(summary(), "./summary.json")),
        rules: Ok(loaded(rules(), "./rules.json")),
    });
    d.dispatch(UiEvent::DocToggle(DocIntent::Open));
    d.dispatch(UiEvent::DocFetched(Err("HTTP 404".into())));
    let html = render_html(&d.model(CtaBlock::new("./model.html", true)));
    assert!(html.contains("Unable to load document."));
    assert!(html.contains(">Hide doc</button>"));
}

#[test]
fn footer_shows_short_digest_with_full_one_on_hover() {
    let d = dashboard(DashboardLoad {
        summary: Ok(loaded(summary(), "./summary.json")),
        rules: Ok(loaded(rules(), "./rules.json")),
    });
    let m = d.model(CtaBlock::new("./model.html", true));
    let full = "ab".repeat(32);

    let html = render_html(&m);
    assert!(html.contains(&format!("<code title=\"sha256:{full}\">sha256:abababababab</code>")));
    assert!(!html.contains(&format!(">sha256:{full}<")));

    let text = render_text(&m);
    assert!(text.contains("summary.json sha256:abababababab (./summary.json)"), "{text}");
    assert!(!text.contains(&full));

    let v = render_json(&m).unwrap();
    assert_eq!(v["provenance"][0]["sha256"], full);
}
