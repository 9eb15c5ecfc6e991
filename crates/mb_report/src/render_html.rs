// crates/mb_report/src/render_html.rs
//
// Self-contained HTML renderer: inline CSS and script, no external assets.
// Section order follows the view model (KPIs → bars → rules → ROI → doc →
// CTA → provenance). All content strings are escaped here; the only
// pre-rendered HTML accepted is the document body from a MarkdownRenderer.
//
// The slider reads readouts from a JSON table embedded at render time, one
// entry per integer capture rate, so the page never recomputes the estimate.

use std::fmt::Write as _;

use mb_io::hasher::short_hex;

use crate::doc_panel::DocState;
use crate::structure::{Bar, CtaBlock, DIGEST_DISPLAY_CHARS, DocView, KpiCard, Provenance, ReportModel, RoiBlock, RoiReadout, RuleRow, Section};

const STYLE: &str = "\
body{font-family:system-ui,-apple-system,Segoe UI,Roboto,Ubuntu,Arial,sans-serif;margin:24px;color:#222}\
h1,h2{margin:0.3em 0}\
section{margin:1.2em 0}\
.grid{display:grid;grid-template-columns:repeat(3,minmax(0,1fr));gap:8px}\
.kpi{border:1px solid #e5e5e5;border-radius:8px;padding:8px}\
.kpi .label{font-size:.85em;opacity:.75}\
.kpi .value{font-size:1.3em;font-weight:600}\
.bars{display:flex;gap:16px;align-items:flex-end;height:160px}\
.bar{width:64px;height:100%;display:flex;flex-direction:column;justify-content:flex-end}\
.bar .fill{background:#4a7bd0;border-radius:4px 4px 0 0}\
.bar .caption{font-size:.8em;text-align:center}\
table{border-collapse:collapse}\
td,th{padding:4px 8px;border-bottom:1px solid #ddd;text-align:left}\
.err{color:#c33}\
.subtle{opacity:.75}\
.external-markdown{margin-top:.75rem;border:1px solid #eee;padding:.75rem;border-radius:8px}\
a.cta[aria-disabled=true]{opacity:.5;pointer-events:none}\
footer{font-size:.8em;opacity:.7}";

const SCRIPT: &str = r#"(function(){
var sweep=JSON.parse(document.getElementById('roi-sweep').textContent||'[]');
var slider=document.getElementById('capture-rate');
var out=document.getElementById('roi-readout');
if(slider&&out&&sweep.length===101){
 slider.addEventListener('input',function(){
  var pct=Math.max(0,Math.min(100,Math.round(Number(slider.value))));
  var p=sweep[pct];
  out.textContent='Top rule lift '+out.dataset.lift+': +'+p.units+' units, +'+p.margin+' gross margin at '+pct+'% capture';
 });
}
var toggle=document.querySelector('.doc-toggle');
var box=document.querySelector('.external-markdown');
var meta=document.querySelector('.doc-meta');
if(!toggle||!box)return;
var loaded=box.dataset.loaded==='true';
toggle.addEventListener('click',function(){
 if(toggle.getAttribute('aria-pressed')==='true'){
  box.hidden=true;toggle.setAttribute('aria-pressed','false');toggle.textContent='Show doc';return;
 }
 box.hidden=false;toggle.setAttribute('aria-pressed','true');toggle.textContent='Hide doc';
 if(loaded)return;
 toggle.disabled=true;
 fetch(toggle.dataset.src,{cache:'no-cache'}).then(function(r){
  if(!r.ok)throw new Error('HTTP '+r.status);return r.text();
 }).then(function(md){
  var m=md.match(/^#\s+(.*)/m);if(m&&meta)meta.textContent=m[1];
  var pre=document.createElement('pre');pre.className='doc-md';pre.textContent=md;
  box.textContent='';box.appendChild(pre);loaded=true;
 }).catch(function(){
  box.innerHTML='<p class="subtle">Unable to load document.</p>';
 }).then(function(){toggle.disabled=false;});
});
})();"#;

/// Escape text for HTML element and attribute content.
pub fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// JSON for a `<script type="application/json">` block (no `</script>` breakout).
fn script_json<T: serde::Serialize>(v: &T) -> String {
    serde_json::to_string(v)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/")
}

pub struct HtmlBuilder {
    buf: String,
}

impl Default for HtmlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlBuilder {
    pub fn new() -> Self {
        Self { buf: String::with_capacity(32 * 1024) }
    }

    pub fn start(&mut self, title: &str) {
        let _ = write!(
            self.buf,
            "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
             <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\
             <title>{t}</title><style>{STYLE}</style></head><body><h1>{t}</h1>",
            t = esc(title)
        );
    }

    pub fn finish(mut self) -> String {
        let _ = write!(self.buf, "<script>{SCRIPT}</script></body></html>");
        self.buf
    }

    fn error_line<T>(&mut self, section: &Section<T>) {
        if let Some(e) = &section.error {
            let _ = write!(self.buf, "<p class=\"err\">{}</p>", esc(e));
        }
    }

    pub fn section_kpis(&mut self, kpis: &Section<KpiCard>) {
        self.buf.push_str("<section id=\"kpis\"><h2>Key figures</h2><div class=\"grid\" id=\"kpi-grid\">");
        for c in &kpis.items {
            let _ = write!(
                self.buf,
                "<div class=\"kpi\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
                esc(c.label),
                esc(&c.value)
            );
        }
        self.buf.push_str("</div>");
        self.error_line(kpis);
        self.buf.push_str("</section>");
    }

    pub fn section_bars(&mut self, bars: &Section<Bar>) {
        self.buf.push_str("<section id=\"chart\"><h2>Purchase rates</h2><div class=\"bars\" id=\"bars\">");
        for b in &bars.items {
            let _ = write!(
                self.buf,
                "<div class=\"bar\"><div class=\"fill\" style=\"height:{}%\"></div><div class=\"caption\">{}</div></div>",
                b.height_pct,
                esc(&b.caption)
            );
        }
        self.buf.push_str("</div>");
        self.error_line(bars);
        self.buf.push_str("</section>");
    }

    pub fn section_rules(&mut self, rules: &Section<RuleRow>) {
        self.buf.push_str(
            "<section id=\"rules\"><h2>Association rules</h2><table id=\"rules-table\"><thead><tr>\
             <th>#</th><th>Antecedent</th><th>Consequent</th><th>Support</th><th>Confidence</th><th>Lift</th>\
             </tr></thead><tbody>",
        );
        for r in &rules.items {
            let _ = write!(
                self.buf,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                r.index,
                esc(&r.antecedent),
                esc(&r.consequent),
                esc(&r.support),
                esc(&r.confidence),
                esc(&r.lift)
            );
        }
        self.buf.push_str("</tbody></table>");
        self.error_line(rules);
        self.buf.push_str("</section>");
    }

    pub fn section_roi(&mut self, roi: &RoiBlock) {
        self.buf.push_str("<section id=\"roi\"><h2>ROI estimate</h2>");
        let (rate, lift) = match &roi.readout {
            RoiReadout::Ready { capture_rate, lift, .. } => (*capture_rate, lift.as_str()),
            RoiReadout::Unavailable { .. } => (0.0, ""),
        };
        let disabled = if roi.readout.is_ready() { "" } else { " disabled" };
        let _ = write!(
            self.buf,
            "<label for=\"capture-rate\">Capture rate</label> \
             <input type=\"range\" id=\"capture-rate\" min=\"0\" max=\"100\" step=\"1\" value=\"{rate}\"{disabled}>\
             <p id=\"roi-readout\" data-lift=\"{}\">{}</p>\
             <p class=\"subtle\">Assumes {} item(s) per basket and {} margin per unit.</p>",
            esc(lift),
            esc(&roi.readout.text()),
            roi.avg_basket,
            esc(&format!("{}{}", roi.currency, roi.margin_per_unit)),
        );
        let _ = write!(
            self.buf,
            "<script type=\"application/json\" id=\"roi-sweep\">{}</script></section>",
            script_json(&roi.sweep)
        );
    }

    pub fn section_doc(&mut self, doc: &DocView) {
        let (title, body, hidden) = match &doc.state {
            DocState::Closed => (None, String::new(), true),
            DocState::Loading => (None, String::new(), false),
            DocState::Open { title, html } => (title.as_deref(), html.clone(), false),
            DocState::Error { message } => (None, format!("<p class=\"subtle\">{}</p>", esc(message)), false),
        };
        let loaded = matches!(doc.state, DocState::Open { .. });
        let _ = write!(
            self.buf,
            "<section id=\"doc\"><button type=\"button\" class=\"doc-toggle\" data-src=\"{}\" aria-pressed=\"{}\"{}>{}</button>\
             <div class=\"doc-meta\">{}</div>\
             <div class=\"external-markdown\" data-loaded=\"{loaded}\"{}>{body}</div></section>",
            esc(&doc.source),
            doc.aria_pressed,
            if doc.disabled { " disabled" } else { "" },
            esc(doc.button_label),
            esc(title.unwrap_or("")),
            if hidden { " hidden" } else { "" },
        );
    }

    pub fn section_cta(&mut self, cta: &CtaBlock) {
        if cta.enabled {
            let _ = write!(
                self.buf,
                "<section id=\"cta\"><a class=\"cta\" href=\"{}\">{}</a></section>",
                esc(&cta.href),
                esc(cta.label)
            );
        } else {
            let _ = write!(
                self.buf,
                "<section id=\"cta\"><a class=\"cta\" aria-disabled=\"true\">{}</a> <span class=\"subtle\">{}</span></section>",
                esc(cta.label),
                esc(cta.hint.unwrap_or(""))
            );
        }
    }

    pub fn footer(&mut self, provenance: &[Provenance]) {
        if provenance.is_empty() {
            return;
        }
        self.buf.push_str("<footer><ul>");
        for p in provenance {
            let _ = write!(
                self.buf,
                "<li>{} <code title=\"sha256:{}\">sha256:{}</code> <span class=\"subtle\">{}</span></li>",
                esc(&p.name),
                esc(&p.sha256),
                esc(short_hex(&p.sha256, DIGEST_DISPLAY_CHARS)),
                esc(&p.source)
            );
        }
        self.buf.push_str("</ul></footer>");
    }
}

pub fn render_html(model: &ReportModel) -> String {
    let mut b = HtmlBuilder::new();
    b.start(&model.title);
    b.section_kpis(&model.kpis);
    b.section_bars(&model.bars);
    b.section_rules(&model.rules);
    b.section_roi(&model.roi);
    b.section_doc(&model.doc);
    b.section_cta(&model.cta);
    b.footer(&model.provenance);
    b.finish()
}
