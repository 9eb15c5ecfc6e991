//! Dashboard state and typed UI events.
//!
//! `Dashboard` is the single writer of the capture rate and of the document
//! panel. `dispatch` updates state, then calls the registered listeners
//! synchronously before returning, so a readout is never computed from a
//! half-applied event. The only side effect it can request is a document
//! fetch, returned as a [`Command`] for the caller to run.

use log::debug;
use mb_core::model::{RuleList, Summary};
use mb_core::RoiAssumptions;
use mb_io::loader::DashboardLoad;
use mb_io::source::Source;

use crate::doc_panel::{DocIntent, DocPanel, MarkdownRenderer, PreformattedMarkdown};
use crate::structure::{build_model, roi_readout, CtaBlock, DocView, Provenance, ReportModel, RoiReadout};

/// Inline message shown in place of a section whose document failed.
pub fn load_failed_message(file: &str) -> String {
    format!("Load {file} failed. Run shelf_op.py first.")
}

/// Loaded documents (read-only after construction) and per-document errors.
#[derive(Clone, Debug, Default)]
pub struct DashboardState {
    /// Set once both load attempts have finished, whatever their outcome.
    pub loaded: bool,
    pub summary: Option<Summary>,
    pub rules: Option<RuleList>,
    pub summary_error: Option<String>,
    pub rules_error: Option<String>,
    pub provenance: Vec<Provenance>,
}

impl DashboardState {
    pub fn from_load(load: DashboardLoad, summary_src: &Source, rules_src: &Source) -> Self {
        let mut st = DashboardState { loaded: true, ..Default::default() };

        match load.summary {
            Ok(doc) => {
                st.provenance.push(Provenance {
                    name: summary_src.file_name(),
                    source: doc.source,
                    sha256: doc.sha256,
                });
                st.summary = Some(doc.value);
            }
            Err(_) => st.summary_error = Some(load_failed_message(&summary_src.file_name())),
        }
        match load.rules {
            Ok(doc) => {
                st.provenance.push(Provenance {
                    name: rules_src.file_name(),
                    source: doc.source,
                    sha256: doc.sha256,
                });
                st.rules = Some(doc.value);
            }
            Err(_) => st.rules_error = Some(load_failed_message(&rules_src.file_name())),
        }
        st
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    /// Slider moved (percent).
    CaptureRate(f64),
    DocToggle(DocIntent),
    /// Outcome of a previously requested [`Command::FetchDoc`]: markdown or an error cause.
    DocFetched(Result<String, String>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    FetchDoc(String),
}

type ReadoutListener = Box<dyn FnMut(&RoiReadout)>;
type DocListener = Box<dyn FnMut(&DocPanel)>;

pub struct Dashboard {
    state: DashboardState,
    assumptions: RoiAssumptions,
    currency: String,
    doc_source: String,
    doc: DocPanel,
    renderer: Box<dyn MarkdownRenderer>,
    readout: RoiReadout,
    readout_listeners: Vec<ReadoutListener>,
    doc_listeners: Vec<DocListener>,
}

impl Dashboard {
    pub fn new(
        state: DashboardState,
        assumptions: RoiAssumptions,
        currency: impl Into<String>,
        doc_source: impl Into<String>,
    ) -> Self {
        let currency = currency.into();
        let readout = roi_readout(&state, &assumptions, &currency);
        Self {
            state,
            assumptions,
            currency,
            doc_source: doc_source.into(),
            doc: DocPanel::new(),
            renderer: Box::new(PreformattedMarkdown),
            readout,
            readout_listeners: Vec::new(),
            doc_listeners: Vec::new(),
        }
    }

    /// Replace the markdown converter (the default escapes into `<pre>`).
    pub fn with_markdown_renderer(mut self, renderer: Box<dyn MarkdownRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn on_readout(&mut self, listener: impl FnMut(&RoiReadout) + 'static) {
        self.readout_listeners.push(Box::new(listener));
    }

    pub fn on_doc_panel(&mut self, listener: impl FnMut(&DocPanel) + 'static) {
        self.doc_listeners.push(Box::new(listener));
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn assumptions(&self) -> &RoiAssumptions {
        &self.assumptions
    }

    pub fn readout(&self) -> &RoiReadout {
        &self.readout
    }

    pub fn doc_panel(&self) -> &DocPanel {
        &self.doc
    }

    pub fn dispatch(&mut self, event: UiEvent) -> Vec<Command> {
        match event {
            UiEvent::CaptureRate(rate) => {
                if !rate.is_finite() {
                    debug!("capture rate {rate} ignored");
                    return Vec::new();
                }
                self.assumptions = self.assumptions.with_capture_rate(rate);
                self.readout = roi_readout(&self.state, &self.assumptions, &self.currency);
                for l in &mut self.readout_listeners {
                    l(&self.readout);
                }
                Vec::new()
            }
            UiEvent::DocToggle(intent) => {
                let before = self.doc.clone();
                let fetch = self.doc.toggle(intent);
                if self.doc != before {
                    self.notify_doc();
                }
                if fetch {
                    vec![Command::FetchDoc(self.doc_source.clone())]
                } else {
                    Vec::new()
                }
            }
            UiEvent::DocFetched(outcome) => {
                let before = self.doc.clone();
                self.doc.fetched(outcome, self.renderer.as_ref());
                if self.doc != before {
                    self.notify_doc();
                }
                Vec::new()
            }
        }
    }

    fn notify_doc(&mut self) {
        for l in &mut self.doc_listeners {
            l(&self.doc);
        }
    }

    /// View model of the current state.
    pub fn model(&self, cta: CtaBlock) -> ReportModel {
        build_model(
            &self.state,
            &self.assumptions,
            &self.currency,
            DocView::from_panel(&self.doc, &self.doc_source),
            cta,
        )
    }
}
