//! crates/mb_report/src/lib.rs
//! Presentation layer for the basket report.
//!
//! - `state`: loaded documents, typed UI events, the `Dashboard` dispatcher
//! - `structure`: display-ready view model built from dashboard state
//! - `doc_panel`: show/hide state machine for the explanatory document
//! - `render_html` / `render_json` / `render_text`: pure renderers
//!
//! No I/O happens here; fetching is requested through `state::Command`.

#![forbid(unsafe_code)]

use core::fmt;

pub mod doc_panel;
pub mod render_html;
pub mod render_json;
pub mod render_text;
pub mod state;
pub mod structure;

pub use doc_panel::{DocIntent, DocPanel, DocState, MarkdownRenderer, PreformattedMarkdown};
pub use render_html::render_html;
pub use render_json::{render_json, render_json_string};
pub use render_text::render_text;
pub use state::{load_failed_message, Command, Dashboard, DashboardState, UiEvent};
pub use structure::{build_model, CtaBlock, DocView, ReportModel, RoiReadout};

#[derive(Debug)]
pub enum ReportError {
    Serialize(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Serialize(m) => write!(f, "serialize: {m}"),
        }
    }
}

impl std::error::Error for ReportError {}
