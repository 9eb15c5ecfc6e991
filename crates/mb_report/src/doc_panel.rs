//! Explanatory document panel: a show/hide toggle over a lazily fetched
//! markdown file.
//!
//! Transitions:
//!
//! | state      | event            | next                 | fetch? |
//! |------------|------------------|----------------------|--------|
//! | Closed     | Open (cached)    | Open                 | no     |
//! | Closed     | Open (no cache)  | Loading              | yes    |
//! | Loading    | any toggle       | Loading              | no     |
//! | Loading    | fetched Ok       | Open (cached)        | no     |
//! | Loading    | fetched Err      | Error                | no     |
//! | Open/Error | Close            | Closed               | no     |
//! | Error      | Open             | Loading              | yes    |
//!
//! A failed load is never cached, so reopening after an error fetches again.

use log::debug;
use serde::Serialize;

use crate::render_html::esc;

pub const LOAD_FAILED_MESSAGE: &str = "Unable to load document.";

/// Converts markdown to display-safe HTML. Implementations must sanitize.
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> String;
}

/// Built-in fallback: the raw markdown, escaped, inside a `<pre>` block.
#[derive(Clone, Copy, Debug, Default)]
pub struct PreformattedMarkdown;

impl MarkdownRenderer for PreformattedMarkdown {
    fn render(&self, markdown: &str) -> String {
        format!("<pre class=\"doc-md\">{}</pre>", esc(markdown))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocIntent {
    Open,
    Close,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DocState {
    Closed,
    Loading,
    Open { title: Option<String>, html: String },
    Error { message: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct RenderedDoc {
    title: Option<String>,
    html: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocPanel {
    state: DocState,
    cache: Option<RenderedDoc>,
}

impl Default for DocPanel {
    fn default() -> Self {
        Self { state: DocState::Closed, cache: None }
    }
}

impl DocPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DocState {
        &self.state
    }

    /// Apply a toggle. Returns true when the caller must start a fetch.
    pub fn toggle(&mut self, intent: DocIntent) -> bool {
        let (next, fetch) = match (&self.state, intent) {
            (DocState::Loading, _) => {
                debug!("doc panel: toggle ignored while loading");
                return false;
            }
            (DocState::Closed | DocState::Error { .. }, DocIntent::Open) => match &self.cache {
                Some(doc) => (DocState::Open { title: doc.title.clone(), html: doc.html.clone() }, false),
                None => (DocState::Loading, true),
            },
            (DocState::Open { .. } | DocState::Error { .. }, DocIntent::Close) => (DocState::Closed, false),
            (DocState::Open { .. }, DocIntent::Open) | (DocState::Closed, DocIntent::Close) => return false,
        };
        self.state = next;
        fetch
    }

    /// Deliver a fetch outcome. Outcomes arriving outside `Loading` are stale and dropped.
    pub fn fetched(&mut self, outcome: Result<String, String>, renderer: &dyn MarkdownRenderer) {
        if self.state != DocState::Loading {
            debug!("doc panel: dropping stale fetch result");
            return;
        }
        self.state = match outcome {
            Ok(markdown) => {
                let doc = RenderedDoc { title: extract_title(&markdown), html: renderer.render(&markdown) };
                let open = DocState::Open { title: doc.title.clone(), html: doc.html.clone() };
                self.cache = Some(doc);
                open
            }
            Err(cause) => {
                debug!("doc panel: load failed: {cause}");
                DocState::Error { message: LOAD_FAILED_MESSAGE.to_string() }
            }
        };
    }

    /// The intent a click on the toggle button expresses right now.
    pub fn click_intent(&self) -> DocIntent {
        if self.aria_pressed() {
            DocIntent::Close
        } else {
            DocIntent::Open
        }
    }

    pub fn aria_pressed(&self) -> bool {
        self.state != DocState::Closed
    }

    pub fn button_label(&self) -> &'static str {
        if self.aria_pressed() {
            "Hide doc"
        } else {
            "Show doc"
        }
    }

    pub fn button_disabled(&self) -> bool {
        self.state == DocState::Loading
    }
}

/// Text of the first `# ` heading line, if any.
///
/// The heading and its text must share a line: a bare `#` line followed by
/// text on the next line is not a title, and neither is a heading with only
/// whitespace after the `#`.
pub fn extract_title(markdown: &str) -> Option<String> {
    markdown.lines().find_map(|line| {
        let rest = line.strip_prefix('#')?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let title = rest.trim();
        (!title.is_empty()).then(|| title.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MD: &str = "intro\n## Not this\n# Shelf placement plan\n\nMove oil next to bread.\n";

    fn open_loaded() -> DocPanel {
        let mut p = DocPanel::new();
        assert!(p.toggle(DocIntent::Open));
        p.fetched(Ok(MD.to_string()), &PreformattedMarkdown);
        p
    }

    #[test]
    fn first_open_fetches_then_renders() {
        let mut p = DocPanel::new();
        assert_eq!(p.button_label(), "Show doc");
        assert!(!p.aria_pressed());

        assert!(p.toggle(DocIntent::Open));
        assert_eq!(p.state(), &DocState::Loading);
        assert!(p.aria_pressed());
        assert!(p.button_disabled());

        p.fetched(Ok(MD.to_string()), &PreformattedMarkdown);
        match p.state() {
            DocState::Open { title, html } => {
                assert_eq!(title.as_deref(), Some("Shelf placement plan"));
                assert!(html.starts_with("<pre class=\"doc-md\">"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(p.button_label(), "Hide doc");
    }

    #[test]
    fn toggles_are_ignored_while_loading() {
        let mut p = DocPanel::new();
        p.toggle(DocIntent::Open);
        assert!(!p.toggle(DocIntent::Close));
        assert!(!p.toggle(DocIntent::Open));
        assert_eq!(p.state(), &DocState::Loading);
    }

    #[test]
    fn reopen_uses_cache() {
        let mut p = open_loaded();
        assert!(!p.toggle(DocIntent::Close));
        assert_eq!(p.state(), &DocState::Closed);
        assert!(!p.toggle(DocIntent::Open));
        assert!(matches!(p.state(), DocState::Open { .. }));
    }

    #[test]
    fn failure_is_not_cached() {
        let mut p = DocPanel::new();
        p.toggle(DocIntent::Open);
        p.fetched(Err("HTTP 404".into()), &PreformattedMarkdown);
        assert_eq!(p.state(), &DocState::Error { message: LOAD_FAILED_MESSAGE.into() });
        assert!(p.aria_pressed());
        assert_eq!(p.click_intent(), DocIntent::Close);

        // Retry straight from the error state.
        assert!(p.toggle(DocIntent::Open));
        assert_eq!(p.state(), &DocState::Loading);

        // Or close, then reopen: still refetches.
        p.fetched(Err("again".into()), &PreformattedMarkdown);
        p.toggle(DocIntent::Close);
        assert!(p.toggle(DocIntent::Open));
    }

    #[test]
    fn stale_results_are_dropped() {
        let mut p = DocPanel::new();
        p.fetched(Ok(MD.to_string()), &PreformattedMarkdown);
        assert_eq!(p.state(), &DocState::Closed);
        // Nothing was cached either.
        assert!(p.toggle(DocIntent::Open));
    }

    #[test]
    fn fallback_escapes_markup() {
        let html = PreformattedMarkdown.render("<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn title_needs_single_hash_and_space() {
        assert_eq!(extract_title("#NoSpace\n#  Spaced  \n").as_deref(), Some("Spaced"));
        assert_eq!(extract_title("## Sub only"), None);
        assert_eq!(extract_title(""), None);
    }

    #[test]
    fn title_never_spans_lines() {
        assert_eq!(extract_title("#\nReal title\n"), None);
        assert_eq!(extract_title("#   \nReal title\n# Later\n").as_deref(), Some("Later"));
    }
}
