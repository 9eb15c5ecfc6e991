//! crates/mb_io/src/lib.rs
//! I/O crate for the basket report.
//!
//! - Shared error type (`LoadError`) used by every loader and writer.
//! - Sources are local paths or `http(s)://` URLs; HTTP reads disable caching.
//! - Each document load is independent; callers decide how to degrade.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for mb_io.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Transport, HTTP status, or filesystem read failure for one document.
    #[error("fetch {path} failed: {cause}")]
    Fetch { path: String, cause: String },

    /// Document read fine but has the wrong top-level shape or is not JSON/UTF-8.
    #[error("malformed {path}: {msg}")]
    Malformed { path: String, msg: String },

    /// Config file unreadable or invalid.
    #[error("config error: {0}")]
    Config(String),

    /// Output write failure (create_dir_all, rename, fsync, etc.)
    #[error("write error: {0}")]
    Write(String),
}

impl LoadError {
    /// The document path/URL this error is about, when there is one.
    pub fn path(&self) -> Option<&str> {
        match self {
            LoadError::Fetch { path, .. } | LoadError::Malformed { path, .. } => Some(path),
            LoadError::Config(_) | LoadError::Write(_) => None,
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;

pub(crate) fn fetch_err(path: &str, cause: impl std::fmt::Display) -> LoadError {
    LoadError::Fetch { path: path.to_string(), cause: cause.to_string() }
}

pub(crate) fn malformed(path: &str, msg: impl std::fmt::Display) -> LoadError {
    LoadError::Malformed { path: path.to_string(), msg: msg.to_string() }
}

pub mod config;
pub mod documents;
pub mod fetch;
pub mod hasher;
pub mod loader;
pub mod output;
pub mod probe;
pub mod source;

pub mod prelude {
    pub use crate::{LoadError, LoadResult};

    pub use crate::config::{load_config, ReportConfig};
    pub use crate::fetch::Fetcher;
    pub use crate::loader::{load_dashboard, load_rules, load_summary, load_text, DashboardLoad, Loaded};
    pub use crate::probe::probe_any;
    pub use crate::source::Source;
}
