//! mb_core: core types, ROI estimator, assumptions and display formatting.
//!
//! This crate is **I/O-free**. It defines the stable types/APIs used across
//! the report workspace (`mb_io`, `mb_report`, `mb_cli`).
//!
//! - Data model: `Summary`, `Rule`, `RuleList`, `RuleMetrics`
//! - ROI estimator: pure, total over the neutral sentinel rule
//! - Assumptions: capture rate / basket size / unit margin with domain checks
//! - Formatting: fixed decimals, percents, grouped integers, currency
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        /// A field needed for a computation was absent in the loaded document.
        MissingField(&'static str),
        DomainOutOfRange(&'static str),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::MissingField(k) => write!(f, "missing field: {k}"),
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
            }
        }
    }

    impl std::error::Error for CoreError {}
}

pub mod assumptions;
pub mod format;
pub mod model;
pub mod roi;

pub use assumptions::RoiAssumptions;
pub use errors::CoreError;
pub use model::{Rule, RuleList, RuleMetrics, Summary, NEUTRAL_RULE};
pub use roi::{estimate, estimate_top, sweep, traffic, RoiResult, EPSILON};
