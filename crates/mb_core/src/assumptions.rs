//! ROI assumptions with safe defaults and domain checks.
//!
//! `capture_rate` is the slider value (percent). `avg_basket` scales the
//! transaction count into traffic. `margin_per_unit` is in currency units.

use crate::errors::CoreError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_CAPTURE_RATE: f64 = 50.0;
pub const DEFAULT_AVG_BASKET: f64 = 1.0;
pub const DEFAULT_MARGIN_PER_UNIT: f64 = 1.25;

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct RoiAssumptions {
    pub capture_rate: f64,
    pub avg_basket: f64,
    pub margin_per_unit: f64,
}

impl Default for RoiAssumptions {
    fn default() -> Self {
        Self {
            capture_rate: DEFAULT_CAPTURE_RATE,
            avg_basket: DEFAULT_AVG_BASKET,
            margin_per_unit: DEFAULT_MARGIN_PER_UNIT,
        }
    }
}

impl RoiAssumptions {
    pub fn validate_domains(&self) -> Result<(), CoreError> {
        if !self.capture_rate.is_finite() || !(0.0..=100.0).contains(&self.capture_rate) {
            return Err(CoreError::DomainOutOfRange("capture_rate"));
        }
        if !self.avg_basket.is_finite() || self.avg_basket <= 0.0 {
            return Err(CoreError::DomainOutOfRange("avg_basket"));
        }
        if !self.margin_per_unit.is_finite() || self.margin_per_unit < 0.0 {
            return Err(CoreError::DomainOutOfRange("margin_per_unit"));
        }
        Ok(())
    }

    /// Copy with a new slider value clamped to 0..=100. Non-finite input keeps
    /// the current value.
    pub fn with_capture_rate(self, capture_rate: f64) -> Self {
        if !capture_rate.is_finite() {
            return self;
        }
        Self { capture_rate: capture_rate.clamp(0.0, 100.0), ..self }
    }
}
