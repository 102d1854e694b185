//! # Engine Settings
//!
//! Tunable constants of the quotation engine. The defaults are the shop's
//! reference values (40 mm frame engagement, 10% labor, 30% margin); a
//! workshop can override any of them from a TOML file.
//!
//! ## TOML Example
//!
//! ```toml
//! frame_allowance_mm = 40.0
//! labor_rate = 0.10
//! margin_rate = 0.30
//! max_width_mm = 6000.0
//! ```
//!
//! Keys that are left out keep their default value.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Tunable constants of a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Glass engagement lost to the frame and to each side of a divider (mm)
    pub frame_allowance_mm: f64,

    /// Labor as a fraction of total material cost
    pub labor_rate: f64,

    /// Margin as a fraction of materials + labor
    pub margin_rate: f64,

    pub min_width_mm: f64,
    pub max_width_mm: f64,
    pub min_height_mm: f64,
    pub max_height_mm: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            frame_allowance_mm: 40.0,
            labor_rate: 0.10,
            margin_rate: 0.30,
            min_width_mm: 200.0,
            max_width_mm: 6000.0,
            min_height_mm: 200.0,
            max_height_mm: 4000.0,
        }
    }
}

impl EngineSettings {
    /// Parse settings from TOML text, defaulting missing keys.
    pub fn from_toml_str(text: &str) -> CalcResult<Self> {
        let settings: EngineSettings = toml::from_str(text).map_err(|e| CalcError::serialization(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Builder: override the margin rate (fraction, e.g. 0.25)
    pub fn with_margin_rate(mut self, margin_rate: f64) -> Self {
        self.margin_rate = margin_rate;
        self
    }

    /// Margin expressed as a percentage, as reported in results
    pub fn margin_percent(&self) -> f64 {
        self.margin_rate * 100.0
    }

    /// Validate settings values.
    pub fn validate(&self) -> CalcResult<()> {
        // Leaf and divider counts are bounded through the allowance
        if !self.frame_allowance_mm.is_finite() || self.frame_allowance_mm <= 0.0 {
            return Err(CalcError::invalid_input(
                "frame_allowance_mm",
                self.frame_allowance_mm.to_string(),
                "Must be a positive number",
            ));
        }

        let non_negative = [
            ("labor_rate", self.labor_rate),
            ("margin_rate", self.margin_rate),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Must be a non-negative number",
                ));
            }
        }

        let bounds = [
            ("min_width_mm", self.min_width_mm, self.max_width_mm),
            ("min_height_mm", self.min_height_mm, self.max_height_mm),
        ];
        for (field, min, max) in bounds {
            if !(min > 0.0 && min <= max) {
                return Err(CalcError::invalid_input(
                    field,
                    format!("{}..{}", min, max),
                    "Bounds must be positive and ordered",
                ));
            }
        }
        Ok(())
    }
}
