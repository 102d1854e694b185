//! # Window Calculations
//!
//! The quotation pipeline, one module per stage:
//!
//! - [`geometry`] - decompose the opening into cut-to-length profile segments
//! - [`glazing`] - glazed cells, glass area and assembly weight
//! - [`hardware`] - pick hardware per required category
//! - [`costing`] - price the BOM, then layer labor and margin
//! - [`window`] - `WindowConfig` input and the `calculate` entry point
//!
//! Every stage is a pure function over the validated [`Opening`] and the
//! [`ResolvedCatalog`](crate::catalog::ResolvedCatalog), so any number of
//! calculations can run in parallel without locking.

pub mod costing;
pub mod geometry;
pub mod glazing;
pub mod hardware;
pub mod window;

use serde::{Deserialize, Serialize};

use crate::catalog::HardwareCategory;
use crate::errors::{CalcError, CalcResult};

// Re-export commonly used types
pub use geometry::Segment;
pub use window::{calculate, calculate_resolved, Opening, WindowConfig};

/// Operating mechanism of the sash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningType {
    /// Side-hung, opens like a door (batiente)
    Casement,
    /// Top-hung, opens outward from the bottom (proyectante)
    Awning,
    /// Tilts from the bottom and turns on side hinges (oscilobatiente)
    TurnTilt,
    /// Leaves ride on rollers in the frame track (corredera)
    Sliding,
    /// Leaves hinged to each other, stacking to one side (plegable)
    Folding,
}

impl OpeningType {
    /// All opening types for UI selection
    pub const ALL: [OpeningType; 5] = [
        OpeningType::Casement,
        OpeningType::Awning,
        OpeningType::TurnTilt,
        OpeningType::Sliding,
        OpeningType::Folding,
    ];

    /// Wire code (e.g., "turn_tilt")
    pub fn code(&self) -> &'static str {
        match self {
            OpeningType::Casement => "casement",
            OpeningType::Awning => "awning",
            OpeningType::TurnTilt => "turn_tilt",
            OpeningType::Sliding => "sliding",
            OpeningType::Folding => "folding",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            OpeningType::Casement => "Casement",
            OpeningType::Awning => "Awning",
            OpeningType::TurnTilt => "Turn & Tilt",
            OpeningType::Sliding => "Sliding",
            OpeningType::Folding => "Folding",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "casement" | "batiente" => Ok(OpeningType::Casement),
            "awning" | "proyectante" => Ok(OpeningType::Awning),
            "turntilt" | "tiltturn" | "oscilobatiente" => Ok(OpeningType::TurnTilt),
            "sliding" | "corredera" => Ok(OpeningType::Sliding),
            "folding" | "plegable" => Ok(OpeningType::Folding),
            _ => Err(CalcError::not_found("OpeningType", s)),
        }
    }

    /// Hinged types carry meeting stiles between leaves; sliding leaves overlap instead
    pub fn is_hinged(&self) -> bool {
        !matches!(self, OpeningType::Sliding)
    }

    /// Hardware categories every unit of this type needs
    pub fn required_hardware(&self) -> &'static [HardwareCategory] {
        match self {
            OpeningType::Casement | OpeningType::Awning | OpeningType::TurnTilt | OpeningType::Folding => {
                &[HardwareCategory::Hinge, HardwareCategory::Handle, HardwareCategory::Lock]
            }
            OpeningType::Sliding => &[HardwareCategory::Roller, HardwareCategory::Lock],
        }
    }
}

impl std::fmt::Display for OpeningType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
