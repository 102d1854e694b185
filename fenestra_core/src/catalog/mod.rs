//! # Catalog
//!
//! Catalog entities consumed by the quotation engine: material systems,
//! their profiles, hardware and glass. The catalog store itself (CRUD,
//! seeding) lives outside the engine; this module only defines the records
//! and the read-only [`CatalogLookup`] seam the engine resolves them through.
//!
//! ## Example
//!
//! ```rust
//! use fenestra_core::catalog::{MaterialKind, MaterialSystem};
//!
//! let system = MaterialSystem::new("alu-45", "Alu-Serie 45", MaterialKind::Aluminum)
//!     .with_tag("thermal-break");
//! assert!(system.tags.contains("thermal-break"));
//! ```

pub mod lookup;

pub use lookup::{resolve, CatalogLookup, CatalogSnapshot, ResolvedCatalog};

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::calculations::OpeningType;
use crate::errors::{CalcError, CalcResult};

/// Glass weight per m² for each mm of thickness (float glass, 2500 kg/m³)
pub const GLASS_KG_PER_M2_PER_MM: f64 = 2.5;

// ============================================================================
// Material systems
// ============================================================================

/// Base material of a profile system
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Aluminum,
    Upvc,
    Wood,
    Steel,
}

impl MaterialKind {
    /// All material kinds for UI selection
    pub const ALL: [MaterialKind; 4] = [
        MaterialKind::Aluminum,
        MaterialKind::Upvc,
        MaterialKind::Wood,
        MaterialKind::Steel,
    ];

    /// Wire code (e.g., "upvc")
    pub fn code(&self) -> &'static str {
        match self {
            MaterialKind::Aluminum => "aluminum",
            MaterialKind::Upvc => "upvc",
            MaterialKind::Wood => "wood",
            MaterialKind::Steel => "steel",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            MaterialKind::Aluminum => "Aluminum",
            MaterialKind::Upvc => "uPVC",
            MaterialKind::Wood => "Wood",
            MaterialKind::Steel => "Steel",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "aluminum" | "aluminium" | "alu" => Ok(MaterialKind::Aluminum),
            "upvc" | "pvc" | "u-pvc" => Ok(MaterialKind::Upvc),
            "wood" | "timber" => Ok(MaterialKind::Wood),
            "steel" => Ok(MaterialKind::Steel),
            _ => Err(CalcError::not_found("MaterialKind", s)),
        }
    }
}

impl std::fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A coordinated family of profiles sharing a material and compatibility tags.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "upvc-70",
///   "name": "uPVC-Serie 70",
///   "kind": "upvc",
///   "tags": ["euro-groove"],
///   "compatible_openings": ["casement", "turn_tilt", "sliding"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSystem {
    pub id: String,
    pub name: String,
    pub kind: MaterialKind,

    /// Compatibility tags matched against `Hardware::required_tags`
    #[serde(default)]
    pub tags: BTreeSet<String>,

    /// Opening types this system is built for. Empty means no restriction.
    #[serde(default)]
    pub compatible_openings: BTreeSet<OpeningType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MaterialSystem {
    /// Create a system with no tags and no opening restriction
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: MaterialKind) -> Self {
        MaterialSystem {
            id: id.into(),
            name: name.into(),
            kind,
            tags: BTreeSet::new(),
            compatible_openings: BTreeSet::new(),
            description: None,
        }
    }

    /// Builder: add a compatibility tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Builder: restrict the system to the given opening types
    pub fn with_openings(mut self, openings: impl IntoIterator<Item = OpeningType>) -> Self {
        self.compatible_openings.extend(openings);
        self
    }

    /// Whether the system can be built with this opening type
    pub fn supports(&self, opening_type: OpeningType) -> bool {
        self.compatible_openings.is_empty() || self.compatible_openings.contains(&opening_type)
    }
}

// ============================================================================
// Profiles
// ============================================================================

/// The structural job a profile does within the unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileRole {
    Frame,
    Sash,
    Mullion,
    Transom,
}

impl ProfileRole {
    /// All roles, in BOM order
    pub const ALL: [ProfileRole; 4] = [
        ProfileRole::Frame,
        ProfileRole::Sash,
        ProfileRole::Mullion,
        ProfileRole::Transom,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ProfileRole::Frame => "frame",
            ProfileRole::Sash => "sash",
            ProfileRole::Mullion => "mullion",
            ProfileRole::Transom => "transom",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProfileRole::Frame => "Frame",
            ProfileRole::Sash => "Sash",
            ProfileRole::Mullion => "Mullion",
            ProfileRole::Transom => "Transom",
        }
    }
}

impl std::fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A linear profile sold by the meter.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "alu-45-frame",
///   "system_id": "alu-45",
///   "role": "frame",
///   "code": "ALU-F45",
///   "cost_per_m": 15.5,
///   "weight_per_m": 1.2
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub system_id: String,
    pub role: ProfileRole,

    /// Article code in the supplier catalog
    #[serde(default)]
    pub code: String,

    /// Cost per linear meter
    pub cost_per_m: f64,

    /// Weight per linear meter (kg/m)
    pub weight_per_m: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Profile {
    /// BOM line description, e.g. "Marco aluminio 45mm - ALU-F45"
    pub fn bom_description(&self) -> String {
        let name = self
            .description
            .clone()
            .unwrap_or_else(|| format!("{} profile", self.role.display_name()));
        if self.code.is_empty() {
            name
        } else {
            format!("{} - {}", name, self.code)
        }
    }
}

// ============================================================================
// Hardware
// ============================================================================

/// Functional category of a hardware item. Selection picks one item per
/// required category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HardwareCategory {
    Hinge,
    Handle,
    Lock,
    Roller,
    Other,
}

impl HardwareCategory {
    pub fn code(&self) -> &'static str {
        match self {
            HardwareCategory::Hinge => "hinge",
            HardwareCategory::Handle => "handle",
            HardwareCategory::Lock => "lock",
            HardwareCategory::Roller => "roller",
            HardwareCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for HardwareCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A hardware item with explicit compatibility sets.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "hw-roller-std",
///   "name": "Roller carriage",
///   "category": "roller",
///   "unit_cost": 9.4,
///   "unit_weight_kg": 0.3,
///   "compatible_openings": ["sliding"],
///   "compatible_materials": ["aluminum", "upvc"],
///   "max_leaf_width_mm": 1500.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hardware {
    pub id: String,
    pub name: String,
    pub category: HardwareCategory,
    pub unit_cost: f64,

    #[serde(default)]
    pub unit_weight_kg: f64,

    pub compatible_openings: BTreeSet<OpeningType>,
    pub compatible_materials: BTreeSet<MaterialKind>,

    /// When non-empty, the material system must carry at least one of these tags
    #[serde(default)]
    pub required_tags: BTreeSet<String>,

    /// Widest leaf the item is rated for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_leaf_width_mm: Option<f64>,

    /// Tallest leaf the item is rated for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_leaf_height_mm: Option<f64>,
}

impl Hardware {
    /// Create an item compatible with nothing; use the builders to open it up
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: HardwareCategory, unit_cost: f64) -> Self {
        Hardware {
            id: id.into(),
            name: name.into(),
            category,
            unit_cost,
            unit_weight_kg: 0.0,
            compatible_openings: BTreeSet::new(),
            compatible_materials: BTreeSet::new(),
            required_tags: BTreeSet::new(),
            max_leaf_width_mm: None,
            max_leaf_height_mm: None,
        }
    }

    /// Builder: set unit weight
    pub fn with_weight(mut self, unit_weight_kg: f64) -> Self {
        self.unit_weight_kg = unit_weight_kg;
        self
    }

    /// Builder: add compatible opening types
    pub fn for_openings(mut self, openings: impl IntoIterator<Item = OpeningType>) -> Self {
        self.compatible_openings.extend(openings);
        self
    }

    /// Builder: add compatible material kinds
    pub fn for_materials(mut self, kinds: impl IntoIterator<Item = MaterialKind>) -> Self {
        self.compatible_materials.extend(kinds);
        self
    }

    /// Builder: require a system tag
    pub fn requiring_tag(mut self, tag: impl Into<String>) -> Self {
        self.required_tags.insert(tag.into());
        self
    }

    /// Builder: set per-leaf operating limits
    pub fn with_leaf_limits(mut self, max_width_mm: Option<f64>, max_height_mm: Option<f64>) -> Self {
        self.max_leaf_width_mm = max_width_mm;
        self.max_leaf_height_mm = max_height_mm;
        self
    }

    /// Set-membership compatibility check against an opening and a system
    pub fn is_compatible(&self, opening_type: OpeningType, system: &MaterialSystem) -> bool {
        self.compatible_openings.contains(&opening_type)
            && self.compatible_materials.contains(&system.kind)
            && (self.required_tags.is_empty() || !self.required_tags.is_disjoint(&system.tags))
    }

    /// Whether a leaf of the given size is within the item's rating
    pub fn fits_leaf(&self, leaf_width_mm: f64, leaf_height_mm: f64) -> bool {
        self.max_leaf_width_mm.map_or(true, |max| leaf_width_mm <= max)
            && self.max_leaf_height_mm.map_or(true, |max| leaf_height_mm <= max)
    }
}

// ============================================================================
// Glass
// ============================================================================

/// Optional manufacturing limits for a single glazed cell (mm)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GlassSizeLimits {
    #[serde(default)]
    pub min_width_mm: Option<f64>,
    #[serde(default)]
    pub max_width_mm: Option<f64>,
    #[serde(default)]
    pub min_height_mm: Option<f64>,
    #[serde(default)]
    pub max_height_mm: Option<f64>,
}

/// A glazing unit sold by the square meter.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "dg-4-16-4",
///   "description": "4-16-4 Doble Acrist.",
///   "glass_type": "double",
///   "thickness_mm": 24.0,
///   "u_value": 2.6,
///   "cost_per_m2": 32.8
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glass {
    pub id: String,
    pub description: String,

    /// Family label (double, triple, laminated...)
    #[serde(default)]
    pub glass_type: String,

    /// Total build-up thickness (mm)
    pub thickness_mm: f64,

    /// Thermal transmittance (W/m²K)
    pub u_value: f64,

    pub cost_per_m2: f64,

    /// Explicit weight per m². Derived from thickness when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_per_m2: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_limits: Option<GlassSizeLimits>,
}

impl Glass {
    /// Weight per square meter in kg
    pub fn weight_per_m2(&self) -> f64 {
        self.weight_per_m2
            .unwrap_or(self.thickness_mm * GLASS_KG_PER_M2_PER_MM)
    }

    /// Check one glazed cell against the manufacturing limits
    pub fn check_cell(&self, cell_width_mm: f64, cell_height_mm: f64) -> CalcResult<()> {
        let Some(limits) = self.size_limits else {
            return Ok(());
        };
        let checks = [
            ("glass cell width", cell_width_mm, limits.min_width_mm, limits.max_width_mm),
            ("glass cell height", cell_height_mm, limits.min_height_mm, limits.max_height_mm),
        ];
        for (field, value, min, max) in checks {
            if let Some(min) = min.filter(|min| value < *min) {
                return Err(CalcError::invalid_dimension(
                    field,
                    format!("{:.1}", value),
                    format!("Below {} minimum of {} mm", self.description, min),
                ));
            }
            if let Some(max) = max.filter(|max| value > *max) {
                return Err(CalcError::invalid_dimension(
                    field,
                    format!("{:.1}", value),
                    format!("Exceeds {} maximum of {} mm", self.description, max),
                ));
            }
        }
        Ok(())
    }
}
