//! # Window Quotation
//!
//! Entry point of the engine: validates a [`WindowConfig`], resolves the
//! catalog records it references and runs the pipeline
//! (geometry → {glazing, hardware} → costing).
//!
//! ## Example
//!
//! ```rust
//! use fenestra_core::calculations::{calculate, OpeningType, WindowConfig};
//! use fenestra_core::catalog::{
//!     CatalogSnapshot, Glass, Hardware, HardwareCategory, MaterialKind, MaterialSystem, Profile, ProfileRole,
//! };
//! use fenestra_core::settings::EngineSettings;
//!
//! let profile = |role: ProfileRole, cost: f64| Profile {
//!     id: format!("pvc-{}", role),
//!     system_id: "pvc-70".to_string(),
//!     role,
//!     code: String::new(),
//!     cost_per_m: cost,
//!     weight_per_m: 1.8,
//!     description: None,
//! };
//! let hardware = |id: &str, category: HardwareCategory, cost: f64| {
//!     Hardware::new(id, id, category, cost)
//!         .for_openings([OpeningType::Casement])
//!         .for_materials([MaterialKind::Upvc])
//! };
//!
//! let catalog = CatalogSnapshot::new()
//!     .with_system(MaterialSystem::new("pvc-70", "uPVC-Serie 70", MaterialKind::Upvc))
//!     .with_profile(profile(ProfileRole::Frame, 18.9))
//!     .with_profile(profile(ProfileRole::Sash, 16.7))
//!     .with_hardware(hardware("hinge", HardwareCategory::Hinge, 6.5))
//!     .with_hardware(hardware("handle", HardwareCategory::Handle, 18.9))
//!     .with_hardware(hardware("lock", HardwareCategory::Lock, 89.5))
//!     .with_glass(Glass {
//!         id: "dg".to_string(),
//!         description: "4-12-4".to_string(),
//!         glass_type: "double".to_string(),
//!         thickness_mm: 20.0,
//!         u_value: 2.8,
//!         cost_per_m2: 28.5,
//!         weight_per_m2: None,
//!         size_limits: None,
//!     });
//!
//! let config = WindowConfig {
//!     width: 1200.0,
//!     height: 1400.0,
//!     opening_type: OpeningType::Casement,
//!     system_id: "pvc-70".to_string(),
//!     glass_id: "dg".to_string(),
//!     leaves: 1,
//!     mullions: 0,
//!     transoms: 0,
//! };
//!
//! let result = calculate(&config, &catalog, &EngineSettings::default()).unwrap();
//! println!("Final price: {:.2}", result.final_price);
//! ```

use serde::{Deserialize, Serialize};

use super::{costing, geometry, glazing, hardware, OpeningType};
use crate::bom::{BomItem, CalculationResult};
use crate::catalog::{resolve, CatalogLookup, ResolvedCatalog};
use crate::errors::{CalcError, CalcResult};
use crate::settings::EngineSettings;
use crate::units::{Kilograms, Millimeters};

/// A window/door configuration to quote.
///
/// Counts are signed on the wire so a negative value is reported as an
/// `InvalidDimension` instead of a parse failure.
///
/// ## JSON Example
///
/// ```json
/// {
///   "width": 2400.0,
///   "height": 1400.0,
///   "opening_type": "sliding",
///   "system_id": "upvc-70",
///   "glass_id": "dg-4-16-4",
///   "leaves": 2,
///   "mullions": 0,
///   "transoms": 0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Overall width in mm
    pub width: f64,

    /// Overall height in mm
    pub height: f64,

    pub opening_type: OpeningType,
    pub system_id: String,
    pub glass_id: String,

    /// Number of leaves (at least 1)
    #[serde(default = "default_leaves")]
    pub leaves: i32,

    /// Vertical dividers
    #[serde(default)]
    pub mullions: i32,

    /// Horizontal dividers
    #[serde(default)]
    pub transoms: i32,
}

fn default_leaves() -> i32 {
    1
}

/// A configuration that passed validation: positive in-bounds dimensions
/// and unsigned subdivision counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Opening {
    pub width: Millimeters,
    pub height: Millimeters,
    pub opening_type: OpeningType,
    pub leaves: u32,
    pub mullions: u32,
    pub transoms: u32,
}

impl Opening {
    /// Width of one leaf, the frame split evenly between leaves
    pub fn leaf_width(&self) -> Millimeters {
        self.width / f64::from(self.leaves)
    }
}

impl WindowConfig {
    /// Validate dimensions against the configured bounds, counts against zero
    /// and subdivisions against the frame allowance.
    pub fn validate(&self, settings: &EngineSettings) -> CalcResult<Opening> {
        check_dimension("width", self.width, settings.min_width_mm, settings.max_width_mm)?;
        check_dimension("height", self.height, settings.min_height_mm, settings.max_height_mm)?;

        let leaves = count("leaves", self.leaves)?;
        if leaves == 0 {
            return Err(CalcError::invalid_dimension(
                "leaves",
                self.leaves.to_string(),
                "At least one leaf is required",
            ));
        }

        let opening = Opening {
            width: Millimeters(self.width),
            height: Millimeters(self.height),
            opening_type: self.opening_type,
            leaves,
            mullions: count("mullions", self.mullions)?,
            transoms: count("transoms", self.transoms)?,
        };
        check_subdivisions(&opening, Millimeters(settings.frame_allowance_mm))?;
        Ok(opening)
    }
}

/// Reject leaf and divider counts whose allowances use up the opening.
/// Runs before any segment is built.
fn check_subdivisions(opening: &Opening, allowance: Millimeters) -> CalcResult<()> {
    glazing::layout(opening, allowance)?;

    let leaf_width = opening.leaf_width();
    if leaf_width <= allowance * 2.0 {
        return Err(CalcError::DegenerateGeometry {
            width_mm: opening.width.value(),
            height_mm: opening.height.value(),
            cell_width_mm: (leaf_width - allowance * 2.0).value(),
            cell_height_mm: (opening.height - allowance * 2.0).value(),
        });
    }
    Ok(())
}

fn check_dimension(field: &str, value: f64, min: f64, max: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid_dimension(field, value.to_string(), "Must be positive"));
    }
    if value < min || value > max {
        return Err(CalcError::invalid_dimension(
            field,
            value.to_string(),
            format!("Must be between {} and {} mm", min, max),
        ));
    }
    Ok(())
}

fn count(field: &str, value: i32) -> CalcResult<u32> {
    u32::try_from(value)
        .map_err(|_| CalcError::invalid_dimension(field, value.to_string(), "Count cannot be negative"))
}

/// Quote a window against a catalog.
///
/// The configuration is validated before any catalog access; catalog
/// records are then copied out of `catalog` once, so the result reflects a
/// single consistent snapshot.
///
/// # Returns
///
/// * `Ok(CalculationResult)` - BOM and pricing
/// * `Err(CalcError)` - the first failure; no partial result is produced
pub fn calculate(
    config: &WindowConfig,
    catalog: &impl CatalogLookup,
    settings: &EngineSettings,
) -> CalcResult<CalculationResult> {
    settings.validate()?;
    let opening = config.validate(settings)?;
    let resolved = resolve(config, catalog)?;
    run(&opening, &resolved, settings)
}

/// Quote a window from already-resolved catalog records.
///
/// This is the pure core of [`calculate`]: no lookups, no I/O.
pub fn calculate_resolved(
    config: &WindowConfig,
    resolved: &ResolvedCatalog,
    settings: &EngineSettings,
) -> CalcResult<CalculationResult> {
    settings.validate()?;
    let opening = config.validate(settings)?;
    run(&opening, resolved, settings)
}

fn run(opening: &Opening, resolved: &ResolvedCatalog, settings: &EngineSettings) -> CalcResult<CalculationResult> {
    if !resolved.system.supports(opening.opening_type) {
        return Err(CalcError::UnsupportedOpening {
            system_id: resolved.system.id.clone(),
            opening_type: opening.opening_type,
        });
    }

    let segments = geometry::decompose(opening, resolved)?;

    // Glazing and hardware both work off the same segments and records
    let glazing = glazing::analyze(opening, &segments, resolved, settings)?;
    let selection = hardware::select_hardware(opening, resolved)?;

    let mut bom_items: Vec<BomItem> = costing::profile_lines(&segments, resolved)?;
    bom_items.push(costing::glass_line(&glazing, &resolved.glass));
    bom_items.extend(costing::hardware_lines(&selection));

    let costs = costing::aggregate(&bom_items, settings);
    let weight: Kilograms = glazing.profile_weight + glazing.glass_weight + hardware::total_weight(&selection);

    tracing::debug!(
        opening = %opening.opening_type,
        segments = segments.len(),
        lines = bom_items.len(),
        material = costs.total_material_cost,
        final_price = costs.final_price,
        "window quoted"
    );

    Ok(CalculationResult {
        bom_items,
        total_material_cost: costs.total_material_cost,
        labor_cost: costs.labor_cost,
        margin_percent: settings.margin_percent(),
        final_price: costs.final_price,
        glass_area: glazing.layout.area.value(),
        weight: weight.value(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bom::BomItemType;
    use crate::calculations::test_support::{sample_catalog, window};
    use crate::catalog::{HardwareCategory, MaterialKind, MaterialSystem, ProfileRole};
    use crate::units::round_currency;

    fn quote(config: &WindowConfig) -> CalcResult<CalculationResult> {
        calculate(config, &sample_catalog(), &EngineSettings::default())
    }

    fn hardware_quantity(result: &CalculationResult, name_prefix: &str) -> Option<f64> {
        result
            .bom_items
            .iter()
            .find(|item| item.item_type == BomItemType::Hardware && item.description.starts_with(name_prefix))
            .map(|item| item.quantity)
    }

    #[test]
    fn test_scenario_single_casement() {
        let result = quote(&window(600.0, 800.0, OpeningType::Casement)).unwrap();

        let frame = result.lines_of(BomItemType::Profile).next().unwrap();
        assert!(frame.description.contains("ALU-F45"));
        assert!((frame.quantity - 2.8).abs() < 1e-9);

        assert!(result.glass_area > 0.0 && result.glass_area < 0.48);
        assert!((result.glass_area - 0.3744).abs() < 1e-9);

        let hardware: Vec<_> = result.lines_of(BomItemType::Hardware).collect();
        assert_eq!(hardware.len(), 3);
        assert_eq!(hardware_quantity(&result, "Hinge"), Some(1.0));
        assert_eq!(hardware_quantity(&result, "Handle"), Some(1.0));
        assert_eq!(hardware_quantity(&result, "Lock"), Some(1.0));
    }

    #[test]
    fn test_scenario_two_leaf_sliding() {
        let mut config = window(2400.0, 1400.0, OpeningType::Sliding);
        config.leaves = 2;
        let result = quote(&config).unwrap();

        assert_eq!(hardware_quantity(&result, "Roller"), Some(4.0));
        assert_eq!(hardware_quantity(&result, "Hinge"), None);

        let frame = result.lines_of(BomItemType::Profile).next().unwrap();
        assert!((frame.quantity - 7.6).abs() < 1e-9);
    }

    #[test]
    fn test_scenario_turn_tilt_with_mullion() {
        let mut config = window(1200.0, 1400.0, OpeningType::TurnTilt);
        config.mullions = 1;
        let result = quote(&config).unwrap();

        let mullion = result
            .lines_of(BomItemType::Profile)
            .find(|item| item.description.contains("ALU-M45"))
            .unwrap();
        assert!((mullion.quantity - 1.4).abs() < 1e-9);

        // (1200 - 80 - 40) x (1400 - 80) over two cells of 540 x 1320
        assert!((result.glass_area - 2.0 * 0.540 * 1.320).abs() < 1e-9);
    }

    #[test]
    fn test_missing_sash_profile_fails_without_result() {
        let mut catalog = sample_catalog();
        catalog.profiles.retain(|p| p.role != ProfileRole::Sash);
        let err = calculate(
            &window(600.0, 800.0, OpeningType::Casement),
            &catalog,
            &EngineSettings::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            CalcError::MissingProfileRole {
                system_id: "alu-45".to_string(),
                role: ProfileRole::Sash,
            }
        );
    }

    #[test]
    fn test_pricing_identities() {
        let mut config = window(1500.0, 1300.0, OpeningType::Folding);
        config.leaves = 3;
        config.transoms = 1;
        let result = quote(&config).unwrap();

        let bom_sum: f64 = result.bom_items.iter().map(|item| item.total_cost).sum();
        assert_eq!(bom_sum, result.total_material_cost);

        assert_eq!(
            round_currency(result.labor_cost),
            round_currency(result.total_material_cost * 0.10)
        );
        let subtotal = result.total_material_cost + result.labor_cost;
        assert!((result.final_price - (subtotal + subtotal * 0.30)).abs() < 1e-9);
        assert_eq!(result.margin_percent, 30.0);
    }

    #[test]
    fn test_idempotent_output() {
        let mut config = window(1800.0, 1200.0, OpeningType::Awning);
        config.leaves = 2;
        config.mullions = 1;
        let first = serde_json::to_string(&quote(&config).unwrap()).unwrap();
        let second = serde_json::to_string(&quote(&config).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_monotonic_in_width_and_height() {
        for opening_type in OpeningType::ALL {
            let mut previous: Option<CalculationResult> = None;
            for step in 0..10 {
                let size = 600.0 + 150.0 * f64::from(step);
                let mut config = window(size, size, opening_type);
                config.leaves = 2;
                let result = quote(&config).unwrap();
                if let Some(prev) = &previous {
                    assert!(result.total_material_cost >= prev.total_material_cost);
                    assert!(result.glass_area >= prev.glass_area);
                }
                previous = Some(result);
            }
        }
    }

    #[test]
    fn test_doubling_leaves_never_reduces_hardware() {
        for opening_type in OpeningType::ALL {
            let mut single = window(2000.0, 1400.0, opening_type);
            single.leaves = 2;
            let mut double = single.clone();
            double.leaves = 4;

            let a = quote(&single).unwrap();
            let b = quote(&double).unwrap();
            for line in a.lines_of(BomItemType::Hardware) {
                let doubled = b
                    .lines_of(BomItemType::Hardware)
                    .find(|other| other.description == line.description)
                    .unwrap();
                assert!(doubled.quantity >= line.quantity);
            }
        }
    }

    #[test]
    fn test_invalid_dimensions_rejected_before_lookup() {
        let mut config = window(-600.0, 800.0, OpeningType::Casement);
        config.system_id = "does-not-exist".to_string();
        let err = quote(&config).unwrap_err();
        assert!(matches!(err, CalcError::InvalidDimension { ref field, .. } if field == "width"));

        let mut config = window(600.0, 800.0, OpeningType::Casement);
        config.transoms = -1;
        let err = quote(&config).unwrap_err();
        assert!(matches!(err, CalcError::InvalidDimension { ref field, .. } if field == "transoms"));

        let mut config = window(600.0, 800.0, OpeningType::Casement);
        config.leaves = 0;
        assert_eq!(quote(&config).unwrap_err().error_code(), "INVALID_DIMENSION");

        let config = window(9000.0, 800.0, OpeningType::Casement);
        assert_eq!(quote(&config).unwrap_err().error_code(), "INVALID_DIMENSION");
    }

    #[test]
    fn test_unsupported_opening_for_system() {
        let mut catalog = sample_catalog();
        catalog.systems[0] = MaterialSystem::new("alu-45", "Alu-Serie 45", MaterialKind::Aluminum)
            .with_openings([OpeningType::Casement, OpeningType::Awning]);
        let err = calculate(
            &window(1200.0, 1200.0, OpeningType::Sliding),
            &catalog,
            &EngineSettings::default(),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_OPENING");
    }

    #[test]
    fn test_resolved_matches_lookup_path() {
        let catalog = sample_catalog();
        let config = window(1000.0, 1000.0, OpeningType::Casement);
        let resolved = resolve(&config, &catalog).unwrap();
        let settings = EngineSettings::default();
        assert_eq!(
            calculate_resolved(&config, &resolved, &settings).unwrap(),
            calculate(&config, &catalog, &settings).unwrap()
        );
    }

    #[test]
    fn test_custom_rates_flow_through() {
        let settings = EngineSettings {
            labor_rate: 0.2,
            margin_rate: 0.5,
            ..EngineSettings::default()
        };
        let result = calculate(&window(800.0, 800.0, OpeningType::Awning), &sample_catalog(), &settings).unwrap();
        assert!((result.labor_cost - result.total_material_cost * 0.2).abs() < 1e-9);
        assert_eq!(result.margin_percent, 50.0);
    }

    #[test]
    fn test_weight_includes_all_components() {
        let result = quote(&window(600.0, 800.0, OpeningType::Casement)).unwrap();
        // frame 2.8 m x 1.2 + sash 2.8 m x 0.9 + glass 0.3744 m² x 20 + hinge 0.2 + handle 0.15 + lock 0.8
        let expected = 2.8 * 1.2 + 2.8 * 0.9 + 0.3744 * 20.0 + 0.2 + 0.15 + 0.8;
        assert!((result.weight - expected).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_glazing_fails_without_result() {
        let mut config = window(300.0, 800.0, OpeningType::Casement);
        config.mullions = 6;
        let err = quote(&config).unwrap_err();
        assert!(matches!(err, CalcError::DegenerateGeometry { width_mm, .. } if width_mm == 300.0));
    }

    #[test]
    fn test_huge_divider_counts_are_degenerate() {
        let mut config = window(1200.0, 1400.0, OpeningType::Casement);
        config.mullions = i32::MAX;
        assert_eq!(quote(&config).unwrap_err().error_code(), "DEGENERATE_GEOMETRY");

        let mut config = window(1200.0, 1400.0, OpeningType::Casement);
        config.transoms = i32::MAX;
        assert_eq!(quote(&config).unwrap_err().error_code(), "DEGENERATE_GEOMETRY");

        let mut config = window(600.0, 800.0, OpeningType::Sliding);
        config.leaves = 100_000;
        assert_eq!(quote(&config).unwrap_err().error_code(), "DEGENERATE_GEOMETRY");

        // 80 mm leaves are all allowance
        let mut config = window(320.0, 800.0, OpeningType::Folding);
        config.leaves = 4;
        assert_eq!(quote(&config).unwrap_err().error_code(), "DEGENERATE_GEOMETRY");
        config.leaves = 3;
        assert!(quote(&config).is_ok());
    }

    #[test]
    fn test_missing_hardware_fails_without_result() {
        let mut catalog = sample_catalog();
        catalog.systems[0] = MaterialSystem::new("alu-45", "Alu-Serie 45", MaterialKind::Wood);
        let mut config = window(2400.0, 1400.0, OpeningType::Sliding);
        config.leaves = 2;
        let err = calculate(&config, &catalog, &EngineSettings::default()).unwrap_err();
        assert_eq!(
            err,
            CalcError::NoCompatibleHardware {
                category: HardwareCategory::Roller,
                opening_type: OpeningType::Sliding,
                material_kind: MaterialKind::Wood,
            }
        );
    }

    #[test]
    fn test_rounded_result_adds_up() {
        let settings = EngineSettings::default();
        let catalog = sample_catalog();
        for width in (600..=2400).step_by(45) {
            for height in (600..=2000).step_by(35) {
                let config = window(f64::from(width), f64::from(height), OpeningType::Casement);
                let result = calculate(&config, &catalog, &settings).unwrap();
                let shown = result.rounded(settings.labor_rate);

                let mut line_cents = 0_i64;
                for (line, raw) in shown.bom_items.iter().zip(&result.bom_items) {
                    assert_eq!(line.quantity, raw.quantity);
                    assert_eq!(line.total_cost, round_currency(line.quantity * line.unit_cost));
                    line_cents += (line.total_cost * 100.0).round() as i64;
                }
                let material_cents = (shown.total_material_cost * 100.0).round() as i64;
                assert_eq!(line_cents, material_cents, "{}x{}", width, height);

                assert_eq!(shown.labor_cost, round_currency(shown.total_material_cost * 0.10));
                let subtotal = shown.total_material_cost + shown.labor_cost;
                assert_eq!(shown.final_price, round_currency(subtotal + subtotal * 0.30));

                // Stays within cents of the exact price
                assert!((shown.final_price - result.final_price).abs() < 0.1, "{}x{}", width, height);
            }
        }
    }

    #[test]
    fn test_config_json_defaults() {
        let json = r#"{"width": 1000, "height": 1200, "opening_type": "casement", "system_id": "alu-45", "glass_id": "dg-4-16-4"}"#;
        let config: WindowConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.leaves, 1);
        assert_eq!(config.mullions, 0);
        assert_eq!(config.transoms, 0);
    }
}
