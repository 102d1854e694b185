//! # Cost Aggregation
//!
//! Turns segments, glazing and hardware into priced BOM lines, then layers
//! labor and margin on top:
//!
//! ```text
//! materials = Σ line totals
//! labor     = labor_rate × materials
//! margin    = margin_rate × (materials + labor)
//! final     = materials + labor + margin
//! ```
//!
//! Nothing is rounded here. Amounts stay unrounded until presentation so
//! rounding error cannot compound across lines.

use super::geometry::{length_by_role, Segment};
use super::glazing::GlazingAnalysis;
use super::hardware::HardwareLine;
use crate::bom::{BomItem, BomItemType, UNIT_METER, UNIT_PIECE, UNIT_SQUARE_METER};
use crate::catalog::{Glass, ResolvedCatalog};
use crate::errors::CalcResult;
use crate::settings::EngineSettings;
use crate::units::Meters;

/// Totals of a priced BOM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBreakdown {
    pub total_material_cost: f64,
    pub labor_cost: f64,
    pub margin_amount: f64,
    pub final_price: f64,
}

/// One profile line per role, with the role's lengths merged.
pub fn profile_lines(segments: &[Segment], resolved: &ResolvedCatalog) -> CalcResult<Vec<BomItem>> {
    length_by_role(segments)
        .into_iter()
        .map(|(role, length)| {
            let profile = resolved.profile(role)?;
            let meters: Meters = length.into();
            Ok(BomItem::new(
                BomItemType::Profile,
                profile.bom_description(),
                meters.value(),
                UNIT_METER,
                profile.cost_per_m,
            ))
        })
        .collect()
}

pub fn glass_line(glazing: &GlazingAnalysis, glass: &Glass) -> BomItem {
    BomItem::new(
        BomItemType::Glass,
        glass.description.clone(),
        glazing.layout.area.value(),
        UNIT_SQUARE_METER,
        glass.cost_per_m2,
    )
}

pub fn hardware_lines(selection: &[HardwareLine]) -> Vec<BomItem> {
    selection
        .iter()
        .map(|line| {
            BomItem::new(
                BomItemType::Hardware,
                line.item.name.clone(),
                f64::from(line.quantity),
                UNIT_PIECE,
                line.item.unit_cost,
            )
        })
        .collect()
}

/// Sum the BOM and apply labor and margin.
pub fn aggregate(bom_items: &[BomItem], settings: &EngineSettings) -> CostBreakdown {
    let total_material_cost: f64 = bom_items.iter().map(|item| item.total_cost).sum();
    let labor_cost = total_material_cost * settings.labor_rate;
    let margin_amount = (total_material_cost + labor_cost) * settings.margin_rate;

    CostBreakdown {
        total_material_cost,
        labor_cost,
        margin_amount,
        final_price: total_material_cost + labor_cost + margin_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::test_support::{sample_catalog, window};
    use crate::calculations::{geometry, OpeningType};
    use crate::catalog::resolve;
    use crate::units::round_currency;

    #[test]
    fn test_aggregate_rates() {
        let items = vec![
            BomItem::new(BomItemType::Profile, "Frame", 4.0, UNIT_METER, 15.5),
            BomItem::new(BomItemType::Hardware, "Lock", 1.0, UNIT_PIECE, 89.5),
        ];
        let costs = aggregate(&items, &EngineSettings::default());
        assert_eq!(costs.total_material_cost, 151.5);
        assert!((costs.labor_cost - 15.15).abs() < 1e-9);
        assert!((costs.margin_amount - 49.995).abs() < 1e-9);
        assert!((costs.final_price - 216.645).abs() < 1e-9);
        assert_eq!(round_currency(costs.labor_cost), 15.15);
    }

    #[test]
    fn test_profile_lines_merge_by_role() {
        let mut config = window(1800.0, 1200.0, OpeningType::Casement);
        config.leaves = 3;
        config.mullions = 1;
        let opening = config.validate(&EngineSettings::default()).unwrap();
        let resolved = resolve(&config, &sample_catalog()).unwrap();
        let segments = geometry::decompose(&opening, &resolved).unwrap();

        let lines = profile_lines(&segments, &resolved).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].unit, UNIT_METER);
        assert!((lines[1].quantity - 15.6).abs() < 1e-9);
        assert_eq!(lines[1].unit_cost, 12.3);
        assert!(lines[2].description.contains("ALU-M45"));
    }

    #[test]
    fn test_empty_bom_costs_nothing() {
        let costs = aggregate(&[], &EngineSettings::default());
        assert_eq!(costs.final_price, 0.0);
    }
}
