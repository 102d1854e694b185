//! # Hardware Selection
//!
//! Each opening type needs a fixed set of hardware categories
//! ([`OpeningType::required_hardware`](super::OpeningType::required_hardware)).
//! For every category the catalog is filtered by set membership:
//!
//! 1. the item lists the configured opening type,
//! 2. the item lists the system's material kind,
//! 3. the item's required tags (if any) intersect the system's tags,
//! 4. the leaf fits within the item's optional width/height rating.
//!
//! The cheapest survivor wins; equal costs fall back to the smallest id.
//! An empty category is a hard stop, never a silent default.

use std::cmp::Ordering;

use super::window::Opening;
use super::OpeningType;
use crate::catalog::{Hardware, HardwareCategory, ResolvedCatalog};
use crate::errors::{CalcError, CalcResult};
use crate::units::Kilograms;

/// Rollers carried by each sliding leaf
pub const ROLLERS_PER_LEAF: u32 = 2;

/// One selected hardware item and how many the unit needs.
#[derive(Debug, Clone, PartialEq)]
pub struct HardwareLine {
    pub category: HardwareCategory,
    pub item: Hardware,
    pub quantity: u32,
}

/// Number of items of a category an opening needs.
///
/// Hinges, handles and locks come one set per leaf; sliding leaves ride on
/// two rollers each; folding units also hinge every leaf to its neighbour.
pub fn quantity_for(category: HardwareCategory, opening: &Opening) -> u32 {
    let leaves = opening.leaves;
    match (category, opening.opening_type) {
        (HardwareCategory::Hinge, OpeningType::Folding) => leaves + (leaves - 1),
        (HardwareCategory::Roller, _) => ROLLERS_PER_LEAF * leaves,
        _ => leaves,
    }
}

fn cheapest_first(a: &&Hardware, b: &&Hardware) -> Ordering {
    a.unit_cost
        .total_cmp(&b.unit_cost)
        .then_with(|| a.id.cmp(&b.id))
}

/// Select one hardware item per required category.
///
/// Fails with `NoCompatibleHardware` naming the first category that has no
/// compatible item.
pub fn select_hardware(opening: &Opening, resolved: &ResolvedCatalog) -> CalcResult<Vec<HardwareLine>> {
    let system = &resolved.system;
    let leaf_width = opening.leaf_width().value();
    let leaf_height = opening.height.value();

    opening
        .opening_type
        .required_hardware()
        .iter()
        .map(|&category| {
            let item = resolved
                .hardware
                .iter()
                .filter(|hw| hw.category == category)
                .filter(|hw| hw.is_compatible(opening.opening_type, system))
                .filter(|hw| hw.fits_leaf(leaf_width, leaf_height))
                .min_by(cheapest_first)
                .ok_or(CalcError::NoCompatibleHardware {
                    category,
                    opening_type: opening.opening_type,
                    material_kind: system.kind,
                })?;

            tracing::trace!(%category, item = %item.id, "selected hardware");
            Ok(HardwareLine {
                category,
                item: item.clone(),
                quantity: quantity_for(category, opening),
            })
        })
        .collect()
}

/// Weight of all selected hardware.
pub fn total_weight(selection: &[HardwareLine]) -> Kilograms {
    selection
        .iter()
        .map(|line| Kilograms(line.item.unit_weight_kg * f64::from(line.quantity)))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::test_support::{sample_catalog, window};
    use crate::catalog::{resolve, MaterialKind, MaterialSystem};
    use crate::settings::EngineSettings;

    fn select(
        opening_type: OpeningType,
        leaves: i32,
        catalog_edit: impl FnOnce(&mut ResolvedCatalog),
    ) -> CalcResult<Vec<HardwareLine>> {
        let mut config = window(2400.0, 1400.0, opening_type);
        config.leaves = leaves;
        let opening = config.validate(&EngineSettings::default()).unwrap();
        let mut resolved = resolve(&config, &sample_catalog()).unwrap();
        catalog_edit(&mut resolved);
        select_hardware(&opening, &resolved)
    }

    fn line(selection: &[HardwareLine], category: HardwareCategory) -> Option<&HardwareLine> {
        selection.iter().find(|l| l.category == category)
    }

    #[test]
    fn test_casement_categories() {
        let selection = select(OpeningType::Casement, 1, |_| {}).unwrap();
        let categories: Vec<_> = selection.iter().map(|l| l.category).collect();
        assert_eq!(
            categories,
            vec![HardwareCategory::Hinge, HardwareCategory::Handle, HardwareCategory::Lock]
        );
        assert!(selection.iter().all(|l| l.quantity == 1));
    }

    #[test]
    fn test_cheapest_item_wins() {
        let selection = select(OpeningType::Casement, 1, |_| {}).unwrap();
        assert_eq!(line(&selection, HardwareCategory::Hinge).unwrap().item.id, "hw-hinge-eco");
    }

    #[test]
    fn test_equal_cost_breaks_on_id() {
        let selection = select(OpeningType::Casement, 1, |resolved| {
            for hw in resolved.hardware.iter_mut() {
                if hw.category == HardwareCategory::Hinge {
                    hw.unit_cost = 10.0;
                }
            }
            let mut twin = resolved.hardware[0].clone();
            twin.id = "hw-hinge-aaa".to_string();
            resolved.hardware.push(twin);
        })
        .unwrap();
        assert_eq!(line(&selection, HardwareCategory::Hinge).unwrap().item.id, "hw-hinge-aaa");
    }

    #[test]
    fn test_sliding_rollers_and_no_hinges() {
        let selection = select(OpeningType::Sliding, 2, |_| {}).unwrap();
        assert_eq!(line(&selection, HardwareCategory::Roller).unwrap().quantity, 4);
        assert_eq!(line(&selection, HardwareCategory::Lock).unwrap().item.id, "hw-lock-slide");
        assert!(line(&selection, HardwareCategory::Hinge).is_none());
    }

    #[test]
    fn test_folding_joint_hinges() {
        let selection = select(OpeningType::Folding, 3, |_| {}).unwrap();
        // one set per leaf plus one per leaf-to-leaf joint
        assert_eq!(line(&selection, HardwareCategory::Hinge).unwrap().quantity, 5);
        assert_eq!(line(&selection, HardwareCategory::Handle).unwrap().quantity, 3);
    }

    #[test]
    fn test_material_kind_filter() {
        let err = select(OpeningType::Sliding, 2, |resolved| {
            resolved.system = MaterialSystem::new("wood-68", "Madera-Euro68", MaterialKind::Wood);
        })
        .unwrap_err();
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
    fn test_leaf_rating_excludes_small_hardware() {
        let selection = select(OpeningType::Casement, 2, |resolved| {
            for hw in resolved.hardware.iter_mut() {
                if hw.id == "hw-hinge-eco" {
                    hw.max_leaf_width_mm = Some(1000.0);
                }
            }
        })
        .unwrap();
        // 1200 mm leaves are too wide for the economy hinge
        assert_eq!(line(&selection, HardwareCategory::Hinge).unwrap().item.id, "hw-hinge-pro");
    }

    #[test]
    fn test_total_weight() {
        let selection = select(OpeningType::Sliding, 2, |_| {}).unwrap();
        // 4 rollers x 0.25 + 2 locks x 0.3
        assert!((total_weight(&selection).value() - 1.6).abs() < 1e-9);
    }
}
