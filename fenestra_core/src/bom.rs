//! # Bill of Materials
//!
//! Output records of a calculation. A [`CalculationResult`] is created fresh
//! for every request and serializes as a flat record for display:
//!
//! ```json
//! {
//!   "bom_items": [
//!     {
//!       "item_type": "profile",
//!       "description": "Frame profile - ALU-F45",
//!       "quantity": 2.8,
//!       "unit": "m",
//!       "unit_cost": 15.5,
//!       "total_cost": 43.4
//!     }
//!   ],
//!   "total_material_cost": 205.02,
//!   "labor_cost": 20.5,
//!   "margin_percent": 30.0,
//!   "final_price": 293.18,
//!   "glass_area": 0.3744,
//!   "weight": 14.52
//! }
//! ```
//!
//! Values are unrounded. Use [`CalculationResult::rounded`] for a
//! presentation copy with money in cents whose totals add up.

use serde::{Deserialize, Serialize};

use crate::units::round_currency;

/// Unit label for profile lines
pub const UNIT_METER: &str = "m";
/// Unit label for glass lines
pub const UNIT_SQUARE_METER: &str = "m²";
/// Unit label for hardware lines (units)
pub const UNIT_PIECE: &str = "ud";

/// What a BOM line is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BomItemType {
    Profile,
    Glass,
    Hardware,
}

impl BomItemType {
    pub fn display_name(&self) -> &'static str {
        match self {
            BomItemType::Profile => "Profile",
            BomItemType::Glass => "Glass",
            BomItemType::Hardware => "Hardware",
        }
    }
}

/// One priced line of the bill of materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomItem {
    pub item_type: BomItemType,
    pub description: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_cost: f64,
    /// Always `quantity × unit_cost`
    pub total_cost: f64,
}

impl BomItem {
    /// Create a line; the total is derived, never supplied.
    pub fn new(
        item_type: BomItemType,
        description: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
        unit_cost: f64,
    ) -> Self {
        BomItem {
            item_type,
            description: description.into(),
            quantity,
            unit: unit.into(),
            unit_cost,
            total_cost: quantity * unit_cost,
        }
    }
}

/// Complete quote for one window/door.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Profiles (frame, sash, mullion, transom), then glass, then hardware
    pub bom_items: Vec<BomItem>,

    /// Sum of all line totals
    pub total_material_cost: f64,

    pub labor_cost: f64,

    /// Margin applied on materials + labor, in percent
    pub margin_percent: f64,

    pub final_price: f64,

    /// Net glazed area (m²)
    pub glass_area: f64,

    /// Total assembly weight (kg)
    pub weight: f64,
}

impl CalculationResult {
    /// Lines of one type, in BOM order
    pub fn lines_of(&self, item_type: BomItemType) -> impl Iterator<Item = &BomItem> {
        self.bom_items.iter().filter(move |item| item.item_type == item_type)
    }

    /// Margin amount implied by the result
    pub fn margin_amount(&self) -> f64 {
        self.final_price - self.total_material_cost - self.labor_cost
    }

    /// Presentation copy with money in cents.
    ///
    /// The copy is rebuilt from its rounded parts so it is self-consistent:
    /// every line total is `quantity × unit_cost` rounded to cents, materials
    /// are the sum of those cents, and labor and the final price are derived
    /// from the rounded materials. Quantities and unit costs are left as
    /// computed. `labor_rate` is the fraction the result was priced with.
    pub fn rounded(&self, labor_rate: f64) -> CalculationResult {
        let bom_items: Vec<BomItem> = self
            .bom_items
            .iter()
            .map(|item| BomItem {
                total_cost: round_currency(item.quantity * item.unit_cost),
                ..item.clone()
            })
            .collect();

        let total_material_cost = round_currency(bom_items.iter().map(|item| item.total_cost).sum());
        let labor_cost = round_currency(total_material_cost * labor_rate);
        let subtotal = total_material_cost + labor_cost;
        let final_price = round_currency(subtotal + subtotal * self.margin_percent / 100.0);

        CalculationResult {
            bom_items,
            total_material_cost,
            labor_cost,
            margin_percent: self.margin_percent,
            final_price,
            glass_area: (self.glass_area * 1000.0).round() / 1000.0,
            weight: round_currency(self.weight),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> CalculationResult {
        let bom_items = vec![
            BomItem::new(BomItemType::Profile, "Frame", 2.8, UNIT_METER, 15.5),
            BomItem::new(BomItemType::Glass, "4-16-4", 0.3744, UNIT_SQUARE_METER, 32.8),
            BomItem::new(BomItemType::Hardware, "Lock", 1.0, UNIT_PIECE, 89.5),
        ];
        let total: f64 = bom_items.iter().map(|i| i.total_cost).sum();
        CalculationResult {
            bom_items,
            total_material_cost: total,
            labor_cost: total * 0.1,
            margin_percent: 30.0,
            final_price: total * 1.1 * 1.3,
            glass_area: 0.3744,
            weight: 13.283_2,
        }
    }

    #[test]
    fn test_line_total() {
        let item = BomItem::new(BomItemType::Glass, "4-16-4", 0.5, UNIT_SQUARE_METER, 32.8);
        assert_eq!(item.total_cost, 0.5 * 32.8);
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(sample_result()).unwrap();
        for key in [
            "bom_items",
            "total_material_cost",
            "labor_cost",
            "margin_percent",
            "final_price",
            "glass_area",
            "weight",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        let item = &json["bom_items"][1];
        assert_eq!(item["item_type"], "glass");
        assert_eq!(item["unit"], "m²");
        assert_eq!(json["bom_items"][2]["unit"], "ud");
    }

    #[test]
    fn test_rounded_copy() {
        let result = sample_result();
        let rounded = result.rounded(0.1);
        assert_eq!(rounded.bom_items[1].total_cost, 12.28);
        assert_eq!(rounded.bom_items[1].quantity, 0.3744);
        assert_eq!(rounded.total_material_cost, 145.18);
        assert_eq!(rounded.labor_cost, 14.52);
        // (145.18 + 14.52) x 1.3 = 207.61
        assert_eq!(rounded.final_price, 207.61);
        assert_eq!(rounded.weight, 13.28);
        assert_eq!(result.lines_of(BomItemType::Hardware).count(), 1);
    }

    #[test]
    fn test_rounded_totals_follow_rounded_lines() {
        // Each line rounds down on its own, the raw sum rounds up
        let bom_items = vec![
            BomItem::new(BomItemType::Profile, "Frame", 1.0, UNIT_METER, 10.004),
            BomItem::new(BomItemType::Profile, "Sash", 1.0, UNIT_METER, 10.004),
        ];
        let result = CalculationResult {
            bom_items,
            total_material_cost: 20.008,
            labor_cost: 2.0008,
            margin_percent: 30.0,
            final_price: 22.0088 * 1.3,
            glass_area: 0.0,
            weight: 0.0,
        };
        let rounded = result.rounded(0.1);
        assert_eq!(rounded.bom_items[0].total_cost, 10.0);
        assert_eq!(rounded.total_material_cost, 20.0);
        assert_eq!(rounded.labor_cost, 2.0);
        assert_eq!(rounded.final_price, 28.6);
    }
}
