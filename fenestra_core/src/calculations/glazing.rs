//! # Glass Area & Weight
//!
//! The opening is divided into (mullions + 1) × (transoms + 1) glazed cells.
//! Each edge loses a fixed frame-engagement allowance, and each divider
//! consumes one more allowance on the axis it crosses:
//!
//! ```text
//! net width  = W − 2a − a·mullions      cell width  = net width  / (mullions + 1)
//! net height = H − 2a − a·transoms      cell height = net height / (transoms + 1)
//! ```
//!
//! Mullions only ever reduce the width axis and transoms only the height
//! axis, so the deduction order does not matter.

use serde::{Deserialize, Serialize};

use super::geometry::Segment;
use super::window::Opening;
use crate::catalog::{Glass, ResolvedCatalog};
use crate::errors::{CalcError, CalcResult};
use crate::settings::EngineSettings;
use crate::units::{Kilograms, Meters, Millimeters, SqM};

/// Glazed cell layout of an opening.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlazingLayout {
    pub cell_width: Millimeters,
    pub cell_height: Millimeters,
    /// Number of glazed cells
    pub cells: u32,
    /// Total glazed area
    pub area: SqM,
}

/// Glazing layout plus the structural weight of profiles and glass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlazingAnalysis {
    pub layout: GlazingLayout,
    pub profile_weight: Kilograms,
    pub glass_weight: Kilograms,
}

/// Divide an opening into glazed cells after allowances.
///
/// Fails with `DegenerateGeometry` if an allowance eats a whole cell.
pub fn layout(opening: &Opening, allowance: Millimeters) -> CalcResult<GlazingLayout> {
    let columns = opening.mullions + 1;
    let rows = opening.transoms + 1;

    let net_width = opening.width - allowance * 2.0 - allowance * f64::from(opening.mullions);
    let net_height = opening.height - allowance * 2.0 - allowance * f64::from(opening.transoms);
    let cell_width = net_width / f64::from(columns);
    let cell_height = net_height / f64::from(rows);

    if cell_width.value() <= 0.0 || cell_height.value() <= 0.0 {
        return Err(CalcError::DegenerateGeometry {
            width_mm: opening.width.value(),
            height_mm: opening.height.value(),
            cell_width_mm: cell_width.value(),
            cell_height_mm: cell_height.value(),
        });
    }

    let cells = columns * rows;
    let area: SqM = (cell_width * cell_height * f64::from(cells)).into();

    Ok(GlazingLayout {
        cell_width,
        cell_height,
        cells,
        area,
    })
}

/// Profile weight over all segments.
pub fn profile_weight(segments: &[Segment], resolved: &ResolvedCatalog) -> CalcResult<Kilograms> {
    let mut total = Kilograms(0.0);
    for segment in segments {
        let profile = resolved.profile(segment.role)?;
        let length: Meters = segment.length_m();
        total = total + Kilograms(length.value() * profile.weight_per_m);
    }
    Ok(total)
}

pub fn glass_weight(area: SqM, glass: &Glass) -> Kilograms {
    Kilograms(area.value() * glass.weight_per_m2())
}

/// Lay out the glazing and weigh profiles and glass.
///
/// Hardware weight is not included; it depends on the hardware selection,
/// which runs independently.
pub fn analyze(
    opening: &Opening,
    segments: &[Segment],
    resolved: &ResolvedCatalog,
    settings: &EngineSettings,
) -> CalcResult<GlazingAnalysis> {
    let layout = layout(opening, Millimeters(settings.frame_allowance_mm))?;
    resolved
        .glass
        .check_cell(layout.cell_width.value(), layout.cell_height.value())?;

    Ok(GlazingAnalysis {
        layout,
        profile_weight: profile_weight(segments, resolved)?,
        glass_weight: glass_weight(layout.area, &resolved.glass),
    })
}
