//! # Geometry Decomposition
//!
//! Breaks an opening into the cut-to-length profile segments it is built from.
//!
//! ## Rules
//!
//! - Outer frame: one `frame` segment, the full perimeter 2(W + H),
//!   whatever the opening type.
//! - Leaves: one `sash` perimeter per leaf, 2(W/n + H).
//! - Hinged types with n > 1 leaves add n − 1 meeting segments of 2H
//!   (the meeting stiles and their rails, approximated by height).
//!   Sliding leaves overlap in the track and get no meeting segments.
//! - Mullions: one segment of height H each (vertical, full clear height).
//! - Transoms: one segment of width W each (horizontal, full clear width).
//!
//! Segments come out in BOM order: frame, sash, mullion, transom.

use serde::{Deserialize, Serialize};

use super::window::Opening;
use crate::catalog::{ProfileRole, ResolvedCatalog};
use crate::errors::CalcResult;
use crate::units::{Meters, Millimeters};

/// A straight profile length the unit needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub role: ProfileRole,
    pub length_mm: Millimeters,
}

impl Segment {
    pub fn new(role: ProfileRole, length_mm: Millimeters) -> Self {
        Segment { role, length_mm }
    }

    pub fn length_m(&self) -> Meters {
        self.length_mm.into()
    }
}

/// Decompose an opening into profile segments.
///
/// Fails with `MissingProfileRole` if the material system has no profile
/// for a role one of the segments needs.
pub fn decompose(opening: &Opening, resolved: &ResolvedCatalog) -> CalcResult<Vec<Segment>> {
    let Opening { width, height, .. } = *opening;
    let mut segments = Vec::new();

    segments.push(Segment::new(ProfileRole::Frame, (width + height) * 2.0));

    let leaf_perimeter = (opening.leaf_width() + height) * 2.0;
    for _ in 0..opening.leaves {
        segments.push(Segment::new(ProfileRole::Sash, leaf_perimeter));
    }
    if opening.opening_type.is_hinged() {
        for _ in 1..opening.leaves {
            segments.push(Segment::new(ProfileRole::Sash, height * 2.0));
        }
    }

    for _ in 0..opening.mullions {
        segments.push(Segment::new(ProfileRole::Mullion, height));
    }
    for _ in 0..opening.transoms {
        segments.push(Segment::new(ProfileRole::Transom, width));
    }

    for role in ProfileRole::ALL {
        if segments.iter().any(|s| s.role == role) {
            resolved.profile(role)?;
        }
    }

    tracing::trace!(count = segments.len(), "decomposed opening into segments");
    Ok(segments)
}

/// Total length per role, in BOM order, skipping roles with no segments.
pub fn length_by_role(segments: &[Segment]) -> Vec<(ProfileRole, Millimeters)> {
    ProfileRole::ALL
        .into_iter()
        .filter_map(|role| {
            let mut matching = segments.iter().filter(|s| s.role == role).peekable();
            matching.peek()?;
            Some((role, matching.map(|s| s.length_mm).sum::<Millimeters>()))
        })
        .collect()
}
