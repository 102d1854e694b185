//! # Unit Types
//!
//! Type-safe wrappers for the units a quote is built from. They are plain
//! f64 newtypes, so JSON stays clean (just numbers) and conversions are
//! explicit at the call site.
//!
//! ## Metric Units
//!
//! Catalogs and configurations are metric:
//! - Length: millimeters (mm) for dimensions, meters (m) for priced lengths
//! - Area: square millimeters (mm²) for geometry, square meters (m²) for glass
//! - Mass: kilograms (kg)
//!
//! Money is not wrapped. Amounts are carried unrounded and only rounded to
//! cents by [`round_currency`] when presented.
//!
//! ## Example
//!
//! ```rust
//! use fenestra_core::units::{Meters, Millimeters};
//!
//! let perimeter = Millimeters(2800.0);
//! let priced: Meters = perimeter.into();
//! assert_eq!(priced.0, 2.8);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in square millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqMm(pub f64);

/// Area in square meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqM(pub f64);

impl From<SqMm> for SqM {
    fn from(sqmm: SqMm) -> Self {
        SqM(sqmm.0 / 1_000_000.0)
    }
}

impl From<SqM> for SqMm {
    fn from(sqm: SqM) -> Self {
        SqMm(sqm.0 * 1_000_000.0)
    }
}

impl Mul for Millimeters {
    type Output = SqMm;
    fn mul(self, rhs: Millimeters) -> SqMm {
        SqMm(self.0 * rhs.0)
    }
}

// ============================================================================
// Mass Units
// ============================================================================

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

// ============================================================================
// Currency presentation
// ============================================================================

/// Round a monetary amount to cents, half away from zero.
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl std::iter::Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|v| v.0).sum())
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Millimeters);
impl_arithmetic!(Meters);
impl_arithmetic!(SqMm);
impl_arithmetic!(SqM);
impl_arithmetic!(Kilograms);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millimeters_to_meters() {
        let mm = Millimeters(7600.0);
        let m: Meters = mm.into();
        assert_eq!(m.0, 7.6);
    }

    #[test]
    fn test_area_from_lengths() {
        let area: SqM = (Millimeters(520.0) * Millimeters(720.0)).into();
        assert!((area.0 - 0.3744).abs() < 1e-12);
    }

    #[test]
    fn test_arithmetic() {
        let a = Kilograms(10.0);
        let b = Kilograms(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
        let total: Kilograms = [a, b].into_iter().sum();
        assert_eq!(total.0, 15.0);
    }

    #[test]
    fn test_round_currency() {
        assert_eq!(round_currency(12.344), 12.34);
        assert_eq!(round_currency(12.345_001), 12.35);
        assert_eq!(round_currency(0.0), 0.0);
    }

    #[test]
    fn test_serialization() {
        let mm = Millimeters(1200.5);
        let json = serde_json::to_string(&mm).unwrap();
        assert_eq!(json, "1200.5");

        let roundtrip: Millimeters = serde_json::from_str(&json).unwrap();
        assert_eq!(mm, roundtrip);
    }
}
