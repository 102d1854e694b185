//! # Error Types
//!
//! Structured error types for fenestra_core. Every failure carries enough
//! context (field, value, category, id) for the caller to correct the
//! configuration or the catalog without re-running anything.
//!
//! ## Example
//!
//! ```rust
//! use fenestra_core::errors::{CalcError, CalcResult};
//!
//! fn validate_width(width_mm: f64) -> CalcResult<()> {
//!     if width_mm <= 0.0 {
//!         return Err(CalcError::invalid_dimension(
//!             "width",
//!             width_mm.to_string(),
//!             "Width must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{HardwareCategory, MaterialKind, ProfileRole};
use crate::calculations::OpeningType;

/// Result type alias for fenestra_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for quotation operations.
///
/// None of the calculation variants are transient: they point at a bad
/// configuration or an incomplete catalog, so nothing is retried internally.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// Width/height out of bounds, or a negative subdivision count
    #[error("Invalid dimension for '{field}': {value} - {reason}")]
    InvalidDimension {
        field: String,
        value: String,
        reason: String,
    },

    /// The material system has no profile for a role the geometry needs
    #[error("Material system '{system_id}' has no {role} profile")]
    MissingProfileRole { system_id: String, role: ProfileRole },

    /// Frame and divider allowances consume the whole glazed cell
    #[error(
        "Degenerate geometry for {width_mm}x{height_mm} mm: glazed cell would be {cell_width_mm}x{cell_height_mm} mm"
    )]
    DegenerateGeometry {
        width_mm: f64,
        height_mm: f64,
        cell_width_mm: f64,
        cell_height_mm: f64,
    },

    /// No catalog item passes the compatibility filter for a required category
    #[error("No compatible {category} for {opening_type} opening in {material_kind} system")]
    NoCompatibleHardware {
        category: HardwareCategory,
        opening_type: OpeningType,
        material_kind: MaterialKind,
    },

    /// The material system does not offer the requested opening type
    #[error("Material system '{system_id}' does not support {opening_type} openings")]
    UnsupportedOpening {
        system_id: String,
        opening_type: OpeningType,
    },

    /// Unknown catalog identifier
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// An input value outside the engine geometry is invalid (settings, rates)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidDimension error
    pub fn invalid_dimension(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidDimension {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        CalcError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidDimension { .. } => "INVALID_DIMENSION",
            CalcError::MissingProfileRole { .. } => "MISSING_PROFILE_ROLE",
            CalcError::DegenerateGeometry { .. } => "DEGENERATE_GEOMETRY",
            CalcError::NoCompatibleHardware { .. } => "NO_COMPATIBLE_HARDWARE",
            CalcError::UnsupportedOpening { .. } => "UNSUPPORTED_OPENING",
            CalcError::NotFound { .. } => "NOT_FOUND",
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_dimension("width", "-5", "Width must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidDimension\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::not_found("Glass", "g-1").error_code(), "NOT_FOUND");
        let missing = CalcError::MissingProfileRole {
            system_id: "alu-45".to_string(),
            role: ProfileRole::Sash,
        };
        assert_eq!(missing.error_code(), "MISSING_PROFILE_ROLE");
        assert!(!missing.is_recoverable());
    }

    #[test]
    fn test_hardware_error_names_category() {
        let error = CalcError::NoCompatibleHardware {
            category: HardwareCategory::Roller,
            opening_type: OpeningType::Sliding,
            material_kind: MaterialKind::Wood,
        };
        assert_eq!(
            error.to_string(),
            "No compatible roller for sliding opening in wood system"
        );
    }
}
