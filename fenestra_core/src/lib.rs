//! # fenestra_core - Window & Door Quotation Engine
//!
//! `fenestra_core` turns a window/door configuration into a priced bill of
//! materials. It is a library: catalog storage, user interfaces and PDF
//! quotes live elsewhere and talk to the engine through plain data.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Each calculation is a pure function of its inputs
//! - **JSON-First**: Configurations, catalogs and results are all serializable
//! - **Rich Errors**: Structured error types naming the offending field or id
//! - **Snapshot Catalogs**: Catalog records are resolved once per calculation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fenestra_core::calculations::{calculate, OpeningType, WindowConfig};
//! use fenestra_core::file_io::load_catalog;
//! use fenestra_core::settings::EngineSettings;
//! use std::path::Path;
//!
//! let catalog = load_catalog(Path::new("catalog.json"))?;
//! let config = WindowConfig {
//!     width: 1200.0,
//!     height: 1400.0,
//!     opening_type: OpeningType::TurnTilt,
//!     system_id: "upvc-70".to_string(),
//!     glass_id: "dg-4-16-4".to_string(),
//!     leaves: 1,
//!     mullions: 0,
//!     transoms: 0,
//! };
//!
//! let result = calculate(&config, &catalog, &EngineSettings::default())?;
//! println!("{}", serde_json::to_string_pretty(&result.rounded(0.10)).unwrap());
//! # Ok::<(), fenestra_core::errors::CalcError>(())
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Geometry, glazing, hardware and costing pipeline
//! - [`catalog`] - Catalog records and the lookup seam
//! - [`bom`] - Bill of materials and calculation results
//! - [`settings`] - Tunable engine constants
//! - [`project`] - Multi-item client quotes
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - File operations with atomic saves and locking

pub mod bom;
pub mod calculations;
pub mod catalog;
pub mod errors;
pub mod file_io;
pub mod project;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use bom::{BomItem, BomItemType, CalculationResult};
pub use calculations::{calculate, OpeningType, WindowConfig};
pub use catalog::{CatalogLookup, CatalogSnapshot};
pub use errors::{CalcError, CalcResult};
pub use file_io::{create_project, load_catalog, load_project, load_settings, save_project, FileLock};
pub use project::{QuoteProject, QuoteMetadata};
pub use settings::EngineSettings;
