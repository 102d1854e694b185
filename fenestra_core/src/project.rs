//! # Quote Projects
//!
//! A `QuoteProject` groups the windows and doors quoted for one client.
//! Projects serialize to `.fnq` (Fenestra quote) files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! QuoteProject
//! ├── meta: QuoteMetadata (version, client, reference, currency label, timestamps)
//! ├── margin_percent: Option<f64> (overrides the engine margin for this client)
//! └── items: HashMap<Uuid, QuoteItem> (labelled window configurations)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use fenestra_core::project::QuoteProject;
//!
//! let project = QuoteProject::new("Acme Construction", "Q-25-001");
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("Acme Construction"));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bom::CalculationResult;
use crate::calculations::{calculate, WindowConfig};
use crate::catalog::CatalogLookup;
use crate::errors::CalcResult;
use crate::settings::EngineSettings;

/// Current schema version for .fnq files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
///
/// Items are stored in a flat UUID-keyed map so labels can repeat and
/// edits never shift another item's identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteProject {
    pub meta: QuoteMetadata,

    /// Client-specific margin in percent. `None` uses the engine settings.
    #[serde(default)]
    pub margin_percent: Option<f64>,

    pub items: HashMap<Uuid, QuoteItem>,
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    pub client: String,

    /// Quote number (e.g., "Q-25-001")
    pub reference: String,

    /// Display label for amounts; no conversion is ever applied
    pub currency: String,

    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// One labelled window/door in a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteItem {
    /// User label (e.g., "W-01 Kitchen")
    pub label: String,

    /// Identical units quoted on this line
    #[serde(default = "default_units")]
    pub units: u32,

    pub config: WindowConfig,
}

fn default_units() -> u32 {
    1
}

/// Priced project item.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteLine {
    pub id: Uuid,
    pub label: String,
    pub units: u32,
    pub result: CalcResult<CalculationResult>,
}

impl QuoteLine {
    /// Final price of all units on this line, if it priced
    pub fn line_total(&self) -> Option<f64> {
        self.result
            .as_ref()
            .ok()
            .map(|r| r.final_price * f64::from(self.units))
    }
}

/// Every item of a project priced against one catalog snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectQuote {
    /// Sorted by label, then id
    pub lines: Vec<QuoteLine>,
}

impl ProjectQuote {
    /// Sum of all lines that priced successfully
    pub fn total_price(&self) -> f64 {
        self.lines.iter().filter_map(QuoteLine::line_total).sum()
    }

    /// Lines that failed to price
    pub fn failures(&self) -> impl Iterator<Item = &QuoteLine> {
        self.lines.iter().filter(|line| line.result.is_err())
    }
}

impl QuoteProject {
    /// Create a new empty project.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fenestra_core::project::QuoteProject;
    ///
    /// let project = QuoteProject::new("Client Corp", "Q-25-001");
    /// assert_eq!(project.meta.currency, "EUR");
    /// ```
    pub fn new(client: impl Into<String>, reference: impl Into<String>) -> Self {
        let now = Utc::now();
        QuoteProject {
            meta: QuoteMetadata {
                version: SCHEMA_VERSION.to_string(),
                client: client.into(),
                reference: reference.into(),
                currency: "EUR".to_string(),
                created: now,
                modified: now,
            },
            margin_percent: None,
            items: HashMap::new(),
        }
    }

    /// Add a window to the project and return its id.
    pub fn add_item(&mut self, label: impl Into<String>, config: WindowConfig) -> Uuid {
        let id = Uuid::new_v4();
        self.items.insert(
            id,
            QuoteItem {
                label: label.into(),
                units: 1,
                config,
            },
        );
        self.touch();
        id
    }

    /// Remove an item by UUID, returning it if it existed.
    pub fn remove_item(&mut self, id: &Uuid) -> Option<QuoteItem> {
        let item = self.items.remove(id);
        if item.is_some() {
            self.touch();
        }
        item
    }

    pub fn get_item(&self, id: &Uuid) -> Option<&QuoteItem> {
        self.items.get(id)
    }

    /// Get a mutable reference to an item.
    ///
    /// Marks the project as modified when the item exists.
    pub fn get_item_mut(&mut self, id: &Uuid) -> Option<&mut QuoteItem> {
        if self.items.contains_key(id) {
            self.meta.modified = Utc::now();
            self.items.get_mut(id)
        } else {
            None
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Engine settings with this project's margin override applied
    pub fn effective_settings(&self, base: &EngineSettings) -> EngineSettings {
        match self.margin_percent {
            Some(percent) => base.with_margin_rate(percent / 100.0),
            None => *base,
        }
    }

    /// Price every item against one catalog snapshot.
    ///
    /// Items are independent, so they are priced in parallel. A failing item
    /// does not stop the others; its error is kept on its line.
    pub fn calculate_all<C>(&self, catalog: &C, settings: &EngineSettings) -> ProjectQuote
    where
        C: CatalogLookup + Sync,
    {
        let settings = self.effective_settings(settings);

        let mut lines: Vec<QuoteLine> = self
            .items
            .par_iter()
            .map(|(id, item)| QuoteLine {
                id: *id,
                label: item.label.clone(),
                units: item.units,
                result: calculate(&item.config, catalog, &settings),
            })
            .collect();
        lines.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.id.cmp(&b.id)));

        tracing::info!(
            reference = %self.meta.reference,
            items = lines.len(),
            failed = lines.iter().filter(|l| l.result.is_err()).count(),
            "project priced"
        );
        ProjectQuote { lines }
    }
}

impl Default for QuoteProject {
    fn default() -> Self {
        QuoteProject::new("", "")
    }
}
