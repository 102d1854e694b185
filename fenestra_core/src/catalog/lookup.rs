//! Catalog lookup seam.
//!
//! The engine never reaches into a live store. Callers hand it something
//! implementing [`CatalogLookup`] (normally an immutable [`CatalogSnapshot`])
//! and [`resolve`] copies out exactly the records one calculation needs.
//! A concurrent catalog edit therefore cannot change a BOM mid-calculation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Glass, Hardware, MaterialSystem, Profile, ProfileRole};
use crate::calculations::WindowConfig;
use crate::errors::{CalcError, CalcResult};

/// Read-only access to catalog records by identifier.
///
/// Every lookup fails with [`CalcError::NotFound`] for unknown ids.
pub trait CatalogLookup {
    fn material_system(&self, id: &str) -> CalcResult<MaterialSystem>;

    /// All profiles owned by a material system
    fn profiles(&self, system_id: &str) -> CalcResult<Vec<Profile>>;

    fn hardware_catalog(&self) -> CalcResult<Vec<Hardware>>;

    fn glass(&self, id: &str) -> CalcResult<Glass>;
}

/// Immutable in-memory copy of a catalog.
///
/// Serializes to the catalog JSON file format read by
/// [`load_catalog`](crate::file_io::load_catalog).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub systems: Vec<MaterialSystem>,
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub hardware: Vec<Hardware>,
    #[serde(default)]
    pub glass: Vec<Glass>,
}

impl CatalogSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a material system
    pub fn with_system(mut self, system: MaterialSystem) -> Self {
        self.systems.push(system);
        self
    }

    /// Builder: add a profile
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profiles.push(profile);
        self
    }

    /// Builder: add a hardware item
    pub fn with_hardware(mut self, hardware: Hardware) -> Self {
        self.hardware.push(hardware);
        self
    }

    /// Builder: add a glass type
    pub fn with_glass(mut self, glass: Glass) -> Self {
        self.glass.push(glass);
        self
    }
}

impl CatalogLookup for CatalogSnapshot {
    fn material_system(&self, id: &str) -> CalcResult<MaterialSystem> {
        self.systems
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| CalcError::not_found("MaterialSystem", id))
    }

    fn profiles(&self, system_id: &str) -> CalcResult<Vec<Profile>> {
        // Unknown system is NotFound; a known system with no profiles is not
        self.material_system(system_id)?;
        Ok(self
            .profiles
            .iter()
            .filter(|p| p.system_id == system_id)
            .cloned()
            .collect())
    }

    fn hardware_catalog(&self) -> CalcResult<Vec<Hardware>> {
        Ok(self.hardware.clone())
    }

    fn glass(&self, id: &str) -> CalcResult<Glass> {
        self.glass
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or_else(|| CalcError::not_found("Glass", id))
    }
}

/// Every catalog record one calculation needs, owned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCatalog {
    pub system: MaterialSystem,
    /// At most one profile per role
    pub profiles: BTreeMap<ProfileRole, Profile>,
    pub hardware: Vec<Hardware>,
    pub glass: Glass,
}

impl ResolvedCatalog {
    /// Get the system's profile for a role.
    ///
    /// Fails with `MissingProfileRole` if the system does not define one.
    pub fn profile(&self, role: ProfileRole) -> CalcResult<&Profile> {
        self.profiles
            .get(&role)
            .ok_or_else(|| CalcError::MissingProfileRole {
                system_id: self.system.id.clone(),
                role,
            })
    }
}

/// Resolve the records referenced by a configuration.
///
/// Fails with `NotFound` for unknown system or glass ids, and with
/// `InvalidInput` if the system defines two profiles for the same role.
pub fn resolve(config: &WindowConfig, catalog: &impl CatalogLookup) -> CalcResult<ResolvedCatalog> {
    let system = catalog.material_system(&config.system_id)?;
    let glass = catalog.glass(&config.glass_id)?;

    let mut profiles = BTreeMap::new();
    for profile in catalog.profiles(&system.id)? {
        let role = profile.role;
        if let Some(existing) = profiles.insert(role, profile) {
            return Err(CalcError::invalid_input(
                "profiles",
                existing.id,
                format!("Material system '{}' defines more than one {} profile", system.id, role),
            ));
        }
    }

    let hardware = catalog.hardware_catalog()?;

    tracing::debug!(
        system = %system.id,
        glass = %glass.id,
        profiles = profiles.len(),
        hardware = hardware.len(),
        "resolved catalog records"
    );

    Ok(ResolvedCatalog {
        system,
        profiles,
        hardware,
        glass,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::test_support::{sample_catalog, window};
    use crate::calculations::OpeningType;

    #[test]
    fn test_resolve_collects_profiles_by_role() {
        let catalog = sample_catalog();
        let resolved = resolve(&window(1000.0, 1200.0, OpeningType::Casement), &catalog).unwrap();
        assert_eq!(resolved.system.id, "alu-45");
        assert_eq!(resolved.profiles.len(), 4);
        assert_eq!(resolved.profile(ProfileRole::Sash).unwrap().code, "ALU-S45");
    }

    #[test]
    fn test_unknown_system_is_not_found() {
        let catalog = sample_catalog();
        let mut config = window(1000.0, 1200.0, OpeningType::Casement);
        config.system_id = "invalid-system-id".to_string();
        let err = resolve(&config, &catalog).unwrap_err();
        assert_eq!(err, CalcError::not_found("MaterialSystem", "invalid-system-id"));
    }

    #[test]
    fn test_unknown_glass_is_not_found() {
        let catalog = sample_catalog();
        let mut config = window(1000.0, 1200.0, OpeningType::Casement);
        config.glass_id = "invalid-glass-id".to_string();
        let err = resolve(&config, &catalog).unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_duplicate_role_is_rejected() {
        let mut catalog = sample_catalog();
        let mut extra = catalog.profiles[0].clone();
        extra.id = "alu-45-frame-b".to_string();
        catalog.profiles.push(extra);
        let err = resolve(&window(1000.0, 1200.0, OpeningType::Casement), &catalog).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_missing_role_reported_on_access() {
        let mut catalog = sample_catalog();
        catalog.profiles.retain(|p| p.role != ProfileRole::Transom);
        let resolved = resolve(&window(1000.0, 1200.0, OpeningType::Casement), &catalog).unwrap();
        let err = resolved.profile(ProfileRole::Transom).unwrap_err();
        assert_eq!(
            err,
            CalcError::MissingProfileRole {
                system_id: "alu-45".to_string(),
                role: ProfileRole::Transom,
            }
        );
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let catalog = sample_catalog();
        let json = serde_json::to_string(&catalog).unwrap();
        let roundtrip: CatalogSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(catalog, roundtrip);
    }
}
