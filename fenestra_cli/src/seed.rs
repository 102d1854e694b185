//! Built-in sample catalog.
//!
//! Three profile systems, five glass types and enough hardware that every
//! opening type a system offers can be quoted. Used when no `--catalog`
//! file is given, and written out by `fenestra sample-catalog`.

use once_cell::sync::Lazy;

use fenestra_core::catalog::{
    CatalogSnapshot, Glass, Hardware, HardwareCategory, MaterialKind, MaterialSystem, Profile, ProfileRole,
};
use fenestra_core::OpeningType::{self, *};

pub static SAMPLE_CATALOG: Lazy<CatalogSnapshot> = Lazy::new(build);

const ALL_KINDS: [MaterialKind; 3] = [MaterialKind::Aluminum, MaterialKind::Upvc, MaterialKind::Wood];

fn system(id: &str, name: &str, kind: MaterialKind, openings: [OpeningType; 3], description: &str) -> MaterialSystem {
    let mut system = MaterialSystem::new(id, name, kind).with_openings(openings);
    system.description = Some(description.to_string());
    system
}

fn profile(system_id: &str, role: ProfileRole, code: &str, cost_per_m: f64, weight_per_m: f64, description: &str) -> Profile {
    Profile {
        id: format!("{}-{}", system_id, role.code()),
        system_id: system_id.to_string(),
        role,
        code: code.to_string(),
        cost_per_m,
        weight_per_m,
        description: Some(description.to_string()),
    }
}

fn glass(id: &str, description: &str, glass_type: &str, thickness_mm: f64, u_value: f64, cost_per_m2: f64) -> Glass {
    Glass {
        id: id.to_string(),
        description: description.to_string(),
        glass_type: glass_type.to_string(),
        thickness_mm,
        u_value,
        cost_per_m2,
        weight_per_m2: None,
        size_limits: None,
    }
}

fn build() -> CatalogSnapshot {
    let mut catalog = CatalogSnapshot::new()
        .with_system(system(
            "alu-45",
            "Alu-Serie 45",
            MaterialKind::Aluminum,
            [Casement, Awning, TurnTilt],
            "Sistema de aluminio de 45mm para uso residencial",
        ))
        .with_system(system(
            "upvc-70",
            "uPVC-Serie 70",
            MaterialKind::Upvc,
            [Casement, TurnTilt, Sliding],
            "Sistema uPVC de 70mm con cámaras múltiples",
        ))
        .with_system(system(
            "wood-68",
            "Madera-Euro68",
            MaterialKind::Wood,
            [Casement, Awning, TurnTilt],
            "Sistema de madera europea de 68mm",
        ));

    catalog.profiles = vec![
        profile("alu-45", ProfileRole::Frame, "ALU-F45", 15.50, 1.2, "Marco aluminio 45mm"),
        profile("alu-45", ProfileRole::Sash, "ALU-S45", 12.30, 0.9, "Hoja aluminio 45mm"),
        profile("alu-45", ProfileRole::Mullion, "ALU-M45", 13.80, 1.0, "Parteluz aluminio 45mm"),
        profile("alu-45", ProfileRole::Transom, "ALU-T45", 13.80, 1.0, "Travesaño aluminio 45mm"),
        profile("upvc-70", ProfileRole::Frame, "PVC-F70", 18.90, 2.1, "Marco uPVC 70mm"),
        profile("upvc-70", ProfileRole::Sash, "PVC-S70", 16.70, 1.8, "Hoja uPVC 70mm"),
        profile("upvc-70", ProfileRole::Mullion, "PVC-M70", 17.40, 1.9, "Parteluz uPVC 70mm"),
        profile("wood-68", ProfileRole::Frame, "WOOD-F68", 35.50, 2.8, "Marco madera 68mm"),
        profile("wood-68", ProfileRole::Sash, "WOOD-S68", 32.80, 2.5, "Hoja madera 68mm"),
    ];

    catalog.glass = vec![
        glass("dg-4-12-4", "4-12-4 Doble Acrist.", "double", 20.0, 2.8, 28.50),
        glass("dg-4-16-4", "4-16-4 Doble Acrist.", "double", 24.0, 2.6, 32.80),
        glass("dg-6-12-6", "6-12-6 Doble Acrist.", "double", 24.0, 2.7, 35.90),
        glass("lam-3-3", "3+3 Laminado", "laminated", 6.0, 5.8, 42.30),
        glass("tg-4-12-4-12-4", "Triple 4-12-4-12-4", "triple", 32.0, 1.8, 48.70),
    ];

    catalog.hardware = vec![
        Hardware::new("hw-hinge-casement", "Kit Batiente Estándar", HardwareCategory::Hinge, 45.80)
            .with_weight(0.9)
            .for_openings([Casement, Folding])
            .for_materials(ALL_KINDS)
            .with_leaf_limits(Some(1200.0), Some(1500.0)),
        Hardware::new("hw-hinge-awning", "Kit Proyectante", HardwareCategory::Hinge, 38.50)
            .with_weight(0.7)
            .for_openings([Awning])
            .for_materials(ALL_KINDS)
            .with_leaf_limits(Some(1000.0), Some(800.0)),
        Hardware::new("hw-hinge-turn-tilt", "Kit Oscilobatiente", HardwareCategory::Hinge, 125.90)
            .with_weight(1.6)
            .for_openings([TurnTilt])
            .for_materials(ALL_KINDS)
            .with_leaf_limits(Some(1400.0), Some(1800.0)),
        Hardware::new("hw-roller-sliding", "Kit Corredera", HardwareCategory::Roller, 67.30)
            .with_weight(0.6)
            .for_openings([Sliding])
            .for_materials([MaterialKind::Aluminum, MaterialKind::Upvc])
            .with_leaf_limits(Some(2500.0), Some(2200.0)),
        Hardware::new("hw-handle", "Manilla Estándar", HardwareCategory::Handle, 18.90)
            .with_weight(0.15)
            .for_openings(OpeningType::ALL)
            .for_materials(ALL_KINDS),
        Hardware::new("hw-lock-multipoint", "Cerradura Multipunto", HardwareCategory::Lock, 89.50)
            .with_weight(0.8)
            .for_openings([Casement, Awning, TurnTilt, Folding])
            .for_materials(ALL_KINDS),
        Hardware::new("hw-lock-sliding", "Cierre Corredera", HardwareCategory::Lock, 24.00)
            .with_weight(0.3)
            .for_openings([Sliding])
            .for_materials([MaterialKind::Aluminum, MaterialKind::Upvc]),
    ];

    catalog
}

#[cfg(test)]
mod tests {
    use super::*;
    use fenestra_core::calculations::WindowConfig;
    use fenestra_core::{calculate, EngineSettings};

    fn config(system_id: &str, opening_type: OpeningType) -> WindowConfig {
        WindowConfig {
            width: 1000.0,
            height: 700.0,
            opening_type,
            system_id: system_id.to_string(),
            glass_id: "dg-4-16-4".to_string(),
            leaves: 1,
            mullions: 0,
            transoms: 0,
        }
    }

    #[test]
    fn test_every_offered_opening_resolves() {
        let settings = EngineSettings::default();
        for system in &SAMPLE_CATALOG.systems {
            for &opening_type in &system.compatible_openings {
                let result = calculate(&config(&system.id, opening_type), &*SAMPLE_CATALOG, &settings);
                assert!(result.is_ok(), "{} / {}: {:?}", system.id, opening_type, result);
            }
        }
    }

    #[test]
    fn test_unoffered_opening_is_rejected() {
        let err = calculate(
            &config("wood-68", Sliding),
            &*SAMPLE_CATALOG,
            &EngineSettings::default(),
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_OPENING");
    }

    #[test]
    fn test_glass_weight_from_thickness() {
        let triple = SAMPLE_CATALOG.glass.iter().find(|g| g.glass_type == "triple").unwrap();
        assert_eq!(triple.weight_per_m2(), 80.0);
    }
}
