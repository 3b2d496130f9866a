//! Unit entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

/// Database row mapping for the units table.
///
/// Energy lists are JSONB arrays, matching how the configuration UI edits
/// them as ordered label sequences.
#[derive(Debug, Clone, FromRow)]
pub struct UnitEntity {
    pub id: i64,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub location: String,
    pub install_date: Option<NaiveDate>,
    pub photon_energies: Json<Vec<String>>,
    pub electron_energies: Json<Vec<String>>,
    pub fff_energies: Json<Vec<String>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UnitEntity> for domain::models::Unit {
    fn from(entity: UnitEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            manufacturer: entity.manufacturer,
            model: entity.model,
            serial_number: entity.serial_number,
            location: entity.location,
            install_date: entity.install_date,
            photon_energies: entity.photon_energies.0,
            electron_energies: entity.electron_energies.0,
            fff_energies: entity.fff_energies.0,
            active: entity.active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity() -> UnitEntity {
        UnitEntity {
            id: 1,
            name: "Linac 1".to_string(),
            manufacturer: "Varian".to_string(),
            model: "Clinac".to_string(),
            serial_number: "C-2301".to_string(),
            location: "Vault 1".to_string(),
            install_date: None,
            photon_energies: Json(vec!["6MV".to_string(), "15MV".to_string()]),
            electron_energies: Json(vec!["6MeV".to_string()]),
            fff_energies: Json(vec![]),
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn entity_converts_to_domain() {
        let unit: domain::models::Unit = entity().into();

        assert_eq!(unit.id, 1);
        assert_eq!(unit.name, "Linac 1");
        assert_eq!(unit.photon_energies, vec!["6MV", "15MV"]);
        assert_eq!(unit.electron_energies, vec!["6MeV"]);
        assert!(unit.fff_energies.is_empty());
        assert!(unit.active);
    }

    #[test]
    fn energy_order_survives_conversion() {
        let mut e = entity();
        e.fff_energies = Json(vec!["6MV FFF".to_string(), "10MV FFF".to_string()]);

        let unit: domain::models::Unit = e.into();
        assert_eq!(
            unit.all_photon_energies(),
            vec!["6MV", "15MV", "6MV FFF", "10MV FFF"]
        );
    }
}
