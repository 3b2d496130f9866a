//! Linac unit domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A configured linear accelerator.
///
/// Units are never hard-deleted; decommissioning clears `active` so that
/// historical reports keep a valid reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: i64,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub location: String,
    pub install_date: Option<NaiveDate>,
    pub photon_energies: Vec<String>,
    pub electron_energies: Vec<String>,
    pub fff_energies: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Unit {
    /// All photon-mode energies: flattened beams first, then FFF.
    ///
    /// Selection UIs and trend queries list FFF options after the standard
    /// photon options, never interleaved.
    pub fn all_photon_energies(&self) -> Vec<String> {
        self.photon_energies
            .iter()
            .chain(self.fff_energies.iter())
            .cloned()
            .collect()
    }

    /// Whether `energy` is configured on this unit in any mode.
    pub fn has_energy(&self, energy: &str) -> bool {
        self.photon_energies.iter().any(|e| e == energy)
            || self.electron_energies.iter().any(|e| e == energy)
            || self.fff_energies.iter().any(|e| e == energy)
    }
}

/// Request payload for creating a unit.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnitRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be between 1 and 50 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub manufacturer: String,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub model: String,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub serial_number: String,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub location: String,

    pub install_date: Option<NaiveDate>,

    #[serde(default)]
    pub photon_energies: Vec<String>,

    #[serde(default)]
    pub electron_energies: Vec<String>,

    #[serde(default)]
    pub fff_energies: Vec<String>,
}

/// Partial-update payload for a unit; absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUnitRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be between 1 and 50 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 50))]
    pub manufacturer: Option<String>,

    #[validate(length(max = 50))]
    pub model: Option<String>,

    #[validate(length(max = 50))]
    pub serial_number: Option<String>,

    #[validate(length(max = 100))]
    pub location: Option<String>,

    pub install_date: Option<NaiveDate>,
    pub photon_energies: Option<Vec<String>>,
    pub electron_energies: Option<Vec<String>>,
    pub fff_energies: Option<Vec<String>>,
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn truebeam() -> Unit {
        Unit {
            id: 2,
            name: "TrueBeam".to_string(),
            manufacturer: "Varian".to_string(),
            model: "TrueBeam".to_string(),
            serial_number: "TB-1042".to_string(),
            location: "Vault 2".to_string(),
            install_date: None,
            photon_energies: vec!["6MV".into(), "10MV".into(), "15MV".into()],
            electron_energies: vec!["6MeV".into(), "9MeV".into()],
            fff_energies: vec!["6MV FFF".into(), "10MV FFF".into()],
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn fff_energies_follow_photon_energies() {
        let unit = truebeam();
        assert_eq!(
            unit.all_photon_energies(),
            vec!["6MV", "10MV", "15MV", "6MV FFF", "10MV FFF"]
        );
    }

    #[test]
    fn all_photon_energies_without_fff() {
        let mut unit = truebeam();
        unit.fff_energies.clear();
        assert_eq!(unit.all_photon_energies(), vec!["6MV", "10MV", "15MV"]);
    }

    #[test]
    fn has_energy_covers_all_modes() {
        let unit = truebeam();
        assert!(unit.has_energy("6MV"));
        assert!(unit.has_energy("9MeV"));
        assert!(unit.has_energy("10MV FFF"));
        assert!(!unit.has_energy("18MeV"));
    }

    #[test]
    fn create_request_rejects_empty_name() {
        let request = CreateUnitRequest {
            name: String::new(),
            manufacturer: String::new(),
            model: String::new(),
            serial_number: String::new(),
            location: String::new(),
            install_date: None,
            photon_energies: vec![],
            electron_energies: vec![],
            fff_energies: vec![],
        };
        assert!(validator::Validate::validate(&request).is_err());
    }
}
