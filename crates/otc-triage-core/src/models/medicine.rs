//! Medicine catalog models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::patient::AgeGroup;

/// Classification string a medicine must carry to be recommended.
pub const OTC_CLASSIFICATION: &str = "over-the-counter";

/// Raw medicine row as supplied by a catalog source (CSV export, host app).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicineRecord {
    pub name: String,
    pub category: String,
    pub dosage_form: String,
    pub strength: String,
    pub manufacturer: String,
    pub indication: String,
    pub classification: String,
}

/// A normalized medicine in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medicine {
    /// Stable identifier derived from the name (e.g., "paracetamol_500")
    pub id: String,
    /// Display name
    pub name: String,
    /// Therapeutic category (e.g., "analgesic", "antiseptic")
    pub category: String,
    /// Dosage form (e.g., "Tablet", "Syrup")
    pub dosage_form: String,
    /// Strength (e.g., "500 mg")
    pub strength: String,
    /// Manufacturer
    pub manufacturer: String,
    /// Primary indication (e.g., "pain", "fever", "wound")
    pub indication: String,
    /// Regulatory classification
    pub classification: String,
    /// Dosing guidance per age group
    pub age_dosing: BTreeMap<AgeGroup, AgeDosing>,
}

/// Dosing guidance for one age group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgeDosing {
    /// Human-readable dose text
    pub dose: String,
    /// Minimum age in years (inclusive)
    pub min_age: f64,
    /// Maximum age in years (inclusive)
    pub max_age: f64,
    /// Optional advisory note
    pub notes: Option<String>,
}

impl AgeDosing {
    /// Check if an age falls inside the recommended range.
    pub fn covers(&self, age: f64) -> bool {
        age >= self.min_age && age <= self.max_age
    }
}

/// Derive a catalog identifier from a medicine name.
pub fn medicine_id(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

impl Medicine {
    /// Normalize a raw record, attaching the default adult/elderly dosing table.
    pub fn from_record(record: &MedicineRecord) -> Self {
        let form = record.dosage_form.to_lowercase();

        let mut age_dosing = BTreeMap::new();
        age_dosing.insert(
            AgeGroup::Adult,
            AgeDosing {
                dose: format!("{} {}", record.strength, form),
                min_age: 18.0,
                max_age: 64.0,
                notes: None,
            },
        );
        age_dosing.insert(
            AgeGroup::Elderly,
            AgeDosing {
                dose: format!("Reduced dose: {} {}", record.strength, form),
                min_age: 65.0,
                max_age: 999.0,
                notes: Some("Consider dose adjustment for elderly patients".into()),
            },
        );

        Self {
            id: medicine_id(&record.name),
            name: record.name.clone(),
            category: record.category.clone(),
            dosage_form: record.dosage_form.clone(),
            strength: record.strength.clone(),
            manufacturer: record.manufacturer.clone(),
            indication: record.indication.clone(),
            classification: record.classification.clone(),
            age_dosing,
        }
    }

    /// Check if this medicine may be surfaced without a prescription.
    pub fn is_otc(&self) -> bool {
        self.classification.eq_ignore_ascii_case(OTC_CLASSIFICATION)
    }

    /// Check category (and optionally indication) case-insensitively.
    pub fn matches(&self, category: &str, indication: Option<&str>) -> bool {
        if !self.category.eq_ignore_ascii_case(category) {
            return false;
        }
        match indication {
            None => true,
            Some(ind) => self.indication.eq_ignore_ascii_case(ind),
        }
    }

    /// Dosing entry for an age group, if the medicine covers it.
    pub fn dosing_for(&self, group: AgeGroup) -> Option<&AgeDosing> {
        self.age_dosing.get(&group)
    }
}
