//! In-memory medicine catalog.
//!
//! Built once at startup and read-only afterwards; every lookup borrows.

use std::collections::HashMap;

use crate::config::CATALOG_LOOKUP_LIMIT;
use crate::models::{Medicine, MedicineRecord};

/// Immutable, OTC-only medicine catalog.
#[derive(Debug, Clone, Default)]
pub struct MedicineCatalog {
    medicines: Vec<Medicine>,
    by_id: HashMap<String, usize>,
}

impl MedicineCatalog {
    /// Build a catalog from normalized medicines. Non-OTC entries are dropped.
    pub fn new(medicines: Vec<Medicine>) -> Self {
        let total = medicines.len();
        let medicines: Vec<Medicine> = medicines.into_iter().filter(|m| m.is_otc()).collect();

        let mut by_id = HashMap::with_capacity(medicines.len());
        for (idx, med) in medicines.iter().enumerate() {
            // First record wins on duplicate ids
            by_id.entry(med.id.clone()).or_insert(idx);
        }

        tracing::debug!(
            kept = medicines.len(),
            skipped = total - medicines.len(),
            "Built medicine catalog"
        );

        Self { medicines, by_id }
    }

    /// Normalize raw records and build a catalog from them.
    pub fn from_records(records: &[MedicineRecord]) -> Self {
        Self::new(records.iter().map(Medicine::from_record).collect())
    }

    /// Get a medicine by id.
    pub fn lookup_by_id(&self, id: &str) -> Option<&Medicine> {
        self.by_id.get(id).map(|&idx| &self.medicines[idx])
    }

    /// Find medicines by category and optional indication, in catalog order.
    ///
    /// Capped at [`CATALOG_LOOKUP_LIMIT`] results.
    pub fn lookup_by_category_and_indication(
        &self,
        category: &str,
        indication: Option<&str>,
    ) -> Vec<&Medicine> {
        self.medicines
            .iter()
            .filter(|m| m.is_otc() && m.matches(category, indication))
            .take(CATALOG_LOOKUP_LIMIT)
            .collect()
    }

    /// All medicines in catalog order.
    pub fn medicines(&self) -> &[Medicine] {
        &self.medicines
    }

    pub fn len(&self) -> usize {
        self.medicines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.medicines.is_empty()
    }
}
