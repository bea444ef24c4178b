//! Patient-specific safety checks.

use crate::catalog::MedicineCatalog;
use crate::models::{AgeGroup, Patient, TreatmentOption};

/// Validates an option's medicines against a patient.
#[derive(Debug, Clone, Copy)]
pub struct SafetyChecker<'a> {
    catalog: &'a MedicineCatalog,
}

impl<'a> SafetyChecker<'a> {
    pub fn new(catalog: &'a MedicineCatalog) -> Self {
        Self { catalog }
    }

    /// Flag age and catalog problems for every drug on the option.
    ///
    /// Side effect: `option.dosing` is set from the dosing entry of each
    /// covered drug, so with several drugs the last one wins.
    pub fn check(&self, option: &mut TreatmentOption, patient: &Patient) -> Vec<String> {
        let mut flags = Vec::new();
        let age = patient.known_age();

        for drug_id in &option.drug_ids {
            let Some(medicine) = self.catalog.lookup_by_id(drug_id) else {
                flags.push(format!("Unknown drug id: {drug_id}"));
                continue;
            };

            let Some(age) = age else {
                continue;
            };

            let Some(dosing) = medicine.dosing_for(AgeGroup::from_age(age)) else {
                flags.push(format!(
                    "{} is not typically recommended for this age group",
                    medicine.name
                ));
                continue;
            };

            if !dosing.covers(age) {
                flags.push(format!(
                    "{}: Age {age:?} is outside recommended range",
                    medicine.name
                ));
            }
            option.dosing = Some(dosing.dose.clone());
            if let Some(note) = &dosing.notes {
                flags.push(format!("{} note: {note}", medicine.name));
            }
        }

        if !flags.is_empty() {
            tracing::debug!(option = %option.id, flags = flags.len(), "Safety flags raised");
        }

        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeDosing, Medicine, MedicineRecord, OptionKind};

    fn record(name: &str) -> MedicineRecord {
        MedicineRecord {
            name: name.into(),
            category: "Analgesic".into(),
            dosage_form: "Tablet".into(),
            strength: "400 mg".into(),
            manufacturer: "Acme".into(),
            indication: "Pain".into(),
            classification: "Over-the-Counter".into(),
        }
    }

    fn catalog() -> MedicineCatalog {
        let mut gappy = Medicine::from_record(&record("Gappy"));
        // Adult entry narrower than the adult age group
        gappy.age_dosing.insert(
            AgeGroup::Adult,
            AgeDosing {
                dose: "1 tablet".into(),
                min_age: 21.0,
                max_age: 60.0,
                notes: None,
            },
        );
        MedicineCatalog::new(vec![
            Medicine::from_record(&record("Ibuprofen")),
            Medicine::from_record(&record("Naproxen")),
            gappy,
        ])
    }

    fn option_with(drugs: &[&str]) -> TreatmentOption {
        TreatmentOption::new("analgesic_1", OptionKind::Analgesic, "Pain relief", "r")
            .with_drugs(drugs.iter().copied())
    }

    #[test]
    fn test_adult_gets_dosing_without_flags() {
        let catalog = catalog();
        let mut option = option_with(&["ibuprofen"]);
        let flags = SafetyChecker::new(&catalog).check(&mut option, &Patient::new("A", "").with_age(30.0));

        assert!(flags.is_empty());
        assert_eq!(option.dosing.as_deref(), Some("400 mg tablet"));
    }

    #[test]
    fn test_child_not_covered() {
        let catalog = catalog();
        let mut option = option_with(&["ibuprofen"]);
        let flags = SafetyChecker::new(&catalog).check(&mut option, &Patient::new("A", "").with_age(8.0));

        assert_eq!(
            flags,
            vec!["Ibuprofen is not typically recommended for this age group"]
        );
        assert!(option.dosing.is_none());
    }

    #[test]
    fn test_elderly_note() {
        let catalog = catalog();
        let mut option = option_with(&["ibuprofen"]);
        let flags = SafetyChecker::new(&catalog).check(&mut option, &Patient::new("A", "").with_age(70.0));

        assert_eq!(
            flags,
            vec!["Ibuprofen note: Consider dose adjustment for elderly patients"]
        );
        assert_eq!(option.dosing.as_deref(), Some("Reduced dose: 400 mg tablet"));
    }

    #[test]
    fn test_out_of_range_still_sets_dosing() {
        let catalog = catalog();
        let mut option = option_with(&["gappy"]);
        let flags = SafetyChecker::new(&catalog).check(&mut option, &Patient::new("A", "").with_age(19.0));

        assert_eq!(flags, vec!["Gappy: Age 19.0 is outside recommended range"]);
        assert_eq!(option.dosing.as_deref(), Some("1 tablet"));
    }

    #[test]
    fn test_out_of_range_age_keeps_fraction() {
        let catalog = catalog();
        let mut option = option_with(&["gappy"]);
        let flags = SafetyChecker::new(&catalog).check(&mut option, &Patient::new("A", "").with_age(60.5));

        assert_eq!(flags, vec!["Gappy: Age 60.5 is outside recommended range"]);
    }

    #[test]
    fn test_unknown_drug_does_not_abort() {
        let catalog = catalog();
        let mut option = option_with(&["mystery", "ibuprofen"]);
        let flags = SafetyChecker::new(&catalog).check(&mut option, &Patient::new("A", "").with_age(40.0));

        assert_eq!(flags, vec!["Unknown drug id: mystery"]);
        assert_eq!(option.dosing.as_deref(), Some("400 mg tablet"));
    }

    #[test]
    fn test_unknown_age_only_checks_ids() {
        let catalog = catalog();
        let mut option = option_with(&["ibuprofen", "ghost"]);
        let flags = SafetyChecker::new(&catalog).check(&mut option, &Patient::new("A", ""));

        assert_eq!(flags, vec!["Unknown drug id: ghost"]);
        assert!(option.dosing.is_none());
    }

    #[test]
    fn test_last_drug_wins_dosing() {
        let catalog = catalog();
        let mut option = option_with(&["ibuprofen", "gappy"]);
        SafetyChecker::new(&catalog).check(&mut option, &Patient::new("A", "").with_age(30.0));

        assert_eq!(option.dosing.as_deref(), Some("1 tablet"));
    }

    #[test]
    fn test_no_drugs_no_flags() {
        let catalog = catalog();
        let mut option = TreatmentOption::new("general_advice", OptionKind::GeneralCare, "g", "r");
        let flags = SafetyChecker::new(&catalog).check(&mut option, &Patient::new("A", "").with_age(1.0));

        assert!(flags.is_empty());
        assert!(option.dosing.is_none());
    }
}
