//! Full assessment report handed to adapters.

use serde::{Deserialize, Serialize};

use crate::config::{DISCLAIMER, ENGINE_VERSION, EVIDENCE_DATE, LEXICON_VERSION, MEDICINE_POLICY};
use crate::models::{
    AgeGroup, BmiCategory, Evidence, Patient, SeverityAssessment, TreatmentOption, TriageLevel,
};

/// Patient details echoed back in a report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientSummary {
    pub name: String,
    pub age: Option<f64>,
    pub age_group: Option<AgeGroup>,
    pub sex: Option<String>,
    pub bmi: Option<f64>,
    pub bmi_category: Option<BmiCategory>,
}

impl From<&Patient> for PatientSummary {
    fn from(patient: &Patient) -> Self {
        let bmi = patient.bmi();
        Self {
            name: patient.name.clone(),
            age: patient.known_age(),
            age_group: patient.age_group(),
            sex: patient.sex.clone(),
            bmi,
            bmi_category: bmi.map(BmiCategory::from_bmi),
        }
    }
}

/// Result of assessing one patient.
///
/// Always carries the disclaimer and requires clinician sign-off.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssessmentReport {
    pub assessment_id: String,
    /// RFC 3339, UTC
    pub generated_at: String,
    pub engine_version: String,
    pub lexicon_version: String,
    pub patient_summary: PatientSummary,
    pub severity: SeverityAssessment,
    pub triage: TriageLevel,
    pub options: Vec<TreatmentOption>,
    pub disclaimer: String,
    pub medicine_policy: String,
    pub requires_clinician_signoff: bool,
}

impl AssessmentReport {
    pub(crate) fn new(
        patient: &Patient,
        severity: SeverityAssessment,
        options: Vec<TreatmentOption>,
    ) -> Self {
        Self {
            assessment_id: uuid::Uuid::new_v4().to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            engine_version: ENGINE_VERSION.to_string(),
            lexicon_version: LEXICON_VERSION.to_string(),
            patient_summary: PatientSummary::from(patient),
            triage: severity.case_severity.triage_level(),
            severity,
            options,
            disclaimer: DISCLAIMER.to_string(),
            medicine_policy: MEDICINE_POLICY.to_string(),
            requires_clinician_signoff: true,
        }
    }

    /// Export as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Guideline reference for a patient age.
pub fn evidence_for_age(age: f64) -> Evidence {
    let group = AgeGroup::from_age(age);
    let (title, snippet) = if age < 18.0 {
        (
            format!("Pediatric dosing guidelines for {}s", group.as_str()),
            format!("Special considerations required for {} age group.", group.as_str()),
        )
    } else if age >= 65.0 {
        (
            "Geriatric prescribing guidelines".to_string(),
            "Consider reduced dosing and increased monitoring in elderly patients.".to_string(),
        )
    } else {
        (
            "Adult treatment guidelines".to_string(),
            "Standard adult dosing and monitoring recommended.".to_string(),
        )
    };

    Evidence {
        title,
        date: EVIDENCE_DATE.to_string(),
        snippet,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evidence_by_age() {
        let child = evidence_for_age(8.0);
        assert_eq!(child.title, "Pediatric dosing guidelines for childs");
        assert_eq!(child.snippet, "Special considerations required for child age group.");
        assert_eq!(child.date, "2025-09-10");

        assert_eq!(evidence_for_age(17.9).title, "Pediatric dosing guidelines for adolescents");
        assert_eq!(evidence_for_age(18.0).title, "Adult treatment guidelines");
        assert_eq!(evidence_for_age(65.0).title, "Geriatric prescribing guidelines");
    }

    #[test]
    fn test_patient_summary_bmi() {
        let mut patient = Patient::new("Dana", "cough").with_age(40.0);
        patient.weight_kg = Some(80.0);
        patient.height_m = Some(2.0);

        let summary = PatientSummary::from(&patient);
        assert_eq!(summary.age_group, Some(AgeGroup::Adult));
        assert_eq!(summary.bmi, Some(20.0));
        assert_eq!(summary.bmi_category, Some(BmiCategory::NormalWeight));
    }

    #[test]
    fn test_patient_summary_without_measurements() {
        let summary = PatientSummary::from(&Patient::new("Sam", ""));
        assert!(summary.age.is_none());
        assert!(summary.age_group.is_none());
        assert!(summary.bmi.is_none());
        assert!(summary.bmi_category.is_none());
    }
}
