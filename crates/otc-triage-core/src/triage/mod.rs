//! Symptom triage engine.
//!
//! Pipeline: Severity Classification → Cluster Scoring → Option Selection → Safety Checks
//!
//! Classification and cluster scoring read the same text independently.
//! Everything here is read-only over the catalog and the static tables, so a
//! single [`TriageEngine`] can serve any number of threads.

pub mod clusters;
pub mod lexicon;
mod report;
pub mod safety;
pub mod selector;
pub mod vocabulary;

pub use clusters::ClusterScorer;
pub use lexicon::{SeverityClassifier, SeverityLexicon};
pub use report::*;
pub use safety::SafetyChecker;
pub use selector::OptionSelector;
pub use vocabulary::{suggest, SymptomCategory, SymptomEntry, SymptomSuggestion, SYMPTOM_VOCABULARY};

use std::sync::Arc;

use thiserror::Error;

use crate::catalog::MedicineCatalog;
use crate::db::{Database, DbError};
use crate::models::{AgeGroup, Patient, SeverityAssessment, TreatmentOption};

/// Triage errors. Clinical findings are never errors; they become flags.
#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type TriageResult<T> = Result<T, TriageError>;

/// Split comma-separated symptom text into trimmed, lower-cased tokens.
///
/// Empty segments are dropped.
pub fn tokenize(symptoms_text: &str) -> Vec<String> {
    symptoms_text
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Age group for an age in years.
pub fn age_group(age: f64) -> AgeGroup {
    AgeGroup::from_age(age)
}

/// Reject patient data no assessment can be built from.
pub fn validate_patient(patient: &Patient) -> TriageResult<()> {
    if let Some(age) = patient.age {
        if !age.is_finite() || age < 0.0 {
            return Err(TriageError::InvalidInput(format!("invalid age: {age}")));
        }
    }
    for (field, value) in [("weight_kg", patient.weight_kg), ("height_m", patient.height_m)] {
        if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
            return Err(TriageError::InvalidInput(format!("invalid {field}")));
        }
    }
    Ok(())
}

/// Coordinates the full triage pipeline over a shared catalog.
#[derive(Debug, Clone)]
pub struct TriageEngine {
    catalog: Arc<MedicineCatalog>,
    classifier: SeverityClassifier<'static>,
    scorer: ClusterScorer<'static>,
    selector: OptionSelector,
}

impl TriageEngine {
    /// Create an engine with the built-in lexicon and cluster tables.
    pub fn new(catalog: impl Into<Arc<MedicineCatalog>>) -> Self {
        Self {
            catalog: catalog.into(),
            classifier: SeverityClassifier::default(),
            scorer: ClusterScorer::default(),
            selector: OptionSelector::default(),
        }
    }

    /// Load the OTC catalog from a database.
    pub fn from_database(db: &Database) -> TriageResult<Self> {
        let catalog = db.load_catalog()?;
        tracing::info!(medicines = catalog.len(), "Triage engine ready");
        Ok(Self::new(catalog))
    }

    /// Replace the option selector (for a different cap).
    pub fn with_selector(mut self, selector: OptionSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn catalog(&self) -> &MedicineCatalog {
        &self.catalog
    }

    /// Classify symptom text.
    pub fn classify_severity(&self, symptoms_text: &str) -> SeverityAssessment {
        self.classifier.classify(symptoms_text)
    }

    /// Produce finalized treatment options for symptom text.
    pub fn generate_options(&self, symptoms_text: &str) -> Vec<TreatmentOption> {
        let assessment = self.classify_severity(symptoms_text);
        self.options_for(symptoms_text, &assessment)
    }

    /// Annotate one option for a patient. May set `option.dosing`.
    pub fn check_safety(&self, option: &mut TreatmentOption, patient: &Patient) -> Vec<String> {
        SafetyChecker::new(&self.catalog).check(option, patient)
    }

    /// Run the whole pipeline for a patient.
    pub fn assess(&self, patient: &Patient) -> AssessmentReport {
        let severity = self.classify_severity(&patient.symptoms);
        let mut options = self.options_for(&patient.symptoms, &severity);

        let age = patient.known_age();
        for option in &mut options {
            option.safety_flags = self.check_safety(option, patient);
            if let Some(age) = age {
                option.age_group = Some(AgeGroup::from_age(age));
                option.evidence = vec![evidence_for_age(age)];
            }
        }

        let report = AssessmentReport::new(patient, severity, options);
        tracing::info!(
            assessment_id = %report.assessment_id,
            triage = ?report.triage,
            options = report.options.len(),
            "Assessment complete"
        );
        report
    }

    fn options_for(
        &self,
        symptoms_text: &str,
        assessment: &SeverityAssessment,
    ) -> Vec<TreatmentOption> {
        let candidates = self.scorer.generate_candidates(symptoms_text, &self.catalog);
        self.selector.finalize(candidates, assessment)
    }
}
