//! OTC Triage Core Library
//!
//! Non-prescribing decision support: free-text symptoms in, a severity
//! classification and a short list of over-the-counter suggestions out.
//!
//! # Architecture
//!
//! ```text
//!                      Patient (symptoms text, age, ...)
//!                                    │
//!                 ┌──────────────────┴──────────────────┐
//!                 ▼                                     ▼
//!        SeverityClassifier                       ClusterScorer
//!     (tiered lexicon, first match)      (weighted clusters, cumulative)
//!                 │                                     │
//!                 │                     candidates + fallback chain
//!                 └──────────────────┬──────────────────┘
//!                                    ▼
//!                             OptionSelector
//!               (emergency referral, monitoring, cap of 3)
//!                                    │
//!                                    ▼
//!                             SafetyChecker
//!                   (age-group dosing, flags, dosing text)
//!                                    │
//!                                    ▼
//!                            AssessmentReport
//!                  (disclaimer, clinician sign-off required)
//! ```
//!
//! # Core Principle
//!
//! **Every report requires clinician sign-off.** Only OTC medicines are ever
//! suggested, and problems are surfaced as flags rather than errors.
//!
//! # Modules
//!
//! - [`db`]: SQLite medicine store
//! - [`catalog`]: Immutable in-memory OTC catalog
//! - [`models`]: Domain types (Medicine, Patient, SeverityAssessment, TreatmentOption, etc.)
//! - [`triage`]: Classifier, cluster scorer, selector, safety checker and engine
//! - [`config`]: Thresholds, caps and fixed texts

pub mod catalog;
pub mod config;
pub mod db;
pub mod models;
pub mod triage;

// Re-export commonly used types
pub use catalog::MedicineCatalog;
pub use db::Database;
pub use models::{
    AgeGroup, CaseSeverity, Medicine, MedicineRecord, OptionKind, Patient, SeverityAssessment,
    TreatmentOption, TriageLevel,
};
pub use triage::{AssessmentReport, TriageEngine};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing_subscriber::EnvFilter;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum OtcTriageError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<db::DbError> for OtcTriageError {
    fn from(e: db::DbError) -> Self {
        OtcTriageError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for OtcTriageError {
    fn from(e: serde_json::Error) -> Self {
        OtcTriageError::SerializationError(e.to_string())
    }
}

impl From<triage::TriageError> for OtcTriageError {
    fn from(e: triage::TriageError) -> Self {
        match e {
            triage::TriageError::Database(e) => e.into(),
            triage::TriageError::InvalidInput(msg) => OtcTriageError::InvalidInput(msg),
        }
    }
}

/// Wire string of a snake_case enum.
fn wire_name<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(name)) => name,
        _ => String::new(),
    }
}

/// Parse a snake_case enum from its wire string.
fn parse_wire<T: DeserializeOwned>(field: &str, value: &str) -> Result<T, OtcTriageError> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| OtcTriageError::InvalidInput(format!("unknown {field}: {value}")))
}

// =========================================================================
// Free Functions (exported to FFI)
// =========================================================================

/// Install the fmt subscriber. `RUST_LOG` overrides the default filter.
///
/// Safe to call more than once; later calls are no-ops.
#[uniffi::export]
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter()));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
    {
        tracing::info!(
            engine = config::ENGINE_NAME,
            version = config::ENGINE_VERSION,
            "Logging initialized"
        );
    }
}

/// Classify comma-separated symptom text.
#[uniffi::export]
pub fn classify_severity(symptoms_text: String) -> FfiSeverityAssessment {
    triage::SeverityClassifier::default()
        .classify(&symptoms_text)
        .into()
}

/// Age group name for an age in years.
#[uniffi::export]
pub fn age_group(age: f64) -> Result<String, OtcTriageError> {
    if !age.is_finite() || age < 0.0 {
        return Err(OtcTriageError::InvalidInput(format!("invalid age: {age}")));
    }
    Ok(triage::age_group(age).as_str().to_string())
}

/// Symptom picker entries grouped by category.
#[uniffi::export]
pub fn symptom_vocabulary() -> Vec<FfiSymptomCategory> {
    triage::SYMPTOM_VOCABULARY
        .iter()
        .map(FfiSymptomCategory::from)
        .collect()
}

/// Rank picker entries against a partial query.
#[uniffi::export]
pub fn suggest_symptoms(query: String, limit: u32) -> Vec<FfiSymptomSuggestion> {
    triage::suggest(&query, limit as usize)
        .into_iter()
        .map(|s| s.into())
        .collect()
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Build an engine from the OTC medicines stored in a database file.
#[uniffi::export]
pub fn open_engine(path: String) -> Result<Arc<TriageCore>, OtcTriageError> {
    let db = Database::open(&path)?;
    let engine = TriageEngine::from_database(&db)?;
    Ok(Arc::new(TriageCore { engine }))
}

/// Build an engine from raw medicine records. Non-OTC records are skipped.
#[uniffi::export]
pub fn engine_from_records(records: Vec<FfiMedicineRecord>) -> Arc<TriageCore> {
    let records: Vec<MedicineRecord> = records.into_iter().map(|r| r.into()).collect();
    let catalog = MedicineCatalog::from_records(&records);
    Arc::new(TriageCore {
        engine: TriageEngine::new(catalog),
    })
}

// =========================================================================
// Main API Object
// =========================================================================

/// Read-only triage engine shared across host threads.
#[derive(uniffi::Object)]
pub struct TriageCore {
    engine: TriageEngine,
}

#[uniffi::export]
impl TriageCore {
    // =========================================================================
    // Triage Operations
    // =========================================================================

    /// Finalized treatment options for symptom text.
    pub fn generate_options(&self, symptoms_text: String) -> Vec<FfiTreatmentOption> {
        self.engine
            .generate_options(&symptoms_text)
            .into_iter()
            .map(|o| o.into())
            .collect()
    }

    /// Safety flags and dosing for one option and patient.
    pub fn check_safety(
        &self,
        option: FfiTreatmentOption,
        patient: FfiPatient,
    ) -> Result<FfiSafetyCheck, OtcTriageError> {
        let patient: Patient = patient.into();
        triage::validate_patient(&patient)?;

        let mut option = TreatmentOption::try_from(option)?;
        let flags = self.engine.check_safety(&mut option, &patient);
        Ok(FfiSafetyCheck {
            flags,
            dosing: option.dosing,
        })
    }

    /// Full assessment for a patient.
    pub fn assess(&self, patient: FfiPatient) -> Result<FfiAssessmentReport, OtcTriageError> {
        let patient: Patient = patient.into();
        triage::validate_patient(&patient)?;
        Ok(self.engine.assess(&patient).into())
    }

    /// Full assessment for a patient, as JSON.
    pub fn assess_json(&self, patient: FfiPatient) -> Result<String, OtcTriageError> {
        let patient: Patient = patient.into();
        triage::validate_patient(&patient)?;
        Ok(self.engine.assess(&patient).to_json()?)
    }

    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// Get a catalog medicine by id.
    pub fn medicine(&self, id: String) -> Option<FfiMedicine> {
        self.engine.catalog().lookup_by_id(&id).map(FfiMedicine::from)
    }

    /// Number of OTC medicines in the catalog.
    pub fn catalog_size(&self) -> u32 {
        self.engine.catalog().len() as u32
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub name: String,
    pub age: Option<f64>,
    pub sex: Option<String>,
    pub weight_kg: Option<f64>,
    pub height_m: Option<f64>,
    pub symptoms: String,
}

impl From<FfiPatient> for Patient {
    fn from(patient: FfiPatient) -> Self {
        Patient {
            name: patient.name,
            age: patient.age,
            sex: patient.sex,
            weight_kg: patient.weight_kg,
            height_m: patient.height_m,
            symptoms: patient.symptoms,
        }
    }
}

/// FFI-safe raw medicine record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicineRecord {
    pub name: String,
    pub category: String,
    pub dosage_form: String,
    pub strength: String,
    pub manufacturer: String,
    pub indication: String,
    pub classification: String,
}

impl From<FfiMedicineRecord> for MedicineRecord {
    fn from(record: FfiMedicineRecord) -> Self {
        MedicineRecord {
            name: record.name,
            category: record.category,
            dosage_form: record.dosage_form,
            strength: record.strength,
            manufacturer: record.manufacturer,
            indication: record.indication,
            classification: record.classification,
        }
    }
}

/// FFI-safe age-group dosing entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAgeDosing {
    pub age_group: String,
    pub dose: String,
    pub min_age: f64,
    pub max_age: f64,
    pub notes: Option<String>,
}

/// FFI-safe catalog medicine.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicine {
    pub id: String,
    pub name: String,
    pub category: String,
    pub dosage_form: String,
    pub strength: String,
    pub manufacturer: String,
    pub indication: String,
    pub classification: String,
    pub age_dosing: Vec<FfiAgeDosing>,
}

impl From<&Medicine> for FfiMedicine {
    fn from(medicine: &Medicine) -> Self {
        Self {
            id: medicine.id.clone(),
            name: medicine.name.clone(),
            category: medicine.category.clone(),
            dosage_form: medicine.dosage_form.clone(),
            strength: medicine.strength.clone(),
            manufacturer: medicine.manufacturer.clone(),
            indication: medicine.indication.clone(),
            classification: medicine.classification.clone(),
            age_dosing: medicine
                .age_dosing
                .iter()
                .map(|(group, dosing)| FfiAgeDosing {
                    age_group: group.as_str().to_string(),
                    dose: dosing.dose.clone(),
                    min_age: dosing.min_age,
                    max_age: dosing.max_age,
                    notes: dosing.notes.clone(),
                })
                .collect(),
        }
    }
}

/// FFI-safe per-token severity match.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSymptomMatch {
    pub symptom: String,
    pub tier: String,
    pub weight: f64,
    pub matched_term: Option<String>,
}

/// FFI-safe severity assessment.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSeverityAssessment {
    pub severity_score: f64,
    pub case_severity: String,
    pub urgency: String,
    pub recommendation: String,
    pub symptom_breakdown: Vec<FfiSymptomMatch>,
    pub total_symptoms: u32,
}

impl From<SeverityAssessment> for FfiSeverityAssessment {
    fn from(assessment: SeverityAssessment) -> Self {
        Self {
            severity_score: assessment.severity_score,
            case_severity: wire_name(&assessment.case_severity),
            urgency: wire_name(&assessment.urgency),
            recommendation: assessment.recommendation,
            symptom_breakdown: assessment
                .symptom_breakdown
                .into_iter()
                .map(|m| FfiSymptomMatch {
                    tier: wire_name(&m.tier),
                    symptom: m.symptom,
                    weight: m.weight,
                    matched_term: m.matched_term,
                })
                .collect(),
            total_symptoms: assessment.total_symptoms as u32,
        }
    }
}

impl TryFrom<FfiSeverityAssessment> for SeverityAssessment {
    type Error = OtcTriageError;

    fn try_from(assessment: FfiSeverityAssessment) -> Result<Self, Self::Error> {
        let symptom_breakdown = assessment
            .symptom_breakdown
            .into_iter()
            .map(|m| {
                Ok(models::SymptomMatch {
                    tier: parse_wire("tier", &m.tier)?,
                    symptom: m.symptom,
                    weight: m.weight,
                    matched_term: m.matched_term,
                })
            })
            .collect::<Result<Vec<_>, OtcTriageError>>()?;

        Ok(SeverityAssessment {
            severity_score: assessment.severity_score,
            case_severity: parse_wire("case_severity", &assessment.case_severity)?,
            urgency: parse_wire("urgency", &assessment.urgency)?,
            recommendation: assessment.recommendation,
            symptom_breakdown,
            total_symptoms: assessment.total_symptoms as usize,
        })
    }
}

/// FFI-safe guideline reference.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiEvidence {
    pub title: String,
    pub date: String,
    pub snippet: String,
}

/// FFI-safe treatment option.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTreatmentOption {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub drug_ids: Vec<String>,
    pub rationale: String,
    pub priority: Option<String>,
    pub monitoring_required: bool,
    pub note: Option<String>,
    pub medicine_note: Option<String>,
    pub severity_analysis: Option<FfiSeverityAssessment>,
    pub safety_flags: Vec<String>,
    pub age_group: Option<String>,
    pub dosing: Option<String>,
    pub evidence: Vec<FfiEvidence>,
}

impl From<TreatmentOption> for FfiTreatmentOption {
    fn from(option: TreatmentOption) -> Self {
        Self {
            id: option.id,
            kind: wire_name(&option.kind),
            title: option.title,
            drug_ids: option.drug_ids,
            rationale: option.rationale,
            priority: option.priority.map(|p| wire_name(&p)),
            monitoring_required: option.monitoring_required,
            note: option.note,
            medicine_note: option.medicine_note,
            severity_analysis: option.severity_analysis.map(|s| s.into()),
            safety_flags: option.safety_flags,
            age_group: option.age_group.map(|g| g.as_str().to_string()),
            dosing: option.dosing,
            evidence: option
                .evidence
                .into_iter()
                .map(|e| FfiEvidence {
                    title: e.title,
                    date: e.date,
                    snippet: e.snippet,
                })
                .collect(),
        }
    }
}

impl TryFrom<FfiTreatmentOption> for TreatmentOption {
    type Error = OtcTriageError;

    fn try_from(option: FfiTreatmentOption) -> Result<Self, Self::Error> {
        Ok(TreatmentOption {
            id: option.id,
            kind: parse_wire("option kind", &option.kind)?,
            title: option.title,
            drug_ids: option.drug_ids,
            rationale: option.rationale,
            priority: option
                .priority
                .map(|p| parse_wire("priority", &p))
                .transpose()?,
            monitoring_required: option.monitoring_required,
            note: option.note,
            medicine_note: option.medicine_note,
            severity_analysis: option
                .severity_analysis
                .map(SeverityAssessment::try_from)
                .transpose()?,
            safety_flags: option.safety_flags,
            age_group: option
                .age_group
                .map(|g| parse_wire("age group", &g))
                .transpose()?,
            dosing: option.dosing,
            evidence: option
                .evidence
                .into_iter()
                .map(|e| models::Evidence {
                    title: e.title,
                    date: e.date,
                    snippet: e.snippet,
                })
                .collect(),
        })
    }
}

/// FFI-safe safety check result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSafetyCheck {
    pub flags: Vec<String>,
    pub dosing: Option<String>,
}

/// FFI-safe patient summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientSummary {
    pub name: String,
    pub age: Option<f64>,
    pub age_group: Option<String>,
    pub sex: Option<String>,
    pub bmi: Option<f64>,
    pub bmi_category: Option<String>,
}

/// FFI-safe assessment report.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAssessmentReport {
    pub assessment_id: String,
    pub generated_at: String,
    pub engine_version: String,
    pub lexicon_version: String,
    pub patient_summary: FfiPatientSummary,
    pub severity: FfiSeverityAssessment,
    pub triage: String,
    pub options: Vec<FfiTreatmentOption>,
    pub disclaimer: String,
    pub medicine_policy: String,
    pub requires_clinician_signoff: bool,
}

impl From<AssessmentReport> for FfiAssessmentReport {
    fn from(report: AssessmentReport) -> Self {
        let summary = report.patient_summary;
        Self {
            assessment_id: report.assessment_id,
            generated_at: report.generated_at,
            engine_version: report.engine_version,
            lexicon_version: report.lexicon_version,
            patient_summary: FfiPatientSummary {
                name: summary.name,
                age: summary.age,
                age_group: summary.age_group.map(|g| g.as_str().to_string()),
                sex: summary.sex,
                bmi: summary.bmi,
                bmi_category: summary.bmi_category.map(|c| wire_name(&c)),
            },
            severity: report.severity.into(),
            triage: wire_name(&report.triage),
            options: report.options.into_iter().map(|o| o.into()).collect(),
            disclaimer: report.disclaimer,
            medicine_policy: report.medicine_policy,
            requires_clinician_signoff: report.requires_clinician_signoff,
        }
    }
}

/// FFI-safe symptom picker entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSymptomEntry {
    pub id: String,
    pub text: String,
    pub keywords: Vec<String>,
}

/// FFI-safe symptom picker category.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSymptomCategory {
    pub name: String,
    pub entries: Vec<FfiSymptomEntry>,
}

impl From<&triage::SymptomCategory> for FfiSymptomCategory {
    fn from(category: &triage::SymptomCategory) -> Self {
        Self {
            name: category.name.to_string(),
            entries: category
                .entries
                .iter()
                .map(|e| FfiSymptomEntry {
                    id: e.id.to_string(),
                    text: e.text.to_string(),
                    keywords: e.keywords.iter().map(|k| k.to_string()).collect(),
                })
                .collect(),
        }
    }
}

/// FFI-safe symptom suggestion.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSymptomSuggestion {
    pub id: String,
    pub text: String,
    pub category: String,
    pub score: f64,
}

impl From<triage::SymptomSuggestion> for FfiSymptomSuggestion {
    fn from(suggestion: triage::SymptomSuggestion) -> Self {
        Self {
            id: suggestion.id,
            text: suggestion.text,
            category: suggestion.category,
            score: suggestion.score,
        }
    }
}
