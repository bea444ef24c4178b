//! Severity assessment models.

use serde::{Deserialize, Serialize};

/// Lexicon tier a symptom token was matched in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTier {
    Severe,
    Moderate,
    Mild,
}

/// Overall case classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CaseSeverity {
    Mild,
    PossibleRisk,
    Severe,
}

/// How quickly the patient should be seen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    SelfCareMonitoring,
    MedicalConsultationRecommended,
    ImmediateMedicalAttention,
}

/// Care setting derived from the case severity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TriageLevel {
    PrimaryCare,
    UrgentCare,
    Emergency,
}

impl CaseSeverity {
    /// Urgency paired with this severity.
    pub fn urgency(&self) -> Urgency {
        match self {
            CaseSeverity::Mild => Urgency::SelfCareMonitoring,
            CaseSeverity::PossibleRisk => Urgency::MedicalConsultationRecommended,
            CaseSeverity::Severe => Urgency::ImmediateMedicalAttention,
        }
    }

    /// Fixed patient-facing recommendation.
    pub fn recommendation(&self) -> &'static str {
        match self {
            CaseSeverity::Mild => "Monitor symptoms and consider over-the-counter treatments",
            CaseSeverity::PossibleRisk => "Consult with healthcare provider within 24-48 hours",
            CaseSeverity::Severe => "Seek immediate medical attention or emergency care",
        }
    }

    /// Care setting for this severity.
    pub fn triage_level(&self) -> TriageLevel {
        match self {
            CaseSeverity::Mild => TriageLevel::PrimaryCare,
            CaseSeverity::PossibleRisk => TriageLevel::UrgentCare,
            CaseSeverity::Severe => TriageLevel::Emergency,
        }
    }
}

/// How a single symptom token was scored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymptomMatch {
    /// Trimmed, lower-cased symptom token
    pub symptom: String,
    /// Tier the token landed in
    pub tier: SeverityTier,
    /// Weight contributed to the severity score
    pub weight: f64,
    /// Lexicon phrase that matched (None for the default bucket)
    pub matched_term: Option<String>,
}

/// Result of classifying a symptom text. One per request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeverityAssessment {
    /// Sum of per-token weights
    pub severity_score: f64,
    pub case_severity: CaseSeverity,
    pub urgency: Urgency,
    pub recommendation: String,
    /// Per-token scoring, in input order
    pub symptom_breakdown: Vec<SymptomMatch>,
    pub total_symptoms: usize,
}

impl SeverityAssessment {
    pub fn is_severe(&self) -> bool {
        self.case_severity == CaseSeverity::Severe
    }

    pub fn is_possible_risk(&self) -> bool {
        self.case_severity == CaseSeverity::PossibleRisk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_pairs() {
        assert_eq!(CaseSeverity::Mild.urgency(), Urgency::SelfCareMonitoring);
        assert_eq!(
            CaseSeverity::PossibleRisk.urgency(),
            Urgency::MedicalConsultationRecommended
        );
        assert_eq!(
            CaseSeverity::Severe.urgency(),
            Urgency::ImmediateMedicalAttention
        );
        assert_eq!(CaseSeverity::Severe.triage_level(), TriageLevel::Emergency);
        assert_eq!(CaseSeverity::PossibleRisk.triage_level(), TriageLevel::UrgentCare);
        assert_eq!(CaseSeverity::Mild.triage_level(), TriageLevel::PrimaryCare);
    }

    fn assessment(case_severity: CaseSeverity) -> SeverityAssessment {
        SeverityAssessment {
            severity_score: 0.0,
            case_severity,
            urgency: case_severity.urgency(),
            recommendation: case_severity.recommendation().into(),
            symptom_breakdown: Vec::new(),
            total_symptoms: 0,
        }
    }

    #[test]
    fn test_severity_predicates() {
        assert!(assessment(CaseSeverity::Severe).is_severe());
        assert!(!assessment(CaseSeverity::Severe).is_possible_risk());
        assert!(assessment(CaseSeverity::PossibleRisk).is_possible_risk());
        assert!(!assessment(CaseSeverity::Mild).is_severe());
        assert!(!assessment(CaseSeverity::Mild).is_possible_risk());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&CaseSeverity::PossibleRisk).unwrap(),
            "\"possible_risk\""
        );
        assert_eq!(
            serde_json::to_string(&Urgency::ImmediateMedicalAttention).unwrap(),
            "\"immediate_medical_attention\""
        );
        assert_eq!(
            serde_json::to_string(&TriageLevel::UrgentCare).unwrap(),
            "\"urgent_care\""
        );
    }
}
