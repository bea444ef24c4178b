//! Severity lexicon and classifier.
//!
//! Each symptom token is looked up tier by tier (severe → moderate → mild);
//! the first phrase contained in the token wins. Tokens matching nothing fall
//! into the mild tier with [`UNMATCHED_SYMPTOM_WEIGHT`].

use crate::config::{POSSIBLE_RISK_THRESHOLD, SEVERE_THRESHOLD, UNMATCHED_SYMPTOM_WEIGHT};
use crate::models::{CaseSeverity, SeverityAssessment, SeverityTier, SymptomMatch};

use super::tokenize;

/// An ordered (phrase, weight) table.
pub type WeightedTerms = &'static [(&'static str, f64)];

const SEVERE_TERMS: WeightedTerms = &[
    ("difficulty breathing", 3.0),
    ("shortness of breath", 3.0),
    ("chest pain", 3.0),
    ("severe headache", 3.0),
    ("persistent vomiting", 3.0),
    ("high fever", 3.0),
    ("blood in urine", 3.0),
    ("blood in stool", 3.0),
    ("severe abdominal pain", 3.0),
    ("loss of consciousness", 3.0),
    ("severe allergic reaction", 3.0),
    ("difficulty swallowing", 3.0),
    ("severe dehydration", 3.0),
    ("rapid heart rate", 2.0),
    ("dizziness", 2.0),
    ("confusion", 2.0),
    ("severe fatigue", 2.0),
    ("persistent fever", 2.0),
    ("severe pain", 2.0),
];

const MODERATE_TERMS: WeightedTerms = &[
    ("fever", 2.0),
    ("persistent cough", 2.0),
    ("moderate pain", 2.0),
    ("nausea", 1.0),
    ("vomiting", 2.0),
    ("headache", 1.0),
    ("body aches", 1.0),
    ("fatigue", 1.0),
    ("sore throat", 1.0),
    ("congestion", 1.0),
    ("runny nose", 1.0),
    ("mild fever", 1.0),
    ("stomach pain", 1.0),
    ("joint pain", 1.0),
    ("muscle pain", 1.0),
];

const MILD_TERMS: WeightedTerms = &[
    ("sneezing", 0.5),
    ("itchy eyes", 0.5),
    ("mild headache", 0.5),
    ("slight fever", 0.5),
    ("minor aches", 0.5),
    ("tiredness", 0.5),
    ("dry throat", 0.5),
    ("light cough", 0.5),
    ("minor congestion", 0.5),
];

/// Three-tier keyword table. Replaced as a whole, never mutated.
#[derive(Debug, Clone, Copy)]
pub struct SeverityLexicon {
    pub severe: WeightedTerms,
    pub moderate: WeightedTerms,
    pub mild: WeightedTerms,
}

static STANDARD_LEXICON: SeverityLexicon = SeverityLexicon {
    severe: SEVERE_TERMS,
    moderate: MODERATE_TERMS,
    mild: MILD_TERMS,
};

impl SeverityLexicon {
    /// The built-in lexicon.
    pub fn standard() -> &'static SeverityLexicon {
        &STANDARD_LEXICON
    }

    /// Tiers in lookup priority order.
    fn tiers(&self) -> [(SeverityTier, WeightedTerms); 3] {
        [
            (SeverityTier::Severe, self.severe),
            (SeverityTier::Moderate, self.moderate),
            (SeverityTier::Mild, self.mild),
        ]
    }

    /// Score one token. First tier with a contained phrase wins.
    pub fn match_token(&self, token: &str) -> SymptomMatch {
        for (tier, terms) in self.tiers() {
            if let Some((phrase, weight)) = terms.iter().find(|(phrase, _)| token.contains(phrase)) {
                return SymptomMatch {
                    symptom: token.to_string(),
                    tier,
                    weight: *weight,
                    matched_term: Some((*phrase).to_string()),
                };
            }
        }

        SymptomMatch {
            symptom: token.to_string(),
            tier: SeverityTier::Mild,
            weight: UNMATCHED_SYMPTOM_WEIGHT,
            matched_term: None,
        }
    }
}

/// Classify an aggregate score.
pub fn case_severity_for(score: f64) -> CaseSeverity {
    if score >= SEVERE_THRESHOLD {
        CaseSeverity::Severe
    } else if score >= POSSIBLE_RISK_THRESHOLD {
        CaseSeverity::PossibleRisk
    } else {
        CaseSeverity::Mild
    }
}

/// Tiered severity classifier over free-text symptoms.
#[derive(Debug, Clone, Copy)]
pub struct SeverityClassifier<'a> {
    lexicon: &'a SeverityLexicon,
}

impl Default for SeverityClassifier<'static> {
    fn default() -> Self {
        Self::new(SeverityLexicon::standard())
    }
}

impl<'a> SeverityClassifier<'a> {
    pub fn new(lexicon: &'a SeverityLexicon) -> Self {
        Self { lexicon }
    }

    /// Classify comma-separated symptom text.
    pub fn classify(&self, symptoms_text: &str) -> SeverityAssessment {
        let symptom_breakdown: Vec<SymptomMatch> = tokenize(symptoms_text)
            .iter()
            .map(|token| self.lexicon.match_token(token))
            .collect();

        let severity_score: f64 = symptom_breakdown.iter().map(|m| m.weight).sum();
        let case_severity = case_severity_for(severity_score);

        tracing::debug!(
            score = severity_score,
            severity = ?case_severity,
            symptoms = symptom_breakdown.len(),
            "Classified symptom severity"
        );

        SeverityAssessment {
            severity_score,
            case_severity,
            urgency: case_severity.urgency(),
            recommendation: case_severity.recommendation().to_string(),
            total_symptoms: symptom_breakdown.len(),
            symptom_breakdown,
        }
    }
}
