//! Severity-aware option finalization.
//!
//! Ranking (lower first, stable for ties):
//! - urgent priority: 0
//! - analgesic, antipyretic: 1
//! - antibiotic, antiviral: 2
//! - everything else: 3

use crate::config::{MAX_OPTIONS, MEDICINE_POLICY};
use crate::models::{OptionKind, OptionPriority, SeverityAssessment, TreatmentOption};

const MONITORING_ADVICE: &str =
    " Monitor symptoms closely and seek medical attention if worsening. Only OTC medicines recommended.";

/// Synthetic referral placed first for severe cases.
pub fn emergency_option() -> TreatmentOption {
    let mut option = TreatmentOption::new(
        "emergency_care",
        OptionKind::EmergencyReferral,
        "URGENT: Immediate Medical Attention Required",
        "Severe symptoms detected requiring immediate medical evaluation. \
         Only OTC supportive care available through this system.",
    );
    option.priority = Some(OptionPriority::Urgent);
    option.note = Some(
        "Prescription medications may be required - consult emergency services or healthcare provider immediately"
            .into(),
    );
    option
}

/// Ranking key for truncation.
pub fn option_rank(option: &TreatmentOption) -> u8 {
    if option.is_urgent() {
        return 0;
    }
    match option.kind {
        OptionKind::Analgesic | OptionKind::Antipyretic => 1,
        OptionKind::Antibiotic | OptionKind::Antiviral => 2,
        _ => 3,
    }
}

/// Merges severity into candidate options and bounds the result.
#[derive(Debug, Clone, Copy)]
pub struct OptionSelector {
    max_options: usize,
}

impl Default for OptionSelector {
    fn default() -> Self {
        Self::new(MAX_OPTIONS)
    }
}

impl OptionSelector {
    /// Create a selector keeping at most `max_options` non-emergency options.
    ///
    /// The cap is clamped to at least 1 so a request always gets an option.
    pub fn new(max_options: usize) -> Self {
        Self {
            max_options: max_options.max(1),
        }
    }

    pub fn max_options(&self) -> usize {
        self.max_options
    }

    /// Finalize candidates for one request.
    ///
    /// The emergency referral is inserted after ranking, so it is always first
    /// and never counts against the cap.
    pub fn finalize(
        &self,
        mut options: Vec<TreatmentOption>,
        assessment: &SeverityAssessment,
    ) -> Vec<TreatmentOption> {
        if assessment.is_possible_risk() {
            for option in &mut options {
                option.monitoring_required = true;
                option.rationale.push_str(MONITORING_ADVICE);
            }
        }

        for option in options.iter_mut().filter(|o| o.has_drugs()) {
            option.medicine_note = Some(MEDICINE_POLICY.to_string());
        }

        if options.len() > self.max_options {
            let dropped = options.len() - self.max_options;
            options.sort_by_key(option_rank);
            options.truncate(self.max_options);
            tracing::debug!(dropped, "Truncated treatment options");
        }

        if assessment.is_severe() {
            options.insert(0, emergency_option());
            tracing::info!(
                score = assessment.severity_score,
                "Severe case; emergency referral inserted"
            );
        }

        for option in &mut options {
            option.severity_analysis = Some(assessment.clone());
        }

        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triage::lexicon::SeverityClassifier;

    fn option(id: &str, kind: OptionKind) -> TreatmentOption {
        TreatmentOption::new(id, kind, id, "Base rationale.").with_drugs([format!("{id}_drug")])
    }

    fn assessment(text: &str) -> SeverityAssessment {
        SeverityClassifier::default().classify(text)
    }

    #[test]
    fn test_mild_case_untouched_except_note() {
        let mild = assessment("sneezing");
        let options = OptionSelector::default().finalize(vec![option("a", OptionKind::Antihistamine)], &mild);

        assert_eq!(options.len(), 1);
        assert_eq!(options[0].rationale, "Base rationale.");
        assert!(!options[0].monitoring_required);
        assert_eq!(options[0].medicine_note.as_deref(), Some(MEDICINE_POLICY));
        assert_eq!(options[0].severity_analysis.as_ref(), Some(&mild));
    }

    #[test]
    fn test_possible_risk_adds_monitoring() {
        let risk = assessment("fever, persistent cough, body aches, fatigue");
        let input = vec![
            option("a", OptionKind::Antipyretic),
            TreatmentOption::new("g", OptionKind::GeneralCare, "g", "Rest."),
        ];
        let options = OptionSelector::default().finalize(input, &risk);

        assert_eq!(options.len(), 2);
        assert!(options.iter().all(|o| o.monitoring_required));
        assert!(options[0].rationale.starts_with("Base rationale. Monitor symptoms closely"));
        assert!(options[1].rationale.ends_with("Only OTC medicines recommended."));
        // No drugs, no medicine note
        assert!(options[1].medicine_note.is_none());
    }

    #[test]
    fn test_severe_inserts_emergency_first() {
        let severe = assessment("difficulty breathing, chest pain, severe headache");
        let options =
            OptionSelector::default().finalize(vec![option("a", OptionKind::Analgesic)], &severe);

        assert_eq!(options.len(), 2);
        assert_eq!(options[0].kind, OptionKind::EmergencyReferral);
        assert!(options[0].is_urgent());
        assert!(options[0].drug_ids.is_empty());
        assert!(options[0].note.is_some());
        assert!(options[0].medicine_note.is_none());
        assert!(!options[1].monitoring_required);
    }

    #[test]
    fn test_cap_and_ranking() {
        let mild = assessment("sneezing");
        let input = vec![
            option("wound", OptionKind::WoundCare),
            option("viral", OptionKind::Antiviral),
            option("allergy", OptionKind::Antihistamine),
            option("fever", OptionKind::Antipyretic),
            option("pain", OptionKind::Analgesic),
        ];
        let options = OptionSelector::default().finalize(input, &mild);

        let ids: Vec<&str> = options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["fever", "pain", "viral"]);
    }

    #[test]
    fn test_ranking_is_stable_for_ties() {
        let mild = assessment("sneezing");
        let input = vec![
            option("wound", OptionKind::WoundCare),
            option("skin", OptionKind::TopicalTreatment),
            option("gi", OptionKind::DigestiveSupport),
            option("allergy", OptionKind::Antihistamine),
        ];
        let options = OptionSelector::default().finalize(input, &mild);

        let ids: Vec<&str> = options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["wound", "skin", "gi"]);
    }

    #[test]
    fn test_emergency_exempt_from_cap() {
        let severe = assessment("difficulty breathing, chest pain, severe headache");
        let input = vec![
            option("a", OptionKind::Analgesic),
            option("b", OptionKind::Antipyretic),
            option("c", OptionKind::Antiviral),
            option("d", OptionKind::WoundCare),
        ];
        let options = OptionSelector::default().finalize(input, &severe);

        assert_eq!(options.len(), MAX_OPTIONS + 1);
        assert_eq!(options[0].id, "emergency_care");
        assert!(!options.iter().any(|o| o.id == "d"));
    }

    #[test]
    fn test_every_option_shares_assessment() {
        let severe = assessment("difficulty breathing, chest pain, severe headache");
        let input = vec![option("a", OptionKind::Analgesic), option("b", OptionKind::Antipyretic)];
        let options = OptionSelector::default().finalize(input, &severe);

        assert!(options
            .iter()
            .all(|o| o.severity_analysis.as_ref() == Some(&severe)));
    }

    #[test]
    fn test_zero_cap_clamped_to_one() {
        let selector = OptionSelector::new(0);
        assert_eq!(selector.max_options(), 1);

        let mild = assessment("sneezing");
        let input = vec![
            option("allergy", OptionKind::Antihistamine),
            option("pain", OptionKind::Analgesic),
        ];
        let options = selector.finalize(input, &mild);

        let ids: Vec<&str> = options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["pain"]);
    }

    #[test]
    fn test_rank_values() {
        assert_eq!(option_rank(&emergency_option()), 0);
        assert_eq!(option_rank(&option("x", OptionKind::Analgesic)), 1);
        assert_eq!(option_rank(&option("x", OptionKind::Antibiotic)), 2);
        assert_eq!(option_rank(&option("x", OptionKind::GeneralCare)), 3);
    }
}
