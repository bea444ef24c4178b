//! Treatment option models.

use serde::{Deserialize, Serialize};

use super::assessment::SeverityAssessment;
use super::patient::AgeGroup;

/// Kind of treatment an option suggests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    Antiviral,
    Antibiotic,
    Antihistamine,
    Antidiabetic,
    DigestiveSupport,
    TopicalTreatment,
    MentalHealthSupport,
    WoundCare,
    RespiratorySupport,
    Antihypertensive,
    LipidManagement,
    Analgesic,
    Antipyretic,
    GeneralPainRelief,
    GeneralAntiseptic,
    AntifungalTreatment,
    GeneralCare,
    EmergencyReferral,
}

/// Priority marker on an option.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OptionPriority {
    Urgent,
}

/// A guideline reference attached to an option.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evidence {
    pub title: String,
    pub date: String,
    pub snippet: String,
}

/// A suggested course of action for one request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreatmentOption {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub title: String,
    /// Catalog medicine ids, unique, in suggestion order
    #[serde(rename = "drugs")]
    pub drug_ids: Vec<String>,
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<OptionPriority>,
    #[serde(default)]
    pub monitoring_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicine_note: Option<String>,
    /// Same assessment on every option of a request (set when finalized)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity_analysis: Option<SeverityAssessment>,
    #[serde(default)]
    pub safety_flags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<AgeGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosing: Option<String>,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

impl TreatmentOption {
    /// Create an option with no drugs and no annotations.
    pub fn new(
        id: impl Into<String>,
        kind: OptionKind,
        title: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            drug_ids: Vec::new(),
            rationale: rationale.into(),
            priority: None,
            monitoring_required: false,
            note: None,
            medicine_note: None,
            severity_analysis: None,
            safety_flags: Vec::new(),
            age_group: None,
            dosing: None,
            evidence: Vec::new(),
        }
    }

    /// Builder-style drug list setter. Duplicate ids are dropped.
    pub fn with_drugs<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in ids {
            let id = id.into();
            if !self.drug_ids.contains(&id) {
                self.drug_ids.push(id);
            }
        }
        self
    }

    pub fn has_drugs(&self) -> bool {
        !self.drug_ids.is_empty()
    }

    pub fn is_urgent(&self) -> bool {
        self.priority == Some(OptionPriority::Urgent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_drugs_dedupes() {
        let option = TreatmentOption::new("a", OptionKind::Analgesic, "t", "r")
            .with_drugs(["x", "y", "x"]);
        assert_eq!(option.drug_ids, vec!["x", "y"]);
        assert!(option.has_drugs());
    }

    #[test]
    fn test_serialized_shape() {
        let option = TreatmentOption::new(
            "gi_1",
            OptionKind::DigestiveSupport,
            "Digestive support medication",
            "Gastrointestinal symptoms identified.",
        )
        .with_drugs(["dettol"]);

        let json = serde_json::to_value(&option).unwrap();
        assert_eq!(json["type"], "digestive_support");
        assert_eq!(json["drugs"][0], "dettol");
        assert_eq!(json["monitoring_required"], false);
        assert!(json.get("priority").is_none());
        assert!(json.get("dosing").is_none());
    }
}
