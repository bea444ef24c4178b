//! Patient models.

use serde::{Deserialize, Serialize};

/// Age bracket used to select per-medicine dosing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    /// Under 2 years
    Infant,
    /// 2 to under 12 years
    Child,
    /// 12 to under 18 years
    Adolescent,
    /// 18 to 64 years
    Adult,
    /// 65 years and over
    Elderly,
}

impl AgeGroup {
    /// Resolve the age group for an age in years.
    pub fn from_age(age: f64) -> Self {
        if age < 2.0 {
            AgeGroup::Infant
        } else if age < 12.0 {
            AgeGroup::Child
        } else if age < 18.0 {
            AgeGroup::Adolescent
        } else if age < 65.0 {
            AgeGroup::Adult
        } else {
            AgeGroup::Elderly
        }
    }

    /// Wire name (matches the serde representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Infant => "infant",
            AgeGroup::Child => "child",
            AgeGroup::Adolescent => "adolescent",
            AgeGroup::Adult => "adult",
            AgeGroup::Elderly => "elderly",
        }
    }
}

/// Body-mass-index bracket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    NormalWeight,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::NormalWeight
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }
}

/// The person a request is assessed for. Transient, one per request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Patient name (display only)
    pub name: String,
    /// Age in years, if known
    pub age: Option<f64>,
    /// Sex as reported
    pub sex: Option<String>,
    /// Weight in kg
    pub weight_kg: Option<f64>,
    /// Height in metres
    pub height_m: Option<f64>,
    /// Comma-separated free-text symptoms
    pub symptoms: String,
}

impl Patient {
    /// Create a patient with a name and symptom text.
    pub fn new(name: impl Into<String>, symptoms: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symptoms: symptoms.into(),
            ..Default::default()
        }
    }

    /// Builder-style age setter.
    pub fn with_age(mut self, age: f64) -> Self {
        self.age = Some(age);
        self
    }

    /// Age usable for safety checks. Non-finite values count as unknown.
    pub fn known_age(&self) -> Option<f64> {
        self.age.filter(|a| a.is_finite())
    }

    /// Age group, when the age is known.
    pub fn age_group(&self) -> Option<AgeGroup> {
        self.known_age().map(AgeGroup::from_age)
    }

    /// Body-mass index from weight (kg) and height (m).
    pub fn bmi(&self) -> Option<f64> {
        match (self.weight_kg, self.height_m) {
            (Some(w), Some(h)) if w > 0.0 && h > 0.0 => Some(w / (h * h)),
            _ => None,
        }
    }
}
