//! Symptom picker vocabulary and fuzzy suggestions.

use serde::{Deserialize, Serialize};
use strsim::{jaro_winkler, normalized_levenshtein};

/// A pickable symptom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SymptomEntry {
    pub id: &'static str,
    pub text: &'static str,
    pub keywords: &'static [&'static str],
}

/// A named group of symptoms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SymptomCategory {
    pub name: &'static str,
    pub entries: &'static [SymptomEntry],
}

/// A ranked suggestion for a partial query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomSuggestion {
    pub id: String,
    pub text: String,
    pub category: String,
    pub score: f64,
}

const fn entry(
    id: &'static str,
    text: &'static str,
    keywords: &'static [&'static str],
) -> SymptomEntry {
    SymptomEntry { id, text, keywords }
}

pub const SYMPTOM_VOCABULARY: &[SymptomCategory] = &[
    SymptomCategory {
        name: "General",
        entries: &[
            entry("fever", "Fever", &["fever", "high temperature"]),
            entry("fatigue", "Fatigue", &["fatigue", "tiredness"]),
            entry("body_ache", "Body Aches", &["body ache", "muscle pain"]),
            entry("headache", "Headache", &["headache"]),
        ],
    },
    SymptomCategory {
        name: "Respiratory",
        entries: &[
            entry("sore_throat", "Sore Throat", &["sore throat"]),
            entry("cough", "Cough", &["cough", "coughing"]),
            entry("wheezing", "Wheezing", &["wheezing"]),
            entry(
                "shortness_breath",
                "Shortness of Breath",
                &["shortness of breath", "difficulty breathing"],
            ),
            entry("chest_tightness", "Chest Tightness", &["chest tightness"]),
        ],
    },
    SymptomCategory {
        name: "ENT & Allergy",
        entries: &[
            entry("nasal_congestion", "Nasal Congestion", &["nasal congestion", "congestion"]),
            entry("runny_nose", "Runny Nose", &["runny nose"]),
            entry("sneezing", "Sneezing", &["sneezing"]),
            entry("itchy_eyes", "Itchy Eyes", &["itchy eyes", "watery eyes"]),
            entry(
                "tonsillar_symptoms",
                "Swollen/White Tonsils",
                &["tonsil", "tonsillar", "white patches", "pus", "exudate"],
            ),
        ],
    },
    SymptomCategory {
        name: "Gastrointestinal",
        entries: &[
            entry("nausea", "Nausea", &["nausea"]),
            entry("vomiting", "Vomiting", &["vomiting", "emesis"]),
            entry("stomach_pain", "Stomach Pain", &["stomach pain"]),
            entry("decreased_appetite", "Decreased Appetite", &["decreased appetite"]),
        ],
    },
    SymptomCategory {
        name: "Chronic Conditions",
        entries: &[
            entry(
                "diabetes_symptoms",
                "Diabetes Symptoms",
                &[
                    "high blood sugar",
                    "diabetes",
                    "hyperglycemia",
                    "excessive thirst",
                    "frequent urination",
                ],
            ),
            entry(
                "hypertension_symptoms",
                "High Blood Pressure Symptoms",
                &["high blood pressure", "hypertension"],
            ),
            entry("high_cholesterol", "High Cholesterol", &["high cholesterol", "hyperlipidemia"]),
        ],
    },
];

/// Suggestions scoring below this are dropped.
const MIN_SUGGESTION_SCORE: f64 = 0.6;

/// Blend Jaro-Winkler (prefix friendly) with normalized Levenshtein.
fn fuzzy_match(a: &str, b: &str) -> f64 {
    jaro_winkler(a, b) * 0.6 + normalized_levenshtein(a, b) * 0.4
}

/// Best score of a query against an entry's display text and keywords.
fn entry_score(query: &str, entry: &SymptomEntry) -> f64 {
    let text = entry.text.to_lowercase();
    std::iter::once(text.as_str())
        .chain(entry.keywords.iter().copied())
        .map(|candidate| {
            if candidate.starts_with(query) {
                1.0
            } else {
                fuzzy_match(query, candidate)
            }
        })
        .fold(0.0, f64::max)
}

/// Rank vocabulary entries against a partial query, best first.
///
/// Ties keep vocabulary order. An empty query yields nothing.
pub fn suggest(query: &str, limit: usize) -> Vec<SymptomSuggestion> {
    let query = query.trim().to_lowercase();
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut suggestions: Vec<SymptomSuggestion> = SYMPTOM_VOCABULARY
        .iter()
        .flat_map(|category| category.entries.iter().map(move |e| (category.name, e)))
        .filter_map(|(category, entry)| {
            let score = entry_score(&query, entry);
            (score >= MIN_SUGGESTION_SCORE).then(|| SymptomSuggestion {
                id: entry.id.to_string(),
                text: entry.text.to_string(),
                category: category.to_string(),
                score,
            })
        })
        .collect();

    suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
    suggestions.truncate(limit);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_shape() {
        let names: Vec<&str> = SYMPTOM_VOCABULARY.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                "General",
                "Respiratory",
                "ENT & Allergy",
                "Gastrointestinal",
                "Chronic Conditions"
            ]
        );
        let total: usize = SYMPTOM_VOCABULARY.iter().map(|c| c.entries.len()).sum();
        assert_eq!(total, 21);
    }

    #[test]
    fn test_ids_unique() {
        let mut ids: Vec<&str> = SYMPTOM_VOCABULARY
            .iter()
            .flat_map(|c| c.entries.iter().map(|e| e.id))
            .collect();
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), count);
    }

    #[test]
    fn test_prefix_match_ranks_first() {
        let results = suggest("sneez", 3);
        assert_eq!(results[0].id, "sneezing");
        assert_eq!(results[0].score, 1.0);
        assert_eq!(results[0].category, "ENT & Allergy");
    }

    #[test]
    fn test_keyword_match() {
        let results = suggest("hyperglycemia", 1);
        assert_eq!(results[0].id, "diabetes_symptoms");
    }

    #[test]
    fn test_typo_tolerated() {
        let results = suggest("hedache", 1);
        assert_eq!(results[0].id, "headache");
    }

    #[test]
    fn test_empty_and_limit() {
        assert!(suggest("   ", 5).is_empty());
        assert!(suggest("fever", 0).is_empty());
        assert!(suggest("c", 2).len() <= 2);
    }

    #[test]
    fn test_nonsense_filtered() {
        assert!(suggest("zzzzqqqq", 5).is_empty());
    }
}
