//! Weighted symptom clusters and candidate option generation.
//!
//! Unlike the severity lexicon, cluster scoring is cumulative: every keyword
//! contained in a token adds its weight, and a token may feed several
//! clusters at once.

use std::collections::BTreeMap;

use crate::catalog::MedicineCatalog;
use crate::models::{OptionKind, TreatmentOption};

use super::lexicon::WeightedTerms;
use super::tokenize;

/// A (category, indication) catalog query.
#[derive(Debug, Clone, Copy)]
pub struct CatalogQuery {
    pub category: &'static str,
    pub indication: Option<&'static str>,
}

const fn query(category: &'static str, indication: Option<&'static str>) -> CatalogQuery {
    CatalogQuery { category, indication }
}

/// Fixed option shape plus the catalog queries that fill its drug list.
#[derive(Debug, Clone, Copy)]
pub struct OptionTemplate {
    pub id: &'static str,
    pub kind: OptionKind,
    pub title: &'static str,
    pub rationale: &'static str,
    /// Tried in order; the first query with a hit wins
    pub queries: &'static [CatalogQuery],
}

impl OptionTemplate {
    /// Resolve the template against the catalog. None if no query hits.
    pub fn instantiate(&self, catalog: &MedicineCatalog) -> Option<TreatmentOption> {
        self.instantiate_with_rationale(catalog, self.rationale.to_string())
    }

    fn instantiate_with_rationale(
        &self,
        catalog: &MedicineCatalog,
        rationale: String,
    ) -> Option<TreatmentOption> {
        let drugs = self.queries.iter().find_map(|q| {
            let hits = catalog.lookup_by_category_and_indication(q.category, q.indication);
            if hits.is_empty() {
                None
            } else {
                Some(hits.into_iter().map(|m| m.id.clone()).collect::<Vec<_>>())
            }
        })?;

        Some(
            TreatmentOption::new(self.id, self.kind, self.title, rationale).with_drugs(drugs),
        )
    }
}

/// A named symptom signature with an activation threshold.
#[derive(Debug, Clone, Copy)]
pub struct SymptomCluster {
    pub name: &'static str,
    pub terms: WeightedTerms,
    pub threshold: f64,
    pub template: OptionTemplate,
}

/// Built-in clusters, in option emission order.
pub const STANDARD_CLUSTERS: &[SymptomCluster] = &[
    SymptomCluster {
        name: "viral_infection",
        terms: &[
            ("sore throat", 1.0),
            ("fever", 1.0),
            ("body ache", 1.0),
            ("viral", 1.0),
            ("fatigue", 0.8),
            ("headache", 0.8),
            ("congestion", 0.7),
            ("cough", 0.7),
        ],
        threshold: 2.0,
        template: OptionTemplate {
            id: "antiviral_1",
            kind: OptionKind::Antiviral,
            title: "Antiviral medication for viral infection",
            rationale: "Viral illness pattern identified: antiviral treatment recommended.",
            queries: &[query("antiviral", Some("virus")), query("antiviral", None)],
        },
    },
    SymptomCluster {
        name: "bacterial_infection",
        terms: &[
            ("pus", 1.5),
            ("tonsil", 0.8),
            ("tonsillar", 1.0),
            ("exudate", 1.5),
            ("persistent fever", 1.5),
            ("severe", 0.7),
            ("high fever", 1.2),
            ("white patches", 1.0),
            ("swollen lymph nodes", 1.0),
            ("infection", 1.0),
        ],
        threshold: 2.0,
        template: OptionTemplate {
            id: "antibiotic_1",
            kind: OptionKind::Antibiotic,
            title: "Antibiotic for bacterial infection",
            rationale: "Multiple bacterial infection indicators present; clinical confirmation required.",
            queries: &[query("antibiotic", Some("infection")), query("antibiotic", None)],
        },
    },
    SymptomCluster {
        name: "allergy",
        terms: &[
            ("sneezing", 1.0),
            ("runny nose", 1.0),
            ("itchy eyes", 1.2),
            ("allergy", 1.5),
            ("nasal congestion", 0.8),
            ("itchy throat", 0.7),
            ("watery eyes", 1.0),
        ],
        threshold: 1.8,
        template: OptionTemplate {
            id: "allergy_1",
            kind: OptionKind::Antihistamine,
            title: "Medication for allergy symptoms",
            rationale: "Allergy symptom pattern identified.",
            queries: &[query("antihistamine", None), query("antiseptic", None)],
        },
    },
    SymptomCluster {
        name: "diabetes",
        terms: &[
            ("high blood sugar", 1.5),
            ("diabetes", 2.0),
            ("hyperglycemia", 1.5),
            ("excessive thirst", 1.0),
            ("frequent urination", 1.0),
            ("blurred vision", 0.8),
        ],
        threshold: 2.0,
        template: OptionTemplate {
            id: "antidiabetic_1",
            kind: OptionKind::Antidiabetic,
            title: "Antidiabetic medication",
            rationale: "Diabetes symptoms identified; clinical confirmation required.",
            queries: &[query("antidiabetic", Some("diabetes")), query("antidiabetic", None)],
        },
    },
    SymptomCluster {
        name: "gi_symptoms",
        terms: &[
            ("nausea", 1.5),
            ("vomiting", 2.0),
            ("emesis", 2.0),
            ("indigestion", 1.0),
            ("stomach pain", 1.2),
            ("decreased appetite", 0.8),
            ("bloating", 1.0),
            ("digestive", 1.0),
            ("abdominal", 1.0),
        ],
        threshold: 1.5,
        template: OptionTemplate {
            id: "gi_1",
            kind: OptionKind::DigestiveSupport,
            title: "Digestive support medication",
            rationale: "Gastrointestinal symptoms identified.",
            queries: &[query("antiseptic", Some("infection")), query("antiseptic", None)],
        },
    },
    SymptomCluster {
        name: "skin_conditions",
        terms: &[
            ("rash", 1.5),
            ("itching", 1.2),
            ("skin irritation", 1.5),
            ("dry skin", 1.0),
            ("eczema", 1.5),
            ("dermatitis", 1.5),
            ("skin", 0.8),
        ],
        threshold: 1.2,
        template: OptionTemplate {
            id: "skin_1",
            kind: OptionKind::TopicalTreatment,
            title: "Topical treatment for skin conditions",
            rationale: "Skin condition symptoms identified.",
            queries: &[query("antifungal", Some("fungus")), query("antiseptic", None)],
        },
    },
    SymptomCluster {
        name: "mental_health",
        terms: &[
            ("depression", 2.0),
            ("anxiety", 1.5),
            ("mood swings", 1.0),
            ("irritability", 1.0),
            ("stress", 1.0),
            ("mental", 0.8),
        ],
        threshold: 1.5,
        template: OptionTemplate {
            id: "mental_1",
            kind: OptionKind::MentalHealthSupport,
            title: "Mental health support medication",
            rationale: "Mental health symptoms identified; consider professional counseling.",
            queries: &[query("antidepressant", Some("depression")), query("antidepressant", None)],
        },
    },
    SymptomCluster {
        name: "wound_care",
        terms: &[
            ("cut", 1.5),
            ("wound", 2.0),
            ("scrape", 1.0),
            ("minor injury", 1.5),
            ("bleeding", 1.0),
            ("injury", 1.0),
        ],
        threshold: 1.0,
        template: OptionTemplate {
            id: "wound_1",
            kind: OptionKind::WoundCare,
            title: "Wound care antiseptic",
            rationale: "Wound care symptoms identified.",
            queries: &[query("antiseptic", Some("wound")), query("antiseptic", None)],
        },
    },
    SymptomCluster {
        name: "respiratory",
        terms: &[
            ("wheezing", 1.5),
            ("shortness of breath", 1.5),
            ("asthma", 2.0),
            ("difficulty breathing", 1.5),
            ("chest tightness", 1.0),
            ("coughing", 0.8),
        ],
        threshold: 1.5,
        template: OptionTemplate {
            id: "respiratory_1",
            kind: OptionKind::RespiratorySupport,
            title: "Respiratory symptom relief",
            rationale: "Respiratory symptoms identified; seek medical attention if breathing difficulties persist.",
            queries: &[query("antipyretic", None)],
        },
    },
    SymptomCluster {
        name: "hypertension",
        terms: &[
            ("high blood pressure", 2.0),
            ("hypertension", 2.0),
            ("headache", 0.5),
            ("dizziness", 0.5),
        ],
        threshold: 2.0,
        template: OptionTemplate {
            id: "antihypertensive_1",
            kind: OptionKind::Antihypertensive,
            title: "Blood pressure management",
            rationale: "Blood pressure symptoms identified; clinical confirmation required.",
            queries: &[
                query("antihypertensive", Some("hypertension")),
                query("antihypertensive", None),
            ],
        },
    },
    SymptomCluster {
        name: "high_cholesterol",
        terms: &[("high cholesterol", 2.0), ("hyperlipidemia", 2.0)],
        threshold: 2.0,
        template: OptionTemplate {
            id: "lipid_1",
            kind: OptionKind::LipidManagement,
            title: "Cholesterol management",
            rationale: "Cholesterol concerns identified; clinical confirmation required.",
            queries: &[
                query("antihyperlipidemic", Some("cholesterol")),
                query("antihyperlipidemic", None),
            ],
        },
    },
];

const PAIN_SIGNALS: &[&str] = &["pain", "ache", "headache"];
const STRONG_PAIN_SIGNALS: &[&str] = &["severe pain", "intense pain", "chronic pain"];
const FEVER_INDICATORS: &[&str] = &["fever", "high fever", "temperature"];

const PAIN_TEMPLATE: OptionTemplate = OptionTemplate {
    id: "analgesic_1",
    kind: OptionKind::Analgesic,
    title: "Pain relief medication",
    rationale: "Multiple pain symptoms identified.",
    queries: &[query("analgesic", Some("pain")), query("analgesic", None)],
};

const FEVER_TEMPLATE: OptionTemplate = OptionTemplate {
    id: "antipyretic_1",
    kind: OptionKind::Antipyretic,
    title: "Fever reduction medication",
    rationale: "Fever symptoms clearly identified.",
    queries: &[query("antipyretic", Some("fever")), query("antipyretic", None)],
};

/// A keyword-triggered fallback, tried only when nothing else found a drug.
#[derive(Debug, Clone, Copy)]
pub struct FallbackRule {
    pub keywords: &'static [&'static str],
    pub template: OptionTemplate,
}

/// Fallback chain in priority order.
pub const FALLBACK_RULES: &[FallbackRule] = &[
    FallbackRule {
        keywords: &["pain", "ache", "discomfort", "sore", "hurt"],
        template: OptionTemplate {
            id: "fallback_pain",
            kind: OptionKind::GeneralPainRelief,
            title: "General pain relief",
            rationale: "General discomfort symptoms identified.",
            queries: &[query("analgesic", None)],
        },
    },
    FallbackRule {
        keywords: &["infection", "wound", "cut", "rash", "skin", "irritation"],
        template: OptionTemplate {
            id: "fallback_antiseptic",
            kind: OptionKind::GeneralAntiseptic,
            title: "General antiseptic treatment",
            rationale: "General infection or wound care symptoms identified.",
            queries: &[query("antiseptic", None)],
        },
    },
    FallbackRule {
        keywords: &["fungus", "fungal", "yeast", "athlete", "foot"],
        template: OptionTemplate {
            id: "fallback_antifungal",
            kind: OptionKind::AntifungalTreatment,
            title: "Antifungal treatment",
            rationale: "Fungal infection symptoms identified.",
            queries: &[query("antifungal", None)],
        },
    },
    FallbackRule {
        keywords: &["nausea", "stomach", "digestive", "bloating", "indigestion"],
        template: OptionTemplate {
            id: "fallback_digestive",
            kind: OptionKind::DigestiveSupport,
            title: "Digestive support",
            rationale: "Digestive symptoms identified.",
            queries: &[query("antiseptic", None)],
        },
    },
];

/// Advisory emitted when no rule finds a medicine. The only drug-less option.
pub fn general_care_option() -> TreatmentOption {
    TreatmentOption::new(
        "general_advice",
        OptionKind::GeneralCare,
        "General supportive care",
        "Symptoms noted. Consider rest, hydration, and over-the-counter symptom relief as appropriate. \
         Consult healthcare provider if symptoms persist or worsen.",
    )
}

/// Count how many signals occur anywhere in the text.
fn count_signals(text: &str, signals: &[&str]) -> usize {
    signals.iter().filter(|s| text.contains(*s)).count()
}

/// Scores symptom text against clusters and produces candidate options.
#[derive(Debug, Clone, Copy)]
pub struct ClusterScorer<'a> {
    clusters: &'a [SymptomCluster],
}

impl Default for ClusterScorer<'static> {
    fn default() -> Self {
        Self::new(STANDARD_CLUSTERS)
    }
}

impl<'a> ClusterScorer<'a> {
    pub fn new(clusters: &'a [SymptomCluster]) -> Self {
        Self { clusters }
    }

    /// Accumulated score per cluster. Clusters scoring zero are absent.
    pub fn score_clusters(&self, symptoms_text: &str) -> BTreeMap<&'a str, f64> {
        let mut scores = BTreeMap::new();

        for token in tokenize(symptoms_text) {
            for cluster in self.clusters {
                let score: f64 = cluster
                    .terms
                    .iter()
                    .filter(|(keyword, _)| token.contains(keyword))
                    .map(|(_, weight)| weight)
                    .sum();
                if score > 0.0 {
                    *scores.entry(cluster.name).or_insert(0.0) += score;
                }
            }
        }

        scores
    }

    /// Clusters whose score reached their threshold, in table order.
    pub fn active_clusters(&self, symptoms_text: &str) -> Vec<&'a SymptomCluster> {
        let scores = self.score_clusters(symptoms_text);
        self.clusters
            .iter()
            .filter(|c| scores.get(c.name).is_some_and(|s| *s >= c.threshold))
            .collect()
    }

    /// Candidate options before severity-based finalization.
    ///
    /// Always returns at least one option.
    pub fn generate_candidates(
        &self,
        symptoms_text: &str,
        catalog: &MedicineCatalog,
    ) -> Vec<TreatmentOption> {
        let active = self.active_clusters(symptoms_text);
        tracing::debug!(
            clusters = ?active.iter().map(|c| c.name).collect::<Vec<_>>(),
            "Activated symptom clusters"
        );

        let mut options: Vec<TreatmentOption> = active
            .iter()
            .filter_map(|c| c.template.instantiate(catalog))
            .collect();

        // Raw-text heuristics, independent of tokenization
        let text = symptoms_text.to_lowercase();

        let pain_score = count_signals(&text, PAIN_SIGNALS);
        if pain_score >= 2 || count_signals(&text, STRONG_PAIN_SIGNALS) > 0 {
            let rationale = format!("Multiple pain symptoms identified (score: {pain_score}).");
            if let Some(option) = PAIN_TEMPLATE.instantiate_with_rationale(catalog, rationale) {
                options.push(option);
            }
        }

        let fever_score = count_signals(&text, FEVER_INDICATORS);
        if text.contains("fever") {
            tracing::debug!(fever_score, "Fever indicators present");
            if let Some(option) = FEVER_TEMPLATE.instantiate(catalog) {
                options.push(option);
            }
        }

        if !options.iter().any(TreatmentOption::has_drugs) {
            options.push(fallback_option(&text, catalog));
        }

        options
    }
}

/// Walk the fallback chain; general care if no branch yields a medicine.
fn fallback_option(text: &str, catalog: &MedicineCatalog) -> TreatmentOption {
    let hit = FALLBACK_RULES
        .iter()
        .filter(|rule| count_signals(text, rule.keywords) > 0)
        .find_map(|rule| rule.template.instantiate(catalog));

    match hit {
        Some(option) => {
            tracing::debug!(option = %option.id, "Fallback rule matched");
            option
        }
        None => {
            tracing::debug!("No fallback matched; emitting general care");
            general_care_option()
        }
    }
}
