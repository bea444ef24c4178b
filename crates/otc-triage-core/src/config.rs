//! Engine constants and logging defaults.

/// Engine name used in logs and reports.
pub const ENGINE_NAME: &str = "otc-triage";
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version tag of the built-in severity lexicon and cluster tables.
pub const LEXICON_VERSION: &str = "2025-09-10";

/// Severity score at or above which a case is severe.
pub const SEVERE_THRESHOLD: f64 = 8.0;
/// Severity score at or above which a case is a possible risk.
pub const POSSIBLE_RISK_THRESHOLD: f64 = 4.0;
/// Weight of a symptom token that matches no lexicon tier.
pub const UNMATCHED_SYMPTOM_WEIGHT: f64 = 0.5;

/// Maximum options returned, not counting an emergency referral.
pub const MAX_OPTIONS: usize = 3;
/// Maximum medicines attached to one option by a catalog lookup.
pub const CATALOG_LOOKUP_LIMIT: usize = 1;

/// Disclaimer attached to every assessment report.
pub const DISCLAIMER: &str = "This system recommends only Over-the-Counter (OTC) medicines. \
For prescription medications or severe conditions, consult a licensed healthcare provider. \
This is clinical decision support only.";

/// Medicine policy, also stamped on every option that lists medicines.
pub const MEDICINE_POLICY: &str = "Only Over-the-Counter medicines are recommended by this system";

/// Date stamped on built-in guideline references.
pub const EVIDENCE_DATE: &str = "2025-09-10";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "otc_triage_core=debug"
    } else {
        "otc_triage_core=info"
    }
}
