//! Tests for the exported FFI surface, including an on-disk catalog.

use otc_triage_core::models::MedicineRecord;
use otc_triage_core::{
    age_group, classify_severity, engine_from_records, open_engine, suggest_symptoms,
    symptom_vocabulary, Database, FfiMedicineRecord, FfiPatient, OtcTriageError,
};

fn ffi_record(name: &str, category: &str, indication: &str, classification: &str) -> FfiMedicineRecord {
    FfiMedicineRecord {
        name: name.into(),
        category: category.into(),
        dosage_form: "Syrup".into(),
        strength: "5 ml".into(),
        manufacturer: "Generic Labs".into(),
        indication: indication.into(),
        classification: classification.into(),
    }
}

fn patient(symptoms: &str, age: Option<f64>) -> FfiPatient {
    FfiPatient {
        name: "Test Patient".into(),
        age,
        sex: Some("female".into()),
        weight_kg: Some(80.0),
        height_m: Some(2.0),
        symptoms: symptoms.into(),
    }
}

fn seed_database(path: &std::path::Path) {
    let mut db = Database::open(path).unwrap();
    let records: Vec<MedicineRecord> = vec![
        ffi_record("Cetirizine", "Antihistamine", "Allergy", "Over-the-Counter").into(),
        ffi_record("Paracetamol", "Antipyretic", "Fever", "Over-the-Counter").into(),
        ffi_record("Codeine", "Analgesic", "Pain", "Prescription").into(),
    ];
    db.import_records(&records).unwrap();
}

#[test]
fn test_open_engine_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("medicines.db");
    seed_database(&path);

    let core = open_engine(path.to_string_lossy().into_owned()).unwrap();
    assert_eq!(core.catalog_size(), 2);
    assert!(core.medicine("codeine".into()).is_none());

    let cetirizine = core.medicine("cetirizine".into()).unwrap();
    assert_eq!(cetirizine.age_dosing.len(), 2);
    assert_eq!(cetirizine.age_dosing[0].age_group, "adult");
    assert_eq!(cetirizine.age_dosing[0].dose, "5 ml syrup");

    let report = core
        .assess(patient("sneezing, itchy eyes, runny nose", Some(30.0)))
        .unwrap();
    assert_eq!(report.triage, "primary_care");
    assert_eq!(report.options[0].kind, "antihistamine");
    assert_eq!(report.options[0].drug_ids, vec!["cetirizine"]);
    assert_eq!(report.options[0].age_group.as_deref(), Some("adult"));
    assert_eq!(report.patient_summary.bmi_category.as_deref(), Some("normal_weight"));
}

#[test]
fn test_engine_from_records_skips_prescription() {
    let core = engine_from_records(vec![
        ffi_record("Ibuprofen", "Analgesic", "Pain", "Over-the-Counter"),
        ffi_record("Tramadol", "Analgesic", "Pain", "Prescription"),
    ]);

    assert_eq!(core.catalog_size(), 1);
    let options = core.generate_options("back pain, joint ache".into());
    assert_eq!(options[0].kind, "analgesic");
    assert_eq!(options[0].drug_ids, vec!["ibuprofen"]);
}

#[test]
fn test_check_safety_round_trip() {
    let core = engine_from_records(vec![ffi_record(
        "Ibuprofen",
        "Analgesic",
        "Pain",
        "Over-the-Counter",
    )]);
    let option = core
        .generate_options("back pain, joint ache".into())
        .remove(0);

    let adult = core
        .check_safety(option.clone(), patient("back pain", Some(40.0)))
        .unwrap();
    assert!(adult.flags.is_empty());
    assert_eq!(adult.dosing.as_deref(), Some("5 ml syrup"));

    let child = core
        .check_safety(option, patient("back pain", Some(5.0)))
        .unwrap();
    assert_eq!(
        child.flags,
        vec!["Ibuprofen is not typically recommended for this age group"]
    );
    assert!(child.dosing.is_none());
}

#[test]
fn test_check_safety_rejects_unknown_kind() {
    let core = engine_from_records(Vec::new());
    let mut option = core.generate_options("purple toes".into()).remove(0);
    option.kind = "miracle_cure".into();

    let result = core.check_safety(option, patient("purple toes", Some(30.0)));
    assert!(matches!(result, Err(OtcTriageError::InvalidInput(_))));
}

#[test]
fn test_assess_rejects_bad_age() {
    let core = engine_from_records(Vec::new());

    let negative = core.assess(patient("cough", Some(-3.0)));
    assert!(matches!(negative, Err(OtcTriageError::InvalidInput(_))));

    let nan = core.assess_json(patient("cough", Some(f64::NAN)));
    assert!(matches!(nan, Err(OtcTriageError::InvalidInput(_))));
}

#[test]
fn test_assess_json() {
    let core = engine_from_records(Vec::new());
    let json = core
        .assess_json(patient("difficulty breathing, chest pain, severe headache", None))
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["triage"], "emergency");
    assert_eq!(value["requires_clinician_signoff"], true);
    assert_eq!(value["severity"]["case_severity"], "severe");
    assert_eq!(value["options"][0]["type"], "emergency_referral");
    assert_eq!(value["options"][0]["priority"], "urgent");
}

#[test]
fn test_free_functions() {
    let severity = classify_severity("difficulty breathing, chest pain".into());
    assert_eq!(severity.severity_score, 6.0);
    assert_eq!(severity.case_severity, "possible_risk");
    assert_eq!(severity.urgency, "medical_consultation_recommended");
    assert_eq!(severity.symptom_breakdown[0].tier, "severe");
    assert_eq!(severity.total_symptoms, 2);

    assert_eq!(age_group(1.0).unwrap(), "infant");
    assert_eq!(age_group(65.0).unwrap(), "elderly");
    assert!(age_group(f64::INFINITY).is_err());

    let vocabulary = symptom_vocabulary();
    assert_eq!(vocabulary.len(), 5);
    assert_eq!(vocabulary[0].entries[0].id, "fever");

    let suggestions = suggest_symptoms("whee".into(), 3);
    assert_eq!(suggestions[0].id, "wheezing");
}
