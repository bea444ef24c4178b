//! SQLite schema definition.

/// Complete database schema for the medicine store.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Medicines
-- ============================================================================

CREATE TABLE IF NOT EXISTS medicines (
    id TEXT PRIMARY KEY,                          -- derived from name
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    dosage_form TEXT NOT NULL,
    strength TEXT NOT NULL,
    manufacturer TEXT NOT NULL,
    indication TEXT NOT NULL,
    classification TEXT NOT NULL,
    age_dosing TEXT NOT NULL DEFAULT '{}',        -- JSON object {age_group: {dose, min_age, max_age, notes}}
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_medicines_category ON medicines(category COLLATE NOCASE);
CREATE INDEX IF NOT EXISTS idx_medicines_classification ON medicines(classification COLLATE NOCASE);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_creates_successfully() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
    }

    #[test]
    fn test_id_is_unique() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let insert = "INSERT INTO medicines (id, name, category, dosage_form, strength, manufacturer, indication, classification)
                      VALUES ('aspirin', 'Aspirin', 'Analgesic', 'Tablet', '300 mg', 'Acme', 'Pain', 'Over-the-Counter')";
        conn.execute(insert, []).unwrap();
        assert!(conn.execute(insert, []).is_err());
    }
}
