//! Medicine database operations.

use std::collections::HashMap;

use rusqlite::{params, Connection, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::catalog::MedicineCatalog;
use crate::models::{Medicine, MedicineRecord, OTC_CLASSIFICATION};

const SELECT_COLUMNS: &str = r#"
    SELECT id, name, category, dosage_form, strength, manufacturer,
           indication, classification, age_dosing
    FROM medicines
"#;

impl Database {
    /// Insert or update a medicine.
    pub fn upsert_medicine(&self, medicine: &Medicine) -> DbResult<()> {
        upsert(&self.conn, medicine)
    }

    /// Get a medicine by id.
    pub fn get_medicine(&self, id: &str) -> DbResult<Option<Medicine>> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?");
        let result = self
            .conn
            .query_row(&sql, [id], MedicineRow::from_row)
            .optional()?;

        result.map(|row| row.try_into()).transpose()
    }

    /// List medicines in insertion order.
    pub fn list_medicines(&self, otc_only: bool) -> DbResult<Vec<Medicine>> {
        let sql = if otc_only {
            format!("{SELECT_COLUMNS} WHERE classification = ?1 COLLATE NOCASE ORDER BY rowid")
        } else {
            format!("{SELECT_COLUMNS} ORDER BY rowid")
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = if otc_only {
            stmt.query_map([OTC_CLASSIFICATION], MedicineRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?
        } else {
            stmt.query_map([], MedicineRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?
        };

        let mut medicines = Vec::with_capacity(rows.len());
        for row in rows {
            medicines.push(row.try_into()?);
        }
        Ok(medicines)
    }

    /// Delete a medicine.
    pub fn delete_medicine(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM medicines WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Normalize and store raw records in one transaction.
    ///
    /// Records sharing an id keep the first occurrence, except that an OTC
    /// record replaces an earlier non-OTC one so the loaded catalog matches
    /// [`MedicineCatalog::from_records`]. Returns the number stored.
    pub fn import_records(&mut self, records: &[MedicineRecord]) -> DbResult<usize> {
        let tx = self.conn.transaction()?;
        // id -> whether the stored row is OTC
        let mut stored: HashMap<String, bool> = HashMap::new();

        for record in records {
            let medicine = Medicine::from_record(record);
            match stored.get(&medicine.id) {
                None => {}
                Some(false) if medicine.is_otc() => {
                    // Re-insert so the row takes this record's position
                    tx.execute("DELETE FROM medicines WHERE id = ?", [&medicine.id])?;
                    tracing::debug!(id = %medicine.id, "OTC record replaces non-OTC duplicate");
                }
                Some(_) => continue,
            }
            upsert(&tx, &medicine)?;
            stored.insert(medicine.id.clone(), medicine.is_otc());
        }

        tx.commit()?;
        tracing::info!(
            records = records.len(),
            stored = stored.len(),
            "Imported medicine records"
        );
        Ok(stored.len())
    }

    /// Build the immutable OTC catalog from stored medicines.
    pub fn load_catalog(&self) -> DbResult<MedicineCatalog> {
        let medicines = self.list_medicines(true)?;
        Ok(MedicineCatalog::new(medicines))
    }
}

fn upsert(conn: &Connection, medicine: &Medicine) -> DbResult<()> {
    let age_dosing_json = serde_json::to_string(&medicine.age_dosing)?;

    conn.execute(
        r#"
        INSERT INTO medicines (
            id, name, category, dosage_form, strength, manufacturer,
            indication, classification, age_dosing, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, datetime('now'))
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            category = excluded.category,
            dosage_form = excluded.dosage_form,
            strength = excluded.strength,
            manufacturer = excluded.manufacturer,
            indication = excluded.indication,
            classification = excluded.classification,
            age_dosing = excluded.age_dosing,
            updated_at = datetime('now')
        "#,
        params![
            medicine.id,
            medicine.name,
            medicine.category,
            medicine.dosage_form,
            medicine.strength,
            medicine.manufacturer,
            medicine.indication,
            medicine.classification,
            age_dosing_json,
        ],
    )?;
    Ok(())
}

/// Intermediate row struct for database mapping.
struct MedicineRow {
    id: String,
    name: String,
    category: String,
    dosage_form: String,
    strength: String,
    manufacturer: String,
    indication: String,
    classification: String,
    age_dosing: String,
}

impl MedicineRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            category: row.get(2)?,
            dosage_form: row.get(3)?,
            strength: row.get(4)?,
            manufacturer: row.get(5)?,
            indication: row.get(6)?,
            classification: row.get(7)?,
            age_dosing: row.get(8)?,
        })
    }
}

impl TryFrom<MedicineRow> for Medicine {
    type Error = DbError;

    fn try_from(row: MedicineRow) -> Result<Self, Self::Error> {
        Ok(Medicine {
            id: row.id,
            name: row.name,
            category: row.category,
            dosage_form: row.dosage_form,
            strength: row.strength,
            manufacturer: row.manufacturer,
            indication: row.indication,
            classification: row.classification,
            age_dosing: serde_json::from_str(&row.age_dosing)?,
        })
    }
}
