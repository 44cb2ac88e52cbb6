use crate::constants::GAP_STATUS_MEASURED_MAX;
use crate::error::{PipelineError, Result};
use crate::types::StatusAreaRecord;
use rusqlite::Connection;
use std::path::Path;
use tracing::info;

/// Analytical store of habitat area swept by GAP stewardship status.
///
/// Statuses 4 and above are excluded at the source; the pipeline derives
/// status 4 as a residual instead.
pub struct ProtectionDb {
    conn: Connection,
}

impl ProtectionDb {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        Ok(Self { conn })
    }

    /// In-memory store used by tests and fixtures.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS habitat_protection (
                species_code TEXT NOT NULL,
                gap_status   INTEGER NOT NULL,
                area_km2     REAL NOT NULL
            );
            "#,
        )?;
        Ok(Self { conn })
    }

    pub fn insert_area(&self, species_code: &str, gap_status: u8, area_km2: f64) -> Result<()> {
        self.conn.execute(
            "INSERT INTO habitat_protection (species_code, gap_status, area_km2) VALUES (?1, ?2, ?3)",
            rusqlite::params![species_code, gap_status, area_km2],
        )?;
        Ok(())
    }

    /// Sums protected area by species and status for the given species
    /// codes, statuses 1 through 3 only. The species filter is one
    /// parameterized disjunction of equality tests.
    pub fn status_areas(&self, species_codes: &[String]) -> Result<Vec<StatusAreaRecord>> {
        if species_codes.is_empty() {
            return Err(PipelineError::Config(
                "protection query needs at least one species code".to_string(),
            ));
        }

        let filter = species_codes
            .iter()
            .map(|_| "species_code = ?")
            .collect::<Vec<_>>()
            .join(" OR ");
        let sql = format!(
            "SELECT species_code, gap_status, SUM(area_km2) \
             FROM habitat_protection \
             WHERE gap_status <= {GAP_STATUS_MEASURED_MAX} AND ({filter}) \
             GROUP BY species_code, gap_status \
             ORDER BY species_code, gap_status"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(species_codes.iter()), |row| {
            Ok(StatusAreaRecord {
                species_code: row.get(0)?,
                gap_status: row.get::<_, i64>(1)? as u8,
                area_km2: row.get(2)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        info!(
            species = species_codes.len(),
            rows = records.len(),
            "queried protection status areas"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_per_species_and_status_excluding_four() {
        let db = ProtectionDb::open_in_memory().unwrap();
        db.insert_area("mABCOx", 1, 10.0).unwrap();
        db.insert_area("mABCOx", 1, 5.0).unwrap();
        db.insert_area("mABCOx", 2, 20.0).unwrap();
        db.insert_area("mABCOx", 4, 99.0).unwrap(); // excluded at the source
        db.insert_area("mOTHRx", 3, 7.5).unwrap();

        let rows = db
            .status_areas(&["mABCOx".to_string(), "mOTHRx".to_string()])
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], StatusAreaRecord {
            species_code: "mABCOx".to_string(),
            gap_status: 1,
            area_km2: 15.0,
        });
        assert_eq!(rows[1].gap_status, 2);
        assert_eq!(rows[2].species_code, "mOTHRx");
    }

    #[test]
    fn unknown_codes_return_no_rows() {
        let db = ProtectionDb::open_in_memory().unwrap();
        db.insert_area("mABCOx", 1, 10.0).unwrap();
        let rows = db.status_areas(&["mNONEx".to_string()]).unwrap();
        assert!(rows.is_empty());
    }
}
