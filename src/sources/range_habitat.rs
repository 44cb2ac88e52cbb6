use crate::error::Result;
use crate::types::SpeciesRecord;
use std::path::Path;
use tracing::{info, warn};

/// Result of loading the range-vs-habitat table: the usable rows plus the
/// count of rows dropped for a zero (or negative) range area.
#[derive(Debug)]
pub struct RangeHabitatTable {
    pub records: Vec<SpeciesRecord>,
    pub dropped_zero_range: usize,
}

/// Loads the range-vs-habitat CSV.
///
/// Rows with `AreaRange_km2 <= 0` would make the habitat proportion
/// undefined, so they are dropped here with a warning rather than carried
/// into the derivation stage.
pub fn load<P: AsRef<Path>>(path: P) -> Result<RangeHabitatTable> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;

    let mut records = Vec::new();
    let mut dropped_zero_range = 0usize;
    for row in reader.deserialize::<SpeciesRecord>() {
        let record = row?;
        if record.area_range_km2 <= 0.0 {
            warn!(
                species = %record.species_code,
                "dropping record with non-positive range area"
            );
            dropped_zero_range += 1;
            continue;
        }
        records.push(record);
    }

    info!(
        rows = records.len(),
        dropped = dropped_zero_range,
        "loaded range-vs-habitat table"
    );
    Ok(RangeHabitatTable {
        records,
        dropped_zero_range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn drops_zero_range_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rh.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "SpeciesCode,ScientificName,CommonName,AreaRange_km2,AreaHab_km2").unwrap();
        writeln!(f, "mABCOx,Abco abco,Abco,100.0,40.0").unwrap();
        writeln!(f, "mZEROx,Zero zero,Zero,0.0,10.0").unwrap();
        drop(f);

        let table = load(&path).unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.dropped_zero_range, 1);
        assert_eq!(table.records[0].species_code, "mABCOx");
        // nHUCS column absent from the file
        assert!(table.records[0].n_hucs.is_none());
    }
}
