use crate::constants::{combined_labels, uncombined_labels, CONUS_AREA_KM2, LOOKUP_ERROR_LOG};
use crate::error::Result;
use crate::sources::natureserve::LookupReport;
use crate::types::{MeltedRow, SpeciesPercentRow, SpeciesRecord, SummaryRow};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Long-format view over all tail species: Status 1&2 combined, Status 3,
/// Status 4. Exactly three rows per species, in label order.
pub fn melt_combined(rows: &[SpeciesPercentRow]) -> Vec<MeltedRow> {
    let labels = combined_labels();
    rows.iter()
        .flat_map(|r| {
            let values = [r.pct_status12, r.pct_status3, r.pct_status4];
            labels
                .iter()
                .zip(values)
                .map(|(label, percent)| MeltedRow {
                    species_code: r.species_code.clone(),
                    common_name: r.common_name.clone(),
                    category: (*label).to_string(),
                    percent,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Long-format view over the conservation-concern subset: all four
/// statuses uncombined. Exactly four rows per species, in label order.
pub fn melt_uncombined(rows: &[SpeciesPercentRow]) -> Vec<MeltedRow> {
    let labels = uncombined_labels();
    rows.iter()
        .flat_map(|r| {
            let values = [r.pct_status1, r.pct_status2, r.pct_status3, r.pct_status4];
            labels
                .iter()
                .zip(values)
                .map(|(label, percent)| MeltedRow {
                    species_code: r.species_code.clone(),
                    common_name: r.common_name.clone(),
                    category: (*label).to_string(),
                    percent,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Range-vs-habitat summary rows: CONUS proportions and log areas derived
/// from the input table.
pub fn summary_rows(records: &[SpeciesRecord]) -> Vec<SummaryRow> {
    records
        .iter()
        .map(|r| SummaryRow {
            species_code: r.species_code.clone(),
            scientific_name: r.scientific_name.clone(),
            common_name: r.common_name.clone(),
            area_range_km2: r.area_range_km2,
            n_hucs: r.n_hucs,
            prop_conus: r.area_range_km2 / CONUS_AREA_KM2,
            area_hab_km2: r.area_hab_km2,
            prop_hab_conus: r.area_hab_km2 / CONUS_AREA_KM2,
            log_area_range: r.area_range_km2.log10(),
            log_area_habitat: r.area_hab_km2.log10(),
        })
        .collect()
}

/// Serializes any row table to CSV.
pub fn write_csv<T: Serialize, P: AsRef<Path>>(path: P, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!(path = %path.as_ref().display(), rows = rows.len(), "wrote CSV");
    Ok(())
}

/// Writes the per-species lookup failures to a plain-text error log next to
/// the other outputs. Nothing is written when every lookup succeeded.
pub fn write_lookup_error_log<P: AsRef<Path>>(output_dir: P, report: &LookupReport) -> Result<()> {
    if report.failures.is_empty() {
        return Ok(());
    }
    let path = output_dir.as_ref().join(LOOKUP_ERROR_LOG);
    let mut file = std::fs::File::create(&path)?;
    for (species_code, reason) in &report.failures {
        writeln!(file, "{species_code}: {reason}")?;
    }
    info!(
        path = %path.display(),
        failures = report.failures.len(),
        "wrote species data access error log"
    );
    Ok(())
}
