use crate::constants::{GAP_STATUS_MAX, GAP_STATUS_MIN};
use crate::pipeline::protection::round3;
use crate::types::{EnrichedRecord, SpeciesPercentRow, StatusAreaRecord};
use std::collections::HashMap;
use tracing::warn;

/// Pivots the completed per-status area table into one row per species with
/// a percentage column per status, plus the combined Status 1&2 column.
/// Display names are reattached from the enriched table by species code.
///
/// Percent is area over the recomputed four-status total; per species the
/// four percentages sum to 100 within floating rounding.
pub fn percent_pivot(
    status_rows: &[StatusAreaRecord],
    names: &[EnrichedRecord],
) -> Vec<SpeciesPercentRow> {
    let mut areas: HashMap<&str, [f64; GAP_STATUS_MAX as usize]> = HashMap::new();
    for row in status_rows {
        if row.gap_status < GAP_STATUS_MIN || row.gap_status > GAP_STATUS_MAX {
            continue;
        }
        let per_species = areas.entry(row.species_code.as_str()).or_default();
        per_species[(row.gap_status - 1) as usize] += round3(row.area_km2);
    }

    let mut rows = Vec::with_capacity(names.len());
    for species in names {
        let code = species.species_code();
        let Some(per_status) = areas.get(code) else {
            warn!(species = %code, "no status areas for species, skipping pivot row");
            continue;
        };
        let total: f64 = per_status.iter().sum();
        if total == 0.0 {
            warn!(species = %code, "zero total area, skipping pivot row");
            continue;
        }
        let pct = |status: usize| round3(per_status[status - 1] / total * 100.0);
        let (p1, p2, p3, p4) = (pct(1), pct(2), pct(3), pct(4));
        rows.push(SpeciesPercentRow {
            species_code: code.to_string(),
            scientific_name: species.tail.scientific_name.clone(),
            common_name: species.tail.common_name.clone(),
            pct_status1: p1,
            pct_status2: p2,
            pct_status3: p3,
            pct_status4: p4,
            pct_status12: round3(p1 + p2),
        });
    }
    rows
}
