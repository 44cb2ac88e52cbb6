use crate::constants::{GAP_STATUS_MAX, GAP_STATUS_MEASURED_MAX, GAP_STATUS_MIN};
use crate::types::{EnrichedRecord, StatusAreaRecord};
use std::collections::HashMap;
use tracing::warn;

/// Rounds to the 3-decimal precision of the source area tables.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Completed per-status area table plus the data-quality signals collected
/// while deriving it.
pub struct ProtectionTable {
    pub records: Vec<StatusAreaRecord>,
    /// Species whose derived status-4 area came out negative.
    pub negative_residuals: Vec<String>,
}

/// Completes the per-status area table: for every species in the tail
/// subset, status 4 is derived as total habitat minus the summed statuses
/// 1..=3, and the result covers statuses 1 through 4 with explicit zero
/// rows where the store returned nothing.
///
/// A negative residual means the store and the habitat table disagree; it
/// is reported, not clamped.
pub fn complete_status_table(
    tail: &[EnrichedRecord],
    measured: &[StatusAreaRecord],
) -> ProtectionTable {
    let mut by_species: HashMap<&str, [f64; 3]> = HashMap::new();
    for row in measured {
        if row.gap_status < GAP_STATUS_MIN || row.gap_status > GAP_STATUS_MEASURED_MAX {
            continue;
        }
        let sums = by_species.entry(row.species_code.as_str()).or_default();
        sums[(row.gap_status - 1) as usize] += row.area_km2;
    }

    let mut records = Vec::with_capacity(tail.len() * GAP_STATUS_MAX as usize);
    let mut negative_residuals = Vec::new();
    for species in tail {
        let code = species.species_code();
        let sums = by_species.get(code).copied().unwrap_or_default();
        let measured_total: f64 = sums.iter().sum();
        let residual = round3(species.tail.area_hab_km2 - measured_total);
        if residual < 0.0 {
            warn!(
                species = %code,
                residual,
                "status 1-3 areas exceed total habitat; keeping negative status-4 residual"
            );
            negative_residuals.push(code.to_string());
        }
        for status in GAP_STATUS_MIN..=GAP_STATUS_MEASURED_MAX {
            records.push(StatusAreaRecord {
                species_code: code.to_string(),
                gap_status: status,
                area_km2: round3(sums[(status - 1) as usize]),
            });
        }
        records.push(StatusAreaRecord {
            species_code: code.to_string(),
            gap_status: GAP_STATUS_MAX,
            area_km2: residual,
        });
    }

    ProtectionTable {
        records,
        negative_residuals,
    }
}

/// Recomputed per-species totals over all four statuses. Should equal the
/// habitat totals within rounding.
pub fn species_totals(records: &[StatusAreaRecord]) -> HashMap<String, f64> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for row in records {
        *totals.entry(row.species_code.clone()).or_default() += row.area_km2;
    }
    totals
}
