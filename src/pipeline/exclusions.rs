use crate::types::EnrichedRecord;
use std::collections::HashSet;
use tracing::info;

/// Removes the configured denylist of species codes (non-native species and
/// records with corrupted upstream source files). Exact key match; listed
/// codes absent from the table are not an error.
pub fn apply_denylist(records: &[EnrichedRecord], denylist: &[String]) -> Vec<EnrichedRecord> {
    let denied: HashSet<&str> = denylist.iter().map(String::as_str).collect();
    let kept: Vec<EnrichedRecord> = records
        .iter()
        .filter(|r| !denied.contains(r.species_code()))
        .cloned()
        .collect();
    info!(
        removed = records.len() - kept.len(),
        kept = kept.len(),
        "applied exclusion denylist"
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TailRecord;

    fn record(code: &str) -> EnrichedRecord {
        EnrichedRecord {
            tail: TailRecord {
                species_code: code.to_string(),
                scientific_name: String::new(),
                common_name: String::new(),
                area_range_km2: 1.0,
                area_hab_km2: 1.0,
                prop_hab_of_range: 1.0,
            },
            iucn: None,
            natureserve: None,
        }
    }

    #[test]
    fn removes_only_present_keys() {
        let records = vec![record("mKEEPx"), record("bROPIx"), record("mALSOx")];
        let denylist = vec!["bROPIx".to_string(), "mGONEx".to_string()];
        let kept = apply_denylist(&records, &denylist);
        // output rows = input rows - denylist keys actually present
        assert_eq!(kept.len(), records.len() - 1);
        assert!(kept.iter().all(|r| r.species_code() != "bROPIx"));
    }

    #[test]
    fn empty_denylist_is_identity() {
        let records = vec![record("mKEEPx")];
        assert_eq!(apply_denylist(&records, &[]).len(), 1);
    }
}
