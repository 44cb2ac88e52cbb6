use crate::config::ConcernConfig;
use crate::types::{EnrichedRecord, IucnRecord, TailRecord};
use std::collections::HashMap;
use tracing::info;

fn index_by_code(reference: &[IucnRecord]) -> HashMap<&str, &IucnRecord> {
    reference
        .iter()
        .map(|r| (r.gap_spp_code.as_str(), r))
        .collect()
}

/// Inner join of the tail subset against the reference table. The IUCN does
/// not assess subspecies, so only full-species codes find a match; the
/// result is a sanity subset, not the authoritative table.
pub fn inner_join_species(tail: &[TailRecord], reference: &[IucnRecord]) -> Vec<EnrichedRecord> {
    let index = index_by_code(reference);
    tail.iter()
        .filter_map(|t| {
            index.get(t.species_code.as_str()).map(|iucn| EnrichedRecord {
                tail: t.clone(),
                iucn: Some((*iucn).clone()),
                natureserve: None,
            })
        })
        .collect()
}

/// Left join keeping every tail record, subspecies included. Unmatched
/// reference fields stay `None`. This table is authoritative downstream.
pub fn left_join_all(tail: &[TailRecord], reference: &[IucnRecord]) -> Vec<EnrichedRecord> {
    let index = index_by_code(reference);
    let joined: Vec<EnrichedRecord> = tail
        .iter()
        .map(|t| EnrichedRecord {
            tail: t.clone(),
            iucn: index.get(t.species_code.as_str()).map(|i| (*i).clone()),
            natureserve: None,
        })
        .collect();
    let matched = joined.iter().filter(|r| r.iucn.is_some()).count();
    info!(rows = joined.len(), matched, "joined tail subset with reference table");
    joined
}

/// Conservation-concern filter: the IUCN category is in the accepted set,
/// or (when NatureServe ranks were fetched) the global rank is in the
/// accepted rank set.
pub fn of_concern(records: &[EnrichedRecord], config: &ConcernConfig) -> Vec<EnrichedRecord> {
    records
        .iter()
        .filter(|r| {
            let by_category = config
                .iucn_categories
                .iter()
                .any(|c| c == r.iucn_category());
            let by_rank = r.natureserve.as_ref().is_some_and(|ns| {
                config
                    .natureserve_global_ranks
                    .iter()
                    .any(|g| g == &ns.global_rank)
            });
            by_category || by_rank
        })
        .cloned()
        .collect()
}
