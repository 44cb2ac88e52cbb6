use crate::types::{SpeciesRecord, TailRecord};
use tracing::info;

/// Derives the habitat-in-range proportion for every species. Callers must
/// have dropped zero-range rows already; the division here is total.
pub fn derive_proportions(records: &[SpeciesRecord]) -> Vec<TailRecord> {
    records
        .iter()
        .map(|r| TailRecord {
            species_code: r.species_code.clone(),
            scientific_name: r.scientific_name.clone(),
            common_name: r.common_name.clone(),
            area_range_km2: r.area_range_km2,
            area_hab_km2: r.area_hab_km2,
            prop_hab_of_range: r.area_hab_km2 / r.area_range_km2,
        })
        .collect()
}

/// Percentile with "lower" interpolation: the largest data value at or
/// below the interpolated percentile point. The result is always a member
/// of `values`. Returns None on an empty slice.
pub fn lower_percentile(values: &[f64], pct: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let rank = (sorted.len() - 1) as f64 * pct / 100.0;
    Some(sorted[rank.floor() as usize])
}

/// Selects the statistical tail: all records whose proportion is at or
/// below the lower-interpolated percentile threshold. Ties at the
/// threshold are all kept, so the subset can exceed an exact 5% count.
pub fn select_tail(records: &[TailRecord], pct: f64) -> Vec<TailRecord> {
    let props: Vec<f64> = records.iter().map(|r| r.prop_hab_of_range).collect();
    let Some(threshold) = lower_percentile(&props, pct) else {
        return Vec::new();
    };
    let tail: Vec<TailRecord> = records
        .iter()
        .filter(|r| r.prop_hab_of_range <= threshold)
        .cloned()
        .collect();
    info!(
        threshold,
        selected = tail.len(),
        of = records.len(),
        "selected habitat-restricted tail"
    );
    tail
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, range: f64, hab: f64) -> SpeciesRecord {
        SpeciesRecord {
            species_code: code.to_string(),
            scientific_name: format!("Sci {code}"),
            common_name: format!("Common {code}"),
            area_range_km2: range,
            area_hab_km2: hab,
            n_hucs: None,
        }
    }

    #[test]
    fn proportion_is_habitat_over_range() {
        let rows = derive_proportions(&[record("mABCOx", 200.0, 50.0)]);
        assert!((rows[0].prop_hab_of_range - 0.25).abs() < 1e-12);
    }

    #[test]
    fn lower_percentile_returns_a_data_value() {
        let values = vec![0.9, 0.1, 0.5, 0.3, 0.7];
        let p = lower_percentile(&values, 5.0).unwrap();
        assert!(values.contains(&p));
        // (n-1) * 0.05 = 0.2, floor 0 -> the minimum
        assert_eq!(p, 0.1);
    }

    #[test]
    fn lower_percentile_boundaries() {
        let values = vec![2.0, 1.0, 3.0];
        assert_eq!(lower_percentile(&values, 0.0), Some(1.0));
        assert_eq!(lower_percentile(&values, 100.0), Some(3.0));
        assert_eq!(lower_percentile(&[], 5.0), None);
    }

    #[test]
    fn tail_size_is_count_at_or_below_threshold() {
        // 21 species, proportions 0.01..0.21; (21-1)*0.05 = 1.0 -> sorted[1] = 0.02
        let records: Vec<SpeciesRecord> = (1..=21)
            .map(|i| record(&format!("m{i:04}x"), 100.0, i as f64))
            .collect();
        let rows = derive_proportions(&records);
        let tail = select_tail(&rows, 5.0);
        assert_eq!(tail.len(), 2);
        let max = tail
            .iter()
            .map(|r| r.prop_hab_of_range)
            .fold(f64::MIN, f64::max);
        assert!(max <= 0.02 + 1e-12);
    }

    #[test]
    fn ties_at_threshold_are_all_kept() {
        let mut records: Vec<SpeciesRecord> =
            (0..20).map(|i| record(&format!("m{i:04}x"), 100.0, 50.0)).collect();
        records.push(record("mLOW1x", 100.0, 1.0));
        records.push(record("mLOW2x", 100.0, 1.0));
        let rows = derive_proportions(&records);
        let tail = select_tail(&rows, 5.0);
        // threshold lands on 0.01 and both tied records stay
        assert_eq!(tail.len(), 2);
    }
}
