use anyhow::Result;
use std::io::Write;

use habitat_pipeline::config::{
    ConcernConfig, Config, ExclusionConfig, NatureServeConfig, ScienceBaseConfig, TailConfig,
};
use habitat_pipeline::pipeline::Pipeline;
use habitat_pipeline::sources::protection_db::ProtectionDb;
use habitat_pipeline::types::IucnRecord;

fn test_config() -> Config {
    Config {
        tail: TailConfig { percentile: 5.0 },
        exclusions: ExclusionConfig {
            species_codes: vec!["bROPIx".to_string()],
        },
        concern: ConcernConfig {
            iucn_categories: vec!["CR".to_string(), "EN".to_string(), "VU".to_string()],
            natureserve_global_ranks: vec!["G1".to_string(), "G2".to_string()],
        },
        sciencebase: ScienceBaseConfig {
            base_url: "https://www.sciencebase.gov/catalog/item".to_string(),
            item_id: "test".to_string(),
            file_name: "IUCN_Gap.csv".to_string(),
        },
        natureserve: NatureServeConfig {
            enabled: false,
            base_url: String::new(),
            access_key_env: "NATURESERVE_ACCESS_KEY".to_string(),
        },
    }
}

fn iucn(code: &str, category: &str) -> IucnRecord {
    IucnRecord {
        gap_spp_code: code.to_string(),
        scientific_name: format!("Sci {code}"),
        common_name: format!("Common {code}"),
        iucn_category: category.to_string(),
        element_global_id: String::new(),
    }
}

/// Fixture: 40 widespread species plus two restricted ones and one
/// denylisted restricted one. With 43 rows the lower 5th percentile
/// threshold lands on the second-smallest proportion, so the tail holds
/// the three restricted species before exclusions.
fn write_input_csv(dir: &std::path::Path) -> Result<std::path::PathBuf> {
    let path = dir.join("range_habitat.csv");
    let mut f = std::fs::File::create(&path)?;
    writeln!(
        f,
        "SpeciesCode,ScientificName,CommonName,AreaRange_km2,AreaHab_km2"
    )?;
    for i in 0..40 {
        writeln!(
            f,
            "mW{i:03}x,Wide sp{i},Widespread {i},1000.0,{}",
            500.0 + i as f64
        )?;
    }
    writeln!(f, "mRESTx,Restricta restricta,Restricted One,1000.0,10.0")?;
    writeln!(f, "aNARRa,Narrowa narrowa ssp,Narrow Sub,1000.0,20.0")?;
    writeln!(f, "bROPIx,Columba livia,Rock Pigeon,1000.0,15.0")?;
    Ok(path)
}

#[tokio::test]
async fn full_pipeline_run_over_fixture_data() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let input = write_input_csv(temp_dir.path())?;
    let output_dir = temp_dir.path().join("output");

    // Reference table: the restricted full species is assessed as VU, the
    // subspecies is absent (the IUCN does not assess subspecies).
    let reference = vec![
        iucn("mRESTx", "VU"),
        iucn("bROPIx", "LC"),
        iucn("mW000x", "LC"),
    ];

    // Protection store: measured statuses 1..3 for the two surviving tail
    // species; mRESTx has 4 km2 protected of 10, aNARRa has none recorded.
    let db = ProtectionDb::open_in_memory()?;
    db.insert_area("mRESTx", 1, 1.0)?;
    db.insert_area("mRESTx", 2, 1.0)?;
    db.insert_area("mRESTx", 3, 2.0)?;

    let pipeline = Pipeline::new(test_config());
    let summary = pipeline
        .run_with_collaborators(&input, &reference, &db, &output_dir, false)
        .await?;

    assert_eq!(summary.total_species, 43);
    assert_eq!(summary.dropped_zero_range, 0);
    // threshold = sorted[floor(42 * 0.05)] = sorted[2] = 0.02
    assert_eq!(summary.tail_size, 3);
    // inner join: full-species matches only (mRESTx, bROPIx)
    assert_eq!(summary.assessed_full_species, 2);
    assert_eq!(summary.excluded, 1);
    assert_eq!(summary.concern_species, 1);
    assert!(summary.negative_residuals.is_empty());

    // percent table: two species survive, statuses sum to 100
    let percent_path = output_dir.join("SpeciesProtectionPercents.csv");
    assert!(percent_path.exists());
    let mut reader = csv::Reader::from_path(&percent_path)?;
    let mut rows = 0;
    for row in reader.records() {
        let row = row?;
        let pcts: Vec<f64> = (3..7).map(|i| row[i].parse().unwrap()).collect();
        assert!((pcts.iter().sum::<f64>() - 100.0).abs() < 0.01);
        rows += 1;
    }
    assert_eq!(rows, 2);

    // both plots rendered: all-tail view and concern view
    assert!(output_dir.join("ProtectionStatus-AllTail.png").exists());
    assert!(output_dir.join("ProtectionStatus-Concern.png").exists());

    Ok(())
}

#[tokio::test]
async fn empty_input_aborts_with_diagnostic() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let input = temp_dir.path().join("empty.csv");
    let mut f = std::fs::File::create(&input)?;
    writeln!(
        f,
        "SpeciesCode,ScientificName,CommonName,AreaRange_km2,AreaHab_km2"
    )?;
    drop(f);

    let db = ProtectionDb::open_in_memory()?;
    let pipeline = Pipeline::new(test_config());
    let result = pipeline
        .run_with_collaborators(&input, &[], &db, &temp_dir.path().join("out"), false)
        .await;
    assert!(result.is_err());
    Ok(())
}
