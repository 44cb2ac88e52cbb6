pub mod enrich;
pub mod exclusions;
pub mod percent;
pub mod protection;
pub mod report;
pub mod tail;

use crate::config::Config;
use crate::constants::{COMBINED_PLOT_PNG, CONCERN_PLOT_PNG, PERCENT_CSV};
use crate::error::{PipelineError, Result};
use crate::plots;
use crate::sources::natureserve::NatureServeClient;
use crate::sources::protection_db::ProtectionDb;
use crate::sources::range_habitat;
use crate::sources::sciencebase::ScienceBaseClient;
use crate::types::{IucnRecord, SpeciesPercentRow};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Result of a complete pipeline run.
#[derive(Debug)]
pub struct RunSummary {
    pub total_species: usize,
    pub dropped_zero_range: usize,
    pub tail_size: usize,
    /// Tail records that matched the reference table exactly (full species
    /// only); a sanity figure, not used downstream.
    pub assessed_full_species: usize,
    pub excluded: usize,
    pub concern_species: usize,
    pub negative_residuals: Vec<String>,
    pub lookup_failures: usize,
    pub outputs: Vec<String>,
    pub elapsed_secs: f64,
}

pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Full run against the live collaborators: fetches the reference table
    /// from ScienceBase and opens the protection store at `db_path`.
    pub async fn run(
        &self,
        input: &Path,
        db_path: &Path,
        output_dir: &Path,
        with_natureserve: bool,
    ) -> Result<RunSummary> {
        let reference = ScienceBaseClient::new(self.config.sciencebase.clone())
            .fetch_iucn_table()
            .await?;
        let db = ProtectionDb::open(db_path)?;
        self.run_with_collaborators(input, &reference, &db, output_dir, with_natureserve)
            .await
    }

    /// The pipeline proper, with the external collaborators injected.
    #[instrument(skip(self, reference, db))]
    pub async fn run_with_collaborators(
        &self,
        input: &Path,
        reference: &[IucnRecord],
        db: &ProtectionDb,
        output_dir: &Path,
        with_natureserve: bool,
    ) -> Result<RunSummary> {
        let started = std::time::Instant::now();
        let started_at = chrono::Utc::now();
        info!(run_date = %started_at.format("%Y-%m-%d"), "starting pipeline run");
        std::fs::create_dir_all(output_dir)?;
        let mut outputs = Vec::new();

        // Stage 1: load the range-vs-habitat table
        info!("loading range-vs-habitat table");
        let table = range_habitat::load(input)?;
        if table.records.is_empty() {
            return Err(PipelineError::Config(
                "input table has no usable species records".to_string(),
            ));
        }

        // Stage 2: proportion metric and percentile tail
        let proportions = tail::derive_proportions(&table.records);
        let tail_subset = tail::select_tail(&proportions, self.config.tail.percentile);

        // Stage 3: conservation-status enrichment. The inner join is a
        // full-species sanity subset; the left join is authoritative.
        let assessed = enrich::inner_join_species(&tail_subset, reference);
        let joined = enrich::left_join_all(&tail_subset, reference);

        // Stage 4: manual exclusions
        let mut kept = exclusions::apply_denylist(&joined, &self.config.exclusions.species_codes);
        let excluded = joined.len() - kept.len();

        // Optional NatureServe rank pass, best effort per species
        let lookup_report = if with_natureserve {
            match NatureServeClient::new(self.config.natureserve.clone()) {
                Ok(client) => Some(client.enrich_all(&mut kept).await),
                Err(e) => {
                    warn!("skipping NatureServe enrichment: {e}");
                    None
                }
            }
        } else {
            None
        };

        let concern = enrich::of_concern(&kept, &self.config.concern);

        // Stage 5: protection status areas and the status-4 residual
        let codes: Vec<String> = kept.iter().map(|r| r.species_code().to_string()).collect();
        let measured = db.status_areas(&codes)?;
        let status_table = protection::complete_status_table(&kept, &measured);

        // Stage 6: percent pivot with names reattached
        let percent_rows = percent::percent_pivot(&status_table.records, &kept);
        let concern_codes: HashSet<&str> = concern.iter().map(|r| r.species_code()).collect();
        let concern_rows: Vec<SpeciesPercentRow> = percent_rows
            .iter()
            .filter(|r| concern_codes.contains(r.species_code.as_str()))
            .cloned()
            .collect();

        // Stage 7: reporting views and artifacts
        let combined_view = report::melt_combined(&percent_rows);
        let concern_view = report::melt_uncombined(&concern_rows);

        let percent_path = output_dir.join(PERCENT_CSV);
        report::write_csv(&percent_path, &percent_rows)?;
        outputs.push(percent_path.display().to_string());

        let combined_plot = output_dir.join(COMBINED_PLOT_PNG);
        plots::render_boxplot(
            &combined_plot,
            "Protection status, habitat-restricted species",
            &combined_view,
        )?;
        outputs.push(combined_plot.display().to_string());

        if concern_view.is_empty() {
            warn!("no conservation-concern species in tail subset, skipping concern plot");
        } else {
            let concern_plot = output_dir.join(CONCERN_PLOT_PNG);
            plots::render_boxplot(
                &concern_plot,
                "Protection status, conservation-concern species",
                &concern_view,
            )?;
            outputs.push(concern_plot.display().to_string());
        }

        if let Some(ref lookup) = lookup_report {
            report::write_lookup_error_log(output_dir, lookup)?;
        }

        let elapsed_secs = started.elapsed().as_secs_f64();
        info!(elapsed_secs, "pipeline run finished");

        Ok(RunSummary {
            total_species: table.records.len(),
            dropped_zero_range: table.dropped_zero_range,
            tail_size: tail_subset.len(),
            assessed_full_species: assessed.len(),
            excluded,
            concern_species: concern.len(),
            negative_residuals: status_table.negative_residuals,
            lookup_failures: lookup_report.map(|r| r.failures.len()).unwrap_or(0),
            outputs,
            elapsed_secs,
        })
    }
}
