use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

use habitat_pipeline::config::Config;
use habitat_pipeline::constants::SUMMARY_CSV;
use habitat_pipeline::error::Result;
use habitat_pipeline::logging;
use habitat_pipeline::pipeline::{report, Pipeline};
use habitat_pipeline::sources::range_habitat;

#[derive(Parser)]
#[command(name = "habitat-pipeline")]
#[command(about = "Habitat protection status pipeline for range-restricted GAP species")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the pipeline configuration file
    #[arg(long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full habitat protection pipeline
    Run {
        /// Range-vs-habitat CSV input
        #[arg(long)]
        input: PathBuf,
        /// SQLite store of per-species protection status areas
        #[arg(long)]
        db: PathBuf,
        /// Directory for CSV and plot outputs
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,
        /// Also query NatureServe for global/national status ranks
        #[arg(long)]
        natureserve: bool,
    },
    /// Write the range-vs-habitat summary table (CONUS proportions, log areas)
    Summary {
        /// Range-vs-habitat CSV input
        #[arg(long)]
        input: PathBuf,
        /// Directory for the summary CSV
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Run {
            input,
            db,
            output_dir,
            natureserve,
        } => {
            println!("🚀 Running habitat protection pipeline...");
            let with_natureserve = natureserve || config.natureserve.enabled;
            let pipeline = Pipeline::new(config);
            match pipeline.run(&input, &db, &output_dir, with_natureserve).await {
                Ok(summary) => {
                    println!("\n📊 Pipeline results:");
                    println!("   Species loaded: {}", summary.total_species);
                    println!("   Dropped (zero range): {}", summary.dropped_zero_range);
                    println!("   Tail subset: {}", summary.tail_size);
                    println!("   IUCN-assessed full species: {}", summary.assessed_full_species);
                    println!("   Excluded by denylist: {}", summary.excluded);
                    println!("   Conservation concern: {}", summary.concern_species);
                    println!("   Lookup failures: {}", summary.lookup_failures);
                    if !summary.negative_residuals.is_empty() {
                        println!(
                            "\n⚠️  Negative status-4 residuals (data quality): {}",
                            summary.negative_residuals.join(", ")
                        );
                    }
                    println!("\n💾 Outputs:");
                    for output in &summary.outputs {
                        println!("   - {output}");
                    }
                    println!("\n⏱  Processing time: {:.2}s", summary.elapsed_secs);
                }
                Err(e) => {
                    error!("Pipeline failed: {}", e);
                    println!("❌ Pipeline failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Summary { input, output_dir } => {
            println!("📄 Writing range-vs-habitat summary...");
            let table = range_habitat::load(&input)?;
            let rows = report::summary_rows(&table.records);
            std::fs::create_dir_all(&output_dir)?;
            let path = output_dir.join(SUMMARY_CSV);
            report::write_csv(&path, &rows)?;
            println!("💾 Wrote {} rows to {}", rows.len(), path.display());
        }
    }
    Ok(())
}
