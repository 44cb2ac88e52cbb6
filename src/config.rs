use crate::error::{PipelineError, Result};
use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub tail: TailConfig,
    pub exclusions: ExclusionConfig,
    pub concern: ConcernConfig,
    pub sciencebase: ScienceBaseConfig,
    #[serde(default)]
    pub natureserve: NatureServeConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TailConfig {
    /// Percentile of the habitat/range proportion below which a species is
    /// considered habitat-restricted. The original analysis uses 5.0.
    pub percentile: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExclusionConfig {
    /// Species codes removed after enrichment: non-native species and
    /// records with corrupted upstream source files.
    pub species_codes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConcernConfig {
    /// IUCN categories that mark a species as of conservation concern.
    pub iucn_categories: Vec<String>,
    /// NatureServe global ranks that mark a species as of concern in the
    /// extended variant.
    pub natureserve_global_ranks: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScienceBaseConfig {
    pub base_url: String,
    /// ScienceBase item holding the species habitat maps.
    pub item_id: String,
    /// Name of the CSV attachment with GAP/IUCN species info.
    pub file_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NatureServeConfig {
    pub enabled: bool,
    pub base_url: String,
    /// Environment variable holding the NatureServe access key.
    pub access_key_env: String,
}

impl Default for NatureServeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://services.natureserve.org/idd/rest/ns/v1.1/globalSpecies/comprehensive"
                .to_string(),
            access_key_env: "NATURESERVE_ACCESS_KEY".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let config_content = fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("Failed to read config file '{}': {}", path, e)))?;

        let config: Config = toml::from_str(&config_content)?;
        if !(0.0..=100.0).contains(&config.tail.percentile) {
            return Err(PipelineError::Config(format!(
                "tail.percentile must be within 0..=100, got {}",
                config.tail.percentile
            )));
        }
        Ok(config)
    }
}
