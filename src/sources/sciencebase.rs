use crate::config::ScienceBaseConfig;
use crate::error::{PipelineError, Result};
use crate::types::IucnRecord;
use serde_json::Value;
use tracing::{debug, info};

/// Client for the ScienceBase item that hosts the species habitat maps and
/// their GAP/IUCN reference CSV.
pub struct ScienceBaseClient {
    client: reqwest::Client,
    config: ScienceBaseConfig,
}

impl ScienceBaseClient {
    pub fn new(config: ScienceBaseConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Fetches the GAP/IUCN reference table.
    ///
    /// Looks the configured item up, scans its file list for the configured
    /// attachment name, downloads it, and parses it with missing values
    /// normalized to empty strings. IUCN fields are blank for species the
    /// IUCN has not assessed, so blanks are expected and not an error.
    pub async fn fetch_iucn_table(&self) -> Result<Vec<IucnRecord>> {
        let item_url = format!(
            "{}/{}?format=json",
            self.config.base_url.trim_end_matches('/'),
            self.config.item_id
        );
        info!(url = %item_url, "fetching ScienceBase item");

        let item: Value = self
            .client
            .get(&item_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let files = item
            .get("files")
            .and_then(|f| f.as_array())
            .ok_or_else(|| PipelineError::MissingField("files".to_string()))?;

        let file_url = files
            .iter()
            .find(|f| f.get("name").and_then(Value::as_str) == Some(self.config.file_name.as_str()))
            .and_then(|f| f.get("url"))
            .and_then(Value::as_str)
            .ok_or_else(|| PipelineError::Service {
                message: format!(
                    "item {} has no attachment named {}",
                    self.config.item_id, self.config.file_name
                ),
            })?;

        debug!(url = %file_url, "downloading reference CSV");
        let body = self
            .client
            .get(file_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let records = parse_iucn_csv(&body)?;
        info!(rows = records.len(), "loaded GAP/IUCN reference table");
        Ok(records)
    }
}

/// Parses the reference CSV, substituting blanks for the placeholder tokens
/// pandas would have written for missing values.
pub fn parse_iucn_csv(body: &str) -> Result<Vec<IucnRecord>> {
    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let mut records = Vec::new();
    for row in reader.deserialize::<IucnRecord>() {
        let mut record = row?;
        normalize_blank(&mut record.scientific_name);
        normalize_blank(&mut record.common_name);
        normalize_blank(&mut record.iucn_category);
        normalize_blank(&mut record.element_global_id);
        records.push(record);
    }
    Ok(records)
}

fn normalize_blank(field: &mut String) {
    let trimmed = field.trim();
    let replacement =
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") || trimmed == "NA" {
            String::new()
        } else if trimmed.len() != field.len() {
            trimmed.to_string()
        } else {
            return;
        };
    *field = replacement;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_blanks() {
        let body = "\
gapSppCode,scientificName,commonName,iucnCategory,elementGlobalId
mABCOx,Abco abco,Abco,VU,102533
mNOASx,Noas noas,Noas,NaN,
mSUBSa,Subs subs alpha,Subs,NA,102534
";
        let rows = parse_iucn_csv(body).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].iucn_category, "VU");
        assert_eq!(rows[1].iucn_category, "");
        assert_eq!(rows[1].element_global_id, "");
        assert_eq!(rows[2].iucn_category, "");
    }
}
