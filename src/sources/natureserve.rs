use crate::config::NatureServeConfig;
use crate::error::{PipelineError, Result};
use crate::types::{EnrichedRecord, NatureServeRanks};
use regex::Regex;
use tracing::{debug, info, warn};

/// Outcome of one per-species rank lookup.
#[derive(Debug, Clone)]
pub enum LookupOutcome {
    Found(NatureServeRanks),
    Failed { reason: String },
}

/// Aggregated record of a lookup pass: how many species were attempted,
/// how many resolved, and the reason for every failure.
#[derive(Debug, Default)]
pub struct LookupReport {
    pub attempted: usize,
    pub found: usize,
    pub failures: Vec<(String, String)>,
}

impl LookupReport {
    fn record(&mut self, species_code: &str, outcome: &LookupOutcome) {
        self.attempted += 1;
        match outcome {
            LookupOutcome::Found(_) => self.found += 1,
            LookupOutcome::Failed { reason } => {
                self.failures.push((species_code.to_string(), reason.clone()));
            }
        }
    }
}

/// Client for the NatureServe comprehensive-species REST service. Responses
/// are XML; the few rank fields we need are pulled out with regexes and
/// default to empty strings when absent.
pub struct NatureServeClient {
    client: reqwest::Client,
    config: NatureServeConfig,
    access_key: String,
    global_rank_re: Regex,
    rounded_rank_re: Regex,
    national_rank_re: Regex,
}

impl NatureServeClient {
    pub fn new(config: NatureServeConfig) -> Result<Self> {
        let access_key = std::env::var(&config.access_key_env).map_err(|_| {
            PipelineError::Config(format!(
                "environment variable {} not set",
                config.access_key_env
            ))
        })?;

        // The rank elements nest a <code> child; regexes are built once and
        // reused across the per-species loop.
        let global_rank_re =
            Regex::new(r"(?s)<globalStatus>.*?<rank>.*?<code>([^<]*)</code>").map_err(re_err)?;
        let rounded_rank_re =
            Regex::new(r"(?s)<roundedRank>.*?<code>([^<]*)</code>").map_err(re_err)?;
        let national_rank_re =
            Regex::new(r"(?s)<nationalStatus[^>]*>.*?<rank>([^<]*)</rank>").map_err(re_err)?;

        Ok(Self {
            client: reqwest::Client::new(),
            config,
            access_key,
            global_rank_re,
            rounded_rank_re,
            national_rank_re,
        })
    }

    /// Looks up status ranks for one species by its NatureServe element id.
    pub async fn lookup(&self, element_global_id: &str) -> LookupOutcome {
        if element_global_id.is_empty() {
            return LookupOutcome::Failed {
                reason: "no NatureServe element id in reference table".to_string(),
            };
        }

        let url = format!(
            "{}?uid=ELEMENT_GLOBAL.2.{}&NSAccessKeyId={}",
            self.config.base_url, element_global_id, self.access_key
        );

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                return LookupOutcome::Failed {
                    reason: format!("request failed: {e}"),
                }
            }
        };
        if !response.status().is_success() {
            return LookupOutcome::Failed {
                reason: format!("service responded with status {}", response.status().as_u16()),
            };
        }
        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                return LookupOutcome::Failed {
                    reason: format!("failed to read response body: {e}"),
                }
            }
        };

        LookupOutcome::Found(self.parse_ranks(&body))
    }

    fn parse_ranks(&self, xml: &str) -> NatureServeRanks {
        NatureServeRanks {
            global_rank: capture_or_empty(&self.global_rank_re, xml),
            rounded_global_rank: capture_or_empty(&self.rounded_rank_re, xml),
            national_rank: capture_or_empty(&self.national_rank_re, xml),
        }
    }

    /// Best-effort rank enrichment over the whole tail subset. A failed
    /// lookup leaves that record's ranks unset and moves on; failures are
    /// collected into the returned report.
    pub async fn enrich_all(&self, records: &mut [EnrichedRecord]) -> LookupReport {
        let mut report = LookupReport::default();
        for record in records.iter_mut() {
            let element_id = record
                .iucn
                .as_ref()
                .map(|i| i.element_global_id.clone())
                .unwrap_or_default();
            let species_code = record.tail.species_code.clone();

            let outcome = self.lookup(&element_id).await;
            report.record(&species_code, &outcome);
            match outcome {
                LookupOutcome::Found(ranks) => {
                    debug!(species = %species_code, rank = %ranks.global_rank, "rank lookup ok");
                    record.natureserve = Some(ranks);
                }
                LookupOutcome::Failed { reason } => {
                    warn!(species = %species_code, %reason, "rank lookup failed, continuing");
                }
            }
        }
        info!(
            attempted = report.attempted,
            found = report.found,
            failed = report.failures.len(),
            "NatureServe enrichment pass finished"
        );
        report
    }
}

fn capture_or_empty(re: &Regex, text: &str) -> String {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

fn re_err(e: regex::Error) -> PipelineError {
    PipelineError::Config(format!("invalid rank pattern: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for_tests() -> NatureServeClient {
        std::env::set_var("NS_TEST_KEY", "dummy");
        NatureServeClient::new(NatureServeConfig {
            enabled: true,
            base_url: "http://localhost/comprehensive".to_string(),
            access_key_env: "NS_TEST_KEY".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn parses_ranks_from_xml() {
        let client = client_for_tests();
        let xml = r#"
            <globalSpecies>
              <globalStatus>
                <rank><code>G2G3</code></rank>
                <roundedRank><code>G2</code></roundedRank>
              </globalStatus>
              <nationalStatuses>
                <nationalStatus nationCode="US"><rank>N2</rank></nationalStatus>
              </nationalStatuses>
            </globalSpecies>"#;
        let ranks = client.parse_ranks(xml);
        assert_eq!(ranks.global_rank, "G2G3");
        assert_eq!(ranks.rounded_global_rank, "G2");
        assert_eq!(ranks.national_rank, "N2");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let client = client_for_tests();
        let ranks = client.parse_ranks("<globalSpecies></globalSpecies>");
        assert_eq!(ranks.global_rank, "");
        assert_eq!(ranks.rounded_global_rank, "");
        assert_eq!(ranks.national_rank, "");
    }
}
