use serde::{Deserialize, Serialize};

/// One row of the range-vs-habitat input table.
///
/// Species codes follow the GAP convention `<class prefix><4 letters>[x]`;
/// a trailing `x` marks a full species, anything else a subspecies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesRecord {
    #[serde(rename = "SpeciesCode")]
    pub species_code: String,
    #[serde(rename = "ScientificName")]
    pub scientific_name: String,
    #[serde(rename = "CommonName")]
    pub common_name: String,
    #[serde(rename = "AreaRange_km2")]
    pub area_range_km2: f64,
    #[serde(rename = "AreaHab_km2")]
    pub area_hab_km2: f64,
    /// Number of 12-digit HUCs intersected by the range, when the input
    /// carries it.
    #[serde(rename = "nHUCS", default)]
    pub n_hucs: Option<f64>,
}

impl SpeciesRecord {
    pub fn is_full_species(&self) -> bool {
        self.species_code.ends_with('x')
    }
}

/// A species record with its derived habitat-in-range proportion, after
/// tail selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailRecord {
    pub species_code: String,
    pub scientific_name: String,
    pub common_name: String,
    pub area_range_km2: f64,
    pub area_hab_km2: f64,
    pub prop_hab_of_range: f64,
}

impl TailRecord {
    pub fn is_full_species(&self) -> bool {
        self.species_code.ends_with('x')
    }
}

/// One row of the GAP/IUCN reference table hosted on ScienceBase. Missing
/// values are normalized to empty strings at load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IucnRecord {
    #[serde(rename = "gapSppCode")]
    pub gap_spp_code: String,
    #[serde(rename = "scientificName", default)]
    pub scientific_name: String,
    #[serde(rename = "commonName", default)]
    pub common_name: String,
    #[serde(rename = "iucnCategory", default)]
    pub iucn_category: String,
    /// NatureServe element id used for the optional rank lookup.
    #[serde(rename = "elementGlobalId", default)]
    pub element_global_id: String,
}

/// Global/national status ranks returned by the NatureServe service.
/// Fields absent from the response default to empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NatureServeRanks {
    pub global_rank: String,
    pub rounded_global_rank: String,
    pub national_rank: String,
}

/// A tail record joined against the conservation-status reference tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub tail: TailRecord,
    pub iucn: Option<IucnRecord>,
    pub natureserve: Option<NatureServeRanks>,
}

impl EnrichedRecord {
    pub fn species_code(&self) -> &str {
        &self.tail.species_code
    }

    pub fn iucn_category(&self) -> &str {
        self.iucn.as_ref().map(|i| i.iucn_category.as_str()).unwrap_or("")
    }
}

/// Area swept by one GAP stewardship status for one species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusAreaRecord {
    pub species_code: String,
    pub gap_status: u8,
    pub area_km2: f64,
}

/// One row per species of the percent pivot: protection percentages by
/// status, plus the combined Status 1&2 column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesPercentRow {
    #[serde(rename = "SpeciesCode")]
    pub species_code: String,
    #[serde(rename = "ScientificName")]
    pub scientific_name: String,
    #[serde(rename = "CommonName")]
    pub common_name: String,
    #[serde(rename = "PctStatus1")]
    pub pct_status1: f64,
    #[serde(rename = "PctStatus2")]
    pub pct_status2: f64,
    #[serde(rename = "PctStatus3")]
    pub pct_status3: f64,
    #[serde(rename = "PctStatus4")]
    pub pct_status4: f64,
    #[serde(rename = "PctStatus1_2")]
    pub pct_status12: f64,
}

/// One (species, category, percent) triple of a long-format reporting view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeltedRow {
    #[serde(rename = "SpeciesCode")]
    pub species_code: String,
    #[serde(rename = "CommonName")]
    pub common_name: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Percent")]
    pub percent: f64,
}

/// One row of the range-vs-habitat summary export.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "SpeciesCode")]
    pub species_code: String,
    #[serde(rename = "ScientificName")]
    pub scientific_name: String,
    #[serde(rename = "CommonName")]
    pub common_name: String,
    #[serde(rename = "AreaRange_km2")]
    pub area_range_km2: f64,
    #[serde(rename = "nHUCS")]
    pub n_hucs: Option<f64>,
    #[serde(rename = "Prop_CONUS")]
    pub prop_conus: f64,
    #[serde(rename = "AreaHab_km2")]
    pub area_hab_km2: f64,
    #[serde(rename = "PropHab_CONUS")]
    pub prop_hab_conus: f64,
    #[serde(rename = "LogAreaRange")]
    pub log_area_range: f64,
    #[serde(rename = "LogAreaHabitat")]
    pub log_area_habitat: f64,
}
