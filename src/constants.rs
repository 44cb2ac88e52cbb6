/// Static CONUS reference figures and shared table/file names used across
/// the pipeline stages.

// 12-digit HUC CONUS totals
pub const CONUS_AREA_KM2: f64 = 8_103_534.7;
pub const CONUS_N_HUCS: f64 = 82_717.0;

// CONUS landcover cell counts (excluding 0s; second figure also excludes water)
pub const CONUS_LANDCOVER_CELLS: f64 = 9_000_763_993.0;
pub const CONUS_LANDCOVER_CELLS_NO_WATER: f64 = 8_501_572_144.0;

// GAP stewardship statuses. 1 is the highest protection, 4 is none; status 4
// is never measured upstream, it is derived as a residual.
pub const GAP_STATUS_MIN: u8 = 1;
pub const GAP_STATUS_MAX: u8 = 4;
pub const GAP_STATUS_MEASURED_MAX: u8 = 3;

// Category labels used in the melted reporting views and on plot axes
pub const LABEL_STATUS_1: &str = "Status 1";
pub const LABEL_STATUS_2: &str = "Status 2";
pub const LABEL_STATUS_3: &str = "Status 3";
pub const LABEL_STATUS_4: &str = "Status 4";
pub const LABEL_STATUS_1_2: &str = "Status 1&2";

// Output file names
pub const SUMMARY_CSV: &str = "SpeciesRangevsHabitat.csv";
pub const PERCENT_CSV: &str = "SpeciesProtectionPercents.csv";
pub const COMBINED_PLOT_PNG: &str = "ProtectionStatus-AllTail.png";
pub const CONCERN_PLOT_PNG: &str = "ProtectionStatus-Concern.png";
pub const LOOKUP_ERROR_LOG: &str = "Species-Data-Access-Error-Log.txt";

/// Labels for the combined (three category) reporting view, in plot order.
pub fn combined_labels() -> [&'static str; 3] {
    [LABEL_STATUS_1_2, LABEL_STATUS_3, LABEL_STATUS_4]
}

/// Labels for the uncombined (four category) reporting view, in plot order.
pub fn uncombined_labels() -> [&'static str; 4] {
    [LABEL_STATUS_1, LABEL_STATUS_2, LABEL_STATUS_3, LABEL_STATUS_4]
}
