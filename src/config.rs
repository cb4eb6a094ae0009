/// Engine tuning configuration loader - parses qcgen.toml
///
/// Separates the suggestion engine's statistical coefficients from code,
/// making it easy to adjust safety margins, window lengths, or minimum
/// data requirements without recompiling.

use serde::Deserialize;
use std::fs;

use crate::model::FEET_TO_METERS;

/// Tuning parameters for the threshold suggestion engine.
///
/// Defaults follow the Gulf of Maine guidance the tool was originally
/// calibrated against; `qcgen.toml` can override any of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SuggestConfig {
    /// Minimum series span, in days, before suggestions are attempted.
    pub min_span_days: i64,
    /// Minimum fraction of expected samples (given the inferred sampling
    /// interval) that must be present.
    pub min_coverage: f64,

    // Gross range padding, meters beyond the observed extremes.
    pub gross_suspect_pad_low: f64,
    pub gross_suspect_pad_high: f64,
    pub gross_fail_pad: f64,

    /// Rate-of-change threshold as a multiple of the first-difference
    /// rate standard deviation.
    pub roc_sigma: f64,
    /// Floor for the rate-of-change threshold, meters per second.
    pub roc_floor: f64,

    /// Flat-line tolerance as a multiple of the value standard deviation.
    pub flat_tolerance_sigma: f64,
    /// Floor for the flat-line tolerance, meters.
    pub flat_tolerance_floor: f64,
    /// Flat-line suspect window, seconds.
    pub flat_suspect_seconds: u32,
    /// Flat-line fail window, seconds.
    pub flat_fail_seconds: u32,

    /// Minimum observations per calendar month before that month gets a
    /// climatology span.
    pub climatology_min_samples: usize,
    /// Padding beyond the monthly percentile bounds, meters.
    pub climatology_pad: f64,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        SuggestConfig {
            min_span_days: 30,
            min_coverage: 0.5,
            // 4.5 ft below / 6 ft above the observed extremes for suspect,
            // 10 ft both ways for fail (conservative first-deployment rule).
            gross_suspect_pad_low: 4.5 * FEET_TO_METERS,
            gross_suspect_pad_high: 6.0 * FEET_TO_METERS,
            gross_fail_pad: 10.0 * FEET_TO_METERS,
            roc_sigma: 3.0,
            // 0.75 ft per 6 minutes: max observed tidal rate in the region
            // plus allowance for sustained wind-driven rise.
            roc_floor: 0.75 * FEET_TO_METERS / 360.0,
            flat_tolerance_sigma: 0.05,
            flat_tolerance_floor: 0.1 * FEET_TO_METERS,
            flat_suspect_seconds: 2 * 60 * 60,
            flat_fail_seconds: 3 * 60 * 60,
            climatology_min_samples: 100,
            climatology_pad: 1.0 * FEET_TO_METERS,
        }
    }
}

impl SuggestConfig {
    /// Parses a TOML string. Fields not present fall back to defaults.
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

/// Loads engine tuning from qcgen.toml in the working directory.
///
/// # Panics
/// Panics if the file exists but is malformed. A missing file falls back
/// to defaults — the defaults are a complete, usable configuration.
pub fn load_config() -> SuggestConfig {
    let config_path = "qcgen.toml";

    match fs::read_to_string(config_path) {
        Ok(contents) => SuggestConfig::from_toml(&contents)
            .unwrap_or_else(|e| panic!("Failed to parse {}: {}", config_path, e)),
        Err(_) => SuggestConfig::default(),
    }
}
