/// Regional default registry for QARTOD test configuration.
///
/// Defines per-region guidance for tide-gauge QC thresholds, developed in
/// coordination with regional tidal experts. This is the single source of
/// truth for datum-based defaults — when a station has computed tidal
/// datums, these override the purely statistical gross-range suggestion.
///
/// Sources:
///   - Gulf of Maine guidance: Hannah Baranes, GMRI 2024
///   - QARTOD manual: NOAA/IOOS Water Level QC

use crate::model::{GrossRange, SiteMetadata, Span, ThresholdSet, FEET_TO_METERS};

/// Regional guidance for one coastal region.
pub struct Region {
    pub name: &'static str,
    pub attribution: &'static str,
    /// Gross range suspect pad above MHHW, feet.
    pub suspect_above_mhhw_ft: f64,
    /// Gross range suspect pad below MLLW, feet.
    pub suspect_below_mllw_ft: f64,
    /// Conservative pad for stations without tidal datums, feet.
    pub no_datum_pad_ft: f64,
    /// Regional rate-of-change guidance, feet per 6 minutes.
    pub rate_per_six_min_ft: f64,
}

/// All regions with published threshold guidance. Gulf of Maine first;
/// additional regions get an entry here as guidance is developed.
pub static REGION_REGISTRY: &[Region] = &[Region {
    name: "Gulf of Maine",
    attribution: "Hannah Baranes, GMRI 2024",
    // Top recorded water level in the region is 5.07 ft MHHW (Eastport,
    // 2020); 6 ft of headroom clears it without admitting sensor jumps.
    suspect_above_mhhw_ft: 6.0,
    // Lowest observed is -3.46 ft MLLW at Eastport.
    suspect_below_mllw_ft: 4.5,
    // First-week deployments without datums: HW + 10 ft / LW - 10 ft.
    no_datum_pad_ft: 10.0,
    // Max tidal rate at Eastport is ~0.5 ft per 6 min at midtide; 0.25 ft
    // added for sustained wind-driven rise.
    rate_per_six_min_ft: 0.75,
}];

/// Looks up a region by name. Returns `None` if no guidance exists.
pub fn find_region(name: &str) -> Option<&'static Region> {
    REGION_REGISTRY.iter().find(|r| r.name == name)
}

impl Region {
    /// Datum-based gross range for a station with computed tidal datums:
    /// suspect upper = MHHW + regional pad, suspect lower = MLLW - regional
    /// pad, fail spans widened by the no-datum pad. Returns `None` when the
    /// site is missing either datum.
    pub fn datum_gross_range(&self, site: &SiteMetadata) -> Option<GrossRange> {
        let mllw = site.mllw?;
        let mhhw = site.mhhw?;

        let suspect = Span {
            lower: mllw - self.suspect_below_mllw_ft * FEET_TO_METERS,
            upper: mhhw + self.suspect_above_mhhw_ft * FEET_TO_METERS,
        };
        let fail = Span {
            lower: mllw - self.no_datum_pad_ft * FEET_TO_METERS,
            upper: mhhw + self.no_datum_pad_ft * FEET_TO_METERS,
        };
        Some(GrossRange {
            suspect_span: suspect,
            fail_span: fail,
        })
    }

    /// Regional rate-of-change guidance in meters per second.
    pub fn rate_threshold_mps(&self) -> f64 {
        self.rate_per_six_min_ft * FEET_TO_METERS / 360.0
    }

    /// Overlays datum-based guidance onto an engine suggestion: the gross
    /// range comes from the tidal datums when available, and the rate
    /// threshold is raised to the regional floor if the statistical value
    /// came in below it. Everything else is left as suggested.
    pub fn apply_to(&self, set: &ThresholdSet, site: &SiteMetadata) -> ThresholdSet {
        let mut adjusted = set.clone();
        if let Some(gross) = self.datum_gross_range(site) {
            adjusted.gross_range = gross;
        }
        adjusted.rate_of_change.threshold =
            adjusted.rate_of_change.threshold.max(self.rate_threshold_mps());
        adjusted
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
