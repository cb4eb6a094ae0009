/// Core data types for the QARTOD configuration generator.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O and no external collaborators — only types, their
/// invariant checks, and the error enums the rest of the crate returns.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Unit conversions and QARTOD vocabulary
// ---------------------------------------------------------------------------

/// Hohonu reports water levels in feet; everything downstream works in meters.
pub const FEET_TO_METERS: f64 = 0.3048;

/// The fixed QARTOD test vocabulary. Emitters and the preview runner key
/// their output by these names; nothing else may invent a test name.
pub const TEST_GROSS_RANGE: &str = "gross_range_test";
pub const TEST_RATE_OF_CHANGE: &str = "rate_of_change_test";
pub const TEST_SPIKE: &str = "spike_test";
pub const TEST_FLAT_LINE: &str = "flat_line_test";
pub const TEST_CLIMATOLOGY: &str = "climatology_test";

// ---------------------------------------------------------------------------
// Observation types
// ---------------------------------------------------------------------------

/// A single water-level measurement from a tide gauge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub time: DateTime<Utc>,
    /// Water level in meters relative to the series datum.
    pub value: f64,
}

/// An ordered water-level time series for one site.
///
/// Invariant: timestamps are strictly increasing with no duplicates. The
/// constructor enforces this, so any `ObservationSeries` handed to the
/// suggestion engine is already well-ordered.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSeries {
    /// Measurement unit after ingest conversion, e.g. "meters".
    pub unit: String,
    /// Vertical datum the values are referenced to, e.g. "NAVD88".
    pub datum: String,
    observations: Vec<Observation>,
}

impl ObservationSeries {
    /// Builds a series, validating the timestamp ordering invariant.
    pub fn new(
        unit: impl Into<String>,
        datum: impl Into<String>,
        observations: Vec<Observation>,
    ) -> Result<Self, SeriesError> {
        for pair in observations.windows(2) {
            if pair[1].time <= pair[0].time {
                return Err(SeriesError::OutOfOrder {
                    first: pair[0].time,
                    second: pair[1].time,
                });
            }
        }
        if let Some(bad) = observations.iter().find(|o| !o.value.is_finite()) {
            return Err(SeriesError::NonFiniteValue { time: bad.time });
        }
        Ok(ObservationSeries {
            unit: unit.into(),
            datum: datum.into(),
            observations,
        })
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Time span covered by the series. Zero for series shorter than two points.
    pub fn span(&self) -> chrono::Duration {
        match (self.observations.first(), self.observations.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => chrono::Duration::zero(),
        }
    }
}

// ---------------------------------------------------------------------------
// Site metadata
// ---------------------------------------------------------------------------

/// Gauge station metadata, trimmed to the fields the generator needs.
///
/// Datum offsets are meters from NAVD88 and are optional — newly installed
/// stations frequently have no computed tidal datums yet, in which case the
/// regional fallback guidance in `regions` applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteMetadata {
    pub station_id: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Sensor NAVD88 elevation in meters.
    pub navd88: f64,
    /// Mean lower low water, meters from NAVD88.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mllw: Option<f64>,
    /// Mean higher high water, meters from NAVD88.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mhhw: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_date: Option<NaiveDate>,
    /// Whether the site is tidally influenced.
    pub tidal: bool,
    pub status: String,
}

impl SiteMetadata {
    /// True when both tidal datums needed for datum-based gross range
    /// defaults are present.
    pub fn has_tidal_datums(&self) -> bool {
        self.mllw.is_some() && self.mhhw.is_some()
    }
}

// ---------------------------------------------------------------------------
// Threshold types
// ---------------------------------------------------------------------------

/// An inclusive [lower, upper] value span in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub lower: f64,
    pub upper: f64,
}

impl Span {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    pub fn is_valid(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite() && self.lower < self.upper
    }
}

/// Gross range test parameters. The fail span must enclose the suspect span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrossRange {
    pub suspect_span: Span,
    pub fail_span: Span,
}

/// Rate of change test parameter: maximum plausible rate in meters per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateOfChange {
    pub threshold: f64,
}

/// Spike test parameters: magnitudes in meters checked against a measurement
/// and its two neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spike {
    pub suspect_threshold: f64,
    pub fail_threshold: f64,
}

/// Flat line test parameters. `tolerance` is in meters; the windows are in
/// seconds, with the suspect window strictly shorter than the fail window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatLine {
    pub tolerance: f64,
    pub suspect_threshold: u32,
    pub fail_threshold: u32,
}

/// Seasonal suspect span for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlySpan {
    /// Calendar month, 1–12.
    pub month: u32,
    pub suspect_span: Span,
}

/// Climatology test parameters: one span per qualifying month, sorted by
/// month number so serialization is stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Climatology {
    pub months: Vec<MonthlySpan>,
}

/// The full set of QARTOD test parameters for one site.
///
/// `climatology` is `None` when the historical record is too short to
/// support seasonal bounds — never defaulted to a zero-width span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    pub gross_range: GrossRange,
    pub rate_of_change: RateOfChange,
    pub spike: Spike,
    pub flat_line: FlatLine,
    pub climatology: Option<Climatology>,
}

impl ThresholdSet {
    /// Checks the internal-consistency guarantees the engine promises:
    /// ordered spans, finite values, positive rate threshold, suspect
    /// window below fail window.
    pub fn is_internally_consistent(&self) -> bool {
        let gr = &self.gross_range;
        let spans_ok = gr.suspect_span.is_valid()
            && gr.fail_span.is_valid()
            && gr.fail_span.lower <= gr.suspect_span.lower
            && gr.fail_span.upper >= gr.suspect_span.upper;

        let roc_ok = self.rate_of_change.threshold.is_finite() && self.rate_of_change.threshold > 0.0;

        let spike_ok = self.spike.suspect_threshold.is_finite()
            && self.spike.fail_threshold.is_finite()
            && self.spike.suspect_threshold > 0.0
            && self.spike.suspect_threshold <= self.spike.fail_threshold;

        let flat_ok = self.flat_line.tolerance.is_finite()
            && self.flat_line.tolerance > 0.0
            && self.flat_line.suspect_threshold < self.flat_line.fail_threshold;

        let clim_ok = match &self.climatology {
            None => true,
            Some(c) => {
                !c.months.is_empty()
                    && c.months.iter().all(|m| (1..=12).contains(&m.month) && m.suspect_span.is_valid())
                    && c.months.windows(2).all(|w| w[0].month < w[1].month)
            }
        };

        spans_ok && roc_ok && spike_ok && flat_ok && clim_ok
    }
}

/// A ThresholdSet plus its site metadata, snapshotted at export time.
/// Immutable once created; both emitters consume it by reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigDocument {
    pub site: SiteMetadata,
    /// Name of the observed variable the tests apply to.
    pub variable: String,
    pub thresholds: ThresholdSet,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors constructing an `ObservationSeries`.
#[derive(Debug, PartialEq)]
pub enum SeriesError {
    /// Timestamps were not strictly increasing.
    OutOfOrder {
        first: DateTime<Utc>,
        second: DateTime<Utc>,
    },
    /// A NaN or infinite measurement value.
    NonFiniteValue { time: DateTime<Utc> },
}

impl std::fmt::Display for SeriesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesError::OutOfOrder { first, second } => {
                write!(f, "timestamps not strictly increasing: {} then {}", first, second)
            }
            SeriesError::NonFiniteValue { time } => {
                write!(f, "non-finite observation value at {}", time)
            }
        }
    }
}

impl std::error::Error for SeriesError {}

/// Errors that can arise when fetching or parsing upstream provider data.
#[derive(Debug, PartialEq)]
pub enum ProviderError {
    /// Non-2xx HTTP response from the provider API.
    HttpError(u16),
    /// Network-level or auth failure reaching the provider; surfaced as-is
    /// to the caller, never retried here.
    Upstream(String),
    /// The response body could not be deserialized.
    ParseError(String),
    /// The response was well-formed but contained no usable observations.
    NoDataAvailable(String),
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::HttpError(code) => write!(f, "HTTP error: {}", code),
            ProviderError::Upstream(msg) => write!(f, "Upstream unavailable: {}", msg),
            ProviderError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ProviderError::NoDataAvailable(msg) => write!(f, "No data available: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Errors from the threshold suggestion engine. The engine never returns a
/// partial `ThresholdSet` — on error the caller gets one of these instead.
#[derive(Debug, PartialEq)]
pub enum SuggestError {
    /// Series too short or too sparse to support stable statistics.
    InsufficientData(String),
    /// Computed bounds were non-finite, zero-width, or otherwise unusable.
    DegenerateStatistics(String),
}

impl std::fmt::Display for SuggestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestError::InsufficientData(msg) => write!(f, "Insufficient data: {}", msg),
            SuggestError::DegenerateStatistics(msg) => {
                write!(f, "Degenerate statistics: {}", msg)
            }
        }
    }
}

impl std::error::Error for SuggestError {}

/// Errors serializing a configuration document.
#[derive(Debug)]
pub enum EmitError {
    /// The threshold set failed its internal-consistency check.
    InvalidThresholds(String),
    /// Serialization failed (format library error).
    Serialization(String),
}

impl std::fmt::Display for EmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmitError::InvalidThresholds(msg) => write!(f, "Invalid thresholds: {}", msg),
            EmitError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for EmitError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// A consistent set with Gulf of Maine-shaped values, shared by tests in
/// other modules.
#[cfg(test)]
pub(crate) fn sample_threshold_set() -> ThresholdSet {
    ThresholdSet {
        gross_range: GrossRange {
            suspect_span: Span { lower: -2.37, upper: 6.33 },
            fail_span: Span { lower: -4.05, upper: 7.55 },
        },
        rate_of_change: RateOfChange { threshold: 0.000635 },
        spike: Spike { suspect_threshold: 0.2286, fail_threshold: 0.4572 },
        flat_line: FlatLine {
            tolerance: 0.03048,
            suspect_threshold: 7200,
            fail_threshold: 10800,
        },
        climatology: None,
    }
}
