/// Threshold suggestion engine.
///
/// Derives a starting `ThresholdSet` for a site from its historical
/// observation statistics. The output is a starting point for human
/// review, not a final configuration — operators adjust the suggested
/// spans against local knowledge before export.
///
/// # Derivations
///
/// 1. **Gross range** — observed min/max padded by configurable margins
///    (suspect) and a wider conservative margin (fail). Wide enough to
///    avoid rejecting valid extreme tides.
/// 2. **Rate of change** — a multiple of the standard deviation of
///    first-difference rates, floored at the regional tidal maximum so a
///    calm training window cannot produce a threshold that flags normal
///    spring tides.
/// 3. **Spike** — rate threshold scaled to one sampling interval; fail at
///    twice suspect.
/// 4. **Flat line** — tolerance from the value variance with a sensor-noise
///    floor; windows from configuration (suspect 2 h, fail 3 h).
/// 5. **Climatology** — monthly percentile spans, only for months observed
///    across multiple years; omitted entirely otherwise.
///
/// The engine is a pure function of its inputs: no I/O, no clock, no
/// randomness. Identical input series yield identical output, which the
/// emitters preserve through to byte-identical files.

pub mod stats;

use chrono::Datelike;
use std::collections::BTreeMap;

use crate::config::SuggestConfig;
use crate::model::{
    Climatology, FlatLine, GrossRange, MonthlySpan, ObservationSeries, RateOfChange, Span,
    Spike, SuggestError, ThresholdSet,
};

/// Produces a suggested `ThresholdSet` from an observation series.
///
/// # Errors
/// - `SuggestError::InsufficientData` — series empty, shorter than the
///   configured minimum span, or too sparse at its inferred cadence.
/// - `SuggestError::DegenerateStatistics` — zero variance or any computed
///   bound that is non-finite or mis-ordered. No partial set is returned.
pub fn suggest_thresholds(
    series: &ObservationSeries,
    config: &SuggestConfig,
) -> Result<ThresholdSet, SuggestError> {
    let observations = series.observations();

    if observations.is_empty() {
        return Err(SuggestError::InsufficientData("empty series".to_string()));
    }

    let span_days = series.span().num_days();
    if span_days < config.min_span_days {
        return Err(SuggestError::InsufficientData(format!(
            "series spans {} days, need at least {}",
            span_days, config.min_span_days
        )));
    }

    let interval = stats::sampling_interval_seconds(observations).ok_or_else(|| {
        SuggestError::InsufficientData("cannot infer sampling interval".to_string())
    })?;
    if interval <= 0.0 {
        return Err(SuggestError::DegenerateStatistics(
            "non-positive sampling interval".to_string(),
        ));
    }

    // Sparseness check: count actual samples against what the inferred
    // cadence predicts for the covered span.
    let expected = series.span().num_seconds() as f64 / interval;
    let coverage = observations.len() as f64 / expected.max(1.0);
    if coverage < config.min_coverage {
        return Err(SuggestError::InsufficientData(format!(
            "series coverage {:.0}% below required {:.0}%",
            coverage * 100.0,
            config.min_coverage * 100.0
        )));
    }

    let values = stats::value_stats(observations)
        .ok_or_else(|| SuggestError::InsufficientData("empty series".to_string()))?;

    if values.std_dev == 0.0 {
        return Err(SuggestError::DegenerateStatistics(
            "zero variance: constant series cannot support rate or flat-line thresholds"
                .to_string(),
        ));
    }

    let gross_range = derive_gross_range(&values, config);
    let rate_of_change = derive_rate_of_change(observations, config)?;
    let spike = derive_spike(rate_of_change.threshold, interval);
    let flat_line = derive_flat_line(&values, config);
    let climatology = derive_climatology(series, config);

    let set = ThresholdSet {
        gross_range,
        rate_of_change,
        spike,
        flat_line,
        climatology,
    };

    if !set.is_internally_consistent() {
        return Err(SuggestError::DegenerateStatistics(
            "derived thresholds failed consistency validation".to_string(),
        ));
    }

    Ok(set)
}

fn derive_gross_range(values: &stats::ValueStats, config: &SuggestConfig) -> GrossRange {
    GrossRange {
        suspect_span: Span {
            lower: values.min - config.gross_suspect_pad_low,
            upper: values.max + config.gross_suspect_pad_high,
        },
        fail_span: Span {
            lower: values.min - config.gross_fail_pad,
            upper: values.max + config.gross_fail_pad,
        },
    }
}

fn derive_rate_of_change(
    observations: &[crate::model::Observation],
    config: &SuggestConfig,
) -> Result<RateOfChange, SuggestError> {
    let rates = stats::first_difference_rates(observations);
    let rate_sd = stats::std_dev(&rates).ok_or_else(|| {
        SuggestError::InsufficientData("too few observations for rate statistics".to_string())
    })?;

    if !rate_sd.is_finite() {
        return Err(SuggestError::DegenerateStatistics(
            "non-finite rate standard deviation".to_string(),
        ));
    }
    if rate_sd == 0.0 {
        return Err(SuggestError::DegenerateStatistics(
            "zero rate variance: cannot derive a rate-of-change threshold".to_string(),
        ));
    }

    let threshold = (config.roc_sigma * rate_sd).max(config.roc_floor);
    Ok(RateOfChange { threshold })
}

fn derive_spike(roc_threshold: f64, interval_seconds: f64) -> Spike {
    // A spike is a single-sample excursion: the rate bound over one
    // sampling interval gives the suspect magnitude.
    let suspect = roc_threshold * interval_seconds;
    Spike {
        suspect_threshold: suspect,
        fail_threshold: 2.0 * suspect,
    }
}

fn derive_flat_line(values: &stats::ValueStats, config: &SuggestConfig) -> FlatLine {
    let tolerance = (config.flat_tolerance_sigma * values.std_dev).max(config.flat_tolerance_floor);
    FlatLine {
        tolerance,
        suspect_threshold: config.flat_suspect_seconds,
        fail_threshold: config.flat_fail_seconds,
    }
}

/// Monthly percentile spans, only for months with multi-year coverage.
///
/// A month qualifies when it has observations from at least two distinct
/// calendar years and at least `climatology_min_samples` samples. Returns
/// `None` when no month qualifies — the climatology test is omitted rather
/// than emitted with placeholder bounds.
fn derive_climatology(series: &ObservationSeries, config: &SuggestConfig) -> Option<Climatology> {
    let mut by_month: BTreeMap<u32, (Vec<f64>, std::collections::BTreeSet<i32>)> = BTreeMap::new();

    for obs in series.observations() {
        let entry = by_month.entry(obs.time.month()).or_default();
        entry.0.push(obs.value);
        entry.1.insert(obs.time.year());
    }

    let mut months = Vec::new();
    for (month, (values, years)) in by_month {
        if years.len() < 2 || values.len() < config.climatology_min_samples {
            continue;
        }
        let p01 = stats::percentile(&values, 1.0)?;
        let p99 = stats::percentile(&values, 99.0)?;
        months.push(MonthlySpan {
            month,
            suspect_span: Span {
                lower: p01 - config.climatology_pad,
                upper: p99 + config.climatology_pad,
            },
        });
    }

    if months.is_empty() {
        None
    } else {
        Some(Climatology { months })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
