/// QC preview: applies a `ThresholdSet` to an observation series.
///
/// Lets an operator see what a candidate configuration would flag before
/// exporting it, and gives the test suite a direct way to assert threshold
/// behavior (e.g. "a 3-hour stall is caught by a 2-hour flat-line window").
///
/// Flags follow the QARTOD convention: 1 pass, 2 not evaluated, 3 suspect,
/// 4 fail. The rollup takes the worst flag per observation, with
/// not-evaluated ranking below pass.

use crate::model::{FlatLine, GrossRange, ObservationSeries, RateOfChange, Spike, ThresholdSet};
use chrono::Datelike;

/// QARTOD observation flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QcFlag {
    Pass,
    NotEvaluated,
    Suspect,
    Fail,
}

impl QcFlag {
    /// Numeric QARTOD flag value.
    pub fn code(self) -> u8 {
        match self {
            QcFlag::Pass => 1,
            QcFlag::NotEvaluated => 2,
            QcFlag::Suspect => 3,
            QcFlag::Fail => 4,
        }
    }

    /// Severity for rollup purposes: not-evaluated < pass < suspect < fail.
    fn severity(self) -> u8 {
        match self {
            QcFlag::NotEvaluated => 0,
            QcFlag::Pass => 1,
            QcFlag::Suspect => 2,
            QcFlag::Fail => 3,
        }
    }
}

/// Per-test flag vectors plus the aggregate rollup, all aligned with the
/// input series.
#[derive(Debug, Clone, PartialEq)]
pub struct QcResults {
    pub gross_range: Vec<QcFlag>,
    pub rate_of_change: Vec<QcFlag>,
    pub spike: Vec<QcFlag>,
    pub flat_line: Vec<QcFlag>,
    /// Present only when the threshold set includes climatology spans.
    pub climatology: Option<Vec<QcFlag>>,
    pub rollup: Vec<QcFlag>,
}

/// Runs every configured test and computes the rollup.
pub fn run_all(set: &ThresholdSet, series: &ObservationSeries) -> QcResults {
    let gross_range = gross_range_flags(&set.gross_range, series);
    let rate_of_change = rate_of_change_flags(&set.rate_of_change, series);
    let spike = spike_flags(&set.spike, series);
    let flat_line = flat_line_flags(&set.flat_line, series);
    let climatology = set
        .climatology
        .as_ref()
        .map(|clim| climatology_flags(clim, series));

    let n = series.len();
    let mut rollup = Vec::with_capacity(n);
    for i in 0..n {
        let mut worst = QcFlag::NotEvaluated;
        let mut consider = |flag: QcFlag| {
            if flag.severity() > worst.severity() {
                worst = flag;
            }
        };
        consider(gross_range[i]);
        consider(rate_of_change[i]);
        consider(spike[i]);
        consider(flat_line[i]);
        if let Some(clim) = &climatology {
            consider(clim[i]);
        }
        rollup.push(worst);
    }

    QcResults {
        gross_range,
        rate_of_change,
        spike,
        flat_line,
        climatology,
        rollup,
    }
}

/// Gross range: fail outside the fail span, suspect outside the suspect
/// span, pass otherwise.
pub fn gross_range_flags(test: &GrossRange, series: &ObservationSeries) -> Vec<QcFlag> {
    series
        .observations()
        .iter()
        .map(|obs| {
            if !test.fail_span.contains(obs.value) {
                QcFlag::Fail
            } else if !test.suspect_span.contains(obs.value) {
                QcFlag::Suspect
            } else {
                QcFlag::Pass
            }
        })
        .collect()
}

/// Rate of change: suspect when the rate from the previous sample exceeds
/// the threshold. The first sample has no predecessor and is not evaluated.
pub fn rate_of_change_flags(test: &RateOfChange, series: &ObservationSeries) -> Vec<QcFlag> {
    let observations = series.observations();
    let mut flags = Vec::with_capacity(observations.len());

    for (i, obs) in observations.iter().enumerate() {
        if i == 0 {
            flags.push(QcFlag::NotEvaluated);
            continue;
        }
        let prev = observations[i - 1];
        let dt = (obs.time - prev.time).num_seconds() as f64;
        let rate = (obs.value - prev.value).abs() / dt;
        flags.push(if rate > test.threshold {
            QcFlag::Suspect
        } else {
            QcFlag::Pass
        });
    }

    flags
}

/// Spike: magnitude of a sample against the midpoint of its two neighbors.
/// Endpoints are not evaluated.
pub fn spike_flags(test: &Spike, series: &ObservationSeries) -> Vec<QcFlag> {
    let observations = series.observations();
    let n = observations.len();
    let mut flags = Vec::with_capacity(n);

    for i in 0..n {
        if i == 0 || i + 1 == n {
            flags.push(QcFlag::NotEvaluated);
            continue;
        }
        let reference = (observations[i - 1].value + observations[i + 1].value) / 2.0;
        let magnitude = (observations[i].value - reference).abs();
        flags.push(if magnitude > test.fail_threshold {
            QcFlag::Fail
        } else if magnitude > test.suspect_threshold {
            QcFlag::Suspect
        } else {
            QcFlag::Pass
        });
    }

    flags
}

/// Flat line: a sample fails (or is suspect) when every observation in the
/// trailing window stays within `tolerance` of it. Samples without a full
/// window of history are not evaluated.
pub fn flat_line_flags(test: &FlatLine, series: &ObservationSeries) -> Vec<QcFlag> {
    let observations = series.observations();
    let mut flags = Vec::with_capacity(observations.len());

    for i in 0..observations.len() {
        let fail = window_is_flat(observations, i, test.fail_threshold, test.tolerance);
        let suspect = window_is_flat(observations, i, test.suspect_threshold, test.tolerance);

        let flag = match (fail, suspect) {
            (Some(true), _) => QcFlag::Fail,
            (_, Some(true)) => QcFlag::Suspect,
            (_, Some(false)) => QcFlag::Pass,
            // Not even the suspect window has enough history yet.
            _ => QcFlag::NotEvaluated,
        };
        flags.push(flag);
    }

    flags
}

/// `Some(true)` if all observations within `window_seconds` before index
/// `i` (inclusive) are within `tolerance` of the sample at `i`; `None`
/// when the series does not reach back a full window.
fn window_is_flat(
    observations: &[crate::model::Observation],
    i: usize,
    window_seconds: u32,
    tolerance: f64,
) -> Option<bool> {
    let current = observations[i];
    let window_start = current.time - chrono::Duration::seconds(window_seconds as i64);

    if observations[0].time > window_start {
        return None;
    }

    let flat = observations[..=i]
        .iter()
        .rev()
        .take_while(|o| o.time >= window_start)
        .all(|o| (o.value - current.value).abs() <= tolerance);
    Some(flat)
}

/// Climatology: suspect outside the current month's span; months without a
/// configured span are not evaluated.
pub fn climatology_flags(
    clim: &crate::model::Climatology,
    series: &ObservationSeries,
) -> Vec<QcFlag> {
    series
        .observations()
        .iter()
        .map(|obs| {
            match clim.months.iter().find(|m| m.month == obs.time.month()) {
                None => QcFlag::NotEvaluated,
                Some(m) if m.suspect_span.contains(obs.value) => QcFlag::Pass,
                Some(_) => QcFlag::Suspect,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
