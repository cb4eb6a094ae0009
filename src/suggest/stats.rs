/// Series statistics used by the suggestion engine.
///
/// All helpers are pure functions over slices; the engine composes them.
/// Percentiles use linear interpolation between order statistics, the
/// same convention NumPy defaults to.

use crate::model::Observation;

/// Summary statistics for the observation values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

/// Computes min/max/mean/std over the observation values.
/// Returns `None` for an empty slice.
pub fn value_stats(observations: &[Observation]) -> Option<ValueStats> {
    if observations.is_empty() {
        return None;
    }

    let n = observations.len() as f64;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for obs in observations {
        min = min.min(obs.value);
        max = max.max(obs.value);
        sum += obs.value;
    }
    let mean = sum / n;

    let variance = observations
        .iter()
        .map(|o| {
            let d = o.value - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    Some(ValueStats {
        min,
        max,
        mean,
        std_dev: variance.sqrt(),
    })
}

/// Infers the sampling interval in seconds as the median of successive
/// timestamp differences. Returns `None` for fewer than two observations.
///
/// The median is robust to the occasional transmission gap, which would
/// skew a mean-based estimate badly for gauges that drop offline for days.
pub fn sampling_interval_seconds(observations: &[Observation]) -> Option<f64> {
    if observations.len() < 2 {
        return None;
    }

    let mut deltas: Vec<f64> = observations
        .windows(2)
        .map(|pair| (pair[1].time - pair[0].time).num_seconds() as f64)
        .collect();
    deltas.sort_by(|a, b| a.partial_cmp(b).expect("durations are finite"));

    Some(median_of_sorted(&deltas))
}

/// First-difference rates between successive observations, in value units
/// per second. Entries with a non-positive time delta are impossible given
/// the series ordering invariant, so every window contributes a rate.
pub fn first_difference_rates(observations: &[Observation]) -> Vec<f64> {
    observations
        .windows(2)
        .map(|pair| {
            let dv = pair[1].value - pair[0].value;
            let dt = (pair[1].time - pair[0].time).num_seconds() as f64;
            dv / dt
        })
        .collect()
}

/// Population standard deviation of a value slice. `None` when empty.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    Some(variance.sqrt())
}

/// Percentile (0–100) of a slice by linear interpolation.
/// Returns `None` when the slice is empty.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("values are finite"));

    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let fraction = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * fraction)
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn obs_at(seconds: i64, value: f64) -> Observation {
        Observation {
            time: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
                + chrono::Duration::seconds(seconds),
            value,
        }
    }

    #[test]
    fn test_value_stats_basic() {
        let obs = vec![obs_at(0, 1.0), obs_at(360, 2.0), obs_at(720, 3.0)];
        let stats = value_stats(&obs).expect("non-empty series");
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
        assert_eq!(stats.mean, 2.0);
        assert!((stats.std_dev - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_value_stats_empty_returns_none() {
        assert!(value_stats(&[]).is_none());
    }

    #[test]
    fn test_sampling_interval_is_median_of_deltas() {
        // Regular 6-minute cadence with one 2-day outage gap: the median
        // must still report 360 seconds.
        let mut obs: Vec<Observation> = (0..10).map(|i| obs_at(i * 360, 1.0)).collect();
        obs.push(obs_at(9 * 360 + 172_800, 1.0));
        for i in 1..10 {
            obs.push(obs_at(9 * 360 + 172_800 + i * 360, 1.0));
        }
        let interval = sampling_interval_seconds(&obs).expect("enough observations");
        assert_eq!(interval, 360.0);
    }

    #[test]
    fn test_sampling_interval_requires_two_points() {
        assert!(sampling_interval_seconds(&[obs_at(0, 1.0)]).is_none());
    }

    #[test]
    fn test_first_difference_rates() {
        let obs = vec![obs_at(0, 0.0), obs_at(360, 0.36), obs_at(720, 0.0)];
        let rates = first_difference_rates(&obs);
        assert_eq!(rates.len(), 2);
        assert!((rates[0] - 0.001).abs() < 1e-12);
        assert!((rates[1] + 0.001).abs() < 1e-12);
    }

    #[test]
    fn test_std_dev_zero_for_constant_values() {
        let sd = std_dev(&[2.5, 2.5, 2.5]).expect("non-empty");
        assert_eq!(sd, 0.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 100.0), Some(4.0));
        assert_eq!(percentile(&values, 50.0), Some(2.5));
    }

    #[test]
    fn test_percentile_unsorted_input() {
        let values = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(percentile(&values, 50.0), Some(2.5));
    }
}
