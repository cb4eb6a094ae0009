/// Integration tests for the full configuration pipeline
///
/// These tests verify:
/// 1. Provider payload parsing feeds the suggestion engine
/// 2. Suggest → regional overlay → preview → emit on synthetic tidal data
/// 3. Emission is deterministic and round-trips through its own parsers
/// 4. Engine error paths produce no partial output
///
/// Run with: cargo test --test suggestion_pipeline

use chrono::{TimeZone, Utc};

use qartod_gen::apply::QcFlag;
use qartod_gen::config::SuggestConfig;
use qartod_gen::emit::Format;
use qartod_gen::model::{
    Observation, ObservationSeries, SiteMetadata, SuggestError, FEET_TO_METERS,
};
use qartod_gen::regions::find_region;
use qartod_gen::session::Session;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn chebeague_island() -> SiteMetadata {
    SiteMetadata {
        station_id: "hohonu-180".to_string(),
        location: "Chebeague Island, Maine".to_string(),
        latitude: 43.758,
        longitude: -70.118,
        navd88: 0.0,
        mllw: Some(-1.55),
        mhhw: Some(1.53),
        installation_date: None,
        tidal: true,
        status: "active".to_string(),
    }
}

/// Semidiurnal tide sampled every 6 minutes, M2 period of 12.42 hours.
fn tidal_series(days: i64, low: f64, high: f64) -> ObservationSeries {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let amplitude = (high - low) / 2.0;
    let offset = (high + low) / 2.0;
    let period_seconds = 12.42 * 3600.0;

    let observations = (0..days * 24 * 10)
        .map(|i| {
            let t = (i * 360) as f64;
            Observation {
                time: start + chrono::Duration::seconds(i * 360),
                value: offset + amplitude * (2.0 * std::f64::consts::PI * t / period_seconds).sin(),
            }
        })
        .collect();

    ObservationSeries::new("meters", "NAVD88", observations).expect("generated series valid")
}

fn reviewed_session() -> Session {
    // Tide between the site's MLLW and MHHW, as a healthy gauge records.
    let mut session = Session::new(chebeague_island(), tidal_series(60, -1.5, 1.5));
    session
        .suggest(&SuggestConfig::default())
        .expect("60 days of tidal data should yield suggestions");
    let region = find_region("Gulf of Maine").expect("Gulf of Maine is registered");
    assert!(session.apply_regional_defaults(region));
    session
}

// ---------------------------------------------------------------------------
// 1. Full pipeline: suggest → overlay → preview → emit
// ---------------------------------------------------------------------------

#[test]
fn test_pipeline_produces_datum_based_gross_range() {
    let session = reviewed_session();
    let set = session.thresholds().expect("working set installed");

    // Chebeague datums: MHHW 1.53 m + 6 ft, MLLW -1.55 m - 4.5 ft.
    let expected_upper = 1.53 + 6.0 * FEET_TO_METERS;
    let expected_lower = -1.55 - 4.5 * FEET_TO_METERS;
    assert!((set.gross_range.suspect_span.upper - expected_upper).abs() < 1e-9);
    assert!((set.gross_range.suspect_span.lower - expected_lower).abs() < 1e-9);
    assert!(set.is_internally_consistent());
}

#[test]
fn test_pipeline_preview_passes_clean_tidal_data() {
    let session = reviewed_session();
    let results = session.preview().expect("working set installed");

    let flagged = results
        .rollup
        .iter()
        .filter(|f| matches!(f, QcFlag::Suspect | QcFlag::Fail))
        .count();
    assert_eq!(
        flagged, 0,
        "clean synthetic tide within the datums must not be flagged"
    );
}

#[test]
fn test_pipeline_qartod_output_round_trips() {
    let session = reviewed_session();
    let bytes = session
        .export("water_level", Format::Qartod)
        .expect("export should succeed");
    let parsed: serde_json::Value =
        serde_json::from_slice(&bytes).expect("emitted JSON must parse");

    assert_eq!(parsed["station"]["station_id"], "hohonu-180");
    let qartod = &parsed["config"]["water_level"]["qartod"];
    for test in ["gross_range_test", "rate_of_change_test", "spike_test", "flat_line_test"] {
        assert!(qartod.get(test).is_some(), "{} missing from output", test);
    }
    // 60 days in one calendar year: no climatology.
    assert!(qartod.get("climatology_test").is_none());
}

#[test]
fn test_pipeline_neracoos_output_round_trips() {
    let session = reviewed_session();
    let bytes = session
        .export("water_level", Format::Neracoos)
        .expect("export should succeed");
    let parsed: toml::Value = String::from_utf8(bytes)
        .expect("valid UTF-8")
        .parse()
        .expect("emitted TOML must parse");

    assert_eq!(parsed["station"]["station_id"].as_str(), Some("hohonu-180"));
    assert_eq!(parsed["dataset"]["variable"].as_str(), Some("water_level"));
    assert!(parsed["qartod"]["gross_range_test"]["suspect_span"].is_array());
}

#[test]
fn test_pipeline_emission_is_byte_deterministic() {
    let first = reviewed_session();
    let second = reviewed_session();
    for format in [Format::Qartod, Format::Neracoos] {
        assert_eq!(
            first.export("water_level", format).unwrap(),
            second.export("water_level", format).unwrap(),
            "identical inputs must emit identical bytes"
        );
    }
}

// ---------------------------------------------------------------------------
// 2. Engine error paths produce no partial output
// ---------------------------------------------------------------------------

#[test]
fn test_pipeline_short_series_yields_no_output() {
    let mut session = Session::new(chebeague_island(), tidal_series(5, -1.0, 4.5));
    let result = session.suggest(&SuggestConfig::default());
    assert!(matches!(result, Err(SuggestError::InsufficientData(_))));
    assert!(session.thresholds().is_none(), "no partial threshold set");
    assert!(session.export("water_level", Format::Qartod).is_err());
}

#[test]
fn test_pipeline_constant_series_yields_no_output() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let observations = (0..40 * 24 * 10)
        .map(|i| Observation {
            time: start + chrono::Duration::seconds(i * 360),
            value: 0.82,
        })
        .collect();
    let series = ObservationSeries::new("meters", "NAVD88", observations).unwrap();

    let mut session = Session::new(chebeague_island(), series);
    let result = session.suggest(&SuggestConfig::default());
    assert!(matches!(result, Err(SuggestError::DegenerateStatistics(_))));
    assert!(session.thresholds().is_none());
}

// ---------------------------------------------------------------------------
// 3. Flat-line scenario end to end
// ---------------------------------------------------------------------------

#[test]
fn test_pipeline_flags_sensor_stall_in_preview() {
    // Healthy tide, then the sensor sticks at its last value for 3 hours.
    let healthy = tidal_series(60, -1.5, 1.5);
    let mut observations = healthy.observations().to_vec();
    let last = *observations.last().unwrap();
    for i in 1..=30 {
        observations.push(Observation {
            time: last.time + chrono::Duration::seconds(i * 360),
            value: last.value,
        });
    }
    let series = ObservationSeries::new("meters", "NAVD88", observations).unwrap();

    let mut session = Session::new(chebeague_island(), series);
    session.suggest(&SuggestConfig::default()).expect("should succeed");
    let region = find_region("Gulf of Maine").unwrap();
    session.apply_regional_defaults(region);

    let results = session.preview().expect("working set installed");
    let tail_flagged = results
        .flat_line
        .iter()
        .rev()
        .take(5)
        .filter(|f| matches!(f, QcFlag::Suspect | QcFlag::Fail))
        .count();
    assert!(
        tail_flagged > 0,
        "a 3-hour stall must be flagged by the 2-hour flat-line window"
    );
}
