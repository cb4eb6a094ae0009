/// QARTOD configuration emission.
///
/// Produces a JSON document shaped for the ioos_qc test harness:
///
/// ```json
/// {
///   "station": { ...site metadata... },
///   "config": {
///     "<variable>": {
///       "qartod": {
///         "gross_range_test": { "suspect_span": [lo, hi], "fail_span": [lo, hi] },
///         "rate_of_change_test": { "threshold": r },
///         "spike_test": { "suspect_threshold": s, "fail_threshold": f },
///         "flat_line_test": { "tolerance": t, "suspect_threshold": 7200, "fail_threshold": 10800 },
///         "climatology_test": { "config": [ { "tspan": [m, m], "period": "month", "vspan": [lo, hi] } ] }
///       }
///     }
///   }
/// }
/// ```
///
/// The climatology block is absent entirely when the record could not
/// support seasonal spans. serde_json's default map sorts keys, so the
/// bytes are a deterministic function of the document.

use serde_json::json;

use crate::model::{
    ConfigDocument, EmitError, ThresholdSet, TEST_CLIMATOLOGY, TEST_FLAT_LINE, TEST_GROSS_RANGE,
    TEST_RATE_OF_CHANGE, TEST_SPIKE,
};

/// Serializes a configuration document as pretty-printed QARTOD JSON.
pub fn emit(doc: &ConfigDocument) -> Result<Vec<u8>, EmitError> {
    let tests = qartod_tests(&doc.thresholds);

    let mut streams = serde_json::Map::new();
    streams.insert(doc.variable.clone(), json!({ "qartod": tests }));

    let document = json!({
        "station": doc.site,
        "config": streams,
    });

    let mut bytes = serde_json::to_vec_pretty(&document)
        .map_err(|e| EmitError::Serialization(e.to_string()))?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn qartod_tests(set: &ThresholdSet) -> serde_json::Value {
    let mut tests = serde_json::Map::new();

    tests.insert(
        TEST_GROSS_RANGE.to_string(),
        json!({
            "suspect_span": [set.gross_range.suspect_span.lower, set.gross_range.suspect_span.upper],
            "fail_span": [set.gross_range.fail_span.lower, set.gross_range.fail_span.upper],
        }),
    );
    tests.insert(
        TEST_RATE_OF_CHANGE.to_string(),
        json!({ "threshold": set.rate_of_change.threshold }),
    );
    tests.insert(
        TEST_SPIKE.to_string(),
        json!({
            "suspect_threshold": set.spike.suspect_threshold,
            "fail_threshold": set.spike.fail_threshold,
        }),
    );
    tests.insert(
        TEST_FLAT_LINE.to_string(),
        json!({
            "tolerance": set.flat_line.tolerance,
            "suspect_threshold": set.flat_line.suspect_threshold,
            "fail_threshold": set.flat_line.fail_threshold,
        }),
    );

    if let Some(clim) = &set.climatology {
        let spans: Vec<serde_json::Value> = clim
            .months
            .iter()
            .map(|m| {
                json!({
                    "tspan": [m.month, m.month],
                    "period": "month",
                    "vspan": [m.suspect_span.lower, m.suspect_span.upper],
                })
            })
            .collect();
        tests.insert(TEST_CLIMATOLOGY.to_string(), json!({ "config": spans }));
    }

    serde_json::Value::Object(tests)
}
