/// NERACOOS dataset configuration emission.
///
/// Produces the TOML registration document the NERACOOS dataset registry
/// consumes: a `[station]` metadata table, a `[dataset]` table naming the
/// QC'd variable, and one `[qartod.<test>]` table per configured test.
/// Table and key order is fixed by construction, so identical documents
/// emit identical bytes.

use toml::value::{Table, Value};

use crate::model::{
    ConfigDocument, EmitError, SiteMetadata, ThresholdSet, TEST_CLIMATOLOGY, TEST_FLAT_LINE,
    TEST_GROSS_RANGE, TEST_RATE_OF_CHANGE, TEST_SPIKE,
};

/// Serializes a configuration document as NERACOOS registry TOML.
pub fn emit(doc: &ConfigDocument) -> Result<Vec<u8>, EmitError> {
    let mut root = Table::new();
    root.insert("station".to_string(), Value::Table(station_table(&doc.site)));

    let mut dataset = Table::new();
    dataset.insert("variable".to_string(), Value::String(doc.variable.clone()));
    root.insert("dataset".to_string(), Value::Table(dataset));

    root.insert("qartod".to_string(), Value::Table(qartod_table(&doc.thresholds)));

    let text = toml::to_string(&Value::Table(root))
        .map_err(|e| EmitError::Serialization(e.to_string()))?;
    Ok(text.into_bytes())
}

fn station_table(site: &SiteMetadata) -> Table {
    let mut station = Table::new();
    station.insert("station_id".to_string(), Value::String(site.station_id.clone()));
    station.insert("location".to_string(), Value::String(site.location.clone()));
    station.insert("latitude".to_string(), Value::Float(site.latitude));
    station.insert("longitude".to_string(), Value::Float(site.longitude));
    station.insert("navd88".to_string(), Value::Float(site.navd88));
    if let Some(mllw) = site.mllw {
        station.insert("mllw".to_string(), Value::Float(mllw));
    }
    if let Some(mhhw) = site.mhhw {
        station.insert("mhhw".to_string(), Value::Float(mhhw));
    }
    if let Some(date) = site.installation_date {
        station.insert(
            "installation_date".to_string(),
            Value::String(date.format("%Y-%m-%d").to_string()),
        );
    }
    station.insert("tidal".to_string(), Value::Boolean(site.tidal));
    station.insert("status".to_string(), Value::String(site.status.clone()));
    station
}

fn qartod_table(set: &ThresholdSet) -> Table {
    let mut qartod = Table::new();

    let mut gross = Table::new();
    gross.insert("suspect_span".to_string(), span_value(set.gross_range.suspect_span));
    gross.insert("fail_span".to_string(), span_value(set.gross_range.fail_span));
    qartod.insert(TEST_GROSS_RANGE.to_string(), Value::Table(gross));

    let mut rate = Table::new();
    rate.insert("threshold".to_string(), Value::Float(set.rate_of_change.threshold));
    qartod.insert(TEST_RATE_OF_CHANGE.to_string(), Value::Table(rate));

    let mut spike = Table::new();
    spike.insert("suspect_threshold".to_string(), Value::Float(set.spike.suspect_threshold));
    spike.insert("fail_threshold".to_string(), Value::Float(set.spike.fail_threshold));
    qartod.insert(TEST_SPIKE.to_string(), Value::Table(spike));

    let mut flat = Table::new();
    flat.insert("tolerance".to_string(), Value::Float(set.flat_line.tolerance));
    flat.insert(
        "suspect_threshold".to_string(),
        Value::Integer(set.flat_line.suspect_threshold as i64),
    );
    flat.insert(
        "fail_threshold".to_string(),
        Value::Integer(set.flat_line.fail_threshold as i64),
    );
    qartod.insert(TEST_FLAT_LINE.to_string(), Value::Table(flat));

    if let Some(clim) = &set.climatology {
        let months: Vec<Value> = clim
            .months
            .iter()
            .map(|m| {
                let mut month = Table::new();
                month.insert("month".to_string(), Value::Integer(m.month as i64));
                month.insert("suspect_span".to_string(), span_value(m.suspect_span));
                Value::Table(month)
            })
            .collect();
        let mut clim_table = Table::new();
        clim_table.insert("months".to_string(), Value::Array(months));
        qartod.insert(TEST_CLIMATOLOGY.to_string(), Value::Table(clim_table));
    }

    qartod
}

fn span_value(span: crate::model::Span) -> Value {
    Value::Array(vec![Value::Float(span.lower), Value::Float(span.upper)])
}
