/// NERACOOS ERDDAP tabledap client.
///
/// Retrieves observation series for datasets already registered on an
/// ERDDAP server (default https://data.neracoos.org/erddap), as an
/// alternative provider to the Hohonu dashboard for gauges whose data is
/// mirrored there. Requests CSV because tabledap's CSV is the stable,
/// schema-light interchange: one header row, one units row, then data.

use chrono::{DateTime, Utc};

use crate::model::{Observation, ObservationSeries, ProviderError};

pub const DEFAULT_SERVER: &str = "https://data.neracoos.org/erddap";

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds a tabledap CSV request for one variable of one dataset over a
/// time range. Constraint operators must be percent-encoded or ERDDAP
/// rejects the query.
pub fn build_tabledap_url(
    server: &str,
    dataset_id: &str,
    variable: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> String {
    let query = format!(
        "time,{var}&time{gte}{start}&time{lte}{end}",
        var = variable,
        gte = urlencoding::encode(">="),
        lte = urlencoding::encode("<="),
        start = start.format("%Y-%m-%dT%H:%M:%SZ"),
        end = end.format("%Y-%m-%dT%H:%M:%SZ"),
    );
    format!(
        "{}/tabledap/{}.csv?{}",
        server.trim_end_matches('/'),
        dataset_id,
        query
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a tabledap CSV body into an `ObservationSeries`.
///
/// The first row is column names, the second row units. Rows with an empty
/// value field are gaps and are skipped. The units row supplies the series
/// unit; the datum is whatever the dataset publishes, recorded as-is.
///
/// # Errors
/// - `ProviderError::ParseError` — missing header rows, wrong column count,
///   or an unparseable timestamp/value.
/// - `ProviderError::NoDataAvailable` — no data rows with values.
pub fn parse_tabledap_csv(body: &str, datum: &str) -> Result<ObservationSeries, ProviderError> {
    let mut lines = body.lines();

    let header = lines
        .next()
        .ok_or_else(|| ProviderError::ParseError("empty response body".to_string()))?;
    let columns: Vec<&str> = header.split(',').collect();
    if columns.len() != 2 || columns[0] != "time" {
        return Err(ProviderError::ParseError(format!(
            "expected 'time,<variable>' header, got '{}'",
            header
        )));
    }

    let units = lines
        .next()
        .ok_or_else(|| ProviderError::ParseError("missing units row".to_string()))?;
    let unit = units.split(',').nth(1).unwrap_or("").to_string();

    let mut observations: Vec<Observation> = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.splitn(2, ',');
        let raw_time = fields
            .next()
            .ok_or_else(|| ProviderError::ParseError(format!("malformed row: '{}'", line)))?;
        let raw_value = fields
            .next()
            .ok_or_else(|| ProviderError::ParseError(format!("malformed row: '{}'", line)))?;

        if raw_value.trim().is_empty() {
            continue; // gap in the record
        }

        let time = DateTime::parse_from_rfc3339(raw_time)
            .map_err(|e| {
                ProviderError::ParseError(format!("bad timestamp '{}': {}", raw_time, e))
            })?
            .with_timezone(&Utc);
        let value: f64 = raw_value.trim().parse().map_err(|e| {
            ProviderError::ParseError(format!("bad value '{}': {}", raw_value, e))
        })?;

        if let Some(last) = observations.last() {
            if time <= last.time {
                continue;
            }
        }
        observations.push(Observation { time, value });
    }

    if observations.is_empty() {
        return Err(ProviderError::NoDataAvailable(
            "no data rows in tabledap response".to_string(),
        ));
    }

    ObservationSeries::new(unit, datum, observations)
        .map_err(|e| ProviderError::ParseError(e.to_string()))
}

// ---------------------------------------------------------------------------
// HTTP fetcher
// ---------------------------------------------------------------------------

/// Fetches an observation series from an ERDDAP server. No credential:
/// NERACOOS ERDDAP datasets are public.
pub fn fetch_observations(
    client: &reqwest::blocking::Client,
    server: &str,
    dataset_id: &str,
    variable: &str,
    datum: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<ObservationSeries, ProviderError> {
    let url = build_tabledap_url(server, dataset_id, variable, start, end);

    let response = client
        .get(&url)
        .send()
        .map_err(|e| ProviderError::Upstream(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::HttpError(status.as_u16()));
    }

    let body = response
        .text()
        .map_err(|e| ProviderError::Upstream(e.to_string()))?;
    parse_tabledap_csv(&body, datum)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
