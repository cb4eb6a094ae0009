/// Hohonu dashboard API client.
///
/// Handles URL construction and JSON response parsing for the Hohonu
/// station endpoints:
///   https://dashboard.hohonu.io/api/v1/stations/{station_id}
///   https://dashboard.hohonu.io/api/v1/stations/{station_id}/statistic/
///
/// API reference: https://hohonu.readme.io/reference/getting-started-with-your-api
///
/// The statistic endpoint returns columnar arrays (timestamps, observed
/// values in feet, optional NOAA forecast). See `fixtures.rs` for annotated
/// examples of the response structure. Authentication is an API key passed
/// unmodified in the `Authorization` header; nothing downstream of this
/// module ever sees the credential.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::model::{
    Observation, ObservationSeries, ProviderError, SiteMetadata, FEET_TO_METERS,
};

const HOHONU_API_BASE: &str = "https://dashboard.hohonu.io/api/v1";
const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Serde structures for Hohonu JSON deserialization
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct StatisticResponse {
    /// Columnar payload: data[0] = ISO timestamps, data[1] = observed water
    /// level in feet (nullable), data[2] = NOAA forecast in feet (nullable,
    /// may be absent entirely).
    data: Vec<Vec<serde_json::Value>>,
    datum_type: Option<String>,
}

#[derive(Deserialize)]
struct StationInfoResponse {
    id: String,
    location: String,
    latitude: f64,
    longitude: f64,
    navd88: f64,
    mllw: Option<f64>,
    mhhw: Option<f64>,
    installation_date: Option<String>,
    tidal: bool,
    status: String,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds the statistic endpoint URL for a station and date range.
///
/// Dates are YYYY-MM-DD; `tz=0` pins the response to UTC and
/// `format=json` requests the columnar JSON payload.
pub fn build_statistic_url(
    station_id: &str,
    start: NaiveDate,
    end: NaiveDate,
    datum: &str,
    cleaned: bool,
) -> String {
    format!(
        "{}/stations/{}/statistic/?from={}&to={}&datum={}&cleaned={}&format=json&tz=0",
        HOHONU_API_BASE,
        station_id,
        start.format(DATE_FORMAT),
        end.format(DATE_FORMAT),
        datum,
        cleaned
    )
}

/// Builds the station info endpoint URL.
pub fn build_station_info_url(station_id: &str) -> String {
    format!("{}/stations/{}", HOHONU_API_BASE, station_id)
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a statistic endpoint JSON body into an `ObservationSeries` in
/// meters NAVD88, converting from the feet the API reports.
///
/// Null measurements are skipped. Timestamps that do not advance are also
/// skipped so the series ordering invariant holds even when the API
/// repeats a boundary sample between paginated ranges.
///
/// # Errors
/// - `ProviderError::ParseError` — malformed JSON or timestamp/value columns
///   of mismatched length.
/// - `ProviderError::NoDataAvailable` — every measurement was null.
pub fn parse_statistic_response(json: &str) -> Result<ObservationSeries, ProviderError> {
    let response: StatisticResponse = serde_json::from_str(json)
        .map_err(|e| ProviderError::ParseError(format!("JSON deserialization failed: {}", e)))?;

    let times = response
        .data
        .first()
        .ok_or_else(|| ProviderError::ParseError("missing timestamp column".to_string()))?;
    let values = response
        .data
        .get(1)
        .ok_or_else(|| ProviderError::ParseError("missing value column".to_string()))?;

    if times.len() != values.len() {
        return Err(ProviderError::ParseError(format!(
            "column length mismatch: {} timestamps vs {} values",
            times.len(),
            values.len()
        )));
    }

    let mut observations: Vec<Observation> = Vec::with_capacity(times.len());
    for (raw_time, raw_value) in times.iter().zip(values.iter()) {
        // Nulls mark gaps in the record; skip rather than fabricate.
        let feet = match raw_value.as_f64() {
            Some(v) => v,
            None => continue,
        };

        let time_str = raw_time.as_str().ok_or_else(|| {
            ProviderError::ParseError(format!("non-string timestamp: {}", raw_time))
        })?;
        let time = parse_timestamp(time_str)?;

        if let Some(last) = observations.last() {
            if time <= last.time {
                continue;
            }
        }

        observations.push(Observation {
            time,
            value: feet * FEET_TO_METERS,
        });
    }

    if observations.is_empty() {
        return Err(ProviderError::NoDataAvailable(
            "all measurements in the response were null".to_string(),
        ));
    }

    let datum = response.datum_type.unwrap_or_else(|| "NAVD".to_string());
    ObservationSeries::new("meters", datum, observations)
        .map_err(|e| ProviderError::ParseError(e.to_string()))
}

/// Parses a station info JSON body into `SiteMetadata`.
///
/// # Errors
/// `ProviderError::ParseError` on malformed JSON or an unparseable
/// installation date.
pub fn parse_station_info(json: &str) -> Result<SiteMetadata, ProviderError> {
    let info: StationInfoResponse = serde_json::from_str(json)
        .map_err(|e| ProviderError::ParseError(format!("JSON deserialization failed: {}", e)))?;

    let installation_date = match info.installation_date {
        Some(raw) => Some(parse_install_date(&raw)?),
        None => None,
    };

    Ok(SiteMetadata {
        station_id: info.id,
        location: info.location,
        latitude: info.latitude,
        longitude: info.longitude,
        navd88: info.navd88,
        mllw: info.mllw,
        mhhw: info.mhhw,
        installation_date,
        tidal: info.tidal,
        status: info.status,
    })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ProviderError> {
    // The statistic endpoint with tz=0 returns naive UTC timestamps,
    // "YYYY-MM-DD HH:MM:SS" or ISO 8601 with a T separator.
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(ProviderError::ParseError(format!(
        "unrecognized timestamp format: '{}'",
        raw
    )))
}

fn parse_install_date(raw: &str) -> Result<NaiveDate, ProviderError> {
    // Installation dates arrive either as bare dates or full timestamps.
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.date_naive());
    }
    Err(ProviderError::ParseError(format!(
        "unrecognized installation date: '{}'",
        raw
    )))
}

// ---------------------------------------------------------------------------
// HTTP fetchers
// ---------------------------------------------------------------------------

/// Fetches observations for a station and date range.
///
/// The API key is passed through unmodified in the `Authorization` header.
///
/// # Errors
/// `ProviderError::Upstream` on network failure, `ProviderError::HttpError`
/// on a non-2xx status, plus the parse errors of `parse_statistic_response`.
pub fn fetch_observations(
    client: &reqwest::blocking::Client,
    api_key: &str,
    station_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<ObservationSeries, ProviderError> {
    let url = build_statistic_url(station_id, start, end, "NAVD", true);
    let body = get_with_auth(client, api_key, &url)?;
    parse_statistic_response(&body)
}

/// Fetches station metadata.
pub fn fetch_station_info(
    client: &reqwest::blocking::Client,
    api_key: &str,
    station_id: &str,
) -> Result<SiteMetadata, ProviderError> {
    let url = build_station_info_url(station_id);
    let body = get_with_auth(client, api_key, &url)?;
    parse_station_info(&body)
}

fn get_with_auth(
    client: &reqwest::blocking::Client,
    api_key: &str,
    url: &str,
) -> Result<String, ProviderError> {
    let response = client
        .get(url)
        .header("Authorization", api_key)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| ProviderError::Upstream(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::HttpError(status.as_u16()));
    }

    response
        .text()
        .map_err(|e| ProviderError::Upstream(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
