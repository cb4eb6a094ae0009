/// Test fixtures: representative payloads from the Hohonu dashboard API
/// and a NERACOOS ERDDAP tabledap response.
///
/// These fixtures are structurally complete but truncated to the minimum
/// needed to exercise the parsers.
///
/// Hohonu statistic response shape (columnar):
///   data[0] — timestamps as strings, UTC when requested with tz=0
///   data[1] — observed water level in FEET (nullable)
///   data[2] — NOAA forecast in feet (nullable, often entirely null)
///   datum_type, last_reading, last_update, data_type — envelope metadata
///
/// Note: measurements are feet even when the datum is NAVD; parsers must
/// convert to meters.
///
/// ERDDAP tabledap CSV shape: header row with column names, a second row
/// with units, then data rows. Missing values are empty fields.

/// Chebeague Island statistic payload: four 6-minute samples, all valid.
#[cfg(test)]
pub(crate) fn fixture_statistic_json() -> &'static str {
    r#"{
      "datum_type": "NAVD",
      "data": [
        ["2024-05-01 12:00:00", "2024-05-01 12:06:00", "2024-05-01 12:12:00", "2024-05-01 12:18:00"],
        [4.2, 4.31, 4.4, 4.46],
        [null, null, null, null]
      ],
      "last_reading": 4.46,
      "last_update": "2024-05-01 12:18:00",
      "data_type": "water_level"
    }"#
}

/// Statistic payload with transmission gaps: nulls in the value column
/// where the gauge dropped samples. Parsers skip them.
#[cfg(test)]
pub(crate) fn fixture_statistic_with_gaps_json() -> &'static str {
    r#"{
      "datum_type": "NAVD",
      "data": [
        ["2024-05-01 12:00:00", "2024-05-01 12:06:00", "2024-05-01 12:12:00", "2024-05-01 12:18:00", "2024-05-01 12:24:00"],
        [4.2, null, 4.4, null, 4.52],
        [null, null, null, null, null]
      ],
      "last_reading": 4.52,
      "last_update": "2024-05-01 12:24:00",
      "data_type": "water_level"
    }"#
}

/// Statistic payload where a paginated range boundary repeats a timestamp.
/// The duplicate must be dropped, not stored twice.
#[cfg(test)]
pub(crate) fn fixture_statistic_repeated_timestamp_json() -> &'static str {
    r#"{
      "datum_type": "NAVD",
      "data": [
        ["2024-05-01 12:00:00", "2024-05-01 12:00:00", "2024-05-01 12:06:00"],
        [4.2, 4.2, 4.31],
        [null, null, null]
      ],
      "last_reading": 4.31,
      "last_update": "2024-05-01 12:06:00",
      "data_type": "water_level"
    }"#
}

/// Statistic payload from an offline gauge: timestamps present but every
/// measurement null. Parsers must return NoDataAvailable, not an empty
/// series.
#[cfg(test)]
pub(crate) fn fixture_statistic_all_null_json() -> &'static str {
    r#"{
      "datum_type": "NAVD",
      "data": [
        ["2024-05-01 12:00:00", "2024-05-01 12:06:00"],
        [null, null],
        [null, null]
      ],
      "last_reading": 0.0,
      "last_update": "2024-05-01 12:06:00",
      "data_type": "water_level"
    }"#
}

/// Station info for Chebeague Island with computed tidal datums.
#[cfg(test)]
pub(crate) fn fixture_station_info_json() -> &'static str {
    r#"{
      "id": "hohonu-180",
      "uuid": "2b0e9b7a-7dd7-43b8-8cf0-d34e1b0a2f2e",
      "location": "Chebeague Island, Maine",
      "latitude": 43.758,
      "longitude": -70.118,
      "navd88": 0.0,
      "mllw": -1.55,
      "mhhw": 1.53,
      "local_mllw": null,
      "installation_date": "2023-06-15",
      "tidal": true,
      "water": true,
      "status": "active",
      "station_type": "tide_gauge",
      "distance": { "unit": "ft", "value": 12.0 },
      "download_permision": true
    }"#
}

/// Station info for a freshly installed gauge: no tidal datums yet.
/// The regional no-datum guidance applies to stations like this.
#[cfg(test)]
pub(crate) fn fixture_station_info_no_datums_json() -> &'static str {
    r#"{
      "id": "hohonu-512",
      "uuid": "91c3a4b6-0f60-41f4-a3da-5a4c7fd1e9aa",
      "location": "Bath, Maine",
      "latitude": 43.910,
      "longitude": -69.813,
      "navd88": 0.0,
      "mllw": null,
      "mhhw": null,
      "local_mllw": null,
      "installation_date": null,
      "tidal": true,
      "water": true,
      "status": "active",
      "station_type": "tide_gauge",
      "distance": { "unit": "ft", "value": 9.5 },
      "download_permision": true
    }"#
}

/// ERDDAP tabledap CSV response: header row, units row, then data.
/// Water level already in meters. One row has a missing value.
#[cfg(test)]
pub(crate) fn fixture_tabledap_csv() -> &'static str {
    "time,water_level\n\
     UTC,m\n\
     2024-05-01T12:00:00Z,1.28\n\
     2024-05-01T12:06:00Z,1.31\n\
     2024-05-01T12:12:00Z,\n\
     2024-05-01T12:18:00Z,1.37\n"
}

/// ERDDAP tabledap CSV with no data rows at all.
#[cfg(test)]
pub(crate) fn fixture_tabledap_csv_empty() -> &'static str {
    "time,water_level\nUTC,m\n"
}
