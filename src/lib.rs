/// qartod_gen: QARTOD/NERACOOS configuration generator for tide-gauge sites.
///
/// # Module structure
///
/// ```text
/// qartod_gen
/// ├── model       — shared data types (Observation, ThresholdSet, ProviderError, …)
/// ├── config      — suggestion engine tuning loader (qcgen.toml)
/// ├── regions     — regional threshold guidance registry (Gulf of Maine)
/// ├── session     — per-site review context: suggest, edit, preview, snapshot
/// ├── ingest
/// │   ├── hohonu  — Hohonu dashboard API: URL construction + JSON parsing
/// │   ├── erddap  — NERACOOS ERDDAP tabledap client: CSV retrieval
/// │   └── fixtures (test only) — representative API response payloads
/// ├── suggest
/// │   ├── mod     — threshold suggestion engine (statistics → ThresholdSet)
/// │   └── stats   — series statistics (cadence, first differences, percentiles)
/// ├── apply       — QC preview: runs the QARTOD tests against a loaded series
/// ├── emit
/// │   ├── qartod  — ioos_qc-shaped JSON configuration document
/// │   └── neracoos — NERACOOS dataset registry TOML document
/// └── logging     — structured console/file logging
/// ```

/// Public modules
pub mod apply;
pub mod config;
pub mod emit;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod regions;
pub mod session;
pub mod suggest;
