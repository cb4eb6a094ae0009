/// Per-session review context.
///
/// One `Session` covers one site: the metadata and observation series
/// loaded for it, and the working threshold set under review. The caller
/// seeds the working set from the suggestion engine, overlays regional
/// guidance, edits individual thresholds, previews the effect against the
/// loaded series, and finally snapshots an immutable `ConfigDocument` for
/// emission. The emitters never see the session — only its snapshot.

use crate::apply::{self, QcResults};
use crate::config::SuggestConfig;
use crate::emit::{self, Format};
use crate::model::{ConfigDocument, EmitError, ObservationSeries, SiteMetadata, SuggestError, ThresholdSet};
use crate::regions::Region;
use crate::suggest;

pub struct Session {
    site: SiteMetadata,
    series: ObservationSeries,
    working: Option<ThresholdSet>,
}

impl Session {
    /// Opens a session for one site with its loaded observation series.
    /// No thresholds exist yet; call `suggest` or `set_thresholds` first.
    pub fn new(site: SiteMetadata, series: ObservationSeries) -> Session {
        Session {
            site,
            series,
            working: None,
        }
    }

    pub fn site(&self) -> &SiteMetadata {
        &self.site
    }

    pub fn series(&self) -> &ObservationSeries {
        &self.series
    }

    /// The working threshold set, if one has been suggested or installed.
    pub fn thresholds(&self) -> Option<&ThresholdSet> {
        self.working.as_ref()
    }

    /// Mutable access for operator edits. Consistency is not enforced on
    /// every edit — the export path validates the finished set instead, so
    /// an operator can pass through inconsistent intermediate states.
    pub fn thresholds_mut(&mut self) -> Option<&mut ThresholdSet> {
        self.working.as_mut()
    }

    /// Replaces the working set wholesale, e.g. with thresholds loaded from
    /// a previously exported document.
    pub fn set_thresholds(&mut self, set: ThresholdSet) {
        self.working = Some(set);
    }

    /// Runs the suggestion engine on the loaded series and installs the
    /// result as the working set. Any prior working set (including edits)
    /// is discarded on success; on error the previous set is kept.
    pub fn suggest(&mut self, config: &SuggestConfig) -> Result<&ThresholdSet, SuggestError> {
        let set = suggest::suggest_thresholds(&self.series, config)?;
        Ok(self.working.insert(set))
    }

    /// Overlays regional datum-based guidance onto the working set.
    /// Returns false when there is no working set to adjust.
    pub fn apply_regional_defaults(&mut self, region: &Region) -> bool {
        match &self.working {
            Some(set) => {
                self.working = Some(region.apply_to(set, &self.site));
                true
            }
            None => false,
        }
    }

    /// Previews the working set against the loaded series. `None` when no
    /// working set exists.
    pub fn preview(&self) -> Option<QcResults> {
        self.working
            .as_ref()
            .map(|set| apply::run_all(set, &self.series))
    }

    /// Snapshots the working set into an immutable export document. The
    /// named variable is the dataset column the thresholds apply to.
    pub fn snapshot(&self, variable: &str) -> Result<ConfigDocument, EmitError> {
        let thresholds = self.working.clone().ok_or_else(|| {
            EmitError::InvalidThresholds(format!(
                "no working threshold set for {}",
                self.site.station_id
            ))
        })?;
        Ok(ConfigDocument {
            site: self.site.clone(),
            variable: variable.to_string(),
            thresholds,
        })
    }

    /// Snapshots and emits in one step. Validation happens inside
    /// `emit::emit`, so an edited-into-inconsistency set fails here rather
    /// than producing a broken file.
    pub fn export(&self, variable: &str, format: Format) -> Result<Vec<u8>, EmitError> {
        let doc = self.snapshot(variable)?;
        emit::emit(&doc, format)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Observation, Span};
    use crate::regions::find_region;
    use chrono::{TimeZone, Utc};

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

    fn tidal_series(days: i64) -> ObservationSeries {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let observations = (0..days * 24 * 10)
            .map(|i| {
                let t = (i * 360) as f64;
                Observation {
                    time: start + chrono::Duration::seconds(i * 360),
                    value: 0.0 + 1.5 * (2.0 * std::f64::consts::PI * t / (12.42 * 3600.0)).sin(),
                }
            })
            .collect();
        ObservationSeries::new("meters", "NAVD88", observations).expect("generated series valid")
    }

    #[test]
    fn test_session_starts_without_thresholds() {
        let session = Session::new(chebeague_island(), tidal_series(40));
        assert!(session.thresholds().is_none());
        assert!(session.preview().is_none());
        let err = session.snapshot("water_level").expect_err("no set to snapshot");
        assert!(matches!(err, EmitError::InvalidThresholds(_)));
    }

    #[test]
    fn test_suggest_installs_working_set() {
        let mut session = Session::new(chebeague_island(), tidal_series(40));
        session.suggest(&SuggestConfig::default()).expect("40-day series suffices");
        assert!(session.thresholds().is_some());
        assert!(session.preview().is_some());
    }

    #[test]
    fn test_failed_suggest_keeps_previous_set() {
        let mut session = Session::new(chebeague_island(), tidal_series(40));
        session.suggest(&SuggestConfig::default()).expect("should succeed");
        let before = session.thresholds().cloned();

        let mut strict = SuggestConfig::default();
        strict.min_span_days = 365;
        let result = session.suggest(&strict);
        assert!(matches!(result, Err(SuggestError::InsufficientData(_))));
        assert_eq!(session.thresholds().cloned(), before, "working set must survive");
    }

    #[test]
    fn test_regional_overlay_uses_site_datums() {
        let mut session = Session::new(chebeague_island(), tidal_series(40));
        session.suggest(&SuggestConfig::default()).expect("should succeed");
        let region = find_region("Gulf of Maine").unwrap();

        assert!(session.apply_regional_defaults(region));
        let set = session.thresholds().unwrap();
        let expected = region.datum_gross_range(&chebeague_island()).unwrap();
        assert_eq!(set.gross_range, expected);
    }

    #[test]
    fn test_regional_overlay_requires_working_set() {
        let mut session = Session::new(chebeague_island(), tidal_series(40));
        let region = find_region("Gulf of Maine").unwrap();
        assert!(!session.apply_regional_defaults(region));
    }

    #[test]
    fn test_edit_then_export_round_trip() {
        let mut session = Session::new(chebeague_island(), tidal_series(40));
        session.suggest(&SuggestConfig::default()).expect("should succeed");

        let set = session.thresholds_mut().unwrap();
        set.gross_range.suspect_span = Span { lower: -3.0, upper: 3.5 };
        set.gross_range.fail_span = Span { lower: -4.5, upper: 4.6 };

        let bytes = session
            .export("water_level", Format::Qartod)
            .expect("edited set remains consistent");
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            parsed["config"]["water_level"]["qartod"]["gross_range_test"]["suspect_span"][1],
            3.5
        );
    }

    #[test]
    fn test_export_rejects_inconsistent_edits() {
        let mut session = Session::new(chebeague_island(), tidal_series(40));
        session.suggest(&SuggestConfig::default()).expect("should succeed");

        let set = session.thresholds_mut().unwrap();
        set.rate_of_change.threshold = -1.0;

        let err = session
            .export("water_level", Format::Neracoos)
            .expect_err("negative rate must be rejected");
        assert!(matches!(err, EmitError::InvalidThresholds(_)));
    }

    #[test]
    fn test_snapshot_is_detached_from_session() {
        let mut session = Session::new(chebeague_island(), tidal_series(40));
        session.suggest(&SuggestConfig::default()).expect("should succeed");
        let doc = session.snapshot("water_level").expect("snapshot");

        session.thresholds_mut().unwrap().rate_of_change.threshold = 99.0;
        assert_ne!(
            doc.thresholds.rate_of_change.threshold, 99.0,
            "snapshot must not observe later edits"
        );
    }
}
