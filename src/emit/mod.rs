/// Configuration document emission.
///
/// Both output formats carry the same threshold payload; the format only
/// selects the container. Thresholds are validated before either emitter
/// runs, so a document that serializes at all is internally consistent.

pub mod neracoos;
pub mod qartod;

use crate::model::{ConfigDocument, EmitError};

/// Output formats for a suggested configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// ioos_qc-shaped JSON consumed by QARTOD tooling.
    Qartod,
    /// TOML document for the NERACOOS dataset registry.
    Neracoos,
}

impl Format {
    /// Conventional file extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Qartod => "json",
            Format::Neracoos => "toml",
        }
    }
}

/// Validates the document's thresholds and serializes it in the requested
/// format. Inconsistent threshold sets (inverted spans, suspect outside
/// fail, non-positive rates) are rejected before any bytes are produced.
pub fn emit(doc: &ConfigDocument, format: Format) -> Result<Vec<u8>, EmitError> {
    if !doc.thresholds.is_internally_consistent() {
        return Err(EmitError::InvalidThresholds(format!(
            "threshold set for {} failed consistency validation",
            doc.site.station_id
        )));
    }
    match format {
        Format::Qartod => qartod::emit(doc),
        Format::Neracoos => neracoos::emit(doc),
    }
}
