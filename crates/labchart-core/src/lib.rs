//! LabChart Core Library
//!
//! Biomarker reference-range evaluation and chart series styling for patient
//! lab results.
//!
//! # Architecture
//!
//! ```text
//!  RecordSource ──(records)──┐
//!                            ▼
//!                      SeriesBuilder ──(series)──▶ ChartDocument ──▶ presenter
//!                            ▲
//!  RangeRegistry ──(ranges)──┘
//!        ▲
//!   set_range (user edit → full rebuild)
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (Biomarker, BiomarkerRange, PatientRecord)
//! - [`registry`]: Per-biomarker reference ranges in stable tracked order
//! - [`evaluator`]: In-range / out-of-range classification
//! - [`color`]: RGB colors, inversion and the Set1 palette
//! - [`series`]: Per-point and per-segment styling
//! - [`chart`]: Presenter-facing chart document and footer
//! - [`session`]: Fetch orchestration and rebuild on change
//! - [`source`]: Record source seam
//! - [`config`]: JSON configuration file

pub mod chart;
pub mod color;
pub mod config;
pub mod evaluator;
pub mod models;
pub mod registry;
pub mod series;
pub mod session;
pub mod source;
pub mod telemetry;

// Re-export commonly used types
pub use chart::ChartDocument;
pub use color::{Palette, Rgb, Rgba};
pub use config::DashboardConfig;
pub use evaluator::{classify, classify_reading, RangeStatus};
pub use models::{Biomarker, BiomarkerRange, PatientRecord, RangeError};
pub use registry::{RangeRegistry, RangeUpdate};
pub use series::{PointState, SegmentKind, SeriesBuilder, SeriesDescriptor};
pub use session::ChartSession;
pub use source::{FetchError, RecordSource, StaticSource};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum LabChartError {
    #[error("Unknown biomarker: {0}")]
    UnknownBiomarker(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Fetch error: {0}")]
    FetchError(String),
}

impl From<RangeError> for LabChartError {
    fn from(e: RangeError) -> Self {
        match e {
            RangeError::UnknownBiomarker(name) => LabChartError::UnknownBiomarker(name),
            other => LabChartError::InvalidInput(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for LabChartError {
    fn from(e: serde_json::Error) -> Self {
        LabChartError::SerializationError(e.to_string())
    }
}

impl From<FetchError> for LabChartError {
    fn from(e: FetchError) -> Self {
        LabChartError::FetchError(e.to_string())
    }
}

impl From<config::ConfigError> for LabChartError {
    fn from(e: config::ConfigError) -> Self {
        LabChartError::InvalidInput(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for LabChartError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        LabChartError::InvalidInput(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Create a session with default reference ranges.
#[uniffi::export]
pub fn new_session() -> Arc<LabChartCore> {
    Arc::new(LabChartCore {
        session: Mutex::new(ChartSession::default()),
    })
}

/// Create a session with range overrides from a JSON config document.
#[uniffi::export]
pub fn new_session_with_config(config_json: String) -> Result<Arc<LabChartCore>, LabChartError> {
    let config = DashboardConfig::from_json(&config_json)?;
    let mut registry = RangeRegistry::with_defaults();
    config.apply(&mut registry)?;
    let session = match config.title {
        Some(title) => ChartSession::with_title(title, registry),
        None => ChartSession::new(registry),
    };
    Ok(Arc::new(LabChartCore {
        session: Mutex::new(session),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe session wrapper for FFI.
#[derive(uniffi::Object)]
pub struct LabChartCore {
    session: Mutex<ChartSession>,
}

#[uniffi::export]
impl LabChartCore {
    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Replace the record sequence with a JSON array fetched by the host.
    ///
    /// A payload that fails to parse leaves the current records untouched.
    pub fn load_records_json(&self, json: String) -> Result<u32, LabChartError> {
        let records: Vec<PatientRecord> = match serde_json::from_str(&json) {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, "record payload rejected; keeping previous records");
                return Err(e.into());
            }
        };
        let count = records.len() as u32;
        let mut session = self.session.lock()?;
        session.replace_records(records);
        Ok(count)
    }

    /// Number of records currently charted.
    pub fn record_count(&self) -> Result<u32, LabChartError> {
        let session = self.session.lock()?;
        Ok(session.records().len() as u32)
    }

    // =========================================================================
    // Range Operations
    // =========================================================================

    /// Set the reference range for a biomarker and rebuild the chart.
    pub fn set_range(&self, biomarker: String, min: f64, max: f64) -> Result<(), LabChartError> {
        let mut session = self.session.lock()?;
        session.set_range(&biomarker, BiomarkerRange::new(min, max))?;
        Ok(())
    }

    /// Get the reference range for a biomarker.
    pub fn get_range(&self, biomarker: String) -> Result<FfiBiomarkerRange, LabChartError> {
        let session = self.session.lock()?;
        let range = session.get_range(&biomarker)?;
        Ok(FfiBiomarkerRange {
            biomarker,
            min: range.min,
            max: range.max,
        })
    }

    /// Tracked biomarkers with their ranges, in palette order.
    pub fn tracked_biomarkers(&self) -> Result<Vec<FfiBiomarkerRange>, LabChartError> {
        let session = self.session.lock()?;
        Ok(session
            .registry()
            .iter()
            .map(|(biomarker, range)| FfiBiomarkerRange {
                biomarker: biomarker.name().to_string(),
                min: range.min,
                max: range.max,
            })
            .collect())
    }

    // =========================================================================
    // Chart Operations
    // =========================================================================

    /// The current chart document as JSON.
    pub fn chart_json(&self) -> Result<String, LabChartError> {
        let session = self.session.lock()?;
        Ok(session.chart().to_json()?)
    }

    /// Shared tooltip footer, if any records are loaded.
    pub fn footer(&self) -> Result<Option<String>, LabChartError> {
        let session = self.session.lock()?;
        Ok(session.chart().footer.clone())
    }

    /// Rebuild counter; changes whenever the chart document changes.
    pub fn revision(&self) -> Result<u64, LabChartError> {
        let session = self.session.lock()?;
        Ok(session.revision())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe biomarker range.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBiomarkerRange {
    pub biomarker: String,
    pub min: f64,
    pub max: f64,
}
