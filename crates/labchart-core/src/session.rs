//! Chart session: owns the registry, the fetched records and the built chart.
//!
//! Every mutation rebuilds the whole chart synchronously, so callers never
//! observe a half-updated registry or a partially built series set.

use crate::chart::{ChartDocument, DEFAULT_TITLE};
use crate::models::{BiomarkerRange, PatientRecord, RangeResult};
use crate::registry::{RangeRegistry, RangeUpdate};
use crate::source::{FetchResult, RecordSource};

pub struct ChartSession {
    title: String,
    registry: RangeRegistry,
    records: Vec<PatientRecord>,
    chart: ChartDocument,
    revision: u64,
}

impl Default for ChartSession {
    fn default() -> Self {
        Self::new(RangeRegistry::with_defaults())
    }
}

impl ChartSession {
    /// Create a session with no records yet.
    pub fn new(registry: RangeRegistry) -> Self {
        Self::with_title(DEFAULT_TITLE, registry)
    }

    pub fn with_title(title: impl Into<String>, registry: RangeRegistry) -> Self {
        let title = title.into();
        let chart = ChartDocument::build(&title, &[], &registry);
        Self {
            title,
            registry,
            records: Vec::new(),
            chart,
            revision: 0,
        }
    }

    /// Fetch the full record sequence and rebuild.
    ///
    /// On failure the error is logged and returned; records and chart are
    /// left exactly as they were. No retry.
    pub fn refresh(&mut self, source: &dyn RecordSource) -> FetchResult<usize> {
        match source.fetch_all() {
            Ok(records) => {
                let count = records.len();
                tracing::info!(source = %source.describe(), records = count, "records fetched");
                self.replace_records(records);
                Ok(count)
            }
            Err(e) => {
                tracing::error!(
                    source = %source.describe(),
                    error = %e,
                    "record fetch failed; keeping previous records"
                );
                Err(e)
            }
        }
    }

    /// Replace the record sequence wholesale and rebuild.
    pub fn replace_records(&mut self, records: Vec<PatientRecord>) {
        self.records = records;
        self.rebuild();
    }

    /// Update one biomarker's range and rebuild.
    pub fn set_range(&mut self, name: &str, range: BiomarkerRange) -> RangeResult<RangeUpdate> {
        let update = self.registry.set(name, range)?;
        self.rebuild();
        Ok(update)
    }

    pub fn get_range(&self, name: &str) -> RangeResult<BiomarkerRange> {
        self.registry.get(name)
    }

    pub fn registry(&self) -> &RangeRegistry {
        &self.registry
    }

    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    pub fn chart(&self) -> &ChartDocument {
        &self.chart
    }

    /// Number of rebuilds since the session started.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn rebuild(&mut self) {
        self.chart = ChartDocument::build(&self.title, &self.records, &self.registry);
        self.revision += 1;
        tracing::debug!(
            revision = self.revision,
            series = self.chart.series.len(),
            records = self.records.len(),
            "chart rebuilt"
        );
    }
}
