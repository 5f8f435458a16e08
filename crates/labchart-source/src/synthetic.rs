//! Deterministic synthetic records for demos and tests.
//!
//! Values oscillate around each biomarker's default reference range and
//! regularly leave it, with periodic missing readings so gap styling is
//! exercised.

use chrono::{DateTime, Duration, TimeZone, Utc};
use labchart_core::source::{FetchResult, RecordSource};
use labchart_core::{Biomarker, PatientRecord};

/// Amplitude relative to the half-width of the reference range.
const SWING: f64 = 1.4;

#[derive(Debug, Clone)]
pub struct SyntheticSource {
    pub client_id: String,
    pub birth_date: String,
    pub gender: i64,
    pub ethnicity: i64,
    pub start: DateTime<Utc>,
    /// Number of daily draws
    pub draws: usize,
    /// Every n-th reading of a biomarker is missing; 0 disables gaps
    pub gap_every: usize,
    /// Shifts the oscillation phase so different seeds give different data
    pub seed: u64,
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self {
            client_id: "synthetic-0001".to_string(),
            birth_date: "1975-04-12".to_string(),
            gender: 1,
            ethnicity: 2,
            start: Utc
                .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .single()
                .unwrap_or_default(),
            draws: 30,
            gap_every: 7,
            seed: 0,
        }
    }
}

impl SyntheticSource {
    pub fn new(draws: usize, seed: u64) -> Self {
        Self {
            draws,
            seed,
            ..Self::default()
        }
    }

    pub fn generate(&self) -> Vec<PatientRecord> {
        (0..self.draws).map(|i| self.draw(i)).collect()
    }

    fn draw(&self, i: usize) -> PatientRecord {
        let mut record = PatientRecord::new(
            self.client_id.clone(),
            self.start + Duration::days(i as i64),
        );
        record.birth_date = self.birth_date.clone();
        record.gender = self.gender;
        record.ethnicity = self.ethnicity;

        for (slot, biomarker) in Biomarker::ALL.into_iter().enumerate() {
            record = record.with_unit(biomarker, biomarker.default_unit());
            if self.gap_every > 0 && (i + slot) % self.gap_every == self.gap_every - 1 {
                continue;
            }
            record = record.with_value(biomarker, self.value(biomarker, slot, i));
        }
        record
    }

    fn value(&self, biomarker: Biomarker, slot: usize, i: usize) -> f64 {
        let range = biomarker.default_range();
        let mid = (range.min + range.max) / 2.0;
        let half = (range.max - range.min) / 2.0;
        let phase = slot as f64 * 1.3 + (self.seed % 1_000) as f64 * 0.017;
        let raw = mid + half * SWING * (i as f64 * 0.9 + phase).sin();
        (raw * 100.0).round() / 100.0
    }
}

impl RecordSource for SyntheticSource {
    fn fetch_all(&self) -> FetchResult<Vec<PatientRecord>> {
        Ok(self.generate())
    }

    fn describe(&self) -> String {
        format!("synthetic({} draws, seed {})", self.draws, self.seed)
    }
}
