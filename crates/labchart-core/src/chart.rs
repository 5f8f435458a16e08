//! Chart document handed to the presenter.

use serde::Serialize;

use crate::models::PatientRecord;
use crate::registry::RangeRegistry;
use crate::series::{SeriesBuilder, SeriesDescriptor};

pub const DEFAULT_TITLE: &str = "Patient Data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendPosition {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Hour,
    Day,
}

/// Shared time x-axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeAxis {
    pub unit: TimeUnit,
    pub min_unit: TimeUnit,
    /// `strftime` pattern for tooltip dates
    pub tooltip_format: String,
}

impl Default for TimeAxis {
    fn default() -> Self {
        Self {
            unit: TimeUnit::Day,
            min_unit: TimeUnit::Hour,
            tooltip_format: "%Y-%m-%d".to_string(),
        }
    }
}

/// Hover picks the nearest point along x, including hidden series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interaction {
    pub intersect: bool,
    pub axis: char,
    pub include_invisible: bool,
}

impl Default for Interaction {
    fn default() -> Self {
        Self {
            intersect: false,
            axis: 'x',
            include_invisible: true,
        }
    }
}

/// Everything the presenter needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDocument {
    pub title: String,
    pub legend: LegendPosition,
    pub x_axis: TimeAxis,
    pub interaction: Interaction,
    pub series: Vec<SeriesDescriptor>,
    /// Tooltip footer shared by every series and point
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl ChartDocument {
    /// Build the document for a record sequence and registry snapshot.
    pub fn build(title: &str, records: &[PatientRecord], registry: &RangeRegistry) -> Self {
        Self {
            title: title.to_string(),
            legend: LegendPosition::Top,
            x_axis: TimeAxis::default(),
            interaction: Interaction::default(),
            series: SeriesBuilder::new(registry).build(records),
            footer: chart_footer(records),
        }
    }

    /// An empty chart with no series drawn yet.
    pub fn empty(title: &str) -> Self {
        Self {
            title: title.to_string(),
            legend: LegendPosition::Top,
            x_axis: TimeAxis::default(),
            interaction: Interaction::default(),
            series: Vec::new(),
            footer: None,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Footer text from the first record's demographics.
///
/// Only the first record is consulted, even when the sequence mixes
/// patients.
pub fn chart_footer(records: &[PatientRecord]) -> Option<String> {
    let patient = records.first()?;
    Some(format!(
        "ClientId: {}\nBirthday: {}\nGender: {}, Ethnicity:{}",
        patient.client_id, patient.birth_date, patient.gender, patient.ethnicity
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse_timestamp, Biomarker};

    fn patient(id: &str, day: &str) -> PatientRecord {
        let mut record = PatientRecord::new(id, parse_timestamp(day).unwrap());
        record.birth_date = "1980-05-17".into();
        record.gender = 1;
        record.ethnicity = 2;
        record
    }

    #[test]
    fn test_footer_uses_first_record() {
        let records = vec![
            patient("c-001", "2024-01-01"),
            patient("c-002", "2024-01-02"),
        ];
        assert_eq!(
            chart_footer(&records).unwrap(),
            "ClientId: c-001\nBirthday: 1980-05-17\nGender: 1, Ethnicity:2"
        );
        assert_eq!(chart_footer(&[]), None);
    }

    #[test]
    fn test_document_json_shape() {
        let registry = RangeRegistry::with_defaults();
        let records =
            vec![patient("c-001", "2024-01-01").with_value(Biomarker::Creatine, 1.5)];
        let doc = ChartDocument::build(DEFAULT_TITLE, &records, &registry);

        let value: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(value["title"], "Patient Data");
        assert_eq!(value["legend"], "top");
        assert_eq!(value["x_axis"]["unit"], "day");
        assert_eq!(value["series"].as_array().unwrap().len(), 7);
        assert_eq!(value["series"][0]["label"], "creatine(0.6~1.2)");
        assert_eq!(value["series"][0]["color"], "#e41a1c");
        assert_eq!(value["series"][0]["points"][0]["state"]["status"], "out_of_range");
        assert_eq!(value["series"][0]["points"][0]["style"]["fill"], "#1be5e3");
        assert_eq!(value["series"][1]["points"][0]["state"]["state"], "skipped");
    }

    #[test]
    fn test_empty_document() {
        let doc = ChartDocument::empty(DEFAULT_TITLE);
        assert!(doc.series.is_empty());
        assert!(doc.footer.is_none());
    }
}
