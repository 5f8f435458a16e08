//! Patient lab-result records.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Biomarker;

/// One lab draw for one patient at one timestamp.
///
/// Serializes to and from the flat object the record API returns, with one
/// numeric field and one `_unit` field per biomarker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireRecord", into = "WireRecord")]
pub struct PatientRecord {
    /// Patient identity; repeated across draws of the same patient
    pub client_id: String,
    /// Draw timestamp, the chart x-axis key
    pub test_date: DateTime<Utc>,
    /// Birth date as supplied by the source (display only)
    pub birth_date: String,
    /// Gender category code
    pub gender: i64,
    /// Ethnicity category code
    pub ethnicity: i64,
    /// Measured values; absent biomarkers were not reported
    pub values: BTreeMap<Biomarker, f64>,
    /// Reported units per biomarker
    pub units: BTreeMap<Biomarker, String>,
}

impl PatientRecord {
    /// Create a record with no measurements.
    pub fn new(client_id: impl Into<String>, test_date: DateTime<Utc>) -> Self {
        Self {
            client_id: client_id.into(),
            test_date,
            birth_date: String::new(),
            gender: 0,
            ethnicity: 0,
            values: BTreeMap::new(),
            units: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, biomarker: Biomarker, value: f64) -> Self {
        self.values.insert(biomarker, value);
        self
    }

    pub fn with_unit(mut self, biomarker: Biomarker, unit: impl Into<String>) -> Self {
        self.units.insert(biomarker, unit.into());
        self
    }

    /// Measured value for a biomarker; NaN is reported as missing.
    pub fn value(&self, biomarker: Biomarker) -> Option<f64> {
        self.values
            .get(&biomarker)
            .copied()
            .filter(|v| !v.is_nan())
    }

    pub fn unit(&self, biomarker: Biomarker) -> Option<&str> {
        self.units.get(&biomarker).map(String::as_str)
    }
}

/// Parse a timestamp as RFC 3339, a naive date-time, or a bare date.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("unrecognized timestamp: {raw:?}"))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WireRecord {
    client_id: String,
    date_testing: String,
    #[serde(default)]
    date_birthdate: String,
    #[serde(default)]
    gender: i64,
    #[serde(default)]
    ethnicity: i64,
    #[serde(default)]
    creatine: Option<f64>,
    #[serde(default)]
    chloride: Option<f64>,
    #[serde(default)]
    fasting_glucose: Option<f64>,
    #[serde(default)]
    potassium: Option<f64>,
    #[serde(default)]
    sodium: Option<f64>,
    #[serde(default)]
    total_calcium: Option<f64>,
    #[serde(default)]
    total_protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    creatine_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chloride_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fasting_glucose_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    potassium_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sodium_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_calcium_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_protein_unit: Option<String>,
}

impl WireRecord {
    fn fields(&self) -> [(Biomarker, Option<f64>, Option<&String>); 7] {
        [
            (Biomarker::Creatine, self.creatine, self.creatine_unit.as_ref()),
            (Biomarker::Chloride, self.chloride, self.chloride_unit.as_ref()),
            (
                Biomarker::FastingGlucose,
                self.fasting_glucose,
                self.fasting_glucose_unit.as_ref(),
            ),
            (Biomarker::Potassium, self.potassium, self.potassium_unit.as_ref()),
            (Biomarker::Sodium, self.sodium, self.sodium_unit.as_ref()),
            (
                Biomarker::TotalCalcium,
                self.total_calcium,
                self.total_calcium_unit.as_ref(),
            ),
            (
                Biomarker::TotalProtein,
                self.total_protein,
                self.total_protein_unit.as_ref(),
            ),
        ]
    }

    fn slots(&mut self, biomarker: Biomarker) -> (&mut Option<f64>, &mut Option<String>) {
        match biomarker {
            Biomarker::Creatine => (&mut self.creatine, &mut self.creatine_unit),
            Biomarker::Chloride => (&mut self.chloride, &mut self.chloride_unit),
            Biomarker::FastingGlucose => {
                (&mut self.fasting_glucose, &mut self.fasting_glucose_unit)
            }
            Biomarker::Potassium => (&mut self.potassium, &mut self.potassium_unit),
            Biomarker::Sodium => (&mut self.sodium, &mut self.sodium_unit),
            Biomarker::TotalCalcium => (&mut self.total_calcium, &mut self.total_calcium_unit),
            Biomarker::TotalProtein => (&mut self.total_protein, &mut self.total_protein_unit),
        }
    }
}

impl TryFrom<WireRecord> for PatientRecord {
    type Error = String;

    fn try_from(wire: WireRecord) -> Result<Self, Self::Error> {
        let test_date = parse_timestamp(&wire.date_testing)?;
        let mut values = BTreeMap::new();
        let mut units = BTreeMap::new();
        for (biomarker, value, unit) in wire.fields() {
            if let Some(value) = value {
                values.insert(biomarker, value);
            }
            if let Some(unit) = unit {
                units.insert(biomarker, unit.clone());
            }
        }
        Ok(Self {
            client_id: wire.client_id,
            test_date,
            birth_date: wire.date_birthdate,
            gender: wire.gender,
            ethnicity: wire.ethnicity,
            values,
            units,
        })
    }
}

impl From<PatientRecord> for WireRecord {
    fn from(record: PatientRecord) -> Self {
        let mut wire = WireRecord {
            client_id: record.client_id,
            date_testing: record.test_date.to_rfc3339(),
            date_birthdate: record.birth_date,
            gender: record.gender,
            ethnicity: record.ethnicity,
            ..WireRecord::default()
        };
        for (biomarker, value) in record.values {
            *wire.slots(biomarker).0 = Some(value);
        }
        for (biomarker, unit) in record.units {
            *wire.slots(biomarker).1 = Some(unit);
        }
        wire
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_api_record() {
        let json = r#"{
            "client_id": "c-001",
            "date_testing": "2024-01-02",
            "date_birthdate": "1980-05-17",
            "gender": 1,
            "ethnicity": 3,
            "creatine": 1.0,
            "sodium": null,
            "creatine_unit": "mg/dL",
            "extra_field": true
        }"#;

        let record: PatientRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.client_id, "c-001");
        assert_eq!(record.test_date.day(), 2);
        assert_eq!(record.birth_date, "1980-05-17");
        assert_eq!(record.ethnicity, 3);
        assert_eq!(record.value(Biomarker::Creatine), Some(1.0));
        assert_eq!(record.value(Biomarker::Sodium), None);
        assert_eq!(record.value(Biomarker::Chloride), None);
        assert_eq!(record.unit(Biomarker::Creatine), Some("mg/dL"));
    }

    #[test]
    fn test_bad_timestamp_is_rejected() {
        let json = r#"{"client_id": "c-001", "date_testing": "yesterday"}"#;
        assert!(serde_json::from_str::<PatientRecord>(json).is_err());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let ts = parse_timestamp("2024-03-04T10:15:00Z").unwrap();
        assert_eq!(ts.hour(), 10);

        let ts = parse_timestamp("2024-03-04T10:15:00+02:00").unwrap();
        assert_eq!(ts.hour(), 8);

        let ts = parse_timestamp("2024-03-04 10:15:00").unwrap();
        assert_eq!(ts.minute(), 15);

        let ts = parse_timestamp("2024-03-04").unwrap();
        assert_eq!((ts.month(), ts.day(), ts.hour()), (3, 4, 0));
    }

    #[test]
    fn test_nan_reads_as_missing() {
        let ts = parse_timestamp("2024-01-01").unwrap();
        let record = PatientRecord::new("c-001", ts).with_value(Biomarker::Creatine, f64::NAN);
        assert_eq!(record.value(Biomarker::Creatine), None);
    }

    #[test]
    fn test_serializes_flat_wire_shape() {
        let ts = parse_timestamp("2024-01-01").unwrap();
        let record = PatientRecord::new("c-001", ts)
            .with_value(Biomarker::Potassium, 4.2)
            .with_unit(Biomarker::Potassium, "mmol/L");

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["potassium"], 4.2);
        assert_eq!(value["potassium_unit"], "mmol/L");
        assert!(value["sodium"].is_null());

        let back: PatientRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }
}
