//! Record API payload parsing.

use labchart_core::source::{FetchError, FetchResult};
use labchart_core::PatientRecord;
use serde::Deserialize;

/// Object envelope some deployments wrap the record array in.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope {
    Data { data: Vec<PatientRecord> },
    Records { records: Vec<PatientRecord> },
}

/// Parse a record payload: a bare JSON array, or an object carrying the
/// array under `data` or `records`.
pub fn parse_records(payload: &str) -> FetchResult<Vec<PatientRecord>> {
    let trimmed = payload.trim_start();
    match trimmed.chars().next() {
        Some('[') => Ok(serde_json::from_str(trimmed)?),
        Some('{') => {
            let value: serde_json::Value = serde_json::from_str(trimmed)?;
            if value.get("data").is_none() && value.get("records").is_none() {
                return Err(FetchError::InvalidPayload(
                    "object payload has no `data` or `records` array".into(),
                ));
            }
            match serde_json::from_value::<Envelope>(value)? {
                Envelope::Data { data } => Ok(data),
                Envelope::Records { records } => Ok(records),
            }
        }
        _ => Err(FetchError::InvalidPayload(
            "payload is not a JSON array or object".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labchart_core::Biomarker;

    const RECORD: &str = r#"{"client_id":"c-001","date_testing":"2024-01-01","date_birthdate":"1980-05-17","gender":1,"ethnicity":2,"sodium":141.0,"sodium_unit":"mmol/L"}"#;

    #[test]
    fn test_parse_bare_array() {
        let records = parse_records(&format!("[{RECORD},{RECORD}]")).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].value(Biomarker::Sodium), Some(141.0));
    }

    #[test]
    fn test_parse_envelopes() {
        let records = parse_records(&format!(r#"{{"data":[{RECORD}]}}"#)).unwrap();
        assert_eq!(records.len(), 1);

        let records = parse_records(&format!(r#"  {{"records":[{RECORD}]}}"#)).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_records("[]").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_other_shapes() {
        assert!(matches!(
            parse_records(r#"{"items":[]}"#),
            Err(FetchError::InvalidPayload(_))
        ));
        assert!(matches!(
            parse_records("<html>502</html>"),
            Err(FetchError::InvalidPayload(_))
        ));
        assert!(matches!(parse_records("[{]"), Err(FetchError::Parse(_))));
    }

    #[test]
    fn test_rejects_bad_record() {
        let bad = r#"[{"client_id":"c-001","date_testing":"not a date"}]"#;
        assert!(matches!(parse_records(bad), Err(FetchError::Parse(_))));
    }
}
