//! Saved payload on disk.

use std::path::PathBuf;

use labchart_core::source::{FetchResult, RecordSource};
use labchart_core::PatientRecord;

use crate::payload::parse_records;

/// Reads a previously saved record API payload.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for JsonFileSource {
    fn fetch_all(&self) -> FetchResult<Vec<PatientRecord>> {
        let raw = std::fs::read_to_string(&self.path)?;
        parse_records(&raw)
    }

    fn describe(&self) -> String {
        format!("file({})", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labchart_core::source::FetchError;
    use std::io::Write;

    #[test]
    fn test_reads_payload() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"client_id":"c-001","date_testing":"2024-01-01","potassium":4.1}}]"#
        )
        .unwrap();

        let records = JsonFileSource::new(file.path()).fetch_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].client_id, "c-001");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = JsonFileSource::new("/nonexistent/records.json");
        assert!(matches!(source.fetch_all(), Err(FetchError::Io(_))));
    }
}
