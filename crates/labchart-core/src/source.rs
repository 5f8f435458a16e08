//! Patient record source seam.

use thiserror::Error;

use crate::models::PatientRecord;

/// Record fetch failures.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected status {status} from {endpoint}")]
    Status { status: u16, endpoint: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Supplies the full ordered record sequence on demand.
pub trait RecordSource {
    fn fetch_all(&self) -> FetchResult<Vec<PatientRecord>>;

    /// Short description for logs.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

/// Fixed in-memory record sequence.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<PatientRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<PatientRecord>) -> Self {
        Self { records }
    }
}

impl RecordSource for StaticSource {
    fn fetch_all(&self) -> FetchResult<Vec<PatientRecord>> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("static({} records)", self.records.len())
    }
}
