//! Record API over HTTP.

use labchart_core::source::{FetchError, FetchResult, RecordSource};
use labchart_core::PatientRecord;
use reqwest::blocking::Client;

use crate::payload::parse_records;

/// Fetches the full record sequence with a single GET.
///
/// No retry and no timeout beyond the client defaults.
#[derive(Debug, Clone)]
pub struct HttpRecordSource {
    endpoint: String,
    client: Client,
}

impl HttpRecordSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(endpoint, Client::new())
    }

    pub fn with_client(endpoint: impl Into<String>, client: Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RecordSource for HttpRecordSource {
    fn fetch_all(&self) -> FetchResult<Vec<PatientRecord>> {
        tracing::debug!(endpoint = %self.endpoint, "requesting patient records");
        let response = self
            .client
            .get(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                endpoint: self.endpoint.clone(),
            });
        }

        let body = response
            .text()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        parse_records(&body)
    }

    fn describe(&self) -> String {
        format!("http({})", self.endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_endpoint_is_transport_error() {
        // Port 9 (discard) on loopback refuses connections on test hosts.
        let source = HttpRecordSource::new("http://127.0.0.1:9/patients");
        assert!(matches!(source.fetch_all(), Err(FetchError::Transport(_))));
    }

    #[test]
    fn test_invalid_url_is_transport_error() {
        let source = HttpRecordSource::new("not a url");
        assert!(matches!(source.fetch_all(), Err(FetchError::Transport(_))));
    }
}
