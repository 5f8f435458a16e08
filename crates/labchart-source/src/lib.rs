//! Patient record sources for the lab chart.
//!
//! This crate supplies the concrete [`RecordSource`] implementations the
//! core library fetches from: the record API over HTTP, a saved JSON
//! payload on disk, and a deterministic synthetic generator for demos.
//!
//! [`RecordSource`]: labchart_core::RecordSource

pub mod file;
pub mod http;
pub mod payload;
pub mod synthetic;

pub use file::*;
pub use http::*;
pub use payload::*;
pub use synthetic::*;
