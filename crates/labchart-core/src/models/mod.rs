//! Domain models for the lab chart.

mod biomarker;
mod record;

pub use biomarker::*;
pub use record::*;
