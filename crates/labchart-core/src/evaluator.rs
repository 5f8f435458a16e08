//! Reference-range classification.

use serde::{Deserialize, Serialize};

use crate::models::BiomarkerRange;

/// Classification of one measured value against its reference range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeStatus {
    InRange,
    OutOfRange,
}

/// Classify a measured value; `InRange` iff `min <= value <= max`.
///
/// NaN never lies inside a range. Callers treating NaN as missing data
/// should go through [`classify_reading`].
pub fn classify(value: f64, range: &BiomarkerRange) -> RangeStatus {
    if range.contains(value) {
        RangeStatus::InRange
    } else {
        RangeStatus::OutOfRange
    }
}

/// Classify an optional reading; missing and NaN values are absent data.
pub fn classify_reading(value: Option<f64>, range: &BiomarkerRange) -> Option<RangeStatus> {
    value
        .filter(|v| !v.is_nan())
        .map(|v| classify(v, range))
}
