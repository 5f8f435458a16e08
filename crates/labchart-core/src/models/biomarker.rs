//! Biomarker identities and reference ranges.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Range and biomarker lookup errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    #[error("Unknown biomarker: {0}")]
    UnknownBiomarker(String),

    #[error("Invalid range for {biomarker}: min {min} > max {max} or bound not finite")]
    InvalidRange {
        biomarker: String,
        min: f64,
        max: f64,
    },

    #[error("Duplicate biomarker: {0}")]
    DuplicateBiomarker(String),
}

pub type RangeResult<T> = Result<T, RangeError>;

/// A lab analyte tracked on the chart.
///
/// Declaration order is the tracked order and drives palette assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biomarker {
    Creatine,
    Chloride,
    FastingGlucose,
    Potassium,
    Sodium,
    TotalCalcium,
    TotalProtein,
}

impl Biomarker {
    /// Every tracked biomarker, in tracked order.
    pub const ALL: [Biomarker; 7] = [
        Biomarker::Creatine,
        Biomarker::Chloride,
        Biomarker::FastingGlucose,
        Biomarker::Potassium,
        Biomarker::Sodium,
        Biomarker::TotalCalcium,
        Biomarker::TotalProtein,
    ];

    /// Wire name used by the record API and in chart labels.
    pub fn name(self) -> &'static str {
        match self {
            Biomarker::Creatine => "creatine",
            Biomarker::Chloride => "chloride",
            Biomarker::FastingGlucose => "fasting_glucose",
            Biomarker::Potassium => "potassium",
            Biomarker::Sodium => "sodium",
            Biomarker::TotalCalcium => "total_calcium",
            Biomarker::TotalProtein => "total_protein",
        }
    }

    /// Clinically plausible adult reference interval used at startup.
    pub fn default_range(self) -> BiomarkerRange {
        match self {
            Biomarker::Creatine => BiomarkerRange::new(0.6, 1.2),
            Biomarker::Chloride => BiomarkerRange::new(96.0, 106.0),
            Biomarker::FastingGlucose => BiomarkerRange::new(70.0, 100.0),
            Biomarker::Potassium => BiomarkerRange::new(3.5, 5.0),
            Biomarker::Sodium => BiomarkerRange::new(135.0, 145.0),
            Biomarker::TotalCalcium => BiomarkerRange::new(8.5, 10.2),
            Biomarker::TotalProtein => BiomarkerRange::new(6.0, 8.3),
        }
    }

    /// Customary unit for the default range (informative only).
    pub fn default_unit(self) -> &'static str {
        match self {
            Biomarker::Creatine
            | Biomarker::FastingGlucose
            | Biomarker::TotalCalcium => "mg/dL",
            Biomarker::Chloride | Biomarker::Potassium | Biomarker::Sodium => "mmol/L",
            Biomarker::TotalProtein => "g/dL",
        }
    }
}

impl fmt::Display for Biomarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Biomarker {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Biomarker::ALL
            .into_iter()
            .find(|b| b.name() == wanted)
            .ok_or_else(|| RangeError::UnknownBiomarker(s.to_string()))
    }
}

/// Inclusive reference interval for one biomarker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiomarkerRange {
    pub min: f64,
    pub max: f64,
}

impl BiomarkerRange {
    /// Build a range without validating the bounds.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Build a range, rejecting `min > max` and non-finite bounds.
    pub fn checked(biomarker: Biomarker, min: f64, max: f64) -> RangeResult<Self> {
        let range = Self::new(min, max);
        range.validate(biomarker)?;
        Ok(range)
    }

    pub fn validate(&self, biomarker: Biomarker) -> RangeResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.is_inverted() {
            return Err(RangeError::InvalidRange {
                biomarker: biomarker.name().to_string(),
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Check if a value lies inside the interval, bounds included.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// An inverted range contains no value at all.
    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }
}

impl fmt::Display for BiomarkerRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}~{}", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("creatine".parse::<Biomarker>().unwrap(), Biomarker::Creatine);
        assert_eq!(
            "Fasting_Glucose".parse::<Biomarker>().unwrap(),
            Biomarker::FastingGlucose
        );
        assert_eq!(
            "glucose".parse::<Biomarker>(),
            Err(RangeError::UnknownBiomarker("glucose".into()))
        );
    }

    #[test]
    fn test_names_round_trip_through_serde() {
        for biomarker in Biomarker::ALL {
            let json = serde_json::to_string(&biomarker).unwrap();
            assert_eq!(json, format!("\"{}\"", biomarker.name()));
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        for biomarker in Biomarker::ALL {
            assert!(biomarker.default_range().validate(biomarker).is_ok());
        }
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = BiomarkerRange::new(0.6, 1.2);
        assert!(range.contains(0.6));
        assert!(range.contains(1.2));
        assert!(!range.contains(1.21));
        assert!(!range.contains(f64::NAN));
    }

    #[test]
    fn test_checked_rejects_inverted() {
        assert!(BiomarkerRange::checked(Biomarker::Sodium, 150.0, 135.0).is_err());
        assert!(BiomarkerRange::checked(Biomarker::Sodium, f64::NAN, 135.0).is_err());
        assert!(BiomarkerRange::checked(Biomarker::Sodium, 135.0, 135.0).is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(BiomarkerRange::new(0.6, 1.2).to_string(), "0.6~1.2");
        assert_eq!(BiomarkerRange::new(135.0, 145.0).to_string(), "135~145");
    }
}
