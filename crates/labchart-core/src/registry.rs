//! Reference-range registry.
//!
//! Holds the active reference interval per tracked biomarker. The tracked
//! order is fixed at construction and never changes, so palette indices stay
//! stable across range edits.

use crate::models::{Biomarker, BiomarkerRange, RangeError, RangeResult};

/// Outcome of a range edit, consumed by the session as its rebuild signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeUpdate {
    pub biomarker: Biomarker,
    pub previous: BiomarkerRange,
    pub current: BiomarkerRange,
}

impl RangeUpdate {
    pub fn is_change(&self) -> bool {
        self.previous != self.current
    }
}

/// Ordered mapping from tracked biomarker to its current range.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeRegistry {
    entries: Vec<(Biomarker, BiomarkerRange)>,
}

impl Default for RangeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl RangeRegistry {
    /// Track every biomarker with its default range.
    pub fn with_defaults() -> Self {
        Self {
            entries: Biomarker::ALL
                .into_iter()
                .map(|b| (b, b.default_range()))
                .collect(),
        }
    }

    /// Track an explicit subset, in the given order.
    pub fn from_entries<I>(entries: I) -> RangeResult<Self>
    where
        I: IntoIterator<Item = (Biomarker, BiomarkerRange)>,
    {
        let mut registry = Self {
            entries: Vec::new(),
        };
        for (biomarker, range) in entries {
            if registry.position(biomarker).is_some() {
                return Err(RangeError::DuplicateBiomarker(biomarker.name().to_string()));
            }
            registry.entries.push((biomarker, range));
        }
        Ok(registry)
    }

    /// Look up the range for a biomarker by wire name.
    pub fn get(&self, name: &str) -> RangeResult<BiomarkerRange> {
        let biomarker: Biomarker = name.parse()?;
        self.range(biomarker)
    }

    /// Look up the range for a biomarker.
    pub fn range(&self, biomarker: Biomarker) -> RangeResult<BiomarkerRange> {
        self.entries
            .iter()
            .find(|(b, _)| *b == biomarker)
            .map(|(_, r)| *r)
            .ok_or_else(|| RangeError::UnknownBiomarker(biomarker.name().to_string()))
    }

    /// Replace the range for a biomarker by wire name.
    ///
    /// Inverted ranges are stored as given; nothing is in range for them.
    pub fn set(&mut self, name: &str, range: BiomarkerRange) -> RangeResult<RangeUpdate> {
        let biomarker: Biomarker = name.parse()?;
        self.set_range(biomarker, range)
    }

    pub fn set_range(
        &mut self,
        biomarker: Biomarker,
        range: BiomarkerRange,
    ) -> RangeResult<RangeUpdate> {
        let index = self
            .position(biomarker)
            .ok_or_else(|| RangeError::UnknownBiomarker(biomarker.name().to_string()))?;

        if range.is_inverted() {
            tracing::warn!(
                biomarker = biomarker.name(),
                min = range.min,
                max = range.max,
                "inverted reference range accepted; no value will classify as in range"
            );
        }

        let previous = std::mem::replace(&mut self.entries[index].1, range);
        tracing::debug!(
            biomarker = biomarker.name(),
            %previous,
            current = %range,
            "reference range updated"
        );

        Ok(RangeUpdate {
            biomarker,
            previous,
            current: range,
        })
    }

    /// Tracked biomarkers in palette order.
    pub fn list_tracked(&self) -> Vec<Biomarker> {
        self.entries.iter().map(|(b, _)| *b).collect()
    }

    /// Stable palette slot of a tracked biomarker.
    pub fn palette_index(&self, biomarker: Biomarker) -> Option<usize> {
        self.position(biomarker)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Biomarker, BiomarkerRange)> + '_ {
        self.entries.iter().copied()
    }

    fn position(&self, biomarker: Biomarker) -> Option<usize> {
        self.entries.iter().position(|(b, _)| *b == biomarker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_track_everything_in_order() {
        let registry = RangeRegistry::with_defaults();
        assert_eq!(registry.list_tracked(), Biomarker::ALL.to_vec());
        assert_eq!(
            registry.get("creatine").unwrap(),
            BiomarkerRange::new(0.6, 1.2)
        );
    }

    #[test]
    fn test_unknown_name_fails_loudly() {
        let mut registry = RangeRegistry::with_defaults();
        assert_eq!(
            registry.get("hemoglobin"),
            Err(RangeError::UnknownBiomarker("hemoglobin".into()))
        );
        assert!(registry
            .set("hemoglobin", BiomarkerRange::new(12.0, 17.0))
            .is_err());
    }

    #[test]
    fn test_untracked_biomarker_fails() {
        let mut registry = RangeRegistry::from_entries([(
            Biomarker::Sodium,
            Biomarker::Sodium.default_range(),
        )])
        .unwrap();

        assert!(matches!(
            registry.get("potassium"),
            Err(RangeError::UnknownBiomarker(_))
        ));
        assert!(registry
            .set_range(Biomarker::Potassium, BiomarkerRange::new(1.0, 2.0))
            .is_err());
    }

    #[test]
    fn test_set_replaces_only_target() {
        let mut registry = RangeRegistry::with_defaults();
        let update = registry
            .set("creatine", BiomarkerRange::new(1.1, 2.0))
            .unwrap();

        assert_eq!(update.previous, BiomarkerRange::new(0.6, 1.2));
        assert!(update.is_change());
        assert_eq!(registry.get("creatine").unwrap(), BiomarkerRange::new(1.1, 2.0));
        assert_eq!(
            registry.get("sodium").unwrap(),
            Biomarker::Sodium.default_range()
        );
        assert_eq!(registry.list_tracked(), Biomarker::ALL.to_vec());
    }

    #[test]
    fn test_inverted_range_is_accepted() {
        let mut registry = RangeRegistry::with_defaults();
        registry
            .set("sodium", BiomarkerRange::new(150.0, 140.0))
            .unwrap();
        assert!(registry.get("sodium").unwrap().is_inverted());
    }

    #[test]
    fn test_duplicate_entries_rejected() {
        let result = RangeRegistry::from_entries([
            (Biomarker::Sodium, Biomarker::Sodium.default_range()),
            (Biomarker::Sodium, BiomarkerRange::new(1.0, 2.0)),
        ]);
        assert_eq!(result, Err(RangeError::DuplicateBiomarker("sodium".into())));
    }

    #[test]
    fn test_palette_index_follows_tracked_order() {
        let registry = RangeRegistry::from_entries([
            (Biomarker::Sodium, Biomarker::Sodium.default_range()),
            (Biomarker::Creatine, Biomarker::Creatine.default_range()),
        ])
        .unwrap();
        assert_eq!(registry.palette_index(Biomarker::Sodium), Some(0));
        assert_eq!(registry.palette_index(Biomarker::Creatine), Some(1));
        assert_eq!(registry.palette_index(Biomarker::Potassium), None);
    }
}
