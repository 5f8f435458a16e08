use labchart_core::series::{classify_segment, SeriesBuilder};
use labchart_core::{
    classify, Biomarker, BiomarkerRange, PatientRecord, RangeRegistry, RangeStatus, Rgb,
    SegmentKind,
};
use proptest::prelude::*;

fn day(offset: i64) -> chrono::DateTime<chrono::Utc> {
    labchart_core::models::parse_timestamp("2024-01-01").unwrap() + chrono::Duration::days(offset)
}

proptest! {
    #[test]
    fn classify_matches_inclusive_bounds(
        value in -1_000.0f64..1_000.0,
        a in -1_000.0f64..1_000.0,
        b in -1_000.0f64..1_000.0,
    ) {
        let range = BiomarkerRange::new(a.min(b), a.max(b));
        let expected = if range.min <= value && value <= range.max {
            RangeStatus::InRange
        } else {
            RangeStatus::OutOfRange
        };
        prop_assert_eq!(classify(value, &range), expected);
        prop_assert_eq!(classify(range.min, &range), RangeStatus::InRange);
        prop_assert_eq!(classify(range.max, &range), RangeStatus::InRange);
    }

    #[test]
    fn inversion_is_self_inverse(packed in 0u32..=0xFFFFFF) {
        let color = Rgb::new(packed);
        prop_assert_eq!(color.invert().invert(), color);
        prop_assert_eq!(color.invert().packed(), 0xFFFFFF ^ packed);
    }

    #[test]
    fn missing_endpoint_is_always_gap(y in proptest::option::of(-100.0f64..100.0)) {
        prop_assert_eq!(classify_segment(None, y), SegmentKind::Gap);
        prop_assert_eq!(classify_segment(y, None), SegmentKind::Gap);
    }

    #[test]
    fn series_shape_follows_records(
        values in proptest::collection::vec(proptest::option::of(0.0f64..3.0), 0..48)
    ) {
        let records: Vec<PatientRecord> = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let record = PatientRecord::new("c-001", day(i as i64));
                match v {
                    Some(v) => record.with_value(Biomarker::Creatine, *v),
                    None => record,
                }
            })
            .collect();

        let registry = RangeRegistry::with_defaults();
        let series = SeriesBuilder::new(&registry)
            .build_one(Biomarker::Creatine, &records)
            .unwrap();

        prop_assert_eq!(series.points.len(), records.len());
        prop_assert_eq!(series.segments.len(), records.len().saturating_sub(1));
        prop_assert_eq!(series.skipped_count(), values.iter().filter(|v| v.is_none()).count());
        for (point, record) in series.points.iter().zip(&records) {
            prop_assert_eq!(point.x, record.test_date);
        }
    }

    #[test]
    fn range_edit_leaves_other_series_alone(
        target in 0usize..7,
        min in 0.0f64..200.0,
        width in 0.0f64..50.0,
        values in proptest::collection::vec(0.0f64..200.0, 1..16),
    ) {
        let records: Vec<PatientRecord> = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                Biomarker::ALL.into_iter().fold(
                    PatientRecord::new("c-001", day(i as i64)),
                    |record, b| record.with_value(b, *v),
                )
            })
            .collect();

        let mut registry = RangeRegistry::with_defaults();
        let before = SeriesBuilder::new(&registry).build(&records);

        let biomarker = Biomarker::ALL[target];
        registry
            .set(biomarker.name(), BiomarkerRange::new(min, min + width))
            .unwrap();
        let after = SeriesBuilder::new(&registry).build(&records);

        for (index, (old, new)) in before.iter().zip(&after).enumerate() {
            prop_assert_eq!(old.color, new.color);
            if index != target {
                prop_assert_eq!(old, new);
            }
        }
    }
}
