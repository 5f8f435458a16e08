//! Series builder.
//!
//! Turns the record sequence and a registry snapshot into one styled series
//! per tracked biomarker. Every style decision is made here up front; the
//! presenter only draws what it is handed.
//!
//! Classification is typed and mapped through an exhaustive table:
//!
//! ```text
//! PointState::Measured(InRange)    → circle,   r=4, series color
//! PointState::Measured(OutOfRange) → triangle, r=7, inverted series color
//! PointState::Skipped              → no marker
//!
//! SegmentKind::Gap                 → rgba(0,0,0,0.2), dash [6, 6]
//! SegmentKind::Falling             → series color, solid
//! SegmentKind::Rising              → presenter default
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::color::{Palette, Rgb, Rgba, GAP_COLOR};
use crate::evaluator::{classify_reading, RangeStatus};
use crate::models::{Biomarker, BiomarkerRange, PatientRecord, RangeResult};
use crate::registry::RangeRegistry;

/// Marker radius for in-range points.
pub const NORMAL_RADIUS: f64 = 4.0;
/// Marker radius for out-of-range points.
pub const FLAGGED_RADIUS: f64 = 7.0;
/// Dash pattern (on, off) for gap segments.
pub const GAP_DASH: [u32; 2] = [6, 6];

/// Per-point classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "status")]
pub enum PointState {
    /// Missing or NaN reading; leaves a gap but keeps its x-position
    Skipped,
    Measured(RangeStatus),
}

impl PointState {
    pub fn is_skipped(self) -> bool {
        matches!(self, PointState::Skipped)
    }

    pub fn status(self) -> Option<RangeStatus> {
        match self {
            PointState::Skipped => None,
            PointState::Measured(status) => Some(status),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerShape {
    Circle,
    Triangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointStyle {
    pub shape: MarkerShape,
    pub radius: f64,
    pub fill: Rgb,
}

/// Per-segment classification of an adjacent point pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// At least one endpoint is skipped
    Gap,
    /// Value held or increased
    Rising,
    /// Value decreased
    Falling,
}

/// Overrides applied to a segment; `None` fields fall back to the
/// presenter's defaults for the series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SegmentStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgba>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<[u32; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub x: DateTime<Utc>,
    pub y: Option<f64>,
    pub state: PointState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<PointStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSegment {
    /// Index of the first endpoint in `points`; the second is `from + 1`
    pub from: usize,
    pub kind: SegmentKind,
    pub style: SegmentStyle,
}

/// Styled series for one biomarker, ready for the presenter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesDescriptor {
    pub biomarker: Biomarker,
    pub label: String,
    pub color: Rgb,
    pub range: BiomarkerRange,
    /// Bridge missing readings instead of breaking the line
    pub span_gaps: bool,
    pub points: Vec<SeriesPoint>,
    pub segments: Vec<SeriesSegment>,
}

impl SeriesDescriptor {
    pub fn out_of_range_count(&self) -> usize {
        self.points
            .iter()
            .filter(|p| p.state == PointState::Measured(RangeStatus::OutOfRange))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.points.iter().filter(|p| p.state.is_skipped()).count()
    }
}

/// Legend label with the active reference interval.
pub fn series_label(biomarker: Biomarker, range: &BiomarkerRange) -> String {
    format!("{}({})", biomarker.name(), range)
}

/// Marker style for a point; skipped points draw no marker.
pub fn point_style(state: PointState, series_color: Rgb) -> Option<PointStyle> {
    match state {
        PointState::Skipped => None,
        PointState::Measured(RangeStatus::InRange) => Some(PointStyle {
            shape: MarkerShape::Circle,
            radius: NORMAL_RADIUS,
            fill: series_color,
        }),
        PointState::Measured(RangeStatus::OutOfRange) => Some(PointStyle {
            shape: MarkerShape::Triangle,
            radius: FLAGGED_RADIUS,
            fill: series_color.invert(),
        }),
    }
}

/// Classify the segment between two adjacent readings.
///
/// The gap check runs first, so a segment touching a missing reading is a
/// gap even when the surrounding values fall.
pub fn classify_segment(p0: Option<f64>, p1: Option<f64>) -> SegmentKind {
    match (p0, p1) {
        (Some(y0), Some(y1)) if !y0.is_nan() && !y1.is_nan() => {
            if y1 < y0 {
                SegmentKind::Falling
            } else {
                SegmentKind::Rising
            }
        }
        _ => SegmentKind::Gap,
    }
}

pub fn segment_style(kind: SegmentKind, series_color: Rgb) -> SegmentStyle {
    match kind {
        SegmentKind::Gap => SegmentStyle {
            color: Some(GAP_COLOR),
            dash: Some(GAP_DASH),
        },
        SegmentKind::Falling => SegmentStyle {
            color: Some(Rgba::opaque(series_color)),
            dash: None,
        },
        SegmentKind::Rising => SegmentStyle::default(),
    }
}

/// Builds series descriptors against one registry snapshot.
pub struct SeriesBuilder<'a> {
    registry: &'a RangeRegistry,
    palette: Palette,
}

impl<'a> SeriesBuilder<'a> {
    /// Create a builder; the palette is sized to the tracked set.
    pub fn new(registry: &'a RangeRegistry) -> Self {
        Self {
            registry,
            palette: Palette::set1(registry.len()),
        }
    }

    /// One descriptor per tracked biomarker, in tracked order.
    pub fn build(&self, records: &[PatientRecord]) -> Vec<SeriesDescriptor> {
        self.registry
            .iter()
            .enumerate()
            .map(|(index, (biomarker, range))| {
                build_series(biomarker, range, self.palette.color(index), records)
            })
            .collect()
    }

    /// Descriptor for a single tracked biomarker.
    pub fn build_one(
        &self,
        biomarker: Biomarker,
        records: &[PatientRecord],
    ) -> RangeResult<SeriesDescriptor> {
        let range = self.registry.range(biomarker)?;
        let index = self.registry.palette_index(biomarker).unwrap_or_default();
        Ok(build_series(
            biomarker,
            range,
            self.palette.color(index),
            records,
        ))
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

fn build_series(
    biomarker: Biomarker,
    range: BiomarkerRange,
    color: Rgb,
    records: &[PatientRecord],
) -> SeriesDescriptor {
    let points: Vec<SeriesPoint> = records
        .iter()
        .map(|record| {
            let y = record.value(biomarker);
            let state = match classify_reading(y, &range) {
                Some(status) => PointState::Measured(status),
                None => PointState::Skipped,
            };
            SeriesPoint {
                x: record.test_date,
                y,
                state,
                style: point_style(state, color),
            }
        })
        .collect();

    let segments = points
        .windows(2)
        .enumerate()
        .map(|(from, pair)| {
            let kind = classify_segment(pair[0].y, pair[1].y);
            SeriesSegment {
                from,
                kind,
                style: segment_style(kind, color),
            }
        })
        .collect();

    SeriesDescriptor {
        biomarker,
        label: series_label(biomarker, &range),
        color,
        range,
        span_gaps: true,
        points,
        segments,
    }
}
