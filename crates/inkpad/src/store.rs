//! The canonical vector record of everything drawn, and its replay engine.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bezier::CurveSegment;
use crate::options::GroupStyle;
use crate::point::{InvalidPointError, Point};
use crate::state::StrokeState;

/// A committed point as stored and serialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub x: f32,
    pub y: f32,
    pub pressure: f32,
    pub time: u64,
}

impl From<Point> for PointRecord {
    fn from(point: Point) -> Self {
        Self {
            x: point.x,
            y: point.y,
            pressure: point.pressure,
            time: point.time,
        }
    }
}

/// One stroke: a style snapshot plus its ordered committed points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointGroup {
    pub style: GroupStyle,
    pub points: Vec<PointRecord>,
}

/// Ordered sequence of point groups; insertion order is draw order, which
/// also fixes the z-order of overlapping ink.
///
/// The raster surface is derived state: it can always be rebuilt from this
/// record plus the background color.
#[derive(Debug, Default)]
pub struct StrokeStore {
    groups: Vec<PointGroup>,
}

impl StrokeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> &[PointGroup] {
        &self.groups
    }

    /// Defensive copy for external consumers.
    pub fn to_vec(&self) -> Vec<PointGroup> {
        self.groups.clone()
    }

    /// Start a new group with the given style snapshot.
    pub fn open_group(&mut self, style: GroupStyle) {
        self.groups.push(PointGroup {
            style,
            points: Vec::new(),
        });
    }

    pub fn last_group(&self) -> Option<&PointGroup> {
        self.groups.last()
    }

    /// Append a record to the most recently opened group.
    pub fn push_point(&mut self, record: PointRecord) {
        match self.groups.last_mut() {
            Some(group) => group.points.push(record),
            None => debug!("push_point: no open group, dropping record"),
        }
    }

    /// Last record of the most recently opened group, if any.
    ///
    /// Deliberately does not fall back to earlier groups: the distance
    /// filter must only compare against points of the stroke in progress.
    pub fn last_point(&self) -> Option<&PointRecord> {
        self.groups.last().and_then(|group| group.points.last())
    }

    pub fn extend(&mut self, groups: Vec<PointGroup>) {
        self.groups.extend(groups);
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Consumer of replayed geometry.
///
/// The rasterizer and the vector exporter both implement this, so live
/// drawing and replay share a single add-point/solve code path.
pub trait ReplaySink {
    fn curve(&mut self, segment: &CurveSegment, style: &GroupStyle);
    fn dot(&mut self, record: &PointRecord, style: &GroupStyle);
}

/// Check that every record in every group holds finite coordinates.
pub fn validate_groups(groups: &[PointGroup]) -> Result<(), InvalidPointError> {
    for group in groups {
        for record in &group.points {
            Point::new(record.x, record.y, record.pressure, record.time)?;
        }
    }
    Ok(())
}

/// Drive every group through the same add-point/solve pipeline used for
/// live input.
///
/// The first record of each group is emitted as a dot, exactly as the live
/// pipeline renders the first committed point of a stroke; every derived
/// segment is emitted as a curve. Groups are validated up front so a
/// malformed record cannot leave a half-painted sink.
pub fn replay<S: ReplaySink>(groups: &[PointGroup], sink: &mut S) -> Result<(), InvalidPointError> {
    validate_groups(groups)?;
    for group in groups {
        if group.points.is_empty() {
            debug!("replay: skipping empty point group");
            continue;
        }
        let mut state = StrokeState::new(&group.style);
        for (index, record) in group.points.iter().enumerate() {
            let point = Point::new(record.x, record.y, record.pressure, record.time)?;
            let segment = state.add_point(point, &group.style);
            if index == 0 {
                sink.dot(record, &group.style);
            }
            if let Some(segment) = segment {
                sink.curve(&segment, &group.style);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{resolve_style, PadOptions};

    #[derive(Default)]
    struct CountingSink {
        curves: usize,
        dots: usize,
    }

    impl ReplaySink for CountingSink {
        fn curve(&mut self, _segment: &CurveSegment, _style: &GroupStyle) {
            self.curves += 1;
        }

        fn dot(&mut self, _record: &PointRecord, _style: &GroupStyle) {
            self.dots += 1;
        }
    }

    fn style() -> GroupStyle {
        resolve_style(None, &PadOptions::default())
    }

    fn record(x: f32, y: f32, time: u64) -> PointRecord {
        PointRecord {
            x,
            y,
            pressure: 0.0,
            time,
        }
    }

    fn group(points: Vec<PointRecord>) -> PointGroup {
        PointGroup {
            style: style(),
            points,
        }
    }

    #[test]
    fn test_replay_single_point_group_emits_dot_only() {
        let groups = vec![group(vec![record(5.0, 5.0, 0)])];
        let mut sink = CountingSink::default();
        replay(&groups, &mut sink).unwrap();
        assert_eq!(sink.dots, 1);
        assert_eq!(sink.curves, 0);
    }

    #[test]
    fn test_replay_three_point_group_emits_dot_and_curve() {
        let groups = vec![group(vec![
            record(0.0, 0.0, 0),
            record(10.0, 0.0, 16),
            record(20.0, 0.0, 32),
        ])];
        let mut sink = CountingSink::default();
        replay(&groups, &mut sink).unwrap();
        assert_eq!(sink.dots, 1);
        assert_eq!(sink.curves, 1);
    }

    #[test]
    fn test_replay_two_point_group_still_emits_dot() {
        let groups = vec![group(vec![record(0.0, 0.0, 0), record(10.0, 0.0, 16)])];
        let mut sink = CountingSink::default();
        replay(&groups, &mut sink).unwrap();
        assert_eq!(sink.dots, 1);
        assert_eq!(sink.curves, 0);
    }

    #[test]
    fn test_replay_skips_empty_groups() {
        let groups = vec![group(vec![]), group(vec![record(1.0, 1.0, 0)])];
        let mut sink = CountingSink::default();
        replay(&groups, &mut sink).unwrap();
        assert_eq!(sink.dots, 1);
    }

    #[test]
    fn test_replay_rejects_non_finite_records_before_emitting() {
        let groups = vec![
            group(vec![record(0.0, 0.0, 0)]),
            group(vec![record(f32::NAN, 0.0, 0)]),
        ];
        let mut sink = CountingSink::default();
        assert!(replay(&groups, &mut sink).is_err());
        // Validation happens before any emission.
        assert_eq!(sink.dots, 0);
        assert_eq!(sink.curves, 0);
    }

    #[test]
    fn test_last_point_does_not_cross_groups() {
        let mut store = StrokeStore::new();
        store.open_group(style());
        store.push_point(record(1.0, 1.0, 0));
        store.open_group(style());
        assert!(store.last_point().is_none());
    }

    #[test]
    fn test_serde_round_trip() {
        let groups = vec![group(vec![record(1.0, 2.0, 3), record(10.0, 2.0, 20)])];
        let json = serde_json::to_string(&groups).unwrap();
        let parsed: Vec<PointGroup> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, groups);
    }
}
