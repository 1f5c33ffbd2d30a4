//! Per-stroke mutable state: the sliding point window and width tracking.

use crate::bezier::{CurveSegment, WidthPair};
use crate::options::GroupStyle;
use crate::point::Point;

/// Sliding window of recent committed points plus the running velocity and
/// width, reset at every stroke start.
#[derive(Debug)]
pub struct StrokeState {
    /// At most three points are buffered between calls.
    last_points: Vec<Point>,
    last_velocity: f32,
    last_width: f32,
}

impl StrokeState {
    /// Fresh state for a stroke drawn with `style`.
    pub fn new(style: &GroupStyle) -> Self {
        Self {
            last_points: Vec::with_capacity(4),
            last_velocity: 0.0,
            last_width: (style.min_width + style.max_width) / 2.0,
        }
    }

    /// Reset for a new stroke, reseeding the width to the configured
    /// midpoint.
    pub fn reset(&mut self, style: &GroupStyle) {
        self.last_points.clear();
        self.last_velocity = 0.0;
        self.last_width = (style.min_width + style.max_width) / 2.0;
    }

    /// Push a committed point; returns a segment once three points are
    /// buffered.
    ///
    /// When the window first reaches three points, the initial point is
    /// duplicated at the front so the first segment has a defined tangent.
    /// The emitted segment always spans the two middle points of the
    /// four-point window.
    pub fn add_point(&mut self, point: Point, style: &GroupStyle) -> Option<CurveSegment> {
        self.last_points.push(point);
        if self.last_points.len() <= 2 {
            return None;
        }
        if self.last_points.len() == 3 {
            let first = self.last_points[0];
            self.last_points.insert(0, first);
        }
        let widths = self.curve_widths(style);
        let segment = CurveSegment::from_window(&self.last_points, widths);
        self.last_points.remove(0);
        Some(segment)
    }

    /// Width pair for the segment between the middle window points.
    ///
    /// The end width follows the exponentially filtered velocity; the start
    /// width is carried over from the previous segment for continuity.
    fn curve_widths(&mut self, style: &GroupStyle) -> WidthPair {
        let start = &self.last_points[1];
        let end = &self.last_points[2];
        let velocity = style.velocity_filter_weight * end.velocity_from(start)
            + (1.0 - style.velocity_filter_weight) * self.last_velocity;
        let end_width = stroke_width(velocity, style);
        let widths = WidthPair {
            start: self.last_width,
            end: end_width,
        };
        self.last_velocity = velocity;
        self.last_width = end_width;
        widths
    }
}

/// Width for a filtered velocity: fast strokes thin out, bounded to the
/// configured range even for negative speeds from out-of-order timestamps.
fn stroke_width(velocity: f32, style: &GroupStyle) -> f32 {
    (style.max_width / (velocity + 1.0))
        .max(style.min_width)
        .min(style.max_width)
}
