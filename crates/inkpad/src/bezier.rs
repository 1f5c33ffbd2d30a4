//! Cubic Bezier segments and the smoothing control-point solver.

use glam::Vec2;

use crate::constants::ARC_LENGTH_STEPS;
use crate::point::Point;

/// Start and end widths for one curve segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidthPair {
    pub start: f32,
    pub end: f32,
}

/// One cubic Bezier arc between two consecutive committed points.
///
/// `control1` is the outgoing control at `start`, `control2` the incoming
/// control at `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSegment {
    pub start: Vec2,
    pub control1: Vec2,
    pub control2: Vec2,
    pub end: Vec2,
    pub start_width: f32,
    pub end_width: f32,
}

impl CurveSegment {
    /// Build the segment between `window[1]` and `window[2]` of a four-point
    /// window.
    ///
    /// The outer window points only shape the tangents: the outgoing control
    /// comes from the `(w0, w1, w2)` triple and the incoming control from
    /// `(w1, w2, w3)`.
    pub fn from_window(window: &[Point], widths: WidthPair) -> Self {
        debug_assert_eq!(window.len(), 4);
        let (_, control1) = control_points(window[0].pos(), window[1].pos(), window[2].pos());
        let (control2, _) = control_points(window[1].pos(), window[2].pos(), window[3].pos());
        Self {
            start: window[1].pos(),
            control1,
            control2,
            end: window[2].pos(),
            start_width: widths.start,
            end_width: widths.end,
        }
    }

    /// Evaluate the curve position at parameter `t` in `0..=1`.
    pub fn point_at(&self, t: f32) -> Vec2 {
        let u = 1.0 - t;
        self.start * (u * u * u)
            + self.control1 * (3.0 * u * u * t)
            + self.control2 * (3.0 * u * t * t)
            + self.end * (t * t * t)
    }

    /// Approximate arc length by sampling a short polyline.
    pub fn length(&self) -> f32 {
        let mut length = 0.0;
        let mut prev = self.start;
        for i in 1..=ARC_LENGTH_STEPS {
            let t = i as f32 / ARC_LENGTH_STEPS as f32;
            let next = self.point_at(t);
            length += prev.distance(next);
            prev = next;
        }
        length
    }

    /// Whether every coordinate is finite.
    ///
    /// Zero-length chords at stroke boundaries produce NaN control points;
    /// such segments must be skipped, not painted.
    pub fn is_finite(&self) -> bool {
        self.start.is_finite()
            && self.control1.is_finite()
            && self.control2.is_finite()
            && self.end.is_finite()
    }
}

/// Derive the smoothing control pair around `p1`.
///
/// The midpoints of the two chords are blended by chord-length ratio and the
/// pair is shifted so the blend lands on `p1`, which keeps consecutive
/// segments tangent at their shared point. Returns `(incoming, outgoing)`
/// controls for `p1`. When `p0 == p1` (the duplicated point at a stroke
/// start) the construction degenerates to a straight initial tangent.
pub fn control_points(p0: Vec2, p1: Vec2, p2: Vec2) -> (Vec2, Vec2) {
    let m1 = (p0 + p1) / 2.0;
    let m2 = (p1 + p2) / 2.0;
    let l1 = p0.distance(p1);
    let l2 = p1.distance(p2);
    // NaN when both chords are zero-length; callers skip such segments.
    let k = l2 / (l1 + l2);
    let blend = m2 + (m1 - m2) * k;
    let offset = p1 - blend;
    (m1 + offset, m2 + offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f32, y: f32, time: u64) -> Point {
        Point::new(x, y, 0.0, time).unwrap()
    }

    #[test]
    fn test_control_points_collinear() {
        let (c1, c2) = control_points(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(20.0, 0.0),
        );
        // Equal chords on a line leave the midpoints untouched.
        assert!((c1 - Vec2::new(5.0, 0.0)).length() < 1e-4);
        assert!((c2 - Vec2::new(15.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_segment_spans_middle_window_points() {
        let window = [
            point(0.0, 0.0, 0),
            point(10.0, 0.0, 10),
            point(20.0, 0.0, 20),
            point(30.0, 0.0, 30),
        ];
        let segment = CurveSegment::from_window(
            &window,
            WidthPair {
                start: 1.0,
                end: 2.0,
            },
        );
        assert_eq!(segment.start, Vec2::new(10.0, 0.0));
        assert_eq!(segment.end, Vec2::new(20.0, 0.0));
        assert_eq!(segment.point_at(0.0), segment.start);
        assert_eq!(segment.point_at(1.0), segment.end);
    }

    #[test]
    fn test_duplicated_first_point_gives_straight_tangent() {
        let window = [
            point(0.0, 0.0, 0),
            point(0.0, 0.0, 0),
            point(10.0, 0.0, 10),
            point(20.0, 0.0, 20),
        ];
        let segment = CurveSegment::from_window(
            &window,
            WidthPair {
                start: 1.5,
                end: 1.5,
            },
        );
        assert!(segment.is_finite());
        // Controls stay on the chord, so the initial tangent is straight.
        assert!(segment.control1.y.abs() < 1e-4);
        assert!(segment.control2.y.abs() < 1e-4);
    }

    #[test]
    fn test_length_of_straight_segment_matches_chord() {
        let window = [
            point(0.0, 0.0, 0),
            point(10.0, 0.0, 10),
            point(20.0, 0.0, 20),
            point(30.0, 0.0, 30),
        ];
        let segment = CurveSegment::from_window(
            &window,
            WidthPair {
                start: 1.0,
                end: 1.0,
            },
        );
        assert!((segment.length() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_zero_length_chords_are_not_finite() {
        let p = point(5.0, 5.0, 0);
        let window = [p, p, p, p];
        let segment = CurveSegment::from_window(
            &window,
            WidthPair {
                start: 1.0,
                end: 1.0,
            },
        );
        assert!(!segment.is_finite());
    }
}
