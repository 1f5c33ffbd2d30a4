//! Input samples and validated point data.

use glam::Vec2;
use thiserror::Error;

/// Error raised when a sample carries non-finite coordinates.
#[derive(Debug, Error)]
#[error("point is invalid: ({x}, {y})")]
pub struct InvalidPointError {
    pub x: f32,
    pub y: f32,
}

/// A raw input sample in surface-local pixel coordinates.
///
/// The caller is responsible for resolving device pixel ratio and attaching
/// a timestamp before handing samples to the pad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSample {
    pub x: f32,
    pub y: f32,
    /// Stylus pressure in `0..=1`, if the device reports it.
    pub pressure: Option<f32>,
    /// Timestamp in milliseconds.
    pub time: u64,
}

impl InputSample {
    pub fn new(x: f32, y: f32, time: u64) -> Self {
        Self {
            x,
            y,
            pressure: None,
            time,
        }
    }

    pub fn with_pressure(x: f32, y: f32, pressure: f32, time: u64) -> Self {
        Self {
            x,
            y,
            pressure: Some(pressure),
            time,
        }
    }
}

/// A validated, immutable point sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    /// Pressure clamped to `0..=1`; 0 when the device reports none.
    pub pressure: f32,
    /// Timestamp in milliseconds.
    pub time: u64,
}

impl Point {
    /// Build a point, rejecting non-finite coordinates.
    pub fn new(x: f32, y: f32, pressure: f32, time: u64) -> Result<Self, InvalidPointError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(InvalidPointError { x, y });
        }
        Ok(Self {
            x,
            y,
            pressure: pressure.clamp(0.0, 1.0),
            time,
        })
    }

    /// Build a point from a raw sample.
    pub fn from_sample(sample: &InputSample) -> Result<Self, InvalidPointError> {
        Self::new(
            sample.x,
            sample.y,
            sample.pressure.unwrap_or(0.0),
            sample.time,
        )
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f32 {
        self.pos().distance(other.pos())
    }

    /// Speed from `other` to `self` in pixels per millisecond.
    ///
    /// Defined as 0 when the timestamps coincide, which trades a momentary
    /// inaccuracy for never dividing by zero.
    pub fn velocity_from(&self, other: &Point) -> f32 {
        let dt = self.time as i64 - other.time as i64;
        if dt == 0 {
            0.0
        } else {
            self.distance_to(other) / dt as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_finite_coordinates() {
        assert!(Point::new(f32::NAN, 0.0, 0.0, 0).is_err());
        assert!(Point::new(0.0, f32::INFINITY, 0.0, 0).is_err());
        assert!(Point::new(1.0, 2.0, 0.0, 0).is_ok());
    }

    #[test]
    fn test_pressure_is_clamped() {
        let point = Point::new(0.0, 0.0, 1.5, 0).unwrap();
        assert_eq!(point.pressure, 1.0);
        let point = Point::new(0.0, 0.0, -0.5, 0).unwrap();
        assert_eq!(point.pressure, 0.0);
    }

    #[test]
    fn test_distance() {
        let a = Point::new(0.0, 0.0, 0.0, 0).unwrap();
        let b = Point::new(3.0, 4.0, 0.0, 0).unwrap();
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_velocity_zero_for_equal_timestamps() {
        let a = Point::new(0.0, 0.0, 0.0, 100).unwrap();
        let b = Point::new(10.0, 0.0, 0.0, 100).unwrap();
        assert_eq!(b.velocity_from(&a), 0.0);
    }

    #[test]
    fn test_velocity_from_elapsed_time() {
        let a = Point::new(0.0, 0.0, 0.0, 0).unwrap();
        let b = Point::new(10.0, 0.0, 0.0, 10).unwrap();
        assert!((b.velocity_from(&a) - 1.0).abs() < 1e-6);
        // Out-of-order timestamps yield a negative speed; width
        // calculation clamps the result.
        assert!(a.velocity_from(&b) < 0.0);
    }

    #[test]
    fn test_sample_without_pressure_defaults_to_zero() {
        let point = Point::from_sample(&InputSample::new(1.0, 2.0, 5)).unwrap();
        assert_eq!(point.pressure, 0.0);
        assert_eq!(point.time, 5);
    }
}
