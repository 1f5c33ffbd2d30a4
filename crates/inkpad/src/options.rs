//! Pad configuration and per-stroke style resolution.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_WIDTH, DEFAULT_MIN_DISTANCE, DEFAULT_MIN_WIDTH, DEFAULT_PEN_COLOR,
    DEFAULT_THROTTLE_MS, DEFAULT_VELOCITY_FILTER_WEIGHT, TRANSPARENT,
};

/// How ink is composited onto existing surface content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CompositeOperation {
    /// Alpha-blend over existing content.
    #[default]
    #[serde(rename = "source-over")]
    SourceOver,
    /// Erase existing content where ink lands.
    #[serde(rename = "destination-out")]
    DestinationOut,
}

/// Pad-wide configuration, accepted at construction and re-readable.
#[derive(Debug, Clone)]
pub struct PadOptions {
    /// Exponential smoothing weight for the velocity filter (`0..=1`).
    pub velocity_filter_weight: f32,
    /// Lower bound for stroke width in pixels.
    pub min_width: f32,
    /// Upper bound for stroke width in pixels.
    pub max_width: f32,
    /// Input coalescing window in milliseconds; 0 disables throttling.
    pub throttle_ms: u64,
    /// Samples closer than this to the last committed point are dropped.
    pub min_distance: f32,
    /// Radius for single-point strokes; 0 falls back to the width midpoint.
    pub dot_size: f32,
    /// Ink color, straight-alpha RGBA in `0..=1`.
    pub pen_color: [f32; 4],
    /// Background painted on clear.
    pub background_color: [f32; 4],
    pub composite_operation: CompositeOperation,
    /// Device pixel ratio of the backing surface.
    pub pixel_ratio: f32,
}

impl Default for PadOptions {
    fn default() -> Self {
        Self {
            velocity_filter_weight: DEFAULT_VELOCITY_FILTER_WEIGHT,
            min_width: DEFAULT_MIN_WIDTH,
            max_width: DEFAULT_MAX_WIDTH,
            throttle_ms: DEFAULT_THROTTLE_MS,
            min_distance: DEFAULT_MIN_DISTANCE,
            dot_size: 0.0,
            pen_color: DEFAULT_PEN_COLOR,
            background_color: TRANSPARENT,
            composite_operation: CompositeOperation::default(),
            pixel_ratio: 1.0,
        }
    }
}

/// Per-stroke style overrides; `None` fields fall back to the pad defaults.
#[derive(Debug, Clone, Default)]
pub struct StyleOverride {
    pub pen_color: Option<[f32; 4]>,
    pub dot_size: Option<f32>,
    pub min_width: Option<f32>,
    pub max_width: Option<f32>,
    pub velocity_filter_weight: Option<f32>,
    pub composite_operation: Option<CompositeOperation>,
}

/// Style attributes frozen per stroke and stored with its point group.
///
/// Captured at stroke start so later configuration changes do not
/// retroactively restyle committed strokes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupStyle {
    pub pen_color: [f32; 4],
    pub dot_size: f32,
    pub min_width: f32,
    pub max_width: f32,
    pub velocity_filter_weight: f32,
    pub composite_operation: CompositeOperation,
}

impl GroupStyle {
    /// Radius of a single-point dot under this style.
    pub fn dot_radius(&self) -> f32 {
        if self.dot_size > 0.0 {
            self.dot_size
        } else {
            (self.min_width + self.max_width) / 2.0
        }
    }
}

/// Merge an optional per-stroke override with the pad defaults.
///
/// This is the single point where style lookup happens; the snapshot is
/// taken once at stroke begin and passed down the pipeline.
pub fn resolve_style(overrides: Option<&StyleOverride>, defaults: &PadOptions) -> GroupStyle {
    let o = overrides.cloned().unwrap_or_default();
    GroupStyle {
        pen_color: o.pen_color.unwrap_or(defaults.pen_color),
        dot_size: o.dot_size.unwrap_or(defaults.dot_size),
        min_width: o.min_width.unwrap_or(defaults.min_width),
        max_width: o.max_width.unwrap_or(defaults.max_width),
        velocity_filter_weight: o
            .velocity_filter_weight
            .unwrap_or(defaults.velocity_filter_weight),
        composite_operation: o
            .composite_operation
            .unwrap_or(defaults.composite_operation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = PadOptions::default();
        assert_eq!(options.velocity_filter_weight, 0.7);
        assert_eq!(options.min_width, 0.5);
        assert_eq!(options.max_width, 2.5);
        assert_eq!(options.throttle_ms, 16);
        assert_eq!(options.min_distance, 5.0);
        assert_eq!(options.dot_size, 0.0);
        assert_eq!(options.composite_operation, CompositeOperation::SourceOver);
    }

    #[test]
    fn test_resolve_style_without_override() {
        let options = PadOptions::default();
        let style = resolve_style(None, &options);
        assert_eq!(style.pen_color, options.pen_color);
        assert_eq!(style.min_width, options.min_width);
    }

    #[test]
    fn test_resolve_style_with_partial_override() {
        let options = PadOptions::default();
        let overrides = StyleOverride {
            min_width: Some(1.0),
            ..Default::default()
        };
        let style = resolve_style(Some(&overrides), &options);
        assert_eq!(style.min_width, 1.0);
        assert_eq!(style.max_width, options.max_width);
    }

    #[test]
    fn test_dot_radius_fallback() {
        let options = PadOptions::default();
        let mut style = resolve_style(None, &options);
        assert!((style.dot_radius() - 1.5).abs() < 1e-6);
        style.dot_size = 3.0;
        assert_eq!(style.dot_radius(), 3.0);
    }

    #[test]
    fn test_composite_operation_serde_names() {
        let json = serde_json::to_string(&CompositeOperation::DestinationOut).unwrap();
        assert_eq!(json, "\"destination-out\"");
        let parsed: CompositeOperation = serde_json::from_str("\"source-over\"").unwrap();
        assert_eq!(parsed, CompositeOperation::SourceOver);
    }
}
