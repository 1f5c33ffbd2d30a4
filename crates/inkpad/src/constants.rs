/// Default exponential smoothing weight for the velocity filter.
pub const DEFAULT_VELOCITY_FILTER_WEIGHT: f32 = 0.7;

/// Default minimum stroke width in pixels.
pub const DEFAULT_MIN_WIDTH: f32 = 0.5;

/// Default maximum stroke width in pixels.
pub const DEFAULT_MAX_WIDTH: f32 = 2.5;

/// Default input coalescing window in milliseconds (0 disables throttling).
pub const DEFAULT_THROTTLE_MS: u64 = 16;

/// Default minimum distance between committed points in pixels.
pub const DEFAULT_MIN_DISTANCE: f32 = 5.0;

/// Polyline samples used to approximate a Bezier arc length.
pub const ARC_LENGTH_STEPS: u32 = 10;

/// Tessellation density: stamped disks per unit of arc length.
pub const TESSELLATION_DENSITY: f32 = 2.0;

/// Stroke width multiplier for vector path output, relative to a segment's
/// end width.
pub const VECTOR_WIDTH_SCALE: f32 = 2.25;

/// Opaque black, the default ink color.
pub const DEFAULT_PEN_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Fully transparent, the default background.
pub const TRANSPARENT: [f32; 4] = [0.0, 0.0, 0.0, 0.0];
