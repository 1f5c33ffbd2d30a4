//! Tessellation of curve segments into stamped disks on the surface.

use glam::Vec2;
use tracing::debug;

use crate::bezier::CurveSegment;
use crate::constants::TESSELLATION_DENSITY;
use crate::options::GroupStyle;
use crate::store::{PointRecord, ReplaySink};
use crate::surface::Surface;

/// Paints curve segments and dots onto an owned surface.
///
/// The surface is an explicit capability: one rasterizer, one surface, no
/// global drawing state.
pub struct Rasterizer {
    surface: Surface,
}

impl Rasterizer {
    pub fn new(surface: Surface) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Clear to a background color.
    pub fn clear(&mut self, background: [f32; 4]) {
        self.surface.reset(background);
    }

    /// Tessellate and paint one curve segment.
    ///
    /// The step count scales with arc length, bounding per-segment cost.
    /// The disk radius follows the cubic parametric weight between the
    /// start and end widths, so the taper matches the curve's own
    /// parametrization. All disks of a segment land in one coverage mask
    /// composited in a single pass, which keeps translucent ink free of
    /// overlap seams.
    pub fn draw_curve(&mut self, segment: &CurveSegment, style: &GroupStyle) {
        if !segment.is_finite() {
            debug!("draw_curve: skipping segment with non-finite control points");
            return;
        }
        let steps = (TESSELLATION_DENSITY * segment.length().ceil()) as u32;
        if steps == 0 {
            return;
        }
        let delta = segment.end_width - segment.start_width;
        let mut mask = CoverageMask::new();
        for i in 0..steps {
            let t = i as f32 / steps as f32;
            let ttt = t * t * t;
            let center = segment.point_at(t);
            let radius = (segment.start_width + ttt * delta).min(style.max_width);
            mask.stamp(center, radius);
        }
        mask.composite(&mut self.surface, style);
        self.surface.mark_drawn();
    }

    /// Paint a single-point stroke as one filled disk.
    pub fn draw_dot(&mut self, record: &PointRecord, style: &GroupStyle) {
        let mut mask = CoverageMask::new();
        mask.stamp(Vec2::new(record.x, record.y), style.dot_radius());
        mask.composite(&mut self.surface, style);
        self.surface.mark_drawn();
    }
}

impl ReplaySink for Rasterizer {
    fn curve(&mut self, segment: &CurveSegment, style: &GroupStyle) {
        self.draw_curve(segment, style);
    }

    fn dot(&mut self, record: &PointRecord, style: &GroupStyle) {
        self.draw_dot(record, style);
    }
}

/// Scratch coverage for one fill pass.
///
/// Disks are collected first, then rasterized into a bounded mask with
/// max-coverage accumulation and composited pixel by pixel. Overlapping
/// disks therefore blend with the surface exactly once.
struct CoverageMask {
    disks: Vec<(Vec2, f32)>,
}

impl CoverageMask {
    fn new() -> Self {
        Self { disks: Vec::new() }
    }

    fn stamp(&mut self, center: Vec2, radius: f32) {
        if center.is_finite() && radius.is_finite() {
            self.disks.push((center, radius.max(0.0)));
        }
    }

    fn composite(&self, surface: &mut Surface, style: &GroupStyle) {
        if self.disks.is_empty() {
            return;
        }

        let mut min = Vec2::splat(f32::MAX);
        let mut max = Vec2::splat(f32::MIN);
        for (center, radius) in &self.disks {
            let reach = radius + 0.5;
            min = min.min(*center - reach);
            max = max.max(*center + reach);
        }

        let x_min = min.x.floor().max(0.0) as u32;
        let y_min = min.y.floor().max(0.0) as u32;
        let x_max = (max.x.ceil().max(0.0) as u32).min(surface.width());
        let y_max = (max.y.ceil().max(0.0) as u32).min(surface.height());
        if x_min >= x_max || y_min >= y_max {
            return;
        }

        let width = (x_max - x_min) as usize;
        let height = (y_max - y_min) as usize;
        let mut coverage = vec![0.0f32; width * height];

        for (center, radius) in &self.disks {
            let reach = radius + 0.5;
            let sx = ((center.x - reach).floor().max(0.0) as u32).clamp(x_min, x_max);
            let ex = ((center.x + reach).ceil().max(0.0) as u32).clamp(x_min, x_max);
            let sy = ((center.y - reach).floor().max(0.0) as u32).clamp(y_min, y_max);
            let ey = ((center.y + reach).ceil().max(0.0) as u32).clamp(y_min, y_max);
            for py in sy..ey {
                for px in sx..ex {
                    let pixel_center = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                    // Half-pixel antialiased edge.
                    let cov = (radius - pixel_center.distance(*center) + 0.5).clamp(0.0, 1.0);
                    if cov > 0.0 {
                        let index = (py - y_min) as usize * width + (px - x_min) as usize;
                        if cov > coverage[index] {
                            coverage[index] = cov;
                        }
                    }
                }
            }
        }

        for py in y_min..y_max {
            for px in x_min..x_max {
                let cov = coverage[(py - y_min) as usize * width + (px - x_min) as usize];
                if cov > 0.0 {
                    surface.composite_pixel(
                        px,
                        py,
                        style.pen_color,
                        cov,
                        style.composite_operation,
                    );
                }
            }
        }
    }
}
