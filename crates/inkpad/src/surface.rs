//! CPU raster surface: straight-alpha RGBA f32 pixel store with compositing.

use crate::options::CompositeOperation;

/// Owned pixel buffer the rasterizer paints onto.
///
/// Pixels are straight-alpha RGBA in `0..=1`, row-major. The surface also
/// tracks whether anything has been painted since the last reset, which
/// backs the pad's `is_empty` query.
pub struct Surface {
    width: u32,
    height: u32,
    /// Device pixel ratio; logical size is `width / pixel_ratio`.
    pixel_ratio: f32,
    pixels: Vec<[f32; 4]>,
    blank: bool,
}

impl Surface {
    /// Create a surface of `width` x `height` device pixels, initialized to
    /// transparent black.
    pub fn new(width: u32, height: u32, pixel_ratio: f32) -> Self {
        let count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixel_ratio,
            pixels: vec![[0.0, 0.0, 0.0, 0.0]; count],
            blank: true,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Logical (pixel-ratio-adjusted) dimensions.
    pub fn logical_size(&self) -> (f32, f32) {
        let ratio = self.pixel_ratio.max(1.0);
        (self.width as f32 / ratio, self.height as f32 / ratio)
    }

    /// Fill with a color and forget all painted content.
    pub fn reset(&mut self, color: [f32; 4]) {
        self.pixels.fill(color);
        self.blank = true;
    }

    /// Get a pixel, or None when out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y as usize) * (self.width as usize) + (x as usize)])
    }

    /// Alpha-blend a color onto a pixel; out-of-bounds writes are ignored.
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: [f32; 4], coverage: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        let dst = self.pixels[index];

        let src_alpha = color[3] * coverage;
        let inv_src_alpha = 1.0 - src_alpha;

        self.pixels[index] = [
            color[0] * src_alpha + dst[0] * inv_src_alpha,
            color[1] * src_alpha + dst[1] * inv_src_alpha,
            color[2] * src_alpha + dst[2] * inv_src_alpha,
            src_alpha + dst[3] * inv_src_alpha,
        ];
    }

    /// Fade a pixel toward transparent by `amount` in `0..=1`.
    #[inline]
    pub fn erase_pixel(&mut self, x: u32, y: u32, amount: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        let dst = self.pixels[index];

        let remaining = (1.0 - amount).max(0.0);
        self.pixels[index] = [
            dst[0] * remaining,
            dst[1] * remaining,
            dst[2] * remaining,
            dst[3] * remaining,
        ];
    }

    /// Composite one pixel according to the active operation.
    #[inline]
    pub fn composite_pixel(
        &mut self,
        x: u32,
        y: u32,
        color: [f32; 4],
        coverage: f32,
        operation: CompositeOperation,
    ) {
        match operation {
            CompositeOperation::SourceOver => self.blend_pixel(x, y, color, coverage),
            CompositeOperation::DestinationOut => self.erase_pixel(x, y, color[3] * coverage),
        }
    }

    /// Note that geometry was painted, even if it fell outside the bounds.
    pub fn mark_drawn(&mut self) {
        self.blank = false;
    }

    /// Whether nothing has been painted since creation or the last reset.
    pub fn is_blank(&self) -> bool {
        self.blank
    }

    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    /// Raw pixel bytes, suitable for texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Convert to an 8-bit RGBA image for encoding.
    pub fn to_rgba8(&self) -> image::RgbaImage {
        let mut img = image::RgbaImage::new(self.width, self.height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            let c = self.pixels[(y as usize) * (self.width as usize) + (x as usize)];
            *pixel = image::Rgba([to_u8(c[0]), to_u8(c[1]), to_u8(c[2]), to_u8(c[3])]);
        }
        img
    }

    /// Alpha-blend a decoded image at the given pixel offset.
    pub fn blit_rgba8(&mut self, img: &image::RgbaImage, x_offset: u32, y_offset: u32) {
        for (x, y, pixel) in img.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            let color = [
                r as f32 / 255.0,
                g as f32 / 255.0,
                b as f32 / 255.0,
                a as f32 / 255.0,
            ];
            self.blend_pixel(x + x_offset, y + y_offset, color, 1.0);
        }
        self.blank = false;
    }
}

#[inline]
fn to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
