//! Bitmap and vector export, and bitmap import, for the pad surface.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use svg::node::element::{Circle, Path, Rectangle};
use svg::Document;
use thiserror::Error;
use tracing::debug;

use crate::bezier::CurveSegment;
use crate::constants::VECTOR_WIDTH_SCALE;
use crate::options::GroupStyle;
use crate::point::InvalidPointError;
use crate::store::{replay, PointGroup, PointRecord, ReplaySink};
use crate::surface::Surface;

/// Errors raised by export and import operations.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),
    #[error("base64 payload error: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("not a base64 image data URI")]
    InvalidDataUri,
    #[error("invalid stored point: {0}")]
    InvalidPoint(#[from] InvalidPointError),
}

/// Bitmap MIME targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapMime {
    Png,
    Jpeg,
}

impl BitmapMime {
    pub fn as_str(&self) -> &'static str {
        match self {
            BitmapMime::Png => "image/png",
            BitmapMime::Jpeg => "image/jpeg",
        }
    }
}

/// Export target, dispatched by a single `export` call on the pad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExportFormat {
    /// Raster snapshot as a base64 data URI.
    Bitmap {
        mime: BitmapMime,
        /// Encoder quality in `0..=1` (JPEG only).
        quality: Option<f32>,
    },
    /// Scalable vector document as a base64 data URI.
    Vector { include_background: bool },
}

/// Options for the vector document.
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorOptions {
    pub include_background: bool,
}

/// Placement options for imported bitmaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    pub x_offset: u32,
    pub y_offset: u32,
    /// Target width in pixels; the decoded image is resized when set.
    pub width: Option<u32>,
    /// Target height in pixels; the decoded image is resized when set.
    pub height: Option<u32>,
}

/// Encode the surface as a base64 bitmap data URI.
pub(crate) fn encode_bitmap(
    surface: &Surface,
    mime: BitmapMime,
    quality: Option<f32>,
) -> Result<String, ExportError> {
    let rgba = surface.to_rgba8();
    let mut buffer = Vec::new();
    match mime {
        BitmapMime::Png => {
            rgba.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)?;
        }
        BitmapMime::Jpeg => {
            // JPEG carries no alpha channel; flatten over opaque white.
            let flat = flatten_over_white(&rgba);
            let quality = quality
                .map(|q| ((q.clamp(0.0, 1.0) * 100.0).round() as u8).max(1))
                .unwrap_or(92);
            let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buffer), quality);
            flat.write_with_encoder(encoder)?;
        }
    }
    Ok(format!(
        "data:{};base64,{}",
        mime.as_str(),
        STANDARD.encode(&buffer)
    ))
}

/// Wrap a vector document in a base64 data URI.
pub(crate) fn vector_data_uri(document: &str) -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        STANDARD.encode(document.as_bytes())
    )
}

/// Render the stored groups as a scalable vector document.
///
/// The document is sized to the surface's logical dimensions. Element order
/// mirrors store order, preserving z-order.
pub(crate) fn render_vector(
    surface: &Surface,
    groups: &[PointGroup],
    background: [f32; 4],
    options: VectorOptions,
) -> Result<String, ExportError> {
    let (width, height) = surface.logical_size();

    let mut sink = VectorSink {
        elements: Vec::new(),
    };
    replay(groups, &mut sink)?;

    let mut document = Document::new()
        .set("xmlns", "http://www.w3.org/2000/svg")
        .set("xmlns:xlink", "http://www.w3.org/1999/xlink")
        .set("viewBox", format!("0 0 {} {}", width, height))
        .set("width", width)
        .set("height", height);

    if options.include_background && background[3] > 0.0 {
        document = document.add(
            Rectangle::new()
                .set("width", "100%")
                .set("height", "100%")
                .set("fill", css_color(background)),
        );
    }

    for element in sink.elements {
        document = match element {
            VectorElement::Path(path) => document.add(path),
            VectorElement::Circle(circle) => document.add(circle),
        };
    }

    Ok(document.to_string())
}

enum VectorElement {
    Path(Path),
    Circle(Circle),
}

/// Collects vector elements during replay.
struct VectorSink {
    elements: Vec<VectorElement>,
}

impl ReplaySink for VectorSink {
    fn curve(&mut self, segment: &CurveSegment, style: &GroupStyle) {
        if !segment.is_finite() {
            debug!("vector export: skipping segment with non-finite control points");
            return;
        }
        let data = format!(
            "M {:.3},{:.3} C {:.3},{:.3} {:.3},{:.3} {:.3},{:.3}",
            segment.start.x,
            segment.start.y,
            segment.control1.x,
            segment.control1.y,
            segment.control2.x,
            segment.control2.y,
            segment.end.x,
            segment.end.y,
        );
        self.elements.push(VectorElement::Path(
            Path::new()
                .set("d", data)
                .set(
                    "stroke-width",
                    format!("{:.3}", VECTOR_WIDTH_SCALE * segment.end_width),
                )
                .set("stroke", css_color(style.pen_color))
                .set("fill", "none")
                .set("stroke-linecap", "round"),
        ));
    }

    fn dot(&mut self, record: &PointRecord, style: &GroupStyle) {
        self.elements.push(VectorElement::Circle(
            Circle::new()
                .set("r", style.dot_radius())
                .set("cx", record.x)
                .set("cy", record.y)
                .set("fill", css_color(style.pen_color)),
        ));
    }
}

/// Format an RGBA color as a CSS color string.
fn css_color(color: [f32; 4]) -> String {
    let r = (color[0].clamp(0.0, 1.0) * 255.0).round() as u8;
    let g = (color[1].clamp(0.0, 1.0) * 255.0).round() as u8;
    let b = (color[2].clamp(0.0, 1.0) * 255.0).round() as u8;
    let a = color[3].clamp(0.0, 1.0);
    if a >= 1.0 {
        format!("rgb({},{},{})", r, g, b)
    } else {
        format!("rgba({},{},{},{:.3})", r, g, b, a)
    }
}

/// Decode bitmap bytes, resizing to the requested target size.
pub(crate) fn decode_bitmap(
    bytes: &[u8],
    options: &ImportOptions,
) -> Result<image::RgbaImage, ExportError> {
    let decoded = image::load_from_memory(bytes)?.to_rgba8();
    let target_width = options.width.unwrap_or(decoded.width());
    let target_height = options.height.unwrap_or(decoded.height());
    if (target_width, target_height) == decoded.dimensions() {
        return Ok(decoded);
    }
    Ok(image::imageops::resize(
        &decoded,
        target_width,
        target_height,
        image::imageops::FilterType::Triangle,
    ))
}

/// Extract the payload bytes of a `data:*;base64,` URI.
pub(crate) fn parse_data_uri(uri: &str) -> Result<Vec<u8>, ExportError> {
    let payload = uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_mime, payload)| payload)
        .ok_or(ExportError::InvalidDataUri)?;
    Ok(STANDARD.decode(payload)?)
}

fn flatten_over_white(rgba: &image::RgbaImage) -> image::RgbImage {
    let mut rgb = image::RgbImage::new(rgba.width(), rgba.height());
    for (x, y, pixel) in rgb.enumerate_pixels_mut() {
        let src = rgba.get_pixel(x, y).0;
        let alpha = src[3] as f32 / 255.0;
        let blend = |c: u8| (c as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        *pixel = image::Rgb([blend(src[0]), blend(src[1]), blend(src[2])]);
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{resolve_style, PadOptions};

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

    #[test]
    fn test_png_data_uri_prefix() {
        let surface = Surface::new(4, 4, 1.0);
        let uri = encode_bitmap(&surface, BitmapMime::Png, None).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_jpeg_data_uri_prefix() {
        let surface = Surface::new(4, 4, 1.0);
        let uri = encode_bitmap(&surface, BitmapMime::Jpeg, Some(0.8)).unwrap();
        assert!(uri.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_css_color() {
        assert_eq!(css_color([0.0, 0.0, 0.0, 1.0]), "rgb(0,0,0)");
        assert_eq!(css_color([1.0, 0.0, 0.0, 0.5]), "rgba(255,0,0,0.500)");
    }

    #[test]
    fn test_vector_document_contains_dot_circle() {
        let surface = Surface::new(100, 100, 1.0);
        let groups = vec![PointGroup {
            style: style(),
            points: vec![record(5.0, 5.0, 0)],
        }];
        let document = render_vector(
            &surface,
            &groups,
            [0.0; 4],
            VectorOptions {
                include_background: false,
            },
        )
        .unwrap();
        assert!(document.contains("<circle"));
        assert!(!document.contains("<path"));
    }

    #[test]
    fn test_vector_document_contains_stroke_path() {
        let surface = Surface::new(100, 100, 1.0);
        let groups = vec![PointGroup {
            style: style(),
            points: vec![
                record(0.0, 0.0, 0),
                record(10.0, 0.0, 16),
                record(20.0, 0.0, 32),
            ],
        }];
        let document = render_vector(
            &surface,
            &groups,
            [0.0; 4],
            VectorOptions {
                include_background: false,
            },
        )
        .unwrap();
        assert!(document.contains("<path"));
        assert!(document.contains("stroke-linecap"));
    }

    #[test]
    fn test_vector_background_rect() {
        let surface = Surface::new(100, 100, 1.0);
        let opaque_white = [1.0, 1.0, 1.0, 1.0];
        let with = render_vector(
            &surface,
            &[],
            opaque_white,
            VectorOptions {
                include_background: true,
            },
        )
        .unwrap();
        assert!(with.contains("<rect"));
        let without = render_vector(
            &surface,
            &[],
            opaque_white,
            VectorOptions {
                include_background: false,
            },
        )
        .unwrap();
        assert!(!without.contains("<rect"));
    }

    #[test]
    fn test_vector_document_is_sized_logically() {
        let surface = Surface::new(200, 100, 2.0);
        let document = render_vector(&surface, &[], [0.0; 4], VectorOptions::default()).unwrap();
        assert!(document.contains("viewBox=\"0 0 100 50\""));
    }

    #[test]
    fn test_data_uri_round_trip() {
        let bytes = vec![1u8, 2, 3, 4];
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(&bytes));
        assert_eq!(parse_data_uri(&uri).unwrap(), bytes);
    }

    #[test]
    fn test_malformed_data_uri_is_rejected() {
        assert!(matches!(
            parse_data_uri("http://example.com/a.png"),
            Err(ExportError::InvalidDataUri)
        ));
        assert!(matches!(
            parse_data_uri("data:image/png,plain"),
            Err(ExportError::InvalidDataUri)
        ));
    }

    #[test]
    fn test_decode_bitmap_resizes_to_target() {
        let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        img.write_to(
            &mut Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
        let options = ImportOptions {
            width: Some(4),
            height: Some(4),
            ..Default::default()
        };
        let decoded = decode_bitmap(&bytes, &options).unwrap();
        assert_eq!(decoded.dimensions(), (4, 4));
    }

    #[test]
    fn test_decode_bitmap_rejects_garbage() {
        let options = ImportOptions::default();
        assert!(decode_bitmap(b"not an image", &options).is_err());
    }
}
