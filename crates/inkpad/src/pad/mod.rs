//! The ink pad: stroke capture, rasterization, storage, and export in one
//! façade.
//!
//! The pad is single-threaded and synchronous: each sampling call runs the
//! full filter / solve / draw / record path to completion before the next
//! one is accepted. The raster surface is derived state; the point-group
//! record is authoritative and the surface can always be rebuilt from it.

mod stroke;

use tracing::debug;

use crate::events::{EventHub, EventKind, PadEvent, SubscriptionToken};
use crate::export::{
    self, BitmapMime, ExportError, ExportFormat, ImportOptions, VectorOptions,
};
use crate::options::{resolve_style, CompositeOperation, PadOptions};
use crate::point::InvalidPointError;
use crate::raster::Rasterizer;
use crate::state::StrokeState;
use crate::store::{replay, validate_groups, PointGroup, StrokeStore};
use crate::surface::Surface;
use crate::throttle::Throttle;

/// A drawing surface with stroke capture, smoothing, and replay.
pub struct InkPad {
    pub(crate) options: PadOptions,
    pub(crate) rasterizer: Rasterizer,
    pub(crate) store: StrokeStore,
    pub(crate) state: StrokeState,
    pub(crate) throttle: Throttle,
    pub(crate) events: EventHub,
    pub(crate) drawing: bool,
}

impl InkPad {
    /// Create a pad with default options.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_options(width, height, PadOptions::default())
    }

    /// Create a pad with explicit options.
    pub fn with_options(width: u32, height: u32, options: PadOptions) -> Self {
        let surface = Surface::new(width, height, options.pixel_ratio);
        let style = resolve_style(None, &options);
        let mut pad = Self {
            rasterizer: Rasterizer::new(surface),
            store: StrokeStore::new(),
            state: StrokeState::new(&style),
            throttle: Throttle::new(options.throttle_ms),
            events: EventHub::new(),
            drawing: false,
            options,
        };
        pad.clear();
        pad
    }

    /// Erase everything: raster, vector record, and per-stroke state.
    pub fn clear(&mut self) {
        debug!("clear: dropping {} stored groups", self.store.len());
        self.rasterizer.clear(self.options.background_color);
        self.store.clear();
        let style = resolve_style(None, &self.options);
        self.state.reset(&style);
        self.throttle.reset();
        self.drawing = false;
    }

    /// Whether anything has been drawn since creation or the last clear.
    pub fn is_empty(&self) -> bool {
        self.rasterizer.surface().is_blank()
    }

    /// Whether a stroke is currently open.
    pub fn is_stroking(&self) -> bool {
        self.drawing
    }

    /// Current configuration.
    pub fn options(&self) -> &PadOptions {
        &self.options
    }

    /// Replace the configuration.
    ///
    /// Committed strokes keep the style they were drawn with; only future
    /// strokes pick up the change. The throttle window is rebuilt.
    pub fn set_options(&mut self, options: PadOptions) {
        self.throttle = Throttle::new(options.throttle_ms);
        self.options = options;
    }

    pub fn set_pen_color(&mut self, color: [f32; 4]) {
        self.options.pen_color = color;
    }

    pub fn set_composite_operation(&mut self, operation: CompositeOperation) {
        self.options.composite_operation = operation;
    }

    /// Read access to the raster surface.
    pub fn surface(&self) -> &Surface {
        self.rasterizer.surface()
    }

    /// Defensive copy of the vector record.
    pub fn to_data(&self) -> Vec<PointGroup> {
        self.store.to_vec()
    }

    /// Rebuild content from a previously exported group sequence.
    ///
    /// Every record is validated before anything is painted, so a malformed
    /// input leaves the pad untouched. With `clear` the existing content is
    /// dropped first; otherwise the groups render over it. Either way the
    /// groups are appended to the store, reproducing the original raster
    /// through the same pipeline used for live input.
    pub fn from_data(
        &mut self,
        groups: Vec<PointGroup>,
        clear: bool,
    ) -> Result<(), InvalidPointError> {
        validate_groups(&groups)?;
        if clear {
            self.clear();
        }
        replay(&groups, &mut self.rasterizer)?;
        self.store.extend(groups);
        Ok(())
    }

    /// Export in the requested format.
    ///
    /// Bitmap formats return a base64 image data URI; the vector format
    /// returns a base64 data URI wrapping the document from
    /// [`to_vector`](Self::to_vector).
    pub fn export(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Bitmap { mime, quality } => {
                export::encode_bitmap(self.rasterizer.surface(), mime, quality)
            }
            ExportFormat::Vector { include_background } => {
                let document = self.to_vector(VectorOptions { include_background })?;
                Ok(export::vector_data_uri(&document))
            }
        }
    }

    /// Raster snapshot as a data URI.
    pub fn to_image(&self, mime: BitmapMime, quality: Option<f32>) -> Result<String, ExportError> {
        self.export(ExportFormat::Bitmap { mime, quality })
    }

    /// Scalable vector document replaying the stored strokes.
    pub fn to_vector(&self, options: VectorOptions) -> Result<String, ExportError> {
        export::render_vector(
            self.rasterizer.surface(),
            self.store.groups(),
            self.options.background_color,
            options,
        )
    }

    /// Paint a decoded bitmap onto the surface.
    ///
    /// The vector record is not touched; per-stroke state is reset. Decode
    /// failures propagate without mutating anything.
    pub fn from_image_data(
        &mut self,
        bytes: &[u8],
        options: ImportOptions,
    ) -> Result<(), ExportError> {
        let image = export::decode_bitmap(bytes, &options)?;
        self.rasterizer
            .surface_mut()
            .blit_rgba8(&image, options.x_offset, options.y_offset);
        let style = resolve_style(None, &self.options);
        self.state.reset(&style);
        Ok(())
    }

    /// Paint a bitmap from a base64 image data URI.
    pub fn from_data_uri(&mut self, uri: &str, options: ImportOptions) -> Result<(), ExportError> {
        let bytes = export::parse_data_uri(uri)?;
        self.from_image_data(&bytes, options)
    }

    /// Listen for stroke lifecycle events.
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionToken
    where
        F: Fn(&PadEvent) -> bool + Send + 'static,
    {
        self.events.subscribe(kind, handler)
    }

    /// Drop a listener.
    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        self.events.unsubscribe(token)
    }
}
