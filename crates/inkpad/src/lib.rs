//! Inkpad - freehand ink capture and rendering
//!
//! This crate turns pointer input (mouse, touch, stylus) into smoothed,
//! variable-width ink on a raster surface while keeping a lossless,
//! replayable vector record of everything drawn:
//! - [`point`] - validated input samples
//! - [`bezier`] - curve segments and the smoothing control-point solver
//! - [`state`] - per-stroke sliding window, velocity and width tracking
//! - [`throttle`] - trailing-edge input coalescing
//! - [`events`] - stroke lifecycle notifications
//! - [`store`] - the replayable point-group record
//! - [`surface`] / [`raster`] - CPU raster surface and curve tessellation
//! - [`export`] - bitmap/vector export and bitmap import
//! - [`pad`] - the [`InkPad`] façade tying it all together

pub mod bezier;
pub mod constants;
pub mod events;
pub mod export;
pub mod options;
pub mod pad;
pub mod point;
pub mod raster;
pub mod state;
pub mod store;
pub mod surface;
pub mod throttle;

pub use bezier::*;
pub use constants::*;
pub use events::*;
pub use export::*;
pub use options::*;
pub use pad::*;
pub use point::*;
pub use raster::*;
pub use state::*;
pub use store::*;
pub use surface::*;
pub use throttle::*;
