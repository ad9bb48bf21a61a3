//! Core frame types for the ria-vision perception node.
//!
//! This crate holds the synchronized depth/color [`FramePair`] and the pixel
//! grids it is made of. It knows nothing about obstacles or markers; both
//! detectors read frames through the types defined here.

mod frame;
mod grid;
mod image;
mod logger;

pub use frame::{FrameError, FramePair, FrameStamp};
pub use grid::{ColorImage, DepthMap, Grid, GridError, Rgb};
pub use image::{gray_from_color, GrayImage, GrayImageView};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
