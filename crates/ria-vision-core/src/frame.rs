//! Synchronized depth + color frame pair.

use serde::{Deserialize, Serialize};

use crate::{ColorImage, DepthMap};

/// Identity of a captured frame pair, assigned by the capture side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameStamp {
    /// Monotonic sequence number of the synchronized pair.
    pub seq: u64,
}

/// Errors produced when pairing a depth map with a color image.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error(
        "depth ({depth_width}x{depth_height}) and color ({color_width}x{color_height}) dimensions differ"
    )]
    DimensionMismatch {
        depth_width: usize,
        depth_height: usize,
        color_width: usize,
        color_height: usize,
    },
}

/// The latest synchronized depth/color pair.
///
/// Consumers only ever read a `FramePair`; a new arrival replaces it
/// wholesale.
#[derive(Clone, Debug)]
pub struct FramePair {
    stamp: FrameStamp,
    depth: DepthMap,
    color: ColorImage,
}

impl FramePair {
    /// Pair a depth map with a color image of identical dimensions.
    pub fn new(stamp: FrameStamp, depth: DepthMap, color: ColorImage) -> Result<Self, FrameError> {
        if depth.dims() != color.dims() {
            return Err(FrameError::DimensionMismatch {
                depth_width: depth.width(),
                depth_height: depth.height(),
                color_width: color.width(),
                color_height: color.height(),
            });
        }
        Ok(Self {
            stamp,
            depth,
            color,
        })
    }

    #[inline]
    pub fn stamp(&self) -> FrameStamp {
        self.stamp
    }

    #[inline]
    pub fn depth(&self) -> &DepthMap {
        &self.depth
    }

    #[inline]
    pub fn color(&self) -> &ColorImage {
        &self.color
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.depth.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.depth.height()
    }

    /// Image center `(cx, cy) = (width / 2, height / 2)`.
    #[inline]
    pub fn center(&self) -> (usize, usize) {
        (self.width() / 2, self.height() / 2)
    }

    /// Depth sample at the image center, in millimeters.
    pub fn center_depth(&self) -> u16 {
        let (cx, cy) = self.center();
        // center is always inside a non-empty grid
        self.depth.get(cy, cx).copied().unwrap_or(0)
    }
}
