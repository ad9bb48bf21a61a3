use ria_vision_core::FramePair;
use serde::{Deserialize, Serialize};

use crate::corridor::project_corridor;
use crate::density::corridor_density;
use crate::{CorridorWindow, ObstacleParams, ObstacleParamsError};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Per-frame obstacle classification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleDecision {
    /// Near-pixel density inside the corridor, in `[0, 1]`.
    pub density: f64,
    pub is_obstacle: bool,
    pub window: CorridorWindow,
    pub center_distance_mm: u16,
    pub near_pixels: usize,
    pub population: usize,
    /// The center sample had no return and the whole row was used.
    pub full_frame_fallback: bool,
}

/// Forward-corridor obstacle detector.
///
/// Stateless over frames: the same depth map and parameters always yield the
/// same decision.
#[derive(Clone, Debug)]
pub struct ObstacleDetector {
    params: ObstacleParams,
}

impl ObstacleDetector {
    /// Validate `params` and build a detector.
    pub fn new(params: ObstacleParams) -> Result<Self, ObstacleParamsError> {
        params.validate()?;
        Ok(Self { params })
    }

    #[inline]
    pub fn params(&self) -> &ObstacleParams {
        &self.params
    }

    /// Classify the forward corridor of `frame`.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame), fields(seq = frame.stamp().seq))
    )]
    pub fn detect(&self, frame: &FramePair) -> ObstacleDecision {
        let width = frame.width();
        let center_distance_mm = frame.center_depth();

        let projected = project_corridor(
            center_distance_mm,
            self.params.robot_width_mm,
            &self.params.projection,
            width,
        );
        let full_frame_fallback = projected.is_none();
        let window = projected.unwrap_or_else(|| {
            let (cx, cy) = frame.center();
            log::warn!(
                "frame {}: no depth return at center ({cx}, {cy}), using full-frame corridor [0, {}]",
                frame.stamp().seq,
                width - 1
            );
            CorridorWindow::full(width)
        });

        let stats = corridor_density(frame.depth(), self.params.depth_threshold_mm, window);
        let is_obstacle = stats.density > self.params.density_threshold;

        log::debug!(
            "frame {}: density={:.4} obstacle={} center={}mm corridor=[{}, {}]",
            frame.stamp().seq,
            stats.density,
            is_obstacle,
            center_distance_mm,
            window.left,
            window.right
        );

        ObstacleDecision {
            density: stats.density,
            is_obstacle,
            window,
            center_distance_mm,
            near_pixels: stats.near_pixels,
            population: stats.population,
            full_frame_fallback,
        }
    }
}
