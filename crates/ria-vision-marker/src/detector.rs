use nalgebra::Point2;
use ria_vision_core::{gray_from_color, DepthMap, FramePair};

use crate::geometry::marker_geometry;
use crate::{
    MarkerCandidate, MarkerCorners, MarkerDetectError, MarkerDetection, MarkerLocalizer,
    MarkerObservation,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Marker distance/tilt/alignment detector.
///
/// Only the first candidate of a frame is used; additional candidates are
/// reported by id but not evaluated.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkerDetector;

impl MarkerDetector {
    pub fn new() -> Self {
        Self
    }

    /// Run `localizer` on the grayscale color frame, then [`Self::detect`].
    ///
    /// A localizer failure is returned as [`MarkerDetectError::Localize`]
    /// before any geometry is evaluated.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, frame, localizer), fields(seq = frame.stamp().seq))
    )]
    pub fn locate_and_detect<L: MarkerLocalizer + ?Sized>(
        &self,
        frame: &FramePair,
        localizer: &mut L,
    ) -> Result<MarkerDetection, MarkerDetectError> {
        let gray = gray_from_color(frame.color());
        let candidates = localizer.locate(&gray.view(), frame.stamp())?;
        self.detect(frame, &candidates)
    }

    /// Evaluate the first of `candidates` against `frame`.
    pub fn detect(
        &self,
        frame: &FramePair,
        candidates: &[MarkerCandidate],
    ) -> Result<MarkerDetection, MarkerDetectError> {
        let Some(first) = candidates.first() else {
            return Err(MarkerDetectError::NotFound);
        };
        let candidate_ids: Vec<u32> = candidates.iter().map(|c| c.id).collect();
        log::debug!(
            "frame {}: marker candidates {:?}",
            frame.stamp().seq,
            candidate_ids
        );

        let corners = MarkerCorners::from_candidate(first)?;
        let geometry = marker_geometry(&corners)?;
        let depth_mm = sample_depth_xy(frame.depth(), geometry.center)?;

        let (frame_cx, _) = frame.center();
        let offset = (geometry.center.x - frame_cx as i64).abs() as f64;
        let aligned = offset < geometry.width_px.abs();

        log::debug!(
            "marker {}: b={} h={} theta={:.2}deg center=({}, {})",
            first.id,
            geometry.left_span,
            geometry.width_px,
            geometry.theta_deg,
            geometry.center.x,
            geometry.center.y
        );

        Ok(MarkerDetection {
            observation: MarkerObservation {
                id: first.id,
                distance_m: depth_mm as f64 / 1000.0,
                theta_deg: geometry.theta_deg,
                aligned,
            },
            geometry,
            corners,
            candidate_ids,
        })
    }
}

/// Sample the depth map as `[x][y]`, i.e. row `x`, column `y`.
///
/// This is the producer's storage layout for the marker lookup and must not
/// be transposed.
fn sample_depth_xy(depth: &DepthMap, center: Point2<i64>) -> Result<u16, MarkerDetectError> {
    let out_of_bounds = || MarkerDetectError::DepthOutOfBounds {
        x: center.x,
        y: center.y,
        width: depth.width(),
        height: depth.height(),
    };
    let row = usize::try_from(center.x).map_err(|_| out_of_bounds())?;
    let col = usize::try_from(center.y).map_err(|_| out_of_bounds())?;
    depth.get(row, col).copied().ok_or_else(out_of_bounds)
}
