use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::MarkerDetectError;

/// One marker candidate as produced by an external localizer.
///
/// `corners` is expected to hold four points ordered TL, TR, BR, BL; the
/// count is checked when the candidate is consumed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerCandidate {
    pub id: u32,
    pub corners: Vec<Point2<f32>>,
}

/// Four image-plane corners of a marker, ordered TL, TR, BR, BL.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerCorners(pub [Point2<f32>; 4]);

impl MarkerCorners {
    pub const TL: usize = 0;
    pub const TR: usize = 1;
    pub const BR: usize = 2;
    pub const BL: usize = 3;

    /// Take the corners of `candidate`, rejecting any other count than four.
    pub fn from_candidate(candidate: &MarkerCandidate) -> Result<Self, MarkerDetectError> {
        let corners: [Point2<f32>; 4] =
            candidate
                .corners
                .as_slice()
                .try_into()
                .map_err(|_| MarkerDetectError::CornerCount {
                    id: candidate.id,
                    got: candidate.corners.len(),
                })?;
        Ok(Self(corners))
    }

    #[inline]
    pub fn tl(&self) -> Point2<f32> {
        self.0[Self::TL]
    }

    #[inline]
    pub fn tr(&self) -> Point2<f32> {
        self.0[Self::TR]
    }

    #[inline]
    pub fn br(&self) -> Point2<f32> {
        self.0[Self::BR]
    }

    #[inline]
    pub fn bl(&self) -> Point2<f32> {
        self.0[Self::BL]
    }
}

/// Intermediate marker geometry in image space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerGeometry {
    /// Left-edge vertical span `b = BL.y - TL.y`.
    pub left_span: f64,
    /// Right-edge vertical span `a = BR.y - TR.y`.
    pub right_span: f64,
    /// Mean of the top and bottom horizontal spans `h`.
    pub width_px: f64,
    /// Foreshortening-corrected horizontal offset from the left edge.
    pub delta_x: f64,
    /// Perceived marker center, truncated to whole pixels.
    pub center: Point2<i64>,
    /// Signed tilt in degrees; negative when the left edge is taller.
    pub theta_deg: f64,
}

/// Marker pose summary published once per frame in which a marker is found.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerObservation {
    pub id: u32,
    pub distance_m: f64,
    pub theta_deg: f64,
    /// Horizontal offset from the image center is smaller than the marker's
    /// apparent width.
    pub aligned: bool,
}

/// Full result of one successful marker detection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerDetection {
    pub observation: MarkerObservation,
    pub geometry: MarkerGeometry,
    pub corners: MarkerCorners,
    /// Ids of every candidate the localizer returned, in order.
    pub candidate_ids: Vec<u32>,
}
