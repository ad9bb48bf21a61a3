//! Fiducial marker distance, tilt and alignment from corner detections.
//!
//! This crate does **not** localize markers. It consumes the corner sets of
//! an external localizer (see [`MarkerLocalizer`]) and turns the first one
//! into a [`MarkerObservation`]:
//! - tilt from the ratio of apparent width to left-edge height,
//! - a foreshortening-corrected center,
//! - distance sampled from the depth map at that center,
//! - alignment with the image's horizontal center.
//!
//! No camera intrinsics are involved; every quantity is in image space.

mod cache;
mod detector;
mod error;
mod geometry;
mod localizer;
mod types;

pub use cache::MarkerCache;
pub use detector::MarkerDetector;
pub use error::{LocalizeError, MarkerDetectError, MarkerFaultKind};
pub use geometry::marker_geometry;
pub use localizer::MarkerLocalizer;
pub use types::{MarkerCandidate, MarkerCorners, MarkerDetection, MarkerGeometry, MarkerObservation};
