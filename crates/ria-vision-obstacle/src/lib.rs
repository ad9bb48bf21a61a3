//! Forward-corridor obstacle detection from a depth map.
//!
//! The detector projects the robot's physical width at the measured center
//! distance onto a window of pixel columns, counts depth pixels closer than a
//! threshold inside that window, and compares the resulting density against a
//! policy threshold.
//!
//! ## Quickstart
//!
//! ```
//! use ria_vision_core::{FramePair, FrameStamp, Grid, Rgb};
//! use ria_vision_obstacle::{ObstacleDetector, ObstacleParams};
//!
//! let depth = Grid::filled(640, 480, 500u16).unwrap();
//! let color = Grid::filled(640, 480, Rgb::BLACK).unwrap();
//! let frame = FramePair::new(FrameStamp::default(), depth, color).unwrap();
//!
//! let detector = ObstacleDetector::new(ObstacleParams::default()).unwrap();
//! let decision = detector.detect(&frame);
//! assert!(decision.is_obstacle);
//! ```
//!
//! Algorithm:
//! 1. Read the depth at the image center.
//! 2. `half = lens_scale * (robot_width / 2) / center_distance`.
//! 3. Corridor columns `[ref - half, ref + half]`, truncated and clamped to
//!    the frame. A zero center distance falls back to the whole row.
//! 4. Count near pixels (depth `<` threshold) inside the corridor, discount
//!    one per row, and divide by `height * (right - left)`.
//! 5. Obstacle when the density exceeds the configured threshold.

mod corridor;
mod density;
mod detector;
mod params;

pub use corridor::{project_corridor, CorridorWindow};
pub use density::{corridor_density, DensityStats};
pub use detector::{ObstacleDecision, ObstacleDetector};
pub use params::{CorridorProjection, ObstacleParams, ObstacleParamsError};
