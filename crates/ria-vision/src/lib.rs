//! High-level facade for the `ria-vision-*` workspace.
//!
//! This crate provides:
//! - re-exports of the frame, obstacle and marker crates
//! - the decision loop around them: a single latest-frame slot, a fixed-rate
//!   tick loop and a [`DecisionCycle`] that runs both detectors per frame
//! - JSON configuration, run reports and a diagnostic overlay
//! - (feature `image`) a file replay source standing in for the camera
//!
//! ## Quickstart
//!
//! ```
//! use ria_vision::core::{FramePair, FrameStamp, GrayImageView, Grid, Rgb};
//! use ria_vision::marker::{LocalizeError, MarkerCandidate};
//! use ria_vision::{CycleOutcome, DecisionCycle, FrameSlot, ReportPublisher, VisionConfig};
//!
//! fn no_markers(
//!     _: &GrayImageView<'_>,
//!     _: FrameStamp,
//! ) -> Result<Vec<MarkerCandidate>, LocalizeError> {
//!     Ok(Vec::new())
//! }
//!
//! let slot = FrameSlot::new();
//! let mut cycle = DecisionCycle::new(&VisionConfig::default(), no_markers).unwrap();
//! let mut publisher = ReportPublisher::new();
//!
//! assert_eq!(cycle.step(&slot, &mut publisher), CycleOutcome::Waiting);
//!
//! let depth = Grid::filled(640, 480, 500u16).unwrap();
//! let color = Grid::filled(640, 480, Rgb::BLACK).unwrap();
//! slot.publish(FramePair::new(FrameStamp { seq: 1 }, depth, color).unwrap());
//!
//! let CycleOutcome::Processed(report) = cycle.step(&slot, &mut publisher) else {
//!     panic!("frame was pending");
//! };
//! assert!(report.obstacle.unwrap().is_obstacle);
//! ```
//!
//! ## API map
//! - `ria_vision::core`: frame pairs, pixel grids, loggers.
//! - `ria_vision::obstacle`: corridor projection and obstacle density.
//! - `ria_vision::marker`: marker geometry, detector and cache.
//! - `ria_vision::overlay`: diagnostic overlay drawing.
//! - `ria_vision::replay` (feature `image`): scenario files and capture thread.

pub use ria_vision_core as core;
pub use ria_vision_marker as marker;
pub use ria_vision_obstacle as obstacle;

mod config;
mod cycle;
mod report;
mod runner;
mod slot;

pub mod overlay;
#[cfg(feature = "image")]
pub mod replay;

pub use config::{ConfigError, DetectorToggles, VisionConfig};
pub use cycle::{CycleOutcome, CycleReport, DecisionCycle, MarkerOutcome, Publisher};
pub use report::{ReportError, ReportPublisher, RunReport};
pub use runner::TickLoop;
pub use slot::FrameSlot;
