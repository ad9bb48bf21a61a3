use std::fs;
use std::path::{Path, PathBuf};

use ria_vision_core::{ColorImage, FrameStamp};
use ria_vision_marker::MarkerObservation;
use ria_vision_obstacle::ObstacleDecision;
use serde::{Deserialize, Serialize};

use crate::{CycleOutcome, CycleReport, Publisher};

#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Summary of one run of the decision loop.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub ticks: u64,
    pub waiting_ticks: u64,
    pub processed: u64,
    /// Frames overwritten in the slot before a cycle consumed them.
    pub dropped_frames: u64,
    /// Frames the source failed to decode.
    pub capture_failures: u64,
    pub obstacle_frames: u64,
    pub markers_published: u64,
    pub overlays_written: u64,
    pub cycles: Vec<CycleReport>,
}

impl RunReport {
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// [`Publisher`] that accumulates a [`RunReport`] and optionally writes
/// overlay images.
#[derive(Debug, Default)]
pub struct ReportPublisher {
    report: RunReport,
    overlay_dir: Option<PathBuf>,
}

impl ReportPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write each published overlay as `overlay_<seq>.png` under `dir`.
    #[cfg(feature = "image")]
    pub fn with_overlay_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.overlay_dir = Some(dir.into());
        self
    }

    /// Account for one tick of the decision loop.
    pub fn record(&mut self, outcome: CycleOutcome) {
        self.report.ticks += 1;
        match outcome {
            CycleOutcome::Waiting => self.report.waiting_ticks += 1,
            CycleOutcome::Processed(cycle) => {
                self.report.processed += 1;
                self.report.cycles.push(cycle);
            }
        }
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    pub fn finish(mut self, dropped_frames: u64, capture_failures: u64) -> RunReport {
        self.report.dropped_frames = dropped_frames;
        self.report.capture_failures = capture_failures;
        self.report
    }
}

#[cfg(feature = "image")]
fn write_overlay_png(path: &Path, overlay: &ColorImage) -> Result<(), image::ImageError> {
    let raw: Vec<u8> = overlay.as_slice().iter().flat_map(|px| px.0).collect();
    let img = image::RgbImage::from_raw(overlay.width() as u32, overlay.height() as u32, raw)
        .ok_or_else(|| {
            image::ImageError::Parameter(image::error::ParameterError::from_kind(
                image::error::ParameterErrorKind::DimensionMismatch,
            ))
        })?;
    img.save(path)
}

impl Publisher for ReportPublisher {
    fn publish_obstacle(&mut self, _stamp: FrameStamp, decision: &ObstacleDecision) {
        if decision.is_obstacle {
            self.report.obstacle_frames += 1;
        }
    }

    fn publish_marker(&mut self, _stamp: FrameStamp, _observation: &MarkerObservation) {
        self.report.markers_published += 1;
    }

    #[cfg(feature = "image")]
    fn publish_overlay(&mut self, stamp: FrameStamp, overlay: &ColorImage) {
        let Some(dir) = &self.overlay_dir else {
            return;
        };
        let path = dir.join(format!("overlay_{:06}.png", stamp.seq));
        match write_overlay_png(&path, overlay) {
            Ok(()) => self.report.overlays_written += 1,
            Err(err) => log::warn!("failed to write overlay {}: {err}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MarkerOutcome;
    use ria_vision_core::{Grid, Rgb};
    use ria_vision_obstacle::CorridorWindow;

    fn decision(is_obstacle: bool) -> ObstacleDecision {
        ObstacleDecision {
            density: if is_obstacle { 0.5 } else { 0.0 },
            is_obstacle,
            window: CorridorWindow { left: 0, right: 9 },
            center_distance_mm: 700,
            near_pixels: 0,
            population: 0,
            full_frame_fallback: false,
        }
    }

    #[test]
    fn counts_ticks_and_obstacles() {
        let mut publisher = ReportPublisher::new();
        publisher.record(CycleOutcome::Waiting);
        publisher.publish_obstacle(FrameStamp { seq: 0 }, &decision(true));
        publisher.publish_obstacle(FrameStamp { seq: 1 }, &decision(false));
        publisher.record(CycleOutcome::Processed(CycleReport {
            stamp: FrameStamp { seq: 1 },
            obstacle: Some(decision(false)),
            marker: MarkerOutcome::Disabled,
        }));

        let report = publisher.finish(3, 1);
        assert_eq!(report.ticks, 2);
        assert_eq!(report.waiting_ticks, 1);
        assert_eq!(report.processed, 1);
        assert_eq!(report.obstacle_frames, 1);
        assert_eq!(report.dropped_frames, 3);
        assert_eq!(report.capture_failures, 1);
    }

    #[test]
    fn report_json_marks_marker_status() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.json");
        let mut publisher = ReportPublisher::new();
        publisher.record(CycleOutcome::Processed(CycleReport {
            stamp: FrameStamp { seq: 2 },
            obstacle: None,
            marker: MarkerOutcome::NotFound {
                reason: "no marker candidates in frame".into(),
            },
        }));
        let report = publisher.finish(0, 0);
        report.write_json(&path).expect("write");

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("json");
        assert_eq!(value["cycles"][0]["marker"]["status"], "not_found");
        assert_eq!(RunReport::load_json(&path).expect("load"), report);
    }

    #[cfg(feature = "image")]
    #[test]
    fn overlays_are_written_as_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut publisher = ReportPublisher::new().with_overlay_dir(dir.path());
        let overlay = Grid::filled(4, 3, Rgb::RED).expect("overlay");
        publisher.publish_overlay(FrameStamp { seq: 12 }, &overlay);

        let path = dir.path().join("overlay_000012.png");
        let img = image::open(&path).expect("png").to_rgb8();
        assert_eq!(img.dimensions(), (4, 3));
        assert_eq!(img.get_pixel(3, 2).0, [255, 0, 0]);
        assert_eq!(publisher.report().overlays_written, 1);
    }
}
