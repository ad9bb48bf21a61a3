//! File-based frame source.
//!
//! A replay scenario stands in for the synchronized camera driver: it lists
//! depth/color image pairs on disk, plus the marker corners an external
//! localizer reported for each of them.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use image::{ImageBuffer, Luma, RgbImage};
use ria_vision_core::{
    ColorImage, DepthMap, FrameError, FramePair, FrameStamp, GrayImageView, Grid, GridError, Rgb,
};
use ria_vision_marker::{LocalizeError, MarkerCandidate, MarkerLocalizer};
use serde::{Deserialize, Serialize};

use crate::FrameSlot;

#[derive(thiserror::Error, Debug)]
pub enum ReplayError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("failed to decode {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Frame(#[from] FrameError),
}

fn default_frame_interval_ms() -> u64 {
    33
}

/// One recorded depth/color pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    /// 16-bit grayscale image, millimeters per pixel.
    pub depth_path: PathBuf,
    pub color_path: PathBuf,
    /// Candidates the marker localizer reported for this frame.
    #[serde(default)]
    pub markers: Vec<MarkerCandidate>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayScenario {
    pub frames: Vec<ReplayFrame>,
    /// Delay between published frames, independent of the decision tick.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

impl ReplayScenario {
    /// Load a scenario; relative image paths resolve against its directory.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let mut scenario: Self = serde_json::from_str(&raw)?;
        if let Some(base) = path.parent() {
            for frame in &mut scenario.frames {
                frame.depth_path = base.join(&frame.depth_path);
                frame.color_path = base.join(&frame.color_path);
            }
        }
        Ok(scenario)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ReplayError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Localizer serving the recorded candidates, keyed by frame sequence.
    pub fn localizer(&self) -> ReplayLocalizer {
        let recorded = self
            .frames
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.markers.is_empty())
            .map(|(seq, f)| (seq as u64, f.markers.clone()))
            .collect();
        ReplayLocalizer { recorded }
    }
}

/// [`MarkerLocalizer`] backed by a scenario's recorded candidates.
#[derive(Clone, Debug, Default)]
pub struct ReplayLocalizer {
    recorded: HashMap<u64, Vec<MarkerCandidate>>,
}

impl MarkerLocalizer for ReplayLocalizer {
    fn locate(
        &mut self,
        image: &GrayImageView<'_>,
        stamp: FrameStamp,
    ) -> Result<Vec<MarkerCandidate>, LocalizeError> {
        if image.data.len() != image.width * image.height {
            return Err(LocalizeError::UnreadableFrame(format!(
                "{}x{} view over {} bytes",
                image.width,
                image.height,
                image.data.len()
            )));
        }
        Ok(self.recorded.get(&stamp.seq).cloned().unwrap_or_default())
    }
}

pub fn depth_from_luma16(img: &ImageBuffer<Luma<u16>, Vec<u16>>) -> Result<DepthMap, GridError> {
    Grid::from_vec(img.width() as usize, img.height() as usize, img.as_raw().clone())
}

pub fn color_from_rgb8(img: &RgbImage) -> Result<ColorImage, GridError> {
    let data = img.pixels().map(|p| Rgb(p.0)).collect();
    Grid::from_vec(img.width() as usize, img.height() as usize, data)
}

fn open_image(path: &Path) -> Result<image::DynamicImage, ReplayError> {
    image::open(path).map_err(|source| ReplayError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode one depth/color pair from disk.
pub fn load_frame_pair(
    stamp: FrameStamp,
    depth_path: &Path,
    color_path: &Path,
) -> Result<FramePair, ReplayError> {
    let depth = depth_from_luma16(&open_image(depth_path)?.to_luma16())?;
    let color = color_from_rgb8(&open_image(color_path)?.to_rgb8())?;
    Ok(FramePair::new(stamp, depth, color)?)
}

/// What the capture thread did over the whole scenario.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSummary {
    pub published: u64,
    pub failed: u64,
}

/// Publish every scenario frame into `slot` from a background thread.
///
/// Frames that fail to decode are logged and skipped. The thread exits at
/// the end of the scenario or when `shutdown` is set.
pub fn spawn_capture(
    scenario: ReplayScenario,
    slot: Arc<FrameSlot>,
    shutdown: Arc<AtomicBool>,
) -> JoinHandle<CaptureSummary> {
    thread::spawn(move || {
        let interval = Duration::from_millis(scenario.frame_interval_ms);
        let mut summary = CaptureSummary::default();
        for (seq, frame) in scenario.frames.iter().enumerate() {
            if shutdown.load(Ordering::Acquire) {
                break;
            }
            let stamp = FrameStamp { seq: seq as u64 };
            match load_frame_pair(stamp, &frame.depth_path, &frame.color_path) {
                Ok(pair) => {
                    slot.publish(pair);
                    summary.published += 1;
                }
                Err(err) => {
                    log::warn!("capture: skipping frame {seq}: {err}");
                    summary.failed += 1;
                }
            }
            thread::sleep(interval);
        }
        log::info!(
            "capture finished: {} published, {} failed",
            summary.published,
            summary.failed
        );
        summary
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn write_pair(dir: &Path, name: &str, depth_mm: u16) -> ReplayFrame {
        let depth = ImageBuffer::<Luma<u16>, Vec<u16>>::from_fn(16, 12, |x, _| {
            Luma([if x < 8 { depth_mm } else { depth_mm + 1 }])
        });
        let color = RgbImage::from_pixel(16, 12, image::Rgb([200, 100, 50]));
        let depth_name = format!("{name}_depth.png");
        let color_name = format!("{name}_color.png");
        depth.save(dir.join(&depth_name)).expect("save depth");
        color.save(dir.join(&color_name)).expect("save color");
        ReplayFrame {
            depth_path: depth_name.into(),
            color_path: color_name.into(),
            markers: Vec::new(),
        }
    }

    #[test]
    fn decodes_sixteen_bit_depth_and_rgb_color() {
        let dir = tempfile::tempdir().expect("tempdir");
        let frame = write_pair(dir.path(), "a", 1234);
        let pair = load_frame_pair(
            FrameStamp { seq: 4 },
            &dir.path().join(&frame.depth_path),
            &dir.path().join(&frame.color_path),
        )
        .expect("pair");
        assert_eq!((pair.width(), pair.height()), (16, 12));
        assert_eq!(pair.depth().get(3, 2), Some(&1234));
        assert_eq!(pair.depth().get(3, 9), Some(&1235));
        assert_eq!(pair.color().get(0, 0), Some(&Rgb([200, 100, 50])));
    }

    #[test]
    fn scenario_paths_resolve_against_the_scenario_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scenario = ReplayScenario {
            frames: vec![write_pair(dir.path(), "a", 900)],
            frame_interval_ms: 1,
        };
        let path = dir.path().join("scenario.json");
        scenario.write_json(&path).expect("write");
        let loaded = ReplayScenario::load_json(&path).expect("load");
        assert_eq!(loaded.frames[0].depth_path, dir.path().join("a_depth.png"));
        assert!(loaded.frames[0].color_path.is_file());
    }

    #[test]
    fn missing_image_is_reported_with_its_path() {
        let err = load_frame_pair(
            FrameStamp::default(),
            Path::new("/nonexistent/depth.png"),
            Path::new("/nonexistent/color.png"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/depth.png"));
    }

    #[test]
    fn localizer_serves_candidates_by_sequence() {
        let candidate = MarkerCandidate {
            id: 5,
            corners: vec![Point2::new(0.0, 0.0); 4],
        };
        let scenario = ReplayScenario {
            frames: vec![
                ReplayFrame {
                    depth_path: "d0.png".into(),
                    color_path: "c0.png".into(),
                    markers: Vec::new(),
                },
                ReplayFrame {
                    depth_path: "d1.png".into(),
                    color_path: "c1.png".into(),
                    markers: vec![candidate.clone()],
                },
            ],
            frame_interval_ms: 1,
        };
        let mut localizer = scenario.localizer();
        let data = vec![0u8; 4];
        let view = GrayImageView {
            width: 2,
            height: 2,
            data: &data,
        };
        assert!(localizer
            .locate(&view, FrameStamp { seq: 0 })
            .expect("seq 0")
            .is_empty());
        assert_eq!(
            localizer.locate(&view, FrameStamp { seq: 1 }).expect("seq 1"),
            vec![candidate]
        );
    }

    #[test]
    fn capture_thread_skips_undecodable_frames() {
        let dir = tempfile::tempdir().expect("tempdir");
        let good = write_pair(dir.path(), "good", 800);
        let scenario = ReplayScenario {
            frames: vec![
                ReplayFrame {
                    depth_path: dir.path().join(&good.depth_path),
                    color_path: dir.path().join(&good.color_path),
                    markers: Vec::new(),
                },
                ReplayFrame {
                    depth_path: dir.path().join("missing.png"),
                    color_path: dir.path().join(&good.color_path),
                    markers: Vec::new(),
                },
            ],
            frame_interval_ms: 1,
        };
        let slot = Arc::new(FrameSlot::new());
        let handle = spawn_capture(scenario, Arc::clone(&slot), Arc::new(AtomicBool::new(false)));
        let summary = handle.join().expect("capture thread");
        assert_eq!(summary, CaptureSummary { published: 1, failed: 1 });
        assert_eq!(slot.take().map(|f| f.stamp().seq), Some(0));
    }
}
