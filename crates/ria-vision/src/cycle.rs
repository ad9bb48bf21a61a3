use std::ops::ControlFlow;

use log::Level;
use ria_vision_core::{ColorImage, FramePair, FrameStamp};
use ria_vision_marker::{
    MarkerCache, MarkerDetectError, MarkerDetector, MarkerFaultKind, MarkerLocalizer,
    MarkerObservation,
};
use ria_vision_obstacle::{ObstacleDecision, ObstacleDetector, ObstacleParams};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::overlay::{caption_lines, marker_caption_lines, render_overlay};
use crate::{ConfigError, FrameSlot, VisionConfig};

/// Sink for per-cycle results.
pub trait Publisher {
    /// Called once per processed cycle while obstacle detection is enabled.
    fn publish_obstacle(&mut self, stamp: FrameStamp, decision: &ObstacleDecision);

    /// Called only for a marker found in the current frame.
    fn publish_marker(&mut self, stamp: FrameStamp, observation: &MarkerObservation);

    /// Called with the annotated frame when visualization is enabled.
    fn publish_overlay(&mut self, _stamp: FrameStamp, _overlay: &ColorImage) {}
}

/// Marker result of one processed cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MarkerOutcome {
    Disabled,
    Found { observation: MarkerObservation },
    NotFound { reason: String },
    InputFault { reason: String },
}

impl MarkerOutcome {
    pub fn observation(&self) -> Option<&MarkerObservation> {
        match self {
            MarkerOutcome::Found { observation } => Some(observation),
            _ => None,
        }
    }
}

/// Everything one processed cycle decided.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    pub stamp: FrameStamp,
    pub obstacle: Option<ObstacleDecision>,
    pub marker: MarkerOutcome,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CycleOutcome {
    /// No new frame since the previous cycle; nothing was published.
    Waiting,
    Processed(CycleReport),
}

/// One decision iteration over the latest frame: obstacle, then marker.
///
/// The only state carried between cycles is the marker cache.
pub struct DecisionCycle<L> {
    obstacle: Option<ObstacleDetector>,
    params: ObstacleParams,
    marker: Option<MarkerDetector>,
    localizer: L,
    cache: MarkerCache,
    visualize: bool,
    verbose: bool,
}

impl<L: MarkerLocalizer> DecisionCycle<L> {
    pub fn new(config: &VisionConfig, localizer: L) -> Result<Self, ConfigError> {
        config.validate()?;
        let obstacle = if config.detectors.obstacle {
            Some(ObstacleDetector::new(config.obstacle.clone())?)
        } else {
            None
        };
        let marker = config.detectors.marker.then(MarkerDetector::new);
        log::info!(
            "decision cycle: obstacle={} marker={} visualize={} verbose={}",
            obstacle.is_some(),
            marker.is_some(),
            config.visualize,
            config.verbose
        );
        Ok(Self {
            obstacle,
            params: config.obstacle.clone(),
            marker,
            localizer,
            cache: MarkerCache::new(),
            visualize: config.visualize,
            verbose: config.verbose,
        })
    }

    pub fn marker_cache(&self) -> &MarkerCache {
        &self.cache
    }

    pub fn localizer(&self) -> &L {
        &self.localizer
    }

    fn report_level(&self) -> Level {
        if self.verbose {
            Level::Info
        } else {
            Level::Debug
        }
    }

    /// Consume the slot's frame if it is new, otherwise report `Waiting`.
    pub fn step<P: Publisher + ?Sized>(&mut self, slot: &FrameSlot, publisher: &mut P) -> CycleOutcome {
        match slot.take() {
            Some(frame) => CycleOutcome::Processed(self.process(&frame, publisher)),
            None => {
                log::debug!("waiting for synchronized depth and color frames");
                CycleOutcome::Waiting
            }
        }
    }

    /// One tick over a finite frame source.
    ///
    /// `source_finished` must be sampled before this call: a frame published
    /// just before the source exits is still in the slot and gets processed.
    /// Breaks only when the source had finished and no frame was pending.
    pub fn drain_step<P: Publisher + ?Sized>(
        &mut self,
        slot: &FrameSlot,
        publisher: &mut P,
        source_finished: bool,
    ) -> (CycleOutcome, ControlFlow<()>) {
        let outcome = self.step(slot, publisher);
        let flow = if source_finished && outcome == CycleOutcome::Waiting {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        };
        (outcome, flow)
    }

    /// Run both detectors on `frame` and publish their results.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, frame, publisher), fields(seq = frame.stamp().seq))
    )]
    pub fn process<P: Publisher + ?Sized>(&mut self, frame: &FramePair, publisher: &mut P) -> CycleReport {
        let stamp = frame.stamp();
        let level = self.report_level();

        let obstacle = self.obstacle.as_ref().map(|detector| detector.detect(frame));
        if let Some(decision) = &obstacle {
            log::log!(
                level,
                "[DENSITY]:{:.4} [Obstacle]:{} |Center:{}",
                decision.density,
                decision.is_obstacle,
                decision.center_distance_mm
            );
            publisher.publish_obstacle(stamp, decision);
        }

        let mut detection = None;
        let marker = match self.marker {
            None => MarkerOutcome::Disabled,
            Some(detector) => {
                let result = detector.locate_and_detect(frame, &mut self.localizer);
                if let Some(observation) = self.cache.record(&result) {
                    log::log!(
                        level,
                        "marker {} at {:.3}m theta={:.2}deg aligned={}",
                        observation.id,
                        observation.distance_m,
                        observation.theta_deg,
                        observation.aligned
                    );
                    publisher.publish_marker(stamp, observation);
                }
                match result {
                    Ok(found) => {
                        let observation = found.observation.clone();
                        detection = Some(found);
                        MarkerOutcome::Found { observation }
                    }
                    Err(err) => self.classify_failure(stamp, err),
                }
            }
        };

        if self.visualize {
            let overlay = render_overlay(frame, obstacle.as_ref(), &self.params, detection.as_ref());
            if let Some(decision) = &obstacle {
                for line in caption_lines(decision, &self.params, frame.width()) {
                    log::log!(level, "overlay: {line}");
                }
            }
            if let Some(found) = &detection {
                for line in marker_caption_lines(found) {
                    log::log!(level, "overlay marker: {line}");
                }
            }
            publisher.publish_overlay(stamp, &overlay);
        }

        CycleReport {
            stamp,
            obstacle,
            marker,
        }
    }

    fn classify_failure(&self, stamp: FrameStamp, err: MarkerDetectError) -> MarkerOutcome {
        match err.kind() {
            MarkerFaultKind::NotFound => {
                log::log!(self.report_level(), "frame {}: markers not found", stamp.seq);
                MarkerOutcome::NotFound {
                    reason: err.to_string(),
                }
            }
            MarkerFaultKind::InputFault => {
                log::warn!("frame {}: marker detection skipped: {err}", stamp.seq);
                MarkerOutcome::InputFault {
                    reason: err.to_string(),
                }
            }
            MarkerFaultKind::DegenerateGeometry | MarkerFaultKind::IndexFault => {
                log::warn!("frame {}: marker rejected: {err}", stamp.seq);
                MarkerOutcome::NotFound {
                    reason: err.to_string(),
                }
            }
        }
    }
}
