use crate::{MarkerDetectError, MarkerDetection, MarkerFaultKind, MarkerObservation};

/// Last marker observation plus the "found in the latest frame" flag.
///
/// The cached observation survives frames without a marker, but only a
/// detection from the current frame is ever handed out for publication.
#[derive(Clone, Debug, Default)]
pub struct MarkerCache {
    last: Option<MarkerObservation>,
    found: bool,
}

impl MarkerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one frame's outcome into the cache.
    ///
    /// Returns the observation to publish, which is `Some` only for a fresh
    /// detection. Input faults leave the cache untouched; every other error
    /// clears `found` but keeps the previous observation.
    pub fn record(
        &mut self,
        outcome: &Result<MarkerDetection, MarkerDetectError>,
    ) -> Option<&MarkerObservation> {
        match outcome {
            Ok(detection) => {
                self.last = Some(detection.observation.clone());
                self.found = true;
                self.last.as_ref()
            }
            Err(err) if err.kind() == MarkerFaultKind::InputFault => None,
            Err(_) => {
                self.found = false;
                None
            }
        }
    }

    /// Whether the most recently classified frame contained a marker.
    #[inline]
    pub fn found(&self) -> bool {
        self.found
    }

    /// Most recent successful observation, possibly from an older frame.
    #[inline]
    pub fn last(&self) -> Option<&MarkerObservation> {
        self.last.as_ref()
    }
}
