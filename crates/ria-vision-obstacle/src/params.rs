use serde::{Deserialize, Serialize};

/// Errors raised when obstacle parameters are rejected at configuration time.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ObstacleParamsError {
    #[error("robot width must be positive (got {0} mm)")]
    NonPositiveRobotWidth(u32),
    #[error("depth threshold must be positive (got {0} mm)")]
    NonPositiveDepthThreshold(u32),
    #[error("density threshold must lie in [0, 1) (got {0})")]
    DensityThresholdOutOfRange(f64),
    #[error("lens scale must be finite and positive (got {0})")]
    InvalidLensScale(f64),
}

/// Camera-specific mapping from a physical half-width at a given distance to
/// a pixel half-width around a reference column.
///
/// Both values are calibration constants of one camera/lens pair; the
/// defaults match the RealSense color stream the node was tuned on.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorridorProjection {
    /// Horizontal reference column the corridor is centered on (pixels).
    pub reference_column: u32,
    /// Lens proportionality constant, `half_px = lens_scale * half_mm / distance_mm`.
    pub lens_scale: f64,
}

impl Default for CorridorProjection {
    fn default() -> Self {
        Self {
            reference_column: 340,
            lens_scale: 485.0,
        }
    }
}

/// Configuration for [`crate::ObstacleDetector`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleParams {
    /// Pixels strictly closer than this are "near" (millimeters).
    pub depth_threshold_mm: u32,
    /// Physical robot width the corridor must clear (millimeters).
    pub robot_width_mm: u32,
    /// A corridor density strictly above this is an obstacle.
    pub density_threshold: f64,
    pub projection: CorridorProjection,
}

impl Default for ObstacleParams {
    fn default() -> Self {
        Self {
            depth_threshold_mm: 1000,
            robot_width_mm: 1200,
            density_threshold: 0.039,
            projection: CorridorProjection::default(),
        }
    }
}

impl ObstacleParams {
    /// Check every field; the first offending value is reported.
    pub fn validate(&self) -> Result<(), ObstacleParamsError> {
        if self.robot_width_mm == 0 {
            return Err(ObstacleParamsError::NonPositiveRobotWidth(
                self.robot_width_mm,
            ));
        }
        if self.depth_threshold_mm == 0 {
            return Err(ObstacleParamsError::NonPositiveDepthThreshold(
                self.depth_threshold_mm,
            ));
        }
        if !(0.0..1.0).contains(&self.density_threshold) {
            return Err(ObstacleParamsError::DensityThresholdOutOfRange(
                self.density_threshold,
            ));
        }
        let scale = self.projection.lens_scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ObstacleParamsError::InvalidLensScale(scale));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(ObstacleParams::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_robot_width() {
        let params = ObstacleParams {
            robot_width_mm: 0,
            ..ObstacleParams::default()
        };
        assert_eq!(
            params.validate(),
            Err(ObstacleParamsError::NonPositiveRobotWidth(0))
        );
    }

    #[test]
    fn rejects_nan_density_threshold() {
        let params = ObstacleParams {
            density_threshold: f64::NAN,
            ..ObstacleParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ObstacleParamsError::DensityThresholdOutOfRange(_))
        ));
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let params: ObstacleParams =
            serde_json::from_str(r#"{ "robot_width_mm": 800, "projection": { "lens_scale": 500.0 } }"#)
                .expect("parse");
        assert_eq!(params.robot_width_mm, 800);
        assert_eq!(params.depth_threshold_mm, 1000);
        assert_eq!(params.projection.reference_column, 340);
        assert_eq!(params.projection.lens_scale, 500.0);
    }
}
