//! Forward-corridor projection from the center depth sample.

use serde::{Deserialize, Serialize};

use crate::CorridorProjection;

/// Inclusive pixel-column range judged to be in the robot's path.
///
/// Invariant: `left <= right`, and both lie inside the frame it was
/// projected for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorridorWindow {
    pub left: usize,
    pub right: usize,
}

impl CorridorWindow {
    /// The whole row: `[0, width - 1]`.
    pub fn full(width: usize) -> Self {
        Self {
            left: 0,
            right: width.saturating_sub(1),
        }
    }

    /// `right - left`, the divisor used by the density formula.
    #[inline]
    pub fn span(&self) -> usize {
        self.right - self.left
    }

    #[inline]
    pub fn contains(&self, col: usize) -> bool {
        (self.left..=self.right).contains(&col)
    }

    /// Fraction of a `width`-wide frame covered by [`Self::span`].
    pub fn coverage(&self, width: usize) -> f64 {
        if width == 0 {
            return 0.0;
        }
        self.span() as f64 / width as f64
    }
}

/// Project the robot width at `center_distance_mm` onto pixel columns.
///
/// Returns `None` when the center sample has no return (`0`), in which case
/// the projection is undefined and the caller decides the fallback.
pub fn project_corridor(
    center_distance_mm: u16,
    robot_width_mm: u32,
    projection: &CorridorProjection,
    width: usize,
) -> Option<CorridorWindow> {
    if center_distance_mm == 0 || width == 0 {
        return None;
    }

    let half_window_px =
        projection.lens_scale * (robot_width_mm as f64 / 2.0) / center_distance_mm as f64;
    let reference = projection.reference_column as f64;
    let max_col = (width - 1) as i64;

    // `as i64` truncates toward zero, then saturates.
    let right = ((reference + half_window_px) as i64).clamp(0, max_col);
    let left = ((reference - half_window_px) as i64).clamp(0, max_col);

    Some(CorridorWindow {
        left: left as usize,
        right: right as usize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_center_distance_has_no_projection() {
        assert_eq!(
            project_corridor(0, 1200, &CorridorProjection::default(), 640),
            None
        );
    }

    #[test]
    fn near_center_clamps_to_frame() {
        // half = 485 * 600 / 500 = 582
        let window = project_corridor(500, 1200, &CorridorProjection::default(), 640).expect("window");
        assert_eq!(window, CorridorWindow { left: 0, right: 639 });
    }

    #[test]
    fn far_center_narrows_the_corridor() {
        // half = 485 * 600 / 4850 = 60
        let window = project_corridor(4850, 1200, &CorridorProjection::default(), 640).expect("window");
        assert_eq!(window, CorridorWindow { left: 280, right: 400 });
        assert_eq!(window.span(), 120);
        assert!(window.contains(280) && window.contains(400));
        assert!(!window.contains(401));
    }

    #[test]
    fn fractional_half_width_truncates_toward_zero() {
        // half = 485 * 500 / 3000 = 80.83
        let window = project_corridor(3000, 1000, &CorridorProjection::default(), 640).expect("window");
        assert_eq!(window, CorridorWindow { left: 259, right: 420 });
    }

    #[test]
    fn reference_column_outside_small_frame_stays_in_bounds() {
        let window =
            project_corridor(60000, 10, &CorridorProjection::default(), 100).expect("window");
        assert_eq!(window, CorridorWindow { left: 99, right: 99 });
    }

    #[test]
    fn window_stays_ordered_and_in_bounds() {
        let projection = CorridorProjection::default();
        for width in [1usize, 2, 17, 320, 640, 1280] {
            for distance in [1u16, 7, 250, 500, 999, 4000, u16::MAX] {
                for robot in [1u32, 300, 1200, 5000] {
                    let w = project_corridor(distance, robot, &projection, width).expect("window");
                    assert!(w.left <= w.right, "{w:?} for {width}/{distance}/{robot}");
                    assert!(w.right < width, "{w:?} for {width}/{distance}/{robot}");
                }
            }
        }
    }
}
