//! Near-pixel density inside a corridor window.

use ria_vision_core::DepthMap;
use serde::{Deserialize, Serialize};

use crate::CorridorWindow;

/// Counts behind one density evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DensityStats {
    /// Pixels with depth strictly below the threshold, anywhere in the frame.
    pub near_pixels: usize,
    /// Near pixels whose column lies in the inclusive corridor range.
    pub in_corridor: usize,
    /// `in_corridor` with the per-row correction applied.
    pub population: usize,
    /// `population / (height * span)`, `0` for a degenerate window.
    pub density: f64,
}

/// Evaluate the corridor density of `depth` for `threshold_mm`.
///
/// One pixel per row is discounted from the corridor count (`population =
/// in_corridor - height`, saturating), so a frame that is near everywhere
/// yields exactly `1.0`. A zero-span window yields `0.0`.
pub fn corridor_density(depth: &DepthMap, threshold_mm: u32, window: CorridorWindow) -> DensityStats {
    let height = depth.height();
    let right = window.right.min(depth.width() - 1);
    let left = window.left.min(right);
    let is_near = |d: u16| (d as u32) < threshold_mm;

    let mut near_pixels = 0usize;
    let mut in_corridor = 0usize;
    for row in depth.rows() {
        near_pixels += row.iter().filter(|&&d| is_near(d)).count();
        in_corridor += row[left..=right].iter().filter(|&&d| is_near(d)).count();
    }

    let population = in_corridor.saturating_sub(height);
    let span = right - left;
    let density = if span == 0 {
        0.0
    } else {
        population as f64 / (height * span) as f64
    };

    DensityStats {
        near_pixels,
        in_corridor,
        population,
        density,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ria_vision_core::Grid;

    #[test]
    fn constant_near_frame_matches_reference_scenario() {
        let depth = Grid::filled(640, 480, 500u16).expect("depth");
        let stats = corridor_density(&depth, 1000, CorridorWindow { left: 0, right: 639 });
        assert_eq!(stats.near_pixels, 640 * 480);
        assert_eq!(stats.in_corridor, 640 * 480);
        assert_eq!(stats.population, 640 * 480 - 480);
        let expected = (640.0 * 480.0 - 480.0) / (480.0 * 639.0);
        assert_eq!(stats.density, expected);
        assert_eq!(stats.density, 1.0);
    }

    #[test]
    fn degenerate_window_has_zero_density() {
        let depth = Grid::filled(64, 48, 10u16).expect("depth");
        let stats = corridor_density(&depth, 1000, CorridorWindow { left: 20, right: 20 });
        assert_eq!(stats.density, 0.0);
        assert_eq!(stats.in_corridor, 48);
    }

    #[test]
    fn far_frame_has_zero_density() {
        let depth = Grid::filled(64, 48, 5000u16).expect("depth");
        let stats = corridor_density(&depth, 1000, CorridorWindow::full(64));
        assert_eq!(stats.near_pixels, 0);
        assert_eq!(stats.population, 0);
        assert_eq!(stats.density, 0.0);
    }

    #[test]
    fn threshold_is_strict_and_corridor_edges_are_inclusive() {
        // near block exactly on columns 10..=19, every row
        let depth = Grid::from_fn(40, 10, |_, col| {
            if (10..20).contains(&col) {
                999u16
            } else {
                1000u16
            }
        })
        .expect("depth");
        let stats = corridor_density(&depth, 1000, CorridorWindow { left: 10, right: 19 });
        assert_eq!(stats.near_pixels, 100);
        assert_eq!(stats.in_corridor, 100);
        assert_eq!(stats.population, 90);
        assert_relative_eq!(stats.density, 1.0);
    }

    #[test]
    fn near_pixels_outside_the_corridor_do_not_count() {
        let depth = Grid::from_fn(40, 10, |_, col| if col < 5 { 100u16 } else { 3000u16 })
            .expect("depth");
        let stats = corridor_density(&depth, 1000, CorridorWindow { left: 10, right: 30 });
        assert_eq!(stats.near_pixels, 50);
        assert_eq!(stats.in_corridor, 0);
        assert_eq!(stats.density, 0.0);
    }

    #[test]
    fn density_stays_in_unit_interval() {
        let depth = Grid::from_fn(50, 20, |row, col| ((row * 37 + col * 11) % 2000) as u16)
            .expect("depth");
        for (left, right) in [(0, 49), (3, 4), (10, 40), (49, 49), (0, 0)] {
            let stats = corridor_density(&depth, 1200, CorridorWindow { left, right });
            assert!(
                (0.0..=1.0).contains(&stats.density),
                "density {} for [{left}, {right}]",
                stats.density
            );
        }
    }
}
