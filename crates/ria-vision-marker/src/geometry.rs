//! Marker corner geometry to tilt and perceived center.

use nalgebra::Point2;

use crate::{MarkerCorners, MarkerDetectError, MarkerGeometry};

/// Compute tilt and perceived center from four ordered corners.
///
/// With `b` the left-edge span, `a` the right-edge span and `h` the mean
/// horizontal span:
/// - `delta_x = (b + 2a) / (3(a + b)) * h` corrects the center for
///   foreshortening when the marker is viewed off-axis,
/// - `theta = sign * acos(h / b)` with `sign = -1` when `b > a`.
///
/// Divisors are checked before use: `a == 0`, `b == 0` or `a + b == 0` is a
/// [`MarkerDetectError::DivisionFault`], and an `acos` argument outside
/// `[-1, 1]` (or NaN) is a [`MarkerDetectError::GeometryDomain`].
pub fn marker_geometry(corners: &MarkerCorners) -> Result<MarkerGeometry, MarkerDetectError> {
    let tl = to_f64(corners.tl());
    let tr = to_f64(corners.tr());
    let br = to_f64(corners.br());
    let bl = to_f64(corners.bl());

    let b = bl.y - tl.y;
    let a = br.y - tr.y;
    let h = ((tr.x - tl.x) + (br.x - bl.x)) / 2.0;

    if a == 0.0 || b == 0.0 || a + b == 0.0 {
        return Err(MarkerDetectError::DivisionFault {
            left_span: b,
            right_span: a,
        });
    }

    let ratio = h / b;
    if !(-1.0..=1.0).contains(&ratio) {
        return Err(MarkerDetectError::GeometryDomain {
            ratio,
            width_px: h,
            left_span: b,
        });
    }

    let delta_x = ((b + 2.0 * a) / (3.0 * (a + b))) * h;
    let center_x = delta_x + (tl.x + bl.x) / 2.0;
    let center_y = b / 2.0 + tl.y;

    let sign = if b > a { -1.0 } else { 1.0 };
    let theta_deg = sign * ratio.acos().to_degrees();

    Ok(MarkerGeometry {
        left_span: b,
        right_span: a,
        width_px: h,
        delta_x,
        // truncation toward zero, saturating
        center: Point2::new(center_x as i64, center_y as i64),
        theta_deg,
    })
}

#[inline]
fn to_f64(p: Point2<f32>) -> Point2<f64> {
    Point2::new(p.x as f64, p.y as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn corners(pts: [(f32, f32); 4]) -> MarkerCorners {
        MarkerCorners(pts.map(|(x, y)| Point2::new(x, y)))
    }

    #[test]
    fn axis_aligned_square_has_zero_tilt() {
        let g = marker_geometry(&corners([(300.0, 200.0), (340.0, 200.0), (340.0, 240.0), (300.0, 240.0)]))
            .expect("geometry");
        assert_eq!(g.left_span, 40.0);
        assert_eq!(g.right_span, 40.0);
        assert_eq!(g.width_px, 40.0);
        assert_eq!(g.theta_deg, 0.0);
        assert_eq!(g.delta_x, 20.0);
        assert_eq!(g.center, Point2::new(320, 220));
    }

    #[test]
    fn taller_left_edge_gives_negative_tilt() {
        // b = 100, a = 60, h = 80
        let g = marker_geometry(&corners([(100.0, 100.0), (180.0, 120.0), (180.0, 180.0), (100.0, 200.0)]))
            .expect("geometry");
        assert!(g.left_span > g.right_span);
        assert_relative_eq!(g.theta_deg, -(0.8f64.acos().to_degrees()), epsilon = 1e-12);
        assert!(g.theta_deg < 0.0);
        // delta_x = 220 / 480 * 80
        assert_relative_eq!(g.delta_x, 220.0 / 480.0 * 80.0, epsilon = 1e-12);
        assert_eq!(g.center, Point2::new(136, 150));
    }

    #[test]
    fn taller_right_edge_gives_positive_tilt() {
        // b = 100, a = 120, h = 80
        let g = marker_geometry(&corners([(100.0, 100.0), (180.0, 90.0), (180.0, 210.0), (100.0, 200.0)]))
            .expect("geometry");
        assert_relative_eq!(g.theta_deg, 0.8f64.acos().to_degrees(), epsilon = 1e-12);
    }

    #[test]
    fn zero_left_span_is_a_division_fault() {
        let err = marker_geometry(&corners([(0.0, 10.0), (20.0, 0.0), (20.0, 30.0), (0.0, 10.0)]))
            .unwrap_err();
        assert!(matches!(err, MarkerDetectError::DivisionFault { left_span, .. } if left_span == 0.0));
        assert!(err.is_degenerate_geometry());
    }

    #[test]
    fn zero_right_span_is_a_division_fault() {
        let err = marker_geometry(&corners([(0.0, 0.0), (20.0, 5.0), (20.0, 5.0), (0.0, 30.0)]))
            .unwrap_err();
        assert!(matches!(err, MarkerDetectError::DivisionFault { right_span, .. } if right_span == 0.0));
    }

    #[test]
    fn wider_than_tall_is_out_of_acos_domain() {
        let err = marker_geometry(&corners([(0.0, 0.0), (50.0, 0.0), (50.0, 20.0), (0.0, 20.0)]))
            .unwrap_err();
        match err {
            MarkerDetectError::GeometryDomain { ratio, .. } => assert_eq!(ratio, 2.5),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn non_finite_corner_is_out_of_domain() {
        let err = marker_geometry(&corners([(f32::NAN, 0.0), (50.0, 0.0), (50.0, 20.0), (0.0, 20.0)]))
            .unwrap_err();
        assert!(err.is_degenerate_geometry());
    }
}
