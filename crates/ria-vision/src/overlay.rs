//! Diagnostic overlay rendering.
//!
//! The overlay is an annotated copy of the color frame. It is a pure side
//! channel: nothing drawn here feeds back into a decision.

use nalgebra::Point2;
use ria_vision_core::{ColorImage, FramePair, Rgb};
use ria_vision_marker::MarkerDetection;
use ria_vision_obstacle::{ObstacleDecision, ObstacleParams};

const CROSS_HALF: i64 = 20;
const INFO_BOX_TOP: i64 = 25;
const INFO_BOX_BOTTOM: i64 = 130;
const INFO_BOX_LEFT: i64 = 5;
const INFO_BOX_RIGHT: i64 = 150;
const NEAR_TINT: u8 = 128;
const OUTSIDE_SHADE: u8 = 150;

fn put(img: &mut ColorImage, row: i64, col: i64, f: impl FnOnce(&mut Rgb)) {
    let (Ok(row), Ok(col)) = (usize::try_from(row), usize::try_from(col)) else {
        return;
    };
    if let Some(px) = img.get_mut(row, col) {
        f(px);
    }
}

fn hline(img: &mut ColorImage, row: i64, cols: std::ops::Range<i64>, color: Rgb) {
    for col in cols {
        put(img, row, col, |px| *px = color);
    }
}

fn vline(img: &mut ColorImage, col: i64, rows: std::ops::Range<i64>, color: Rgb) {
    for row in rows {
        put(img, row, col, |px| *px = color);
    }
}

/// Liang-Barsky clip of `from..to` against the pixel-center rectangle.
fn clip_segment(
    from: Point2<f64>,
    to: Point2<f64>,
    width: usize,
    height: usize,
) -> Option<(Point2<f64>, Point2<f64>)> {
    let d = to - from;
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    let edges = [
        (-d.x, from.x),
        (d.x, (width as f64 - 1.0) - from.x),
        (-d.y, from.y),
        (d.y, (height as f64 - 1.0) - from.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else if p < 0.0 {
            t0 = t0.max(q / p);
        } else {
            t1 = t1.min(q / p);
        }
    }
    (t0 <= t1).then(|| (from + d * t0, from + d * t1))
}

fn segment(img: &mut ColorImage, from: Point2<f32>, to: Point2<f32>, color: Rgb) {
    let (from, to) = (from.cast::<f64>(), to.cast::<f64>());
    if !(from.x.is_finite() && from.y.is_finite() && to.x.is_finite() && to.y.is_finite()) {
        return;
    }
    // steps stay bounded by the image size
    let Some((from, to)) = clip_segment(from, to, img.width(), img.height()) else {
        return;
    };
    let d = to - from;
    let steps = d.x.abs().max(d.y.abs()).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let p = from + d * (i as f64 / steps as f64);
        put(img, p.y.round() as i64, p.x.round() as i64, |px| *px = color);
    }
}

/// Marker outline, center dot and id anchor.
pub fn draw_marker(img: &mut ColorImage, detection: &MarkerDetection) {
    let pts = detection.corners.0;
    for i in 0..pts.len() {
        segment(img, pts[i], pts[(i + 1) % pts.len()], Rgb::GREEN);
    }
    let center = detection.geometry.center;
    for dr in -1..=1 {
        for dc in -1..=1 {
            put(img, center.y + dr, center.x + dc, |px| *px = Rgb::YELLOW);
        }
    }
    // TL marks orientation
    let tl = detection.corners.tl();
    put(img, tl.y.round() as i64, tl.x.round() as i64, |px| *px = Rgb::RED);
}

/// Corridor, near-pixel tint, center cross and info box.
pub fn draw_obstacle(
    img: &mut ColorImage,
    frame: &FramePair,
    decision: &ObstacleDecision,
    params: &ObstacleParams,
) {
    let (cx, cy) = frame.center();
    let (cx, cy) = (cx as i64, cy as i64);
    vline(img, cx, cy - CROSS_HALF..cy + CROSS_HALF, Rgb::BLACK);
    hline(img, cy, cx - CROSS_HALF..cx + CROSS_HALF, Rgb::BLACK);

    for (row, depth_row) in frame.depth().rows().enumerate() {
        for (col, &d) in depth_row.iter().enumerate() {
            if u32::from(d) < params.depth_threshold_mm {
                put(img, row as i64, col as i64, |px| px.0[0] = NEAR_TINT);
            }
        }
    }

    let window = decision.window;
    for row in img.rows_mut() {
        for (col, px) in row.iter_mut().enumerate() {
            if col < window.left || col > window.right {
                px.0[1] = OUTSIDE_SHADE;
            }
        }
    }
    let height = img.height() as i64;
    vline(img, window.left as i64, 0..height, Rgb::WHITE);
    vline(img, window.right as i64, 0..height, Rgb::WHITE);

    vline(img, INFO_BOX_LEFT, INFO_BOX_TOP..INFO_BOX_BOTTOM, Rgb::WHITE);
    vline(img, INFO_BOX_RIGHT, INFO_BOX_TOP..INFO_BOX_BOTTOM, Rgb::WHITE);
    hline(img, INFO_BOX_TOP, INFO_BOX_LEFT..INFO_BOX_RIGHT, Rgb::WHITE);
    hline(img, INFO_BOX_BOTTOM, INFO_BOX_LEFT..INFO_BOX_RIGHT, Rgb::WHITE);
}

/// Render the full overlay for one processed frame.
pub fn render_overlay(
    frame: &FramePair,
    obstacle: Option<&ObstacleDecision>,
    params: &ObstacleParams,
    marker: Option<&MarkerDetection>,
) -> ColorImage {
    let mut img = frame.color().clone();
    if let Some(detection) = marker {
        draw_marker(&mut img, detection);
    }
    if let Some(decision) = obstacle {
        draw_obstacle(&mut img, frame, decision, params);
    }
    img
}

/// Info-box caption text for an obstacle decision.
pub fn caption_lines(decision: &ObstacleDecision, params: &ObstacleParams, width: usize) -> Vec<String> {
    let span = decision.window.span();
    vec![
        format!("Threshold: {:.2}m", params.depth_threshold_mm as f64 / 1000.0),
        format!("R_width: {:.2}m", params.robot_width_mm as f64 / 1000.0),
        format!("FOV: {} [{:.2}%]", span, 100.0 * decision.window.coverage(width)),
        format!("Density: {:.2}%", decision.density * 100.0),
        format!("Obstacle: {}", decision.is_obstacle),
        format!("Center: {:.2}m", decision.center_distance_mm as f64 / 1000.0),
    ]
}

/// Caption text drawn next to a detected marker.
pub fn marker_caption_lines(detection: &MarkerDetection) -> Vec<String> {
    let observation = &detection.observation;
    vec![
        format!("{:.2}m", observation.distance_m),
        format!("{:.2}deg", observation.theta_deg),
        format!("id {}", observation.id),
    ]
}
