//! Wheel face projection: sector paths, labels and rim lights.
//!
//! Pure geometry. A renderer (SVG in the browser, anything else on native)
//! turns these values into pixels; nothing here touches a document.

use crate::options::PrizeOptions;
use fortuna_core::{segment_color, text_color_for, Point};
use serde::{Deserialize, Serialize};

/// Coordinate frame of the wheel drawing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceGeometry {
    /// Side of the square view box
    pub view_box: f64,
    /// Wheel centre
    pub center: Point,
    /// Outer radius of the sectors
    pub radius: f64,
}

impl FaceGeometry {
    /// Standard 700 × 700 frame.
    pub const STANDARD: Self = Self {
        view_box: 700.0,
        center: Point::new(350.0, 350.0),
        radius: 332.0,
    };

    /// `viewBox` attribute value.
    #[must_use]
    pub fn view_box_attr(&self) -> String {
        format!("0 0 {} {}", self.view_box, self.view_box)
    }
}

impl Default for FaceGeometry {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// One drawn sector with its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceSegment {
    /// Sector index
    pub index: usize,
    /// Prize label
    pub label: String,
    /// SVG path data
    pub path: String,
    /// Fill color as `#rrggbb`
    pub fill: String,
    /// Label color as `#rrggbb`
    pub text_color: String,
    /// Label anchor point
    pub label_position: Point,
    /// Label rotation in degrees about `label_position`
    pub label_rotation: f64,
    /// Label font size
    pub font_size: f64,
}

impl FaceSegment {
    /// SVG `transform` attribute for the label.
    #[must_use]
    pub fn label_transform(&self) -> String {
        format!(
            "rotate({} {} {})",
            fmt_num(self.label_rotation),
            fmt_num(self.label_position.x),
            fmt_num(self.label_position.y)
        )
    }
}

/// The projected face of a wheel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelFace {
    /// Coordinate frame
    pub geometry: FaceGeometry,
    /// Sectors in option order
    pub segments: Vec<FaceSegment>,
}

impl WheelFace {
    /// Project `options` onto the standard frame.
    #[must_use]
    pub fn project(options: &PrizeOptions) -> Self {
        Self::project_in(FaceGeometry::STANDARD, options)
    }

    /// Project `options` onto `geometry`.
    #[must_use]
    pub fn project_in(geometry: FaceGeometry, options: &PrizeOptions) -> Self {
        let count = options.count();
        let step = 360.0 / count as f64;
        let font_size = label_font_size(count);

        let segments = options
            .labels()
            .iter()
            .enumerate()
            .map(|(index, label)| {
                let start = index as f64 * step;
                let mid = step.mul_add(0.5, start);
                let fill = segment_color(index, count);
                FaceSegment {
                    index,
                    label: label.clone(),
                    path: if count == 1 {
                        disc_path(&geometry)
                    } else {
                        sector_path(&geometry, start, start + step)
                    },
                    fill: fill.to_hex(),
                    text_color: text_color_for(&fill).to_hex(),
                    label_position: Point::on_circle(
                        geometry.center,
                        geometry.radius * 0.5,
                        mid,
                    ),
                    label_rotation: label_rotation(mid),
                    font_size,
                }
            })
            .collect();

        Self { geometry, segments }
    }
}

/// Font size for a wheel with `count` labels.
#[must_use]
pub fn label_font_size(count: usize) -> f64 {
    (520.0 / (count.max(1) as f64 * 2.5)).clamp(24.0, 32.0)
}

/// Label rotation for a sector whose bisector is at `mid` degrees.
///
/// Labels read outward from the centre and are flipped when they would
/// otherwise be upside down.
#[must_use]
pub fn label_rotation(mid: f64) -> f64 {
    let rotation = mid - 90.0;
    if rotation > 90.0 && rotation < 270.0 {
        rotation + 180.0
    } else {
        rotation
    }
}

fn sector_path(geometry: &FaceGeometry, start: f64, end: f64) -> String {
    let c = geometry.center;
    let r = geometry.radius;
    let p1 = Point::on_circle(c, r, start);
    let p2 = Point::on_circle(c, r, end);
    let large_arc = u8::from(end - start > 180.0);
    format!(
        "M {} {} L {} {} A {r} {r} 0 {large_arc} 1 {} {} Z",
        fmt_num(c.x),
        fmt_num(c.y),
        fmt_num(p1.x),
        fmt_num(p1.y),
        fmt_num(p2.x),
        fmt_num(p2.y),
    )
}

// A single arc cannot close on itself, so a lone option is two half arcs.
fn disc_path(geometry: &FaceGeometry) -> String {
    let c = geometry.center;
    let r = geometry.radius;
    let top = fmt_num(c.y - r);
    let bottom = fmt_num(c.y + r);
    let x = fmt_num(c.x);
    format!("M {x} {top} A {r} {r} 0 1 1 {x} {bottom} A {r} {r} 0 1 1 {x} {top} Z")
}

fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // Avoid "-0"
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

// =============================================================================
// Rim lights
// =============================================================================

/// Thickness of the wheel frame border the lights sit on.
pub const FRAME_BORDER: f64 = 18.0;
/// Animation stagger between neighbouring lights, in seconds.
pub const LIGHT_STAGGER_S: f64 = 0.15;

/// One decorative light on the wheel rim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RimLight {
    /// Offset from the frame centre in pixels
    pub offset: Point,
    /// Animation delay in seconds
    pub delay_s: f64,
}

/// Place `count` lights around a frame `frame_size` pixels wide.
///
/// Returns nothing while the frame has no size yet; callers retry once
/// layout has happened.
#[must_use]
pub fn rim_lights(frame_size: f64, count: usize) -> Vec<RimLight> {
    if frame_size <= 0.0 || count == 0 {
        return Vec::new();
    }
    let radius = frame_size / 2.0 - FRAME_BORDER / 2.0;
    let step = 360.0 / count as f64;
    (0..count)
        .map(|i| RimLight {
            offset: Point::on_circle(Point::ORIGIN, radius, i as f64 * step),
            delay_s: i as f64 * LIGHT_STAGGER_S,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_quarter_sector_path() {
        let face = WheelFace::project(&PrizeOptions::new(["A", "B", "C", "D"], "x"));
        assert_eq!(face.segments.len(), 4);
        assert_eq!(
            face.segments[0].path,
            "M 350 350 L 350 18 A 332 332 0 0 1 682 350 Z"
        );
        assert_eq!(
            face.segments[2].path,
            "M 350 350 L 350 682 A 332 332 0 0 1 18 350 Z"
        );
    }

    #[test]
    fn test_two_options_use_small_arcs() {
        let face = WheelFace::project(&PrizeOptions::new(["A", "B"], "x"));
        assert!(face.segments.iter().all(|s| s.path.contains(" 0 0 1 ")));
    }

    #[test]
    fn test_single_option_is_full_disc() {
        let face = WheelFace::project(&PrizeOptions::new(["Solo"], "x"));
        assert_eq!(
            face.segments[0].path,
            "M 350 18 A 332 332 0 1 1 350 682 A 332 332 0 1 1 350 18 Z"
        );
        assert_eq!(face.segments[0].fill, "#d92626");
    }

    #[test]
    fn test_label_placement() {
        let face = WheelFace::project(&PrizeOptions::new(["A", "B", "C", "D"], "x"));
        let seg = &face.segments[0];
        let half = 166.0 * std::f64::consts::FRAC_1_SQRT_2;
        assert!(close(seg.label_position.x, 350.0 + half));
        assert!(close(seg.label_position.y, 350.0 - half));
        assert_eq!(seg.label_rotation, -45.0);
        assert_eq!(seg.label_transform(), "rotate(-45 467.38 232.62)");
    }

    #[test]
    fn test_label_rotation_flips_upside_down_labels() {
        assert_eq!(label_rotation(45.0), -45.0);
        assert_eq!(label_rotation(180.0), 90.0);
        assert_eq!(label_rotation(225.0), 315.0);
        assert_eq!(label_rotation(315.0), 405.0);
        assert_eq!(label_rotation(350.0), 260.0 + 180.0);
    }

    #[test]
    fn test_font_size_is_clamped() {
        assert_eq!(label_font_size(2), 32.0);
        assert_eq!(label_font_size(8), 26.0);
        assert_eq!(label_font_size(20), 24.0);
    }

    #[test]
    fn test_segment_colors_and_contrast() {
        let face = WheelFace::project(&PrizeOptions::new(["A", "B", "C"], "x"));
        let fills: Vec<&str> = face.segments.iter().map(|s| s.fill.as_str()).collect();
        assert_eq!(fills, ["#d92626", "#26d926", "#2626d9"]);
        assert_eq!(face.segments[0].text_color, "#ffffff");
        assert_eq!(face.segments[1].text_color, "#000000");
    }

    #[test]
    fn test_rim_lights() {
        let lights = rim_lights(700.0, 18);
        assert_eq!(lights.len(), 18);
        assert!(close(lights[0].offset.x, 0.0));
        assert!(close(lights[0].offset.y, -341.0));
        assert!(close(lights[3].delay_s, 0.45));
        assert!(lights
            .iter()
            .all(|l| close(l.offset.distance(&Point::ORIGIN), 341.0)));
    }

    #[test]
    fn test_rim_lights_wait_for_layout() {
        assert!(rim_lights(0.0, 18).is_empty());
    }

    #[test]
    fn test_view_box_attr() {
        assert_eq!(FaceGeometry::default().view_box_attr(), "0 0 700 700");
    }
}
