use crate::geometry::{AngleConvention, Point, normalize_degrees, to_radians};
use crate::measure::TextMeasure;
use serde::Serialize;
use std::f64::consts::PI;

/// Base angles strictly inside this window (host degrees) read along a
/// descending walk; everything else reads along an ascending one.
pub const DESCENDING_WINDOW: (f64, f64) = (10.0, 170.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlyphPlacement {
    pub ch: char,
    /// Glyph center relative to the arc center.
    pub position: Point,
    /// Radians, in the host's rotation sense.
    pub rotation: f64,
}

/// The direction glyphs walk along the circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    /// Angles shrink glyph by glyph. Used around the 90° side of the circle.
    Descending,
    /// Angles grow glyph by glyph.
    Ascending,
}

impl Reading {
    pub fn for_angle(degrees: f64) -> Self {
        let deg = normalize_degrees(degrees);
        if deg > DESCENDING_WINDOW.0 && deg < DESCENDING_WINDOW.1 {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    fn direction(&self) -> f64 {
        match self {
            Self::Descending => -1.0,
            Self::Ascending => 1.0,
        }
    }

    /// Subtracted from a glyph's center angle to get its rotation.
    fn rotation_constant(&self) -> f64 {
        match self {
            Self::Descending => 0.5 * PI,
            Self::Ascending => 1.5 * PI,
        }
    }
}

/// Lays `text` along a circle of `radius`, centered on `base_angle` (host
/// degrees). `text_width` is the measured width of the whole string and
/// `char_widths` the measured width of each char, in order.
///
/// # Panics
///
/// If `char_widths` does not hold exactly one width per char of `text`.
pub fn place_arc_text(
    text: &str,
    base_angle: f64,
    radius: f64,
    text_width: f64,
    char_widths: &[f64],
) -> Vec<GlyphPlacement> {
    assert_eq!(
        text.chars().count(),
        char_widths.len(),
        "one measured width per char"
    );

    if text.is_empty() {
        return Vec::new();
    }
    if radius <= 0.0 {
        return text
            .chars()
            .map(|ch| GlyphPlacement {
                ch,
                position: Point::default(),
                rotation: 0.0,
            })
            .collect();
    }

    let reading = Reading::for_angle(base_angle);
    let direction = reading.direction();
    let rotation_constant = reading.rotation_constant();

    let perimeter = 2.0 * PI * radius;
    let span = text_width / perimeter * 2.0 * PI;

    // back up half the span so the run is centered on the base angle
    let mut current = to_radians(base_angle) - direction * span / 2.0;

    text.chars()
        .zip(char_widths)
        .map(|(ch, &width)| {
            let letter_angle = width / perimeter * 2.0 * PI * direction;
            let center = current + letter_angle / 2.0;
            current += letter_angle;
            GlyphPlacement {
                ch,
                position: Point::polar(Point::default(), radius, center),
                rotation: center - rotation_constant,
            }
        })
        .collect()
}

/// A string to be curved around the diagram, positioned in table degrees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcTextRun {
    pub text: String,
    pub angle: f64,
    pub radius: f64,
}

impl ArcTextRun {
    pub fn new(text: impl Into<String>, angle: f64, radius: f64) -> Self {
        Self {
            text: text.into(),
            angle,
            radius,
        }
    }

    pub fn layout<M: TextMeasure + ?Sized>(
        &self,
        measure: &M,
        convention: &AngleConvention,
    ) -> Vec<GlyphPlacement> {
        place_arc_text(
            &self.text,
            convention.resolve(self.angle),
            self.radius,
            measure.text_width(&self.text),
            &measure.char_widths(&self.text),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::assert_close;
    use crate::measure::FixedAdvance;

    fn angle_of(p: Point) -> f64 {
        p.y.atan2(p.x)
    }

    #[test]
    fn test_empty_text_places_nothing() {
        assert!(place_arc_text("", 45.0, 100.0, 0.0, &[]).is_empty());
    }

    #[test]
    fn test_single_glyph_sits_on_base_angle() {
        for base in [-90.0, 0.0, 45.0, 90.0, 200.0] {
            let glyphs = place_arc_text("A", base, 80.0, 12.0, &[12.0]);
            assert_eq!(glyphs.len(), 1);
            let p = glyphs[0].position;
            assert_close(p.distance(Point::default()), 80.0);
            assert_close(p.x, 80.0 * to_radians(base).cos());
            assert_close(p.y, 80.0 * to_radians(base).sin());
        }
    }

    #[test]
    fn test_reading_window_is_exclusive() {
        assert_eq!(Reading::for_angle(10.0), Reading::Ascending);
        assert_eq!(Reading::for_angle(10.5), Reading::Descending);
        assert_eq!(Reading::for_angle(90.0), Reading::Descending);
        assert_eq!(Reading::for_angle(170.0), Reading::Ascending);
        assert_eq!(Reading::for_angle(-90.0), Reading::Ascending);
        assert_eq!(Reading::for_angle(450.0), Reading::Descending);
    }

    #[test]
    fn test_descending_run_walks_down_and_stays_upright() {
        // around 90 degrees the walk heads toward smaller angles
        let glyphs = place_arc_text("abc", 90.0, 50.0, 30.0, &[10.0, 10.0, 10.0]);
        let angles: Vec<f64> = glyphs.iter().map(|g| angle_of(g.position)).collect();
        assert!(angles[0] > angles[1] && angles[1] > angles[2]);
        assert_close(angles[1], to_radians(90.0));
        assert_close(glyphs[1].rotation, 0.0);
        // the run starts on the left
        assert!(glyphs[0].position.x < 0.0);
        assert!(glyphs[2].position.x > 0.0);
    }

    #[test]
    fn test_ascending_run_walks_up_and_stays_upright() {
        let glyphs = place_arc_text("abc", -90.0, 50.0, 30.0, &[10.0, 10.0, 10.0]);
        let angles: Vec<f64> = glyphs.iter().map(|g| angle_of(g.position)).collect();
        assert!(angles[0] < angles[1] && angles[1] < angles[2]);
        assert_close(angles[1], to_radians(-90.0));
        assert_close(glyphs[1].rotation, to_radians(-90.0) - 1.5 * PI);
        assert!(glyphs[0].position.x < 0.0);
        assert!(glyphs[2].position.x > 0.0);
    }

    #[test]
    fn test_run_spans_its_measured_width() {
        let radius = 60.0;
        let glyphs = place_arc_text("ab", 0.0, radius, 20.0, &[8.0, 12.0]);
        let span = angle_of(glyphs[1].position) - angle_of(glyphs[0].position);
        // centers are half of each glyph apart
        assert_close(span, 10.0 / radius);
        // and the run is centered: left edge and right edge are symmetric
        let first_edge = angle_of(glyphs[0].position) - 4.0 / radius;
        let last_edge = angle_of(glyphs[1].position) + 6.0 / radius;
        assert_close(first_edge, -last_edge);
    }

    #[test]
    fn test_zero_radius_collapses_to_center() {
        let glyphs = place_arc_text("ab", 30.0, 0.0, 4.0, &[2.0, 2.0]);
        assert!(glyphs.iter().all(|g| g.position == Point::default()));
    }

    #[test]
    fn test_layout_is_idempotent() {
        let run = ArcTextRun::new("minor", 135.0, 90.0);
        let measure = FixedAdvance::new(7.0);
        let a = run.layout(&measure, &AngleConvention::SCREEN);
        let b = run.layout(&measure, &AngleConvention::SCREEN);
        assert_eq!(a, b);
        assert_eq!(a.len(), 5);
    }

    #[test]
    #[should_panic(expected = "one measured width per char")]
    fn test_width_count_mismatch_panics() {
        place_arc_text("abc", 0.0, 10.0, 3.0, &[1.0, 1.0]);
    }
}
