use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::f64::consts::PI;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The point `radius` away from `center` along `angle` (radians).
    pub fn polar(center: Point, radius: f64, angle: f64) -> Self {
        Self::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn offset(&self, by: Point) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }
}

pub fn to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Wraps any angle in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// Which way the host's y axis points. Screen surfaces (cairo, SVG, UIKit) grow
/// downwards, so increasing angles sweep clockwise; cartesian surfaces (AppKit)
/// grow upwards and sweep counter-clockwise.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum Handedness {
    #[default]
    #[strum(to_string = "y-down", serialize = "down", serialize = "screen")]
    YDown,
    #[strum(to_string = "y-up", serialize = "up", serialize = "cartesian")]
    YUp,
}

impl Handedness {
    pub fn sign(&self) -> f64 {
        match self {
            Self::YDown => 1.0,
            Self::YUp => -1.0,
        }
    }
}

/// Maps angles from the diagram's own table (0° = C, growing one fifth per
/// 30°) onto the host's drawing frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleConvention {
    /// Degrees added after the handedness sign is applied.
    pub offset: f64,
    pub handedness: Handedness,
}

impl AngleConvention {
    /// Y-down surfaces: table 0° lands at twelve o'clock, ascending clockwise.
    pub const SCREEN: Self = Self {
        offset: -90.0,
        handedness: Handedness::YDown,
    };

    /// Y-up surfaces: the same picture, mirrored through the x axis.
    pub const CARTESIAN: Self = Self {
        offset: 90.0,
        handedness: Handedness::YUp,
    };

    pub fn new(offset: f64, handedness: Handedness) -> Self {
        Self { offset, handedness }
    }

    pub fn for_handedness(handedness: Handedness) -> Self {
        match handedness {
            Handedness::YDown => Self::SCREEN,
            Handedness::YUp => Self::CARTESIAN,
        }
    }

    /// Table degrees to host degrees.
    pub fn resolve(&self, table_degrees: f64) -> f64 {
        self.offset + self.handedness.sign() * table_degrees
    }

    /// Table degrees to host radians.
    pub fn resolve_radians(&self, table_degrees: f64) -> f64 {
        to_radians(self.resolve(table_degrees))
    }
}

impl Default for AngleConvention {
    fn default() -> Self {
        Self::SCREEN
    }
}

#[cfg(test)]
pub(crate) fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "expected {b}, got {a}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polar_lands_on_radius() {
        let center = Point::new(10.0, -4.0);
        for deg in [0.0, 33.0, 90.0, 181.0, 359.0] {
            let p = Point::polar(center, 7.5, to_radians(deg));
            assert_close(p.distance(center), 7.5);
        }
    }

    #[test]
    fn test_normalize_degrees() {
        assert_close(normalize_degrees(-90.0), 270.0);
        assert_close(normalize_degrees(420.0), 60.0);
        assert_close(normalize_degrees(360.0), 0.0);
    }

    #[test]
    fn test_conventions_put_zero_on_top() {
        // screen: -90 degrees is straight up when y grows downward
        let top = Point::polar(
            Point::default(),
            1.0,
            AngleConvention::SCREEN.resolve_radians(0.0),
        );
        assert_close(top.x, 0.0);
        assert_close(top.y, -1.0);

        let top = Point::polar(
            Point::default(),
            1.0,
            AngleConvention::CARTESIAN.resolve_radians(0.0),
        );
        assert_close(top.x, 0.0);
        assert_close(top.y, 1.0);
    }

    #[test]
    fn test_conventions_agree_visually() {
        // 30 degrees into the table is one step clockwise in both frames,
        // so the point is to the right of the vertical axis in both.
        let screen = Point::polar(
            Point::default(),
            1.0,
            AngleConvention::SCREEN.resolve_radians(30.0),
        );
        let cartesian = Point::polar(
            Point::default(),
            1.0,
            AngleConvention::CARTESIAN.resolve_radians(30.0),
        );
        assert!(screen.x > 0.0 && cartesian.x > 0.0);
        assert_close(screen.x, cartesian.x);
        assert_close(screen.y, -cartesian.y);
    }

    #[test]
    fn test_handedness_deserialization() {
        let cases = vec![
            ("\"y-down\"", Handedness::YDown),
            ("\"Screen\"", Handedness::YDown),
            ("\"UP\"", Handedness::YUp),
            ("\"cartesian\"", Handedness::YUp),
        ];

        for (json, expected) in cases {
            let deserialized: Handedness = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }
}
