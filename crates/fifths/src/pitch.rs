use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::ops::Add;
use strum::{Display as StrumDisplay, EnumCount, EnumIter, EnumString, IntoEnumIterator};

/// Width of one position on the circle, in degrees.
pub const SLICE_DEGREES: f64 = 30.0;

/// Table angle of the first slice's leading edge, so that C is centered on 0°.
pub const CIRCLE_OFFSET_DEGREES: f64 = -15.0;

/// The twelve pitch classes, declared in ascending-fifths order so the
/// discriminant is the position on the circle.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    EnumCount,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum PitchClass {
    #[strum(to_string = "C")]
    C,
    #[strum(to_string = "G")]
    G,
    #[strum(to_string = "D")]
    D,
    #[strum(to_string = "A")]
    A,
    #[strum(to_string = "E")]
    E,
    #[strum(to_string = "B")]
    B,
    #[strum(to_string = "G♭", serialize = "Gb", serialize = "F#", serialize = "F♯")]
    GFlat,
    #[strum(to_string = "D♭", serialize = "Db", serialize = "C#", serialize = "C♯")]
    DFlat,
    #[strum(to_string = "A♭", serialize = "Ab", serialize = "G#", serialize = "G♯")]
    AFlat,
    #[strum(to_string = "E♭", serialize = "Eb", serialize = "D#", serialize = "D♯")]
    EFlat,
    #[strum(to_string = "B♭", serialize = "Bb", serialize = "A#", serialize = "A♯")]
    BFlat,
    #[strum(to_string = "F")]
    F,
}

impl PitchClass {
    pub fn circle_index(&self) -> usize {
        *self as usize
    }

    pub fn from_circle_index(idx: usize) -> Self {
        Self::iter()
            .nth(idx % Self::COUNT)
            .unwrap_or(Self::C)
    }

    /// Semitones above C.
    pub fn semitone(&self) -> u8 {
        // each step round the circle is a fifth: 7 semitones
        ((self.circle_index() * 7) % 12) as u8
    }

    pub fn from_semitone(semitone: i32) -> Self {
        // 7 is its own inverse mod 12
        let pc = semitone.rem_euclid(12) as usize;
        Self::from_circle_index((pc * 7) % 12)
    }

    pub fn transpose(&self, semitones: i32) -> Self {
        Self::from_semitone(i32::from(self.semitone()) + semitones)
    }

    pub fn start_angle(&self) -> f64 {
        CIRCLE_OFFSET_DEGREES + self.circle_index() as f64 * SLICE_DEGREES
    }

    pub fn end_angle(&self) -> f64 {
        self.start_angle() + SLICE_DEGREES
    }

    pub fn center_angle(&self) -> f64 {
        self.start_angle() + SLICE_DEGREES / 2.0
    }

    /// Positions around the circle, starting at C.
    pub fn circle() -> impl Iterator<Item = Self> {
        Self::iter()
    }
}

impl Add<Interval> for PitchClass {
    type Output = PitchClass;

    fn add(self, interval: Interval) -> Self::Output {
        self.transpose(interval.semitones())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, StrumDisplay)]
pub enum Interval {
    #[strum(serialize = "P1")]
    Unison = 0,
    #[strum(serialize = "m2")]
    MinorSecond = 1,
    #[strum(serialize = "M2")]
    MajorSecond = 2,
    #[strum(serialize = "m3")]
    MinorThird = 3,
    #[strum(serialize = "M3")]
    MajorThird = 4,
    #[strum(serialize = "P4")]
    PerfectFourth = 5,
    #[strum(serialize = "d5")]
    DiminishedFifth = 6,
    #[strum(serialize = "P5")]
    PerfectFifth = 7,
    #[strum(serialize = "m6")]
    MinorSixth = 8,
    #[strum(serialize = "M6")]
    MajorSixth = 9,
    #[strum(serialize = "m7")]
    MinorSeventh = 10,
    #[strum(serialize = "M7")]
    MajorSeventh = 11,
}

impl Interval {
    pub fn semitones(&self) -> i32 {
        *self as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_circle_index_is_a_bijection() {
        let indices: HashSet<usize> = PitchClass::circle().map(|pc| pc.circle_index()).collect();
        assert_eq!(indices, (0..12).collect());
        for pc in PitchClass::circle() {
            assert_eq!(PitchClass::from_circle_index(pc.circle_index()), pc);
        }
    }

    #[test]
    fn test_angles_tile_the_circle() {
        let circle: Vec<_> = PitchClass::circle().collect();
        assert_eq!(circle[0].start_angle(), -15.0);
        assert_eq!(circle[11].end_angle(), 345.0);
        for pair in circle.windows(2) {
            assert_eq!(pair[0].end_angle(), pair[1].start_angle());
            assert_eq!(pair[0].end_angle() - pair[0].start_angle(), SLICE_DEGREES);
        }
        // and wraps round: F's end is C's start, mod 360
        assert_eq!((circle[11].end_angle() - 360.0), circle[0].start_angle());
    }

    #[test]
    fn test_neighbours_are_a_fifth_apart() {
        for pc in PitchClass::circle() {
            let next = PitchClass::from_circle_index(pc.circle_index() + 1);
            assert_eq!(pc + Interval::PerfectFifth, next);
        }
    }

    #[test]
    fn test_semitones() {
        assert_eq!(PitchClass::C.semitone(), 0);
        assert_eq!(PitchClass::G.semitone(), 7);
        assert_eq!(PitchClass::GFlat.semitone(), 6);
        assert_eq!(PitchClass::BFlat.semitone(), 10);
        assert_eq!(PitchClass::F.semitone(), 5);
        for pc in PitchClass::circle() {
            assert_eq!(PitchClass::from_semitone(i32::from(pc.semitone())), pc);
        }
        assert_eq!(PitchClass::C.transpose(-1), PitchClass::B);
        assert_eq!(PitchClass::C + Interval::MinorSixth, PitchClass::AFlat);
    }

    #[test]
    fn test_pitch_class_parsing() {
        let cases = vec![
            ("\"c\"", PitchClass::C),
            ("\"F#\"", PitchClass::GFlat),
            ("\"gb\"", PitchClass::GFlat),
            ("\"B♭\"", PitchClass::BFlat),
            ("\"a#\"", PitchClass::BFlat),
            ("\"Eb\"", PitchClass::EFlat),
        ];

        for (json, expected) in cases {
            let deserialized: PitchClass = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
        assert_eq!(PitchClass::DFlat.to_string(), "D♭");
    }
}
