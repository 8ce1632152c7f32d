use crate::pitch::{Interval, PitchClass};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum ScaleMode {
    #[strum(to_string = "major", serialize = "ionian")]
    Major,
    #[strum(to_string = "minor", serialize = "aeolian", serialize = "natural-minor")]
    Minor,
    #[strum(to_string = "dorian")]
    Dorian,
    #[strum(to_string = "phrygian")]
    Phrygian,
    #[strum(to_string = "lydian")]
    Lydian,
    #[strum(to_string = "mixolydian")]
    Mixolydian,
    #[strum(to_string = "locrian")]
    Locrian,
    #[strum(to_string = "harmonic-minor")]
    HarmonicMinor,
    #[strum(to_string = "melodic-minor")]
    MelodicMinor,
}

impl ScaleMode {
    /// Distance from the tonic to the first chord root of the circle's
    /// diatonic run, i.e. the IV of the relative major.
    pub fn root_interval(&self) -> Interval {
        match self {
            Self::Major => Interval::PerfectFourth,
            Self::Minor => Interval::MinorSixth,
            Self::Dorian => Interval::MinorThird,
            Self::Phrygian => Interval::MinorSecond,
            Self::Lydian => Interval::Unison,
            Self::Mixolydian => Interval::MinorSeventh,
            Self::Locrian => Interval::DiminishedFifth,
            Self::HarmonicMinor | Self::MelodicMinor => Interval::Unison,
        }
    }

    /// Semitone offsets of each scale degree from the tonic.
    pub fn steps(&self) -> [u8; 7] {
        match self {
            Self::Major => [0, 2, 4, 5, 7, 9, 11],
            Self::Minor => [0, 2, 3, 5, 7, 8, 10],
            Self::Dorian => [0, 2, 3, 5, 7, 9, 10],
            Self::Phrygian => [0, 1, 3, 5, 7, 8, 10],
            Self::Lydian => [0, 2, 4, 6, 7, 9, 11],
            Self::Mixolydian => [0, 2, 4, 5, 7, 9, 10],
            Self::Locrian => [0, 1, 3, 5, 6, 8, 10],
            Self::HarmonicMinor => [0, 2, 3, 5, 7, 8, 11],
            Self::MelodicMinor => [0, 2, 3, 5, 7, 9, 11],
        }
    }

    /// Whether this is a rotation of the major scale.
    pub fn is_diatonic(&self) -> bool {
        !matches!(self, Self::HarmonicMinor | Self::MelodicMinor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Scale {
    pub root: PitchClass,
    pub mode: ScaleMode,
}

impl Scale {
    pub fn new(root: PitchClass, mode: ScaleMode) -> Self {
        Self { root, mode }
    }

    pub fn notes(&self) -> [PitchClass; 7] {
        self.mode
            .steps()
            .map(|step| self.root.transpose(i32::from(step)))
    }

    /// Zero-based scale degree of `pc`, if it belongs to the scale.
    pub fn degree_of(&self, pc: PitchClass) -> Option<usize> {
        self.notes().iter().position(|&n| n == pc)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::new(PitchClass::C, ScaleMode::Minor)
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root, self.mode)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseScaleError {
    #[error("Expected '<root> <mode>', got '{0}'")]
    Format(String),
    #[error("Unknown pitch class '{0}'")]
    Root(String),
    #[error("Unknown scale mode '{0}'")]
    Mode(String),
}

impl FromStr for Scale {
    type Err = ParseScaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(root), Some(mode), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ParseScaleError::Format(s.to_string()));
        };
        let root = root
            .parse::<PitchClass>()
            .map_err(|_| ParseScaleError::Root(root.to_string()))?;
        let mode = mode
            .parse::<ScaleMode>()
            .map_err(|_| ParseScaleError::Mode(mode.to_string()))?;
        Ok(Self::new(root, mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::PitchClass::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_scale_notes() {
        assert_eq!(
            Scale::new(C, ScaleMode::Major).notes(),
            [C, D, E, F, G, A, B]
        );
        assert_eq!(
            Scale::new(C, ScaleMode::Minor).notes(),
            [C, D, EFlat, F, G, AFlat, BFlat]
        );
        assert_eq!(
            Scale::new(D, ScaleMode::Dorian).notes(),
            [D, E, F, G, A, B, C]
        );
        assert_eq!(
            Scale::new(A, ScaleMode::HarmonicMinor).notes(),
            [A, B, C, D, E, F, AFlat]
        );
    }

    #[test]
    fn test_degree_of() {
        let scale = Scale::new(G, ScaleMode::Major);
        assert_eq!(scale.degree_of(G), Some(0));
        assert_eq!(scale.degree_of(GFlat), Some(6));
        assert_eq!(scale.degree_of(F), None);
    }

    #[test]
    fn test_root_interval_stays_in_scale() {
        for mode in ScaleMode::iter().filter(ScaleMode::is_diatonic) {
            for root in PitchClass::circle() {
                let scale = Scale::new(root, mode);
                let fourth = root + mode.root_interval();
                assert!(scale.degree_of(fourth).is_some(), "{scale}");
            }
        }
    }

    #[test]
    fn test_parse_scale() {
        assert_eq!("C minor".parse::<Scale>(), Ok(Scale::new(C, ScaleMode::Minor)));
        assert_eq!("f# Dorian".parse::<Scale>(), Ok(Scale::new(GFlat, ScaleMode::Dorian)));
        assert_eq!(
            "Bb harmonic-minor".parse::<Scale>(),
            Ok(Scale::new(BFlat, ScaleMode::HarmonicMinor))
        );
        assert_eq!(
            "H major".parse::<Scale>(),
            Err(ParseScaleError::Root("H".into()))
        );
        assert_eq!(
            "C".parse::<Scale>(),
            Err(ParseScaleError::Format("C".into()))
        );
        assert_eq!(Scale::new(EFlat, ScaleMode::Lydian).to_string(), "E♭ lydian");
    }

    #[test]
    fn test_scale_deserialization() {
        let scale: Scale = serde_json::from_str(r#"{"root": "Ab", "mode": "aeolian"}"#).unwrap();
        assert_eq!(scale, Scale::new(AFlat, ScaleMode::Minor));
    }

    #[test]
    fn test_scale_missing_fields_use_defaults() {
        let scale: Scale = serde_json::from_str(r#"{"root": "G"}"#).unwrap();
        assert_eq!(scale, Scale::new(G, ScaleMode::Minor));
        let scale: Scale = serde_json::from_str(r#"{"mode": "dorian"}"#).unwrap();
        assert_eq!(scale, Scale::new(C, ScaleMode::Dorian));
    }
}
