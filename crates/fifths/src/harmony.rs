//! Scale to circle mapping: which positions carry a diatonic chord, what
//! quality each chord has, how it is numbered, and where the quality group
//! captions sit.

use crate::pitch::{Interval, PitchClass};
use crate::scale::Scale;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use strum::{Display as StrumDisplay, EnumIter};

pub const CHORD_COUNT: usize = 7;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, EnumIter, StrumDisplay,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
}

/// Qualities of the seven stacked-fifth chords, in stacking order. Applied
/// the same way for every mode.
pub const CHORD_PATTERN: [ChordQuality; CHORD_COUNT] = [
    ChordQuality::Major,
    ChordQuality::Major,
    ChordQuality::Major,
    ChordQuality::Minor,
    ChordQuality::Minor,
    ChordQuality::Minor,
    ChordQuality::Diminished,
];

impl ChordQuality {
    /// Index into the stacked roots whose wedge carries this quality's caption.
    pub fn anchor_index(&self) -> usize {
        match self {
            Self::Major => 1,
            Self::Minor => 4,
            Self::Diminished => 6,
        }
    }
}

#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct RomanNumeral(String);

crate::impl_string_newtype!(RomanNumeral);

const NUMERALS: [&str; CHORD_COUNT] = ["i", "ii", "iii", "iv", "v", "vi", "vii"];

impl RomanNumeral {
    /// Numeral for a zero-based scale degree. Major chords are upper case,
    /// diminished chords get a trailing `°`. Unknown degrees give an empty
    /// numeral.
    pub fn for_degree(degree: Option<usize>, quality: ChordQuality) -> Self {
        let Some(base) = degree.and_then(|d| NUMERALS.get(d)) else {
            return Self::default();
        };
        match quality {
            ChordQuality::Major => Self::new(base.to_uppercase()),
            ChordQuality::Minor => Self::new(*base),
            ChordQuality::Diminished => Self::new(format!("{base}°")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordAssignment {
    pub root: PitchClass,
    /// Position within the stacked-fifths run, 0..7.
    pub position: usize,
    pub quality: ChordQuality,
    pub numeral: RomanNumeral,
}

/// Table degrees at which each quality caption is centered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupAngles {
    pub major: f64,
    pub minor: f64,
    pub diminished: f64,
}

impl GroupAngles {
    pub fn get(&self, quality: ChordQuality) -> f64 {
        match quality {
            ChordQuality::Major => self.major,
            ChordQuality::Minor => self.minor,
            ChordQuality::Diminished => self.diminished,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarmonicMap {
    pub scale: Scale,
    /// Stacked fifths starting from the mode's root interval.
    pub chord_roots: [PitchClass; CHORD_COUNT],
    pub enabled: BTreeSet<PitchClass>,
    pub chords: BTreeMap<PitchClass, ChordAssignment>,
    pub group_angles: GroupAngles,
}

impl HarmonicMap {
    pub fn is_enabled(&self, pc: PitchClass) -> bool {
        self.enabled.contains(&pc)
    }

    pub fn assignment(&self, pc: PitchClass) -> Option<&ChordAssignment> {
        self.chords.get(&pc)
    }

    pub fn quality_of(&self, pc: PitchClass) -> Option<ChordQuality> {
        self.assignment(pc).map(|a| a.quality)
    }

    /// Assignments in stacking order.
    pub fn in_stacking_order(&self) -> impl Iterator<Item = &ChordAssignment> {
        self.chord_roots.iter().filter_map(|pc| self.chords.get(pc))
    }

    pub fn disabled(&self) -> impl Iterator<Item = PitchClass> + '_ {
        PitchClass::circle().filter(|pc| !self.is_enabled(*pc))
    }
}

pub fn chord_roots(scale: &Scale) -> [PitchClass; CHORD_COUNT] {
    let first = scale.root + scale.mode.root_interval();
    let mut roots = [first; CHORD_COUNT];
    for i in 1..CHORD_COUNT {
        roots[i] = roots[i - 1] + Interval::PerfectFifth;
    }
    roots
}

/// Recomputes everything the diagram needs from a scale. Stateless; equal
/// scales give equal maps.
pub fn map_scale(scale: &Scale) -> HarmonicMap {
    let roots = chord_roots(scale);

    let chords: BTreeMap<PitchClass, ChordAssignment> = roots
        .iter()
        .zip(CHORD_PATTERN)
        .enumerate()
        .map(|(position, (&root, quality))| {
            let degree = scale.degree_of(root);
            if degree.is_none() {
                log::warn!("{root} is not in {scale}; leaving its numeral blank");
            }
            let assignment = ChordAssignment {
                root,
                position,
                quality,
                numeral: RomanNumeral::for_degree(degree, quality),
            };
            (root, assignment)
        })
        .collect();

    // caption sits over the middle of the anchor wedge, not on its edge
    let angle = |quality: ChordQuality| roots[quality.anchor_index()].center_angle();

    let map = HarmonicMap {
        scale: *scale,
        chord_roots: roots,
        enabled: roots.into_iter().collect(),
        chords,
        group_angles: GroupAngles {
            major: angle(ChordQuality::Major),
            minor: angle(ChordQuality::Minor),
            diminished: angle(ChordQuality::Diminished),
        },
    };

    log::debug!(
        "mapped {scale}: {}",
        map.in_stacking_order()
            .map(|a| format!("{}={}", a.root, a.numeral))
            .collect::<Vec<_>>()
            .join(" ")
    );
    map
}
