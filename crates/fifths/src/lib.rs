//! Circle-of-fifths model: pitch classes, scales, the harmonic map that turns
//! a scale into enabled wedges and Roman numerals, and the diagram built
//! from them on top of `radial`.

#[macro_use]
pub mod macros;

pub mod config;
pub mod diagram;
pub mod harmony;
pub mod pitch;
pub mod scale;
pub mod theme;
pub mod view;

pub use crate::config::{ConfigError, DiagramConfig};
pub use diagram::{Diagram, DiagramLayout, GroupLabel};
pub use harmony::{ChordAssignment, ChordQuality, HarmonicMap, RomanNumeral, map_scale};
pub use pitch::{Interval, PitchClass};
pub use scale::{ParseScaleError, Scale, ScaleMode};
pub use theme::Theme;
