//! Layout primitives for radial diagrams: pie wedges, rim labels and text
//! curved along a circle. Everything here is a pure function of its inputs;
//! hosts own the render tree and call back in whenever something changes.

pub mod arc_text;
pub mod geometry;
pub mod measure;
pub mod pie;
pub mod wedge;

pub use arc_text::{ArcTextRun, GlyphPlacement, Reading, place_arc_text};
pub use geometry::{AngleConvention, Handedness, Point};
pub use measure::{FixedAdvance, TextMeasure};
pub use pie::{Pie, Relayout};
pub use wedge::{
    ColorSet, FillState, LabelPlacement, PathCommand, Slice, WedgeGeometry, WedgePath,
    assign_labels, label_anchor, layout_labels, layout_wedges,
};
