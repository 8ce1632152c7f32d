//! Flattens a [`Diagram`] into backend-neutral draw calls.

#[cfg(feature = "png")]
pub mod png;
pub mod svg;

use crate::diagram::Diagram;
use crate::theme::{Color, Stroke};
use radial::{FixedAdvance, Handedness, Point, TextMeasure, WedgePath};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub size: f64,
    pub bold: bool,
}

impl FontSpec {
    pub fn regular(size: f64) -> Self {
        Self { size, bold: false }
    }

    pub fn bold(size: f64) -> Self {
        Self { size, bold: true }
    }
}

/// Anything that can measure text set in a given font.
pub trait FontMetrics {
    fn measure(&self, font: FontSpec) -> Box<dyn TextMeasure + '_>;
}

/// Fixed-advance estimate for backends with no font engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMetrics;

impl ApproximateMetrics {
    const BOLD_WIDENING: f64 = 1.05;
}

impl FontMetrics for ApproximateMetrics {
    fn measure(&self, font: FontSpec) -> Box<dyn TextMeasure + '_> {
        let size = if font.bold {
            font.size * Self::BOLD_WIDENING
        } else {
            font.size
        };
        Box::new(FixedAdvance::for_font_size(size))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Wedge {
        path: WedgePath,
        fill: Color,
        stroke: Stroke,
    },
    /// Text centered on `at`, turned by `rotation` radians.
    Text {
        text: String,
        at: Point,
        rotation: f64,
        font: FontSpec,
        color: Color,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub background: Option<Color>,
    pub font_family: String,
    /// Geometry is y-up and must be mirrored onto a y-down surface.
    pub flip_y: bool,
    pub ops: Vec<DrawOp>,
}

/// Paint order: chord band, note circle, numeral ring, then all text.
pub fn scene(diagram: &Diagram, metrics: &dyn FontMetrics) -> Scene {
    let theme = diagram.theme();
    let layout = diagram.layout();
    let mut ops = Vec::new();

    let pies = [
        (diagram.chord_pie(), theme.chord_stroke),
        (diagram.circle_pie(), theme.circle_stroke),
        (diagram.interval_pie(), theme.circle_stroke),
    ];
    for (pie, stroke) in pies {
        ops.extend(pie.wedges().iter().map(|w| DrawOp::Wedge {
            path: w.path.clone(),
            fill: w.fill,
            stroke,
        }));
    }

    let rim_labels = [
        (diagram.circle_pie(), FontSpec::bold(theme.fonts.note)),
        (diagram.interval_pie(), FontSpec::regular(theme.fonts.interval)),
    ];
    for (pie, font) in rim_labels {
        ops.extend(pie.labels().iter().map(|l| DrawOp::Text {
            text: l.text.clone(),
            at: l.anchor,
            rotation: 0.0,
            font,
            color: theme.text,
        }));
    }

    let group_font = FontSpec::regular(theme.fonts.group);
    let measure = metrics.measure(group_font);
    for (quality, glyphs) in diagram.arc_glyphs(&*measure) {
        let color = theme.caption_color(quality);
        ops.extend(glyphs.into_iter().map(|g| DrawOp::Text {
            text: g.ch.to_string(),
            at: g.position,
            rotation: g.rotation,
            font: group_font,
            color,
        }));
    }

    Scene {
        width: layout.center.x * 2.0,
        height: layout.center.y * 2.0,
        background: theme.background,
        font_family: theme.fonts.family.clone(),
        flip_y: layout.convention.handedness == Handedness::YUp,
        ops,
    }
}
