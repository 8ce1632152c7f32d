//! The three pies and three arc captions that make up one circle of fifths.
//!
//! [`Diagram`] owns all mutable layout state. Scale changes recompute the
//! harmonic map and refill every pie; selection only repaints the note
//! circle; layout changes only move geometry.

use crate::config::{CaptionConfig, DiagramConfig, LayoutConfig};
use crate::harmony::{CHORD_PATTERN, ChordQuality, HarmonicMap, map_scale};
use crate::pitch::PitchClass;
use crate::scale::Scale;
use crate::theme::{Color, Theme};
use radial::{
    AngleConvention, ArcTextRun, ColorSet, GlyphPlacement, Pie, Point, Relayout, Slice,
    TextMeasure, assign_labels,
};
use strum::IntoEnumIterator;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramLayout {
    pub center: Point,
    /// Outer edge of the chord band.
    pub radius: f64,
    pub chord_band: f64,
    pub interval_radius: f64,
    pub note_label_inset: f64,
    pub interval_label_inset: f64,
    pub group_label_inset: f64,
    pub convention: AngleConvention,
}

impl DiagramLayout {
    pub fn from_config(cfg: &LayoutConfig) -> Self {
        let half = cfg.size / 2.0;
        Self {
            center: Point::new(half, half),
            radius: (half - cfg.margin).max(0.0),
            chord_band: cfg.chord_band,
            interval_radius: cfg.interval_radius,
            note_label_inset: cfg.note_label_inset,
            interval_label_inset: cfg.interval_label_inset,
            group_label_inset: cfg.group_label_inset,
            convention: cfg.convention(),
        }
    }

    /// Rim of the twelve-note circle, just inside the chord band.
    pub fn circle_radius(&self) -> f64 {
        (self.radius - self.chord_band).max(0.0)
    }

    pub fn group_label_radius(&self) -> f64 {
        self.radius - self.group_label_inset
    }
}

impl Default for DiagramLayout {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

/// A chord-quality caption curved over its band.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupLabel {
    pub quality: ChordQuality,
    pub run: ArcTextRun,
}

#[derive(Debug, Clone)]
pub struct Diagram {
    scale: Scale,
    map: HarmonicMap,
    selected: Option<PitchClass>,
    layout: DiagramLayout,
    theme: Theme,
    captions: CaptionConfig,
    chord_pie: Pie<Color>,
    circle_pie: Pie<Color>,
    interval_pie: Pie<Color>,
}

impl Diagram {
    pub fn new(
        scale: Scale,
        layout: DiagramLayout,
        theme: Theme,
        captions: CaptionConfig,
    ) -> Self {
        let map = map_scale(&scale);
        let chord_pie = Pie::new(
            chord_slices(&map, &theme),
            layout.center,
            layout.radius,
        )
        .with_convention(layout.convention);
        let circle_pie = Pie::new(
            note_slices(&map, &theme, None),
            layout.center,
            layout.circle_radius(),
        )
        .with_convention(layout.convention)
        .with_label_inset(layout.note_label_inset);
        let interval_pie = Pie::new(
            interval_slices(&map, &theme),
            layout.center,
            layout.interval_radius,
        )
        .with_convention(layout.convention)
        .with_label_inset(layout.interval_label_inset);

        Self {
            scale,
            map,
            selected: None,
            layout,
            theme,
            captions,
            chord_pie,
            circle_pie,
            interval_pie,
        }
    }

    pub fn from_config(cfg: &DiagramConfig) -> Self {
        Self::new(
            cfg.scale,
            DiagramLayout::from_config(&cfg.layout),
            Theme::from(cfg),
            cfg.captions.clone(),
        )
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn map(&self) -> &HarmonicMap {
        &self.map
    }

    pub fn selected(&self) -> Option<PitchClass> {
        self.selected
    }

    pub fn layout(&self) -> &DiagramLayout {
        &self.layout
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn chord_pie(&self) -> &Pie<Color> {
        &self.chord_pie
    }

    pub fn circle_pie(&self) -> &Pie<Color> {
        &self.circle_pie
    }

    pub fn interval_pie(&self) -> &Pie<Color> {
        &self.interval_pie
    }

    /// Full recompute: new harmonic map, every pie refilled. Selection is kept.
    pub fn set_scale(&mut self, scale: Scale) -> Relayout {
        if scale == self.scale {
            return Relayout::None;
        }
        self.scale = scale;
        self.map = map_scale(&scale);
        log::debug!("scale set to {scale}");
        self.refill()
    }

    /// Marks `pc` as the only selected note, or clears selection. The
    /// harmonic map is untouched.
    pub fn select(&mut self, pc: Option<PitchClass>) -> Relayout {
        self.selected = pc;
        self.circle_pie.select(pc.map(|p| p.circle_index()))
    }

    pub fn set_layout(&mut self, layout: DiagramLayout) -> Relayout {
        if layout == self.layout {
            return Relayout::None;
        }
        self.layout = layout;

        let chord = [
            self.chord_pie.set_center(layout.center),
            self.chord_pie.set_radius(layout.radius),
            self.chord_pie.set_convention(layout.convention),
        ];
        let circle = [
            self.circle_pie.set_center(layout.center),
            self.circle_pie.set_radius(layout.circle_radius()),
            self.circle_pie.set_label_inset(layout.note_label_inset),
            self.circle_pie.set_convention(layout.convention),
        ];
        let interval = [
            self.interval_pie.set_center(layout.center),
            self.interval_pie.set_radius(layout.interval_radius),
            self.interval_pie.set_label_inset(layout.interval_label_inset),
            self.interval_pie.set_convention(layout.convention),
        ];

        chord
            .into_iter()
            .chain(circle)
            .chain(interval)
            .max()
            .unwrap_or(Relayout::None)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Relayout {
        if theme == self.theme {
            return Relayout::None;
        }
        self.theme = theme;
        self.refill()
    }

    /// Captions live outside the pies, so a change only moves arc glyphs.
    pub fn set_captions(&mut self, captions: CaptionConfig) -> Relayout {
        if captions == self.captions {
            return Relayout::None;
        }
        log::debug!("captions set to {captions:?}");
        self.captions = captions;
        Relayout::Geometry
    }

    /// Applies a reloaded config, touching only what differs.
    pub fn apply_config(&mut self, cfg: &DiagramConfig) -> Relayout {
        [
            self.set_scale(cfg.scale),
            self.set_theme(Theme::from(cfg)),
            self.set_captions(cfg.captions.clone()),
            self.set_layout(DiagramLayout::from_config(&cfg.layout)),
        ]
        .into_iter()
        .max()
        .unwrap_or(Relayout::None)
    }

    pub fn group_labels(&self) -> Vec<GroupLabel> {
        let radius = self.layout.group_label_radius();
        ChordQuality::iter()
            .map(|quality| GroupLabel {
                quality,
                run: ArcTextRun::new(
                    self.captions.get(quality),
                    self.map.group_angles.get(quality),
                    radius,
                ),
            })
            .collect()
    }

    /// Glyphs of every group caption, in canvas coordinates.
    pub fn arc_glyphs<M: TextMeasure + ?Sized>(
        &self,
        measure: &M,
    ) -> Vec<(ChordQuality, Vec<GlyphPlacement>)> {
        self.group_labels()
            .into_iter()
            .map(|label| {
                let glyphs = label
                    .run
                    .layout(measure, &self.layout.convention)
                    .into_iter()
                    .map(|g| GlyphPlacement {
                        position: g.position.offset(self.layout.center),
                        ..g
                    })
                    .collect();
                (label.quality, glyphs)
            })
            .collect()
    }

    fn refill(&mut self) -> Relayout {
        let chord = self.chord_pie.set_slices(chord_slices(&self.map, &self.theme));
        let circle = self
            .circle_pie
            .set_slices(note_slices(&self.map, &self.theme, self.selected));
        let interval = self
            .interval_pie
            .set_slices(interval_slices(&self.map, &self.theme));
        chord.max(circle).max(interval)
    }
}

/// Outer band: one wedge per stacked chord root, painted by quality.
fn chord_slices(map: &HarmonicMap, theme: &Theme) -> Vec<Slice<Color>> {
    map.chord_roots
        .iter()
        .zip(CHORD_PATTERN)
        .map(|(root, quality)| {
            Slice::new(
                root.start_angle(),
                root.end_angle(),
                ColorSet::uniform(theme.chord_fill(quality)),
            )
        })
        .collect()
}

fn note_slices(
    map: &HarmonicMap,
    theme: &Theme,
    selected: Option<PitchClass>,
) -> Vec<Slice<Color>> {
    PitchClass::circle()
        .map(|pc| {
            let mut slice = Slice::new(pc.start_angle(), pc.end_angle(), theme.notes)
                .with_label(pc.to_string());
            slice.enabled = map.is_enabled(pc);
            slice.selected = selected == Some(pc);
            slice
        })
        .collect()
}

/// Inner ring: one wedge per chord root carrying its Roman numeral.
fn interval_slices(map: &HarmonicMap, theme: &Theme) -> Vec<Slice<Color>> {
    let mut slices: Vec<_> = map
        .chord_roots
        .iter()
        .map(|root| {
            Slice::new(
                root.start_angle(),
                root.end_angle(),
                ColorSet::uniform(theme.interval),
            )
        })
        .collect();
    let numerals = map
        .in_stacking_order()
        .map(|a| (!a.numeral.is_empty()).then(|| a.numeral.to_string()))
        .collect();
    assign_labels(&mut slices, numerals);
    slices
}
