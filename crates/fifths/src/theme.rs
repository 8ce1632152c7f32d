use crate::config::{ColorConfig, DiagramConfig, FontConfig, HexColor};
use crate::harmony::ChordQuality;
use palette::{Srgba, WithAlpha};
use radial::ColorSet;

pub type Color = Srgba<f64>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Option<Color>,
    pub notes: ColorSet<Color>,
    pub interval: Color,
    pub major: Color,
    pub minor: Color,
    pub diminished: Color,
    pub text: Color,
    pub major_text: Color,
    pub minor_text: Color,
    pub diminished_text: Color,
    pub chord_stroke: Stroke,
    pub circle_stroke: Stroke,
    pub fonts: FontConfig,
}

impl Theme {
    pub fn from_config(colors: &ColorConfig, fonts: &FontConfig) -> Self {
        Self {
            background: colors.background.map(Self::rgba),
            notes: ColorSet::new(
                Self::rgba(colors.note),
                Self::rgba(colors.note_selected),
                Self::rgba(colors.note_disabled),
            ),
            interval: Self::rgba(colors.interval),
            major: Self::rgba(colors.major),
            minor: Self::rgba(colors.minor),
            diminished: Self::rgba(colors.diminished),
            text: Self::rgba(colors.text),
            major_text: Self::rgba(colors.major_text),
            minor_text: Self::rgba(colors.minor_text),
            diminished_text: Self::rgba(colors.diminished_text),
            chord_stroke: Stroke {
                color: Self::rgba(colors.chord_stroke),
                width: colors.chord_stroke_width,
            },
            circle_stroke: Stroke {
                color: Self::rgba(colors.circle_stroke),
                width: colors.circle_stroke_width,
            },
            fonts: fonts.clone(),
        }
    }

    fn rgba(hex: HexColor) -> Color {
        hex.0.into_format::<f64>().with_alpha(1.0)
    }

    pub fn chord_fill(&self, quality: ChordQuality) -> Color {
        match quality {
            ChordQuality::Major => self.major,
            ChordQuality::Minor => self.minor,
            ChordQuality::Diminished => self.diminished,
        }
    }

    pub fn caption_color(&self, quality: ChordQuality) -> Color {
        match quality {
            ChordQuality::Major => self.major_text,
            ChordQuality::Minor => self.minor_text,
            ChordQuality::Diminished => self.diminished_text,
        }
    }
}

impl From<&DiagramConfig> for Theme {
    fn from(cfg: &DiagramConfig) -> Self {
        Self::from_config(&cfg.colors, &cfg.fonts)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from(&DiagramConfig::default())
    }
}
