use crate::harmony::ChordQuality;
use crate::scale::Scale;
use directories::ProjectDirs;
use palette::Srgb;
use palette::rgb::FromHexError;
use radial::{AngleConvention, Handedness};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// An sRGB color written as `#rrggbb` (or `#rgb`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, SerializeDisplay, DeserializeFromStr)]
pub struct HexColor(pub Srgb<u8>);

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(Srgb::new(r, g, b))
    }
}

impl FromStr for HexColor {
    type Err = FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Srgb::<u8>::from_str(s.trim()).map(Self)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.0;
        write!(f, "#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Edge of the square canvas.
    pub size: f64,
    /// Gap between the canvas edge and the chord band.
    pub margin: f64,
    /// Thickness of the outer chord band.
    pub chord_band: f64,
    /// Radius of the inner Roman-numeral ring.
    pub interval_radius: f64,
    pub note_label_inset: f64,
    pub interval_label_inset: f64,
    pub group_label_inset: f64,
    pub handedness: Handedness,
    /// Overrides the handedness' default offset, in degrees.
    pub angle_offset: Option<f64>,
}

impl LayoutConfig {
    pub fn convention(&self) -> AngleConvention {
        let preset = AngleConvention::for_handedness(self.handedness);
        AngleConvention::new(self.angle_offset.unwrap_or(preset.offset), self.handedness)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            size: 480.0,
            margin: 8.0,
            chord_band: 30.0,
            interval_radius: 110.0,
            note_label_inset: 30.0,
            interval_label_inset: 22.0,
            group_label_inset: 15.0,
            handedness: Handedness::YDown,
            angle_offset: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ColorConfig {
    pub background: Option<HexColor>,
    pub note: HexColor,
    pub note_selected: HexColor,
    pub note_disabled: HexColor,
    pub interval: HexColor,
    pub major: HexColor,
    pub minor: HexColor,
    pub diminished: HexColor,
    pub text: HexColor,
    pub major_text: HexColor,
    pub minor_text: HexColor,
    pub diminished_text: HexColor,
    pub chord_stroke: HexColor,
    pub circle_stroke: HexColor,
    pub chord_stroke_width: f64,
    pub circle_stroke_width: f64,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: None,
            note: HexColor::rgb(0xff, 0xff, 0xff),
            note_selected: HexColor::rgb(0xe7, 0x4c, 0x3c),
            note_disabled: HexColor::rgb(0xd3, 0xd3, 0xd3),
            interval: HexColor::rgb(0xff, 0xff, 0xff),
            major: HexColor::rgb(0xf2, 0x6d, 0x6d),
            minor: HexColor::rgb(0x6d, 0x8c, 0xf2),
            diminished: HexColor::rgb(0x6d, 0xd6, 0x8c),
            text: HexColor::rgb(0x00, 0x00, 0x00),
            major_text: HexColor::rgb(0x00, 0x00, 0x00),
            minor_text: HexColor::rgb(0x00, 0x00, 0x00),
            diminished_text: HexColor::rgb(0x00, 0x00, 0x00),
            chord_stroke: HexColor::rgb(0x00, 0x00, 0x00),
            circle_stroke: HexColor::rgb(0x00, 0x00, 0x00),
            chord_stroke_width: 1.0,
            circle_stroke_width: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    pub family: String,
    pub note: f64,
    pub interval: f64,
    pub group: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "Sans".to_string(),
            note: 15.0,
            interval: 13.0,
            group: 13.0,
        }
    }
}

/// Captions curved over each chord-quality band.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CaptionConfig {
    pub major: String,
    pub minor: String,
    pub diminished: String,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            major: "Major".to_string(),
            minor: "minor".to_string(),
            diminished: "diminished".to_string(),
        }
    }
}

impl CaptionConfig {
    pub fn get(&self, quality: ChordQuality) -> &str {
        match quality {
            ChordQuality::Major => &self.major,
            ChordQuality::Minor => &self.minor,
            ChordQuality::Diminished => &self.diminished,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct DiagramConfig {
    pub scale: Scale,
    pub layout: LayoutConfig,
    pub colors: ColorConfig,
    pub fonts: FontConfig,
    pub captions: CaptionConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid config: {0}")]
    Invalid(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DiagramConfig {
    /// Rejects geometry that can only come from a typo.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        let radius = layout.size / 2.0 - layout.margin;

        let checks = [
            (layout.size > 0.0, "layout.size must be positive"),
            (layout.margin >= 0.0, "layout.margin must not be negative"),
            (radius > 0.0, "layout.margin leaves no room for the circle"),
            (layout.chord_band >= 0.0, "layout.chord_band must not be negative"),
            (layout.chord_band < radius, "layout.chord_band is wider than the circle"),
            (layout.interval_radius > 0.0, "layout.interval_radius must be positive"),
            (
                layout.interval_radius <= radius - layout.chord_band,
                "layout.interval_radius reaches into the chord band",
            ),
            (layout.note_label_inset >= 0.0, "layout.note_label_inset must not be negative"),
            (
                layout.interval_label_inset >= 0.0,
                "layout.interval_label_inset must not be negative",
            ),
            (layout.group_label_inset >= 0.0, "layout.group_label_inset must not be negative"),
            (self.fonts.note > 0.0, "fonts.note must be positive"),
            (self.fonts.interval > 0.0, "fonts.interval must be positive"),
            (self.fonts.group > 0.0, "fonts.group must be positive"),
            (
                self.colors.chord_stroke_width >= 0.0,
                "colors.chord_stroke_width must not be negative",
            ),
            (
                self.colors.circle_stroke_width >= 0.0,
                "colors.circle_stroke_width must not be negative",
            ),
        ];

        match checks.iter().find(|(ok, _)| !ok) {
            Some((_, message)) => Err(ConfigError::Invalid((*message).to_string())),
            None => Ok(()),
        }
    }
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "fifths", "fifths").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Loads `path` (or the per-user config) layered under `FIFTHS_*` variables,
/// e.g. `FIFTHS_SCALE__ROOT=G`.
pub fn load_config(path: Option<&Path>) -> Result<DiagramConfig, ConfigError> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => get_config_path()?,
    };

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(
            config::Environment::with_prefix("FIFTHS")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let cfg: DiagramConfig = s.try_deserialize()?;
    cfg.validate()?;
    Ok(cfg)
}

/// Falls back to defaults when the config is missing or broken.
pub fn load_or_default(path: Option<&Path>) -> DiagramConfig {
    match load_config(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Using default config: {}", e);
            DiagramConfig::default()
        }
    }
}

pub fn write_default_config(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => get_config_path()?,
    };
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::PitchClass;
    use crate::scale::ScaleMode;

    fn from_toml(toml: &str) -> DiagramConfig {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_hex_color_round_trip() {
        let c: HexColor = serde_json::from_str("\"#E74C3C\"").unwrap();
        assert_eq!(c, HexColor::rgb(0xe7, 0x4c, 0x3c));
        assert_eq!(c.to_string(), "#e74c3c");
        assert!("#zzzzzz".parse::<HexColor>().is_err());
    }

    #[test]
    fn test_default_config_file_matches_defaults() {
        let cfg = from_toml(DEFAULT_CONFIG);
        assert_eq!(cfg, DiagramConfig::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg = from_toml(
            r##"
            [scale]
            root = "F#"
            mode = "Dorian"

            [layout]
            size = 600.0
            handedness = "cartesian"

            [colors]
            major = "#ff0000"
            "##,
        );
        assert_eq!(cfg.scale, Scale::new(PitchClass::GFlat, ScaleMode::Dorian));
        assert_eq!(cfg.layout.size, 600.0);
        assert_eq!(cfg.layout.chord_band, LayoutConfig::default().chord_band);
        assert_eq!(cfg.layout.convention(), AngleConvention::CARTESIAN);
        assert_eq!(cfg.colors.major, HexColor::rgb(0xff, 0, 0));
        assert_eq!(cfg.captions.minor, "minor");
    }

    #[test]
    fn test_partial_scale_keeps_default_mode() {
        let cfg = from_toml("[scale]\nroot = \"G\"");
        assert_eq!(cfg.scale, Scale::new(PitchClass::G, ScaleMode::Minor));

        let path = std::env::temp_dir()
            .join(format!("fifths-root-only-{}.toml", std::process::id()));
        fs_err::write(&path, "[scale]\nroot = \"G\"\n").unwrap();
        let loaded = load_config(Some(path.as_path()));
        fs_err::remove_file(&path).unwrap();
        assert_eq!(loaded.unwrap().scale, Scale::new(PitchClass::G, ScaleMode::Minor));
    }

    #[test]
    fn test_angle_offset_override() {
        let layout = LayoutConfig {
            angle_offset: Some(-75.0),
            ..LayoutConfig::default()
        };
        assert_eq!(layout.convention(), AngleConvention::new(-75.0, Handedness::YDown));
    }

    #[test]
    fn test_validate_rejects_bad_geometry() {
        let mut cfg = DiagramConfig::default();
        cfg.layout.size = -1.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = DiagramConfig::default();
        cfg.layout.chord_band = 1000.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = DiagramConfig::default();
        cfg.fonts.group = 0.0;
        assert!(
            matches!(cfg.validate(), Err(ConfigError::Invalid(m)) if m.contains("fonts.group"))
        );
    }
}
