use super::{DrawOp, FontMetrics, FontSpec, Scene};
use crate::theme::Color;
use cairo::{Context, FontSlant, FontWeight, Format, ImageSurface};
use radial::{PathCommand, TextMeasure, WedgePath};
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PngError {
    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),
    #[error("Failed to encode PNG: {0}")]
    Encode(#[from] cairo::IoError),
}

fn select_font(cr: &Context, family: &str, font: FontSpec) {
    let weight = if font.bold {
        FontWeight::Bold
    } else {
        FontWeight::Normal
    };
    cr.select_font_face(family, FontSlant::Normal, weight);
    cr.set_font_size(font.size);
}

fn set_color(cr: &Context, color: Color) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

/// Measures with cairo's toy text API on a scratch surface.
pub struct CairoMetrics {
    cr: Context,
    family: String,
}

impl CairoMetrics {
    pub fn new(family: impl Into<String>) -> Result<Self, PngError> {
        let surface = ImageSurface::create(Format::ARgb32, 1, 1)?;
        Ok(Self {
            cr: Context::new(&surface)?,
            family: family.into(),
        })
    }
}

struct CairoMeasure<'a> {
    cr: &'a Context,
}

impl TextMeasure for CairoMeasure<'_> {
    fn char_width(&self, ch: char) -> f64 {
        let mut buf = [0u8; 4];
        self.text_width(ch.encode_utf8(&mut buf))
    }

    fn text_width(&self, text: &str) -> f64 {
        match self.cr.text_extents(text) {
            Ok(ext) => ext.x_advance(),
            Err(e) => {
                log::warn!("Failed to measure '{}': {}", text, e);
                0.0
            }
        }
    }
}

impl FontMetrics for CairoMetrics {
    fn measure(&self, font: FontSpec) -> Box<dyn TextMeasure + '_> {
        select_font(&self.cr, &self.family, font);
        Box::new(CairoMeasure { cr: &self.cr })
    }
}

fn trace(cr: &Context, path: &WedgePath) {
    cr.new_path();
    for command in &path.commands {
        match *command {
            PathCommand::MoveTo(p) => cr.move_to(p.x, p.y),
            PathCommand::LineTo(p) => cr.line_to(p.x, p.y),
            PathCommand::Arc {
                center,
                radius,
                start,
                end,
            } => {
                if end >= start {
                    cr.arc(center.x, center.y, radius, start, end);
                } else {
                    cr.arc_negative(center.x, center.y, radius, start, end);
                }
            }
            PathCommand::Close => cr.close_path(),
        }
    }
}

fn draw(cr: &Context, scene: &Scene) -> Result<(), cairo::Error> {
    if let Some(background) = scene.background {
        set_color(cr, background);
        cr.paint()?;
    }
    if scene.flip_y {
        cr.translate(0.0, scene.height);
        cr.scale(1.0, -1.0);
    }

    for op in &scene.ops {
        match op {
            DrawOp::Wedge { path, fill, stroke } => {
                trace(cr, path);
                set_color(cr, *fill);
                cr.fill_preserve()?;
                if stroke.width > 0.0 {
                    set_color(cr, stroke.color);
                    cr.set_line_width(stroke.width);
                    cr.stroke()?;
                } else {
                    cr.new_path();
                }
            }
            DrawOp::Text {
                text,
                at,
                rotation,
                font,
                color,
            } => {
                cr.save()?;
                cr.translate(at.x, at.y);
                cr.rotate(*rotation);
                if scene.flip_y {
                    cr.scale(1.0, -1.0);
                }
                select_font(cr, &scene.font_family, *font);
                let ext = cr.text_extents(text)?;
                // center the ink box on the origin
                cr.move_to(
                    -(ext.x_bearing() + ext.width() / 2.0),
                    -(ext.y_bearing() + ext.height() / 2.0),
                );
                set_color(cr, *color);
                cr.show_text(text)?;
                cr.restore()?;
            }
        }
    }
    Ok(())
}

pub fn render_png<W: Write>(scene: &Scene, out: &mut W) -> Result<(), PngError> {
    let surface = ImageSurface::create(
        Format::ARgb32,
        scene.width.round() as i32,
        scene.height.round() as i32,
    )?;
    {
        let cr = Context::new(&surface)?;
        draw(&cr, scene)?;
    }
    surface.write_to_png(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiagramConfig;
    use crate::diagram::Diagram;
    use crate::view::scene;

    #[test]
    fn test_cairo_metrics_measure_something() {
        let metrics = CairoMetrics::new("Sans").unwrap();
        let measure = metrics.measure(FontSpec::regular(13.0));
        assert!(measure.text_width("minor") > 0.0);
        assert_eq!(measure.char_widths("abc").len(), 3);
    }

    #[test]
    fn test_render_png_writes_a_png() {
        let cfg = DiagramConfig::default();
        let metrics = CairoMetrics::new(cfg.fonts.family.clone()).unwrap();
        let scene = scene(&Diagram::from_config(&cfg), &metrics);
        let mut out = Vec::new();
        render_png(&scene, &mut out).unwrap();
        assert_eq!(&out[..8], b"\x89PNG\r\n\x1a\n");
    }
}
