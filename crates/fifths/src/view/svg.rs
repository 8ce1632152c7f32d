use super::{DrawOp, FontSpec, Scene};
use crate::theme::Color;
use radial::Point;

struct SvgBuilder {
    elements: Vec<String>,
    width: f64,
    height: f64,
    font_family: String,
}

impl SvgBuilder {
    fn new(scene: &Scene) -> Self {
        Self {
            elements: Vec::new(),
            width: scene.width,
            height: scene.height,
            font_family: escape(&scene.font_family),
        }
    }

    fn build(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" font-family="{}">"#,
            self.font_family,
            w = self.width,
            h = self.height,
        );
        svg.push('\n');
        for el in &self.elements {
            svg.push_str("  ");
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    fn rect(&mut self, fill: Color) {
        let (color, opacity) = paint(fill);
        self.elements.push(format!(
            r#"<rect x="0" y="0" width="{}" height="{}" fill="{color}" fill-opacity="{opacity:.3}"/>"#,
            self.width, self.height
        ));
    }

    fn path(&mut self, d: &str, fill: Color, stroke: Color, stroke_width: f64) {
        let (fill, fill_opacity) = paint(fill);
        let (stroke, stroke_opacity) = paint(stroke);
        self.elements.push(format!(
            r#"<path d="{d}" fill="{fill}" fill-opacity="{fill_opacity:.3}" stroke="{stroke}" stroke-opacity="{stroke_opacity:.3}" stroke-width="{stroke_width:.2}" stroke-linejoin="round"/>"#
        ));
    }

    fn text(
        &mut self,
        content: &str,
        at: Point,
        rotation: f64,
        font: FontSpec,
        fill: Color,
        flip: bool,
    ) {
        let (fill, opacity) = paint(fill);
        let mut transform = format!("translate({:.3} {:.3})", at.x, at.y);
        if rotation != 0.0 {
            transform.push_str(&format!(" rotate({:.3})", rotation.to_degrees()));
        }
        if flip {
            transform.push_str(" scale(1 -1)");
        }
        let weight = if font.bold { "bold" } else { "normal" };
        self.elements.push(format!(
            r#"<text transform="{transform}" font-size="{:.1}" font-weight="{weight}" fill="{fill}" fill-opacity="{opacity:.3}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
            font.size,
            escape(content)
        ));
    }

    fn open_group(&mut self, transform: &str) {
        self.elements.push(format!(r#"<g transform="{transform}">"#));
    }

    fn close_group(&mut self) {
        self.elements.push("</g>".to_string());
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// `#rrggbb` plus opacity.
fn paint(color: Color) -> (String, f64) {
    let (r, g, b, a) = color.into_format::<u8, f64>().into_components();
    (format!("#{r:02x}{g:02x}{b:02x}"), a)
}

pub fn render_svg(scene: &Scene) -> String {
    let mut svg = SvgBuilder::new(scene);

    if let Some(background) = scene.background {
        svg.rect(background);
    }
    if scene.flip_y {
        svg.open_group(&format!("translate(0 {}) scale(1 -1)", scene.height));
    }

    for op in &scene.ops {
        match op {
            DrawOp::Wedge { path, fill, stroke } => {
                svg.path(&path.to_svg(), *fill, stroke.color, stroke.width);
            }
            DrawOp::Text {
                text,
                at,
                rotation,
                font,
                color,
            } => svg.text(text, *at, *rotation, *font, *color, scene.flip_y),
        }
    }

    if scene.flip_y {
        svg.close_group();
    }
    svg.build()
}
