use crate::geometry::{AngleConvention, Point};
use serde::Serialize;
use std::f64::consts::PI;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FillState {
    Disabled,
    Enabled,
    Selected,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorSet<C> {
    pub normal: C,
    pub selected: C,
    pub disabled: C,
}

impl<C: Copy> ColorSet<C> {
    pub fn new(normal: C, selected: C, disabled: C) -> Self {
        Self {
            normal,
            selected,
            disabled,
        }
    }

    /// One color for every state.
    pub fn uniform(color: C) -> Self {
        Self::new(color, color, color)
    }

    pub fn resolve(&self, state: FillState) -> C {
        match state {
            FillState::Selected => self.selected,
            FillState::Enabled => self.normal,
            FillState::Disabled => self.disabled,
        }
    }
}

/// One angular slice of a pie. Angles are table degrees; the host's
/// [`AngleConvention`] is applied at layout time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice<C> {
    pub start_angle: f64,
    pub end_angle: f64,
    pub enabled: bool,
    pub selected: bool,
    pub colors: ColorSet<C>,
    pub label: Option<String>,
}

impl<C: Copy> Slice<C> {
    pub fn new(start_angle: f64, end_angle: f64, colors: ColorSet<C>) -> Self {
        Self {
            start_angle,
            end_angle,
            enabled: true,
            selected: false,
            colors,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Selection wins over enablement; a slice is in exactly one state.
    pub fn fill_state(&self) -> FillState {
        if self.selected {
            FillState::Selected
        } else if self.enabled {
            FillState::Enabled
        } else {
            FillState::Disabled
        }
    }

    pub fn fill(&self) -> C {
        self.colors.resolve(self.fill_state())
    }

    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Circular arc from `start` to `end` (host radians). The sweep follows
    /// the sign of `end - start`.
    Arc {
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
    },
    Close,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WedgePath {
    pub commands: Vec<PathCommand>,
}

impl WedgePath {
    /// A filled pie wedge: center, out to the rim, along the rim, back.
    pub fn pie(center: Point, radius: f64, start: f64, end: f64) -> Self {
        let radius = radius.max(0.0);
        Self {
            commands: vec![
                PathCommand::MoveTo(center),
                PathCommand::LineTo(Point::polar(center, radius, start)),
                PathCommand::Arc {
                    center,
                    radius,
                    start,
                    end,
                },
                PathCommand::Close,
            ],
        }
    }

    /// SVG path data. Arcs become elliptical-arc commands with the large-arc
    /// and sweep flags derived from the signed sweep.
    pub fn to_svg(&self) -> String {
        let mut d = String::new();
        for command in &self.commands {
            // writing to a String cannot fail
            let _ = match *command {
                PathCommand::MoveTo(p) => write!(d, "M{:.3} {:.3} ", p.x, p.y),
                PathCommand::LineTo(p) => write!(d, "L{:.3} {:.3} ", p.x, p.y),
                PathCommand::Arc {
                    center,
                    radius,
                    start,
                    end,
                } => {
                    let to = Point::polar(center, radius, end);
                    let sweep = end - start;
                    write!(
                        d,
                        "A{radius:.3} {radius:.3} 0 {} {} {:.3} {:.3} ",
                        u8::from(sweep.abs() > PI),
                        u8::from(sweep > 0.0),
                        to.x,
                        to.y
                    )
                }
                PathCommand::Close => write!(d, "Z"),
            };
        }
        d.trim_end().to_string()
    }
}

/// Renderable output for one slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WedgeGeometry<C> {
    pub index: usize,
    /// Host radians.
    pub start: f64,
    pub end: f64,
    pub path: WedgePath,
    pub state: FillState,
    pub fill: C,
}

pub fn layout_wedges<C: Copy>(
    slices: &[Slice<C>],
    center: Point,
    radius: f64,
    convention: &AngleConvention,
) -> Vec<WedgeGeometry<C>> {
    slices
        .iter()
        .enumerate()
        .map(|(index, slice)| {
            let start = convention.resolve_radians(slice.start_angle);
            let end = convention.resolve_radians(slice.end_angle);
            WedgeGeometry {
                index,
                start,
                end,
                path: WedgePath::pie(center, radius, start, end),
                state: slice.fill_state(),
                fill: slice.fill(),
            }
        })
        .collect()
}

/// Where a slice's label goes: on the bisector, `inset` in from the rim.
pub fn label_anchor<C: Copy>(
    slice: &Slice<C>,
    center: Point,
    radius: f64,
    inset: f64,
    convention: &AngleConvention,
) -> Point {
    let distance = (radius - inset).max(0.0);
    Point::polar(center, distance, convention.resolve_radians(slice.mid_angle()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelPlacement {
    pub index: usize,
    pub text: String,
    pub anchor: Point,
}

/// Anchors for every labelled slice.
pub fn layout_labels<C: Copy>(
    slices: &[Slice<C>],
    center: Point,
    radius: f64,
    inset: f64,
    convention: &AngleConvention,
) -> Vec<LabelPlacement> {
    slices
        .iter()
        .enumerate()
        .filter_map(|(index, slice)| {
            slice.label.as_ref().map(|text| LabelPlacement {
                index,
                text: text.clone(),
                anchor: label_anchor(slice, center, radius, inset, convention),
            })
        })
        .collect()
}

/// Replaces every slice's label in one go.
///
/// # Panics
///
/// If `labels` and `slices` differ in length.
pub fn assign_labels<C>(slices: &mut [Slice<C>], labels: Vec<Option<String>>) {
    assert_eq!(
        slices.len(),
        labels.len(),
        "label count must match slice count"
    );
    for (slice, label) in slices.iter_mut().zip(labels) {
        slice.label = label;
    }
}
