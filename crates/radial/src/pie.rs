use crate::geometry::{AngleConvention, Point};
use crate::wedge::{self, LabelPlacement, Slice, WedgeGeometry};

/// What a mutation cost the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Relayout {
    /// Nothing visible moved.
    None,
    /// Same slices, new geometry or paint.
    Geometry,
    /// Slice count changed; per-slice drawables must be recreated.
    Rebuild,
}

/// A pie of slices plus its cached layout.
///
/// Every setter relays out eagerly, so reading [`Pie::wedges`] or
/// [`Pie::labels`] always reflects the current inputs.
#[derive(Debug, Clone)]
pub struct Pie<C> {
    slices: Vec<Slice<C>>,
    center: Point,
    radius: f64,
    label_inset: f64,
    convention: AngleConvention,
    generation: u64,
    wedges: Vec<WedgeGeometry<C>>,
    labels: Vec<LabelPlacement>,
}

impl<C: Copy> Pie<C> {
    pub fn new(slices: Vec<Slice<C>>, center: Point, radius: f64) -> Self {
        let mut pie = Self {
            slices,
            center,
            radius,
            label_inset: 0.0,
            convention: AngleConvention::default(),
            generation: 0,
            wedges: Vec::new(),
            labels: Vec::new(),
        };
        pie.recalculate();
        pie
    }

    pub fn with_convention(mut self, convention: AngleConvention) -> Self {
        self.set_convention(convention);
        self
    }

    pub fn with_label_inset(mut self, inset: f64) -> Self {
        self.set_label_inset(inset);
        self
    }

    pub fn slices(&self) -> &[Slice<C>] {
        &self.slices
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn convention(&self) -> AngleConvention {
        self.convention
    }

    /// Bumped on every [`Relayout::Rebuild`].
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn wedges(&self) -> &[WedgeGeometry<C>] {
        &self.wedges
    }

    pub fn labels(&self) -> &[LabelPlacement] {
        &self.labels
    }

    pub fn selected(&self) -> Option<usize> {
        self.slices.iter().position(|s| s.selected)
    }

    pub fn set_slices(&mut self, slices: Vec<Slice<C>>) -> Relayout {
        let rebuild = slices.len() != self.slices.len();
        self.slices = slices;
        if rebuild {
            self.generation += 1;
            log::debug!(
                "pie rebuilt with {} slices (generation {})",
                self.slices.len(),
                self.generation
            );
        }
        self.recalculate();
        if rebuild {
            Relayout::Rebuild
        } else {
            Relayout::Geometry
        }
    }

    pub fn set_center(&mut self, center: Point) -> Relayout {
        self.update(|pie| pie.center = center, |pie| pie.center == center)
    }

    pub fn set_radius(&mut self, radius: f64) -> Relayout {
        self.update(|pie| pie.radius = radius, |pie| pie.radius == radius)
    }

    pub fn set_label_inset(&mut self, inset: f64) -> Relayout {
        self.update(|pie| pie.label_inset = inset, |pie| pie.label_inset == inset)
    }

    pub fn set_convention(&mut self, convention: AngleConvention) -> Relayout {
        self.update(
            |pie| pie.convention = convention,
            |pie| pie.convention == convention,
        )
    }

    /// Mutates one slice in place. Identity is preserved.
    ///
    /// # Panics
    ///
    /// If `index` is out of range.
    pub fn edit_slice(&mut self, index: usize, edit: impl FnOnce(&mut Slice<C>)) -> Relayout {
        edit(&mut self.slices[index]);
        self.recalculate();
        Relayout::Geometry
    }

    /// Marks `index` as the only selected slice, or clears selection.
    ///
    /// # Panics
    ///
    /// If `index` is out of range.
    pub fn select(&mut self, index: Option<usize>) -> Relayout {
        if let Some(i) = index {
            assert!(i < self.slices.len(), "slice {i} out of range");
        }
        if self.selected() == index {
            return Relayout::None;
        }
        for (i, slice) in self.slices.iter_mut().enumerate() {
            slice.selected = Some(i) == index;
        }
        self.recalculate();
        Relayout::Geometry
    }

    fn update(
        &mut self,
        apply: impl FnOnce(&mut Self),
        unchanged: impl Fn(&Self) -> bool,
    ) -> Relayout {
        if unchanged(self) {
            return Relayout::None;
        }
        apply(self);
        self.recalculate();
        Relayout::Geometry
    }

    fn recalculate(&mut self) {
        self.wedges =
            wedge::layout_wedges(&self.slices, self.center, self.radius, &self.convention);
        self.labels = wedge::layout_labels(
            &self.slices,
            self.center,
            self.radius,
            self.label_inset,
            &self.convention,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::assert_close;
    use crate::wedge::{ColorSet, FillState};

    fn slices(count: usize) -> Vec<Slice<char>> {
        (0..count)
            .map(|i| {
                let start = i as f64 * 30.0;
                Slice::new(start, start + 30.0, ColorSet::new('n', 's', 'd'))
            })
            .collect()
    }

    #[test]
    fn test_resize_vs_rebuild() {
        let mut pie = Pie::new(slices(7), Point::default(), 10.0);
        assert_eq!(pie.generation(), 0);
        assert_eq!(pie.set_slices(slices(7)), Relayout::Geometry);
        assert_eq!(pie.generation(), 0);
        assert_eq!(pie.set_slices(slices(12)), Relayout::Rebuild);
        assert_eq!(pie.generation(), 1);
        assert_eq!(pie.wedges().len(), 12);
    }

    #[test]
    fn test_geometry_setters() {
        let mut pie = Pie::new(slices(3), Point::default(), 10.0).with_label_inset(2.0);
        assert_eq!(pie.set_radius(10.0), Relayout::None);
        assert_eq!(pie.set_radius(20.0), Relayout::Geometry);
        assert_eq!(pie.set_center(Point::new(1.0, 1.0)), Relayout::Geometry);
        assert_eq!(pie.set_convention(AngleConvention::CARTESIAN), Relayout::Geometry);
        assert_eq!(pie.generation(), 0);
        assert_close(pie.radius(), 20.0);
    }

    #[test]
    fn test_selection_is_exclusive() {
        let mut pie = Pie::new(slices(12), Point::default(), 10.0);
        assert_eq!(pie.select(Some(3)), Relayout::Geometry);
        assert_eq!(pie.select(Some(3)), Relayout::None);
        assert_eq!(pie.select(Some(5)), Relayout::Geometry);
        let selected: Vec<_> = pie
            .wedges()
            .iter()
            .filter(|w| w.state == FillState::Selected)
            .map(|w| w.index)
            .collect();
        assert_eq!(selected, vec![5]);
        assert_eq!(pie.wedges()[5].fill, 's');

        pie.select(None);
        assert_eq!(pie.selected(), None);
    }

    #[test]
    fn test_edit_slice_keeps_identity() {
        let mut pie = Pie::new(slices(4), Point::default(), 10.0);
        pie.edit_slice(2, |s| {
            s.enabled = false;
            s.label = Some("x".into());
        });
        assert_eq!(pie.generation(), 0);
        assert_eq!(pie.wedges()[2].fill, 'd');
        assert_eq!(pie.labels().len(), 1);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_select_out_of_range_panics() {
        let mut pie = Pie::new(slices(2), Point::default(), 10.0);
        pie.select(Some(2));
    }
}
