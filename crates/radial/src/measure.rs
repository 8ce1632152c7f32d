/// Anything that can report advance widths for a string in some font.
///
/// The layout engine never shapes text itself; hosts plug in whatever their
/// text stack offers (cairo extents, a glyph atlas, a fixed advance).
pub trait TextMeasure {
    fn char_width(&self, ch: char) -> f64;

    fn text_width(&self, text: &str) -> f64 {
        text.chars().map(|ch| self.char_width(ch)).sum()
    }

    fn char_widths(&self, text: &str) -> Vec<f64> {
        text.chars().map(|ch| self.char_width(ch)).collect()
    }
}

/// Every glyph advances by the same amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvance {
    pub advance: f64,
}

impl FixedAdvance {
    /// Rough average advance of a proportional sans face.
    pub const SANS_RATIO: f64 = 0.6;

    pub fn new(advance: f64) -> Self {
        Self { advance }
    }

    pub fn for_font_size(font_size: f64) -> Self {
        Self::new(font_size * Self::SANS_RATIO)
    }
}

impl TextMeasure for FixedAdvance {
    fn char_width(&self, _ch: char) -> f64 {
        self.advance
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn char_width(&self, ch: char) -> f64 {
        (**self).char_width(ch)
    }

    fn text_width(&self, text: &str) -> f64 {
        (**self).text_width(text)
    }

    fn char_widths(&self, text: &str) -> Vec<f64> {
        (**self).char_widths(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_advance_sums_chars() {
        let m = FixedAdvance::new(6.0);
        assert_eq!(m.text_width("Major"), 30.0);
        assert_eq!(m.char_widths("ab"), vec![6.0, 6.0]);
        assert_eq!(m.text_width(""), 0.0);
    }

    #[test]
    fn test_multibyte_chars_count_once() {
        let m = FixedAdvance::new(2.0);
        assert_eq!(m.text_width("vii°"), 8.0);
        assert_eq!(m.char_widths("B♭").len(), 2);
    }

    /// Pulls every glyph after the first in by a fixed kern.
    struct Kerned {
        advance: f64,
        kern: f64,
    }

    impl TextMeasure for Kerned {
        fn char_width(&self, _ch: char) -> f64 {
            self.advance
        }

        fn char_widths(&self, text: &str) -> Vec<f64> {
            text.chars()
                .enumerate()
                .map(|(i, _)| if i == 0 { self.advance } else { self.advance - self.kern })
                .collect()
        }
    }

    fn widths_through<M: TextMeasure>(measure: M, text: &str) -> Vec<f64> {
        measure.char_widths(text)
    }

    #[test]
    fn test_reference_forwards_every_method() {
        let m = Kerned { advance: 5.0, kern: 1.0 };
        assert_eq!(widths_through(&m, "abc"), vec![5.0, 4.0, 4.0]);
        assert_eq!(widths_through(&&m, "abc"), m.char_widths("abc"));
    }
}
