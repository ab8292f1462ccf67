//! Auto-fit size search: the largest font size whose wrapped layout still
//! fits the box height.

use crate::config::SlideConfig;
use crate::fixed::Fixed;
use crate::font::GlyphProvider;
use crate::text::wrap::{line_metrics, wrap, Line};
use crate::text::StyledText;

/// Upper bound for the doubling search, so inputs for which every size
/// fits (an empty block) still terminate.
const MAX_SIZE: f32 = 1024.0;

/// Granularity of the refinement scan.
const SIZE_STEP: f32 = 0.5;

/// The outcome of an auto-fit search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitResult {
    pub size: f32,
    pub height: Fixed,
}

/// Total height of `text` wrapped at `size`, or `None` when a single atom
/// is wider than the box.
pub fn total_height<P: GlyphProvider>(
    text: &StyledText,
    box_width: i32,
    size: f32,
    fonts: &P,
    cfg: &SlideConfig,
) -> Option<Fixed> {
    let mut height = Fixed::ZERO;
    for line in wrap(text, box_width, size, fonts, cfg) {
        match line {
            Line::Overflow => return None,
            Line::Blank => height += blank_spacing(size, cfg),
            Line::Text { frags, .. } => {
                height += line_metrics(fonts, &frags, size, cfg).height;
            }
        }
    }
    Some(height)
}

/// Vertical space taken by an explicit blank line.
pub(crate) fn blank_spacing(size: f32, cfg: &SlideConfig) -> Fixed {
    Fixed::from_px((size * cfg.newline_spacing) as i32)
}

/// Finds the largest size at which `text` fits a `box_width` x
/// `box_height` box.
///
/// Candidates double from 1 until the layout stops fitting, then the last
/// fitting octave is scanned upward in half-unit steps. Returns `None`
/// when even size 1 does not fit; the caller chooses the fallback.
pub fn find_size<P: GlyphProvider>(
    text: &StyledText,
    box_width: i32,
    box_height: i32,
    fonts: &P,
    cfg: &SlideConfig,
) -> Option<FitResult> {
    let fits = |size: f32| {
        total_height(text, box_width, size, fonts, cfg).filter(|h| h.ceil() < box_height)
    };

    let mut best = FitResult {
        size: 1.0,
        height: fits(1.0)?,
    };

    // Expansion: double until the first size that fails.
    let mut upper = 2.0;
    while upper <= MAX_SIZE {
        match fits(upper) {
            Some(height) => {
                best = FitResult {
                    size: upper,
                    height,
                };
                upper *= 2.0;
            }
            None => break,
        }
    }

    // Refinement: scan the remaining interval upward, keeping the largest
    // size that fits.
    let mut size = best.size + SIZE_STEP;
    while size < upper {
        if let Some(height) = fits(size) {
            best = FitResult { size, height };
        }
        size += SIZE_STEP;
    }

    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::testing::TestFonts;
    use crate::text::markup::parse;

    fn cfg() -> SlideConfig {
        SlideConfig::default()
    }

    #[test]
    fn height_sums_lines_and_blank_spacing() {
        let fonts = TestFonts::default();
        let cfg = cfg();
        let text = parse("a\n\nb");
        // Lines: "a", blank, "", blank, "b" at size 10: 10 + 10 + 0 + 10 + 10.
        assert_eq!(
            total_height(&text, 200, 10.0, &fonts, &cfg),
            Some(Fixed::from_px(40))
        );
    }

    #[test]
    fn height_is_none_on_overflow() {
        let fonts = TestFonts::default();
        let cfg = cfg();
        let text = parse("aaaaaaaa");
        assert_eq!(total_height(&text, 20, 10.0, &fonts, &cfg), None);
    }

    #[test]
    fn big_text_raises_line_height() {
        let fonts = TestFonts::default();
        let cfg = cfg();
        let text = parse("a ==b==");
        // The big fragment doubles the tallest height on the line.
        assert_eq!(
            total_height(&text, 200, 10.0, &fonts, &cfg),
            Some(Fixed::from_px(20))
        );
    }

    #[test]
    fn finds_the_largest_fitting_size() {
        let fonts = TestFonts::default();
        let cfg = cfg();
        let text = parse("aaaa");
        // Width: 4 glyphs x size/2 <= 40 up to size 20; height must stay
        // under 20, so 19.0 is the largest half-step that fits.
        let fit = find_size(&text, 40, 20, &fonts, &cfg).unwrap();
        assert_eq!(fit.size, 19.0);
        assert_eq!(fit.height, Fixed::from_f32(19.0));
    }

    #[test]
    fn every_smaller_size_also_fits() {
        let fonts = TestFonts::default();
        let cfg = cfg();
        let text = parse("words that wrap across lines here");
        let fit = find_size(&text, 60, 80, &fonts, &cfg).unwrap();
        let mut size = 1.0;
        while size <= fit.size {
            let height = total_height(&text, 60, size, &fonts, &cfg)
                .unwrap_or_else(|| panic!("size {size} overflowed"));
            assert!(height.ceil() < 80, "size {size} does not fit");
            size += 0.5;
        }
    }

    #[test]
    fn degenerate_when_nothing_fits() {
        let fonts = TestFonts::default();
        let cfg = cfg();
        // 100 unbreakable glyphs cannot fit 40 px even at size 1.
        let text = parse(&"a".repeat(100));
        assert_eq!(find_size(&text, 40, 100, &fonts, &cfg), None);
    }

    #[test]
    fn empty_text_terminates() {
        let fonts = TestFonts::default();
        let cfg = cfg();
        let text = parse("");
        let fit = find_size(&text, 100, 100, &fonts, &cfg).unwrap();
        assert!(fit.size >= MAX_SIZE);
        assert_eq!(fit.height, Fixed::ZERO);
    }
}
