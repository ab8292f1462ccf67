//! Presenter view: the current slide, the upcoming slide, and speaker
//! notes on one surface.

use glam::ivec2;
use palette::Srgba;

use crate::deck::Presentation;
use crate::font::GlyphProvider;
use crate::slide::{Slide, SlideContent};
use crate::surface::{Rect, Surface};
use crate::text::StyledText;

/// Draws the presenter view for the slide at `index`: the current slide
/// across the top half, the next slide in the bottom-left quarter, and
/// the speaker notes in the bottom-right quarter.
pub fn draw_presenter<P: GlyphProvider, S: Surface>(
    surface: &mut S,
    bounds: Rect,
    presentation: &Presentation,
    index: usize,
    fonts: &P,
) {
    let Some(slide) = presentation.slides.get(index) else {
        return;
    };

    let half = ivec2(bounds.size.x / 2, bounds.size.y / 2);
    let current = Rect::new(bounds.pos, ivec2(bounds.size.x, half.y));
    let next = Rect::new(bounds.pos + ivec2(0, half.y), half);
    let note = Rect::new(bounds.pos + half, half);

    let background = Srgba::new(50, 50, 50, u8::MAX);
    let foreground = Srgba::new(200, 200, 200, u8::MAX);

    slide.draw(surface, current, fonts);

    match presentation.slides.get(index + 1) {
        Some(upcoming) => upcoming.draw(surface, next, fonts),
        None => surface.fill(next, background),
    }

    if slide.notes.is_empty() {
        surface.fill(note, background);
    } else {
        let mut conf = presentation.conf.clone();
        conf.foreground = foreground;
        conf.background = background;
        // Notes are plain text, not markup.
        let note_slide = Slide {
            conf,
            notes: String::new(),
            content: vec![SlideContent::Text(StyledText::from(slide.notes.as_str()))],
        };
        note_slide.draw(surface, note, fonts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::ivec2;
    use image::RgbaImage;

    use crate::config::SlideConfig;
    use crate::font::testing::TestFonts;

    fn empty_slide() -> Slide {
        Slide {
            conf: SlideConfig::default(),
            notes: String::new(),
            content: Vec::new(),
        }
    }

    #[test]
    fn quadrants_use_the_presenter_scheme() {
        let fonts = TestFonts::default();
        let presentation = Presentation {
            conf: SlideConfig::default(),
            slides: vec![empty_slide()],
        };
        let mut img = RgbaImage::new(40, 40);
        draw_presenter(
            &mut img,
            Rect::new(ivec2(0, 0), ivec2(40, 40)),
            &presentation,
            0,
            &fonts,
        );
        // Current slide: its white background fills the top half.
        assert_eq!(img.get_pixel(5, 5).0, [255, 255, 255, 255]);
        // No next slide and no notes: gray fills the bottom quadrants.
        assert_eq!(img.get_pixel(5, 35).0, [50, 50, 50, 255]);
        assert_eq!(img.get_pixel(35, 35).0, [50, 50, 50, 255]);
    }

    #[test]
    fn next_slide_is_drawn_when_present() {
        let fonts = TestFonts::default();
        let presentation = Presentation {
            conf: SlideConfig::default(),
            slides: vec![empty_slide(), empty_slide()],
        };
        let mut img = RgbaImage::new(40, 40);
        draw_presenter(
            &mut img,
            Rect::new(ivec2(0, 0), ivec2(40, 40)),
            &presentation,
            0,
            &fonts,
        );
        // The next slide's white background covers the bottom-left.
        assert_eq!(img.get_pixel(5, 35).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(35, 35).0, [50, 50, 50, 255]);
    }
}
