//! Rasterization of styled text with run-based decorations.
//!
//! Underline and strikethrough are drawn as contiguous rectangles per
//! visual line rather than per glyph: a run opens when its style flag
//! turns on, and closes (emitting one filled rectangle) when the flag
//! turns off, a hard break occurs, or the line ends.

use glam::ivec2;

use crate::config::{Align, SlideConfig, VAlign};
use crate::fixed::Fixed;
use crate::font::{GlyphProvider, LineMetrics};
use crate::surface::{Rect, Surface};
use crate::text::fit::{blank_spacing, find_size, total_height};
use crate::text::wrap::{line_metrics, scaled_size, wrap, Fragment, Line};
use crate::text::{StyleFlags, StyledText};

/// The text block did not fit its box: some unbreakable atom was wider
/// than the box at the rendered size. The lines that fit were still
/// drawn; handling the truncation is the caller's policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("text does not fit its box")]
pub struct TextOverflow;

/// Draws `text` into `bounds` after applying the config margins.
///
/// With `font_size` unset the largest fitting size is searched; when even
/// size 1 overflows, the text is drawn at size 1 and the overflow is
/// reported. An explicit `font_size` scales with the box diagonal and is
/// laid out exactly once.
pub fn draw_text<P: GlyphProvider, S: Surface>(
    surface: &mut S,
    bounds: Rect,
    text: &StyledText,
    fonts: &P,
    cfg: &SlideConfig,
) -> Result<(), TextOverflow> {
    let bounds = cfg.margin.apply(bounds);

    let (size, height) = match cfg.font_size {
        Some(percent) => {
            let diagonal = ((bounds.size.x * bounds.size.x
                + bounds.size.y * bounds.size.y) as f32)
                .sqrt();
            (percent * diagonal / 100.0, None)
        }
        None => match find_size(text, bounds.size.x, bounds.size.y, fonts, cfg) {
            Some(fit) => (fit.size, Some(fit.height)),
            None => (1.0, None),
        },
    };
    let height = height.or_else(|| total_height(text, bounds.size.x, size, fonts, cfg));
    let overflowed = height.is_none();
    let total = height.unwrap_or(Fixed::ZERO);

    let mut y_offset = match cfg.valign {
        VAlign::Top => Fixed::ZERO,
        VAlign::Middle => Fixed::from_px(bounds.size.y / 2) - total / 2,
        VAlign::Bottom => Fixed::from_px(bounds.size.y) - total,
    };

    for line in wrap(text, bounds.size.x, size, fonts, cfg) {
        match line {
            Line::Overflow => break,
            Line::Blank => y_offset += blank_spacing(size, cfg),
            Line::Text { width, frags } => {
                draw_line(surface, bounds, &frags, width, &mut y_offset, size, fonts, cfg);
            }
        }
    }

    if overflowed {
        Err(TextOverflow)
    } else {
        Ok(())
    }
}

/// An open underline or strikethrough span on the current visual line.
struct DecorationRun {
    underline: bool,
    active: bool,
    start: Fixed,
    metrics: LineMetrics,
}

impl DecorationRun {
    fn new(underline: bool) -> Self {
        Self {
            underline,
            active: false,
            start: Fixed::ZERO,
            metrics: LineMetrics::default(),
        }
    }

    fn open(&mut self, pen_x: Fixed, metrics: LineMetrics) {
        if !self.active {
            self.active = true;
            self.start = pen_x;
            self.metrics = metrics;
        }
    }

    /// Closes the run, yielding the rectangle to fill if the pen advanced
    /// past the recorded start.
    fn close(&mut self, pen_x: Fixed, baseline: Fixed) -> Option<Rect> {
        if !self.active {
            return None;
        }
        self.active = false;

        // Thickness follows the font height, at least one pixel.
        let thickness = (self.metrics.height.ceil() / 20).max(1);
        let y = if self.underline {
            baseline + Fixed::from_px(thickness)
        } else {
            baseline - self.metrics.ascent / 3
        };
        if pen_x <= self.start {
            return None;
        }
        Some(Rect::new(
            ivec2(self.start.ceil(), y.ceil()),
            ivec2(pen_x.ceil() - self.start.ceil(), thickness),
        ))
    }
}

fn draw_line<P: GlyphProvider, S: Surface>(
    surface: &mut S,
    bounds: Rect,
    frags: &[Fragment<'_>],
    width: Fixed,
    y_offset: &mut Fixed,
    size: f32,
    fonts: &P,
    cfg: &SlideConfig,
) {
    let metrics = line_metrics(fonts, frags, size, cfg);

    let mut pen_x = match cfg.align {
        Align::Left => Fixed::ZERO,
        Align::Center => Fixed::from_px(bounds.size.x / 2) - width / 2,
        Align::Right => Fixed::from_px(bounds.size.x) - width,
    };
    let mut baseline = *y_offset + metrics.ascent;

    let mut underline = DecorationRun::new(true);
    let mut strikethrough = DecorationRun::new(false);
    let mut prev: Option<char> = None;

    for frag in frags {
        let frag_size = scaled_size(frag.style, size, cfg);
        let frag_metrics = fonts.metrics(frag.style, frag_size);

        if frag.style.contains(StyleFlags::UNDERLINE) {
            underline.open(pen_x, frag_metrics);
        } else if let Some(rect) = underline.close(pen_x, baseline) {
            surface.fill(rect.offset(bounds.pos), cfg.foreground);
        }
        if frag.style.contains(StyleFlags::STRIKETHROUGH) {
            strikethrough.open(pen_x, frag_metrics);
        } else if let Some(rect) = strikethrough.close(pen_x, baseline) {
            surface.fill(rect.offset(bounds.pos), cfg.foreground);
        }

        for c in frag.text.chars() {
            if c == '\n' {
                // Hard break: close open runs and move to the next row.
                for run in [&mut underline, &mut strikethrough] {
                    if let Some(rect) = run.close(pen_x, baseline) {
                        surface.fill(rect.offset(bounds.pos), cfg.foreground);
                    }
                }
                *y_offset += metrics.height;
                pen_x = Fixed::ZERO;
                baseline = *y_offset + metrics.ascent;
                prev = None;
                continue;
            }

            if let Some(p) = prev {
                pen_x += fonts.kern(frag.style, frag_size, p, c);
            }
            if c == '\t' {
                pen_x += fonts.advance(frag.style, frag_size, ' ') * cfg.tab_size as i32;
            } else {
                if !c.is_whitespace() {
                    if let Some(glyph) = fonts.rasterize(frag.style, frag_size, c) {
                        let x = bounds.pos.x + pen_x.floor() + glyph.left;
                        let y =
                            bounds.pos.y + baseline.floor() - glyph.bottom - glyph.height as i32;
                        surface.blit(
                            ivec2(x, y),
                            glyph.width,
                            glyph.height,
                            &glyph.coverage,
                            cfg.foreground,
                        );
                    }
                }
                pen_x += fonts.advance(frag.style, frag_size, c);
            }
            prev = Some(c);
        }
    }

    for run in [&mut underline, &mut strikethrough] {
        if let Some(rect) = run.close(pen_x, baseline) {
            surface.fill(rect.offset(bounds.pos), cfg.foreground);
        }
    }

    *y_offset += metrics.height;
}
