//! Word segmentation and greedy line wrapping.
//!
//! Runs are segmented into atoms (words, whitespace spans, and opaque
//! blocks), then grouped left to right into lines that fit a pixel box.
//! Wrapping is a pull-based iterator so the auto-fit search can traverse
//! the same input twice, once for height and once for the final render.

use std::mem;

use crate::config::SlideConfig;
use crate::fixed::Fixed;
use crate::font::{GlyphProvider, LineMetrics};
use crate::text::{Run, StyleFlags, StyledText};

/// An indivisible unit of line wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Atom<'a> {
    pub style: StyleFlags,
    pub text: &'a str,
    pub kind: AtomKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AtomKind {
    Word,
    Space,
    Opaque,
}

/// Splits runs into atoms: opaque runs stay whole, everything else
/// alternates between maximal whitespace and non-whitespace spans.
/// Concatenating the atom texts reproduces the run texts exactly.
pub(crate) fn segment(text: &StyledText) -> Atoms<'_> {
    Atoms {
        runs: text.runs(),
        offset: 0,
    }
}

pub(crate) struct Atoms<'a> {
    runs: &'a [Run],
    offset: usize,
}

impl<'a> Iterator for Atoms<'a> {
    type Item = Atom<'a>;

    fn next(&mut self) -> Option<Atom<'a>> {
        loop {
            let run = self.runs.first()?;
            let rest = &run.text[self.offset..];
            if rest.is_empty() {
                self.runs = &self.runs[1..];
                self.offset = 0;
                continue;
            }

            if run.style.is_opaque() {
                self.offset = run.text.len();
                return Some(Atom {
                    style: run.style,
                    text: rest,
                    kind: AtomKind::Opaque,
                });
            }

            let leading_space = rest.chars().next().map_or(false, char::is_whitespace);
            let end = rest
                .char_indices()
                .find(|&(_, c)| c.is_whitespace() != leading_space)
                .map_or(rest.len(), |(i, _)| i);
            self.offset += end;
            return Some(Atom {
                style: run.style,
                text: &rest[..end],
                kind: if leading_space {
                    AtomKind::Space
                } else {
                    AtomKind::Word
                },
            });
        }
    }
}

/// Applies the big-text scale factor before a size reaches the glyph
/// provider.
pub(crate) fn scaled_size(style: StyleFlags, size: f32, cfg: &SlideConfig) -> f32 {
    if style.contains(StyleFlags::BIG_TEXT) {
        size * cfg.big_text
    } else {
        size
    }
}

/// Measures the advance width of `text` at `size`, including kerning and
/// tab expansion.
pub(crate) fn measure<P: GlyphProvider>(
    fonts: &P,
    style: StyleFlags,
    size: f32,
    text: &str,
    cfg: &SlideConfig,
) -> Fixed {
    let size = scaled_size(style, size, cfg);
    let mut width = Fixed::ZERO;
    let mut prev = None;
    for c in text.chars() {
        if let Some(p) = prev {
            width += fonts.kern(style, size, p, c);
        }
        if c == '\t' {
            width += fonts.advance(style, size, ' ') * cfg.tab_size as i32;
        } else {
            width += fonts.advance(style, size, c);
        }
        prev = Some(c);
    }
    width
}

/// The tallest height and ascent among the fragments of one line.
pub(crate) fn line_metrics<P: GlyphProvider>(
    fonts: &P,
    frags: &[Fragment<'_>],
    size: f32,
    cfg: &SlideConfig,
) -> LineMetrics {
    let mut metrics = LineMetrics::default();
    for frag in frags {
        let m = fonts.metrics(frag.style, scaled_size(frag.style, size, cfg));
        metrics.height = metrics.height.max(m.height);
        metrics.ascent = metrics.ascent.max(m.ascent);
    }
    metrics
}

/// A fragment of a run placed on one visual line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<'a> {
    pub style: StyleFlags,
    pub text: &'a str,
}

/// One element of the wrapped-line sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// A visual line whose measured width fits the box.
    Text {
        width: Fixed,
        frags: Vec<Fragment<'a>>,
    },
    /// An explicit line break (a blank visual line).
    Blank,
    /// A single atom was wider than the box on an empty line; wrapping
    /// stopped here. The current size is too large.
    Overflow,
}

/// Greedily wraps `text` into lines no wider than `box_width` pixels.
///
/// A line fits when its width, rounded up to whole pixels, does not
/// exceed `box_width`; exactly filling the box counts as fitting. The
/// returned iterator is finite and restartable by calling `wrap` again
/// with the same inputs.
pub fn wrap<'a, P: GlyphProvider>(
    text: &'a StyledText,
    box_width: i32,
    size: f32,
    fonts: &'a P,
    cfg: &'a SlideConfig,
) -> WrapLines<'a, P> {
    WrapLines {
        atoms: segment(text),
        carry: Vec::new(),
        fonts,
        cfg,
        size,
        box_width,
        width: Fixed::ZERO,
        line: Vec::new(),
        pending_blank: false,
        done: false,
    }
}

pub struct WrapLines<'a, P> {
    atoms: Atoms<'a>,
    /// Atom remainders awaiting reprocessing, innermost last.
    carry: Vec<Atom<'a>>,
    fonts: &'a P,
    cfg: &'a SlideConfig,
    size: f32,
    box_width: i32,
    width: Fixed,
    line: Vec<Fragment<'a>>,
    pending_blank: bool,
    done: bool,
}

impl<'a, P> WrapLines<'a, P> {
    fn take_line(&mut self) -> Line<'a> {
        Line::Text {
            width: mem::replace(&mut self.width, Fixed::ZERO),
            frags: mem::take(&mut self.line),
        }
    }
}

impl<'a, P: GlyphProvider> Iterator for WrapLines<'a, P> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Line<'a>> {
        if self.pending_blank {
            self.pending_blank = false;
            return Some(Line::Blank);
        }
        if self.done {
            return None;
        }

        loop {
            let Some(mut atom) = self.carry.pop().or_else(|| self.atoms.next()) else {
                // The last buffered line is always emitted, even empty.
                self.done = true;
                return Some(self.take_line());
            };

            match atom.text.find('\n') {
                Some(0) => {
                    let after = &atom.text[1..];
                    if !after.is_empty() {
                        self.carry.push(Atom { text: after, ..atom });
                    }
                    self.pending_blank = true;
                    return Some(self.take_line());
                }
                Some(nl) => {
                    // Pre-split the atom at the hard break; the remainder
                    // is reprocessed after the prefix.
                    self.carry.push(Atom {
                        text: &atom.text[nl..],
                        ..atom
                    });
                    atom.text = &atom.text[..nl];
                }
                None => {}
            }

            let advance = measure(self.fonts, atom.style, self.size, atom.text, self.cfg);
            if (self.width + advance).ceil() > self.box_width {
                if self.width == Fixed::ZERO {
                    // This atom alone exceeds the box.
                    self.done = true;
                    self.carry.clear();
                    return Some(Line::Overflow);
                }
                let full = self.take_line();
                if atom.kind != AtomKind::Space {
                    self.carry.push(atom);
                }
                return Some(full);
            }

            self.width += advance;
            self.line.push(Fragment {
                style: atom.style,
                text: atom.text,
            });
        }
    }
}
