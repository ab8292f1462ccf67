//! Slide presentation typesetting and rendering.
//!
//! `slate` parses a small line-oriented slide-deck format whose bodies use
//! an inline markup dialect, typesets each body into its pixel box
//! (searching for the largest fitting font size when none is configured),
//! and rasterizes slides onto caller-owned pixel surfaces. Underline and
//! strikethrough are drawn as contiguous decoration runs rather than
//! per-glyph marks.
//!
//! The typesetting core is pure and single-threaded: parsing,
//! segmentation, wrapping, sizing, and rendering are computations over
//! immutable inputs, and degraded conditions (a word wider than its box,
//! no fitting size) come back as values for the caller to handle.

pub mod color;
pub mod config;
pub mod deck;
mod fixed;
pub mod font;
pub mod presenter;
pub mod render;
pub mod slide;
pub mod surface;
pub mod text;

pub use color::{parse_color, ColorError};
pub use config::{Align, ConfigError, Margins, SlideConfig, VAlign};
pub use deck::{parse_presentation, DeckError, Presentation};
pub use fixed::Fixed;
pub use font::{FontBook, FontCollection, FontError, GlyphProvider, LineMetrics, RasterizedGlyph};
pub use presenter::draw_presenter;
pub use render::{draw_text, TextOverflow};
pub use slide::{final_slide, ImageSlide, Slide, SlideContent};
pub use surface::{Rect, Surface};
pub use text::fit::{find_size, total_height, FitResult};
pub use text::markup::{parse, MarkupBuilder};
pub use text::wrap::{wrap, Fragment, Line, WrapLines};
pub use text::{Run, StyleFlags, StyledText};
