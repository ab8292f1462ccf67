//! Slides and their content blocks.

use std::path::Path;

use glam::{ivec2, IVec2};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use palette::Srgba;

use crate::config::{Align, SlideConfig, VAlign};
use crate::deck::DeckError;
use crate::font::GlyphProvider;
use crate::render::draw_text;
use crate::surface::{Rect, Surface};
use crate::text::{Run, StyleFlags, StyledText};

/// One slide: its resolved configuration, speaker notes, and content
/// blocks drawn side by side.
pub struct Slide {
    pub conf: SlideConfig,
    pub notes: String,
    pub content: Vec<SlideContent>,
}

pub enum SlideContent {
    Text(StyledText),
    Image(ImageSlide),
}

impl Slide {
    /// Fills the background and draws each content block in its own
    /// column of `bounds`.
    pub fn draw<P: GlyphProvider, S: Surface>(&self, surface: &mut S, bounds: Rect, fonts: &P) {
        surface.fill(bounds, self.conf.background);
        if self.content.is_empty() {
            return;
        }
        let column = bounds.size.x / self.content.len() as i32;
        for (i, content) in self.content.iter().enumerate() {
            let rect = Rect::new(
                bounds.pos + ivec2(column * i as i32, 0),
                ivec2(column, bounds.size.y),
            );
            content.draw(surface, rect, fonts, &self.conf);
        }
    }
}

impl SlideContent {
    fn draw<P: GlyphProvider, S: Surface>(
        &self,
        surface: &mut S,
        bounds: Rect,
        fonts: &P,
        conf: &SlideConfig,
    ) {
        match self {
            SlideContent::Text(text) => {
                if draw_text(surface, bounds, text, fonts, conf).is_err() {
                    log::warn!("slide text is wider than its box; output truncated");
                }
            }
            SlideContent::Image(image) => image.draw(surface, bounds, conf),
        }
    }
}

/// A full-slide image, scaled to fit its box while preserving aspect
/// ratio.
pub struct ImageSlide {
    pixels: RgbaImage,
}

impl ImageSlide {
    /// Loads an image, sniffing the format from its content rather than
    /// the file extension.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DeckError> {
        let path = path.as_ref();
        let image = image::io::Reader::open(path)
            .map_err(DeckError::Io)?
            .with_guessed_format()
            .map_err(DeckError::Io)?
            .decode()
            .map_err(|source| DeckError::Image {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self {
            pixels: image.to_rgba8(),
        })
    }

    pub fn from_pixels(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    fn draw<S: Surface>(&self, surface: &mut S, bounds: Rect, conf: &SlideConfig) {
        let bounds = conf.margin.apply(bounds);
        let src = ivec2(self.pixels.width() as i32, self.pixels.height() as i32);
        let Some(target) = contain(src, bounds, conf.align, conf.valign) else {
            return;
        };
        let scaled = imageops::resize(
            &self.pixels,
            target.size.x as u32,
            target.size.y as u32,
            FilterType::Triangle,
        );
        surface.blit_image(target.pos, &scaled);
    }
}

/// Fits `src` dimensions inside `bounds` preserving aspect ratio, never
/// exceeding the box, positioned by the alignments. `None` when either
/// rectangle is empty.
fn contain(src: IVec2, bounds: Rect, align: Align, valign: VAlign) -> Option<Rect> {
    if src.x <= 0 || src.y <= 0 || bounds.is_empty() {
        return None;
    }
    let scale = (bounds.size.x as f32 / src.x as f32).min(bounds.size.y as f32 / src.y as f32);
    let width = ((src.x as f32 * scale) as i32).min(bounds.size.x);
    let height = ((src.y as f32 * scale) as i32).min(bounds.size.y);
    if width == 0 || height == 0 {
        return None;
    }
    let x = match align {
        Align::Left => 0,
        Align::Center => (bounds.size.x - width) / 2,
        Align::Right => bounds.size.x - width,
    };
    let y = match valign {
        VAlign::Top => 0,
        VAlign::Middle => (bounds.size.y - height) / 2,
        VAlign::Bottom => bounds.size.y - height,
    };
    Some(Rect::new(bounds.pos + ivec2(x, y), ivec2(width, height)))
}

/// The closing slide appended after a presentation's own slides.
pub fn final_slide(mut conf: SlideConfig) -> Slide {
    conf.background = Srgba::new(50, 50, 50, u8::MAX);
    conf.foreground = Srgba::new(200, 200, 200, u8::MAX);
    conf.font_size = Some(3.0);
    conf.valign = VAlign::Top;
    Slide {
        conf,
        notes: String::new(),
        content: vec![SlideContent::Text(StyledText::from_runs([Run {
            style: StyleFlags::BOLD,
            text: "End of Presentation".into(),
        }]))],
    }
}
