//! Font resolution, metrics, and glyph rasterization.
//!
//! Layout and rendering consume fonts through the [`GlyphProvider`]
//! capability, keyed by style and pixel size. [`FontBook`] is the
//! `fontdue`-backed implementation, with faces discovered through
//! `fontdb` and rasterized masks cached in an LRU keyed by face, size,
//! and character.

use std::cell::RefCell;
use std::rc::Rc;

use lru::LruCache;

use crate::fixed::Fixed;
use crate::text::StyleFlags;

/// Vertical metrics of a face at one size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineMetrics {
    /// Baseline-to-top distance.
    pub ascent: Fixed,
    /// Baseline-to-baseline distance between consecutive lines.
    pub height: Fixed,
}

/// An alpha-coverage mask for one glyph, positioned relative to the pen
/// at the baseline.
#[derive(Debug, Clone)]
pub struct RasterizedGlyph {
    /// Horizontal offset from the pen to the left edge of the mask.
    pub left: i32,
    /// Vertical offset from the baseline up to the bottom edge of the
    /// mask; negative for descenders.
    pub bottom: i32,
    pub width: u32,
    pub height: u32,
    /// Row-major coverage, `width * height` bytes.
    pub coverage: Vec<u8>,
}

/// Per-glyph metrics and rasterization.
///
/// Results must be deterministic for fixed `(style, size, char)` inputs
/// within one render pass.
pub trait GlyphProvider {
    /// Horizontal advance of `c`.
    fn advance(&self, style: StyleFlags, size: f32, c: char) -> Fixed;

    /// Kerning adjustment between a rune pair.
    fn kern(&self, style: StyleFlags, size: f32, prev: char, c: char) -> Fixed;

    /// Vertical metrics at `size`.
    fn metrics(&self, style: StyleFlags, size: f32) -> LineMetrics;

    /// Rasterizes `c`, or `None` when the glyph has no coverage.
    fn rasterize(&self, style: StyleFlags, size: f32, c: char) -> Option<Rc<RasterizedGlyph>>;
}

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("failed to parse font data: {0}")]
    Malformed(&'static str),
    #[error("no {0} font found")]
    NotFound(&'static str),
}

/// The four variants of one font family. Missing variants fall back to
/// the nearest present one, ending at `regular`.
#[derive(Default)]
pub struct FontCollection {
    pub regular: Option<fontdue::Font>,
    pub bold: Option<fontdue::Font>,
    pub italic: Option<fontdue::Font>,
    pub bold_italic: Option<fontdue::Font>,
}

impl FontCollection {
    /// Parses one face from raw TTF/OTF data.
    pub fn face_from_bytes(data: &[u8]) -> Result<fontdue::Font, FontError> {
        fontdue::Font::from_bytes(data, fontdue::FontSettings::default())
            .map_err(FontError::Malformed)
    }

    /// Queries a `fontdb` database for the family's four variants.
    pub fn from_database(db: &fontdb::Database, family: fontdb::Family) -> Self {
        let load = |weight: fontdb::Weight, style: fontdb::Style| -> Option<fontdue::Font> {
            let id = db.query(&fontdb::Query {
                families: &[family],
                weight,
                stretch: fontdb::Stretch::default(),
                style,
            })?;
            db.with_face_data(id, |data, index| {
                fontdue::Font::from_bytes(
                    data,
                    fontdue::FontSettings {
                        collection_index: index,
                        ..Default::default()
                    },
                )
                .ok()
            })?
        };

        Self {
            regular: load(fontdb::Weight::NORMAL, fontdb::Style::Normal),
            bold: load(fontdb::Weight::BOLD, fontdb::Style::Normal),
            italic: load(fontdb::Weight::NORMAL, fontdb::Style::Italic),
            bold_italic: load(fontdb::Weight::BOLD, fontdb::Style::Italic),
        }
    }

    fn count(&self) -> usize {
        [&self.regular, &self.bold, &self.italic, &self.bold_italic]
            .iter()
            .filter(|f| f.is_some())
            .count()
    }
}

const GLYPH_CACHE_SIZE: usize = 1024;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
struct GlyphKey {
    /// Face-selecting style bits (bold, italic, code).
    style: u8,
    /// Size in tenths of a pixel.
    size: u32,
    c: char,
}

/// A text family and a mono family, plus the raster cache.
///
/// Interior mutability is limited to the cache; the crate is
/// single-threaded, so a `RefCell` suffices.
pub struct FontBook {
    text: FontCollection,
    mono: FontCollection,
    cache: RefCell<LruCache<GlyphKey, Rc<RasterizedGlyph>>>,
}

impl FontBook {
    /// Builds a font book from explicit collections. The text family must
    /// provide at least a regular face.
    pub fn new(text: FontCollection, mono: FontCollection) -> Result<Self, FontError> {
        if text.regular.is_none() {
            return Err(FontError::NotFound("regular text"));
        }
        Ok(Self {
            text,
            mono,
            cache: RefCell::new(LruCache::new(GLYPH_CACHE_SIZE)),
        })
    }

    /// Loads the system sans-serif and monospace families.
    pub fn system() -> Result<Self, FontError> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        let text = FontCollection::from_database(&db, fontdb::Family::SansSerif);
        let mono = FontCollection::from_database(&db, fontdb::Family::Monospace);
        log::info!(
            "loaded {} sans-serif and {} monospace font variants",
            text.count(),
            mono.count()
        );
        Self::new(text, mono)
    }

    fn face(&self, style: StyleFlags) -> &fontdue::Font {
        let collection = if style.contains(StyleFlags::CODE) && self.mono.regular.is_some() {
            &self.mono
        } else {
            &self.text
        };
        let bold = style.contains(StyleFlags::BOLD);
        let italic = style.contains(StyleFlags::ITALIC);

        let variant = match (bold, italic) {
            (true, true) => collection
                .bold_italic
                .as_ref()
                .or(collection.bold.as_ref())
                .or(collection.italic.as_ref()),
            (true, false) => collection.bold.as_ref(),
            (false, true) => collection.italic.as_ref(),
            (false, false) => None,
        };

        variant
            .or(collection.regular.as_ref())
            .or(self.text.regular.as_ref())
            .expect("FontBook always holds a regular text face")
    }
}

impl GlyphProvider for FontBook {
    fn advance(&self, style: StyleFlags, size: f32, c: char) -> Fixed {
        Fixed::from_f32(self.face(style).metrics(c, size).advance_width)
    }

    fn kern(&self, style: StyleFlags, size: f32, prev: char, c: char) -> Fixed {
        Fixed::from_f32(
            self.face(style)
                .horizontal_kern(prev, c, size)
                .unwrap_or(0.0),
        )
    }

    fn metrics(&self, style: StyleFlags, size: f32) -> LineMetrics {
        match self.face(style).horizontal_line_metrics(size) {
            Some(m) => LineMetrics {
                ascent: Fixed::from_f32(m.ascent),
                height: Fixed::from_f32(m.new_line_size),
            },
            // Fonts without horizontal metrics.
            None => LineMetrics {
                ascent: Fixed::from_f32(size * 0.8),
                height: Fixed::from_f32(size * 1.2),
            },
        }
    }

    fn rasterize(&self, style: StyleFlags, size: f32, c: char) -> Option<Rc<RasterizedGlyph>> {
        let key = GlyphKey {
            style: (style & (StyleFlags::BOLD | StyleFlags::ITALIC | StyleFlags::CODE)).bits(),
            size: (size * 10.0) as u32,
            c,
        };

        let mut cache = self.cache.borrow_mut();
        let glyph = match cache.get(&key) {
            Some(glyph) => Rc::clone(glyph),
            None => {
                let (metrics, coverage) = self.face(style).rasterize(c, size);
                let glyph = Rc::new(RasterizedGlyph {
                    left: metrics.xmin,
                    bottom: metrics.ymin,
                    width: metrics.width as u32,
                    height: metrics.height as u32,
                    coverage,
                });
                cache.put(key, Rc::clone(&glyph));
                glyph
            }
        };

        if glyph.width == 0 || glyph.height == 0 {
            None
        } else {
            Some(glyph)
        }
    }
}
