//! Pixel surfaces the renderer draws into.

use glam::IVec2;
use image::{Rgba, RgbaImage};
use palette::Srgba;

/// An axis-aligned pixel rectangle.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Rect {
    /// The position of the top-left corner.
    pub pos: IVec2,
    /// The side lengths.
    pub size: IVec2,
}

impl Rect {
    pub fn new(pos: IVec2, size: IVec2) -> Self {
        Self { pos, size }
    }

    pub fn offset(self, offset: IVec2) -> Self {
        Self {
            pos: self.pos + offset,
            size: self.size,
        }
    }

    pub fn is_empty(self) -> bool {
        self.size.x <= 0 || self.size.y <= 0
    }
}

/// A rectangular, addressable pixel sink.
///
/// The caller owns the surface exclusively for the duration of one render
/// call; the renderer writes only through these operations. All operations
/// clip against the surface bounds.
pub trait Surface {
    /// Overwrites `rect` with `color`.
    fn fill(&mut self, rect: Rect, color: Srgba<u8>);

    /// Composites an alpha coverage mask (row-major, `width * height`
    /// bytes) over the surface, tinted with `color`. `pos` is the
    /// top-left corner of the mask.
    fn blit(&mut self, pos: IVec2, width: u32, height: u32, coverage: &[u8], color: Srgba<u8>);

    /// Composites RGBA pixels over the surface.
    fn blit_image(&mut self, pos: IVec2, pixels: &RgbaImage);
}

impl Surface for RgbaImage {
    fn fill(&mut self, rect: Rect, color: Srgba<u8>) {
        let px = Rgba([color.red, color.green, color.blue, color.alpha]);
        let x1 = (rect.pos.x + rect.size.x).min(self.width() as i32);
        let y1 = (rect.pos.y + rect.size.y).min(self.height() as i32);
        for y in rect.pos.y.max(0)..y1 {
            for x in rect.pos.x.max(0)..x1 {
                self.put_pixel(x as u32, y as u32, px);
            }
        }
    }

    fn blit(&mut self, pos: IVec2, width: u32, height: u32, coverage: &[u8], color: Srgba<u8>) {
        let fg = Rgba([color.red, color.green, color.blue, color.alpha]);
        for dy in 0..height {
            for dx in 0..width {
                let x = pos.x + dx as i32;
                let y = pos.y + dy as i32;
                if x < 0 || y < 0 || x >= self.width() as i32 || y >= self.height() as i32 {
                    continue;
                }
                let mask = coverage[(dy * width + dx) as usize];
                let alpha = (u16::from(mask) * u16::from(color.alpha) / 255) as u8;
                if alpha == 0 {
                    continue;
                }
                let bg = *self.get_pixel(x as u32, y as u32);
                self.put_pixel(x as u32, y as u32, blend(fg, bg, alpha));
            }
        }
    }

    fn blit_image(&mut self, pos: IVec2, pixels: &RgbaImage) {
        for (sx, sy, src) in pixels.enumerate_pixels() {
            let x = pos.x + sx as i32;
            let y = pos.y + sy as i32;
            if x < 0 || y < 0 || x >= self.width() as i32 || y >= self.height() as i32 {
                continue;
            }
            let alpha = src.0[3];
            if alpha == 0 {
                continue;
            }
            if alpha == u8::MAX {
                self.put_pixel(x as u32, y as u32, *src);
            } else {
                let bg = *self.get_pixel(x as u32, y as u32);
                self.put_pixel(x as u32, y as u32, blend(*src, bg, alpha));
            }
        }
    }
}

/// Blends `fg` over `bg` at coverage `alpha`.
fn blend(fg: Rgba<u8>, bg: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    let a = u32::from(alpha);
    let inv = 255 - a;
    let channel = |f: u8, b: u8| ((u32::from(f) * a + u32::from(b) * inv) / 255) as u8;
    Rgba([
        channel(fg.0[0], bg.0[0]),
        channel(fg.0[1], bg.0[1]),
        channel(fg.0[2], bg.0[2]),
        (a + u32::from(bg.0[3]) * inv / 255).min(255) as u8,
    ])
}
