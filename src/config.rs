//! Per-slide rendering configuration.
//!
//! Configuration is an explicit value passed into every layout and render
//! call; there is no process-wide state. The deck parser mutates a config
//! through [`SlideConfig::set`] from `key=value` attribute lines.

use glam::ivec2;
use palette::Srgba;
use serde::{Deserialize, Serialize};

use crate::color::{parse_color, ColorError};
use crate::surface::Rect;

/// Pixel margins applied to a slide's box before layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Margins {
    pub fn uniform(px: i32) -> Self {
        Self {
            left: px,
            right: px,
            top: px,
            bottom: px,
        }
    }

    /// Shrinks `rect` by the margins.
    pub fn apply(&self, rect: Rect) -> Rect {
        Rect::new(
            rect.pos + ivec2(self.left, self.top),
            rect.size - ivec2(self.left + self.right, self.top + self.bottom),
        )
    }
}

/// Horizontal alignment of each wrapped line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Default for Align {
    fn default() -> Self {
        Align::Center
    }
}

/// Vertical alignment of the whole text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

impl Default for VAlign {
    fn default() -> Self {
        VAlign::Middle
    }
}

/// Resolved configuration for rendering one slide.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideConfig {
    pub foreground: Srgba<u8>,
    pub background: Srgba<u8>,
    pub margin: Margins,
    pub align: Align,
    pub valign: VAlign,
    /// Spaces a tab expands to.
    pub tab_size: u32,
    /// Explicit font size as a percentage of the box diagonal, or `None`
    /// to search for the largest fitting size.
    pub font_size: Option<f32>,
    /// Size multiplier for `==big==` text.
    pub big_text: f32,
    /// Blank-line spacing as a fraction of the font size.
    pub newline_spacing: f32,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            foreground: Srgba::new(0, 0, 0, u8::MAX),
            background: Srgba::new(u8::MAX, u8::MAX, u8::MAX, u8::MAX),
            margin: Margins::uniform(10),
            align: Align::default(),
            valign: VAlign::default(),
            tab_size: 4,
            font_size: None,
            big_text: 2.0,
            newline_spacing: 1.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("`{0}` requires a value")]
    MissingValue(String),
    #[error(transparent)]
    Color(#[from] ColorError),
    #[error("invalid number: {0}")]
    Int(#[from] std::num::ParseIntError),
    #[error("invalid number: {0}")]
    Float(#[from] std::num::ParseFloatError),
    #[error("invalid alignment `{0}`")]
    InvalidAlignment(String),
    #[error("invalid attribute `{0}`")]
    UnknownKey(String),
}

impl SlideConfig {
    /// Applies one `key=value` attribute line.
    pub fn set(&mut self, attr: &str) -> Result<(), ConfigError> {
        let (key, value) = match attr.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (attr, None),
        };
        let require = || value.ok_or_else(|| ConfigError::MissingValue(key.to_owned()));
        let px = |v: &str| -> Result<i32, ConfigError> {
            Ok(v.strip_suffix("px").unwrap_or(v).parse()?)
        };

        match key {
            "foreground" | "fg" => self.foreground = parse_color(require()?)?,
            "background" | "bg" => self.background = parse_color(require()?)?,
            "left" => self.margin.left = px(require()?)?,
            "right" => self.margin.right = px(require()?)?,
            "top" => self.margin.top = px(require()?)?,
            "bottom" => self.margin.bottom = px(require()?)?,
            "margin" => {
                let value = require()?;
                match value.split_once(' ') {
                    None => self.margin = Margins::uniform(px(value)?),
                    Some((vertical, horizontal)) => {
                        let vertical = px(vertical)?;
                        let horizontal = px(horizontal)?;
                        self.margin = Margins {
                            left: horizontal,
                            right: horizontal,
                            top: vertical,
                            bottom: vertical,
                        };
                    }
                }
            }
            "align" => {
                self.align = match require()? {
                    "left" => Align::Left,
                    "center" | "middle" => Align::Center,
                    "right" => Align::Right,
                    other => return Err(ConfigError::InvalidAlignment(other.to_owned())),
                }
            }
            "valign" => {
                self.valign = match require()? {
                    "top" => VAlign::Top,
                    "center" | "middle" => VAlign::Middle,
                    "bottom" => VAlign::Bottom,
                    other => return Err(ConfigError::InvalidAlignment(other.to_owned())),
                }
            }
            "tabsize" => self.tab_size = require()?.parse()?,
            "fontsize" => {
                self.font_size = match require()? {
                    "auto" => None,
                    value => Some(value.parse()?),
                }
            }
            "bigtext" => self.big_text = require()?.parse()?,
            "spacing" => self.newline_spacing = require()?.parse()?,
            _ => return Err(ConfigError::UnknownKey(key.to_owned())),
        }
        Ok(())
    }
}
