//! Color parsing for config attributes.

use palette::Srgba;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("invalid hex color `{0}`")]
    InvalidHex(String),
    #[error("unknown color name `{0}`")]
    UnknownName(String),
}

/// Parses `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, or a CSS color name.
/// Single hex nibbles are doubled (`#f0a` is `#ff00aa`).
pub fn parse_color(s: &str) -> Result<Srgba<u8>, ColorError> {
    let Some(hex) = s.strip_prefix('#') else {
        return palette::named::from_str(s)
            .map(|c| Srgba::new(c.red, c.green, c.blue, u8::MAX))
            .ok_or_else(|| ColorError::UnknownName(s.to_owned()));
    };

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(s.to_owned()));
    }
    let invalid = || ColorError::InvalidHex(s.to_owned());
    let byte = |i: usize| u8::from_str_radix(&hex[2 * i..2 * i + 2], 16).map_err(|_| invalid());
    let nibble = |i: usize| {
        u8::from_str_radix(&hex[i..i + 1], 16)
            .map(|n| n * 0x11)
            .map_err(|_| invalid())
    };

    match hex.len() {
        3 => Ok(Srgba::new(nibble(0)?, nibble(1)?, nibble(2)?, u8::MAX)),
        4 => Ok(Srgba::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Ok(Srgba::new(byte(0)?, byte(1)?, byte(2)?, u8::MAX)),
        8 => Ok(Srgba::new(byte(0)?, byte(1)?, byte(2)?, byte(3)?)),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors() {
        assert_eq!(parse_color("red"), Ok(Srgba::new(255, 0, 0, 255)));
        assert_eq!(parse_color("rebeccapurple"), Ok(Srgba::new(102, 51, 153, 255)));
        assert_eq!(
            parse_color("nosuchcolor"),
            Err(ColorError::UnknownName("nosuchcolor".to_owned()))
        );
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_color("#abc"), Ok(Srgba::new(0xaa, 0xbb, 0xcc, 255)));
        assert_eq!(parse_color("#abcd"), Ok(Srgba::new(0xaa, 0xbb, 0xcc, 0xdd)));
        assert_eq!(parse_color("#102030"), Ok(Srgba::new(0x10, 0x20, 0x30, 255)));
        assert_eq!(
            parse_color("#10203040"),
            Ok(Srgba::new(0x10, 0x20, 0x30, 0x40))
        );
    }

    #[test]
    fn malformed_hex() {
        assert!(matches!(parse_color("#12"), Err(ColorError::InvalidHex(_))));
        assert!(matches!(parse_color("#ggg"), Err(ColorError::InvalidHex(_))));
        assert!(matches!(parse_color("#+1234"), Err(ColorError::InvalidHex(_))));
    }
}
