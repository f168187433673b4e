use std::fmt;
use once_cell::sync::Lazy;
use regex::Regex;

// @module: Hex colour to ASS colour conversion

// @const: Exactly six hex digits, after the leading '#'
static HEX_COLOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9A-Fa-f]{6}$").unwrap()
});

/// A colour in the subtitle format's alpha/blue/green/red layout.
///
/// Alpha follows the format's convention: `0x00` is opaque, `0xFF` is fully
/// transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssColor {
    pub alpha: u8,
    pub blue: u8,
    pub green: u8,
    pub red: u8,
}

impl AssColor {
    /// Opaque white, used whenever a colour cannot be parsed
    pub const WHITE: AssColor = AssColor { alpha: 0x00, blue: 0xFF, green: 0xFF, red: 0xFF };

    /// Half-transparent black used for outlines and shadows in outline mode
    pub const OUTLINE_BLACK: AssColor = AssColor { alpha: 0x80, blue: 0x00, green: 0x00, red: 0x00 };

    /// Convert `#RRGGBB` with an opacity in `[0, 1]`.
    ///
    /// Anything that is not `#` followed by exactly six hex digits yields
    /// opaque white.
    pub fn from_hex(hex: &str, opacity: f64) -> Self {
        let Some(digits) = hex.trim().strip_prefix('#') else {
            return Self::WHITE;
        };

        if !HEX_COLOR_REGEX.is_match(digits) {
            return Self::WHITE;
        }

        match u32::from_str_radix(digits, 16) {
            Ok(rgb) => Self {
                alpha: alpha_byte(opacity),
                red: ((rgb >> 16) & 0xFF) as u8,
                green: ((rgb >> 8) & 0xFF) as u8,
                blue: (rgb & 0xFF) as u8,
            },
            Err(_) => Self::WHITE,
        }
    }

    /// Convert an optional hex string, white when absent
    pub fn from_optional_hex(hex: Option<&str>, opacity: f64) -> Self {
        hex.map_or(Self::WHITE, |h| Self::from_hex(h, opacity))
    }

    /// Colour part only, as used by `\1c`..`\4c` override tags (`&HBBGGRR&`)
    pub fn colour_tag(&self) -> String {
        format!("&H{:02X}{:02X}{:02X}&", self.blue, self.green, self.red)
    }

    /// Alpha part only, as used by `\1a`..`\4a` override tags (`&HAA&`)
    pub fn alpha_tag(&self) -> String {
        format!("&H{:02X}&", self.alpha)
    }
}

/// Packed `&HAABBGGRR` form, as used in style definitions
impl fmt::Display for AssColor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "&H{:02X}{:02X}{:02X}{:02X}", self.alpha, self.blue, self.green, self.red)
    }
}

/// Map an opacity in `[0, 1]` to the format's inverted alpha byte.
/// Out-of-range values are clamped; NaN counts as opaque.
pub fn alpha_byte(opacity: f64) -> u8 {
    let opacity = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };
    ((1.0 - opacity) * 255.0).round() as u8
}
