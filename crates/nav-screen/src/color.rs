//! Colors for declared screen chrome
//!
//! Chrome colors are packed `0xAARRGGBB` values. They serialize as hex strings
//! (`#RRGGBB` for opaque colors, `#AARRGGBB` otherwise) so chrome descriptors
//! can be written by hand in JSON.
//!
//! # Usage
//!
//! ```rust
//! use nav_screen::color::Argb;
//!
//! let header: Argb = "#1E3A5F".parse().unwrap();
//! let search = Argb::WHITE;
//! let halfway = header.blend(search, 0.5);
//! assert_eq!(header.blend(search, 1.0), search);
//! assert_ne!(halfway, header);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// Errors
// =============================================================================

/// Color parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// The string is neither `#RRGGBB` nor `#AARRGGBB`
    #[error("Invalid color length: {0}")]
    InvalidLength(String),

    /// A component is not valid hexadecimal
    #[error("Invalid hex digits in color: {0}")]
    InvalidDigits(String),
}

// =============================================================================
// Argb
// =============================================================================

/// A packed `0xAARRGGBB` color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Argb(pub u32);

impl Argb {
    /// Fully transparent black
    pub const TRANSPARENT: Argb = Argb(0x0000_0000);
    /// Opaque black
    pub const BLACK: Argb = Argb(0xFF00_0000);
    /// Opaque white
    pub const WHITE: Argb = Argb(0xFFFF_FFFF);

    /// Build a color from its four components
    pub const fn new(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self(((alpha as u32) << 24) | ((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    /// Build an opaque color
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::new(0xFF, red, green, blue)
    }

    /// Alpha component
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Red component
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green component
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue component
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self((self.0 & 0x00FF_FFFF) | ((alpha as u32) << 24))
    }

    /// Blend towards `to` by `factor`.
    ///
    /// Factors at or beyond the ends return the endpoint colors exactly, so a
    /// finished cross-fade never leaves a rounding residue.
    pub fn blend(self, to: Argb, factor: f32) -> Argb {
        if factor <= 0.0 || self == to {
            return self;
        }
        if factor >= 1.0 {
            return to;
        }
        let mix = |from: u8, to: u8| -> u8 {
            let value = from as f32 + (to as f32 - from as f32) * factor;
            value.round().clamp(0.0, 255.0) as u8
        };
        Argb::new(
            mix(self.alpha(), to.alpha()),
            mix(self.red(), to.red()),
            mix(self.green(), to.green()),
            mix(self.blue(), to.blue()),
        )
    }

    /// Draw `overlay` on top of this color (source-over)
    pub fn composite(self, overlay: Argb) -> Argb {
        let overlay_alpha = overlay.alpha() as f32 / 255.0;
        let base_alpha = self.alpha() as f32 / 255.0;
        let out_alpha = overlay_alpha + base_alpha * (1.0 - overlay_alpha);
        if out_alpha <= 0.0 {
            return Argb::TRANSPARENT;
        }
        let channel = |over: u8, base: u8| -> u8 {
            let value = (over as f32 * overlay_alpha + base as f32 * base_alpha * (1.0 - overlay_alpha))
                / out_alpha;
            value.round().clamp(0.0, 255.0) as u8
        };
        Argb::new(
            (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
            channel(overlay.red(), self.red()),
            channel(overlay.green(), self.green()),
            channel(overlay.blue(), self.blue()),
        )
    }

    /// Hex representation, `#RRGGBB` when opaque
    pub fn to_hex(self) -> String {
        if self.alpha() == 0xFF {
            format!("#{:02X}{:02X}{:02X}", self.red(), self.green(), self.blue())
        } else {
            format!(
                "#{:02X}{:02X}{:02X}{:02X}",
                self.alpha(),
                self.red(),
                self.green(),
                self.blue()
            )
        }
    }
}

impl FromStr for Argb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let value = match hex.len() {
            6 => u32::from_str_radix(hex, 16)
                .map(|rgb| 0xFF00_0000 | rgb)
                .map_err(|_| ColorError::InvalidDigits(s.to_string()))?,
            8 => u32::from_str_radix(hex, 16)
                .map_err(|_| ColorError::InvalidDigits(s.to_string()))?,
            _ => return Err(ColorError::InvalidLength(s.to_string())),
        };
        Ok(Argb(value))
    }
}

impl fmt::Display for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Argb {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Argb> for String {
    fn from(color: Argb) -> Self {
        color.to_hex()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!("#FFFFFF".parse::<Argb>(), Ok(Argb::WHITE));
        assert_eq!("#000000".parse::<Argb>(), Ok(Argb::BLACK));
        assert_eq!("#4C000000".parse::<Argb>(), Ok(Argb(0x4C00_0000)));
        assert_eq!("1E3A5F".parse::<Argb>(), Ok(Argb::rgb(0x1E, 0x3A, 0x5F)));
        assert!(matches!("#FFF".parse::<Argb>(), Err(ColorError::InvalidLength(_))));
        assert!(matches!("#GGGGGG".parse::<Argb>(), Err(ColorError::InvalidDigits(_))));
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(Argb::rgb(255, 0, 128).to_hex(), "#FF0080");
        assert_eq!(Argb(0x3300_0000).to_hex(), "#33000000");
    }

    #[test]
    fn test_blend_endpoints_are_exact() {
        let from = Argb::rgb(0x1E, 0x3A, 0x5F);
        let to = Argb::rgb(0x9D, 0x4E, 0xDD);
        assert_eq!(from.blend(to, 0.0), from);
        assert_eq!(from.blend(to, 1.0), to);
        assert_eq!(from.blend(to, -3.0), from);
        assert_eq!(from.blend(to, 7.0), to);
    }

    #[test]
    fn test_blend_midpoint() {
        let mid = Argb::BLACK.blend(Argb::WHITE, 0.5);
        assert_eq!(mid.alpha(), 0xFF);
        assert_eq!(mid.red(), 128);
        assert_eq!(mid.green(), 128);
        assert_eq!(mid.blue(), 128);
    }

    #[test]
    fn test_composite_status_overlay() {
        let tinted = Argb::WHITE.composite(Argb(0x3300_0000));
        assert_eq!(tinted, Argb::rgb(0xCC, 0xCC, 0xCC));
        assert_eq!(Argb::TRANSPARENT.composite(Argb::TRANSPARENT), Argb::TRANSPARENT);
    }

    #[test]
    fn test_color_serialization() {
        let json = serde_json::to_string(&Argb::rgb(0x06, 0xFF, 0xA5)).unwrap();
        assert_eq!(json, "\"#06FFA5\"");
        let parsed: Argb = serde_json::from_str("\"#8006FFA5\"").unwrap();
        assert_eq!(parsed, Argb(0x8006_FFA5));
        assert!(serde_json::from_str::<Argb>("\"nope\"").is_err());
    }
}
