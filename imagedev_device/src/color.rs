// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use imagedev_drawable::Color;
use peniko::color::{Srgb, parse_color};

use crate::DeviceError;

/// A color as the host packs it: `r | g << 8 | b << 16 | a << 24`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HostColor(pub u32);

impl HostColor {
    /// "Not available": the host asks for this color not to be set.
    pub const NA: Self = Self(0x8000_0000);
    /// Opaque black.
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    /// Fully transparent white.
    pub const TRANSPARENT_WHITE: Self = Self::rgba(255, 255, 255, 0);

    /// Packs 8-bit channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(r as u32 | (g as u32) << 8 | (b as u32) << 16 | (a as u32) << 24)
    }

    /// Packs an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Returns `true` for [`HostColor::NA`].
    pub const fn is_na(self) -> bool {
        self.0 == Self::NA.0
    }

    /// Channels as `[r, g, b, a]`.
    pub const fn channels(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// The color to draw with, or `None` when the host marked it unavailable.
    pub fn to_color(self) -> Option<Color> {
        if self.is_na() {
            return None;
        }
        let [r, g, b, a] = self.channels();
        Some(Color::from_rgba8(r, g, b, a))
    }
}

impl From<Color> for HostColor {
    fn from(color: Color) -> Self {
        let c = color.to_rgba8();
        Self::rgba(c.r, c.g, c.b, c.a)
    }
}

/// Resolve a CSS color name or hex string (`"white"`, `"#ff000080"`,
/// `"transparent"`) into a host color.
pub fn resolve_color_name(name: &str) -> Result<HostColor, DeviceError> {
    let color = parse_color(name.trim())
        .map_err(|_| DeviceError::UnknownColor(name.to_string()))?
        .to_alpha_color::<Srgb>();
    Ok(HostColor::from(color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing_is_little_endian_rgba() {
        let c = HostColor::rgba(1, 2, 3, 4);
        assert_eq!(c.0, 0x0403_0201);
        assert_eq!(c.channels(), [1, 2, 3, 4]);
        assert_eq!(HostColor::BLACK.0, 0xFF00_0000);
    }

    #[test]
    fn na_has_no_color() {
        assert!(HostColor::NA.is_na());
        assert_eq!(HostColor::NA.to_color(), None);
        assert_eq!(
            HostColor::rgb(255, 0, 0).to_color(),
            Some(Color::from_rgba8(255, 0, 0, 255))
        );
    }

    #[test]
    fn names_resolve() {
        assert_eq!(resolve_color_name("white").unwrap(), HostColor::WHITE);
        assert_eq!(resolve_color_name(" #ff0000 ").unwrap(), HostColor::rgb(255, 0, 0));
        assert_eq!(resolve_color_name("transparent").unwrap().channels()[3], 0);
        assert!(matches!(
            resolve_color_name("not-a-color"),
            Err(DeviceError::UnknownColor(name)) if name == "not-a-color"
        ));
    }
}
