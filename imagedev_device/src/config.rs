// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Construction parameters for a device.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeviceConfig {
    /// Page background as a CSS color name or hex string.
    pub background: String,
    /// Page width in pixels.
    pub width: u32,
    /// Page height in pixels.
    pub height: u32,
    /// Base font size in points.
    pub pointsize: f64,
    /// Whether non-negative character codes in metric queries are Unicode
    /// code points (multibyte locale) rather than Latin-1 bytes.
    pub multibyte_locale: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            background: "white".into(),
            width: 800,
            height: 600,
            pointsize: 12.0,
            multibyte_locale: true,
        }
    }
}

impl DeviceConfig {
    /// Set the background color name.
    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    /// Set the page size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the base font size.
    pub fn with_pointsize(mut self, pointsize: f64) -> Self {
        self.pointsize = pointsize;
        self
    }

    /// Set how metric queries interpret character codes.
    pub fn with_multibyte_locale(mut self, multibyte: bool) -> Self {
        self.multibyte_locale = multibyte;
        self
    }
}
