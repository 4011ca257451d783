// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{FontFace, HostColor, LineType};

/// Inches per device unit: the device works in points.
pub const INCHES_PER_POINT: f64 = 1.0 / 72.0;

/// Page box in device units, reported verbatim by `size`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DeviceBounds {
    /// Left edge.
    pub left: f64,
    /// Right edge.
    pub right: f64,
    /// Bottom edge. Device y grows downwards, so this is the height.
    pub bottom: f64,
    /// Top edge.
    pub top: f64,
}

impl DeviceBounds {
    /// Bounds of a `width` by `height` page with the origin at the top left.
    pub fn page(width: u32, height: u32) -> Self {
        Self {
            left: 0.0,
            right: f64::from(width),
            bottom: f64::from(height),
            top: 0.0,
        }
    }

    /// Page width in whole pixels.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "page sizes come from u32 dimensions"
    )]
    pub fn width(&self) -> u32 {
        (self.right - self.left).abs().round() as u32
    }

    /// Page height in whole pixels.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "page sizes come from u32 dimensions"
    )]
    pub fn height(&self) -> u32 {
        (self.bottom - self.top).abs().round() as u32
    }
}

/// Whether drawing colors may carry alpha, as announced to the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColorTransparency {
    /// Alpha is ignored; colors draw opaque.
    None = 1,
    /// Semi-transparent colors blend with what is underneath.
    Semi = 2,
}

/// Transparency support for the page background, as announced to the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BackgroundTransparency {
    /// The background is always opaque.
    None = 1,
    /// The background is either opaque or fully transparent.
    Fully = 2,
    /// Semi-transparent backgrounds too.
    Semi = 3,
}

/// Capabilities and start state the device announces to the host.
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceDescriptor {
    /// Page box.
    pub bounds: DeviceBounds,
    /// Inches per device unit on each axis.
    pub ipr: [f64; 2],
    /// Nominal character width and height in device units.
    pub cra: [f64; 2],
    /// Horizontal offset of a character's reference point.
    pub x_char_offset: f64,
    /// Vertical offset of a character's reference point.
    pub y_char_offset: f64,
    /// Baseline bias for multi-line text.
    pub y_line_bias: f64,
    /// Initial fill (the page background).
    pub start_fill: HostColor,
    /// Initial drawing color.
    pub start_col: HostColor,
    /// Initial point size.
    pub start_ps: f64,
    /// Initial line type.
    pub start_lty: LineType,
    /// Initial font face.
    pub start_font: FontFace,
    /// Initial gamma.
    pub start_gamma: f64,
    /// The device clips to rectangles.
    pub can_clip: bool,
    /// Horizontal text adjustment: 0 means the host adjusts text itself.
    pub can_h_adj: u8,
    /// The device cannot change gamma on request.
    pub can_change_gamma: bool,
    /// Whether the host should record a display list.
    pub display_list_on: bool,
    /// Transparency of drawing colors.
    pub have_transparency: ColorTransparency,
    /// Transparency of the page background.
    pub have_transparent_bg: BackgroundTransparency,
    /// Symbol fonts take UTF-8 text.
    pub want_symbol_utf8: bool,
    /// The device takes UTF-8 text directly.
    pub has_text_utf8: bool,
}

impl DeviceDescriptor {
    /// Descriptor for a page of `bounds` with background `fill` and base
    /// font size `pointsize`.
    pub fn new(bounds: DeviceBounds, fill: HostColor, pointsize: f64) -> Self {
        Self {
            bounds,
            ipr: [INCHES_PER_POINT; 2],
            cra: [0.9 * pointsize, 1.2 * pointsize],
            x_char_offset: 0.4900,
            y_char_offset: 0.3333,
            y_line_bias: 0.2,
            start_fill: fill,
            start_col: HostColor::BLACK,
            start_ps: pointsize,
            start_lty: LineType::SOLID,
            start_font: FontFace::PLAIN,
            start_gamma: 1.0,
            can_clip: true,
            can_h_adj: 0,
            can_change_gamma: false,
            display_list_on: false,
            have_transparency: ColorTransparency::Semi,
            have_transparent_bg: BackgroundTransparency::Fully,
            want_symbol_utf8: true,
            has_text_utf8: true,
        }
    }
}
