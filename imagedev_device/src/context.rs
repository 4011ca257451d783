// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-call style snapshot sent by the host.
//!
//! Host enumerations are kept as raw codes because hosts may send values
//! outside the documented sets; the style translator maps unknown codes to
//! defaults.

use crate::HostColor;

/// Host line type code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LineType(pub i32);

impl LineType {
    /// Invisible lines.
    pub const BLANK: Self = Self(-1);
    /// Solid lines.
    pub const SOLID: Self = Self(0);
    /// Dashed.
    pub const DASHED: Self = Self(0x44);
    /// Dotted.
    pub const DOTTED: Self = Self(0x31);
    /// Dot-dash.
    pub const DOTDASH: Self = Self(0x3431);
    /// Long dashes.
    pub const LONGDASH: Self = Self(0x37);
    /// Two-dash.
    pub const TWODASH: Self = Self(0x2622);
}

/// Host line end (cap) code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LineEnd(pub i32);

impl LineEnd {
    /// Round caps.
    pub const ROUND: Self = Self(1);
    /// Butt caps.
    pub const BUTT: Self = Self(2);
    /// Square caps.
    pub const SQUARE: Self = Self(3);
}

/// Host line join code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LineJoinCode(pub i32);

impl LineJoinCode {
    /// Round joins.
    pub const ROUND: Self = Self(1);
    /// Mitre joins.
    pub const MITRE: Self = Self(2);
    /// Bevel joins.
    pub const BEVEL: Self = Self(3);
}

/// Host font face code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontFace(pub i32);

impl FontFace {
    /// Regular.
    pub const PLAIN: Self = Self(1);
    /// Bold.
    pub const BOLD: Self = Self(2);
    /// Italic.
    pub const ITALIC: Self = Self(3);
    /// Bold italic.
    pub const BOLD_ITALIC: Self = Self(4);
    /// Symbol font.
    pub const SYMBOL: Self = Self(5);
}

/// Style for one drawing call. Read-only to the device.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphicsContext {
    /// Stroke color; also the text color.
    pub col: HostColor,
    /// Fill color.
    pub fill: HostColor,
    /// Output gamma.
    pub gamma: f64,
    /// Line width.
    pub lwd: f64,
    /// Line type.
    pub lty: LineType,
    /// Line end style.
    pub lend: LineEnd,
    /// Line join style.
    pub ljoin: LineJoinCode,
    /// Mitre limit.
    pub lmitre: f64,
    /// Character expansion factor.
    pub cex: f64,
    /// Point size.
    pub ps: f64,
    /// Line height multiplier.
    pub lineheight: f64,
    /// Font face.
    pub fontface: FontFace,
    /// Font family; empty selects the default.
    pub fontfamily: String,
}

impl Default for GraphicsContext {
    fn default() -> Self {
        Self {
            col: HostColor::BLACK,
            fill: HostColor::NA,
            gamma: 1.0,
            lwd: 1.0,
            lty: LineType::SOLID,
            lend: LineEnd::ROUND,
            ljoin: LineJoinCode::ROUND,
            lmitre: 10.0,
            cex: 1.0,
            ps: 12.0,
            lineheight: 1.2,
            fontface: FontFace::PLAIN,
            fontfamily: String::new(),
        }
    }
}
