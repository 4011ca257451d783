// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas collaborator traits.

use alloc::string::{String, ToString};
use peniko::{Color, Compose, Fill};

use crate::{Drawable, FontStyle, FrameState};

/// Errors reported by canvas implementations.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// The requested frame size cannot be represented by the canvas.
    #[error("invalid frame size {width}x{height}")]
    InvalidSize {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// A raw pixel buffer does not match the declared dimensions.
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    PixelBuffer {
        /// Bytes required by the dimensions.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
    },
    /// Writing frame pixels to an output format failed.
    #[error("failed to encode frame: {0}")]
    Encode(String),
}

impl CanvasError {
    /// Wrap an encoder failure.
    pub fn encode(err: impl core::fmt::Display) -> Self {
        Self::Encode(err.to_string())
    }
}

/// Text placement policy for [`Frame::annotate`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Gravity {
    /// Place the text baseline origin exactly at the given coordinates.
    #[default]
    Forget,
    /// Offset from the top-left corner of the frame; the coordinates give the
    /// top-left of the text box rather than its baseline origin.
    NorthWest,
    /// Center the text box on the frame, then offset by the coordinates.
    Center,
}

/// Font metrics for a string.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TypeMetric {
    /// Distance from the baseline to the top of the font's ascenders.
    pub ascent: f64,
    /// Distance from the baseline to the bottom of the descenders, as a
    /// non-negative number.
    pub descent: f64,
    /// Advance width of the whole string.
    pub text_width: f64,
    /// Line height (ascent + descent + leading).
    pub text_height: f64,
}

/// A single page of a multi-frame image.
///
/// Frames carry persistent state ([`FrameState`]): the base pen, font,
/// fill rule, gamma and clip that draw calls start from. The default setter
/// methods update that state; implementations override them when they need
/// to observe the change.
pub trait Frame {
    /// Frame width in pixels.
    fn width(&self) -> u32;

    /// Frame height in pixels.
    fn height(&self) -> u32;

    /// Persistent state of this frame.
    fn state(&self) -> &FrameState;

    /// Mutable access to the persistent state of this frame.
    fn state_mut(&mut self) -> &mut FrameState;

    /// Evaluate a draw list against this frame.
    fn draw(&mut self, drawables: &[Drawable]);

    /// Composite `source` onto this frame with its top-left corner at `(x, y)`.
    fn composite(&mut self, source: &Self, x: f64, y: f64, op: Compose)
    where
        Self: Sized;

    /// Draw `text` using the frame's font and fill state.
    ///
    /// `degrees` rotates the text clockwise around its origin.
    fn annotate(&mut self, text: &str, x: f64, y: f64, gravity: Gravity, degrees: f64);

    /// Measure `text` using the frame's font state.
    fn font_metrics(&self, text: &str) -> TypeMetric;

    /// Set the output gamma.
    fn set_gamma(&mut self, gamma: f64) {
        self.state_mut().gamma = gamma;
    }

    /// Set the fill rule used by subsequent draw lists.
    fn set_fill_rule(&mut self, rule: Fill) {
        self.state_mut().pen.fill_rule = rule;
    }

    /// Set the font family; an empty name selects the canvas default.
    fn set_font_family(&mut self, family: &str) {
        let name = &mut self.state_mut().pen.font.family;
        name.clear();
        name.push_str(family);
    }

    /// Set the font weight.
    fn set_font_weight(&mut self, weight: u16) {
        self.state_mut().pen.font.weight = weight;
    }

    /// Set the font slant.
    fn set_font_style(&mut self, style: FontStyle) {
        self.state_mut().pen.font.style = style;
    }

    /// Set the font size in points.
    fn set_font_point_size(&mut self, size: f64) {
        self.state_mut().pen.point_size = size;
    }

    /// Set the fill color used by text and by draw lists that do not set one.
    fn set_fill_color(&mut self, color: Option<Color>) {
        self.state_mut().pen.fill = color;
    }

    /// Set the stroke color used by text and by draw lists that do not set one.
    fn set_stroke_color(&mut self, color: Option<Color>) {
        self.state_mut().pen.stroke = color;
    }
}

/// Factory for frames.
pub trait Canvas {
    /// Frame type produced by this canvas.
    type Frame: Frame;

    /// Create a frame filled with `background`.
    fn new_frame(
        &self,
        width: u32,
        height: u32,
        background: Color,
    ) -> Result<Self::Frame, CanvasError>;

    /// Create a frame from tightly packed, row-major, unpremultiplied RGBA8 pixels.
    fn frame_from_rgba(
        &self,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Self::Frame, CanvasError>;
}

/// Number of bytes an RGBA8 buffer of the given size must hold.
pub(crate) fn rgba_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

/// Check an RGBA8 buffer against its declared dimensions.
pub fn check_rgba_len(width: u32, height: u32, pixels: &[u8]) -> Result<(), CanvasError> {
    let expected = rgba_len(width, height);
    if pixels.len() == expected {
        Ok(())
    } else {
        Err(CanvasError::PixelBuffer {
            expected,
            actual: pixels.len(),
        })
    }
}
