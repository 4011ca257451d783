// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vello CPU–backed implementation of the imagedev canvas.
//!
//! This crate implements [`Canvas`] and [`Frame`] on top of the sparse-strips
//! [`vello_cpu::RenderContext`]:
//! - Geometry is filled and stroked with the pen state of the draw list.
//! - Text is drawn from `skrifa` glyph outlines, using fonts registered in a
//!   [`FontBook`].
//! - Frames render to RGBA8 and encode to PNG, one file per frame or as an
//!   animated PNG (see [`output`]).
//! - Whole sequences can be blurred, flipped, cropped, scaled, bordered and
//!   colorized (see [`manipulate`]).
//!
//! ```no_run
//! use imagedev_canvas_cpu::{CpuCanvas, FontBook};
//! use imagedev_drawable::{Canvas, Color, Drawable, Frame};
//!
//! let canvas = CpuCanvas::new(FontBook::system());
//! let mut frame = canvas.new_frame(64, 64, Color::WHITE)?;
//! frame.draw(&[Drawable::Circle {
//!     origin_x: 32.0,
//!     origin_y: 32.0,
//!     perim_x: 32.0,
//!     perim_y: 52.0,
//! }]);
//! imagedev_canvas_cpu::output::save_png(&frame, "circle.png")?;
//! # Ok::<(), imagedev_drawable::CanvasError>(())
//! ```

mod fonts;
mod frame;
pub mod manipulate;
pub mod output;

use std::sync::Arc;

use imagedev_drawable::{Canvas, CanvasError, Color, check_rgba_len};

pub use fonts::{FontBook, FontFace};
pub use frame::CpuFrame;

/// Canvas producing [`CpuFrame`]s that share one [`FontBook`].
#[derive(Clone, Debug)]
pub struct CpuCanvas {
    fonts: Arc<FontBook>,
}

impl Default for CpuCanvas {
    fn default() -> Self {
        Self::new(FontBook::system())
    }
}

impl CpuCanvas {
    /// Create a canvas whose frames draw text with `fonts`.
    pub fn new(fonts: FontBook) -> Self {
        Self {
            fonts: Arc::new(fonts),
        }
    }

    /// Fonts shared by this canvas's frames.
    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }
}

/// Checks that a frame size is drawable by `vello_cpu`.
pub(crate) fn frame_size(width: u32, height: u32) -> Result<(u16, u16), CanvasError> {
    let invalid = || CanvasError::InvalidSize { width, height };
    let w = u16::try_from(width).map_err(|_| invalid())?;
    let h = u16::try_from(height).map_err(|_| invalid())?;
    if w == 0 || h == 0 {
        return Err(invalid());
    }
    Ok((w, h))
}

impl Canvas for CpuCanvas {
    type Frame = CpuFrame;

    fn new_frame(
        &self,
        width: u32,
        height: u32,
        background: Color,
    ) -> Result<CpuFrame, CanvasError> {
        let (w, h) = frame_size(width, height)?;
        Ok(CpuFrame::new(w, h, background, self.fonts.clone()))
    }

    fn frame_from_rgba(
        &self,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<CpuFrame, CanvasError> {
        let (w, h) = frame_size(width, height)?;
        check_rgba_len(width, height, pixels)?;
        Ok(CpuFrame::from_rgba(w, h, pixels.to_vec(), self.fonts.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_sizes_must_fit_the_renderer() {
        let canvas = CpuCanvas::new(FontBook::new());
        assert!(matches!(
            canvas.new_frame(0, 10, Color::WHITE),
            Err(CanvasError::InvalidSize { width: 0, .. })
        ));
        assert!(matches!(
            canvas.new_frame(70_000, 10, Color::WHITE),
            Err(CanvasError::InvalidSize { .. })
        ));
        assert!(canvas.new_frame(1, 1, Color::WHITE).is_ok());
    }

    #[test]
    fn rgba_frames_check_buffer_length() {
        let canvas = CpuCanvas::new(FontBook::new());
        assert!(matches!(
            canvas.frame_from_rgba(2, 1, &[0; 4]),
            Err(CanvasError::PixelBuffer {
                expected: 8,
                actual: 4
            })
        ));
    }
}
