// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The device callback surface and its canvas-backed implementation.

use std::fmt;
use std::sync::{Arc, Mutex};

use imagedev_drawable::{
    Canvas, Color, CompositeOp, Drawable, FillRule, Frame, Gravity, ImageSequence, Point,
};

use crate::{DeviceBounds, DeviceDescriptor, DeviceError, GraphicsContext, builder, style};

/// Image shared between a device and whoever created it.
///
/// The device locks it for the length of each callback.
pub type ImageHandle<F> = Arc<Mutex<ImageSequence<F>>>;

/// Metrics of a single character.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// Height above the baseline.
    pub ascent: f64,
    /// Depth below the baseline, as a non-negative distance.
    pub descent: f64,
    /// Advance width.
    pub width: f64,
}

/// Callbacks a host graphics engine invokes on a device.
///
/// Coordinates are device units with the origin at the top left. Drawing
/// callbacks apply to the last page and fail with [`DeviceError::NoPages`]
/// before the first [`GraphicsDevice::new_page`], and with
/// [`DeviceError::Closed`] after [`GraphicsDevice::close`].
pub trait GraphicsDevice {
    /// Start a new page filled with the context's fill color.
    fn new_page(&mut self, gc: &GraphicsContext) -> Result<(), DeviceError>;

    /// Clip later drawing on the current page to a rectangle.
    fn clip(&mut self, left: f64, right: f64, bottom: f64, top: f64) -> Result<(), DeviceError>;

    /// Draw a line segment.
    fn line(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        gc: &GraphicsContext,
    ) -> Result<(), DeviceError>;

    /// Draw connected segments without filling them.
    fn polyline(&mut self, points: &[Point], gc: &GraphicsContext) -> Result<(), DeviceError>;

    /// Draw a closed polygon.
    fn polygon(&mut self, points: &[Point], gc: &GraphicsContext) -> Result<(), DeviceError>;

    /// Draw a rectangle from its bottom-left and top-right corners.
    fn rect(
        &mut self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        gc: &GraphicsContext,
    ) -> Result<(), DeviceError>;

    /// Draw a circle.
    fn circle(&mut self, x: f64, y: f64, r: f64, gc: &GraphicsContext)
    -> Result<(), DeviceError>;

    /// Draw a path of closed subpaths.
    ///
    /// `subpath_lens` splits `points` into subpaths. `winding` selects the
    /// non-zero fill rule; otherwise even-odd is used.
    fn path(
        &mut self,
        points: &[Point],
        subpath_lens: &[usize],
        winding: bool,
        gc: &GraphicsContext,
    ) -> Result<(), DeviceError>;

    /// Draw a raster image of packed host colors, `w` by `h` pixels.
    ///
    /// `(x, y)` is the bottom-left corner. The target `width`, `height`,
    /// `rot` and `interpolate` are accepted but not applied.
    fn raster(
        &mut self,
        raster: &[u32],
        w: u32,
        h: u32,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rot: f64,
        interpolate: bool,
        gc: &GraphicsContext,
    ) -> Result<(), DeviceError>;

    /// Draw text with its baseline origin at `(x, y)`, rotated `rot` degrees
    /// counter-clockwise.
    ///
    /// `hadj` is ignored: the device asks the host to adjust text itself.
    fn text(
        &mut self,
        x: f64,
        y: f64,
        text: &str,
        rot: f64,
        hadj: f64,
        gc: &GraphicsContext,
    ) -> Result<(), DeviceError>;

    /// UTF-8 text entry point; same as [`GraphicsDevice::text`].
    fn text_utf8(
        &mut self,
        x: f64,
        y: f64,
        text: &str,
        rot: f64,
        hadj: f64,
        gc: &GraphicsContext,
    ) -> Result<(), DeviceError> {
        self.text(x, y, text, rot, hadj, gc)
    }

    /// Advance width of `text`.
    fn str_width(&mut self, text: &str, gc: &GraphicsContext) -> Result<f64, DeviceError>;

    /// UTF-8 entry point; same as [`GraphicsDevice::str_width`].
    fn str_width_utf8(&mut self, text: &str, gc: &GraphicsContext) -> Result<f64, DeviceError> {
        self.str_width(text, gc)
    }

    /// Metrics of one character.
    ///
    /// Negative `c` is the Unicode code point `-c`. Non-negative `c` is a
    /// code point in a multibyte locale and a Latin-1 byte otherwise.
    fn metric_info(&mut self, c: i32, gc: &GraphicsContext) -> Result<TextMetrics, DeviceError>;

    /// Page box.
    fn size(&self) -> DeviceBounds;

    /// Release the image. Later drawing callbacks fail; closing twice is a
    /// no-op.
    fn close(&mut self);
}

/// Character named by a metric query code.
///
/// Codes that name no character map to U+FFFD.
pub fn metric_char(c: i32, multibyte_locale: bool) -> char {
    let code = c.unsigned_abs();
    if c >= 0 && !multibyte_locale && code > 0xFF {
        return char::REPLACEMENT_CHARACTER;
    }
    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// A graphics device drawing into an [`ImageSequence`] of canvas frames.
pub struct ImageDevice<C: Canvas> {
    canvas: C,
    image: Option<ImageHandle<C::Frame>>,
    descriptor: DeviceDescriptor,
    multibyte_locale: bool,
}

impl<C: Canvas> fmt::Debug for ImageDevice<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageDevice")
            .field("closed", &self.image.is_none())
            .field("descriptor", &self.descriptor)
            .field("multibyte_locale", &self.multibyte_locale)
            .finish_non_exhaustive()
    }
}

impl<C: Canvas> ImageDevice<C> {
    /// Create a device that appends pages to `image`.
    pub fn new(
        canvas: C,
        image: ImageHandle<C::Frame>,
        descriptor: DeviceDescriptor,
        multibyte_locale: bool,
    ) -> Self {
        Self {
            canvas,
            image: Some(image),
            descriptor,
            multibyte_locale,
        }
    }

    /// Capabilities announced to the host.
    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    /// The bound image, or `None` once closed.
    pub fn image(&self) -> Option<&ImageHandle<C::Frame>> {
        self.image.as_ref()
    }

    /// Returns `true` once the device has been closed.
    pub fn is_closed(&self) -> bool {
        self.image.is_none()
    }

    fn with_sequence<R>(
        &self,
        f: impl FnOnce(&mut ImageSequence<C::Frame>) -> Result<R, DeviceError>,
    ) -> Result<R, DeviceError> {
        let image = self.image.as_ref().ok_or(DeviceError::Closed)?;
        let mut sequence = image.lock().map_err(|_| DeviceError::Poisoned)?;
        f(&mut sequence)
    }

    fn with_frame<R>(
        &self,
        f: impl FnOnce(&mut C::Frame) -> Result<R, DeviceError>,
    ) -> Result<R, DeviceError> {
        self.with_sequence(|sequence| {
            let frame = sequence.last_frame_mut().ok_or(DeviceError::NoPages)?;
            f(frame)
        })
    }

    fn draw(&self, gc: &GraphicsContext, geometry: Vec<Drawable>) -> Result<(), DeviceError> {
        let list = builder::styled_drawables(gc, geometry);
        self.with_frame(|frame| {
            frame.set_gamma(gc.gamma);
            frame.draw(&list);
            Ok(())
        })
    }
}

fn apply_font<F: Frame>(frame: &mut F, gc: &GraphicsContext) {
    let font = style::font_spec(gc);
    frame.set_font_family(&font.family);
    frame.set_font_weight(font.weight);
    frame.set_font_style(font.style);
    frame.set_font_point_size(style::point_size(gc));
}

impl<C: Canvas> GraphicsDevice for ImageDevice<C> {
    fn new_page(&mut self, gc: &GraphicsContext) -> Result<(), DeviceError> {
        let background = gc.fill.to_color().unwrap_or(Color::TRANSPARENT);
        let bounds = self.descriptor.bounds;
        self.with_sequence(|sequence| {
            let frame = self
                .canvas
                .new_frame(bounds.width(), bounds.height(), background)?;
            sequence.push_frame(frame);
            tracing::debug!(page = sequence.len(), "new page");
            Ok(())
        })
    }

    fn clip(&mut self, left: f64, right: f64, bottom: f64, top: f64) -> Result<(), DeviceError> {
        tracing::trace!(left, right, bottom, top, "clip");
        let list = builder::clip_region(left, right, bottom, top);
        self.with_frame(|frame| {
            frame.draw(&list);
            Ok(())
        })
    }

    fn line(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        gc: &GraphicsContext,
    ) -> Result<(), DeviceError> {
        tracing::trace!(x1, y1, x2, y2, "line");
        self.draw(gc, builder::line(x1, y1, x2, y2))
    }

    fn polyline(&mut self, points: &[Point], gc: &GraphicsContext) -> Result<(), DeviceError> {
        tracing::trace!(n = points.len(), "polyline");
        self.draw(gc, builder::polyline(points))
    }

    fn polygon(&mut self, points: &[Point], gc: &GraphicsContext) -> Result<(), DeviceError> {
        tracing::trace!(n = points.len(), "polygon");
        self.draw(gc, builder::polygon(points))
    }

    fn rect(
        &mut self,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        gc: &GraphicsContext,
    ) -> Result<(), DeviceError> {
        tracing::trace!(x0, y0, x1, y1, "rect");
        self.draw(gc, builder::rectangle(x0, y0, x1, y1))
    }

    fn circle(
        &mut self,
        x: f64,
        y: f64,
        r: f64,
        gc: &GraphicsContext,
    ) -> Result<(), DeviceError> {
        tracing::trace!(x, y, r, "circle");
        self.draw(gc, builder::circle(x, y, r))
    }

    fn path(
        &mut self,
        points: &[Point],
        subpath_lens: &[usize],
        winding: bool,
        gc: &GraphicsContext,
    ) -> Result<(), DeviceError> {
        tracing::trace!(n = points.len(), subpaths = subpath_lens.len(), winding, "path");
        let geometry = builder::path(points, subpath_lens)?;
        let list = builder::styled_drawables(gc, geometry);
        let rule = if winding {
            FillRule::NonZero
        } else {
            FillRule::EvenOdd
        };
        self.with_frame(|frame| {
            frame.set_fill_rule(rule);
            frame.set_gamma(gc.gamma);
            frame.draw(&list);
            Ok(())
        })
    }

    fn raster(
        &mut self,
        raster: &[u32],
        w: u32,
        h: u32,
        x: f64,
        y: f64,
        _width: f64,
        _height: f64,
        _rot: f64,
        _interpolate: bool,
        _gc: &GraphicsContext,
    ) -> Result<(), DeviceError> {
        tracing::trace!(w, h, x, y, "raster");
        let expected = w as usize * h as usize;
        if raster.len() != expected {
            return Err(DeviceError::RasterSize {
                expected,
                actual: raster.len(),
            });
        }
        let bottom = self.descriptor.bounds.bottom;
        self.with_frame(|frame| {
            let pixels: Vec<u8> = raster.iter().flat_map(|px| px.to_le_bytes()).collect();
            let source = self.canvas.frame_from_rgba(w, h, &pixels)?;
            frame.composite(&source, x, bottom - y, CompositeOp::SrcOver);
            Ok(())
        })
    }

    fn text(
        &mut self,
        x: f64,
        y: f64,
        text: &str,
        rot: f64,
        _hadj: f64,
        gc: &GraphicsContext,
    ) -> Result<(), DeviceError> {
        tracing::trace!(x, y, rot, text, "text");
        self.with_frame(|frame| {
            apply_font(frame, gc);
            frame.set_fill_color(gc.col.to_color());
            frame.set_stroke_color(None);
            frame.annotate(text, x, y, Gravity::Forget, -rot);
            Ok(())
        })
    }

    fn str_width(&mut self, text: &str, gc: &GraphicsContext) -> Result<f64, DeviceError> {
        self.with_frame(|frame| {
            apply_font(frame, gc);
            Ok(frame.font_metrics(text).text_width)
        })
    }

    fn metric_info(&mut self, c: i32, gc: &GraphicsContext) -> Result<TextMetrics, DeviceError> {
        let ch = metric_char(c, self.multibyte_locale);
        let mut buf = [0; 4];
        let text = ch.encode_utf8(&mut buf);
        self.with_frame(|frame| {
            apply_font(frame, gc);
            let metric = frame.font_metrics(text);
            Ok(TextMetrics {
                ascent: metric.ascent,
                descent: metric.descent,
                width: metric.text_width,
            })
        })
    }

    fn size(&self) -> DeviceBounds {
        self.descriptor.bounds
    }

    fn close(&mut self) {
        if let Some(image) = self.image.take() {
            let pages = image.lock().map(|sequence| sequence.len()).unwrap_or(0);
            tracing::info!(pages, "graphics device closed");
        }
    }
}
