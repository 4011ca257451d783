// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use imagedev_drawable::{
    ClipPath, CompositeOp, Drawable, Frame, FrameState, Gravity, PenState, TypeMetric,
};
use kurbo::{Affine, BezPath, Rect, Stroke};
use peniko::{
    BlendMode, Blob, Color, Fill, ImageAlphaType, ImageData, ImageFormat, ImageQuality,
    ImageSampler,
};
use vello_common::filter_effects::{EdgeMode, Filter, FilterPrimitive};
use vello_cpu::{Image as CpuImage, ImageSource, Pixmap, RenderContext, RenderMode, RenderSettings};

use crate::fonts::FontBook;

/// One resolved drawing operation in a frame's journal.
#[derive(Clone, Debug)]
pub(crate) enum Mark {
    Fill {
        path: BezPath,
        color: Color,
        rule: Fill,
        clip: Option<BezPath>,
    },
    Stroke {
        path: BezPath,
        color: Color,
        stroke: Stroke,
        clip: Option<BezPath>,
    },
    Image {
        image: ImageData,
        transform: Affine,
        op: CompositeOp,
        quality: ImageQuality,
        blur: Option<f32>,
        clip: Option<BezPath>,
    },
}

/// Frame drawn with `vello_cpu`.
///
/// Drawing appends resolved fills, strokes and images to a journal. Pixels
/// are produced on demand by replaying the journal into a fresh render
/// context, so a frame can be read back at any point and keep receiving
/// drawing afterwards.
#[derive(Clone)]
pub struct CpuFrame {
    width: u16,
    height: u16,
    background: Color,
    marks: Vec<Mark>,
    state: FrameState,
    delay: u32,
    fonts: Arc<FontBook>,
}

impl core::fmt::Debug for CpuFrame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CpuFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("background", &self.background)
            .field("marks", &self.marks.len())
            .field("state", &self.state)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl CpuFrame {
    pub(crate) fn new(width: u16, height: u16, background: Color, fonts: Arc<FontBook>) -> Self {
        Self {
            width,
            height,
            background,
            marks: Vec::new(),
            state: FrameState::default(),
            delay: 0,
            fonts,
        }
    }

    /// Frame holding a copy of `pixels`, tightly packed unpremultiplied RGBA8.
    pub(crate) fn from_rgba(width: u16, height: u16, pixels: Vec<u8>, fonts: Arc<FontBook>) -> Self {
        let mut frame = Self::new(width, height, Color::TRANSPARENT, fonts);
        frame.marks.push(Mark::Image {
            image: rgba_image(width, height, pixels),
            transform: Affine::IDENTITY,
            op: CompositeOp::SrcOver,
            quality: ImageQuality::Low,
            blur: None,
            clip: None,
        });
        frame
    }

    /// Blank frame of a new size that keeps this frame's fonts and delay.
    pub(crate) fn derive(&self, width: u16, height: u16, background: Color) -> Self {
        let mut frame = Self::new(width, height, background, self.fonts.clone());
        frame.delay = self.delay;
        frame
    }

    pub(crate) fn push_mark(&mut self, mark: Mark) {
        self.marks.push(mark);
    }

    /// Background color the frame was created with.
    pub fn background(&self) -> Color {
        self.background
    }

    /// Animation delay in centiseconds.
    pub fn delay(&self) -> u32 {
        self.delay
    }

    /// Sets the animation delay in centiseconds.
    pub fn set_delay(&mut self, centiseconds: u32) {
        self.delay = centiseconds;
    }

    /// Fonts available to text drawn on this frame.
    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Number of drawing operations recorded so far.
    pub fn mark_count(&self) -> usize {
        self.marks.len()
    }

    /// Render the frame to tightly packed, unpremultiplied RGBA8 pixels,
    /// with the frame's gamma applied.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut data = self.render_linear();
        apply_gamma(&mut data, self.state.gamma);
        data
    }

    /// The pixel at `(x, y)` as `[r, g, b, a]`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= u32::from(self.width) || y >= u32::from(self.height) {
            return None;
        }
        let data = self.to_rgba8();
        let i = (y as usize * usize::from(self.width) + x as usize) * 4;
        Some([data[i], data[i + 1], data[i + 2], data[i + 3]])
    }

    /// Frame contents as an image, gamma applied.
    pub(crate) fn to_image(&self) -> ImageData {
        rgba_image(self.width, self.height, self.to_rgba8())
    }

    fn render_linear(&self) -> Vec<u8> {
        let settings = RenderSettings {
            render_mode: RenderMode::OptimizeSpeed,
            ..RenderSettings::default()
        };
        let mut ctx = RenderContext::new_with(self.width, self.height, settings);
        ctx.set_paint(self.background);
        ctx.fill_rect(&Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
        for mark in &self.marks {
            replay(&mut ctx, mark);
        }
        let mut pixmap = Pixmap::new(self.width, self.height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        let unpremul = pixmap.take_unpremultiplied();
        let mut bytes = Vec::with_capacity(unpremul.len() * 4);
        for p in unpremul {
            bytes.extend_from_slice(&[p.r, p.g, p.b, p.a]);
        }
        bytes
    }

    fn clip(&self) -> Option<BezPath> {
        self.state.active_clip().map(|clip| clip.path.clone())
    }

    fn emit(&mut self, drawable: &Drawable, pen: &PenState, clip: Option<&ClipPath>) {
        let Some(path) = drawable.to_bez_path() else {
            return;
        };
        let clip = clip.map(|c| c.path.clone());
        if drawable.is_fillable() {
            if let Some(color) = pen.fill {
                self.marks.push(Mark::Fill {
                    path: path.clone(),
                    color,
                    rule: pen.fill_rule,
                    clip: clip.clone(),
                });
            }
        }
        if let (Some(color), true) = (pen.stroke, pen.strokes()) {
            self.marks.push(Mark::Stroke {
                path,
                color,
                stroke: pen.stroke_style(),
                clip,
            });
        }
    }
}

fn replay(ctx: &mut RenderContext, mark: &Mark) {
    let clip = match mark {
        Mark::Fill { clip, .. } | Mark::Stroke { clip, .. } | Mark::Image { clip, .. } => {
            clip.as_ref()
        }
    };
    if let Some(clip) = clip {
        ctx.set_fill_rule(Fill::NonZero);
        ctx.push_clip_layer(clip);
    }
    match mark {
        Mark::Fill {
            path, color, rule, ..
        } => {
            ctx.set_fill_rule(*rule);
            ctx.set_paint(*color);
            ctx.fill_path(path);
        }
        Mark::Stroke {
            path,
            color,
            stroke,
            ..
        } => {
            ctx.set_stroke(stroke.clone());
            ctx.set_paint(*color);
            ctx.stroke_path(path);
        }
        Mark::Image {
            image,
            transform,
            op,
            quality,
            blur,
            ..
        } => {
            let filter = blur.map(|std_deviation| {
                Filter::from_primitive(FilterPrimitive::GaussianBlur {
                    std_deviation,
                    edge_mode: EdgeMode::None,
                })
            });
            let blend = (*op != CompositeOp::SrcOver).then(|| BlendMode::from(*op));
            let layered = filter.is_some() || blend.is_some();
            if layered {
                ctx.push_layer(None, blend, None, None, filter);
            }
            ctx.set_fill_rule(Fill::NonZero);
            ctx.set_transform(*transform);
            ctx.set_paint(CpuImage {
                image: ImageSource::from_peniko_image_data(image),
                sampler: ImageSampler {
                    quality: *quality,
                    ..ImageSampler::default()
                },
            });
            ctx.fill_rect(&Rect::new(
                0.0,
                0.0,
                f64::from(image.width),
                f64::from(image.height),
            ));
            ctx.set_transform(Affine::IDENTITY);
            if layered {
                ctx.pop_layer();
            }
        }
    }
    if clip.is_some() {
        ctx.pop_layer();
    }
}

pub(crate) fn rgba_image(width: u16, height: u16, pixels: Vec<u8>) -> ImageData {
    ImageData {
        data: Blob::from(pixels),
        format: ImageFormat::Rgba8,
        alpha_type: ImageAlphaType::Alpha,
        width: u32::from(width),
        height: u32::from(height),
    }
}

/// Output transfer `c' = c^(1/gamma)` on color channels.
fn apply_gamma(data: &mut [u8], gamma: f64) {
    if !(gamma.is_finite() && gamma > 0.0) || (gamma - 1.0).abs() < f64::EPSILON {
        return;
    }
    let mut table = [0_u8; 256];
    for (i, slot) in table.iter_mut().enumerate() {
        let c = (i as f64 / 255.0).powf(1.0 / gamma);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "value is clamped to [0, 255] before casting"
        )]
        {
            *slot = (c * 255.0).round().clamp(0.0, 255.0) as u8;
        }
    }
    for px in data.chunks_exact_mut(4) {
        for c in &mut px[..3] {
            *c = table[usize::from(*c)];
        }
    }
}

impl Frame for CpuFrame {
    fn width(&self) -> u32 {
        u32::from(self.width)
    }

    fn height(&self) -> u32 {
        u32::from(self.height)
    }

    fn state(&self) -> &FrameState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FrameState {
        &mut self.state
    }

    fn draw(&mut self, drawables: &[Drawable]) {
        let mut emitted = Vec::new();
        self.state.run(drawables, |drawable, pen, clip| {
            emitted.push((drawable.clone(), pen.clone(), clip.cloned()));
        });
        tracing::trace!(commands = drawables.len(), geometry = emitted.len(), "draw");
        for (drawable, pen, clip) in &emitted {
            self.emit(drawable, pen, clip.as_ref());
        }
    }

    fn composite(&mut self, source: &Self, x: f64, y: f64, op: CompositeOp) {
        tracing::debug!(
            width = source.width,
            height = source.height,
            x,
            y,
            ?op,
            "composite"
        );
        let clip = self.clip();
        self.marks.push(Mark::Image {
            image: source.to_image(),
            transform: Affine::translate((x, y)),
            op,
            quality: ImageQuality::Low,
            blur: None,
            clip,
        });
    }

    fn annotate(&mut self, text: &str, x: f64, y: f64, gravity: Gravity, degrees: f64) {
        let pen = &self.state.pen;
        let Some(face) = self.fonts.select(&pen.font) else {
            tracing::warn!("no fonts available, dropping text {text:?}");
            return;
        };
        let size = pen.point_size;
        let (outline, advance) = face.outline(text, size);
        let metric = face.measure(text, size);
        let (ox, oy) = match gravity {
            Gravity::Forget => (x, y),
            Gravity::NorthWest => (x, y + metric.ascent),
            Gravity::Center => (
                (f64::from(self.width) - advance) / 2.0 + x,
                (f64::from(self.height) + metric.ascent - metric.descent) / 2.0 + y,
            ),
        };
        let transform = Affine::translate((ox, oy))
            * Affine::rotate(degrees.to_radians())
            * FontBook::synthesis(face, &pen.font);
        let path = transform * outline;
        let clip = self.clip();
        if let Some(color) = pen.fill {
            self.marks.push(Mark::Fill {
                path: path.clone(),
                color,
                rule: Fill::NonZero,
                clip: clip.clone(),
            });
        }
        if let (Some(color), true) = (pen.stroke, pen.strokes()) {
            let stroke = pen.stroke_style();
            self.marks.push(Mark::Stroke {
                path,
                color,
                stroke,
                clip,
            });
        }
    }

    fn font_metrics(&self, text: &str) -> TypeMetric {
        let pen = &self.state.pen;
        match self.fonts.select(&pen.font) {
            Some(face) => face.measure(text, pen.point_size),
            None => {
                tracing::warn!("no fonts available, reporting empty metrics");
                TypeMetric::default()
            }
        }
    }
}
