// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Persistent frame state and the draw-list interpreter.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{BezPath, Stroke};
use peniko::{Color, Fill};

use crate::{Drawable, FontSpec, LineCap, LineJoin};

/// Pen, brush and font state that geometry is drawn with.
#[derive(Clone, Debug, PartialEq)]
pub struct PenState {
    /// Stroke color; `None` disables stroking.
    pub stroke: Option<Color>,
    /// Fill color; `None` disables filling.
    pub fill: Option<Color>,
    /// Stroke width in device units.
    pub stroke_width: f64,
    /// Cap used at open stroke ends.
    pub line_cap: LineCap,
    /// Join used between stroke segments.
    pub line_join: LineJoin,
    /// Miter limit.
    pub miter_limit: f64,
    /// Dash pattern; empty means solid.
    pub dash_array: Vec<f64>,
    /// Font selection for text.
    pub font: FontSpec,
    /// Font size in points.
    pub point_size: f64,
    /// Fill rule used for filled geometry.
    pub fill_rule: Fill,
}

impl Default for PenState {
    fn default() -> Self {
        Self {
            stroke: None,
            fill: Some(Color::BLACK),
            stroke_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
            dash_array: Vec::new(),
            font: FontSpec::default(),
            point_size: 12.0,
            fill_rule: Fill::EvenOdd,
        }
    }
}

impl PenState {
    /// Apply a style command. Returns `false` for commands that are not style.
    pub fn apply(&mut self, drawable: &Drawable) -> bool {
        match drawable {
            Drawable::StrokeColor(color) => self.stroke = Some(*color),
            Drawable::FillColor(color) => self.fill = *color,
            Drawable::StrokeWidth(width) => self.stroke_width = *width,
            Drawable::StrokeLineCap(cap) => self.line_cap = *cap,
            Drawable::StrokeLineJoin(join) => self.line_join = *join,
            Drawable::MiterLimit(limit) => self.miter_limit = *limit,
            Drawable::Font(font) => self.font = font.clone(),
            Drawable::PointSize(size) => self.point_size = *size,
            Drawable::StrokeDashArray(dashes) => self.dash_array.clone_from(dashes),
            _ => return false,
        }
        true
    }

    /// Stroke parameters for the current pen.
    ///
    /// Dash patterns whose total length is not positive are dropped.
    pub fn stroke_style(&self) -> Stroke {
        let stroke = Stroke::new(self.stroke_width)
            .with_caps(self.line_cap)
            .with_join(self.line_join)
            .with_miter_limit(self.miter_limit);
        let total: f64 = self.dash_array.iter().sum();
        if self.dash_array.iter().all(|d| *d >= 0.0) && total > 0.0 {
            stroke.with_dashes(0.0, self.dash_array.iter().copied())
        } else {
            stroke
        }
    }

    /// Returns `true` if geometry drawn with this pen would produce a visible stroke.
    pub fn strokes(&self) -> bool {
        self.stroke.is_some() && self.stroke_width > 0.0
    }
}

/// A named clip outline.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipPath {
    /// Name given by [`Drawable::PushClipPath`].
    pub id: String,
    /// Union of the outlines defined between push and pop.
    pub path: BezPath,
}

/// State owned by a frame that persists across draw calls.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameState {
    /// Base pen each draw list starts from; changed only through frame setters.
    pub pen: PenState,
    /// Output gamma applied when pixels are read back.
    pub gamma: f64,
    active_clip: Option<ClipPath>,
    clip_paths: Vec<ClipPath>,
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            pen: PenState::default(),
            gamma: 1.0,
            active_clip: None,
            clip_paths: Vec::new(),
        }
    }
}

impl FrameState {
    /// The clip applied to everything drawn on the frame, if any.
    pub fn active_clip(&self) -> Option<&ClipPath> {
        self.active_clip.as_ref()
    }

    /// Look up a defined clip path by name.
    pub fn clip_path(&self, id: &str) -> Option<&ClipPath> {
        self.clip_paths.iter().find(|clip| clip.id == id)
    }

    /// Interpret a draw list.
    ///
    /// Style commands update a pen cloned from [`FrameState::pen`], so they
    /// only affect the rest of `drawables`. Clip definitions and the active
    /// clip selection are stored on the frame. `emit` is called once per
    /// geometry command with the pen and clip in effect at that point.
    pub fn run<F>(&mut self, drawables: &[Drawable], mut emit: F)
    where
        F: FnMut(&Drawable, &PenState, Option<&ClipPath>),
    {
        let mut pen = self.pen.clone();
        let mut defining: Option<ClipPath> = None;
        for drawable in drawables {
            if drawable.is_geometry() {
                match defining.as_mut() {
                    Some(clip) => {
                        if let Some(outline) = drawable.to_bez_path() {
                            clip.path.extend(outline.elements().iter().copied());
                        }
                    }
                    None => emit(drawable, &pen, self.active_clip.as_ref()),
                }
                continue;
            }
            match drawable {
                Drawable::PushClipPath(id) => {
                    defining = Some(ClipPath {
                        id: id.clone(),
                        path: BezPath::new(),
                    });
                }
                Drawable::PopClipPath => {
                    if let Some(clip) = defining.take() {
                        self.define_clip(clip);
                    }
                }
                Drawable::ClipPath(id) => {
                    // Unknown ids leave the current clip in place.
                    if let Some(clip) = self.clip_path(id).cloned() {
                        self.active_clip = Some(clip);
                    }
                }
                style => {
                    pen.apply(style);
                }
            }
        }
        if let Some(clip) = defining {
            self.define_clip(clip);
        }
    }

    fn define_clip(&mut self, clip: ClipPath) {
        match self.clip_paths.iter_mut().find(|c| c.id == clip.id) {
            Some(slot) => *slot = clip,
            None => self.clip_paths.push(clip),
        }
    }
}
