// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Imagedev recording canvas.
//!
//! This crate provides a small implementation of [`Canvas`] and [`Frame`]
//! for **draw-list recording and state tracing**.
//!
//! It does not rasterize:
//! - Every draw list, composite and text call is appended to the frame's
//!   event log together with the frame state at that point.
//! - Every geometry command that would produce pixels is recorded with the
//!   pen and clip it would be drawn with.
//! - Font metrics are nominal and depend only on point size and character
//!   count, so tests can predict them exactly.

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use imagedev_drawable::{
    Canvas, CanvasError, Color, CompositeOp, Drawable, FillRule, FontStyle, Frame, FrameState,
    Gravity, PenState, TypeMetric, check_rgba_len,
};

/// Advance width of every character, as a fraction of the point size.
pub const NOMINAL_ADVANCE: f64 = 0.6;
/// Ascent as a fraction of the point size.
pub const NOMINAL_ASCENT: f64 = 0.8;
/// Descent as a fraction of the point size.
pub const NOMINAL_DESCENT: f64 = 0.2;

/// A persistent frame state change made through a [`Frame`] setter.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// [`Frame::set_gamma`].
    Gamma(f64),
    /// [`Frame::set_fill_rule`].
    FillRule(FillRule),
    /// [`Frame::set_font_family`].
    FontFamily(String),
    /// [`Frame::set_font_weight`].
    FontWeight(u16),
    /// [`Frame::set_font_style`].
    FontStyle(FontStyle),
    /// [`Frame::set_font_point_size`].
    PointSize(f64),
    /// [`Frame::set_fill_color`].
    FillColor(Option<Color>),
    /// [`Frame::set_stroke_color`].
    StrokeColor(Option<Color>),
}

/// Event recorded by a [`RefFrame`].
#[derive(Clone, Debug)]
pub enum Event {
    /// State change and the resulting frame state.
    State {
        /// Change that was applied.
        change: StateChange,
        /// Frame state after applying the change.
        state: FrameState,
    },
    /// A whole draw list and the frame state after evaluating it.
    Draw {
        /// Draw list as received.
        drawables: Vec<Drawable>,
        /// Frame state after the list ran.
        state: FrameState,
    },
    /// A geometry command that produced output, with the pen it used.
    Geometry {
        /// Geometry command.
        drawable: Drawable,
        /// Pen in effect for the command.
        pen: PenState,
        /// Name of the clip path in effect, if any.
        clip: Option<String>,
    },
    /// Another frame composited onto this one.
    Composite {
        /// Source width.
        width: u32,
        /// Source height.
        height: u32,
        /// Destination X of the source's top-left corner.
        x: f64,
        /// Destination Y of the source's top-left corner.
        y: f64,
        /// Compositing operator.
        op: CompositeOp,
    },
    /// Text drawn with [`Frame::annotate`].
    Annotate {
        /// Text.
        text: String,
        /// Origin X.
        x: f64,
        /// Origin Y.
        y: f64,
        /// Placement policy.
        gravity: Gravity,
        /// Clockwise rotation in degrees.
        degrees: f64,
        /// Frame pen at the time of the call.
        pen: PenState,
    },
}

/// Canvas producing [`RefFrame`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct RefCanvas;

impl Canvas for RefCanvas {
    type Frame = RefFrame;

    fn new_frame(
        &self,
        width: u32,
        height: u32,
        background: Color,
    ) -> Result<RefFrame, CanvasError> {
        Ok(RefFrame::new(width, height, background))
    }

    fn frame_from_rgba(
        &self,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<RefFrame, CanvasError> {
        check_rgba_len(width, height, pixels)?;
        let mut frame = RefFrame::new(width, height, Color::TRANSPARENT);
        frame.pixels = Some(pixels.to_vec());
        Ok(frame)
    }
}

/// Frame that records what is drawn into it.
#[derive(Clone, Debug)]
pub struct RefFrame {
    width: u32,
    height: u32,
    background: Color,
    pixels: Option<Vec<u8>>,
    state: FrameState,
    events: Vec<Event>,
}

impl RefFrame {
    /// Creates an empty frame.
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            width,
            height,
            background,
            pixels: None,
            state: FrameState::default(),
            events: Vec::new(),
        }
    }

    /// Background color the frame was created with.
    pub fn background(&self) -> Color {
        self.background
    }

    /// Source pixels, for frames built with [`Canvas::frame_from_rgba`].
    pub fn pixels(&self) -> Option<&[u8]> {
        self.pixels.as_deref()
    }

    /// Returns a slice of recorded events.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Draw lists in the order they were received.
    pub fn draw_lists(&self) -> impl Iterator<Item = &[Drawable]> + '_ {
        self.events.iter().filter_map(|event| match event {
            Event::Draw { drawables, .. } => Some(drawables.as_slice()),
            _ => None,
        })
    }

    /// Geometry commands that produced output, with their pens.
    pub fn geometry(&self) -> impl Iterator<Item = (&Drawable, &PenState)> + '_ {
        self.events.iter().filter_map(|event| match event {
            Event::Geometry { drawable, pen, .. } => Some((drawable, pen)),
            _ => None,
        })
    }

    /// Clears all recorded events but keeps the frame state.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    fn record_state(&mut self, change: StateChange) {
        self.events.push(Event::State {
            change,
            state: self.state.clone(),
        });
    }
}

impl Frame for RefFrame {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
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
            emitted.push(Event::Geometry {
                drawable: drawable.clone(),
                pen: pen.clone(),
                clip: clip.map(|c| c.id.clone()),
            });
        });
        self.events.push(Event::Draw {
            drawables: drawables.to_vec(),
            state: self.state.clone(),
        });
        self.events.extend(emitted);
    }

    fn composite(&mut self, source: &Self, x: f64, y: f64, op: CompositeOp) {
        self.events.push(Event::Composite {
            width: source.width,
            height: source.height,
            x,
            y,
            op,
        });
    }

    fn annotate(&mut self, text: &str, x: f64, y: f64, gravity: Gravity, degrees: f64) {
        self.events.push(Event::Annotate {
            text: text.into(),
            x,
            y,
            gravity,
            degrees,
            pen: self.state.pen.clone(),
        });
    }

    fn font_metrics(&self, text: &str) -> TypeMetric {
        let size = self.state.pen.point_size;
        let ascent = NOMINAL_ASCENT * size;
        let descent = NOMINAL_DESCENT * size;
        TypeMetric {
            ascent,
            descent,
            text_width: NOMINAL_ADVANCE * size * text.chars().count() as f64,
            text_height: ascent + descent,
        }
    }

    fn set_gamma(&mut self, gamma: f64) {
        self.state.gamma = gamma;
        self.record_state(StateChange::Gamma(gamma));
    }

    fn set_fill_rule(&mut self, rule: FillRule) {
        self.state.pen.fill_rule = rule;
        self.record_state(StateChange::FillRule(rule));
    }

    fn set_font_family(&mut self, family: &str) {
        self.state.pen.font.family = family.into();
        self.record_state(StateChange::FontFamily(family.into()));
    }

    fn set_font_weight(&mut self, weight: u16) {
        self.state.pen.font.weight = weight;
        self.record_state(StateChange::FontWeight(weight));
    }

    fn set_font_style(&mut self, style: FontStyle) {
        self.state.pen.font.style = style;
        self.record_state(StateChange::FontStyle(style));
    }

    fn set_font_point_size(&mut self, size: f64) {
        self.state.pen.point_size = size;
        self.record_state(StateChange::PointSize(size));
    }

    fn set_fill_color(&mut self, color: Option<Color>) {
        self.state.pen.fill = color;
        self.record_state(StateChange::FillColor(color));
    }

    fn set_stroke_color(&mut self, color: Option<Color>) {
        self.state.pen.stroke = color;
        self.record_state(StateChange::StrokeColor(color));
    }
}
