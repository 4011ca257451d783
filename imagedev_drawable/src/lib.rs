// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Imagedev Drawable: the drawable command model and canvas collaborator traits.
//!
//! This crate defines the small, backend-agnostic vocabulary that the
//! `imagedev_device` graphics device speaks to its raster collaborator:
//!
//! - **Drawable commands** ([`Drawable`]): style commands (stroke/fill color,
//!   stroke width, caps, joins, miter limit, font, point size, dash array)
//!   and geometry commands (line, polyline, polygon, rectangle, circle, path),
//!   plus the clip-path commands used to emulate clipping.
//! - **Frame state** ([`FrameState`], [`PenState`]): the persistent pen, font,
//!   fill-rule, gamma and clip state owned by each frame, and the interpreter
//!   that folds a draw list over it.
//! - **Canvas traits** ([`Canvas`], [`Frame`]): how frames are created, drawn
//!   into, composited and queried for font metrics.
//! - **Image sequences** ([`ImageSequence`]): the ordered, multi-frame image a
//!   device draws into.
//!
//! # Draw lists
//!
//! A draw list is an ordered `[Drawable]`. Commands are evaluated in order, so
//! style commands must precede the geometry they govern:
//!
//! ```
//! use imagedev_drawable::{Color, Drawable, FrameState, LineCap};
//!
//! let list = [
//!     Drawable::StrokeColor(Color::BLACK),
//!     Drawable::StrokeWidth(2.0),
//!     Drawable::StrokeLineCap(LineCap::Square),
//!     Drawable::Line { x1: 0.0, y1: 0.0, x2: 10.0, y2: 10.0 },
//! ];
//!
//! let mut state = FrameState::default();
//! let mut widths = Vec::new();
//! state.run(&list, |_geometry, pen, _clip| widths.push(pen.stroke_width));
//! assert_eq!(widths, [2.0]);
//! // Style set inside a list does not leak into the frame's own state.
//! assert_eq!(state.pen.stroke_width, 1.0);
//! ```

#![no_std]

extern crate alloc;

mod canvas;
mod sequence;
mod state;

use alloc::{string::String, vec::Vec};
use kurbo::{BezPath, Shape};

pub use canvas::{Canvas, CanvasError, Frame, Gravity, TypeMetric, check_rgba_len};
pub use kurbo::{Cap as LineCap, Join as LineJoin, Point};
pub use peniko::{Color, Compose as CompositeOp, Fill as FillRule};
pub use sequence::ImageSequence;
pub use state::{ClipPath, FrameState, PenState};

/// Tolerance used when flattening curved geometry (circles) into paths.
pub const PATH_TOLERANCE: f64 = 0.1;

/// Font slant.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Upright glyphs.
    #[default]
    Normal,
    /// Italic glyphs.
    Italic,
    /// Obliqued (slanted) upright glyphs.
    Oblique,
}

/// Font selection carried by [`Drawable::Font`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontSpec {
    /// Family name. An empty string selects the canvas default family.
    pub family: String,
    /// Slant.
    pub style: FontStyle,
    /// CSS-style weight (400 regular, 700 bold).
    pub weight: u16,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: String::new(),
            style: FontStyle::Normal,
            weight: 400,
        }
    }
}

/// Absolute path command.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathCmd {
    /// Start a new subpath at the given point.
    MoveTo(Point),
    /// Draw a straight segment from the current point to the given point.
    LineTo(Point),
}

/// One atomic style or geometry instruction applied to a frame.
///
/// Style commands mutate the pen used by the geometry commands that follow
/// them in the same draw list. Geometry commands fill (with the current fill
/// color, if any) and then stroke (with the current stroke color, if any).
/// [`Drawable::Line`] is never filled.
#[derive(Clone, Debug, PartialEq)]
pub enum Drawable {
    /// Set the stroke color.
    StrokeColor(Color),
    /// Set the fill color; `None` disables filling.
    FillColor(Option<Color>),
    /// Set the stroke width in device units.
    StrokeWidth(f64),
    /// Set the cap used at open stroke ends.
    StrokeLineCap(LineCap),
    /// Set the join used between stroke segments.
    StrokeLineJoin(LineJoin),
    /// Set the miter limit for [`LineJoin::Miter`] joins.
    MiterLimit(f64),
    /// Select the font used by text rendering.
    Font(FontSpec),
    /// Set the font size in points.
    PointSize(f64),
    /// Set the dash pattern; an empty pattern draws solid strokes.
    StrokeDashArray(Vec<f64>),
    /// Straight line between two points.
    Line {
        /// Start X.
        x1: f64,
        /// Start Y.
        y1: f64,
        /// End X.
        x2: f64,
        /// End Y.
        y2: f64,
    },
    /// Open sequence of connected segments.
    ///
    /// Like every fillable primitive, a polyline is filled as if closed when
    /// a fill color is active.
    Polyline(Vec<Point>),
    /// Closed polygon.
    Polygon(Vec<Point>),
    /// Axis-aligned rectangle given by two opposite corners.
    Rectangle {
        /// Upper-left X.
        upper_left_x: f64,
        /// Upper-left Y.
        upper_left_y: f64,
        /// Lower-right X.
        lower_right_x: f64,
        /// Lower-right Y.
        lower_right_y: f64,
    },
    /// Circle given by its center and any point on its circumference.
    Circle {
        /// Center X.
        origin_x: f64,
        /// Center Y.
        origin_y: f64,
        /// X of a point on the circumference.
        perim_x: f64,
        /// Y of a point on the circumference.
        perim_y: f64,
    },
    /// Path made of absolute move/line commands.
    Path(Vec<PathCmd>),
    /// Begin defining a named clip path. Geometry up to the matching
    /// [`Drawable::PopClipPath`] becomes the clip outline instead of being drawn.
    PushClipPath(String),
    /// Finish the clip path definition started by [`Drawable::PushClipPath`].
    PopClipPath,
    /// Make a previously defined clip path the frame's active clip.
    ClipPath(String),
}

impl Drawable {
    /// Returns `true` for commands that produce pixels.
    pub fn is_geometry(&self) -> bool {
        matches!(
            self,
            Self::Line { .. }
                | Self::Polyline(_)
                | Self::Polygon(_)
                | Self::Rectangle { .. }
                | Self::Circle { .. }
                | Self::Path(_)
        )
    }

    /// Returns `true` for geometry whose interior receives the fill color.
    pub fn is_fillable(&self) -> bool {
        self.is_geometry() && !matches!(self, Self::Line { .. })
    }

    /// Outline of a geometry command, or `None` for style and clip commands.
    pub fn to_bez_path(&self) -> Option<BezPath> {
        let mut path = BezPath::new();
        match self {
            Self::Line { x1, y1, x2, y2 } => {
                path.move_to((*x1, *y1));
                path.line_to((*x2, *y2));
            }
            Self::Polyline(points) => push_points(&mut path, points),
            Self::Polygon(points) => {
                push_points(&mut path, points);
                if !points.is_empty() {
                    path.close_path();
                }
            }
            Self::Rectangle {
                upper_left_x,
                upper_left_y,
                lower_right_x,
                lower_right_y,
            } => {
                let rect = kurbo::Rect::new(
                    *upper_left_x,
                    *upper_left_y,
                    *lower_right_x,
                    *lower_right_y,
                )
                .abs();
                path = rect.to_path(PATH_TOLERANCE);
            }
            Self::Circle {
                origin_x,
                origin_y,
                perim_x,
                perim_y,
            } => {
                let center = Point::new(*origin_x, *origin_y);
                let radius = center.distance(Point::new(*perim_x, *perim_y));
                path = kurbo::Circle::new(center, radius).to_path(PATH_TOLERANCE);
            }
            Self::Path(commands) => {
                for cmd in commands {
                    match *cmd {
                        PathCmd::MoveTo(p) => path.move_to(p),
                        PathCmd::LineTo(p) => path.line_to(p),
                    }
                }
            }
            _ => return None,
        }
        Some(path)
    }
}

fn push_points(path: &mut BezPath, points: &[Point]) {
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for p in iter {
            path.line_to(*p);
        }
    }
}

/// Collect `(x, y)` pairs into points.
pub fn coordinates(xs: &[f64], ys: &[f64]) -> Vec<Point> {
    xs.iter()
        .zip(ys)
        .map(|(&x, &y)| Point::new(x, y))
        .collect()
}
