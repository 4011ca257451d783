// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw-list assembly for device callbacks.
//!
//! Geometry constructors return the commands for one callback in device
//! coordinates; [`styled_drawables`] prefixes them with the style of the
//! graphics context.

use imagedev_drawable::{Drawable, PathCmd, Point};

use crate::{DeviceError, GraphicsContext, style};

/// Name of the clip path defined by [`clip_region`].
pub const CLIP_ID: &str = "imagedev-clip";

/// Prefix `geometry` with the style commands for `gc`.
///
/// Unavailable colors are omitted, so the frame's own color stays in effect.
pub fn styled_drawables(
    gc: &GraphicsContext,
    geometry: impl IntoIterator<Item = Drawable>,
) -> Vec<Drawable> {
    let mut list = Vec::with_capacity(9);
    if let Some(col) = gc.col.to_color() {
        list.push(Drawable::StrokeColor(col));
    }
    if let Some(fill) = gc.fill.to_color() {
        list.push(Drawable::FillColor(Some(fill)));
    }
    list.extend([
        Drawable::StrokeWidth(gc.lwd),
        Drawable::StrokeLineCap(style::line_cap(gc.lend)),
        Drawable::StrokeLineJoin(style::line_join(gc.ljoin)),
        Drawable::MiterLimit(gc.lmitre),
        Drawable::Font(style::font_spec(gc)),
        Drawable::PointSize(style::point_size(gc)),
        Drawable::StrokeDashArray(style::line_type(gc.lty, gc.lwd)),
    ]);
    list.extend(geometry);
    list
}

/// Straight segment.
pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Vec<Drawable> {
    vec![Drawable::Line { x1, y1, x2, y2 }]
}

/// Open polyline. Filling is switched off first so it is only stroked.
pub fn polyline(points: &[Point]) -> Vec<Drawable> {
    vec![
        Drawable::FillColor(None),
        Drawable::Polyline(points.to_vec()),
    ]
}

/// Closed polygon.
pub fn polygon(points: &[Point]) -> Vec<Drawable> {
    vec![Drawable::Polygon(points.to_vec())]
}

/// Rectangle with corners `(x0, y0)` and `(x1, y1)`.
///
/// The host passes the bottom-left corner first; the y values are swapped
/// so the first corner is the upper-left one in device space.
pub fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Drawable> {
    vec![Drawable::Rectangle {
        upper_left_x: x0,
        upper_left_y: y1,
        lower_right_x: x1,
        lower_right_y: y0,
    }]
}

/// Circle of radius `r` around `(x, y)`.
pub fn circle(x: f64, y: f64, r: f64) -> Vec<Drawable> {
    vec![Drawable::Circle {
        origin_x: x,
        origin_y: y,
        perim_x: x,
        perim_y: y + r,
    }]
}

/// A path of closed subpaths.
///
/// `subpath_lens[i]` points of `points` belong to subpath `i`, in order.
/// Each subpath moves to its first vertex, draws to the rest and back to the
/// first. Empty subpaths are skipped.
pub fn path(points: &[Point], subpath_lens: &[usize]) -> Result<Vec<Drawable>, DeviceError> {
    let expected = subpath_lens
        .iter()
        .try_fold(0_usize, |acc, len| acc.checked_add(*len))
        .unwrap_or(usize::MAX);
    if expected > points.len() {
        return Err(DeviceError::InvalidPath {
            expected,
            actual: points.len(),
        });
    }

    let mut cmds = Vec::with_capacity(expected + subpath_lens.len());
    let mut rest = points;
    for &len in subpath_lens {
        let (subpath, tail) = rest.split_at(len);
        rest = tail;
        let Some((first, others)) = subpath.split_first() else {
            continue;
        };
        cmds.push(PathCmd::MoveTo(*first));
        cmds.extend(others.iter().map(|p| PathCmd::LineTo(*p)));
        cmds.push(PathCmd::LineTo(*first));
    }
    Ok(vec![Drawable::Path(cmds)])
}

/// Define and activate a clip covering `left..right` by `top..bottom`,
/// inset by one unit on every side.
pub fn clip_region(left: f64, right: f64, bottom: f64, top: f64) -> Vec<Drawable> {
    let (x0, x1) = (left.min(right) + 1.0, left.max(right) - 1.0);
    let (y0, y1) = (top.min(bottom) + 1.0, top.max(bottom) - 1.0);
    let corners = [
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ];
    let mut outline = vec![PathCmd::MoveTo(corners[0])];
    outline.extend(corners[1..].iter().map(|p| PathCmd::LineTo(*p)));
    outline.push(PathCmd::LineTo(corners[0]));
    vec![
        Drawable::PushClipPath(CLIP_ID.into()),
        Drawable::Path(outline),
        Drawable::PopClipPath,
        Drawable::ClipPath(CLIP_ID.into()),
    ]
}
