// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batch manipulation of image sequences.
//!
//! Every operation applies to each frame of its input and returns a new
//! sequence, leaving the input untouched. Frames keep their animation delay.

use imagedev_drawable::{CanvasError, Color, CompositeOp, Frame, Gravity, ImageSequence};
use kurbo::Affine;
use peniko::ImageQuality;

use crate::CpuFrame;
use crate::frame::{Mark, rgba_image};
use crate::frame_size;

/// Gaussian blur with standard deviation `sigma` pixels.
pub fn blur(
    sequence: &ImageSequence<CpuFrame>,
    sigma: f64,
) -> Result<ImageSequence<CpuFrame>, CanvasError> {
    #[allow(clippy::cast_possible_truncation, reason = "blur radii fit in f32")]
    let std_deviation = sigma.max(0.0) as f32;
    sequence.try_map(|frame| {
        Ok(redraw(
            frame,
            frame.width(),
            frame.height(),
            Color::TRANSPARENT,
            Affine::IDENTITY,
            ImageQuality::Low,
            (std_deviation > 0.0).then_some(std_deviation),
        ))
    })
}

/// Mirror every frame top to bottom.
pub fn flip(sequence: &ImageSequence<CpuFrame>) -> Result<ImageSequence<CpuFrame>, CanvasError> {
    sequence.try_map(|frame| {
        let (w, h) = dims(frame);
        let src = frame.to_rgba8();
        let row = w * 4;
        let mut out = Vec::with_capacity(src.len());
        for y in (0..h).rev() {
            out.extend_from_slice(&src[y * row..(y + 1) * row]);
        }
        with_pixels(frame, frame.width(), frame.height(), out)
    })
}

/// Mirror every frame left to right.
pub fn flop(sequence: &ImageSequence<CpuFrame>) -> Result<ImageSequence<CpuFrame>, CanvasError> {
    sequence.try_map(|frame| {
        let (w, _) = dims(frame);
        let src = frame.to_rgba8();
        let mut out = Vec::with_capacity(src.len());
        for row in src.chunks_exact(w * 4) {
            for px in row.chunks_exact(4).rev() {
                out.extend_from_slice(px);
            }
        }
        with_pixels(frame, frame.width(), frame.height(), out)
    })
}

/// Keep the `width` × `height` region whose top-left corner is `(x, y)`.
///
/// The region is clipped to each frame; a region that misses a frame
/// entirely is an error.
pub fn crop(
    sequence: &ImageSequence<CpuFrame>,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> Result<ImageSequence<CpuFrame>, CanvasError> {
    sequence.try_map(|frame| {
        let x1 = x.saturating_add(width).min(frame.width());
        let y1 = y.saturating_add(height).min(frame.height());
        let (cw, ch) = (x1.saturating_sub(x), y1.saturating_sub(y));
        frame_size(cw, ch)?;
        Ok(extract(frame, x, y, cw, ch))
    })
}

/// Remove edges that match the color of each frame's top-left pixel.
///
/// A frame that is a single color is left as is.
pub fn trim(sequence: &ImageSequence<CpuFrame>) -> Result<ImageSequence<CpuFrame>, CanvasError> {
    sequence.try_map(|frame| {
        let (w, h) = dims(frame);
        let src = frame.to_rgba8();
        let at = |x: usize, y: usize| &src[(y * w + x) * 4..(y * w + x) * 4 + 4];
        let corner = at(0, 0);
        let mut bounds: Option<(usize, usize, usize, usize)> = None;
        for y in 0..h {
            for x in 0..w {
                if at(x, y) != corner {
                    let b = bounds.get_or_insert((x, y, x, y));
                    b.0 = b.0.min(x);
                    b.1 = b.1.min(y);
                    b.2 = b.2.max(x);
                    b.3 = b.3.max(y);
                }
            }
        }
        let Some((x0, y0, x1, y1)) = bounds else {
            return Ok(frame.clone());
        };
        let to_u32 = |v: usize| u32::try_from(v).map_err(CanvasError::encode);
        Ok(extract(
            frame,
            to_u32(x0)?,
            to_u32(y0)?,
            to_u32(x1 - x0 + 1)?,
            to_u32(y1 - y0 + 1)?,
        ))
    })
}

/// Resample every frame to `width` × `height`.
pub fn scale(
    sequence: &ImageSequence<CpuFrame>,
    width: u32,
    height: u32,
) -> Result<ImageSequence<CpuFrame>, CanvasError> {
    frame_size(width, height)?;
    sequence.try_map(|frame| {
        let sx = f64::from(width) / f64::from(frame.width());
        let sy = f64::from(height) / f64::from(frame.height());
        Ok(redraw(
            frame,
            width,
            height,
            Color::TRANSPARENT,
            Affine::scale_non_uniform(sx, sy),
            ImageQuality::Medium,
            None,
        ))
    })
}

/// Surround every frame with a `width` pixel wide left and right border and
/// a `height` pixel tall top and bottom border of `color`.
pub fn border(
    sequence: &ImageSequence<CpuFrame>,
    color: Color,
    width: u32,
    height: u32,
) -> Result<ImageSequence<CpuFrame>, CanvasError> {
    sequence.try_map(|frame| {
        let outer_w = frame.width().saturating_add(width.saturating_mul(2));
        let outer_h = frame.height().saturating_add(height.saturating_mul(2));
        frame_size(outer_w, outer_h)?;
        Ok(redraw(
            frame,
            outer_w,
            outer_h,
            color,
            Affine::translate((f64::from(width), f64::from(height))),
            ImageQuality::Low,
            None,
        ))
    })
}

/// Blend `color` into every pixel by `opacity` percent, keeping alpha.
pub fn colorize(
    sequence: &ImageSequence<CpuFrame>,
    color: Color,
    opacity: f64,
) -> Result<ImageSequence<CpuFrame>, CanvasError> {
    let t = (opacity / 100.0).clamp(0.0, 1.0);
    let tint = color.to_rgba8();
    let tint = [tint.r, tint.g, tint.b];
    sequence.try_map(|frame| {
        let mut px = frame.to_rgba8();
        for chunk in px.chunks_exact_mut(4) {
            for (c, target) in chunk[..3].iter_mut().zip(tint) {
                let mixed = f64::from(*c) * (1.0 - t) + f64::from(target) * t;
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "a mix of two bytes stays in [0, 255]"
                )]
                {
                    *c = mixed.round().clamp(0.0, 255.0) as u8;
                }
            }
        }
        with_pixels(frame, frame.width(), frame.height(), px)
    })
}

/// Composite `overlay` onto every frame at `(x, y)` using `op`.
///
/// `(x, y)` is the overlay's top-left corner, or with [`Gravity::Center`]
/// its offset from the centered position.
pub fn composite(
    sequence: &ImageSequence<CpuFrame>,
    overlay: &CpuFrame,
    x: f64,
    y: f64,
    gravity: Gravity,
    op: CompositeOp,
) -> Result<ImageSequence<CpuFrame>, CanvasError> {
    sequence.try_map(|frame| {
        let (ox, oy) = match gravity {
            Gravity::Forget | Gravity::NorthWest => (x, y),
            Gravity::Center => (
                (f64::from(frame.width()) - f64::from(overlay.width())) / 2.0 + x,
                (f64::from(frame.height()) - f64::from(overlay.height())) / 2.0 + y,
            ),
        };
        let mut out = frame.clone();
        out.composite(overlay, ox, oy, op);
        Ok(out)
    })
}

/// Write `text` on every frame in `color` at `point_size`.
///
/// `gravity` decides how `(x, y)` anchors the text: the baseline origin
/// ([`Gravity::Forget`]), the top-left of the text box
/// ([`Gravity::NorthWest`]) or an offset from the frame center
/// ([`Gravity::Center`]).
pub fn annotate(
    sequence: &ImageSequence<CpuFrame>,
    text: &str,
    x: f64,
    y: f64,
    gravity: Gravity,
    point_size: f64,
    color: Color,
) -> Result<ImageSequence<CpuFrame>, CanvasError> {
    sequence.try_map(|frame| {
        let mut out = frame.clone();
        out.set_font_point_size(point_size);
        out.set_fill_color(Some(color));
        out.set_stroke_color(None);
        out.annotate(text, x, y, gravity, 0.0);
        Ok(out)
    })
}

/// Set the animation delay of every frame, in centiseconds.
pub fn delay(sequence: &ImageSequence<CpuFrame>, centiseconds: u32) -> ImageSequence<CpuFrame> {
    sequence
        .iter()
        .map(|frame| {
            let mut frame = frame.clone();
            frame.set_delay(centiseconds);
            frame
        })
        .collect()
}

fn dims(frame: &CpuFrame) -> (usize, usize) {
    (frame.width() as usize, frame.height() as usize)
}

/// Copy of a region that is known to lie inside `frame`.
fn extract(frame: &CpuFrame, x: u32, y: u32, width: u32, height: u32) -> CpuFrame {
    let (w, _) = dims(frame);
    let src = frame.to_rgba8();
    let (x, y, cw, ch) = (x as usize, y as usize, width as usize, height as usize);
    let mut out = Vec::with_capacity(cw * ch * 4);
    for row in y..y + ch {
        let start = (row * w + x) * 4;
        out.extend_from_slice(&src[start..start + cw * 4]);
    }
    let mut cropped = derive(frame, width, height, Color::TRANSPARENT);
    cropped.push_mark(image_mark(width, height, out));
    cropped
}

fn with_pixels(
    frame: &CpuFrame,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
) -> Result<CpuFrame, CanvasError> {
    frame_size(width, height)?;
    let mut out = derive(frame, width, height, Color::TRANSPARENT);
    out.push_mark(image_mark(width, height, pixels));
    Ok(out)
}

/// Draw `frame` onto a new `width` × `height` frame through `transform`.
fn redraw(
    frame: &CpuFrame,
    width: u32,
    height: u32,
    background: Color,
    transform: Affine,
    quality: ImageQuality,
    blur: Option<f32>,
) -> CpuFrame {
    let mut out = derive(frame, width, height, background);
    out.push_mark(Mark::Image {
        image: frame.to_image(),
        transform,
        op: CompositeOp::SrcOver,
        quality,
        blur,
        clip: None,
    });
    out
}

fn derive(frame: &CpuFrame, width: u32, height: u32, background: Color) -> CpuFrame {
    // Callers validate sizes with `frame_size` first.
    let w = u16::try_from(width).unwrap_or(u16::MAX);
    let h = u16::try_from(height).unwrap_or(u16::MAX);
    frame.derive(w, h, background)
}

fn image_mark(width: u32, height: u32, pixels: Vec<u8>) -> Mark {
    let w = u16::try_from(width).unwrap_or(u16::MAX);
    let h = u16::try_from(height).unwrap_or(u16::MAX);
    Mark::Image {
        image: rgba_image(w, h, pixels),
        transform: Affine::IDENTITY,
        op: CompositeOp::SrcOver,
        quality: ImageQuality::Low,
        blur: None,
        clip: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CpuCanvas, FontBook};
    use imagedev_drawable::{Canvas, Drawable};

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    /// 2x2 frame: red top row, blue bottom row.
    fn quad() -> ImageSequence<CpuFrame> {
        let pixels = [RED, RED, BLUE, BLUE].concat();
        let canvas = CpuCanvas::new(FontBook::new());
        let mut seq = ImageSequence::new();
        seq.push_frame(canvas.frame_from_rgba(2, 2, &pixels).unwrap());
        seq
    }

    fn only(seq: &ImageSequence<CpuFrame>) -> &CpuFrame {
        assert_eq!(seq.len(), 1, "expected a single frame");
        seq.last_frame().unwrap()
    }

    #[test]
    fn flip_swaps_rows_and_flop_swaps_columns() {
        let flipped = flip(&quad()).unwrap();
        assert_eq!(only(&flipped).pixel(0, 0), Some(BLUE));
        assert_eq!(only(&flipped).pixel(1, 1), Some(RED));

        let canvas = CpuCanvas::new(FontBook::new());
        let mut seq = ImageSequence::new();
        seq.push_frame(
            canvas
                .frame_from_rgba(2, 1, &[RED, BLUE].concat())
                .unwrap(),
        );
        let flopped = flop(&seq).unwrap();
        assert_eq!(only(&flopped).pixel(0, 0), Some(BLUE));
        assert_eq!(only(&flopped).pixel(1, 0), Some(RED));
    }

    #[test]
    fn crop_clips_region_to_frame() {
        let cropped = crop(&quad(), 1, 1, 10, 10).unwrap();
        let frame = only(&cropped);
        assert_eq!((frame.width(), frame.height()), (1, 1));
        assert_eq!(frame.pixel(0, 0), Some(BLUE));

        assert!(matches!(
            crop(&quad(), 5, 5, 1, 1),
            Err(CanvasError::InvalidSize { .. })
        ));
    }

    #[test]
    fn border_grows_frame_with_color() {
        let bordered = border(&quad(), Color::WHITE, 1, 2).unwrap();
        let frame = only(&bordered);
        assert_eq!((frame.width(), frame.height()), (4, 6));
        assert_eq!(frame.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(frame.pixel(1, 2), Some(RED));
        assert_eq!(frame.pixel(2, 3), Some(BLUE));
    }

    #[test]
    fn scale_changes_dimensions() {
        let scaled = scale(&quad(), 8, 4).unwrap();
        let frame = only(&scaled);
        assert_eq!((frame.width(), frame.height()), (8, 4));
        assert!(scale(&quad(), 0, 4).is_err());
    }

    #[test]
    fn colorize_mixes_toward_color_and_keeps_alpha() {
        let tinted = colorize(&quad(), Color::from_rgba8(0, 255, 0, 255), 50.0).unwrap();
        let px = only(&tinted).pixel(0, 0).unwrap();
        assert_eq!(px, [128, 128, 0, 255]);
    }

    #[test]
    fn delay_applies_to_every_frame_and_survives_later_operations() {
        let mut seq = quad();
        seq.push_frame(seq.last_frame().unwrap().clone());
        let delayed = delay(&seq, 25);
        assert!(delayed.iter().all(|frame| frame.delay() == 25));
        let flipped = flip(&delayed).unwrap();
        assert!(flipped.iter().all(|frame| frame.delay() == 25));
        assert_eq!(seq.last_frame().unwrap().delay(), 0, "input untouched");
    }

    #[test]
    fn trim_removes_uniform_margin() {
        let canvas = CpuCanvas::new(FontBook::new());
        let mut frame = canvas.new_frame(10, 10, Color::WHITE).unwrap();
        frame.draw(&[Drawable::Rectangle {
            upper_left_x: 3.0,
            upper_left_y: 4.0,
            lower_right_x: 6.0,
            lower_right_y: 8.0,
        }]);
        let mut seq = ImageSequence::new();
        seq.push_frame(frame);
        let trimmed = trim(&seq).unwrap();
        let frame = only(&trimmed);
        assert_eq!((frame.width(), frame.height()), (3, 4));
    }

    #[test]
    fn blur_softens_a_hard_edge() {
        let canvas = CpuCanvas::new(FontBook::new());
        let mut frame = canvas.new_frame(20, 20, Color::WHITE).unwrap();
        frame.draw(&[Drawable::Rectangle {
            upper_left_x: 0.0,
            upper_left_y: 0.0,
            lower_right_x: 10.0,
            lower_right_y: 20.0,
        }]);
        assert_eq!(frame.pixel(10, 10), Some([255, 255, 255, 255]));
        let mut seq = ImageSequence::new();
        seq.push_frame(frame);
        let blurred = blur(&seq, 2.0).unwrap();
        let edge = only(&blurred).pixel(10, 10).unwrap();
        assert!(edge[0] < 250, "pixel beside the edge should darken, got {edge:?}");
    }

    /// Bounding box of pixels darker than mid grey, as `(x0, y0, x1, y1)`.
    fn ink_bounds(frame: &CpuFrame) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        let data = frame.to_rgba8();
        for (i, px) in data.chunks_exact(4).enumerate() {
            if px[0] < 128 {
                let i = u32::try_from(i).unwrap();
                let (x, y) = (i % frame.width(), i / frame.width());
                let b = bounds.get_or_insert((x, y, x, y));
                *b = (b.0.min(x), b.1.min(y), b.2.max(x), b.3.max(y));
            }
        }
        bounds
    }

    fn white_page(width: u32, height: u32) -> ImageSequence<CpuFrame> {
        let canvas = CpuCanvas::new(crate::fonts::tests::dejavu());
        let mut seq = ImageSequence::new();
        seq.push_frame(canvas.new_frame(width, height, Color::WHITE).unwrap());
        seq
    }

    #[test]
    fn annotate_north_west_hangs_text_below_the_anchor() {
        let written = annotate(
            &white_page(80, 40),
            "HH",
            2.0,
            2.0,
            Gravity::NorthWest,
            20.0,
            Color::BLACK,
        )
        .unwrap();
        let (x0, y0, _, y1) = ink_bounds(only(&written)).unwrap();
        assert!((2..6).contains(&x0), "left edge at {x0}");
        assert!((2..10).contains(&y0), "top edge at {y0}");
        assert!(y1 < 24, "bottom edge at {y1}");
    }

    #[test]
    fn annotate_forget_puts_the_baseline_on_the_anchor() {
        let written = annotate(
            &white_page(80, 40),
            "HH",
            2.0,
            30.0,
            Gravity::Forget,
            20.0,
            Color::BLACK,
        )
        .unwrap();
        let (_, y0, _, y1) = ink_bounds(only(&written)).unwrap();
        assert!((28..=30).contains(&y1), "baseline row at {y1}");
        assert!(y0 > 10, "top edge at {y0}");
    }

    #[test]
    fn annotate_center_centers_the_text_box() {
        let written = annotate(
            &white_page(100, 60),
            "HH",
            0.0,
            0.0,
            Gravity::Center,
            20.0,
            Color::BLACK,
        )
        .unwrap();
        let (x0, y0, x1, y1) = ink_bounds(only(&written)).unwrap();
        let (cx, cy) = (f64::from(x0 + x1) / 2.0, f64::from(y0 + y1) / 2.0);
        assert!((cx - 50.0).abs() < 4.0, "horizontal center at {cx}");
        assert!((cy - 30.0).abs() < 5.0, "vertical center at {cy}");
    }

    #[test]
    fn composite_dest_out_punches_a_hole() {
        let canvas = CpuCanvas::new(FontBook::new());
        let overlay = canvas
            .frame_from_rgba(2, 2, &[0, 0, 255, 255].repeat(4))
            .unwrap();
        let punched = composite(
            &white_page(6, 6),
            &overlay,
            1.0,
            1.0,
            Gravity::NorthWest,
            CompositeOp::DestOut,
        )
        .unwrap();
        let frame = only(&punched);
        assert_eq!(frame.pixel(1, 1).unwrap()[3], 0);
        assert_eq!(frame.pixel(2, 2).unwrap()[3], 0);
        assert_eq!(frame.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(frame.pixel(4, 4), Some([255, 255, 255, 255]));
    }

    #[test]
    fn composite_center_offsets_from_the_middle() {
        let canvas = CpuCanvas::new(FontBook::new());
        let overlay = canvas
            .frame_from_rgba(2, 2, &[0, 0, 255, 255].repeat(4))
            .unwrap();
        let placed = composite(
            &white_page(6, 6),
            &overlay,
            1.0,
            0.0,
            Gravity::Center,
            CompositeOp::SrcOver,
        )
        .unwrap();
        let frame = only(&placed);
        assert_eq!(frame.pixel(3, 2), Some([0, 0, 255, 255]));
        assert_eq!(frame.pixel(4, 3), Some([0, 0, 255, 255]));
        assert_eq!(frame.pixel(2, 2), Some([255, 255, 255, 255]));
    }
}
