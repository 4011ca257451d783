// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! PNG output for frames and sequences.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use imagedev_drawable::{CanvasError, Frame, ImageSequence};
use png::{BitDepth, ColorType, Encoder};

use crate::CpuFrame;

/// Encode a frame as an RGBA8 PNG.
pub fn write_png<W: Write>(frame: &CpuFrame, out: W) -> Result<(), CanvasError> {
    let mut encoder = Encoder::new(out, frame.width(), frame.height());
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    let mut writer = encoder.write_header().map_err(CanvasError::encode)?;
    writer
        .write_image_data(&frame.to_rgba8())
        .map_err(CanvasError::encode)?;
    writer.finish().map_err(CanvasError::encode)
}

/// Write a frame to a PNG file.
pub fn save_png(frame: &CpuFrame, path: impl AsRef<Path>) -> Result<(), CanvasError> {
    let file = File::create(path.as_ref()).map_err(CanvasError::encode)?;
    write_png(frame, BufWriter::new(file))
}

/// Write every frame of `sequence` to `dir` as `{stem}-{index:03}.png`.
///
/// Returns the paths written, in frame order.
pub fn save_pngs(
    sequence: &ImageSequence<CpuFrame>,
    dir: impl AsRef<Path>,
    stem: &str,
) -> Result<Vec<PathBuf>, CanvasError> {
    let dir = dir.as_ref();
    let mut written = Vec::with_capacity(sequence.len());
    for (index, frame) in sequence.iter().enumerate() {
        let path = dir.join(format!("{stem}-{index:03}.png"));
        save_png(frame, &path)?;
        tracing::debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Encode a sequence as an animated PNG, using each frame's delay.
///
/// All frames must share the first frame's size. The animation loops forever.
pub fn write_apng<W: Write>(
    sequence: &ImageSequence<CpuFrame>,
    out: W,
) -> Result<(), CanvasError> {
    let Some(first) = sequence.get(0) else {
        return Err(CanvasError::Encode("cannot encode an empty sequence".into()));
    };
    let (width, height) = (first.width(), first.height());
    if let Some(odd) = sequence
        .iter()
        .find(|frame| frame.width() != width || frame.height() != height)
    {
        return Err(CanvasError::Encode(format!(
            "frame of size {}x{} does not match {width}x{height}",
            odd.width(),
            odd.height()
        )));
    }
    let frames = u32::try_from(sequence.len()).map_err(CanvasError::encode)?;

    let mut encoder = Encoder::new(out, width, height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_animated(frames, 0).map_err(CanvasError::encode)?;
    let mut writer = encoder.write_header().map_err(CanvasError::encode)?;
    for frame in sequence {
        let delay = u16::try_from(frame.delay()).unwrap_or(u16::MAX);
        writer
            .set_frame_delay(delay, 100)
            .map_err(CanvasError::encode)?;
        writer
            .write_image_data(&frame.to_rgba8())
            .map_err(CanvasError::encode)?;
    }
    writer.finish().map_err(CanvasError::encode)
}
