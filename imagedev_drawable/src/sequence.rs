// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

/// Ordered, multi-frame image. The last frame is the one being drawn into.
#[derive(Clone, Debug)]
pub struct ImageSequence<F> {
    frames: Vec<F>,
}

impl<F> Default for ImageSequence<F> {
    fn default() -> Self {
        Self { frames: Vec::new() }
    }
}

impl<F> ImageSequence<F> {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a frame, making it the current frame.
    pub fn push_frame(&mut self, frame: F) {
        self.frames.push(frame);
    }

    /// The current frame.
    pub fn last_frame(&self) -> Option<&F> {
        self.frames.last()
    }

    /// Mutable access to the current frame.
    pub fn last_frame_mut(&mut self) -> Option<&mut F> {
        self.frames.last_mut()
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if no frame has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `index`.
    pub fn get(&self, index: usize) -> Option<&F> {
        self.frames.get(index)
    }

    /// Iterates over frames in order.
    pub fn iter(&self) -> core::slice::Iter<'_, F> {
        self.frames.iter()
    }

    /// All frames in order.
    pub fn frames(&self) -> &[F] {
        &self.frames
    }

    /// Consumes the sequence, returning its frames.
    pub fn into_frames(self) -> Vec<F> {
        self.frames
    }

    /// Builds a new sequence by applying `f` to every frame, stopping at the
    /// first error.
    pub fn try_map<G, E>(&self, f: impl FnMut(&F) -> Result<G, E>) -> Result<ImageSequence<G>, E> {
        Ok(ImageSequence {
            frames: self.frames.iter().map(f).collect::<Result<_, _>>()?,
        })
    }
}

impl<F> FromIterator<F> for ImageSequence<F> {
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}

impl<F> IntoIterator for ImageSequence<F> {
    type Item = F;
    type IntoIter = alloc::vec::IntoIter<F>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.into_iter()
    }
}

impl<'a, F> IntoIterator for &'a ImageSequence<F> {
    type Item = &'a F;
    type IntoIter = core::slice::Iter<'a, F>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_frame_tracks_pushes() {
        let mut seq = ImageSequence::new();
        assert!(seq.last_frame().is_none());
        seq.push_frame(1);
        seq.push_frame(2);
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.last_frame(), Some(&2));
        *seq.last_frame_mut().unwrap() = 5;
        assert_eq!(seq.frames(), &[1, 5]);
    }

    #[test]
    fn try_map_stops_at_first_error() {
        let seq: ImageSequence<i32> = [1, -1, 3].into_iter().collect();
        let mut visited = 0;
        let result = seq.try_map(|v| {
            visited += 1;
            if *v < 0 { Err("negative") } else { Ok(v * 2) }
        });
        assert_eq!(result.err(), Some("negative"));
        assert_eq!(visited, 2);

        let doubled = seq.try_map(|v| Ok::<_, ()>(v.abs() * 2)).unwrap();
        assert_eq!(doubled.into_frames(), [2, 2, 6]);
    }
}
