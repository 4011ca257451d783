// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use imagedev_drawable::CanvasError;

/// Errors reported by the graphics device, its factory and host plumbing.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The device was closed, so it no longer holds an image.
    #[error("graphics device is closed and points to no image")]
    Closed,
    /// A drawing callback ran before the first page was started.
    #[error("graphics device has zero pages")]
    NoPages,
    /// The host engine speaks a different callback-table version.
    #[error("graphics engine version {found} does not match device version {expected}")]
    VersionMismatch {
        /// Version this device was built against.
        expected: u32,
        /// Version reported by the engine.
        found: u32,
    },
    /// The host cannot accept another device.
    #[error("no graphics device slot is available")]
    NoDeviceAvailable,
    /// The device table is full.
    #[error("too many open graphics devices (maximum {max})")]
    TooManyDevices {
        /// Size of the device table.
        max: usize,
    },
    /// No device is registered under this number.
    #[error("no graphics device numbered {0}")]
    UnknownDevice(usize),
    /// A color name could not be resolved.
    #[error("unknown color {0:?}")]
    UnknownColor(String),
    /// Subpath lengths describe more points than were supplied.
    #[error("path subpaths need {expected} points but {actual} were supplied")]
    InvalidPath {
        /// Points described by the subpath lengths.
        expected: usize,
        /// Points supplied.
        actual: usize,
    },
    /// A raster's pixel count does not match its dimensions.
    #[error("raster holds {actual} pixels, expected {expected}")]
    RasterSize {
        /// Pixels implied by the dimensions.
        expected: usize,
        /// Pixels supplied.
        actual: usize,
    },
    /// A callback panicked while holding the image lock.
    #[error("image lock poisoned by an earlier panic")]
    Poisoned,
    /// The canvas rejected an operation.
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}
