// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Imagedev Device: a callback-driven raster graphics device.
//!
//! A host graphics engine drives a device through the [`GraphicsDevice`]
//! callbacks (new page, line, polygon, text, metric queries and so on). The
//! [`ImageDevice`] implementation turns each callback into a draw list of
//! [`Drawable`](imagedev_drawable::Drawable) commands and applies it to the
//! last frame of an [`ImageSequence`](imagedev_drawable::ImageSequence),
//! producing one frame per page.
//!
//! - [`style`] maps host style codes (line types, caps, joins, font faces)
//!   to drawable style values.
//! - [`builder`] assembles the draw list for each callback.
//! - [`create_device`] builds the [`DeviceDescriptor`], registers the device
//!   with a [`GraphicsEngine`] and hands back the shared [`ImageHandle`].
//! - [`DeviceManager`] is an in-process engine holding a table of devices.
//!
//! ```
//! use imagedev_canvas_ref::RefCanvas;
//! use imagedev_device::{DeviceConfig, DeviceManager, GraphicsContext, create_device};
//!
//! let mut host = DeviceManager::new();
//! let config = DeviceConfig::default().with_size(200, 100);
//! let image = create_device(&mut host, RefCanvas, &config)?;
//!
//! let gc = GraphicsContext::default();
//! host.with_active(|dev| {
//!     dev.new_page(&gc)?;
//!     dev.line(0.0, 0.0, 200.0, 100.0, &gc)
//! })?;
//! assert_eq!(image.lock().unwrap().len(), 1);
//! # Ok::<(), imagedev_device::DeviceError>(())
//! ```

pub mod builder;
mod color;
mod config;
mod context;
mod descriptor;
mod device;
mod error;
mod factory;
mod host;
pub mod style;

pub use color::{HostColor, resolve_color_name};
pub use config::DeviceConfig;
pub use context::{FontFace, GraphicsContext, LineEnd, LineJoinCode, LineType};
pub use descriptor::{
    BackgroundTransparency, ColorTransparency, DeviceBounds, DeviceDescriptor, INCHES_PER_POINT,
};
pub use device::{GraphicsDevice, ImageDevice, ImageHandle, TextMetrics, metric_char};
pub use error::DeviceError;
pub use factory::{DEVICE_NAME, create_device};
pub use host::{DeviceManager, DeviceNumber, ENGINE_VERSION, GraphicsEngine, MAX_DEVICES};
