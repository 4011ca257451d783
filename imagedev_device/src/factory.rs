// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use imagedev_drawable::{Canvas, CanvasError};

use crate::{
    DeviceBounds, DeviceConfig, DeviceDescriptor, DeviceError, ENGINE_VERSION, GraphicsEngine,
    ImageDevice, ImageHandle, resolve_color_name,
};

/// Name devices are registered under.
pub const DEVICE_NAME: &str = "imagedev";

/// Build a device drawing with `canvas` and register it with `engine`.
///
/// Returns the handle to the (initially empty) image the device draws into.
/// Fails before anything is registered if the background cannot be
/// resolved, the page is empty, or the engine rejects the device.
pub fn create_device<E, C>(
    engine: &mut E,
    canvas: C,
    config: &DeviceConfig,
) -> Result<ImageHandle<C::Frame>, DeviceError>
where
    E: GraphicsEngine + ?Sized,
    C: Canvas + 'static,
{
    let background = resolve_color_name(&config.background)?;
    engine.check_version(ENGINE_VERSION)?;
    engine.check_device_available()?;
    if config.width == 0 || config.height == 0 {
        return Err(CanvasError::InvalidSize {
            width: config.width,
            height: config.height,
        }
        .into());
    }

    let bounds = DeviceBounds::page(config.width, config.height);
    let descriptor = DeviceDescriptor::new(bounds, background, config.pointsize);
    let image = ImageHandle::<C::Frame>::default();
    let device = ImageDevice::new(canvas, image.clone(), descriptor, config.multibyte_locale);
    let number = engine.add_device(DEVICE_NAME, Box::new(device))?;
    engine.init_display_list(number);
    tracing::info!(
        device = number.0,
        width = config.width,
        height = config.height,
        background = %config.background,
        "created graphics device"
    );
    Ok(image)
}
