// Copyright 2026 the Imagedev Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host engine boundary and an in-process device table.

use std::fmt;

use crate::{DeviceError, GraphicsDevice};

/// Callback-table version devices in this crate are built against.
pub const ENGINE_VERSION: u32 = 16;

/// Most devices a [`DeviceManager`] holds at once.
pub const MAX_DEVICES: usize = 64;

/// Number a host assigns to a registered device.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceNumber(pub usize);

/// The graphics engine a device registers with.
pub trait GraphicsEngine {
    /// Fail unless the engine speaks callback-table version `expected`.
    fn check_version(&self, expected: u32) -> Result<(), DeviceError>;

    /// Fail if no further device can be registered.
    fn check_device_available(&self) -> Result<(), DeviceError>;

    /// Register `device` under `name` and make it the active device.
    ///
    /// On failure the device is dropped and nothing stays registered.
    fn add_device(
        &mut self,
        name: &str,
        device: Box<dyn GraphicsDevice>,
    ) -> Result<DeviceNumber, DeviceError>;

    /// Start the display list of a newly added device.
    fn init_display_list(&mut self, number: DeviceNumber);
}

struct Slot {
    name: String,
    device: Box<dyn GraphicsDevice>,
    display_list: bool,
}

/// A bounded table of open devices with one active device.
pub struct DeviceManager {
    version: u32,
    slots: Vec<Option<Slot>>,
    active: Option<DeviceNumber>,
}

impl fmt::Debug for DeviceManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|s| (i, s.name.as_str())))
            .collect();
        f.debug_struct("DeviceManager")
            .field("version", &self.version)
            .field("devices", &names)
            .field("active", &self.active)
            .finish()
    }
}

impl Default for DeviceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceManager {
    /// An empty table speaking [`ENGINE_VERSION`].
    pub fn new() -> Self {
        Self::with_version(ENGINE_VERSION)
    }

    /// An empty table speaking another callback-table version.
    pub fn with_version(version: u32) -> Self {
        Self {
            version,
            slots: Vec::new(),
            active: None,
        }
    }

    /// Number of open devices.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Returns `true` if no device is open.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The device drawing calls go to.
    pub fn active(&self) -> Option<DeviceNumber> {
        self.active
    }

    /// Make `number` the active device.
    pub fn set_active(&mut self, number: DeviceNumber) -> Result<(), DeviceError> {
        self.slot(number)?;
        self.active = Some(number);
        Ok(())
    }

    /// Name a device was registered under.
    pub fn name(&self, number: DeviceNumber) -> Option<&str> {
        self.slot(number).ok().map(|slot| slot.name.as_str())
    }

    /// Whether the display list of `number` has been started.
    pub fn has_display_list(&self, number: DeviceNumber) -> bool {
        self.slot(number).is_ok_and(|slot| slot.display_list)
    }

    fn slot(&self, number: DeviceNumber) -> Result<&Slot, DeviceError> {
        self.slots
            .get(number.0)
            .and_then(Option::as_ref)
            .ok_or(DeviceError::UnknownDevice(number.0))
    }

    /// Run a callback on device `number`.
    ///
    /// A failing callback is logged and its error returned; the device stays
    /// registered.
    pub fn with_device<R>(
        &mut self,
        number: DeviceNumber,
        f: impl FnOnce(&mut dyn GraphicsDevice) -> Result<R, DeviceError>,
    ) -> Result<R, DeviceError> {
        let slot = self
            .slots
            .get_mut(number.0)
            .and_then(Option::as_mut)
            .ok_or(DeviceError::UnknownDevice(number.0))?;
        f(slot.device.as_mut()).inspect_err(|err| {
            tracing::warn!(device = number.0, name = %slot.name, "graphics callback failed: {err}");
        })
    }

    /// Run a callback on the active device.
    pub fn with_active<R>(
        &mut self,
        f: impl FnOnce(&mut dyn GraphicsDevice) -> Result<R, DeviceError>,
    ) -> Result<R, DeviceError> {
        let number = self.active.ok_or(DeviceError::NoDeviceAvailable)?;
        self.with_device(number, f)
    }

    /// Close and unregister device `number`.
    ///
    /// If it was active, the highest-numbered remaining device becomes
    /// active.
    pub fn close_device(&mut self, number: DeviceNumber) -> Result<(), DeviceError> {
        let mut slot = self
            .slots
            .get_mut(number.0)
            .and_then(Option::take)
            .ok_or(DeviceError::UnknownDevice(number.0))?;
        slot.device.close();
        tracing::info!(device = number.0, name = %slot.name, "graphics device removed");
        if self.active == Some(number) {
            self.active = self
                .slots
                .iter()
                .rposition(Option::is_some)
                .map(DeviceNumber);
        }
        Ok(())
    }

    /// Close every device.
    pub fn close_all(&mut self) {
        for slot in self.slots.iter_mut().filter_map(Option::take) {
            let mut device = slot.device;
            device.close();
        }
        self.active = None;
    }
}

impl GraphicsEngine for DeviceManager {
    fn check_version(&self, expected: u32) -> Result<(), DeviceError> {
        if expected == self.version {
            Ok(())
        } else {
            Err(DeviceError::VersionMismatch {
                expected,
                found: self.version,
            })
        }
    }

    fn check_device_available(&self) -> Result<(), DeviceError> {
        if self.len() < MAX_DEVICES {
            Ok(())
        } else {
            Err(DeviceError::NoDeviceAvailable)
        }
    }

    fn add_device(
        &mut self,
        name: &str,
        device: Box<dyn GraphicsDevice>,
    ) -> Result<DeviceNumber, DeviceError> {
        let index = match self.slots.iter().position(Option::is_none) {
            Some(free) => free,
            None if self.slots.len() < MAX_DEVICES => {
                self.slots.push(None);
                self.slots.len() - 1
            }
            None => return Err(DeviceError::TooManyDevices { max: MAX_DEVICES }),
        };
        self.slots[index] = Some(Slot {
            name: name.to_string(),
            device,
            display_list: false,
        });
        let number = DeviceNumber(index);
        self.active = Some(number);
        tracing::info!(device = index, name, "graphics device registered");
        Ok(number)
    }

    fn init_display_list(&mut self, number: DeviceNumber) {
        if let Some(Some(slot)) = self.slots.get_mut(number.0) {
            slot.display_list = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeviceBounds, GraphicsContext, TextMetrics};
    use imagedev_drawable::Point;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Device that counts closes and fails every line.
    #[derive(Default)]
    struct Probe {
        closed: Rc<Cell<u32>>,
    }

    impl GraphicsDevice for Probe {
        fn new_page(&mut self, _: &GraphicsContext) -> Result<(), DeviceError> {
            Ok(())
        }
        fn clip(&mut self, _: f64, _: f64, _: f64, _: f64) -> Result<(), DeviceError> {
            Ok(())
        }
        fn line(
            &mut self,
            _: f64,
            _: f64,
            _: f64,
            _: f64,
            _: &GraphicsContext,
        ) -> Result<(), DeviceError> {
            Err(DeviceError::NoPages)
        }
        fn polyline(&mut self, _: &[Point], _: &GraphicsContext) -> Result<(), DeviceError> {
            Ok(())
        }
        fn polygon(&mut self, _: &[Point], _: &GraphicsContext) -> Result<(), DeviceError> {
            Ok(())
        }
        fn rect(
            &mut self,
            _: f64,
            _: f64,
            _: f64,
            _: f64,
            _: &GraphicsContext,
        ) -> Result<(), DeviceError> {
            Ok(())
        }
        fn circle(
            &mut self,
            _: f64,
            _: f64,
            _: f64,
            _: &GraphicsContext,
        ) -> Result<(), DeviceError> {
            Ok(())
        }
        fn path(
            &mut self,
            _: &[Point],
            _: &[usize],
            _: bool,
            _: &GraphicsContext,
        ) -> Result<(), DeviceError> {
            Ok(())
        }
        fn raster(
            &mut self,
            _: &[u32],
            _: u32,
            _: u32,
            _: f64,
            _: f64,
            _: f64,
            _: f64,
            _: f64,
            _: bool,
            _: &GraphicsContext,
        ) -> Result<(), DeviceError> {
            Ok(())
        }
        fn text(
            &mut self,
            _: f64,
            _: f64,
            _: &str,
            _: f64,
            _: f64,
            _: &GraphicsContext,
        ) -> Result<(), DeviceError> {
            Ok(())
        }
        fn str_width(&mut self, text: &str, _: &GraphicsContext) -> Result<f64, DeviceError> {
            Ok(text.len() as f64)
        }
        fn metric_info(&mut self, _: i32, _: &GraphicsContext) -> Result<TextMetrics, DeviceError> {
            Ok(TextMetrics::default())
        }
        fn size(&self) -> DeviceBounds {
            DeviceBounds::page(1, 1)
        }
        fn close(&mut self) {
            self.closed.set(self.closed.get() + 1);
        }
    }

    #[test]
    fn version_must_match() {
        let manager = DeviceManager::with_version(15);
        assert!(matches!(
            manager.check_version(ENGINE_VERSION),
            Err(DeviceError::VersionMismatch {
                expected: ENGINE_VERSION,
                found: 15
            })
        ));
        assert!(DeviceManager::new().check_version(ENGINE_VERSION).is_ok());
    }

    #[test]
    fn failing_callbacks_keep_the_device() {
        let mut manager = DeviceManager::new();
        let closed = Rc::new(Cell::new(0));
        let number = manager
            .add_device("probe", Box::new(Probe { closed: closed.clone() }))
            .unwrap();
        let gc = GraphicsContext::default();

        let err = manager.with_active(|dev| dev.line(0.0, 0.0, 1.0, 1.0, &gc));
        assert!(matches!(err, Err(DeviceError::NoPages)));
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.with_device(number, |dev| dev.str_width("abc", &gc)).unwrap(), 3.0);

        manager.close_device(number).unwrap();
        assert_eq!(closed.get(), 1);
        assert!(manager.is_empty());
        assert!(matches!(
            manager.close_device(number),
            Err(DeviceError::UnknownDevice(0))
        ));
    }

    #[test]
    fn closing_the_active_device_activates_the_highest() {
        let mut manager = DeviceManager::new();
        let a = manager.add_device("a", Box::new(Probe::default())).unwrap();
        let b = manager.add_device("b", Box::new(Probe::default())).unwrap();
        let c = manager.add_device("c", Box::new(Probe::default())).unwrap();
        manager.set_active(a).unwrap();
        manager.close_device(a).unwrap();
        assert_eq!(manager.active(), Some(c));
        manager.close_device(c).unwrap();
        assert_eq!(manager.active(), Some(b));
        assert_eq!(manager.name(b), Some("b"));

        // Freed slots are reused.
        let d = manager.add_device("d", Box::new(Probe::default())).unwrap();
        assert_eq!(d, a);
        assert_eq!(manager.active(), Some(d));
    }

    #[test]
    fn table_is_bounded() {
        let mut manager = DeviceManager::new();
        for _ in 0..MAX_DEVICES {
            manager.add_device("probe", Box::new(Probe::default())).unwrap();
        }
        assert!(matches!(
            manager.check_device_available(),
            Err(DeviceError::NoDeviceAvailable)
        ));
        assert!(matches!(
            manager.add_device("probe", Box::new(Probe::default())),
            Err(DeviceError::TooManyDevices { max: MAX_DEVICES })
        ));
        manager.close_all();
        assert!(manager.is_empty());
        assert_eq!(manager.active(), None);
    }

    #[test]
    fn display_lists_start_on_request() {
        let mut manager = DeviceManager::new();
        let n = manager.add_device("probe", Box::new(Probe::default())).unwrap();
        assert!(!manager.has_display_list(n));
        manager.init_display_list(n);
        assert!(manager.has_display_list(n));
    }
}
