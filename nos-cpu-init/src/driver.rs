//! CPU driver registry and dispatch
//!
//! Drivers are registered once during early setup, before the first CPU is
//! initialized. Registration order is match priority: dispatch walks the
//! drivers in order, and each driver's id table in order, and binds the first
//! exact (vendor, device) match.

use alloc::vec::Vec;
use core::fmt;

use spin::Once;

use crate::device::CpuDevice;
use crate::error::{CpuInitError, Result};
use crate::identify::ProcessorIdentity;
use crate::signature::DeviceSignature;
use crate::vendor::VendorCode;

/// Vendor/device pair a driver claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuDeviceId {
    pub vendor: VendorCode,
    pub device: DeviceSignature,
}

impl CpuDeviceId {
    pub const fn new(vendor: VendorCode, device: DeviceSignature) -> Self {
        Self { vendor, device }
    }

    pub fn matches(&self, vendor: VendorCode, device: DeviceSignature) -> bool {
        self.vendor == vendor && self.device == device
    }
}

/// Operations a CPU driver provides.
pub struct CpuOperations {
    pub init: Option<fn(&mut CpuDevice)>,
}

impl CpuOperations {
    pub const fn new(init: Option<fn(&mut CpuDevice)>) -> Self {
        Self { init }
    }
}

impl fmt::Debug for CpuOperations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CpuOperations")
            .field("init", &self.init.is_some())
            .finish()
    }
}

/// A CPU driver: the devices it handles and what to do with them.
#[derive(Debug)]
pub struct CpuDriver {
    pub name: &'static str,
    pub id_table: &'static [CpuDeviceId],
    pub ops: &'static CpuOperations,
}

impl CpuDriver {
    pub const fn new(
        name: &'static str,
        id_table: &'static [CpuDeviceId],
        ops: &'static CpuOperations,
    ) -> Self {
        Self {
            name,
            id_table,
            ops,
        }
    }

    /// Check if any entry of the id table matches.
    pub fn handles(&self, vendor: VendorCode, device: DeviceSignature) -> bool {
        self.id_table.iter().any(|id| id.matches(vendor, device))
    }
}

/// Ordered list of CPU drivers.
#[derive(Debug, Default)]
pub struct DriverRegistry {
    drivers: Vec<&'static CpuDriver>,
}

impl DriverRegistry {
    pub const fn new() -> Self {
        Self {
            drivers: Vec::new(),
        }
    }

    /// Append a driver. Drivers registered earlier take priority.
    pub fn register(&mut self, driver: &'static CpuDriver) -> &mut Self {
        log::trace!("Registering CPU driver {}", driver.name);
        self.drivers.push(driver);
        self
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static CpuDriver> + '_ {
        self.drivers.iter().copied()
    }

    /// Find the first driver handling `vendor`/`device`.
    pub fn find(&self, vendor: VendorCode, device: DeviceSignature) -> Option<&'static CpuDriver> {
        self.iter().find(|d| d.handles(vendor, device))
    }

    /// Look up the operations for an identified processor.
    ///
    /// No match is [`CpuInitError::UnknownCpu`]; there is no fallback driver.
    pub fn dispatch(&self, id: &ProcessorIdentity) -> Result<&'static CpuOperations> {
        match self.find(id.vendor, id.device) {
            Some(driver) => {
                log::trace!("CPU driver {} matched", driver.name);
                Ok(driver.ops)
            }
            None => Err(CpuInitError::UnknownCpu {
                vendor: id.vendor,
                device: id.device,
            }),
        }
    }
}

impl FromIterator<&'static CpuDriver> for DriverRegistry {
    fn from_iter<T: IntoIterator<Item = &'static CpuDriver>>(iter: T) -> Self {
        Self {
            drivers: iter.into_iter().collect(),
        }
    }
}

/// Global CPU driver registry
static CPU_DRIVERS: Once<DriverRegistry> = Once::new();

/// Empty registry used before installation.
static NO_DRIVERS: DriverRegistry = DriverRegistry::new();

/// Install the global driver registry.
///
/// Only the first call has an effect; the registry cannot change once CPUs
/// may be dispatching against it.
pub fn install_driver_registry(registry: DriverRegistry) -> &'static DriverRegistry {
    let mut installed = false;
    let r = CPU_DRIVERS.call_once(|| {
        installed = true;
        registry
    });

    if installed {
        log::debug!("Installed {} CPU drivers", r.len());
    } else {
        log::warn!("CPU driver registry already installed, ignoring new one");
    }

    r
}

/// Get the global driver registry.
///
/// This is empty until [`install_driver_registry()`] is called, which means
/// every dispatch fails.
pub fn driver_registry() -> &'static DriverRegistry {
    CPU_DRIVERS.get().unwrap_or(&NO_DRIVERS)
}
