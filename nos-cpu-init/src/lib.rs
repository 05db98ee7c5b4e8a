//! NOS CPU Init - Boot-time processor identification and driver dispatch
//!
//! This crate finds out which processor the firmware is running on and binds
//! it to the vendor/family specific initialization routine before any other
//! boot code touches the CPU. It has to work on everything from a 386 without
//! CPUID up to current parts.
//!
//! # Architecture
//!
//! - **Probe**: raw instruction access (EFLAGS, CPUID, legacy divide quirks, LAPIC id)
//! - **Flags**: EFLAGS toggle probing and CPUID availability
//! - **Legacy**: Cyrix and NexGen heuristics for processors without CPUID
//! - **Vendor**: vendor string table and display names
//! - **Identify**: builds a [`ProcessorIdentity`] from the probe results
//! - **Driver**: ordered driver registry and first-match dispatch
//! - **Init**: the per-CPU entry point tying everything together
//!
//! # Usage
//!
//! ```rust,no_run
//! use nos_cpu_init::{
//!     cpu_initialize, install_driver_registry, CpuDevice, CpuDeviceId, CpuDriver, CpuInfo,
//!     CpuOperations, DeviceSignature, DriverRegistry, VendorCode,
//! };
//!
//! fn model_f_init(_cpu: &mut CpuDevice) {}
//!
//! static MODEL_F_OPS: CpuOperations = CpuOperations::new(Some(model_f_init));
//! static MODEL_F_IDS: [CpuDeviceId; 1] =
//!     [CpuDeviceId::new(VendorCode::INTEL, DeviceSignature::new(0x0f29))];
//! static MODEL_F: CpuDriver = CpuDriver::new("intel_model_f", &MODEL_F_IDS, &MODEL_F_OPS);
//!
//! let mut registry = DriverRegistry::new();
//! registry.register(&MODEL_F);
//! install_driver_registry(registry);
//!
//! let mut bsp = CpuDevice::new(0);
//! let mut info = CpuInfo::new(0, Some(&mut bsp));
//! // Running at ring 0 on CPU #0 with the local APIC identity mapped.
//! unsafe { cpu_initialize(&mut info) };
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

pub mod config;
pub mod device;
pub mod driver;
pub mod error;
pub mod flags;
pub mod identify;
pub mod init;
pub mod legacy;
pub mod probe;
pub mod signature;
pub mod vendor;

pub use crate::config::CpuInitConfig;
pub use crate::device::{CpuDevice, CpuInfo};
pub use crate::driver::{
    driver_registry, install_driver_registry, CpuDeviceId, CpuDriver, CpuOperations,
    DriverRegistry,
};
pub use crate::error::{die, CpuInitError, Result};
pub use crate::identify::{identify_cpu, ProcessorIdentity};
pub use crate::init::{cpu_initialize, CpuInitializer, CpuState};
pub use crate::probe::{CpuProbe, CpuidResult, NativeProbe};
pub use crate::signature::{DeviceSignature, FamilyModelStepping};
pub use crate::vendor::{cpu_vendor_name, VendorCode};
