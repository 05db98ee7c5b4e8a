//! Per-CPU initialization entry point
//!
//! Every logical processor runs this once on its own stack:
//!
//! 1. Resolve the device record of the calling CPU.
//! 2. Make sure the record really belongs to this CPU (SMP builds).
//! 3. Identify the processor, bind a driver and run its init routine.
//!
//! The AP that fails step 2 is parked. Anything else that goes wrong stops the
//! boot.

use core::fmt;

use log::Level;

use crate::config::CpuInitConfig;
use crate::device::CpuInfo;
use crate::driver::{driver_registry, DriverRegistry};
use crate::error::{die, CpuInitError, Result};
use crate::identify::identify_cpu;
use crate::probe::{CpuProbe, NativeProbe};

/// Where a CPU ended up after initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuState {
    /// The device record did not match this CPU. Left untouched for this boot.
    Parked,
    /// A driver was bound but it has no init routine.
    Dispatched,
    /// The driver init routine ran.
    Initialized,
}

impl fmt::Display for CpuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuState::Parked => write!(f, "Parked"),
            CpuState::Dispatched => write!(f, "Dispatched"),
            CpuState::Initialized => write!(f, "Initialized"),
        }
    }
}

/// Identifies CPUs and runs their drivers.
pub struct CpuInitializer<'r, P> {
    probe: P,
    registry: &'r DriverRegistry,
    config: CpuInitConfig,
}

impl<'r, P: CpuProbe> CpuInitializer<'r, P> {
    pub fn new(probe: P, registry: &'r DriverRegistry) -> Self {
        Self {
            probe,
            registry,
            config: CpuInitConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CpuInitConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CpuInitConfig {
        &self.config
    }

    /// Initialize the calling CPU.
    ///
    /// An `Err` here is always fatal; [`cpu_initialize()`] turns it into
    /// [`die()`].
    pub fn initialize(&self, info: &mut CpuInfo<'_>) -> Result<CpuState> {
        // We busy wait on the console lock, so APs say as little as possible.
        let quiet = self.config.quiet_secondaries && !info.is_bsp();
        let (banner, detail) = if quiet {
            (Level::Debug, Level::Trace)
        } else {
            (Level::Info, Level::Debug)
        };
        let index = info.index();

        log::log!(banner, "Initializing CPU #{}", index);

        let cpu = info.cpu().ok_or(CpuInitError::MissingDevice { index })?;

        // Check that we haven't been passed bad information as the result of a
        // race (i.e. the BSP timed out while waiting for us to load our stack).
        if self.config.topology_check {
            let apic_id = self.probe.local_apic_id();

            if cpu.apic_id != apic_id {
                log::error!(
                    "CPU #{} Initialization FAILED: APIC ID mismatch ({} != {})",
                    index,
                    cpu.apic_id,
                    apic_id
                );
                return Ok(CpuState::Parked);
            }
        }

        // Find what type of CPU we are dealing with.
        let id = identify_cpu(&self.probe, cpu);

        log::log!(detail, "CPU: {}", id);
        log::log!(detail, "CPU: {}", id.device.fms());

        // Lookup the CPU's operations.
        let ops = self.registry.dispatch(&id)?;

        cpu.ops = Some(ops);

        let state = match ops.init {
            Some(init) => {
                cpu.enabled = true;
                cpu.initialized = true;
                init(cpu);
                CpuState::Initialized
            }
            None => CpuState::Dispatched,
        };

        log::log!(banner, "CPU #{} Initialized", index);

        Ok(state)
    }
}

/// Initialize the calling CPU against the installed driver registry.
///
/// Never returns on a fatal error.
///
/// # Safety
/// Must be called at ring 0 on the CPU described by `info`, with the local
/// APIC identity mapped at its default base.
pub unsafe fn cpu_initialize(info: &mut CpuInfo<'_>) -> CpuState {
    let probe = unsafe { NativeProbe::new() };

    CpuInitializer::new(probe, driver_registry())
        .initialize(info)
        .unwrap_or_else(|e| die(e))
}
