//! Processor identification
//!
//! Produces a [`ProcessorIdentity`] for the executing processor, either from
//! CPUID or, on processors predating it, from the AC flag and the legacy
//! vendor heuristics.

use core::fmt;

use crate::device::CpuDevice;
use crate::flags::{flag_is_changeable, have_cpuid, Eflags};
use crate::legacy::legacy_vendor_tag;
use crate::probe::{CpuProbe, CpuidResult};
use crate::signature::DeviceSignature;
use crate::vendor::VendorCode;

/// `max_leaf` when CPUID is not available.
pub const NO_CPUID: i32 = -1;

/// Identity of a processor as seen by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessorIdentity {
    /// Raw vendor string, zero filled when nothing was recovered
    pub vendor_name: [u8; 12],
    pub vendor: VendorCode,
    pub device: DeviceSignature,
    /// Highest basic CPUID leaf, [`NO_CPUID`] without CPUID
    pub max_leaf: i32,
}

impl ProcessorIdentity {
    pub fn has_cpuid(&self) -> bool {
        self.max_leaf != NO_CPUID
    }
}

impl fmt::Display for ProcessorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vendor {} device {:x}", self.vendor, self.device)
    }
}

/// Reassemble the vendor string from CPUID leaf 0 (EBX, EDX, ECX).
pub fn vendor_string(leaf0: &CpuidResult) -> [u8; 12] {
    let mut name = [0u8; 12];

    name[..4].copy_from_slice(&leaf0.ebx.to_le_bytes());
    name[4..8].copy_from_slice(&leaf0.edx.to_le_bytes());
    name[8..].copy_from_slice(&leaf0.ecx.to_le_bytes());

    name
}

/// Identify the executing processor.
pub fn identify<P: CpuProbe + ?Sized>(probe: &P) -> ProcessorIdentity {
    let mut vendor_name = [0u8; 12];
    let mut max_leaf = NO_CPUID;
    let device;

    if have_cpuid(probe) {
        let r = probe.cpuid(0);

        // Garbage above i32::MAX must not alias NO_CPUID.
        max_leaf = i32::try_from(r.eax).unwrap_or(i32::MAX);
        vendor_name = vendor_string(&r);

        device = if max_leaf >= 1 {
            DeviceSignature::new(probe.cpuid(1).eax)
        } else {
            // Only leaf 0, unheard of.
            DeviceSignature::GENERIC_486
        };
    } else {
        // It's a 486 if we can modify the AC flag.
        device = if flag_is_changeable(probe, Eflags::AC) {
            DeviceSignature::GENERIC_486
        } else {
            DeviceSignature::GENERIC_386
        };

        if device == DeviceSignature::GENERIC_486 {
            if let Some(tag) = legacy_vendor_tag(probe) {
                vendor_name = *tag;
            }
        }
    }

    ProcessorIdentity {
        vendor_name,
        vendor: VendorCode::from_vendor_string(&vendor_name),
        device,
        max_leaf,
    }
}

/// Identify the executing processor and record the result in `cpu`.
pub fn identify_cpu<P: CpuProbe + ?Sized>(probe: &P, cpu: &mut CpuDevice) -> ProcessorIdentity {
    let id = identify(probe);

    cpu.vendor = id.vendor;
    cpu.device = id.device;

    id
}
