//! Per-CPU device records

use core::fmt;

use crate::driver::CpuOperations;
use crate::signature::DeviceSignature;
use crate::vendor::VendorCode;

/// Device record of one logical processor.
///
/// Built by whoever enumerates the processors (the BSP for itself and for
/// every AP it starts). Identification and dispatch fill in the rest.
#[derive(Debug)]
pub struct CpuDevice {
    /// Local APIC id this record was built for
    pub apic_id: u32,
    /// Normalized vendor, valid after identification
    pub vendor: VendorCode,
    /// Device signature, valid after identification
    pub device: DeviceSignature,
    /// Operations bound by dispatch
    pub ops: Option<&'static CpuOperations>,
    pub enabled: bool,
    pub initialized: bool,
}

impl CpuDevice {
    pub const fn new(apic_id: u32) -> Self {
        Self {
            apic_id,
            vendor: VendorCode::UNKNOWN,
            device: DeviceSignature::new(0),
            ops: None,
            enabled: false,
            initialized: false,
        }
    }
}

impl fmt::Display for CpuDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CPU (APIC: 0x{:x}, vendor: {}, device: {:x}, enabled: {})",
            self.apic_id, self.vendor, self.device, self.enabled
        )
    }
}

/// Processor-local context of the calling CPU.
///
/// Each CPU builds one of these on its own stack so nothing here is shared.
pub struct CpuInfo<'a> {
    index: usize,
    cpu: Option<&'a mut CpuDevice>,
}

impl<'a> CpuInfo<'a> {
    pub fn new(index: usize, cpu: Option<&'a mut CpuDevice>) -> Self {
        Self { index, cpu }
    }

    /// Logical index of this CPU, 0 being the BSP.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_bsp(&self) -> bool {
        self.index == 0
    }

    pub fn cpu(&mut self) -> Option<&mut CpuDevice> {
        self.cpu.as_deref_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_blank() {
        let cpu = CpuDevice::new(4);

        assert_eq!(cpu.apic_id, 4);
        assert_eq!(cpu.vendor, VendorCode::UNKNOWN);
        assert!(cpu.ops.is_none());
        assert!(!cpu.enabled && !cpu.initialized);
    }

    #[test]
    fn test_display() {
        let mut cpu = CpuDevice::new(0x12);
        cpu.vendor = VendorCode::INTEL;
        cpu.device = DeviceSignature::new(0x0f29);

        assert_eq!(
            alloc::format!("{}", cpu),
            "CPU (APIC: 0x12, vendor: Intel, device: f29, enabled: false)"
        );
    }

    #[test]
    fn test_info_resolves_record() {
        let mut cpu = CpuDevice::new(2);
        let mut info = CpuInfo::new(1, Some(&mut cpu));

        assert_eq!(info.index(), 1);
        assert!(!info.is_bsp());
        assert_eq!(info.cpu().map(|c| c.apic_id), Some(2));

        let mut missing = CpuInfo::new(0, None);
        assert!(missing.is_bsp());
        assert!(missing.cpu().is_none());
    }
}
