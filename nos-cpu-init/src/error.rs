//! CPU initialization error handling
//!
//! Only two things can go wrong during CPU bring-up and both of them are
//! fatal. A topology mismatch is not an error: the CPU is parked instead, see
//! [`crate::init::CpuState::Parked`].

use core::fmt;

use crate::signature::DeviceSignature;
use crate::vendor::{cpu_vendor_name, VendorCode};

/// CPU initialization error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuInitError {
    /// The calling CPU has no device record
    MissingDevice {
        /// Index of the CPU that asked
        index: usize,
    },

    /// No registered driver matches the identified vendor/device pair
    UnknownCpu {
        vendor: VendorCode,
        device: DeviceSignature,
    },
}

impl CpuInitError {
    /// Convert to an error code suitable for passing to the firmware halt path
    pub fn as_error_code(&self) -> u32 {
        match self {
            CpuInitError::MissingDevice { .. } => 0xC100,
            CpuInitError::UnknownCpu { .. } => 0xC101,
        }
    }

    /// Get a human-readable description of the error
    pub fn description(&self) -> &'static str {
        match self {
            CpuInitError::MissingDevice { .. } => "CPU: missing cpu device structure",
            CpuInitError::UnknownCpu { .. } => "Unknown cpu",
        }
    }
}

impl fmt::Display for CpuInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuInitError::MissingDevice { index } => {
                write!(f, "{} (CPU #{})", self.description(), index)
            }
            CpuInitError::UnknownCpu { vendor, device } => write!(
                f,
                "{}: vendor {} device {:x}",
                self.description(),
                cpu_vendor_name(*vendor),
                device
            ),
        }
    }
}

/// Result type used throughout CPU initialization
pub type Result<T> = core::result::Result<T, CpuInitError>;

/// Abort the boot.
///
/// There is no way back from here. The error is logged and then handed to the
/// panic handler of the firmware image, which halts the machine.
#[cold]
pub fn die(err: CpuInitError) -> ! {
    log::error!("{} (code: {:#x})", err, err.as_error_code());
    panic!("{}", err);
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_error_codes_are_distinct() {
        let missing = CpuInitError::MissingDevice { index: 3 };
        let unknown = CpuInitError::UnknownCpu {
            vendor: VendorCode::AMD,
            device: DeviceSignature::new(0x0f48),
        };

        assert_ne!(missing.as_error_code(), unknown.as_error_code());
    }

    #[test]
    fn test_display() {
        let missing = CpuInitError::MissingDevice { index: 3 };
        assert_eq!(missing.to_string(), "CPU: missing cpu device structure (CPU #3)");

        let unknown = CpuInitError::UnknownCpu {
            vendor: VendorCode::UNKNOWN,
            device: DeviceSignature::GENERIC_386,
        };
        assert_eq!(unknown.to_string(), "Unknown cpu: vendor <invalid cpu vendor> device 300");
    }

    #[test]
    #[should_panic(expected = "Unknown cpu")]
    fn test_die_panics() {
        die(CpuInitError::UnknownCpu {
            vendor: VendorCode::INTEL,
            device: DeviceSignature::new(0x0633),
        });
    }
}
