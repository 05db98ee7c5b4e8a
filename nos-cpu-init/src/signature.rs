//! Device signatures
//!
//! A device signature is CPUID leaf 1 EAX when the CPU has it, or one of the
//! synthesized generic codes when it does not.

use core::fmt;

/// Packed family/model/stepping value identifying a processor design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct DeviceSignature(u32);

static_assertions::assert_eq_size!(DeviceSignature, u32);

impl DeviceSignature {
    /// Generic 386-class processor (AC flag cannot be toggled).
    pub const GENERIC_386: Self = Self(0x0000_0300);

    /// Generic 486-class processor, also used when CPUID only reports leaf 0.
    pub const GENERIC_486: Self = Self(0x0000_0400);

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Split the signature into family, model and stepping.
    ///
    /// The extended family (bits 27:20) is only added when the base family is
    /// 0xF, and the extended model (bits 19:16) only counts for family 6 and
    /// up.
    pub fn fms(self) -> FamilyModelStepping {
        let sig = self.0;
        let mut family = (sig >> 8) & 0xf;
        let mut model = (sig >> 4) & 0xf;
        let stepping = sig & 0xf;

        if family == 0xf {
            family += (sig >> 20) & 0xff;
        }

        if family >= 0x6 {
            model += ((sig >> 16) & 0xf) << 4;
        }

        FamilyModelStepping {
            family,
            model,
            stepping,
        }
    }
}

impl fmt::LowerHex for DeviceSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::Display for DeviceSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl From<u32> for DeviceSignature {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Decoded family/model/stepping triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyModelStepping {
    pub family: u32,
    pub model: u32,
    pub stepping: u32,
}

impl fmt::Display for FamilyModelStepping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "family {:02x}, model {:02x}, stepping {:02x}",
            self.family, self.model, self.stepping
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn test_generic_codes() {
        let fms = DeviceSignature::GENERIC_486.fms();
        assert_eq!((fms.family, fms.model, fms.stepping), (4, 0, 0));

        let fms = DeviceSignature::GENERIC_386.fms();
        assert_eq!((fms.family, fms.model, fms.stepping), (3, 0, 0));
    }

    #[test]
    fn test_pentium_pro_has_no_extended_model() {
        // Pentium Pro B0
        let fms = DeviceSignature::new(0x0000_0612).fms();
        assert_eq!((fms.family, fms.model, fms.stepping), (6, 1, 2));
    }

    #[test]
    fn test_extended_model_for_family_6() {
        // Core 2 Penryn
        let fms = DeviceSignature::new(0x0001_0676).fms();
        assert_eq!((fms.family, fms.model, fms.stepping), (6, 0x17, 6));
    }

    #[test]
    fn test_extended_family_for_family_f() {
        // Athlon 64 X2 (K8 revision F)
        let fms = DeviceSignature::new(0x0004_0f33).fms();
        assert_eq!((fms.family, fms.model, fms.stepping), (0xf, 0x43, 3));

        // Family 10h
        let fms = DeviceSignature::new(0x0010_0f42).fms();
        assert_eq!((fms.family, fms.model, fms.stepping), (0x10, 0x04, 2));
    }

    #[test]
    fn test_extended_fields_ignored_below_family_6() {
        let fms = DeviceSignature::new(0x0ff5_0543).fms();
        assert_eq!((fms.family, fms.model, fms.stepping), (5, 4, 3));
    }

    #[test]
    fn test_formatting() {
        let sig = DeviceSignature::new(0x0f29);
        assert_eq!(format!("{:x}", sig), "f29");
        assert_eq!(format!("{}", sig), "0x00000f29");
        assert_eq!(
            format!("{}", sig.fms()),
            "family 0f, model 02, stepping 09"
        );
    }
}
