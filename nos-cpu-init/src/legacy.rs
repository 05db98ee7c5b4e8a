//! Vendor heuristics for processors without CPUID
//!
//! Cyrix parts with CPUID missing or not yet enabled preserve the flags across
//! a 5/2 division. The PII and PPro do the same, but they always have CPUID so
//! they never get here.
//!
//! NexGen parts running BIOS hypercode too old to provide CPUID set ZF after
//! dividing 0x5555 by 2.

use crate::flags::Eflags;
use crate::probe::CpuProbe;

/// Vendor string used when the Cyrix divide test succeeds.
pub const CYRIX_VENDOR: &[u8; 12] = b"CyrixInstead";

/// Vendor string used when the NexGen probe succeeds.
pub const NEXGEN_VENDOR: &[u8; 12] = b"NexGenDriven";

/// Flags byte seen on a Cyrix after the divide: the arithmetic flags are still
/// clear and only the reserved bit reads as one.
pub const CYRIX_DIV_SIGNATURE: u8 = Eflags::RESERVED_1.bits() as u8;

/// Perform the Cyrix 5/2 test.
pub fn test_cyrix_52div<P: CpuProbe + ?Sized>(probe: &P) -> bool {
    probe.cyrix_div_flags() == CYRIX_DIV_SIGNATURE
}

/// Detect a NexGen CPU running without BIOS hypercode new enough to have CPUID.
pub fn deep_magic_nexgen_probe<P: CpuProbe + ?Sized>(probe: &P) -> bool {
    probe.nexgen_div_zero_flag()
}

/// Run the legacy probes in order and return the vendor string of the first
/// one that hits.
///
/// Must only be called on a 486-class processor without CPUID.
pub fn legacy_vendor_tag<P: CpuProbe + ?Sized>(probe: &P) -> Option<&'static [u8; 12]> {
    if test_cyrix_52div(probe) {
        // If we ever care we can enable CPUID here.
        Some(CYRIX_VENDOR)
    } else if deep_magic_nexgen_probe(probe) {
        Some(NEXGEN_VENDOR)
    } else {
        None
    }
}
