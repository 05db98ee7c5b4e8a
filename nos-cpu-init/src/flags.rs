//! EFLAGS toggle probing
//!
//! Whether software can flip a given EFLAGS bit tells processor generations
//! apart: the AC bit is stuck on a 386 and the ID bit is stuck on anything
//! without CPUID.

use bitflags::bitflags;

use crate::probe::CpuProbe;

bitflags! {
    /// EFLAGS bits referenced during identification.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Eflags: u32 {
        const CF = 1 << 0;
        /// Always reads as one.
        const RESERVED_1 = 1 << 1;
        const PF = 1 << 2;
        const AF = 1 << 4;
        const ZF = 1 << 6;
        const SF = 1 << 7;
        /// Alignment check, only writable on 486 and later.
        const AC = 1 << 18;
        /// CPUID available when writable.
        const ID = 1 << 21;
    }
}

/// Check if software can change `flag`.
///
/// The original EFLAGS value is restored by the probe before this returns.
pub fn flag_is_changeable<P: CpuProbe + ?Sized>(probe: &P, flag: Eflags) -> bool {
    let (before, after) = probe.flip_flags(flag.bits());

    ((before ^ after) & flag.bits()) != 0
}

/// Probe for the CPUID instruction.
pub fn have_cpuid<P: CpuProbe + ?Sized>(probe: &P) -> bool {
    flag_is_changeable(probe, Eflags::ID)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::MockCpuProbe;
    use mockall::predicate::eq;

    #[test]
    fn test_changeable_flag() {
        let mut probe = MockCpuProbe::new();

        probe
            .expect_flip_flags()
            .with(eq(Eflags::ID.bits()))
            .returning(|mask| (0x0000_0002, 0x0000_0002 | mask));

        assert!(have_cpuid(&probe));
    }

    #[test]
    fn test_stuck_flag() {
        let mut probe = MockCpuProbe::new();

        probe
            .expect_flip_flags()
            .with(eq(Eflags::AC.bits()))
            .returning(|_| (0x0000_0046, 0x0000_0046));

        assert!(!flag_is_changeable(&probe, Eflags::AC));
    }

    #[test]
    fn test_other_bits_changing_are_ignored() {
        let mut probe = MockCpuProbe::new();

        // Only the probed bit counts even if something else moved.
        probe
            .expect_flip_flags()
            .returning(|_| (0x0000_0202, 0x0000_0003));

        assert!(!flag_is_changeable(&probe, Eflags::ID));
    }

    #[test]
    fn test_repeated_probes_agree() {
        let mut probe = MockCpuProbe::new();

        probe
            .expect_flip_flags()
            .times(3)
            .returning(|mask| (0x0000_0002 | mask, 0x0000_0002));

        let first = flag_is_changeable(&probe, Eflags::AC);

        assert!(first);
        assert_eq!(flag_is_changeable(&probe, Eflags::AC), first);
        assert_eq!(flag_is_changeable(&probe, Eflags::AC), first);
    }
}
