//! Raw processor probes
//!
//! Every instruction this crate needs to execute directly lives behind
//! [`CpuProbe`]. Each probe returns plain register values; the decisions based
//! on them are made elsewhere so they can run against a mocked probe.

/// Register values returned by one CPUID leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuidResult {
    pub eax: u32,
    pub ebx: u32,
    pub ecx: u32,
    pub edx: u32,
}

impl CpuidResult {
    pub const fn new(eax: u32, ebx: u32, ecx: u32, edx: u32) -> Self {
        Self { eax, ebx, ecx, edx }
    }
}

/// Hardware access needed to identify the current processor.
#[cfg_attr(test, mockall::automock)]
pub trait CpuProbe {
    /// Read EFLAGS, write it back with `mask` flipped, read it again and
    /// restore the original value.
    ///
    /// Returns the flags before and after the flip attempt.
    fn flip_flags(&self, mask: u32) -> (u32, u32);

    /// Execute CPUID for `leaf`.
    ///
    /// Only called after CPUID has been found to exist.
    fn cpuid(&self, leaf: u32) -> CpuidResult;

    /// Clear the arithmetic flags with `sahf`, divide 5 by 2 and return the
    /// flags byte stored by `lahf`.
    fn cyrix_div_flags(&self) -> u8;

    /// Divide 0x5555 by 2 and report whether ZF is set afterwards.
    fn nexgen_div_zero_flag(&self) -> bool;

    /// Read the local APIC id of the executing processor.
    fn local_apic_id(&self) -> u32;
}

/// Default physical base of the local APIC.
pub const LAPIC_DEFAULT_BASE: usize = 0xFEE0_0000;

/// Offset of the local APIC ID register.
pub const LAPIC_ID: usize = 0x020;

/// Probe executing the real instructions on the current processor.
#[derive(Debug)]
pub struct NativeProbe {
    lapic_base: usize,
}

impl NativeProbe {
    /// # Safety
    /// The caller must be running at ring 0 with the local APIC registers
    /// identity mapped at [`LAPIC_DEFAULT_BASE`].
    pub const unsafe fn new() -> Self {
        Self {
            lapic_base: LAPIC_DEFAULT_BASE,
        }
    }

    /// # Safety
    /// Same as [`NativeProbe::new()`] but with the local APIC mapped at
    /// `lapic_base`.
    pub const unsafe fn with_lapic_base(lapic_base: usize) -> Self {
        Self { lapic_base }
    }
}

#[cfg(target_arch = "x86")]
impl CpuProbe for NativeProbe {
    fn flip_flags(&self, mask: u32) -> (u32, u32) {
        let before: u32;
        let after: u32;

        unsafe {
            core::arch::asm!(
                "pushfd",
                "pushfd",
                "pop {before}",
                "mov {after}, {before}",
                "xor {after}, {mask}",
                "push {after}",
                "popfd",
                "pushfd",
                "pop {after}",
                "popfd",
                before = out(reg) before,
                after = out(reg) after,
                mask = in(reg) mask,
            )
        };

        (before, after)
    }

    fn cpuid(&self, leaf: u32) -> CpuidResult {
        let r = core::arch::x86::__cpuid(leaf);

        CpuidResult::new(r.eax, r.ebx, r.ecx, r.edx)
    }

    fn cyrix_div_flags(&self) -> u8 {
        let ax: u32;

        // AH = 0 is loaded into the flags by sahf before the divide.
        unsafe {
            core::arch::asm!(
                "sahf",
                "div {divisor}",
                "lahf",
                divisor = in(reg_byte) 2u8,
                inout("eax") 5u32 => ax,
                options(nomem, nostack)
            )
        };

        (ax >> 8) as u8
    }

    fn nexgen_div_zero_flag(&self) -> bool {
        let zf: u32;

        // mov leaves the flags from div alone.
        unsafe {
            core::arch::asm!(
                "mov ax, 0x5555",
                "xor dx, dx",
                "mov cx, 2",
                "div cx",
                "mov eax, 0",
                "setz al",
                out("eax") zf,
                out("ecx") _,
                out("edx") _,
                options(nomem, nostack)
            )
        };

        zf != 0
    }

    fn local_apic_id(&self) -> u32 {
        let reg = (self.lapic_base + LAPIC_ID) as *const u32;

        unsafe { reg.read_volatile() >> 24 }
    }
}

#[cfg(target_arch = "x86_64")]
impl CpuProbe for NativeProbe {
    fn flip_flags(&self, mask: u32) -> (u32, u32) {
        let before: u64;
        let after: u64;

        unsafe {
            core::arch::asm!(
                "pushfq",
                "pushfq",
                "pop {before}",
                "mov {after}, {before}",
                "xor {after}, {mask}",
                "push {after}",
                "popfq",
                "pushfq",
                "pop {after}",
                "popfq",
                before = out(reg) before,
                after = out(reg) after,
                mask = in(reg) u64::from(mask),
            )
        };

        // The upper half of RFLAGS is reserved.
        (before as u32, after as u32)
    }

    fn cpuid(&self, leaf: u32) -> CpuidResult {
        let r = core::arch::x86_64::__cpuid(leaf);

        CpuidResult::new(r.eax, r.ebx, r.ecx, r.edx)
    }

    fn cyrix_div_flags(&self) -> u8 {
        let ax: u32;

        unsafe {
            core::arch::asm!(
                "sahf",
                "div {divisor}",
                "lahf",
                divisor = in(reg_byte) 2u8,
                inout("eax") 5u32 => ax,
                options(nomem, nostack)
            )
        };

        (ax >> 8) as u8
    }

    fn nexgen_div_zero_flag(&self) -> bool {
        let zf: u32;

        // mov leaves the flags from div alone.
        unsafe {
            core::arch::asm!(
                "mov ax, 0x5555",
                "xor dx, dx",
                "mov cx, 2",
                "div cx",
                "mov eax, 0",
                "setz al",
                out("eax") zf,
                out("rcx") _,
                out("rdx") _,
                options(nomem, nostack)
            )
        };

        zf != 0
    }

    fn local_apic_id(&self) -> u32 {
        let reg = (self.lapic_base + LAPIC_ID) as *const u32;

        unsafe { reg.read_volatile() >> 24 }
    }
}

/// Nothing here is toggleable and there is no CPUID, so identification falls
/// through to the generic 386 code.
#[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
impl CpuProbe for NativeProbe {
    fn flip_flags(&self, _: u32) -> (u32, u32) {
        (0, 0)
    }

    fn cpuid(&self, _: u32) -> CpuidResult {
        CpuidResult::default()
    }

    fn cyrix_div_flags(&self) -> u8 {
        0
    }

    fn nexgen_div_zero_flag(&self) -> bool {
        false
    }

    fn local_apic_id(&self) -> u32 {
        0
    }
}

#[cfg(all(test, any(target_arch = "x86", target_arch = "x86_64")))]
mod tests {
    use super::*;

    #[test]
    fn test_lapic_id_read_from_relocated_base() {
        // Stand-in register page; the ID register sits at word 8.
        let mut regs = [0u32; 9];
        regs[LAPIC_ID / 4] = 0x0300_0000;

        let probe = unsafe { NativeProbe::with_lapic_base(regs.as_ptr() as usize) };

        assert_eq!(probe.local_apic_id(), 3);
    }
}
