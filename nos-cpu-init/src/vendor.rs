//! CPU vendor table
//!
//! Maps the 12-byte vendor strings reported by CPUID leaf 0 to normalized
//! vendor codes. Matching is exact and in table order.

use core::fmt;

/// Normalized processor vendor identifier.
///
/// Kept as a raw code rather than an enum so driver tables built outside this
/// crate can name codes this crate has no display name for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct VendorCode(u8);

static_assertions::assert_eq_size!(VendorCode, u8);

impl VendorCode {
    pub const INTEL: Self = Self(0);
    pub const CYRIX: Self = Self(1);
    pub const AMD: Self = Self(2);
    pub const UMC: Self = Self(3);
    pub const NEXGEN: Self = Self(4);
    pub const CENTAUR: Self = Self(5);
    pub const RISE: Self = Self(6);
    pub const TRANSMETA: Self = Self(7);
    pub const NSC: Self = Self(8);
    pub const SIS: Self = Self(9);
    pub const UNKNOWN: Self = Self(0xff);

    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Look up the vendor code for a raw vendor string.
    ///
    /// All 12 bytes take part in the comparison. Anything not in
    /// [`VENDOR_TABLE`] is [`VendorCode::UNKNOWN`].
    pub fn from_vendor_string(name: &[u8; 12]) -> Self {
        VENDOR_TABLE
            .iter()
            .find(|(s, _)| *s == name)
            .map_or(Self::UNKNOWN, |&(_, code)| code)
    }

    pub fn name(self) -> &'static str {
        cpu_vendor_name(self)
    }
}

impl Default for VendorCode {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl fmt::Display for VendorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(cpu_vendor_name(*self))
    }
}

/// Vendor strings along with their normalized codes.
pub static VENDOR_TABLE: [(&[u8; 12], VendorCode); 11] = [
    (b"GenuineIntel", VendorCode::INTEL),
    (b"CyrixInstead", VendorCode::CYRIX),
    (b"AuthenticAMD", VendorCode::AMD),
    (b"UMC UMC UMC ", VendorCode::UMC),
    (b"NexGenDriven", VendorCode::NEXGEN),
    (b"CentaurHauls", VendorCode::CENTAUR),
    (b"RiseRiseRise", VendorCode::RISE),
    (b"GenuineTMx86", VendorCode::TRANSMETA),
    (b"TransmetaCPU", VendorCode::TRANSMETA),
    (b"Geode by NSC", VendorCode::NSC),
    (b"SiS SiS SiS ", VendorCode::SIS),
];

/// Display names indexed by vendor code.
static VENDOR_NAMES: [&str; 10] = [
    "Intel",
    "Cyrix",
    "AMD",
    "UMC",
    "NexGen",
    "Centaur",
    "Rise",
    "Transmeta",
    "NSC",
    "SiS",
];

/// Placeholder for codes without a display name.
pub const INVALID_VENDOR_NAME: &str = "<invalid cpu vendor>";

/// Get the display name of a vendor code.
pub fn cpu_vendor_name(vendor: VendorCode) -> &'static str {
    VENDOR_NAMES
        .get(usize::from(vendor.raw()))
        .copied()
        .unwrap_or(INVALID_VENDOR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_entry_normalizes() {
        for (name, code) in VENDOR_TABLE.iter() {
            assert_eq!(VendorCode::from_vendor_string(name), *code);
        }
    }

    #[test]
    fn test_transmeta_has_two_strings() {
        assert_eq!(VendorCode::from_vendor_string(b"GenuineTMx86"), VendorCode::TRANSMETA);
        assert_eq!(VendorCode::from_vendor_string(b"TransmetaCPU"), VendorCode::TRANSMETA);
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        assert_eq!(VendorCode::from_vendor_string(b"genuineintel"), VendorCode::UNKNOWN);
        assert_eq!(VendorCode::from_vendor_string(b"AuthenticAmd"), VendorCode::UNKNOWN);
    }

    #[test]
    fn test_zero_filled_string_is_unknown() {
        assert_eq!(VendorCode::from_vendor_string(&[0; 12]), VendorCode::UNKNOWN);
    }

    #[test]
    fn test_vendor_names() {
        assert_eq!(cpu_vendor_name(VendorCode::INTEL), "Intel");
        assert_eq!(cpu_vendor_name(VendorCode::SIS), "SiS");
        assert_eq!(cpu_vendor_name(VendorCode::TRANSMETA), "Transmeta");
        assert_eq!(cpu_vendor_name(VendorCode::UNKNOWN), INVALID_VENDOR_NAME);
        assert_eq!(cpu_vendor_name(VendorCode::from_raw(10)), INVALID_VENDOR_NAME);
        assert_eq!(VendorCode::default(), VendorCode::UNKNOWN);
    }

    #[test]
    fn test_name_matches_display() {
        assert_eq!(VendorCode::CENTAUR.name(), "Centaur");
        assert_eq!(VendorCode::UNKNOWN.name(), INVALID_VENDOR_NAME);
        assert_eq!(alloc::format!("{}", VendorCode::NSC), VendorCode::NSC.name());
    }
}
