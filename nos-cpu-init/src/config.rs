//! CPU initialization configuration

/// Runtime knobs for [`crate::init::CpuInitializer`].
///
/// Defaults follow the cargo features the crate was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuInitConfig {
    /// Compare the local APIC id against the device record before identifying
    pub topology_check: bool,
    /// Keep messages from APs to a minimum
    pub quiet_secondaries: bool,
}

impl CpuInitConfig {
    pub const fn new() -> Self {
        Self {
            topology_check: cfg!(any(feature = "smp", feature = "iopic")),
            quiet_secondaries: true,
        }
    }

    pub const fn with_topology_check(mut self, enabled: bool) -> Self {
        self.topology_check = enabled;
        self
    }

    pub const fn with_quiet_secondaries(mut self, enabled: bool) -> Self {
        self.quiet_secondaries = enabled;
        self
    }
}

impl Default for CpuInitConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_follows_features() {
        let config = CpuInitConfig::default();

        assert_eq!(config.topology_check, cfg!(any(feature = "smp", feature = "iopic")));
        assert!(config.quiet_secondaries);
    }

    #[test]
    fn test_builders() {
        let config = CpuInitConfig::new()
            .with_topology_check(false)
            .with_quiet_secondaries(false);

        assert!(!config.topology_check);
        assert!(!config.quiet_secondaries);
    }
}
