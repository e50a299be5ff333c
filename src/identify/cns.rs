use serde::Serialize;

const CNS_BITMASK: u32 = 0x01;

/// Controller or Namespace Structure selector of an Identify command.
///
/// Chooses which layout the returned data buffer follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cns {
    #[default]
    Controller,
    Namespace,
}

impl Cns {
    pub fn from_controller(ctrlr: bool) -> Self {
        if ctrlr { Cns::Controller } else { Cns::Namespace }
    }

    pub fn is_controller(self) -> bool {
        self == Cns::Controller
    }

    /// Command dword 10 carrying only this selector.
    pub fn cdw10(self) -> u32 {
        self.apply_to_cdw10(0)
    }

    /// Set or clear bit 0 of `cdw10`, leaving the other bits untouched.
    pub fn apply_to_cdw10(self, cdw10: u32) -> u32 {
        match self {
            Cns::Controller => cdw10 | CNS_BITMASK,
            Cns::Namespace => cdw10 & !CNS_BITMASK,
        }
    }

    pub fn from_cdw10(cdw10: u32) -> Self {
        Cns::from_controller(cdw10 & CNS_BITMASK != 0)
    }
}

impl std::fmt::Display for Cns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cns::Controller => write!(f, "controller"),
            Cns::Namespace => write!(f, "namespace"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cdw10_bit() {
        assert_eq!(Cns::Controller.cdw10(), 1);
        assert_eq!(Cns::Namespace.cdw10(), 0);
        assert_eq!(Cns::Namespace.apply_to_cdw10(0xFFFF_FFFF), 0xFFFF_FFFE);
        assert_eq!(Cns::Controller.apply_to_cdw10(0x100), 0x101);
    }

    #[test]
    fn test_cdw10_round_trip_ignores_other_bits() {
        assert_eq!(Cns::from_cdw10(0xABCD_0001), Cns::Controller);
        assert_eq!(Cns::from_cdw10(0xABCD_0000), Cns::Namespace);
        assert!(Cns::from_controller(true).is_controller());
        assert!(!Cns::from_controller(false).is_controller());
    }
}
