use crate::register::{BitFlags, Register};

/// Mode registers of a single MAX7219 in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Configuration {
    pub(crate) decode_mode: u8,
    pub(crate) intensity: u8,
    pub(crate) scan_limit: u8,
    pub(crate) shutdown: bool,
    pub(crate) display_test: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            decode_mode: 0,
            intensity: 1,
            scan_limit: 7,
            shutdown: false,
            display_test: false,
        }
    }
}

impl Configuration {
    /// Code-B decode bits, one per digit. Zero for a plain LED matrix.
    pub fn decode_mode(&self) -> u8 {
        self.decode_mode
    }

    /// Brightness, 0..=15.
    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    /// Index of the last scanned digit, 0..=7.
    pub fn scan_limit(&self) -> u8 {
        self.scan_limit
    }

    pub fn shutdown(&self) -> bool {
        self.shutdown
    }

    pub fn display_test(&self) -> bool {
        self.display_test
    }

    pub(crate) fn register_value(&self, register: ModeRegister) -> u8 {
        match register {
            ModeRegister::DecodeMode => self.decode_mode,
            ModeRegister::Intensity => self.intensity.min(BitFlags::INTENSITY_MAX),
            ModeRegister::ScanLimit => self.scan_limit.min(BitFlags::SCAN_LIMIT_MAX),
            // the chip runs with D0 set, so "not shut down" goes out as all ones
            ModeRegister::Shutdown => !(self.shutdown as u8),
            ModeRegister::DisplayTest => {
                if self.display_test {
                    BitFlags::DISPLAY_TEST_ON
                } else {
                    0
                }
            }
        }
    }
}

/// The mode registers, in the order they are pushed to the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ModeRegister {
    DecodeMode,
    Intensity,
    ScanLimit,
    Shutdown,
    DisplayTest,
}

impl ModeRegister {
    pub(crate) const PUSH_ORDER: [ModeRegister; 5] = [
        ModeRegister::DecodeMode,
        ModeRegister::Intensity,
        ModeRegister::ScanLimit,
        ModeRegister::Shutdown,
        ModeRegister::DisplayTest,
    ];

    pub(crate) const fn opcode(self) -> u8 {
        match self {
            ModeRegister::DecodeMode => Register::DECODE_MODE,
            ModeRegister::Intensity => Register::INTENSITY,
            ModeRegister::ScanLimit => Register::SCAN_LIMIT,
            ModeRegister::Shutdown => Register::SHUTDOWN,
            ModeRegister::DisplayTest => Register::DISPLAY_TEST,
        }
    }
}

/// Builder for the configuration applied to every device of the chain at start-up.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigBuilder {
    pub(crate) configuration: Configuration,
}

macro_rules! builder_property {
    ($field:ident, $field_type:path, $doc:literal) => {
        #[doc = $doc]
        pub fn $field(mut self, $field: $field_type) -> Self {
            self.configuration.$field = $field;
            self
        }
    };
}

impl ConfigBuilder {
    /// Create a builder holding the power-on defaults: no decode, intensity 1,
    /// all 8 digits scanned, awake, display test off.
    pub fn new() -> Self {
        Self::default()
    }

    builder_property!(
        decode_mode,
        u8,
        "Code-B decode selection per digit. Keep at 0 for LED matrices"
    );
    builder_property!(
        intensity,
        u8,
        "Brightness level. Values above 15 are sent as 15"
    );
    builder_property!(
        scan_limit,
        u8,
        "Number of scanned digits minus one. Values above 7 are sent as 7"
    );
    builder_property!(shutdown, bool, "Start the chips in shutdown mode");
    builder_property!(display_test, bool, "Light every LED regardless of data");

    /// The configuration a device starts with.
    pub fn build(&self) -> Configuration {
        self.configuration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .intensity(8)
            .scan_limit(3)
            .display_test(true)
            .build();

        assert_eq!(config.intensity(), 8);
        assert_eq!(config.scan_limit(), 3);
        assert_eq!(config.decode_mode(), 0);
        assert!(config.display_test());
        assert!(!config.shutdown());
    }

    #[test]
    fn test_default_register_values() {
        let config = Configuration::default();

        let values: Vec<u8> = ModeRegister::PUSH_ORDER
            .iter()
            .map(|register| config.register_value(*register))
            .collect();

        assert_eq!(values, vec![0x00, 0x01, 0x07, 0xFF, 0x00]);
    }

    #[test]
    fn test_shutdown_and_display_test_values() {
        let config = ConfigBuilder::new().shutdown(true).display_test(true).build();

        assert_eq!(config.register_value(ModeRegister::Shutdown), 0xFE);
        assert_eq!(config.register_value(ModeRegister::DisplayTest), 0x01);
    }

    #[test]
    fn test_register_values_are_clamped() {
        let config = ConfigBuilder::new().intensity(0x3f).scan_limit(12).build();

        assert_eq!(config.register_value(ModeRegister::Intensity), 0x0F);
        assert_eq!(config.register_value(ModeRegister::ScanLimit), 0x07);
    }

    #[test]
    fn test_push_order_opcodes() {
        let opcodes: Vec<u8> = ModeRegister::PUSH_ORDER
            .iter()
            .map(|register| register.opcode())
            .collect();

        assert_eq!(opcodes, vec![0x09, 0x0A, 0x0B, 0x0C, 0x0F]);
    }
}
