/// MAX7219 register addresses (the opcode byte of a 16-bit frame)
///
/// Datasheet: <https://www.analog.com/media/en/technical-documentation/data-sheets/MAX7219-MAX7221.pdf>
pub struct Register;
#[allow(dead_code)]
impl Register {
    pub const NO_OP: u8 = 0x00;

    pub const DIGIT_START: u8 = 0x01;
    /// Digit register for `digit` in `0..8`.
    pub const fn digit(digit: u8) -> u8 {
        Self::DIGIT_START + digit
    }

    pub const DECODE_MODE: u8 = 0x09;
    pub const INTENSITY: u8 = 0x0A;
    pub const SCAN_LIMIT: u8 = 0x0B;
    pub const SHUTDOWN: u8 = 0x0C;
    pub const DISPLAY_TEST: u8 = 0x0F;
}

/// Value limits and flags for registers
pub struct BitFlags;
impl BitFlags {
    pub const INTENSITY_MAX: u8 = 0x0F;
    pub const SCAN_LIMIT_MAX: u8 = 0x07;

    pub const DISPLAY_TEST_ON: u8 = 1 << 0;
}

/// Number of digit (row) registers per chip, and columns per matrix.
pub const DIGITS: usize = 8;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_registers() {
        assert_eq!(Register::digit(0), 0x01);
        assert_eq!(Register::digit(7), 0x08);
        assert!(Register::digit(7) < Register::DECODE_MODE);
    }
}
