use embedded_hal::digital::{Error as _, OutputPin, PinState};
use embedded_hal::spi::SpiBus;

use crate::Error;

/// Trait for clocking frames into a chain of shift registers and latching them.
///
/// A latch window is `set_load(Low)`, any number of frames, `set_load(High)`. Every
/// device in the chain latches the frame that sits in its shift register when the
/// load line rises.
pub trait ShiftRegisterAccess {
    type Error;

    /// Drives the load (latch) line.
    fn set_load(&mut self, state: PinState) -> Result<(), Self::Error>;

    /// Transmits one byte, most significant bit first.
    fn shift_out(&mut self, value: u8) -> Result<(), Self::Error>;

    /// Transmits a 16-bit frame: the register opcode followed by its data.
    fn write_frame(&mut self, opcode: u8, data: u8) -> Result<(), Self::Error> {
        self.shift_out(opcode)?;
        self.shift_out(data)
    }
}

/// Bit-banged 3-wire interface. The pins must already be configured as outputs.
pub struct BitBangInterface<DATA, CLK, LOAD> {
    pub(crate) data: DATA,
    pub(crate) clock: CLK,
    pub(crate) load: LOAD,
}

impl<DATA, CLK, LOAD> BitBangInterface<DATA, CLK, LOAD> {
    pub fn new(data: DATA, clock: CLK, load: LOAD) -> Self {
        Self { data, clock, load }
    }

    /// Releases the data, clock and load pins.
    pub fn release(self) -> (DATA, CLK, LOAD) {
        (self.data, self.clock, self.load)
    }
}

impl<DATA, CLK, LOAD, PE> ShiftRegisterAccess for BitBangInterface<DATA, CLK, LOAD>
where
    DATA: OutputPin<Error = PE>,
    CLK: OutputPin<Error = PE>,
    LOAD: OutputPin<Error = PE>,
{
    type Error = Error<PE>;

    fn set_load(&mut self, state: PinState) -> Result<(), Self::Error> {
        self.load.set_state(state).map_err(Error::Interface)
    }

    fn shift_out(&mut self, value: u8) -> Result<(), Self::Error> {
        for bit in (0..8).rev() {
            self.data
                .set_state(PinState::from(value & (1 << bit) != 0))
                .map_err(Error::Interface)?;

            // data is sampled on the rising edge
            self.clock.set_high().map_err(Error::Interface)?;
            self.clock.set_low().map_err(Error::Interface)?;
        }

        Ok(())
    }
}

/// Interface using a hardware SPI bus for data and clock, and a separate load pin.
///
/// The chip select of the bus must not be used; `load` takes its place.
pub struct SpiBusInterface<SPI, LOAD> {
    pub(crate) spi: SPI,
    pub(crate) load: LOAD,
}

impl<SPI, LOAD> SpiBusInterface<SPI, LOAD> {
    pub fn new(spi: SPI, load: LOAD) -> Self {
        Self { spi, load }
    }

    /// Releases the SPI bus and the load pin.
    pub fn release(self) -> (SPI, LOAD) {
        (self.spi, self.load)
    }
}

impl<SPI, LOAD, IE> ShiftRegisterAccess for SpiBusInterface<SPI, LOAD>
where
    SPI: SpiBus<u8, Error = IE>,
    LOAD: OutputPin,
{
    type Error = Error<IE>;

    fn set_load(&mut self, state: PinState) -> Result<(), Self::Error> {
        if state == PinState::High {
            // all frames have to be on the wire before latching
            self.spi.flush().map_err(Error::Interface)?;
        }

        self.load
            .set_state(state)
            .map_err(|error| Error::Load(error.kind()))
    }

    fn shift_out(&mut self, value: u8) -> Result<(), Self::Error> {
        self.spi.write(&[value]).map_err(Error::Interface)
    }
}


#[cfg(test)]
pub(crate) mod mock {
    use embedded_hal::digital::PinState;

    use super::ShiftRegisterAccess;
    use crate::Error;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) enum Access {
        Load(PinState),
        Shift(u8),
    }

    /// Records every access. Can be told to fail after a number of accesses.
    #[derive(Debug, Default)]
    pub(crate) struct MockInterface {
        accesses: Vec<Access>,
        fail_after: Option<usize>,
    }

    impl MockInterface {
        pub fn new() -> Self {
            Self::default()
        }

        /// Fail every access once `accesses` more have succeeded.
        pub fn fail_after(&mut self, accesses: usize) {
            self.fail_after = Some(accesses);
        }

        pub fn heal(&mut self) {
            self.fail_after = None;
        }

        pub fn accesses(&self) -> &[Access] {
            &self.accesses
        }

        pub fn clear(&mut self) {
            self.accesses.clear();
        }

        /// Frames grouped by latch window, in the order they were shifted out.
        pub fn latch_windows(&self) -> Vec<Vec<[u8; 2]>> {
            let mut windows = Vec::new();
            let mut bytes: Option<Vec<u8>> = None;

            for access in &self.accesses {
                match *access {
                    Access::Load(PinState::Low) => {
                        assert!(bytes.is_none(), "Load pulled low twice");
                        bytes = Some(Vec::new());
                    }
                    Access::Shift(value) => bytes
                        .as_mut()
                        .expect("Shifted a byte outside of a latch window")
                        .push(value),
                    Access::Load(PinState::High) => {
                        let window = bytes.take().expect("Latched without a window");
                        assert!(window.len() % 2 == 0, "Latched a partial frame: {window:x?}");
                        windows.push(
                            window
                                .chunks_exact(2)
                                .map(|frame| [frame[0], frame[1]])
                                .collect(),
                        );
                    }
                }
            }

            assert!(bytes.is_none(), "Latch window was never closed");
            windows
        }

        fn record(&mut self, access: Access) -> Result<(), Error<()>> {
            if let Some(remaining) = self.fail_after.as_mut() {
                if *remaining == 0 {
                    return Err(Error::Interface(()));
                }
                *remaining -= 1;
            }

            self.accesses.push(access);
            Ok(())
        }
    }

    impl ShiftRegisterAccess for MockInterface {
        type Error = Error<()>;

        fn set_load(&mut self, state: PinState) -> Result<(), Self::Error> {
            self.record(Access::Load(state))
        }

        fn shift_out(&mut self, value: u8) -> Result<(), Self::Error> {
            self.record(Access::Shift(value))
        }
    }
}
