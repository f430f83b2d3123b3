//! Driver for chains of MAX7219 controlled 8x8 LED matrices.
//!
//! Drawing goes to an off-screen buffer. [`Max7219::update`] pushes pending mode
//! changes, makes the off-screen buffer the on-screen buffer, sends it to the chain
//! and starts the next frame from a blank off-screen buffer.
//!
//! Columns are numbered `1..=DEVICES * 8` across the whole chain, rows `1..=8`.
//! Drawing outside of that area is silently ignored.
//!
//! Datasheet: <https://www.analog.com/media/en/technical-documentation/data-sheets/MAX7219-MAX7221.pdf>

#![cfg_attr(not(test), no_std)]

mod configuration;
pub mod glyph;
#[cfg(feature = "graphics")]
mod graphics;
pub mod interface;
mod register;

pub use configuration::{ConfigBuilder, Configuration};
use configuration::ModeRegister;
use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::spi::SpiBus;
pub use glyph::{Glyph, GlyphSource};
use interface::ShiftRegisterAccess;
use register::{Register, DIGITS};

/// Error enum for the MAX7219 driver
#[derive(Debug)]
pub enum Error<IE> {
    /// An interface related error has occured
    Interface(IE),

    /// Setting the load pin failed. Only returned by interfaces where the
    /// load pin has a different error type than the data path.
    Load(embedded_hal::digital::ErrorKind),
}

/// Number of rows of a matrix.
pub const ROWS: i32 = DIGITS as i32;

/// Driver for `DEVICES` daisy-chained MAX7219s.
///
/// A chain of zero devices is allowed; it never touches the interface and
/// ignores all drawing.
pub struct Max7219<I, const DEVICES: usize> {
    interface: I,
    modes: [Configuration; DEVICES],
    mode_dirty: bool,
    on_screen: [[u8; DIGITS]; DEVICES],
    off_screen: [[u8; DIGITS]; DEVICES],
}

impl<DATA, CLK, LOAD, PE, const DEVICES: usize>
    Max7219<interface::BitBangInterface<DATA, CLK, LOAD>, DEVICES>
where
    DATA: OutputPin<Error = PE>,
    CLK: OutputPin<Error = PE>,
    LOAD: OutputPin<Error = PE>,
{
    /// Create a driver bit-banging the 3-wire bus on the given output pins.
    pub fn new_with_pins(
        data: DATA,
        clock: CLK,
        load: LOAD,
    ) -> Result<Max7219<interface::BitBangInterface<DATA, CLK, LOAD>, DEVICES>, Error<PE>> {
        Max7219::new(interface::BitBangInterface::new(data, clock, load))
    }
}

impl<SPI, LOAD, IE, const DEVICES: usize> Max7219<interface::SpiBusInterface<SPI, LOAD>, DEVICES>
where
    SPI: SpiBus<u8, Error = IE>,
    LOAD: OutputPin,
{
    /// Create a driver clocking data out over `spi`, latching with `load`.
    pub fn new_with_spi_bus(
        spi: SPI,
        load: LOAD,
    ) -> Result<Max7219<interface::SpiBusInterface<SPI, LOAD>, DEVICES>, Error<IE>> {
        Max7219::new(interface::SpiBusInterface::new(spi, load))
    }
}

impl<I, IE, const DEVICES: usize> Max7219<I, DEVICES>
where
    I: ShiftRegisterAccess<Error = Error<IE>>,
{
    /// Create a driver with the power-on defaults. See [`ConfigBuilder::new`].
    pub fn new(interface: I) -> Result<Self, Error<IE>> {
        Self::new_with_config(interface, &ConfigBuilder::new())
    }

    /// Create a new driver, applying `config` to every device of the chain.
    ///
    /// The returned driver has pushed its mode registers and blanked the display.
    pub fn new_with_config(interface: I, config: &ConfigBuilder) -> Result<Self, Error<IE>> {
        let mut driver = Max7219 {
            interface,
            modes: [config.build(); DEVICES],
            mode_dirty: true,
            on_screen: [[0; DIGITS]; DEVICES],
            off_screen: [[0; DIGITS]; DEVICES],
        };
        driver.update()?;

        Ok(driver)
    }

    /// Push pending mode changes, then show the off-screen buffer.
    ///
    /// Afterwards the on-screen buffer holds what was sent and the off-screen
    /// buffer is blank.
    pub fn update(&mut self) -> Result<(), Error<IE>> {
        if DEVICES == 0 {
            return Ok(());
        }

        self.push_mode_if_dirty()?;
        self.push_screen()
    }

    fn push_mode_if_dirty(&mut self) -> Result<(), Error<IE>> {
        if !self.mode_dirty {
            return Ok(());
        }

        #[cfg(feature = "defmt")]
        defmt::trace!("max7219: pushing mode registers to {} devices", DEVICES);

        for register in ModeRegister::PUSH_ORDER {
            self.interface.set_load(PinState::Low)?;
            // the first frame shifted in ends up in the last device
            for mode in self.modes.iter().rev() {
                self.interface
                    .write_frame(register.opcode(), mode.register_value(register))?;
            }
            self.interface.set_load(PinState::High)?;
        }

        self.mode_dirty = false;

        Ok(())
    }

    fn push_screen(&mut self) -> Result<(), Error<IE>> {
        self.on_screen = self.off_screen;

        #[cfg(feature = "defmt")]
        defmt::trace!("max7219: pushing screen {=[u8]:x}", self.on_screen.as_flattened());

        for digit in 0..DIGITS {
            self.interface.set_load(PinState::Low)?;
            for device in self.on_screen.iter().rev() {
                self.interface
                    .write_frame(Register::digit(digit as u8), device[digit])?;
            }
            self.interface.set_load(PinState::High)?;
        }

        self.clear();

        Ok(())
    }
}

macro_rules! mode_setter {
    ($name:ident, $all:ident, $field:ident, $field_type:ty, $doc:literal) => {
        #[doc = $doc]
        ///
        /// Sent on the next [`Max7219::update`]. Devices outside of the chain are ignored.
        pub fn $name(&mut self, device: usize, $field: $field_type) {
            if let Some(mode) = self.modes.get_mut(device) {
                mode.$field = $field;
                self.mode_dirty = true;
            }
        }

        #[doc = concat!("Like [`Max7219::", stringify!($name), "`] for every device of the chain.")]
        pub fn $all(&mut self, $field: $field_type) {
            for device in 0..DEVICES {
                self.$name(device, $field);
            }
        }
    };
}

impl<I, const DEVICES: usize> Max7219<I, DEVICES> {
    /// Number of columns of the whole chain.
    pub const WIDTH: i32 = (DEVICES * DIGITS) as i32;

    /// Number of devices in the chain.
    pub const fn device_count(&self) -> usize {
        DEVICES
    }

    /// Number of columns of the whole chain.
    pub const fn width(&self) -> i32 {
        Self::WIDTH
    }

    /// Current mode of `device`, including changes not pushed yet.
    pub fn configuration(&self, device: usize) -> Option<&Configuration> {
        self.modes.get(device)
    }

    /// True if mode changes are waiting for the next [`Max7219::update`].
    pub fn is_mode_dirty(&self) -> bool {
        self.mode_dirty
    }

    mode_setter!(
        set_decode_mode,
        set_decode_mode_all,
        decode_mode,
        u8,
        "Set the Code-B decode mode of `device`."
    );
    mode_setter!(
        set_intensity,
        set_intensity_all,
        intensity,
        u8,
        "Set the brightness (0..=15) of `device`."
    );
    mode_setter!(
        set_scan_limit,
        set_scan_limit_all,
        scan_limit,
        u8,
        "Set the number of scanned digits minus one (0..=7) of `device`."
    );
    mode_setter!(
        set_shutdown,
        set_shutdown_all,
        shutdown,
        bool,
        "Put `device` into shutdown, or wake it up."
    );
    mode_setter!(
        set_display_test,
        set_display_test_all,
        display_test,
        bool,
        "Enable or disable the display test (all LEDs on) of `device`."
    );

    /// The buffer being drawn to, one byte per column. Bit `y - 1` is row `y`.
    pub fn off_screen(&self) -> &[u8] {
        self.off_screen.as_flattened()
    }

    /// The buffer last sent to the chain.
    pub fn on_screen(&self) -> &[u8] {
        self.on_screen.as_flattened()
    }

    fn column_mut(&mut self, x: i32) -> Option<&mut u8> {
        let index = usize::try_from(x.checked_sub(1)?).ok()?;
        self.off_screen.as_flattened_mut().get_mut(index)
    }

    /// Blank the off-screen buffer.
    pub fn clear(&mut self) {
        self.off_screen = [[0; DIGITS]; DEVICES];
    }

    /// Light the pixel at column `x`, row `y`.
    pub fn draw_pixel(&mut self, x: i32, y: i32) {
        if let (Some(bit), Some(column)) = (row_bit(y), self.column_mut(x)) {
            *column |= bit;
        }
    }

    /// Turn off the pixel at column `x`, row `y`.
    pub fn clear_pixel(&mut self, x: i32, y: i32) {
        if let (Some(bit), Some(column)) = (row_bit(y), self.column_mut(x)) {
            *column &= !bit;
        }
    }

    /// Draw a horizontal line on row `y` from column `x1` to `x2`, both inclusive.
    /// Nothing is drawn if `x1 > x2`.
    pub fn draw_h_line(&mut self, y: i32, x1: i32, x2: i32) {
        if row_bit(y).is_none() {
            return;
        }

        for x in x1.max(1)..=x2.min(Self::WIDTH) {
            self.draw_pixel(x, y);
        }
    }

    /// Draw a vertical line in column `x` from row `y1` to `y2`, both inclusive.
    /// Nothing is drawn if either row is outside `1..=8` or `y1 > y2`.
    pub fn draw_v_line(&mut self, x: i32, y1: i32, y2: i32) {
        if row_bit(y1).is_none() || row_bit(y2).is_none() {
            return;
        }

        let mask = (u8::MAX << (y1 - 1)) & (u8::MAX >> (ROWS - y2));
        if let Some(column) = self.column_mut(x) {
            *column |= mask;
        }
    }

    /// Draw the outline of a `width` x `height` rectangle with its top left
    /// corner at column `x`, row `y`.
    pub fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let right = x.saturating_add(width).saturating_sub(1);
        let bottom = y.saturating_add(height).saturating_sub(1);

        self.draw_h_line(y, x, right);
        self.draw_h_line(bottom, x, right);
        self.draw_v_line(x, y, bottom);
        self.draw_v_line(right, y, bottom);
    }

    /// Draw `symbol` with its top left corner at column `x + 1`, row 1.
    pub fn draw_char(&mut self, symbol: &Glyph, x: i32) {
        for (y, &bits) in (1..).zip(symbol) {
            for column in 0..8 {
                if bits & (0x80u8 >> column) != 0 {
                    self.draw_pixel(x.saturating_add(column + 1), y);
                }
            }
        }
    }

    /// Draw `text` one 8 column cell per character, starting like [`Max7219::draw_char`].
    /// Characters without a glyph leave their cell empty.
    pub fn draw_string<G>(&mut self, glyphs: &G, text: &str, x: i32)
    where
        G: GlyphSource + ?Sized,
    {
        let mut cursor = x;
        for c in text.chars() {
            if let Some(glyph) = glyphs.glyph(c) {
                self.draw_char(&glyph, cursor);
            }
            cursor = cursor.saturating_add(DIGITS as i32);
        }
    }

    /// Invert every pixel of the off-screen buffer.
    pub fn invert(&mut self) {
        for column in self.off_screen.as_flattened_mut() {
            *column = !*column;
        }
    }

    /// Destroys the driver and releases the owned interface.
    pub fn release(self) -> I {
        self.interface
    }
}

fn row_bit(y: i32) -> Option<u8> {
    (1..=ROWS).contains(&y).then(|| 1 << (y - 1))
}
