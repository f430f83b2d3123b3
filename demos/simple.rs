use embedded_hal::delay::DelayNs;
use max7219_matrix::{ConfigBuilder, Glyph, Max7219};

const DEVICES: usize = 4;

const HEART: Glyph = [
    0b0110_0110,
    0b1111_1111,
    0b1111_1111,
    0b1111_1111,
    0b0111_1110,
    0b0011_1100,
    0b0001_1000,
    0b0000_0000,
];

fn main() {
    // placeholders, replace with instances from your HAL
    let spi_bus = embedded_hal_mock::eh1::spi::Mock::<u8>::new(&[]);
    let load_pin = embedded_hal_mock::eh1::digital::Mock::new(&[]);
    let mut delay = embedded_hal_mock::eh1::delay::NoopDelay::new();

    let config = ConfigBuilder::new().intensity(4);
    let mut matrix = Max7219::<_, DEVICES>::new_with_config(
        max7219_matrix::interface::SpiBusInterface::new(spi_bus, load_pin),
        &config,
    )
    .unwrap();
    let glyphs: &[(char, Glyph)] = &[('*', HEART)];

    let mut offset = 0;
    loop {
        // scroll a heart and a frame through the chain
        matrix.draw_rect(1, 1, matrix.width(), 8);
        matrix.draw_string(glyphs, "*", offset);
        if offset % 16 == 0 {
            matrix.invert();
        }
        matrix.update().unwrap();

        offset = (offset + 1) % matrix.width();

        delay.delay_ms(50);
    }
}
