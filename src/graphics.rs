use core::convert::Infallible;

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::BinaryColor,
    Pixel,
};

use crate::{register::DIGITS, Max7219};

impl<I, const DEVICES: usize> OriginDimensions for Max7219<I, DEVICES> {
    fn size(&self) -> Size {
        Size::new((DEVICES * DIGITS) as u32, DIGITS as u32)
    }
}

/// Draws into the off-screen buffer. Point `(0, 0)` is column 1, row 1.
impl<I, const DEVICES: usize> DrawTarget for Max7219<I, DEVICES> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<P>(&mut self, pixels: P) -> Result<(), Self::Error>
    where
        P: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let x = point.x.saturating_add(1);
            let y = point.y.saturating_add(1);

            match color {
                BinaryColor::On => self.draw_pixel(x, y),
                BinaryColor::Off => self.clear_pixel(x, y),
            }
        }

        Ok(())
    }
}
