//! SSD1306 OLED display wrapper.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

use macropad::ui::display::Panel;
use macropad::Error;

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so callers pass in their HAL's
/// I²C peripheral.
type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x32, BufferedGraphicsMode<DisplaySize128x32>>;

/// The 128×32 panel as a UI [`Panel`].
pub struct Oled<I2C> {
    display: Display<I2C>,
}

impl<I2C> Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Initialise the SSD1306 and clear the screen.
    pub fn new(i2c: I2C) -> Result<Self, Error> {
        let interface = I2CDisplayInterface::new(i2c);
        let mut display = Ssd1306::new(interface, DisplaySize128x32, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        display.init().map_err(|_| Error::Display)?;
        display.clear_buffer();
        display.flush().map_err(|_| Error::Display)?;
        Ok(Self { display })
    }
}

impl<I2C> DrawTarget for Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    type Color = BinaryColor;
    type Error = <Display<I2C> as DrawTarget>::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.display.draw_iter(pixels)
    }
}

impl<I2C> OriginDimensions for Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn size(&self) -> Size {
        self.display.size()
    }
}

impl<I2C> Panel for Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn flush(&mut self) -> Result<(), Error> {
        self.display.flush().map_err(|_| Error::Display)
    }

    fn set_powered(&mut self, on: bool) -> Result<(), Error> {
        self.display.set_display_on(on).map_err(|_| Error::Display)
    }
}
