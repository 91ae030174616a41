// SPDX-License-Identifier: GPL-3.0-or-later

pub mod color;
pub mod compositor;
pub mod border;
pub mod led_bar;
pub mod sink;

use embedded_hal::blocking::{delay::DelayMs, spi::Write};

use crate::consts::display::*;
use crate::drivers::{
    bus::{BusLock, TransportBus, WriteRegion},
    st7735::{Command, Madctl, PIXEL_FORMAT_12BIT},
};
use crate::errors::DisplayResult;
use crate::util::Pin;

use self::border::{BorderLayout, BorderPart};
use self::color::{Color12, Theme};
use self::compositor::{Compositor, check_logical_height, solid};
use self::led_bar::{LedLevels, digital_level, strip_region};
use self::sink::{Blocking, FrameSink};

pub use self::led_bar::LedChannel;

/// How `invert()` shows the inverted image.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InvertMode {
    /// Swap the pixel and background colors.
    Swap,
    /// Let the panel invert everything with INVON/INVOFF.
    Panel,
}

/// Board description. Each console variant is one of these.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct DisplayConfig {
    pub panel_width: u16,
    pub panel_height: u16,
    /// Size of the frame buffer handed to `paint()`.
    pub logical_width: u16,
    pub logical_height: u16,
    /// Size of the frame once on the panel. Differs from the logical size
    /// when the frame is scaled.
    pub viewport_width: u16,
    pub viewport_height: u16,
    pub gap_band: bool,
    pub invert_mode: InvertMode,
    pub madctl: Madctl,
}

impl DisplayConfig {
    /// 160x128 ST7735R, unscaled.
    pub const DOTMG: Self = Self {
        panel_width: PANEL_WIDTH,
        panel_height: PANEL_HEIGHT,
        logical_width: WIDTH,
        logical_height: HEIGHT,
        viewport_width: WIDTH,
        viewport_height: HEIGHT,
        gap_band: true,
        invert_mode: InvertMode::Swap,
        // MY | MV: landscape
        madctl: Madctl::from_bits_truncate(0xA0),
    };

    /// 320x240 panel, frame scaled 2x.
    pub const WIDE: Self = Self {
        panel_width: 320,
        panel_height: 240,
        logical_width: WIDTH,
        logical_height: HEIGHT,
        viewport_width: 2 * WIDTH,
        viewport_height: 2 * HEIGHT,
        gap_band: true,
        invert_mode: InvertMode::Swap,
        madctl: Madctl::from_bits_truncate(0xA0),
    };

    pub fn panel(&self) -> (u16, u16) {
        (self.panel_width, self.panel_height)
    }

    pub fn logical(&self) -> (u16, u16) {
        (self.logical_width, self.logical_height)
    }

    pub fn viewport(&self) -> (u16, u16) {
        (self.viewport_width, self.viewport_height)
    }
}

/// Everything the display remembers between calls. Only `Display` setters
/// change it.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct DisplayState {
    theme: Theme,
    border_drawn: bool,
    leds: LedLevels,
    inverted: bool,
    madctl: Madctl,
}

impl DisplayState {
    fn new(madctl: Madctl) -> Self {
        Self {
            theme: Theme::DEFAULT,
            border_drawn: false,
            leds: LedLevels::default(),
            inverted: false,
            madctl,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Set by the first `draw_border()`, never cleared.
    pub fn border_drawn(&self) -> bool {
        self.border_drawn
    }

    pub fn leds(&self) -> LedLevels {
        self.leds
    }

    pub fn inverted(&self) -> bool {
        self.inverted
    }

    pub fn madctl(&self) -> Madctl {
        self.madctl
    }
}

/// The console screen: a frame in the middle of the panel, a border around
/// it and the LED strip along one edge.
///
/// Frames go through the sink `S`. Border, LED strip and panel commands
/// always go through the bus directly.
pub struct Display<'a, SPI, DC, CS, RST, D, S> {
    bus: TransportBus<'a, SPI, DC, CS>,
    reset: RST,
    delay: D,
    sink: S,
    config: DisplayConfig,
    border: BorderLayout,
    state: DisplayState,
}

impl<'a, SPI, DC, CS, RST, D, S> Display<'a, SPI, DC, CS, RST, D, S>
where
    SPI: Write<u8>,
    DC: Pin,
    CS: Pin,
    RST: Pin,
    D: DelayMs<u16>,
    S: FrameSink<'a>,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: DisplayConfig,
        spi: SPI,
        dc: DC,
        cs: CS,
        lock: &'a BusLock,
        reset: RST,
        delay: D,
        sink: S,
    ) -> DisplayResult<Self> {
        check_logical_height(config.logical_height)?;
        let border = BorderLayout::new(config.panel(), config.viewport(), config.gap_band)?;
        let bus = TransportBus::new(spi, dc, cs, lock, config.panel_width, config.panel_height);
        Ok(Self {
            bus,
            reset,
            delay,
            sink,
            config,
            border,
            state: DisplayState::new(config.madctl),
        })
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn border_layout(&self) -> &BorderLayout {
        &self.border
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn free(self) -> (TransportBus<'a, SPI, DC, CS>, RST, D, S) {
        (self.bus, self.reset, self.delay, self.sink)
    }

    /// Runs `f` with the bus held.
    fn session<R>(&mut self, f: impl FnOnce(&mut TransportBus<'a, SPI, DC, CS>, &mut D) -> DisplayResult<R>) -> DisplayResult<R> {
        self.bus.acquire()?;
        let result = f(&mut self.bus, &mut self.delay);
        self.bus.release()?;
        result
    }

    fn command(&mut self, cmd: Command, args: &[u8]) -> DisplayResult<()> {
        self.session(|bus, _| bus.command(cmd, args))
    }

    fn command_and_wait(&mut self, cmd: Command, delay_ms: u16) -> DisplayResult<()> {
        self.command(cmd, &[])?;
        self.delay.delay_ms(delay_ms);
        Ok(())
    }

    /// Resets and configures the panel, clears it and draws the border.
    pub fn boot(&mut self) -> DisplayResult<()> {
        debug!("Booting display {}x{}", self.config.panel_width, self.config.panel_height);

        self.reset.set_low();
        self.delay.delay_ms(RESET_DELAY_MS);
        self.reset.set_high();
        self.delay.delay_ms(RESET_DELAY_MS);

        let madctl = self.state.madctl;
        self.session(|bus, delay| {
            bus.send_command(Command::SoftwareReset)?;
            delay.delay_ms(SWRESET_DELAY_MS);

            bus.send_command(Command::SleepOut)?;
            delay.delay_ms(SLPOUT_BOOT_DELAY_MS);

            bus.command(Command::FrameRateControl1, &FRMCTR1_ARGS)?;
            bus.command(Command::MemoryAccessControl, &[madctl.bits()])?;
            bus.command(Command::PixelFormat, &[PIXEL_FORMAT_12BIT])?;
            bus.command(Command::GammaPositive, &GAMMA_POSITIVE)?;
            bus.command(Command::GammaNegative, &GAMMA_NEGATIVE)
        })?;

        let (width, height) = self.config.panel();
        self.fill_region(WriteRegion::full_panel(width, height), self.state.theme.background)?;

        self.command_and_wait(Command::DisplayOn, DISPON_DELAY_MS)?;

        self.draw_border()
    }

    /// Fills a region of the panel with one color.
    pub fn fill_region(&mut self, region: WriteRegion, color: Color12) -> DisplayResult<()> {
        Blocking::write(&mut self.bus, region, solid(color, region.pixel_count()))
    }

    /// Sends a frame to the viewport.
    pub fn paint_image(&mut self, buffer: &[u8]) -> DisplayResult<()> {
        let frame = Compositor::new(buffer, self.config.logical(), self.config.viewport(), &self.state.theme)?;
        let region = self.border.viewport_region();
        self.sink.send(&mut self.bus, region, frame.packed())
    }

    /// Sends a frame to the viewport, then zeroes it if `clear_after` is set.
    /// Once this returns, the buffer is free to be drawn into again.
    pub fn paint(&mut self, buffer: &mut [u8], clear_after: bool) -> DisplayResult<()> {
        self.paint_image(buffer)?;
        if clear_after {
            buffer.fill(0);
        }
        Ok(())
    }

    /// Viewport in the background color.
    pub fn blank(&mut self) -> DisplayResult<()> {
        let region = self.border.viewport_region();
        let stream = solid(self.state.theme.background, region.pixel_count());
        self.sink.send(&mut self.bus, region, stream)
    }

    pub fn draw_border(&mut self) -> DisplayResult<()> {
        for part in BorderPart::ALL {
            self.draw_border_part(part)?;
        }
        self.state.border_drawn = true;
        Ok(())
    }

    fn draw_border_part(&mut self, part: BorderPart) -> DisplayResult<()> {
        let theme = &self.state.theme;
        let color = match part {
            BorderPart::Fill => theme.border_fill,
            BorderPart::Outline => theme.border_line,
            BorderPart::Gap => theme.background,
        };

        for region in self.border.regions(part).into_iter().flatten() {
            self.fill_region(region, color)?;
        }
        Ok(())
    }

    fn redraw_border_part(&mut self, part: BorderPart) -> DisplayResult<()> {
        if self.state.border_drawn {
            self.draw_border_part(part)
        } else {
            Ok(())
        }
    }

    /// Takes effect on the next frame.
    pub fn set_pixel_color(&mut self, color: Color12) {
        self.state.theme.pixel = color;
    }

    pub fn set_background_color(&mut self, color: Color12) -> DisplayResult<()> {
        self.state.theme.background = color;
        self.redraw_border_part(BorderPart::Gap)
    }

    pub fn set_border_line_color(&mut self, color: Color12) -> DisplayResult<()> {
        self.state.theme.border_line = color;
        self.redraw_border_part(BorderPart::Outline)
    }

    pub fn set_border_fill_color(&mut self, color: Color12) -> DisplayResult<()> {
        self.state.theme.border_fill = color;
        self.redraw_border_part(BorderPart::Fill)
    }

    pub fn set_theme(&mut self, theme: Theme) -> DisplayResult<()> {
        self.set_pixel_color(theme.pixel);
        self.set_background_color(theme.background)?;
        self.set_border_line_color(theme.border_line)?;
        self.set_border_fill_color(theme.border_fill)
    }

    /// Inverts the image, or sets it back to normal. The LED strip keeps its
    /// color either way.
    pub fn invert(&mut self, inverse: bool) -> DisplayResult<()> {
        if inverse == self.state.inverted {
            return Ok(());
        }

        match self.config.invert_mode {
            InvertMode::Swap => {
                let theme = self.state.theme;
                self.set_pixel_color(theme.background);
                if let Err(e) = self.set_background_color(theme.pixel) {
                    self.state.theme = theme;
                    return Err(e);
                }
            }
            InvertMode::Panel => {
                self.draw_led_strip(inverse)?;
                let cmd = if inverse { Command::InversionOn } else { Command::InversionOff };
                self.command(cmd, &[])?;
            }
        }

        self.state.inverted = inverse;
        debug!("Display inverted: {}", inverse);
        Ok(())
    }

    pub fn set_rgb_led(&mut self, red: u8, green: u8, blue: u8) -> DisplayResult<()> {
        self.state.leds = LedLevels::new(red, green, blue);
        self.draw_leds()
    }

    pub fn set_led(&mut self, channel: LedChannel, level: u8) -> DisplayResult<()> {
        self.state.leds.set(channel, level);
        self.draw_leds()
    }

    pub fn digital_write_rgb(&mut self, red: bool, green: bool, blue: bool) -> DisplayResult<()> {
        self.state.leds = LedLevels::digital(red, green, blue);
        self.draw_leds()
    }

    pub fn digital_write_led(&mut self, channel: LedChannel, on: bool) -> DisplayResult<()> {
        self.set_led(channel, digital_level(on))
    }

    fn draw_leds(&mut self) -> DisplayResult<()> {
        self.draw_led_strip(self.state.inverted)
    }

    fn draw_led_strip(&mut self, inverted: bool) -> DisplayResult<()> {
        let mut color = self.state.leds.color();
        // The panel inverts the strip too, undo it.
        if inverted && self.config.invert_mode == InvertMode::Panel {
            color = color.complement();
        }
        let region = strip_region(self.config.panel(), self.state.madctl);
        self.fill_region(region, color)
    }

    /// Panel to sleep.
    pub fn display_off(&mut self) -> DisplayResult<()> {
        self.command_and_wait(Command::SleepIn, SLEEP_TOGGLE_DELAY_MS)
    }

    pub fn display_on(&mut self) -> DisplayResult<()> {
        self.command_and_wait(Command::SleepOut, SLEEP_TOGGLE_DELAY_MS)
    }

    /// Lights the whole panel regardless of its memory, or goes back to
    /// showing it.
    pub fn all_pixels_on(&mut self, on: bool) -> DisplayResult<()> {
        let cmd = if on { Command::DisplayOff } else { Command::DisplayOn };
        self.command_and_wait(cmd, DISPON_DELAY_MS)
    }

    pub fn flip_vertical(&mut self, flipped: bool) -> DisplayResult<()> {
        self.state.madctl.flip_vertical(flipped);
        self.send_madctl()
    }

    pub fn flip_horizontal(&mut self, flipped: bool) -> DisplayResult<()> {
        self.state.madctl.flip_horizontal(flipped);
        self.send_madctl()
    }

    fn send_madctl(&mut self) -> DisplayResult<()> {
        let madctl = self.state.madctl;
        self.command(Command::MemoryAccessControl, &[madctl.bits()])
    }
}
