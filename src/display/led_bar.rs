// SPDX-License-Identifier: GPL-3.0-or-later

use crate::consts::led_bar::HEIGHT;
use crate::drivers::{bus::WriteRegion, st7735::Madctl};
use super::color::Color12;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LedChannel {
    Red,
    Green,
    Blue,
}

/// Brightness of the emulated RGB LED, one 0-255 level per channel.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct LedLevels {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl LedLevels {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub const fn digital(red: bool, green: bool, blue: bool) -> Self {
        Self::new(digital_level(red), digital_level(green), digital_level(blue))
    }

    pub fn get(&self, channel: LedChannel) -> u8 {
        match channel {
            LedChannel::Red => self.red,
            LedChannel::Green => self.green,
            LedChannel::Blue => self.blue,
        }
    }

    pub fn set(&mut self, channel: LedChannel, level: u8) {
        match channel {
            LedChannel::Red => self.red = level,
            LedChannel::Green => self.green = level,
            LedChannel::Blue => self.blue = level,
        }
    }

    /// The swatch painted on the strip.
    pub const fn color(&self) -> Color12 {
        Color12::from_rgb888(self.red, self.green, self.blue)
    }
}

pub const fn digital_level(on: bool) -> u8 {
    if on { 0xFF } else { 0 }
}

/// Where the strip goes: along the edge the top of the game faces.
pub fn strip_region(panel: (u16, u16), madctl: Madctl) -> WriteRegion {
    let y = if madctl.led_strip_on_top() { 0 } else { panel.1 - HEIGHT };
    WriteRegion::new(0, y, panel.0, HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_scale_to_4_bits() {
        assert_eq!(LedLevels::new(0xFF, 0x80, 0).color(), Color12::new(0xF70));
        assert_eq!(LedLevels::digital(true, false, true).color(), Color12::MAGENTA);
        assert_eq!(LedLevels::default().color(), Color12::BLACK);
    }

    #[test]
    fn channels_are_independent() {
        let mut levels = LedLevels::new(1, 2, 3);
        levels.set(LedChannel::Green, 200);
        assert_eq!(levels, LedLevels::new(1, 200, 3));
        assert_eq!(levels.get(LedChannel::Blue), 3);
    }

    #[test]
    fn strip_follows_the_vertical_flip() {
        let mut madctl = Madctl::MY | Madctl::MV;
        assert_eq!(strip_region((160, 128), madctl), WriteRegion::new(0, 124, 160, 4));
        madctl.flip_vertical(true);
        assert_eq!(strip_region((160, 128), madctl), WriteRegion::new(0, 0, 160, 4));
    }
}
