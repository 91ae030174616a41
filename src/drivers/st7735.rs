// SPDX-License-Identifier: GPL-3.0-or-later

use bitflags::bitflags;

/// ST7735 command set, the subset this driver sends.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[repr(u8)]
pub enum Command {
    SoftwareReset = 0x01,
    SleepIn = 0x10,
    SleepOut = 0x11,
    InversionOff = 0x20,
    InversionOn = 0x21,
    DisplayOff = 0x28,
    DisplayOn = 0x29,
    ColumnAddressSet = 0x2A,
    RowAddressSet = 0x2B,
    MemoryWrite = 0x2C,
    MemoryAccessControl = 0x36,
    PixelFormat = 0x3A,
    FrameRateControl1 = 0xB1,
    GammaPositive = 0xE0,
    GammaNegative = 0xE1,
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> u8 {
        cmd as u8
    }
}

/// COLMOD argument: 12 bits per pixel, 4-4-4.
pub const PIXEL_FORMAT_12BIT: u8 = 0x03;

bitflags! {
    /// MADCTL argument
    pub struct Madctl: u8 {
        /// Row address order
        const MY  = 0x80;
        /// Column address order
        const MX  = 0x40;
        /// Row/column exchange
        const MV  = 0x20;
        const ML  = 0x10;
        const BGR = 0x08;
        const MH  = 0x04;
    }
}

impl Madctl {
    pub fn flip_vertical(&mut self, flipped: bool) {
        self.set(Madctl::MX, flipped);
    }

    // Panels are mounted mirrored, so "not flipped" is MY set.
    pub fn flip_horizontal(&mut self, flipped: bool) {
        self.set(Madctl::MY, !flipped);
    }

    /// The LED strip follows the top edge of the game once the image is
    /// flipped vertically.
    pub fn led_strip_on_top(&self) -> bool {
        self.contains(Madctl::MX)
    }
}
