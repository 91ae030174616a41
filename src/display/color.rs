// SPDX-License-Identifier: GPL-3.0-or-later

use embedded_graphics_core::pixelcolor::{Rgb888, RgbColor};

/// 12-bit color, 4 bits per channel, packed as 0x0RGB.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Color12(u16);

impl Color12 {
    pub const BLACK: Self = Self(0x000);
    pub const WHITE: Self = Self(0xFFF);
    pub const GRAY: Self = Self(0xAAA);
    pub const RED: Self = Self(0xF00);
    pub const GREEN: Self = Self(0x0F0);
    pub const BLUE: Self = Self(0x00F);
    pub const CYAN: Self = Self(0x0FF);
    pub const MAGENTA: Self = Self(0xF0F);
    pub const YELLOW: Self = Self(0xFF0);
    pub const ORANGE: Self = Self(0xF40);

    pub const fn new(raw: u16) -> Self {
        Self(raw & 0xFFF)
    }

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self((((r & 0xF) as u16) << 8) | (((g & 0xF) as u16) << 4) | ((b & 0xF) as u16))
    }

    /// Scales 0-255 channels down to 0-15.
    pub const fn from_rgb888(r: u8, g: u8, b: u8) -> Self {
        const fn scale(v: u8) -> u8 {
            ((v as u16 * 0xF) / 0xFF) as u8
        }
        Self::from_rgb(scale(r), scale(g), scale(b))
    }

    /// From a 0xRRGGBB web color.
    pub const fn from_hex(rgb: u32) -> Self {
        Self::from_rgb888((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    pub const fn r(self) -> u8 {
        (self.0 >> 8) as u8 & 0xF
    }

    pub const fn g(self) -> u8 {
        (self.0 >> 4) as u8 & 0xF
    }

    pub const fn b(self) -> u8 {
        self.0 as u8 & 0xF
    }

    pub const fn complement(self) -> Self {
        Self(0xFFF - self.0)
    }
}

impl From<Color12> for Rgb888 {
    fn from(c: Color12) -> Self {
        // 0xA -> 0xAA
        Rgb888::new(c.r() * 0x11, c.g() * 0x11, c.b() * 0x11)
    }
}

impl From<Rgb888> for Color12 {
    fn from(c: Rgb888) -> Self {
        Color12::from_rgb888(c.r(), c.g(), c.b())
    }
}

/// Two adjacent pixels on the wire: 3 bytes, MSB first.
#[inline]
pub const fn pack_pair(a: Color12, b: Color12) -> [u8; 3] {
    let (a, b) = (a.0, b.0);
    [
        (a >> 4) as u8,
        (((a & 0xF) << 4) | (b >> 8)) as u8,
        (b & 0xFF) as u8,
    ]
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Theme {
    pub pixel: Color12,
    pub background: Color12,
    pub border_line: Color12,
    pub border_fill: Color12,
}

impl Theme {
    pub const fn new(pixel: Color12, background: Color12, border_line: Color12, border_fill: Color12) -> Self {
        Self { pixel, background, border_line, border_fill }
    }

    /// High contrast
    pub const DEFAULT: Theme = Theme::new(Color12::WHITE, Color12::BLACK, Color12::GRAY, Color12::BLACK);

    /// Reminiscent of the first Game Boy
    pub const DMG: Theme = Theme::new(Color12::new(0x003), Color12::new(0xAD8), Color12::new(0x777), Color12::GRAY);

    pub const SOLARIZED_DARK: Theme = Theme::new(
        Color12::from_hex(0xD33682),
        Color12::from_hex(0x002B36),
        Color12::from_hex(0x268BD2),
        Color12::from_hex(0x073642),
    );
}

impl Default for Theme {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_12bit_value_round_trips() {
        for v in 0..=0xFFFu16 {
            let c = Color12::new(v);
            assert_eq!(c.raw(), v);
            assert_eq!(Color12::from_rgb(c.r(), c.g(), c.b()), c);
        }
    }

    #[test]
    fn values_are_masked_to_12_bits() {
        assert_eq!(Color12::new(0xFABC).raw(), 0xABC);
        assert_eq!(Color12::from_rgb(0x1F, 0x23, 0xF4), Color12::new(0xF34));
    }

    #[test]
    fn pairs_pack_into_three_bytes() {
        assert_eq!(pack_pair(Color12::WHITE, Color12::BLACK), [0xFF, 0xF0, 0x00]);
        assert_eq!(pack_pair(Color12::BLACK, Color12::WHITE), [0x00, 0x0F, 0xFF]);
        assert_eq!(pack_pair(Color12::new(0x123), Color12::new(0x456)), [0x12, 0x34, 0x56]);
    }

    #[test]
    fn eight_bit_channels_scale_down() {
        assert_eq!(Color12::from_rgb888(0xFF, 0x00, 0x80), Color12::new(0xF07));
        assert_eq!(Color12::from_hex(0x002B36), Color12::new(0x023));
        assert_eq!(Theme::SOLARIZED_DARK.pixel, Color12::new(0xC37));
    }

    #[test]
    fn complement_inverts_each_channel() {
        assert_eq!(Color12::WHITE.complement(), Color12::BLACK);
        assert_eq!(Color12::new(0x0F4).complement(), Color12::new(0xF0B));
    }

    #[test]
    fn converts_to_and_from_rgb888() {
        assert_eq!(Rgb888::from(Color12::new(0xA5F)), Rgb888::new(0xAA, 0x55, 0xFF));
        assert_eq!(Color12::from(Rgb888::new(0xAA, 0x55, 0xFF)), Color12::new(0xA5F));
    }
}
