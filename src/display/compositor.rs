// SPDX-License-Identifier: GPL-3.0-or-later

use crate::errors::{DisplayError, DisplayResult};
use super::color::{Color12, Theme, pack_pair};

/// Nearest-neighbor index mapping, in 16.16 fixed point.
#[derive(Clone, Copy, Debug)]
struct Scale {
    ratio: u32,
}

impl Scale {
    fn new(src: u16, dst: u16) -> Self {
        Self { ratio: ((src as u32) << 16) / dst.max(1) as u32 + 1 }
    }

    #[inline]
    fn src_index(&self, dst_index: u16) -> u16 {
        ((dst_index as u32 * self.ratio) >> 16) as u16
    }
}

/// A 1-bpp frame seen as a 12-bit color stream over the viewport.
///
/// Each byte of the buffer is a vertical strip of 8 pixels, LSB on top, and
/// strips are laid out row by row, `width` strips per row.
#[derive(Clone, Copy)]
pub struct Compositor<'b> {
    buffer: &'b [u8],
    logical: (u16, u16),
    viewport: (u16, u16),
    x_scale: Scale,
    y_scale: Scale,
    pixel: Color12,
    background: Color12,
}

impl<'b> Compositor<'b> {
    pub fn new(buffer: &'b [u8], logical: (u16, u16), viewport: (u16, u16), theme: &Theme) -> DisplayResult<Self> {
        check_logical_height(logical.1)?;
        let expected = buffer_len(logical);
        if buffer.len() != expected {
            return Err(DisplayError::BufferLength { expected, actual: buffer.len() });
        }

        Ok(Self {
            buffer,
            logical,
            viewport,
            x_scale: Scale::new(logical.0, viewport.0),
            y_scale: Scale::new(logical.1, viewport.1),
            pixel: theme.pixel,
            background: theme.background,
        })
    }

    pub fn is_scaled(&self) -> bool {
        self.logical != self.viewport
    }

    /// Logical pixel, unscaled.
    #[inline]
    pub fn bit(&self, x: u16, y: u16) -> bool {
        let strip = self.buffer[x as usize + (y as usize >> 3) * self.logical.0 as usize];
        (strip >> (y & 7)) & 1 != 0
    }

    /// Color of a viewport pixel.
    #[inline]
    pub fn color_at(&self, x: u16, y: u16) -> Color12 {
        let (x, y) = if self.is_scaled() {
            (self.x_scale.src_index(x), self.y_scale.src_index(y))
        } else {
            (x, y)
        };

        if self.bit(x, y) { self.pixel } else { self.background }
    }

    /// Viewport pixels, row major.
    pub fn colors(self) -> impl Iterator<Item = Color12> + 'b {
        let (width, height) = self.viewport;
        (0..height).flat_map(move |y| (0..width).map(move |x| self.color_at(x, y)))
    }

    /// The wire stream: pixel pairs packed in 3 bytes.
    pub fn packed(self) -> PackPairs<impl Iterator<Item = Color12> + 'b> {
        PackPairs::new(self.colors(), self.background)
    }

    pub fn packed_len(&self) -> usize {
        packed_len(self.viewport.0 as usize * self.viewport.1 as usize)
    }
}

/// Strips are 8 rows high, a partial strip cannot be addressed.
pub fn check_logical_height(height: u16) -> DisplayResult<()> {
    if height == 0 || height % 8 != 0 {
        return Err(DisplayError::FrameHeight);
    }
    Ok(())
}

/// Bytes a frame buffer of this logical size must have.
pub fn buffer_len(logical: (u16, u16)) -> usize {
    logical.0 as usize * logical.1 as usize / 8
}

/// Bytes on the wire for `pixels` 12-bit pixels.
pub const fn packed_len(pixels: usize) -> usize {
    (pixels + 1) / 2 * 3
}

/// Packs a color stream two pixels at a time. An odd trailing pixel is
/// paired with `pad`.
pub struct PackPairs<I> {
    colors: I,
    pad: Color12,
}

impl<I: Iterator<Item = Color12>> PackPairs<I> {
    pub fn new(colors: I, pad: Color12) -> Self {
        Self { colors, pad }
    }
}

impl<I: Iterator<Item = Color12>> Iterator for PackPairs<I> {
    type Item = [u8; 3];

    #[inline]
    fn next(&mut self) -> Option<[u8; 3]> {
        let a = self.colors.next()?;
        let b = self.colors.next().unwrap_or(self.pad);
        Some(pack_pair(a, b))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lo, hi) = self.colors.size_hint();
        ((lo + 1) / 2, hi.map(|hi| (hi + 1) / 2))
    }
}

/// `count` pixels of one color, packed.
pub fn solid(color: Color12, count: usize) -> impl Iterator<Item = [u8; 3]> {
    core::iter::repeat(pack_pair(color, color)).take((count + 1) / 2)
}
