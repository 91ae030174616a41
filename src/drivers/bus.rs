// SPDX-License-Identifier: GPL-3.0-or-later

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_graphics_core::{
    geometry::{Point, Size},
    primitives::Rectangle,
};
use embedded_hal::blocking::spi::Write;

use crate::errors::{DisplayError, DisplayResult};
use crate::util::Pin;
use super::st7735::Command;

/// The single token guarding the SPI peripheral.
///
/// Every consumer of the bus (panel commands, pixel streams, other SPI
/// devices) goes through it. It is released either by the holder or by the
/// DMA completion handler, which is why it is not a regular mutex around the
/// peripheral.
pub struct BusLock {
    held: AtomicBool,
}

impl BusLock {
    pub const fn new() -> Self {
        Self { held: AtomicBool::new(false) }
    }

    pub fn try_acquire(&self) -> Option<BusGuard<'_>> {
        self.held.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| BusGuard { lock: self })
    }

    /// Spins until the bus is free. There is no timeout, a transfer that
    /// never completes keeps us here forever.
    pub fn acquire(&self) -> BusGuard<'_> {
        loop {
            if let Some(guard) = self.try_acquire() {
                return guard;
            }
            while self.is_held() {
                core::hint::spin_loop();
            }
        }
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

impl Default for BusLock {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof of holding the bus. Dropping it releases the lock.
#[must_use = "the bus is released as soon as the guard is dropped"]
pub struct BusGuard<'a> {
    lock: &'a BusLock,
}

impl<'a> BusGuard<'a> {
    pub fn release(self) {}

    pub fn is_guarding(&self, lock: &BusLock) -> bool {
        core::ptr::eq(self.lock, lock)
    }
}

impl<'a> Drop for BusGuard<'a> {
    fn drop(&mut self) {
        self.lock.held.store(false, Ordering::Release);
    }
}

/// Rectangle of panel memory targeted by the next RAMWR.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct WriteRegion {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl WriteRegion {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    pub const fn full_panel(panel_width: u16, panel_height: u16) -> Self {
        Self::new(0, 0, panel_width, panel_height)
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn bounding_box(&self) -> Rectangle {
        Rectangle::new(
            Point::new(self.x.into(), self.y.into()),
            Size::new(self.width.into(), self.height.into()),
        )
    }

    fn panel_box(panel: (u16, u16)) -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(panel.0.into(), panel.1.into()))
    }

    pub fn fits(&self, panel: (u16, u16)) -> bool {
        !self.is_empty() && Self::panel_box(panel).intersection(&self.bounding_box()) == self.bounding_box()
    }

    /// Part of the region visible on the panel, None when nothing is.
    pub fn clamp(&self, panel: (u16, u16)) -> Option<WriteRegion> {
        let visible = Self::panel_box(panel).intersection(&self.bounding_box());
        if visible.size.width == 0 || visible.size.height == 0 {
            return None;
        }
        Some(WriteRegion::new(
            visible.top_left.x as u16,
            visible.top_left.y as u16,
            visible.size.width as u16,
            visible.size.height as u16,
        ))
    }

    // CASET/RASET take inclusive [start, end] pairs, big endian.
    fn column_args(&self) -> [u8; 4] {
        address_pair(self.x, self.x + self.width - 1)
    }

    fn row_args(&self) -> [u8; 4] {
        address_pair(self.y, self.y + self.height - 1)
    }
}

fn address_pair(start: u16, end: u16) -> [u8; 4] {
    let [s_hi, s_lo] = start.to_be_bytes();
    let [e_hi, e_lo] = end.to_be_bytes();
    [s_hi, s_lo, e_hi, e_lo]
}

/// Command/data framing on the shared SPI bus.
///
/// Every I/O method requires the bus to be acquired first. Everything between
/// `acquire()` and `release()` (or `hand_off()`) is seen as one indivisible
/// sequence by the other consumers of the bus.
pub struct TransportBus<'a, SPI, DC, CS> {
    spi: SPI,
    dc: DC,
    cs: CS,
    lock: &'a BusLock,
    guard: Option<BusGuard<'a>>,
    panel: (u16, u16),
}

impl<'a, SPI, DC, CS> TransportBus<'a, SPI, DC, CS>
where
    SPI: Write<u8>,
    DC: Pin,
    CS: Pin,
{
    pub fn new(spi: SPI, dc: DC, cs: CS, lock: &'a BusLock, panel_width: u16, panel_height: u16) -> Self {
        cs.set_high();
        dc.set_high();
        Self { spi, dc, cs, lock, guard: None, panel: (panel_width, panel_height) }
    }

    pub fn panel_size(&self) -> (u16, u16) {
        self.panel
    }

    pub fn lock(&self) -> &'a BusLock {
        self.lock
    }

    pub fn is_held(&self) -> bool {
        self.guard.is_some()
    }

    pub fn acquire(&mut self) -> DisplayResult<()> {
        if self.is_held() {
            return Err(DisplayError::BusReentered);
        }
        let guard = self.lock.acquire();
        self.select(guard);
        Ok(())
    }

    pub fn try_acquire(&mut self) -> DisplayResult<()> {
        if self.is_held() {
            return Err(DisplayError::BusReentered);
        }
        let guard = self.lock.try_acquire().ok_or(DisplayError::BusBusy)?;
        self.select(guard);
        Ok(())
    }

    fn select(&mut self, guard: BusGuard<'a>) {
        self.cs.set_low();
        self.guard = Some(guard);
    }

    pub fn release(&mut self) -> DisplayResult<()> {
        let guard = self.guard.take().ok_or(DisplayError::BusNotHeld)?;
        self.cs.set_high();
        guard.release();
        Ok(())
    }

    /// Gives the bus to an asynchronous transfer. The panel stays selected,
    /// whoever ends up with the guard deselects it and drops the guard.
    pub fn hand_off(&mut self) -> DisplayResult<BusGuard<'a>> {
        self.guard.take().ok_or(DisplayError::BusNotHeld)
    }

    fn ensure_held(&self) -> DisplayResult<()> {
        if self.is_held() {
            Ok(())
        } else {
            warn!("bus access without holding the bus lock");
            Err(DisplayError::BusNotHeld)
        }
    }

    pub fn enter_command_mode(&mut self) -> DisplayResult<()> {
        self.ensure_held()?;
        self.dc.set_low();
        Ok(())
    }

    pub fn enter_data_mode(&mut self) -> DisplayResult<()> {
        self.ensure_held()?;
        self.dc.set_high();
        Ok(())
    }

    pub fn write_byte(&mut self, b: u8) -> DisplayResult<()> {
        self.write_bytes(&[b])
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> DisplayResult<()> {
        self.ensure_held()?;
        self.spi.write(bytes).map_err(|_| DisplayError::Spi)
    }

    pub fn send_command(&mut self, cmd: Command) -> DisplayResult<()> {
        self.enter_command_mode()?;
        self.write_byte(cmd.into())?;
        self.enter_data_mode()
    }

    pub fn command(&mut self, cmd: Command, args: &[u8]) -> DisplayResult<()> {
        self.send_command(cmd)?;
        if !args.is_empty() {
            self.write_bytes(args)?;
        }
        Ok(())
    }

    /// Emits CASET, RASET, then RAMWR. The pixel stream can follow.
    pub fn set_write_region(&mut self, region: WriteRegion) -> DisplayResult<()> {
        self.ensure_held()?;
        if !region.fits(self.panel) {
            warn!("write region {:?} outside of the {:?} panel", region, self.panel);
            return Err(DisplayError::RegionOutOfBounds);
        }

        self.command(Command::ColumnAddressSet, &region.column_args())?;
        self.command(Command::RowAddressSet, &region.row_args())?;
        self.send_command(Command::MemoryWrite)
    }

    pub fn free(self) -> (SPI, DC, CS) {
        (self.spi, self.dc, self.cs)
    }
}
