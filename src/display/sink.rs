// SPDX-License-Identifier: GPL-3.0-or-later

use embedded_hal::blocking::spi::Write;
use heapless::Vec;

use crate::consts::display::LINE_BUFFER_LEN;
use crate::drivers::{
    bus::{TransportBus, WriteRegion},
    dma::{DmaChannel, DmaEngine},
};
use crate::errors::{DisplayError, DisplayResult};
use crate::util::{Pin, SharedWithInterrupt};
use super::compositor::packed_len;

/// Where a packed pixel stream goes.
///
/// `send()` returns once the stream is no longer read, the source of the
/// stream can be modified right after. The pixels may still be on their way
/// to the panel.
pub trait FrameSink<'a> {
    fn send<SPI, DC, CS, I>(
        &mut self,
        bus: &mut TransportBus<'a, SPI, DC, CS>,
        region: WriteRegion,
        stream: I,
    ) -> DisplayResult<()>
    where
        SPI: Write<u8>,
        DC: Pin,
        CS: Pin,
        I: Iterator<Item = [u8; 3]>;
}

/// Pushes the stream on the SPI from the caller, a line at a time.
#[derive(Debug, Default, Clone, Copy)]
pub struct Blocking;

impl Blocking {
    pub fn write<'a, SPI, DC, CS, I>(
        bus: &mut TransportBus<'a, SPI, DC, CS>,
        region: WriteRegion,
        stream: I,
    ) -> DisplayResult<()>
    where
        SPI: Write<u8>,
        DC: Pin,
        CS: Pin,
        I: Iterator<Item = [u8; 3]>,
    {
        bus.acquire()?;
        let result = Self::write_held(bus, region, stream);
        bus.release()?;
        result
    }

    fn write_held<'a, SPI, DC, CS, I>(
        bus: &mut TransportBus<'a, SPI, DC, CS>,
        region: WriteRegion,
        stream: I,
    ) -> DisplayResult<()>
    where
        SPI: Write<u8>,
        DC: Pin,
        CS: Pin,
        I: Iterator<Item = [u8; 3]>,
    {
        bus.set_write_region(region)?;

        let mut line: Vec<u8, LINE_BUFFER_LEN> = Vec::new();
        for pair in stream {
            if line.len() + pair.len() > line.capacity() {
                bus.write_bytes(&line)?;
                line.clear();
            }
            // Cannot fail, there is room for a pair now.
            line.extend_from_slice(&pair).ok();
        }

        if !line.is_empty() {
            bus.write_bytes(&line)?;
        }
        Ok(())
    }
}

impl<'a> FrameSink<'a> for Blocking {
    fn send<SPI, DC, CS, I>(
        &mut self,
        bus: &mut TransportBus<'a, SPI, DC, CS>,
        region: WriteRegion,
        stream: I,
    ) -> DisplayResult<()>
    where
        SPI: Write<u8>,
        DC: Pin,
        CS: Pin,
        I: Iterator<Item = [u8; 3]>,
    {
        Self::write(bus, region, stream)
    }
}

/// Copies the stream into the DMA frame buffer and lets the channel send it.
///
/// The bus stays held after `send()` returns, until the channel completion
/// interrupt runs. The next bus user spins until then.
pub struct DmaSink<'s, 'a, E, P> {
    channel: &'s SharedWithInterrupt<DmaChannel<'a, E, P>>,
}

impl<'s, 'a, E: DmaEngine, P: Pin> DmaSink<'s, 'a, E, P> {
    pub fn new(channel: &'s SharedWithInterrupt<DmaChannel<'a, E, P>>) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> &'s SharedWithInterrupt<DmaChannel<'a, E, P>> {
        self.channel
    }

    fn fill_held<SPI, DC, CS, I>(
        bus: &mut TransportBus<'a, SPI, DC, CS>,
        region: WriteRegion,
        stream: I,
        buffer: &mut [u8],
        length: usize,
    ) -> DisplayResult<()>
    where
        SPI: Write<u8>,
        DC: Pin,
        CS: Pin,
        I: Iterator<Item = [u8; 3]>,
    {
        if buffer.len() < length {
            return Err(DisplayError::BufferLength { expected: length, actual: buffer.len() });
        }

        for (dst, pair) in buffer[..length].chunks_exact_mut(3).zip(stream) {
            dst.copy_from_slice(&pair);
        }
        bus.set_write_region(region)
    }
}

impl<'s, 'a, E: DmaEngine, P: Pin> FrameSink<'a> for DmaSink<'s, 'a, E, P> {
    fn send<SPI, DC, CS, I>(
        &mut self,
        bus: &mut TransportBus<'a, SPI, DC, CS>,
        region: WriteRegion,
        stream: I,
    ) -> DisplayResult<()>
    where
        SPI: Write<u8>,
        DC: Pin,
        CS: Pin,
        I: Iterator<Item = [u8; 3]>,
    {
        let length = packed_len(region.pixel_count());

        // Also waits for the previous transfer, it holds the bus until done.
        bus.acquire()?;

        let buffer = match self.channel.lock(|channel| channel.take_buffer()) {
            Ok(buffer) => buffer,
            Err(e) => {
                bus.release()?;
                return Err(e);
            }
        };

        if let Err(e) = Self::fill_held(bus, region, stream, buffer, length) {
            warn!("DMA frame not sent: {:?}", e);
            self.channel.lock(|channel| channel.return_buffer(buffer));
            bus.release()?;
            return Err(e);
        }

        let guard = bus.hand_off()?;
        self.channel.lock(|channel| channel.start_transfer(guard, buffer, length))
    }
}
