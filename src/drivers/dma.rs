// SPDX-License-Identifier: GPL-3.0-or-later

use core::future::Future;
use core::task::{Context, Poll};

use futures::task::AtomicWaker;

use crate::errors::{DisplayError, DisplayResult};
use crate::util::{Pin, SharedWithInterrupt};
use super::bus::BusGuard;

/// The DMA controller channel, as seen by this driver.
pub trait DmaEngine {
    fn is_enabled(&self) -> bool;
    fn configure(&mut self, descriptor: &TransferDescriptor);
    fn enable_completion_interrupt(&mut self);
    fn enable(&mut self);
    fn disable(&mut self);
    /// Acknowledges the transfer-complete interrupt.
    fn clear_pending(&mut self);
}

/// Block transfer description handed to the DMA controller.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TransferDescriptor {
    pub source: *const u8,
    pub length: usize,
    /// Peripheral register receiving the bytes.
    pub destination: u32,
    pub increment_source: bool,
}

// The source pointer is only dereferenced by the DMA controller, and the
// memory it points to is owned by the channel while the descriptor exists.
unsafe impl Send for TransferDescriptor {}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ChannelState {
    Idle,
    Configuring,
    InFlight,
    CompletingIrq,
}

struct InFlight<'a> {
    buffer: &'a mut [u8],
    guard: BusGuard<'a>,
}

/// One DMA channel streaming a frame buffer to the panel.
///
/// The channel owns the frame buffer. While a transfer is in flight, it also
/// owns the bus guard. The completion handler gives the buffer back and
/// releases the bus, exactly once per transfer.
pub struct DmaChannel<'a, E, CS> {
    engine: E,
    cs: CS,
    destination: u32,
    state: ChannelState,
    descriptor: Option<TransferDescriptor>,
    in_flight: Option<InFlight<'a>>,
    buffer: Option<&'a mut [u8]>,
    waker: AtomicWaker,
}

impl<'a, E: DmaEngine, CS: Pin> DmaChannel<'a, E, CS> {
    pub fn new(engine: E, cs: CS, destination: u32, buffer: &'a mut [u8]) -> Self {
        Self {
            engine,
            cs,
            destination,
            state: ChannelState::Idle,
            descriptor: None,
            in_flight: None,
            buffer: Some(buffer),
            waker: AtomicWaker::new(),
        }
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == ChannelState::Idle
    }

    pub fn descriptor(&self) -> Option<&TransferDescriptor> {
        self.descriptor.as_ref()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The frame buffer, unless a transfer owns it.
    pub fn take_buffer(&mut self) -> DisplayResult<&'a mut [u8]> {
        self.buffer.take().ok_or(DisplayError::NoFrameBuffer)
    }

    /// Puts back a buffer that was taken but not transferred. Ignored if the
    /// channel already has one.
    pub fn return_buffer(&mut self, buffer: &'a mut [u8]) {
        if self.buffer.is_none() {
            self.buffer = Some(buffer);
        }
    }

    /// Streams `buffer[..length]` to the panel.
    ///
    /// The bus guard proves the caller holds the bus and moves into the
    /// channel. Returns as soon as the transfer is started, the bus stays
    /// held until `on_interrupt()` runs.
    pub fn start_transfer(&mut self, guard: BusGuard<'a>, buffer: &'a mut [u8], length: usize) -> DisplayResult<()> {
        let error = if self.state != ChannelState::Idle || self.engine.is_enabled() {
            Some(DisplayError::TransferInFlight)
        } else if length > buffer.len() {
            Some(DisplayError::BufferLength { expected: length, actual: buffer.len() })
        } else {
            None
        };

        if let Some(error) = error {
            warn!("DMA transfer rejected: {:?}", error);
            // Rejected transfers end the caller's bus session and keep the
            // buffer around. The panel stays selected for a transfer in flight.
            if self.in_flight.is_none() {
                self.cs.set_high();
            }
            guard.release();
            self.return_buffer(buffer);
            return Err(error);
        }

        self.state = ChannelState::Configuring;
        let descriptor = TransferDescriptor {
            source: buffer.as_ptr(),
            length,
            destination: self.destination,
            increment_source: true,
        };
        self.engine.configure(&descriptor);
        self.engine.enable_completion_interrupt();
        self.descriptor = Some(descriptor);
        self.in_flight = Some(InFlight { buffer, guard });

        trace!("DMA transfer of {} bytes started", length);
        self.state = ChannelState::InFlight;
        self.engine.enable();
        Ok(())
    }

    /// Transfer-complete handler. Returns false on a spurious interrupt, in
    /// which case nothing is released.
    pub fn on_interrupt(&mut self) -> bool {
        let in_flight = match (self.state, self.in_flight.take()) {
            (ChannelState::InFlight, Some(in_flight)) => in_flight,
            (_, in_flight) => {
                self.in_flight = in_flight;
                self.engine.clear_pending();
                return false;
            }
        };

        self.state = ChannelState::CompletingIrq;
        self.engine.disable();
        self.descriptor = None;
        self.buffer = Some(in_flight.buffer);

        self.cs.set_high();
        in_flight.guard.release();
        self.engine.clear_pending();

        self.state = ChannelState::Idle;
        self.waker.wake();
        true
    }

    /// Resolves once the channel is idle again.
    pub fn wait_idle<'s>(shared: &'s SharedWithInterrupt<Self>) -> WaitIdle<'s, 'a, E, CS> {
        WaitIdle { shared }
    }
}

pub struct WaitIdle<'s, 'a, E, CS> {
    shared: &'s SharedWithInterrupt<DmaChannel<'a, E, CS>>,
}

impl<'s, 'a, E: DmaEngine, CS: Pin> Future for WaitIdle<'s, 'a, E, CS> {
    type Output = ();

    fn poll(self: core::pin::Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        self.shared.lock(|channel| {
            if channel.is_idle() {
                Poll::Ready(())
            } else {
                channel.waker.register(cx.waker());
                Poll::Pending
            }
        })
    }
}
