// SPDX-License-Identifier: GPL-3.0-or-later

// Recording doubles for the hardware the driver talks to.

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::blocking::spi::Write;
use embedded_hal::digital::v2::InputPin;

use crate::drivers::bus::{BusLock, TransportBus, WriteRegion};
use crate::drivers::dma::{DmaEngine, TransferDescriptor};
use crate::util::Pin;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PinId {
    Cs,
    Dc,
    Rst,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Event {
    Pin(PinId, bool),
    Byte(u8),
    DelayMs(u16),
}

/// A command byte and the data bytes that followed it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Transaction {
    pub cmd: u8,
    pub data: Vec<u8>,
}

impl Transaction {
    pub fn new(cmd: u8, data: &[u8]) -> Self {
        Self { cmd, data: data.to_vec() }
    }
}

#[derive(Default)]
struct Records {
    events: Vec<Event>,
    spi_writes: Vec<usize>,
    spi_failing: bool,
}

/// Everything the mocks saw, in order. Clones share the same record.
#[derive(Clone, Default)]
pub struct Log(Arc<Mutex<Records>>);

impl Log {
    fn records(&self) -> std::sync::MutexGuard<'_, Records> {
        self.0.lock().unwrap()
    }

    pub fn push(&self, event: Event) {
        self.records().events.push(event);
    }

    pub fn clear(&self) {
        let mut records = self.records();
        records.events.clear();
        records.spi_writes.clear();
    }

    /// Makes every following SPI write fail, or succeed again.
    pub fn set_spi_failing(&self, failing: bool) {
        self.records().spi_failing = failing;
    }

    pub fn events(&self) -> Vec<Event> {
        self.records().events.clone()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.events().into_iter()
            .filter_map(|e| match e {
                Event::Byte(b) => Some(b),
                _ => None,
            })
            .collect()
    }

    /// Length of each SPI write call.
    pub fn spi_writes(&self) -> Vec<usize> {
        self.records().spi_writes.clone()
    }

    pub fn delays(&self) -> Vec<u16> {
        self.events().into_iter()
            .filter_map(|e| match e {
                Event::DelayMs(ms) => Some(ms),
                _ => None,
            })
            .collect()
    }

    /// Last level driven on a pin.
    pub fn pin_level(&self, id: PinId) -> Option<bool> {
        self.events().into_iter().rev().find_map(|e| match e {
            Event::Pin(pin, level) if pin == id => Some(level),
            _ => None,
        })
    }

    /// Bytes grouped by the DC line: a byte sent with DC low opens a
    /// transaction, bytes sent with DC high are its data.
    pub fn transactions(&self) -> Vec<Transaction> {
        let mut dc = true;
        let mut transactions: Vec<Transaction> = Vec::new();
        for event in self.events() {
            match event {
                Event::Pin(PinId::Dc, level) => dc = level,
                Event::Byte(b) if !dc => transactions.push(Transaction::new(b, &[])),
                Event::Byte(b) => {
                    if let Some(last) = transactions.last_mut() {
                        last.data.push(b);
                    }
                }
                _ => {}
            }
        }
        transactions
    }

    pub fn commands(&self) -> Vec<u8> {
        self.transactions().into_iter().map(|t| t.cmd).collect()
    }

    /// Every RAMWR with the region set up before it.
    pub fn writes(&self) -> Vec<(WriteRegion, Vec<u8>)> {
        fn span(data: &[u8]) -> (u16, u16) {
            let start = u16::from_be_bytes([data[0], data[1]]);
            let end = u16::from_be_bytes([data[2], data[3]]);
            (start, end - start + 1)
        }

        let (mut columns, mut rows) = ((0, 0), (0, 0));
        let mut writes = Vec::new();
        for t in self.transactions() {
            match t.cmd {
                0x2A => columns = span(&t.data),
                0x2B => rows = span(&t.data),
                0x2C => writes.push((WriteRegion::new(columns.0, rows.0, columns.1, rows.1), t.data)),
                _ => {}
            }
        }
        writes
    }

    /// Regions written, with the single color each was filled with.
    pub fn fills(&self) -> Vec<(WriteRegion, u16)> {
        self.writes().into_iter()
            .map(|(region, data)| {
                let color = ((data[0] as u16) << 4) | (data[1] as u16 >> 4);
                (region, color)
            })
            .collect()
    }
}

pub struct MockPin {
    id: PinId,
    level: AtomicBool,
    log: Log,
}

impl MockPin {
    pub fn new(id: PinId, log: &Log) -> Self {
        Self { id, level: AtomicBool::new(false), log: log.clone() }
    }

    pub fn level(&self) -> bool {
        self.level.load(Ordering::SeqCst)
    }

    fn drive(&self, level: bool) {
        self.level.store(level, Ordering::SeqCst);
        self.log.push(Event::Pin(self.id, level));
    }
}

impl Pin for MockPin {
    fn set_high(&self) { self.drive(true) }
    fn set_low(&self) { self.drive(false) }
    fn read(&self) -> bool { self.level() }
}

pub struct MockSpi {
    log: Log,
}

impl MockSpi {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl Write<u8> for MockSpi {
    type Error = ();

    fn write(&mut self, words: &[u8]) -> Result<(), ()> {
        let mut records = self.log.records();
        if records.spi_failing {
            return Err(());
        }
        records.spi_writes.push(words.len());
        records.events.extend(words.iter().map(|&b| Event::Byte(b)));
        Ok(())
    }
}

pub type MockBus<'a> = TransportBus<'a, MockSpi, MockPin, MockPin>;

pub fn mock_bus<'a>(log: &Log, lock: &'a BusLock, width: u16, height: u16) -> MockBus<'a> {
    TransportBus::new(
        MockSpi::new(log),
        MockPin::new(PinId::Dc, log),
        MockPin::new(PinId::Cs, log),
        lock,
        width,
        height,
    )
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DmaCall {
    Configure,
    EnableInterrupt,
    Enable,
    Disable,
    ClearPending,
}

#[derive(Default)]
pub struct MockDma {
    pub enabled: bool,
    pub calls: Vec<DmaCall>,
    pub descriptor: Option<TransferDescriptor>,
}

impl DmaEngine for MockDma {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn configure(&mut self, descriptor: &TransferDescriptor) {
        self.descriptor = Some(*descriptor);
        self.calls.push(DmaCall::Configure);
    }

    fn enable_completion_interrupt(&mut self) {
        self.calls.push(DmaCall::EnableInterrupt);
    }

    fn enable(&mut self) {
        self.enabled = true;
        self.calls.push(DmaCall::Enable);
    }

    fn disable(&mut self) {
        self.enabled = false;
        self.calls.push(DmaCall::Disable);
    }

    fn clear_pending(&mut self) {
        self.calls.push(DmaCall::ClearPending);
    }
}

pub struct NoDelay;

impl DelayUs<u32> for NoDelay {
    fn delay_us(&mut self, _us: u32) {}
}

impl DelayMs<u16> for NoDelay {
    fn delay_ms(&mut self, _ms: u16) {}
}

/// Writes each delay in the log, without waiting.
pub struct LoggedDelay(pub Log);

impl DelayMs<u16> for LoggedDelay {
    fn delay_ms(&mut self, ms: u16) {
        self.0.push(Event::DelayMs(ms));
    }
}

/// A GPIO line driven by the test and read by the code under test. Clones
/// are the same wire.
#[derive(Clone, Default)]
pub struct Wire(Arc<AtomicBool>);

impl Wire {
    pub fn high() -> Self {
        let wire = Self::default();
        wire.drive(true);
        wire
    }

    pub fn drive(&self, level: bool) {
        self.0.store(level, Ordering::SeqCst);
    }

    pub fn level(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl InputPin for Wire {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        Ok(self.level())
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        Ok(!self.level())
    }
}
