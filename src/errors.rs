// SPDX-License-Identifier: GPL-3.0-or-later

pub type DisplayResult<T> = Result<T, DisplayError>;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum DisplayError {
    // Bus errors
        /// The SPI peripheral reported an error. The inner error is dropped,
        /// there is nothing to recover from at this level.
        Spi,
        /// try_acquire() found the bus held by someone else.
        BusBusy,
        /// The same bus called acquire() twice without releasing.
        BusReentered,
        /// An I/O operation was issued without holding the bus.
        BusNotHeld,
        RegionOutOfBounds,

    // Frame errors
        BufferLength { expected: usize, actual: usize },
        /// The logical height is not a whole number of 8-pixel strips.
        FrameHeight,

    // DMA errors
        /// A transfer is already configured or in flight on the channel.
        TransferInFlight,
        /// The DMA frame buffer is still owned by a transfer.
        NoFrameBuffer,

    // Border errors
        BorderDoesNotFit,
}
