// SPDX-License-Identifier: GPL-3.0-or-later

#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate log;

pub mod consts;
pub mod errors;
pub mod drivers;
pub mod display;
pub mod util;

#[cfg(target_os = "none")]
pub mod logging;

#[cfg(test)]
mod testing;

pub use errors::{DisplayError, DisplayResult};
pub use display::{
    Display, DisplayConfig, DisplayState, InvertMode, LedChannel,
    color::{Color12, Theme, pack_pair},
    sink::{Blocking, DmaSink, FrameSink},
};
pub use drivers::{
    buttons::{ButtonState, Buttons},
    bus::{BusGuard, BusLock, TransportBus, WriteRegion},
    dma::{ChannelState, DmaChannel, DmaEngine, TransferDescriptor},
};
pub use util::{Pin, SharedWithInterrupt, OutputAdapter};
