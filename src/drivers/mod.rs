// SPDX-License-Identifier: GPL-3.0-or-later

pub mod st7735;
pub mod bus;
pub mod dma;
pub mod buttons;

#[cfg(target_os = "none")]
mod delay;
#[cfg(target_os = "none")]
pub use delay::*;
