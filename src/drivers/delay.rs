// SPDX-License-Identifier: GPL-3.0-or-later

use embedded_hal::blocking::delay::{DelayMs, DelayUs};

use crate::consts::system::CLOCK_SPEED_MHZ;

/// Busy-wait delay counted in core cycles, for the boot sequence.
pub struct AsmDelay;

impl DelayUs<u32> for AsmDelay {
    #[inline(always)]
    fn delay_us(&mut self, us: u32) {
        cortex_m::asm::delay(us * CLOCK_SPEED_MHZ);
    }
}

impl DelayMs<u16> for AsmDelay {
    fn delay_ms(&mut self, ms: u16) {
        for _ in 0..ms {
            self.delay_us(1000);
        }
    }
}
