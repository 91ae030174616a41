// SPDX-License-Identifier: GPL-3.0-or-later

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::digital::v2::{OutputPin, StatefulOutputPin};

/// An output line driven through a shared reference.
///
/// The chip select of the panel is toggled both by the bus in thread mode and
/// by the DMA completion handler, so both need to hold it at the same time.
/// GPIO set/clear registers are write-only and atomic on the targets we
/// care about, which is what makes `&self` reasonable here.
pub trait Pin {
    fn set_high(&self);
    fn set_low(&self);
    /// Level currently driven on the line.
    fn read(&self) -> bool;
}

impl<P: Pin + ?Sized> Pin for &P {
    fn set_high(&self) { (**self).set_high() }
    fn set_low(&self) { (**self).set_low() }
    fn read(&self) -> bool { (**self).read() }
}

/// Turns any embedded-hal output into a `Pin`.
pub struct OutputAdapter<P>(Mutex<RefCell<P>>);

impl<P> OutputAdapter<P> {
    pub const fn new(output: P) -> Self {
        Self(Mutex::new(RefCell::new(output)))
    }

    pub fn free(self) -> P {
        self.0.into_inner().into_inner()
    }
}

impl<P: OutputPin + StatefulOutputPin> Pin for OutputAdapter<P> {
    // GPIO writes cannot fail on this hardware, errors are not propagated.
    fn set_high(&self) {
        critical_section::with(|cs| {
            self.0.borrow(cs).borrow_mut().set_high().ok();
        })
    }

    fn set_low(&self) {
        critical_section::with(|cs| {
            self.0.borrow(cs).borrow_mut().set_low().ok();
        })
    }

    fn read(&self) -> bool {
        critical_section::with(|cs| {
            self.0.borrow(cs).borrow().is_set_high().unwrap_or(false)
        })
    }
}
