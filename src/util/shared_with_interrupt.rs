// SPDX-License-Identifier: GPL-3.0-or-later

use core::cell::UnsafeCell;

/// State shared between thread mode and one interrupt handler.
///
/// Thread mode goes through `lock()`, which masks interrupts for the duration
/// of the closure. The handler goes through `lock_from_interrupt()`, relying on
/// the fact that thread mode cannot preempt it.
pub struct SharedWithInterrupt<T>(UnsafeCell<T>);
impl<T> SharedWithInterrupt<T> {
    pub const fn new(v: T) -> Self {
        Self(UnsafeCell::new(v))
    }

    pub fn lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        critical_section::with(|_| {
            let mut_self = unsafe { &mut *self.0.get() };
            f(mut_self)
        })
    }

    /// # Safety
    /// Must only be called from the interrupt handler that owns the other
    /// side of this value, never re-entrantly.
    pub unsafe fn lock_from_interrupt<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut_self = &mut *self.0.get();
        f(mut_self)
    }

    pub fn into_inner(self) -> T {
        self.0.into_inner()
    }
}

unsafe impl<T: Send> Sync for SharedWithInterrupt<T> {}
unsafe impl<T: Send> Send for SharedWithInterrupt<T> {}
