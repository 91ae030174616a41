// SPDX-License-Identifier: GPL-3.0-or-later

mod shared_with_interrupt;
pub use shared_with_interrupt::*;

mod pin;
pub use pin::*;
