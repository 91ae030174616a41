// SPDX-License-Identifier: GPL-3.0-or-later

use bitflags::bitflags;
use embedded_hal::digital::v2::InputPin;

bitflags! {
    #[derive(Default)]
    pub struct ButtonState: u8 {
        const A      = 1 << 0;
        const B      = 1 << 1;
        const UP     = 1 << 2;
        const DOWN   = 1 << 3;
        const LEFT   = 1 << 4;
        const RIGHT  = 1 << 5;
        const START  = 1 << 6;
        const SELECT = 1 << 7;
    }
}

/// The eight console buttons. Pins are pulled up, a pressed button reads low.
pub struct Buttons<P> {
    pins: [(P, ButtonState); 8],
}

impl<P: InputPin> Buttons<P> {
    pub fn new(a: P, b: P, up: P, down: P, left: P, right: P, start: P, select: P) -> Self {
        Self {
            pins: [
                (a, ButtonState::A),
                (b, ButtonState::B),
                (up, ButtonState::UP),
                (down, ButtonState::DOWN),
                (left, ButtonState::LEFT),
                (right, ButtonState::RIGHT),
                (start, ButtonState::START),
                (select, ButtonState::SELECT),
            ],
        }
    }

    /// A pin that cannot be read counts as released.
    pub fn state(&self) -> ButtonState {
        self.pins.iter()
            .filter(|(pin, _)| pin.is_low().unwrap_or(false))
            .fold(ButtonState::empty(), |state, (_, button)| state | *button)
    }
}
