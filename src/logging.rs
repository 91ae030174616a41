// SPDX-License-Identifier: GPL-3.0-or-later

use log::{Metadata, Record};

use crate::consts::system::LOG_LEVEL;

/// Log lines go to the RTT up channel. When the probe does not keep up,
/// lines are dropped rather than stalling the display.
struct RttLogger;

impl log::Log for RttLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= LOG_LEVEL
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            rtt_target::rprintln!("{:<5} {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: RttLogger = RttLogger;

/// Call once, before booting the display. Later calls are ignored.
pub fn init_logging() {
    rtt_target::rtt_init_print!(NoBlockSkip, 1024);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LOG_LEVEL);
    }
}
