// SPDX-License-Identifier: GPL-3.0-or-later

pub mod system {
    use log::LevelFilter;

    pub const CLOCK_SPEED_MHZ: u32 = 48;

    // RTT logger threshold. Release builds compile logging out regardless.
    pub const LOG_LEVEL: LevelFilter = LevelFilter::Debug;
}

pub mod display {
    // Logical game viewport, 1 bit per pixel.
    pub const WIDTH: u16 = 128;
    pub const HEIGHT: u16 = 64;

    // ST7735R module, landscape.
    pub const PANEL_WIDTH: u16 = 160;
    pub const PANEL_HEIGHT: u16 = 128;

    // SERCOM1 DATA register, where the DMA writes the pixel stream.
    pub const SPI_DATA_REGISTER: u32 = 0x4200_0828;

    // Bytes pushed to the SPI per write call when streaming a frame
    // synchronously. One 12-bit row of the widest supported viewport.
    pub const LINE_BUFFER_LEN: usize = 480;

    // Frame control 1: Rate = fosc/(1x2+40) * (LINE+2C+2D)
    pub const FRMCTR1_ARGS: [u8; 3] = [0x01, 0x2C, 0x2D];

    pub const GAMMA_POSITIVE: [u8; 16] = [
        0x02, 0x1c, 0x07, 0x12, 0x37, 0x32, 0x29, 0x2D,
        0x29, 0x25, 0x2B, 0x39, 0x00, 0x01, 0x03, 0x10,
    ];
    pub const GAMMA_NEGATIVE: [u8; 16] = [
        0x03, 0x1D, 0x07, 0x06, 0x2E, 0x2C, 0x29, 0x2D,
        0x2E, 0x2E, 0x37, 0x3F, 0x00, 0x00, 0x02, 0x10,
    ];

    // Delays of the boot sequence, in ms.
    pub const RESET_DELAY_MS: u16 = 5;
    pub const SWRESET_DELAY_MS: u16 = 150;
    pub const SLPOUT_BOOT_DELAY_MS: u16 = 500;
    pub const SLEEP_TOGGLE_DELAY_MS: u16 = 150;
    pub const DISPON_DELAY_MS: u16 = 100;
}

pub mod border {
    // The outline sits one pixel outside a window that is itself one pixel
    // wider than the viewport on each side.
    pub const WINDOW_PADDING: u16 = 1;
    pub const GAP_THICKNESS: u16 = 1;
}

pub mod led_bar {
    pub const HEIGHT: u16 = 4;
}
