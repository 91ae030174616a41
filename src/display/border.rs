// SPDX-License-Identifier: GPL-3.0-or-later

use crate::drivers::bus::WriteRegion;
use crate::errors::{DisplayError, DisplayResult};
use crate::consts::border::*;

/// The three concentric bands of the border, from the panel edge inwards.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BorderPart {
    /// Everything between the panel edge and the outline.
    Fill,
    /// One pixel line around the window.
    Outline,
    /// One pixel band between the outline and the viewport, painted in the
    /// background color.
    Gap,
}

impl BorderPart {
    pub const ALL: [BorderPart; 3] = [BorderPart::Fill, BorderPart::Outline, BorderPart::Gap];
}

/// Border geometry around a viewport centered on the panel.
///
/// The window is the viewport grown by one pixel on each side. The outline
/// runs just outside the window, the fill covers the rest of the panel.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct BorderLayout {
    panel: (u16, u16),
    viewport: (u16, u16),
    margin_x: u16,
    margin_y: u16,
    gap_band: bool,
}

impl BorderLayout {
    pub fn new(panel: (u16, u16), viewport: (u16, u16), gap_band: bool) -> DisplayResult<Self> {
        let window = (viewport.0 + 2 * WINDOW_PADDING, viewport.1 + 2 * WINDOW_PADDING);
        // The outline must fit on both sides of the window.
        if window.0 + 2 > panel.0 || window.1 + 2 > panel.1 {
            warn!("viewport {:?} leaves no room for a border on a {:?} panel", viewport, panel);
            return Err(DisplayError::BorderDoesNotFit);
        }

        Ok(Self {
            panel,
            viewport,
            margin_x: (panel.0 - window.0) / 2,
            margin_y: (panel.1 - window.1) / 2,
            gap_band,
        })
    }

    pub fn margins(&self) -> (u16, u16) {
        (self.margin_x, self.margin_y)
    }

    pub fn has_gap_band(&self) -> bool {
        self.gap_band
    }

    /// Top left corner of the viewport.
    pub fn viewport_origin(&self) -> (u16, u16) {
        (self.margin_x + WINDOW_PADDING, self.margin_y + WINDOW_PADDING)
    }

    pub fn viewport_region(&self) -> WriteRegion {
        let (x, y) = self.viewport_origin();
        WriteRegion::new(x, y, self.viewport.0, self.viewport.1)
    }

    /// Top, bottom, left and right pieces of a band, clamped to the panel.
    /// Pieces with nothing to draw are None, and so is the whole gap band on
    /// layouts without one.
    pub fn regions(&self, part: BorderPart) -> [Option<WriteRegion>; 4] {
        let (pw, ph) = self.panel;
        let (vw, vh) = self.viewport;
        let (mx, my) = (self.margin_x, self.margin_y);

        // Right and bottom pieces hang off the viewport, an odd leftover
        // column or row goes to the fill.
        let (right, bottom) = (mx + vw + 1, my + vh + 1);

        let raw = match part {
            BorderPart::Fill => [
                WriteRegion::new(0, 0, pw, my - 1),
                WriteRegion::new(0, bottom + 2, pw, ph - (bottom + 2)),
                WriteRegion::new(0, my - 1, mx - 1, vh + 6),
                WriteRegion::new(right + 2, my - 1, pw - (right + 2), vh + 6),
            ],
            BorderPart::Outline => [
                WriteRegion::new(mx - 1, my - 1, vw + 4, 1),
                WriteRegion::new(mx - 1, bottom + 1, vw + 4, 1),
                WriteRegion::new(mx - 1, my, 1, vh + 2),
                WriteRegion::new(right + 1, my, 1, vh + 2),
            ],
            BorderPart::Gap if self.gap_band => [
                WriteRegion::new(mx, my, vw + 2, GAP_THICKNESS),
                WriteRegion::new(mx, bottom, vw + 2, GAP_THICKNESS),
                WriteRegion::new(mx, my + 1, GAP_THICKNESS, vh),
                WriteRegion::new(right, my + 1, GAP_THICKNESS, vh),
            ],
            BorderPart::Gap => return [None; 4],
        };

        raw.map(|region| region.clamp(self.panel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn present(regions: [Option<WriteRegion>; 4]) -> Vec<WriteRegion> {
        regions.into_iter().flatten().collect()
    }

    #[test]
    fn dotmg_geometry() {
        let layout = BorderLayout::new((160, 128), (128, 64), true).unwrap();
        assert_eq!(layout.margins(), (15, 31));
        assert_eq!(layout.viewport_origin(), (16, 32));

        assert_eq!(present(layout.regions(BorderPart::Fill)), [
            WriteRegion::new(0, 0, 160, 30),
            WriteRegion::new(0, 98, 160, 30),
            WriteRegion::new(0, 30, 14, 70),
            WriteRegion::new(146, 30, 14, 70),
        ]);
        assert_eq!(present(layout.regions(BorderPart::Outline)), [
            WriteRegion::new(14, 30, 132, 1),
            WriteRegion::new(14, 97, 132, 1),
            WriteRegion::new(14, 31, 1, 66),
            WriteRegion::new(145, 31, 1, 66),
        ]);
        assert_eq!(present(layout.regions(BorderPart::Gap)), [
            WriteRegion::new(15, 31, 130, 1),
            WriteRegion::new(15, 96, 130, 1),
            WriteRegion::new(15, 32, 1, 64),
            WriteRegion::new(144, 32, 1, 64),
        ]);
    }

    #[test]
    fn gap_band_surrounds_the_viewport() {
        let layout = BorderLayout::new((320, 240), (256, 128), true).unwrap();
        let viewport = layout.viewport_region();
        assert_eq!(viewport, WriteRegion::new(32, 56, 256, 128));

        let [top, bottom, left, right] = layout.regions(BorderPart::Gap).map(Option::unwrap);
        assert_eq!(top.y + 1, viewport.y);
        assert_eq!(bottom.y, viewport.y + viewport.height);
        assert_eq!(left.x + 1, viewport.x);
        assert_eq!(right.x, viewport.x + viewport.width);
    }

    #[test]
    fn odd_leftover_keeps_the_bands_around_the_viewport() {
        let panel = (161, 129);
        let layout = BorderLayout::new(panel, (128, 64), true).unwrap();
        let viewport = layout.viewport_region();

        let [top, bottom, left, right] = layout.regions(BorderPart::Gap).map(Option::unwrap);
        assert_eq!(top.y + 1, viewport.y);
        assert_eq!(bottom.y, viewport.y + viewport.height);
        assert_eq!(left.x + 1, viewport.x);
        assert_eq!(right.x, viewport.x + viewport.width);

        let [top, _, _, right] = layout.regions(BorderPart::Outline).map(Option::unwrap);
        assert_eq!(top.x + top.width - 1, right.x);

        // Bands and viewport leave no pixel unpainted.
        let mut painted = vec![false; panel.0 as usize * panel.1 as usize];
        let regions = BorderPart::ALL.iter()
            .flat_map(|&part| present(layout.regions(part)))
            .chain(core::iter::once(viewport));
        for region in regions {
            assert!(region.fits(panel), "{:?}", region);
            for y in region.y..region.y + region.height {
                for x in region.x..region.x + region.width {
                    painted[y as usize * panel.0 as usize + x as usize] = true;
                }
            }
        }
        assert_eq!(painted.iter().position(|&p| !p), None);
    }

    #[test]
    fn no_gap_band_means_no_gap_regions() {
        let layout = BorderLayout::new((160, 128), (128, 64), false).unwrap();
        assert!(present(layout.regions(BorderPart::Gap)).is_empty());
        assert_eq!(present(layout.regions(BorderPart::Outline)).len(), 4);
    }

    #[test]
    fn tight_panel_skips_empty_fill() {
        // Margins of 1: the outline touches the panel edge, no fill left.
        let layout = BorderLayout::new((132, 68), (128, 64), true).unwrap();
        assert_eq!(layout.margins(), (1, 1));
        assert!(present(layout.regions(BorderPart::Fill)).is_empty());
        for region in present(layout.regions(BorderPart::Outline)) {
            assert!(region.fits((132, 68)), "{:?}", region);
        }
    }

    #[test]
    fn viewport_too_large_is_rejected() {
        assert_eq!(BorderLayout::new((130, 128), (128, 64), true), Err(DisplayError::BorderDoesNotFit));
        assert_eq!(BorderLayout::new((160, 66), (128, 64), false), Err(DisplayError::BorderDoesNotFit));
    }
}
