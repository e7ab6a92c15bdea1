/// Maps the fixed logical world onto the terminal.
///
/// Each terminal cell holds two vertically stacked pixels (half-block ▀),
/// so pixels are close to square and the 16:9 world keeps its shape by
/// fitting `px_w : px_h` to `WORLD_WIDTH : WORLD_HEIGHT`. The picture is
/// centred horizontally in the space left over after the reserved rows.

use crate::sim::world::{WORLD_HEIGHT, WORLD_WIDTH};

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Viewport {
    /// Left terminal column of the picture.
    pub col: u16,
    /// Top terminal row of the picture.
    pub row: u16,
    /// Picture size in pixels.
    pub px_w: usize,
    pub px_h: usize,
    /// Pixels per logical unit.
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Viewport {
    /// Largest aspect-correct picture fitting `term_w × (term_h - reserved_rows)`
    /// cells, placed from `top_row`.
    pub fn fit(term_w: u16, term_h: u16, top_row: u16, reserved_rows: u16) -> Viewport {
        let avail_cols = term_w as usize;
        let avail_px_h = term_h.saturating_sub(reserved_rows) as usize * 2;

        let mut px_w = avail_cols;
        let mut px_h = (px_w as f32 * WORLD_HEIGHT / WORLD_WIDTH).floor() as usize;
        if px_h > avail_px_h {
            px_h = avail_px_h;
            px_w = ((px_h as f32 * WORLD_WIDTH / WORLD_HEIGHT).floor() as usize).min(avail_cols);
        }

        let col = ((avail_cols - px_w) / 2) as u16;
        Viewport {
            col,
            row: top_row,
            px_w,
            px_h,
            scale_x: px_w as f32 / WORLD_WIDTH,
            scale_y: px_h as f32 / WORLD_HEIGHT,
        }
    }

    /// Terminal rows covered (the last one may be half used).
    pub fn rows(&self) -> u16 {
        self.px_h.div_ceil(2) as u16
    }

    pub fn is_empty(&self) -> bool {
        self.px_w == 0 || self.px_h == 0
    }
}
