use crate::lights::{Palette, Style};
use crate::scale::GRID_SIZE;

/// Rows above this one are unused.
const FIRST_ROW: usize = 4;
const BLOCK_WIDTH: usize = 4;

/// Slice player layout: the bottom 32 pads trigger up to 32 slices, the
/// left 4x4 block the first 16 and the right block the rest.
#[derive(Debug, Clone)]
pub struct SegmentsMode {
    palette: Palette,
    styles: [[Style; GRID_SIZE]; GRID_SIZE],
}

impl SegmentsMode {
    pub fn new(palette: Palette) -> Self {
        let mut mode = Self {
            palette,
            styles: [[Style::OFF; GRID_SIZE]; GRID_SIZE],
        };
        mode.reset_pads();
        mode
    }

    /// Slice note for the pad, `None` for the unused top half.
    pub fn note(&self, row: usize, col: usize) -> Option<u8> {
        if row < FIRST_ROW || row >= GRID_SIZE || col >= GRID_SIZE {
            return None;
        }
        let base = if col < BLOCK_WIDTH { 60 } else { 68 };
        Some((base + col + BLOCK_WIDTH * (GRID_SIZE - 1 - row)) as u8)
    }

    pub fn reset_pads(&mut self) {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                self.styles[row][col] = if row < FIRST_ROW {
                    Style::OFF
                } else {
                    self.released_style(row, col)
                };
            }
        }
    }

    pub fn style(&self, row: usize, col: usize) -> Style {
        self.styles[row][col]
    }

    pub fn press(&mut self, row: usize, col: usize, style: Style) {
        self.styles[row][col] = style;
    }

    pub fn pressed_style(&self) -> Style {
        Style::solid(self.palette.green)
    }

    pub fn released_style(&self, _row: usize, col: usize) -> Style {
        if col < BLOCK_WIDTH {
            Style::solid(self.palette.light_yellow)
        } else {
            Style::solid(self.palette.orange)
        }
    }
}
