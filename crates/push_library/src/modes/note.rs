use crate::lights::{Palette, Style};
use crate::scale::{GRID_SIZE, NoteGrid, Scale};

pub const MAX_OCTAVE: u8 = 4;

/// In-key note layout: the pads play the scale's grid, shifted by a user
/// octave, and light up while held.
#[derive(Debug, Clone)]
pub struct NoteMode {
    scale: Scale,
    grid: NoteGrid,
    octave: u8,
    palette: Palette,
    styles: [[Style; GRID_SIZE]; GRID_SIZE],
}

impl NoteMode {
    pub fn new(scale: Scale, palette: Palette) -> Self {
        let grid = scale.grid();
        let mut mode = Self {
            scale,
            grid,
            octave: 0,
            palette,
            styles: [[Style::OFF; GRID_SIZE]; GRID_SIZE],
        };
        mode.reset_pads();
        mode
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    pub fn grid(&self) -> &NoteGrid {
        &self.grid
    }

    /// Replaces the scale, rebuilding the grid and dropping back to octave 0.
    pub fn set_scale(&mut self, scale: Scale) {
        self.grid = scale.grid();
        self.scale = scale;
        self.octave = 0;
        self.reset_pads();
    }

    pub fn octave(&self) -> u8 {
        self.octave
    }

    pub fn set_octave(&mut self, octave: u8) {
        self.octave = octave.min(MAX_OCTAVE);
    }

    /// Returns false when already at the top.
    pub fn octave_up(&mut self) -> bool {
        if self.octave >= MAX_OCTAVE {
            return false;
        }
        self.octave += 1;
        true
    }

    pub fn octave_down(&mut self) -> bool {
        if self.octave == 0 {
            return false;
        }
        self.octave -= 1;
        true
    }

    /// MIDI note the pad plays.
    pub fn note(&self, row: usize, col: usize) -> u8 {
        (self.grid.get(row, col) + 12 * self.octave).min(127)
    }

    pub fn is_tonic(&self, row: usize, col: usize) -> bool {
        self.scale.is_tonic(self.grid.get(row, col))
    }

    pub fn reset_pads(&mut self) {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                self.styles[row][col] = self.released_style(row, col);
            }
        }
    }

    pub fn style(&self, row: usize, col: usize) -> Style {
        self.styles[row][col]
    }

    /// Restyles every pad that plays the same note as (row, col).
    pub fn press(&mut self, row: usize, col: usize, style: Style) {
        let note = self.grid.get(row, col);
        let cells: Vec<_> = self.grid.positions_of(note).collect();
        for (r, c) in cells {
            self.styles[r][c] = style;
        }
    }

    pub fn pressed_style(&self) -> Style {
        Style::solid(self.palette.green)
    }

    pub fn released_style(&self, row: usize, col: usize) -> Style {
        if self.is_tonic(row, col) {
            Style::solid(self.palette.light_blue)
        } else {
            Style::solid(self.palette.light_yellow)
        }
    }
}
