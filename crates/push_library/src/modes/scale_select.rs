use crate::errors::ScaleError;
use crate::lights::{Palette, Style};
use crate::scale::{GRID_SIZE, Mode, Scale, pitch_class};

const SHARP_ROW: usize = 2;
const NATURAL_ROW: usize = 3;
const MODE_ROW: usize = 4;

const NATURALS: [&str; 7] = ["C", "D", "E", "F", "G", "A", "B"];
const SHARPS: [(usize, &str); 5] = [(1, "C#"), (2, "D#"), (4, "F#"), (5, "G#"), (6, "A#")];

/// Presets reachable from the mode row, in pad order.
pub const MODE_PADS: usize = 4;

/// Page for picking the tonic and mode of the note layout.
///
/// ```text
/// row 2:    C# D#    F# G# A#
/// row 3: C  D  E  F  G  A  B
/// row 4: major minor dorian mixolydian
/// ```
#[derive(Debug, Clone)]
pub struct ScaleSelect {
    tonic: String,
    mode: Mode,
    palette: Palette,
    styles: [[Style; GRID_SIZE]; GRID_SIZE],
}

impl ScaleSelect {
    pub fn new(scale: &Scale, palette: Palette) -> Self {
        let mut select = Self {
            tonic: scale.tonic().to_string(),
            mode: scale.mode().clone(),
            palette,
            styles: [[Style::OFF; GRID_SIZE]; GRID_SIZE],
        };
        select.reset_pads();
        select
    }

    pub fn tonic(&self) -> &str {
        &self.tonic
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// The scale currently selected on the page.
    pub fn scale(&self) -> Result<Scale, ScaleError> {
        Scale::new(&self.tonic, self.mode.clone())
    }

    /// Updates the selection. Pads outside the three selection rows do
    /// nothing; returns whether the selection changed.
    pub fn press(&mut self, row: usize, col: usize) -> bool {
        let tonic = match row {
            SHARP_ROW => SHARPS.iter().find(|(c, _)| *c == col).map(|(_, n)| *n),
            NATURAL_ROW => NATURALS.get(col).copied(),
            _ => None,
        };
        let mode = match row {
            MODE_ROW if col < MODE_PADS => Mode::preset(col),
            _ => None,
        };

        let changed = match (tonic, mode) {
            (Some(tonic), _) if tonic != self.tonic => {
                self.tonic = tonic.to_string();
                true
            }
            (_, Some(mode)) if mode != self.mode => {
                self.mode = mode;
                true
            }
            _ => false,
        };
        self.reset_pads();
        changed
    }

    pub fn reset_pads(&mut self) {
        let palette = self.palette;
        self.styles = [[Style::OFF; GRID_SIZE]; GRID_SIZE];

        // in-key indicator
        self.styles[0][GRID_SIZE - 1] = Style::solid(palette.green);

        let selected = pitch_class(&self.tonic);
        for &(col, name) in &SHARPS {
            self.styles[SHARP_ROW][col] = if pitch_class(name) == selected {
                Style::solid(palette.red)
            } else {
                Style::solid(palette.light_yellow)
            };
        }
        for (col, name) in NATURALS.iter().enumerate() {
            self.styles[NATURAL_ROW][col] = if pitch_class(name) == selected {
                Style::solid(palette.red)
            } else {
                Style::solid(palette.blue)
            };
        }

        let mode = self.mode.preset_index();
        for col in 0..MODE_PADS {
            self.styles[MODE_ROW][col] = if mode == Some(col) {
                Style::solid(palette.dark_green)
            } else {
                Style::solid(palette.light_orange)
            };
        }
    }

    pub fn style(&self, row: usize, col: usize) -> Style {
        self.styles[row][col]
    }
}
