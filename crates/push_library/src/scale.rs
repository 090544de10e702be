//! Scales built from a tonic and a mode, and the in-key pad layout derived
//! from them.
//!
//! A mode is a string of steps: `m` is a half tone, `M` a whole tone and `A`
//! a minor third. The scale is found by walking the chromatic sequence from
//! the tonic, one step at a time.

use std::fmt;
use std::str::FromStr;

use crate::errors::ScaleError;

pub const GRID_SIZE: usize = 8;

/// Rows are laid out in fourths: each row starts three scale steps above the
/// one below it.
const ROW_STRIDE: usize = 3;
/// Rows (counting down from the bottom row 7) after which the base octave
/// goes up. Tuned for the fourths layout, not derived from it.
const OCTAVE_ROWS: [usize; 2] = [5, 3];

/// Heptatonic and pentatonic.
const MODE_LENGTHS: [usize; 2] = [7, 5];

const CHROMATIC_C: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Tonics spelled with flats. Lowercase entries are minor keys.
const FLAT_TONICS: [&str; 12] = [
    "F", "Bb", "Eb", "Ab", "Db", "Gb", "d", "g", "c", "f", "bb", "eb",
];

const PITCH_CLASSES: [(&str, u8); 17] = [
    ("C", 0),
    ("C#", 1),
    ("DB", 1),
    ("D", 2),
    ("D#", 3),
    ("EB", 3),
    ("E", 4),
    ("F", 5),
    ("F#", 6),
    ("GB", 6),
    ("G", 7),
    ("G#", 8),
    ("AB", 8),
    ("A", 9),
    ("A#", 10),
    ("BB", 10),
    ("B", 11),
];

/// Pitch class (0-11) of a note name, in either spelling, any case.
pub fn pitch_class(note: &str) -> Option<u8> {
    let key = note.to_ascii_uppercase();
    PITCH_CLASSES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, pc)| *pc)
}

/// MIDI number of `note` in `octave`. Notes below the `offset` pitch class
/// belong to the next octave, so a scale's notes come out ascending from its
/// tonic. `None` past the top of the `u8` range.
pub fn note_to_midi(note: &str, octave: u8, offset: u8) -> Option<u8> {
    let pc = pitch_class(note)?;
    let octave = if pc < offset { octave.checked_add(1)? } else { octave };
    octave.checked_mul(12)?.checked_add(pc)
}

/// Upper-cases the first letter: "bb" becomes "Bb".
pub fn normalize_tonic(tonic: &str) -> String {
    let mut chars = tonic.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

pub fn prefers_flats(tonic: &str) -> bool {
    FLAT_TONICS.contains(&tonic)
}

/// Respells every sharp as the flat of the next letter.
pub fn flatten<S: AsRef<str>>(sequence: &[S]) -> Vec<String> {
    sequence
        .iter()
        .map(|note| {
            let note = note.as_ref();
            if note == "G#" {
                return "Ab".to_string();
            }
            match note.strip_suffix('#').and_then(|n| n.chars().next()) {
                Some(letter) => format!("{}b", (letter as u8 + 1) as char),
                None => note.to_string(),
            }
        })
        .collect()
}

/// Rotates `sequence` so that `tonic` comes first.
pub fn reorder<S: AsRef<str>>(sequence: &[S], tonic: &str) -> Result<Vec<String>, ScaleError> {
    let tonic = normalize_tonic(tonic);
    let position = sequence.iter().position(|n| n.as_ref() == tonic);
    let Some(position) = position else {
        return Err(ScaleError::InvalidTonic {
            tonic,
            sequence: sequence.iter().map(|n| n.as_ref().to_string()).collect(),
        });
    };
    let mut rotated: Vec<String> = sequence.iter().map(|n| n.as_ref().to_string()).collect();
    rotated.rotate_left(position);
    Ok(rotated)
}

/// The twelve note names from `tonic` upwards, spelled as the key prefers.
pub fn chromatic(tonic: &str) -> Result<Vec<String>, ScaleError> {
    if prefers_flats(tonic) {
        reorder(&flatten(&CHROMATIC_C), tonic)
    } else {
        reorder(&CHROMATIC_C, tonic)
    }
}

/// Walks `intervals` up from `tonic`, returning one octave of note names
/// starting on the tonic.
pub fn interval(tonic: &str, intervals: &str) -> Result<Vec<String>, ScaleError> {
    let mut sequence = chromatic(tonic)?;
    let mut picks = Vec::with_capacity(intervals.len() + 1);
    picks.push(normalize_tonic(tonic));
    for symbol in intervals.chars() {
        let step = Step::from_symbol(symbol)?;
        let pick = sequence[step.semitones()].clone();
        sequence = reorder(&sequence, &pick)?;
        picks.push(pick);
    }
    // the last step lands on the tonic again
    if picks.len() > 1 {
        picks.pop();
    }
    Ok(picks)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    Half,
    Whole,
    MinorThird,
}

impl Step {
    pub fn from_symbol(symbol: char) -> Result<Step, ScaleError> {
        match symbol {
            'm' => Ok(Step::Half),
            'M' => Ok(Step::Whole),
            'A' => Ok(Step::MinorThird),
            other => Err(ScaleError::UnknownIntervalSymbol(other)),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Step::Half => 'm',
            Step::Whole => 'M',
            Step::MinorThird => 'A',
        }
    }

    pub fn semitones(self) -> usize {
        match self {
            Step::Half => 1,
            Step::Whole => 2,
            Step::MinorThird => 3,
        }
    }
}

/// A validated interval pattern of seven or five steps spanning exactly one
/// octave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mode {
    steps: Vec<Step>,
}

impl Mode {
    pub const MAJOR: &'static str = "MMmMMMm";
    pub const MINOR: &'static str = "MmMMmMM";
    pub const DORIAN: &'static str = "MmMMMmM";
    pub const MIXOLYDIAN: &'static str = "MMmMMmM";
    pub const MAJOR_PENTATONIC: &'static str = "MMAMA";
    pub const MINOR_PENTATONIC: &'static str = "AMMAM";

    /// Named modes. The first four, in order, are the scale page's mode pads.
    pub const PRESETS: [(&'static str, &'static str); 6] = [
        ("major", Mode::MAJOR),
        ("minor", Mode::MINOR),
        ("dorian", Mode::DORIAN),
        ("mixolydian", Mode::MIXOLYDIAN),
        ("major_pentatonic", Mode::MAJOR_PENTATONIC),
        ("minor_pentatonic", Mode::MINOR_PENTATONIC),
    ];

    pub fn from_intervals(intervals: &str) -> Result<Mode, ScaleError> {
        let steps = intervals
            .chars()
            .map(Step::from_symbol)
            .collect::<Result<Vec<_>, _>>()?;
        let semitones: usize = steps.iter().map(|s| s.semitones()).sum();
        if semitones != 12 {
            return Err(ScaleError::OpenMode {
                mode: intervals.to_string(),
                semitones: semitones as u32,
            });
        }
        if !MODE_LENGTHS.contains(&steps.len()) {
            return Err(ScaleError::UnsupportedLength {
                mode: intervals.to_string(),
                steps: steps.len(),
            });
        }
        Ok(Mode { steps })
    }

    pub fn preset(index: usize) -> Option<Mode> {
        let (_, intervals) = Mode::PRESETS.get(index)?;
        Mode::from_intervals(intervals).ok()
    }

    /// Index of this mode in [`Mode::PRESETS`].
    pub fn preset_index(&self) -> Option<usize> {
        let intervals = self.intervals();
        Mode::PRESETS.iter().position(|(_, i)| *i == intervals)
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether the in-key grid layout supports this mode.
    pub fn fits_grid(&self) -> bool {
        self.steps.len() == 7
    }

    pub fn intervals(&self) -> String {
        self.steps.iter().map(|s| s.symbol()).collect()
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode {
            steps: vec![
                Step::Whole,
                Step::Whole,
                Step::Half,
                Step::Whole,
                Step::Whole,
                Step::Whole,
                Step::Half,
            ],
        }
    }
}

impl FromStr for Mode {
    type Err = ScaleError;

    /// Accepts a preset name ("dorian") or an interval string ("MmMMMmM").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        if let Some((_, intervals)) = Mode::PRESETS.iter().find(|(n, _)| *n == name) {
            return Mode::from_intervals(intervals);
        }
        match Mode::from_intervals(s.trim()) {
            Err(ScaleError::UnknownIntervalSymbol(_)) => Err(ScaleError::UnknownMode(s.to_string())),
            other => other,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let intervals = self.intervals();
        match Mode::PRESETS.iter().find(|(_, i)| *i == intervals) {
            Some((name, _)) => write!(f, "{name}"),
            None => write!(f, "{intervals}"),
        }
    }
}

/// Pitch for every pad, `cells[row][col]` with row 0 at the top.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NoteGrid {
    cells: [[u8; GRID_SIZE]; GRID_SIZE],
}

impl NoteGrid {
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[row][col]
    }

    pub fn rows(&self) -> &[[u8; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }

    /// Every cell holding `note`.
    pub fn positions_of(&self, note: u8) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..GRID_SIZE)
            .flat_map(|row| (0..GRID_SIZE).map(move |col| (row, col)))
            .filter(move |&(row, col)| self.cells[row][col] == note)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scale {
    tonic: String,
    mode: Mode,
    notes: Vec<String>,
    pitches: Vec<u8>,
    tonic_pitch_class: u8,
}

impl Scale {
    pub fn new(tonic: &str, mode: Mode) -> Result<Scale, ScaleError> {
        let notes = interval(tonic, &mode.intervals())?;
        let normalized = normalize_tonic(tonic);
        let invalid = || ScaleError::InvalidTonic {
            tonic: normalized.clone(),
            sequence: CHROMATIC_C.iter().map(|n| n.to_string()).collect(),
        };
        let tonic_pitch_class = pitch_class(&normalized).ok_or_else(invalid)?;
        let pitches = notes
            .iter()
            .map(|n| note_to_midi(n, 0, tonic_pitch_class).ok_or_else(invalid))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Scale {
            tonic: normalized,
            mode,
            notes,
            pitches,
            tonic_pitch_class,
        })
    }

    pub fn tonic(&self) -> &str {
        &self.tonic
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    /// The scale's notes as MIDI numbers in octave 0, ascending from the tonic.
    pub fn pitches(&self) -> &[u8] {
        &self.pitches
    }

    pub fn tonic_pitch_class(&self) -> u8 {
        self.tonic_pitch_class
    }

    pub fn is_tonic(&self, pitch: u8) -> bool {
        pitch % 12 == self.tonic_pitch_class
    }

    /// The in-key layout: scale tones along each row, rows a fourth apart,
    /// built from the bottom row up.
    ///
    /// The octave rows are fixed for seven-note modes. Pentatonic modes get a
    /// grid, but its columns do not ascend.
    pub fn grid(&self) -> NoteGrid {
        let notes = &self.pitches;
        let count = notes.len();
        let mut cells = [[0u8; GRID_SIZE]; GRID_SIZE];
        let mut start = 0;
        let mut octave = 0u8;

        for row in (0..GRID_SIZE).rev() {
            let mut row_octave = octave;
            for col in 0..GRID_SIZE {
                let offset = (col + start) % count;
                if offset == 0 && !(row == GRID_SIZE - 1 && col == 0) {
                    row_octave += 1;
                }
                cells[row][col] = notes[offset] + 12 * row_octave;
            }
            if OCTAVE_ROWS.contains(&row) {
                octave += 1;
            }
            start = (start + ROW_STRIDE) % count;
        }

        NoteGrid { cells }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn walks_one_octave_per_mode() {
        for tonic in CHROMATIC_C.iter().chain(FLAT_TONICS.iter()) {
            for (_, intervals) in Mode::PRESETS {
                let notes = interval(tonic, intervals).unwrap();
                assert_eq!(notes.len(), intervals.len(), "{tonic} {intervals}");
                assert_eq!(notes[0], normalize_tonic(tonic));

                // the steps climb exactly one octave back to the tonic
                let mode = Mode::from_intervals(intervals).unwrap();
                let scale = Scale::new(tonic, mode).unwrap();
                let pitches = scale.pitches();
                assert!(pitches.windows(2).all(|w| w[0] < w[1]), "{tonic} {intervals}");
                assert!(pitches[pitches.len() - 1] - pitches[0] < 12, "{tonic} {intervals}");
                assert_eq!(pitches[0] % 12, scale.tonic_pitch_class());
            }
        }
    }

    #[test]
    fn major_and_minor_scales() {
        assert_eq!(
            interval("C", Mode::MAJOR).unwrap(),
            names(&["C", "D", "E", "F", "G", "A", "B"])
        );
        assert_eq!(
            interval("d", Mode::MINOR).unwrap(),
            names(&["D", "E", "F", "G", "A", "Bb", "C"])
        );
        assert_eq!(
            interval("A", Mode::MINOR_PENTATONIC).unwrap(),
            names(&["A", "C", "D", "E", "G"])
        );
        assert_eq!(
            interval("G", Mode::MIXOLYDIAN).unwrap(),
            names(&["G", "A", "B", "C", "D", "E", "F"])
        );
    }

    #[test]
    fn flat_keys_use_flat_spelling() {
        let sequence = chromatic("F").unwrap();
        assert_eq!(sequence[0], "F");
        assert!(sequence.iter().all(|n| !n.contains('#')));
        assert!(sequence.contains(&"Bb".to_string()));
        assert_eq!(
            interval("F", Mode::MAJOR).unwrap(),
            names(&["F", "G", "A", "Bb", "C", "D", "E"])
        );
    }

    #[test]
    fn flatten_shifts_the_letter() {
        assert_eq!(
            flatten(&CHROMATIC_C),
            names(&["C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B"])
        );
    }

    #[test]
    fn reorder_is_idempotent() {
        let once = reorder(&CHROMATIC_C, "E").unwrap();
        assert_eq!(once[0], "E");
        assert_eq!(reorder(&once, "E").unwrap(), once);
    }

    #[test]
    fn tonic_spelled_against_the_key_is_rejected() {
        // "Db" is a flat key, but lowercase "db" is not, so it gets sharps.
        assert!(matches!(
            chromatic("db"),
            Err(ScaleError::InvalidTonic { .. })
        ));
        assert!(matches!(
            Scale::new("H", Mode::default()),
            Err(ScaleError::InvalidTonic { .. })
        ));
    }

    #[test]
    fn unknown_step_is_rejected() {
        assert_eq!(
            interval("C", "MMxMMMm"),
            Err(ScaleError::UnknownIntervalSymbol('x'))
        );
        assert_eq!(
            Mode::from_intervals("MMmMMMq"),
            Err(ScaleError::UnknownIntervalSymbol('q'))
        );
    }

    #[test]
    fn modes_must_close_the_octave() {
        assert!(matches!(
            Mode::from_intervals("MMM"),
            Err(ScaleError::OpenMode { semitones: 6, .. })
        ));
    }

    #[test]
    fn modes_need_seven_or_five_steps() {
        assert_eq!(
            Mode::from_intervals("AAAA"),
            Err(ScaleError::UnsupportedLength {
                mode: "AAAA".to_string(),
                steps: 4,
            })
        );
        assert!(matches!(
            "MMmmMMmm".parse::<Mode>(),
            Err(ScaleError::UnsupportedLength { steps: 8, .. })
        ));
        assert!(Mode::from_intervals("MMAMA").is_ok());
    }

    #[test]
    fn modes_parse_by_name_or_intervals() {
        assert_eq!("dorian".parse::<Mode>().unwrap().intervals(), Mode::DORIAN);
        assert_eq!("Major Pentatonic".parse::<Mode>().unwrap().intervals(), Mode::MAJOR_PENTATONIC);
        assert_eq!("MmMMmMM".parse::<Mode>().unwrap().to_string(), "minor");
        assert_eq!(
            "lydian-ish".parse::<Mode>(),
            Err(ScaleError::UnknownMode("lydian-ish".to_string()))
        );
    }

    #[test]
    fn enharmonic_tonics_give_the_same_pitch_classes() {
        let sharp = Scale::new("C#", Mode::default()).unwrap();
        let flat = Scale::new("Db", Mode::default()).unwrap();
        assert_ne!(sharp.notes(), flat.notes());
        assert_eq!(sharp.pitches(), flat.pitches());
        assert_eq!(sharp.pitches(), &[1, 3, 5, 6, 8, 10, 12]);
    }

    #[test]
    fn notes_below_the_offset_move_up_an_octave() {
        assert_eq!(note_to_midi("C", 0, 0), Some(0));
        assert_eq!(note_to_midi("C", 0, 1), Some(12));
        assert_eq!(note_to_midi("bb", 2, 0), Some(34));
        assert_eq!(note_to_midi("X", 0, 0), None);
        assert_eq!(note_to_midi("B", 20, 0), Some(251));
        assert_eq!(note_to_midi("B", 21, 0), None);
        assert_eq!(note_to_midi("C", 22, 0), None);
        assert_eq!(note_to_midi("C", 255, 1), None);
    }

    #[test]
    fn c_major_grid() {
        let scale = Scale::new("C", Mode::default()).unwrap();
        let grid = scale.grid();
        assert_eq!(grid.rows()[7], [0, 2, 4, 5, 7, 9, 11, 12]);
        assert_eq!(grid.rows()[6], [5, 7, 9, 11, 12, 14, 16, 17]);
        assert_eq!(grid.rows()[5], [11, 12, 14, 16, 17, 19, 21, 23]);
        assert_eq!(grid.rows()[4], [16, 17, 19, 21, 23, 24, 26, 28]);
        assert_eq!(grid.rows()[3], [21, 23, 24, 26, 28, 29, 31, 33]);
        assert_eq!(grid.rows()[0], [36, 38, 40, 41, 43, 45, 47, 48]);
    }

    #[test]
    fn tonic_moves_by_the_row_stride() {
        let scale = Scale::new("C", Mode::default()).unwrap();
        let grid = scale.grid();
        let mut previous: Option<(usize, u8)> = None;
        for row in (0..GRID_SIZE).rev() {
            let col = (0..GRID_SIZE)
                .find(|&c| scale.is_tonic(grid.get(row, c)))
                .unwrap();
            let pitch = grid.get(row, col);
            if let Some((prev_col, prev_pitch)) = previous {
                assert_eq!(col, (prev_col + 7 - ROW_STRIDE) % 7, "row {row}");
                assert!(pitch >= prev_pitch, "row {row}");
            }
            previous = Some((col, pitch));
        }
        assert_eq!(previous, Some((0, 36)));
    }

    #[test]
    fn columns_ascend_from_the_bottom() {
        for (_, intervals) in Mode::PRESETS.iter().filter(|(_, i)| i.len() == 7) {
            let mode = Mode::from_intervals(intervals).unwrap();
            let grid = Scale::new("E", mode).unwrap().grid();
            for col in 0..GRID_SIZE {
                for row in 1..GRID_SIZE {
                    assert!(grid.get(row - 1, col) >= grid.get(row, col), "{intervals} col {col}");
                }
            }
        }
    }
}
