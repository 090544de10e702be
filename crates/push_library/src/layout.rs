use serde::Deserialize;

use crate::scale::GRID_SIZE;

/// Physical arrangement of the pad grid and the note numbers it sends.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Note number of the bottom-left pad.
    pub bottom_left_pad: u8,
    /// Note number distance between two vertically adjacent pads.
    pub row_skip: u8,
    pub rows: u8,
    pub cols: u8,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            bottom_left_pad: 36,
            row_skip: 8,
            rows: 8,
            cols: 8,
        }
    }
}

/// Absolute pad position, row 0 at the top. Scrolling never moves it.
///
/// Signed so that clip positions scrolled off the grid can still be
/// represented; [`Layout::is_in_bounds`] tells whether the pad exists.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PadCoord {
    pub row: i32,
    pub col: i32,
}

impl PadCoord {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// Position of a clip in the host's track/scene matrix.
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClipCoord {
    pub track: usize,
    pub slot: usize,
}

impl ClipCoord {
    pub fn new(track: usize, slot: usize) -> Self {
        Self { track, slot }
    }
}

impl Layout {
    /// Rows and columns actually addressed. The views hold at most
    /// `GRID_SIZE` pads per side.
    fn extent(&self) -> (i32, i32) {
        let max = GRID_SIZE as u8;
        (self.rows.min(max) as i32, self.cols.min(max) as i32)
    }

    pub fn is_in_bounds(&self, pad: PadCoord) -> bool {
        let (rows, cols) = self.extent();
        pad.row >= 0 && pad.row < rows && pad.col >= 0 && pad.col < cols
    }

    /// Every pad on the grid, row by row from the top.
    pub fn pads(&self) -> impl Iterator<Item = PadCoord> + '_ {
        let (rows, cols) = self.extent();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| PadCoord::new(row, col)))
    }

    /// Note number the pad sends and is lit by. `None` for pads off the grid.
    pub fn pad_note(&self, pad: PadCoord) -> Option<u8> {
        if !self.is_in_bounds(pad) {
            return None;
        }
        let index = (self.rows as i32 - pad.row - 1) * self.row_skip as i32 + pad.col;
        u8::try_from(self.bottom_left_pad as i32 + index).ok()
    }

    /// Pad for an incoming note number. Notes outside the grid (touch
    /// sensitive encoders send notes too) give `None`.
    pub fn pad_for_note(&self, note: u8) -> Option<PadCoord> {
        let index = note.checked_sub(self.bottom_left_pad)? as i32;
        let skip = self.row_skip as i32;
        let pad = PadCoord::new(
            self.rows as i32 - index.checked_div(skip)? - 1,
            index.checked_rem(skip)?,
        );
        self.is_in_bounds(pad).then_some(pad)
    }

    /// Checks that every pad has its own note and fits the views.
    pub fn validate(&self) -> Result<(), String> {
        let max = GRID_SIZE as u8;
        if !(1..=max).contains(&self.rows) || !(1..=max).contains(&self.cols) {
            return Err(format!(
                "layout should be 1 to {max} rows and columns (found {}x{})",
                self.rows, self.cols
            ));
        }
        if self.row_skip < self.cols {
            return Err(format!(
                "layout row_skip should be at least cols ({}, found {})",
                self.cols, self.row_skip
            ));
        }
        Ok(())
    }
}

/// Scroll position of the grid over the host's clip matrix.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ScrollOffset {
    pub track: usize,
    pub slot: usize,
}

impl ScrollOffset {
    pub fn pad_for_clip(&self, clip: ClipCoord) -> PadCoord {
        PadCoord::new(
            clip.slot as i32 - self.slot as i32,
            clip.track as i32 - self.track as i32,
        )
    }

    pub fn clip_for_pad(&self, layout: &Layout, pad: PadCoord) -> Option<ClipCoord> {
        if !layout.is_in_bounds(pad) {
            return None;
        }
        Some(ClipCoord::new(
            pad.col as usize + self.track,
            pad.row as usize + self.slot,
        ))
    }

    pub fn track_for_column(&self, col: usize) -> usize {
        self.track + col
    }

    /// Moves the offset by one step, staying inside `0..=max`.
    pub fn scroll(&mut self, tracks: i32, slots: i32, max: ClipCoord) {
        self.track = (self.track as i32 + tracks).clamp(0, max.track as i32) as usize;
        self.slot = (self.slot as i32 + slots).clamp(0, max.slot as i32) as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_notes_count_from_bottom_left() {
        let layout = Layout::default();
        assert_eq!(layout.pad_note(PadCoord::new(7, 0)), Some(36));
        assert_eq!(layout.pad_note(PadCoord::new(7, 7)), Some(43));
        assert_eq!(layout.pad_note(PadCoord::new(6, 0)), Some(44));
        assert_eq!(layout.pad_note(PadCoord::new(0, 0)), Some(92));
        assert_eq!(layout.pad_note(PadCoord::new(0, 7)), Some(99));
        assert_eq!(layout.pad_note(PadCoord::new(8, 0)), None);
        assert_eq!(layout.pad_note(PadCoord::new(0, -1)), None);
    }

    #[test]
    fn notes_map_back_to_pads() {
        let layout = Layout::default();
        for pad in layout.pads() {
            let note = layout.pad_note(pad).unwrap();
            assert_eq!(layout.pad_for_note(note), Some(pad));
        }
        assert_eq!(layout.pad_for_note(10), None);
        assert_eq!(layout.pad_for_note(100), None);
    }

    #[test]
    fn oversized_layouts_stay_on_the_grid() {
        let layout = Layout {
            rows: 9,
            cols: 12,
            ..Default::default()
        };
        assert_eq!(layout.pads().count(), GRID_SIZE * GRID_SIZE);
        assert!(!layout.is_in_bounds(PadCoord::new(8, 0)));
        assert!(layout.validate().is_err());

        let layout = Layout {
            row_skip: 0,
            ..Default::default()
        };
        assert_eq!(layout.pad_for_note(40), None);
        assert!(layout.validate().is_err());
    }

    #[test]
    fn validate_rejects_overlapping_rows() {
        assert_eq!(Layout::default().validate(), Ok(()));
        let layout = Layout {
            row_skip: 7,
            ..Default::default()
        };
        assert!(layout.validate().unwrap_err().contains("row_skip"));
        let layout = Layout {
            rows: 0,
            ..Default::default()
        };
        assert!(layout.validate().is_err());
    }

    #[test]
    fn clips_follow_the_scroll_offset() {
        let layout = Layout::default();
        let offset = ScrollOffset { track: 2, slot: 3 };
        assert_eq!(offset.pad_for_clip(ClipCoord::new(2, 3)), PadCoord::new(0, 0));
        assert_eq!(offset.pad_for_clip(ClipCoord::new(0, 0)), PadCoord::new(-3, -2));
        assert_eq!(
            offset.clip_for_pad(&layout, PadCoord::new(1, 4)),
            Some(ClipCoord::new(6, 4))
        );
        assert_eq!(offset.clip_for_pad(&layout, PadCoord::new(-1, 0)), None);
    }

    #[test]
    fn scrolling_is_clamped() {
        let mut offset = ScrollOffset::default();
        let max = ClipCoord::new(3, 1);
        offset.scroll(-1, 0, max);
        assert_eq!(offset, ScrollOffset::default());
        offset.scroll(5, 5, max);
        assert_eq!(offset, ScrollOffset { track: 3, slot: 1 });
    }
}
