use num_derive::FromPrimitive;

/// Buttons around the pad grid, identified by the CC number they send and
/// receive.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, FromPrimitive)]
#[repr(u8)]
pub enum Button {
    TapTempo = 3,
    Metronome = 9,

    BelowPad1 = 20,
    BelowPad2 = 21,
    BelowPad3 = 22,
    BelowPad4 = 23,
    BelowPad5 = 24,
    BelowPad6 = 25,
    BelowPad7 = 26,
    BelowPad8 = 27,
    Master = 28,
    Stop = 29,
    Setup = 30,

    Convert = 35,
    Scene7 = 36,
    Scene6 = 37,
    Scene5 = 38,
    Scene4 = 39,
    Scene3 = 40,
    Scene2 = 41,
    Scene1 = 42,
    Scene0 = 43,
    LeftArrow = 44,
    RightArrow = 45,
    UpArrow = 46,
    DownArrow = 47,
    Shift = 49,
    Note = 50,
    Session = 51,
    AddDevice = 52,
    AddTrack = 53,
    OctaveDown = 54,
    OctaveUp = 55,
    Scale = 58,
    User = 59,
    Mute = 60,
    Solo = 61,

    Play = 85,
    Record = 86,
    New = 87,
    Duplicate = 88,
    Automate = 89,
    FixedLength = 90,

    AbovePad1 = 102,
    AbovePad2 = 103,
    AbovePad3 = 104,
    AbovePad4 = 105,
    AbovePad5 = 106,
    AbovePad6 = 107,
    AbovePad7 = 108,
    AbovePad8 = 109,
    Device = 110,
    Browse = 111,
    Mix = 112,
    Clip = 113,
    Quantize = 116,
    DoubleLoop = 117,
    Delete = 118,
    Undo = 119,
}

impl Button {
    pub const ALL: [Button; 59] = [
        Button::TapTempo,
        Button::Metronome,
        Button::BelowPad1,
        Button::BelowPad2,
        Button::BelowPad3,
        Button::BelowPad4,
        Button::BelowPad5,
        Button::BelowPad6,
        Button::BelowPad7,
        Button::BelowPad8,
        Button::Master,
        Button::Stop,
        Button::Setup,
        Button::Convert,
        Button::Scene7,
        Button::Scene6,
        Button::Scene5,
        Button::Scene4,
        Button::Scene3,
        Button::Scene2,
        Button::Scene1,
        Button::Scene0,
        Button::LeftArrow,
        Button::RightArrow,
        Button::UpArrow,
        Button::DownArrow,
        Button::Shift,
        Button::Note,
        Button::Session,
        Button::AddDevice,
        Button::AddTrack,
        Button::OctaveDown,
        Button::OctaveUp,
        Button::Scale,
        Button::User,
        Button::Mute,
        Button::Solo,
        Button::Play,
        Button::Record,
        Button::New,
        Button::Duplicate,
        Button::Automate,
        Button::FixedLength,
        Button::AbovePad1,
        Button::AbovePad2,
        Button::AbovePad3,
        Button::AbovePad4,
        Button::AbovePad5,
        Button::AbovePad6,
        Button::AbovePad7,
        Button::AbovePad8,
        Button::Device,
        Button::Browse,
        Button::Mix,
        Button::Clip,
        Button::Quantize,
        Button::DoubleLoop,
        Button::Delete,
        Button::Undo,
    ];

    pub fn cc(self) -> u8 {
        self as u8
    }

    pub fn from_cc(cc: u8) -> Option<Button> {
        num::FromPrimitive::from_u8(cc)
    }

    /// Track column (0-7) of the buttons directly below the pads.
    pub fn below_pad_column(self) -> Option<usize> {
        let cc = self.cc();
        let first = Button::BelowPad1.cc();
        (first..=Button::BelowPad8.cc())
            .contains(&cc)
            .then(|| (cc - first) as usize)
    }

    pub fn below_pad(col: usize) -> Option<Button> {
        if col >= 8 {
            return None;
        }
        Button::from_cc(Button::BelowPad1.cc() + col as u8)
    }

    /// Scene row (0 = top) of the buttons right of the pads.
    pub fn scene_row(self) -> Option<usize> {
        let cc = self.cc();
        (Button::Scene7.cc()..=Button::Scene0.cc())
            .contains(&cc)
            .then(|| (Button::Scene0.cc() - cc) as usize)
    }

    pub fn scene(row: usize) -> Option<Button> {
        if row >= 8 {
            return None;
        }
        Button::from_cc(Button::Scene0.cc() - row as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_round_trip_through_cc() {
        for button in Button::ALL {
            assert_eq!(Button::from_cc(button.cc()), Some(button));
        }
        assert_eq!(Button::from_cc(0), None);
        assert_eq!(Button::from_cc(127), None);
    }

    #[test]
    fn below_pad_columns() {
        assert_eq!(Button::BelowPad1.below_pad_column(), Some(0));
        assert_eq!(Button::BelowPad8.below_pad_column(), Some(7));
        assert_eq!(Button::Master.below_pad_column(), None);
        assert_eq!(Button::below_pad(3), Some(Button::BelowPad4));
        assert_eq!(Button::below_pad(8), None);
    }

    #[test]
    fn scene_rows_count_from_the_top() {
        assert_eq!(Button::Scene0.scene_row(), Some(0));
        assert_eq!(Button::Scene7.scene_row(), Some(7));
        assert_eq!(Button::scene(7), Some(Button::Scene7));
        assert_eq!(Button::Convert.scene_row(), None);
    }
}
