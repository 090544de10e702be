use std::collections::BTreeMap;

use crate::controls::Button;
use crate::layout::PadCoord;
use crate::lights::Style;

/// Full description of how every button and pad should be lit. A fresh one
/// is built on every render and compared against the previous one.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// No previous state may be assumed; the device is cleared first.
    pub resync: bool,
    pub buttons: BTreeMap<Button, Style>,
    pub pads: BTreeMap<PadCoord, Style>,
}

impl ViewState {
    pub fn new(resync: bool) -> Self {
        Self {
            resync,
            ..Default::default()
        }
    }

    pub fn set_button(&mut self, button: Button, style: Style) {
        self.buttons.insert(button, style);
    }

    pub fn set_pad(&mut self, pad: PadCoord, style: Style) {
        self.pads.insert(pad, style);
    }

    pub fn button(&self, button: Button) -> Option<Style> {
        self.buttons.get(&button).copied()
    }

    pub fn pad(&self, pad: PadCoord) -> Option<Style> {
        self.pads.get(&pad).copied()
    }
}
