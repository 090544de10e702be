//! Turns the difference between two view states into LED messages.

use crate::controls::Button;
use crate::layout::{Layout, PadCoord};
use crate::lights::Style;
use crate::profile::DeviceProfile;
use crate::view_state::ViewState;

const NOTE_ON: u8 = 0x90;
const CONTROL_CHANGE: u8 = 0xB0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LightCommand {
    Pad { pad: PadCoord, style: Style },
    Button { button: Button, style: Style },
}

impl LightCommand {
    /// The 3-byte MIDI message. Pads are lit with Note On, buttons with CC;
    /// the channel selects the lighting mode. `None` for pads off the grid.
    pub fn encode(&self, profile: &DeviceProfile) -> Option<[u8; 3]> {
        match *self {
            LightCommand::Pad { pad, style } => {
                let note = profile.layout.pad_note(pad)?;
                let channel = profile.lighting.channel(style.lighting);
                Some([NOTE_ON | channel, note, style.color.id()])
            }
            LightCommand::Button { button, style } => {
                let channel = profile.lighting.channel(style.lighting);
                Some([CONTROL_CHANGE | channel, button.cc(), style.color.id()])
            }
        }
    }
}

/// Messages turning every pad and button off.
pub fn clear_all(layout: &Layout) -> Vec<LightCommand> {
    let pads = layout.pads().map(|pad| LightCommand::Pad {
        pad,
        style: Style::OFF,
    });
    let buttons = Button::ALL.iter().map(|&button| LightCommand::Button {
        button,
        style: Style::OFF,
    });
    pads.chain(buttons).collect()
}

/// Compares `next` against `prev` and returns the messages that bring the
/// device from one to the other.
///
/// Button offs come before button updates, which come before pad offs and
/// pad updates. A button whose lighting mode changes is turned off first,
/// since the device keeps blinking/pulsing otherwise, unless it is being
/// turned off anyway. On resync the device
/// is cleared and everything in `next` is sent again.
pub fn diff(prev: &ViewState, next: &ViewState, layout: &Layout) -> Vec<LightCommand> {
    let mut commands = Vec::new();

    let cleared = ViewState::default();
    let prev = if next.resync {
        commands.extend(clear_all(layout));
        &cleared
    } else {
        prev
    };

    for &button in prev.buttons.keys() {
        if next.buttons.contains_key(&button) {
            continue;
        }
        commands.push(LightCommand::Button {
            button,
            style: Style::OFF,
        });
    }

    for &pad in prev.pads.keys() {
        // scrolled out of view
        if !layout.is_in_bounds(pad) {
            continue;
        }
        if next.pads.contains_key(&pad) {
            continue;
        }
        commands.push(LightCommand::Pad {
            pad,
            style: Style::OFF,
        });
    }

    for (&button, &style) in &next.buttons {
        let prev_style = prev.buttons.get(&button);
        if prev_style == Some(&style) {
            continue;
        }
        if let Some(prev_style) = prev_style {
            if prev_style.lighting != style.lighting && !style.is_off() {
                commands.push(LightCommand::Button {
                    button,
                    style: Style::OFF,
                });
            }
        }
        commands.push(LightCommand::Button { button, style });
    }

    for (&pad, &style) in &next.pads {
        if !layout.is_in_bounds(pad) {
            continue;
        }
        if prev.pads.get(&pad) == Some(&style) {
            continue;
        }
        commands.push(LightCommand::Pad { pad, style });
    }

    commands
}
