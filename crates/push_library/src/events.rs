use midly::MidiMessage;
use midly::live::LiveEvent;

const PRESSED: u8 = 127;
const RELEASED: u8 = 0;

/// Everything the controller reacts to: decoded device input plus the host's
/// notifications.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputEvent {
    PadPressed {
        note: u8,
        velocity: u8,
        channel: u8,
        timestamp: u64,
    },
    PadReleased {
        note: u8,
        velocity: u8,
        channel: u8,
        timestamp: u64,
    },
    ButtonPressed {
        cc: u8,
        value: u8,
        channel: u8,
        timestamp: u64,
    },
    ButtonReleased {
        cc: u8,
        value: u8,
        channel: u8,
        timestamp: u64,
    },
    PolyAftertouch {
        note: u8,
        pressure: u8,
        channel: u8,
    },
    ChannelAftertouch {
        pressure: u8,
        channel: u8,
    },
    PitchBend {
        value: u16,
        channel: u8,
    },
    ClipUpdated {
        track: usize,
        slot: usize,
    },
    RenderRequested {
        resync: bool,
    },
}

impl InputEvent {
    /// Decodes one MIDI message from the device. Messages the controller has
    /// no use for (SysEx, clock, partial CC values) give `None`.
    pub fn from_midi(bytes: &[u8], timestamp: u64) -> Option<InputEvent> {
        let LiveEvent::Midi { channel, message } = LiveEvent::parse(bytes).ok()? else {
            return None;
        };
        let channel = channel.as_int();

        let event = match message {
            MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => InputEvent::PadPressed {
                note: key.as_int(),
                velocity: vel.as_int(),
                channel,
                timestamp,
            },
            MidiMessage::NoteOn { key, vel } | MidiMessage::NoteOff { key, vel } => {
                InputEvent::PadReleased {
                    note: key.as_int(),
                    velocity: vel.as_int(),
                    channel,
                    timestamp,
                }
            }
            MidiMessage::Controller { controller, value } => match value.as_int() {
                PRESSED => InputEvent::ButtonPressed {
                    cc: controller.as_int(),
                    value: PRESSED,
                    channel,
                    timestamp,
                },
                RELEASED => InputEvent::ButtonReleased {
                    cc: controller.as_int(),
                    value: RELEASED,
                    channel,
                    timestamp,
                },
                _ => return None,
            },
            MidiMessage::Aftertouch { key, vel } => InputEvent::PolyAftertouch {
                note: key.as_int(),
                pressure: vel.as_int(),
                channel,
            },
            MidiMessage::ChannelAftertouch { vel } => InputEvent::ChannelAftertouch {
                pressure: vel.as_int(),
                channel,
            },
            MidiMessage::PitchBend { bend } => InputEvent::PitchBend {
                value: bend.0.as_int(),
                channel,
            },
            MidiMessage::ProgramChange { .. } => return None,
        };
        Some(event)
    }
}
