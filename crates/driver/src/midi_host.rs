use log::{debug, warn};
use midir::MidiOutputConnection;
use midly::live::LiveEvent;
use midly::num::{u4, u7, u14};
use midly::{MidiMessage, PitchBend};
use push_library::host::{ClipInfo, Host, HostCommand};

/// Host that forwards played notes to a MIDI port. It has no clip matrix,
/// so the session view stays empty and clip commands are dropped.
pub(crate) struct MidiHost {
    port: MidiOutputConnection,
}

impl MidiHost {
    pub(crate) fn new(port: MidiOutputConnection) -> Self {
        Self { port }
    }
}

impl Host for MidiHost {
    fn clips(&self) -> Vec<ClipInfo> {
        Vec::new()
    }

    fn execute(&mut self, command: HostCommand) {
        let Some(message) = encode(&command) else {
            debug!("No clip matrix, ignoring {command:?}");
            return;
        };
        if let Err(e) = self.port.send(&message) {
            warn!("Couldn't forward {command:?}: {e}");
        }
    }
}

/// MIDI bytes for the note-forwarding commands, `None` for the rest.
pub(crate) fn encode(command: &HostCommand) -> Option<Vec<u8>> {
    let (channel, message) = match *command {
        HostCommand::NoteOn {
            note,
            velocity,
            channel,
        } => (
            channel,
            MidiMessage::NoteOn {
                key: u7::from_int_lossy(note),
                vel: u7::from_int_lossy(velocity),
            },
        ),
        HostCommand::NoteOff {
            note,
            velocity,
            channel,
        } => (
            channel,
            MidiMessage::NoteOff {
                key: u7::from_int_lossy(note),
                vel: u7::from_int_lossy(velocity),
            },
        ),
        HostCommand::PolyAftertouch {
            note,
            pressure,
            channel,
        } => (
            channel,
            MidiMessage::Aftertouch {
                key: u7::from_int_lossy(note),
                vel: u7::from_int_lossy(pressure),
            },
        ),
        HostCommand::ChannelAftertouch { pressure, channel } => (
            channel,
            MidiMessage::ChannelAftertouch {
                vel: u7::from_int_lossy(pressure),
            },
        ),
        HostCommand::PitchBend { value, channel } => (
            channel,
            MidiMessage::PitchBend {
                bend: PitchBend(u14::from_int_lossy(value)),
            },
        ),
        _ => return None,
    };

    let event = LiveEvent::Midi {
        channel: u4::from_int_lossy(channel),
        message,
    };
    let mut buf = Vec::with_capacity(3);
    event.write_std(&mut buf).ok()?;
    Some(buf)
}
