//! Routes input events to the active view and renders the result.

use log::{debug, warn};

use crate::controls::Button;
use crate::diff::{LightCommand, diff};
use crate::events::InputEvent;
use crate::host::{Host, HostCommand};
use crate::layout::PadCoord;
use crate::lights::Style;
use crate::modes::{NoteMode, ScaleSelect, SegmentsMode, SessionMode};
use crate::profile::DeviceProfile;
use crate::scale::Scale;
use crate::view_state::ViewState;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum ViewMode {
    /// Pads belong to another application; only ABOVE_PAD2 is handled.
    Passthrough,
    #[default]
    Session,
    Note,
    Segments,
    Scale,
}

pub struct Controller<H: Host> {
    host: H,
    profile: DeviceProfile,
    view_mode: ViewMode,
    view_state: ViewState,
    note: NoteMode,
    segments: SegmentsMode,
    scale_select: ScaleSelect,
    session: SessionMode,
}

impl<H: Host> Controller<H> {
    pub fn new(host: H, profile: DeviceProfile, scale: Scale) -> Self {
        let palette = profile.palette;
        Self {
            host,
            profile,
            view_mode: ViewMode::default(),
            view_state: ViewState::default(),
            scale_select: ScaleSelect::new(&scale, palette),
            note: NoteMode::new(scale, palette),
            segments: SegmentsMode::new(palette),
            session: SessionMode::new(profile.layout, palette),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// What the device currently shows.
    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    pub fn note_mode(&self) -> &NoteMode {
        &self.note
    }

    pub fn note_mode_mut(&mut self) -> &mut NoteMode {
        &mut self.note
    }

    pub fn scale_select(&self) -> &ScaleSelect {
        &self.scale_select
    }

    pub fn session(&self) -> &SessionMode {
        &self.session
    }

    /// Handles one event to completion and returns the LED messages it
    /// caused, in the order they must be sent.
    pub fn handle(&mut self, event: InputEvent) -> Vec<LightCommand> {
        debug!("{:?} in {:?} view", event, self.view_mode);
        let render = match event {
            InputEvent::PadPressed {
                note,
                velocity,
                channel,
                ..
            } => self.press_pad(note, velocity, channel),
            InputEvent::PadReleased {
                note,
                velocity,
                channel,
                ..
            } => self.release_pad(note, velocity, channel),
            InputEvent::ButtonPressed { cc, .. } => match Button::from_cc(cc) {
                Some(button) => self.press_button(button),
                None => Render::No,
            },
            InputEvent::ButtonReleased { cc, .. } => match Button::from_cc(cc) {
                Some(button) => self.release_button(button),
                None => Render::No,
            },
            InputEvent::PolyAftertouch {
                note,
                pressure,
                channel,
            } => {
                if let Some(note) = self.played_note(note) {
                    self.host.execute(HostCommand::PolyAftertouch {
                        note,
                        pressure,
                        channel,
                    });
                }
                Render::No
            }
            InputEvent::ChannelAftertouch { pressure, channel } => {
                if self.plays_notes() {
                    self.host
                        .execute(HostCommand::ChannelAftertouch { pressure, channel });
                }
                Render::No
            }
            InputEvent::PitchBend { value, channel } => {
                if self.plays_notes() {
                    self.host.execute(HostCommand::PitchBend { value, channel });
                }
                Render::No
            }
            InputEvent::ClipUpdated { track, .. } => {
                if self.view_mode == ViewMode::Session {
                    self.session.clip_updated(&self.host, track);
                }
                Render::No
            }
            InputEvent::RenderRequested { resync } => {
                if resync {
                    Render::Resync
                } else {
                    Render::Yes
                }
            }
        };

        match render {
            Render::No => Vec::new(),
            Render::Yes => self.render(false),
            Render::Resync => self.render(true),
        }
    }

    /// Builds the next view state, diffs it against the current one and
    /// keeps it.
    pub fn render(&mut self, resync: bool) -> Vec<LightCommand> {
        let next = self.build_view_state(resync);
        let commands = diff(&self.view_state, &next, &self.profile.layout);
        self.view_state = next;
        debug!("render: {} light commands", commands.len());
        commands
    }

    fn grid_position(&self, note: u8) -> Option<(usize, usize)> {
        let pad = self.profile.layout.pad_for_note(note)?;
        Some((pad.row as usize, pad.col as usize))
    }

    fn plays_notes(&self) -> bool {
        matches!(self.view_mode, ViewMode::Note | ViewMode::Segments)
    }

    /// The note a pad plays in the current view, if it plays one.
    fn played_note(&self, pad_note: u8) -> Option<u8> {
        let (row, col) = self.grid_position(pad_note)?;
        match self.view_mode {
            ViewMode::Note => Some(self.note.note(row, col)),
            ViewMode::Segments => self.segments.note(row, col),
            _ => None,
        }
    }

    fn press_pad(&mut self, note: u8, velocity: u8, channel: u8) -> Render {
        // touch sensitive encoders send notes too
        let Some((row, col)) = self.grid_position(note) else {
            return Render::No;
        };

        match self.view_mode {
            ViewMode::Passthrough => return Render::No,
            ViewMode::Note => {
                let note = self.note.note(row, col);
                self.host.execute(HostCommand::NoteOn {
                    note,
                    velocity,
                    channel,
                });
                let style = self.note.pressed_style();
                self.note.press(row, col, style);
            }
            ViewMode::Segments => {
                let Some(note) = self.segments.note(row, col) else {
                    return Render::No;
                };
                self.host.execute(HostCommand::NoteOn {
                    note,
                    velocity,
                    channel,
                });
                let style = self.segments.pressed_style();
                self.segments.press(row, col, style);
            }
            ViewMode::Scale => {
                self.scale_select.press(row, col);
            }
            ViewMode::Session => {
                let pad = PadCoord::new(row as i32, col as i32);
                let offset = self.session.offset();
                if let Some(clip) = offset.clip_for_pad(&self.profile.layout, pad) {
                    self.session.press_pad(&mut self.host, clip);
                }
            }
        }
        Render::Yes
    }

    fn release_pad(&mut self, note: u8, velocity: u8, channel: u8) -> Render {
        let Some((row, col)) = self.grid_position(note) else {
            return Render::No;
        };

        match self.view_mode {
            ViewMode::Passthrough | ViewMode::Scale => Render::No,
            ViewMode::Note => {
                let note = self.note.note(row, col);
                self.host.execute(HostCommand::NoteOff {
                    note,
                    velocity,
                    channel,
                });
                let style = self.note.released_style(row, col);
                self.note.press(row, col, style);
                Render::Yes
            }
            ViewMode::Segments => {
                let Some(note) = self.segments.note(row, col) else {
                    return Render::No;
                };
                self.host.execute(HostCommand::NoteOff {
                    note,
                    velocity,
                    channel,
                });
                let style = self.segments.released_style(row, col);
                self.segments.press(row, col, style);
                Render::Yes
            }
            ViewMode::Session => {
                let pad = PadCoord::new(row as i32, col as i32);
                let offset = self.session.offset();
                if let Some(clip) = offset.clip_for_pad(&self.profile.layout, pad) {
                    self.session.release_pad(&mut self.host, clip);
                }
                Render::Yes
            }
        }
    }

    fn press_button(&mut self, button: Button) -> Render {
        if self.view_mode == ViewMode::Passthrough {
            if button == Button::AbovePad2 {
                self.view_mode = ViewMode::Session;
                return Render::Resync;
            }
            return Render::No;
        }

        match (button, self.view_mode) {
            (Button::AbovePad1, _) => {
                self.view_mode = ViewMode::Passthrough;
                Render::Yes
            }
            (Button::Scale, _) => {
                self.view_mode = ViewMode::Scale;
                Render::Resync
            }
            (Button::Note, ViewMode::Note) => {
                self.segments.reset_pads();
                self.view_mode = ViewMode::Segments;
                Render::Yes
            }
            (Button::Note, _) => {
                self.leave_scale_view();
                self.note.reset_pads();
                self.view_mode = ViewMode::Note;
                Render::Yes
            }
            (Button::Session, _) => {
                self.leave_scale_view();
                self.view_mode = ViewMode::Session;
                Render::Yes
            }
            (Button::OctaveUp, ViewMode::Note) => {
                self.note.octave_up();
                Render::Yes
            }
            (Button::OctaveDown, ViewMode::Note) => {
                self.note.octave_down();
                Render::Yes
            }
            (_, ViewMode::Session) => {
                if self.session.press_button(&mut self.host, button) {
                    Render::Yes
                } else {
                    Render::No
                }
            }
            _ => Render::No,
        }
    }

    fn release_button(&mut self, button: Button) -> Render {
        if self.view_mode == ViewMode::Session && self.session.release_button(button) {
            Render::Yes
        } else {
            Render::No
        }
    }

    /// Applies the scale page's selection to the note grid. An invalid
    /// selection keeps the previous scale.
    fn leave_scale_view(&mut self) {
        if self.view_mode != ViewMode::Scale {
            return;
        }
        match self.scale_select.scale() {
            Ok(scale) => {
                debug!("scale: {} {}", scale.tonic(), scale.mode());
                self.note.set_scale(scale);
            }
            Err(e) => warn!(
                "keeping {} {}: {e}",
                self.note.scale().tonic(),
                self.note.scale().mode()
            ),
        }
    }

    fn build_view_state(&self, resync: bool) -> ViewState {
        let palette = &self.profile.palette;
        let mut state = ViewState::new(resync);

        if self.view_mode == ViewMode::Passthrough {
            state.set_button(Button::AbovePad1, Style::solid(palette.blue));
            state.set_button(Button::AbovePad2, Style::solid(palette.white));
        } else {
            state.set_button(Button::AbovePad1, Style::solid(palette.white));
            state.set_button(Button::AbovePad2, Style::solid(palette.blue));
        }

        for (button, mode) in [
            (Button::Session, ViewMode::Session),
            (Button::Note, ViewMode::Note),
            (Button::Scale, ViewMode::Scale),
        ] {
            let active = self.view_mode == mode
                || (mode == ViewMode::Note && self.view_mode == ViewMode::Segments);
            let color = if active {
                palette.white
            } else {
                palette.light_gray
            };
            state.set_button(button, Style::solid(color));
        }

        let pads = self.profile.layout.pads();
        match self.view_mode {
            ViewMode::Passthrough => {}
            ViewMode::Note => {
                for pad in pads {
                    let (row, col) = (pad.row as usize, pad.col as usize);
                    state.set_pad(pad, self.note.style(row, col));
                }
                if self.note.octave() < crate::modes::note::MAX_OCTAVE {
                    state.set_button(Button::OctaveUp, Style::solid(palette.light_gray));
                }
                if self.note.octave() > 0 {
                    state.set_button(Button::OctaveDown, Style::solid(palette.light_gray));
                }
            }
            ViewMode::Segments => {
                for pad in pads {
                    let (row, col) = (pad.row as usize, pad.col as usize);
                    state.set_pad(pad, self.segments.style(row, col));
                }
            }
            ViewMode::Scale => {
                for pad in pads {
                    let (row, col) = (pad.row as usize, pad.col as usize);
                    state.set_pad(pad, self.scale_select.style(row, col));
                }
            }
            ViewMode::Session => self.session.render_pads(&self.host, &mut state),
        }

        self.session.render_buttons(&self.host, &mut state);
        state
    }
}

enum Render {
    No,
    Yes,
    Resync,
}
