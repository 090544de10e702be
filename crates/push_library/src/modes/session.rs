use std::collections::BTreeSet;

use crate::controls::Button;
use crate::host::{ClipInfo, Host, HostCommand, LaunchBehavior, LaunchedAction, UnlaunchedAction};
use crate::layout::{ClipCoord, Layout, ScrollOffset};
use crate::lights::{Color, Lighting, Palette, Style};
use crate::view_state::ViewState;

/// What the below-pad track buttons do.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    Stop,
    Solo,
    Mute,
    Record,
}

/// Modes active only while their button is held. Pads pressed meanwhile are
/// highlighted and receive the action on release.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum MomentaryMode {
    #[default]
    None,
    Clear,
    Duplicate,
    Quantize,
}

impl MomentaryMode {
    fn for_button(button: Button) -> Option<MomentaryMode> {
        match button {
            Button::Delete => Some(MomentaryMode::Clear),
            Button::Duplicate => Some(MomentaryMode::Duplicate),
            Button::Quantize => Some(MomentaryMode::Quantize),
            _ => None,
        }
    }

    pub fn is_active(self) -> bool {
        self != MomentaryMode::None
    }
}

/// Clip launcher over the host's track/slot matrix.
#[derive(Debug, Clone)]
pub struct SessionMode {
    layout: Layout,
    palette: Palette,
    offset: ScrollOffset,
    input_mode: InputMode,
    momentary: MomentaryMode,
    /// Clips whose track was asked to stop; shown until the host confirms.
    stopping: BTreeSet<ClipCoord>,
    highlighting: BTreeSet<ClipCoord>,
}

impl SessionMode {
    pub fn new(layout: Layout, palette: Palette) -> Self {
        Self {
            layout,
            palette,
            offset: ScrollOffset::default(),
            input_mode: InputMode::Normal,
            momentary: MomentaryMode::None,
            stopping: BTreeSet::new(),
            highlighting: BTreeSet::new(),
        }
    }

    pub fn offset(&self) -> ScrollOffset {
        self.offset
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn momentary(&self) -> MomentaryMode {
        self.momentary
    }

    pub fn stopping(&self) -> &BTreeSet<ClipCoord> {
        &self.stopping
    }

    pub fn highlighting(&self) -> &BTreeSet<ClipCoord> {
        &self.highlighting
    }

    pub fn press_pad<H: Host + ?Sized>(&mut self, host: &mut H, clip: ClipCoord) {
        if self.momentary.is_active() {
            self.highlighting.insert(clip);
            return;
        }

        let info = host.clip(clip.track, clip.slot);
        match info {
            Some(info) if self.input_mode == InputMode::Record => {
                if info.recording {
                    host.execute(HostCommand::DisarmClip(clip));
                } else {
                    host.execute(HostCommand::ArmClip(clip));
                }
            }
            Some(info) => apply_launch(host, &info, info.note_on),
            None if host.is_any_playing_on_track(clip.track) => {
                self.stopping.insert(clip);
                host.execute(HostCommand::StopTrack(clip.track));
            }
            None if host.is_any_triggering_on_track(clip.track) => {
                host.execute(HostCommand::StopTrack(clip.track));
            }
            None => {}
        }
    }

    pub fn release_pad<H: Host + ?Sized>(&mut self, host: &mut H, clip: ClipCoord) {
        let command = match self.momentary {
            MomentaryMode::Clear => Some(HostCommand::ClearPattern(clip)),
            MomentaryMode::Duplicate => Some(HostCommand::DuplicatePattern(clip)),
            MomentaryMode::Quantize => Some(HostCommand::ToggleQuantization(clip)),
            MomentaryMode::None => None,
        };
        if let Some(command) = command {
            self.highlighting.remove(&clip);
            host.execute(command);
            return;
        }

        if let Some(info) = host.clip(clip.track, clip.slot) {
            apply_launch(host, &info, info.note_off);
        }
    }

    /// Handles a session button. Returns whether the button belongs to the
    /// session view.
    pub fn press_button<H: Host + ?Sized>(&mut self, host: &mut H, button: Button) -> bool {
        if let Some(row) = button.scene_row() {
            let slot = self.offset.slot + row;
            for track in host.all_playing_tracks() {
                self.stopping.insert(ClipCoord::new(track, slot));
            }
            host.execute(HostCommand::LaunchScene(slot));
            return true;
        }

        let toggled = match button {
            Button::Stop => Some(InputMode::Stop),
            Button::Solo => Some(InputMode::Solo),
            Button::Mute => Some(InputMode::Mute),
            Button::Record => Some(InputMode::Record),
            _ => None,
        };
        if let Some(mode) = toggled {
            self.input_mode = if self.input_mode == mode {
                InputMode::Normal
            } else {
                mode
            };
            return true;
        }

        let scroll = match button {
            Button::LeftArrow => Some((-1, 0)),
            Button::RightArrow => Some((1, 0)),
            Button::UpArrow => Some((0, -1)),
            Button::DownArrow => Some((0, 1)),
            _ => None,
        };
        if let Some((tracks, slots)) = scroll {
            self.offset.scroll(tracks, slots, host.max_track_and_slot());
            return true;
        }

        if let Some(col) = button.below_pad_column() {
            let track = self.offset.track_for_column(col);
            if host.has_clip_on_track(track) {
                self.press_track_button(host, track);
            }
            return true;
        }

        if let Some(mode) = MomentaryMode::for_button(button) {
            self.momentary = mode;
            return true;
        }

        false
    }

    fn press_track_button<H: Host + ?Sized>(&self, host: &mut H, track: usize) {
        let command = match self.input_mode {
            InputMode::Normal => None,
            InputMode::Stop => Some(HostCommand::StopTrack(track)),
            InputMode::Solo if host.is_all_soloing_on_track(track) => {
                Some(HostCommand::UnsoloTrack(track))
            }
            InputMode::Solo => Some(HostCommand::SoloTrack(track)),
            InputMode::Mute if host.is_all_muted_on_track(track) => {
                Some(HostCommand::UnmuteTrack(track))
            }
            InputMode::Mute => Some(HostCommand::MuteTrack(track)),
            InputMode::Record if host.is_any_recording_on_track(track) => {
                Some(HostCommand::DisarmTrack(track))
            }
            InputMode::Record => host
                .launched_clip_with_lowest_slot_on_track(track)
                .or_else(|| host.clip_with_lowest_slot_on_track(track))
                .map(|clip| HostCommand::ArmClip(clip.coord())),
        };
        if let Some(command) = command {
            host.execute(command);
        }
    }

    /// Ends a momentary mode when its button is let go.
    pub fn release_button(&mut self, button: Button) -> bool {
        match MomentaryMode::for_button(button) {
            Some(mode) if mode == self.momentary => {
                self.momentary = MomentaryMode::None;
                self.highlighting.clear();
                true
            }
            _ => false,
        }
    }

    /// Drops stopping marks on `track` once the host no longer reports it
    /// releasing.
    pub fn clip_updated<H: Host + ?Sized>(&mut self, host: &H, track: usize) {
        let releasing = host.is_any_releasing_on_track(track);
        self.stopping.retain(|clip| clip.track != track || releasing);
    }

    pub fn render_pads<H: Host + ?Sized>(&self, host: &H, state: &mut ViewState) {
        let palette = &self.palette;

        for &clip in &self.stopping {
            state.set_pad(
                self.offset.pad_for_clip(clip),
                Style::blinking(palette.dark_green),
            );
        }

        for clip in host.clips() {
            let color = if self.momentary.is_active() {
                if clip.launched {
                    palette.accent(clip.color)
                } else {
                    palette.light_gray
                }
            } else {
                self.clip_color(&clip)
            };
            state.set_pad(
                self.offset.pad_for_clip(clip.coord()),
                Style::new(color, clip_lighting(&clip)),
            );
        }

        for &clip in &self.highlighting {
            state.set_pad(self.offset.pad_for_clip(clip), Style::solid(palette.white));
        }

        for (button, mode) in [
            (Button::Delete, MomentaryMode::Clear),
            (Button::Duplicate, MomentaryMode::Duplicate),
            (Button::Quantize, MomentaryMode::Quantize),
        ] {
            let color = if self.momentary == mode {
                palette.white
            } else {
                palette.gray
            };
            state.set_button(button, Style::solid(color));
        }

        let max = host.max_track_and_slot();
        let arrows = [
            (Button::LeftArrow, self.offset.track > 0),
            (Button::RightArrow, self.offset.track < max.track),
            (Button::UpArrow, self.offset.slot > 0),
            (Button::DownArrow, self.offset.slot < max.slot),
        ];
        for (button, can_scroll) in arrows {
            if can_scroll {
                state.set_button(button, Style::solid(palette.light_gray));
            }
        }
    }

    /// Scene and track buttons, lit in every view.
    pub fn render_buttons<H: Host + ?Sized>(&self, host: &H, state: &mut ViewState) {
        let palette = &self.palette;

        for row in 0..self.layout.rows as usize {
            let Some(button) = Button::scene(row) else {
                continue;
            };
            let style = if host.is_bulk_triggering_on_slot(self.offset.slot + row) {
                Style::blinking(palette.green)
            } else {
                Style::solid(palette.light_gray)
            };
            state.set_button(button, style);
        }

        for col in 0..self.layout.cols as usize {
            let track = self.offset.track_for_column(col);
            let Some(button) = Button::below_pad(col) else {
                continue;
            };
            if !host.has_clip_on_track(track) {
                continue;
            }
            state.set_button(button, self.track_button_style(host, track));
        }

        let active = match self.input_mode {
            InputMode::Normal => None,
            InputMode::Stop => Some((Button::Stop, palette.red)),
            InputMode::Solo => Some((Button::Solo, palette.blue)),
            InputMode::Mute => Some((Button::Mute, palette.yellow)),
            InputMode::Record => Some((Button::Record, palette.red)),
        };
        for button in [Button::Stop, Button::Solo, Button::Mute, Button::Record] {
            let color = match active {
                Some((b, color)) if b == button => color,
                _ => palette.light_gray,
            };
            state.set_button(button, Style::solid(color));
        }
    }

    fn track_button_style<H: Host + ?Sized>(&self, host: &H, track: usize) -> Style {
        let palette = &self.palette;
        match self.input_mode {
            InputMode::Normal => Style::solid(palette.light_gray),
            InputMode::Stop => {
                let color = if host.is_any_not_stopped_on_track(track) {
                    palette.red
                } else {
                    palette.dark_red
                };
                let lighting = if host.is_bulk_releasing_on_track(track) {
                    Lighting::Blinking
                } else {
                    Lighting::Static
                };
                Style::new(color, lighting)
            }
            InputMode::Solo if host.is_all_soloing_on_track(track) => Style::solid(palette.blue),
            InputMode::Solo => Style::solid(palette.dark_blue),
            InputMode::Mute if host.is_all_muted_on_track(track) => {
                Style::solid(palette.dark_yellow)
            }
            InputMode::Mute => Style::solid(palette.yellow),
            InputMode::Record if host.is_any_recording_on_track(track) => {
                Style::solid(palette.red)
            }
            InputMode::Record => Style::solid(palette.dark_red),
        }
    }

    fn clip_color(&self, clip: &ClipInfo) -> Color {
        if clip.recording {
            self.palette.red
        } else if clip.will_start || clip.playing {
            self.palette.green
        } else {
            self.palette.accent(clip.color)
        }
    }
}

fn clip_lighting(clip: &ClipInfo) -> Lighting {
    if clip.will_start || clip.will_stop {
        Lighting::Blinking
    } else if clip.playing {
        Lighting::Pulsing
    } else {
        Lighting::Static
    }
}

fn apply_launch<H: Host + ?Sized>(host: &mut H, clip: &ClipInfo, behavior: LaunchBehavior) {
    let coord = clip.coord();
    if !clip.launched {
        if behavior.unlaunched == UnlaunchedAction::Trigger {
            host.execute(HostCommand::LaunchClip(coord));
        }
        return;
    }
    match behavior.launched {
        LaunchedAction::Noop => {}
        LaunchedAction::Retrigger => {
            host.execute(HostCommand::StopClip(coord));
            host.execute(HostCommand::LaunchClip(coord));
        }
        LaunchedAction::Release => host.execute(HostCommand::StopClip(coord)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PadCoord;

    #[derive(Default)]
    struct Recorder {
        clips: Vec<ClipInfo>,
        commands: Vec<HostCommand>,
    }

    impl Host for Recorder {
        fn clips(&self) -> Vec<ClipInfo> {
            self.clips.clone()
        }

        fn execute(&mut self, command: HostCommand) {
            self.commands.push(command);
        }
    }

    fn session() -> SessionMode {
        SessionMode::new(Layout::default(), Palette::default())
    }

    fn clip(track: usize, slot: usize) -> ClipInfo {
        ClipInfo {
            track,
            slot,
            ..Default::default()
        }
    }

    #[test]
    fn press_launches_and_release_follows_note_off_behavior() {
        let mut host = Recorder {
            clips: vec![ClipInfo {
                note_off: LaunchBehavior::NOOP,
                ..clip(0, 0)
            }],
            ..Default::default()
        };
        let mut session = session();

        session.press_pad(&mut host, ClipCoord::new(0, 0));
        session.release_pad(&mut host, ClipCoord::new(0, 0));
        assert_eq!(
            host.commands,
            vec![HostCommand::LaunchClip(ClipCoord::new(0, 0))]
        );
    }

    #[test]
    fn launched_clips_retrigger_or_release() {
        let retrigger = LaunchBehavior {
            unlaunched: UnlaunchedAction::Trigger,
            launched: LaunchedAction::Retrigger,
        };
        let mut host = Recorder {
            clips: vec![
                ClipInfo {
                    launched: true,
                    note_on: retrigger,
                    ..clip(0, 0)
                },
                ClipInfo {
                    launched: true,
                    ..clip(1, 0)
                },
            ],
            ..Default::default()
        };
        let mut session = session();

        session.press_pad(&mut host, ClipCoord::new(0, 0));
        session.press_pad(&mut host, ClipCoord::new(1, 0));
        assert_eq!(
            host.commands,
            vec![
                HostCommand::StopClip(ClipCoord::new(0, 0)),
                HostCommand::LaunchClip(ClipCoord::new(0, 0)),
                HostCommand::StopClip(ClipCoord::new(1, 0)),
            ]
        );
    }

    #[test]
    fn empty_slot_stops_a_playing_track() {
        let mut host = Recorder {
            clips: vec![ClipInfo {
                playing: true,
                ..clip(2, 0)
            }],
            ..Default::default()
        };
        let mut session = session();

        session.press_pad(&mut host, ClipCoord::new(2, 3));
        assert_eq!(host.commands, vec![HostCommand::StopTrack(2)]);
        assert!(session.stopping().contains(&ClipCoord::new(2, 3)));

        // still releasing: kept
        host.clips[0].will_stop = true;
        session.clip_updated(&host, 2);
        assert_eq!(session.stopping().len(), 1);

        host.clips[0].will_stop = false;
        host.clips[0].playing = false;
        session.clip_updated(&host, 2);
        assert!(session.stopping().is_empty());
    }

    #[test]
    fn record_mode_arms_and_disarms() {
        let mut host = Recorder {
            clips: vec![
                clip(0, 0),
                ClipInfo {
                    recording: true,
                    ..clip(1, 0)
                },
            ],
            ..Default::default()
        };
        let mut session = session();
        assert!(session.press_button(&mut host, Button::Record));
        assert_eq!(session.input_mode(), InputMode::Record);

        session.press_pad(&mut host, ClipCoord::new(0, 0));
        session.press_pad(&mut host, ClipCoord::new(1, 0));
        assert_eq!(
            host.commands,
            vec![
                HostCommand::ArmClip(ClipCoord::new(0, 0)),
                HostCommand::DisarmClip(ClipCoord::new(1, 0)),
            ]
        );

        session.press_button(&mut host, Button::Record);
        assert_eq!(session.input_mode(), InputMode::Normal);
    }

    #[test]
    fn track_buttons_act_per_input_mode() {
        let mut host = Recorder {
            clips: vec![clip(0, 2), ClipInfo { launched: true, ..clip(0, 5) }],
            ..Default::default()
        };
        let mut session = session();

        // normal mode and tracks without clips do nothing
        session.press_button(&mut host, Button::BelowPad1);
        session.press_button(&mut host, Button::Mute);
        session.press_button(&mut host, Button::BelowPad2);
        assert!(host.commands.is_empty());

        session.press_button(&mut host, Button::BelowPad1);
        session.press_button(&mut host, Button::Record);
        session.press_button(&mut host, Button::BelowPad1);
        session.press_button(&mut host, Button::Stop);
        session.press_button(&mut host, Button::BelowPad1);
        assert_eq!(
            host.commands,
            vec![
                HostCommand::MuteTrack(0),
                HostCommand::ArmClip(ClipCoord::new(0, 5)),
                HostCommand::StopTrack(0),
            ]
        );
    }

    #[test]
    fn scene_launch_marks_playing_tracks() {
        let mut host = Recorder {
            clips: vec![
                ClipInfo {
                    playing: true,
                    ..clip(1, 0)
                },
                ClipInfo {
                    playing: true,
                    ..clip(4, 2)
                },
            ],
            ..Default::default()
        };
        let mut session = session();

        assert!(session.press_button(&mut host, Button::Scene3));
        assert_eq!(host.commands, vec![HostCommand::LaunchScene(3)]);
        assert_eq!(
            session.stopping().iter().copied().collect::<Vec<_>>(),
            vec![ClipCoord::new(1, 3), ClipCoord::new(4, 3)]
        );
    }

    #[test]
    fn momentary_mode_highlights_and_acts_on_release() {
        let mut host = Recorder {
            clips: vec![clip(0, 0)],
            ..Default::default()
        };
        let mut session = session();

        session.press_button(&mut host, Button::Duplicate);
        session.press_pad(&mut host, ClipCoord::new(0, 0));
        assert!(session.highlighting().contains(&ClipCoord::new(0, 0)));
        assert!(host.commands.is_empty());

        let mut state = ViewState::new(false);
        session.render_pads(&host, &mut state);
        let palette = Palette::default();
        assert_eq!(state.pad(PadCoord::new(0, 0)), Some(Style::solid(palette.white)));
        assert_eq!(state.button(Button::Duplicate), Some(Style::solid(palette.white)));

        session.release_pad(&mut host, ClipCoord::new(0, 0));
        assert_eq!(
            host.commands,
            vec![HostCommand::DuplicatePattern(ClipCoord::new(0, 0))]
        );
        assert!(session.highlighting().is_empty());

        assert!(!session.release_button(Button::Quantize));
        assert!(session.release_button(Button::Duplicate));
        assert_eq!(session.momentary(), MomentaryMode::None);
    }

    #[test]
    fn scrolling_stays_within_host_bounds() {
        let mut host = Recorder {
            clips: vec![clip(2, 1)],
            ..Default::default()
        };
        let mut session = session();

        session.press_button(&mut host, Button::LeftArrow);
        session.press_button(&mut host, Button::DownArrow);
        session.press_button(&mut host, Button::DownArrow);
        session.press_button(&mut host, Button::RightArrow);
        assert_eq!(session.offset(), ScrollOffset { track: 1, slot: 1 });

        let mut state = ViewState::new(false);
        session.render_pads(&host, &mut state);
        assert_eq!(
            state.pad(PadCoord::new(0, 1)),
            Some(Style::solid(Palette::default().accent(0)))
        );
        assert!(state.button(Button::LeftArrow).is_some());
        assert!(state.button(Button::DownArrow).is_none());
    }

    #[test]
    fn clip_styles_follow_play_state() {
        let host = Recorder {
            clips: vec![
                ClipInfo {
                    color: 10,
                    ..clip(0, 0)
                },
                ClipInfo {
                    playing: true,
                    ..clip(1, 0)
                },
                ClipInfo {
                    will_start: true,
                    ..clip(2, 0)
                },
                ClipInfo {
                    playing: true,
                    recording: true,
                    ..clip(3, 0)
                },
            ],
            ..Default::default()
        };
        let palette = Palette::default();
        let mut state = ViewState::new(false);
        session().render_pads(&host, &mut state);

        assert_eq!(state.pad(PadCoord::new(0, 0)), Some(Style::solid(palette.accents[1])));
        assert_eq!(state.pad(PadCoord::new(0, 1)), Some(Style::pulsing(palette.green)));
        assert_eq!(state.pad(PadCoord::new(0, 2)), Some(Style::blinking(palette.green)));
        assert_eq!(state.pad(PadCoord::new(0, 3)), Some(Style::pulsing(palette.red)));
    }

    #[test]
    fn input_mode_buttons_reflect_the_mode() {
        let mut host = Recorder {
            clips: vec![ClipInfo {
                playing: true,
                ..clip(0, 0)
            }],
            ..Default::default()
        };
        let mut session = session();
        let palette = Palette::default();

        session.press_button(&mut host, Button::Stop);
        let mut state = ViewState::new(false);
        session.render_buttons(&host, &mut state);
        assert_eq!(state.button(Button::Stop), Some(Style::solid(palette.red)));
        assert_eq!(state.button(Button::Solo), Some(Style::solid(palette.light_gray)));
        assert_eq!(state.button(Button::BelowPad1), Some(Style::solid(palette.red)));
        assert_eq!(state.button(Button::BelowPad2), None);
        assert_eq!(state.button(Button::Scene0), Some(Style::solid(palette.light_gray)));
        assert_eq!(state.button(Button::Scene7), Some(Style::solid(palette.light_gray)));
    }
}
