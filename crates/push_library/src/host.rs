//! The DAW side of the controller: clip queries and the commands sent back.

use std::str::FromStr;

use crate::layout::ClipCoord;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum UnlaunchedAction {
    Noop,
    #[default]
    Trigger,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum LaunchedAction {
    Noop,
    Retrigger,
    #[default]
    Release,
}

/// What a pad press (or release) does to a clip, depending on whether the
/// clip is already launched.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct LaunchBehavior {
    pub unlaunched: UnlaunchedAction,
    pub launched: LaunchedAction,
}

impl LaunchBehavior {
    pub const NOOP: LaunchBehavior = LaunchBehavior {
        unlaunched: UnlaunchedAction::Noop,
        launched: LaunchedAction::Noop,
    };
}

impl FromStr for LaunchBehavior {
    type Err = String;

    /// Parses the host's notation, e.g. `"unlaunched:trigger, launched:release"`
    /// or just `"noop"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "noop" {
            return Ok(LaunchBehavior::NOOP);
        }

        let mut behavior = LaunchBehavior::NOOP;
        for part in s.split(',') {
            let Some((key, value)) = part.trim().split_once(':') else {
                return Err(format!("invalid launch behavior {s:?}"));
            };
            match (key.trim(), value.trim()) {
                ("unlaunched", "noop") => behavior.unlaunched = UnlaunchedAction::Noop,
                ("unlaunched", "trigger") => behavior.unlaunched = UnlaunchedAction::Trigger,
                ("launched", "noop") => behavior.launched = LaunchedAction::Noop,
                ("launched", "retrigger") => behavior.launched = LaunchedAction::Retrigger,
                ("launched", "release") => behavior.launched = LaunchedAction::Release,
                _ => return Err(format!("invalid launch behavior {s:?}")),
            }
        }
        Ok(behavior)
    }
}

/// Snapshot of one clip's state as reported by the host.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClipInfo {
    pub track: usize,
    pub slot: usize,
    /// Host color index.
    pub color: u32,
    pub playing: bool,
    pub launched: bool,
    pub recording: bool,
    pub will_start: bool,
    pub will_stop: bool,
    pub note_on: LaunchBehavior,
    pub note_off: LaunchBehavior,
}

impl ClipInfo {
    pub fn coord(&self) -> ClipCoord {
        ClipCoord::new(self.track, self.slot)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HostCommand {
    LaunchClip(ClipCoord),
    StopClip(ClipCoord),
    ArmClip(ClipCoord),
    DisarmClip(ClipCoord),
    ClearPattern(ClipCoord),
    DuplicatePattern(ClipCoord),
    ToggleQuantization(ClipCoord),
    StopTrack(usize),
    SoloTrack(usize),
    UnsoloTrack(usize),
    MuteTrack(usize),
    UnmuteTrack(usize),
    DisarmTrack(usize),
    LaunchScene(usize),
    NoteOn { note: u8, velocity: u8, channel: u8 },
    NoteOff { note: u8, velocity: u8, channel: u8 },
    PolyAftertouch { note: u8, pressure: u8, channel: u8 },
    ChannelAftertouch { pressure: u8, channel: u8 },
    PitchBend { value: u16, channel: u8 },
}

/// The DAW the controller drives. Missing clips are `None`, never errors.
///
/// Only [`Host::clips`] and [`Host::execute`] are required; the track and
/// slot predicates are derived from the clip list unless the host knows
/// better.
pub trait Host {
    fn clips(&self) -> Vec<ClipInfo>;

    fn execute(&mut self, command: HostCommand);

    fn clip(&self, track: usize, slot: usize) -> Option<ClipInfo> {
        self.clips()
            .into_iter()
            .find(|c| c.track == track && c.slot == slot)
    }

    /// Highest track and slot the grid may scroll to.
    fn max_track_and_slot(&self) -> ClipCoord {
        self.clips().iter().fold(ClipCoord::default(), |max, c| {
            ClipCoord::new(max.track.max(c.track), max.slot.max(c.slot))
        })
    }

    fn has_clip_on_track(&self, track: usize) -> bool {
        self.clips().iter().any(|c| c.track == track)
    }

    fn is_any_playing_on_track(&self, track: usize) -> bool {
        self.clips().iter().any(|c| c.track == track && c.playing)
    }

    fn is_any_triggering_on_track(&self, track: usize) -> bool {
        self.clips().iter().any(|c| c.track == track && c.will_start)
    }

    fn is_any_releasing_on_track(&self, track: usize) -> bool {
        self.clips().iter().any(|c| c.track == track && c.will_stop)
    }

    fn is_any_recording_on_track(&self, track: usize) -> bool {
        self.clips().iter().any(|c| c.track == track && c.recording)
    }

    fn is_any_not_stopped_on_track(&self, track: usize) -> bool {
        self.clips()
            .iter()
            .any(|c| c.track == track && (c.playing || c.will_start))
    }

    fn is_bulk_releasing_on_track(&self, track: usize) -> bool {
        self.is_any_releasing_on_track(track)
    }

    fn is_bulk_triggering_on_slot(&self, slot: usize) -> bool {
        self.clips().iter().any(|c| c.slot == slot && c.will_start)
    }

    fn is_all_soloing_on_track(&self, _track: usize) -> bool {
        false
    }

    fn is_all_muted_on_track(&self, _track: usize) -> bool {
        false
    }

    fn all_playing_tracks(&self) -> Vec<usize> {
        let mut tracks: Vec<usize> = self
            .clips()
            .iter()
            .filter(|c| c.playing)
            .map(|c| c.track)
            .collect();
        tracks.sort_unstable();
        tracks.dedup();
        tracks
    }

    fn launched_clip_with_lowest_slot_on_track(&self, track: usize) -> Option<ClipInfo> {
        self.clips()
            .into_iter()
            .filter(|c| c.track == track && c.launched)
            .min_by_key(|c| c.slot)
    }

    fn clip_with_lowest_slot_on_track(&self, track: usize) -> Option<ClipInfo> {
        self.clips()
            .into_iter()
            .filter(|c| c.track == track)
            .min_by_key(|c| c.slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Clips(Vec<ClipInfo>);

    impl Host for Clips {
        fn clips(&self) -> Vec<ClipInfo> {
            self.0.clone()
        }

        fn execute(&mut self, _command: HostCommand) {}
    }

    #[test]
    fn parses_launch_behaviors() {
        assert_eq!("noop".parse::<LaunchBehavior>(), Ok(LaunchBehavior::NOOP));
        assert_eq!(
            "unlaunched:trigger, launched:retrigger".parse::<LaunchBehavior>(),
            Ok(LaunchBehavior {
                unlaunched: UnlaunchedAction::Trigger,
                launched: LaunchedAction::Retrigger,
            })
        );
        assert_eq!(
            "unlaunched:noop, launched:release".parse::<LaunchBehavior>(),
            Ok(LaunchBehavior {
                unlaunched: UnlaunchedAction::Noop,
                launched: LaunchedAction::Release,
            })
        );
        assert!("launched:sometimes".parse::<LaunchBehavior>().is_err());
    }

    #[test]
    fn scroll_bounds_start_at_the_origin() {
        assert_eq!(Clips(Vec::new()).max_track_and_slot(), ClipCoord::new(0, 0));

        let host = Clips(vec![
            ClipInfo {
                track: 5,
                slot: 1,
                ..Default::default()
            },
            ClipInfo {
                track: 2,
                slot: 9,
                ..Default::default()
            },
        ]);
        assert_eq!(host.max_track_and_slot(), ClipCoord::new(5, 9));
    }

    #[test]
    fn derived_queries_follow_the_clip_list() {
        let host = Clips(vec![
            ClipInfo {
                track: 1,
                slot: 4,
                playing: true,
                launched: true,
                ..Default::default()
            },
            ClipInfo {
                track: 1,
                slot: 2,
                ..Default::default()
            },
            ClipInfo {
                track: 3,
                slot: 0,
                will_start: true,
                ..Default::default()
            },
        ]);

        assert!(host.clip(1, 2).is_some());
        assert!(host.clip(2, 2).is_none());
        assert_eq!(host.max_track_and_slot(), ClipCoord::new(3, 4));
        assert!(host.is_any_playing_on_track(1));
        assert!(!host.is_any_playing_on_track(3));
        assert!(host.is_any_triggering_on_track(3));
        assert!(host.is_bulk_triggering_on_slot(0));
        assert_eq!(host.all_playing_tracks(), vec![1]);
        assert_eq!(host.clip_with_lowest_slot_on_track(1).map(|c| c.slot), Some(2));
        assert_eq!(
            host.launched_clip_with_lowest_slot_on_track(1).map(|c| c.slot),
            Some(4)
        );
    }
}
