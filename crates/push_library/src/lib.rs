//! Grid controller logic for the Ableton Push 2: scales and the in-key pad
//! layout, per-view pad state, and the diff engine that turns view states
//! into LED messages.

pub mod calibration;
pub mod controller;
pub mod controls;
pub mod diff;
pub mod errors;
pub mod events;
pub mod host;
pub mod layout;
pub mod lights;
pub mod modes;
pub mod profile;
pub mod scale;
pub mod view_state;

pub use controller::{Controller, ViewMode};
pub use controls::Button;
pub use diff::LightCommand;
pub use events::InputEvent;
pub use host::{ClipInfo, Host, HostCommand};
pub use profile::DeviceProfile;
pub use scale::{Mode, Scale};
