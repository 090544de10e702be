use push_library::DeviceProfile;
use push_library::errors::ScaleError;
use push_library::modes::note::MAX_OCTAVE;
use push_library::scale::{Mode, Scale};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
#[serde(default)]
pub(crate) struct Settings {
    pub client_name: String,
    /// Matched against the MIDI port names of the controller; the Push 2
    /// shows up as e.g. "Ableton Push 2:Ableton Push 2 Live Port 20:0".
    pub device_port: String,
    /// Virtual output port the played notes are forwarded to.
    pub daw_port_name: String,
    pub tonic: String,
    /// Preset name ("major", "dorian", ...) or interval string ("MmMMMmM").
    pub mode: String,
    /// Initial octave shift of the note layout, 0 to 4.
    pub octave: u8,
    pub led_brightness: u8,
    /// Send the pad velocity curve on connect.
    pub calibrate_pads: bool,
    pub profile: DeviceProfile,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            client_name: "Push 2 Driver".to_string(),
            device_port: "Ableton Push 2".to_string(),
            daw_port_name: "Push 2 Notes".to_string(),
            tonic: "C".to_string(),
            mode: "major".to_string(),
            octave: 0,
            led_brightness: 0x3C,
            calibrate_pads: true,
            profile: DeviceProfile::default(),
        }
    }
}

impl Settings {
    pub(crate) fn scale(&self) -> Result<Scale, ScaleError> {
        let mode: Mode = self.mode.parse()?;
        Scale::new(&self.tonic, mode)
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.client_name.is_empty() {
            return Err("Client name must not be empty".to_string());
        }

        if self.device_port.is_empty() {
            return Err("Device port must not be empty".to_string());
        }

        if self.daw_port_name.is_empty() {
            return Err("DAW port name must not be empty".to_string());
        }

        if self.led_brightness > 127 {
            return Err(format!(
                "led_brightness should be 0 to 127 (found {})",
                self.led_brightness
            ));
        }

        if self.octave > MAX_OCTAVE {
            return Err(format!(
                "octave should be 0 to {MAX_OCTAVE} (found {})",
                self.octave
            ));
        }

        let scale = self.scale().map_err(|e| e.to_string())?;
        if !scale.mode().fits_grid() {
            return Err(format!(
                "mode {} has {} notes, the note layout needs 7",
                scale.mode(),
                scale.mode().len()
            ));
        }

        self.profile
            .layout
            .validate()
            .map_err(|e| format!("profile.{e}"))?;

        Ok(())
    }
}
