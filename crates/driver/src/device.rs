use anyhow::{Result, anyhow};
use log::{debug, info};
use midir::MidiOutputConnection;
use push_library::calibration;
use push_library::host::Host;
use push_library::{Controller, DeviceProfile, LightCommand};

use crate::settings::Settings;

/// Output side of the controller: LED messages and SysEx.
pub(crate) struct Device {
    port: MidiOutputConnection,
    profile: DeviceProfile,
}

impl Device {
    pub(crate) fn new(port: MidiOutputConnection, profile: DeviceProfile) -> Self {
        Self { port, profile }
    }

    fn send(&mut self, message: &[u8]) -> Result<()> {
        self.port
            .send(message)
            .map_err(|e| anyhow!("Couldn't send to device: {e}"))
    }

    pub(crate) fn send_lights(&mut self, commands: &[LightCommand]) -> Result<()> {
        for command in commands {
            if let Some(message) = command.encode(&self.profile) {
                self.send(&message)?;
            }
        }
        Ok(())
    }

    /// Calibrates the pads, sets the LED brightness and lights the initial
    /// view from a cleared device.
    pub(crate) fn connect<H: Host>(
        &mut self,
        controller: &mut Controller<H>,
        settings: &Settings,
    ) -> Result<()> {
        let messages =
            calibration::connect_messages(settings.led_brightness, settings.calibrate_pads);
        debug!("Sending {} connect messages", messages.len());
        for message in &messages {
            self.send(message)?;
        }

        let commands = controller.render(true);
        self.send_lights(&commands)?;
        info!("Device ready, {} LEDs initialised", commands.len());
        Ok(())
    }
}
