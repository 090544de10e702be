mod device;
mod midi_host;
mod settings;

use crate::device::Device;
use crate::midi_host::MidiHost;
use crate::settings::Settings;
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use config::Config;
use crossbeam_channel::{Receiver, unbounded};
use log::{debug, info, warn};
use midir::os::unix::VirtualOutput;
use midir::{Ignore, MidiInput, MidiInputConnection, MidiInputPort, MidiOutput, MidiOutputPort};
use push_library::host::Host;
use push_library::{Controller, InputEvent};

#[derive(Parser, Debug)]
#[clap(
    name = "Ableton Push 2 grid controller driver",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
)]
struct Args {
    #[clap(short, long, help = "Config file (see example_config.toml)")]
    config: Option<String>,

    #[clap(short, long, help = "List MIDI ports and exit")]
    list_ports: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut cfg = Config::builder();

    if let Some(config_fn) = args.config {
        cfg = cfg.add_source(config::File::with_name(config_fn.as_str()));
    }

    let cfg = cfg.build().context("Can't create settings")?;
    let settings: Settings = cfg.try_deserialize().context("Can't parse settings")?;

    settings.validate().map_err(|e| anyhow!(e))?;

    if args.list_ports {
        return list_ports(&settings.client_name);
    }

    info!("Running with settings: {settings:?}");

    // Virtual port for the played notes
    let daw_output = MidiOutput::new(&format!("{} Notes", settings.client_name))
        .map_err(|e| anyhow!("Couldn't open MIDI output: {e}"))?;
    let daw_port = daw_output
        .create_virtual(&settings.daw_port_name)
        .map_err(|e| anyhow!("Couldn't create virtual output port: {e}"))?;

    let device_output = MidiOutput::new(&format!("{} Out", settings.client_name))
        .map_err(|e| anyhow!("Couldn't open MIDI output: {e}"))?;
    let out_port = find_output_port(&device_output, &settings.device_port)?;
    let device_port = device_output
        .connect(&out_port, "push-driver-out")
        .map_err(|e| anyhow!("Couldn't connect to {}: {e}", settings.device_port))?;

    let (events, _input_connection) = create_midi_input(&settings)?;

    let scale = settings.scale().context("Invalid scale")?;
    let mut controller = Controller::new(MidiHost::new(daw_port), settings.profile, scale);
    controller.note_mode_mut().set_octave(settings.octave);

    let mut device = Device::new(device_port, settings.profile);
    device.connect(&mut controller, &settings)?;

    main_loop(&events, &mut controller, &mut device)
}

fn list_ports(client_name: &str) -> Result<()> {
    let input = MidiInput::new(&format!("{client_name} probe"))
        .map_err(|e| anyhow!("Couldn't open MIDI input: {e}"))?;
    let output = MidiOutput::new(&format!("{client_name} probe"))
        .map_err(|e| anyhow!("Couldn't open MIDI output: {e}"))?;

    println!("Inputs:");
    for port in input.ports() {
        println!("  {}", input.port_name(&port).unwrap_or_default());
    }
    println!("Outputs:");
    for port in output.ports() {
        println!("  {}", output.port_name(&port).unwrap_or_default());
    }
    Ok(())
}

fn find_output_port(output: &MidiOutput, name: &str) -> Result<MidiOutputPort> {
    output
        .ports()
        .into_iter()
        .find(|port| {
            output
                .port_name(port)
                .is_ok_and(|port_name| port_name.contains(name))
        })
        .with_context(|| format!("No MIDI output port matching \"{name}\" (try --list-ports)"))
}

fn find_input_port(input: &MidiInput, name: &str) -> Result<MidiInputPort> {
    input
        .ports()
        .into_iter()
        .find(|port| {
            input
                .port_name(port)
                .is_ok_and(|port_name| port_name.contains(name))
        })
        .with_context(|| format!("No MIDI input port matching \"{name}\" (try --list-ports)"))
}

/// Connects to the controller's input port. The callback decodes messages and
/// hands them to the main loop, which owns the controller.
fn create_midi_input(settings: &Settings) -> Result<(Receiver<InputEvent>, MidiInputConnection<()>)> {
    let mut midi_input = MidiInput::new(&format!("{} In", settings.client_name))
        .map_err(|e| anyhow!("Couldn't open MIDI input: {e}"))?;
    midi_input.ignore(Ignore::TimeAndActiveSense);
    let in_port = find_input_port(&midi_input, &settings.device_port)?;

    let (tx, rx) = unbounded();
    let connection = midi_input
        .connect(
            &in_port,
            "push-driver-in",
            move |timestamp, message, _| {
                let Some(event) = InputEvent::from_midi(message, timestamp) else {
                    debug!("Ignoring {message:02X?}");
                    return;
                };
                if tx.send(event).is_err() {
                    warn!("Main loop has stopped, dropping {event:?}");
                }
            },
            (),
        )
        .map_err(|e| anyhow!("Couldn't connect to {}: {e}", settings.device_port))?;

    Ok((rx, connection))
}

fn main_loop<H: Host>(
    events: &Receiver<InputEvent>,
    controller: &mut Controller<H>,
    device: &mut Device,
) -> Result<()> {
    for event in events.iter() {
        let commands = controller.handle(event);
        device.send_lights(&commands)?;
    }
    Ok(())
}
