//! SysEx payloads sent once when the device connects.

const SYSEX_START: u8 = 0xF0;
const SYSEX_END: u8 = 0xF7;
/// Ableton manufacturer id, device id and model id.
const HEADER: [u8; 5] = [0x00, 0x21, 0x1D, 0x01, 0x01];

const SET_LED_BRIGHTNESS: u8 = 0x06;
const SET_PAD_PARAMETERS: u8 = 0x1B;
const SET_VELOCITY_CURVE: u8 = 0x20;

/// Entries per velocity curve message.
const CURVE_CHUNK: usize = 16;

/// Output velocity for each of the 128 pad pressure levels. Light touches
/// register, anything past the first third plays at full velocity.
pub const VELOCITY_CURVE: [u8; 128] = {
    let head: [u8; 41] = [
        0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x10, 0x18, 0x1E, 0x23, 0x28, 0x2C, 0x2F, 0x33, 0x36,
        0x39, 0x3C, 0x3E, 0x41, 0x44, 0x46, 0x49, 0x4B, 0x4E, 0x50, 0x52, 0x55, 0x57, 0x59, 0x5C,
        0x5E, 0x61, 0x63, 0x66, 0x68, 0x6B, 0x6E, 0x71, 0x74, 0x77, 0x7C,
    ];
    let mut curve = [0x7F; 128];
    let mut i = 0;
    while i < head.len() {
        curve[i] = head[i];
        i += 1;
    }
    curve
};

/// Pad threshold and sensitivity parameters.
pub const PAD_PARAMETERS: [u8; 8] = [0x21, 0x00, 0x1F, 0x00, 0x44, 0x09, 0x22, 0x0C];

pub const DEFAULT_LED_BRIGHTNESS: u8 = 0x3C;

/// Frames a device command as a SysEx message.
pub fn sysex(command: u8, payload: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(HEADER.len() + payload.len() + 3);
    message.push(SYSEX_START);
    message.extend_from_slice(&HEADER);
    message.push(command);
    message.extend_from_slice(payload);
    message.push(SYSEX_END);
    message
}

/// The velocity curve in chunks, followed by the pad parameters.
pub fn pad_calibration() -> Vec<Vec<u8>> {
    let mut messages: Vec<Vec<u8>> = VELOCITY_CURVE
        .chunks(CURVE_CHUNK)
        .enumerate()
        .map(|(i, chunk)| {
            let mut payload = Vec::with_capacity(CURVE_CHUNK + 1);
            payload.push((i * CURVE_CHUNK) as u8);
            payload.extend_from_slice(chunk);
            sysex(SET_VELOCITY_CURVE, &payload)
        })
        .collect();
    messages.push(sysex(SET_PAD_PARAMETERS, &PAD_PARAMETERS));
    messages
}

pub fn led_brightness(brightness: u8) -> Vec<u8> {
    sysex(SET_LED_BRIGHTNESS, &[brightness & 0x7F])
}

/// Everything sent on connect, in order.
pub fn connect_messages(brightness: u8, calibrate_pads: bool) -> Vec<Vec<u8>> {
    let mut messages = if calibrate_pads {
        pad_calibration()
    } else {
        Vec::new()
    };
    messages.push(led_brightness(brightness));
    messages
}
