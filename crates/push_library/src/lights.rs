use serde::Deserialize;

/// Index into the controller's color palette.
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u8);

impl Color {
    pub const OFF: Color = Color(0);

    pub fn id(self) -> u8 {
        self.0
    }
}

impl From<u8> for Color {
    fn from(id: u8) -> Self {
        Self(id & 0x7f)
    }
}

#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lighting {
    #[default]
    Static = 0,
    Blinking = 1,
    Pulsing = 2,
}

/// MIDI channels selecting the LED animation. The device reads the lighting
/// mode from the channel nibble of the status byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LightingChannels {
    pub static_channel: u8,
    /// Blinking at 1/4 note.
    pub blinking_channel: u8,
    /// Pulsing at 1/4 note.
    pub pulsing_channel: u8,
}

impl Default for LightingChannels {
    fn default() -> Self {
        Self {
            static_channel: 0,
            blinking_channel: 14,
            pulsing_channel: 9,
        }
    }
}

impl LightingChannels {
    pub fn channel(&self, lighting: Lighting) -> u8 {
        let ch = match lighting {
            Lighting::Static => self.static_channel,
            Lighting::Blinking => self.blinking_channel,
            Lighting::Pulsing => self.pulsing_channel,
        };
        ch & 0x0f
    }
}

/// A color and lighting pair describing how one pad or button is lit.
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq)]
pub struct Style {
    pub color: Color,
    pub lighting: Lighting,
}

impl Style {
    pub const OFF: Style = Style {
        color: Color::OFF,
        lighting: Lighting::Static,
    };

    pub fn new(color: Color, lighting: Lighting) -> Self {
        Self { color, lighting }
    }

    pub fn solid(color: Color) -> Self {
        Self::new(color, Lighting::Static)
    }

    pub fn blinking(color: Color) -> Self {
        Self::new(color, Lighting::Blinking)
    }

    pub fn pulsing(color: Color) -> Self {
        Self::new(color, Lighting::Pulsing)
    }

    pub fn is_off(&self) -> bool {
        self.color == Color::OFF
    }
}

/// Named palette entries. Defaults are the Push 2 factory palette.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub off: Color,
    pub gray: Color,
    pub light_gray: Color,
    pub white: Color,
    pub light_red: Color,
    pub red: Color,
    pub dark_red: Color,
    pub light_orange: Color,
    pub orange: Color,
    pub dark_orange: Color,
    pub light_yellow: Color,
    pub yellow: Color,
    pub dark_yellow: Color,
    pub light_green: Color,
    pub green: Color,
    pub dark_green: Color,
    pub light_blue: Color,
    pub blue: Color,
    pub dark_blue: Color,
    /// Clip colors, indexed by the host's clip color modulo the length.
    pub accents: [Color; 9],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            off: Color(0),
            gray: Color(54),
            light_gray: Color(53),
            white: Color(120),
            light_red: Color(1),
            red: Color(127),
            dark_red: Color(2),
            light_orange: Color(5),
            orange: Color(69),
            dark_orange: Color(3),
            light_yellow: Color(30),
            yellow: Color(29),
            dark_yellow: Color(8),
            light_green: Color(10),
            green: Color(126),
            dark_green: Color(11),
            light_blue: Color(95),
            blue: Color(99),
            dark_blue: Color(126),
            accents: [
                Color(33),
                Color(22),
                Color(79),
                Color(93),
                Color(111),
                Color(35),
                Color(44),
                Color(87),
                Color(115),
            ],
        }
    }
}

impl Palette {
    pub fn accent(&self, clip_color: u32) -> Color {
        self.accents[clip_color as usize % self.accents.len()]
    }
}
