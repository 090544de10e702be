use serde::Deserialize;

use crate::layout::Layout;
use crate::lights::{LightingChannels, Palette};

/// Device constants handed to everything that addresses or colors the
/// hardware. Defaults describe a Push 2.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeviceProfile {
    pub layout: Layout,
    pub palette: Palette,
    pub lighting: LightingChannels,
}
