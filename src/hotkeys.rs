// fixed keyboard bindings of the shell window

use serde::Deserialize;

/// keydown as forwarded by the page
#[derive(Debug, Clone, Deserialize, Default)]
pub struct KeyEvent {
    pub key: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hotkey {
    /// modifier+T
    ToggleOnTop,
    /// modifier+O
    CycleOpacity,
    /// modifier+L
    RevealAddress,
}

impl Hotkey {
    /// Ctrl and Cmd both count as the modifier; the key is case-insensitive.
    pub fn from_event(event: &KeyEvent) -> Option<Self> {
        if !(event.ctrl || event.meta) {
            return None;
        }
        match event.key.to_lowercase().as_str() {
            "t" => Some(Hotkey::ToggleOnTop),
            "o" => Some(Hotkey::CycleOpacity),
            "l" => Some(Hotkey::RevealAddress),
            _ => None,
        }
    }
}
