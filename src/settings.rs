// persisted user preferences and the default-first merge applied on load

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("stored settings are not an object")]
    NotAnObject,
    #[error("stored settings are malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    #[default]
    Ru,
}

impl Lang {
    pub fn as_str(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ru => "ru",
        }
    }
}

/// outline thickness of the shell root, in pixels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum BorderPx {
    None,
    One,
    Two,
    #[default]
    Three,
}

impl BorderPx {
    pub const ALL: [BorderPx; 4] = [BorderPx::None, BorderPx::One, BorderPx::Two, BorderPx::Three];

    pub fn px(self) -> u8 {
        match self {
            BorderPx::None => 0,
            BorderPx::One => 1,
            BorderPx::Two => 2,
            BorderPx::Three => 3,
        }
    }
}

impl TryFrom<u8> for BorderPx {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(BorderPx::None),
            1 => Ok(BorderPx::One),
            2 => Ok(BorderPx::Two),
            3 => Ok(BorderPx::Three),
            other => Err(format!("border width must be 0-3, got {other}")),
        }
    }
}

impl From<BorderPx> for u8 {
    fn from(value: BorderPx) -> Self {
        value.px()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ribbon {
    pub enabled: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for Ribbon {
    fn default() -> Self {
        Self {
            enabled: false,
            width: 480,
            height: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub lang: Lang,
    pub show_address: bool,
    /// kept for the stored format, nothing renders tabs yet
    pub show_tabs: bool,
    pub on_top: bool,
    pub remember_session: bool,
    pub border_px: BorderPx,
    pub ribbon: Ribbon,
    pub hud: bool,
    pub snap: bool,
    pub bookmarks: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lang: Lang::Ru,
            show_address: true,
            show_tabs: true,
            on_top: false,
            remember_session: true,
            border_px: BorderPx::Three,
            ribbon: Ribbon::default(),
            hud: false,
            snap: false,
            bookmarks: vec!["https://www.google.com".to_string()],
        }
    }
}

impl Settings {
    /// Rebuild settings from a stored payload.
    ///
    /// Top-level keys of the stored object replace the defaults one by one;
    /// nested records are replaced whole. `null` means nothing was stored.
    /// Anything that does not deserialize after the merge is an error, and
    /// callers are expected to fall back to [`Settings::default`] entirely.
    pub fn from_stored(stored: Value) -> Result<Self, SettingsError> {
        let fields = match stored {
            Value::Null => return Ok(Self::default()),
            Value::Object(fields) => fields,
            _ => return Err(SettingsError::NotAnObject),
        };

        let Value::Object(mut merged) = serde_json::to_value(Self::default())? else {
            return Err(SettingsError::NotAnObject);
        };
        for (key, value) in fields {
            merged.insert(key, value);
        }

        Ok(serde_json::from_value(Value::Object(merged))?)
    }

    /// like [`Settings::from_stored`] but never fails
    pub fn from_stored_or_default(stored: Value) -> Self {
        Self::from_stored(stored).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring stored settings, using defaults");
            Self::default()
        })
    }
}
