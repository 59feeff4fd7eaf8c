// contracts for the backend, the native window, the shell document and window spawning

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::chrome::StylePatch;
use crate::settings::Settings;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("backend command failed: {0}")]
    Backend(String),
    #[error("window call failed: {0}")]
    Window(String),
    #[error("window '{0}' is already open")]
    LabelTaken(String),
}

impl HostError {
    pub fn backend(e: impl std::fmt::Display) -> Self {
        Self::Backend(e.to_string())
    }

    pub fn window(e: impl std::fmt::Display) -> Self {
        Self::Window(e.to_string())
    }
}

/// physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonitorBounds {
    pub position: Position,
    pub size: Size,
}

/// Geometry and chrome flags for a secondary window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    /// app-relative page to load
    pub url: String,
    pub position: Position,
    pub width: u32,
    pub height: u32,
    pub decorations: bool,
    pub transparent: bool,
    pub always_on_top: bool,
    pub skip_taskbar: bool,
    pub resizable: bool,
}

#[async_trait]
pub trait Backend: Send + Sync {
    /// raw stored settings, `null` when nothing was stored yet
    async fn read_settings(&self) -> Result<Value, HostError>;
    async fn write_settings(&self, value: &Settings) -> Result<(), HostError>;
    async fn append_history(&self, url: &str) -> Result<(), HostError>;
    /// most recent url, empty when there is none
    async fn last_url(&self) -> Result<String, HostError>;
    async fn cycle_opacity(&self) -> Result<f64, HostError>;
    async fn set_ignore_cursor(&self, ignore: bool) -> Result<(), HostError>;
    async fn clear_cache(&self, hard: bool) -> Result<(), HostError>;
    async fn clear_history(&self) -> Result<(), HostError>;
}

#[async_trait]
pub trait WindowControl: Send + Sync {
    async fn is_always_on_top(&self) -> Result<bool, HostError>;
    async fn set_always_on_top(&self, on: bool) -> Result<(), HostError>;
    async fn set_opacity(&self, opacity: f64) -> Result<(), HostError>;
    async fn outer_position(&self) -> Result<Position, HostError>;
    async fn outer_size(&self) -> Result<Size, HostError>;
    async fn set_logical_size(&self, width: f64, height: f64) -> Result<(), HostError>;
    async fn set_position(&self, position: Position) -> Result<(), HostError>;
    /// bounds of the monitor holding the window, if the platform knows it
    async fn current_monitor(&self) -> Result<Option<MonitorBounds>, HostError>;
    async fn close(&self) -> Result<(), HostError>;
    /// run a script in the page context
    async fn eval(&self, script: &str) -> Result<(), HostError>;
}

/// The shell document: start page, address field and styled regions.
#[async_trait]
pub trait ShellView: Send + Sync {
    async fn set_home_visible(&self, visible: bool) -> Result<(), HostError>;
    async fn set_address(&self, url: &str) -> Result<(), HostError>;
    async fn focus_address(&self) -> Result<(), HostError>;
    async fn apply_style(&self, patch: &StylePatch) -> Result<(), HostError>;
}

#[async_trait]
pub trait SecondaryWindow: Send + Sync {
    async fn focus(&self) -> Result<(), HostError>;
    /// false once the user closed it
    async fn is_open(&self) -> bool;
}

#[async_trait]
pub trait WindowSpawner: Send + Sync {
    async fn spawn(
        &self,
        label: &str,
        spec: &WindowSpec,
    ) -> Result<Arc<dyn SecondaryWindow>, HostError>;
}
