// ribbonshell: frameless always-on-top browser shell with a ribbon mode

pub mod backend;
pub mod chrome;
pub mod config;
pub mod host;
pub mod hotkeys;
pub mod logging;
pub mod nav;
pub mod panel;
pub mod settings;
pub mod shell;
pub mod storage;
pub mod store;
pub mod windows;

#[cfg(feature = "desktop")]
pub mod desktop;

#[cfg(test)]
mod testing;

pub use backend::HostServices;
pub use config::AppConfig;
pub use host::{Backend, HostError, ShellView, WindowControl, WindowSpawner};
pub use panel::{LaunchMode, PanelController};
pub use settings::Settings;
pub use shell::{ShellController, ShellParts};
pub use storage::Storage;
pub use store::SettingsStore;
