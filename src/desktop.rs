// tauri adapters for the host contracts, commands for the shell pages, and app bootstrap

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tauri::webview::PageLoadEvent;
use tauri::{AppHandle, Manager, State, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use tracing::{debug, error, info, warn};

use crate::backend::HostServices;
use crate::chrome::StylePatch;
use crate::config::AppConfig;
use crate::host::{
    Backend, HostError, MonitorBounds, Position, SecondaryWindow, ShellView, Size,
    WindowControl, WindowSpawner, WindowSpec,
};
use crate::hotkeys::{Hotkey, KeyEvent};
use crate::panel::{LaunchMode, PanelController, PanelInput};
use crate::settings::Settings;
use crate::shell::{ShellController, ShellParts};
use crate::storage::Storage;
use crate::store::SettingsStore;

pub const MAIN_LABEL: &str = "main";

// --- window adapters ---

pub struct TauriWindow {
    window: WebviewWindow,
}

impl TauriWindow {
    pub fn new(window: WebviewWindow) -> Self {
        Self { window }
    }
}

#[async_trait]
impl WindowControl for TauriWindow {
    async fn is_always_on_top(&self) -> Result<bool, HostError> {
        self.window.is_always_on_top().map_err(HostError::window)
    }

    async fn set_always_on_top(&self, on: bool) -> Result<(), HostError> {
        self.window.set_always_on_top(on).map_err(HostError::window)
    }

    // tauri has no native window alpha, so fade the document instead
    async fn set_opacity(&self, opacity: f64) -> Result<(), HostError> {
        let script = format!("document.documentElement.style.opacity = \"{opacity}\";");
        self.window.eval(&script).map_err(HostError::window)
    }

    async fn outer_position(&self) -> Result<Position, HostError> {
        let pos = self.window.outer_position().map_err(HostError::window)?;
        Ok(Position { x: pos.x, y: pos.y })
    }

    async fn outer_size(&self) -> Result<Size, HostError> {
        let size = self.window.outer_size().map_err(HostError::window)?;
        Ok(Size {
            width: size.width,
            height: size.height,
        })
    }

    async fn set_logical_size(&self, width: f64, height: f64) -> Result<(), HostError> {
        self.window
            .set_size(tauri::Size::Logical(tauri::LogicalSize::new(width, height)))
            .map_err(HostError::window)
    }

    async fn set_position(&self, position: Position) -> Result<(), HostError> {
        self.window
            .set_position(tauri::Position::Physical(tauri::PhysicalPosition::new(
                position.x, position.y,
            )))
            .map_err(HostError::window)
    }

    async fn current_monitor(&self) -> Result<Option<MonitorBounds>, HostError> {
        let monitor = self.window.current_monitor().map_err(HostError::window)?;
        Ok(monitor.map(|m| MonitorBounds {
            position: Position {
                x: m.position().x,
                y: m.position().y,
            },
            size: Size {
                width: m.size().width,
                height: m.size().height,
            },
        }))
    }

    async fn close(&self) -> Result<(), HostError> {
        self.window.close().map_err(HostError::window)
    }

    async fn eval(&self, script: &str) -> Result<(), HostError> {
        self.window.eval(script).map_err(HostError::window)
    }
}

/// the shell document inside the main window, driven by scripts
pub struct TauriView {
    window: WebviewWindow,
}

impl TauriView {
    fn run(&self, script: &str) -> Result<(), HostError> {
        self.window.eval(script).map_err(HostError::window)
    }
}

#[async_trait]
impl ShellView for TauriView {
    async fn set_home_visible(&self, visible: bool) -> Result<(), HostError> {
        let display = if visible { "" } else { "none" };
        self.run(&format!(
            "(function(){{var h=document.getElementById(\"home\");if(h)h.style.display=\"{display}\";}})();"
        ))
    }

    async fn set_address(&self, url: &str) -> Result<(), HostError> {
        let literal = Value::from(url).to_string();
        self.run(&format!(
            "(function(){{var u=document.getElementById(\"url\");if(u)u.value={literal};}})();"
        ))
    }

    async fn focus_address(&self) -> Result<(), HostError> {
        self.run("(function(){var u=document.getElementById(\"url\");if(u)u.focus();})();")
    }

    async fn apply_style(&self, patch: &StylePatch) -> Result<(), HostError> {
        self.run(&patch.to_script())
    }
}

pub struct TauriSecondary {
    app: AppHandle,
    label: String,
}

#[async_trait]
impl SecondaryWindow for TauriSecondary {
    async fn focus(&self) -> Result<(), HostError> {
        let window = self
            .app
            .get_webview_window(&self.label)
            .ok_or_else(|| HostError::Window(format!("window '{}' is gone", self.label)))?;
        window.set_focus().map_err(HostError::window)
    }

    async fn is_open(&self) -> bool {
        self.app.get_webview_window(&self.label).is_some()
    }
}

pub struct TauriSpawner {
    app: AppHandle,
    /// window whose scale factor converts the physical spec position
    anchor: WebviewWindow,
}

#[async_trait]
impl WindowSpawner for TauriSpawner {
    async fn spawn(
        &self,
        label: &str,
        spec: &WindowSpec,
    ) -> Result<Arc<dyn SecondaryWindow>, HostError> {
        if self.app.get_webview_window(label).is_some() {
            return Err(HostError::LabelTaken(label.to_string()));
        }
        let scale = self.anchor.scale_factor().unwrap_or(1.0);

        WebviewWindowBuilder::new(&self.app, label, WebviewUrl::App(spec.url.clone().into()))
            .title("Settings")
            .inner_size(f64::from(spec.width), f64::from(spec.height))
            .position(f64::from(spec.position.x) / scale, f64::from(spec.position.y) / scale)
            .decorations(spec.decorations)
            .transparent(spec.transparent)
            .always_on_top(spec.always_on_top)
            .skip_taskbar(spec.skip_taskbar)
            .resizable(spec.resizable)
            .build()
            .map_err(HostError::window)?;

        Ok(Arc::new(TauriSecondary {
            app: self.app.clone(),
            label: label.to_string(),
        }))
    }
}

/// backend commands bound to the shell window
pub struct DesktopBackend {
    services: Arc<HostServices>,
    window: WebviewWindow,
}

#[async_trait]
impl Backend for DesktopBackend {
    async fn read_settings(&self) -> Result<Value, HostError> {
        self.services.read_settings().map_err(HostError::backend)
    }

    async fn write_settings(&self, value: &Settings) -> Result<(), HostError> {
        self.services.write_settings(value).map_err(HostError::backend)
    }

    async fn append_history(&self, url: &str) -> Result<(), HostError> {
        self.services.append_history(url).map_err(HostError::backend)
    }

    async fn last_url(&self) -> Result<String, HostError> {
        self.services.last_url().map_err(HostError::backend)
    }

    async fn cycle_opacity(&self) -> Result<f64, HostError> {
        Ok(self.services.cycle_opacity())
    }

    async fn set_ignore_cursor(&self, ignore: bool) -> Result<(), HostError> {
        self.window
            .set_ignore_cursor_events(ignore)
            .map_err(HostError::window)
    }

    async fn clear_cache(&self, hard: bool) -> Result<(), HostError> {
        self.services.clear_cache(hard).map_err(HostError::backend)
    }

    async fn clear_history(&self) -> Result<(), HostError> {
        self.services.clear_history().map_err(HostError::backend)
    }
}

// --- commands ---

struct DesktopState {
    shell: Arc<ShellController>,
    panel: PanelController,
    services: Arc<HostServices>,
}

/// every page calls this once loaded; the window label picks the entry routine
#[tauri::command]
async fn window_ready(window: WebviewWindow, state: State<'_, DesktopState>) -> Result<(), String> {
    let mode = LaunchMode::from_label(window.label());
    debug!(label = window.label(), ?mode, "window ready");
    match mode {
        LaunchMode::Shell => state.shell.start().await,
        LaunchMode::SettingsPanel => state
            .panel
            .mount(&TauriWindow::new(window))
            .await
            .map_err(|e| e.to_string())?,
    }
    Ok(())
}

#[tauri::command]
async fn navigate(url: String, state: State<'_, DesktopState>) -> Result<(), String> {
    state.shell.navigate(&url).await;
    Ok(())
}

#[tauri::command]
async fn home_search(query: String, state: State<'_, DesktopState>) -> Result<(), String> {
    state.shell.home_search(&query).await;
    Ok(())
}

/// returns whether the key matched a binding
#[tauri::command]
async fn hotkey(event: KeyEvent, state: State<'_, DesktopState>) -> Result<bool, String> {
    let Some(hotkey) = Hotkey::from_event(&event) else {
        return Ok(false);
    };
    state.shell.handle_hotkey(hotkey).await;
    Ok(true)
}

#[tauri::command]
async fn toggle_on_top(state: State<'_, DesktopState>) -> Result<(), String> {
    state.shell.toggle_on_top().await;
    Ok(())
}

#[tauri::command]
async fn cycle_opacity(state: State<'_, DesktopState>) -> Result<(), String> {
    state.shell.cycle_opacity().await;
    Ok(())
}

#[tauri::command]
async fn toggle_address_bar(state: State<'_, DesktopState>) -> Result<(), String> {
    state.shell.toggle_address_bar().await;
    Ok(())
}

#[tauri::command]
async fn open_settings(state: State<'_, DesktopState>) -> Result<(), String> {
    state.shell.open_settings_panel().await;
    Ok(())
}

#[tauri::command]
async fn close_window(state: State<'_, DesktopState>) -> Result<(), String> {
    state.shell.close().await;
    Ok(())
}

#[tauri::command]
async fn panel_change(input: PanelInput, state: State<'_, DesktopState>) -> Result<(), String> {
    state.panel.handle_input(&input).await.map_err(|e| {
        warn!(error = %e, "rejected settings input");
        e.to_string()
    })
}

// --- bootstrap ---

fn ensure_portable_profile(config: &AppConfig) {
    #[cfg(target_os = "windows")]
    {
        if let Err(e) = std::fs::create_dir_all(&config.profile_dir) {
            warn!(error = %e, "profile dir not created");
        }
        std::env::set_var("WEBVIEW2_USER_DATA_FOLDER", &config.profile_dir);
    }
    #[cfg(not(target_os = "windows"))]
    {
        debug!(profile = %config.profile_dir.display(), "webview profile left to the platform");
    }
}

fn open_storage(config: &AppConfig) -> anyhow::Result<Storage> {
    match Storage::open(&config.db_path()) {
        Ok(storage) => Ok(storage),
        Err(e) => {
            // keep the shell usable, preferences just won't survive a restart
            error!(error = %e, "storage unavailable, using in-memory store");
            Ok(Storage::open_in_memory()?)
        }
    }
}

fn is_remote_page(url: &tauri::Url) -> bool {
    matches!(url.scheme(), "http" | "https")
        && !matches!(url.host_str(), Some("tauri.localhost" | "localhost" | "127.0.0.1"))
}

pub fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    crate::logging::init(config.log_filter.as_deref());
    info!(data_dir = %config.data_dir.display(), "starting ribbonshell");

    ensure_portable_profile(&config);
    let services = Arc::new(HostServices::new(
        Arc::new(open_storage(&config)?),
        config.profile_dir.clone(),
    ));
    let search_url = config.search_url.clone();

    tauri::Builder::default()
        .setup(move |app| {
            let main = app
                .get_webview_window(MAIN_LABEL)
                .ok_or("main window missing from tauri.conf.json")?;

            let backend: Arc<dyn Backend> = Arc::new(DesktopBackend {
                services: services.clone(),
                window: main.clone(),
            });
            let (store, writer) = SettingsStore::new(backend.clone());
            tauri::async_runtime::spawn(writer.run());

            let parts = ShellParts {
                backend,
                window: Arc::new(TauriWindow::new(main.clone())),
                view: Arc::new(TauriView {
                    window: main.clone(),
                }),
                spawner: Arc::new(TauriSpawner {
                    app: app.handle().clone(),
                    anchor: main,
                }),
            };
            let shell = Arc::new(ShellController::new(Arc::new(store), parts, search_url.clone()));

            app.manage(DesktopState {
                panel: PanelController::new(shell.clone()),
                shell,
                services: services.clone(),
            });
            info!("shell wired");
            Ok(())
        })
        .on_page_load(|webview, payload| {
            if webview.label() != MAIN_LABEL || !matches!(payload.event(), PageLoadEvent::Finished) {
                return;
            }
            let url = payload.url();
            if !is_remote_page(url) {
                return;
            }
            let Some(state) = webview.app_handle().try_state::<DesktopState>() else {
                return;
            };
            if let Err(e) = state.services.remember_url(url.as_str()) {
                warn!(error = %e, "session url not saved");
            }
        })
        .on_window_event(|window, event| {
            // closing the shell ends the app even if the settings panel is open
            if window.label() == MAIN_LABEL {
                if let tauri::WindowEvent::Destroyed = event {
                    window.app_handle().exit(0);
                }
            }
        })
        .invoke_handler(tauri::generate_handler![
            window_ready,
            navigate,
            home_search,
            hotkey,
            toggle_on_top,
            cycle_opacity,
            toggle_address_bar,
            open_settings,
            close_window,
            panel_change,
        ])
        .run(tauri::generate_context!())?;

    Ok(())
}
