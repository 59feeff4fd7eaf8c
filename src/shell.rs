// shell controller: user events in the main window -> settings, backend and window calls

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::chrome::{render_border, render_controls_collapsed};
use crate::host::{
    Backend, HostError, Position, ShellView, WindowControl, WindowSpawner, WindowSpec,
};
use crate::hotkeys::Hotkey;
use crate::nav;
use crate::store::{load_settings, SettingsStore};
use crate::windows::{Opened, WindowRegistry};

pub const SETTINGS_LABEL: &str = "settings";
pub const SETTINGS_URL: &str = "settings.html";
pub const PANEL_WIDTH: u32 = 340;
pub const PANEL_HEIGHT: u32 = 520;
const PANEL_OFFSET_X: i32 = 12;
const PANEL_OFFSET_Y: i32 = 28;

/// collaborators of the shell window
#[derive(Clone)]
pub struct ShellParts {
    pub backend: Arc<dyn Backend>,
    pub window: Arc<dyn WindowControl>,
    pub view: Arc<dyn ShellView>,
    pub spawner: Arc<dyn WindowSpawner>,
}

pub struct ShellController {
    store: Arc<SettingsStore>,
    parts: ShellParts,
    panels: WindowRegistry,
    search_url: String,
}

fn soft<T>(op: &'static str, result: Result<T, HostError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(op, error = %e, "host call failed");
            None
        }
    }
}

impl ShellController {
    pub fn new(store: Arc<SettingsStore>, parts: ShellParts, search_url: impl Into<String>) -> Self {
        Self {
            store,
            parts,
            panels: WindowRegistry::new(),
            search_url: search_url.into(),
        }
    }

    pub fn store(&self) -> &Arc<SettingsStore> {
        &self.store
    }

    pub fn backend(&self) -> &dyn Backend {
        self.parts.backend.as_ref()
    }

    pub fn window(&self) -> &dyn WindowControl {
        self.parts.window.as_ref()
    }

    pub fn view(&self) -> &dyn ShellView {
        self.parts.view.as_ref()
    }

    /// Entry routine of the shell launch mode.
    pub async fn start(&self) {
        self.initialize().await;
        self.restore_session().await;
        self.apply_ribbon().await;
        self.apply_hud().await;
        self.apply_snap().await;
        info!("shell ready");
    }

    /// Load stored settings (defaults on any failure) and apply their visuals.
    pub async fn initialize(&self) {
        let settings = load_settings(self.parts.backend.as_ref()).await;
        self.store.reset(settings.clone()).await;

        soft(
            "apply_style",
            self.view()
                .apply_style(&render_controls_collapsed(!settings.show_address))
                .await,
        );
        soft(
            "apply_style",
            self.view().apply_style(&render_border(settings.border_px)).await,
        );
        if settings.on_top {
            soft("set_always_on_top", self.window().set_always_on_top(true).await);
        }
        debug!(?settings, "settings loaded");
    }

    /// reload the last visited address when the user asked for it
    pub async fn restore_session(&self) {
        if !self.store.snapshot().await.remember_session {
            return;
        }
        match self.backend().last_url().await {
            Ok(url) if !url.trim().is_empty() => {
                info!(url = %url, "restoring session");
                self.navigate(&url).await;
            }
            Ok(_) => debug!("no session to restore"),
            Err(e) => debug!(error = %e, "session restore skipped"),
        }
    }

    pub async fn navigate(&self, url: &str) {
        let url = url.trim();
        if url.is_empty() {
            return;
        }
        soft("set_home_visible", self.view().set_home_visible(false).await);
        soft("set_address", self.view().set_address(url).await);
        soft("eval", self.window().eval(&nav::location_script(url)).await);
        if let Err(e) = self.backend().append_history(url).await {
            warn!(error = %e, "history not recorded");
        }
    }

    pub async fn home_search(&self, query: &str) {
        let query = query.trim();
        // a blank search stays on the start page instead of opening an empty results page
        if query.is_empty() {
            return;
        }
        let target = nav::home_target(query, &self.search_url);
        self.navigate(&target).await;
    }

    pub async fn toggle_on_top(&self) {
        let Some(current) = soft("is_always_on_top", self.window().is_always_on_top().await)
        else {
            return;
        };
        let on = !current;
        // onTop mirrors the native state, so nothing is stored unless it took
        if soft("set_always_on_top", self.window().set_always_on_top(on).await).is_none() {
            return;
        }
        self.store.update(|s| s.on_top = on).await;
        info!(on, "always on top toggled");
    }

    pub async fn cycle_opacity(&self) {
        let opacity = match self.backend().cycle_opacity().await {
            Ok(opacity) => opacity,
            Err(e) => {
                warn!(error = %e, "opacity cycle unavailable");
                return;
            }
        };
        soft("set_opacity", self.window().set_opacity(opacity).await);
    }

    /// expand the controls and focus the address field without touching `showAddress`
    pub async fn reveal_address_bar(&self) {
        soft(
            "apply_style",
            self.view().apply_style(&render_controls_collapsed(false)).await,
        );
        soft("focus_address", self.view().focus_address().await);
    }

    pub async fn toggle_address_bar(&self) {
        let collapsed = self
            .store
            .update(|s| {
                s.show_address = !s.show_address;
                !s.show_address
            })
            .await;
        soft(
            "apply_style",
            self.view().apply_style(&render_controls_collapsed(collapsed)).await,
        );
    }

    pub async fn handle_hotkey(&self, hotkey: Hotkey) {
        debug!(?hotkey, "hotkey");
        match hotkey {
            Hotkey::ToggleOnTop => self.toggle_on_top().await,
            Hotkey::CycleOpacity => self.cycle_opacity().await,
            Hotkey::RevealAddress => self.reveal_address_bar().await,
        }
    }

    /// Open the settings panel next to the shell's top-right corner, or focus
    /// it if it is already open.
    pub async fn open_settings_panel(&self) -> Option<Opened> {
        let window = self.parts.window.clone();
        let opened = self
            .panels
            .open_or_focus(SETTINGS_LABEL, self.parts.spawner.as_ref(), || async move {
                let position = window.outer_position().await?;
                let size = window.outer_size().await?;
                Ok(settings_panel_spec(position, size.width))
            })
            .await;
        soft("open_settings_panel", opened)
    }

    pub async fn apply_ribbon(&self) {
        let ribbon = self.store.snapshot().await.ribbon;
        if !ribbon.enabled {
            return;
        }
        soft(
            "set_logical_size",
            self.window()
                .set_logical_size(f64::from(ribbon.width), f64::from(ribbon.height))
                .await,
        );
    }

    pub async fn apply_hud(&self) {
        let hud = self.store.snapshot().await.hud;
        if let Err(e) = self.backend().set_ignore_cursor(hud).await {
            warn!(error = %e, hud, "click-through not applied");
        }
    }

    /// dock to the top-right corner of the current monitor
    pub async fn apply_snap(&self) {
        if !self.store.snapshot().await.snap {
            return;
        }
        let Some(Some(monitor)) = soft("current_monitor", self.window().current_monitor().await)
        else {
            return;
        };
        let Some(size) = soft("outer_size", self.window().outer_size().await) else {
            return;
        };
        let position = snapped_position(monitor.position, monitor.size.width, size.width);
        soft("set_position", self.window().set_position(position).await);
    }

    pub async fn close(&self) {
        soft("close", self.window().close().await);
    }
}

fn settings_panel_spec(main: Position, main_width: u32) -> WindowSpec {
    let main_width = i32::try_from(main_width).unwrap_or(i32::MAX);
    let panel_width = i32::try_from(PANEL_WIDTH).unwrap_or(0);
    WindowSpec {
        url: SETTINGS_URL.to_string(),
        position: Position {
            x: main.x.saturating_add(main_width) - panel_width + PANEL_OFFSET_X,
            y: main.y + PANEL_OFFSET_Y,
        },
        width: PANEL_WIDTH,
        height: PANEL_HEIGHT,
        decorations: false,
        transparent: true,
        always_on_top: true,
        skip_taskbar: true,
        resizable: true,
    }
}

fn snapped_position(monitor: Position, monitor_width: u32, window_width: u32) -> Position {
    let right = i64::from(monitor.x) + i64::from(monitor_width) - i64::from(window_width);
    Position {
        x: i32::try_from(right).unwrap_or(monitor.x),
        y: monitor.y,
    }
}
