// settings panel launch mode: form rendering and field changes applied to the shell

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::chrome::{render_border, render_controls_collapsed, StylePatch};
use crate::host::{HostError, WindowControl};
use crate::settings::{BorderPx, Lang, Settings};
use crate::shell::{ShellController, SETTINGS_LABEL};

#[derive(Error, Debug, PartialEq)]
pub enum PanelError {
    #[error("unknown settings field '{0}'")]
    UnknownField(String),
    #[error("invalid value '{value}' for '{field}'")]
    InvalidValue { field: String, value: String },
}

/// which entry routine a window runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    Shell,
    SettingsPanel,
}

impl LaunchMode {
    pub fn from_label(label: &str) -> Self {
        if label == SETTINGS_LABEL {
            LaunchMode::SettingsPanel
        } else {
            LaunchMode::Shell
        }
    }
}

/// form event as forwarded by the panel page
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PanelInput {
    pub id: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelChange {
    Lang(Lang),
    ShowAddress(bool),
    ShowTabs(bool),
    OnTop(bool),
    RememberSession(bool),
    BorderPx(BorderPx),
    RibbonEnabled(bool),
    RibbonWidth(u32),
    RibbonHeight(u32),
    Hud(bool),
    Snap(bool),
    ClearCache,
    ClearHistory,
}

impl PanelChange {
    pub fn from_input(input: &PanelInput) -> Result<Self, PanelError> {
        let invalid = || PanelError::InvalidValue {
            field: input.id.clone(),
            value: input.value.clone(),
        };
        let number = || input.value.trim().parse::<u32>().map_err(|_| invalid());

        let change = match input.id.as_str() {
            "lang" => match input.value.as_str() {
                "en" => PanelChange::Lang(Lang::En),
                "ru" => PanelChange::Lang(Lang::Ru),
                _ => return Err(invalid()),
            },
            "showAddr" => PanelChange::ShowAddress(input.checked),
            "showTabs" => PanelChange::ShowTabs(input.checked),
            "onTop" => PanelChange::OnTop(input.checked),
            "remember" => PanelChange::RememberSession(input.checked),
            "border" => {
                let px = input.value.trim().parse::<u8>().map_err(|_| invalid())?;
                PanelChange::BorderPx(BorderPx::try_from(px).map_err(|_| invalid())?)
            }
            "ribbon" => PanelChange::RibbonEnabled(input.checked),
            "rW" => PanelChange::RibbonWidth(number()?),
            "rH" => PanelChange::RibbonHeight(number()?),
            "hud" => PanelChange::Hud(input.checked),
            "snap" => PanelChange::Snap(input.checked),
            "clearCache" => PanelChange::ClearCache,
            "clearHistory" => PanelChange::ClearHistory,
            other => return Err(PanelError::UnknownField(other.to_string())),
        };
        Ok(change)
    }
}

pub struct PanelController {
    shell: Arc<ShellController>,
}

impl PanelController {
    pub fn new(shell: Arc<ShellController>) -> Self {
        Self { shell }
    }

    /// Entry routine of the panel launch mode: draw the form into `surface`.
    pub async fn mount(&self, surface: &dyn WindowControl) -> Result<(), HostError> {
        let settings = self.shell.store().snapshot().await;
        surface.eval(&mount_script(&settings)).await?;
        info!("settings panel mounted");
        Ok(())
    }

    pub async fn handle_input(&self, input: &PanelInput) -> Result<(), PanelError> {
        let change = PanelChange::from_input(input)?;
        self.apply(change).await;
        Ok(())
    }

    pub async fn apply(&self, change: PanelChange) {
        debug!(?change, "settings panel change");
        let store = self.shell.store();
        match change {
            PanelChange::Lang(lang) => store.update(|s| s.lang = lang).await,
            PanelChange::ShowTabs(on) => store.update(|s| s.show_tabs = on).await,
            PanelChange::RememberSession(on) => store.update(|s| s.remember_session = on).await,
            PanelChange::RibbonWidth(width) => store.update(|s| s.ribbon.width = width).await,
            PanelChange::RibbonHeight(height) => store.update(|s| s.ribbon.height = height).await,
            PanelChange::ShowAddress(on) => {
                store.update(|s| s.show_address = on).await;
                self.restyle(&render_controls_collapsed(!on)).await;
            }
            PanelChange::OnTop(on) => {
                store.update(|s| s.on_top = on).await;
                if let Err(e) = self.shell.window().set_always_on_top(on).await {
                    warn!(error = %e, on, "always on top not applied");
                }
            }
            PanelChange::BorderPx(px) => {
                store.update(|s| s.border_px = px).await;
                self.restyle(&render_border(px)).await;
            }
            PanelChange::RibbonEnabled(on) => {
                store.update(|s| s.ribbon.enabled = on).await;
                if on {
                    self.shell.apply_ribbon().await;
                }
            }
            PanelChange::Hud(on) => {
                store.update(|s| s.hud = on).await;
                self.shell.apply_hud().await;
            }
            PanelChange::Snap(on) => {
                store.update(|s| s.snap = on).await;
                self.shell.apply_snap().await;
            }
            PanelChange::ClearCache => {
                if let Err(e) = self.shell.backend().clear_cache(false).await {
                    warn!(error = %e, "cache not cleared");
                }
            }
            PanelChange::ClearHistory => {
                if let Err(e) = self.shell.backend().clear_history().await {
                    warn!(error = %e, "history not cleared");
                }
            }
        }
    }

    async fn restyle(&self, patch: &StylePatch) {
        if let Err(e) = self.shell.view().apply_style(patch).await {
            warn!(error = %e, "shell chrome not updated");
        }
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn checked(on: bool) -> &'static str {
    if on {
        " checked"
    } else {
        ""
    }
}

fn selected(on: bool) -> &'static str {
    if on {
        " selected"
    } else {
        ""
    }
}

fn checkbox(id: &str, on: bool, label: &str) -> String {
    format!(r#"<label><input type="checkbox" id="{id}"{}/> {label}</label><br/>"#, checked(on))
}

/// settings form markup for the current values
pub fn render_form(settings: &Settings) -> String {
    let mut html = String::new();

    html.push_str(r#"<div style="padding:10px">"#);
    html.push_str(
        r#"<div style="display:flex;align-items:center;gap:8px;justify-content:space-between;margin-bottom:6px">"#,
    );
    html.push_str(r#"<div style="font-weight:600">Settings / Настройки</div><select id="lang">"#);
    for lang in [Lang::En, Lang::Ru] {
        html.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            lang.as_str(),
            selected(settings.lang == lang),
            lang.as_str().to_uppercase()
        ));
    }
    html.push_str("</select></div>");

    html.push_str(&checkbox(
        "showAddr",
        settings.show_address,
        "Show address bar / Показать адресную строку",
    ));
    html.push_str(&checkbox("showTabs", settings.show_tabs, "Show tabs / Показать вкладки"));
    html.push_str(&checkbox("onTop", settings.on_top, "Always on top / Поверх всех окон"));
    html.push_str(&checkbox(
        "remember",
        settings.remember_session,
        "Remember last session / Запоминать сессию",
    ));

    html.push_str(r#"<div>Border width / Толщина рамки: <select id="border">"#);
    for px in BorderPx::ALL {
        html.push_str(&format!(
            "<option{}>{}</option>",
            selected(settings.border_px == px),
            px.px()
        ));
    }
    html.push_str("</select> px</div><hr/>");

    html.push_str(&format!(
        r#"<label><input type="checkbox" id="ribbon"{}/> Narrow ribbon / Узкая лента</label>"#,
        checked(settings.ribbon.enabled)
    ));
    html.push_str(r#"<div style="display:grid;grid-template-columns:1fr 1fr;gap:8px;margin:6px 0 10px">"#);
    html.push_str(&format!(
        r#"<label>Width/Ширина <input id="rW" value="{}" style="width:70px"/></label>"#,
        escape_html(&settings.ribbon.width.to_string())
    ));
    html.push_str(&format!(
        r#"<label>Height/Высота <input id="rH" value="{}" style="width:70px"/></label>"#,
        escape_html(&settings.ribbon.height.to_string())
    ));
    html.push_str("</div>");

    html.push_str(&checkbox(
        "hud",
        settings.hud,
        "Click-through (HUD) / Прозрачность для кликов",
    ));
    html.push_str(&format!(
        r#"<label><input type="checkbox" id="snap"{}/> Snap to edges / Прилипание к краям</label>"#,
        checked(settings.snap)
    ));
    html.push_str("<hr/>");
    html.push_str(r#"<button id="clearCache">Clear cache</button> "#);
    html.push_str(r#"<button id="clearHistory">Clear history</button>"#);
    html.push_str("</div>");
    html
}

/// script that replaces the panel body with the rendered form
pub fn mount_script(settings: &Settings) -> String {
    let markup = serde_json::Value::from(render_form(settings)).to_string();
    format!(
        "(function(){{var b=document.body;b.innerHTML={markup};\
         b.style.background=\"rgba(20,20,28,.94)\";b.style.color=\"#ddd\";b.style.margin=\"0\";}})();"
    )
}
