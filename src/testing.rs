// recording fakes for the host contracts, shared by the unit tests

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::chrome::{StylePatch, StyleTarget};
use crate::host::{
    Backend, HostError, MonitorBounds, Position, SecondaryWindow, ShellView, Size,
    WindowControl, WindowSpawner, WindowSpec,
};
use crate::settings::Settings;
use crate::shell::{ShellController, ShellParts};
use crate::store::SettingsStore;

/// effectful calls; window getters are not recorded
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ReadSettings,
    WriteSettings(Settings),
    AppendHistory(String),
    LastUrl,
    CycleOpacity,
    SetIgnoreCursor(bool),
    ClearCache(bool),
    ClearHistory,
    SetAlwaysOnTop(bool),
    SetOpacity(f64),
    SetLogicalSize(f64, f64),
    SetPosition(Position),
    Close,
    Eval(String),
    SetHomeVisible(bool),
    SetAddress(String),
    FocusAddress,
    ApplyStyle(StylePatch),
    Spawn(String, WindowSpec),
    Focus(String),
}

#[derive(Default)]
pub struct CallLog(Mutex<Vec<Call>>);

impl CallLog {
    pub fn record(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn contains(&self, call: &Call) -> bool {
        self.0.lock().unwrap().contains(call)
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    pub fn history(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::AppendHistory(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn written(&self) -> Vec<Settings> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::WriteSettings(s) => Some(s),
                _ => None,
            })
            .collect()
    }
}

pub struct FakeBackend {
    pub log: Arc<CallLog>,
    pub stored: Value,
    pub fail_reads: bool,
    pub fail_writes: bool,
    /// `None` makes `last_url` fail
    pub last_url: Option<String>,
    pub opacity: f64,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            log: Arc::default(),
            stored: Value::Null,
            fail_reads: false,
            fail_writes: false,
            last_url: Some(String::new()),
            opacity: 0.9,
        }
    }
}

impl FakeBackend {
    pub fn with_stored(stored: Value) -> Self {
        Self {
            stored,
            ..Self::default()
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn read_settings(&self) -> Result<Value, HostError> {
        self.log.record(Call::ReadSettings);
        if self.fail_reads {
            return Err(HostError::Backend("disk gone".to_string()));
        }
        Ok(self.stored.clone())
    }

    async fn write_settings(&self, value: &Settings) -> Result<(), HostError> {
        self.log.record(Call::WriteSettings(value.clone()));
        if self.fail_writes {
            return Err(HostError::Backend("read-only".to_string()));
        }
        Ok(())
    }

    async fn append_history(&self, url: &str) -> Result<(), HostError> {
        self.log.record(Call::AppendHistory(url.to_string()));
        Ok(())
    }

    async fn last_url(&self) -> Result<String, HostError> {
        self.log.record(Call::LastUrl);
        self.last_url
            .clone()
            .ok_or_else(|| HostError::Backend("no session".to_string()))
    }

    async fn cycle_opacity(&self) -> Result<f64, HostError> {
        self.log.record(Call::CycleOpacity);
        Ok(self.opacity)
    }

    async fn set_ignore_cursor(&self, ignore: bool) -> Result<(), HostError> {
        self.log.record(Call::SetIgnoreCursor(ignore));
        Ok(())
    }

    async fn clear_cache(&self, hard: bool) -> Result<(), HostError> {
        self.log.record(Call::ClearCache(hard));
        Ok(())
    }

    async fn clear_history(&self) -> Result<(), HostError> {
        self.log.record(Call::ClearHistory);
        Ok(())
    }
}

pub struct FakeWindow {
    pub log: Arc<CallLog>,
    pub on_top: Mutex<bool>,
    pub opacity: Mutex<f64>,
    pub position: Position,
    pub size: Size,
    pub monitor: Option<MonitorBounds>,
    /// every call errors
    pub fail: bool,
    /// only `set_always_on_top` errors
    pub fail_set_on_top: bool,
}

impl Default for FakeWindow {
    fn default() -> Self {
        Self {
            log: Arc::default(),
            on_top: Mutex::new(false),
            opacity: Mutex::new(1.0),
            position: Position::default(),
            size: Size {
                width: 1024,
                height: 768,
            },
            monitor: None,
            fail: false,
            fail_set_on_top: false,
        }
    }
}

impl FakeWindow {
    pub fn on_top(&self) -> bool {
        *self.on_top.lock().unwrap()
    }

    pub fn opacity_value(&self) -> f64 {
        *self.opacity.lock().unwrap()
    }

    fn check(&self) -> Result<(), HostError> {
        if self.fail {
            Err(HostError::Window("window destroyed".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl WindowControl for FakeWindow {
    async fn is_always_on_top(&self) -> Result<bool, HostError> {
        self.check()?;
        Ok(self.on_top())
    }

    async fn set_always_on_top(&self, on: bool) -> Result<(), HostError> {
        self.check()?;
        if self.fail_set_on_top {
            return Err(HostError::Window("always on top refused".to_string()));
        }
        self.log.record(Call::SetAlwaysOnTop(on));
        *self.on_top.lock().unwrap() = on;
        Ok(())
    }

    async fn set_opacity(&self, opacity: f64) -> Result<(), HostError> {
        self.check()?;
        self.log.record(Call::SetOpacity(opacity));
        *self.opacity.lock().unwrap() = opacity;
        Ok(())
    }

    async fn outer_position(&self) -> Result<Position, HostError> {
        self.check()?;
        Ok(self.position)
    }

    async fn outer_size(&self) -> Result<Size, HostError> {
        self.check()?;
        Ok(self.size)
    }

    async fn set_logical_size(&self, width: f64, height: f64) -> Result<(), HostError> {
        self.check()?;
        self.log.record(Call::SetLogicalSize(width, height));
        Ok(())
    }

    async fn set_position(&self, position: Position) -> Result<(), HostError> {
        self.check()?;
        self.log.record(Call::SetPosition(position));
        Ok(())
    }

    async fn current_monitor(&self) -> Result<Option<MonitorBounds>, HostError> {
        self.check()?;
        Ok(self.monitor)
    }

    async fn close(&self) -> Result<(), HostError> {
        self.check()?;
        self.log.record(Call::Close);
        Ok(())
    }

    async fn eval(&self, script: &str) -> Result<(), HostError> {
        self.check()?;
        self.log.record(Call::Eval(script.to_string()));
        Ok(())
    }
}

pub struct FakeView {
    pub log: Arc<CallLog>,
    home_visible: Mutex<bool>,
    address: Mutex<String>,
    styles: Mutex<HashMap<(StyleTarget, String), String>>,
}

impl FakeView {
    pub fn new(log: Arc<CallLog>) -> Self {
        Self {
            log,
            home_visible: Mutex::new(true),
            address: Mutex::new(String::new()),
            styles: Mutex::new(HashMap::new()),
        }
    }

    pub fn home_visible(&self) -> bool {
        *self.home_visible.lock().unwrap()
    }

    pub fn address(&self) -> String {
        self.address.lock().unwrap().clone()
    }

    pub fn style(&self, target: StyleTarget, property: &str) -> Option<String> {
        self.styles
            .lock()
            .unwrap()
            .get(&(target, property.to_string()))
            .cloned()
    }

    pub fn styles(&self) -> HashMap<(StyleTarget, String), String> {
        self.styles.lock().unwrap().clone()
    }
}

#[async_trait]
impl ShellView for FakeView {
    async fn set_home_visible(&self, visible: bool) -> Result<(), HostError> {
        self.log.record(Call::SetHomeVisible(visible));
        *self.home_visible.lock().unwrap() = visible;
        Ok(())
    }

    async fn set_address(&self, url: &str) -> Result<(), HostError> {
        self.log.record(Call::SetAddress(url.to_string()));
        *self.address.lock().unwrap() = url.to_string();
        Ok(())
    }

    async fn focus_address(&self) -> Result<(), HostError> {
        self.log.record(Call::FocusAddress);
        Ok(())
    }

    async fn apply_style(&self, patch: &StylePatch) -> Result<(), HostError> {
        self.log.record(Call::ApplyStyle(patch.clone()));
        let mut styles = self.styles.lock().unwrap();
        for (property, value) in &patch.declarations {
            styles.insert((patch.target, (*property).to_string()), value.clone());
        }
        Ok(())
    }
}

pub struct FakeSpawner {
    log: Arc<CallLog>,
    open: Arc<Mutex<HashSet<String>>>,
}

impl FakeSpawner {
    pub fn new(log: Arc<CallLog>) -> Self {
        Self {
            log,
            open: Arc::default(),
        }
    }

    /// simulate the user closing a window
    pub fn close(&self, label: &str) {
        self.open.lock().unwrap().remove(label);
    }
}

#[async_trait]
impl WindowSpawner for FakeSpawner {
    async fn spawn(
        &self,
        label: &str,
        spec: &WindowSpec,
    ) -> Result<Arc<dyn SecondaryWindow>, HostError> {
        if !self.open.lock().unwrap().insert(label.to_string()) {
            return Err(HostError::LabelTaken(label.to_string()));
        }
        self.log.record(Call::Spawn(label.to_string(), spec.clone()));
        Ok(Arc::new(FakeSecondary {
            label: label.to_string(),
            log: self.log.clone(),
            open: self.open.clone(),
        }))
    }
}

struct FakeSecondary {
    label: String,
    log: Arc<CallLog>,
    open: Arc<Mutex<HashSet<String>>>,
}

#[async_trait]
impl SecondaryWindow for FakeSecondary {
    async fn focus(&self) -> Result<(), HostError> {
        self.log.record(Call::Focus(self.label.clone()));
        Ok(())
    }

    async fn is_open(&self) -> bool {
        self.open.lock().unwrap().contains(&self.label)
    }
}

/// a shell controller wired to fakes that all record into one log
pub struct Harness {
    pub log: Arc<CallLog>,
    pub backend: Arc<FakeBackend>,
    pub window: Arc<FakeWindow>,
    pub view: Arc<FakeView>,
    pub spawner: Arc<FakeSpawner>,
    pub store: Arc<SettingsStore>,
    pub shell: Arc<ShellController>,
}

impl Harness {
    /// must run inside a tokio runtime, the settings writer is spawned here
    pub fn new(mut backend: FakeBackend, mut window: FakeWindow) -> Self {
        let log = Arc::new(CallLog::default());
        backend.log = log.clone();
        window.log = log.clone();

        let backend = Arc::new(backend);
        let window = Arc::new(window);
        let view = Arc::new(FakeView::new(log.clone()));
        let spawner = Arc::new(FakeSpawner::new(log.clone()));

        let (store, writer) = SettingsStore::new(backend.clone());
        tokio::spawn(writer.run());
        let store = Arc::new(store);

        let parts = ShellParts {
            backend: backend.clone(),
            window: window.clone(),
            view: view.clone(),
            spawner: spawner.clone(),
        };
        let shell = Arc::new(ShellController::new(
            store.clone(),
            parts,
            crate::nav::DEFAULT_SEARCH_URL,
        ));

        Self {
            log,
            backend,
            window,
            view,
            spawner,
            store,
            shell,
        }
    }
}
