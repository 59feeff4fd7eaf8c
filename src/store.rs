// live settings record plus the single-writer persistence queue

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, warn};

use crate::host::Backend;
use crate::settings::Settings;

enum WriterMsg {
    Write(Settings),
    Flush(oneshot::Sender<()>),
}

pub struct SettingsStore {
    current: Mutex<Settings>,
    queue: mpsc::UnboundedSender<WriterMsg>,
}

/// Drains queued snapshots into the backend. Spawn [`SettingsWriter::run`]
/// on whatever runtime hosts the controllers.
pub struct SettingsWriter {
    backend: Arc<dyn Backend>,
    rx: mpsc::UnboundedReceiver<WriterMsg>,
}

impl SettingsStore {
    /// store holding the defaults, plus the writer that persists its changes
    pub fn new(backend: Arc<dyn Backend>) -> (Self, SettingsWriter) {
        let (queue, rx) = mpsc::unbounded_channel();
        let store = Self {
            current: Mutex::new(Settings::default()),
            queue,
        };
        (store, SettingsWriter { backend, rx })
    }

    pub async fn snapshot(&self) -> Settings {
        self.current.lock().await.clone()
    }

    /// replace the record without persisting, used once the stored copy is loaded
    pub async fn reset(&self, settings: Settings) {
        *self.current.lock().await = settings;
    }

    /// Mutate the record and queue the resulting snapshot for persistence.
    pub async fn update<R>(&self, f: impl FnOnce(&mut Settings) -> R) -> R {
        let mut current = self.current.lock().await;
        let result = f(&mut current);
        // enqueue under the lock so queue order matches mutation order
        if self.queue.send(WriterMsg::Write(current.clone())).is_err() {
            warn!("settings writer is gone, change kept in memory only");
        }
        result
    }

    /// wait until every write queued so far has been attempted
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.queue.send(WriterMsg::Flush(tx)).is_err() {
            return;
        }
        let _ = rx.await;
    }
}

impl SettingsWriter {
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                WriterMsg::Write(settings) => {
                    match self.backend.write_settings(&settings).await {
                        Ok(()) => debug!("settings persisted"),
                        Err(e) => warn!(error = %e, "settings write dropped"),
                    }
                }
                WriterMsg::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
        debug!("settings writer stopped");
    }
}

/// Read the stored settings and merge them over the defaults. Any failure,
/// including a malformed payload, yields the defaults.
pub async fn load_settings(backend: &dyn Backend) -> Settings {
    match backend.read_settings().await {
        Ok(stored) => Settings::from_stored_or_default(stored),
        Err(e) => {
            warn!(error = %e, "settings unavailable, using defaults");
            Settings::default()
        }
    }
}
