// host command service: storage, opacity cycle and webview profile cache

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::settings::Settings;
use crate::storage::{Storage, StorageError};

/// window opacity steps, the cycle starts at the first one
pub const OPACITY_STEPS: [f64; 5] = [1.0, 0.9, 0.8, 0.7, 0.6];

#[derive(Default)]
pub struct OpacityCycle {
    ix: AtomicUsize,
}

impl OpacityCycle {
    /// advance, then return the new step
    pub fn next(&self) -> f64 {
        let prev = self
            .ix
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |ix| {
                Some((ix + 1) % OPACITY_STEPS.len())
            })
            .unwrap_or(0);
        OPACITY_STEPS[(prev + 1) % OPACITY_STEPS.len()]
    }
}

pub struct HostServices {
    storage: Arc<Storage>,
    opacity: OpacityCycle,
    profile_dir: PathBuf,
}

impl HostServices {
    pub fn new(storage: Arc<Storage>, profile_dir: PathBuf) -> Self {
        Self {
            storage,
            opacity: OpacityCycle::default(),
            profile_dir,
        }
    }

    pub fn read_settings(&self) -> Result<Value, StorageError> {
        self.storage.read_settings()
    }

    pub fn write_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        self.storage.write_settings(&serde_json::to_value(settings)?)
    }

    pub fn append_history(&self, url: &str) -> Result<(), StorageError> {
        self.storage.append_history(url)
    }

    pub fn last_url(&self) -> Result<String, StorageError> {
        self.storage.last_url()
    }

    /// session bookkeeping for pages reached without the address bar
    pub fn remember_url(&self, url: &str) -> Result<(), StorageError> {
        self.storage.remember_url(url)
    }

    pub fn clear_history(&self) -> Result<(), StorageError> {
        self.storage.clear_history()
    }

    pub fn cycle_opacity(&self) -> f64 {
        self.opacity.next()
    }

    /// Drop the webview cache; `hard` wipes the whole profile (cookies, storage).
    pub fn clear_cache(&self, hard: bool) -> Result<(), StorageError> {
        remove_dir_if_exists(&self.profile_dir.join("Cache"))?;
        if hard {
            remove_dir_if_exists(&self.profile_dir)?;
        }
        info!(hard, "cache cleared");
        Ok(())
    }
}

fn remove_dir_if_exists(path: &Path) -> Result<(), StorageError> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
