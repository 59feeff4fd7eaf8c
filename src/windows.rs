// label -> secondary window registry with open-or-focus semantics

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::host::{HostError, SecondaryWindow, WindowSpawner, WindowSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opened {
    Created,
    Focused,
}

#[derive(Default)]
pub struct WindowRegistry {
    windows: Mutex<HashMap<String, Arc<dyn SecondaryWindow>>>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// live handle for `label`, pruning it if the window was closed
    #[cfg(test)]
    pub async fn get(&self, label: &str) -> Option<Arc<dyn SecondaryWindow>> {
        let mut windows = self.windows.lock().await;
        Self::live(&mut windows, label).await
    }

    /// Focus the window registered under `label`, or spawn it.
    ///
    /// `spec` is only evaluated when a new window is needed. The registry
    /// stays locked across lookup and spawn, so concurrent opens of the same
    /// label produce a single window.
    pub async fn open_or_focus<F, Fut>(
        &self,
        label: &str,
        spawner: &dyn WindowSpawner,
        spec: F,
    ) -> Result<Opened, HostError>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<WindowSpec, HostError>>,
    {
        let mut windows = self.windows.lock().await;

        if let Some(existing) = Self::live(&mut windows, label).await {
            debug!(label, "window already open, focusing");
            existing.focus().await?;
            return Ok(Opened::Focused);
        }

        let spec = spec().await?;
        let handle = spawner.spawn(label, &spec).await?;
        info!(label, x = spec.position.x, y = spec.position.y, "window created");
        windows.insert(label.to_string(), handle);
        Ok(Opened::Created)
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.windows.lock().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn live(
        windows: &mut HashMap<String, Arc<dyn SecondaryWindow>>,
        label: &str,
    ) -> Option<Arc<dyn SecondaryWindow>> {
        let handle = windows.get(label)?.clone();
        if handle.is_open().await {
            Some(handle)
        } else {
            debug!(label, "dropping closed window");
            windows.remove(label);
            None
        }
    }
}
