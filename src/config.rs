// application configuration from the environment (and .env files)

use std::path::PathBuf;

use thiserror::Error;

use crate::nav::DEFAULT_SEARCH_URL;

const APP_DIR: &str = "ribbonshell";
const DB_FILE: &str = "ribbonshell.db";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("RIBBONSHELL_SEARCH_URL must be an http(s) url containing {{query}}, got '{0}'")]
    SearchUrl(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// database and other app data
    pub data_dir: PathBuf,
    /// webview user data (cache, cookies)
    pub profile_dir: PathBuf,
    /// `{query}` is replaced by the encoded search text
    pub search_url: String,
    pub log_filter: Option<String>,
}

impl AppConfig {
    /// load `.env` (here, then one level up) and read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        if dotenvy::dotenv().is_err() {
            let _ = dotenvy::from_filename("../.env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = match non_empty("RIBBONSHELL_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None if non_empty("RIBBONSHELL_PORTABLE").is_some() => exe_dir().join("data"),
            None => default_data_dir(),
        };

        let search_url = non_empty("RIBBONSHELL_SEARCH_URL")
            .unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string());
        if !crate::nav::is_absolute_http(&search_url) || !search_url.contains("{query}") {
            return Err(ConfigError::SearchUrl(search_url));
        }

        let log_filter = non_empty("RIBBONSHELL_LOG").or_else(|| non_empty("RUST_LOG"));

        Ok(Self {
            profile_dir: data_dir.join("profile"),
            data_dir,
            search_url,
            log_filter,
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }
}

fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    let base = dirs::data_dir();
    #[cfg(not(target_os = "macos"))]
    let base = dirs::data_local_dir();

    base.unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR)
}

/// directory of the running executable, falling back to the working dir
fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
