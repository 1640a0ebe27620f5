//! Configuration handling for the TUI

use anyhow::Result;
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the configured backend address
pub const BACKEND_URL_ENV: &str = "DOCUFORGE_BACKEND_URL";

/// Delay applied by the simulated services when nothing is configured
pub const DEFAULT_LATENCY_MS: u64 = 1000;

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TuiConfig {
    /// Generation backend base URL
    pub backend_url: Option<String>,
    /// Force the in-process backend even when a URL is set
    pub use_dummy_backend: Option<bool>,
    /// Delay for simulated sign-in and generation
    pub simulated_latency_ms: Option<u64>,
    /// Where saved documents go
    pub download_dir: Option<PathBuf>,
    /// Where the session and document history live
    pub data_dir: Option<PathBuf>,
    /// Keep the session and history in memory only
    pub ephemeral: Option<bool>,
}

impl TuiConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "docuforge", "docuforge-tui")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_or_init(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`. A missing file is created with the defaults so
    /// there is something to edit.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }
        let config = Self::default();
        match config.save_to(path) {
            Ok(()) => tracing::info!("Wrote default config to {}", path.display()),
            Err(e) => tracing::warn!("Could not write default config: {e:#}"),
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: TuiConfig = serde_json::from_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Backend URL with the environment override applied
    pub fn effective_backend_url(&self) -> Option<String> {
        Self::resolve_backend_url(std::env::var(BACKEND_URL_ENV).ok(), self.backend_url.clone())
    }

    fn resolve_backend_url(env: Option<String>, file: Option<String>) -> Option<String> {
        env.or(file)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
    }

    /// True unless a backend URL is configured and the dummy flag is not set
    pub fn uses_dummy_backend(&self) -> bool {
        self.use_dummy_backend.unwrap_or(false) || self.effective_backend_url().is_none()
    }

    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral.unwrap_or(false)
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms.unwrap_or(DEFAULT_LATENCY_MS))
    }

    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from(".docuforge"))
    }

    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(|| {
                UserDirs::new().and_then(|dirs| dirs.download_dir().map(|d| d.to_path_buf()))
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
