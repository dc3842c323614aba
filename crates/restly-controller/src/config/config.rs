//! Configuration management for restly-controller.
//!
//! Handles loading and saving the TOML configuration file with cross-platform
//! paths, per-field defaults, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{LoggingConfig, QueueConfig, ServerConfig, SessionConfig},
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use restly_core::{CommandQueue, SessionParams, default_queue_path};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

const CONFIG_FILE: &str = "controller.toml";

/// Whether a load found an existing file or wrote the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// The file was read from disk.
    Existing,
    /// No file existed; defaults were written.
    Created,
}

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Command queue location and durability.
    #[serde(default)]
    pub queue: QueueConfig,
    /// Tray quick actions.
    #[serde(default)]
    pub session: SessionConfig,
    /// Local control page.
    #[serde(default)]
    pub server: ServerConfig,
    /// Log level and log files.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from `config_path`, writing defaults there if the
    /// file does not exist. Missing sections and fields take their defaults.
    #[track_caller]
    #[instrument]
    pub fn load_from(config_path: &Path) -> AppResult<Self> {
        if !config_path.exists() {
            info!(config_path = ?config_path, "No config found, creating default");
            let config = Config::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration loaded");

        Ok(config)
    }

    /// Like [`load_from`](Self::load_from), also reporting whether the file
    /// had to be created. Used at startup, before logging is installed, so
    /// the caller can log the outcome afterwards.
    #[track_caller]
    pub fn load_with_origin(config_path: &Path) -> AppResult<(Self, ConfigOrigin)> {
        let origin = if config_path.exists() {
            ConfigOrigin::Existing
        } else {
            ConfigOrigin::Created
        };

        Ok((Self::load_from(config_path)?, origin))
    }

    /// Save configuration using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument]
    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if let Some(dir) = config_path.parent().filter(|d| !d.exists()) {
            fs::create_dir_all(dir)?;
            debug!(config_dir = ?dir, "Created config directory");
        }

        // Atomic write: write to temp file then rename
        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Build the command queue writer described by `[queue]`.
    #[track_caller]
    pub fn command_queue(&self) -> AppResult<CommandQueue> {
        let path = match &self.queue.path {
            Some(path) => path.clone(),
            None => default_queue_path()?,
        };

        Ok(CommandQueue::new(path).with_sync_on_write(self.queue.sync_on_write))
    }

    /// Session sent by the "Start Deep Work" quick action.
    pub fn deep_work_session(&self) -> SessionParams {
        SessionParams::new(
            self.session.deep_work_minutes,
            self.session.deep_work_type.clone(),
        )
    }

    /// Control page URL for opening in the browser.
    pub fn server_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.server.port)
    }

    /// Directory holding rolling log files.
    #[track_caller]
    pub fn log_dir() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join("logs"))
    }

    /// Location of `controller.toml` in the platform config directory.
    #[track_caller]
    pub fn path() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join(CONFIG_FILE))
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "restly", "Restly").ok_or_else(|| AppError::ConfigError {
            reason: "Failed to get project directories".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
