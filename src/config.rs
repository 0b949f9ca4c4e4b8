//! Construction-time configuration for loggers
//!
//! The core consumes target directory, file name and default flags through its
//! ordinary setters; a surrounding application (CLI, config loader) fills a
//! [`Settings`] in, by hand or from its TOML file, and builds a logger from
//! it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::FileError;
use crate::logger::{DispatchDefaults, Logger};

/// File name used when a logger resolves a target file on its own
pub const DEFAULT_FILE_NAME: &str = "log.txt";

/// Construction-time settings for one logger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Logger name
    #[serde(default = "default_name")]
    pub name: String,

    /// Target directory for the log file; the process working directory when
    /// unset
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Explicit target file name; the fixed default name when unset
    #[serde(default)]
    pub file_name: Option<String>,

    /// Print new messages by default
    #[serde(default)]
    pub print_new_messages: bool,

    /// Store new messages by default
    #[serde(default)]
    pub store_new_messages: bool,

    /// Write new messages to the target file by default
    #[serde(default)]
    pub write_new_messages_to_file: bool,

    /// Send new messages to the registered handler by default
    #[serde(default)]
    pub send_new_messages_to_handler: bool,
}

fn default_name() -> String {
    "root".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: default_name(),
            directory: None,
            file_name: None,
            print_new_messages: false,
            store_new_messages: false,
            write_new_messages_to_file: false,
            send_new_messages_to_handler: false,
        }
    }
}

impl Settings {
    /// Load settings from the default settings file, or return defaults if it
    /// does not exist
    pub fn load() -> Result<Self> {
        Self::load_from(&settings_file_path())
    }

    /// Load settings from `path`, or return defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content =
                std::fs::read_to_string(path).context("Failed to read settings file")?;
            toml::from_str(&content).context("Failed to parse settings file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save settings to the default settings file
    pub fn save(&self) -> Result<()> {
        self.save_to(&settings_file_path())
    }

    /// Save settings to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, content).context("Failed to write settings file")?;
        Ok(())
    }

    /// Build a logger configured with these settings
    ///
    /// An explicit `file_name` is resolved and created right away (empty names
    /// are rejected); without one the logger keeps its lazy default target.
    pub fn build_logger(&self) -> Result<Logger, FileError> {
        let mut logger = Logger::new(self.name.clone());

        if let Some(directory) = &self.directory {
            logger.set_directory(directory);
        }
        if let Some(file_name) = &self.file_name {
            logger.set_file_name(file_name, true)?;
        }

        logger.set_defaults(DispatchDefaults {
            print: self.print_new_messages,
            store: self.store_new_messages,
            write_to_file: self.write_new_messages_to_file,
            notify_handler: self.send_new_messages_to_handler,
        });
        Ok(logger)
    }
}

/// Get the base directory for the settings file (~/.logbook)
/// Falls back to ./.logbook if the home directory cannot be determined
pub fn settings_dir() -> PathBuf {
    dirs::home_dir().map(|h| h.join(".logbook")).unwrap_or_else(|| {
        tracing::warn!("Could not determine home directory, using current directory for settings");
        PathBuf::from(".logbook")
    })
}

/// Get the path to the settings file
pub fn settings_file_path() -> PathBuf {
    settings_dir().join("logbook.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.name, "root");
        assert!(settings.directory.is_none());
        assert!(settings.file_name.is_none());
        assert!(!settings.print_new_messages);
        assert!(!settings.store_new_messages);
        assert!(!settings.write_new_messages_to_file);
        assert!(!settings.send_new_messages_to_handler);
    }

    #[test]
    fn test_settings_serialization() {
        let mut settings = Settings::default();
        settings.name = "worker".to_string();
        settings.store_new_messages = true;

        let toml_str = toml::to_string(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.name, "worker");
        assert!(parsed.store_new_messages);
        assert!(!parsed.print_new_messages);
    }

    #[test]
    fn test_partial_settings_fill_in_defaults() {
        let parsed: Settings = toml::from_str("print_new_messages = true").unwrap();

        assert_eq!(parsed.name, "root");
        assert!(parsed.print_new_messages);
        assert!(!parsed.store_new_messages);
    }

    #[test]
    fn test_load_from_missing_file_returns_defaults() {
        let dir = TempDir::new().unwrap();

        let settings = Settings::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings.name, "root");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logbook.toml");

        let mut settings = Settings::default();
        settings.file_name = Some("events.log".to_string());
        settings.write_new_messages_to_file = true;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.file_name.as_deref(), Some("events.log"));
        assert!(loaded.write_new_messages_to_file);
    }

    #[test]
    fn test_build_logger_applies_settings() {
        let dir = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.name = "configured".to_string();
        settings.directory = Some(dir.path().to_path_buf());
        settings.file_name = Some("events.log".to_string());
        settings.store_new_messages = true;

        let logger = settings.build_logger().unwrap();

        assert_eq!(logger.name(), "configured");
        assert_eq!(
            logger.file(),
            Some(dir.path().join("events.log").as_path())
        );
        assert!(dir.path().join("events.log").exists());
        assert!(logger.defaults().store);
        assert!(!logger.defaults().print);
    }

    #[test]
    fn test_build_logger_rejects_empty_file_name() {
        let mut settings = Settings::default();
        settings.file_name = Some(String::new());

        assert!(matches!(
            settings.build_logger(),
            Err(FileError::EmptyFileName)
        ));
    }

    #[test]
    fn test_build_logger_keeps_lazy_target_without_file_name() {
        let settings = Settings::default();
        let logger = settings.build_logger().unwrap();
        assert!(logger.file().is_none());
    }

    #[test]
    fn test_settings_dir_does_not_panic() {
        let dir = settings_dir();
        assert!(dir.ends_with(".logbook"));
    }
}
