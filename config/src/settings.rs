//! User settings: tool locations and dump option defaults.
//!
//! Settings are stored as YAML or JSON, picked by file extension. Every
//! field has a default, so a file only needs the values it changes.
//!
//! # Example YAML
//!
//! ```yaml
//! default_dialect: redumper
//! redumper_path: C:\Tools\redumper.exe
//! options:
//!   redumper:
//!     retries: 100
//!     drive_type: PLEXTOR
//!   dic:
//!     paranoid_mode: true
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use dump_params_core::{Dialect, DumpOptions};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};

/// On-disk settings encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    Json,
    Yaml,
}

impl SettingsFormat {
    /// Picks the format from a path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](ConfigError::UnsupportedFormat) for any
    /// extension other than `json`, `yaml`, or `yml`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(SettingsFormat::Json),
            Some("yaml" | "yml") => Ok(SettingsFormat::Yaml),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Persistent user settings.
///
/// # Examples
///
/// ```
/// use dump_params_config::Settings;
/// use dump_params_core::Dialect;
///
/// let settings: Settings = serde_yaml::from_str("dd_path: /usr/bin/dd").unwrap();
/// assert_eq!(
///     settings.executable(Dialect::Dd).map(|p| p.to_string_lossy().into_owned()),
///     Some("/usr/bin/dd".to_string())
/// );
/// assert_eq!(settings.options.dic.reread_count, 20);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Dialect used when none is given on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_dialect: Option<Dialect>,
    /// DiscImageCreator executable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dic_path: Option<PathBuf>,
    /// Redumper executable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redumper_path: Option<PathBuf>,
    /// dd executable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dd_path: Option<PathBuf>,
    /// Defaults applied when generating parameters.
    pub options: DumpOptions,
}

impl Settings {
    /// Loads settings, choosing JSON or YAML by extension.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigError::IoError) if the file cannot be read,
    /// [`UnsupportedFormat`](ConfigError::UnsupportedFormat) for an unknown
    /// extension, or a JSON/YAML error if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = SettingsFormat::from_path(path)?;
        let reader = BufReader::new(File::open(path)?);
        let settings = match format {
            SettingsFormat::Json => serde_json::from_reader(reader)?,
            SettingsFormat::Yaml => serde_yaml::from_reader(reader)?,
        };
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Loads settings if a path is given, otherwise returns defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Saves settings, choosing JSON or YAML by extension.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ConfigError::IoError) if the file cannot be
    /// written, [`UnsupportedFormat`](ConfigError::UnsupportedFormat) for an
    /// unknown extension, or a JSON/YAML error if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = SettingsFormat::from_path(path)?;
        let writer = BufWriter::new(File::create(path)?);
        match format {
            SettingsFormat::Json => serde_json::to_writer_pretty(writer, self)?,
            SettingsFormat::Yaml => serde_yaml::to_writer(writer, self)?,
        }
        Ok(())
    }

    /// Configured executable for a dialect.
    pub fn executable(&self, dialect: Dialect) -> Option<&Path> {
        match dialect {
            Dialect::DiscImageCreator => self.dic_path.as_deref(),
            Dialect::Redumper => self.redumper_path.as_deref(),
            Dialect::Dd => self.dd_path.as_deref(),
        }
    }
}
