//! Settings files for dump-params.
//!
//! [`Settings`] bundles the executable path of each supported tool with the
//! [`DumpOptions`](dump_params_core::DumpOptions) applied when parameters are
//! generated. Files are YAML (`.yaml`, `.yml`) or JSON (`.json`).
//!
//! # Example
//!
//! ```no_run
//! use dump_params_config::Settings;
//!
//! let settings = Settings::load("dump-params.yaml").unwrap();
//! println!("Redumper retries: {}", settings.options.redumper.retries);
//! ```

mod error;
mod settings;

pub use error::{ConfigError, Result};
pub use settings::{Settings, SettingsFormat};
