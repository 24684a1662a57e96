//! User-configurable dump defaults.
//!
//! [`DumpOptions`] is the bag of preferences consulted when a context is
//! populated from a dump request. Each field is applied only when it
//! differs from the tool's own default. All sections deserialize with
//! defaults, so a config file may set just the fields it cares about.
//!
//! # Examples
//!
//! ```
//! use dump_params_core::DumpOptions;
//!
//! let options = DumpOptions::default();
//! assert_eq!(options.dic.reread_count, 20);
//! assert_eq!(options.redumper.retries, 0);
//! assert!(options.dd.progress);
//! ```

use serde::{Deserialize, Serialize};

/// Options for all supported tools.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpOptions {
    /// DiscImageCreator options.
    pub dic: DicOptions,
    /// Redumper options.
    pub redumper: RedumperOptions,
    /// dd options.
    pub dd: DdOptions,
}

/// Read opcode DiscImageCreator should use for CD media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DicReadOpcode {
    /// Let the tool pick.
    #[default]
    Auto,
    /// Force the 0xBE opcode.
    Be,
    /// Force the 0xD8 opcode.
    D8,
}

/// DiscImageCreator options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DicOptions {
    /// C2 error reread count for CD and GD-ROM media.
    pub reread_count: i32,
    /// Reread count for DVD and HD-DVD media.
    pub dvd_reread_count: i32,
    /// Reread count for Blu-ray media.
    pub bd_reread_count: i32,
    /// Enable extra protection scanning and subchannel checks.
    pub paranoid_mode: bool,
    /// Disable the completion beep.
    pub quiet_mode: bool,
    /// Read multiple sectors per request; 0 leaves the tool default.
    pub multi_sector_read: i32,
    /// Read opcode for CD media.
    pub read_opcode: DicReadOpcode,
}

impl Default for DicOptions {
    fn default() -> Self {
        Self {
            reread_count: 20,
            dvd_reread_count: 10,
            bd_reread_count: 10,
            paranoid_mode: false,
            quiet_mode: false,
            multi_sector_read: 0,
            read_opcode: DicReadOpcode::Auto,
        }
    }
}

/// Drive type override understood by Redumper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RedumperDriveType {
    /// Generic MMC drive (tool default).
    #[default]
    Generic,
    /// Plextor.
    Plextor,
    /// LG/ASUS 8 MiB cache, variant A.
    #[serde(rename = "LG_ASU8A")]
    LgAsu8a,
    /// LG/ASUS 8 MiB cache, variant B.
    #[serde(rename = "LG_ASU8B")]
    LgAsu8b,
    /// LG/ASUS 8 MiB cache, variant C.
    #[serde(rename = "LG_ASU8C")]
    LgAsu8c,
    /// LG/ASUS 3 MiB cache.
    #[serde(rename = "LG_ASU3")]
    LgAsu3,
    /// LG/ASUS 2 MiB cache.
    #[serde(rename = "LG_ASU2")]
    LgAsu2,
}

impl RedumperDriveType {
    /// Value as spelled on the Redumper command line.
    pub fn name(self) -> &'static str {
        match self {
            RedumperDriveType::Generic => "GENERIC",
            RedumperDriveType::Plextor => "PLEXTOR",
            RedumperDriveType::LgAsu8a => "LG_ASU8A",
            RedumperDriveType::LgAsu8b => "LG_ASU8B",
            RedumperDriveType::LgAsu8c => "LG_ASU8C",
            RedumperDriveType::LgAsu3 => "LG_ASU3",
            RedumperDriveType::LgAsu2 => "LG_ASU2",
        }
    }
}

/// Read method override understood by Redumper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RedumperReadMethod {
    /// Leave the drive's default.
    #[default]
    Default,
    /// READ CD (0xBE).
    Be,
    /// Plextor READ CDDA (0xD8).
    D8,
    /// READ CD with CDDA sector type.
    BeCdda,
}

impl RedumperReadMethod {
    /// Value as spelled on the Redumper command line, `None` for the default.
    pub fn name(self) -> Option<&'static str> {
        match self {
            RedumperReadMethod::Default => None,
            RedumperReadMethod::Be => Some("BE"),
            RedumperReadMethod::D8 => Some("D8"),
            RedumperReadMethod::BeCdda => Some("BE_CDDA"),
        }
    }
}

/// Sector data layout override understood by Redumper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RedumperSectorOrder {
    /// Leave the drive's default.
    #[default]
    Default,
    /// Data, C2, subchannel.
    DataC2Sub,
    /// Data, subchannel, C2.
    DataSubC2,
    /// Data, subchannel.
    DataSub,
    /// Data, C2.
    DataC2,
}

impl RedumperSectorOrder {
    /// Value as spelled on the Redumper command line, `None` for the default.
    pub fn name(self) -> Option<&'static str> {
        match self {
            RedumperSectorOrder::Default => None,
            RedumperSectorOrder::DataC2Sub => Some("DATA_C2_SUB"),
            RedumperSectorOrder::DataSubC2 => Some("DATA_SUB_C2"),
            RedumperSectorOrder::DataSub => Some("DATA_SUB"),
            RedumperSectorOrder::DataC2 => Some("DATA_C2"),
        }
    }
}

/// Redumper options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedumperOptions {
    /// Sector reread count; 0 leaves the tool default.
    pub retries: i32,
    /// Verbose logging.
    pub verbose: bool,
    /// Write debug state files.
    pub debug: bool,
    /// Generate a skeleton image after dumping.
    pub skeleton: bool,
    /// Skip the Plextor lead-in read.
    pub plextor_skip_leadin: bool,
    /// Plextor lead-in retry count.
    pub leadin_retry_count: i32,
    /// Drive type override.
    pub drive_type: RedumperDriveType,
    /// Read method override.
    pub read_method: RedumperReadMethod,
    /// Sector order override.
    pub sector_order: RedumperSectorOrder,
}

impl Default for RedumperOptions {
    fn default() -> Self {
        Self {
            retries: 0,
            verbose: false,
            debug: false,
            skeleton: false,
            plextor_skip_leadin: false,
            leadin_retry_count: 4,
            drive_type: RedumperDriveType::Generic,
            read_method: RedumperReadMethod::Default,
            sector_order: RedumperSectorOrder::Default,
        }
    }
}

/// dd options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DdOptions {
    /// Block size in bytes; 0 leaves the tool default.
    pub block_size: i64,
    /// Show transfer progress.
    pub progress: bool,
}

impl Default for DdOptions {
    fn default() -> Self {
        Self {
            block_size: 0,
            progress: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: DumpOptions =
            serde_json::from_str(r#"{ "dic": { "paranoid_mode": true } }"#).unwrap();
        assert!(options.dic.paranoid_mode);
        assert_eq!(options.dic.reread_count, 20);
        assert_eq!(options.redumper, RedumperOptions::default());
    }

    #[test]
    fn test_redumper_enums_use_tool_spelling() {
        let options: RedumperOptions = serde_json::from_str(
            r#"{
                "drive_type": "LG_ASU3",
                "read_method": "BE_CDDA",
                "sector_order": "DATA_SUB_C2"
            }"#,
        )
        .unwrap();
        assert_eq!(options.drive_type, RedumperDriveType::LgAsu3);
        assert_eq!(options.drive_type.name(), "LG_ASU3");
        assert_eq!(options.read_method.name(), Some("BE_CDDA"));
        assert_eq!(options.sector_order.name(), Some("DATA_SUB_C2"));
    }

    #[test]
    fn test_dic_opcode_is_lowercase() {
        let options: DicOptions = serde_json::from_str(r#"{ "read_opcode": "d8" }"#).unwrap();
        assert_eq!(options.read_opcode, DicReadOpcode::D8);
    }
}
