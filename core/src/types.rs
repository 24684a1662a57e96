//! Shared value and metadata types.
//!
//! [`Value`] and [`FlagState`] are the two halves of a context's sparse flag
//! model; [`MediaType`] and [`RedumpSystem`] are the metadata used to bias
//! default population.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Presence of a flag in an execution context.
///
/// A flag missing from the context's map is [`FlagState::Absent`]. A value
/// stored for a flag only counts when the flag is [`FlagState::SetTrue`].
///
/// # Examples
///
/// ```
/// use dump_params_core::FlagState;
///
/// assert_eq!(FlagState::default(), FlagState::Absent);
/// assert!(FlagState::SetTrue.is_set());
/// assert!(!FlagState::SetFalse.is_set());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FlagState {
    /// Not present in the model.
    #[default]
    Absent,
    /// Explicitly turned off.
    SetFalse,
    /// Explicitly turned on.
    SetTrue,
}

impl FlagState {
    /// Returns `true` only for [`FlagState::SetTrue`].
    pub fn is_set(self) -> bool {
        matches!(self, FlagState::SetTrue)
    }
}

impl From<bool> for FlagState {
    fn from(on: bool) -> Self {
        if on {
            FlagState::SetTrue
        } else {
            FlagState::SetFalse
        }
    }
}

/// A decoded flag or positional value.
///
/// Integer kinds of every width are stored widened to `i64` after their
/// bounds have been checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Any integer kind.
    Int(i64),
    /// A string value, without surrounding quotes.
    Text(String),
}

impl Value {
    /// Returns the integer, if this is an integer value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Text(_) => None,
        }
    }

    /// Returns the string, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Int(_) => None,
            Value::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Physical media family of a disc or disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaType {
    /// CD-ROM and other compact disc variants.
    CdRom,
    /// DVD.
    Dvd,
    /// HD-DVD.
    HdDvd,
    /// Blu-ray disc.
    BluRay,
    /// Sega GD-ROM.
    GdRom,
    /// Nintendo GameCube game disc.
    NintendoGameCubeGameDisc,
    /// Nintendo Wii optical disc.
    NintendoWiiOpticalDisc,
    /// Sony Universal Media Disc.
    Umd,
    /// Floppy disk.
    FloppyDisk,
    /// Hard disk or other block device.
    HardDisk,
}

impl MediaType {
    /// All media types, in declaration order.
    pub const ALL: [MediaType; 10] = [
        MediaType::CdRom,
        MediaType::Dvd,
        MediaType::HdDvd,
        MediaType::BluRay,
        MediaType::GdRom,
        MediaType::NintendoGameCubeGameDisc,
        MediaType::NintendoWiiOpticalDisc,
        MediaType::Umd,
        MediaType::FloppyDisk,
        MediaType::HardDisk,
    ];

    /// Kebab-case name used on the command line and in config files.
    pub fn name(self) -> &'static str {
        match self {
            MediaType::CdRom => "cd-rom",
            MediaType::Dvd => "dvd",
            MediaType::HdDvd => "hd-dvd",
            MediaType::BluRay => "blu-ray",
            MediaType::GdRom => "gd-rom",
            MediaType::NintendoGameCubeGameDisc => "nintendo-game-cube-game-disc",
            MediaType::NintendoWiiOpticalDisc => "nintendo-wii-optical-disc",
            MediaType::Umd => "umd",
            MediaType::FloppyDisk => "floppy-disk",
            MediaType::HardDisk => "hard-disk",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown media type: {s}"))
    }
}

/// Target system of a disc, used to pick system-specific dump flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RedumpSystem {
    /// Audio CD.
    AudioCd,
    /// Apple Macintosh.
    AppleMacintosh,
    /// IBM PC compatible.
    IbmPcCompatible,
    /// Microsoft Xbox.
    MicrosoftXbox,
    /// Microsoft Xbox 360.
    MicrosoftXbox360,
    /// NEC PC Engine CD / TurboGrafx CD.
    NecPcEngineCd,
    /// Nintendo GameCube.
    NintendoGameCube,
    /// Nintendo Wii.
    NintendoWii,
    /// Sega Dreamcast.
    SegaDreamcast,
    /// Sega Saturn.
    SegaSaturn,
    /// Sony PlayStation.
    SonyPlayStation,
    /// Sony PlayStation 2.
    SonyPlayStation2,
    /// Sony PlayStation 3.
    SonyPlayStation3,
    /// Sony PlayStation Portable.
    SonyPlayStationPortable,
}

impl RedumpSystem {
    /// All systems, in declaration order.
    pub const ALL: [RedumpSystem; 14] = [
        RedumpSystem::AudioCd,
        RedumpSystem::AppleMacintosh,
        RedumpSystem::IbmPcCompatible,
        RedumpSystem::MicrosoftXbox,
        RedumpSystem::MicrosoftXbox360,
        RedumpSystem::NecPcEngineCd,
        RedumpSystem::NintendoGameCube,
        RedumpSystem::NintendoWii,
        RedumpSystem::SegaDreamcast,
        RedumpSystem::SegaSaturn,
        RedumpSystem::SonyPlayStation,
        RedumpSystem::SonyPlayStation2,
        RedumpSystem::SonyPlayStation3,
        RedumpSystem::SonyPlayStationPortable,
    ];

    /// Kebab-case name used on the command line and in config files.
    pub fn name(self) -> &'static str {
        match self {
            RedumpSystem::AudioCd => "audio-cd",
            RedumpSystem::AppleMacintosh => "apple-macintosh",
            RedumpSystem::IbmPcCompatible => "ibm-pc-compatible",
            RedumpSystem::MicrosoftXbox => "microsoft-xbox",
            RedumpSystem::MicrosoftXbox360 => "microsoft-xbox360",
            RedumpSystem::NecPcEngineCd => "nec-pc-engine-cd",
            RedumpSystem::NintendoGameCube => "nintendo-game-cube",
            RedumpSystem::NintendoWii => "nintendo-wii",
            RedumpSystem::SegaDreamcast => "sega-dreamcast",
            RedumpSystem::SegaSaturn => "sega-saturn",
            RedumpSystem::SonyPlayStation => "sony-play-station",
            RedumpSystem::SonyPlayStation2 => "sony-play-station2",
            RedumpSystem::SonyPlayStation3 => "sony-play-station3",
            RedumpSystem::SonyPlayStationPortable => "sony-play-station-portable",
        }
    }
}

impl fmt::Display for RedumpSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RedumpSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RedumpSystem::ALL
            .into_iter()
            .find(|sys| sys.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown system: {s}"))
    }
}
