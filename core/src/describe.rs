//! Serializable descriptions of a dialect, for help output and tooling.
//!
//! # Examples
//!
//! ```
//! use dump_params_core::{Dialect, DialectSummary};
//!
//! let summary = DialectSummary::new(Dialect::DiscImageCreator);
//! let cd = summary.commands.iter().find(|c| c.name.as_deref() == Some("cd")).unwrap();
//! assert!(cd.dumping);
//! assert!(cd.flags.iter().any(|f| f == "c2-opcode"));
//! ```

use serde::{Deserialize, Serialize};

use crate::dialect::{CommandStyle, Dialect, DialectSpec, UnknownTokens};
use crate::input::{FlagSpec, ValueKind, ValueSpec, ValueStyle};
use crate::matrix::CommandSpec;

/// A dialect's commands, flags, and support matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectSummary {
    pub dialect: Dialect,
    pub command_style: CommandStyle,
    pub unknown_tokens: UnknownTokens,
    pub value_style: ValueStyle,
    pub commands: Vec<CommandSummary>,
    pub flags: Vec<FlagSummary>,
}

/// One command and the flags legal under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSummary {
    /// `None` for the empty command.
    pub name: Option<String>,
    pub description: String,
    pub dumping: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub positionals: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Legal flags in declaration order, positionals included.
    #[serde(default)]
    pub flags: Vec<String>,
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSummary {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    pub positional: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<SlotSummary>,
}

/// One value slot of a flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSummary {
    pub name: String,
    pub kind: ValueKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    pub optional: bool,
}

impl DialectSummary {
    /// Summarizes a built-in dialect.
    pub fn new(dialect: Dialect) -> Self {
        Self::from_spec(dialect.spec())
    }

    /// Summarizes a dialect descriptor.
    pub fn from_spec(spec: &DialectSpec) -> Self {
        Self {
            dialect: spec.dialect,
            command_style: spec.command_style,
            unknown_tokens: spec.unknown_tokens,
            value_style: spec.value_style,
            commands: spec
                .commands
                .iter()
                .map(|c| CommandSummary::from_spec(spec, c))
                .collect(),
            flags: spec.flags.iter().map(FlagSummary::from).collect(),
        }
    }

    /// Looks up a flag summary by identifier.
    pub fn flag(&self, id: &str) -> Option<&FlagSummary> {
        self.flags.iter().find(|f| f.id == id)
    }
}

impl CommandSummary {
    fn from_spec(spec: &DialectSpec, command: &CommandSpec) -> Self {
        Self {
            name: command.name.map(str::to_string),
            description: command.description.to_string(),
            dumping: command.dumping,
            positionals: to_strings(command.positionals),
            required: to_strings(command.required),
            flags: to_strings(spec.matrix.flags_for(command.name)),
        }
    }
}

impl From<&FlagSpec> for FlagSummary {
    fn from(flag: &FlagSpec) -> Self {
        Self {
            id: flag.id.to_string(),
            short: flag.short.map(str::to_string),
            long: flag.long.map(str::to_string),
            positional: flag.is_positional(),
            description: flag.description.to_string(),
            values: flag.values.iter().map(SlotSummary::from).collect(),
        }
    }
}

impl From<&ValueSpec> for SlotSummary {
    fn from(slot: &ValueSpec) -> Self {
        Self {
            name: slot.name.to_string(),
            kind: slot.kind,
            min: slot.min,
            max: slot.max,
            choices: to_strings(slot.choices),
            optional: slot.missing_allowed,
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_covers_catalog() {
        for dialect in Dialect::ALL {
            let spec = dialect.spec();
            let summary = DialectSummary::new(dialect);
            assert_eq!(summary.flags.len(), spec.flags.len());
            assert_eq!(summary.commands.len(), spec.commands.len());
            assert_eq!(summary.commands[0].name, None);
        }
    }

    #[test]
    fn test_slot_details() {
        let summary = DialectSummary::new(Dialect::Redumper);
        let drive_type = summary.flag("drive-type").unwrap();
        assert_eq!(drive_type.long.as_deref(), Some("--drive-type"));
        assert_eq!(drive_type.values[0].kind, ValueKind::String);
        assert!(drive_type.values[0].choices.contains(&"PLEXTOR".to_string()));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["dialect"], "redumper");
        // Empty optional fields are left out.
        assert!(json["flags"][0].get("values").is_none());
    }
}
