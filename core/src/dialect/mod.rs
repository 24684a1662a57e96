//! Tool dialects.
//!
//! A dialect is a complete description of one dumping tool's command line:
//! its command table, flag catalog, support matrix, spelling conventions,
//! and a handful of policy hooks. The engine in
//! [`ExecutionContext`](crate::ExecutionContext) is shared; everything that
//! differs between tools lives in a [`DialectSpec`].
//!
//! | Dialect | Commands | Flags | Unknown tokens |
//! |---------|----------|-------|----------------|
//! | [`Dialect::DiscImageCreator`] | one leading command + positionals | `/x [values]` | rejected |
//! | [`Dialect::Redumper`] | leading modes, first wins | `--long[=value]` | rejected |
//! | [`Dialect::Dd`] | optional `--list` | `key=value` | skipped |

pub mod dd;
pub mod dic;
pub mod redumper;

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::context::{DumpRequest, ExecutionContext};
use crate::input::{FlagSpec, ValueStyle};
use crate::matrix::{CommandSpec, SupportMatrix};
use crate::types::MediaType;

/// Supported tool dialects.
///
/// # Examples
///
/// ```
/// use dump_params_core::Dialect;
///
/// let dialect: Dialect = "redumper".parse().unwrap();
/// assert_eq!(dialect, Dialect::Redumper);
/// assert!(dialect.spec().find_command("disc").is_some());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    /// DiscImageCreator: slash flags, leading command, positional parameters.
    DiscImageCreator,
    /// Redumper: GNU long flags, multiple leading modes.
    Redumper,
    /// dd for Windows: `key=value` operands.
    Dd,
}

impl Dialect {
    /// All dialects, in declaration order.
    pub const ALL: [Dialect; 3] = [Dialect::DiscImageCreator, Dialect::Redumper, Dialect::Dd];

    /// Kebab-case name.
    pub fn name(self) -> &'static str {
        match self {
            Dialect::DiscImageCreator => "disc-image-creator",
            Dialect::Redumper => "redumper",
            Dialect::Dd => "dd",
        }
    }

    /// The dialect's immutable descriptor, built on first use.
    pub fn spec(self) -> &'static DialectSpec {
        match self {
            Dialect::DiscImageCreator => LazyLock::force(&dic::SPEC),
            Dialect::Redumper => LazyLock::force(&redumper::SPEC),
            Dialect::Dd => LazyLock::force(&dd::SPEC),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "disc-image-creator" | "discimagecreator" | "dic" => Ok(Dialect::DiscImageCreator),
            "redumper" => Ok(Dialect::Redumper),
            "dd" => Ok(Dialect::Dd),
            _ => Err(format!("unknown dialect: {s}")),
        }
    }
}

/// How the base command is spelled at the start of a parameter string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandStyle {
    /// At most one leading command token.
    Leading,
    /// Any number of leading mode tokens; the first becomes the base command.
    Modes,
}

/// What the parser does with a token that matches no flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownTokens {
    /// Fail the parse.
    Reject,
    /// Skip the token and continue.
    Skip,
}

/// Dialect-specific behavior that is not expressible as table data.
#[derive(Clone, Copy)]
pub(crate) struct Hooks {
    /// Populates a freshly reset context from a dump request.
    pub apply_defaults: fn(&mut ExecutionContext, &DumpRequest<'_>),
    /// Fills derived values after a successful parse.
    pub finish_parse: fn(&mut ExecutionContext),
    /// Infers the media type from the flags that are set.
    pub media_type: fn(&ExecutionContext) -> Option<MediaType>,
    /// Path the tool reads from.
    pub input_path: fn(&ExecutionContext) -> Option<String>,
    /// Path the tool writes to.
    pub output_path: fn(&ExecutionContext) -> Option<String>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks").finish_non_exhaustive()
    }
}

/// Immutable description of one dialect.
#[derive(Debug)]
pub struct DialectSpec {
    /// Dialect this descriptor belongs to.
    pub dialect: Dialect,
    /// Leading command convention.
    pub command_style: CommandStyle,
    /// Whether a parameter string must start with a known command.
    pub command_required: bool,
    /// Unknown token policy during the flag scan.
    pub unknown_tokens: UnknownTokens,
    /// How values are joined to spellings on output.
    pub value_style: ValueStyle,
    /// Whether a token containing `=` must split into exactly two segments.
    pub strict_key_value: bool,
    /// Command table; the first entry is the empty command.
    pub commands: &'static [CommandSpec],
    /// Flag catalog in output order, positionals included.
    pub flags: &'static [FlagSpec],
    /// Legality of flags per command.
    pub matrix: SupportMatrix,
    pub(crate) hooks: Hooks,
}

impl DialectSpec {
    /// Looks up a command by name; `None` is the empty command.
    pub fn command(&self, name: Option<&str>) -> Option<&'static CommandSpec> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Looks up a named command by its spelling.
    pub fn find_command(&self, token: &str) -> Option<&'static CommandSpec> {
        self.commands.iter().find(|c| c.name == Some(token))
    }

    /// Looks up a flag by identifier.
    pub fn flag(&self, id: &str) -> Option<&'static FlagSpec> {
        self.flags.iter().find(|f| f.id == id)
    }

    /// Named (non-positional) flags in catalog order.
    pub fn named_flags(&self) -> impl Iterator<Item = &'static FlagSpec> {
        self.flags.iter().filter(|f| !f.is_positional())
    }

    /// Returns `true` if `token` is a spelling of any flag in the catalog.
    pub fn is_flag_token(&self, token: &str) -> bool {
        self.flags.iter().any(|f| f.matches(token))
    }

    /// Returns `true` if `flag` is legal under `command`.
    pub fn is_flag_supported(&self, command: Option<&str>, flag: &str) -> bool {
        self.matrix.is_flag_supported(command, flag)
    }

    /// The support matrix as command → flags, in declaration order.
    pub fn support_matrix(&self) -> Vec<(Option<&'static str>, Vec<&'static str>)> {
        self.matrix
            .entries()
            .map(|(command, flags)| (command, flags.to_vec()))
            .collect()
    }
}

/// Splits a path into its directory and file name.
///
/// Both `/` and `\` are separators, so Windows paths split the same way on
/// every host.
pub(crate) fn split_output_path(path: &str) -> (Option<&str>, &str) {
    match path.rfind(['/', '\\']) {
        Some(pos) => {
            let dir = &path[..pos];
            (Some(if dir.is_empty() { &path[..=pos] } else { dir }), &path[pos + 1..])
        }
        None => (None, path),
    }
}

/// Returns a file name without its last extension.
pub(crate) fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => name,
        Some(pos) => &name[..pos],
    }
}

/// Joins a directory and file name with the directory's own separator style.
pub(crate) fn join_output_path(dir: &str, name: &str) -> String {
    let separator = if dir.contains('\\') && !dir.contains('/') {
        '\\'
    } else {
        '/'
    };
    let trimmed = dir.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        format!("{dir}{name}")
    } else {
        format!("{trimmed}{separator}{name}")
    }
}
