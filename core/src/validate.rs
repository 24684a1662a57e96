//! Catalog validation.
//!
//! Checks the structural invariants a [`DialectSpec`] relies on: unique
//! identifiers and spellings, a support matrix that only names known flags
//! and commands, well-formed positionals, and sane value bounds. The
//! built-in dialects are checked by the test suite; the function is public
//! so tooling can report on them too.
//!
//! # Examples
//!
//! ```
//! use dump_params_core::{Dialect, validate_dialect};
//!
//! for dialect in Dialect::ALL {
//!     assert!(validate_dialect(dialect.spec()).is_empty());
//! }
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::dialect::DialectSpec;
use crate::input::{ValueKind, ValueStyle};

/// Catalog validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The command table does not start with the empty command.
    #[error("command table must start with the empty command")]
    MissingEmptyCommand,
    /// Two commands share a name.
    #[error("duplicate command: {0}")]
    DuplicateCommand(String),
    /// Two flags share an identifier.
    #[error("duplicate flag: {0}")]
    DuplicateFlag(String),
    /// Two flags share a spelling.
    #[error("duplicate spelling: {0}")]
    DuplicateSpelling(String),
    /// A spelling is empty or contains whitespace or `=`.
    #[error("invalid spelling for {flag}: {spelling:?}")]
    InvalidSpelling {
        /// Flag identifier.
        flag: String,
        /// Offending spelling.
        spelling: String,
    },
    /// The support matrix has an entry for a command not in the table.
    #[error("support matrix names unknown command {0}")]
    UnknownMatrixCommand(String),
    /// The support matrix names a flag not in the catalog.
    #[error("support matrix for {command} names unknown flag {flag}")]
    UnknownMatrixFlag {
        /// Command label.
        command: String,
        /// Flag identifier.
        flag: String,
    },
    /// A command's positional is missing, has spellings, or is not single-valued.
    #[error("command {command} has invalid positional {flag}")]
    InvalidPositional {
        /// Command label.
        command: String,
        /// Positional identifier.
        flag: String,
    },
    /// A command requires a flag that is not in the catalog.
    #[error("command {command} requires unknown flag {flag}")]
    UnknownRequiredFlag {
        /// Command label.
        command: String,
        /// Flag identifier.
        flag: String,
    },
    /// A multi-slot flag in a dialect that spells values inline.
    #[error("flag {0} has several values but the dialect spells values inline")]
    InlineMultiValue(String),
    /// A slot's bounds or choices do not fit its kind.
    #[error("flag {flag} slot {slot} has invalid bounds or choices")]
    InvalidSlot {
        /// Flag identifier.
        flag: String,
        /// Slot index.
        slot: usize,
    },
}

/// Validates a dialect's command table, flag catalog, and support matrix.
///
/// Returns every problem found, in table order.
pub fn validate_dialect(spec: &DialectSpec) -> Vec<CatalogError> {
    let mut errors = Vec::new();

    if spec.commands.first().is_none_or(|c| c.name.is_some()) {
        errors.push(CatalogError::MissingEmptyCommand);
    }

    let mut commands: HashSet<Option<&str>> = HashSet::new();
    for command in spec.commands {
        if !commands.insert(command.name) {
            errors.push(CatalogError::DuplicateCommand(command.label().to_string()));
        }
    }

    errors.extend(validate_flags(spec));

    for (command, flags) in spec.matrix.entries() {
        let label = command.unwrap_or("<none>");
        if !commands.contains(&command) {
            errors.push(CatalogError::UnknownMatrixCommand(label.to_string()));
        }
        for flag in flags {
            if spec.flag(flag).is_none() {
                errors.push(CatalogError::UnknownMatrixFlag {
                    command: label.to_string(),
                    flag: flag.to_string(),
                });
            }
        }
    }

    for command in spec.commands {
        for id in command.positionals {
            let valid = spec
                .flag(id)
                .is_some_and(|f| f.is_positional() && f.values.len() == 1);
            if !valid {
                errors.push(CatalogError::InvalidPositional {
                    command: command.label().to_string(),
                    flag: id.to_string(),
                });
            }
        }
        for id in command.required {
            if spec.flag(id).is_none() {
                errors.push(CatalogError::UnknownRequiredFlag {
                    command: command.label().to_string(),
                    flag: id.to_string(),
                });
            }
        }
    }

    errors
}

fn validate_flags(spec: &DialectSpec) -> Vec<CatalogError> {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();
    let mut spellings = HashSet::new();

    for flag in spec.flags {
        if !ids.insert(flag.id) {
            errors.push(CatalogError::DuplicateFlag(flag.id.to_string()));
        }

        for spelling in flag.spellings() {
            if spelling.is_empty() || spelling.contains(|c: char| c.is_whitespace() || c == '=') {
                errors.push(CatalogError::InvalidSpelling {
                    flag: flag.id.to_string(),
                    spelling: spelling.to_string(),
                });
            }
            if !spellings.insert(spelling) {
                errors.push(CatalogError::DuplicateSpelling(spelling.to_string()));
            }
        }

        if spec.value_style == ValueStyle::Equals && !flag.is_positional() && flag.values.len() > 1
        {
            errors.push(CatalogError::InlineMultiValue(flag.id.to_string()));
        }

        for (slot, value) in flag.values.iter().enumerate() {
            let valid = match value.kind {
                ValueKind::String => value.min.is_none() && value.max.is_none(),
                _ => {
                    value.choices.is_empty()
                        && value.bounds().is_some_and(|(min, max)| min <= max)
                }
            };
            if !valid {
                errors.push(CatalogError::InvalidSlot {
                    flag: flag.id.to_string(),
                    slot,
                });
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{CommandStyle, Dialect, UnknownTokens};
    use crate::input::{FlagSpec, ValueSpec};
    use crate::matrix::{CommandSpec, SupportMatrix};

    fn spec(
        commands: &'static [CommandSpec],
        flags: &'static [FlagSpec],
        matrix: SupportMatrix,
    ) -> DialectSpec {
        DialectSpec {
            dialect: Dialect::Redumper,
            command_style: CommandStyle::Modes,
            command_required: false,
            unknown_tokens: UnknownTokens::Reject,
            value_style: ValueStyle::Equals,
            strict_key_value: false,
            commands,
            flags,
            matrix,
            hooks: Dialect::Redumper.spec().hooks,
        }
    }

    const INT: &[ValueSpec] = &[ValueSpec::int32("n")];

    #[test]
    fn test_builtin_dialects_are_valid() {
        for dialect in Dialect::ALL {
            let errors = validate_dialect(dialect.spec());
            assert!(errors.is_empty(), "{dialect}: {errors:?}");
        }
    }

    #[test]
    fn test_missing_empty_command() {
        static COMMANDS: &[CommandSpec] = &[CommandSpec::new(Some("disc"), "")];
        let errors = validate_dialect(&spec(COMMANDS, &[], SupportMatrix::default()));
        assert_eq!(errors, vec![CatalogError::MissingEmptyCommand]);
    }

    #[test]
    fn test_duplicates() {
        static COMMANDS: &[CommandSpec] = &[
            CommandSpec::new(None, ""),
            CommandSpec::new(Some("disc"), ""),
            CommandSpec::new(Some("disc"), ""),
        ];
        static FLAGS: &[FlagSpec] = &[
            FlagSpec::boolean("verbose", None, Some("--verbose")),
            FlagSpec::boolean("loud", Some("-v"), Some("--verbose")),
            FlagSpec::boolean("verbose", None, Some("--chatty")),
        ];
        let errors = validate_dialect(&spec(COMMANDS, FLAGS, SupportMatrix::default()));
        assert!(errors.contains(&CatalogError::DuplicateCommand("disc".into())));
        assert!(errors.contains(&CatalogError::DuplicateSpelling("--verbose".into())));
        assert!(errors.contains(&CatalogError::DuplicateFlag("verbose".into())));
    }

    #[test]
    fn test_matrix_references() {
        static COMMANDS: &[CommandSpec] = &[CommandSpec::new(None, "")];
        static FLAGS: &[FlagSpec] = &[FlagSpec::boolean("verbose", None, Some("--verbose"))];
        const GROUP: &[&str] = &["verbose", "quiet"];
        let matrix = SupportMatrix::builder()
            .command(None, &[GROUP])
            .command(Some("ghost"), &[GROUP])
            .build();
        let errors = validate_dialect(&spec(COMMANDS, FLAGS, matrix));
        assert!(errors.contains(&CatalogError::UnknownMatrixCommand("ghost".into())));
        assert!(errors.contains(&CatalogError::UnknownMatrixFlag {
            command: "<none>".into(),
            flag: "quiet".into()
        }));
    }

    #[test]
    fn test_positionals_and_required() {
        static COMMANDS: &[CommandSpec] = &[
            CommandSpec::new(None, "")
                .with_positionals(&["speed"])
                .with_required(&["missing"]),
        ];
        static FLAGS: &[FlagSpec] = &[FlagSpec::valued("speed", None, Some("--speed"), INT)];
        let errors = validate_dialect(&spec(COMMANDS, FLAGS, SupportMatrix::default()));
        assert_eq!(
            errors,
            vec![
                CatalogError::InvalidPositional {
                    command: "<none>".into(),
                    flag: "speed".into()
                },
                CatalogError::UnknownRequiredFlag {
                    command: "<none>".into(),
                    flag: "missing".into()
                },
            ]
        );
    }

    #[test]
    fn test_slots() {
        static COMMANDS: &[CommandSpec] = &[CommandSpec::new(None, "")];
        const BACKWARDS: &[ValueSpec] = &[ValueSpec::int8("n").bounded(5, 1)];
        const PAIR: &[ValueSpec] = &[ValueSpec::int32("a"), ValueSpec::int32("b")];
        const BOUNDED_TEXT: &[ValueSpec] = &[ValueSpec::string("s").bounded(0, 1)];
        static FLAGS: &[FlagSpec] = &[
            FlagSpec::valued("backwards", None, Some("--backwards"), BACKWARDS),
            FlagSpec::valued("pair", None, Some("--pair"), PAIR),
            FlagSpec::valued("text", None, Some("--text"), BOUNDED_TEXT),
            FlagSpec::boolean("spaced", None, Some("--spa ced")),
        ];
        let errors = validate_dialect(&spec(COMMANDS, FLAGS, SupportMatrix::default()));
        assert!(errors.contains(&CatalogError::InvalidSlot {
            flag: "backwards".into(),
            slot: 0
        }));
        assert!(errors.contains(&CatalogError::InlineMultiValue("pair".into())));
        assert!(errors.contains(&CatalogError::InvalidSlot {
            flag: "text".into(),
            slot: 0
        }));
        assert!(errors.contains(&CatalogError::InvalidSpelling {
            flag: "spaced".into(),
            spelling: "--spa ced".into()
        }));
    }
}
