//! Command table and command/flag support matrix.
//!
//! Every dialect has a command table whose first entry is the empty
//! command (`name: None`), plus a [`SupportMatrix`] listing which flags are
//! legal under each command. The parser rejects a flag that is not legal
//! for the detected command; the generator silently skips one.
//!
//! # Examples
//!
//! ```
//! use dump_params_core::SupportMatrix;
//!
//! const GENERAL: &[&str] = &["help", "verbose"];
//! const DRIVE: &[&str] = &["drive", "speed"];
//!
//! let matrix = SupportMatrix::builder()
//!     .command(None, &[GENERAL])
//!     .command(Some("disc"), &[GENERAL, DRIVE])
//!     .build();
//!
//! assert!(matrix.is_flag_supported(Some("disc"), "speed"));
//! assert!(!matrix.is_flag_supported(None, "speed"));
//! assert!(!matrix.is_flag_supported(Some("eject"), "help"));
//! ```

use std::collections::HashSet;

/// One base command of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    /// Command spelling; `None` is the empty command.
    pub name: Option<&'static str>,
    /// One-line description for help output.
    pub description: &'static str,
    /// Whether the command physically reads media.
    pub dumping: bool,
    /// Positional parameter identifiers, consumed in order after the command.
    pub positionals: &'static [&'static str],
    /// Flags that must carry a value for generation to succeed.
    pub required: &'static [&'static str],
}

impl CommandSpec {
    /// A command with no positionals and no required flags.
    pub const fn new(name: Option<&'static str>, description: &'static str) -> Self {
        Self {
            name,
            description,
            dumping: false,
            positionals: &[],
            required: &[],
        }
    }

    /// Marks the command as one that reads media.
    pub const fn dumping(self) -> Self {
        Self {
            dumping: true,
            ..self
        }
    }

    /// Sets the positional parameters.
    pub const fn with_positionals(self, positionals: &'static [&'static str]) -> Self {
        Self {
            positionals,
            ..self
        }
    }

    /// Sets the value-required flags.
    pub const fn with_required(self, required: &'static [&'static str]) -> Self {
        Self { required, ..self }
    }

    /// Display label, `<none>` for the empty command.
    pub fn label(&self) -> &'static str {
        self.name.unwrap_or("<none>")
    }
}

#[derive(Debug, Clone)]
struct Entry {
    command: Option<&'static str>,
    ordered: Vec<&'static str>,
    lookup: HashSet<&'static str>,
}

/// Legality table of flags per command.
///
/// Immutable once built; dialects build theirs once on first use.
#[derive(Debug, Clone, Default)]
pub struct SupportMatrix {
    entries: Vec<Entry>,
}

impl SupportMatrix {
    /// Starts building a matrix.
    pub fn builder() -> SupportMatrixBuilder {
        SupportMatrixBuilder::default()
    }

    /// Returns `true` if `flag` is legal under `command`.
    ///
    /// Unknown commands support nothing.
    pub fn is_flag_supported(&self, command: Option<&str>, flag: &str) -> bool {
        self.entry(command)
            .is_some_and(|entry| entry.lookup.contains(flag))
    }

    /// Flags legal under `command`, in declaration order.
    pub fn flags_for(&self, command: Option<&str>) -> &[&'static str] {
        self.entry(command)
            .map(|entry| entry.ordered.as_slice())
            .unwrap_or_default()
    }

    /// All commands with their legal flags, in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (Option<&'static str>, &[&'static str])> {
        self.entries
            .iter()
            .map(|entry| (entry.command, entry.ordered.as_slice()))
    }

    fn entry(&self, command: Option<&str>) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.command == command)
    }
}

/// Builder for [`SupportMatrix`].
#[derive(Debug, Default)]
pub struct SupportMatrixBuilder {
    entries: Vec<Entry>,
}

impl SupportMatrixBuilder {
    /// Declares the flags legal under `command` as the union of `groups`.
    ///
    /// Duplicates across groups are kept once, at their first position.
    /// Declaring the same command twice extends its entry.
    pub fn command(mut self, command: Option<&'static str>, groups: &[&[&'static str]]) -> Self {
        let index = match self.entries.iter().position(|e| e.command == command) {
            Some(index) => index,
            None => {
                self.entries.push(Entry {
                    command,
                    ordered: Vec::new(),
                    lookup: HashSet::new(),
                });
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[index];
        for flag in groups.iter().flat_map(|group| group.iter().copied()) {
            if entry.lookup.insert(flag) {
                entry.ordered.push(flag);
            }
        }
        self
    }

    /// Finishes the matrix.
    pub fn build(self) -> SupportMatrix {
        SupportMatrix {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &[&str] = &["a", "b"];
    const B: &[&str] = &["b", "c"];

    #[test]
    fn test_union_keeps_first_position() {
        let matrix = SupportMatrix::builder().command(Some("x"), &[A, B]).build();
        assert_eq!(matrix.flags_for(Some("x")), &["a", "b", "c"]);
    }

    #[test]
    fn test_unknown_command_supports_nothing() {
        let matrix = SupportMatrix::builder().command(None, &[A]).build();
        assert!(matrix.is_flag_supported(None, "a"));
        assert!(!matrix.is_flag_supported(Some("x"), "a"));
        assert!(matrix.flags_for(Some("x")).is_empty());
    }

    #[test]
    fn test_redeclaring_extends_entry() {
        let matrix = SupportMatrix::builder()
            .command(Some("x"), &[A])
            .command(Some("y"), &[B])
            .command(Some("x"), &[B])
            .build();
        assert_eq!(matrix.flags_for(Some("x")), &["a", "b", "c"]);
        let order: Vec<_> = matrix.entries().map(|(c, _)| c).collect();
        assert_eq!(order, vec![Some("x"), Some("y")]);
    }

    #[test]
    fn test_command_spec_builders() {
        let cd = CommandSpec::new(Some("cd"), "Dump a CD")
            .dumping()
            .with_positionals(&["drive", "filename"])
            .with_required(&["drive"]);
        assert!(cd.dumping);
        assert_eq!(cd.positionals, &["drive", "filename"]);
        assert_eq!(CommandSpec::new(None, "").label(), "<none>");
    }
}
