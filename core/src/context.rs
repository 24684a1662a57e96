//! The execution context: one tool invocation's parameter model.
//!
//! An [`ExecutionContext`] owns the active base command, a sparse map of
//! flag states, the value slots of every set flag, and a little metadata. It
//! is built either from a dump request ([`ExecutionContext::from_request`])
//! or from an existing parameter string
//! ([`ExecutionContext::from_parameters`]), and turned back into a
//! parameter string with [`ExecutionContext::generate_parameters`].
//!
//! Parsing is all-or-nothing: if any step fails, the context is reset to
//! its empty state, so callers never observe a half-parsed model.
//!
//! # Examples
//!
//! ```
//! use dump_params_core::{Dialect, ExecutionContext, Value};
//!
//! let dialect = Dialect::DiscImageCreator;
//! let ctx = ExecutionContext::from_parameters(dialect, "cd F test.bin 8 /c2 20");
//! assert!(ctx.is_valid());
//! assert_eq!(ctx.base_command(), Some("cd"));
//! assert_eq!(ctx.value("c2-opcode"), Some(&Value::Int(20)));
//! assert_eq!(ctx.generate_parameters().as_deref(), Some("cd F test.bin 8 /c2 20"));
//!
//! let broken = ExecutionContext::from_parameters(dialect, "cd F test.bin 8 /nope");
//! assert!(!broken.is_valid());
//! assert_eq!(broken.base_command(), None);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::dialect::{CommandStyle, Dialect, DialectSpec, UnknownTokens};
use crate::error::{GenerateError, ModelError, ParseError, command_label};
use crate::input::{FlagSpec, ValueStyle};
use crate::options::DumpOptions;
use crate::tokenize::tokenize;
use crate::types::{FlagState, MediaType, RedumpSystem, Value};

/// Everything needed to populate a context with sensible dump defaults.
#[derive(Debug, Clone, Copy)]
pub struct DumpRequest<'a> {
    /// Target system, used to pick system-specific flags.
    pub system: Option<RedumpSystem>,
    /// Media in the drive, used to pick the base command.
    pub media_type: Option<MediaType>,
    /// Drive letter or device path.
    pub drive_path: Option<&'a str>,
    /// Output file path.
    pub filename: &'a str,
    /// Read speed; 0 or less leaves the speed unset.
    pub drive_speed: i32,
    /// User-configured option defaults.
    pub options: &'a DumpOptions,
}

/// A tool invocation's parameter model.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionContext {
    dialect: Dialect,
    base_command: Option<&'static str>,
    flags: HashMap<&'static str, FlagState>,
    values: HashMap<&'static str, Vec<Option<Value>>>,
    executable: Option<PathBuf>,
    system: Option<RedumpSystem>,
    media_type: Option<MediaType>,
}

impl ExecutionContext {
    /// An empty context: no command, no flags.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            base_command: None,
            flags: HashMap::new(),
            values: HashMap::new(),
            executable: None,
            system: None,
            media_type: None,
        }
    }

    /// A context populated with the dialect's defaults for a dump request.
    ///
    /// Never fails; whether the result is usable is reported by
    /// [`is_valid`](Self::is_valid).
    pub fn from_request(dialect: Dialect, request: &DumpRequest<'_>) -> Self {
        let mut ctx = Self::new(dialect);
        ctx.set_default_parameters(request);
        ctx
    }

    /// A context parsed from a parameter string.
    ///
    /// Never fails; malformed input yields an empty context for which
    /// [`is_valid`](Self::is_valid) is `false`.
    pub fn from_parameters(dialect: Dialect, parameters: &str) -> Self {
        let mut ctx = Self::new(dialect);
        // Failure is already logged and the context reset.
        let _ = ctx.validate_and_set_parameters(parameters);
        ctx
    }

    /// Like [`from_parameters`](Self::from_parameters), but reports why
    /// the input was rejected.
    pub fn parse(dialect: Dialect, parameters: &str) -> Result<Self, ParseError> {
        let mut ctx = Self::new(dialect);
        ctx.validate_and_set_parameters(parameters)?;
        Ok(ctx)
    }

    /// Sets the tool executable path.
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    /// Tool executable path, if configured.
    pub fn executable(&self) -> Option<&Path> {
        self.executable.as_deref()
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn spec(&self) -> &'static DialectSpec {
        self.dialect.spec()
    }

    /// System the defaults were populated for.
    pub fn system(&self) -> Option<RedumpSystem> {
        self.system
    }

    /// Media type the defaults were populated for.
    pub fn requested_media_type(&self) -> Option<MediaType> {
        self.media_type
    }

    /// Active base command; `None` is the empty command.
    pub fn base_command(&self) -> Option<&'static str> {
        self.base_command
    }

    /// Switches the base command.
    ///
    /// Flags that are illegal for the new command stay in the model but are
    /// left out of generated parameters.
    pub fn set_base_command(&mut self, command: Option<&str>) -> Result<(), ModelError> {
        let spec = self.spec();
        let found = spec
            .command(command)
            .ok_or_else(|| ModelError::UnknownCommand(command_label(command)))?;
        self.base_command = found.name;
        Ok(())
    }

    /// Tri-state of a flag; unknown identifiers are [`FlagState::Absent`].
    pub fn flag_state(&self, flag: &str) -> FlagState {
        self.flags.get(flag).copied().unwrap_or_default()
    }

    /// Returns `true` if the flag is set and on.
    pub fn is_set(&self, flag: &str) -> bool {
        self.flag_state(flag).is_set()
    }

    /// Turns a flag on or off. Turning it off drops its values.
    pub fn set_flag(&mut self, flag: &str, on: bool) -> Result<(), ModelError> {
        let spec = self.flag_spec(flag)?;
        self.flags.insert(spec.id, FlagState::from(on));
        if on {
            self.values
                .entry(spec.id)
                .or_insert_with(|| vec![None; spec.values.len()]);
        } else {
            self.values.remove(spec.id);
        }
        Ok(())
    }

    /// Removes a flag and its values from the model.
    pub fn clear_flag(&mut self, flag: &str) {
        self.flags.remove(flag);
        self.values.remove(flag);
    }

    /// Stores the first value of a flag and marks it set.
    pub fn set_value(&mut self, flag: &str, value: impl Into<Value>) -> Result<(), ModelError> {
        self.set_slot(flag, 0, value)
    }

    /// Stores one value slot of a flag and marks it set.
    ///
    /// The value is checked against the slot's kind, bounds, and choices.
    pub fn set_slot(
        &mut self,
        flag: &str,
        slot: usize,
        value: impl Into<Value>,
    ) -> Result<(), ModelError> {
        let spec = self.flag_spec(flag)?;
        let value_spec = spec.values.get(slot).ok_or_else(|| ModelError::NoSuchSlot {
            flag: spec.id.to_string(),
            slot,
        })?;
        let value = value.into();
        value_spec.check(spec.id, &value)?;

        let values = self
            .values
            .entry(spec.id)
            .or_insert_with(|| vec![None; spec.values.len()]);
        values[slot] = Some(value);
        self.flags.insert(spec.id, FlagState::SetTrue);
        Ok(())
    }

    /// First value of a set flag.
    pub fn value(&self, flag: &str) -> Option<&Value> {
        self.values(flag).first().and_then(Option::as_ref)
    }

    /// All value slots of a set flag; empty when the flag is not set.
    pub fn values(&self, flag: &str) -> &[Option<Value>] {
        if !self.is_set(flag) {
            return &[];
        }
        self.values.get(flag).map(Vec::as_slice).unwrap_or_default()
    }

    /// First value of a set flag, as an integer.
    pub fn int_value(&self, flag: &str) -> Option<i64> {
        self.value(flag).and_then(Value::as_int)
    }

    /// First value of a set flag, as a string.
    pub fn string_value(&self, flag: &str) -> Option<&str> {
        self.value(flag).and_then(Value::as_str)
    }

    /// Identifiers of all set flags, in catalog order.
    pub fn set_flags(&self) -> Vec<&'static str> {
        self.spec()
            .flags
            .iter()
            .map(|f| f.id)
            .filter(|id| self.is_set(id))
            .collect()
    }

    /// Wipes the model back to no command and no flags.
    ///
    /// The executable path is kept; the request metadata is not.
    pub fn reset_values(&mut self) {
        self.base_command = None;
        self.flags.clear();
        self.values.clear();
        self.system = None;
        self.media_type = None;
    }

    /// The parameter string for the tool, or `None` if the model is
    /// incomplete.
    pub fn generate_parameters(&self) -> Option<String> {
        self.try_generate().ok()
    }

    /// Like [`generate_parameters`](Self::generate_parameters), but reports
    /// what is missing.
    ///
    /// Output order is the command, its positionals, then set flags in
    /// catalog order. Flags not legal for the active command are skipped.
    pub fn try_generate(&self) -> Result<String, GenerateError> {
        let spec = self.spec();
        let command = spec.command(self.base_command);
        let missing = |flag: &str| GenerateError::MissingRequired {
            flag: flag.to_string(),
            command: command_label(self.base_command),
        };

        let mut parts: Vec<String> = Vec::new();
        if let Some(name) = self.base_command {
            parts.push(name.to_string());
        }

        if let Some(command) = command {
            for &required in command.required {
                if spec.is_flag_supported(self.base_command, required)
                    && self.value(required).is_none()
                {
                    return Err(missing(required));
                }
            }
            for id in command.positionals {
                let Some(flag) = spec.flag(id) else { continue };
                match flag.format(self.values(id), ValueStyle::Separate) {
                    Some(text) => parts.push(text),
                    None if flag.values.iter().all(|v| v.missing_allowed) => {}
                    None => return Err(missing(id)),
                }
            }
        }

        for flag in spec.named_flags() {
            if !self.is_set(flag.id) {
                continue;
            }
            if !spec.is_flag_supported(self.base_command, flag.id) {
                trace!(flag = flag.id, command = ?self.base_command, "skipping unsupported flag");
                continue;
            }
            if flag.missing_slot(self.values(flag.id)).is_some() {
                return Err(missing(flag.id));
            }
            if let Some(text) = flag.format(self.values(flag.id), spec.value_style) {
                parts.push(text);
            }
        }

        if parts.is_empty() {
            return Err(GenerateError::Empty);
        }
        Ok(parts.join(" "))
    }

    /// Returns `true` if parameters can be generated.
    pub fn is_valid(&self) -> bool {
        self.try_generate().is_ok()
    }

    /// Returns `true` if the active command physically reads media.
    pub fn is_dumping_command(&self) -> bool {
        self.spec()
            .command(self.base_command)
            .is_some_and(|c| c.dumping)
    }

    /// Best-effort media type inferred from the command and flags.
    pub fn detect_media_type(&self) -> Option<MediaType> {
        (self.spec().hooks.media_type)(self)
    }

    /// Path the tool reads from.
    pub fn input_path(&self) -> Option<String> {
        (self.spec().hooks.input_path)(self)
    }

    /// Path the tool writes to.
    pub fn output_path(&self) -> Option<String> {
        (self.spec().hooks.output_path)(self)
    }

    /// Replaces the model with the parse of `parameters`.
    ///
    /// On failure the context is left reset and the error returned.
    pub fn validate_and_set_parameters(&mut self, parameters: &str) -> Result<(), ParseError> {
        self.reset_values();
        let result = self.parse_into(parameters);
        if let Err(err) = &result {
            debug!(dialect = %self.dialect, error = %err, "rejected parameters");
            self.reset_values();
        }
        result
    }

    /// Replaces the model with the dialect's defaults for a dump request.
    pub fn set_default_parameters(&mut self, request: &DumpRequest<'_>) {
        self.reset_values();
        self.system = request.system;
        self.media_type = request.media_type;
        (self.spec().hooks.apply_defaults)(self, request);
    }

    fn flag_spec(&self, flag: &str) -> Result<&'static FlagSpec, ModelError> {
        self.spec()
            .flag(flag)
            .ok_or_else(|| ModelError::UnknownFlag(flag.to_string()))
    }

    fn parse_into(&mut self, parameters: &str) -> Result<(), ParseError> {
        let tokens = tokenize(parameters);
        if tokens.is_empty() {
            return Err(ParseError::Empty);
        }
        let index = self.detect_command(&tokens)?;
        let index = self.read_positionals(&tokens, index)?;
        self.scan_flags(&tokens, index)?;
        (self.spec().hooks.finish_parse)(self);
        Ok(())
    }

    fn detect_command(&mut self, tokens: &[String]) -> Result<usize, ParseError> {
        let spec = self.spec();
        match spec.command_style {
            CommandStyle::Leading => match spec.find_command(&tokens[0]) {
                Some(command) => {
                    self.base_command = command.name;
                    Ok(1)
                }
                None if spec.command_required => {
                    Err(ParseError::UnknownCommand(tokens[0].clone()))
                }
                None => Ok(0),
            },
            CommandStyle::Modes => {
                let mut index = 0;
                while let Some(command) = tokens.get(index).and_then(|t| spec.find_command(t)) {
                    if self.base_command.is_none() {
                        self.base_command = command.name;
                    } else {
                        debug!(mode = command.label(), "ignoring additional mode");
                    }
                    index += 1;
                }
                Ok(index)
            }
        }
    }

    fn read_positionals(
        &mut self,
        tokens: &[String],
        mut index: usize,
    ) -> Result<usize, ParseError> {
        let spec = self.spec();
        let Some(command) = spec.command(self.base_command) else {
            return Ok(index);
        };
        for id in command.positionals {
            let Some(flag) = spec.flag(id) else { continue };
            let value =
                flag.process_positional(tokens, index, command.label(), |t| spec.is_flag_token(t))?;
            if let Some(value) = value {
                self.flags.insert(flag.id, FlagState::SetTrue);
                self.values.insert(flag.id, vec![Some(value)]);
                index += 1;
            }
        }
        Ok(index)
    }

    fn scan_flags(&mut self, tokens: &[String], mut index: usize) -> Result<(), ParseError> {
        let spec = self.spec();
        let is_flag = |t: &str| spec.is_flag_token(t);

        while let Some(token) = tokens.get(index) {
            if spec.strict_key_value && unquoted_separators(token) > 1 {
                return Err(ParseError::MalformedKeyValue(token.clone()));
            }

            let mut matched = None;
            for flag in spec.named_flags() {
                if let Some(m) = flag.process(tokens, index, is_flag)? {
                    matched = Some((flag, m));
                    break;
                }
            }

            let Some((flag, m)) = matched else {
                match spec.unknown_tokens {
                    UnknownTokens::Reject => return Err(ParseError::UnknownToken(token.clone())),
                    UnknownTokens::Skip => {
                        trace!(token = %token, "skipping unrecognized token");
                        index += 1;
                        continue;
                    }
                }
            };

            if !spec.is_flag_supported(self.base_command, flag.id) {
                return Err(ParseError::UnsupportedFlag {
                    flag: flag.id.to_string(),
                    command: command_label(self.base_command),
                });
            }
            trace!(flag = flag.id, consumed = m.consumed, "matched flag");
            self.flags.insert(flag.id, FlagState::SetTrue);
            self.values.insert(flag.id, m.values);
            index += m.consumed;
        }
        Ok(())
    }

    pub(crate) fn select_command(&mut self, command: Option<&'static str>) {
        self.base_command = command;
    }

    /// Turns on a flag during default population, if the command allows it.
    pub(crate) fn enable(&mut self, flag: &str) {
        if !self.spec().is_flag_supported(self.base_command, flag) {
            trace!(flag, command = ?self.base_command, "default not applicable");
            return;
        }
        if let Err(err) = self.set_flag(flag, true) {
            warn!(flag, error = %err, "could not apply default");
        }
    }

    /// Stores a default value, if the command allows the flag.
    pub(crate) fn apply(&mut self, flag: &str, value: impl Into<Value>) {
        self.apply_slot(flag, 0, value);
    }

    pub(crate) fn apply_slot(&mut self, flag: &str, slot: usize, value: impl Into<Value>) {
        if !self.spec().is_flag_supported(self.base_command, flag) {
            trace!(flag, command = ?self.base_command, "default not applicable");
            return;
        }
        if let Err(err) = self.set_slot(flag, slot, value) {
            warn!(flag, error = %err, "rejected configured value");
        }
    }
}

/// Counts `=` signs outside double-quoted runs.
fn unquoted_separators(token: &str) -> usize {
    let mut in_quotes = false;
    token
        .chars()
        .filter(|&ch| {
            if ch == '"' {
                in_quotes = !in_quotes;
            }
            ch == '=' && !in_quotes
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_is_invalid() {
        for dialect in Dialect::ALL {
            let ctx = ExecutionContext::new(dialect);
            assert!(!ctx.is_valid());
            assert!(ctx.set_flags().is_empty());
        }
    }

    #[test]
    fn test_value_requires_set_flag() {
        let mut ctx = ExecutionContext::new(Dialect::Redumper);
        ctx.set_value("retries", 5).unwrap();
        assert_eq!(ctx.flag_state("retries"), FlagState::SetTrue);
        assert_eq!(ctx.int_value("retries"), Some(5));

        ctx.set_flag("retries", false).unwrap();
        assert_eq!(ctx.flag_state("retries"), FlagState::SetFalse);
        assert_eq!(ctx.value("retries"), None);
        assert!(ctx.values("retries").is_empty());
    }

    #[test]
    fn test_setters_validate() {
        let mut ctx = ExecutionContext::new(Dialect::Redumper);
        assert_eq!(
            ctx.set_flag("no-such-flag", true),
            Err(ModelError::UnknownFlag("no-such-flag".into()))
        );
        assert!(matches!(
            ctx.set_value("retries", -1),
            Err(ModelError::Rejected(ParseError::OutOfRange { .. }))
        ));
        assert!(matches!(
            ctx.set_slot("retries", 3, 1),
            Err(ModelError::NoSuchSlot { slot: 3, .. })
        ));
        assert!(matches!(
            ctx.set_value("speed", "fast"),
            Err(ModelError::Rejected(ParseError::InvalidValue { .. }))
        ));
        assert!(ctx.set_base_command(Some("not-a-mode")).is_err());
        assert!(ctx.flags.is_empty());
    }

    #[test]
    fn test_generation_skips_flags_the_command_does_not_support() {
        let mut ctx = ExecutionContext::new(Dialect::Redumper);
        ctx.set_base_command(Some("disc")).unwrap();
        ctx.set_value("lba-start", 100).unwrap();
        assert_eq!(ctx.generate_parameters().as_deref(), Some("disc --lba-start=100"));

        // The value survives the switch but is no longer emitted.
        ctx.set_base_command(Some("split")).unwrap();
        assert_eq!(ctx.generate_parameters().as_deref(), Some("split"));
        assert_eq!(ctx.int_value("lba-start"), Some(100));
    }

    #[test]
    fn test_set_false_flags_are_not_emitted() {
        let mut ctx = ExecutionContext::new(Dialect::Redumper);
        ctx.set_base_command(Some("disc")).unwrap();
        ctx.set_flag("verbose", true).unwrap();
        ctx.set_flag("debug", false).unwrap();
        assert_eq!(ctx.generate_parameters().as_deref(), Some("disc --verbose"));
    }

    fn dic_cd() -> ExecutionContext {
        let mut ctx = ExecutionContext::new(Dialect::DiscImageCreator);
        ctx.set_base_command(Some("cd")).unwrap();
        ctx.set_value("drive", "F").unwrap();
        ctx.set_value("filename", "game.bin").unwrap();
        ctx.set_value("speed", 8).unwrap();
        ctx
    }

    #[test]
    fn test_set_flag_without_required_value_fails_generation() {
        let mut ctx = ExecutionContext::new(Dialect::Redumper);
        ctx.set_base_command(Some("disc")).unwrap();
        ctx.set_flag("speed", true).unwrap();
        assert_eq!(
            ctx.try_generate(),
            Err(GenerateError::MissingRequired {
                flag: "speed".into(),
                command: "disc".into()
            })
        );
        assert!(!ctx.is_valid());

        let mut ctx = dic_cd();
        ctx.set_flag("add-offset", true).unwrap();
        assert_eq!(
            ctx.try_generate(),
            Err(GenerateError::MissingRequired {
                flag: "add-offset".into(),
                command: "cd".into()
            })
        );
        ctx.set_value("add-offset", 6).unwrap();
        assert_eq!(ctx.generate_parameters().as_deref(), Some("cd F game.bin 8 /a 6"));
    }

    #[test]
    fn test_partially_filled_slots_fail_generation() {
        let mut ctx = dic_cd();
        ctx.set_base_command(Some("dvd")).unwrap();
        ctx.set_slot("range", 0, 0).unwrap();
        assert_eq!(
            ctx.try_generate(),
            Err(GenerateError::MissingRequired {
                flag: "range".into(),
                command: "dvd".into()
            })
        );
        ctx.set_slot("range", 1, 1000).unwrap();
        assert_eq!(ctx.generate_parameters().as_deref(), Some("dvd F game.bin 8 /ra 0 1000"));

        // Optional slots may trail off, but not leave a gap.
        let mut ctx = dic_cd();
        ctx.set_flag("c2-opcode", true).unwrap();
        assert_eq!(ctx.generate_parameters().as_deref(), Some("cd F game.bin 8 /c2"));
        ctx.set_slot("c2-opcode", 1, 5).unwrap();
        assert!(matches!(
            ctx.try_generate(),
            Err(GenerateError::MissingRequired { flag, .. }) if flag == "c2-opcode"
        ));
    }

    #[test]
    fn test_unquoted_separators() {
        assert_eq!(unquoted_separators("bs=2048"), 1);
        assert_eq!(unquoted_separators("if=a==b"), 3);
        assert_eq!(unquoted_separators(r#"of="C:\dumps\size=700MB.iso""#), 1);
        assert_eq!(unquoted_separators("--progress"), 0);
    }

    #[test]
    fn test_failed_parse_resets_previous_model() {
        let mut ctx = ExecutionContext::from_parameters(Dialect::Redumper, "disc --drive=E:");
        assert!(ctx.is_valid());
        assert!(ctx.validate_and_set_parameters("disc --bogus").is_err());
        assert_eq!(ctx, ExecutionContext::new(Dialect::Redumper));
    }

    #[test]
    fn test_executable_survives_reset() {
        let mut ctx = ExecutionContext::new(Dialect::Dd).with_executable("dd.exe");
        ctx.reset_values();
        assert_eq!(ctx.executable(), Some(Path::new("dd.exe")));
    }
}
