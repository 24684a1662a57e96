//! Flag and value primitives.
//!
//! A [`FlagSpec`] is one entry of a dialect's flag catalog: its spellings
//! and the typed value slots that follow it. Each primitive knows how to
//! [`format`](FlagSpec::format) itself into tokens and how to
//! [`process`](FlagSpec::process) itself out of a token stream. Processing
//! is pure: it reports how many tokens it consumed and the decoded values,
//! and leaves storing them to the caller.
//!
//! # Examples
//!
//! ```
//! use dump_params_core::{FlagSpec, ValueSpec, Value};
//!
//! const SLOTS: &[ValueSpec] = &[ValueSpec::int32("retries").optional()];
//! let c2 = FlagSpec::valued("c2", Some("/c2"), None, SLOTS);
//!
//! let tokens: Vec<String> = ["/c2", "20"].iter().map(|s| s.to_string()).collect();
//! let matched = c2.process(&tokens, 0, |_| false).unwrap().unwrap();
//! assert_eq!(matched.consumed, 2);
//! assert_eq!(matched.values, vec![Some(Value::Int(20))]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::number::decode_number;
use crate::tokenize::strip_quotes;
use crate::types::Value;

/// Value kind of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Signed 8-bit integer.
    Int8,
    /// Signed 16-bit integer.
    Int16,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Free-form string.
    String,
}

impl ValueKind {
    /// Inclusive range of the integer width, `None` for strings.
    pub fn range(self) -> Option<(i64, i64)> {
        match self {
            ValueKind::Int8 => Some((i8::MIN.into(), i8::MAX.into())),
            ValueKind::Int16 => Some((i16::MIN.into(), i16::MAX.into())),
            ValueKind::Int32 => Some((i32::MIN.into(), i32::MAX.into())),
            ValueKind::Int64 => Some((i64::MIN, i64::MAX)),
            ValueKind::String => None,
        }
    }
}

/// How a string value is quoted when formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quoting {
    /// Emit as-is.
    Never,
    /// Always wrap in double quotes.
    Always,
    /// Wrap in double quotes only when the value is empty or contains
    /// whitespace or `=`.
    WhenNeeded,
}

/// One typed value slot following a flag spelling (or a positional parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueSpec {
    /// Short label used in help output, e.g. `retries`.
    pub name: &'static str,
    /// Kind the raw token is decoded as.
    pub kind: ValueKind,
    /// Inclusive lower bound, narrower than the kind's own range.
    pub min: Option<i64>,
    /// Inclusive upper bound, narrower than the kind's own range.
    pub max: Option<i64>,
    /// Allowed string values; empty means any.
    pub choices: &'static [&'static str],
    /// Whether the flag may appear without this value.
    pub missing_allowed: bool,
    /// Quoting applied to string values on output.
    pub quoting: Quoting,
}

impl ValueSpec {
    const fn of_kind(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            min: None,
            max: None,
            choices: &[],
            missing_allowed: false,
            quoting: Quoting::Never,
        }
    }

    /// A required signed 8-bit slot.
    pub const fn int8(name: &'static str) -> Self {
        Self::of_kind(name, ValueKind::Int8)
    }

    /// A required signed 16-bit slot.
    pub const fn int16(name: &'static str) -> Self {
        Self::of_kind(name, ValueKind::Int16)
    }

    /// A required signed 32-bit slot.
    pub const fn int32(name: &'static str) -> Self {
        Self::of_kind(name, ValueKind::Int32)
    }

    /// A required signed 64-bit slot.
    pub const fn int64(name: &'static str) -> Self {
        Self::of_kind(name, ValueKind::Int64)
    }

    /// A required string slot.
    pub const fn string(name: &'static str) -> Self {
        Self::of_kind(name, ValueKind::String)
    }

    /// Restricts an integer slot to `min..=max`.
    pub const fn bounded(self, min: i64, max: i64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            ..self
        }
    }

    /// Restricts a string slot to a fixed set of values.
    pub const fn one_of(self, choices: &'static [&'static str]) -> Self {
        Self { choices, ..self }
    }

    /// Lets the flag appear without this value.
    pub const fn optional(self) -> Self {
        Self {
            missing_allowed: true,
            ..self
        }
    }

    /// Sets the output quoting for string values.
    pub const fn quoted(self, quoting: Quoting) -> Self {
        Self { quoting, ..self }
    }

    /// Effective inclusive bounds for integer kinds.
    pub fn bounds(&self) -> Option<(i64, i64)> {
        let (lo, hi) = self.kind.range()?;
        Some((
            self.min.map_or(lo, |m| m.max(lo)),
            self.max.map_or(hi, |m| m.min(hi)),
        ))
    }

    /// Decodes a raw token into a value of this slot's kind.
    ///
    /// Integers go through the multiplier/hex decoder; strings lose one pair
    /// of surrounding quotes.
    pub fn decode(&self, flag: &str, raw: &str) -> Result<Value, ParseError> {
        let text = strip_quotes(raw.trim());
        let value = match self.kind {
            ValueKind::String => Value::Text(text.to_string()),
            _ => Value::Int(decode_number(text).ok_or_else(|| ParseError::InvalidValue {
                flag: flag.to_string(),
                value: raw.to_string(),
            })?),
        };
        self.check(flag, &value)?;
        Ok(value)
    }

    /// Checks an already-typed value against this slot's kind, bounds, and choices.
    pub fn check(&self, flag: &str, value: &Value) -> Result<(), ParseError> {
        match (self.kind, value) {
            (ValueKind::String, Value::Text(s)) => {
                if !self.choices.is_empty() && !self.choices.contains(&s.as_str()) {
                    return Err(ParseError::InvalidChoice {
                        flag: flag.to_string(),
                        value: s.clone(),
                    });
                }
                Ok(())
            }
            (ValueKind::String, Value::Int(_)) | (_, Value::Text(_)) => {
                Err(ParseError::InvalidValue {
                    flag: flag.to_string(),
                    value: value.to_string(),
                })
            }
            (_, Value::Int(v)) => {
                let (min, max) = self.bounds().unwrap_or((i64::MIN, i64::MAX));
                if *v < min || *v > max {
                    return Err(ParseError::OutOfRange {
                        flag: flag.to_string(),
                        value: *v,
                        min,
                        max,
                    });
                }
                Ok(())
            }
        }
    }

    /// Formats a value for output, applying this slot's quoting.
    pub fn render(&self, value: &Value) -> String {
        match value {
            Value::Int(v) => v.to_string(),
            Value::Text(s) => match self.quoting {
                Quoting::Never => s.clone(),
                Quoting::Always => format!("\"{s}\""),
                Quoting::WhenNeeded => {
                    if s.is_empty() || s.contains('=') || s.chars().any(char::is_whitespace) {
                        format!("\"{s}\"")
                    } else {
                        s.clone()
                    }
                }
            },
        }
    }
}

/// How flag values are joined to their spelling on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueStyle {
    /// `spelling value`
    Separate,
    /// `spelling=value`
    Equals,
}

/// One entry of a dialect's flag catalog.
///
/// A flag with neither spelling is a positional parameter; it is matched by
/// position after the command rather than by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    /// Identifier, unique within the dialect.
    pub id: &'static str,
    /// Short spelling, e.g. `-h` or `/c2`.
    pub short: Option<&'static str>,
    /// Long spelling, e.g. `--help`.
    pub long: Option<&'static str>,
    /// Value slots in order; empty for boolean flags.
    pub values: &'static [ValueSpec],
    /// One-line description for help output.
    pub description: &'static str,
}

/// Result of a successful [`FlagSpec::process`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Number of tokens consumed, including the spelling itself.
    pub consumed: usize,
    /// One entry per value slot; `None` where an optional value was absent.
    pub values: Vec<Option<Value>>,
}

enum Spelled<'t> {
    Bare,
    Inline(&'t str),
}

impl FlagSpec {
    /// A flag that takes no value.
    pub const fn boolean(
        id: &'static str,
        short: Option<&'static str>,
        long: Option<&'static str>,
    ) -> Self {
        Self {
            id,
            short,
            long,
            values: &[],
            description: "",
        }
    }

    /// A flag followed by one or more value slots.
    pub const fn valued(
        id: &'static str,
        short: Option<&'static str>,
        long: Option<&'static str>,
        values: &'static [ValueSpec],
    ) -> Self {
        Self {
            id,
            short,
            long,
            values,
            description: "",
        }
    }

    /// A positional parameter with a single value slot.
    pub const fn positional(id: &'static str, value: &'static [ValueSpec]) -> Self {
        Self {
            id,
            short: None,
            long: None,
            values: value,
            description: "",
        }
    }

    /// Adds a description.
    pub const fn describe(self, description: &'static str) -> Self {
        Self {
            description,
            ..self
        }
    }

    /// Returns `true` for positional parameters.
    pub fn is_positional(&self) -> bool {
        self.short.is_none() && self.long.is_none()
    }

    /// Returns `true` for flags without value slots.
    pub fn is_boolean(&self) -> bool {
        self.values.is_empty()
    }

    /// Spelling used on output (long form preferred, falls back to short).
    pub fn canonical(&self) -> Option<&'static str> {
        self.long.or(self.short)
    }

    /// Both spellings, short first.
    pub fn spellings(&self) -> impl Iterator<Item = &'static str> {
        self.short.into_iter().chain(self.long)
    }

    fn spelled<'t>(&self, token: &'t str) -> Option<Spelled<'t>> {
        for spelling in self.spellings() {
            if token == spelling {
                return Some(Spelled::Bare);
            }
            if self.is_boolean() {
                continue;
            }
            if let Some(rest) = token
                .strip_prefix(spelling)
                .and_then(|rest| rest.strip_prefix('='))
            {
                return Some(Spelled::Inline(rest));
            }
        }
        None
    }

    /// Returns `true` if `token` is this flag's spelling, bare or with `=value`.
    pub fn matches(&self, token: &str) -> bool {
        self.spelled(token).is_some()
    }

    /// Attempts to consume this flag from `tokens[start..]`.
    ///
    /// Returns `Ok(None)` when the token is not this flag, so the caller can
    /// try the next one. Once the spelling matches, each slot takes the next
    /// token unless input ended, the token is a flag (`is_flag`), or it
    /// fails decoding. An optional slot then stays empty and the token is
    /// left for the caller; a required slot fails the parse. Inline
    /// `flag=value` fills only the first slot, and a bad inline value is
    /// always an error.
    pub fn process(
        &self,
        tokens: &[String],
        start: usize,
        is_flag: impl Fn(&str) -> bool,
    ) -> Result<Option<Match>, ParseError> {
        let Some(token) = tokens.get(start) else {
            return Ok(None);
        };
        if self.is_positional() {
            return Ok(None);
        }
        let Some(spelled) = self.spelled(token) else {
            return Ok(None);
        };

        let mut values = vec![None; self.values.len()];
        let mut consumed = 1;

        match spelled {
            Spelled::Inline(raw) => {
                let slot = &self.values[0];
                if raw.is_empty() {
                    if !slot.missing_allowed {
                        return Err(ParseError::MissingValue(self.id.to_string()));
                    }
                } else {
                    values[0] = Some(slot.decode(self.id, raw)?);
                }
            }
            Spelled::Bare => {
                for (index, slot) in self.values.iter().enumerate() {
                    match tokens.get(start + consumed) {
                        Some(raw) if !is_flag(raw) => match slot.decode(self.id, raw) {
                            Ok(value) => {
                                values[index] = Some(value);
                                consumed += 1;
                            }
                            Err(_) if slot.missing_allowed => break,
                            Err(err) => return Err(err),
                        },
                        _ if slot.missing_allowed => break,
                        _ => return Err(ParseError::MissingValue(self.id.to_string())),
                    }
                }
            }
        }

        Ok(Some(Match { consumed, values }))
    }

    /// Formats this flag with its stored values.
    ///
    /// Values are emitted in slot order up to the first empty slot. Returns
    /// `None` when the first slot is required but empty, so the flag is
    /// left out rather than emitted in a form that cannot be parsed back.
    pub fn format(&self, values: &[Option<Value>], style: ValueStyle) -> Option<String> {
        let present: Vec<String> = self
            .values
            .iter()
            .zip(values)
            .map_while(|(slot, value)| value.as_ref().map(|v| slot.render(v)))
            .collect();

        if self.is_positional() {
            return (!present.is_empty()).then(|| present.join(" "));
        }

        let spelling = self.canonical()?;
        if present.is_empty() {
            return match self.values.first() {
                Some(slot) if !slot.missing_allowed => None,
                _ => Some(spelling.to_string()),
            };
        }

        Some(match style {
            ValueStyle::Separate => format!("{spelling} {}", present.join(" ")),
            ValueStyle::Equals => format!("{spelling}={}", present.join(" ")),
        })
    }

    /// Index of the first slot that must hold a value but does not.
    ///
    /// A required slot must always be filled. An optional slot must be
    /// filled when any later slot is, since values are positional on the
    /// command line.
    pub fn missing_slot(&self, values: &[Option<Value>]) -> Option<usize> {
        let last_filled = values.iter().rposition(Option::is_some);
        self.values.iter().enumerate().position(|(index, slot)| {
            let empty = values.get(index).is_none_or(Option::is_none);
            empty && (!slot.missing_allowed || last_filled.is_some_and(|last| index < last))
        })
    }

    /// Consumes a positional parameter from `tokens[start]`.
    ///
    /// Returns `Ok(None)` when the token is absent or is a flag and the slot
    /// is optional.
    pub fn process_positional(
        &self,
        tokens: &[String],
        start: usize,
        command: &str,
        is_flag: impl Fn(&str) -> bool,
    ) -> Result<Option<Value>, ParseError> {
        let Some(slot) = self.values.first() else {
            return Ok(None);
        };
        match tokens.get(start) {
            Some(raw) if !is_flag(raw) => slot.decode(self.id, raw).map(Some),
            _ if slot.missing_allowed => Ok(None),
            _ => Err(ParseError::MissingPositional {
                name: self.id.to_string(),
                command: command.to_string(),
            }),
        }
    }
}
