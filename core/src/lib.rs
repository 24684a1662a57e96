//! Bidirectional command-line parameter engine for disc dumping tools.
//!
//! This crate models the command lines of external dumping programs so they
//! can be generated from a dump request and parsed back into a structured
//! model:
//!
//! - [`Dialect`] selects a tool; its [`DialectSpec`] holds the command
//!   table, flag catalog ([`FlagSpec`]), and [`SupportMatrix`].
//! - [`ExecutionContext`] is one invocation's parameter model: base command,
//!   tri-state flags ([`FlagState`]), and typed [`Value`]s.
//! - [`decode_number`] reads integers with byte multiplier suffixes and hex
//!   fallback; [`tokenize`] splits a parameter string respecting quotes.
//! - [`DumpOptions`] carries the user preferences applied during default
//!   population.
//!
//! Catalogs are checked with [`validate_dialect`] and described for help
//! output by [`DialectSummary`].
//!
//! # Example
//!
//! ```
//! use dump_params_core::*;
//!
//! let options = DumpOptions::default();
//! let request = DumpRequest {
//!     system: Some(RedumpSystem::SonyPlayStation),
//!     media_type: Some(MediaType::CdRom),
//!     drive_path: Some("F"),
//!     filename: "game.bin",
//!     drive_speed: 8,
//!     options: &options,
//! };
//!
//! let ctx = ExecutionContext::from_request(Dialect::DiscImageCreator, &request);
//! let parameters = ctx.generate_parameters().unwrap();
//! assert_eq!(parameters, "cd F game.bin 8 /c2 20 /nl /am");
//!
//! // Parsing the generated string yields the same model.
//! let parsed = ExecutionContext::from_parameters(Dialect::DiscImageCreator, &parameters);
//! assert_eq!(parsed.set_flags(), ctx.set_flags());
//! assert_eq!(parsed.values("c2-opcode"), ctx.values("c2-opcode"));
//! ```

mod context;
mod describe;
pub mod dialect;
mod error;
mod input;
mod matrix;
mod number;
mod options;
mod tokenize;
mod types;
mod validate;

pub use context::{DumpRequest, ExecutionContext};
pub use describe::{CommandSummary, DialectSummary, FlagSummary, SlotSummary};
pub use dialect::{CommandStyle, Dialect, DialectSpec, UnknownTokens};
pub use error::{GenerateError, ModelError, ParseError};
pub use input::{FlagSpec, Match, Quoting, ValueKind, ValueSpec, ValueStyle};
pub use matrix::{CommandSpec, SupportMatrix, SupportMatrixBuilder};
pub use number::{decode_number, multiplier_factor, split_multiplier};
pub use options::{
    DdOptions, DicOptions, DicReadOpcode, DumpOptions, RedumperDriveType, RedumperOptions,
    RedumperReadMethod, RedumperSectorOrder,
};
pub use tokenize::{strip_quotes, tokenize};
pub use types::{FlagState, MediaType, RedumpSystem, Value};
pub use validate::{CatalogError, validate_dialect};
