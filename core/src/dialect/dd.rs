//! dd for Windows.
//!
//! `[--list [--filter=...]] | if=<input> of=<output> [bs=n] [count=n] ...`
//!
//! Operands are `key=value` pairs; a token with more than one `=` outside
//! double quotes is malformed. Tokens that match no operand are skipped, since dd accepts
//! more operands than are modeled here.

use std::sync::LazyLock;

use super::{CommandStyle, Dialect, DialectSpec, Hooks, UnknownTokens};
use crate::context::{DumpRequest, ExecutionContext};
use crate::input::{FlagSpec, Quoting, ValueSpec, ValueStyle};
use crate::matrix::{CommandSpec, SupportMatrix};

pub const INPUT_FILE: &str = "if";
pub const OUTPUT_FILE: &str = "of";
pub const BLOCK_SIZE: &str = "bs";
pub const COUNT: &str = "count";
pub const SEEK: &str = "seek";
pub const SKIP: &str = "skip";
pub const FILTER: &str = "filter";
pub const PROGRESS: &str = "progress";
pub const SIZE: &str = "size";

pub const LIST: &str = "--list";

const PATH: &[ValueSpec] = &[ValueSpec::string("path").quoted(Quoting::WhenNeeded)];
const BYTES: &[ValueSpec] = &[ValueSpec::int64("bytes").bounded(1, i64::MAX)];
const BLOCKS: &[ValueSpec] = &[ValueSpec::int64("blocks").bounded(0, i64::MAX)];
const FILTER_SLOT: &[ValueSpec] = &[ValueSpec::string("filter")];

static FLAGS: &[FlagSpec] = &[
    FlagSpec::valued(INPUT_FILE, None, Some("if"), PATH).describe("Input file or device"),
    FlagSpec::valued(OUTPUT_FILE, None, Some("of"), PATH).describe("Output file"),
    FlagSpec::valued(BLOCK_SIZE, None, Some("bs"), BYTES).describe("Block size in bytes"),
    FlagSpec::valued(COUNT, None, Some("count"), BLOCKS).describe("Number of blocks to copy"),
    FlagSpec::valued(SEEK, None, Some("seek"), BLOCKS).describe("Blocks to skip in the output"),
    FlagSpec::valued(SKIP, None, Some("skip"), BLOCKS).describe("Blocks to skip in the input"),
    FlagSpec::valued(FILTER, None, Some("--filter"), FILTER_SLOT)
        .describe("Only list matching devices"),
    FlagSpec::boolean(PROGRESS, None, Some("--progress")).describe("Show transfer progress"),
    FlagSpec::boolean(SIZE, None, Some("--size")).describe("Stop at the end of the device"),
];

static COMMANDS: &[CommandSpec] = &[
    CommandSpec::new(None, "Copy input to output")
        .dumping()
        .with_required(&[INPUT_FILE, OUTPUT_FILE]),
    CommandSpec::new(Some(LIST), "List devices"),
];

const COPY: &[&str] = &[
    INPUT_FILE,
    OUTPUT_FILE,
    BLOCK_SIZE,
    COUNT,
    SEEK,
    SKIP,
    PROGRESS,
    SIZE,
];
const LISTING: &[&str] = &[FILTER];

fn build_matrix() -> SupportMatrix {
    SupportMatrix::builder()
        .command(None, &[COPY])
        .command(Some(LIST), &[LISTING])
        .build()
}

pub static SPEC: LazyLock<DialectSpec> = LazyLock::new(|| DialectSpec {
    dialect: Dialect::Dd,
    command_style: CommandStyle::Leading,
    command_required: false,
    unknown_tokens: UnknownTokens::Skip,
    value_style: ValueStyle::Equals,
    strict_key_value: true,
    commands: COMMANDS,
    flags: FLAGS,
    matrix: build_matrix(),
    hooks: Hooks {
        apply_defaults,
        finish_parse: |_| {},
        media_type: |_| None,
        input_path: |ctx| ctx.string_value(INPUT_FILE).map(str::to_string),
        output_path: |ctx| ctx.string_value(OUTPUT_FILE).map(str::to_string),
    },
});

/// Raw device path for a drive letter; anything else passes through.
fn device_path(drive: &str) -> String {
    let letter = drive.trim_end_matches(['\\', '/']).trim_end_matches(':');
    let mut chars = letter.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => format!(r"\\?\{}:", c.to_ascii_uppercase()),
        _ => drive.to_string(),
    }
}

fn apply_defaults(ctx: &mut ExecutionContext, request: &DumpRequest<'_>) {
    let options = &request.options.dd;
    ctx.select_command(None);

    if let Some(drive) = request.drive_path {
        ctx.apply(INPUT_FILE, device_path(drive));
    }
    ctx.apply(OUTPUT_FILE, request.filename);
    if options.block_size > 0 {
        ctx.apply(BLOCK_SIZE, options.block_size);
    }
    if options.progress {
        ctx.enable(PROGRESS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GenerateError, ParseError};
    use crate::options::DumpOptions;

    fn dd(parameters: &str) -> Result<ExecutionContext, ParseError> {
        ExecutionContext::parse(Dialect::Dd, parameters)
    }

    #[test]
    fn test_copy_operands() {
        let ctx = dd(r"if=\\.\E: of=out.bin bs=1M count=0x20 --progress").unwrap();
        assert_eq!(ctx.base_command(), None);
        assert_eq!(ctx.int_value(BLOCK_SIZE), Some(1024 * 1024));
        assert_eq!(ctx.int_value(COUNT), Some(32));
        assert_eq!(ctx.input_path().as_deref(), Some(r"\\.\E:"));
        assert_eq!(ctx.output_path().as_deref(), Some("out.bin"));
        assert!(ctx.is_dumping_command());
        assert_eq!(
            ctx.generate_parameters().as_deref(),
            Some(r"if=\\.\E: of=out.bin bs=1048576 count=32 --progress")
        );
    }

    #[test]
    fn test_malformed_key_value_fails() {
        assert_eq!(
            dd("if=a=b of=out.bin").unwrap_err(),
            ParseError::MalformedKeyValue("if=a=b".into())
        );
        assert!(!ExecutionContext::from_parameters(Dialect::Dd, "of=x=y").is_valid());
        assert!(dd("if=a==b of=out.bin").is_err());
    }

    #[test]
    fn test_equals_sign_in_path_round_trips() {
        let mut ctx = ExecutionContext::new(Dialect::Dd);
        ctx.set_value(INPUT_FILE, r"\\?\E:").unwrap();
        ctx.set_value(OUTPUT_FILE, r"C:\dumps\size=700MB.iso").unwrap();
        let parameters = ctx.generate_parameters().unwrap();
        assert_eq!(parameters, r#"if=\\?\E: of="C:\dumps\size=700MB.iso""#);

        let parsed = dd(&parameters).unwrap();
        assert_eq!(parsed.output_path().as_deref(), Some(r"C:\dumps\size=700MB.iso"));
        assert_eq!(parsed.generate_parameters(), Some(parameters));
    }

    #[test]
    fn test_unknown_operands_are_skipped() {
        let ctx = dd("if=in.img conv=noerror of=out.bin status").unwrap();
        assert_eq!(ctx.generate_parameters().as_deref(), Some("if=in.img of=out.bin"));
    }

    #[test]
    fn test_copy_requires_input_and_output() {
        let ctx = dd("if=in.img").unwrap();
        assert_eq!(
            ctx.try_generate(),
            Err(GenerateError::MissingRequired {
                flag: OUTPUT_FILE.into(),
                command: "<none>".into()
            })
        );
    }

    #[test]
    fn test_list_command() {
        let ctx = dd("--list --filter=removable").unwrap();
        assert_eq!(ctx.base_command(), Some(LIST));
        assert!(!ctx.is_dumping_command());
        assert_eq!(ctx.generate_parameters().as_deref(), Some("--list --filter=removable"));
        assert!(matches!(
            dd("if=a of=b --filter=removable"),
            Err(ParseError::UnsupportedFlag { .. })
        ));
    }

    #[test]
    fn test_block_counts_are_bounded() {
        assert!(matches!(dd("if=a of=b seek=-1"), Err(ParseError::OutOfRange { .. })));
        assert!(matches!(dd("if=a of=b bs=0"), Err(ParseError::OutOfRange { .. })));
    }

    #[test]
    fn test_device_path() {
        assert_eq!(device_path("E"), r"\\?\E:");
        assert_eq!(device_path(r"e:\"), r"\\?\E:");
        assert_eq!(device_path("/dev/sr0"), "/dev/sr0");
        assert_eq!(device_path(r"\\.\PhysicalDrive1"), r"\\.\PhysicalDrive1");
    }

    #[test]
    fn test_defaults() {
        let mut options = DumpOptions::default();
        options.dd.block_size = 2048;
        let request = DumpRequest {
            system: None,
            media_type: None,
            drive_path: Some("E"),
            filename: r"C:\My Dumps\disc.iso",
            drive_speed: 8,
            options: &options,
        };
        let ctx = ExecutionContext::from_request(Dialect::Dd, &request);
        assert_eq!(
            ctx.generate_parameters().as_deref(),
            Some(r#"if=\\?\E: of="C:\My Dumps\disc.iso" bs=2048 --progress"#)
        );
    }
}
