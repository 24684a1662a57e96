//! Redumper.
//!
//! `<mode> [<mode>...] [--flag[=value]]...`
//!
//! Several modes may be listed; only the first one is kept as the base
//! command. Flags take their value inline (`--speed=8`) or as the next token
//! (`--speed 8`), and are always generated inline.

use std::sync::LazyLock;

use super::{
    CommandStyle, Dialect, DialectSpec, Hooks, UnknownTokens, file_stem, join_output_path,
    split_output_path,
};
use crate::context::{DumpRequest, ExecutionContext};
use crate::input::{FlagSpec, Quoting, ValueSpec, ValueStyle};
use crate::matrix::{CommandSpec, SupportMatrix};
use crate::options::RedumperDriveType;

pub const HELP: &str = "help";
pub const VERSION: &str = "version";
pub const VERBOSE: &str = "verbose";
pub const LIST_RECOMMENDED_DRIVES: &str = "list-recommended-drives";
pub const LIST_ALL_DRIVES: &str = "list-all-drives";
pub const AUTO_EJECT: &str = "auto-eject";
pub const SKELETON: &str = "skeleton";
pub const DEBUG: &str = "debug";
pub const IMAGE_PATH: &str = "image-path";
pub const IMAGE_NAME: &str = "image-name";
pub const OVERWRITE: &str = "overwrite";
pub const DRIVE: &str = "drive";
pub const SPEED: &str = "speed";
pub const RETRIES: &str = "retries";
pub const DRIVE_TYPE: &str = "drive-type";
pub const DRIVE_READ_OFFSET: &str = "drive-read-offset";
pub const DRIVE_C2_SHIFT: &str = "drive-c2-shift";
pub const DRIVE_PREGAP_START: &str = "drive-pregap-start";
pub const DRIVE_READ_METHOD: &str = "drive-read-method";
pub const DRIVE_SECTOR_ORDER: &str = "drive-sector-order";
pub const FIRMWARE: &str = "firmware";
pub const PLEXTOR_SKIP_LEADIN: &str = "plextor-skip-leadin";
pub const PLEXTOR_LEADIN_RETRIES: &str = "plextor-leadin-retries";
pub const PLEXTOR_LEADIN_FORCE_STORE: &str = "plextor-leadin-force-store";
pub const KREON_PARTIAL_SS: &str = "kreon-partial-ss";
pub const ASUS_SKIP_LEADOUT: &str = "asus-skip-leadout";
pub const ASUS_LEADOUT_RETRIES: &str = "asus-leadout-retries";
pub const DISABLE_CDTEXT: &str = "disable-cdtext";
pub const FORCE_OFFSET: &str = "force-offset";
pub const AUDIO_SILENCE_THRESHOLD: &str = "audio-silence-threshold";
pub const CORRECT_OFFSET_SHIFT: &str = "correct-offset-shift";
pub const OFFSET_SHIFT_RELOCATE: &str = "offset-shift-relocate";
pub const FORCE_SPLIT: &str = "force-split";
pub const LEAVE_UNCHANGED: &str = "leave-unchanged";
pub const FORCE_QTOC: &str = "force-qtoc";
pub const SKIP_FILL: &str = "skip-fill";
pub const ISO9660_TRIM: &str = "iso9660-trim";
pub const LEGACY_SUBS: &str = "legacy-subs";
pub const LBA_START: &str = "lba-start";
pub const LBA_END: &str = "lba-end";
pub const SKIP: &str = "skip";
pub const DUMP_WRITE_OFFSET: &str = "dump-write-offset";
pub const DUMP_READ_SIZE: &str = "dump-read-size";
pub const OVERREAD_LEADOUT: &str = "overread-leadout";
pub const FORCE_UNSCRAMBLED: &str = "force-unscrambled";
pub const FORCE_REFINE: &str = "force-refine";
pub const REFINE_SUBCHANNEL: &str = "refine-subchannel";
pub const REFINE_SECTOR_MODE: &str = "refine-sector-mode";

/// Image name used by dumping modes when none is given.
pub const DEFAULT_IMAGE_NAME: &str = "track";

/// Plextor lead-in retry count the tool uses when none is given.
const TOOL_LEADIN_RETRIES: i32 = 4;

const TEXT: &[ValueSpec] = &[ValueSpec::string("value").quoted(Quoting::WhenNeeded)];
const QUOTED_TEXT: &[ValueSpec] = &[ValueSpec::string("path").quoted(Quoting::Always)];
const INT: &[ValueSpec] = &[ValueSpec::int32("value")];
const COUNT: &[ValueSpec] = &[ValueSpec::int32("count").bounded(0, i32::MAX as i64)];
const READ_SIZE: &[ValueSpec] = &[ValueSpec::int32("sectors").bounded(1, i32::MAX as i64)];
const SILENCE: &[ValueSpec] = &[ValueSpec::int16("threshold").bounded(0, 32767)];
const FILL: &[ValueSpec] = &[ValueSpec::int16("byte").bounded(0, 255)];
const DRIVE_TYPES: &[ValueSpec] = &[ValueSpec::string("type").one_of(&[
    "GENERIC", "PLEXTOR", "LG_ASU8A", "LG_ASU8B", "LG_ASU8C", "LG_ASU3", "LG_ASU2",
])];
const READ_METHODS: &[ValueSpec] =
    &[ValueSpec::string("method").one_of(&["BE", "D8", "BE_CDDA"])];
const SECTOR_ORDERS: &[ValueSpec] = &[ValueSpec::string("order").one_of(&[
    "DATA_C2_SUB",
    "DATA_SUB_C2",
    "DATA_SUB",
    "DATA_C2",
])];

const fn long(id: &'static str, spelling: &'static str) -> FlagSpec {
    FlagSpec::boolean(id, None, Some(spelling))
}

const fn long_valued(
    id: &'static str,
    spelling: &'static str,
    values: &'static [ValueSpec],
) -> FlagSpec {
    FlagSpec::valued(id, None, Some(spelling), values)
}

static FLAGS: &[FlagSpec] = &[
    FlagSpec::boolean(HELP, Some("-h"), Some("--help")).describe("Print usage"),
    long(VERSION, "--version").describe("Print the tool version"),
    long(VERBOSE, "--verbose").describe("Verbose output"),
    long(LIST_RECOMMENDED_DRIVES, "--list-recommended-drives")
        .describe("List recommended drives"),
    long(LIST_ALL_DRIVES, "--list-all-drives").describe("List all known drives"),
    long(AUTO_EJECT, "--auto-eject").describe("Eject the disc when done"),
    long(SKELETON, "--skeleton").describe("Generate a skeleton image"),
    long(DEBUG, "--debug").describe("Write debug state files"),
    long_valued(IMAGE_PATH, "--image-path", QUOTED_TEXT).describe("Output directory"),
    long_valued(IMAGE_NAME, "--image-name", QUOTED_TEXT).describe("Output base name"),
    long(OVERWRITE, "--overwrite").describe("Overwrite an existing dump"),
    long_valued(DRIVE, "--drive", TEXT).describe("Drive to use"),
    long_valued(SPEED, "--speed", INT).describe("Read speed"),
    long_valued(RETRIES, "--retries", COUNT).describe("Sector reread count"),
    long_valued(DRIVE_TYPE, "--drive-type", DRIVE_TYPES).describe("Override the drive type"),
    long_valued(DRIVE_READ_OFFSET, "--drive-read-offset", INT).describe("Override the read offset"),
    long_valued(DRIVE_C2_SHIFT, "--drive-c2-shift", INT).describe("Override the C2 shift"),
    long_valued(DRIVE_PREGAP_START, "--drive-pregap-start", INT)
        .describe("Override the pregap start"),
    long_valued(DRIVE_READ_METHOD, "--drive-read-method", READ_METHODS)
        .describe("Override the read method"),
    long_valued(DRIVE_SECTOR_ORDER, "--drive-sector-order", SECTOR_ORDERS)
        .describe("Override the sector order"),
    long_valued(FIRMWARE, "--firmware", QUOTED_TEXT).describe("Firmware file to flash"),
    long(PLEXTOR_SKIP_LEADIN, "--plextor-skip-leadin").describe("Skip the Plextor lead-in"),
    long_valued(PLEXTOR_LEADIN_RETRIES, "--plextor-leadin-retries", COUNT)
        .describe("Plextor lead-in retry count"),
    long(PLEXTOR_LEADIN_FORCE_STORE, "--plextor-leadin-force-store")
        .describe("Keep an unverified Plextor lead-in"),
    long(KREON_PARTIAL_SS, "--kreon-partial-ss").describe("Accept a partial Kreon security sector"),
    long(ASUS_SKIP_LEADOUT, "--asus-skip-leadout").describe("Skip the ASUS lead-out"),
    long_valued(ASUS_LEADOUT_RETRIES, "--asus-leadout-retries", COUNT)
        .describe("ASUS lead-out retry count"),
    long(DISABLE_CDTEXT, "--disable-cdtext").describe("Do not read CD-TEXT"),
    long_valued(FORCE_OFFSET, "--force-offset", INT).describe("Force a write offset"),
    long_valued(AUDIO_SILENCE_THRESHOLD, "--audio-silence-threshold", SILENCE)
        .describe("Silence threshold for offset detection"),
    long(CORRECT_OFFSET_SHIFT, "--correct-offset-shift").describe("Correct offset shifts"),
    long(OFFSET_SHIFT_RELOCATE, "--offset-shift-relocate")
        .describe("Relocate data across offset shifts"),
    long(FORCE_SPLIT, "--force-split").describe("Split despite errors"),
    long(LEAVE_UNCHANGED, "--leave-unchanged").describe("Do not descramble data sectors"),
    long(FORCE_QTOC, "--force-qtoc").describe("Split using the subchannel Q TOC"),
    long_valued(SKIP_FILL, "--skip-fill", FILL).describe("Fill byte for skipped sectors"),
    long(ISO9660_TRIM, "--iso9660-trim").describe("Trim data tracks to the ISO9660 size"),
    long(LEGACY_SUBS, "--legacy-subs").describe("Write legacy subchannel files"),
    long_valued(LBA_START, "--lba-start", INT).describe("First sector to dump"),
    long_valued(LBA_END, "--lba-end", INT).describe("Sector after the last one to dump"),
    long_valued(SKIP, "--skip", TEXT).describe("Sector ranges to skip"),
    long_valued(DUMP_WRITE_OFFSET, "--dump-write-offset", INT)
        .describe("Write offset used while dumping"),
    long_valued(DUMP_READ_SIZE, "--dump-read-size", READ_SIZE)
        .describe("Sectors per read request"),
    long(OVERREAD_LEADOUT, "--overread-leadout").describe("Read into the lead-out"),
    long(FORCE_UNSCRAMBLED, "--force-unscrambled").describe("Read data sectors unscrambled"),
    long(FORCE_REFINE, "--force-refine").describe("Refine despite a mismatched drive"),
    long(REFINE_SUBCHANNEL, "--refine-subchannel").describe("Refine subchannel errors"),
    long(REFINE_SECTOR_MODE, "--refine-sector-mode").describe("Refine by sector mode"),
];

static COMMANDS: &[CommandSpec] = &[
    CommandSpec::new(None, "No mode"),
    CommandSpec::new(Some("disc"), "Dump, refine and split a disc").dumping(),
    CommandSpec::new(Some("dump"), "Dump a disc").dumping(),
    CommandSpec::new(Some("dump::extra"), "Dump a disc with extra lead-in/lead-out").dumping(),
    CommandSpec::new(Some("refine"), "Reread damaged sectors of a dump").dumping(),
    CommandSpec::new(Some("verify"), "Verify a dump against the disc"),
    CommandSpec::new(Some("dvdkey"), "Extract DVD CSS keys").dumping(),
    CommandSpec::new(Some("eccedc"), "Check data sector ECC/EDC"),
    CommandSpec::new(Some("split"), "Split a dump into tracks"),
    CommandSpec::new(Some("hash"), "Hash split tracks"),
    CommandSpec::new(Some("info"), "Print disc information"),
    CommandSpec::new(Some("skeleton"), "Generate a skeleton image"),
    CommandSpec::new(Some("protection"), "Scan for copy protection"),
    CommandSpec::new(Some("rings"), "Scan the disc rings"),
    CommandSpec::new(Some("subchannel"), "Print subchannel data"),
    CommandSpec::new(Some("debug"), "Debug output"),
    CommandSpec::new(Some("fixmsf"), "Fix MSF addresses in a dump"),
    CommandSpec::new(Some("drive::test"), "Test drive capabilities"),
];

const GENERAL: &[&str] = &[
    HELP,
    VERSION,
    VERBOSE,
    LIST_RECOMMENDED_DRIVES,
    LIST_ALL_DRIVES,
    AUTO_EJECT,
    DEBUG,
];
const IMAGE: &[&str] = &[IMAGE_PATH, IMAGE_NAME, OVERWRITE];
const DRIVE_SELECT: &[&str] = &[DRIVE, SPEED, RETRIES];
const DRIVE_CONFIG: &[&str] = &[
    DRIVE_TYPE,
    DRIVE_READ_OFFSET,
    DRIVE_C2_SHIFT,
    DRIVE_PREGAP_START,
    DRIVE_READ_METHOD,
    DRIVE_SECTOR_ORDER,
    FIRMWARE,
];
const DRIVE_SPECIFIC: &[&str] = &[
    PLEXTOR_SKIP_LEADIN,
    PLEXTOR_LEADIN_RETRIES,
    PLEXTOR_LEADIN_FORCE_STORE,
    KREON_PARTIAL_SS,
    ASUS_SKIP_LEADOUT,
    ASUS_LEADOUT_RETRIES,
    DISABLE_CDTEXT,
];
const OFFSET: &[&str] = &[
    FORCE_OFFSET,
    AUDIO_SILENCE_THRESHOLD,
    CORRECT_OFFSET_SHIFT,
    OFFSET_SHIFT_RELOCATE,
];
const SPLIT: &[&str] = &[
    FORCE_SPLIT,
    LEAVE_UNCHANGED,
    FORCE_QTOC,
    SKIP_FILL,
    ISO9660_TRIM,
    LEGACY_SUBS,
];
const READ: &[&str] = &[
    LBA_START,
    LBA_END,
    SKIP,
    DUMP_WRITE_OFFSET,
    DUMP_READ_SIZE,
    OVERREAD_LEADOUT,
    FORCE_UNSCRAMBLED,
    FORCE_REFINE,
];
const REFINE: &[&str] = &[REFINE_SUBCHANNEL, REFINE_SECTOR_MODE];
const SKELETON_ONLY: &[&str] = &[SKELETON];

const DUMP_GROUPS: &[&[&str]] = &[GENERAL, IMAGE, DRIVE_SELECT, DRIVE_CONFIG, DRIVE_SPECIFIC, READ];
const IMAGE_GROUPS: &[&[&str]] = &[GENERAL, IMAGE];

fn build_matrix() -> SupportMatrix {
    let mut builder = SupportMatrix::builder()
        .command(None, &[GENERAL])
        .command(
            Some("disc"),
            &[
                GENERAL,
                IMAGE,
                DRIVE_SELECT,
                DRIVE_CONFIG,
                DRIVE_SPECIFIC,
                OFFSET,
                SPLIT,
                READ,
                REFINE,
                SKELETON_ONLY,
            ],
        )
        .command(Some("dump"), DUMP_GROUPS)
        .command(Some("dump::extra"), DUMP_GROUPS)
        .command(Some("refine"), DUMP_GROUPS)
        .command(Some("refine"), &[REFINE])
        .command(Some("verify"), &[GENERAL, IMAGE, DRIVE_SELECT, DRIVE_CONFIG])
        .command(Some("dvdkey"), &[GENERAL, IMAGE, DRIVE_SELECT])
        .command(Some("eccedc"), IMAGE_GROUPS)
        .command(Some("split"), &[GENERAL, IMAGE, OFFSET, SPLIT]);
    for mode in ["hash", "info", "skeleton", "protection"] {
        builder = builder.command(Some(mode), IMAGE_GROUPS);
    }
    builder = builder.command(Some("rings"), &[GENERAL, IMAGE, DRIVE_SELECT]);
    for mode in ["subchannel", "debug", "fixmsf"] {
        builder = builder.command(Some(mode), IMAGE_GROUPS);
    }
    builder
        .command(Some("drive::test"), &[GENERAL, DRIVE_SELECT, DRIVE_CONFIG])
        .build()
}

pub static SPEC: LazyLock<DialectSpec> = LazyLock::new(|| DialectSpec {
    dialect: Dialect::Redumper,
    command_style: CommandStyle::Modes,
    command_required: false,
    unknown_tokens: UnknownTokens::Reject,
    value_style: ValueStyle::Equals,
    strict_key_value: false,
    commands: COMMANDS,
    flags: FLAGS,
    matrix: build_matrix(),
    hooks: Hooks {
        apply_defaults,
        finish_parse,
        media_type: |_| None,
        input_path: |ctx| ctx.string_value(DRIVE).map(str::to_string),
        output_path,
    },
});

fn apply_defaults(ctx: &mut ExecutionContext, request: &DumpRequest<'_>) {
    let options = &request.options.redumper;
    ctx.select_command(Some("disc"));

    if let Some(drive) = request.drive_path {
        ctx.apply(DRIVE, drive);
    }
    if request.drive_speed > 0 {
        ctx.apply(SPEED, request.drive_speed);
    } else {
        ctx.clear_flag(SPEED);
    }

    let (dir, name) = split_output_path(request.filename);
    if let Some(dir) = dir {
        ctx.apply(IMAGE_PATH, dir);
    }
    let stem = file_stem(name);
    ctx.apply(IMAGE_NAME, if stem.is_empty() { DEFAULT_IMAGE_NAME } else { stem });

    if options.retries != 0 {
        ctx.apply(RETRIES, options.retries);
    }
    if options.verbose {
        ctx.enable(VERBOSE);
    }
    if options.debug {
        ctx.enable(DEBUG);
    }
    if options.skeleton {
        ctx.enable(SKELETON);
    }
    if options.plextor_skip_leadin {
        ctx.enable(PLEXTOR_SKIP_LEADIN);
    }
    if options.leadin_retry_count != TOOL_LEADIN_RETRIES {
        ctx.apply(PLEXTOR_LEADIN_RETRIES, options.leadin_retry_count);
    }
    if options.drive_type != RedumperDriveType::Generic {
        ctx.apply(DRIVE_TYPE, options.drive_type.name());
    }
    if let Some(method) = options.read_method.name() {
        ctx.apply(DRIVE_READ_METHOD, method);
    }
    if let Some(order) = options.sector_order.name() {
        ctx.apply(DRIVE_SECTOR_ORDER, order);
    }
}

fn finish_parse(ctx: &mut ExecutionContext) {
    if ctx.is_dumping_command() && !ctx.is_set(IMAGE_NAME) {
        ctx.apply(IMAGE_NAME, DEFAULT_IMAGE_NAME);
    }
}

fn output_path(ctx: &ExecutionContext) -> Option<String> {
    let name = ctx.string_value(IMAGE_NAME)?;
    Some(match ctx.string_value(IMAGE_PATH) {
        Some(dir) if !dir.is_empty() => join_output_path(dir, name),
        _ => name.to_string(),
    })
}
