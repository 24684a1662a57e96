//! DiscImageCreator.
//!
//! `<command> <positionals...> [/flag [values...]]...`
//!
//! Every command takes a fixed list of positional parameters (drive,
//! output file, speed, LBA range) before any slash flag. Unknown tokens fail
//! the parse.

use std::sync::LazyLock;

use super::{CommandStyle, Dialect, DialectSpec, Hooks, UnknownTokens};
use crate::context::{DumpRequest, ExecutionContext};
use crate::input::{FlagSpec, Quoting, ValueSpec, ValueStyle};
use crate::matrix::{CommandSpec, SupportMatrix};
use crate::options::DicReadOpcode;
use crate::types::{MediaType, RedumpSystem};

// Positional parameters.
pub const DRIVE: &str = "drive";
pub const FILENAME: &str = "filename";
pub const SPEED: &str = "speed";
pub const START_LBA: &str = "start-lba";
pub const END_LBA: &str = "end-lba";
pub const MERGE_FILENAME: &str = "merge-filename";

// Flags.
pub const ADD_OFFSET: &str = "add-offset";
pub const AMSF: &str = "amsf";
pub const ATARI_JAGUAR: &str = "atari-jaguar";
pub const BE_OPCODE: &str = "be-opcode";
pub const C2_OPCODE: &str = "c2-opcode";
pub const COPYRIGHT_MANAGEMENT_INFORMATION: &str = "copyright-management-information";
pub const D8_OPCODE: &str = "d8-opcode";
pub const DAT_EXPAND: &str = "dat-expand";
pub const DISABLE_BEEP: &str = "disable-beep";
pub const DVD_REREAD: &str = "dvd-reread";
pub const EXTRACT_MICROSOFT_CAB: &str = "extract-microsoft-cab";
pub const FIX: &str = "fix";
pub const FORCE_UNIT_ACCESS: &str = "force-unit-access";
pub const MCN: &str = "mcn";
pub const MULTI_SECTOR_READ: &str = "multi-sector-read";
pub const NO_FIX_SUB_P: &str = "no-fix-sub-p";
pub const NO_FIX_SUB_Q: &str = "no-fix-sub-q";
pub const NO_FIX_SUB_Q_LIBCRYPT: &str = "no-fix-sub-q-libcrypt";
pub const NO_FIX_SUB_RTOW: &str = "no-fix-sub-rtow";
pub const NO_FIX_SUB_Q_SECUROM: &str = "no-fix-sub-q-securom";
pub const NO_SKIP_SECURITY_SECTOR: &str = "no-skip-security-sector";
pub const PAD_SECTOR: &str = "pad-sector";
pub const RANGE: &str = "range";
pub const RAW: &str = "raw";
pub const RESUME: &str = "resume";
pub const REVERSE: &str = "reverse";
pub const SCAN_ANTI_MOD: &str = "scan-anti-mod";
pub const SCAN_FILE_PROTECT: &str = "scan-file-protect";
pub const SCAN_SECTOR_PROTECT: &str = "scan-sector-protect";
pub const SEVENTY_FOUR: &str = "seventy-four";
pub const SKIP_SECTOR: &str = "skip-sector";
pub const SUBCHANNEL_READ_LEVEL: &str = "subchannel-read-level";
pub const TAGES: &str = "tages";
pub const USE_ANCHOR_VOLUME_DESCRIPTOR_POINTER: &str = "use-anchor-volume-descriptor-pointer";
pub const VIDEO_NOW: &str = "video-now";
pub const VIDEO_NOW_COLOR: &str = "video-now-color";
pub const VIDEO_NOW_XP: &str = "video-now-xp";

/// C2 reread count the tool uses when `/c2` carries no value.
const TOOL_C2_REREAD: i32 = 4000;
/// `/rr` count the tool uses when none is given.
const TOOL_DVD_REREAD: i32 = 10;

const DRIVE_SLOT: &[ValueSpec] = &[ValueSpec::string("drive").quoted(Quoting::WhenNeeded)];
const FILENAME_SLOT: &[ValueSpec] = &[ValueSpec::string("filename").quoted(Quoting::WhenNeeded)];
const SPEED_SLOT: &[ValueSpec] = &[ValueSpec::int8("speed").bounded(0, 72)];
const LBA_SLOT: &[ValueSpec] = &[ValueSpec::int32("lba")];

const ONE_INT: &[ValueSpec] = &[ValueSpec::int32("value")];
const OPTIONAL_INT: &[ValueSpec] = &[ValueSpec::int32("value").optional()];
const BE_SLOTS: &[ValueSpec] = &[ValueSpec::string("mode").one_of(&["raw", "pack"]).optional()];
const C2_SLOTS: &[ValueSpec] = &[
    ValueSpec::int32("reread-count").optional(),
    ValueSpec::int32("c2-offset").optional(),
    ValueSpec::int32("start-lba").optional(),
    ValueSpec::int32("end-lba").optional(),
];
const PAD_SLOTS: &[ValueSpec] = &[ValueSpec::int8("value").bounded(0, 1).optional()];
const RANGE_SLOTS: &[ValueSpec] = &[ValueSpec::int32("start-lba"), ValueSpec::int32("end-lba")];
const SKIP_SLOTS: &[ValueSpec] = &[
    ValueSpec::int32("count"),
    ValueSpec::int32("start-lba").optional(),
];
const LEVEL_SLOTS: &[ValueSpec] = &[ValueSpec::int8("level").bounded(0, 2).optional()];

static FLAGS: &[FlagSpec] = &[
    FlagSpec::positional(DRIVE, DRIVE_SLOT).describe("Drive letter or device path"),
    FlagSpec::positional(FILENAME, FILENAME_SLOT).describe("Output file path"),
    FlagSpec::positional(SPEED, SPEED_SLOT).describe("Read speed, 0 for the drive's maximum"),
    FlagSpec::positional(START_LBA, LBA_SLOT).describe("First sector to read"),
    FlagSpec::positional(END_LBA, LBA_SLOT).describe("Sector after the last one to read"),
    FlagSpec::positional(MERGE_FILENAME, FILENAME_SLOT).describe("Second input file to merge"),
    FlagSpec::valued(ADD_OFFSET, Some("/a"), None, ONE_INT).describe("Add a sample offset"),
    FlagSpec::boolean(AMSF, Some("/p"), None).describe("Dump AMSF from 00:00:00"),
    FlagSpec::boolean(ATARI_JAGUAR, Some("/aj"), None).describe("Atari Jaguar CD"),
    FlagSpec::valued(BE_OPCODE, Some("/be"), None, BE_SLOTS).describe("Use the 0xBE opcode"),
    FlagSpec::valued(C2_OPCODE, Some("/c2"), None, C2_SLOTS).describe("Reread C2 errors"),
    FlagSpec::boolean(COPYRIGHT_MANAGEMENT_INFORMATION, Some("/c"), None)
        .describe("Log copyright management information"),
    FlagSpec::boolean(D8_OPCODE, Some("/d8"), None).describe("Use the 0xD8 opcode"),
    FlagSpec::boolean(DAT_EXPAND, Some("/d"), None).describe("Write an expanded dat file"),
    FlagSpec::boolean(DISABLE_BEEP, Some("/q"), None).describe("Disable the completion beep"),
    FlagSpec::valued(DVD_REREAD, Some("/rr"), None, OPTIONAL_INT)
        .describe("Reread unreadable sectors"),
    FlagSpec::boolean(EXTRACT_MICROSOFT_CAB, Some("/mscf"), None)
        .describe("Extract Microsoft cabinet files"),
    FlagSpec::valued(FIX, Some("/fix"), None, ONE_INT).describe("Fix the TOC at a sector"),
    FlagSpec::valued(FORCE_UNIT_ACCESS, Some("/f"), None, OPTIONAL_INT)
        .describe("Bypass the drive cache"),
    FlagSpec::boolean(MCN, Some("/m"), None).describe("Scan the media catalog number"),
    FlagSpec::valued(MULTI_SECTOR_READ, Some("/mr"), None, OPTIONAL_INT)
        .describe("Read multiple sectors per request"),
    FlagSpec::boolean(NO_FIX_SUB_P, Some("/np"), None).describe("Leave subchannel P as read"),
    FlagSpec::boolean(NO_FIX_SUB_Q, Some("/nq"), None).describe("Leave subchannel Q as read"),
    FlagSpec::boolean(NO_FIX_SUB_Q_LIBCRYPT, Some("/nl"), None)
        .describe("Leave LibCrypt subchannel Q as read"),
    FlagSpec::boolean(NO_FIX_SUB_RTOW, Some("/nr"), None).describe("Leave subchannel R-W as read"),
    FlagSpec::boolean(NO_FIX_SUB_Q_SECUROM, Some("/ns"), None)
        .describe("Leave SecuROM subchannel Q as read"),
    FlagSpec::valued(NO_SKIP_SECURITY_SECTOR, Some("/nss"), None, OPTIONAL_INT)
        .describe("Read the Xbox security sectors"),
    FlagSpec::valued(PAD_SECTOR, Some("/ps"), None, PAD_SLOTS).describe("Pad unreadable sectors"),
    FlagSpec::valued(RANGE, Some("/ra"), None, RANGE_SLOTS).describe("Read a sector range"),
    FlagSpec::boolean(RAW, Some("/raw"), None).describe("Read raw DVD sectors"),
    FlagSpec::boolean(RESUME, Some("/re"), None).describe("Resume a previous dump"),
    FlagSpec::boolean(REVERSE, Some("/r"), None).describe("Read from the end"),
    FlagSpec::boolean(SCAN_ANTI_MOD, Some("/am"), None).describe("Scan for anti-mod strings"),
    FlagSpec::valued(SCAN_FILE_PROTECT, Some("/sf"), None, OPTIONAL_INT)
        .describe("Scan file-based protection"),
    FlagSpec::boolean(SCAN_SECTOR_PROTECT, Some("/ss"), None)
        .describe("Scan sector-based protection"),
    FlagSpec::boolean(SEVENTY_FOUR, Some("/74"), None).describe("Read a 74-minute swap disc"),
    FlagSpec::valued(SKIP_SECTOR, Some("/sk"), None, SKIP_SLOTS).describe("Skip sectors"),
    FlagSpec::valued(SUBCHANNEL_READ_LEVEL, Some("/s"), None, LEVEL_SLOTS)
        .describe("Subchannel read level"),
    FlagSpec::boolean(TAGES, Some("/t"), None).describe("Handle TAGES protection"),
    FlagSpec::boolean(USE_ANCHOR_VOLUME_DESCRIPTOR_POINTER, Some("/avdp"), None)
        .describe("Use the anchor volume descriptor pointer"),
    FlagSpec::valued(VIDEO_NOW, Some("/vn"), None, OPTIONAL_INT).describe("VideoNow disc"),
    FlagSpec::boolean(VIDEO_NOW_COLOR, Some("/vnc"), None).describe("VideoNow Color disc"),
    FlagSpec::boolean(VIDEO_NOW_XP, Some("/vnx"), None).describe("VideoNow XP disc"),
];

const DRIVE_FILE_SPEED: &[&str] = &[DRIVE, FILENAME, SPEED];
const DRIVE_FILE_SPEED_RANGE: &[&str] = &[DRIVE, FILENAME, SPEED, START_LBA, END_LBA];
const DRIVE_FILE: &[&str] = &[DRIVE, FILENAME];
const FILE_ONLY: &[&str] = &[FILENAME];
const FILE_PAIR: &[&str] = &[FILENAME, MERGE_FILENAME];
const DRIVE_ONLY: &[&str] = &[DRIVE];

static COMMANDS: &[CommandSpec] = &[
    CommandSpec::new(None, "No command"),
    CommandSpec::new(Some("audio"), "Dump a sector range as audio")
        .dumping()
        .with_positionals(DRIVE_FILE_SPEED_RANGE),
    CommandSpec::new(Some("bd"), "Dump a Blu-ray disc")
        .dumping()
        .with_positionals(DRIVE_FILE_SPEED),
    CommandSpec::new(Some("cd"), "Dump a CD")
        .dumping()
        .with_positionals(DRIVE_FILE_SPEED),
    CommandSpec::new(Some("close"), "Close the drive tray").with_positionals(DRIVE_ONLY),
    CommandSpec::new(Some("data"), "Dump a sector range as data")
        .dumping()
        .with_positionals(DRIVE_FILE_SPEED_RANGE),
    CommandSpec::new(Some("disk"), "Dump a removable disk")
        .dumping()
        .with_positionals(DRIVE_FILE),
    CommandSpec::new(Some("dvd"), "Dump a DVD")
        .dumping()
        .with_positionals(DRIVE_FILE_SPEED),
    CommandSpec::new(Some("eject"), "Eject the drive tray").with_positionals(DRIVE_ONLY),
    CommandSpec::new(Some("fd"), "Dump a floppy disk")
        .dumping()
        .with_positionals(DRIVE_FILE),
    CommandSpec::new(Some("gd"), "Dump a GD-ROM")
        .dumping()
        .with_positionals(DRIVE_FILE_SPEED),
    CommandSpec::new(Some("mds"), "Parse an MDS file").with_positionals(FILE_ONLY),
    CommandSpec::new(Some("merge"), "Merge two dumps").with_positionals(FILE_PAIR),
    CommandSpec::new(Some("reset"), "Reset the drive").with_positionals(DRIVE_ONLY),
    CommandSpec::new(Some("sacd"), "Dump a Super Audio CD")
        .dumping()
        .with_positionals(DRIVE_FILE),
    CommandSpec::new(Some("start"), "Spin up the disc").with_positionals(DRIVE_ONLY),
    CommandSpec::new(Some("stop"), "Spin down the disc").with_positionals(DRIVE_ONLY),
    CommandSpec::new(Some("sub"), "Parse a subchannel file").with_positionals(FILE_ONLY),
    CommandSpec::new(Some("swap"), "Dump a CD using a swap trick")
        .dumping()
        .with_positionals(DRIVE_FILE_SPEED),
    CommandSpec::new(Some("tape"), "Dump a tape")
        .dumping()
        .with_positionals(FILE_ONLY),
    CommandSpec::new(Some("version"), "Print the tool version"),
    CommandSpec::new(Some("xbox"), "Dump an Xbox disc")
        .dumping()
        .with_positionals(DRIVE_FILE_SPEED),
    CommandSpec::new(Some("xboxswap"), "Dump an Xbox disc using a swap trick")
        .dumping()
        .with_positionals(DRIVE_FILE_SPEED),
    CommandSpec::new(Some("xgd2swap"), "Dump an XGD2 disc using a swap trick")
        .dumping()
        .with_positionals(DRIVE_FILE_SPEED),
    CommandSpec::new(Some("xgd3swap"), "Dump an XGD3 disc using a swap trick")
        .dumping()
        .with_positionals(DRIVE_FILE_SPEED),
];

const COMMON: &[&str] = &[DAT_EXPAND, DISABLE_BEEP];
const BEEP_ONLY: &[&str] = &[DISABLE_BEEP];
const SWAP_ONLY: &[&str] = &[SEVENTY_FOUR];
const CD_READ: &[&str] = &[
    ADD_OFFSET,
    AMSF,
    ATARI_JAGUAR,
    BE_OPCODE,
    C2_OPCODE,
    D8_OPCODE,
    EXTRACT_MICROSOFT_CAB,
    FIX,
    FORCE_UNIT_ACCESS,
    MCN,
    MULTI_SECTOR_READ,
    NO_FIX_SUB_P,
    NO_FIX_SUB_Q,
    NO_FIX_SUB_Q_LIBCRYPT,
    NO_FIX_SUB_RTOW,
    NO_FIX_SUB_Q_SECUROM,
    PAD_SECTOR,
    REVERSE,
    SCAN_ANTI_MOD,
    SCAN_FILE_PROTECT,
    SCAN_SECTOR_PROTECT,
    SUBCHANNEL_READ_LEVEL,
    TAGES,
    VIDEO_NOW,
    VIDEO_NOW_COLOR,
    VIDEO_NOW_XP,
];
const GD_READ: &[&str] = &[
    BE_OPCODE,
    C2_OPCODE,
    D8_OPCODE,
    FORCE_UNIT_ACCESS,
    NO_FIX_SUB_P,
    NO_FIX_SUB_Q,
    NO_FIX_SUB_RTOW,
    SUBCHANNEL_READ_LEVEL,
];
const DVD_READ: &[&str] = &[
    COPYRIGHT_MANAGEMENT_INFORMATION,
    DVD_REREAD,
    EXTRACT_MICROSOFT_CAB,
    FIX,
    FORCE_UNIT_ACCESS,
    PAD_SECTOR,
    RANGE,
    RAW,
    RESUME,
    REVERSE,
    SCAN_FILE_PROTECT,
    SKIP_SECTOR,
    USE_ANCHOR_VOLUME_DESCRIPTOR_POINTER,
];
const BD_READ: &[&str] = &[DVD_REREAD, EXTRACT_MICROSOFT_CAB, FORCE_UNIT_ACCESS, PAD_SECTOR];
const XBOX_READ: &[&str] = &[
    FORCE_UNIT_ACCESS,
    NO_SKIP_SECURITY_SECTOR,
    PAD_SECTOR,
    SKIP_SECTOR,
];

fn build_matrix() -> SupportMatrix {
    let mut builder = SupportMatrix::builder()
        .command(None, &[])
        .command(Some("audio"), &[DRIVE_FILE_SPEED_RANGE, COMMON, CD_READ])
        .command(Some("bd"), &[DRIVE_FILE_SPEED, COMMON, BD_READ])
        .command(Some("cd"), &[DRIVE_FILE_SPEED, COMMON, CD_READ])
        .command(Some("data"), &[DRIVE_FILE_SPEED_RANGE, COMMON, CD_READ])
        .command(Some("disk"), &[DRIVE_FILE, COMMON])
        .command(Some("dvd"), &[DRIVE_FILE_SPEED, COMMON, DVD_READ])
        .command(Some("fd"), &[DRIVE_FILE, COMMON])
        .command(Some("gd"), &[DRIVE_FILE_SPEED, COMMON, GD_READ])
        .command(Some("mds"), &[FILE_ONLY])
        .command(Some("merge"), &[FILE_PAIR])
        .command(Some("sacd"), &[DRIVE_FILE, BEEP_ONLY])
        .command(Some("sub"), &[FILE_ONLY])
        .command(Some("swap"), &[DRIVE_FILE_SPEED, COMMON, CD_READ, SWAP_ONLY])
        .command(Some("tape"), &[FILE_ONLY, BEEP_ONLY])
        .command(Some("version"), &[]);
    for tray in ["close", "eject", "reset", "start", "stop"] {
        builder = builder.command(Some(tray), &[DRIVE_ONLY]);
    }
    for xbox in ["xbox", "xboxswap", "xgd2swap", "xgd3swap"] {
        builder = builder.command(Some(xbox), &[DRIVE_FILE_SPEED, COMMON, XBOX_READ]);
    }
    builder.build()
}

pub static SPEC: LazyLock<DialectSpec> = LazyLock::new(|| DialectSpec {
    dialect: Dialect::DiscImageCreator,
    command_style: CommandStyle::Leading,
    command_required: true,
    unknown_tokens: UnknownTokens::Reject,
    value_style: ValueStyle::Separate,
    strict_key_value: false,
    commands: COMMANDS,
    flags: FLAGS,
    matrix: build_matrix(),
    hooks: Hooks {
        apply_defaults,
        finish_parse: |_| {},
        media_type,
        input_path: |ctx| ctx.string_value(DRIVE).map(str::to_string),
        output_path: |ctx| ctx.string_value(FILENAME).map(str::to_string),
    },
});

fn command_for(media_type: Option<MediaType>, system: Option<RedumpSystem>) -> &'static str {
    match media_type {
        Some(
            MediaType::Dvd
            | MediaType::HdDvd
            | MediaType::NintendoGameCubeGameDisc
            | MediaType::NintendoWiiOpticalDisc,
        ) => match system {
            Some(RedumpSystem::MicrosoftXbox | RedumpSystem::MicrosoftXbox360) => "xbox",
            _ => "dvd",
        },
        Some(MediaType::GdRom) => "gd",
        Some(MediaType::BluRay) => "bd",
        Some(MediaType::FloppyDisk) => "fd",
        Some(MediaType::HardDisk) => "disk",
        Some(MediaType::CdRom | MediaType::Umd) | None => "cd",
    }
}

fn apply_defaults(ctx: &mut ExecutionContext, request: &DumpRequest<'_>) {
    let options = &request.options.dic;
    let command = command_for(request.media_type, request.system);
    ctx.select_command(Some(command));

    if let Some(drive) = request.drive_path {
        ctx.apply(DRIVE, drive);
    }
    ctx.apply(FILENAME, request.filename);
    if request.drive_speed > 0 {
        ctx.apply(SPEED, request.drive_speed);
    } else {
        ctx.clear_flag(SPEED);
    }

    if options.quiet_mode {
        ctx.enable(DISABLE_BEEP);
    }

    match command {
        "cd" => {
            ctx.enable(C2_OPCODE);
            if options.reread_count != TOOL_C2_REREAD {
                ctx.apply_slot(C2_OPCODE, 0, options.reread_count);
            }
            match options.read_opcode {
                DicReadOpcode::Auto => {}
                DicReadOpcode::Be => ctx.enable(BE_OPCODE),
                DicReadOpcode::D8 => ctx.enable(D8_OPCODE),
            }
            if options.multi_sector_read > 0 {
                ctx.apply(MULTI_SECTOR_READ, options.multi_sector_read);
            }
            match request.system {
                Some(RedumpSystem::IbmPcCompatible | RedumpSystem::AppleMacintosh) => {
                    ctx.enable(NO_FIX_SUB_Q_SECUROM);
                    ctx.enable(SCAN_FILE_PROTECT);
                    if options.paranoid_mode {
                        ctx.enable(SCAN_SECTOR_PROTECT);
                        ctx.apply(SUBCHANNEL_READ_LEVEL, 2);
                    }
                }
                Some(RedumpSystem::NecPcEngineCd) => ctx.enable(MCN),
                Some(RedumpSystem::SonyPlayStation) => {
                    ctx.enable(SCAN_ANTI_MOD);
                    ctx.enable(NO_FIX_SUB_Q_LIBCRYPT);
                }
                _ => {}
            }
        }
        "gd" => {
            ctx.enable(C2_OPCODE);
            if options.reread_count != TOOL_C2_REREAD {
                ctx.apply_slot(C2_OPCODE, 0, options.reread_count);
            }
        }
        "dvd" => {
            if options.paranoid_mode {
                ctx.enable(COPYRIGHT_MANAGEMENT_INFORMATION);
                ctx.enable(SCAN_FILE_PROTECT);
            }
            ctx.enable(DVD_REREAD);
            if options.dvd_reread_count != TOOL_DVD_REREAD {
                ctx.apply(DVD_REREAD, options.dvd_reread_count);
            }
            if matches!(
                request.media_type,
                Some(MediaType::NintendoGameCubeGameDisc | MediaType::NintendoWiiOpticalDisc)
            ) {
                ctx.enable(RAW);
            }
        }
        "bd" => {
            ctx.enable(DVD_REREAD);
            if options.bd_reread_count != TOOL_DVD_REREAD {
                ctx.apply(DVD_REREAD, options.bd_reread_count);
            }
        }
        _ => {}
    }
}

fn media_type(ctx: &ExecutionContext) -> Option<MediaType> {
    match ctx.base_command()? {
        "cd" | "audio" | "data" | "swap" | "sacd" => Some(MediaType::CdRom),
        "dvd" if ctx.is_set(RAW) => Some(MediaType::NintendoGameCubeGameDisc),
        "dvd" | "xbox" | "xboxswap" | "xgd2swap" | "xgd3swap" => Some(MediaType::Dvd),
        "gd" => Some(MediaType::GdRom),
        "bd" => Some(MediaType::BluRay),
        "fd" => Some(MediaType::FloppyDisk),
        "disk" => Some(MediaType::HardDisk),
        _ => None,
    }
}
