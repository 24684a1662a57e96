mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use dump_params_config::Settings;
use dump_params_core::{
    Dialect, DialectSummary, DumpRequest, ExecutionContext, MediaType, RedumpSystem,
    validate_dialect,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::output::{FlagReport, OutputFormat, ParseReport, format_report, format_summary};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "dump-params")]
#[command(version, about = "Generate and parse disc dumping tool parameters")]
struct Cli {
    /// Settings file (YAML or JSON) with tool paths and dump options.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log level; overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate default parameters for a dump.
    Generate(GenerateArgs),
    /// Parse a parameter string and print its structured model.
    Parse(ParseArgs),
    /// Describe a dialect's commands and flags.
    Describe(DescribeArgs),
    /// Check the built-in flag catalogs for consistency.
    Validate,
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Tool dialect (disc-image-creator, redumper, dd).
    #[arg(long)]
    dialect: Option<Dialect>,
    /// Drive letter or device path.
    #[arg(long)]
    drive: Option<String>,
    /// Output image path.
    #[arg(long)]
    output: String,
    /// Drive read speed; 0 lets the tool decide.
    #[arg(long, default_value_t = 0)]
    speed: i32,
    /// Target system (e.g. sony-play-station).
    #[arg(long)]
    system: Option<RedumpSystem>,
    /// Media type (e.g. cd-rom, dvd).
    #[arg(long)]
    media: Option<MediaType>,
    /// Print only the parameters, without the configured executable.
    #[arg(long)]
    bare: bool,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Tool dialect (disc-image-creator, redumper, dd).
    #[arg(long)]
    dialect: Option<Dialect>,
    /// Parameter string; quote it as one argument.
    #[arg(allow_hyphen_values = true)]
    parameters: String,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct DescribeArgs {
    /// Tool dialect (disc-image-creator, redumper, dd).
    #[arg(long)]
    dialect: Option<Dialect>,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: OutputFormat,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let result = Settings::load_or_default(cli.config.as_deref())
        .map_err(|err| format!("Failed to load settings: {err}"))
        .and_then(|settings| match cli.command {
            Command::Generate(args) => run_generate(&settings, args),
            Command::Parse(args) => run_parse(&settings, args),
            Command::Describe(args) => run_describe(&settings, args),
            Command::Validate => run_validate(),
        });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(level: Option<LogLevel>) {
    let format = tracing_subscriber::fmt::format().with_target(false).without_time();
    let builder = tracing_subscriber::fmt()
        .event_format(format)
        .with_writer(std::io::stderr);
    match level {
        Some(level) => builder.with_max_level(LevelFilter::from(level)).init(),
        None => builder
            .with_env_filter(
                EnvFilter::builder()
                    .with_default_directive(LevelFilter::WARN.into())
                    .from_env_lossy(),
            )
            .init(),
    }
}

fn resolve_dialect(settings: &Settings, dialect: Option<Dialect>) -> Result<Dialect, String> {
    dialect.or(settings.default_dialect).ok_or_else(|| {
        "No dialect given: pass --dialect or set default_dialect in the settings file".to_string()
    })
}

fn run_generate(settings: &Settings, args: GenerateArgs) -> Result<(), String> {
    let dialect = resolve_dialect(settings, args.dialect)?;
    let request = DumpRequest {
        system: args.system,
        media_type: args.media,
        drive_path: args.drive.as_deref(),
        filename: &args.output,
        drive_speed: args.speed,
        options: &settings.options,
    };

    let mut ctx = ExecutionContext::from_request(dialect, &request);
    if let Some(path) = settings.executable(dialect) {
        ctx = ctx.with_executable(path);
    }
    let parameters = ctx
        .try_generate()
        .map_err(|err| format!("Cannot generate {dialect} parameters: {err}"))?;
    debug!(%dialect, %parameters, "generated parameters");

    match ctx.executable() {
        Some(path) if !args.bare => println!("\"{}\" {parameters}", path.display()),
        _ => println!("{parameters}"),
    }
    Ok(())
}

fn run_parse(settings: &Settings, args: ParseArgs) -> Result<(), String> {
    let dialect = resolve_dialect(settings, args.dialect)?;
    let ctx = ExecutionContext::parse(dialect, &args.parameters)
        .map_err(|err| format!("Invalid {dialect} parameters: {err}"))?;
    let parameters = ctx
        .try_generate()
        .map_err(|err| format!("Cannot regenerate {dialect} parameters: {err}"))?;

    let flags = ctx
        .set_flags()
        .into_iter()
        .map(|id| FlagReport {
            id: id.to_string(),
            values: ctx
                .values(id)
                .iter()
                .map(|v| v.as_ref().map_or_else(|| "-".to_string(), ToString::to_string))
                .collect(),
        })
        .collect();

    let report = ParseReport {
        dialect: dialect.to_string(),
        parameters,
        command: ctx.base_command().map(str::to_string),
        dumping: ctx.is_dumping_command(),
        media_type: ctx.detect_media_type().map(|m| m.to_string()),
        input_path: ctx.input_path(),
        output_path: ctx.output_path(),
        flags,
    };
    print!("{}", terminated(format_report(&report, args.format)?));
    Ok(())
}

fn run_describe(settings: &Settings, args: DescribeArgs) -> Result<(), String> {
    let dialect = resolve_dialect(settings, args.dialect)?;
    let summary = DialectSummary::new(dialect);
    print!("{}", terminated(format_summary(&summary, args.format)?));
    Ok(())
}

fn run_validate() -> Result<(), String> {
    let mut failures = 0;
    for dialect in Dialect::ALL {
        let errors = validate_dialect(dialect.spec());
        if errors.is_empty() {
            println!("{dialect}: ok");
        } else {
            for err in &errors {
                eprintln!("{dialect}: {err}");
            }
            failures += errors.len();
        }
    }
    if failures > 0 {
        return Err(format!("{failures} catalog error(s)"));
    }
    Ok(())
}

fn terminated(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
