//! Output formatting for dialect summaries and parse reports.

use dump_params_core::{DialectSummary, FlagSummary};
use serde::Serialize;

/// Supported output formats.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
}

/// Result of parsing a parameter string, as printed by `parse`.
#[derive(Debug, Serialize)]
pub struct ParseReport {
    pub dialect: String,
    pub parameters: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    pub dumping: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    pub flags: Vec<FlagReport>,
}

/// One set flag and its rendered slot values.
#[derive(Debug, Serialize)]
pub struct FlagReport {
    pub id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

/// Formats a dialect summary in the requested output format.
pub fn format_summary(summary: &DialectSummary, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(summary)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(summary).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(summary_to_markdown(summary)),
        OutputFormat::Table => Ok(summary_to_table(summary)),
    }
}

/// Formats a parse report in the requested output format.
pub fn format_report(report: &ParseReport, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Markdown => Ok(report_to_markdown(report)),
        OutputFormat::Table => Ok(report_to_table(report)),
    }
}

fn flag_spelling(flag: &FlagSummary) -> String {
    match (&flag.short, &flag.long) {
        (Some(s), Some(l)) => format!("{s}, {l}"),
        (Some(s), None) => s.clone(),
        (None, Some(l)) => l.clone(),
        (None, None) => format!("<{}>", flag.id),
    }
}

fn slot_names(flag: &FlagSummary) -> String {
    flag.values
        .iter()
        .map(|slot| {
            if slot.optional {
                format!("[{}]", slot.name)
            } else {
                format!("<{}>", slot.name)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn summary_to_markdown(summary: &DialectSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", summary.dialect));
    out.push_str(&format!(
        "**Commands:** {:?}  **Values:** {:?}  **Unknown tokens:** {:?}\n\n",
        summary.command_style, summary.value_style, summary.unknown_tokens
    ));

    if !summary.commands.is_empty() {
        out.push_str("## Commands\n\n");
        out.push_str("| Command | Dumping | Description |\n");
        out.push_str("|---------|---------|-------------|\n");
        for command in &summary.commands {
            let name = command.name.as_deref().unwrap_or("(none)");
            let dumping = if command.dumping { "yes" } else { "no" };
            out.push_str(&format!(
                "| `{name}` | {dumping} | {} |\n",
                command.description
            ));
        }
        out.push('\n');
    }

    if !summary.flags.is_empty() {
        out.push_str("## Flags\n\n");
        out.push_str("| Flag | Values | Description |\n");
        out.push_str("|------|--------|-------------|\n");
        for flag in &summary.flags {
            out.push_str(&format!(
                "| `{}` | {} | {} |\n",
                flag_spelling(flag),
                slot_names(flag),
                flag.description
            ));
        }
        out.push('\n');
    }

    out
}

fn summary_to_table(summary: &DialectSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Dialect: {}  Commands: {}  Flags: {}\n",
        summary.dialect,
        summary.commands.len(),
        summary.flags.len()
    ));

    if !summary.commands.is_empty() {
        out.push_str("\nCommands:\n");
        let max_name = summary
            .commands
            .iter()
            .map(|c| c.name.as_deref().unwrap_or("(none)").len())
            .max()
            .unwrap_or(4);

        for command in &summary.commands {
            let marker = if command.dumping { "*" } else { " " };
            out.push_str(&format!(
                "  {marker}{:<width$}  {}\n",
                command.name.as_deref().unwrap_or("(none)"),
                command.description,
                width = max_name
            ));
        }
    }

    if !summary.flags.is_empty() {
        out.push_str("\nFlags:\n");
        let names: Vec<String> = summary
            .flags
            .iter()
            .map(|f| {
                let slots = slot_names(f);
                if slots.is_empty() {
                    flag_spelling(f)
                } else {
                    format!("{} {slots}", flag_spelling(f))
                }
            })
            .collect();
        let max_name = names.iter().map(String::len).max().unwrap_or(4);

        for (name, flag) in names.iter().zip(&summary.flags) {
            out.push_str(&format!(
                "  {:<width$}  {}\n",
                name,
                flag.description,
                width = max_name
            ));
        }
    }

    out
}

fn report_to_markdown(report: &ParseReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Parameters: {}\n\n", report.dialect));
    out.push_str(&format!("`{}`\n\n", report.parameters));
    out.push_str(&format!(
        "- **Command:** {}\n",
        report.command.as_deref().unwrap_or("(none)")
    ));
    out.push_str(&format!(
        "- **Dumping:** {}\n",
        if report.dumping { "yes" } else { "no" }
    ));
    if let Some(ref media) = report.media_type {
        out.push_str(&format!("- **Media Type:** {media}\n"));
    }
    if let Some(ref input) = report.input_path {
        out.push_str(&format!("- **Input:** {input}\n"));
    }
    if let Some(ref output) = report.output_path {
        out.push_str(&format!("- **Output:** {output}\n"));
    }

    if !report.flags.is_empty() {
        out.push_str("\n## Flags\n\n");
        for flag in &report.flags {
            if flag.values.is_empty() {
                out.push_str(&format!("- `{}`\n", flag.id));
            } else {
                out.push_str(&format!("- `{}`: {}\n", flag.id, flag.values.join(" ")));
            }
        }
    }

    out
}

fn report_to_table(report: &ParseReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", report.parameters));
    out.push_str(&format!(
        "  command:  {}\n",
        report.command.as_deref().unwrap_or("(none)")
    ));
    out.push_str(&format!("  dumping:  {}\n", report.dumping));
    if let Some(ref media) = report.media_type {
        out.push_str(&format!("  media:    {media}\n"));
    }
    if let Some(ref input) = report.input_path {
        out.push_str(&format!("  input:    {input}\n"));
    }
    if let Some(ref output) = report.output_path {
        out.push_str(&format!("  output:   {output}\n"));
    }

    if !report.flags.is_empty() {
        out.push_str("\nFlags:\n");
        let max_name = report.flags.iter().map(|f| f.id.len()).max().unwrap_or(4);
        for flag in &report.flags {
            out.push_str(&format!(
                "  {:<width$}  {}\n",
                flag.id,
                flag.values.join(" "),
                width = max_name
            ));
        }
    }

    out
}
