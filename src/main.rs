//! Purpose: `pyrad` CLI entry point and command dispatch.
//! Role: Binary crate root; parses args, runs commands, prints decoded output on stdout.
//! Invariants: Diagnostics go to stderr: human-readable on a terminal, JSON otherwise.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
//! Invariants: All decode paths go through `api` (shared validation semantics).
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand, ValueEnum, ValueHint,
    error::ErrorKind as ClapErrorKind,
};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

mod command_dispatch;

use pyrad::api::{
    CheckReport, CheckStatus, Error, ErrorKind, check_file, check_str, decode_file, decode_str,
    to_exit_code,
};

const DEFAULT_INPUT_FILE: &str = "coding_qual_input.txt";

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                let message = clap_error_summary(&err);
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(message)
                        .with_hint("Try `pyrad --help`."),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let color_mode = cli.color;
    let result = command_dispatch::dispatch_command(cli.command);

    result
        .map_err(add_missing_input_hint)
        .map_err(add_io_hint)
        .map_err(add_internal_hint)
        .map_err(|err| (err, color_mode))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Parser)]
#[command(
    name = "pyrad",
    version,
    about = "Decode pyramid-numbered message files",
    help_template = r#"{about-with-newline}
{before-help}USAGE
  {usage}

COMMANDS
{subcommands}

OPTIONS
{options}

{after-help}
"#,
    long_about = None,
    before_help = r#"Input is plain text, one "<position> <word>" pair per line. Positions fill a
pyramid (row 1 holds 1 entry, row n holds n); the decoded message is the word
at the end of each row, in row order.
"#,
    after_help = r#"EXAMPLES
  $ pyrad decode                      # decode ./coding_qual_input.txt
  $ pyrad decode message.txt
  $ cat message.txt | pyrad decode -
  $ pyrad check message.txt --json

LEARN MORE
  $ pyrad <command> --help"#,
    arg_required_else_help = true,
    disable_help_subcommand = false
)]
struct Cli {
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics: auto|always|never"
    )]
    color: ColorMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    #[command(
        about = "Decode a message file and print the result",
        long_about = r#"Decode an encoded message file and print the decoded message to stdout.

Each input line is a "<position> <word>" pair. Positions must be unique,
within the line count, and the line count must form a complete pyramid."#,
        after_help = r#"EXAMPLES
  $ pyrad decode
  $ pyrad decode message.txt
  $ cat message.txt | pyrad decode -

NOTES
  - Without FILE, reads coding_qual_input.txt from the current directory
  - Pass - as FILE to read from stdin"#
    )]
    Decode {
        #[arg(
            help = "Message file path (default: coding_qual_input.txt; use - for stdin)",
            value_hint = ValueHint::FilePath
        )]
        file: Option<PathBuf>,
    },
    #[command(
        about = "Diagnose a message file without printing the message",
        long_about = r#"Validate one message file and emit a diagnostic report."#,
        after_help = r#"EXAMPLES
  $ pyrad check message.txt
  $ pyrad check message.txt --json

NOTES
  - Human-readable output is the default.
  - Use --json for machine-readable output.
  - Exits non-zero when the message does not decode."#
    )]
    Check {
        #[arg(
            help = "Message file path (default: coding_qual_input.txt; use - for stdin)",
            value_hint = ValueHint::FilePath
        )]
        file: Option<PathBuf>,
        #[arg(long, help = "Emit JSON instead of human-readable output")]
        json: bool,
    },
    #[command(
        about = "Print version info as JSON",
        long_about = r#"Emit version info as JSON (stable, machine-readable)."#,
        after_help = r#"EXAMPLES
  $ pyrad version"#
    )]
    Version,
    #[command(
        arg_required_else_help = true,
        about = "Generate shell completions",
        long_about = r#"Generate shell completion scripts.

Prints a completion script for the given shell to stdout.
Install the generated file in your shell's completion directory (or source it)
to enable tab completion."#,
        after_help = r#"EXAMPLES
  $ pyrad completion bash > ~/.local/share/bash-completion/completions/pyrad
  $ pyrad completion zsh > ~/.zfunc/_pyrad
  $ pyrad completion fish > ~/.config/fish/completions/pyrad.fish"#
    )]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

enum MessageSource {
    Path(PathBuf),
    Stdin,
}

fn resolve_source(file: Option<PathBuf>) -> MessageSource {
    match file {
        Some(path) if path.as_os_str() == "-" => MessageSource::Stdin,
        Some(path) => MessageSource::Path(path),
        None => MessageSource::Path(PathBuf::from(DEFAULT_INPUT_FILE)),
    }
}

fn read_stdin() -> Result<String, Error> {
    io::read_to_string(io::stdin().lock()).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to read message from stdin")
            .with_source(err)
    })
}

fn add_missing_input_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::NotFound || err.hint().is_some() {
        return err;
    }
    let is_default_input = err
        .path()
        .is_some_and(|path| path.as_os_str() == DEFAULT_INPUT_FILE);
    if is_default_input {
        return err.with_hint(format!(
            "Place {DEFAULT_INPUT_FILE} in the current directory, or pass a path: pyrad decode <FILE>."
        ));
    }
    err.with_hint("Check the path, or pass - to read the message from stdin.")
}

fn add_io_hint(err: Error) -> Error {
    if err.hint().is_some() {
        return err;
    }
    match err.kind() {
        ErrorKind::Permission => {
            err.with_hint("Permission denied. Check the file permissions or copy it somewhere readable.")
        }
        ErrorKind::Io => err.with_hint("I/O error. Check the path, filesystem, and disk space."),
        _ => err,
    }
}

fn add_internal_hint(err: Error) -> Error {
    if err.kind() != ErrorKind::Internal || err.hint().is_some() {
        return err;
    }
    err.with_hint(
        "Unexpected internal failure. Retry with RUST_BACKTRACE=1 and share command/context if it persists.",
    )
}

fn emit_json(value: Value) {
    let json = if io::stdout().is_terminal() {
        serde_json::to_string_pretty(&value)
            .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string())
    } else {
        serde_json::to_string(&value)
            .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string())
    };
    println!("{json}");
}

fn check_display_label(report: &CheckReport) -> String {
    report
        .path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string())
}

fn emit_check_human(report: &CheckReport) {
    let label = check_display_label(report);
    if !io::stdout().is_terminal() {
        match report.status {
            CheckStatus::Ok => println!("OK: {label}"),
            CheckStatus::Invalid => {
                let issue = report
                    .issue
                    .as_ref()
                    .map(|issue| format!(" issue={}", issue.message))
                    .unwrap_or_default();
                println!("INVALID: {label}{issue}");
            }
        }
        return;
    }

    match report.status {
        CheckStatus::Ok => {
            println!("{label}: ok");
            println!("  lines:  {}", report.lines);
            println!("  rows:   {}", report.rows.unwrap_or(0));
        }
        CheckStatus::Invalid => {
            let detail = report
                .issue
                .as_ref()
                .map(|issue| issue.message.clone())
                .unwrap_or_else(|| "message does not decode".to_string());
            println!("{label}: invalid");
            println!("  lines:  {}", report.lines);
            println!("  detail: {detail}");
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum AnsiColor {
    Red,
    Yellow,
}

fn colorize_label(label: &str, enabled: bool, color: AnsiColor) -> String {
    if !enabled {
        return label.to_string();
    }
    let code = match color {
        AnsiColor::Red => "31",
        AnsiColor::Yellow => "33",
    };
    format!("\u{1b}[{code}m{label}\u{1b}[0m")
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::NotFound => "not found".to_string(),
        ErrorKind::Parse => "malformed message line".to_string(),
        ErrorKind::Validation => "message violates the pyramid contract".to_string(),
        ErrorKind::Permission => "permission denied".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    if let Some(line) = err.line() {
        inner.insert("line".to_string(), json!(line));
    }
    if let Some(position) = err.position() {
        inner.insert("position".to_string(), json!(position));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        error_message(err)
    ));

    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(path) = err.path() {
        lines.push(format!(
            "{} {}",
            colorize_label("path:", use_color, AnsiColor::Yellow),
            path.display()
        ));
    }
    if let Some(line) = err.line() {
        lines.push(format!(
            "{} {line}",
            colorize_label("line:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(position) = err.position() {
        lines.push(format!(
            "{} {position}",
            colorize_label("position:", use_color, AnsiColor::Yellow)
        ));
    }

    let causes = error_causes(err);
    if let Some(cause) = causes.first() {
        lines.push(format!(
            "{} {cause}",
            colorize_label("caused by:", use_color, AnsiColor::Yellow)
        ));
    }

    lines.join("\n")
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}

#[cfg(test)]
mod tests {
    use super::{
        AnsiColor, ColorMode, Error, ErrorKind, MessageSource, add_missing_input_hint,
        colorize_label, error_json, error_text, resolve_source,
    };
    use std::path::PathBuf;

    #[test]
    fn error_text_respects_color_flag() {
        let err = Error::new(ErrorKind::Validation).with_message("duplicate position");
        let plain = error_text(&err, false);
        assert!(plain.starts_with("error: duplicate position"));
        let colored = error_text(&err, true);
        assert!(colored.contains("\u{1b}[31m"));
    }

    #[test]
    fn error_json_includes_line_and_position() {
        let err = Error::new(ErrorKind::Parse)
            .with_message("position token \"x\" is not an integer")
            .with_line(2)
            .with_position(7);
        let value = error_json(&err);
        let inner = value.get("error").expect("error envelope");
        assert_eq!(inner.get("kind").unwrap(), "Parse");
        assert_eq!(inner.get("line").unwrap(), 2);
        assert_eq!(inner.get("position").unwrap(), 7);
    }

    #[test]
    fn colorize_label_is_identity_when_disabled() {
        assert_eq!(colorize_label("error:", false, AnsiColor::Red), "error:");
    }

    #[test]
    fn default_input_hint_mentions_the_default_file() {
        let err = Error::new(ErrorKind::NotFound)
            .with_message("failed to read message file")
            .with_path(super::DEFAULT_INPUT_FILE);
        let hinted = add_missing_input_hint(err);
        assert!(hinted.hint().unwrap_or_default().contains("coding_qual_input.txt"));
    }

    #[test]
    fn dash_resolves_to_stdin() {
        assert!(matches!(
            resolve_source(Some(PathBuf::from("-"))),
            MessageSource::Stdin
        ));
        assert!(matches!(
            resolve_source(None),
            MessageSource::Path(path) if path.as_os_str() == super::DEFAULT_INPUT_FILE
        ));
    }

    #[test]
    fn color_mode_auto_follows_tty() {
        assert!(ColorMode::Always.use_color(false));
        assert!(!ColorMode::Never.use_color(true));
        assert!(ColorMode::Auto.use_color(true));
        assert!(!ColorMode::Auto.use_color(false));
    }
}
