//! Purpose: `intseq` CLI entry point; the host that supplies `int_str` and drives load/unload.
//! Role: Binary crate root; parses args/env, installs logging, runs commands.
//! Invariants: Report lines go to stderr through `tracing`; stdout carries only command output.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
use std::ffi::OsString;
use std::io::{self, IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand, ValueEnum, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

mod command_dispatch;

use intseq::api::{Error, ErrorKind, error_json, to_exit_code};

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
    let cli = match Cli::try_parse_from(std::env::args_os().collect::<Vec<OsString>>()) {
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
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(clap_error_summary(&err))
                        .with_hint("Try `intseq --help`."),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let color_mode = cli.color;
    init_tracing(cli.log_level.as_deref(), color_mode);

    command_dispatch::dispatch_command(cli.command)
        .map_err(add_input_hint)
        .map_err(add_internal_hint)
        .map_err(|err| (err, color_mode))
}

#[derive(Parser)]
#[command(
    name = "intseq",
    version,
    about = "Load a comma-separated integer list, report it in order, then tear it down",
    long_about = None,
    after_help = r#"EXAMPLES
  $ intseq load --int-str 1,2,3
  $ INTSEQ_INT_STR=0x1F,017,9 intseq load --json
  $ intseq parse 10,,20

Tokens are decimal, 0x-prefixed hex, or 0-prefixed octal. Empty tokens are skipped."#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Log filter directive (overrides RUST_LOG; default: info)"
    )]
    log_level: Option<String>,
    #[arg(
        long,
        global = true,
        default_value = "auto",
        help = "Colorize diagnostics: auto, always, never"
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
    #[command(about = "Run one load/report/teardown cycle, then unload")]
    Load {
        #[arg(
            long,
            env = "INTSEQ_INT_STR",
            help = "Comma-separated list of integers"
        )]
        int_str: Option<String>,
        #[arg(long, help = "Fail appends once this many entries are stored")]
        max_entries: Option<usize>,
        #[arg(long, help = "Emit a JSON report on stdout")]
        json: bool,
    },
    #[command(about = "Parse a list and print the stored values in order")]
    Parse {
        #[arg(help = "Comma-separated list of integers", allow_hyphen_values = true)]
        list: String,
        #[arg(long, help = "Fail appends once this many entries are stored")]
        max_entries: Option<usize>,
        #[arg(long, help = "Emit JSON on stdout")]
        json: bool,
    },
    #[command(about = "Generate shell completions")]
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
    #[command(about = "Print version info")]
    Version,
}

fn init_tracing(directive: Option<&str>, color_mode: ColorMode) {
    let env_filter = match directive {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(color_mode.use_color(io::stderr().is_terminal()))
        .with_writer(io::stderr)
        .try_init();
}

fn add_input_hint(err: Error) -> Error {
    if err.hint().is_some() {
        return err;
    }
    match err.kind() {
        ErrorKind::MissingInput => {
            err.with_hint("Pass --int-str <LIST> or set INTSEQ_INT_STR (an empty list is allowed).")
        }
        ErrorKind::Allocation => {
            err.with_hint("Entry allocation failed. Raise or drop --max-entries, or free memory.")
        }
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

fn render_json(value: &Value, pretty: bool) -> Result<String, Error> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("json encode failed")
            .with_source(err)
    })
}

fn emit_json(value: Value) -> Result<(), Error> {
    let stdout = io::stdout();
    let json = render_json(&value, stdout.is_terminal())?;
    writeln!(stdout.lock(), "{json}").map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message("failed to write stdout")
            .with_source(err)
    })
}

fn emit_version_output() -> Result<(), Error> {
    if io::stdout().is_terminal() {
        println!("intseq {}", env!("CARGO_PKG_VERSION"));
        Ok(())
    } else {
        emit_json(json!({
            "name": "intseq",
            "version": env!("CARGO_PKG_VERSION"),
        }))
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

    let mut outer = Map::new();
    outer.insert("error".to_string(), error_json(err));
    match render_json(&Value::Object(outer), false) {
        Ok(json) => eprintln!("{json}"),
        Err(encode_err) => eprintln!("error: {err} ({encode_err})"),
    }
}

fn error_text(err: &Error, use_color: bool) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} {}",
        colorize_label("error:", use_color, AnsiColor::Red),
        err.message().unwrap_or("error")
    ));
    if let Some(token) = err.token() {
        lines.push(format!(
            "{} {token:?}",
            colorize_label("token:", use_color, AnsiColor::Yellow)
        ));
    }
    if let Some(hint) = err.hint() {
        lines.push(format!(
            "{} {hint}",
            colorize_label("hint:", use_color, AnsiColor::Yellow)
        ));
    }
    lines.join("\n")
}

fn report_time_now() -> Option<String> {
    use time::format_description::well_known::Rfc3339;
    let duration = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
    let ts = time::OffsetDateTime::from_unix_timestamp_nanos(duration.as_nanos() as i128).ok()?;
    ts.format(&Rfc3339).ok()
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
