//! Purpose: Hold top-level CLI command dispatch for `pyrad`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Command behavior, output envelopes, and exit code semantics stay unchanged.
//! Invariants: Helpers in `main.rs` remain the source of output formatting.

use super::*;

pub(super) fn dispatch_command(command: Command) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "pyrad", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Version => {
            emit_json(json!({
                "name": "pyrad",
                "version": env!("CARGO_PKG_VERSION"),
            }));
            Ok(RunOutcome::ok())
        }
        Command::Decode { file } => {
            let decoded = match resolve_source(file) {
                MessageSource::Stdin => decode_str(&read_stdin()?)?,
                MessageSource::Path(path) => decode_file(&path)?,
            };
            println!("{decoded}");
            Ok(RunOutcome::ok())
        }
        Command::Check { file, json } => {
            let report = match resolve_source(file) {
                MessageSource::Stdin => check_str(&read_stdin()?),
                MessageSource::Path(path) => check_file(&path)?,
            };

            if json {
                emit_json(serde_json::to_value(&report).unwrap_or(Value::Null));
            } else {
                emit_check_human(&report);
            }

            match report.error_kind() {
                Some(kind) => Ok(RunOutcome::with_code(to_exit_code(kind))),
                None => Ok(RunOutcome::ok()),
            }
        }
    }
}
