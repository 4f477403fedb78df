//! Purpose: Hold top-level CLI command dispatch for `intseq`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: `load` always unloads after its single load attempt, success or not.
//! Invariants: `parse` prints the values stored before any failure, then reports the failure.

use super::*;

use intseq::api::{
    Lifecycle, LoadReport, MemorySink, Store, StoreOptions, TracingSink, parse_and_store,
    report_json,
};

pub(super) fn dispatch_command(command: Command) -> Result<RunOutcome, Error> {
    match command {
        Command::Load {
            int_str,
            max_entries,
            json,
        } => {
            let mut lifecycle = Lifecycle::with_options(store_options(max_entries));
            let mut sink = MemorySink::forwarding(TracingSink);

            let result = lifecycle.load(int_str.as_deref(), &mut sink);
            lifecycle.unload();

            if json {
                let report = LoadReport {
                    time: report_time_now().unwrap_or_default(),
                    lines: sink.lines(),
                    summary: result.as_ref().ok().map(|outcome| outcome.summary),
                    error: result.as_ref().err(),
                };
                emit_json(report_json(&report))?;
            }
            result.map(|_| RunOutcome::ok())
        }
        Command::Parse {
            list,
            max_entries,
            json,
        } => {
            let mut store = Store::with_options(store_options(max_entries));
            let result = parse_and_store(&list, &mut store);

            if json {
                let mut value = json!({ "values": store.values() });
                if let Ok(summary) = &result {
                    value["tokens"] = json!(summary.tokens);
                    value["skipped"] = json!(summary.skipped);
                }
                emit_json(value)?;
            } else {
                for value in &store {
                    println!("{value}");
                }
            }
            store.clear();
            result.map(|_| RunOutcome::ok())
        }
        Command::Completion { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::aot::generate(shell, &mut cmd, "intseq", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Version => {
            emit_version_output()?;
            Ok(RunOutcome::ok())
        }
    }
}

fn store_options(max_entries: Option<usize>) -> StoreOptions {
    match max_entries {
        Some(max) => StoreOptions::new().with_max_entries(max),
        None => StoreOptions::new(),
    }
}
