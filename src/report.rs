//! Purpose: Define the reporting seam used by the load lifecycle.
//! Exports: `ReportSink`, `TracingSink`, `MemorySink`, `ReportLine`, `LoadReport`, `report_json`.
//! Role: Receives one line per stored value plus lifecycle notices; renders JSON summaries.
//! Invariants: Entry lines arrive in insertion order, before the cleanup line.
//! Invariants: JSON schema is additive-only once published.
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::core::error::Error;
use crate::core::parse::ParseSummary;

pub trait ReportSink {
    fn entry(&mut self, value: i32);
    fn cleanup(&mut self);
    fn missing_input(&mut self, name: &str);
}

/// Emits report lines as `info` events on the active `tracing` subscriber.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn entry(&mut self, value: i32) {
        tracing::info!(value, "stored item");
    }

    fn cleanup(&mut self) {
        tracing::info!("cleaning up");
    }

    fn missing_input(&mut self, name: &str) {
        tracing::info!(parameter = name, "missing parameter, exiting");
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportLine {
    Entry { value: i32 },
    Cleanup,
    MissingInput { parameter: String },
}

/// Records report lines in memory, optionally forwarding them to another sink.
#[derive(Default)]
pub struct MemorySink {
    lines: Vec<ReportLine>,
    forward: Option<Box<dyn ReportSink>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forwarding(sink: impl ReportSink + 'static) -> Self {
        Self {
            lines: Vec::new(),
            forward: Some(Box::new(sink)),
        }
    }

    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    pub fn entries(&self) -> Vec<i32> {
        self.lines
            .iter()
            .filter_map(|line| match line {
                ReportLine::Entry { value } => Some(*value),
                _ => None,
            })
            .collect()
    }
}

impl ReportSink for MemorySink {
    fn entry(&mut self, value: i32) {
        self.lines.push(ReportLine::Entry { value });
        if let Some(forward) = self.forward.as_mut() {
            forward.entry(value);
        }
    }

    fn cleanup(&mut self) {
        self.lines.push(ReportLine::Cleanup);
        if let Some(forward) = self.forward.as_mut() {
            forward.cleanup();
        }
    }

    fn missing_input(&mut self, name: &str) {
        self.lines.push(ReportLine::MissingInput {
            parameter: name.to_string(),
        });
        if let Some(forward) = self.forward.as_mut() {
            forward.missing_input(name);
        }
    }
}

#[derive(Debug)]
pub struct LoadReport<'a> {
    pub time: String,
    pub lines: &'a [ReportLine],
    pub summary: Option<ParseSummary>,
    pub error: Option<&'a Error>,
}

pub fn report_json(report: &LoadReport<'_>) -> Value {
    let status = if report.error.is_some() { "failed" } else { "ok" };
    let entries: Vec<i32> = report
        .lines
        .iter()
        .filter_map(|line| match line {
            ReportLine::Entry { value } => Some(*value),
            _ => None,
        })
        .collect();

    let mut inner = Map::new();
    inner.insert("time".to_string(), json!(report.time));
    inner.insert("status".to_string(), json!(status));
    inner.insert("entries".to_string(), json!(entries));
    inner.insert("lines".to_string(), json!(report.lines));
    if let Some(summary) = report.summary {
        inner.insert("tokens".to_string(), json!(summary.tokens));
        inner.insert("skipped".to_string(), json!(summary.skipped));
    }
    if let Some(err) = report.error {
        inner.insert("error".to_string(), error_json(err));
    }

    let mut outer = Map::new();
    outer.insert("report".to_string(), Value::Object(inner));
    Value::Object(outer)
}

pub fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert(
        "message".to_string(),
        json!(err.message().unwrap_or("error")),
    );
    if let Some(token) = err.token() {
        inner.insert("token".to_string(), json!(token));
    }
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    Value::Object(inner)
}
