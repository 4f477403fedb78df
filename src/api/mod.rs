//! Purpose: Define the public Rust API boundary for intseq.
//! Exports: Core types and operations needed by the CLI host and tests.
//! Role: Public, additive-only surface; hides internal module layout.
//! Invariants: Hosts drive the engine only through `Lifecycle` or `parse_and_store`.

#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::lifecycle::{Lifecycle, LifecycleState, LoadOutcome, PARAMETER_NAME};
pub use crate::core::parse::{DELIMITER, ParseIntFailure, ParseSummary, parse_and_store, parse_int};
pub use crate::core::store::{Iter, Store, StoreOptions};
pub use crate::report::{
    LoadReport, MemorySink, ReportLine, ReportSink, TracingSink, error_json, report_json,
};
