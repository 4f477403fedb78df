//! Purpose: Ordered integer-collection engine backing the `intseq` CLI and tests.
//! Exports: `api` (stable surface), `core` (store, parser, lifecycle, errors), `report`.
//! Role: Parses comma-delimited integer lists into an owned ordered store and runs
//! the load/report/teardown lifecycle around it.
//! Invariants: The store is an explicit value owned by its lifecycle; no global state.
//! Invariants: Iteration order always equals insertion order.
pub mod api;
pub mod core;
pub mod report;
