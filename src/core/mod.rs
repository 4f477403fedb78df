// Core modules: entry storage, list parsing, the load lifecycle, and errors.
pub mod error;
pub mod lifecycle;
pub mod parse;
pub mod store;
