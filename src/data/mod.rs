//! Data sources.
//!
//! Loading real price histories is the job of `io::ingest`; this module holds
//! the deterministic synthetic series used by `gsv demo` and tests.

pub mod sample;

pub use sample::*;
