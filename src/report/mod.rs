//! Reporting: the message sink used by the pipeline and terminal formatting of results.

pub mod format;
pub mod sink;

pub use format::*;
pub use sink::{LogSink, MessageSink, Reporter};
