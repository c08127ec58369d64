//! Message sink for progress and summary output.
//!
//! The pipeline never prints directly. Every message goes through a
//! `MessageSink` together with its level, and the `Reporter` drops messages the
//! configured `Verbosity` does not allow. Any `Fn(&str, MessageLevel)` closure is
//! a sink, so callers can route output wherever they want.

use std::fmt;

use crate::domain::{MessageLevel, Verbosity};

pub trait MessageSink {
    fn emit(&self, message: &str, level: MessageLevel);
}

impl<F> MessageSink for F
where
    F: Fn(&str, MessageLevel),
{
    fn emit(&self, message: &str, level: MessageLevel) {
        self(message, level)
    }
}

/// Forwards to the `log` facade: key messages at `info`, detail at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl MessageSink for LogSink {
    fn emit(&self, message: &str, level: MessageLevel) {
        match level {
            MessageLevel::Key => log::info!("{message}"),
            MessageLevel::Detail => log::debug!("{message}"),
        }
    }
}

/// A sink plus the verbosity filter in front of it.
pub struct Reporter {
    verbosity: Verbosity,
    sink: Box<dyn MessageSink>,
}

impl Reporter {
    pub fn new(verbosity: Verbosity, sink: impl MessageSink + 'static) -> Self {
        Self {
            verbosity,
            sink: Box::new(sink),
        }
    }

    pub fn with_log(verbosity: Verbosity) -> Self {
        Self::new(verbosity, LogSink)
    }

    pub fn silent() -> Self {
        Self::new(Verbosity::Silent, LogSink)
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn enabled(&self, level: MessageLevel) -> bool {
        self.verbosity.allows(level)
    }

    pub fn emit(&self, message: &str, level: MessageLevel) {
        if self.enabled(level) {
            self.sink.emit(message, level);
        }
    }

    pub fn key(&self, message: &str) {
        self.emit(message, MessageLevel::Key);
    }

    pub fn detail(&self, message: &str) {
        self.emit(message, MessageLevel::Detail);
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("verbosity", &self.verbosity)
            .finish_non_exhaustive()
    }
}
