//! Console appenders
//!
//! A console appender accepts records whose level lies between its
//! `threshold` (inclusive lower bound, adjustable at runtime) and its
//! optional `ceiling` (inclusive upper bound; `None` means unlimited).

use super::record::Record;
use super::{read, write};
use crate::errors::{GridLogError, Result};
use crate::level::Level;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

/// Name reserved for the error-stream console appender. It is not counted
/// when detecting whether a console output is already configured.
pub const RESERVED_ERR_NAME: &str = "CONSOLE_ERR";

/// Name given to the injected default console appender.
pub const DEFAULT_CONSOLE_NAME: &str = "CONSOLE";

/// In-memory sink shared between an appender and its reader. Keeps one
/// entry per record, including any cause lines.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<String>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<String>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Everything written so far, one line per output line.
    pub fn contents(&self) -> String {
        self.entries().iter().map(|e| format!("{e}\n")).collect()
    }

    /// The records written so far, one entry each.
    pub fn records(&self) -> Vec<String> {
        self.entries().clone()
    }

    fn push(&self, record: String) {
        self.entries().push(record);
    }
}

/// Where a console appender writes.
#[derive(Debug, Clone)]
pub enum ConsoleTarget {
    Stdout,
    Stderr,
    Buffer(SharedBuffer),
}

#[derive(Debug)]
pub struct ConsoleAppender {
    name: String,
    target: ConsoleTarget,
    threshold: RwLock<Level>,
    ceiling: Option<Level>,
}

impl ConsoleAppender {
    pub fn new(name: impl Into<String>, target: ConsoleTarget) -> Self {
        Self {
            name: name.into(),
            target,
            threshold: RwLock::new(Level::Trace),
            ceiling: None,
        }
    }

    /// The appender injected when nothing else writes to the console.
    pub fn default_console(target: ConsoleTarget, ceiling: Option<Level>) -> Self {
        Self::new(DEFAULT_CONSOLE_NAME, target).with_ceiling(ceiling)
    }

    pub fn with_threshold(self, threshold: Level) -> Self {
        *write(&self.threshold) = threshold;
        self
    }

    pub fn with_ceiling(mut self, ceiling: Option<Level>) -> Self {
        self.ceiling = ceiling;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &ConsoleTarget {
        &self.target
    }

    pub fn is_reserved(&self) -> bool {
        self.name == RESERVED_ERR_NAME
    }

    pub fn threshold(&self) -> Level {
        *read(&self.threshold)
    }

    pub fn set_threshold(&self, threshold: Level) {
        *write(&self.threshold) = threshold;
    }

    pub fn ceiling(&self) -> Option<Level> {
        self.ceiling
    }

    pub fn accepts(&self, level: Level) -> bool {
        level >= self.threshold() && self.ceiling.map_or(true, |max| level <= max)
    }

    pub fn append(&self, record: &Record) -> Result<()> {
        let line = record.format();
        let written = match &self.target {
            ConsoleTarget::Stdout => writeln!(std::io::stdout().lock(), "{line}"),
            ConsoleTarget::Stderr => writeln!(std::io::stderr().lock(), "{line}"),
            ConsoleTarget::Buffer(buf) => {
                buf.push(line);
                Ok(())
            }
        };
        written.map_err(|err| GridLogError::io(self.name.clone(), &err))
    }
}
