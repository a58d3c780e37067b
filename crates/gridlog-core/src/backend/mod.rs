//! Hierarchical category backend
//!
//! A minimal backend the facade wraps: named categories linked to their
//! parents, each carrying an optional level and a list of appenders.
//! Records emitted on a category are offered to its own appenders and to
//! those of every ancestor up to the root.

pub mod category;
pub mod console;
pub mod file;
pub mod record;

pub use category::{Category, Hierarchy, ROOT_NAME};
pub use console::{
    ConsoleAppender, ConsoleTarget, SharedBuffer, DEFAULT_CONSOLE_NAME, RESERVED_ERR_NAME,
};
pub use file::{node_file_name, FileAppender, FileOutput, IdentityAware};
pub use record::Record;

use crate::errors::Result;
use crate::level::Level;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Pointer identity for shared file outputs, ignoring vtable metadata.
pub(crate) fn same_output(a: &Arc<dyn FileOutput>, b: &Arc<dyn FileOutput>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

/// An output attached to a category.
#[derive(Clone)]
pub enum Appender {
    Console(Arc<ConsoleAppender>),
    File(Arc<dyn FileOutput>),
}

impl Appender {
    pub fn console(appender: ConsoleAppender) -> Self {
        Appender::Console(Arc::new(appender))
    }

    pub fn name(&self) -> &str {
        match self {
            Appender::Console(c) => c.name(),
            Appender::File(f) => f.name(),
        }
    }

    pub fn accepts(&self, level: Level) -> bool {
        match self {
            Appender::Console(c) => c.accepts(level),
            Appender::File(f) => level >= f.threshold(),
        }
    }

    /// # Errors
    ///
    /// Propagates the underlying sink's write failure.
    pub fn append(&self, record: &Record) -> Result<()> {
        match self {
            Appender::Console(c) => c.append(record),
            Appender::File(f) => f.append(record),
        }
    }

    pub fn as_console(&self) -> Option<&Arc<ConsoleAppender>> {
        match self {
            Appender::Console(c) => Some(c),
            Appender::File(_) => None,
        }
    }

    /// Same underlying output (pointer identity).
    pub fn same_as(&self, other: &Appender) -> bool {
        match (self, other) {
            (Appender::Console(a), Appender::Console(b)) => Arc::ptr_eq(a, b),
            (Appender::File(a), Appender::File(b)) => same_output(a, b),
            _ => false,
        }
    }
}

impl std::fmt::Debug for Appender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Appender::Console(c) => f.debug_tuple("Console").field(c).finish(),
            Appender::File(out) => f
                .debug_struct("File")
                .field("name", &out.name())
                .field("path", &out.path())
                .finish(),
        }
    }
}
