//! Logging context
//!
//! Bundles the state that is process-wide in production: the category
//! hierarchy, the init guard and the file output registry. Tests build
//! isolated contexts; applications normally use `LoggingContext::global()`.

use crate::backend::{Appender, Category, FileOutput, Hierarchy};
use crate::errors::Result;
use crate::init_guard::InitGuard;
use crate::registry::AppenderRegistry;
use std::sync::{Arc, OnceLock};

static GLOBAL_CONTEXT: OnceLock<Arc<LoggingContext>> = OnceLock::new();

#[derive(Debug, Default)]
pub struct LoggingContext {
    hierarchy: Hierarchy,
    guard: InitGuard,
    registry: AppenderRegistry,
}

impl LoggingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context whose init guard was customized (environment lookup,
    /// console target).
    pub fn with_guard(guard: InitGuard) -> Self {
        Self {
            hierarchy: Hierarchy::new(),
            guard,
            registry: AppenderRegistry::new(),
        }
    }

    /// The shared process-wide context.
    pub fn global() -> Arc<LoggingContext> {
        GLOBAL_CONTEXT
            .get_or_init(|| Arc::new(LoggingContext::new()))
            .clone()
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn guard(&self) -> &InitGuard {
        &self.guard
    }

    pub fn registry(&self) -> &AppenderRegistry {
        &self.registry
    }

    /// Whether the backend already has output configured at its root.
    pub fn is_configured(&self) -> bool {
        self.hierarchy.is_configured()
    }

    /// Attach a file output to `category` and register it for identity
    /// propagation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the registry rejects the handle; the
    /// category is left untouched in that case.
    pub fn attach_file_output(&self, category: &Category, handle: Arc<dyn FileOutput>) -> Result<()> {
        self.registry.add(handle.clone())?;
        category.add_appender(Appender::File(handle));
        Ok(())
    }

    /// Detach a file output from `category` and unregister it.
    pub fn detach_file_output(&self, category: &Category, handle: &Arc<dyn FileOutput>) -> bool {
        let detached = category.remove_appender(&Appender::File(handle.clone()));
        self.registry.remove(handle) || detached
    }
}
