//! Public logger handle
//!
//! A `LoggingFacade` wraps one category of a `LoggingContext`. Creating one
//! goes through the init guard, so the backend is set up exactly once no
//! matter how many facades are built concurrently.
//!
//! ```rust
//! use std::sync::Arc;
//! use gridlog_core::{Config, LoggingContext, LoggingFacade};
//!
//! let ctx = Arc::new(LoggingContext::new());
//! let log = LoggingFacade::new(ctx, Config::default());
//! let disco = log.for_category("grid.discovery");
//! if disco.is_debug_enabled() {
//!     disco.debug("joined topology");
//! }
//! ```

use crate::backend::record::render_cause;
use crate::backend::{read, write, Category, Record};
use crate::config::Config;
use crate::context::LoggingContext;
use crate::errors::{GridLogError, Result};
use crate::level::Level;
use gridlog_core_types::NodeId;
use std::convert::Infallible;
use std::sync::{Arc, RwLock};

type NoBackend = fn(bool) -> std::result::Result<Arc<Category>, Infallible>;

/// Level the root gets when the default constructor injects a console.
const DEFAULT_LEVEL: Level = Level::Info;

pub struct LoggingFacade {
    ctx: Arc<LoggingContext>,
    cfg: Config,
    category: Arc<Category>,
    quiet: bool,
    identity: RwLock<Option<NodeId>>,
}

impl LoggingFacade {
    /// Root logger. Initializes the backend with a default console (and
    /// `Info` level) when `initialize_if_unconfigured` is set and nothing is
    /// configured yet; otherwise uses the existing configuration as is.
    pub fn new(ctx: Arc<LoggingContext>, cfg: Config) -> Self {
        let init = cfg.initialize_if_unconfigured && !ctx.is_configured();
        Self::with_init(ctx, cfg, init)
    }

    /// Root logger over the process-wide context.
    pub fn global(cfg: Config) -> Self {
        Self::new(LoggingContext::global(), cfg)
    }

    /// Root logger with explicit initialization choice. Without
    /// initialization the facade reports itself quiet and leaves the
    /// backend untouched.
    pub fn with_init(ctx: Arc<LoggingContext>, cfg: Config, init: bool) -> Self {
        let root = ctx.hierarchy().root();
        if !init {
            return Self::assemble(ctx, cfg, root, true);
        }

        let category = match ctx.guard().ensure_initialized::<NoBackend, _>(
            &cfg,
            root,
            Some(DEFAULT_LEVEL),
            None,
        ) {
            Ok(category) => category,
            Err(never) => match never {},
        };
        let quiet = ctx.guard().state().quiet();
        Self::assemble(ctx, cfg, category, quiet)
    }

    /// Logger whose backend is set up by `backend_init`.
    ///
    /// `backend_init(true)` runs for the first initializer only; any later
    /// facade gets `backend_init(false)` and should attach to the existing
    /// backend.
    ///
    /// # Errors
    ///
    /// Returns the callback's error unchanged.
    pub fn with_backend<F, E>(ctx: Arc<LoggingContext>, cfg: Config, backend_init: F) -> std::result::Result<Self, E>
    where
        F: FnOnce(bool) -> std::result::Result<Arc<Category>, E>,
    {
        let root = ctx.hierarchy().root();
        let category = ctx
            .guard()
            .ensure_initialized(&cfg, root, None, Some(backend_init))?;
        let quiet = ctx.guard().state().quiet();
        Ok(Self::assemble(ctx, cfg, category, quiet))
    }

    fn assemble(ctx: Arc<LoggingContext>, cfg: Config, category: Arc<Category>, quiet: bool) -> Self {
        Self {
            ctx,
            cfg,
            category,
            quiet,
            identity: RwLock::new(None),
        }
    }

    /// Logger for a dotted category name; an empty name yields the root.
    pub fn for_category(&self, name: &str) -> LoggingFacade {
        let target = self.ctx.hierarchy().category(name);
        match Self::with_backend(self.ctx.clone(), self.cfg.clone(), move |_| {
            Ok::<_, Infallible>(target)
        }) {
            Ok(facade) => facade,
            Err(never) => match never {},
        }
    }

    /// Logger named after a type, with `::` path separators turned into dots.
    pub fn for_type<T: ?Sized>(&self) -> LoggingFacade {
        self.for_category(&std::any::type_name::<T>().replace("::", "."))
    }

    pub fn root_logger(&self) -> LoggingFacade {
        self.for_category("")
    }

    pub fn category(&self) -> &Arc<Category> {
        &self.category
    }

    pub fn context(&self) -> &Arc<LoggingContext> {
        &self.ctx
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn set_level(&self, level: Level) {
        self.category.set_level(level);
    }

    // ========== Emission ==========

    /// Emit at a level callers are expected to check first. An unchecked
    /// call on a disabled level is flagged with a warning and still emitted;
    /// neither record is gated by the category level.
    fn emit_checked(&self, level: Level, msg: &str) {
        let name = self.category.name();
        if !self.category.is_enabled(level) {
            let warning = format!(
                "Logging at {} level without checking if {} level is enabled: {}",
                level.as_str(),
                level.as_str(),
                msg
            );
            self.category.emit(&Record::new(Level::Warn, name, warning));
        }
        self.category.emit(&Record::new(level, name, msg));
    }

    pub fn trace(&self, msg: &str) {
        self.emit_checked(Level::Trace, msg);
    }

    pub fn debug(&self, msg: &str) {
        self.emit_checked(Level::Debug, msg);
    }

    pub fn info(&self, msg: &str) {
        self.emit_checked(Level::Info, msg);
    }

    pub fn warning(&self, msg: &str) {
        self.category.log(Level::Warn, msg, None);
    }

    pub fn warning_with(&self, msg: &str, cause: &dyn std::error::Error) {
        self.category
            .log(Level::Warn, msg, Some(render_cause(cause)));
    }

    pub fn error(&self, msg: &str) {
        self.category.log(Level::Error, msg, None);
    }

    pub fn error_with(&self, msg: &str, cause: &dyn std::error::Error) {
        self.category
            .log(Level::Error, msg, Some(render_cause(cause)));
    }

    pub fn is_trace_enabled(&self) -> bool {
        self.category.is_enabled(Level::Trace)
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.category.is_enabled(Level::Debug)
    }

    pub fn is_info_enabled(&self) -> bool {
        self.category.is_enabled(Level::Info)
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    // ========== File outputs and identity ==========

    /// Path of the first registered file output.
    pub fn file_name(&self) -> Option<String> {
        self.ctx.registry().first_path()
    }

    /// Paths of all registered file outputs.
    pub fn log_files(&self) -> Vec<String> {
        self.ctx.registry().list_paths()
    }

    /// Record the node identity and propagate it to every identity-aware
    /// file output. The identity is recorded even if some outputs fail.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for the nil identity
    /// - `PartialPropagation` listing the outputs that failed
    pub fn set_identity(&self, id: NodeId) -> Result<()> {
        if id.is_nil() {
            return Err(GridLogError::invalid_argument(
                "id",
                "node identity must not be nil",
            ));
        }
        *write(&self.identity) = Some(id);
        self.ctx.registry().propagate_identity(id)
    }

    pub fn identity(&self) -> Option<NodeId> {
        *read(&self.identity)
    }
}

impl std::fmt::Display for LoggingFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LoggingFacade [category={}, quiet={}]",
            self.category.name(),
            self.quiet
        )
    }
}

impl std::fmt::Debug for LoggingFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingFacade")
            .field("category", &self.category.name())
            .field("quiet", &self.quiet)
            .field("identity", &self.identity())
            .finish()
    }
}
