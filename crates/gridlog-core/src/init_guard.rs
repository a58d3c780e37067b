//! One-time backend initialization
//!
//! The first caller to reach `ensure_initialized` walks the category
//! lineage, decides whether a default console appender is needed and
//! commits the process quiet flag. Every later caller takes a lock-free
//! fast path.

use crate::backend::{Appender, Category, ConsoleAppender, ConsoleTarget};
use crate::config::{parse_bool, Config, ENV_QUIET};
use crate::level::Level;
use crate::policy::{ConsoleInjectionPolicy, Decision};
use crate::schema::OP_ENSURE_INITIALIZED;
use crate::{log_op_end, log_op_start};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Instant;

/// Environment lookup used to read the quiet override.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Process-wide initialization state.
///
/// `quiet` and `root` are written once under `mux` before `initialized` is
/// released; readers that observe `initialized == true` see both.
#[derive(Debug, Default)]
pub struct ProcessLoggingState {
    initialized: AtomicBool,
    quiet: AtomicBool,
    root: OnceLock<Arc<Category>>,
    mux: Mutex<()>,
}

impl ProcessLoggingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Committed quiet flag; `false` until initialization completes.
    pub fn quiet(&self) -> bool {
        self.is_initialized() && self.quiet.load(Ordering::Relaxed)
    }

    /// Root category established by the first successful initialization.
    pub fn established_root(&self) -> Option<Arc<Category>> {
        if self.is_initialized() {
            self.root.get().cloned()
        } else {
            None
        }
    }
}

/// What the lineage walk found.
struct ConsoleScan {
    console_found: bool,
    reserved: Option<Arc<ConsoleAppender>>,
}

impl ConsoleScan {
    fn of(current: &Category) -> Self {
        let mut scan = ConsoleScan {
            console_found: false,
            reserved: None,
        };
        for category in current.lineage() {
            if scan.console_found {
                break;
            }
            for console in category.appenders().iter().filter_map(Appender::as_console) {
                if console.is_reserved() {
                    scan.reserved = Some(console.clone());
                    continue;
                }
                scan.console_found = true;
                break;
            }
        }
        scan
    }
}

pub struct InitGuard {
    state: ProcessLoggingState,
    env: EnvLookup,
    console_target: ConsoleTarget,
}

impl InitGuard {
    pub fn new() -> Self {
        Self {
            state: ProcessLoggingState::new(),
            env: Arc::new(|key| std::env::var(key).ok()),
            console_target: ConsoleTarget::Stdout,
        }
    }

    /// Replace the environment lookup used for `GRIDLOG_QUIET`.
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(lookup);
        self
    }

    /// Where an injected default console appender writes.
    pub fn with_console_target(mut self, target: ConsoleTarget) -> Self {
        self.console_target = target;
        self
    }

    pub fn state(&self) -> &ProcessLoggingState {
        &self.state
    }

    /// Make sure the backend is initialized, at most once per guard.
    ///
    /// `start` is the category the caller wraps when no `backend_init` is
    /// given. `backend_init(true)` performs the real backend setup and is
    /// called by exactly one caller; every other caller gets
    /// `backend_init(false)`, meaning attach without reinitializing.
    /// `level` is applied to the resulting category only if a default
    /// console appender was injected.
    ///
    /// # Errors
    ///
    /// Returns the error of `backend_init` unchanged. State is left
    /// uninitialized, so the next call retries.
    pub fn ensure_initialized<F, E>(
        &self,
        cfg: &Config,
        start: Arc<Category>,
        level: Option<Level>,
        backend_init: Option<F>,
    ) -> Result<Arc<Category>, E>
    where
        F: FnOnce(bool) -> Result<Arc<Category>, E>,
    {
        if self.state.is_initialized() {
            return self.attach(start, backend_init);
        }

        let _lock = self.state.mux.lock().unwrap_or_else(PoisonError::into_inner);
        if self.state.is_initialized() {
            return self.attach(start, backend_init);
        }

        let started = Instant::now();
        log_op_start!(OP_ENSURE_INITIALIZED, category = start.name());

        let current = match backend_init {
            Some(init) => match init(true) {
                Ok(category) => category,
                Err(err) => {
                    tracing::warn!(
                        component = module_path!(),
                        op = OP_ENSURE_INITIALIZED,
                        "backend initialization callback failed; state left uninitialized"
                    );
                    return Err(err);
                }
            },
            None => start,
        };

        let quiet = self.read_quiet(cfg);
        let scan = ConsoleScan::of(&current);
        let decision = ConsoleInjectionPolicy::decide(scan.console_found, quiet, cfg);
        let root = Category::root_of(&current);

        if decision.inject {
            self.inject_console(&root, scan.reserved.as_deref(), &decision);
            if let Some(level) = level {
                current.set_level(level);
            }
        }

        self.state.quiet.store(decision.quiet, Ordering::Relaxed);
        let _ = self.state.root.set(root);
        self.state.initialized.store(true, Ordering::Release);

        log_op_end!(
            OP_ENSURE_INITIALIZED,
            duration_ms = started.elapsed().as_millis() as u64,
            category = current.name(),
            injected = decision.inject,
            quiet = decision.quiet,
            console_found = scan.console_found
        );
        Ok(current)
    }

    fn attach<F, E>(&self, start: Arc<Category>, backend_init: Option<F>) -> Result<Arc<Category>, E>
    where
        F: FnOnce(bool) -> Result<Arc<Category>, E>,
    {
        match backend_init {
            Some(init) => init(false),
            None => Ok(self.state.root.get().cloned().unwrap_or(start)),
        }
    }

    fn read_quiet(&self, cfg: &Config) -> bool {
        (self.env)(ENV_QUIET)
            .and_then(|v| parse_bool(&v))
            .unwrap_or(cfg.quiet_default)
    }

    fn inject_console(&self, root: &Category, reserved: Option<&ConsoleAppender>, decision: &Decision) {
        let ceiling = match reserved {
            Some(err_appender) => {
                // Only an exact ERROR threshold is relaxed.
                if err_appender.threshold() == Level::Error {
                    err_appender.set_threshold(Level::Warn);
                }
                Some(decision.ceiling)
            }
            None => None,
        };
        root.add_appender(Appender::console(ConsoleAppender::default_console(
            self.console_target.clone(),
            ceiling,
        )));
        tracing::debug!(
            component = module_path!(),
            op = OP_ENSURE_INITIALIZED,
            category = root.name(),
            ceiling = ?ceiling,
            "default console appender injected"
        );
    }
}

impl Default for InitGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InitGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitGuard")
            .field("state", &self.state)
            .field("console_target", &self.console_target)
            .finish()
    }
}
