use gridlog_core::backend::{Appender, ConsoleAppender, ConsoleTarget, Record, SharedBuffer};
use gridlog_core::{FileOutput, GridLogError, IdentityAware, InitGuard, LoggingContext, NodeId};
use std::sync::{Arc, Mutex};

/// Create a context that ignores the process environment and keeps any
/// injected console output in memory.
#[allow(dead_code)]
pub fn isolated_context() -> Arc<LoggingContext> {
    Arc::new(LoggingContext::with_guard(
        InitGuard::new()
            .with_env_lookup(|_| None)
            .with_console_target(ConsoleTarget::Buffer(SharedBuffer::new())),
    ))
}

/// Attach an in-memory console appender to the root category.
#[allow(dead_code)]
pub fn attach_buffer(ctx: &LoggingContext, name: &str) -> SharedBuffer {
    let buf = SharedBuffer::new();
    ctx.hierarchy()
        .root()
        .add_appender(Appender::console(ConsoleAppender::new(
            name,
            ConsoleTarget::Buffer(buf.clone()),
        )));
    buf
}

/// Identity-aware output whose activation can be made to fail.
#[allow(dead_code)]
pub struct ScriptedOutput {
    name: String,
    fail_activation: bool,
    identity: Mutex<Option<NodeId>>,
    activations: Mutex<u32>,
}

#[allow(dead_code)]
impl ScriptedOutput {
    pub fn new(name: &str) -> Arc<Self> {
        Self::build(name, false)
    }

    pub fn failing(name: &str) -> Arc<Self> {
        Self::build(name, true)
    }

    fn build(name: &str, fail_activation: bool) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            fail_activation,
            identity: Mutex::new(None),
            activations: Mutex::new(0),
        })
    }

    pub fn activations(&self) -> u32 {
        *self.activations.lock().unwrap()
    }
}

impl FileOutput for ScriptedOutput {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> String {
        match *self.identity.lock().unwrap() {
            Some(id) => format!("{}-{}.log", self.name, id.short()),
            None => format!("{}.log", self.name),
        }
    }

    fn append(&self, _record: &Record) -> gridlog_core::Result<()> {
        Ok(())
    }

    fn identity_aware(&self) -> Option<&dyn IdentityAware> {
        Some(self)
    }
}

impl IdentityAware for ScriptedOutput {
    fn set_identity(&self, id: NodeId) {
        *self.identity.lock().unwrap() = Some(id);
    }

    fn identity(&self) -> Option<NodeId> {
        *self.identity.lock().unwrap()
    }

    fn activate(&self) -> gridlog_core::Result<()> {
        *self.activations.lock().unwrap() += 1;
        if self.fail_activation {
            return Err(GridLogError::Io {
                path: self.path(),
                message: "read-only file system".to_string(),
            });
        }
        Ok(())
    }
}

/// Upcast helper for registry calls.
#[allow(dead_code)]
pub fn as_output<T: FileOutput + 'static>(output: &Arc<T>) -> Arc<dyn FileOutput> {
    output.clone()
}
