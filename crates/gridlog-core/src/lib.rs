//! gridlog Core - process-wide logging facade
//!
//! This crate wraps a small hierarchical category backend and provides:
//! - Exactly-once backend initialization across concurrent callers
//! - Default console injection only when no console output is configured
//! - A registry of file outputs that adopt the node identity once assigned
//! - Level-gated emission with a warning for unchecked verbose calls
//! - Structured diagnostics of the facade's own decisions via `tracing`

pub mod backend;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod errors;
pub mod facade;
pub mod init_guard;
pub mod level;
pub mod policy;
pub mod registry;

pub use gridlog_core_types::schema;
pub use gridlog_core_types::NodeId;

// Re-export commonly used types
pub use backend::{
    Appender, Category, ConsoleAppender, ConsoleTarget, FileAppender, FileOutput, Hierarchy,
    IdentityAware, Record, SharedBuffer,
};
pub use config::Config;
pub use context::LoggingContext;
pub use errors::{ErrorKind, GridLogError, PropagationFailure, Result};
pub use facade::LoggingFacade;
pub use init_guard::{InitGuard, ProcessLoggingState};
pub use level::Level;
pub use policy::{ConsoleInjectionPolicy, Decision};
pub use registry::AppenderRegistry;
