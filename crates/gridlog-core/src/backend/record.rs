use crate::level::Level;
use chrono::{DateTime, Local};

/// A single log record as handed to appenders.
#[derive(Debug, Clone)]
pub struct Record {
    pub level: Level,
    pub category: String,
    pub message: String,
    pub cause: Option<String>,
    pub thread: String,
    pub timestamp: DateTime<Local>,
}

impl Record {
    pub fn new(level: Level, category: impl Into<String>, message: impl Into<String>) -> Self {
        let current = std::thread::current();
        Self {
            level,
            category: category.into(),
            message: message.into(),
            cause: None,
            thread: current.name().unwrap_or("unnamed").to_string(),
            timestamp: Local::now(),
        }
    }

    pub fn with_cause(mut self, cause: Option<String>) -> Self {
        self.cause = cause;
        self
    }

    /// Render as `[ts][LEVEL][thread][category] message`, with the cause on
    /// its own line.
    pub fn format(&self) -> String {
        let mut line = format!(
            "[{}][{:<5}][{}][{}] {}",
            self.timestamp.format("%Y-%m-%dT%H:%M:%S%.3f"),
            self.level,
            self.thread,
            short_category(&self.category),
            self.message
        );
        if let Some(cause) = &self.cause {
            line.push('\n');
            line.push_str(cause);
        }
        line
    }
}

/// Last dotted segment of a category name.
pub fn short_category(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Render an error with its `source()` chain.
pub fn render_cause(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        out.push_str("\ncaused by: ");
        out.push_str(&inner.to_string());
        source = inner.source();
    }
    out
}
