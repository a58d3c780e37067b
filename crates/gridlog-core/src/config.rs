//! Facade configuration
//!
//! Read once at process start and never mutated afterwards. Embedding
//! applications can build it in code, deserialize it from their own
//! configuration sources, or read it from the environment.

use crate::level::Level;
use serde::Deserialize;

/// Environment variable overriding the quiet preference at initialization time
pub const ENV_QUIET: &str = "GRIDLOG_QUIET";
/// Environment variable controlling default console appender injection
pub const ENV_CONSOLE_APPENDER: &str = "GRIDLOG_CONSOLE_APPENDER";
/// Environment variable controlling implicit initialization of an unconfigured backend
pub const ENV_INIT_IF_UNCONFIGURED: &str = "GRIDLOG_INIT_IF_UNCONFIGURED";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub quiet_default: bool,
    pub console_appender_enabled_default: bool,
    pub initialize_if_unconfigured: bool,
    /// Upper level of an injected console appender that coexists with the
    /// reserved error-stream appender
    pub console_ceiling: Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quiet_default: true,
            console_appender_enabled_default: true,
            initialize_if_unconfigured: true,
            console_ceiling: Level::Info,
        }
    }
}

impl Config {
    /// Build a configuration from `GRIDLOG_*` environment variables.
    ///
    /// Absent or unparsable values fall back to the defaults. The quiet flag
    /// is not read here: `GRIDLOG_QUIET` is consulted by the init guard at
    /// initialization time, with `quiet_default` as its fallback.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            console_appender_enabled_default: lookup(ENV_CONSOLE_APPENDER)
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.console_appender_enabled_default),
            initialize_if_unconfigured: lookup(ENV_INIT_IF_UNCONFIGURED)
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.initialize_if_unconfigured),
            ..defaults
        }
    }

    pub fn with_quiet_default(mut self, quiet: bool) -> Self {
        self.quiet_default = quiet;
        self
    }

    pub fn with_console_appender_enabled(mut self, enabled: bool) -> Self {
        self.console_appender_enabled_default = enabled;
        self
    }

    pub fn with_initialize_if_unconfigured(mut self, init: bool) -> Self {
        self.initialize_if_unconfigured = init;
        self
    }

    pub fn with_console_ceiling(mut self, ceiling: Level) -> Self {
        self.console_ceiling = ceiling;
        self
    }
}

/// Parse a boolean flag. Accepts `true`/`1`/`yes`/`on` and their negatives,
/// case-insensitively.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
