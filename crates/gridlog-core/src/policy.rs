//! Console injection policy
//!
//! Decides, from what the category walk found and the configuration,
//! whether a default console appender must be added. Pure and
//! deterministic so it can be tested in isolation.

use crate::config::Config;
use crate::level::Level;

/// Outcome of the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Add a default console appender to the root category.
    pub inject: bool,
    /// Quiet flag to commit. An explicitly configured console output
    /// overrides a requested quiet mode.
    pub quiet: bool,
    /// Requested upper level of the injected appender. The guard drops it
    /// when no reserved error-stream appender coexists.
    pub ceiling: Level,
}

pub struct ConsoleInjectionPolicy;

impl ConsoleInjectionPolicy {
    pub fn decide(console_present: bool, quiet: bool, cfg: &Config) -> Decision {
        let ceiling = cfg.console_ceiling;

        if console_present && quiet {
            return Decision {
                inject: false,
                quiet: false,
                ceiling,
            };
        }

        Decision {
            inject: !console_present && !quiet && cfg.console_appender_enabled_default,
            quiet,
            ceiling,
        }
    }
}
