#![allow(clippy::unwrap_used, clippy::expect_used)]

use gridlog_core::diagnostics::{init, Profile};
use gridlog_core::{Config, LoggingContext, LoggingFacade};
use std::sync::Arc;

#[test]
fn test_init_is_idempotent_across_profiles() {
    init(Profile::Development);
    init(Profile::Development);
    init(Profile::Production);
    init(Profile::Test);

    // Diagnostics keep flowing through whichever subscriber won.
    let log = LoggingFacade::new(Arc::new(LoggingContext::new()), Config::default());
    assert!(log.is_quiet());
}
