//! Logging utilities.
//!
//! Centralizes logger installation. Engine code only talks to the `log`
//! facade; `env_logger` is installed here, once, by the process entry point.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
