//! Logging setup.
//!
//! The crate itself only emits through the `log` facade; [`init_logging`] installs
//! `env_logger` for binaries and tests that have no logger of their own.

mod init;

pub use init::{LoggingConfig, init_logging};
