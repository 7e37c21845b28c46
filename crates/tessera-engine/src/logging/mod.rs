//! Logger setup.
//!
//! Everything in the crate logs through the `log` facade; the binary calls
//! [`init_logging`] once at startup to install `env_logger`.

mod init;

pub use init::{init_logging, LoggingConfig};
