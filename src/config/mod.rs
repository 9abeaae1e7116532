//! Configuration module for Sight.
//!
//! Settings are read once at startup from a TOML file, then overridden by
//! environment variables and command-line flags.

mod settings;

pub use settings::{ApiSettings, GeneralSettings, LimitSettings, RetrySettings, Settings};
