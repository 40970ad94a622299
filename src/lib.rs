#![forbid(unsafe_code)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! uncaptcha — configuration loading and validation for a desktop automation tool.
//!
//! The automation itself consumes screen coordinates, colors and a download
//! directory. This crate owns getting those values right:
//! - `config`: INI loading, the schema of required keys, accessors and validation.
//!
//! Use `uncaptcha::prelude::*` to bring commonly used items into scope quickly.

/// Public module: configuration (loader, schema, validator, typed values).
pub mod config;

/// Crate-level constants for consumers that want to inspect package metadata at runtime.
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the crate version (e.g., "0.1.0").
#[inline]
pub const fn version() -> &'static str {
    PKG_VERSION
}

/// Map a level name (trace|debug|info|warn|error) to a tracing level.
pub fn parse_level(name: &str) -> Option<tracing::Level> {
    use tracing::Level;

    match name.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Initialize tracing (logging).
/// - An explicit `level` wins.
/// - Otherwise honors the `RUST_LOG` environment variable if set.
/// - Falls back to `info` level.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init_tracing(level: Option<&str>) {
    let level = level
        .map(str::to_string)
        .or_else(|| std::env::var("RUST_LOG").ok())
        .and_then(|s| parse_level(&s))
        .unwrap_or(tracing::Level::INFO);

    // Ignore the error if the global subscriber was already set.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

/// A convenient set of exports for most consumers.
///
/// Bring this into scope with:
/// `use uncaptcha::prelude::*;`
pub mod prelude {
    pub use crate::config::{
        Config, ConfigError, ConfigSource, Rgb, SCHEMA, ScreenPoint, Settings, ValueClass,
    };
    pub use tracing::{debug, error, info, trace, warn};
}
