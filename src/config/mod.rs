//! Configuration module for uncaptcha.
//!
//! Loads INI candidates, exposes one accessor per required key and validates
//! every value against its class. Import from here for a stable API.
//!
//! Example:
//! use uncaptcha::config::Config;
//!
//! let cfg = Config::new(["/etc/uncaptcha/uncaptcha.ini", "uncaptcha.ini"])?;
//! cfg.validate()?;
//! let coords = cfg.search_coords()?;

pub mod error;
pub mod ini;
pub mod loader;
pub mod models;
pub mod schema;
pub mod validate;

pub use error::ConfigError;
pub use ini::{IniDocument, IniError};
pub use loader::{Config, ConfigSource};
pub use models::{Rgb, ScreenPoint, ValueParseError};
pub use schema::{
    COLOR_SECTION, CURSOR_SECTION, FILE_SECTION, SCHEMA, SchemaEntry, Settings, ValueClass,
};
pub use validate::check_value;

/// Candidate files tried by default; later entries override earlier ones.
pub const DEFAULT_CANDIDATES: &[&str] = &["/etc/uncaptcha/uncaptcha.ini", "uncaptcha.ini"];

/// Generate the JSON Schema for the typed settings (for external tooling).
pub fn generate_schema() -> schemars::Schema {
    schemars::schema_for!(Settings)
}
