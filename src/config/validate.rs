use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use super::error::ConfigError;
use super::loader::Config;
use super::schema::{SCHEMA, SchemaEntry, ValueClass};

/// `(x, y)`: unsigned integers, optional whitespace after the comma, nothing else.
pub(crate) static COORDINATE_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(([0-9]+),\s*([0-9]+)\)$").unwrap());

/// `#` followed by exactly six hex digits, either case.
pub(crate) static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([0-9a-fA-F]{6})$").unwrap());

/// Check a single raw value against the class of its schema entry.
pub fn check_value(entry: &SchemaEntry, value: &str) -> Result<(), ConfigError> {
    let valid = match entry.class {
        ValueClass::Path => Path::new(value).is_dir(),
        ValueClass::CoordinatePair => COORDINATE_PAIR.is_match(value),
        ValueClass::HexColor => HEX_COLOR.is_match(value),
    };
    if valid {
        return Ok(());
    }

    let key = entry.key.to_string();
    let value = value.to_string();
    Err(match entry.class {
        ValueClass::Path => ConfigError::PathInvalid { key, value },
        class => ConfigError::FormatInvalid { key, value, class },
    })
}

impl Config {
    /// Walk the schema in order and stop at the first problem.
    ///
    /// A missing section or key is reported before any format check for that entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for entry in SCHEMA {
            self.check_entry(entry)?;
        }
        debug!(target: "uncaptcha::config", entries = SCHEMA.len(), "Configuration is valid");
        Ok(())
    }

    /// Every problem in schema order, instead of only the first one.
    /// Empty when `validate` would succeed.
    pub fn violations(&self) -> Vec<ConfigError> {
        SCHEMA
            .iter()
            .filter_map(|entry| self.check_entry(entry).err())
            .collect()
    }

    fn check_entry(&self, entry: &SchemaEntry) -> Result<(), ConfigError> {
        let value = self.lookup(entry)?;
        trace!(
            target: "uncaptcha::config",
            section = entry.section,
            key = entry.key,
            %value,
            "Checking value"
        );
        check_value(entry, value)
    }
}
