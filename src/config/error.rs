use std::path::PathBuf;

use thiserror::Error;

use super::ini::IniError;
use super::schema::ValueClass;

/// Every failure the configuration layer can report.
///
/// Variants carry structured fields so callers can branch on the kind and
/// act on the offending section, key or value without parsing messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// None of the candidate files could be read and parsed.
    #[error("no configuration file found (tried: {})", display_paths(.candidates))]
    NotFound { candidates: Vec<PathBuf> },

    /// In-memory INI text failed to parse.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] IniError),

    /// The section is absent from every loaded file.
    #[error("section [{section}] is missing")]
    SectionMissing { section: String },

    /// The section exists but does not define the key.
    #[error("key '{key}' is missing from section [{section}]")]
    KeyMissing { section: String, key: String },

    /// A path-valued key does not name an existing directory.
    #[error("{key} is not an existing directory: {value}")]
    PathInvalid { key: String, value: String },

    /// A value does not fully match the pattern of its class.
    #[error("{key} wrong format (expected {class}): {value}")]
    FormatInvalid {
        key: String,
        value: String,
        class: ValueClass,
    },
}

impl ConfigError {
    /// The schema key this error is about, when there is one.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::KeyMissing { key, .. }
            | Self::PathInvalid { key, .. }
            | Self::FormatInvalid { key, .. } => Some(key.as_str()),
            Self::NotFound { .. } | Self::Parse(_) | Self::SectionMissing { .. } => None,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "<none>".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
