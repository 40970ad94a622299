use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::ConfigError;
use super::ini::{self, DEFAULT_SECTION, IniDocument, Section};

/// Sections merged from every candidate file that parsed.
///
/// Read-only once built. Lookups fall back to `[DEFAULT]` when a section
/// exists but does not define the key itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSource {
    defaults: Section,
    sections: BTreeMap<String, Section>,
}

impl ConfigSource {
    /// Layer a parsed file on top: sections accumulate, later keys win.
    fn absorb(&mut self, doc: IniDocument) {
        self.defaults.extend(doc.defaults);
        for (name, keys) in doc.sections {
            self.sections.entry(name).or_default().extend(keys);
        }
    }

    /// Raw value of `key` in `section`. Key names are case-insensitive.
    pub fn get(&self, section: &str, key: &str) -> Result<&str, ConfigError> {
        let table = if section == DEFAULT_SECTION {
            &self.defaults
        } else {
            self.sections
                .get(section)
                .ok_or_else(|| ConfigError::SectionMissing {
                    section: section.to_string(),
                })?
        };

        let normalized = key.to_lowercase();
        table
            .get(&normalized)
            .or_else(|| self.defaults.get(&normalized))
            .map(String::as_str)
            .ok_or_else(|| ConfigError::KeyMissing {
                section: section.to_string(),
                key: key.to_string(),
            })
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    /// Section names, excluding `DEFAULT`.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }
}

/// The loaded configuration: merged sources plus where they came from.
#[derive(Debug, Clone)]
pub struct Config {
    source: ConfigSource,
    loaded_from: Vec<PathBuf>,
}

impl Config {
    /// Load and merge every readable candidate, in order.
    ///
    /// Missing, unreadable or malformed files are skipped. Fails with
    /// [`ConfigError::NotFound`] only when none of them could be parsed.
    pub fn new<I, P>(candidates: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut merge = Merge::default();
        for candidate in candidates {
            let path = candidate.as_ref();
            merge.absorb(path, std::fs::read_to_string(path));
        }
        merge.finish()
    }

    /// Same as [`Config::new`], reading files with Tokio.
    pub async fn load_async<I, P>(candidates: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut merge = Merge::default();
        for candidate in candidates {
            let path = candidate.as_ref();
            merge.absorb(path, tokio::fs::read_to_string(path).await);
        }
        merge.finish()
    }

    /// Build from in-memory INI text.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let mut source = ConfigSource::default();
        source.absorb(ini::parse(text)?);
        Ok(Self {
            source,
            loaded_from: Vec::new(),
        })
    }

    /// Raw access to the merged sections.
    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    /// Candidates that parsed successfully, in merge order.
    pub fn loaded_from(&self) -> &[PathBuf] {
        &self.loaded_from
    }
}

#[derive(Default)]
struct Merge {
    source: ConfigSource,
    attempted: Vec<PathBuf>,
    loaded: Vec<PathBuf>,
}

impl Merge {
    fn absorb(&mut self, path: &Path, read: io::Result<String>) {
        self.attempted.push(path.to_path_buf());

        let text = match read {
            Ok(text) => text,
            Err(err) => {
                debug!(
                    target: "uncaptcha::config",
                    path = %path.display(),
                    error = %err,
                    "Skipping unreadable config candidate"
                );
                return;
            }
        };

        match ini::parse(&text) {
            Ok(doc) => {
                self.source.absorb(doc);
                self.loaded.push(path.to_path_buf());
                debug!(
                    target: "uncaptcha::config",
                    path = %path.display(),
                    "Loaded config candidate"
                );
            }
            Err(err) => {
                warn!(
                    target: "uncaptcha::config",
                    path = %path.display(),
                    error = %err,
                    "Skipping malformed config candidate"
                );
            }
        }
    }

    fn finish(self) -> Result<Config, ConfigError> {
        if self.loaded.is_empty() {
            return Err(ConfigError::NotFound {
                candidates: self.attempted,
            });
        }
        Ok(Config {
            source: self.source,
            loaded_from: self.loaded,
        })
    }
}
