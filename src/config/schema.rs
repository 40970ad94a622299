//! The fixed set of keys the automation tool needs.
//!
//! The `schema!` table below is the single place a key is declared. From it we get:
//! - `SCHEMA`, the ordered list the validator walks,
//! - one accessor per key on [`Config`] returning the raw string,
//! - the typed [`Settings`] snapshot.
//!
//! Adding a key is a one-line change to the table.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::Serialize;

use super::error::ConfigError;
use super::loader::Config;
use super::models::{Rgb, ScreenPoint};

pub const FILE_SECTION: &str = "FILE";
pub const CURSOR_SECTION: &str = "CURSOR";
pub const COLOR_SECTION: &str = "COLOR";

/// Semantic category of a value; selects the check the validator applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValueClass {
    /// An existing directory.
    Path,
    /// `(x, y)` screen coordinates.
    CoordinatePair,
    /// `#RRGGBB`.
    HexColor,
}

impl fmt::Display for ValueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Path => "an existing directory",
            Self::CoordinatePair => "(x, y)",
            Self::HexColor => "#RRGGBB",
        })
    }
}

/// One required `(section, key)` pair and the class its value must belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchemaEntry {
    pub section: &'static str,
    pub key: &'static str,
    pub class: ValueClass,
}

macro_rules! schema {
    (
        $( $section:ident => {
            $( $method:ident = $key:literal : $class:ident($ty:ty) ),+ $(,)?
        } )+
    ) => {
        /// Every required key, in validation order.
        pub const SCHEMA: &[SchemaEntry] = &[
            $( $( SchemaEntry { section: $section, key: $key, class: ValueClass::$class }, )+ )+
        ];

        impl Config {
            $( $(
                #[doc = concat!("Raw value of `", $key, "`, exactly as written in the file.")]
                pub fn $method(&self) -> Result<&str, ConfigError> {
                    self.source().get($section, $key)
                }
            )+ )+
        }

        /// Typed view of a validated configuration, for consumers that want numbers
        /// instead of raw strings.
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
        pub struct Settings {
            $( $(
                #[serde(rename = $key)]
                pub $method: $ty,
            )+ )+
        }

        impl Settings {
            pub(crate) fn resolve(config: &Config) -> Result<Self, ConfigError> {
                Ok(Self {
                    $( $(
                        $method: typed(config.$method()?, $key, ValueClass::$class)?,
                    )+ )+
                })
            }
        }
    };
}

schema! {
    FILE_SECTION => {
        download_location = "download-location": Path(PathBuf),
    }
    CURSOR_SECTION => {
        private_browser_coords = "private-browser-coords": CoordinatePair(ScreenPoint),
        search_coords = "search-coords": CoordinatePair(ScreenPoint),
        google_coords = "google-coords": CoordinatePair(ScreenPoint),
        captcha_coords = "captcha-coords": CoordinatePair(ScreenPoint),
        check_coords = "check-coords": CoordinatePair(ScreenPoint),
        audio_coords = "audio-coords": CoordinatePair(ScreenPoint),
        download_coords = "download-coords": CoordinatePair(ScreenPoint),
        final_coords = "final-coords": CoordinatePair(ScreenPoint),
        verify_coords = "verify-coords": CoordinatePair(ScreenPoint),
        close_coords = "close-coords": CoordinatePair(ScreenPoint),
    }
    COLOR_SECTION => {
        private_color = "private-color": HexColor(Rgb),
        google_color = "google-color": HexColor(Rgb),
        check_color = "check-color": HexColor(Rgb),
    }
}

fn typed<T: FromStr>(raw: &str, key: &str, class: ValueClass) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::FormatInvalid {
        key: key.to_string(),
        value: raw.to_string(),
        class,
    })
}

impl Config {
    /// Raw value for any schema entry.
    pub fn lookup(&self, entry: &SchemaEntry) -> Result<&str, ConfigError> {
        self.source().get(entry.section, entry.key)
    }

    /// Validate, then convert every value into its typed form.
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        self.validate()?;
        Settings::resolve(self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn table_is_ordered_by_section() {
        assert_eq!(SCHEMA.len(), 14);
        assert_eq!(SCHEMA[0].section, FILE_SECTION);
        assert_eq!(SCHEMA[0].key, "download-location");
        assert_eq!(SCHEMA[0].class, ValueClass::Path);

        let cursor: Vec<_> = SCHEMA.iter().filter(|e| e.section == CURSOR_SECTION).collect();
        assert_eq!(cursor.len(), 10);
        assert!(cursor.iter().all(|e| e.class == ValueClass::CoordinatePair));

        let color: Vec<_> = SCHEMA.iter().filter(|e| e.section == COLOR_SECTION).collect();
        assert_eq!(color.len(), 3);
        assert!(color.iter().all(|e| e.class == ValueClass::HexColor));
        assert_eq!(SCHEMA[13].key, "check-color");
    }

    #[test]
    fn keys_are_unique_and_lowercase() {
        let keys: HashSet<_> = SCHEMA.iter().map(|e| e.key).collect();
        assert_eq!(keys.len(), SCHEMA.len());
        assert!(SCHEMA.iter().all(|e| e.key == e.key.to_lowercase()));
    }

    #[test]
    fn accessor_returns_raw_value() {
        let cfg = Config::from_ini_str("[CURSOR]\nsearch-coords = (120,   340)\n").unwrap();
        assert_eq!(cfg.search_coords().unwrap(), "(120,   340)");
        // Idempotent.
        assert_eq!(cfg.search_coords().unwrap(), "(120,   340)");
    }

    #[test]
    fn missing_section_is_reported() {
        let cfg = Config::from_ini_str("[FILE]\ndownload-location = /tmp\n").unwrap();
        assert_eq!(
            cfg.google_color(),
            Err(ConfigError::SectionMissing {
                section: "COLOR".into()
            })
        );
    }

    #[test]
    fn missing_key_is_reported() {
        let cfg = Config::from_ini_str("[CURSOR]\nsearch-coords = (1, 2)\n").unwrap();
        assert_eq!(
            cfg.audio_coords(),
            Err(ConfigError::KeyMissing {
                section: "CURSOR".into(),
                key: "audio-coords".into()
            })
        );
    }

    #[test]
    fn evenly_indented_keys_are_all_reachable() {
        let cfg = Config::from_ini_str(
            "[CURSOR]\n    search-coords = (1, 2)\n    audio-coords = (3, 4)\n",
        )
        .unwrap();
        assert_eq!(cfg.search_coords().unwrap(), "(1, 2)");
        assert_eq!(cfg.audio_coords().unwrap(), "(3, 4)");
    }

    #[test]
    fn lookup_matches_accessors() {
        let cfg = Config::from_ini_str("[COLOR]\ncheck-color = #00ff00\n").unwrap();
        let entry = SCHEMA.iter().find(|e| e.key == "check-color").unwrap();
        assert_eq!(cfg.lookup(entry), cfg.check_color());
    }

    #[test]
    fn settings_are_typed_after_validation() {
        let dir = tempfile::tempdir().unwrap();
        let mut text = format!("[FILE]\ndownload-location = {}\n[CURSOR]\n", dir.path().display());
        for entry in SCHEMA.iter().filter(|e| e.section == CURSOR_SECTION) {
            text.push_str(&format!("{} = (10, 20)\n", entry.key));
        }
        text.push_str("[COLOR]\nprivate-color = #112233\n");
        text.push_str("google-color = #aabbcc\ncheck-color = #000000\n");
        let cfg = Config::from_ini_str(&text).unwrap();

        let settings = cfg.settings().unwrap();
        assert_eq!(settings.download_location, dir.path());
        assert_eq!(settings.close_coords, ScreenPoint { x: 10, y: 20 });
        assert_eq!(settings.private_color, Rgb { r: 0x11, g: 0x22, b: 0x33 });

        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["google-color"], serde_json::json!({ "r": 170, "g": 187, "b": 204 }));
        assert_eq!(json["search-coords"], serde_json::json!({ "x": 10, "y": 20 }));
    }

    #[test]
    fn settings_refuse_invalid_config() {
        let cfg =
            Config::from_ini_str("[FILE]\ndownload-location = /definitely/not/here\n").unwrap();
        assert!(matches!(cfg.settings(), Err(ConfigError::PathInvalid { .. })));
    }

    #[test]
    fn class_display_describes_expected_shape() {
        assert_eq!(ValueClass::CoordinatePair.to_string(), "(x, y)");
        assert_eq!(ValueClass::HexColor.to_string(), "#RRGGBB");
    }
}
