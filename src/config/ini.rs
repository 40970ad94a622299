use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

/// Name of the fallback section whose keys are visible from every other section.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Keys of one section, already lower-cased, mapped to their raw values.
pub type Section = BTreeMap<String, String>;

/// The contents of a single parsed INI file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    /// Keys declared under `[DEFAULT]`.
    pub defaults: Section,
    /// Every other section, by case-sensitive name.
    pub sections: BTreeMap<String, Section>,
}

impl IniDocument {
    fn table_mut(&mut self, name: &str) -> &mut Section {
        if name == DEFAULT_SECTION {
            &mut self.defaults
        } else {
            self.sections.entry(name.to_string()).or_default()
        }
    }
}

/// Syntax errors, reported with the 1-based line they were found on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IniError {
    #[error("line {line}: key/value pair before any [section] header")]
    MissingSectionHeader { line: usize },

    #[error("line {line}: empty section header")]
    EmptySectionName { line: usize },

    #[error("line {line}: expected 'key = value' or 'key: value'")]
    MissingDelimiter { line: usize },

    #[error("line {line}: empty key")]
    EmptyKey { line: usize },

    #[error("line {line}: section [{section}] is defined more than once")]
    DuplicateSection { line: usize, section: String },

    #[error("line {line}: key '{key}' is defined more than once in [{section}]")]
    DuplicateKey {
        line: usize,
        section: String,
        key: String,
    },
}

/// Parse INI text into sections.
///
/// Rules:
/// - `[NAME]` opens a section; names are case-sensitive.
/// - `key = value` and `key: value` are both accepted; the first delimiter wins.
/// - Keys are trimmed and lower-cased, values are trimmed.
/// - Lines starting with `#` or `;` are comments. There are no inline comments.
/// - A line indented deeper than the key line above continues that key's value
///   (joined with `\n`). Blank lines inside a value are kept, trailing ones dropped.
/// - Sections and keys may not repeat within one document.
pub fn parse(text: &str) -> Result<IniDocument, IniError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut doc = IniDocument::default();
    let mut seen_sections = HashSet::new();
    let mut current: Option<String> = None;
    let mut last_key: Option<String> = None;
    // Indentation of the last header or key line; continuations must go deeper.
    let mut indent = 0;

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();

        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }
        if trimmed.is_empty() {
            // Blank lines belong to the value until a shallower line ends it.
            if let (Some(section), Some(key)) = (current.as_deref(), last_key.as_deref()) {
                if let Some(value) = doc.table_mut(section).get_mut(key) {
                    value.push('\n');
                }
            }
            continue;
        }

        let line_indent = raw.len() - raw.trim_start().len();
        if line_indent > indent {
            if let (Some(section), Some(key)) = (current.as_deref(), last_key.as_deref()) {
                if let Some(value) = doc.table_mut(section).get_mut(key) {
                    value.push('\n');
                    value.push_str(trimmed);
                }
                continue;
            }
        }
        indent = line_indent;

        if let Some(inner) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            let name = inner.trim();
            if name.is_empty() {
                return Err(IniError::EmptySectionName { line });
            }
            if !seen_sections.insert(name.to_string()) {
                return Err(IniError::DuplicateSection {
                    line,
                    section: name.to_string(),
                });
            }
            doc.table_mut(name);
            current = Some(name.to_string());
            last_key = None;
            continue;
        }

        let Some(section) = current.as_deref() else {
            return Err(IniError::MissingSectionHeader { line });
        };
        let Some(pos) = trimmed.find(['=', ':']) else {
            return Err(IniError::MissingDelimiter { line });
        };

        let key = trimmed[..pos].trim().to_lowercase();
        if key.is_empty() {
            return Err(IniError::EmptyKey { line });
        }
        let value = trimmed[pos + 1..].trim().to_string();

        let table = doc.table_mut(section);
        if table.contains_key(&key) {
            return Err(IniError::DuplicateKey {
                line,
                section: section.to_string(),
                key,
            });
        }
        table.insert(key.clone(), value);
        last_key = Some(key);
    }

    // Blank lines trailing a value are not part of it.
    let tables = std::iter::once(&mut doc.defaults).chain(doc.sections.values_mut());
    for value in tables.flat_map(|table| table.values_mut()) {
        value.truncate(value.trim_end().len());
    }

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sections_and_keys() {
        let doc = parse(
            "[FILE]\ndownload-location = /tmp\n\n[CURSOR]\nsearch-coords: (1, 2)\n",
        )
        .unwrap();
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections["FILE"]["download-location"], "/tmp");
        assert_eq!(doc.sections["CURSOR"]["search-coords"], "(1, 2)");
    }

    #[test]
    fn hash_inside_value_is_not_a_comment() {
        let doc = parse("# colors\n[COLOR]\n; picked by hand\nprivate-color=#112233\n").unwrap();
        assert_eq!(doc.sections["COLOR"]["private-color"], "#112233");
        assert_eq!(doc.sections["COLOR"].len(), 1);
    }

    #[test]
    fn keys_are_lowercased_and_sections_are_not() {
        let doc = parse("[Color]\nGoogle-Color = #ABCDEF\n").unwrap();
        assert!(doc.sections.contains_key("Color"));
        assert!(!doc.sections.contains_key("COLOR"));
        assert_eq!(doc.sections["Color"]["google-color"], "#ABCDEF");
    }

    #[test]
    fn first_delimiter_splits() {
        let doc = parse("[FILE]\ndownload-location = C:\\Users\\me\n").unwrap();
        assert_eq!(doc.sections["FILE"]["download-location"], "C:\\Users\\me");
    }

    #[test]
    fn deeper_indented_lines_continue_a_value() {
        let doc = parse("[S]\nnote = first\n  second\n\n  third\n\nnext = 1\n").unwrap();
        assert_eq!(doc.sections["S"]["note"], "first\nsecond\n\nthird");
        assert_eq!(doc.sections["S"]["next"], "1");
    }

    #[test]
    fn evenly_indented_keys_are_separate() {
        let text = "[CURSOR]\n    search-coords = (1, 2)\n    audio-coords = (3, 4)\n";
        let doc = parse(text).unwrap();
        assert_eq!(doc.sections["CURSOR"]["search-coords"], "(1, 2)");
        assert_eq!(doc.sections["CURSOR"]["audio-coords"], "(3, 4)");

        let doc = parse("  [A]\n  k = v\n    more\n  j = w\n").unwrap();
        assert_eq!(doc.sections["A"]["k"], "v\nmore");
        assert_eq!(doc.sections["A"]["j"], "w");
    }

    #[test]
    fn trailing_blank_lines_are_dropped() {
        let doc = parse("[A]\nk = v\n\n\n[B]\nj = w\n\n").unwrap();
        assert_eq!(doc.sections["A"]["k"], "v");
        assert_eq!(doc.sections["B"]["j"], "w");
    }

    #[test]
    fn default_section_is_kept_apart() {
        let doc = parse("[DEFAULT]\nshared = 1\n[A]\nown = 2\n").unwrap();
        assert_eq!(doc.defaults["shared"], "1");
        assert!(!doc.sections.contains_key(DEFAULT_SECTION));
        assert_eq!(doc.sections["A"]["own"], "2");
    }

    #[test]
    fn leading_bom_is_ignored() {
        let doc = parse("\u{feff}[FILE]\na = b\n").unwrap();
        assert!(doc.sections.contains_key("FILE"));
    }

    #[test]
    fn syntax_errors_report_their_line() {
        assert_eq!(
            parse("a = b\n"),
            Err(IniError::MissingSectionHeader { line: 1 })
        );
        assert_eq!(
            parse("[A]\njust text\n"),
            Err(IniError::MissingDelimiter { line: 2 })
        );
        assert_eq!(parse("[A]\n= x\n"), Err(IniError::EmptyKey { line: 2 }));
        assert_eq!(parse("[ ]\n"), Err(IniError::EmptySectionName { line: 1 }));
    }

    #[test]
    fn duplicates_are_rejected() {
        assert_eq!(
            parse("[A]\n[A]\n"),
            Err(IniError::DuplicateSection {
                line: 2,
                section: "A".into()
            })
        );
        assert_eq!(
            parse("[A]\nk = 1\nK = 2\n"),
            Err(IniError::DuplicateKey {
                line: 3,
                section: "A".into(),
                key: "k".into()
            })
        );
    }
}
