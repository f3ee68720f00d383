//! Item input sources.
//!
//! Items come from a file or from piped stdin, read once. A document whose
//! first non-blank character is `[` is a JSON array of [`ItemSpec`];
//! anything else is one item per non-empty line.

use crate::model::error::InputError;
use crate::model::ItemSpec;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use tracing::debug;

/// Name used for stdin in error messages.
pub const STDIN_NAME: &str = "<stdin>";

/// Where items are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A file path from the command line.
    File(PathBuf),
    /// Piped standard input.
    Stdin,
}

impl InputSource {
    /// Display name for messages.
    pub fn name(&self) -> String {
        match self {
            InputSource::File(path) => path.display().to_string(),
            InputSource::Stdin => STDIN_NAME.to_string(),
        }
    }

    /// Read and parse every item.
    ///
    /// # Errors
    ///
    /// `FileNotFound` for a missing file, `Io` for read failures and
    /// `InvalidJson` for a malformed JSON document.
    pub fn read_items(&self) -> Result<Vec<ItemSpec>, InputError> {
        match self {
            InputSource::File(path) => {
                if !path.exists() {
                    return Err(InputError::FileNotFound { path: path.clone() });
                }
                let content = std::fs::read_to_string(path)?;
                parse_items(&content, &self.name())
            }
            InputSource::Stdin => read_items_from(std::io::stdin().lock(), STDIN_NAME),
        }
    }
}

/// Pick the input source.
///
/// 1. A file path, if given.
/// 2. Stdin, if it is piped.
/// 3. Otherwise `NoInput`.
pub fn detect_input_source(file: Option<PathBuf>) -> Result<InputSource, InputError> {
    match file {
        Some(path) => Ok(InputSource::File(path)),
        None if !std::io::stdin().is_terminal() => Ok(InputSource::Stdin),
        None => Err(InputError::NoInput),
    }
}

/// Detect the source and read its items.
pub fn load_items(file: Option<PathBuf>) -> Result<Vec<ItemSpec>, InputError> {
    let source = detect_input_source(file)?;
    let items = source.read_items()?;
    debug!(source = %source.name(), items = items.len(), "items loaded");
    Ok(items)
}

/// Read a whole document from `reader` and parse it.
pub fn read_items_from(mut reader: impl Read, source_name: &str) -> Result<Vec<ItemSpec>, InputError> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    parse_items(&content, source_name)
}

/// Parse an item document, JSON array or plain lines.
pub fn parse_items(content: &str, source_name: &str) -> Result<Vec<ItemSpec>, InputError> {
    if content.trim_start().starts_with('[') {
        return serde_json::from_str(content).map_err(|e| InputError::InvalidJson {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        });
    }

    Ok(content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(ItemSpec::new)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn plain_lines_become_items() {
        let items = parse_items("Apple\n\nBanana\r\n  \napricot\n", "test").unwrap();

        let texts: Vec<_> = items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["Apple", "Banana", "apricot"]);
        assert!(items.iter().all(|i| i.tag() == "li"));
    }

    #[test]
    fn json_array_carries_optional_fields() {
        let content = r#"
            [
                {"text": "Apple", "classes": ["fruit"]},
                {"text": "Broccoli", "tag": "div", "hidden": true},
                {"text": "apricot"}
            ]
        "#;

        let items = parse_items(content, "items.json").unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].classes, vec!["fruit"]);
        assert_eq!(items[1].tag(), "div");
        assert!(items[1].hidden);
        assert_eq!(items[2], ItemSpec::new("apricot"));
    }

    #[test]
    fn malformed_json_reports_source() {
        let err = parse_items("[{\"text\": }]", "items.json").unwrap_err();

        match err {
            InputError::InvalidJson { source_name, .. } => assert_eq!(source_name, "items.json"),
            other => panic!("Expected InvalidJson, got {:?}", other),
        }
    }

    #[test]
    fn empty_document_has_no_items() {
        assert!(parse_items("", "test").unwrap().is_empty());
        assert!(parse_items("\n\n", "test").unwrap().is_empty());
    }

    #[test]
    fn read_items_from_reader() {
        let items = read_items_from("one\ntwo\n".as_bytes(), STDIN_NAME).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn file_source_reads_items() {
        let path = std::env::temp_dir().join("searchify_source_items.txt");
        fs::write(&path, "Apple\nBanana\n").unwrap();

        let items = load_items(Some(path.clone())).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(items.len(), 2);
    }

    #[test]
    fn missing_file_is_reported() {
        let path = PathBuf::from("/nonexistent/searchify/items.txt");

        match InputSource::File(path.clone()).read_items() {
            Err(InputError::FileNotFound { path: missing }) => assert_eq!(missing, path),
            other => panic!("Expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn explicit_file_wins_over_stdin() {
        let path = PathBuf::from("items.txt");
        assert_eq!(
            detect_input_source(Some(path.clone())).unwrap(),
            InputSource::File(path)
        );
    }

    #[test]
    fn source_names() {
        assert_eq!(InputSource::Stdin.name(), "<stdin>");
        assert_eq!(InputSource::File(PathBuf::from("a.txt")).name(), "a.txt");
    }
}
