use serde::{Deserialize, Serialize};

use crate::SourceId;

/// A single pre-tokenized input document. The token list is expected to be
/// lower-cased and stripped of stop words and URLs already; the builder never
/// re-tokenizes and only ever looks at the distinct words of a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub source_id: SourceId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub category_id: u32,
    pub words: Vec<String>,
}

impl Source {
    /// Build a source carrying tokens only, leaving text and category blank.
    pub fn new<S: Into<String>>(source_id: SourceId, words: Vec<S>) -> Self {
        Source {
            source_id,
            text: String::new(),
            category_id: 0,
            words: words.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Source;

    #[test]
    fn test_parse_minimal() {
        let raw = r#"{"source_id": 4, "words": ["reactor", "outage"]}"#;
        let parsed: Source = serde_json::from_str(raw).unwrap();

        assert_eq!(4, parsed.source_id);
        assert_eq!(vec!["reactor", "outage"], parsed.words);
        assert_eq!(String::new(), parsed.text);
        assert_eq!(0, parsed.category_id);
    }

    #[test]
    fn test_parse_full() {
        let raw = r#"{"source_id": 9, "text": "Reactor outage extended", "category_id": 2, "words": ["reactor", "outage", "extended"]}"#;
        let parsed: Source = serde_json::from_str(raw).unwrap();

        assert_eq!("Reactor outage extended", parsed.text);
        assert_eq!(2, parsed.category_id);
        assert_eq!(3, parsed.words.len());
    }
}
