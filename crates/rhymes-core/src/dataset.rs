//! Rhyme dataset and lookup engine

use serde::{Deserialize, Serialize};

use crate::{RhymesError, RhymesResult};

/// Prefix used when a query only matched inside other entries' rhyme lists
pub const REVERSE_MATCH_PREFIX: &str = "(found as rhyme for) ";

/// One headword and its known rhymes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RhymeEntry {
    /// Headword
    pub word: String,
    /// Rhymes for the headword, in dataset order
    pub rhymes: Vec<String>,
}

impl RhymeEntry {
    /// Create a new entry
    pub fn new(word: impl Into<String>, rhymes: Vec<String>) -> Self {
        Self {
            word: word.into(),
            rhymes,
        }
    }
}

/// Result of a successful lookup, before formatting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RhymeMatch<'a> {
    /// The query is a headword; carries that entry's rhymes verbatim
    Direct(&'a [String]),
    /// The query only appears as a rhyme; carries the headwords in scan order
    Reverse(Vec<&'a str>),
}

impl RhymeMatch<'_> {
    /// Render the match the way `Dataset::find_rhymes_for` reports it
    pub fn into_rhymes(self) -> Vec<String> {
        match self {
            RhymeMatch::Direct(rhymes) => rhymes.to_vec(),
            RhymeMatch::Reverse(headwords) => {
                vec![format!("{}{}", REVERSE_MATCH_PREFIX, headwords.join(", "))]
            }
        }
    }

    /// Whether the match came from the reverse scan
    pub fn is_reverse(&self) -> bool {
        matches!(self, RhymeMatch::Reverse(_))
    }
}

/// Ordered, read-only collection of rhyme entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    entries: Vec<RhymeEntry>,
}

impl Dataset {
    /// Create a dataset from entries, keeping their order
    pub fn new(entries: Vec<RhymeEntry>) -> Self {
        Self { entries }
    }

    /// Parse a rhyme document shaped `{ "words": [ { "word", "rhymes" } ] }`.
    ///
    /// Bytes that are not JSON fail. A `words` field that is missing or does
    /// not hold a list of entries yields an empty dataset.
    pub fn from_json_slice(bytes: &[u8]) -> RhymesResult<Self> {
        let document: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| RhymesError::DatasetLoad(format!("invalid rhyme document: {}", e)))?;

        let entries = document
            .get("words")
            .cloned()
            .and_then(|words| serde_json::from_value::<Vec<RhymeEntry>>(words).ok())
            .unwrap_or_default();
        Ok(Self { entries })
    }

    /// Entries in dataset order
    pub fn entries(&self) -> &[RhymeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a query against headwords first, then against rhyme lists.
    ///
    /// The query is trimmed and lower-cased; blank queries never match.
    /// Duplicate headwords resolve to the first one in dataset order.
    pub fn lookup(&self, query: &str) -> Option<RhymeMatch<'_>> {
        let needle = normalize(query)?;

        if let Some(entry) = self
            .entries
            .iter()
            .find(|entry| entry.word.to_lowercase() == needle)
        {
            return Some(RhymeMatch::Direct(&entry.rhymes));
        }

        let headwords: Vec<&str> = self
            .entries
            .iter()
            .filter(|entry| entry.rhymes.iter().any(|r| r.to_lowercase() == needle))
            .map(|entry| entry.word.as_str())
            .collect();

        if headwords.is_empty() {
            None
        } else {
            Some(RhymeMatch::Reverse(headwords))
        }
    }

    /// Rhymes for a query, or `None` when nothing matches.
    ///
    /// A reverse match is reported as a single line
    /// `"(found as rhyme for) a, b"`.
    pub fn find_rhymes_for(&self, query: &str) -> Option<Vec<String>> {
        self.lookup(query).map(RhymeMatch::into_rhymes)
    }
}

impl From<Vec<RhymeEntry>> for Dataset {
    fn from(entries: Vec<RhymeEntry>) -> Self {
        Self::new(entries)
    }
}

fn normalize(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Plain-text rendering written to the clipboard
pub fn copy_text(rhymes: &[String]) -> String {
    rhymes.join(", ")
}

/// Message shown for a blank query
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a word to search.";

/// Message shown when a lookup finds nothing
pub fn no_match_message(word: &str) -> String {
    format!(
        "No rhymes found for \"{}\". Try another word or check rhymes.json.",
        word
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(word: &str, rhymes: &[&str]) -> RhymeEntry {
        RhymeEntry::new(word, rhymes.iter().map(|r| r.to_string()).collect())
    }

    fn light_dataset() -> Dataset {
        Dataset::new(vec![entry("light", &["night", "bright", "sight"])])
    }

    #[test]
    fn test_direct_match_returns_rhymes_in_order() {
        let dataset = light_dataset();
        assert_eq!(
            dataset.find_rhymes_for("light"),
            Some(vec![
                "night".to_string(),
                "bright".to_string(),
                "sight".to_string()
            ])
        );
    }

    #[test]
    fn test_reverse_match_is_formatted() {
        let dataset = light_dataset();
        assert_eq!(
            dataset.find_rhymes_for("night"),
            Some(vec!["(found as rhyme for) light".to_string()])
        );
    }

    #[test]
    fn test_unknown_word_returns_none() {
        assert_eq!(light_dataset().find_rhymes_for("zzz"), None);
    }

    #[test]
    fn test_blank_queries_return_none() {
        let dataset = light_dataset();
        assert_eq!(dataset.find_rhymes_for(""), None);
        assert_eq!(dataset.find_rhymes_for("   "), None);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let dataset = Dataset::new(vec![entry("cat", &["hat", "bat"])]);
        assert_eq!(
            dataset.find_rhymes_for("CAT"),
            dataset.find_rhymes_for("cat")
        );
        assert_eq!(
            dataset.find_rhymes_for("  Hat "),
            Some(vec!["(found as rhyme for) cat".to_string()])
        );
    }

    #[test]
    fn test_original_casing_is_preserved() {
        let dataset = Dataset::new(vec![entry("Paris", &["Harris", "Ferris"])]);
        assert_eq!(
            dataset.find_rhymes_for("paris"),
            Some(vec!["Harris".to_string(), "Ferris".to_string()])
        );
        assert_eq!(
            dataset.find_rhymes_for("ferris"),
            Some(vec!["(found as rhyme for) Paris".to_string()])
        );
    }

    #[test]
    fn test_reverse_matches_join_in_scan_order() {
        let dataset = Dataset::new(vec![
            entry("light", &["night", "bright"]),
            entry("fight", &["kite"]),
            entry("bite", &["night", "white"]),
        ]);
        assert_eq!(
            dataset.find_rhymes_for("night"),
            Some(vec!["(found as rhyme for) light, bite".to_string()])
        );
    }

    #[test]
    fn test_first_duplicate_headword_wins() {
        let dataset = Dataset::new(vec![entry("day", &["play"]), entry("DAY", &["stay"])]);
        assert_eq!(
            dataset.find_rhymes_for("day"),
            Some(vec!["play".to_string()])
        );
    }

    #[test]
    fn test_headword_match_takes_precedence_over_reverse() {
        let dataset = Dataset::new(vec![entry("moon", &["june"]), entry("june", &["tune"])]);
        assert_eq!(
            dataset.find_rhymes_for("june"),
            Some(vec!["tune".to_string()])
        );
    }

    #[test]
    fn test_empty_dataset_never_matches() {
        let dataset = Dataset::default();
        assert!(dataset.is_empty());
        assert_eq!(dataset.find_rhymes_for("light"), None);
    }

    #[test]
    fn test_lookup_exposes_match_kind() {
        let dataset = light_dataset();
        assert!(!dataset.lookup("light").unwrap().is_reverse());
        assert!(dataset.lookup("sight").unwrap().is_reverse());
    }

    #[test]
    fn test_parse_document() {
        let json = br#"{"words":[{"word":"cat","rhymes":["hat","bat"]},{"word":"dog","rhymes":["fog"]}]}"#;
        let dataset = Dataset::from_json_slice(json).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.entries()[1].word, "dog");
    }

    #[test]
    fn test_parse_missing_or_malformed_words_is_empty() {
        assert!(Dataset::from_json_slice(b"{}").unwrap().is_empty());
        assert!(Dataset::from_json_slice(br#"{"words":"nope"}"#)
            .unwrap()
            .is_empty());
        assert!(Dataset::from_json_slice(br#"{"words":[{"word":1}]}"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_parse_invalid_json_fails() {
        let err = Dataset::from_json_slice(b"<html>").unwrap_err();
        assert!(matches!(err, RhymesError::DatasetLoad(_)));
    }

    #[test]
    fn test_copy_text_and_messages() {
        let rhymes = vec!["hat".to_string(), "bat".to_string()];
        assert_eq!(copy_text(&rhymes), "hat, bat");
        assert_eq!(
            no_match_message("zzz"),
            "No rhymes found for \"zzz\". Try another word or check rhymes.json."
        );
    }
}
