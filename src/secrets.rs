//! Secret command table - canned responses for hidden phrases
//!
//! Phrases are matched exactly after normalization: surrounding whitespace
//! is trimmed, the text is NFC-composed and lowercased. The table is built
//! once at startup and shared read-only by every persona.

use std::collections::HashMap;
use std::sync::Arc;

use unicode_normalization::UnicodeNormalization;

use crate::config::SecretCommand;
use crate::error::{Error, Result};

/// Normalize text the same way table keys are stored
pub fn normalize(text: &str) -> String {
    text.trim().nfc().collect::<String>().to_lowercase()
}

#[derive(Debug, Default)]
pub struct SecretCommandTable {
    /// Normalized phrase -> response
    commands: HashMap<String, String>,
}

impl SecretCommandTable {
    /// Build the table, rejecting phrases that collide after normalization
    pub fn new(commands: &[SecretCommand]) -> Result<Arc<Self>> {
        let mut map = HashMap::with_capacity(commands.len());
        for cmd in commands {
            let phrase = normalize(&cmd.phrase);
            if phrase.is_empty() {
                return Err(Error::Config("secret phrase must not be empty".into()));
            }
            if map.insert(phrase, cmd.response.clone()).is_some() {
                return Err(Error::Config(format!(
                    "duplicate secret phrase: {:?}",
                    cmd.phrase
                )));
            }
        }
        Ok(Arc::new(Self { commands: map }))
    }

    /// Response mapped to `raw`, if it is a secret phrase
    pub fn lookup(&self, raw: &str) -> Option<&str> {
        self.commands.get(&normalize(raw)).map(String::as_str)
    }

    pub(crate) fn len(&self) -> usize {
        self.commands.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Arc<SecretCommandTable> {
        SecretCommandTable::new(&[
            SecretCommand {
                phrase: "szívkapu".into(),
                response: "Pulzáló fény aktiválva.".into(),
            },
            SecretCommand {
                phrase: "anya".into(),
                response: "Meleg fény és emlékező hang aktiválva.".into(),
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_exact_lookup() {
        let table = table();
        assert_eq!(table.lookup("szívkapu"), Some("Pulzáló fény aktiválva."));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let table = table();
        assert_eq!(table.lookup("  SZÍVKAPU \n"), Some("Pulzáló fény aktiválva."));
        assert_eq!(table.lookup("Anya"), Some("Meleg fény és emlékező hang aktiválva."));
    }

    #[test]
    fn test_decomposed_accents_match() {
        let table = table();
        // "i" followed by a combining acute accent
        assert_eq!(table.lookup("szi\u{301}vkapu"), Some("Pulzáló fény aktiválva."));
    }

    #[test]
    fn test_unmatched_is_none() {
        let table = table();
        assert_eq!(table.lookup("hello"), None);
        assert_eq!(table.lookup("szívkapu most"), None);
        assert_eq!(table.lookup(""), None);
    }

    #[test]
    fn test_duplicate_phrases_rejected() {
        let result = SecretCommandTable::new(&[
            SecretCommand {
                phrase: "Anya".into(),
                response: "a".into(),
            },
            SecretCommand {
                phrase: " anya ".into(),
                response: "b".into(),
            },
        ]);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_empty_phrase_rejected() {
        let result = SecretCommandTable::new(&[SecretCommand {
            phrase: "   ".into(),
            response: "x".into(),
        }]);
        assert!(result.is_err());
    }
}
