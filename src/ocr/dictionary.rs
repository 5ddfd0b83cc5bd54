//! Spelling dictionaries used by the bad-text heuristic.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};

/// Word-membership lookups.
pub trait SpellDictionary: Send {
    /// Check whether `word` is a known word.
    fn contains(&self, word: &str) -> bool;
}

/// Creates dictionaries by language code.
///
/// Every page task asks for its own instance; dictionaries are never shared
/// between concurrently running pages.
pub trait DictionaryProvider: Send + Sync {
    fn load(&self, language: &str) -> Result<Box<dyn SpellDictionary>>;
}

/// Lowercased NFKC form used for lookups (folds ligatures such as "ﬁ").
pub fn normalize_word(word: &str) -> String {
    word.nfkc().flat_map(char::to_lowercase).collect()
}

/// In-memory word set.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| normalize_word(w.as_ref().trim()))
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Parse a word-per-line list. Blank lines and `#` comments are skipped.
    pub fn parse(contents: &str) -> Self {
        Self::new(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#')),
        )
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl SpellDictionary for WordList {
    fn contains(&self, word: &str) -> bool {
        self.words.contains(&normalize_word(word))
    }
}

/// Loads `{dir}/{language}.txt` word lists.
#[derive(Debug, Clone)]
pub struct WordListProvider {
    dir: PathBuf,
}

impl WordListProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DictionaryProvider for WordListProvider {
    fn load(&self, language: &str) -> Result<Box<dyn SpellDictionary>> {
        let valid = !language.is_empty()
            && language
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(Error::Dictionary {
                language: language.to_string(),
                message: "invalid language code".to_string(),
            });
        }

        let path = self.dir.join(format!("{}.txt", language));
        let contents = fs::read_to_string(&path).map_err(|e| Error::Dictionary {
            language: language.to_string(),
            message: format!("{}: {}", path.display(), e),
        })?;
        let list = WordList::parse(&contents);
        log::debug!("Loaded {} words for '{}'", list.len(), language);
        Ok(Box::new(list))
    }
}
