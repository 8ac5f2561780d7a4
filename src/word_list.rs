use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

use crate::types::WordId;
use crate::MAX_WORD_LENGTH;

/// A struct representing a word in the word list.
#[derive(Debug, Clone)]
pub struct Word {
    /// The word as it would appear in a grid -- only lowercase characters, no whitespace.
    pub normalized_string: String,

    /// The word as it appears in the user's word list, with arbitrary formatting.
    pub canonical_string: String,

    /// The chars making up `normalized_string`, for constant-time letter indexing.
    pub chars: SmallVec<[char; MAX_WORD_LENGTH]>,
}

impl Word {
    /// The number of grid cells this word occupies.
    #[must_use]
    pub fn length(&self) -> usize {
        self.chars.len()
    }
}

/// Given a canonical word string from a dictionary, turn it into the normalized form used
/// everywhere in the solver.
#[must_use]
pub fn normalize_word(canonical: &str) -> String {
    canonical
        .to_lowercase()
        .nfc() // Normalize Unicode combining forms
        .filter(|c| !c.is_whitespace())
        .collect()
}

#[derive(Debug, Clone)]
pub enum WordListError {
    InvalidPath(String),
    InvalidWord(String),
}

impl fmt::Display for WordListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let string = match self {
            WordListError::InvalidPath(path) => format!("Can’t read file: “{path}”"),
            WordListError::InvalidWord(word) => {
                format!("Word list contains invalid word: “{word}”")
            }
        };
        write!(f, "{string}")
    }
}

/// A struct representing the loaded dictionary. Words are stored in input order, so `WordId`s are
/// stable for a given input; duplicates (after normalization) keep their first occurrence.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    /// All loaded words. `WordId`s used everywhere else are indices into this list.
    pub words: Vec<Word>,

    /// A map from a normalized string to the id of the Word representing it.
    pub word_id_by_string: HashMap<String, WordId>,

    /// Word ids bucketed by length; an index into `ids_by_length` is the length of the words in
    /// the bucket, so `ids_by_length[0]` is always an empty vec.
    pub ids_by_length: Vec<Vec<WordId>>,

    /// The maximum word length provided when loading the list, if any.
    pub max_length: Option<usize>,
}

impl WordList {
    /// Construct a `WordList` from raw entries, omitting any that are longer than `max_length`.
    /// Entries that normalize to the empty string are rejected as invalid.
    pub fn new<S: AsRef<str>>(
        raw_words: &[S],
        max_length: Option<usize>,
    ) -> Result<WordList, WordListError> {
        let mut instance = WordList {
            words: vec![],
            word_id_by_string: HashMap::new(),
            ids_by_length: vec![vec![]],
            max_length,
        };

        for raw_word in raw_words {
            instance.add_word(raw_word.as_ref())?;
        }

        Ok(instance)
    }

    /// Construct a `WordList` from dictionary file contents with one entry per line. Blank lines
    /// are skipped.
    pub fn from_contents(
        contents: &str,
        max_length: Option<usize>,
    ) -> Result<WordList, WordListError> {
        let lines: Vec<&str> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        WordList::new(&lines, max_length)
    }

    /// Construct a `WordList` from a dictionary file on disk.
    pub fn from_dict_file(
        path: impl AsRef<Path>,
        max_length: Option<usize>,
    ) -> Result<WordList, WordListError> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|_| WordListError::InvalidPath(path.as_ref().to_string_lossy().into()))?;

        WordList::from_contents(&contents, max_length)
    }

    /// Add a single entry, skipping it silently if it's a duplicate or longer than `max_length`.
    fn add_word(&mut self, canonical: &str) -> Result<(), WordListError> {
        let normalized = normalize_word(canonical);
        if normalized.is_empty() {
            return Err(WordListError::InvalidWord(canonical.into()));
        }

        let chars: SmallVec<[char; MAX_WORD_LENGTH]> = normalized.chars().collect();
        let length = chars.len();

        if self.max_length.map_or(false, |max| length > max) {
            return Ok(());
        }

        if self.word_id_by_string.contains_key(&normalized) {
            return Ok(());
        }

        while self.ids_by_length.len() < length + 1 {
            self.ids_by_length.push(vec![]);
        }

        let word_id = self.words.len();

        self.words.push(Word {
            normalized_string: normalized.clone(),
            canonical_string: canonical.into(),
            chars,
        });
        self.word_id_by_string.insert(normalized, word_id);
        self.ids_by_length[length].push(word_id);

        Ok(())
    }

    /// Borrow an existing word by id.
    #[must_use]
    pub fn word(&self, word_id: WordId) -> &Word {
        &self.words[word_id]
    }

    /// The ids of every loaded word of the given length, in ascending id order.
    #[must_use]
    pub fn ids_of_length(&self, length: usize) -> &[WordId] {
        self.ids_by_length
            .get(length)
            .map_or(&[], |bucket| bucket.as_slice())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::word_list::{normalize_word, WordList, WordListError};

    #[test]
    fn test_normalizes_case_and_whitespace() {
        assert_eq!(normalize_word("  CaT "), "cat");
        assert_eq!(normalize_word("ice cream"), "icecream");
    }

    #[test]
    fn test_normalizes_combining_forms() {
        // One two-byte char vs. two chars with a combining accent
        assert_eq!(normalize_word("h\u{e9}len"), normalize_word("he\u{301}len"));
    }

    #[test]
    fn test_buckets_words_by_length() {
        let word_list = WordList::new(&["cat", "toad", "dog"], None).unwrap();

        assert_eq!(word_list.words.len(), 3);
        assert_eq!(word_list.ids_of_length(3), &[0, 2]);
        assert_eq!(word_list.ids_of_length(4), &[1]);
        assert_eq!(word_list.ids_of_length(5), &[] as &[usize]);
        assert_eq!(word_list.word_id_by_string.get("toad"), Some(&1));
    }

    #[test]
    fn test_dedups_normalized_entries() {
        let word_list = WordList::new(&["cat", "CAT", "c at"], None).unwrap();

        assert_eq!(word_list.words.len(), 1);
        assert_eq!(word_list.word(0).canonical_string, "cat");
    }

    #[test]
    fn test_omits_words_over_max_length() {
        let word_list = WordList::new(&["cat", "toad"], Some(3)).unwrap();

        assert_eq!(word_list.words.len(), 1);
        assert!(word_list.word_id_by_string.get("toad").is_none());
    }

    #[test]
    fn test_rejects_whitespace_only_entries() {
        let result = WordList::new(&["cat", "   "], None);

        assert!(matches!(result, Err(WordListError::InvalidWord(_))));
    }

    #[test]
    fn test_from_contents_skips_blank_lines() {
        let word_list = WordList::from_contents("cat\n\n  toad  \n", None).unwrap();

        assert_eq!(word_list.words.len(), 2);
        assert_eq!(word_list.word(1).normalized_string, "toad");
    }
}
