use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use crate::book::Book;

pub const LAST_BOOK_KEY: &str = "lastBook";
pub const COINS_KEY: &str = "coins";
pub const WORD_GROUPS_KEY: &str = "wordGroups";

/// String storage the preferences live in. The browser build backs this with
/// `localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("storage rejected write to {key}: {message}")]
    Write { key: String, message: String },
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
}

/// In-process store, used by tests and when `localStorage` is unavailable.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A word saved into a user-defined group.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GroupWord {
    pub word: String,
    #[serde(default)]
    pub definition: String,
}

pub type WordGroups = BTreeMap<String, Vec<GroupWord>>;

/// Typed view over the persisted client state.
#[derive(Debug)]
pub struct Preferences<S> {
    store: S,
}

impl<S: KeyValueStore> Preferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn last_book(&self) -> Book {
        match self.store.get(LAST_BOOK_KEY) {
            Some(key) => key.parse().unwrap_or_else(|error| {
                log::warn!("ignoring remembered book: {error}");
                Book::DEFAULT
            }),
            None => Book::DEFAULT,
        }
    }

    pub fn set_last_book(&self, book: Book) -> Result<(), PrefsError> {
        self.store.set(LAST_BOOK_KEY, book.key())
    }

    pub fn coins(&self) -> u32 {
        self.store
            .get(COINS_KEY)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn set_coins(&self, coins: u32) -> Result<(), PrefsError> {
        self.store.set(COINS_KEY, &coins.to_string())
    }

    pub fn word_groups(&self) -> WordGroups {
        let Some(raw) = self.store.get(WORD_GROUPS_KEY) else {
            return WordGroups::new();
        };

        serde_json::from_str(&raw).unwrap_or_else(|error| {
            log::warn!("discarding unreadable word groups: {error}");
            WordGroups::new()
        })
    }

    pub fn save_word_groups(&self, groups: &WordGroups) -> Result<(), PrefsError> {
        let encoded = serde_json::to_string(groups).map_err(|source| PrefsError::Encode {
            key: WORD_GROUPS_KEY.to_string(),
            source,
        })?;
        self.store.set(WORD_GROUPS_KEY, &encoded)
    }

    /// Adds `word` to `group`, creating the group if needed. Returns false
    /// when the group already holds that word.
    pub fn add_to_group(&self, group: &str, word: GroupWord) -> Result<bool, PrefsError> {
        let mut groups = self.word_groups();
        let entries = groups.entry(group.to_string()).or_default();

        if entries.iter().any(|entry| entry.word == word.word) {
            return Ok(false);
        }

        entries.push(word);
        self.save_word_groups(&groups)?;
        Ok(true)
    }
}
