use std::collections::HashSet;

use crate::word::WordRecord;

/// The word list currently on the desk.
///
/// Words are unique within a deck. Duplicate or blank headwords are dropped
/// when the deck is built, so lookups and removals keyed by word are never
/// ambiguous.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    words: Vec<WordRecord>,
}

impl Deck {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<WordRecord>) -> Self {
        let mut seen = HashSet::new();
        let mut words = Vec::with_capacity(records.len());

        for record in records {
            if record.word.trim().is_empty() {
                log::warn!("dropping word record with a blank headword");
                continue;
            }

            if !seen.insert(record.word.clone()) {
                log::warn!("dropping duplicate word {:?}", record.word);
                continue;
            }

            words.push(record);
        }

        Self { words }
    }

    /// Decodes a word source response body.
    ///
    /// Anything other than a JSON array of word records yields an empty deck.
    pub fn parse_json(body: &str) -> Self {
        match serde_json::from_str::<Vec<WordRecord>>(body) {
            Ok(records) => Self::from_records(records),
            Err(error) => {
                log::warn!("word list body is not a list of words: {error}");
                Self::empty()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WordRecord> {
        self.words.iter()
    }

    pub fn words(&self) -> Vec<String> {
        self.words.iter().map(|record| record.word.clone()).collect()
    }

    pub fn get(&self, word: &str) -> Option<&WordRecord> {
        self.words.iter().find(|record| record.word == word)
    }

    pub fn position(&self, word: &str) -> Option<usize> {
        self.words.iter().position(|record| record.word == word)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.position(word).is_some()
    }

    /// Removes the entry for `word`, preserving the order of the rest.
    pub fn remove(&mut self, word: &str) -> Option<WordRecord> {
        let index = self.position(word)?;
        Some(self.words.remove(index))
    }
}

impl From<Vec<WordRecord>> for Deck {
    fn from(records: Vec<WordRecord>) -> Self {
        Self::from_records(records)
    }
}
