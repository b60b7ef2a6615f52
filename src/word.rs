use std::fmt;

/// A single vocabulary entry as served by the word source.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WordRecord {
    /// The headword. Unique within a loaded deck.
    pub word: String,
    /// Pronunciation guide such as `/ˈdɪlɪdʒənt/`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    /// Free-form definition text, often bilingual.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

impl WordRecord {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            phonetic: None,
            definition: None,
        }
    }

    pub fn with_phonetic(mut self, phonetic: impl Into<String>) -> Self {
        self.phonetic = Some(phonetic.into());
        self
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }

    pub fn phonetic_text(&self) -> &str {
        self.phonetic.as_deref().unwrap_or("")
    }

    pub fn definition_text(&self) -> &str {
        self.definition.as_deref().unwrap_or("")
    }

    /// Checks a typed answer against the headword, ignoring surrounding
    /// whitespace and letter case.
    pub fn matches_spelling(&self, input: &str) -> bool {
        spelling_matches(&self.word, input)
    }
}

pub(crate) fn spelling_matches(target: &str, input: &str) -> bool {
    input.trim().to_lowercase() == target.trim().to_lowercase()
}

impl fmt::Display for WordRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.phonetic {
            Some(phonetic) if !phonetic.is_empty() => write!(f, "{} {}", self.word, phonetic),
            _ => f.write_str(&self.word),
        }
    }
}
