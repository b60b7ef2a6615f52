use std::fmt;
use std::str::FromStr;

/// One of the predefined word lists the word source is allowed to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Book {
    Primary,
    Junior,
    Senior,
    Cet4,
    Cet6,
    Tofel,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BookError {
    #[error("unknown book key: {0:?}")]
    Unknown(String),
}

impl Book {
    /// Every selectable book, in the order the picker lists them.
    pub const ALL: [Book; 6] = [
        Book::Primary,
        Book::Junior,
        Book::Senior,
        Book::Cet4,
        Book::Cet6,
        Book::Tofel,
    ];

    /// Loaded when no previous choice is remembered.
    pub const DEFAULT: Book = Book::Primary;

    /// Key used on the wire and as the word file stem.
    pub fn key(self) -> &'static str {
        match self {
            Book::Primary => "primary",
            Book::Junior => "junior",
            Book::Senior => "senior",
            Book::Cet4 => "cet4",
            Book::Cet6 => "cet6",
            Book::Tofel => "tofel",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Book::Primary => "小学词汇",
            Book::Junior => "初中词汇",
            Book::Senior => "高中词汇",
            Book::Cet4 => "四级词汇",
            Book::Cet6 => "六级词汇",
            Book::Tofel => "托福词汇",
        }
    }
}

impl FromStr for Book {
    type Err = BookError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        Book::ALL
            .into_iter()
            .find(|book| book.key() == key)
            .ok_or_else(|| BookError::Unknown(key.to_string()))
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
