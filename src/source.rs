use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::book::{Book, BookError};

pub const INVALID_BOOK_BODY: &str = r#"{"error":"Invalid book name"}"#;
pub const EMPTY_BOOK_BODY: &str = "[]";

/// Serves word list files from a directory holding one `<book>.json` per
/// allowed book key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordLibrary {
    root: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum WordSourceError {
    #[error("invalid book name")]
    InvalidBook(#[from] BookError),
    #[error("failed to read word file at {path}: {source}")]
    ReadError { path: String, source: io::Error },
}

impl PartialEq for WordSourceError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidBook(left), Self::InvalidBook(right)) => left == right,
            (Self::ReadError { path: left, .. }, Self::ReadError { path: right, .. }) => {
                left == right
            }
            _ => false,
        }
    }
}

impl Eq for WordSourceError {}

impl WordSourceError {
    /// HTTP status the word endpoint answers with for this error.
    pub fn status(&self) -> u16 {
        match self {
            Self::InvalidBook(_) => 400,
            Self::ReadError { .. } => 500,
        }
    }

    pub fn body(&self) -> String {
        match self {
            Self::InvalidBook(_) => INVALID_BOOK_BODY.to_string(),
            Self::ReadError { .. } => {
                serde_json::json!({ "error": "Failed to read word list" }).to_string()
            }
        }
    }
}

impl WordLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, book: Book) -> PathBuf {
        self.root.join(format!("{}.json", book.key()))
    }

    /// Returns the raw JSON body for the book named by `key`.
    ///
    /// The key must be one of the allowed book keys; nothing outside the
    /// library directory is ever read. A book without a file reads as an
    /// empty list.
    pub fn lookup(&self, key: &str) -> Result<String, WordSourceError> {
        let book: Book = key.parse()?;
        self.read(book)
    }

    pub fn read(&self, book: Book) -> Result<String, WordSourceError> {
        let path = self.path_for(book);

        match fs::read_to_string(&path) {
            Ok(body) => Ok(body),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                log::info!("no word file for {book}, serving an empty list");
                Ok(EMPTY_BOOK_BODY.to_string())
            }
            Err(source) => Err(WordSourceError::ReadError {
                path: path.display().to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;

    #[test]
    fn serves_file_contents_verbatim() {
        let root = tempfile::tempdir().expect("temporary directory should be created");
        let body = r#"[{"word":"apple","phonetic":"/ˈæpl/","definition":"n. 苹果"}]"#;
        fs::write(root.path().join("junior.json"), body).expect("word file should be written");

        let library = WordLibrary::new(root.path());

        assert_eq!(library.lookup("junior").expect("junior exists"), body);
        assert_eq!(Deck::parse_json(body).words(), vec!["apple"]);
    }

    #[test]
    fn missing_file_is_an_empty_list() {
        let root = tempfile::tempdir().expect("temporary directory should be created");
        let library = WordLibrary::new(root.path());

        assert_eq!(library.lookup("cet6").expect("allowed key"), EMPTY_BOOK_BODY);
    }

    #[test]
    fn keys_outside_the_allow_list_are_rejected() {
        let root = tempfile::tempdir().expect("temporary directory should be created");
        fs::write(root.path().join("secret.json"), "[]").expect("file should be written");
        let library = WordLibrary::new(root.path());

        let error = library.lookup("secret").expect_err("secret is not a book");

        assert_eq!(error.status(), 400);
        assert_eq!(error.body(), INVALID_BOOK_BODY);
        assert!(library.lookup("../primary").is_err());
    }

    #[test]
    fn unreadable_file_is_a_server_error() {
        let root = tempfile::tempdir().expect("temporary directory should be created");
        // A directory where the file should be cannot be read as text.
        fs::create_dir(root.path().join("senior.json")).expect("directory should be created");
        let library = WordLibrary::new(root.path());

        let error = library.lookup("senior").expect_err("directory is not a word file");

        assert_eq!(error.status(), 500);
        assert!(matches!(error, WordSourceError::ReadError { .. }));
    }
}
