use thiserror::Error;

use super::types::PageId;

/// Rejections raised at the engine boundary before anything is written
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ID must be positive, got {0}")]
    IdNotPositive(i64),

    #[error("ID {0} does not fit in a 32-bit signed integer")]
    IdOutOfRange(i64),

    #[error("{column} is {len} bytes, at most {max} allowed")]
    StringTooLong {
        column: &'static str,
        len: usize,
        max: usize,
    },

    #[error("{column} must not contain NUL bytes")]
    InteriorNul { column: &'static str },
}

/// Database error types
#[derive(Error, Debug)]
pub enum DbError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid row: {0}")]
    Validation(#[from] ValidationError),

    #[error("Duplicate key: {0}")]
    DuplicateKey(u32),

    #[error("Table is full")]
    TableFull,

    #[error("Page store is limited to {max_pages} pages")]
    CapacityExceeded { max_pages: usize },

    #[error("Page {0} is outside the page store")]
    PageOutOfBounds(PageId),

    #[error("Table file corrupted: {0}")]
    Corrupted(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Table is closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, DbError>;
