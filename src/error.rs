use thiserror::Error;

use crate::host::InvalidCapture;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RingError {
    #[error("a layout named \"{0}\" already exists in this frame")]
    NameCollision(String),
    #[error("no layout named \"{0}\" in this frame")]
    NotFound(String),
    #[error("ring offset {offset} is out of range (length {len})")]
    OutOfRange { offset: usize, len: usize },
    #[error("this is the only remaining layout; it cannot be removed or rotated away")]
    RingEmpty,
    #[error(transparent)]
    InvalidCapture(#[from] InvalidCapture),
}
