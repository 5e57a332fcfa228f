//! host-boundary errors

use std::io;

use thiserror::Error;

use crate::flag::Tag;

/// only produced where a value leaves or enters the host; evaluation itself
/// degrades to `Expr::None` instead
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("unknown type name '{name}' at {at}")]
    UnknownType { name: String, at: usize },

    #[error("unexpected {found} at {at}, expected {expected}")]
    Unexpected {
        found: String,
        expected: &'static str,
        at: usize,
    },

    #[error("unexpected end of signature, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("expected a value of type {expected}, but got {actual}")]
    NotA { expected: Tag, actual: Tag },

    #[error("io error ({kind:?}): {message}")]
    Io { kind: io::ErrorKind, message: String },

    #[error("{0}")]
    Message(String),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
