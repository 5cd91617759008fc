//! Error type shared by the parser, action evaluation, and the cache.

use std::io;
use thiserror::Error;

/// Everything that can go wrong while parsing or running a template.
#[derive(Debug, Error)]
pub enum Error {
    /// A filter-chain segment has no usable name.
    #[error("invalid filter: {0}")]
    MalformedFilter(String),

    /// A directive names a key the row does not have.
    #[error("unknown key: {0}")]
    UnknownKey(String),

    /// A directive names a filter the registry does not have.
    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    /// A cache lookup names a template with no source.
    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    /// A filter rejected its input or arguments.
    #[error("filter error: {0}")]
    Filter(String),

    /// Writing streamed output failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Fieldless mirror of [`Error`] for callers that branch on the kind only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedFilter,
    UnknownKey,
    UnknownFilter,
    UnknownTemplate,
    Filter,
    Io,
}

impl Error {
    /// Shorthand for filter implementations: `Err(Error::filter("bad arg"))`.
    pub fn filter(message: impl Into<String>) -> Self {
        Self::Filter(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedFilter(_) => ErrorKind::MalformedFilter,
            Self::UnknownKey(_) => ErrorKind::UnknownKey,
            Self::UnknownFilter(_) => ErrorKind::UnknownFilter,
            Self::UnknownTemplate(_) => ErrorKind::UnknownTemplate,
            Self::Filter(_) => ErrorKind::Filter,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// The offending key, filter, or template name for the "unknown" kinds.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::UnknownKey(n) | Self::UnknownFilter(n) | Self::UnknownTemplate(n) => Some(n),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
