//! Error types for linkmap

use std::fmt;

/// Result type alias for linkmap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for list and map operations
///
/// Every error signals caller misuse at the point of violation; nothing is
/// retried internally. A lookup miss on `find` is reported as an
/// end-cursor / `None`, never as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Advanced a cursor past the list's end, or retreated one past its begin
    IndexOutOfBound,

    /// Dereferenced the end cursor, or a cursor whose node no longer exists
    InvalidIterator,

    /// Key has no entry
    KeyNotFound,

    /// Tried to bind a node that is already bound on either side
    AlreadyBound,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IndexOutOfBound => write!(f, "cursor moved out of bounds"),
            Error::InvalidIterator => write!(f, "cursor does not point at a live value"),
            Error::KeyNotFound => write!(f, "key not found"),
            Error::AlreadyBound => write!(f, "node is already bound to a partner"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Error::KeyNotFound.to_string(), "key not found");
        assert_eq!(
            Error::AlreadyBound.to_string(),
            "node is already bound to a partner"
        );
    }
}
