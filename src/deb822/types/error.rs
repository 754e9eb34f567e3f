//! Custom error types for the deb822-codec crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum Deb822Error {
    /// An error originating from the underlying line source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line matches none of the grammar's alternatives.
    #[error("Not a header, not a continuation at line {line}")]
    MalformedLine { line: usize },

    /// A continuation line appeared with no preceding field header in the
    /// current stanza (including immediately after a meta header).
    #[error("Continuation line seen before first header at line {line}")]
    ContinuationBeforeHeader { line: usize },

    /// A field header's key is not among the record type's declared keys.
    #[error("Unknown field \"{key}\" at line {line}")]
    UnknownField { key: String, line: usize },

    /// A field's decode function rejected the accumulated text. The line
    /// number points at the stanza's last line, since decoding runs when the
    /// stanza is finalized.
    #[error("Invalid value for field \"{key}\" at line {line}: {message}")]
    InvalidValue {
        key: &'static str,
        message: String,
        line: usize,
    },

    /// A stanza ended without supplying a field that has no default.
    #[error("Missing required field \"{key}\"")]
    MissingField { key: &'static str },

    /// Two field descriptors in one schema declare the same key.
    #[error("Duplicate field key \"{key}\" in schema")]
    DuplicateKey { key: &'static str },

    /// A field descriptor declares both a default value and a default factory.
    #[error("Field \"{key}\" declares both a default value and a default factory")]
    ConflictingDefaults { key: &'static str },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Deb822Error>;
