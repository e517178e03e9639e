//! Error types for the metadata core.

use thiserror::Error;

/// Result alias used throughout the metadata core.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading a module or its embedded metadata.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading the module file failed.
    #[error("read module: {0}")]
    Io(#[from] std::io::Error),

    /// A header carried an unexpected magic value.
    #[error("bad {what} magic: expected 0x{expected:X}, got 0x{found:X}")]
    BadMagic {
        /// Which header was being checked.
        what: &'static str,
        /// The value the format requires.
        expected: u32,
        /// The value actually read.
        found: u32,
    },

    /// The data ended before a read could complete.
    #[error("truncated data at offset {offset}, needed {needed} more bytes")]
    Truncated {
        /// Offset where the read was attempted.
        offset: usize,
        /// Number of bytes the read needed.
        needed: usize,
    },

    /// The module is a PE file but carries no CLR runtime header.
    #[error("module has no CLR runtime header (not a .NET assembly)")]
    NoCliHeader,

    /// An RVA did not fall inside any section.
    #[error("RVA 0x{0:X} is not mapped by any section")]
    UnmappedRva(u32),

    /// A required metadata stream is missing.
    #[error("metadata stream not found: {0}")]
    MissingStream(&'static str),

    /// A #Strings heap offset was out of range or not valid UTF-8.
    #[error("invalid string heap offset {0}")]
    BadString(usize),

    /// A #Blob heap offset was out of range or its length malformed.
    #[error("invalid blob heap offset {0}")]
    BadBlob(usize),

    /// A #GUID heap index was out of range.
    #[error("invalid GUID heap index {0}")]
    BadGuid(u32),

    /// A compressed integer did not match any valid encoding.
    #[error("invalid compressed integer at offset {0}")]
    BadCompressed(usize),

    /// A signature blob could not be decoded.
    #[error("malformed signature blob at offset {0}")]
    BadSignature(usize),

    /// The tables stream declared a table this tool does not know.
    #[error("unknown metadata table id 0x{0:02X}")]
    UnknownTable(u8),
}
