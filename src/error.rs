//! Error types for knucleotide.
//!
//! Every failure in a run is fatal: there is no retry, and the report is only
//! written once decoding and counting have both succeeded.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in knucleotide operations.
#[derive(Debug, Error)]
pub enum KnucError {
    /// Reading the input stream failed.
    #[error("failed to read input: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    /// Failed to open the input file.
    #[error("failed to open input '{path}': {source}")]
    InputOpen {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// The stream ended before the third FASTA header was seen.
    #[error("malformed FASTA: expected at least 3 records, found {found}")]
    MissingRecord { found: usize },

    /// Encountered a byte outside A/C/G/T.
    ///
    /// `position` is the absolute byte offset in the input stream when the
    /// byte comes from the decoder, and the index within the string for
    /// literals and [`Sequence`](crate::sequence::Sequence) constructors.
    #[error("invalid base {} at position {}", display_byte(*.base), .position)]
    InvalidBase { base: u8, position: u64 },

    /// K-mer length is outside the packable range.
    #[error("invalid k-mer length {k}: must be between {min} and {max}")]
    InvalidKmerLength { k: usize, min: u8, max: u8 },

    /// Two frequency tables for different k-mer lengths were combined.
    #[error("cannot merge a table for k = {found} into a table for k = {expected}")]
    KmerLengthMismatch { expected: usize, found: usize },

    /// A configuration value was rejected.
    #[error("invalid configuration: {details}")]
    InvalidConfig { details: String },

    /// The counting worker pool could not be started.
    #[error("failed to build worker pool: {details}")]
    ThreadPool { details: String },

    /// A decode pipeline stage failed outside of normal error reporting.
    #[error("decode pipeline failure: {details}")]
    Pipeline { details: String },

    /// Failed to write output.
    #[error("failed to write output: {source}")]
    WriteError {
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize JSON output.
    #[error("failed to serialize JSON: {source}")]
    JsonError {
        #[source]
        source: serde_json::Error,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, KnucError>;

/// Error for invalid k-mer length.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("k-mer length {k} is out of range: must be between {min} and {max}")]
pub struct KmerLengthError {
    /// The invalid k value that was provided.
    pub k: usize,
    /// Minimum valid k-mer length.
    pub min: u8,
    /// Maximum valid k-mer length.
    pub max: u8,
}

/// Error for invalid DNA base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBaseError {
    /// The invalid byte value.
    pub base: u8,
    /// Position of the invalid byte: a stream offset for decoded input, a
    /// string index for literals.
    pub position: u64,
}

impl std::fmt::Display for InvalidBaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid base {} at position {}",
            display_byte(self.base),
            self.position
        )
    }
}

impl std::error::Error for InvalidBaseError {}

/// Quotes printable bytes and shows everything else as hex.
fn display_byte(base: u8) -> String {
    if base.is_ascii_graphic() || base == b' ' {
        format!("'{}'", char::from(base))
    } else {
        format!("0x{base:02x}")
    }
}

impl From<serde_json::Error> for KnucError {
    fn from(source: serde_json::Error) -> Self {
        Self::JsonError { source }
    }
}

impl From<KmerLengthError> for KnucError {
    fn from(err: KmerLengthError) -> Self {
        Self::InvalidKmerLength {
            k: err.k,
            min: err.min,
            max: err.max,
        }
    }
}

impl From<InvalidBaseError> for KnucError {
    fn from(err: InvalidBaseError) -> Self {
        Self::InvalidBase {
            base: err.base,
            position: err.position,
        }
    }
}
