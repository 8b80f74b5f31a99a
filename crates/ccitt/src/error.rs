use std::{fmt, io};

use thiserror::Error;

/// A feature of the T.4 / T.6 recommendations this crate does not decode
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Feature {
    /// T.4 mixed 1D/2D coding (Modified READ)
    MixedCoding,
    /// Uncompressed mode (T4Options / T6Options bit 1)
    UncompressedMode,
    /// A 2D extension code word (`0000001xxx` / `0000000xxx`)
    Extension,
    /// A TIFF compression scheme other than 2, 3 or 4
    Compression(u16),
    /// A TIFF fill order other than 1 or 2
    FillOrder(u16),
    /// A photometric interpretation other than 0 or 1
    Photometric(u16),
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MixedCoding => write!(f, "mixed 1D/2D coding"),
            Self::UncompressedMode => write!(f, "uncompressed mode"),
            Self::Extension => write!(f, "2D extension code"),
            Self::Compression(c) => write!(f, "compression {}", c),
            Self::FillOrder(v) => write!(f, "fill order {}", v),
            Self::Photometric(v) => write!(f, "photometric interpretation {}", v),
        }
    }
}

/// The kind of a [`FaxError`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// The source was exhausted before a code word or run completed
    #[error("unexpected end of data")]
    UnexpectedEndOfData,
    /// No code word matches, or a required EOL is missing
    #[error("invalid code word")]
    InvalidCodeWord,
    /// The pixels of a row would exceed the row width
    #[error("row overflow")]
    RowOverflow,
    /// The stream uses a feature that is not implemented
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(Feature),
    /// The byte source failed
    #[error("failed to read input")]
    Io,
    /// The destination buffer cannot hold the requested rows
    #[error("output buffer too small ({actual} bytes, {expected} needed)")]
    OutputTooSmall {
        /// Bytes needed for all rows
        expected: usize,
        /// Bytes provided
        actual: usize,
    },
    /// The caller cancelled the decode
    #[error("cancelled")]
    Cancelled,
}

/// An error when decoding a CCITT encoded strip
#[derive(Debug, Error)]
#[error("{kind} (row {row}, bit {bit_offset})")]
pub struct FaxError {
    kind: ErrorKind,
    row: usize,
    bit_offset: u64,
    #[source]
    source: Option<io::Error>,
}

impl FaxError {
    pub(crate) fn new(kind: ErrorKind, bit_offset: u64) -> Self {
        Self {
            kind,
            row: 0,
            bit_offset,
            source: None,
        }
    }

    pub(crate) fn io(source: io::Error, bit_offset: u64) -> Self {
        Self {
            kind: ErrorKind::Io,
            row: 0,
            bit_offset,
            source: Some(source),
        }
    }

    /// Attach the index of the row that was being decoded
    pub(crate) fn at_row(mut self, row: usize) -> Self {
        self.row = row;
        self
    }

    /// What went wrong
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The (zero-based) index of the row that failed
    pub fn row(&self) -> usize {
        self.row
    }

    /// Number of input bits consumed when the error was detected
    pub fn bit_offset(&self) -> u64 {
        self.bit_offset
    }
}

/// Type alias for convenience
pub type FaxResult<T> = Result<T, FaxError>;
