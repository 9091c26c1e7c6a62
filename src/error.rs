//! Error types for nucleotide coding.

use thiserror::Error;

use crate::nucleotide::Nucleotide;

/// Error variants for model building, encoding and decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The input contains a character outside `{A, C, G, T}`.
    #[error("invalid symbol {symbol:?} at position {position}")]
    InvalidSymbol {
        /// The offending character.
        symbol: char,
        /// Character index of the offending character.
        position: usize,
    },

    /// The operation needs at least one symbol.
    #[error("empty sequence")]
    EmptySequence,

    /// A Huffman bit-string ended in the middle of a codeword.
    #[error("undecodable trailing bits: {0:?}")]
    TrailingBits(String),

    /// A Huffman bit-string contains something other than `0` or `1`.
    #[error("invalid bit {bit:?} at position {position}")]
    InvalidBit {
        /// The offending character.
        bit: char,
        /// Character index of the offending character.
        position: usize,
    },

    /// The arithmetic scalar is not a finite value in `[0, 1)`.
    #[error("arithmetic value {0} is outside [0, 1)")]
    InvalidScalar(f64),

    /// The requested length disagrees with the model it is coded against.
    #[error("length mismatch: model was built for {expected} symbols, got {actual}")]
    LengthMismatch {
        /// Length the model was built for.
        expected: usize,
        /// Length supplied by the caller.
        actual: usize,
    },

    /// The symbol has no codeword in the Huffman code table.
    #[error("no huffman code for {0}")]
    MissingCode(Nucleotide),

    /// The symbol has an empty interval in the arithmetic model.
    #[error("zero probability for {0}")]
    ZeroProbability(Nucleotide),

    /// The frequency table does not sum to the stated sequence length.
    #[error("frequency table sums to {table_total} but sequence length is {total_len}")]
    ModelMismatch {
        /// Sum of all counts in the table.
        table_total: u64,
        /// Length supplied by the caller.
        total_len: usize,
    },

    /// The working interval became too narrow for `f64` to represent.
    #[error("floating-point precision exhausted encoding {length} symbols")]
    PrecisionExhausted {
        /// Length of the sequence that could not be encoded.
        length: usize,
    },
}

impl Error {
    /// Whether this error reports encoded input that cannot be decoded.
    pub fn is_undecodable(&self) -> bool {
        matches!(
            self,
            Error::TrailingBits(_)
                | Error::InvalidBit { .. }
                | Error::InvalidScalar(_)
                | Error::LengthMismatch { .. }
        )
    }
}

/// A specialized Result type for nucleotide coding.
pub type Result<T> = std::result::Result<T, Error>;
