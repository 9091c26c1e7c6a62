//! # DNA Sequence Coding
//!
//! *Two entropy coders over the four-letter nucleotide alphabet.*
//!
//! ## Intuition First
//!
//! A DNA string spends eight bits on each of `A`, `C`, `G` and `T`, yet
//! four letters need only two. If some letters are more common than others,
//! we can do better still: give the frequent ones shorter descriptions.
//!
//! This crate does that two ways from the same letter counts:
//! - a **Huffman code** hands every base a whole number of bits, shorter for
//!   common bases;
//! - an **arithmetic code** describes the entire sequence as one number
//!   inside a nested sub-interval of `[0, 1)`, charging each base a
//!   fractional number of bits.
//!
//! ## The Problem
//!
//! Huffman coding is simple and exact but wastes up to a bit per symbol
//! when probabilities are not powers of two. Arithmetic coding gets close to
//! the entropy bound, but its textbook floating-point form loses precision
//! as the interval shrinks. Comparing both on the same input shows the
//! trade-off directly.
//!
//! ## Pipeline
//!
//! ```text
//!                 ┌──────────────┐   ┌────────────────────┐
//!             ┌──▶│ HuffmanTree  │──▶│ HuffmanCodeTable   │──▶ bit-string
//!  sequence ──┤   └──────────────┘   └────────────────────┘
//!  (counts)   │   ┌────────────────────┐
//!             └──▶│ ArithmeticModel    │──────────────────────▶ (scalar, length)
//!                 └────────────────────┘
//! ```
//!
//! All models are plain values built fresh per sequence and handed to the
//! coders explicitly.
//!
//! ## Failure Modes
//!
//! 1. **Foreign characters**: anything outside `A`, `C`, `G`, `T` is
//!    rejected before a model is built.
//! 2. **Empty input**: the Huffman side yields an empty code; the
//!    arithmetic side has no distribution and refuses.
//! 3. **Precision loss**: long, mixed sequences exhaust `f64`; see
//!    [`arithmetic::SAFE_LENGTH`].
//!
//! ## Example
//!
//! ```
//! let models = dnacodec::build_models("AAAACCCGGT").unwrap();
//!
//! let bits = dnacodec::huffman_encode(&models.sequence, &models.huffman_codes).unwrap();
//! assert_eq!(dnacodec::huffman_decode(&bits, &models.huffman_codes).unwrap(), models.sequence);
//!
//! let model = models.arithmetic().unwrap();
//! let code = dnacodec::arithmetic_encode(&models.sequence, model).unwrap();
//! let decoded = dnacodec::arithmetic_decode(code.value, code.length, model).unwrap();
//! assert_eq!(decoded, models.sequence);
//! ```
//!
//! ## References
//!
//! - Huffman, D. (1952). "A Method for the Construction of Minimum-Redundancy Codes."
//! - Witten, I., Neal, R., Cleary, J. (1987). "Arithmetic Coding for Data Compression."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arithmetic;
pub mod error;
pub mod frequency;
pub mod huffman;
pub mod nucleotide;
pub mod stats;

pub use arithmetic::{
    decode as arithmetic_decode, encode as arithmetic_encode, ArithmeticCode, ArithmeticModel,
    SymbolInterval,
};
pub use error::{Error, Result};
pub use frequency::FrequencyTable;
pub use huffman::{
    decode as huffman_decode, encode as huffman_encode, HuffmanCodeTable, HuffmanConfig,
    HuffmanNode, HuffmanTree,
};
pub use nucleotide::{InvalidNucleotide, Nucleotide};
pub use stats::CompressionReport;

/// Everything derived from one input sequence.
#[derive(Debug, Clone)]
pub struct Models {
    /// The parsed input.
    pub sequence: Vec<Nucleotide>,
    /// Base counts.
    pub frequencies: FrequencyTable,
    /// Merge tree behind `huffman_codes`.
    pub huffman_tree: HuffmanTree,
    /// Codewords for the Huffman coder.
    pub huffman_codes: HuffmanCodeTable,
    /// Interval table, absent for an empty sequence.
    pub arithmetic: Option<ArithmeticModel>,
}

impl Models {
    /// The arithmetic model.
    ///
    /// # Errors
    /// Returns `Error::EmptySequence` when the input was empty.
    pub fn arithmetic(&self) -> Result<&ArithmeticModel> {
        self.arithmetic.as_ref().ok_or(Error::EmptySequence)
    }

    /// Size comparison for this sequence.
    pub fn report(&self) -> CompressionReport {
        CompressionReport::new(&self.frequencies, &self.huffman_codes)
    }
}

/// Build both models with the default Huffman configuration.
pub fn build_models(sequence: &str) -> Result<Models> {
    build_models_with(sequence, HuffmanConfig::default())
}

/// Parse `sequence` and build the Huffman and arithmetic models for it.
///
/// # Errors
/// Returns `Error::InvalidSymbol` if `sequence` contains anything but
/// `A`, `C`, `G` or `T`.
pub fn build_models_with(sequence: &str, config: HuffmanConfig) -> Result<Models> {
    let sequence = nucleotide::parse_sequence(sequence)?;
    let frequencies = FrequencyTable::from_sequence(&sequence);

    let huffman_tree = HuffmanTree::with_config(&frequencies, config);
    let huffman_codes = HuffmanCodeTable::from_tree(&huffman_tree);

    let arithmetic = match ArithmeticModel::compute(&frequencies, sequence.len()) {
        Ok(model) => Some(model),
        Err(Error::EmptySequence) => None,
        Err(e) => return Err(e),
    };

    Ok(Models {
        sequence,
        frequencies,
        huffman_tree,
        huffman_codes,
        arithmetic,
    })
}
