//! The fixed nucleotide alphabet.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// A single character or byte that is not one of `A`, `C`, `G`, `T`.
///
/// Carries no position; [`parse_sequence`] turns it into
/// `Error::InvalidSymbol` with the character index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid nucleotide {0:?}")]
pub struct InvalidNucleotide(pub char);

/// A DNA base.
///
/// Variant order is alphabetical, so the derived `Ord` is the order used to
/// lay out arithmetic intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Nucleotide {
    /// Adenine
    A,
    /// Cytosine
    C,
    /// Guanine
    G,
    /// Thymine
    T,
}

impl Nucleotide {
    /// All four bases in natural order.
    pub const ALL: [Nucleotide; 4] = [Nucleotide::A, Nucleotide::C, Nucleotide::G, Nucleotide::T];

    /// Position of this base in [`Nucleotide::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The base at `index` in [`Nucleotide::ALL`].
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The letter for this base.
    #[inline]
    pub fn as_char(self) -> char {
        match self {
            Nucleotide::A => 'A',
            Nucleotide::C => 'C',
            Nucleotide::G => 'G',
            Nucleotide::T => 'T',
        }
    }
}

impl fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for Nucleotide {
    type Error = InvalidNucleotide;

    fn try_from(c: char) -> std::result::Result<Self, InvalidNucleotide> {
        match c {
            'A' => Ok(Nucleotide::A),
            'C' => Ok(Nucleotide::C),
            'G' => Ok(Nucleotide::G),
            'T' => Ok(Nucleotide::T),
            other => Err(InvalidNucleotide(other)),
        }
    }
}

impl TryFrom<u8> for Nucleotide {
    type Error = InvalidNucleotide;

    fn try_from(b: u8) -> std::result::Result<Self, InvalidNucleotide> {
        Nucleotide::try_from(b as char)
    }
}

/// Parse a string of `A`, `C`, `G`, `T` into nucleotides.
///
/// # Errors
/// Returns `Error::InvalidSymbol` for the first character outside the
/// alphabet, carrying its character index.
pub fn parse_sequence(s: &str) -> Result<Vec<Nucleotide>> {
    s.chars()
        .enumerate()
        .map(|(position, c)| {
            Nucleotide::try_from(c).map_err(|InvalidNucleotide(symbol)| Error::InvalidSymbol {
                symbol,
                position,
            })
        })
        .collect()
}

/// Render nucleotides back into a string.
pub fn to_string(seq: &[Nucleotide]) -> String {
    seq.iter().map(|n| n.as_char()).collect()
}
