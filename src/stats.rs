//! Compression size comparison between the two coders.

use serde::Serialize;

use crate::frequency::FrequencyTable;
use crate::huffman::HuffmanCodeTable;

/// Bits per input character when stored as text.
pub const RAW_BITS_PER_SYMBOL: u64 = 8;

/// Bits per base in a fixed-width 2-bit packing.
pub const PACKED_BITS_PER_SYMBOL: u64 = 2;

/// Rounding noise tolerated before taking the ceiling of an exact bit count.
const BIT_SLACK: f64 = 1e-9;

/// Sizes of one sequence under each representation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompressionReport {
    /// Number of bases.
    pub symbols: u64,
    /// Size as 8-bit text.
    pub raw_bits: u64,
    /// Size as 2-bit packed bases.
    pub packed_bits: u64,
    /// Shannon entropy of the base distribution, in bits per base.
    pub entropy: f64,
    /// Length of the Huffman bit-string.
    pub huffman_bits: u64,
    /// Bits needed to single out a point in the final arithmetic interval.
    pub arithmetic_bits: u64,
}

impl CompressionReport {
    /// Measure `freqs` under `codes` and under an arithmetic model of the
    /// same distribution.
    ///
    /// Bases without a codeword contribute nothing, which only happens for
    /// bases that do not occur.
    pub fn new(freqs: &FrequencyTable, codes: &HuffmanCodeTable) -> Self {
        let symbols = freqs.total();
        let entropy = entropy(freqs);

        let huffman_bits = freqs
            .iter()
            .map(|(n, count)| count * codes.code(n).map_or(0, |c| c.len() as u64))
            .sum();

        let arithmetic_bits = if symbols == 0 {
            0
        } else {
            (interval_bits(freqs) - BIT_SLACK).ceil().max(0.0) as u64 + 1
        };

        Self {
            symbols,
            raw_bits: symbols * RAW_BITS_PER_SYMBOL,
            packed_bits: symbols * PACKED_BITS_PER_SYMBOL,
            entropy,
            huffman_bits,
            arithmetic_bits,
        }
    }

    /// Average Huffman codeword length.
    pub fn huffman_bits_per_symbol(&self) -> f64 {
        per_symbol(self.huffman_bits, self.symbols)
    }

    /// Average arithmetic cost per base.
    pub fn arithmetic_bits_per_symbol(&self) -> f64 {
        per_symbol(self.arithmetic_bits, self.symbols)
    }

    /// `raw_bits / huffman_bits`.
    pub fn huffman_ratio(&self) -> f64 {
        ratio(self.raw_bits, self.huffman_bits)
    }

    /// `raw_bits / arithmetic_bits`.
    pub fn arithmetic_ratio(&self) -> f64 {
        ratio(self.raw_bits, self.arithmetic_bits)
    }
}

/// Shannon entropy in bits per base.
pub fn entropy(freqs: &FrequencyTable) -> f64 {
    let total = freqs.total();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    freqs
        .iter()
        .filter(|&(_, count)| count > 0)
        .map(|(_, count)| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// `-log2` of the final arithmetic interval width, `sum c * log2(n / c)`.
///
/// Summed per base from integer counts; the product of probabilities would
/// underflow and `n * entropy` can land just above an exact integer.
fn interval_bits(freqs: &FrequencyTable) -> f64 {
    let total = (freqs.total() as f64).log2();
    freqs
        .iter()
        .filter(|&(_, count)| count > 0)
        .map(|(_, count)| count as f64 * (total - (count as f64).log2()))
        .sum()
}

fn per_symbol(bits: u64, symbols: u64) -> f64 {
    if symbols == 0 {
        0.0
    } else {
        bits as f64 / symbols as f64
    }
}

fn ratio(raw: u64, coded: u64) -> f64 {
    if coded == 0 {
        0.0
    } else {
        raw as f64 / coded as f64
    }
}
