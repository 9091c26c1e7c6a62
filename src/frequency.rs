//! Per-symbol frequency analysis.

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::nucleotide::{parse_sequence, Nucleotide};

/// Counts for each of the four nucleotides, zero-filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FrequencyTable {
    counts: [u64; 4],
}

impl FrequencyTable {
    /// Count every base in `seq`.
    pub fn from_sequence(seq: &[Nucleotide]) -> Self {
        let mut counts = [0u64; 4];
        for &n in seq {
            counts[n.index()] += 1;
        }
        let table = Self { counts };
        for (n, count) in table.iter() {
            debug!("{} = {}", n, count);
        }
        table
    }

    /// Parse and count a raw string.
    ///
    /// # Errors
    /// Returns `Error::InvalidSymbol` if `s` contains anything but `A`, `C`,
    /// `G` or `T`; nothing is counted in that case.
    pub fn analyze(s: &str) -> Result<Self> {
        let seq = parse_sequence(s)?;
        Ok(Self::from_sequence(&seq))
    }

    /// Build a table from explicit counts, in `A, C, G, T` order.
    pub fn from_counts(counts: [u64; 4]) -> Self {
        Self { counts }
    }

    /// Count for one base.
    #[inline]
    pub fn count(&self, n: Nucleotide) -> u64 {
        self.counts[n.index()]
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of bases that occur at least once.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// True when every count is zero.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// `(base, count)` pairs in natural order, zero counts included.
    pub fn iter(&self) -> impl Iterator<Item = (Nucleotide, u64)> + '_ {
        Nucleotide::ALL.iter().map(move |&n| (n, self.count(n)))
    }
}
