//! Floating-point arithmetic coding.
//!
//! The unit interval is split into one sub-interval per base, laid out in
//! natural order with widths equal to the base's probability. Encoding
//! narrows a working `[low, high)` range once per symbol and emits its
//! midpoint; decoding replays the narrowing from that scalar.
//!
//! # Precision
//!
//! The working range shrinks multiplicatively, so `f64` runs out of room
//! after a few dozen symbols of a mixed sequence. A model built from the
//! sequence it codes keeps the final width above `4^-n`, which makes any
//! sequence of up to [`SAFE_LENGTH`] symbols safe. Models built from other
//! sequences carry no such bound, so every scalar is decoded once after
//! encoding and rejected with `Error::PrecisionExhausted` when it falls
//! outside `[0, 1)` or would not decode back.

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::nucleotide::Nucleotide;

/// Longest sequence guaranteed to round-trip through the `f64` coder.
pub const SAFE_LENGTH: usize = 20;

/// Probability and `[low, high)` bounds for one base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SymbolInterval {
    /// The base.
    pub symbol: Nucleotide,
    /// `count / total`.
    pub probability: f64,
    /// Inclusive lower bound.
    pub low: f64,
    /// Exclusive upper bound.
    pub high: f64,
}

impl SymbolInterval {
    /// Whether `value` falls in `[low, high)`.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value < self.high
    }

    /// True for bases that never occur.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.high <= self.low
    }
}

/// Interval table for the four bases.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArithmeticModel {
    intervals: [SymbolInterval; 4],
    sequence_len: usize,
}

impl ArithmeticModel {
    /// Partition `[0, 1)` according to `freqs`.
    ///
    /// Bounds come from the running cumulative count, so neighbouring
    /// intervals share bit-identical bounds and the last upper bound is
    /// exactly `1.0`.
    ///
    /// # Errors
    /// Returns `Error::EmptySequence` if `total_len` is 0 and
    /// `Error::ModelMismatch` if the table does not sum to `total_len`.
    pub fn compute(freqs: &FrequencyTable, total_len: usize) -> Result<Self> {
        if total_len == 0 {
            return Err(Error::EmptySequence);
        }
        if freqs.total() != total_len as u64 {
            return Err(Error::ModelMismatch {
                table_total: freqs.total(),
                total_len,
            });
        }

        let total = total_len as f64;
        let mut cumulative = 0u64;
        let intervals = Nucleotide::ALL.map(|symbol| {
            let count = freqs.count(symbol);
            let low = cumulative as f64 / total;
            cumulative += count;
            let high = cumulative as f64 / total;
            SymbolInterval {
                symbol,
                probability: count as f64 / total,
                low,
                high,
            }
        });

        for iv in &intervals {
            debug!(
                "{} = {:.3} interval [{:.3}, {:.3})",
                iv.symbol, iv.probability, iv.low, iv.high
            );
        }

        Ok(Self {
            intervals,
            sequence_len: total_len,
        })
    }

    /// Interval for one base.
    #[inline]
    pub fn interval(&self, symbol: Nucleotide) -> &SymbolInterval {
        &self.intervals[symbol.index()]
    }

    /// All four intervals in natural order, empty ones included.
    pub fn iter(&self) -> impl Iterator<Item = &SymbolInterval> + '_ {
        self.intervals.iter()
    }

    /// Length of the sequence this model was built for.
    pub fn sequence_len(&self) -> usize {
        self.sequence_len
    }

    /// The interval containing `value`.
    ///
    /// A `value` at or above `1.0` (which rounding can produce) resolves to
    /// the last non-empty interval; one below `0.0` to the first.
    pub fn symbol_at(&self, value: f64) -> Option<&SymbolInterval> {
        self.intervals
            .iter()
            .find(|iv| iv.contains(value))
            .or_else(|| {
                let mut occupied = self.intervals.iter().filter(|iv| !iv.is_empty());
                if value >= 1.0 {
                    occupied.last()
                } else if value < 0.0 {
                    occupied.next()
                } else {
                    None
                }
            })
    }
}

/// Scalar and length produced by [`encode`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArithmeticCode {
    /// Midpoint of the final range.
    pub value: f64,
    /// Number of symbols encoded.
    pub length: usize,
}

impl ArithmeticCode {
    /// Decode against `model`.
    pub fn decode(&self, model: &ArithmeticModel) -> Result<Vec<Nucleotide>> {
        decode(self.value, self.length, model)
    }
}

#[inline]
fn narrow(low: f64, high: f64, iv: &SymbolInterval) -> (f64, f64) {
    let range = high - low;
    (low + range * iv.low, low + range * iv.high)
}

/// Encode `seq` as a single scalar in `[0, 1)`.
///
/// # Errors
/// - `Error::EmptySequence` for an empty input.
/// - `Error::LengthMismatch` if `model` was built for another length.
/// - `Error::ZeroProbability` for a base with an empty interval.
/// - `Error::PrecisionExhausted` if `f64` cannot hold the final range, the
///   midpoint rounds to `1.0`, or the scalar decodes to another sequence.
pub fn encode(seq: &[Nucleotide], model: &ArithmeticModel) -> Result<ArithmeticCode> {
    if seq.is_empty() {
        return Err(Error::EmptySequence);
    }
    if seq.len() != model.sequence_len() {
        return Err(Error::LengthMismatch {
            expected: model.sequence_len(),
            actual: seq.len(),
        });
    }

    let length = seq.len();
    let (mut low, mut high) = (0.0f64, 1.0f64);
    for &symbol in seq {
        let iv = model.interval(symbol);
        if iv.is_empty() {
            return Err(Error::ZeroProbability(symbol));
        }
        (low, high) = narrow(low, high, iv);
        if high <= low {
            return Err(Error::PrecisionExhausted { length });
        }
    }

    let code = ArithmeticCode {
        value: (low + high) / 2.0,
        length,
    };
    debug!("arithmetic encoded value: {:.6}", code.value);

    // A model taken from another sequence gives no width bound, so every
    // scalar is replayed before it is handed out.
    match code.decode(model) {
        Ok(decoded) if decoded == seq => Ok(code),
        _ => Err(Error::PrecisionExhausted { length }),
    }
}

/// Recover `length` symbols from `value`.
///
/// # Errors
/// - `Error::InvalidScalar` if `value` is not a finite number in `[0, 1)`.
/// - `Error::LengthMismatch` if `model` was built for another length.
pub fn decode(value: f64, length: usize, model: &ArithmeticModel) -> Result<Vec<Nucleotide>> {
    if !(0.0..1.0).contains(&value) {
        return Err(Error::InvalidScalar(value));
    }
    if length != model.sequence_len() {
        return Err(Error::LengthMismatch {
            expected: model.sequence_len(),
            actual: length,
        });
    }

    let mut out = Vec::with_capacity(length);
    let (mut low, mut high) = (0.0f64, 1.0f64);
    for _ in 0..length {
        let scaled = (value - low) / (high - low);
        let iv = model
            .symbol_at(scaled)
            .ok_or(Error::InvalidScalar(value))?;
        trace!(
            "decoded value {:.6} to {} with interval [{:.3}, {:.3})",
            scaled,
            iv.symbol,
            iv.low,
            iv.high
        );
        out.push(iv.symbol);
        (low, high) = narrow(low, high, iv);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nucleotide::parse_sequence;
    use proptest::prelude::*;

    fn model_for(s: &str) -> (Vec<Nucleotide>, ArithmeticModel) {
        let seq = parse_sequence(s).unwrap();
        let freqs = FrequencyTable::from_sequence(&seq);
        let model = ArithmeticModel::compute(&freqs, seq.len()).unwrap();
        (seq, model)
    }

    #[test]
    fn test_intervals() {
        let (_, model) = model_for("AAAACCCGGT");
        let bounds: Vec<_> = model.iter().map(|iv| (iv.low, iv.high)).collect();
        assert_eq!(
            bounds,
            vec![(0.0, 0.4), (0.4, 0.7), (0.7, 0.9), (0.9, 1.0)]
        );
        assert_eq!(model.interval(Nucleotide::C).probability, 0.3);
    }

    #[test]
    fn test_arithmetic_roundtrip() {
        let (seq, model) = model_for("AAAACCCGGT");
        let code = encode(&seq, &model).unwrap();
        assert_eq!(code.length, 10);
        assert!((0.0..1.0).contains(&code.value));
        assert_eq!(code.decode(&model).unwrap(), seq);
    }

    #[test]
    fn test_single_symbol() {
        let (seq, model) = model_for("A");
        let a = model.interval(Nucleotide::A);
        assert_eq!((a.low, a.high), (0.0, 1.0));
        assert!(model.interval(Nucleotide::T).is_empty());

        let code = encode(&seq, &model).unwrap();
        assert_eq!(code.value, 0.5);
        assert_eq!(decode(code.value, 1, &model).unwrap(), seq);
    }

    #[test]
    fn test_uniform_run_never_narrows() {
        let (seq, model) = model_for(&"G".repeat(500));
        let code = encode(&seq, &model).unwrap();
        assert_eq!(code.decode(&model).unwrap(), seq);
    }

    #[test]
    fn test_empty_rejected() {
        let freqs = FrequencyTable::analyze("").unwrap();
        assert_eq!(ArithmeticModel::compute(&freqs, 0), Err(Error::EmptySequence));

        let (_, model) = model_for("AC");
        assert_eq!(encode(&[], &model), Err(Error::EmptySequence));
    }

    #[test]
    fn test_model_mismatch() {
        let freqs = FrequencyTable::analyze("ACGT").unwrap();
        assert_eq!(
            ArithmeticModel::compute(&freqs, 5),
            Err(Error::ModelMismatch {
                table_total: 4,
                total_len: 5
            })
        );
    }

    #[test]
    fn test_zero_probability() {
        let (_, model) = model_for("AAC");
        let seq = parse_sequence("AGC").unwrap();
        assert_eq!(encode(&seq, &model), Err(Error::ZeroProbability(Nucleotide::G)));
    }

    #[test]
    fn test_length_mismatch() {
        let (seq, model) = model_for("ACGT");
        let code = encode(&seq, &model).unwrap();
        let err = decode(code.value, 5, &model).unwrap_err();
        assert!(err.is_undecodable());
        assert_eq!(
            err,
            Error::LengthMismatch {
                expected: 4,
                actual: 5
            }
        );
    }

    #[test]
    fn test_invalid_scalar() {
        let (_, model) = model_for("ACGT");
        assert_eq!(decode(1.0, 4, &model), Err(Error::InvalidScalar(1.0)));
        assert_eq!(decode(-0.1, 4, &model), Err(Error::InvalidScalar(-0.1)));
        assert!(matches!(
            decode(f64::NAN, 4, &model),
            Err(Error::InvalidScalar(_))
        ));
    }

    #[test]
    fn test_symbol_at_clamps() {
        let (_, model) = model_for("AACC");
        assert_eq!(model.symbol_at(1.0).unwrap().symbol, Nucleotide::C);
        assert_eq!(model.symbol_at(1.0 + 1e-12).unwrap().symbol, Nucleotide::C);
        assert_eq!(model.symbol_at(-1e-12).unwrap().symbol, Nucleotide::A);
        assert_eq!(model.symbol_at(0.5).unwrap().symbol, Nucleotide::C);
    }

    #[test]
    fn test_precision_exhausted() {
        let (seq, model) = model_for(&"ACGT".repeat(100));
        assert_eq!(
            encode(&seq, &model),
            Err(Error::PrecisionExhausted { length: 400 })
        );
    }

    #[test]
    fn test_foreign_model_midpoint_at_one() {
        // T owns [13/14, 1); fourteen T's push the midpoint onto 1.0.
        let freqs = FrequencyTable::from_counts([0, 0, 13, 1]);
        let model = ArithmeticModel::compute(&freqs, 14).unwrap();
        let seq = parse_sequence(&"T".repeat(14)).unwrap();
        assert_eq!(
            encode(&seq, &model),
            Err(Error::PrecisionExhausted { length: 14 })
        );
    }

    #[test]
    fn test_foreign_model_never_misdecodes() {
        let freqs = FrequencyTable::from_counts([0, 12, 1, 1]);
        let model = ArithmeticModel::compute(&freqs, 14).unwrap();
        let seq = parse_sequence(&format!("G{}", "T".repeat(13))).unwrap();
        match encode(&seq, &model) {
            Ok(code) => {
                assert!((0.0..1.0).contains(&code.value));
                assert_eq!(code.decode(&model).unwrap(), seq);
            }
            Err(e) => assert_eq!(e, Error::PrecisionExhausted { length: 14 }),
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_foreign_model_exact_or_refused(
            counts in prop::array::uniform4(0u64..6),
            picks in prop::collection::vec(0usize..4, 1..=SAFE_LENGTH),
        ) {
            let freqs = FrequencyTable::from_counts(counts);
            let total = freqs.total() as usize;
            prop_assume!(total > 0);
            let model = ArithmeticModel::compute(&freqs, total).unwrap();

            // Any same-length sequence over the symbols the model can code.
            let occupied: Vec<_> = model
                .iter()
                .filter(|iv| !iv.is_empty())
                .map(|iv| iv.symbol)
                .collect();
            let seq: Vec<_> = picks
                .iter()
                .cycle()
                .take(total)
                .map(|&p| occupied[p % occupied.len()])
                .collect();

            match encode(&seq, &model) {
                Ok(code) => {
                    prop_assert!((0.0..1.0).contains(&code.value));
                    prop_assert_eq!(code.decode(&model).unwrap(), seq);
                }
                Err(e) => prop_assert_eq!(e, Error::PrecisionExhausted { length: total }),
            }
        }

        #[test]
        fn prop_intervals_partition_unit(counts in prop::array::uniform4(0u64..1000)) {
            let freqs = FrequencyTable::from_counts(counts);
            prop_assume!(freqs.total() > 0);
            let model = ArithmeticModel::compute(&freqs, freqs.total() as usize).unwrap();

            let intervals: Vec<_> = model.iter().collect();
            prop_assert_eq!(intervals[0].low, 0.0);
            prop_assert_eq!(intervals[3].high, 1.0);
            for pair in intervals.windows(2) {
                prop_assert_eq!(pair[0].high, pair[1].low);
                prop_assert!(pair[0].symbol < pair[1].symbol);
            }
            for iv in &intervals {
                prop_assert!(iv.low <= iv.high);
            }
        }

        #[test]
        fn prop_arithmetic_roundtrip(
            input in prop::collection::vec(0usize..4, 1..=SAFE_LENGTH),
        ) {
            let seq: Vec<_> = input.iter().filter_map(|&i| Nucleotide::from_index(i)).collect();
            let freqs = FrequencyTable::from_sequence(&seq);
            let model = ArithmeticModel::compute(&freqs, seq.len()).unwrap();

            let code = encode(&seq, &model).unwrap();
            prop_assert_eq!(code.decode(&model).unwrap(), seq);
        }
    }
}
